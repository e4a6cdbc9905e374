//! Application layer - Polling and projection of stop departures
//!
//! Contains the stop monitor and departure slot use cases, the timestamp
//! parser, and the port definitions implemented by infrastructure adapters.

pub mod error;
pub mod ports;
pub mod services;
pub mod timestamp_parser;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
pub use timestamp_parser::parse_local_timestamp;
