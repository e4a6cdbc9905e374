//! AtB departure API integration for busboard
//!
//! Fetches upcoming departures for a stop from the
//! [AtB departure API](https://atbapi.tar.io/). The body is decoded into
//! [`domain::DeparturesPayload`], keeping every field the API sends.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain::StopId;
//! use integration_atb::{AtbConfig, AtbDepartureClient, DepartureClient};
//!
//! let client = AtbDepartureClient::new(&AtbConfig::default())?;
//! let payload = client.fetch_departures(&StopId::new("16010480")?).await?;
//! ```

mod client;
mod config;
mod error;

pub use client::{AtbDepartureClient, DepartureClient};
pub use config::AtbConfig;
pub use error::AtbError;
