//! Port definitions (interfaces for external systems)
//!
//! Ports are the boundary between application logic and infrastructure.

mod departure_port;
mod state_publisher;

pub use departure_port::DeparturePort;
#[cfg(test)]
pub use departure_port::MockDeparturePort;
pub use state_publisher::{PublishCallback, noop_publisher};
