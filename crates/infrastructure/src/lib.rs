//! Infrastructure layer - Adapters and runtime plumbing
//!
//! Implements the departure port on top of the AtB client and provides
//! configuration loading, logging, cron scheduling, and the in-memory
//! host state store.

pub mod adapters;
pub mod config;
pub mod scheduled_tasks;
pub mod scheduler;
pub mod setup;
pub mod state_store;
pub mod telemetry;
#[cfg(test)]
pub mod testing;

pub use adapters::*;
pub use config::{AppConfig, SensorConfig};
pub use scheduled_tasks::{SharedMonitor, create_poll_task, poll_once, schedule_polls};
pub use scheduler::{SchedulerConfig, SchedulerError, TaskScheduler, TaskStats};
pub use setup::build_monitors;
pub use state_store::StateStore;
pub use telemetry::{LoggingConfig, TelemetryError, init_logging};
