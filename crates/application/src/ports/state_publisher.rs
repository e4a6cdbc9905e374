//! State publication callback
//!
//! Entities hand their fresh snapshot to this callback whenever their state
//! changes. The host side decides what to do with it.

use std::sync::Arc;

use domain::EntitySnapshot;

/// Callback invoked with an entity's snapshot after each state change
pub type PublishCallback = Arc<dyn Fn(&EntitySnapshot) + Send + Sync>;

/// A callback that discards every snapshot
#[must_use]
pub fn noop_publisher() -> PublishCallback {
    Arc::new(|_| {})
}
