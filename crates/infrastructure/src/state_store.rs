//! In-memory host state store
//!
//! Keeps the latest published snapshot of every entity, keyed by entity id.

use std::collections::BTreeMap;
use std::sync::Arc;

use application::ports::PublishCallback;
use domain::EntitySnapshot;
use parking_lot::RwLock;
use tracing::{debug, info};

/// Latest snapshot per entity
#[derive(Debug, Default)]
pub struct StateStore {
    states: RwLock<BTreeMap<String, EntitySnapshot>>,
}

impl StateStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Publish callback that records into this store
    #[must_use]
    pub fn publisher(self: &Arc<Self>) -> PublishCallback {
        let store = Arc::clone(self);
        Arc::new(move |snapshot| store.record(snapshot))
    }

    /// Store a snapshot, replacing the previous one for the same entity
    pub fn record(&self, snapshot: &EntitySnapshot) {
        let previous = self
            .states
            .write()
            .insert(snapshot.entity_id.clone(), snapshot.clone());

        match previous {
            Some(old) if old.state == snapshot.state => {
                debug!(entity_id = %snapshot.entity_id, state = %snapshot.state, "State refreshed");
            },
            Some(old) => {
                info!(
                    entity_id = %snapshot.entity_id,
                    from = %old.state,
                    to = %snapshot.state,
                    "State changed"
                );
            },
            None => {
                info!(entity_id = %snapshot.entity_id, state = %snapshot.state, "Entity registered");
            },
        }
    }

    /// Latest snapshot of one entity
    pub fn get(&self, entity_id: &str) -> Option<EntitySnapshot> {
        self.states.read().get(entity_id).cloned()
    }

    /// All snapshots ordered by entity id
    pub fn all(&self) -> Vec<EntitySnapshot> {
        self.states.read().values().cloned().collect()
    }

    /// Number of known entities
    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    /// Whether nothing has been published yet
    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}
