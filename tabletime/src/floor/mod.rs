//! Floor state: layout, per-table billing state and the recently cleared list.
//!
//! ## Architecture
//!
//! - [`TableRegistry`]: fixed layout built once at startup
//! - [`TableStore`]: authoritative phase of every table
//! - [`RecentCleared`]: bounded, newest-first list of cleared table labels
//! - [`Floor`]: the single owned state object bundling store and list
//!
//! A [`Floor`] is owned by exactly one dispatcher (see [`crate::sync`]); it
//! is never shared behind a lock.

pub mod errors;
pub mod recent;
pub mod registry;
pub mod store;
pub mod table;

pub use errors::{FloorError, FloorResult};
pub use recent::{RECENT_CLEARED_CAPACITY, RecentCleared};
pub use registry::{TableRegistry, capacity_for};
pub use store::TableStore;
pub use table::{Capacity, EpochMillis, TableId, TablePhase, TableState, TableView, now_millis};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete floor state as sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorSnapshot {
    /// Every table, keyed by id (stringified on the wire)
    pub tables: BTreeMap<TableId, TableView>,

    /// Recently cleared labels, newest first
    #[serde(rename = "recentCleared")]
    pub recent_cleared: Vec<String>,
}

/// Owned floor state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Floor {
    pub store: TableStore,
    pub recent: RecentCleared,
}

impl Floor {
    /// Idle floor for `registry` with an empty recent list
    pub fn new(registry: &TableRegistry) -> Self {
        Self {
            store: TableStore::new(registry),
            recent: RecentCleared::new(),
        }
    }

    /// Idle floor with the standard layout
    pub fn standard() -> Self {
        Self::new(&TableRegistry::standard())
    }

    pub fn snapshot(&self) -> FloorSnapshot {
        FloorSnapshot {
            tables: self.store.views(),
            recent_cleared: self.recent.to_vec(),
        }
    }

    /// Every table idle, recent list empty
    pub fn reset_all(&mut self) {
        self.store.reset_all();
        self.recent.clear();
    }
}
