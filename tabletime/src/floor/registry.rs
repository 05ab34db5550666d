//! Static floor layout.

use super::table::{Capacity, TableId};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Rows of consecutive table numbers on the floor
pub const TABLE_ROWS: [RangeInclusive<TableId>; 3] = [1..=8, 9..=14, 15..=22];

/// Numbers skipped on the floor plan; no physical table carries them
pub const EXCLUDED_IDS: [TableId; 2] = [13, 17];

/// Capacity used when no override applies
pub const DEFAULT_CAPACITY: Capacity = 4;

/// Seats per table.
///
/// Explicit overrides for the front rows, [`DEFAULT_CAPACITY`] elsewhere.
pub fn capacity_for(id: TableId) -> Capacity {
    match id {
        2..=5 | 7 => 6,
        6 => 2,
        8 => 8,
        15 | 16 | 18 | 19 => 6,
        _ => DEFAULT_CAPACITY,
    }
}

/// Immutable mapping of table ids to capacities
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRegistry {
    tables: BTreeMap<TableId, Capacity>,
}

impl TableRegistry {
    /// Create an empty registry; call [`TableRegistry::initialize`] to populate it
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with the standard floor layout
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.initialize();
        registry
    }

    /// Populate the layout.
    ///
    /// Calling this on a populated registry does nothing.
    pub fn initialize(&mut self) {
        if !self.tables.is_empty() {
            return;
        }

        for row in TABLE_ROWS {
            for id in row {
                if EXCLUDED_IDS.contains(&id) {
                    continue;
                }
                self.tables.insert(id, capacity_for(id));
            }
        }

        log::debug!("Floor layout initialized with {} tables", self.tables.len());
    }

    pub fn contains(&self, id: TableId) -> bool {
        self.tables.contains_key(&id)
    }

    pub fn capacity(&self, id: TableId) -> Option<Capacity> {
        self.tables.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterate `(id, capacity)` in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (TableId, Capacity)> + '_ {
        self.tables.iter().map(|(id, cap)| (*id, *cap))
    }
}
