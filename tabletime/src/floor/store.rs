//! Authoritative per-table state.

use super::{
    errors::{FloorError, FloorResult},
    registry::TableRegistry,
    table::{EpochMillis, TableId, TablePhase, TableState, TableView},
};
use std::collections::BTreeMap;

/// Mutable state for every registered table.
///
/// Transitions are accepted from any phase; only the table id is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStore {
    tables: BTreeMap<TableId, TableState>,
}

impl TableStore {
    /// Create an idle store for every table in `registry`
    pub fn new(registry: &TableRegistry) -> Self {
        let tables = registry
            .iter()
            .map(|(id, capacity)| (id, TableState::new(id, capacity)))
            .collect();
        Self { tables }
    }

    pub fn get(&self, id: TableId) -> FloorResult<&TableState> {
        self.tables.get(&id).ok_or_else(|| FloorError::invalid_id(id))
    }

    pub fn contains(&self, id: TableId) -> bool {
        self.tables.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Seat a table and start its billing timer
    pub fn start_table(&mut self, id: TableId, now: EpochMillis) -> FloorResult<&TableState> {
        self.transition(id, TablePhase::Billed { start: now })
    }

    /// Mark a table billed-out; the timer restarts for the bussing phase
    pub fn bill_table(&mut self, id: TableId, now: EpochMillis) -> FloorResult<&TableState> {
        self.transition(id, TablePhase::Cleared { start: now })
    }

    /// Return a table to idle once it has been bussed
    pub fn clear_table(&mut self, id: TableId) -> FloorResult<&TableState> {
        self.transition(id, TablePhase::Idle)
    }

    /// Return a table to idle after it was dismissed from the recent list
    pub fn release_table(&mut self, id: TableId) -> FloorResult<&TableState> {
        self.transition(id, TablePhase::Idle)
    }

    /// Force every table to idle
    pub fn reset_all(&mut self) {
        for table in self.tables.values_mut() {
            table.phase = TablePhase::Idle;
        }
    }

    /// Wire view of every table
    pub fn views(&self) -> BTreeMap<TableId, TableView> {
        self.tables
            .iter()
            .map(|(id, table)| (*id, table.view()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableState> {
        self.tables.values()
    }

    fn transition(&mut self, id: TableId, phase: TablePhase) -> FloorResult<&TableState> {
        let table = self
            .tables
            .get_mut(&id)
            .ok_or_else(|| FloorError::invalid_id(id))?;

        log::debug!("Table {}: {} -> {}", id, table.phase, phase);
        table.phase = phase;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TableStore {
        TableStore::new(&TableRegistry::standard())
    }

    #[test]
    fn test_all_tables_start_idle() {
        let store = store();
        assert_eq!(store.len(), 20);
        assert!(store.iter().all(|t| t.phase.is_idle()));
    }

    #[test]
    fn test_full_cycle() {
        let mut store = store();

        let table = store.start_table(5, 1_000).unwrap();
        assert_eq!(table.phase, TablePhase::Billed { start: 1_000 });

        let table = store.bill_table(5, 2_000).unwrap();
        assert_eq!(table.phase, TablePhase::Cleared { start: 2_000 });

        let table = store.clear_table(5).unwrap();
        assert_eq!(table.phase, TablePhase::Idle);
        assert_eq!(table.view().start, None);
    }

    #[test]
    fn test_unknown_id_rejected_without_mutation() {
        let mut store = store();
        let before = store.clone();

        assert_eq!(
            store.start_table(13, 1).unwrap_err(),
            FloorError::InvalidTableId("13".to_string())
        );
        assert!(store.bill_table(99, 1).is_err());
        assert!(store.clear_table(0).is_err());
        assert!(store.release_table(17).is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_release_clears_both_flags() {
        let mut store = store();
        store.bill_table(2, 10).unwrap();

        let view = store.release_table(2).unwrap().view();
        assert!(!view.billed);
        assert!(!view.cleared);
        assert_eq!(view.start, None);
    }

    #[test]
    fn test_reset_all() {
        let mut store = store();
        store.start_table(1, 1).unwrap();
        store.bill_table(8, 1).unwrap();

        store.reset_all();
        assert!(store.iter().all(|t| t.phase.is_idle()));
        assert_eq!(store.get(8).unwrap().capacity, 8);
    }

    #[test]
    fn test_views_keyed_by_id() {
        let views = store().views();
        assert_eq!(views.len(), 20);
        assert_eq!(views[&6].capacity, 2);
    }
}
