//! Table entities: identifiers, billing phase and the wire view.

use serde::{Deserialize, Serialize};

/// Table identifier, fixed by the floor layout
pub type TableId = u32;

/// Number of covers a table seats
pub type Capacity = u32;

/// Milliseconds since the Unix epoch
pub type EpochMillis = i64;

/// Current wall-clock time in epoch milliseconds
pub fn now_millis() -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
}

/// Billing phase of a single table.
///
/// Each non-idle phase carries the instant its timer started, so a table can
/// never be billed and cleared at the same time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TablePhase {
    /// No timer running
    #[default]
    Idle,
    /// Guests seated, billing timer running
    Billed { start: EpochMillis },
    /// Bill settled, waiting to be bussed
    Cleared { start: EpochMillis },
}

impl TablePhase {
    /// Timer start, if a counter should be displayed
    pub fn start(&self) -> Option<EpochMillis> {
        match self {
            TablePhase::Idle => None,
            TablePhase::Billed { start } | TablePhase::Cleared { start } => Some(*start),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, TablePhase::Idle)
    }

    pub fn is_billed(&self) -> bool {
        matches!(self, TablePhase::Billed { .. })
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, TablePhase::Cleared { .. })
    }
}

impl std::fmt::Display for TablePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TablePhase::Idle => write!(f, "idle"),
            TablePhase::Billed { .. } => write!(f, "billed"),
            TablePhase::Cleared { .. } => write!(f, "cleared"),
        }
    }
}

/// Authoritative state of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub id: TableId,
    pub capacity: Capacity,
    pub phase: TablePhase,
}

impl TableState {
    /// Create an idle table
    pub fn new(id: TableId, capacity: Capacity) -> Self {
        Self {
            id,
            capacity,
            phase: TablePhase::Idle,
        }
    }

    /// Label used in the recently cleared list when the client sends none
    pub fn default_label(&self) -> String {
        format!("Table {} ({} pac)", self.id, self.capacity)
    }

    /// Flatten into the boolean shape clients render from
    pub fn view(&self) -> TableView {
        TableView {
            id: self.id,
            capacity: self.capacity,
            billed: self.phase.is_billed(),
            cleared: self.phase.is_cleared(),
            start: self.phase.start(),
        }
    }
}

/// Wire representation of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub id: TableId,
    pub capacity: Capacity,
    pub billed: bool,
    pub cleared: bool,
    /// Epoch milliseconds when the displayed timer started
    pub start: Option<EpochMillis>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_view() {
        let table = TableState::new(3, 6);
        let view = table.view();
        assert!(!view.billed);
        assert!(!view.cleared);
        assert_eq!(view.start, None);
    }

    #[test]
    fn test_phase_flags_are_exclusive() {
        for phase in [
            TablePhase::Idle,
            TablePhase::Billed { start: 1 },
            TablePhase::Cleared { start: 2 },
        ] {
            let table = TableState {
                id: 1,
                capacity: 4,
                phase,
            };
            let view = table.view();
            assert!(!(view.billed && view.cleared), "{phase} set both flags");
            assert_eq!(view.start.is_some(), !phase.is_idle());
        }
    }

    #[test]
    fn test_view_serializes_null_start() {
        let json = serde_json::to_value(TableState::new(9, 4).view()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 9,
                "capacity": 4,
                "billed": false,
                "cleared": false,
                "start": null
            })
        );
    }

    #[test]
    fn test_default_label() {
        assert_eq!(TableState::new(5, 6).default_label(), "Table 5 (6 pac)");
    }
}
