//! Bounded list of recently cleared tables, newest first.

use super::table::TableId;
use std::collections::VecDeque;

/// Maximum number of labels kept
pub const RECENT_CLEARED_CAPACITY: usize = 10;

/// Recently cleared tables.
///
/// Labels are opaque display strings; the only structure relied upon is the
/// `"Table <n>"` prefix used by [`RecentCleared::remove_matching`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentCleared {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for RecentCleared {
    fn default() -> Self {
        Self::new()
    }
}

impl RecentCleared {
    pub fn new() -> Self {
        Self::with_capacity(RECENT_CLEARED_CAPACITY)
    }

    /// Create a buffer holding at most `capacity` labels (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert at the head, evicting from the tail when over capacity
    pub fn push_front(&mut self, label: impl Into<String>) {
        self.entries.push_front(label.into());
        self.entries.truncate(self.capacity);
    }

    /// Remove the first label referring to table `id`.
    ///
    /// Matches `"Table 9"` and, for single-digit ids, `"Table 09"`. The number
    /// must not continue with another digit, so table 1 leaves `"Table 12"`
    /// alone. Returns the removed label.
    pub fn remove_matching(&mut self, id: TableId) -> Option<String> {
        let position = self
            .entries
            .iter()
            .position(|label| label_references(label, id))?;
        self.entries.remove(position)
    }

    /// Remove the first label equal to `label`
    pub fn remove_label(&mut self, label: &str) -> Option<String> {
        let position = self.entries.iter().position(|entry| entry == label)?;
        self.entries.remove(position)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Owned copy for serialization, newest first
    pub fn to_vec(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

fn label_references(label: &str, id: TableId) -> bool {
    let bare = format!("Table {id}");
    if contains_number(label, &bare) {
        return true;
    }
    id < 10 && contains_number(label, &format!("Table 0{id}"))
}

/// True when `needle` occurs in `haystack` without a digit right after it
fn contains_number(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(at, _)| {
        !haystack[at + needle.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit())
    })
}
