//! Floor error types.

use super::table::TableId;
use thiserror::Error;

/// Errors raised by floor state operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FloorError {
    /// The intent referenced a table that is not part of the layout
    #[error("Invalid table id: {0}")]
    InvalidTableId(String),

    /// The floor actor has stopped and no longer accepts messages
    #[error("Floor actor is closed")]
    Closed,
}

impl FloorError {
    /// Build an [`FloorError::InvalidTableId`] from a numeric id
    pub fn invalid_id(id: TableId) -> Self {
        FloorError::InvalidTableId(id.to_string())
    }

    /// Message safe to send back to the client that caused the error
    ///
    /// Clients only ever see the generic text; the offending id stays in the
    /// server logs.
    pub fn client_message(&self) -> String {
        match self {
            FloorError::InvalidTableId(_) => "invalid table id".to_string(),
            FloorError::Closed => "server is shutting down".to_string(),
        }
    }
}

/// Result type for floor operations
pub type FloorResult<T> = Result<T, FloorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_hides_id() {
        let err = FloorError::invalid_id(13);
        assert_eq!(err.to_string(), "Invalid table id: 13");
        assert_eq!(err.client_message(), "invalid table id");
    }
}
