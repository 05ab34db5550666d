//! Wire protocol and floor actor message types.
//!
//! Every frame is a JSON envelope `{"event": "<name>", "data": <payload>}`.
//! Inbound payloads are decoded leniently: `data` may be omitted and table
//! ids may arrive as numbers or numeric strings.

use crate::auth::{AuthRequest, AuthResponse};
use crate::floor::{FloorSnapshot, TableId, TableView};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

/// Connection identifier assigned by the connection handler
pub type ConnId = Uuid;

/// Per-connection outbound queue
pub type OutboundSender = mpsc::Sender<Arc<ServerEvent>>;

/// Payload of intents that target one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TablePayload {
    /// `None` when the id is missing or not a valid table number
    #[serde(default, deserialize_with = "lenient_table_id")]
    pub id: Option<TableId>,

    /// Display label chosen by the client
    #[serde(default, rename = "tableIdentifier")]
    pub table_identifier: Option<String>,
}

/// Intents sent by clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Seat a table and start its timer
    StartTable(TablePayload),
    /// Mark a table billed-out
    BillTable(TablePayload),
    /// Bus a table and record it as recently cleared
    ClearTable(TablePayload),
    /// Return every table to idle and empty the recent list
    ResetAll,
    /// Dismiss a table from the recent list and release it
    RemoveFromCleared(TablePayload),
    /// Dismiss one recent list entry by its exact label
    RemoveClearedItem { label: String },
    /// Admin login attempt
    Authenticate(AuthRequest),
}

/// Reasons an inbound frame could not be decoded
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed frame: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),
}

#[derive(Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    data: Value,
}

impl ClientEvent {
    /// Decode a text frame
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let envelope: Envelope = serde_json::from_str(text)?;

        let event = match envelope.event.as_str() {
            "start_table" => ClientEvent::StartTable(payload(envelope.data)?),
            "bill_table" => ClientEvent::BillTable(payload(envelope.data)?),
            "clear_table" => ClientEvent::ClearTable(payload(envelope.data)?),
            "reset_all" => ClientEvent::ResetAll,
            "remove_from_cleared" => ClientEvent::RemoveFromCleared(payload(envelope.data)?),
            "remove_cleared_item" => ClientEvent::RemoveClearedItem {
                label: serde_json::from_value(envelope.data)?,
            },
            "authenticate" => ClientEvent::Authenticate(payload(envelope.data)?),
            _ => return Err(DecodeError::UnknownEvent(envelope.event)),
        };

        Ok(event)
    }

    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::StartTable(_) => "start_table",
            ClientEvent::BillTable(_) => "bill_table",
            ClientEvent::ClearTable(_) => "clear_table",
            ClientEvent::ResetAll => "reset_all",
            ClientEvent::RemoveFromCleared(_) => "remove_from_cleared",
            ClientEvent::RemoveClearedItem { .. } => "remove_cleared_item",
            ClientEvent::Authenticate(_) => "authenticate",
        }
    }
}

/// Missing `data` decodes like an empty object
fn payload<T: DeserializeOwned>(data: Value) -> Result<T, serde_json::Error> {
    let data = match data {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(data)
}

fn lenient_table_id<'de, D>(deserializer: D) -> Result<Option<TableId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    let id = match raw {
        Value::Number(n) => n.as_u64().and_then(|n| TableId::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    Ok(id)
}

/// Partial update for the tables that changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesUpdate {
    pub tables: BTreeMap<TableId, TableView>,

    /// Present whenever the recent list may have changed
    #[serde(
        default,
        rename = "recentCleared",
        skip_serializing_if = "Option::is_none"
    )]
    pub recent_cleared: Option<Vec<String>>,
}

/// Error reported to the client whose intent was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Full state, first frame on every connection
    Init(FloorSnapshot),
    /// Delta broadcast after a single-table change
    TablesUpdate(TablesUpdate),
    /// Full state broadcast after a reset
    FullReset(FloorSnapshot),
    /// Reply to `authenticate`
    AuthResponse(AuthResponse),
    /// Reply to a rejected intent
    Error(ErrorMessage),
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error(ErrorMessage {
            message: message.into(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Init(_) => "init",
            ServerEvent::TablesUpdate(_) => "tables_update",
            ServerEvent::FullReset(_) => "full_reset",
            ServerEvent::AuthResponse(_) => "auth_response",
            ServerEvent::Error(_) => "error",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Counters reported by the floor actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FloorStats {
    pub tables: usize,
    pub busy_tables: usize,
    pub recent_cleared: usize,
    pub subscribers: usize,
    /// Events fanned out to all subscribers since startup
    pub broadcasts: u64,
    /// Subscribers dropped because their queue was full
    pub evicted_subscribers: u64,
    /// Intents answered with an error
    pub rejected_intents: u64,
}

/// Messages accepted by the floor actor
#[derive(Debug)]
pub enum FloorMessage {
    /// Register a connection; it receives `init` before anything else
    Subscribe {
        conn_id: ConnId,
        sender: OutboundSender,
    },

    /// Forget a connection
    Unsubscribe { conn_id: ConnId },

    /// Intent from a connected client
    Client { conn_id: ConnId, event: ClientEvent },

    /// Event for one connection, queued behind everything it sent before
    Direct { conn_id: ConnId, event: ServerEvent },

    /// Read the current state
    GetSnapshot {
        response: oneshot::Sender<FloorSnapshot>,
    },

    /// Read floor counters
    GetStats {
        response: oneshot::Sender<FloorStats>,
    },

    /// Stop the actor loop
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_numeric_and_string_ids() {
        let event = ClientEvent::decode(r#"{"event":"start_table","data":{"id":5}}"#).unwrap();
        assert_eq!(
            event,
            ClientEvent::StartTable(TablePayload {
                id: Some(5),
                table_identifier: None
            })
        );

        let event = ClientEvent::decode(r#"{"event":"start_table","data":{"id":" 7"}}"#).unwrap();
        assert!(matches!(event, ClientEvent::StartTable(TablePayload { id: Some(7), .. })));
    }

    #[test]
    fn test_decode_bad_ids_become_none() {
        for data in [json!({}), json!({"id": -3}), json!({"id": "x"}), json!({"id": 1.5})] {
            let frame = json!({"event": "clear_table", "data": data}).to_string();
            let event = ClientEvent::decode(&frame).unwrap();
            assert!(matches!(event, ClientEvent::ClearTable(TablePayload { id: None, .. })));
        }
    }

    #[test]
    fn test_decode_table_identifier() {
        let frame = json!({
            "event": "clear_table",
            "data": {"id": 5, "tableIdentifier": "Table 5 (6 pac)"}
        })
        .to_string();
        let ClientEvent::ClearTable(payload) = ClientEvent::decode(&frame).unwrap() else {
            panic!("expected clear_table");
        };
        assert_eq!(payload.table_identifier.as_deref(), Some("Table 5 (6 pac)"));
    }

    #[test]
    fn test_decode_without_data() {
        assert_eq!(
            ClientEvent::decode(r#"{"event":"reset_all"}"#).unwrap(),
            ClientEvent::ResetAll
        );
        assert_eq!(
            ClientEvent::decode(r#"{"event":"reset_all","data":{}}"#).unwrap(),
            ClientEvent::ResetAll
        );
        assert!(matches!(
            ClientEvent::decode(r#"{"event":"start_table"}"#).unwrap(),
            ClientEvent::StartTable(TablePayload { id: None, .. })
        ));
    }

    #[test]
    fn test_decode_remove_cleared_item_label() {
        let event =
            ClientEvent::decode(r#"{"event":"remove_cleared_item","data":"Table 3 (6 pac)"}"#)
                .unwrap();
        assert_eq!(
            event,
            ClientEvent::RemoveClearedItem {
                label: "Table 3 (6 pac)".to_string()
            }
        );
    }

    #[test]
    fn test_decode_rejects_unknown_and_malformed() {
        assert!(matches!(
            ClientEvent::decode(r#"{"event":"flip_table"}"#),
            Err(DecodeError::UnknownEvent(name)) if name == "flip_table"
        ));
        assert!(matches!(ClientEvent::decode("not json"), Err(DecodeError::Json(_))));
        assert!(ClientEvent::decode(r#"{"event":"start_table","data":5}"#).is_err());
    }

    #[test]
    fn test_server_event_envelope() {
        let event = ServerEvent::error("invalid table id");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "error", "data": {"message": "invalid table id"}})
        );
    }

    #[test]
    fn test_tables_update_omits_absent_recent_list() {
        let event = ServerEvent::TablesUpdate(TablesUpdate {
            tables: BTreeMap::new(),
            recent_cleared: None,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "tables_update");
        assert!(json["data"].get("recentCleared").is_none());
    }

    #[test]
    fn test_server_event_parses_back() {
        let text = r#"{"event":"auth_response","data":{"success":false,"message":"nope"}}"#;
        let event: ServerEvent = serde_json::from_str(text).unwrap();
        assert_eq!(
            event,
            ServerEvent::AuthResponse(AuthResponse {
                success: false,
                message: Some("nope".to_string())
            })
        );
    }
}
