//! Real-time synchronization of the floor state with connected clients.
//!
//! This module implements:
//! - Dispatcher: one handler per client intent, sole mutator of the floor
//! - FloorActor: runs the dispatcher on a single Tokio task with an mpsc inbox
//! - The JSON envelope protocol shared by server and clients
//!
//! ## Architecture
//!
//! Connections subscribe with their own bounded outbound channel. The actor
//! queues `init` on that channel as part of handling the subscription, so a
//! client always holds a baseline before it sees any `tables_update`.
//! Broadcasts reach every subscriber, the originator included.
//!
//! ## Example
//!
//! ```no_run
//! use tabletime::auth::AdminCredentials;
//! use tabletime::floor::Floor;
//! use tabletime::sync::{ClientEvent, Dispatcher, FloorActor};
//! use tokio::sync::mpsc;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() {
//!     let dispatcher = Dispatcher::new(Floor::standard(), AdminCredentials::default());
//!     let handle = FloorActor::spawn(dispatcher, 256);
//!
//!     let conn_id = Uuid::new_v4();
//!     let (tx, mut rx) = mpsc::channel(64);
//!     handle.subscribe(conn_id, tx).await.unwrap();
//!
//!     let event = ClientEvent::decode(r#"{"event":"start_table","data":{"id":5}}"#).unwrap();
//!     handle.dispatch(conn_id, event).await.unwrap();
//!
//!     let init = rx.recv().await.unwrap();
//!     let update = rx.recv().await.unwrap();
//!     println!("{} then {}", init.name(), update.name());
//! }
//! ```

pub mod actor;
pub mod dispatcher;
pub mod messages;

pub use actor::{DEFAULT_INBOX_CAPACITY, FloorActor, FloorHandle};
pub use dispatcher::{Dispatcher, Reply};
pub use messages::{
    ClientEvent, ConnId, DecodeError, ErrorMessage, FloorMessage, FloorStats, OutboundSender,
    ServerEvent, TablePayload, TablesUpdate,
};
