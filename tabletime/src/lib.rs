//! # tabletime
//!
//! Server-authoritative state of a restaurant floor, kept in sync across every
//! connected viewer.
//!
//! Each table moves through three phases:
//!
//! - **Idle**: free, no timer
//! - **Billed**: guests seated, timer counting since seating
//! - **Cleared**: bill settled, timer counting since billing
//!
//! Clearing a table returns it to idle and records a label in a bounded,
//! newest-first "recently cleared" list.
//!
//! ## Core Modules
//!
//! - [`floor`]: layout, per-table state and the recently cleared list
//! - [`sync`]: wire protocol, dispatcher and the floor actor
//! - [`auth`]: advisory admin credential check
//!
//! ## Example
//!
//! ```
//! use tabletime::floor::Floor;
//!
//! let floor = Floor::standard();
//! assert_eq!(floor.store.len(), 20);
//! assert!(floor.store.get(13).is_err());
//! ```

pub mod auth;
pub mod floor;
pub mod sync;

pub use floor::{Floor, FloorError, FloorSnapshot, TableId, TableRegistry};
pub use sync::{ClientEvent, Dispatcher, FloorActor, FloorHandle, ServerEvent};
