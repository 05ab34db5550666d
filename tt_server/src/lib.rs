//! Floor server: WebSocket broadcast of the restaurant floor state.
//!
//! The binary wires these modules together; they are exposed as a library so
//! integration tests can build the router against an in-process floor actor.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
