//! Intent handlers: validate, mutate the floor, describe what to send.

use super::messages::{ClientEvent, ServerEvent, TablePayload, TablesUpdate};
use crate::auth::{AdminCredentials, AuthRequest};
use crate::floor::{EpochMillis, Floor, FloorError, FloorResult, FloorSnapshot, TableId, now_millis};
use std::collections::BTreeMap;

/// Where the event produced by an intent must go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Every connected client, the sender included
    Broadcast(ServerEvent),
    /// Only the client that sent the intent
    Direct(ServerEvent),
}

/// Sole owner and mutator of the floor state
#[derive(Debug)]
pub struct Dispatcher {
    floor: Floor,
    credentials: AdminCredentials,
}

impl Dispatcher {
    pub fn new(floor: Floor, credentials: AdminCredentials) -> Self {
        Self { floor, credentials }
    }

    pub fn floor(&self) -> &Floor {
        &self.floor
    }

    pub fn snapshot(&self) -> FloorSnapshot {
        self.floor.snapshot()
    }

    /// Handle one intent with the current wall-clock time
    pub fn handle(&mut self, event: ClientEvent) -> Reply {
        self.handle_at(event, now_millis())
    }

    /// Handle one intent, stamping timers with `now`.
    ///
    /// Rejected intents leave the floor untouched and produce a direct error.
    pub fn handle_at(&mut self, event: ClientEvent, now: EpochMillis) -> Reply {
        let name = event.name();
        let result = match event {
            ClientEvent::StartTable(payload) => self.handle_start(payload, now),
            ClientEvent::BillTable(payload) => self.handle_bill(payload, now),
            ClientEvent::ClearTable(payload) => self.handle_clear(payload),
            ClientEvent::ResetAll => Ok(self.handle_reset()),
            ClientEvent::RemoveFromCleared(payload) => self.handle_remove_from_cleared(payload),
            ClientEvent::RemoveClearedItem { label } => Ok(self.handle_remove_item(&label)),
            ClientEvent::Authenticate(request) => Ok(self.handle_authenticate(&request)),
        };

        result.unwrap_or_else(|e| {
            log::warn!("Rejected {}: {}", name, e);
            Reply::Direct(ServerEvent::error(e.client_message()))
        })
    }

    fn handle_start(&mut self, payload: TablePayload, now: EpochMillis) -> FloorResult<Reply> {
        let id = require_id(&payload)?;
        self.floor.store.start_table(id, now)?;

        // A reseated table no longer belongs in the recent list
        if let Some(label) = self.floor.recent.remove_matching(id) {
            log::debug!("Table {} restarted, dropped '{}' from recent list", id, label);
        }

        self.table_update(id, true)
    }

    fn handle_bill(&mut self, payload: TablePayload, now: EpochMillis) -> FloorResult<Reply> {
        let id = require_id(&payload)?;
        self.floor.store.bill_table(id, now)?;
        self.table_update(id, false)
    }

    fn handle_clear(&mut self, payload: TablePayload) -> FloorResult<Reply> {
        let id = require_id(&payload)?;
        let table = self.floor.store.clear_table(id)?;
        let label = payload
            .table_identifier
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| table.default_label());

        log::info!("Table {} cleared as '{}'", id, label);
        self.floor.recent.push_front(label);
        self.table_update(id, true)
    }

    fn handle_reset(&mut self) -> Reply {
        self.floor.reset_all();
        log::info!("Floor reset, {} tables idle", self.floor.store.len());
        Reply::Broadcast(ServerEvent::FullReset(self.floor.snapshot()))
    }

    fn handle_remove_from_cleared(&mut self, payload: TablePayload) -> FloorResult<Reply> {
        let id = require_id(&payload)?;
        self.floor.store.release_table(id)?;
        self.floor.recent.remove_matching(id);
        self.table_update(id, true)
    }

    fn handle_remove_item(&mut self, label: &str) -> Reply {
        if self.floor.recent.remove_label(label).is_none() {
            log::debug!("Recent list has no entry '{}'", label);
        }
        Reply::Broadcast(ServerEvent::TablesUpdate(TablesUpdate {
            tables: BTreeMap::new(),
            recent_cleared: Some(self.floor.recent.to_vec()),
        }))
    }

    fn handle_authenticate(&self, request: &AuthRequest) -> Reply {
        let response = self.credentials.authenticate(request);
        if !response.success {
            log::warn!("Failed admin login for '{}'", request.username);
        }
        Reply::Direct(ServerEvent::AuthResponse(response))
    }

    fn table_update(&self, id: TableId, with_recent: bool) -> FloorResult<Reply> {
        let view = self.floor.store.get(id)?.view();
        Ok(Reply::Broadcast(ServerEvent::TablesUpdate(TablesUpdate {
            tables: BTreeMap::from([(id, view)]),
            recent_cleared: with_recent.then(|| self.floor.recent.to_vec()),
        })))
    }
}

fn require_id(payload: &TablePayload) -> FloorResult<TableId> {
    payload
        .id
        .ok_or_else(|| FloorError::InvalidTableId("<missing>".to_string()))
}
