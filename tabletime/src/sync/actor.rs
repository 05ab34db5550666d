//! Floor actor: the single event-processing stream.

use super::{
    dispatcher::{Dispatcher, Reply},
    messages::{ClientEvent, ConnId, FloorMessage, FloorStats, OutboundSender, ServerEvent},
};
use crate::floor::{FloorError, FloorResult, FloorSnapshot};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Default inbox size
pub const DEFAULT_INBOX_CAPACITY: usize = 256;

/// Floor actor handle for sending messages
#[derive(Clone, Debug)]
pub struct FloorHandle {
    sender: mpsc::Sender<FloorMessage>,
}

impl FloorHandle {
    pub fn new(sender: mpsc::Sender<FloorMessage>) -> Self {
        Self { sender }
    }

    /// Send a message to the floor
    pub async fn send(&self, message: FloorMessage) -> FloorResult<()> {
        self.sender
            .send(message)
            .await
            .map_err(|_| FloorError::Closed)
    }

    /// Register a connection; `sender` receives `init` first
    pub async fn subscribe(&self, conn_id: ConnId, sender: OutboundSender) -> FloorResult<()> {
        self.send(FloorMessage::Subscribe { conn_id, sender }).await
    }

    pub async fn unsubscribe(&self, conn_id: ConnId) -> FloorResult<()> {
        self.send(FloorMessage::Unsubscribe { conn_id }).await
    }

    /// Queue a client intent for processing
    pub async fn dispatch(&self, conn_id: ConnId, event: ClientEvent) -> FloorResult<()> {
        self.send(FloorMessage::Client { conn_id, event }).await
    }

    /// Queue an event for one connection.
    ///
    /// Goes through the inbox, so it lands after that connection's `init` and
    /// after the replies to intents it sent earlier.
    pub async fn reply(&self, conn_id: ConnId, event: ServerEvent) -> FloorResult<()> {
        self.send(FloorMessage::Direct { conn_id, event }).await
    }

    pub async fn snapshot(&self) -> FloorResult<FloorSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(FloorMessage::GetSnapshot { response: tx }).await?;
        rx.await.map_err(|_| FloorError::Closed)
    }

    pub async fn stats(&self) -> FloorResult<FloorStats> {
        let (tx, rx) = oneshot::channel();
        self.send(FloorMessage::GetStats { response: tx }).await?;
        rx.await.map_err(|_| FloorError::Closed)
    }

    pub async fn shutdown(&self) -> FloorResult<()> {
        self.send(FloorMessage::Shutdown).await
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Actor owning the dispatcher and the set of connected clients.
///
/// Each inbox message is handled to completion before the next one, so floor
/// mutations never interleave. Outbound events are pushed with `try_send` and
/// the actor never waits on a client.
pub struct FloorActor {
    dispatcher: Dispatcher,

    /// Message inbox
    inbox: mpsc::Receiver<FloorMessage>,

    /// Outbound queues of connected clients
    subscribers: HashMap<ConnId, OutboundSender>,

    broadcasts: u64,
    evicted_subscribers: u64,
    rejected_intents: u64,
}

impl FloorActor {
    /// Create a new floor actor and its handle
    pub fn new(dispatcher: Dispatcher, inbox_capacity: usize) -> (Self, FloorHandle) {
        let (sender, inbox) = mpsc::channel(inbox_capacity.max(1));

        let actor = Self {
            dispatcher,
            inbox,
            subscribers: HashMap::new(),
            broadcasts: 0,
            evicted_subscribers: 0,
            rejected_intents: 0,
        };

        (actor, FloorHandle::new(sender))
    }

    /// Create the actor and run it on the current tokio runtime
    pub fn spawn(dispatcher: Dispatcher, inbox_capacity: usize) -> FloorHandle {
        let (actor, handle) = Self::new(dispatcher, inbox_capacity);
        tokio::spawn(actor.run());
        handle
    }

    /// Run the actor event loop until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        log::info!(
            "Floor actor starting with {} tables",
            self.dispatcher.floor().store.len()
        );

        while let Some(message) = self.inbox.recv().await {
            if !self.handle_message(message) {
                break;
            }
        }

        self.subscribers.clear();
        log::info!("Floor actor stopped");
    }

    /// Returns `false` once the actor should stop
    fn handle_message(&mut self, message: FloorMessage) -> bool {
        match message {
            FloorMessage::Subscribe { conn_id, sender } => {
                self.handle_subscribe(conn_id, sender);
            }

            FloorMessage::Unsubscribe { conn_id } => {
                if self.subscribers.remove(&conn_id).is_some() {
                    log::debug!("Subscriber {} removed", conn_id);
                }
            }

            FloorMessage::Client { conn_id, event } => {
                let name = event.name();
                match self.dispatcher.handle(event) {
                    Reply::Broadcast(event) => self.broadcast(event),
                    Reply::Direct(event) => {
                        if matches!(event, ServerEvent::Error(_)) {
                            self.rejected_intents += 1;
                            metrics::counter!("floor_intents_rejected_total", "event" => name)
                                .increment(1);
                        }
                        self.send_to(conn_id, event);
                    }
                }
            }

            FloorMessage::Direct { conn_id, event } => self.send_to(conn_id, event),

            FloorMessage::GetSnapshot { response } => {
                let _ = response.send(self.dispatcher.snapshot());
            }

            FloorMessage::GetStats { response } => {
                let _ = response.send(self.stats());
            }

            FloorMessage::Shutdown => return false,
        }

        true
    }

    /// Register a subscriber with its baseline snapshot queued in the same step
    fn handle_subscribe(&mut self, conn_id: ConnId, sender: OutboundSender) {
        let init = Arc::new(ServerEvent::Init(self.dispatcher.snapshot()));
        match sender.try_send(init) {
            Ok(()) => {
                log::debug!("Subscriber {} added", conn_id);
                self.subscribers.insert(conn_id, sender);
            }
            Err(_) => {
                log::warn!("Subscriber {} could not take init snapshot, ignoring", conn_id);
            }
        }
    }

    /// Send an event to every subscriber.
    ///
    /// A subscriber whose queue is full is evicted: dropping its sender closes
    /// the connection, and the client reconnects to a fresh `init`.
    fn broadcast(&mut self, event: ServerEvent) {
        self.broadcasts += 1;
        metrics::counter!("floor_broadcasts_total", "event" => event.name()).increment(1);

        let event = Arc::new(event);
        let mut evicted = 0;
        self.subscribers.retain(|conn_id, sender| {
            match sender.try_send(event.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Subscriber {} channel full, evicting", conn_id);
                    evicted += 1;
                    false
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", conn_id);
                    false
                }
            }
        });

        if evicted > 0 {
            self.evicted_subscribers += evicted;
            metrics::counter!("floor_subscribers_evicted_total").increment(evicted);
        }
        metrics::gauge!("floor_subscribers").set(self.subscribers.len() as f64);
    }

    fn send_to(&mut self, conn_id: ConnId, event: ServerEvent) {
        let Some(sender) = self.subscribers.get(&conn_id) else {
            log::debug!("Dropping {} for unknown subscriber {}", event.name(), conn_id);
            return;
        };

        if sender.try_send(Arc::new(event)).is_err() {
            log::warn!("Subscriber {} unreachable, removing", conn_id);
            self.subscribers.remove(&conn_id);
        }
    }

    fn stats(&self) -> FloorStats {
        let floor = self.dispatcher.floor();
        FloorStats {
            tables: floor.store.len(),
            busy_tables: floor.store.iter().filter(|t| !t.phase.is_idle()).count(),
            recent_cleared: floor.recent.len(),
            subscribers: self.subscribers.len(),
            broadcasts: self.broadcasts,
            evicted_subscribers: self.evicted_subscribers,
            rejected_intents: self.rejected_intents,
        }
    }
}
