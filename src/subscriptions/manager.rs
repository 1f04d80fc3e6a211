//! Subscription manager for broadcasting seat snapshots.

use crate::types::{ConnectionId, SeatView};
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::types::{DropReason, EngineEvent, SubscriptionConfig, SubscriptionHandle};

/// Internal subscription state.
struct Subscription {
    sender: Sender<EngineEvent>,
}

impl Subscription {
    /// Try to send an event. Returns false if the buffer is full or the
    /// receiver is gone (subscriber will be dropped).
    fn try_send(&self, event: EngineEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(crossbeam_channel::TrySendError::Full(_)) => false,
            Err(crossbeam_channel::TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Manages per-connection subscriptions and broadcasts snapshots.
pub struct SubscriptionManager {
    /// Active subscriptions by connection.
    subscriptions: RwLock<HashMap<ConnectionId, Subscription>>,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
        }
    }

    /// Register a subscription for `conn`.
    ///
    /// Returns a handle for receiving events. The caller is responsible for
    /// delivering the initial snapshot via [`send_to`](Self::send_to).
    pub fn subscribe(&self, conn: ConnectionId, config: SubscriptionConfig) -> SubscriptionHandle {
        let (sender, receiver) = bounded(config.buffer_size);

        self.subscriptions
            .write()
            .insert(conn, Subscription { sender });
        debug!(conn = %conn, "subscription registered");

        SubscriptionHandle {
            connection: conn,
            receiver,
        }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, conn: ConnectionId) {
        let mut subs = self.subscriptions.write();
        if let Some(sub) = subs.remove(&conn) {
            // Tell the receiver why the stream ended (best effort).
            let _ = sub.try_send(EngineEvent::Dropped {
                reason: DropReason::Disconnected,
            });
            debug!(conn = %conn, "subscription removed");
        }
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Send an event directly to one connection (initial snapshot delivery).
    /// Returns false if the connection is not subscribed or was dropped.
    pub fn send_to(&self, conn: ConnectionId, event: EngineEvent) -> bool {
        let subs = self.subscriptions.read();
        match subs.get(&conn) {
            Some(sub) => sub.try_send(event),
            None => false,
        }
    }

    /// Broadcast the full seat snapshot to every subscriber.
    ///
    /// Fire-and-forget: a subscriber whose buffer is full is dropped with a
    /// final `Dropped { BufferOverflow }` rather than blocking the engine.
    pub fn broadcast_snapshot(&self, seats: &[SeatView]) {
        let event = EngineEvent::SeatSnapshot {
            seats: seats.to_vec(),
        };

        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (conn, sub) in subs.iter() {
                if !sub.try_send(event.clone()) {
                    to_remove.push(*conn);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for conn in to_remove {
                if let Some(sub) = subs.remove(&conn) {
                    warn!(conn = %conn, "dropping slow subscriber");
                    let _ = sub.try_send(EngineEvent::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}
