//! # Event bus for proxy observability events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking publishing of [`ProxyEvent`]s from multiple sources (registry,
//! pump tasks, legacy queues).
//!
//! ## Architecture
//! ```text
//! Publishers (many):                  Receivers (any number):
//!   Registry      ──┐
//!   pump task A   ──┼──────► Bus ───────► LogWriter
//!   pump task B   ──┤  (broadcast chan)   metrics / test assertions / ...
//!   EventQueue    ──┘
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks; it calls
//!   `broadcast::Sender::send`.
//! - **Bounded capacity**: a single ring buffer stores recent events for all
//!   receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip
//!   `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at
//!   send time. Failures reported here are diagnostics, never control flow.

use tokio::sync::broadcast;

use super::event::ProxyEvent;

/// Broadcast channel for proxy observability events.
///
/// Thin wrapper over [`tokio::sync::broadcast`] that provides a
/// `publish`/`subscribe` API. Multiple publishers can publish concurrently;
/// receivers get clones of each event.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<ProxyEvent>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity.
    ///
    /// ### Notes
    /// - Capacity is **shared** across all receivers (not per-receiver).
    /// - When receivers lag, they will observe `RecvError::Lagged`.
    /// - The minimum capacity is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<ProxyEvent>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// - Takes ownership of the event; the broadcast channel clones it for
    ///   each receiver.
    /// - If there are no receivers, the event is dropped (this function still
    ///   returns immediately).
    pub fn publish(&self, ev: ProxyEvent) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// - Each call creates an **independent** receiver.
    /// - A receiver only gets events **sent after** it subscribes.
    /// - Slow receivers get `RecvError::Lagged(n)` and skip over missed items.
    pub fn subscribe(&self) -> broadcast::Receiver<ProxyEvent> {
        self.tx.subscribe()
    }

    /// Returns the number of active receivers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event::ProxyEventKind;

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(ProxyEvent::new(ProxyEventKind::SubscriptionOpened).with_attribute("a/b/c/t"));

        let ev = rx.recv().await.expect("no event");
        assert_eq!(ev.kind, ProxyEventKind::SubscriptionOpened);
        assert_eq!(ev.attribute.as_deref(), Some("a/b/c/t"));
    }

    #[tokio::test]
    async fn test_publish_without_receivers_is_dropped() {
        let bus = Bus::new(8);
        // No receiver: publish must not error or block.
        bus.publish(ProxyEvent::new(ProxyEventKind::SourceClosed));
        assert_eq!(bus.receiver_count(), 0);
    }

    #[tokio::test]
    async fn test_receivers_are_independent() {
        let bus = Bus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(ProxyEvent::new(ProxyEventKind::ObserverAdded));

        assert_eq!(
            rx1.recv().await.expect("rx1").kind,
            ProxyEventKind::ObserverAdded
        );
        assert_eq!(
            rx2.recv().await.expect("rx2").kind,
            ProxyEventKind::ObserverAdded
        );
    }
}
