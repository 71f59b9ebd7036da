//! # Legacy queue bridge: blocking single-consumer reads over push fan-out.
//!
//! [`EventQueue`] is an [`Observe`] implementation that buffers delivered
//! events in a FIFO and hands them out through [`EventQueue::read_event`].
//! It exists so call sites written against the historical "subscribe once,
//! poll for events" contract can sit on the multiplexed registry without
//! changing their call pattern.
//!
//! ## Architecture
//! ```text
//! dispatch ──► notify(event) ──► [ e1 e2 e3 ... ] ──► read_event(timeout)
//!              (never blocks)      FIFO buffer         (single consumer)
//!                                      │
//!                    bounded + full ──►│ evict oldest, report QueueDropped
//! ```
//!
//! ## Rules
//! - **FIFO**: events come out in delivery order.
//! - **Non-blocking producer**: `notify` appends and returns; the pump task
//!   is never stalled by a slow reader.
//! - **Unbounded by default**: the historical contract had no queue limit
//!   (one subscription, one consumer, low volume). A bound is available as a
//!   hardening option; when full, the **oldest** entry is evicted and the
//!   drop is reported on the bus.
//!
//! ## Usage contract (convention, not enforced)
//! A queue instance observes **at most one attribute at a time**: pair each
//! `subscribe(attr, queue)` with an `unsubscribe` before registering the
//! same instance for another attribute. The registry does not police this;
//! it mirrors the one-subscription-at-a-time discipline of the legacy call
//! sites.
//!
//! ## Example
//! ```rust,ignore
//! let queue = manager.queue();
//! manager.subscribe("sys/tg_test/1/ampli", queue.clone()).await?;
//!
//! // Legacy poll loop:
//! loop {
//!     match queue.read_event(Some(Duration::from_secs(5))).await {
//!         Ok(ev) => handle(ev),
//!         Err(ReadError::Timeout { .. }) => continue,
//!         Err(_) => break,
//!     }
//! }
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::ReadError;
use crate::events::{AttributeEvent, Bus, ProxyEvent};
use crate::observers::Observe;

/// FIFO bridge between push delivery and blocking single-consumer reads.
pub struct EventQueue {
    buffer: Mutex<VecDeque<AttributeEvent>>,
    /// Wakes the reader when an event lands.
    available: Notify,
    /// `None` keeps the queue unbounded (legacy fidelity).
    bound: Option<usize>,
    /// Reporting target for drops; absent on standalone queues.
    bus: Option<Bus>,
}

impl EventQueue {
    /// Creates an unbounded queue, matching the historical contract.
    pub fn unbounded() -> Self {
        Self {
            buffer: Mutex::new(VecDeque::new()),
            available: Notify::new(),
            bound: None,
            bus: None,
        }
    }

    /// Creates a queue bounded at `bound` entries (clamped to at least 1).
    /// On overflow the oldest entry is evicted.
    pub fn bounded(bound: usize) -> Self {
        Self {
            bound: Some(bound.max(1)),
            ..Self::unbounded()
        }
    }

    /// Attaches a bus for reporting evictions.
    #[must_use]
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Removes and returns the oldest buffered event, waiting until one is
    /// available or the timeout elapses.
    ///
    /// Wait modes:
    /// - `None`: wait indefinitely (legacy blocking read).
    /// - `Some(Duration::ZERO)`: return immediately; [`ReadError::Empty`]
    ///   when nothing is buffered.
    /// - `Some(d)`: wait up to `d`, then [`ReadError::Timeout`].
    pub async fn read_event(&self, timeout: Option<Duration>) -> Result<AttributeEvent, ReadError> {
        match timeout {
            None => Ok(self.read_forever().await),
            Some(d) if d.is_zero() => self.pop().ok_or(ReadError::Empty),
            Some(d) => tokio::time::timeout(d, self.read_forever())
                .await
                .map_err(|_| ReadError::Timeout { timeout: d }),
        }
    }

    /// Removes and returns the oldest buffered event without waiting.
    pub fn try_read_event(&self) -> Result<AttributeEvent, ReadError> {
        self.pop().ok_or(ReadError::Empty)
    }

    /// Number of buffered events.
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Whether the buffer is currently empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    async fn read_forever(&self) -> AttributeEvent {
        loop {
            if let Some(ev) = self.pop() {
                return ev;
            }
            // `notify_one` stores a permit when nobody waits yet, so a push
            // between `pop` and this await still wakes us.
            self.available.notified().await;
        }
    }

    fn pop(&self) -> Option<AttributeEvent> {
        self.buffer.lock().pop_front()
    }

    fn push(&self, event: AttributeEvent) {
        let evicted = {
            let mut buffer = self.buffer.lock();
            let evicted = match self.bound {
                Some(bound) if buffer.len() >= bound => buffer.pop_front(),
                _ => None,
            };
            buffer.push_back(event);
            evicted
        };

        if let Some(old) = evicted {
            tracing::warn!(attribute = %old.attribute, "legacy queue full, dropping oldest event");
            if let Some(bus) = &self.bus {
                bus.publish(
                    ProxyEvent::queue_dropped("event_queue", "full")
                        .with_attribute(old.attribute.clone()),
                );
            }
        }
        self.available.notify_one();
    }
}

#[async_trait]
impl Observe for EventQueue {
    async fn notify(&self, event: &AttributeEvent) {
        self.push(event.clone());
    }

    fn name(&self) -> &'static str {
        "event_queue"
    }
}
