//! # Subscription registry: handle table and fan-out bookkeeping.
//!
//! The registry owns the only two pieces of shared mutable state in the
//! proxy: the per-attribute subscription slots and the per-attribute
//! observer sets. It is responsible for lazy, exactly-once creation of
//! underlying subscriptions and for delivering every received event to the
//! observers registered at reception time.
//!
//! ## Architecture
//! ```text
//! subscribe(attr, obs)                      source delivery task
//!       │                                          │
//!       ▼                                          ▼
//! ensure_subscription(attr)              EventStream (mpsc)
//!       │  slot = slots[attr]                      │
//!       │  OnceCell::get_or_try_init ──► open()    │
//!       │        └─► spawn pump ───────────────────┤
//!       ▼                                          ▼
//! add_observer(attr, obs)                dispatch(attr, &event)
//!       │                                          │ snapshot fanout[attr]
//!       ▼                                          ▼
//!   fanout[attr].insert(obs)             obs1.notify ─► obs2.notify ─► ...
//!                                          (panic caught per observer)
//! ```
//!
//! ## Rules
//! - **At-most-one open per attribute**: concurrent first calls race on a
//!   per-attribute `OnceCell`; exactly one runs the open, the rest wait.
//!   A failed open leaves the slot empty, so a later call may retry.
//! - **Handles are never closed**: unregistering observers, or the observer
//!   set going empty, never touches the slot.
//! - **Snapshot-then-deliver**: dispatch clones the member list under the
//!   table lock and runs `notify` outside it, so an observer may call back
//!   into `subscribe`/`unsubscribe` without deadlock. Observers registered
//!   or removed concurrently with a delivery may or may not see that event.
//! - **Per-attribute ordering**: one pump task per attribute delivers
//!   sequentially; different attributes dispatch in parallel.

use std::sync::Arc;

use dashmap::DashMap;
use futures::FutureExt;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

use crate::core::fanout::FanoutSet;
use crate::error::SourceError;
use crate::events::{AttributeEvent, Bus, ProxyEvent, ProxyEventKind};
use crate::observers::Observe;
use crate::source::{EventSource, EventStream, SubscriptionHandle};

type AttributeKey = Arc<str>;
type FanoutTable = DashMap<AttributeKey, FanoutSet>;

/// Owns the handle table and the fan-out sets; the sole synchronization
/// point of the proxy.
pub(crate) struct Registry {
    source: Arc<dyn EventSource>,
    /// Creation slot per attribute; filled exactly once, read lock-free.
    slots: DashMap<AttributeKey, Arc<OnceCell<SubscriptionHandle>>>,
    /// Observers per attribute; mutated by (un)subscribe, read by dispatch.
    /// Shared with the pump tasks, which outlive everything else.
    fanout: Arc<FanoutTable>,
    bus: Bus,
}

impl Registry {
    /// Creates a new registry around the given source adapter.
    pub(crate) fn new(source: Arc<dyn EventSource>, bus: Bus) -> Arc<Self> {
        Arc::new(Self {
            source,
            slots: DashMap::new(),
            fanout: Arc::new(DashMap::new()),
            bus,
        })
    }

    /// Ensures an underlying subscription exists for `attribute`.
    ///
    /// Returns immediately when the slot is already filled. Otherwise opens
    /// the source subscription and spawns the pump task; concurrent callers
    /// for the same never-yet-created attribute result in exactly one open.
    ///
    /// On failure the error is reported on the bus and returned; the slot
    /// stays empty so a subsequent call can try again.
    pub(crate) async fn ensure_subscription(&self, attribute: &str) -> Result<(), SourceError> {
        // Fast path: a read guard is enough once the slot exists.
        let slot = match self.slots.get(attribute) {
            Some(entry) => Arc::clone(entry.value()),
            None => {
                let entry = self.slots.entry(Arc::from(attribute)).or_default();
                Arc::clone(entry.value())
            }
        };
        slot.get_or_try_init(|| self.open_and_pump(attribute)).await?;
        Ok(())
    }

    /// Opens the source subscription and starts its pump task.
    async fn open_and_pump(&self, attribute: &str) -> Result<SubscriptionHandle, SourceError> {
        let stream = match self.source.open(attribute).await {
            Ok(stream) => stream,
            Err(err) => {
                tracing::warn!(attribute, error = %err, "failed to open source subscription");
                self.bus.publish(
                    ProxyEvent::new(ProxyEventKind::SubscriptionOpenFailed)
                        .with_attribute(attribute)
                        .with_reason(err.to_string()),
                );
                return Err(err);
            }
        };

        let key: AttributeKey = Arc::from(attribute);
        let pump = spawn_pump(
            Arc::clone(&self.fanout),
            self.bus.clone(),
            key.clone(),
            stream,
        );

        tracing::debug!(attribute, "source subscription opened");
        self.bus.publish(
            ProxyEvent::new(ProxyEventKind::SubscriptionOpened).with_attribute(key.clone()),
        );

        Ok(SubscriptionHandle::new(key, pump))
    }

    /// Adds `observer` to the fan-out set for `attribute`.
    ///
    /// Set semantics: adding the same identity twice is a no-op. Callers go
    /// through [`ensure_subscription`](Self::ensure_subscription) first so
    /// deliveries can start flowing; adding without a subscription only
    /// stages the observer.
    pub(crate) fn add_observer(&self, attribute: &str, observer: Arc<dyn Observe>) {
        let name = observer.name();
        let added = {
            let mut set = self.fanout.entry(Arc::from(attribute)).or_default();
            set.insert(observer)
        };
        if added {
            self.bus.publish(
                ProxyEvent::new(ProxyEventKind::ObserverAdded)
                    .with_attribute(attribute)
                    .with_observer(name),
            );
        }
    }

    /// Removes `observer` from the fan-out set for `attribute`.
    ///
    /// No-op (not an error) when the observer is absent or the attribute was
    /// never subscribed. Never removes or closes the underlying handle.
    pub(crate) fn remove_observer(&self, attribute: &str, observer: &Arc<dyn Observe>) {
        let removed = {
            match self.fanout.get_mut(attribute) {
                Some(mut set) => set.remove(observer),
                None => false,
            }
        };
        if removed {
            self.bus.publish(
                ProxyEvent::new(ProxyEventKind::ObserverRemoved)
                    .with_attribute(attribute)
                    .with_observer(observer.name()),
            );
        }
    }

    /// Returns the number of observers currently registered for `attribute`.
    pub(crate) fn observer_count(&self, attribute: &str) -> usize {
        self.fanout.get(attribute).map(|set| set.len()).unwrap_or(0)
    }

    /// Returns true when an underlying subscription is open for `attribute`.
    pub(crate) fn is_subscribed(&self, attribute: &str) -> bool {
        self.slots
            .get(attribute)
            .map(|slot| slot.initialized())
            .unwrap_or(false)
    }
}

/// Spawns the task that forwards source events into dispatch.
///
/// Captures the fan-out table and bus rather than the registry itself; runs
/// until the source stream ends, which a live source never does.
fn spawn_pump(
    fanout: Arc<FanoutTable>,
    bus: Bus,
    attribute: AttributeKey,
    mut stream: EventStream,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = stream.recv().await {
            dispatch(&fanout, &bus, &attribute, &event).await;
        }
        tracing::warn!(attribute = %attribute, "source stream ended");
        bus.publish(ProxyEvent::new(ProxyEventKind::SourceClosed).with_attribute(attribute));
    })
}

/// Delivers one event to every observer registered at this moment.
///
/// Takes a snapshot of the fan-out set, releases the table lock, then calls
/// `notify` on each member sequentially. A panicking observer is reported
/// and skipped; the remaining members still receive the event.
async fn dispatch(fanout: &FanoutTable, bus: &Bus, attribute: &str, event: &AttributeEvent) {
    let snapshot = {
        match fanout.get(attribute) {
            Some(set) => set.snapshot(),
            None => return,
        }
    };

    for observer in snapshot {
        let fut = observer.notify(event);
        if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
            let info = panic_message(&*panic_err);
            tracing::warn!(
                attribute,
                observer = observer.name(),
                panic = %info,
                "observer panicked during dispatch"
            );
            bus.publish(
                ProxyEvent::observer_panicked(observer.name(), info).with_attribute(attribute),
            );
        }
    }
}

/// Extracts a printable message from a caught panic payload.
fn panic_message(panic_err: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic_err.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic_err.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
