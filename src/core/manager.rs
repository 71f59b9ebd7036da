//! # SubscriptionManager: the facade clients register through.
//!
//! The manager owns the [`Bus`], the registry and the global [`Config`]. It
//! exposes the two operations client code cares about, `subscribe` and
//! `unsubscribe`, plus conveniences for bridging legacy call sites and for
//! tapping the observability stream.
//!
//! ## High-level architecture
//! ```text
//! client code                          legacy call site
//!     │                                      │
//!     │ subscribe(attr, watcher)             │ let q = manager.queue();
//!     ▼                                      │ subscribe(attr, q.clone());
//! SubscriptionManager ◄────────────────────――┘ q.read_event(timeout)
//!     │
//!     ├── ensure_subscription(attr) ──► Registry ──► EventSource::open
//!     └── add_observer(attr, watcher) ─► fanout set
//!
//! Observability:
//!     manager.events() ──► broadcast receiver of ProxyEvent
//! ```
//!
//! ## Rules
//! - All methods are safe for concurrent use from many tasks, against the
//!   same or different attributes.
//! - `subscribe` fails only when the source cannot open a subscription; the
//!   error is propagated unchanged and nothing is retried.
//! - `unsubscribe` always succeeds and never touches the underlying
//!   subscription.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::Config;
use crate::core::registry::Registry;
use crate::error::SourceError;
use crate::events::{Bus, ProxyEvent};
use crate::observers::{EventQueue, Observe};
use crate::source::EventSource;

/// Facade over the registry: register/unregister observers and trigger lazy
/// subscription creation.
pub struct SubscriptionManager {
    cfg: Config,
    bus: Bus,
    registry: Arc<Registry>,
}

impl SubscriptionManager {
    /// Creates a manager around the given source adapter.
    pub fn new(source: Arc<dyn EventSource>, cfg: Config) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        let registry = Registry::new(source, bus.clone());
        Self { cfg, bus, registry }
    }

    /// Registers `observer` for `attribute`, opening the underlying
    /// subscription on first use.
    ///
    /// Fails only when the source adapter cannot open the subscription; the
    /// observer is not registered in that case. Registering the same
    /// observer identity twice is a no-op.
    pub async fn subscribe(
        &self,
        attribute: &str,
        observer: Arc<dyn Observe>,
    ) -> Result<(), SourceError> {
        self.registry.ensure_subscription(attribute).await?;
        self.registry.add_observer(attribute, observer);
        Ok(())
    }

    /// Unregisters `observer` from `attribute`.
    ///
    /// Idempotent: absent observers and never-subscribed attributes are
    /// no-ops. The underlying subscription, if any, stays open either way.
    pub fn unsubscribe(&self, attribute: &str, observer: &Arc<dyn Observe>) {
        self.registry.remove_observer(attribute, observer);
    }

    /// Builds a legacy queue wired to this manager's bus and configured
    /// bound, ready to be passed to [`subscribe`](Self::subscribe).
    pub fn queue(&self) -> Arc<EventQueue> {
        let queue = match self.cfg.queue_bound {
            Some(bound) => EventQueue::bounded(bound),
            None => EventQueue::unbounded(),
        };
        Arc::new(queue.with_bus(self.bus.clone()))
    }

    /// Subscribes to the proxy's observability events.
    pub fn events(&self) -> broadcast::Receiver<ProxyEvent> {
        self.bus.subscribe()
    }

    /// The manager's observability bus.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Number of observers currently registered for `attribute`.
    pub fn observer_count(&self, attribute: &str) -> usize {
        self.registry.observer_count(attribute)
    }

    /// Whether an underlying subscription is open for `attribute`.
    pub fn is_subscribed(&self, attribute: &str) -> bool {
        self.registry.is_subscribed(attribute)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::events::{AttributeEvent, ProxyEventKind, Value};
    use crate::testutil::{FakeSource, Recorder};

    fn manager_with(source: FakeSource) -> (SubscriptionManager, Arc<FakeSource>) {
        let source = Arc::new(source);
        let manager = SubscriptionManager::new(source.clone(), Config::default());
        (manager, source)
    }

    #[tokio::test]
    async fn test_two_observers_then_unsubscribe_one() {
        let (manager, source) = manager_with(FakeSource::new());
        let o1 = Recorder::arc();
        let o2 = Recorder::arc();

        manager.subscribe("temperature", o1.clone()).await.expect("o1");
        manager.subscribe("temperature", o2.clone()).await.expect("o2");
        assert_eq!(manager.observer_count("temperature"), 2);

        source.push("temperature", AttributeEvent::new("temperature", Value::Float(21.5)));
        assert_eq!(
            o1.wait_len(1, Duration::from_secs(1)).await[0].value,
            Value::Float(21.5)
        );
        assert_eq!(
            o2.wait_len(1, Duration::from_secs(1)).await[0].value,
            Value::Float(21.5)
        );

        manager.unsubscribe("temperature", &(o1.clone() as Arc<dyn Observe>));
        source.push("temperature", AttributeEvent::new("temperature", Value::Float(22.0)));

        let got2 = o2.wait_len(2, Duration::from_secs(1)).await;
        assert_eq!(got2[1].value, Value::Float(22.0));
        assert_eq!(o1.events().len(), 1, "unsubscribed observer sees nothing new");
        assert!(manager.is_subscribed("temperature"), "handle stays open");
    }

    #[tokio::test]
    async fn test_subscribe_propagates_open_failure() {
        let (manager, _source) = manager_with(FakeSource::new().fail_next_opens(1));
        let obs = Recorder::arc();

        let err = manager
            .subscribe("temperature", obs.clone())
            .await
            .expect_err("open failure must surface");
        assert_eq!(err.as_label(), "source_unavailable");
        assert_eq!(
            manager.observer_count("temperature"),
            0,
            "failed subscribe must not register the observer"
        );
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let (manager, _source) = manager_with(FakeSource::new());
        let obs = Recorder::arc();
        let handle = obs.clone() as Arc<dyn Observe>;

        manager.subscribe("temperature", obs.clone()).await.expect("subscribe");
        manager.unsubscribe("temperature", &handle);
        manager.unsubscribe("temperature", &handle);
        manager.unsubscribe("pressure", &handle);

        assert_eq!(manager.observer_count("temperature"), 0);
    }

    #[tokio::test]
    async fn test_queue_bridges_legacy_reads() {
        let (manager, source) = manager_with(FakeSource::new());
        let queue = manager.queue();

        manager
            .subscribe("temperature", queue.clone())
            .await
            .expect("subscribe queue");

        source.push("temperature", AttributeEvent::new("temperature", Value::Float(21.5)));

        let ev = queue
            .read_event(Some(Duration::from_secs(1)))
            .await
            .expect("queued event");
        assert_eq!(ev.value, Value::Float(21.5));
    }

    #[tokio::test]
    async fn test_events_reports_lifecycle() {
        let (manager, _source) = manager_with(FakeSource::new());
        let mut rx = manager.events();
        let obs = Recorder::arc();

        manager.subscribe("temperature", obs.clone()).await.expect("subscribe");

        let opened = rx.recv().await.expect("opened event");
        assert_eq!(opened.kind, ProxyEventKind::SubscriptionOpened);
        let added = rx.recv().await.expect("added event");
        assert_eq!(added.kind, ProxyEventKind::ObserverAdded);
        assert_eq!(added.attribute.as_deref(), Some("temperature"));
    }
}
