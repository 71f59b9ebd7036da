//! # Events flowing through and out of the proxy.
//!
//! Two event families live here:
//!
//! - [`AttributeEvent`] is the **domain event**: one value pushed by the
//!   underlying source for one attribute, passed through to observers
//!   unmodified. The proxy never interprets its payload.
//! - [`ProxyEvent`] is the **observability event**: emitted by the proxy
//!   itself (subscription opened, observer panicked, queue dropped an entry)
//!   and published on the [`Bus`](crate::events::Bus). Observers of
//!   attributes never see these.
//!
//! ## Ordering guarantees
//! Each proxy event has a globally unique sequence number (`seq`) that
//! increases monotonically. Use `seq` to restore the exact order when events
//! are consumed from independent bus receivers.
//!
//! ## Example
//! ```rust
//! use attrmux::{AttributeEvent, Quality, Value};
//!
//! let ev = AttributeEvent::new("sys/tg_test/1/ampli", Value::Float(21.5))
//!     .with_quality(Quality::Valid);
//!
//! assert_eq!(&*ev.attribute, "sys/tg_test/1/ampli");
//! assert_eq!(ev.quality, Quality::Valid);
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use bytes::Bytes;

/// Global sequence counter for proxy event ordering.
static PROXY_SEQ: AtomicU64 = AtomicU64::new(0);

/// Quality flag attached to a pushed attribute value.
///
/// Mirrors the quality taxonomy of attribute-oriented telemetry sources;
/// the proxy forwards it untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    /// The value is trustworthy.
    Valid,
    /// The value could not be read or is stale.
    Invalid,
    /// The value is in an alarm range.
    Alarm,
    /// The value is in a warning range.
    Warning,
    /// The value is settling after a write.
    Changing,
}

/// Payload of one pushed attribute value.
///
/// A small closed set of scalar shapes plus an opaque raw variant for
/// payloads the client encodes itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Arc<str>),
    Raw(Bytes),
}

/// One push event for one attribute, as produced by the underlying source.
///
/// Carries the attribute identity, the payload (value plus quality) and the
/// source-side timestamp. The proxy passes it through unmodified; fan-out
/// delivers the same event to every observer registered at reception time.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeEvent {
    /// Fully-qualified attribute name the event belongs to.
    pub attribute: Arc<str>,
    /// The pushed value.
    pub value: Value,
    /// Quality flag attached by the source.
    pub quality: Quality,
    /// Source-side wall-clock timestamp.
    pub at: SystemTime,
}

impl AttributeEvent {
    /// Creates an event with the current timestamp and [`Quality::Valid`].
    pub fn new(attribute: impl Into<Arc<str>>, value: Value) -> Self {
        Self {
            attribute: attribute.into(),
            value,
            quality: Quality::Valid,
            at: SystemTime::now(),
        }
    }

    /// Attaches a quality flag.
    #[inline]
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Overrides the timestamp (sources that stamp on the device side).
    #[inline]
    pub fn with_timestamp(mut self, at: SystemTime) -> Self {
        self.at = at;
        self
    }
}

/// Classification of proxy observability events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyEventKind {
    // === Subscription lifecycle ===
    /// An underlying subscription was opened for an attribute.
    ///
    /// Sets:
    /// - `attribute`: attribute name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriptionOpened,

    /// Opening an underlying subscription failed; the failure was also
    /// returned to the `subscribe` caller.
    ///
    /// Sets:
    /// - `attribute`: attribute name
    /// - `reason`: failure message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriptionOpenFailed,

    /// The source stream for an attribute ended. The handle stays registered;
    /// no further events will arrive for the attribute.
    ///
    /// Sets:
    /// - `attribute`: attribute name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SourceClosed,

    // === Observer lifecycle ===
    /// An observer was added to an attribute's fan-out set.
    ///
    /// Sets:
    /// - `attribute`: attribute name
    /// - `observer`: observer name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ObserverAdded,

    /// An observer was removed from an attribute's fan-out set.
    ///
    /// Sets:
    /// - `attribute`: attribute name
    /// - `observer`: observer name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ObserverRemoved,

    /// An observer panicked while handling a delivery. Delivery to the rest
    /// of the snapshot continued; the observer stays registered.
    ///
    /// Sets:
    /// - `attribute`: attribute name
    /// - `observer`: observer name
    /// - `reason`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ObserverPanicked,

    // === Legacy queue ===
    /// A bounded legacy queue evicted its oldest entry to admit a new one.
    ///
    /// Sets:
    /// - `attribute`: attribute of the evicted event
    /// - `observer`: queue name
    /// - `reason`: reason string (e.g., "full")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    QueueDropped,
}

/// Proxy observability event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`ProxyEventKind`]
#[derive(Debug, Clone)]
pub struct ProxyEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: ProxyEventKind,
    /// Attribute the event refers to, if applicable.
    pub attribute: Option<Arc<str>>,
    /// Observer the event refers to, if applicable.
    pub observer: Option<Arc<str>>,
    /// Human-readable reason (errors, panic info, overflow details).
    pub reason: Option<Arc<str>>,
}

impl ProxyEvent {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: ProxyEventKind) -> Self {
        Self {
            seq: PROXY_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            attribute: None,
            observer: None,
            reason: None,
        }
    }

    /// Attaches an attribute name.
    #[inline]
    pub fn with_attribute(mut self, attribute: impl Into<Arc<str>>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Attaches an observer name.
    #[inline]
    pub fn with_observer(mut self, observer: impl Into<Arc<str>>) -> Self {
        self.observer = Some(observer.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates an observer panic event.
    #[inline]
    pub fn observer_panicked(observer: &'static str, info: String) -> Self {
        ProxyEvent::new(ProxyEventKind::ObserverPanicked)
            .with_observer(observer)
            .with_reason(info)
    }

    /// Creates a queue drop event.
    #[inline]
    pub fn queue_dropped(queue: &'static str, reason: &'static str) -> Self {
        ProxyEvent::new(ProxyEventKind::QueueDropped)
            .with_observer(queue)
            .with_reason(reason)
    }

    #[inline]
    pub fn is_observer_panic(&self) -> bool {
        matches!(self.kind, ProxyEventKind::ObserverPanicked)
    }

    #[inline]
    pub fn is_queue_drop(&self) -> bool {
        matches!(self.kind, ProxyEventKind::QueueDropped)
    }
}
