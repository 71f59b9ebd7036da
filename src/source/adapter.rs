//! # Source boundary: the capability to open push subscriptions.
//!
//! [`EventSource`] is the single seam between the proxy and the underlying
//! control/telemetry system. The proxy asks it for exactly one thing: "open
//! one push subscription for attribute A and deliver its events until process
//! exit". Transport, protocol encoding and reconnection live behind this
//! trait and never shape the proxy.
//!
//! ## Contract
//! - [`EventSource::open`] is called **at most once per attribute** for the
//!   life of the process (the registry deduplicates concurrent first calls).
//! - The returned [`EventStream`] delivers every event the source produces
//!   for the attribute, in source order, from whatever task or thread the
//!   adapter chooses. There is **no close operation** anywhere in this
//!   contract; the subscription continues to operate until process exit.
//! - A failed open is surfaced as [`SourceError::Unavailable`] and may be
//!   retried by a later `subscribe` call; a failure never poisons the
//!   attribute.
//!
//! ## Example
//! ```
//! use async_trait::async_trait;
//! use tokio::sync::mpsc;
//! use attrmux::{AttributeEvent, EventSource, EventStream, SourceError, Value};
//!
//! /// Source that emits one canned event per opened attribute.
//! struct Canned;
//!
//! #[async_trait]
//! impl EventSource for Canned {
//!     async fn open(&self, attribute: &str) -> Result<EventStream, SourceError> {
//!         let (tx, rx) = mpsc::channel(16);
//!         let ev = AttributeEvent::new(attribute, Value::Float(21.5));
//!         tokio::spawn(async move {
//!             let _ = tx.send(ev).await;
//!             // Keeping `tx` alive would model a live source; dropping it
//!             // ends the stream.
//!         });
//!         Ok(rx)
//!     }
//! }
//! ```

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::SourceError;
use crate::events::AttributeEvent;

/// Delivery channel for one underlying subscription.
///
/// The adapter owns the sending half and pushes events from its own delivery
/// task; the registry pumps the receiving half. The channel stands in for
/// the "callback on an adapter-owned thread" shape of push APIs.
pub type EventStream = mpsc::Receiver<AttributeEvent>;

/// # Capability to open one push subscription per attribute.
///
/// Implementations wrap the external event machinery (device servers,
/// telemetry gateways, in-process simulators). See the module docs for the
/// full contract.
#[async_trait]
pub trait EventSource: Send + Sync + 'static {
    /// Opens a push subscription for `attribute`.
    ///
    /// Fails with [`SourceError::Unavailable`] if the attribute cannot be
    /// resolved or the underlying connection is down. On success the returned
    /// stream delivers events until process exit.
    async fn open(&self, attribute: &str) -> Result<EventStream, SourceError>;
}
