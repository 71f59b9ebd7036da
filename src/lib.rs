//! # attrmux
//!
//! **attrmux** is an event-subscription proxy for attribute-oriented
//! push-event sources (remote control and telemetry systems).
//!
//! It decouples client-visible subscription lifecycles from the underlying
//! source's subscription lifecycle: one long-lived source subscription per
//! attribute, created lazily and never torn down, multiplexed across any
//! number of registered observers. A legacy single-consumer blocking-poll
//! contract is emulated on top of the same fan-out through [`EventQueue`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   watcher    │   │   watcher    │   │  EventQueue  │
//!     │ (client obs) │   │ (client obs) │   │(legacy reads)│
//!     └──────▲───────┘   └──────▲───────┘   └──────▲───────┘
//!            │ notify()         │ notify()         │ notify()
//! ┌──────────┴──────────────────┴──────────────────┴─────────────────┐
//! │  SubscriptionManager (facade)                                    │
//! │  └─ Registry                                                     │
//! │     - slots:  attribute → OnceCell<SubscriptionHandle>           │
//! │     - fanout: attribute → { observers }                          │
//! │     - Bus (observability events)                                 │
//! └──────┬─────────────────────┬────────────────────┬────────────────┘
//!        │ pump task           │ pump task          │ pump task
//!        ▼                     ▼                    ▼
//! ┌──────────────┐      ┌──────────────┐     ┌──────────────┐
//! │ EventStream  │      │ EventStream  │     │ EventStream  │
//! │ (attr "A")   │      │ (attr "B")   │     │ (attr "C")   │
//! └──────▲───────┘      └──────▲───────┘     └──────▲───────┘
//!        └─────────────────────┴────────────────────┘
//!                     EventSource adapter
//!               (external control/telemetry system)
//! ```
//!
//! ### Lifecycle
//! ```text
//! subscribe(attr, obs)
//!   ├─► slots[attr] exists? ── yes ──► add obs to fanout[attr], done
//!   └─► no ──► EventSource::open(attr)
//!            ├─ Ok(stream) ──► spawn pump, fill slot, add obs
//!            └─ Err ────────► surface SourceError to caller
//!                             (slot stays empty, later calls may retry)
//!
//! event arrives on stream
//!   └─► dispatch(attr, &event)
//!         ├─► snapshot fanout[attr] (lock released before delivery)
//!         └─► notify each observer sequentially
//!               └─ panic? caught, reported, rest still delivered
//!
//! unsubscribe(attr, obs)
//!   └─► remove obs from fanout[attr]; the handle is NEVER closed
//! ```
//!
//! ## Features
//! | Area              | Description                                                         | Key types / traits                  |
//! |-------------------|---------------------------------------------------------------------|-------------------------------------|
//! | **Observer API**  | Register for per-attribute push delivery.                           | [`Observe`], [`SubscriptionManager`]|
//! | **Source seam**   | Adapt any push-event system behind one capability.                  | [`EventSource`], [`EventStream`]    |
//! | **Legacy bridge** | Blocking single-consumer reads over the same fan-out.               | [`EventQueue`], [`ReadError`]       |
//! | **Observability** | Subscription/observer lifecycle and failure reports.                | [`ProxyEvent`], [`Bus`]             |
//! | **Errors**        | Typed errors for the source boundary and queue reads.               | [`SourceError`], [`ReadError`]      |
//! | **Configuration** | Bus capacity and legacy queue bound.                                | [`Config`]                          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use async_trait::async_trait;
//! use tokio::sync::mpsc;
//! use attrmux::{
//!     AttributeEvent, Config, EventSource, EventStream, Observe, SourceError,
//!     SubscriptionManager, Value,
//! };
//!
//! /// Source that emits one reading for every opened attribute.
//! struct Demo;
//!
//! #[async_trait]
//! impl EventSource for Demo {
//!     async fn open(&self, attribute: &str) -> Result<EventStream, SourceError> {
//!         let (tx, rx) = mpsc::channel(8);
//!         let ev = AttributeEvent::new(attribute, Value::Float(21.5));
//!         tokio::spawn(async move {
//!             let _ = tx.send(ev).await;
//!         });
//!         Ok(rx)
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = SubscriptionManager::new(Arc::new(Demo), Config::default());
//!
//!     // Bridge a legacy poll-style consumer onto the fan-out:
//!     let queue = manager.queue();
//!     manager.subscribe("sys/tg_test/1/ampli", queue.clone()).await?;
//!
//!     let event = queue.read_event(Some(Duration::from_secs(1))).await?;
//!     assert_eq!(event.value, Value::Float(21.5));
//!
//!     // Unregistering never touches the underlying subscription.
//!     manager.unsubscribe("sys/tg_test/1/ampli", &(queue as Arc<dyn Observe>));
//!     assert!(manager.is_subscribed("sys/tg_test/1/ampli"));
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod observers;
mod source;

#[cfg(test)]
mod testutil;

// ---- Public re-exports ----

pub use config::Config;
pub use core::SubscriptionManager;
pub use error::{ReadError, SourceError};
pub use events::{AttributeEvent, Bus, ProxyEvent, ProxyEventKind, Quality, Value};
pub use observers::{EventQueue, Observe};
pub use source::{EventSource, EventStream, SubscriptionHandle};

// Optional: expose a simple built-in bus logger (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
