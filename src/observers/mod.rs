//! # Observers: the delivery side of the proxy.
//!
//! This module provides the [`Observe`] trait and the built-in
//! implementations that plug into the registry's fan-out.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   pump task ── dispatch(&event) ──► snapshot of fanout set
//!                                          │
//!                                     ┌────┴─────┬───────────┐
//!                                     ▼          ▼           ▼
//!                                  watcher   EventQueue   custom ...
//!                                 (domain)   (legacy       (anything
//!                                             poll loop)    impl Observe)
//! ```
//!
//! ## Observer types
//! - **Domain watchers** react to deliveries directly (e.g. a script
//!   completion watcher resolving a future when a state attribute changes).
//! - **[`EventQueue`]** buffers deliveries for legacy blocking-poll readers.
//!
//! ## Implementing custom observers
//! ```no_run
//! use attrmux::{AttributeEvent, Observe};
//! use async_trait::async_trait;
//!
//! struct MetricsObserver;
//!
//! #[async_trait]
//! impl Observe for MetricsObserver {
//!     async fn notify(&self, event: &AttributeEvent) {
//!         // increment a counter keyed by event.attribute
//!         let _ = event;
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod observe;
mod queue;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observe::Observe;
pub use queue::EventQueue;
