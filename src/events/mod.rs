//! Proxy events: domain payloads and the observability bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to observability events emitted by the registry, the
//! per-attribute pump tasks and the legacy queues.
//!
//! ## Contents
//! - [`AttributeEvent`], [`Value`], [`Quality`] the domain event passed
//!   through to observers
//! - [`ProxyEvent`], [`ProxyEventKind`] proxy-internal observability events
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Registry` (subscription lifecycle, observer lifecycle,
//!   panic isolation), pump tasks (source stream closed), `EventQueue`
//!   (bounded-queue drops).
//! - **Consumers**: `LogWriter` (feature `logging`), anything handed a
//!   receiver via [`SubscriptionManager::events`](crate::SubscriptionManager::events).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{AttributeEvent, ProxyEvent, ProxyEventKind, Quality, Value};
