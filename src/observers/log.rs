//! # Simple log writer for proxy observability events.
//!
//! [`LogWriter`] drains the [`Bus`](crate::Bus) from a spawned task and emits
//! one `tracing` record per event. This is primarily useful for development,
//! debugging, and examples; production deployments usually hang their own
//! consumer off [`SubscriptionManager::events`](crate::SubscriptionManager::events).
//!
//! ## Example
//! ```rust,ignore
//! let manager = SubscriptionManager::new(source, Config::default());
//! let _log = LogWriter::spawn(manager.bus());
//! // Every subscription open, observer change, panic and queue drop is
//! // now visible in the tracing output.
//! ```

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::events::{Bus, ProxyEvent, ProxyEventKind};

/// Spawned consumer that logs every proxy event.
///
/// Not intended for production use: implement a custom bus consumer for
/// structured metrics or alerting.
pub struct LogWriter;

impl LogWriter {
    /// Subscribes to the bus and logs events until the bus is dropped.
    pub fn spawn(bus: &Bus) -> JoinHandle<()> {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => Self::write(&ev),
                    Err(RecvError::Closed) => break,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "log writer lagged behind the bus");
                    }
                }
            }
        })
    }

    fn write(ev: &ProxyEvent) {
        let attribute = ev.attribute.as_deref().unwrap_or("-");
        match ev.kind {
            ProxyEventKind::SubscriptionOpened => {
                tracing::info!(seq = ev.seq, attribute, "subscription opened");
            }
            ProxyEventKind::SubscriptionOpenFailed => {
                tracing::warn!(
                    seq = ev.seq,
                    attribute,
                    reason = ev.reason.as_deref().unwrap_or("-"),
                    "subscription open failed"
                );
            }
            ProxyEventKind::SourceClosed => {
                tracing::warn!(seq = ev.seq, attribute, "source stream ended");
            }
            ProxyEventKind::ObserverAdded => {
                tracing::info!(
                    seq = ev.seq,
                    attribute,
                    observer = ev.observer.as_deref().unwrap_or("-"),
                    "observer added"
                );
            }
            ProxyEventKind::ObserverRemoved => {
                tracing::info!(
                    seq = ev.seq,
                    attribute,
                    observer = ev.observer.as_deref().unwrap_or("-"),
                    "observer removed"
                );
            }
            ProxyEventKind::ObserverPanicked => {
                tracing::warn!(
                    seq = ev.seq,
                    attribute,
                    observer = ev.observer.as_deref().unwrap_or("-"),
                    panic = ev.reason.as_deref().unwrap_or("-"),
                    "observer panicked"
                );
            }
            ProxyEventKind::QueueDropped => {
                tracing::warn!(
                    seq = ev.seq,
                    attribute,
                    queue = ev.observer.as_deref().unwrap_or("-"),
                    "queue evicted oldest event"
                );
            }
        }
    }
}
