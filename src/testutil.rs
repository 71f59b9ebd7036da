//! Test doubles shared by the unit tests: a scriptable event source, a
//! recording observer and a panicking observer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::error::SourceError;
use crate::events::AttributeEvent;
use crate::observers::Observe;
use crate::source::{EventSource, EventStream};

/// Scriptable [`EventSource`]: records open attempts, can fail the next N
/// opens, can delay opens to widen race windows, and exposes the push side
/// of every opened stream.
pub(crate) struct FakeSource {
    opens: AtomicUsize,
    fail_remaining: AtomicUsize,
    open_delay: Option<Duration>,
    senders: Mutex<HashMap<String, mpsc::Sender<AttributeEvent>>>,
}

impl FakeSource {
    pub(crate) fn new() -> Self {
        Self {
            opens: AtomicUsize::new(0),
            fail_remaining: AtomicUsize::new(0),
            open_delay: None,
            senders: Mutex::new(HashMap::new()),
        }
    }

    /// Delays every open, so concurrent first calls overlap reliably.
    pub(crate) fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    /// Makes the next `n` open attempts fail with `Unavailable`.
    pub(crate) fn fail_next_opens(self, n: usize) -> Self {
        self.fail_remaining.store(n, Ordering::SeqCst);
        self
    }

    /// Number of open attempts seen so far (failed attempts included).
    pub(crate) fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Pushes one event into the stream opened for `attribute`.
    pub(crate) fn push(&self, attribute: &str, event: AttributeEvent) {
        let senders = self.senders.lock();
        let tx = senders
            .get(attribute)
            .unwrap_or_else(|| panic!("no open stream for {attribute}"));
        tx.try_send(event).expect("stream buffer full");
    }

    /// Ends the stream for `attribute`, as if the source went away.
    pub(crate) fn close(&self, attribute: &str) {
        self.senders.lock().remove(attribute);
    }
}

#[async_trait]
impl EventSource for FakeSource {
    async fn open(&self, attribute: &str) -> Result<EventStream, SourceError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.open_delay {
            tokio::time::sleep(delay).await;
        }

        let should_fail = self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(SourceError::Unavailable {
                attribute: attribute.to_string(),
                reason: "scripted failure".to_string(),
            });
        }

        let (tx, rx) = mpsc::channel(32);
        self.senders.lock().insert(attribute.to_string(), tx);
        Ok(rx)
    }
}

/// Observer that records every delivered event.
pub(crate) struct Recorder {
    seen: Mutex<Vec<AttributeEvent>>,
}

impl Recorder {
    pub(crate) fn arc() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Snapshot of everything delivered so far.
    pub(crate) fn events(&self) -> Vec<AttributeEvent> {
        self.seen.lock().clone()
    }

    /// Polls until at least `n` events were delivered, then returns them.
    /// Panics after `timeout` so a stuck test fails with a clear message.
    pub(crate) async fn wait_len(&self, n: usize, timeout: Duration) -> Vec<AttributeEvent> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.seen.lock().len() >= n {
                return self.events();
            }
            if tokio::time::Instant::now() >= deadline {
                panic!("timed out waiting for {n} events, have {}", self.seen.lock().len());
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }
}

#[async_trait]
impl Observe for Recorder {
    async fn notify(&self, event: &AttributeEvent) {
        self.seen.lock().push(event.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

/// Observer that panics on every delivery.
pub(crate) struct Panicker;

impl Panicker {
    pub(crate) fn arc() -> Arc<dyn Observe> {
        Arc::new(Self)
    }
}

#[async_trait]
impl Observe for Panicker {
    async fn notify(&self, _event: &AttributeEvent) {
        panic!("intentional test panic");
    }

    fn name(&self) -> &'static str {
        "panicker"
    }
}
