//! # Handle to one underlying, long-lived subscription.
//!
//! A [`SubscriptionHandle`] exists for each attribute that has ever been
//! subscribed through the registry. It is created once, on first use, and is
//! owned by the registry for the rest of the process lifetime.
//!
//! ## Rules
//! - **Never closed**: there is no teardown path. Dropping the handle does
//!   not abort the pump task; the absence of a `Drop` impl is deliberate and
//!   matches the documented "continues to operate until process exit"
//!   behavior of the underlying system.
//! - **Exclusively owned**: the registry holds the only handle per attribute;
//!   observers come and go without touching it.

use std::sync::Arc;
use std::time::SystemTime;

use tokio::task::JoinHandle;

/// One underlying subscription: the attribute key plus the pump task that
/// forwards source events into the registry's fan-out.
#[derive(Debug)]
pub struct SubscriptionHandle {
    attribute: Arc<str>,
    opened_at: SystemTime,
    pump: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub(crate) fn new(attribute: Arc<str>, pump: JoinHandle<()>) -> Self {
        Self {
            attribute,
            opened_at: SystemTime::now(),
            pump,
        }
    }

    /// The attribute this subscription was opened for.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// When the underlying subscription was opened.
    pub fn opened_at(&self) -> SystemTime {
        self.opened_at
    }

    /// Whether the pump task is still forwarding events.
    ///
    /// Turns `false` only when the source stream ends (the source side went
    /// away); the handle itself stays registered either way.
    pub fn is_active(&self) -> bool {
        !self.pump.is_finished()
    }
}
