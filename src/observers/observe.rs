//! # Core observer capability
//!
//! `Observe` is the extension point for receiving attribute events. Anything
//! that wants deliveries registers an implementation through
//! [`SubscriptionManager::subscribe`](crate::SubscriptionManager::subscribe);
//! domain watchers and the legacy [`EventQueue`](crate::EventQueue) share
//! this exact registration path.
//!
//! ## Contract
//! - `notify` runs on the attribute's pump task, **sequentially** with the
//!   other observers of the same attribute. A slow observer delays the rest
//!   of the snapshot and the next event for that attribute (but never other
//!   attributes).
//! - Identity matters: registration and removal are keyed by the `Arc`
//!   allocation, not by value. Registering the same `Arc` twice is a no-op;
//!   removing it removes exactly that instance.
//! - A panic inside `notify` is caught, reported on the bus, and does not
//!   affect the remaining observers nor unregister the panicking one.
//! - Reentrancy is allowed: `notify` may itself call `subscribe` or
//!   `unsubscribe` (delivery runs outside all registry locks).
//!
//! ## Example (skeleton)
//! ```rust
//! // use attrmux::{AttributeEvent, Observe};
//! //
//! // struct CompletionWatcher;
//! // #[async_trait::async_trait]
//! // impl Observe for CompletionWatcher {
//! //     async fn notify(&self, event: &AttributeEvent) {
//! //         // inspect event.value, wake a waiter...
//! //     }
//! //     fn name(&self) -> &'static str { "completion_watcher" }
//! // }
//! ```

use async_trait::async_trait;

use crate::events::AttributeEvent;

/// Contract for attribute observers.
///
/// Called from the attribute's pump task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Observe: Send + Sync + 'static {
    /// Handle a single delivered event.
    ///
    /// # Parameters
    /// - `event`: Reference to the event (does not transfer ownership)
    async fn notify(&self, event: &AttributeEvent);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
