//! # Global proxy configuration.
//!
//! [`Config`] defines the behavior of a [`SubscriptionManager`](crate::SubscriptionManager):
//! the capacity of the internal event bus and the optional bound applied to
//! legacy queues created through the manager.
//!
//! # Example
//! ```
//! use attrmux::Config;
//!
//! let mut cfg = Config::default();
//! cfg.bus_capacity = 256;
//! cfg.queue_bound = Some(1024);
//!
//! assert_eq!(cfg.queue_bound, Some(1024));
//! ```

/// Global configuration for the subscription proxy.
///
/// Controls the observability bus capacity and the default bound for legacy
/// queues built via [`SubscriptionManager::queue`](crate::SubscriptionManager::queue).
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the proxy event bus channel (clamped to at least 1).
    pub bus_capacity: usize,
    /// Bound for legacy queues created by the manager.
    ///
    /// `None` keeps queues unbounded, matching the historical contract where
    /// a single low-volume consumer drained every buffered event. `Some(n)`
    /// caps each queue at `n` entries; on overflow the oldest entry is
    /// evicted and the drop is reported on the bus.
    pub queue_bound: Option<usize>,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `bus_capacity = 1024`
    /// - `queue_bound = None` (unbounded)
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            queue_bound: None,
        }
    }
}
