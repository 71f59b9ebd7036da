//! # Per-attribute observer set with identity semantics.
//!
//! [`FanoutSet`] holds the observers currently registered for one attribute.
//! Membership is keyed by `Arc` identity: clones of the same `Arc` are the
//! same member, two separately-allocated observers of the same type are not.
//!
//! ## Rules
//! - **Idempotent insert**: adding an already-present identity is a no-op.
//! - **Exact removal**: remove takes out the registered identity only, never
//!   a logical equivalent.
//! - **Snapshot iteration**: delivery works on an O(n) clone of the member
//!   list, taken under the table lock and iterated outside it. Within one
//!   snapshot the order is the insertion order.

use std::sync::Arc;

use crate::observers::Observe;

/// Compares two observer handles by allocation identity.
///
/// Only the data pointer is compared; vtable pointers are ignored, so the
/// check is stable across codegen units.
fn same_observer(a: &Arc<dyn Observe>, b: &Arc<dyn Observe>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Insertion-ordered set of observers for one attribute.
#[derive(Default)]
pub(crate) struct FanoutSet {
    observers: Vec<Arc<dyn Observe>>,
}

impl FanoutSet {
    /// Adds an observer. Returns `false` when the identity is already
    /// present (set semantics).
    pub(crate) fn insert(&mut self, observer: Arc<dyn Observe>) -> bool {
        if self.observers.iter().any(|o| same_observer(o, &observer)) {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Removes the observer with the given identity. Returns `false` when it
    /// was not registered.
    pub(crate) fn remove(&mut self, observer: &Arc<dyn Observe>) -> bool {
        match self.observers.iter().position(|o| same_observer(o, observer)) {
            Some(idx) => {
                self.observers.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Clones the current member list for lock-free iteration.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn Observe>> {
        self.observers.clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::AttributeEvent;
    use async_trait::async_trait;

    struct Nop;

    #[async_trait]
    impl Observe for Nop {
        async fn notify(&self, _event: &AttributeEvent) {}
    }

    fn nop() -> Arc<dyn Observe> {
        Arc::new(Nop)
    }

    #[test]
    fn test_insert_is_idempotent_per_identity() {
        let mut set = FanoutSet::default();
        let a = nop();

        assert!(set.insert(Arc::clone(&a)));
        assert!(!set.insert(Arc::clone(&a)), "same identity must be a no-op");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_distinct_allocations_are_distinct_members() {
        let mut set = FanoutSet::default();
        assert!(set.insert(nop()));
        assert!(set.insert(nop()), "different allocation, different member");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_takes_exact_identity() {
        let mut set = FanoutSet::default();
        let a = nop();
        let b = nop();
        set.insert(Arc::clone(&a));
        set.insert(Arc::clone(&b));

        assert!(set.remove(&a));
        assert_eq!(set.len(), 1);
        assert!(!set.remove(&a), "already removed");
        assert!(set.remove(&b));
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_snapshot_is_isolated_from_mutation() {
        let mut set = FanoutSet::default();
        let a = nop();
        set.insert(Arc::clone(&a));

        let snap = set.snapshot();
        set.remove(&a);

        assert_eq!(snap.len(), 1, "snapshot must not observe later removal");
        assert_eq!(set.len(), 0);
    }
}
