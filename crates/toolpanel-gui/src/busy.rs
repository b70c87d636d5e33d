//! Busy set: which servers have a mutating operation in flight.
//!
//! Membership is owned by `BusyGuard` values. A guard is created
//! synchronously before the operation starts and releases its entry when
//! dropped, so the entry disappears on every exit path: success, error,
//! early return, panic, or the owning future being dropped.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::watch;
use toolpanel_core::DuplicatePolicy;

/// Shared set of server names with an operation in flight.
///
/// Entries are counted so that overlapping operations on the same name
/// (only possible under `DuplicatePolicy::Allow`) keep the name busy until
/// the last one finishes. Cloning is cheap and shares the same set.
#[derive(Debug, Clone)]
pub struct BusySet {
    entries: Arc<watch::Sender<BTreeMap<String, usize>>>,
}

impl BusySet {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BTreeMap::new());
        Self {
            entries: Arc::new(tx),
        }
    }

    /// Mark `name` busy according to `policy`.
    ///
    /// Returns `None` under `DuplicatePolicy::Skip` if `name` is already
    /// busy. The check and the insert happen under one lock.
    pub fn try_acquire(&self, name: &str, policy: DuplicatePolicy) -> Option<BusyGuard> {
        let mut acquired = false;
        self.entries.send_if_modified(|entries| {
            match entries.get_mut(name) {
                Some(_) if policy == DuplicatePolicy::Skip => return false,
                Some(count) => *count += 1,
                None => {
                    entries.insert(name.to_string(), 1);
                }
            }
            acquired = true;
            true
        });

        acquired.then(|| BusyGuard {
            set: self.clone(),
            name: name.to_string(),
        })
    }

    fn release(&self, name: &str) {
        self.entries.send_if_modified(|entries| {
            let Some(count) = entries.get_mut(name) else {
                return false;
            };
            *count -= 1;
            if *count == 0 {
                entries.remove(name);
            }
            true
        });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    /// Names currently busy, sorted.
    pub fn names(&self) -> BTreeSet<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Subscribe to membership changes.
    ///
    /// The value maps each busy name to its number of in-flight operations.
    pub fn subscribe(&self) -> watch::Receiver<BTreeMap<String, usize>> {
        self.entries.subscribe()
    }
}

impl Default for BusySet {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped ownership of one busy entry.
#[derive(Debug)]
#[must_use = "dropping the guard immediately clears the busy flag"]
pub struct BusyGuard {
    set: BusySet,
    name: String,
}

impl BusyGuard {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.set.release(&self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let busy = BusySet::new();
        {
            let guard = busy.try_acquire("fs", DuplicatePolicy::Skip).unwrap();
            assert_eq!(guard.name(), "fs");
            assert!(busy.contains("fs"));
        }
        assert!(busy.is_empty());
    }

    #[test]
    fn test_skip_policy_rejects_second_acquire() {
        let busy = BusySet::new();
        let _first = busy.try_acquire("fs", DuplicatePolicy::Skip).unwrap();
        assert!(busy.try_acquire("fs", DuplicatePolicy::Skip).is_none());
        assert!(busy.try_acquire("web", DuplicatePolicy::Skip).is_some());
    }

    #[test]
    fn test_allow_policy_counts_overlapping_entries() {
        let busy = BusySet::new();
        let first = busy.try_acquire("fs", DuplicatePolicy::Allow).unwrap();
        let second = busy.try_acquire("fs", DuplicatePolicy::Allow).unwrap();
        assert_eq!(busy.len(), 1);

        drop(first);
        assert!(busy.contains("fs"), "still busy while second op runs");

        drop(second);
        assert!(busy.is_empty());
    }

    #[test]
    fn test_guard_releases_during_unwind() {
        let busy = BusySet::new();
        let cloned = busy.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = cloned.try_acquire("fs", DuplicatePolicy::Skip).unwrap();
            panic!("operation blew up");
        }));
        assert!(result.is_err());
        assert!(busy.is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_see_membership_changes() {
        let busy = BusySet::new();
        let mut rx = busy.subscribe();

        let guard = busy.try_acquire("fs", DuplicatePolicy::Skip).unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().contains_key("fs"));

        drop(guard);
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn test_names_are_sorted() {
        let busy = BusySet::new();
        let _b = busy.try_acquire("web", DuplicatePolicy::Skip).unwrap();
        let _a = busy.try_acquire("fs", DuplicatePolicy::Skip).unwrap();
        let names: Vec<_> = busy.names().into_iter().collect();
        assert_eq!(names, ["fs", "web"]);
    }
}
