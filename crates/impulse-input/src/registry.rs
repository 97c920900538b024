use std::cell::Cell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use ahash::AHashMap;
use smallvec::SmallVec;

/// A subscriber callback. Callbacks are compared by pointer identity, so the
/// same `Rc` registered twice is two entries and fires twice.
pub type Callback<P> = Rc<dyn Fn(P)>;

struct Slot<P> {
    callback: Callback<P>,
    active: Cell<bool>,
}

type Slots<P> = SmallVec<[Rc<Slot<P>>; 4]>;

/// Identifies one `register` call. Used to remove exactly that entry even
/// when the same callback has been registered more than once.
pub struct Registration<P>(Rc<Slot<P>>);

impl<P> Registration<P> {
    /// Whether the entry is still present in its registry.
    pub fn is_active(&self) -> bool {
        self.0.active.get()
    }
}

impl<P> Clone for Registration<P> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<P> fmt::Debug for Registration<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Keyed multi-subscriber callback table that never keeps empty entries.
///
/// Dispatch runs over a snapshot of the subscribers taken when it starts, so
/// callbacks may add or remove subscriptions while it is in flight. Entries
/// removed mid-dispatch are skipped; entries added mid-dispatch first fire on
/// the next trigger. A panicking callback aborts the rest of the dispatch.
pub struct SparseEventRegistry<K, P> {
    map: AHashMap<K, Slots<P>>,
}

impl<K, P> Default for SparseEventRegistry<K, P> {
    fn default() -> Self {
        Self { map: AHashMap::new() }
    }
}

impl<K: Eq + Hash, P> SparseEventRegistry<K, P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `callback` to the subscribers of `key`.
    pub fn register(&mut self, key: K, callback: Callback<P>) -> Registration<P> {
        let slot = Rc::new(Slot {
            callback,
            active: Cell::new(true),
        });
        self.map.entry(key).or_default().push(Rc::clone(&slot));
        Registration(slot)
    }

    /// Removes the first entry of `key` holding `callback`.
    /// Returns `false` if there was nothing to remove.
    pub fn remove(&mut self, key: &K, callback: &Callback<P>) -> bool {
        self.remove_where(key, |slot| Rc::ptr_eq(&slot.callback, callback))
    }

    /// Removes the entry created by a specific `register` call.
    pub fn remove_registration(
        &mut self,
        key: &K,
        registration: &Registration<P>,
    ) -> bool {
        self.remove_where(key, |slot| Rc::ptr_eq(slot, &registration.0))
    }

    fn remove_where<F>(&mut self, key: &K, matches: F) -> bool
    where
        F: Fn(&Rc<Slot<P>>) -> bool,
    {
        let Some(slots) = self.map.get_mut(key) else {
            return false;
        };
        let Some(index) = slots.iter().position(matches) else {
            return false;
        };

        let slot = slots.remove(index);
        slot.active.set(false);
        if slots.is_empty() {
            self.map.remove(key);
        }
        true
    }

    /// Takes a snapshot of the subscribers of `key` for a later dispatch.
    pub fn snapshot(&self, key: &K) -> Dispatch<P> {
        Dispatch {
            slots: self.map.get(key).cloned().unwrap_or_default(),
        }
    }

    /// Invokes every subscriber of `key`, in registration order.
    pub fn trigger(&self, key: &K, payload: P)
    where
        P: Clone,
    {
        self.snapshot(key).fire(payload);
    }

    /// Currently registered keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.map.keys()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Number of subscribers registered for `key`.
    pub fn subscribers(&self, key: &K) -> usize {
        self.map.get(key).map_or(0, |slots| slots.len())
    }

    /// Number of keys with at least one subscriber.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Subscribers captured by [`SparseEventRegistry::snapshot`].
pub struct Dispatch<P> {
    slots: Slots<P>,
}

impl<P: Clone> Dispatch<P> {
    /// Runs the captured callbacks, skipping entries removed since the
    /// snapshot was taken. Returns how many callbacks ran.
    pub fn fire(self, payload: P) -> usize {
        let mut fired = 0;
        for slot in &self.slots {
            if !slot.active.get() {
                continue;
            }
            (slot.callback)(payload.clone());
            fired += 1;
        }
        fired
    }
}

impl<P> Dispatch<P> {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<f32>>>, Callback<f32>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let callback: Callback<f32> = Rc::new(move |v| sink.borrow_mut().push(v));
        (log, callback)
    }

    #[test]
    fn trigger_runs_callbacks_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SparseEventRegistry::<&str, f32>::new();
        for id in 0..3 {
            let order = Rc::clone(&order);
            registry.register("jump", Rc::new(move |_| order.borrow_mut().push(id)));
        }

        registry.trigger(&"jump", 1.0);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn same_callback_registered_twice_fires_twice() {
        let (log, callback) = recorder();
        let mut registry = SparseEventRegistry::new();
        registry.register(1u8, Rc::clone(&callback));
        registry.register(1u8, Rc::clone(&callback));

        registry.trigger(&1, 0.5);
        assert_eq!(*log.borrow(), vec![0.5, 0.5]);

        assert!(registry.remove(&1, &callback));
        registry.trigger(&1, 1.0);
        assert_eq!(*log.borrow(), vec![0.5, 0.5, 1.0]);
    }

    #[test]
    fn register_then_remove_leaves_no_empty_entry() {
        let (_log, callback) = recorder();
        let mut registry = SparseEventRegistry::new();
        registry.register("fire", Rc::clone(&callback));
        assert!(registry.keys().any(|k| *k == "fire"));

        assert!(registry.remove(&"fire", &callback));
        assert!(registry.keys().next().is_none());
        assert!(registry.is_empty());
        assert!(!registry.contains_key(&"fire"));
    }

    #[test]
    fn removing_unknown_entry_is_a_noop() {
        let (_log, callback) = recorder();
        let (_other_log, other) = recorder();
        let mut registry = SparseEventRegistry::new();
        assert!(!registry.remove(&"missing", &callback));

        registry.register("fire", Rc::clone(&callback));
        assert!(!registry.remove(&"fire", &other));
        assert_eq!(registry.subscribers(&"fire"), 1);
    }

    #[test]
    fn trigger_without_subscribers_does_nothing() {
        let registry = SparseEventRegistry::<u32, f32>::new();
        registry.trigger(&7, 1.0);
        assert!(registry.snapshot(&7).is_empty());
        assert_eq!(registry.snapshot(&7).fire(1.0), 0);
    }

    #[test]
    fn registration_removes_only_its_own_entry() {
        let (log, callback) = recorder();
        let mut registry = SparseEventRegistry::new();
        let first = registry.register('k', Rc::clone(&callback));
        let second = registry.register('k', Rc::clone(&callback));

        assert!(registry.remove_registration(&'k', &second));
        assert!(!second.is_active());
        assert!(first.is_active());
        assert!(!registry.remove_registration(&'k', &second));

        registry.trigger(&'k', 2.0);
        assert_eq!(*log.borrow(), vec![2.0]);
    }

    #[test]
    fn entry_removed_during_dispatch_is_skipped() {
        let registry = Rc::new(RefCell::new(SparseEventRegistry::<u8, f32>::new()));
        let (log, late) = recorder();

        let victim: Rc<RefCell<Option<Registration<f32>>>> =
            Rc::new(RefCell::new(None));
        let remover = {
            let registry = Rc::clone(&registry);
            let victim = Rc::clone(&victim);
            Rc::new(move |_: f32| {
                if let Some(reg) = victim.borrow_mut().take() {
                    registry.borrow_mut().remove_registration(&0, &reg);
                }
            })
        };

        registry.borrow_mut().register(0, remover);
        let reg = registry.borrow_mut().register(0, late);
        *victim.borrow_mut() = Some(reg);

        let dispatch = registry.borrow().snapshot(&0);
        assert_eq!(dispatch.fire(1.0), 1);
        assert!(log.borrow().is_empty());
        assert_eq!(registry.borrow().subscribers(&0), 1);
    }
}
