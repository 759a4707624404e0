//! Observable collections of child containers.

use crate::container::StateContainer;
use crate::core::{Event, Snapshot};
use parking_lot::ReentrantMutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Generation counter of a [`ChildSet`] plus the gate that orders
/// replacements against derived dispatches.
///
/// A replacement advances the generation under the gate; a binding checks
/// its generation and dispatches under the same gate. The gate is
/// reentrant so a parent hook may replace the set it is bound to.
#[derive(Debug)]
pub(crate) struct Epoch {
    generation: AtomicU64,
    gate: ReentrantMutex<()>,
}

impl Epoch {
    fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            gate: ReentrantMutex::new(()),
        }
    }

    pub(crate) fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn advance<R>(&self, publish: impl FnOnce(u64) -> R) -> R {
        let _gate = self.gate.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        publish(generation)
    }

    /// Run `read` with no replacement in flight.
    pub(crate) fn settled<R>(&self, read: impl FnOnce(u64) -> R) -> R {
        let _gate = self.gate.lock();
        read(self.current())
    }

    /// Run `dispatch` only while the generation is still `bound`.
    ///
    /// A concurrent replacement waits until `dispatch` has returned.
    pub(crate) fn run_if_current<R>(&self, bound: u64, dispatch: impl FnOnce() -> R) -> Option<R> {
        let _gate = self.gate.lock();
        (self.current() == bound).then(dispatch)
    }
}

/// A replaceable collection of child containers.
///
/// Every [`replace`](Self::replace) bumps a generation counter and publishes
/// the new collection as one step. Bindings capture the generation they
/// were built against and dispatch only while it is current, so nothing
/// derived from a replaced collection reaches a parent once `replace` has
/// returned, whichever thread the binding runs on.
///
/// `ChildSet` is a handle; clones share the same collection.
pub struct ChildSet<C: Snapshot, E: Event> {
    sender: Arc<watch::Sender<Vec<StateContainer<C, E>>>>,
    epoch: Arc<Epoch>,
}

impl<C: Snapshot, E: Event> ChildSet<C, E> {
    pub fn new(children: Vec<StateContainer<C, E>>) -> Self {
        let (sender, _) = watch::channel(children);
        Self {
            sender: Arc::new(sender),
            epoch: Arc::new(Epoch::new()),
        }
    }

    /// Swap in a new collection.
    ///
    /// Waits for any derived dispatch in progress. Bindings over this set
    /// stop reacting to the previous members before this call returns and
    /// resubscribe to exactly `children`.
    pub fn replace(&self, children: Vec<StateContainer<C, E>>) {
        self.epoch.advance(|generation| {
            debug!(members = children.len(), generation, "child set replaced");
            self.sender.send_replace(children);
        });
    }

    /// Handles to the current members.
    pub fn current(&self) -> Vec<StateContainer<C, E>> {
        self.sender.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.sender.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.borrow().is_empty()
    }

    /// Number of replacements so far.
    pub fn generation(&self) -> u64 {
        self.epoch.current()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Vec<StateContainer<C, E>>> {
        self.sender.subscribe()
    }

    pub(crate) fn epoch(&self) -> Arc<Epoch> {
        Arc::clone(&self.epoch)
    }
}

impl<C: Snapshot, E: Event> Clone for ChildSet<C, E> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
            epoch: Arc::clone(&self.epoch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransitionTable;

    crate::state_enum! {
        enum Lamp {
            Off,
            On,
        }
    }

    crate::event_enum! {
        enum Switch {
            Flip,
        }
    }

    #[derive(Clone, PartialEq, Debug)]
    struct LampSnapshot {
        mode: Lamp,
    }

    impl Snapshot for LampSnapshot {
        type Mode = Lamp;

        fn mode(&self) -> &Lamp {
            &self.mode
        }

        fn with_mode(&self, mode: Lamp) -> Self {
            Self { mode }
        }
    }

    fn lamp() -> StateContainer<LampSnapshot, Switch> {
        let table = TransitionTable::builder()
            .declare(Lamp::Off, Switch::Flip, Lamp::On)
            .declare(Lamp::On, Switch::Flip, Lamp::Off)
            .build()
            .unwrap();
        StateContainer::new(LampSnapshot { mode: Lamp::Off }, table)
    }

    #[test]
    fn replace_bumps_generation_and_publishes() {
        let first = lamp();
        let set = ChildSet::new(vec![first.clone()]);
        let mut rx = set.subscribe();
        assert_eq!(set.generation(), 0);

        set.replace(vec![lamp(), lamp()]);

        assert_eq!(set.generation(), 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 2);
        assert!(!set.current()[0].same_container(&first));
    }

    #[test]
    fn dispatch_gate_follows_the_generation() {
        let set = ChildSet::new(vec![lamp()]);
        let epoch = set.epoch();

        assert_eq!(epoch.run_if_current(0, || "ran"), Some("ran"));
        set.replace(Vec::new());
        assert_eq!(epoch.run_if_current(0, || "ran"), None);
        assert_eq!(epoch.settled(|generation| generation), 1);
    }

    #[test]
    fn replace_may_run_inside_a_gated_dispatch() {
        let set = ChildSet::new(vec![lamp()]);
        let epoch = set.epoch();

        let ran = epoch.run_if_current(0, || set.replace(vec![lamp(), lamp()]));

        assert!(ran.is_some());
        assert_eq!(set.generation(), 1);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn clones_share_the_collection() {
        let set = ChildSet::new(Vec::new());
        let other = set.clone();
        assert!(set.is_empty());

        other.replace(vec![lamp()]);

        assert_eq!(set.len(), 1);
        assert_eq!(set.generation(), 1);
    }
}
