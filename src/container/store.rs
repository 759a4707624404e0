//! Reactive state container.

use crate::container::outcome::DispatchOutcome;
use crate::core::{Event, Snapshot, State, StateHistory, TransitionRecord, TransitionTable};
use chrono::Utc;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, trace};

/// Side effect keyed to an accepted transition.
///
/// Receives the container that transitioned and `(from, to, cause)`. The
/// new snapshot is already visible to observers when the hook runs, and
/// the hook finishes before `dispatch` returns. Edits to the container's
/// own snapshot belong in an [`EntryEdit`], which commits together with the
/// mode; a hook is for effects on other containers.
pub type TransitionHook<C, E> = Arc<
    dyn Fn(&StateContainer<C, E>, &<C as Snapshot>::Mode, &<C as Snapshot>::Mode, &E)
        + Send
        + Sync,
>;

/// Snapshot edit applied in the same commit as an accepted transition.
///
/// Receives the snapshot already carrying the new mode, plus
/// `(from, to, cause)`, and returns the snapshot to commit. The mode of the
/// result is forced back to `to`. Runs while the commit lock is held, so it
/// must not call back into the container.
pub type EntryEdit<C, E> = Arc<
    dyn Fn(&C, &<C as Snapshot>::Mode, &<C as Snapshot>::Mode, &E) -> C + Send + Sync,
>;

struct Inner<C: Snapshot, E: Event> {
    table: Arc<TransitionTable<C::Mode, E>>,
    sender: watch::Sender<C>,
    initial: C,
    entry_edit: Option<EntryEdit<C, E>>,
    hook: Option<TransitionHook<C, E>>,
    history: Option<Mutex<StateHistory<C::Mode, E>>>,
}

/// Owns one snapshot and evolves its mode through a transition table.
///
/// `StateContainer` is a cheap handle: clones address the same container.
/// Commits are serialized through the underlying watch channel, so the
/// read-lookup-commit step of [`dispatch`](Self::dispatch) is atomic with
/// respect to any other commit on this container.
///
/// # Example
///
/// ```rust
/// use modeflow::container::{DispatchOutcome, StateContainer};
/// use modeflow::core::{Snapshot, TransitionTable};
/// use modeflow::{event_enum, state_enum};
///
/// state_enum! {
///     enum Door { Open, Closed }
/// }
/// event_enum! {
///     enum Push { Open, Close }
/// }
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct DoorSnapshot {
///     opened: u32,
///     mode: Door,
/// }
///
/// impl Snapshot for DoorSnapshot {
///     type Mode = Door;
///     fn mode(&self) -> &Door {
///         &self.mode
///     }
///     fn with_mode(&self, mode: Door) -> Self {
///         Self { mode, ..self.clone() }
///     }
/// }
///
/// let table = TransitionTable::builder()
///     .declare(Door::Closed, Push::Open, Door::Open)
///     .declare(Door::Open, Push::Close, Door::Closed)
///     .build()
///     .unwrap();
///
/// let door = StateContainer::builder(DoorSnapshot { opened: 0, mode: Door::Closed }, table)
///     .on_enter(|door, _from, to, _cause| {
///         if *to == Door::Open {
///             DoorSnapshot { opened: door.opened + 1, ..door.clone() }
///         } else {
///             door.clone()
///         }
///     })
///     .build();
///
/// assert!(door.dispatch(Push::Open).is_transition());
/// assert_eq!(door.dispatch(Push::Open), DispatchOutcome::Unhandled);
/// assert_eq!(door.snapshot().opened, 1);
/// ```
pub struct StateContainer<C: Snapshot, E: Event> {
    inner: Arc<Inner<C, E>>,
}

impl<C: Snapshot, E: Event> StateContainer<C, E> {
    /// Create a container with no hook and no history.
    pub fn new(initial: C, table: impl Into<Arc<TransitionTable<C::Mode, E>>>) -> Self {
        Self::builder(initial, table).build()
    }

    /// Start configuring a container.
    pub fn builder(
        initial: C,
        table: impl Into<Arc<TransitionTable<C::Mode, E>>>,
    ) -> ContainerBuilder<C, E> {
        ContainerBuilder {
            initial,
            table: table.into(),
            entry_edit: None,
            hook: None,
            history_capacity: None,
        }
    }

    /// Subscribe to the snapshot.
    ///
    /// The receiver sees the current snapshot immediately through `borrow`
    /// and is notified of every later commit. Missed intermediate commits
    /// are conflated into the latest one.
    pub fn observe(&self) -> watch::Receiver<C> {
        self.inner.sender.subscribe()
    }

    /// Subscribe to the snapshot as a stream.
    ///
    /// Yields the current snapshot first, then every later commit. The
    /// stream ends only when every handle to the container is dropped.
    pub fn stream(&self) -> WatchStream<C> {
        WatchStream::new(self.observe())
    }

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> C {
        self.inner.sender.borrow().clone()
    }

    /// Clone of the current mode.
    pub fn mode(&self) -> C::Mode {
        self.inner.sender.borrow().mode().clone()
    }

    /// The snapshot this container was created with.
    pub fn initial(&self) -> &C {
        &self.inner.initial
    }

    pub fn table(&self) -> &Arc<TransitionTable<C::Mode, E>> {
        &self.inner.table
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }

    /// Copy of the transition history, if the container records one.
    pub fn history(&self) -> Option<StateHistory<C::Mode, E>> {
        self.inner.history.as_ref().map(|history| history.lock().clone())
    }

    /// Apply a domain mutation to the snapshot.
    ///
    /// The mode of the result is forced back to the current mode, so a
    /// mutation can never move the machine. Observers are notified only when
    /// the committed snapshot differs from the previous one. Returns whether
    /// anything changed.
    ///
    /// `update` runs while the commit lock is held and must not call back
    /// into this container.
    pub fn mutate<F>(&self, update: F) -> bool
    where
        F: FnOnce(&C) -> C,
    {
        let changed = self.inner.sender.send_if_modified(|snapshot| {
            let next = update(snapshot).with_mode(snapshot.mode().clone());
            if next == *snapshot {
                return false;
            }
            *snapshot = next;
            true
        });
        trace!(changed, "snapshot mutated");
        changed
    }

    /// Feed an event to the machine.
    ///
    /// Looks up `(mode, event)`; an absent edge or an edge back to the
    /// current mode changes nothing. Otherwise commits the new mode together
    /// with the entry edit, records history, then runs the hook once with
    /// `(from, to, event)`.
    pub fn dispatch(&self, event: E) -> DispatchOutcome<C::Mode> {
        let mut outcome = DispatchOutcome::Unhandled;
        self.inner.sender.send_if_modified(|snapshot| {
            let from = snapshot.mode().clone();
            match self.inner.table.lookup(&from, &event) {
                None => false,
                Some(to) if *to == from => {
                    outcome = DispatchOutcome::SelfLoop;
                    false
                }
                Some(to) => {
                    let entered = snapshot.with_mode(to.clone());
                    *snapshot = match &self.inner.entry_edit {
                        Some(edit) => edit(&entered, &from, to, &event).with_mode(to.clone()),
                        None => entered,
                    };
                    outcome = DispatchOutcome::Transitioned {
                        from,
                        to: to.clone(),
                    };
                    true
                }
            }
        });

        match &outcome {
            DispatchOutcome::Transitioned { from, to } => {
                debug!(
                    from = from.name(),
                    to = to.name(),
                    event = event.name(),
                    "transition accepted"
                );
                if let Some(history) = &self.inner.history {
                    let mut history = history.lock();
                    *history = history.record(TransitionRecord {
                        from: from.clone(),
                        to: to.clone(),
                        cause: event.clone(),
                        timestamp: Utc::now(),
                    });
                }
                if let Some(hook) = &self.inner.hook {
                    hook(self, from, to, &event);
                }
            }
            DispatchOutcome::SelfLoop => {
                trace!(event = event.name(), "self-loop ignored");
            }
            DispatchOutcome::Unhandled => {
                trace!(event = event.name(), "no transition for event");
            }
        }

        outcome
    }

    /// Dispatch `event` after `delay` on the current tokio runtime.
    ///
    /// The follow-up goes through [`dispatch`](Self::dispatch) like any
    /// other event, so it is serialized with every other commit.
    ///
    /// Panics outside a tokio runtime; see
    /// [`dispatch_after_on`](Self::dispatch_after_on).
    pub fn dispatch_after(&self, event: E, delay: Duration) -> JoinHandle<DispatchOutcome<C::Mode>> {
        self.dispatch_after_on(&Handle::current(), event, delay)
    }

    /// Dispatch `event` after `delay` on `runtime`.
    pub fn dispatch_after_on(
        &self,
        runtime: &Handle,
        event: E,
        delay: Duration,
    ) -> JoinHandle<DispatchOutcome<C::Mode>> {
        let container = self.clone();
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            container.dispatch(event)
        })
    }

    /// Restore the snapshot the container was created with, mode included.
    ///
    /// This is not a transition: the hook does not run and nothing is
    /// recorded. Returns whether anything changed.
    pub fn reset(&self) -> bool {
        let initial = &self.inner.initial;
        let changed = self.inner.sender.send_if_modified(|snapshot| {
            if snapshot == initial {
                return false;
            }
            *snapshot = initial.clone();
            true
        });
        if changed {
            debug!(mode = initial.mode().name(), "container reset");
        }
        changed
    }

    /// Whether two handles address the same container.
    pub fn same_container(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<C: Snapshot, E: Event> Clone for StateContainer<C, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Snapshot, E: Event> fmt::Debug for StateContainer<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateContainer")
            .field("snapshot", &*self.inner.sender.borrow())
            .field("transitions", &self.inner.table.len())
            .field("entry_edit", &self.inner.entry_edit.is_some())
            .field("hook", &self.inner.hook.is_some())
            .finish()
    }
}

/// Builder for [`StateContainer`].
pub struct ContainerBuilder<C: Snapshot, E: Event> {
    initial: C,
    table: Arc<TransitionTable<C::Mode, E>>,
    entry_edit: Option<EntryEdit<C, E>>,
    hook: Option<TransitionHook<C, E>>,
    history_capacity: Option<usize>,
}

impl<C: Snapshot, E: Event> ContainerBuilder<C, E> {
    /// Edit the snapshot as part of every accepted transition.
    ///
    /// Observers never see the new mode without the edit.
    pub fn on_enter<F>(mut self, edit: F) -> Self
    where
        F: Fn(&C, &C::Mode, &C::Mode, &E) -> C + Send + Sync + 'static,
    {
        self.entry_edit = Some(Arc::new(edit));
        self
    }

    /// Run `hook` after every accepted transition.
    pub fn on_transition<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StateContainer<C, E>, &C::Mode, &C::Mode, &E) + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Keep the last `capacity` accepted transitions.
    pub fn with_history(mut self, capacity: usize) -> Self {
        self.history_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> StateContainer<C, E> {
        let (sender, _) = watch::channel(self.initial.clone());
        StateContainer {
            inner: Arc::new(Inner {
                table: self.table,
                sender,
                initial: self.initial,
                entry_edit: self.entry_edit,
                hook: self.hook,
                history: self
                    .history_capacity
                    .map(|capacity| Mutex::new(StateHistory::bounded(capacity))),
            }),
        }
    }
}
