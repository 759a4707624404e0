//! Derived events from a collection of child containers.

use crate::compose::children::{ChildSet, Epoch};
use crate::container::StateContainer;
use crate::core::{Event, Snapshot};
use futures::FutureExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::{StreamExt, StreamMap};
use tracing::{debug, trace, warn};

/// Live subscription of a parent container to a [`ChildSet`].
///
/// Dropping the binding stops it.
#[derive(Debug)]
pub struct Binding {
    handle: JoinHandle<()>,
    epoch: Arc<Epoch>,
}

impl Binding {
    /// Generation of the child collection the binding follows.
    pub fn generation(&self) -> u64 {
        self.epoch.current()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop reacting to the children.
    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Derive events for `parent` from the live snapshots of `children`.
///
/// Whenever a member of the current collection commits, `combine` runs over
/// the latest snapshot of every member and its event is dispatched into
/// `parent`. Commits that are already pending when the binding wakes up are
/// folded into a single combination. The first combination is produced once
/// every member has reported; an empty collection produces none.
///
/// Replacing the collection drops every member subscription and subscribes
/// to the new members only. A combination computed from the old members is
/// discarded, even when the binding runs on another worker thread. `parent`
/// dispatches happen while the set's replacement gate is held, so hooks of
/// `parent` must not wait on another thread that replaces this set.
///
/// Must be called from within a tokio runtime.
///
/// # Example
///
/// ```rust
/// use modeflow::compose::{bind_many, ChildSet};
/// use modeflow::container::StateContainer;
/// use modeflow::core::{Snapshot, TransitionTable};
/// use modeflow::{event_enum, state_enum};
///
/// state_enum! {
///     enum Task { Open, Done }
/// }
/// event_enum! {
///     enum TaskEvent { Finish }
/// }
/// state_enum! {
///     enum Board { Busy, Clear }
/// }
/// event_enum! {
///     enum BoardEvent { AllDone, SomeOpen }
/// }
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct TaskSnapshot { mode: Task }
/// impl Snapshot for TaskSnapshot {
///     type Mode = Task;
///     fn mode(&self) -> &Task { &self.mode }
///     fn with_mode(&self, mode: Task) -> Self { Self { mode } }
/// }
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct BoardSnapshot { mode: Board }
/// impl Snapshot for BoardSnapshot {
///     type Mode = Board;
///     fn mode(&self) -> &Board { &self.mode }
///     fn with_mode(&self, mode: Board) -> Self { Self { mode } }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// let task_table = std::sync::Arc::new(
///     TransitionTable::builder()
///         .declare(Task::Open, TaskEvent::Finish, Task::Done)
///         .build()
///         .unwrap(),
/// );
/// let board_table = TransitionTable::builder()
///     .declare(Board::Busy, BoardEvent::AllDone, Board::Clear)
///     .declare(Board::Clear, BoardEvent::SomeOpen, Board::Busy)
///     .build()
///     .unwrap();
///
/// let task = StateContainer::new(TaskSnapshot { mode: Task::Open }, task_table.clone());
/// let board = StateContainer::new(BoardSnapshot { mode: Board::Busy }, board_table);
/// let children = ChildSet::new(vec![task.clone()]);
///
/// let _binding = bind_many(
///     &children,
///     |tasks: &[TaskSnapshot]| {
///         if tasks.iter().all(|t| t.mode == Task::Done) {
///             BoardEvent::AllDone
///         } else {
///             BoardEvent::SomeOpen
///         }
///     },
///     board.clone(),
/// );
///
/// task.dispatch(TaskEvent::Finish);
/// let mut rx = board.observe();
/// rx.wait_for(|b| b.mode == Board::Clear).await.unwrap();
/// # });
/// ```
pub fn bind_many<C, CE, P, PE, F>(
    children: &ChildSet<C, CE>,
    combine: F,
    parent: StateContainer<P, PE>,
) -> Binding
where
    C: Snapshot,
    CE: Event,
    P: Snapshot,
    PE: Event,
    F: Fn(&[C]) -> PE + Send + 'static,
{
    let epoch = children.epoch();
    let handle = tokio::spawn(follow_children(
        children.subscribe(),
        Arc::clone(&epoch),
        combine,
        parent,
    ));
    Binding { handle, epoch }
}

async fn follow_children<C, CE, P, PE, F>(
    mut members_rx: watch::Receiver<Vec<StateContainer<C, CE>>>,
    epoch: Arc<Epoch>,
    combine: F,
    parent: StateContainer<P, PE>,
) where
    C: Snapshot,
    CE: Event,
    P: Snapshot,
    PE: Event,
    F: Fn(&[C]) -> PE,
{
    let mut set_open = true;

    loop {
        let (bound, members) =
            epoch.settled(|generation| (generation, members_rx.borrow_and_update().clone()));
        debug!(members = members.len(), generation = bound, "binding children");

        let mut streams = StreamMap::new();
        for (index, member) in members.iter().enumerate() {
            streams.insert(index, member.stream());
        }
        let mut latest: Vec<Option<C>> = vec![None; members.len()];

        loop {
            tokio::select! {
                biased;

                changed = members_rx.changed(), if set_open => {
                    if changed.is_ok() {
                        break;
                    }
                    // The set handle is gone; keep following the last members.
                    set_open = false;
                }

                Some((index, snapshot)) = streams.next(), if !streams.is_empty() => {
                    latest[index] = Some(snapshot);
                    while let Some(Some((index, snapshot))) = streams.next().now_or_never() {
                        latest[index] = Some(snapshot);
                    }

                    let Some(snapshots) = latest.iter().cloned().collect::<Option<Vec<C>>>() else {
                        continue;
                    };
                    let event = combine(&snapshots);
                    if !dispatch_if_current(&epoch, bound, &parent, event) {
                        trace!(generation = bound, "dropping combination from replaced children");
                        break;
                    }
                }

                else => {
                    warn!(generation = bound, "child set closed and no bound child is left");
                    return;
                }
            }
        }
    }
}

fn dispatch_if_current<P: Snapshot, PE: Event>(
    epoch: &Epoch,
    bound: u64,
    parent: &StateContainer<P, PE>,
    event: PE,
) -> bool {
    epoch
        .run_if_current(bound, || {
            trace!(event = event.name(), "dispatching derived event");
            parent.dispatch(event);
        })
        .is_some()
}
