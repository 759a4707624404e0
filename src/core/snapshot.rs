//! Snapshots: immutable application state with one designated mode field.

use super::state::State;
use std::fmt::Debug;

/// An immutable record owned by a [`StateContainer`](crate::container::StateContainer).
///
/// The record exposes exactly one mode field through [`mode`](Snapshot::mode)
/// and [`with_mode`](Snapshot::with_mode). The container is the only writer of
/// that field: domain mutations go through `StateContainer::mutate`, which
/// restores the mode after the mutation function runs.
///
/// `PartialEq` is used to conflate commits: a commit equal to the current
/// snapshot is not announced to observers.
///
/// # Example
///
/// ```rust
/// use modeflow::core::Snapshot;
/// use modeflow::state_enum;
///
/// state_enum! {
///     pub enum Door {
///         Open,
///         Closed,
///     }
/// }
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct DoorSnapshot {
///     label: String,
///     mode: Door,
/// }
///
/// impl Snapshot for DoorSnapshot {
///     type Mode = Door;
///
///     fn mode(&self) -> &Door {
///         &self.mode
///     }
///
///     fn with_mode(&self, mode: Door) -> Self {
///         Self { mode, ..self.clone() }
///     }
/// }
///
/// let closed = DoorSnapshot { label: "front".into(), mode: Door::Closed };
/// let open = closed.with_mode(Door::Open);
/// assert_eq!(open.label, "front");
/// assert_eq!(open.mode(), &Door::Open);
/// ```
pub trait Snapshot: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// The mode alphabet driven by the transition table.
    type Mode: State;

    /// Current value of the mode field.
    fn mode(&self) -> &Self::Mode;

    /// Copy of this snapshot with only the mode field replaced.
    fn with_mode(&self, mode: Self::Mode) -> Self;
}
