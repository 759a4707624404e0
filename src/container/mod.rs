//! Reactive state containers.
//!
//! A [`StateContainer`] owns one [`Snapshot`](crate::core::Snapshot), publishes
//! it through a `tokio::sync::watch` channel and evolves its mode only through
//! the container's [`TransitionTable`](crate::core::TransitionTable).
//!
//! # Commands
//!
//! - `mutate`: domain changes; cannot touch the mode
//! - `dispatch`: at most one transition per event
//! - `dispatch_after`: the same, after a delay on the tokio runtime
//! - `reset`: restore the construction-time snapshot
//!
//! # Dispatch rules
//!
//! 1. No edge for `(mode, event)`: nothing happens.
//! 2. Edge back to the current mode: nothing happens, the hook does not run.
//! 3. Otherwise the new mode is committed together with the entry edit, if
//!    any, then the hook runs once with `(from, to, event)` before
//!    `dispatch` returns.

mod outcome;
mod store;

pub use outcome::DispatchOutcome;
pub use store::{ContainerBuilder, EntryEdit, StateContainer, TransitionHook};
