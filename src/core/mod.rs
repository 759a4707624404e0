//! Core machine types.
//!
//! This module contains the pure part of the engine:
//! - States and events via the `State` and `Event` traits
//! - Snapshots coupling a mode to arbitrary application state
//! - Immutable transition tables
//! - Transition history
//!
//! Nothing in this module performs I/O or touches a runtime.

mod event;
mod history;
mod snapshot;
mod state;
mod table;

pub use event::Event;
pub use history::{StateHistory, TransitionRecord};
pub use snapshot::Snapshot;
pub use state::State;
pub use table::{Transition, TransitionTable};
