//! Modeflow: declarative state machines bound to reactive state containers
//!
//! Modeflow keeps a pure core and a thin reactive shell:
//!
//! - **Core**: `State`/`Event` alphabets, immutable [`TransitionTable`]s that
//!   reject duplicate edges at build time, and snapshot types that expose one
//!   designated mode field.
//! - **Containers**: a [`StateContainer`] owns one snapshot, publishes it
//!   through a watch channel and moves its mode only through the table, at
//!   most once per event.
//! - **Composition**: [`bind_many`] derives events for a parent container
//!   from the live snapshots of a replaceable set of children.
//!
//! # Example
//!
//! ```rust
//! use modeflow::{event_enum, state_enum, transitions};
//! use modeflow::{DispatchOutcome, Snapshot, StateContainer};
//!
//! state_enum! {
//!     enum Light {
//!         Red,
//!         Green,
//!     }
//! }
//!
//! event_enum! {
//!     enum Signal {
//!         Go,
//!         Stop,
//!     }
//! }
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Crossing {
//!     waiting: u32,
//!     light: Light,
//! }
//!
//! impl Snapshot for Crossing {
//!     type Mode = Light;
//!
//!     fn mode(&self) -> &Light {
//!         &self.light
//!     }
//!
//!     fn with_mode(&self, light: Light) -> Self {
//!         Self { light, ..self.clone() }
//!     }
//! }
//!
//! let table = transitions! {
//!     Light::Red => { Signal::Go => Light::Green },
//!     Light::Green => { Signal::Stop => Light::Red },
//! }
//! .build()
//! .unwrap();
//!
//! let crossing = StateContainer::new(Crossing { waiting: 3, light: Light::Red }, table);
//!
//! assert!(crossing.dispatch(Signal::Go).is_transition());
//! assert_eq!(crossing.dispatch(Signal::Go), DispatchOutcome::Unhandled);
//! assert_eq!(crossing.snapshot().light, Light::Green);
//! ```

pub mod builder;
pub mod compose;
pub mod container;
pub mod core;
pub mod form;

// Re-export commonly used types
pub use builder::{BuildError, TableBuilder};
pub use compose::{bind_many, Binding, ChildSet};
pub use container::{DispatchOutcome, StateContainer};
pub use crate::core::{Event, Snapshot, State, StateHistory, TransitionRecord, TransitionTable};
