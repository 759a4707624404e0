//! Builder API for transition tables.
//!
//! This module provides the fluent [`TableBuilder`] and the `state_enum!`,
//! `event_enum!` and `transitions!` macros for declaring machines with
//! minimal boilerplate. Determinism is checked when the table is built.

pub mod error;
pub mod macros;
pub mod table;

pub use error::BuildError;
pub use table::TableBuilder;
