//! Build errors for transition tables.

use thiserror::Error;

/// Errors that can occur when building a transition table.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("No transitions declared. Declare at least one transition before .build()")]
    NoTransitions,

    #[error(
        "Duplicate transition from '{from}' on '{event}': already declared to '{first}', redeclared to '{second}'"
    )]
    DuplicateTransition {
        from: String,
        event: String,
        first: String,
        second: String,
    },
}
