//! Builder for transition tables.

use crate::builder::error::BuildError;
use crate::core::{Event, State, Transition, TransitionTable};

/// Fluent builder for [`TransitionTable`].
///
/// Every `(state, event)` pair may be declared once. A second declaration
/// for the same pair is remembered and reported by [`build`](Self::build),
/// even when it names the same target.
pub struct TableBuilder<S: State, E: Event> {
    rows: Vec<Transition<S, E>>,
    error: Option<BuildError>,
}

impl<S: State, E: Event> TableBuilder<S, E> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            error: None,
        }
    }

    /// Declare `from --event--> to`.
    pub fn declare(mut self, from: S, event: E, to: S) -> Self {
        if self.error.is_some() {
            return self;
        }

        if let Some(existing) = self.rows.iter().find(|row| row.matches(&from, &event)) {
            self.error = Some(BuildError::DuplicateTransition {
                from: from.name().to_string(),
                event: event.name().to_string(),
                first: existing.to.name().to_string(),
                second: to.name().to_string(),
            });
            return self;
        }

        self.rows.push(Transition { from, on: event, to });
        self
    }

    /// Declare every `(event, to)` edge leaving `from`.
    pub fn from<I>(self, from: S, edges: I) -> Self
    where
        I: IntoIterator<Item = (E, S)>,
    {
        edges.into_iter().fold(self, |builder, (event, to)| {
            builder.declare(from.clone(), event, to)
        })
    }

    /// Freeze the table.
    /// Returns the first duplicate declaration, or an error if nothing was declared.
    pub fn build(self) -> Result<TransitionTable<S, E>, BuildError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        if self.rows.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        Ok(TransitionTable::from_rows(self.rows))
    }
}

impl<S: State, E: Event> Default for TableBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
