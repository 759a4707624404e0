//! Immutable transition tables.
//!
//! A table is a partial function `(State, Event) -> State` stored as plain
//! rows. Tables are built once through [`TableBuilder`](crate::builder::TableBuilder),
//! which rejects duplicate `(state, event)` pairs, and are then shared by
//! `Arc` across any number of containers of the same shape.

use super::event::Event;
use super::state::State;
use crate::builder::TableBuilder;
use serde::{Deserialize, Serialize};

/// One declared edge of a machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Transition<S: State, E: Event> {
    pub from: S,
    pub on: E,
    pub to: S,
}

impl<S: State, E: Event> Transition<S, E> {
    /// Whether this row answers `(from, event)`.
    pub fn matches(&self, from: &S, event: &E) -> bool {
        self.from == *from && self.on == *event
    }

    /// Whether source and target are the same state.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Deterministic transition table.
///
/// At most one row exists per `(state, event)` pair; the builder guarantees
/// this at construction time, so lookup order never matters.
///
/// # Example
///
/// ```rust
/// use modeflow::core::TransitionTable;
/// use modeflow::{event_enum, state_enum};
///
/// state_enum! {
///     enum Door { Open, Closed }
/// }
/// event_enum! {
///     enum Push { Open, Close }
/// }
///
/// let table = TransitionTable::builder()
///     .declare(Door::Closed, Push::Open, Door::Open)
///     .declare(Door::Open, Push::Close, Door::Closed)
///     .build()
///     .unwrap();
///
/// assert_eq!(table.lookup(&Door::Closed, &Push::Open), Some(&Door::Open));
/// assert_eq!(table.lookup(&Door::Closed, &Push::Close), None);
/// ```
#[derive(Clone, Debug)]
pub struct TransitionTable<S: State, E: Event> {
    rows: Vec<Transition<S, E>>,
}

impl<S: State, E: Event> TransitionTable<S, E> {
    /// Start declaring a new table.
    pub fn builder() -> TableBuilder<S, E> {
        TableBuilder::new()
    }

    /// Rows must already be free of duplicate `(from, on)` pairs.
    pub(crate) fn from_rows(rows: Vec<Transition<S, E>>) -> Self {
        Self { rows }
    }

    /// Declared target for `(from, event)`, or `None` when undeclared.
    pub fn lookup(&self, from: &S, event: &E) -> Option<&S> {
        self.rows
            .iter()
            .find(|row| row.matches(from, event))
            .map(|row| &row.to)
    }

    /// Events with a declared edge leaving `from`, in declaration order.
    pub fn events_from<'a>(&'a self, from: &'a S) -> impl Iterator<Item = &'a E> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.from == *from)
            .map(|row| &row.on)
    }

    /// All rows in declaration order.
    pub fn transitions(&self) -> &[Transition<S, E>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::state_enum! {
        enum FormState {
            NotReady,
            ReadyToSubmit,
            Submitting,
        }
    }

    crate::event_enum! {
        enum FormEvent {
            AllSectionsCompleted,
            HasUncompletedSections,
            SubmitInitiated,
            Submitted,
        }
    }

    fn form_table() -> TransitionTable<FormState, FormEvent> {
        TransitionTable::builder()
            .declare(
                FormState::NotReady,
                FormEvent::AllSectionsCompleted,
                FormState::ReadyToSubmit,
            )
            .from(
                FormState::ReadyToSubmit,
                [
                    (FormEvent::SubmitInitiated, FormState::Submitting),
                    (FormEvent::HasUncompletedSections, FormState::NotReady),
                ],
            )
            .declare(
                FormState::Submitting,
                FormEvent::Submitted,
                FormState::NotReady,
            )
            .build()
            .unwrap()
    }

    #[test]
    fn lookup_returns_declared_target() {
        let table = form_table();

        assert_eq!(
            table.lookup(&FormState::ReadyToSubmit, &FormEvent::SubmitInitiated),
            Some(&FormState::Submitting)
        );
        assert_eq!(
            table.lookup(&FormState::Submitting, &FormEvent::Submitted),
            Some(&FormState::NotReady)
        );
    }

    #[test]
    fn lookup_returns_none_for_undeclared_pair() {
        let table = form_table();

        assert_eq!(
            table.lookup(&FormState::NotReady, &FormEvent::SubmitInitiated),
            None
        );
        assert_eq!(
            table.lookup(&FormState::Submitting, &FormEvent::AllSectionsCompleted),
            None
        );
    }

    #[test]
    fn events_from_lists_outgoing_edges() {
        let table = form_table();

        let events: Vec<_> = table.events_from(&FormState::ReadyToSubmit).collect();

        assert_eq!(
            events,
            vec![
                &FormEvent::SubmitInitiated,
                &FormEvent::HasUncompletedSections
            ]
        );
    }

    #[test]
    fn table_reports_size() {
        let table = form_table();
        assert_eq!(table.len(), 4);
        assert!(!table.is_empty());
        assert!(table.transitions().iter().all(|row| !row.is_self_loop()));
    }
}
