//! Transition history tracking.
//!
//! Containers built with `with_history` keep a bounded, immutable log of the
//! transitions they accepted. The log is a diagnostic aid; it is never used
//! to rebuild a container.

use super::event::Event;
use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of one accepted transition.
///
/// # Example
///
/// ```rust
/// use modeflow::core::TransitionRecord;
/// use modeflow::{event_enum, state_enum};
/// use chrono::Utc;
///
/// state_enum! {
///     enum Light { Red, Green }
/// }
/// event_enum! {
///     enum Signal { Go }
/// }
///
/// let record = TransitionRecord {
///     from: Light::Red,
///     to: Light::Green,
///     cause: Signal::Go,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.cause, Signal::Go);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State, E: Event> {
    /// Mode before the transition
    pub from: S,
    /// Mode after the transition
    pub to: S,
    /// Event that triggered the transition
    pub cause: E,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered, optionally bounded history of accepted transitions.
///
/// `record` returns a new history and leaves the receiver untouched. When a
/// capacity is set, the oldest records are evicted first.
///
/// # Example
///
/// ```rust
/// use modeflow::core::{StateHistory, TransitionRecord};
/// use modeflow::{event_enum, state_enum};
/// use chrono::Utc;
///
/// state_enum! {
///     enum Step { A, B, C }
/// }
/// event_enum! {
///     enum Next { Advance }
/// }
///
/// let history = StateHistory::new()
///     .record(TransitionRecord {
///         from: Step::A,
///         to: Step::B,
///         cause: Next::Advance,
///         timestamp: Utc::now(),
///     })
///     .record(TransitionRecord {
///         from: Step::B,
///         to: Step::C,
///         cause: Next::Advance,
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(history.path(), vec![&Step::A, &Step::B, &Step::C]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State, E: Event> {
    records: Vec<TransitionRecord<S, E>>,
    capacity: Option<usize>,
}

impl<S: State, E: Event> Default for StateHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> StateHistory<S, E> {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            capacity: None,
        }
    }

    /// Create an empty history keeping at most `capacity` records.
    ///
    /// A capacity of zero records nothing.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            records: Vec::new(),
            capacity: Some(capacity),
        }
    }

    /// Record a transition, returning a new history.
    pub fn record(&self, record: TransitionRecord<S, E>) -> Self {
        let mut records = self.records.clone();
        records.push(record);
        if let Some(capacity) = self.capacity {
            let excess = records.len().saturating_sub(capacity);
            records.drain(..excess);
        }
        Self {
            records,
            capacity: self.capacity,
        }
    }

    /// States traversed, oldest first: the source of the first retained
    /// record followed by the target of every record.
    pub fn path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Time between the first and last retained records.
    ///
    /// `None` when the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// All retained records in commit order.
    pub fn records(&self) -> &[TransitionRecord<S, E>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}
