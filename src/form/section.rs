//! Section machine: one text entry plus a consent checkbox.

use crate::builder::BuildError;
use crate::container::{DispatchOutcome, StateContainer};
use crate::core::{Snapshot, TransitionTable};
use crate::{event_enum, state_enum, transitions};
use std::fmt;
use std::sync::Arc;

state_enum! {
    pub enum SectionState {
        Incomplete,
        Valid,
        Invalid,
        Complete,
    }
    final: [Complete]
    error: [Invalid]
}

event_enum! {
    pub enum SectionEvent {
        NoInput,
        ValidInput,
        InvalidInput,
        ConsentGiven,
        NoConsent,
    }
}

/// Decides whether a non-empty entry is valid. Supplied by the caller.
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone, Debug, PartialEq)]
pub struct SectionSnapshot {
    pub text: String,
    pub consent: bool,
    pub state: SectionState,
}

impl Default for SectionSnapshot {
    fn default() -> Self {
        Self {
            text: String::new(),
            consent: false,
            state: SectionState::Incomplete,
        }
    }
}

impl Snapshot for SectionSnapshot {
    type Mode = SectionState;

    fn mode(&self) -> &SectionState {
        &self.state
    }

    fn with_mode(&self, state: SectionState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }
}

/// Transition table shared by every section.
pub fn section_table() -> Result<TransitionTable<SectionState, SectionEvent>, BuildError> {
    use SectionEvent::{ConsentGiven, InvalidInput, NoConsent, NoInput, ValidInput};
    use SectionState::{Complete, Incomplete, Invalid, Valid};

    transitions! {
        Incomplete => {
            ValidInput => Valid,
            InvalidInput => Invalid,
        },
        Complete => {
            NoConsent => Valid,
            InvalidInput => Invalid,
            NoInput => Incomplete,
        },
        Valid => {
            InvalidInput => Invalid,
            NoInput => Incomplete,
            ConsentGiven => Complete,
        },
        Invalid => {
            ValidInput => Valid,
            NoInput => Incomplete,
        },
    }
    .build()
}

/// A section container plus the callbacks that turn UI input into events.
///
/// Consent is cleared whenever the section falls back to `Invalid` or
/// `Incomplete`, in the same commit that changes the mode.
#[derive(Clone)]
pub struct SectionMachine {
    container: StateContainer<SectionSnapshot, SectionEvent>,
    validator: Validator,
}

impl SectionMachine {
    /// Section with its own table, starting from the empty snapshot.
    pub fn new(validator: Validator) -> Result<Self, BuildError> {
        Ok(Self::with_table(Arc::new(section_table()?), validator))
    }

    /// Section over a shared table, starting from the empty snapshot.
    pub fn with_table(
        table: Arc<TransitionTable<SectionState, SectionEvent>>,
        validator: Validator,
    ) -> Self {
        Self::with_initial(SectionSnapshot::default(), table, validator)
    }

    pub fn with_initial(
        initial: SectionSnapshot,
        table: Arc<TransitionTable<SectionState, SectionEvent>>,
        validator: Validator,
    ) -> Self {
        let container = StateContainer::builder(initial, table)
            .on_enter(|section: &SectionSnapshot, _from, to, _cause| {
                if matches!(to, SectionState::Invalid | SectionState::Incomplete) {
                    SectionSnapshot {
                        consent: false,
                        ..section.clone()
                    }
                } else {
                    section.clone()
                }
            })
            .build();
        Self {
            container,
            validator,
        }
    }

    /// Event for an entry: empty, valid or invalid.
    pub fn classify(&self, text: &str) -> SectionEvent {
        if text.is_empty() {
            SectionEvent::NoInput
        } else if (self.validator)(text) {
            SectionEvent::ValidInput
        } else {
            SectionEvent::InvalidInput
        }
    }

    /// Store the entry, then dispatch its classification.
    pub fn handle_text_change(&self, text: impl Into<String>) -> DispatchOutcome<SectionState> {
        let text = text.into();
        let event = self.classify(&text);
        self.container.mutate(|s| SectionSnapshot { text, ..s.clone() });
        self.container.dispatch(event)
    }

    /// Store the checkbox value, then dispatch `ConsentGiven` or `NoConsent`.
    pub fn handle_consent_change(&self, checked: bool) -> DispatchOutcome<SectionState> {
        self.container.mutate(|s| SectionSnapshot {
            consent: checked,
            ..s.clone()
        });
        self.container.dispatch(if checked {
            SectionEvent::ConsentGiven
        } else {
            SectionEvent::NoConsent
        })
    }

    /// Back to the initial snapshot.
    pub fn reset(&self) -> bool {
        self.container.reset()
    }

    /// Whether the consent checkbox should accept input.
    pub fn consent_enabled(&self) -> bool {
        matches!(
            self.container.mode(),
            SectionState::Valid | SectionState::Complete
        )
    }

    pub fn snapshot(&self) -> SectionSnapshot {
        self.container.snapshot()
    }

    pub fn container(&self) -> &StateContainer<SectionSnapshot, SectionEvent> {
        &self.container
    }
}

impl fmt::Debug for SectionMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionMachine")
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;

    fn letters_only() -> Validator {
        Arc::new(|text: &str| text.chars().all(|c| c.is_ascii_alphabetic()))
    }

    fn section() -> SectionMachine {
        SectionMachine::new(letters_only()).unwrap()
    }

    #[test]
    fn table_builds_without_duplicates() {
        let table = section_table().unwrap();
        assert_eq!(table.len(), 10);
        assert!(table.transitions().iter().all(|row| !row.is_self_loop()));
    }

    #[test]
    fn classify_maps_text_to_events() {
        let section = section();

        assert_eq!(section.classify(""), SectionEvent::NoInput);
        assert_eq!(section.classify("Alice"), SectionEvent::ValidInput);
        assert_eq!(section.classify("Alice42"), SectionEvent::InvalidInput);
    }

    #[test]
    fn valid_text_then_consent_completes() {
        let section = section();

        section.handle_text_change("Alice");
        assert_eq!(section.snapshot().state, SectionState::Valid);
        assert!(section.consent_enabled());

        section.handle_consent_change(true);
        let snapshot = section.snapshot();
        assert_eq!(snapshot.state, SectionState::Complete);
        assert!(snapshot.consent);
        assert!(snapshot.state.is_final());
    }

    #[test]
    fn withdrawing_consent_returns_to_valid() {
        let section = section();
        section.handle_text_change("Alice");
        section.handle_consent_change(true);

        section.handle_consent_change(false);

        let snapshot = section.snapshot();
        assert_eq!(snapshot.state, SectionState::Valid);
        assert!(!snapshot.consent);
    }

    #[test]
    fn invalid_text_clears_consent() {
        let section = section();
        section.handle_text_change("Alice");
        section.handle_consent_change(true);

        section.handle_text_change("Alice!");

        let snapshot = section.snapshot();
        assert_eq!(snapshot.state, SectionState::Invalid);
        assert_eq!(snapshot.text, "Alice!");
        assert!(!snapshot.consent);
        assert!(!section.consent_enabled());
    }

    #[test]
    fn clearing_text_returns_to_incomplete() {
        let section = section();
        section.handle_text_change("Alice");
        section.handle_consent_change(true);

        section.handle_text_change("");

        let snapshot = section.snapshot();
        assert_eq!(snapshot.state, SectionState::Incomplete);
        assert!(!snapshot.consent);
    }

    #[test]
    fn consent_while_incomplete_is_unhandled() {
        let section = section();

        let outcome = section.handle_consent_change(true);

        assert_eq!(outcome, DispatchOutcome::Unhandled);
        assert_eq!(section.snapshot().state, SectionState::Incomplete);
        assert!(!section.consent_enabled());
    }

    #[test]
    fn retyping_valid_text_is_unhandled_but_stored() {
        let section = section();
        section.handle_text_change("Alice");

        let outcome = section.handle_text_change("Alicia");

        assert_eq!(outcome, DispatchOutcome::Unhandled);
        assert_eq!(section.snapshot().text, "Alicia");
    }

    #[test]
    fn reset_restores_empty_section() {
        let section = section();
        section.handle_text_change("Alice");
        section.handle_consent_change(true);

        assert!(section.reset());
        assert_eq!(section.snapshot(), SectionSnapshot::default());
    }

    #[test]
    fn observers_never_see_invalid_with_consent() {
        use std::sync::atomic::{AtomicBool, Ordering};

        let section = section();
        let stop = Arc::new(AtomicBool::new(false));
        let observer = {
            let container = section.container().clone();
            let stop = Arc::clone(&stop);
            std::thread::spawn(move || {
                let mut violations = 0;
                while !stop.load(Ordering::SeqCst) {
                    let snapshot = container.snapshot();
                    let fell_back = matches!(
                        snapshot.state,
                        SectionState::Invalid | SectionState::Incomplete
                    );
                    if fell_back && snapshot.consent {
                        violations += 1;
                    }
                }
                violations
            })
        };

        for round in 0..2000 {
            section.handle_text_change("Alice");
            section.handle_consent_change(true);
            section.handle_text_change(if round % 2 == 0 { "Alice1" } else { "" });
        }
        stop.store(true, Ordering::SeqCst);

        assert_eq!(observer.join().unwrap(), 0);
    }

    #[test]
    fn sections_share_a_table() {
        let table = Arc::new(section_table().unwrap());
        let first = SectionMachine::with_table(Arc::clone(&table), letters_only());
        let second = SectionMachine::with_table(Arc::clone(&table), letters_only());

        first.handle_text_change("Alice");

        assert_eq!(first.snapshot().state, SectionState::Valid);
        assert_eq!(second.snapshot().state, SectionState::Incomplete);
    }
}
