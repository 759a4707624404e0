//! Form machine derived from its sections.

use crate::builder::BuildError;
use crate::compose::{bind_many, Binding, ChildSet};
use crate::container::{DispatchOutcome, StateContainer};
use crate::core::{Snapshot, TransitionTable};
use crate::form::config::FormConfig;
use crate::form::error::FormError;
use crate::form::section::{
    section_table, SectionEvent, SectionMachine, SectionSnapshot, SectionState,
};
use crate::{event_enum, state_enum, transitions};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

state_enum! {
    pub enum FormState {
        NotReady,
        ReadyToSubmit,
        Submitting,
    }
}

event_enum! {
    pub enum FormEvent {
        AllSectionsCompleted,
        HasUncompletedSections,
        SubmitInitiated,
        Submitted,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormSnapshot {
    pub signature: String,
    pub state: FormState,
}

impl Default for FormSnapshot {
    fn default() -> Self {
        Self {
            signature: String::new(),
            state: FormState::NotReady,
        }
    }
}

impl Snapshot for FormSnapshot {
    type Mode = FormState;

    fn mode(&self) -> &FormState {
        &self.state
    }

    fn with_mode(&self, state: FormState) -> Self {
        Self {
            state,
            ..self.clone()
        }
    }
}

pub fn form_table() -> Result<TransitionTable<FormState, FormEvent>, BuildError> {
    use FormEvent::{AllSectionsCompleted, HasUncompletedSections, SubmitInitiated, Submitted};
    use FormState::{NotReady, ReadyToSubmit, Submitting};

    transitions! {
        NotReady => {
            AllSectionsCompleted => ReadyToSubmit,
        },
        ReadyToSubmit => {
            SubmitInitiated => Submitting,
            HasUncompletedSections => NotReady,
        },
        Submitting => {
            Submitted => NotReady,
        },
    }
    .build()
}

/// `AllSectionsCompleted` when every section is complete.
pub fn derive_form_event(sections: &[SectionSnapshot]) -> FormEvent {
    if sections
        .iter()
        .all(|section| section.state == SectionState::Complete)
    {
        FormEvent::AllSectionsCompleted
    } else {
        FormEvent::HasUncompletedSections
    }
}

/// Form over a user-info section and a payment-details section.
///
/// The form mode follows its sections through a binding; a completed submit
/// (`Submitting -> NotReady`) resets every section. Dropping the form stops
/// the binding and any submit still waiting for its delay.
pub struct FormMachine {
    container: StateContainer<FormSnapshot, FormEvent>,
    user_info: SectionMachine,
    payment_details: SectionMachine,
    sections: ChildSet<SectionSnapshot, SectionEvent>,
    submit_delay: Duration,
    runtime: Handle,
    pending_submit: Mutex<Option<AbortHandle>>,
    binding: Binding,
}

impl FormMachine {
    /// Build the form from configuration.
    ///
    /// Fails with [`FormError::NoRuntime`] outside a tokio runtime.
    pub fn new(config: &FormConfig) -> Result<Self, FormError> {
        let table = Arc::new(section_table()?);
        let user_info =
            SectionMachine::with_table(Arc::clone(&table), config.user_info_validator()?);
        let payment_details =
            SectionMachine::with_table(table, config.payment_details_validator()?);
        Self::with_sections(
            FormSnapshot::default(),
            user_info,
            payment_details,
            config.submit_delay(),
        )
    }

    /// Build the form over existing sections.
    ///
    /// Fails with [`FormError::NoRuntime`] outside a tokio runtime.
    pub fn with_sections(
        initial: FormSnapshot,
        user_info: SectionMachine,
        payment_details: SectionMachine,
        submit_delay: Duration,
    ) -> Result<Self, FormError> {
        let runtime = Handle::try_current()?;
        let sections = ChildSet::new(vec![
            user_info.container().clone(),
            payment_details.container().clone(),
        ]);

        let to_reset = sections.clone();
        let container = StateContainer::builder(initial, form_table()?)
            .on_transition(move |_, from, to, _| {
                if *from == FormState::Submitting && *to == FormState::NotReady {
                    debug!(sections = to_reset.len(), "form submitted, resetting sections");
                    for section in to_reset.current() {
                        section.reset();
                    }
                }
            })
            .build();

        let binding = bind_many(&sections, derive_form_event, container.clone());

        Ok(Self {
            container,
            user_info,
            payment_details,
            sections,
            submit_delay,
            runtime,
            pending_submit: Mutex::new(None),
            binding,
        })
    }

    /// Start a submit and schedule `Submitted` after the configured delay.
    ///
    /// Returns the pending follow-up, or `None` when the form was not ready.
    pub fn submit(&self) -> Option<JoinHandle<DispatchOutcome<FormState>>> {
        match self.container.dispatch(FormEvent::SubmitInitiated) {
            DispatchOutcome::Transitioned { .. } => {
                let follow_up = self.container.dispatch_after_on(
                    &self.runtime,
                    FormEvent::Submitted,
                    self.submit_delay,
                );
                *self.pending_submit.lock() = Some(follow_up.abort_handle());
                Some(follow_up)
            }
            DispatchOutcome::SelfLoop | DispatchOutcome::Unhandled => None,
        }
    }

    /// Whether the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        self.container.mode() == FormState::ReadyToSubmit
    }

    /// Whether section input should be blocked.
    pub fn is_submitting(&self) -> bool {
        self.container.mode() == FormState::Submitting
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.container.snapshot()
    }

    pub fn container(&self) -> &StateContainer<FormSnapshot, FormEvent> {
        &self.container
    }

    pub fn user_info(&self) -> &SectionMachine {
        &self.user_info
    }

    pub fn payment_details(&self) -> &SectionMachine {
        &self.payment_details
    }

    pub fn sections(&self) -> &ChildSet<SectionSnapshot, SectionEvent> {
        &self.sections
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }
}

impl Drop for FormMachine {
    fn drop(&mut self) {
        if let Some(pending) = self.pending_submit.get_mut().take() {
            pending.abort();
        }
    }
}
