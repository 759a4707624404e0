//! Section and form machines built on the engine.
//!
//! A form owns two sections (user info and payment details). Each section
//! moves through `Incomplete`, `Valid`, `Invalid` and `Complete` as text and
//! consent change; the form derives `NotReady` / `ReadyToSubmit` from its
//! sections and runs a delayed submit through `Submitting`.
//!
//! Input validation is supplied from outside as a [`Validator`]; the
//! configuration provides regex-backed defaults.

mod config;
mod error;
mod machine;
mod section;

pub use config::{pattern_validator, FormConfig};
pub use error::{ConfigError, FormError};
pub use machine::{derive_form_event, form_table, FormEvent, FormMachine, FormSnapshot, FormState};
pub use section::{
    section_table, SectionEvent, SectionMachine, SectionSnapshot, SectionState, Validator,
};
