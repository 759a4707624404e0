//! Errors raised while setting up the form machines.

use crate::builder::BuildError;
use thiserror::Error;

/// Errors loading a [`FormConfig`](crate::form::FormConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Form configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Pattern '{field}' does not compile: {source}")]
    InvalidPattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
}

/// Errors constructing a [`FormMachine`](crate::form::FormMachine).
#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Table(#[from] BuildError),

    #[error("Form machines need a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
