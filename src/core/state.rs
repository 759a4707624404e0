//! The `State` trait implemented by every machine's mode alphabet.
//!
//! A mode is one tag from a small, closed, named set. Modes are compared by
//! tag and carry no payload of their own; everything else lives in the
//! surrounding [`Snapshot`](super::Snapshot).

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for machine states (modes).
///
/// All methods are pure. Implement it by hand or generate it with
/// [`state_enum!`](crate::state_enum).
///
/// # Example
///
/// ```rust
/// use modeflow::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum SectionState {
///     Incomplete,
///     Valid,
///     Invalid,
///     Complete,
/// }
///
/// impl State for SectionState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Incomplete => "Incomplete",
///             Self::Valid => "Valid",
///             Self::Invalid => "Invalid",
///             Self::Complete => "Complete",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Complete)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Invalid)
///     }
/// }
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Name of the state for display and logging.
    fn name(&self) -> &str;

    /// Whether this state is a completion point of the machine.
    ///
    /// Informational only; the transition table decides what can leave it.
    fn is_final(&self) -> bool {
        false
    }

    /// Whether this state represents a failure condition.
    fn is_error(&self) -> bool {
        false
    }
}
