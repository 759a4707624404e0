//! The `Event` trait implemented by every machine's input alphabet.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for machine events.
///
/// Events are drawn from a closed set disjoint from the machine's states.
/// Generate implementations with [`event_enum!`](crate::event_enum).
///
/// # Example
///
/// ```rust
/// use modeflow::core::Event;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum FormEvent {
///     AllSectionsCompleted,
///     HasUncompletedSections,
/// }
///
/// impl Event for FormEvent {
///     fn name(&self) -> &str {
///         match self {
///             Self::AllSectionsCompleted => "AllSectionsCompleted",
///             Self::HasUncompletedSections => "HasUncompletedSections",
///         }
///     }
/// }
///
/// assert_eq!(FormEvent::AllSectionsCompleted.name(), "AllSectionsCompleted");
/// ```
pub trait Event:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Name of the event for display and logging.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestEvent {
        NoInput,
        ValidInput,
    }

    impl Event for TestEvent {
        fn name(&self) -> &str {
            match self {
                Self::NoInput => "NoInput",
                Self::ValidInput => "ValidInput",
            }
        }
    }

    #[test]
    fn event_name_returns_correct_value() {
        assert_eq!(TestEvent::NoInput.name(), "NoInput");
        assert_eq!(TestEvent::ValidInput.name(), "ValidInput");
    }

    #[test]
    fn events_compare_by_tag() {
        assert_eq!(TestEvent::NoInput, TestEvent::NoInput.clone());
        assert_ne!(TestEvent::NoInput, TestEvent::ValidInput);
    }
}
