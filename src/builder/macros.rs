//! Macros for declaring machine alphabets and tables.

/// Generate a `State` implementation for a fieldless enum.
///
/// # Example
///
/// ```
/// use modeflow::state_enum;
///
/// state_enum! {
///     pub enum SectionState {
///         Incomplete,
///         Valid,
///         Invalid,
///         Complete,
///     }
///     final: [Complete]
///     error: [Invalid]
/// }
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

/// Generate an `Event` implementation for a fieldless enum.
///
/// # Example
///
/// ```
/// use modeflow::event_enum;
/// use modeflow::core::Event;
///
/// event_enum! {
///     pub enum FormEvent {
///         AllSectionsCompleted,
///         HasUncompletedSections,
///     }
/// }
///
/// assert_eq!(FormEvent::AllSectionsCompleted.name(), "AllSectionsCompleted");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Declare a table as `Source => { Event => Target, ... }` groups.
///
/// Expands to a [`TableBuilder`](crate::builder::TableBuilder); call
/// `.build()` to validate it.
///
/// # Example
///
/// ```
/// use modeflow::{event_enum, state_enum, transitions};
///
/// state_enum! {
///     enum Light { Red, Green, Yellow }
/// }
/// event_enum! {
///     enum Tick { Next }
/// }
///
/// let table = transitions! {
///     Light::Red => { Tick::Next => Light::Green },
///     Light::Green => { Tick::Next => Light::Yellow },
///     Light::Yellow => { Tick::Next => Light::Red },
/// }
/// .build()
/// .unwrap();
///
/// assert_eq!(table.len(), 3);
/// ```
#[macro_export]
macro_rules! transitions {
    (
        $(
            $from:expr => {
                $( $event:expr => $to:expr ),* $(,)?
            }
        ),* $(,)?
    ) => {
        $crate::builder::TableBuilder::new()
            $( $( .declare($from, $event, $to) )* )*
    };
}

#[cfg(test)]
mod tests {
    use crate::builder::BuildError;
    use crate::core::{Event, State};

    state_enum! {
        enum TestState {
            NotReady,
            ReadyToSubmit,
            Submitting,
            Failed,
        }
        final: [Submitting, Failed]
        error: [Failed]
    }

    event_enum! {
        enum TestEvent {
            AllSectionsCompleted,
            SubmitInitiated,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        let state = TestState::NotReady;
        assert_eq!(state.name(), "NotReady");
        assert!(!state.is_final());
        assert!(!state.is_error());

        assert!(TestState::Submitting.is_final());
        assert!(!TestState::Submitting.is_error());

        assert!(TestState::Failed.is_final());
        assert!(TestState::Failed.is_error());
    }

    #[test]
    fn state_enum_works_without_final_error() {
        state_enum! {
            enum MinimalState {
                One,
                Two,
            }
        }

        assert!(!MinimalState::One.is_final());
        assert!(!MinimalState::Two.is_error());
    }

    #[test]
    fn event_enum_macro_generates_trait() {
        assert_eq!(TestEvent::AllSectionsCompleted.name(), "AllSectionsCompleted");
        assert_eq!(TestEvent::SubmitInitiated.name(), "SubmitInitiated");
    }

    #[test]
    fn transitions_macro_builds_table() {
        let table = transitions! {
            TestState::NotReady => {
                TestEvent::AllSectionsCompleted => TestState::ReadyToSubmit,
            },
            TestState::ReadyToSubmit => {
                TestEvent::SubmitInitiated => TestState::Submitting,
            },
        }
        .build()
        .unwrap();

        assert_eq!(
            table.lookup(&TestState::ReadyToSubmit, &TestEvent::SubmitInitiated),
            Some(&TestState::Submitting)
        );
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn transitions_macro_rejects_duplicates() {
        let result = transitions! {
            TestState::NotReady => {
                TestEvent::AllSectionsCompleted => TestState::ReadyToSubmit,
                TestEvent::AllSectionsCompleted => TestState::Failed,
            },
        }
        .build();

        assert!(matches!(result, Err(BuildError::DuplicateTransition { .. })));
    }
}
