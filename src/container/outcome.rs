//! Result of dispatching an event into a container.

use crate::core::State;

/// What a single `dispatch` did.
///
/// None of these is an error: an event with no edge from the current mode
/// and an explicit self-loop are both defined as no-ops.
#[derive(Clone, Debug, PartialEq)]
pub enum DispatchOutcome<S: State> {
    /// The mode moved from `from` to `to` and the hook ran once.
    Transitioned { from: S, to: S },

    /// The table maps `(mode, event)` back to the current mode. Nothing was
    /// committed and the hook did not run.
    SelfLoop,

    /// The table has no edge for `(mode, event)`.
    Unhandled,
}

impl<S: State> DispatchOutcome<S> {
    /// Whether the mode changed.
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }

    /// Target mode of an accepted transition.
    pub fn target(&self) -> Option<&S> {
        match self {
            Self::Transitioned { to, .. } => Some(to),
            Self::SelfLoop | Self::Unhandled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::state_enum! {
        enum Phase {
            Draft,
            Sent,
        }
    }

    #[test]
    fn only_transitions_report_a_target() {
        let moved = DispatchOutcome::Transitioned {
            from: Phase::Draft,
            to: Phase::Sent,
        };

        assert!(moved.is_transition());
        assert_eq!(moved.target(), Some(&Phase::Sent));

        assert!(!DispatchOutcome::<Phase>::SelfLoop.is_transition());
        assert_eq!(DispatchOutcome::<Phase>::Unhandled.target(), None);
    }
}
