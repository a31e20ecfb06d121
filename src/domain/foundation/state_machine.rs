//! Checked transitions between lifecycle states.

use super::ValidationError;

/// A lifecycle enum whose moves are restricted to a fixed successor table.
///
/// Implementors list the successors of each state; membership in that list
/// is what `can_transition_to` and `transition_to` check. A state with no
/// successors is terminal. Staying in place counts as a move, so a state that
/// may repeat must list itself.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// States reachable in one step from `self`.
    fn valid_transitions(&self) -> Vec<Self>;

    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Returns `target` if the move is allowed.
    ///
    /// The error names the `state_transition` field and both states.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "state_transition",
                format!("{:?} -> {:?} is not allowed", self, target),
            ));
        }
        Ok(target)
    }

    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Off,
        On,
        Broken,
    }

    impl StateMachine for Light {
        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Light::Off => vec![Light::On, Light::Broken],
                Light::On => vec![Light::Off, Light::Broken],
                Light::Broken => vec![],
            }
        }
    }

    #[test]
    fn listed_successor_is_reachable() {
        assert_eq!(Light::Off.transition_to(Light::On), Ok(Light::On));
    }

    #[test]
    fn unlisted_move_names_both_states() {
        let err = Light::Broken.transition_to(Light::On).unwrap_err();
        assert_eq!(err.field(), "state_transition");
        assert!(err.to_string().contains("Broken -> On"));
    }

    #[test]
    fn self_loop_needs_listing() {
        assert!(!Light::On.can_transition_to(&Light::On));
    }

    #[test]
    fn broken_is_terminal() {
        assert!(Light::Broken.is_terminal());
        assert!(!Light::Off.is_terminal());
    }
}
