//! Status lifecycles expressed as fixed transition tables

use crate::core::error::TransitionError;
use std::fmt;

/// A status enum with a fixed table of legal transitions
pub trait Lifecycle: Copy + PartialEq + fmt::Debug + fmt::Display + 'static {
    /// Entity type name used in transition errors
    const ENTITY_TYPE: &'static str;

    /// Statuses reachable in one step from `self`
    fn successors(self) -> &'static [Self];

    fn can_transition_to(self, target: Self) -> bool {
        self.successors().contains(&target)
    }

    fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    /// Check a transition without performing it
    fn check_transition(self, target: Self) -> Result<(), TransitionError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(TransitionError {
                entity_type: Self::ENTITY_TYPE,
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Light {
        Red,
        Green,
        Broken,
    }

    impl fmt::Display for Light {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl Lifecycle for Light {
        const ENTITY_TYPE: &'static str = "light";

        fn successors(self) -> &'static [Self] {
            match self {
                Light::Red => &[Light::Green, Light::Broken],
                Light::Green => &[Light::Red, Light::Broken],
                Light::Broken => &[],
            }
        }
    }

    #[test]
    fn test_transition_table() {
        assert!(Light::Red.can_transition_to(Light::Green));
        assert!(!Light::Broken.can_transition_to(Light::Red));
        assert!(Light::Broken.is_terminal());
        assert!(!Light::Red.can_transition_to(Light::Red));
    }

    #[test]
    fn test_check_transition_reports_both_ends() {
        let err = Light::Broken.check_transition(Light::Green).unwrap_err();
        assert_eq!(err.entity_type, "light");
        assert_eq!(err.from, "Broken");
        assert_eq!(err.to, "Green");
    }
}
