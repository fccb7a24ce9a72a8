use crate::{ConstraintId, VariableId};
use thiserror::Error;

/// Why the constraint graph can no longer be kept consistent.
///
/// Both conditions mean the caller built a contradictory graph; neither can
/// be repaired locally.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ViolationReason {
    #[error("Cycle encountered while adding constraint {constraint}")]
    CycleEncountered { constraint: ConstraintId },

    #[error("Could not satisfy required constraint {constraint}")]
    RequiredUnsatisfiable { constraint: ConstraintId },
}

/// Errors that can occur during planner operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlannerError {
    #[error("Fatal graph invariant violation: {reason}")]
    FatalGraphInvariantViolation { reason: ViolationReason },

    #[error("Planner is unusable after an earlier fatal violation: {reason}")]
    Poisoned { reason: ViolationReason },

    #[error("Stale or unknown variable handle: {0}")]
    StaleVariable(VariableId),

    #[error("Stale or unknown constraint handle: {0}")]
    StaleConstraint(ConstraintId),

    #[error("Variable {variable} is still referenced by {constraints} constraint(s)")]
    VariableInUse {
        variable: VariableId,
        constraints: usize,
    },
}

impl PlannerError {
    pub(crate) fn cycle(constraint: ConstraintId) -> Self {
        PlannerError::FatalGraphInvariantViolation {
            reason: ViolationReason::CycleEncountered { constraint },
        }
    }

    pub(crate) fn required_unsatisfiable(constraint: ConstraintId) -> Self {
        PlannerError::FatalGraphInvariantViolation {
            reason: ViolationReason::RequiredUnsatisfiable { constraint },
        }
    }

    /// The violation behind a fatal or poisoned error.
    pub fn violation(&self) -> Option<ViolationReason> {
        match self {
            PlannerError::FatalGraphInvariantViolation { reason }
            | PlannerError::Poisoned { reason } => Some(*reason),
            _ => None,
        }
    }

    /// True if the planner cannot be used any further.
    pub fn is_fatal(&self) -> bool {
        self.violation().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::constraints::Constraint;
    use crate::strength::Strength;
    use crate::variable::Variable;

    fn ids() -> (VariableId, ConstraintId) {
        let v = Arena::<Variable>::new().insert(Variable::default());
        let c = Arena::<Constraint>::new().insert(Constraint::stay(v, Strength::Default));
        (v, c)
    }

    #[test]
    fn cycle_display() {
        let (_, c) = ids();
        let e = PlannerError::cycle(c);
        assert_eq!(
            e.to_string(),
            "Fatal graph invariant violation: Cycle encountered while adding constraint #0v0"
        );
    }

    #[test]
    fn required_unsatisfiable_display() {
        let (_, c) = ids();
        let s = PlannerError::required_unsatisfiable(c).to_string();
        assert!(s.contains("Could not satisfy required constraint"));
    }

    #[test]
    fn variable_in_use_display() {
        let (v, _) = ids();
        let e = PlannerError::VariableInUse {
            variable: v,
            constraints: 2,
        };
        assert_eq!(
            e.to_string(),
            "Variable #0v0 is still referenced by 2 constraint(s)"
        );
    }

    #[test]
    fn only_violations_are_fatal() {
        let (v, c) = ids();
        assert!(PlannerError::cycle(c).is_fatal());
        assert!(PlannerError::Poisoned {
            reason: ViolationReason::CycleEncountered { constraint: c }
        }
        .is_fatal());
        assert!(!PlannerError::StaleVariable(v).is_fatal());
        assert_eq!(PlannerError::StaleConstraint(c).violation(), None);
    }
}
