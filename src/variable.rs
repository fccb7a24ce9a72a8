//! Constrained variables.

use crate::strength::Strength;
use crate::{ConstraintId, Mark, Value};

/// A mutable integer cell plus the bookkeeping the planner keeps on it.
///
/// Besides its value, a variable records every constraint that references
/// it, which of those currently computes it, its walkabout strength and
/// whether it is a planning-time constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub(crate) value: Value,
    pub(crate) constraints: Vec<ConstraintId>,
    pub(crate) determined_by: Option<ConstraintId>,
    pub(crate) walk_strength: Strength,
    pub(crate) stay: bool,
    pub(crate) mark: Mark,
}

impl Default for Variable {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Variable {
    /// Creates a free-standing variable holding `value`.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            constraints: Vec::with_capacity(2),
            determined_by: None,
            walk_strength: Strength::AbsoluteWeakest,
            stay: true,
            mark: 0,
        }
    }

    pub fn value(&self) -> Value {
        self.value
    }

    /// Constraints referencing this variable, in insertion order.
    pub fn constraints(&self) -> &[ConstraintId] {
        &self.constraints
    }

    /// The constraint currently computing this variable, if any.
    pub fn determined_by(&self) -> Option<ConstraintId> {
        self.determined_by
    }

    pub fn walk_strength(&self) -> Strength {
        self.walk_strength
    }

    /// True if the variable is a constant at plan execution time.
    pub fn is_stay(&self) -> bool {
        self.stay
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub(crate) fn add_constraint(&mut self, constraint: ConstraintId) {
        self.constraints.push(constraint);
    }

    /// Removes the first occurrence of `constraint` and drops it as determiner.
    pub(crate) fn remove_constraint(&mut self, constraint: ConstraintId) {
        if let Some(pos) = self.constraints.iter().position(|&c| c == constraint) {
            self.constraints.remove(pos);
        }
        if self.determined_by == Some(constraint) {
            self.determined_by = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::constraints::Constraint;

    fn ids(n: usize) -> Vec<ConstraintId> {
        let mut arena = Arena::<Constraint>::new();
        let v = Arena::<Variable>::new().insert(Variable::default());
        (0..n)
            .map(|_| arena.insert(Constraint::stay(v, Strength::Default)))
            .collect()
    }

    #[test]
    fn new_variable_is_free_and_weakest() {
        let v = Variable::new(7);
        assert_eq!(v.value(), 7);
        assert!(v.constraints().is_empty());
        assert_eq!(v.determined_by(), None);
        assert_eq!(v.walk_strength(), Strength::AbsoluteWeakest);
        assert!(v.is_stay());
        assert_eq!(v.mark(), 0);
    }

    #[test]
    fn remove_constraint_removes_first_match_only() {
        let c = ids(2);
        let mut v = Variable::default();
        v.add_constraint(c[0]);
        v.add_constraint(c[1]);
        v.add_constraint(c[0]);

        v.remove_constraint(c[0]);
        assert_eq!(v.constraints(), &[c[1], c[0]]);
    }

    #[test]
    fn remove_determiner_clears_determined_by() {
        let c = ids(2);
        let mut v = Variable::default();
        v.add_constraint(c[0]);
        v.add_constraint(c[1]);
        v.determined_by = Some(c[1]);

        v.remove_constraint(c[0]);
        assert_eq!(v.determined_by(), Some(c[1]));

        v.remove_constraint(c[1]);
        assert_eq!(v.determined_by(), None);
        assert!(v.constraints().is_empty());
    }
}
