//! Execution plans.

use crate::error::PlannerError;
use crate::planner::Planner;
use crate::ConstraintId;

/// An ordered list of constraints that, executed in sequence, resatisfies
/// every currently satisfiable constraint after its inputs change.
///
/// A plan is a snapshot: it stays valid only as long as the set of satisfied
/// constraints it was extracted from does not change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    steps: Vec<ConstraintId>,
}

impl Plan {
    pub fn new() -> Self {
        Self {
            steps: Vec::with_capacity(15),
        }
    }

    pub(crate) fn push(&mut self, constraint: ConstraintId) {
        self.steps.push(constraint);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[ConstraintId] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = ConstraintId> + '_ {
        self.steps.iter().copied()
    }

    pub fn contains(&self, constraint: ConstraintId) -> bool {
        self.steps.contains(&constraint)
    }

    /// Runs every step in order against the planner's variables.
    ///
    /// # Errors
    ///
    /// Returns `StaleConstraint` if a step was destroyed after the plan was extracted.
    /// Steps before the stale one have already run.
    pub fn execute(&self, planner: &mut Planner) -> Result<(), PlannerError> {
        let graph = &mut planner.graph;
        for &c in &self.steps {
            let constraint = graph
                .constraints
                .get(c)
                .ok_or(PlannerError::StaleConstraint(c))?;
            constraint.execute(&mut graph.variables);
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a ConstraintId;
    type IntoIter = std::slice::Iter<'a, ConstraintId>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strength::Strength;

    #[test]
    fn empty_plan_executes_as_noop() {
        let mut planner = Planner::new();
        let v = planner.add_variable(4);
        let plan = Plan::new();

        assert!(plan.is_empty());
        plan.execute(&mut planner).unwrap();
        assert_eq!(planner.value(v).unwrap(), 4);
    }

    #[test]
    fn executes_steps_in_order() {
        let mut planner = Planner::new();
        let a = planner.add_variable(0);
        let b = planner.add_variable(0);
        let c = planner.add_variable(0);
        let ab = planner.add_equality(a, b, Strength::Required).unwrap();
        let bc = planner.add_equality(b, c, Strength::Required).unwrap();

        let mut plan = Plan::new();
        plan.push(ab);
        plan.push(bc);
        assert_eq!(plan.steps(), &[ab, bc]);

        planner.set_value(a, 9).unwrap();
        plan.execute(&mut planner).unwrap();
        assert_eq!(planner.value(c).unwrap(), 9);
    }

    #[test]
    fn stale_step_is_reported() {
        let mut planner = Planner::new();
        let a = planner.add_variable(0);
        let b = planner.add_variable(0);
        let ab = planner.add_equality(a, b, Strength::Required).unwrap();
        let mut plan = Plan::new();
        plan.push(ab);

        planner.destroy_constraint(ab).unwrap();
        assert_eq!(
            plan.execute(&mut planner),
            Err(PlannerError::StaleConstraint(ab))
        );
    }
}
