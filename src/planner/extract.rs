//! Plan extraction and direct value propagation.

use std::collections::VecDeque;

use tracing::debug;

use super::Planner;
use crate::error::PlannerError;
use crate::plan::Plan;
use crate::{ConstraintId, VariableId};

impl Planner {
    /// Extracts a plan that resatisfies the graph from the outputs of the
    /// given constraints, usually a set of edit constraints.
    ///
    /// Only satisfied input constraints are used as sources; the others are
    /// ignored.
    ///
    /// # Errors
    ///
    /// `StaleConstraint` if any handle is not live.
    pub fn extract_plan_from_constraints(
        &mut self,
        constraints: &[ConstraintId],
    ) -> Result<Plan, PlannerError> {
        self.ensure_usable()?;
        let mut sources = VecDeque::with_capacity(constraints.len());
        for &c in constraints {
            let constraint = self
                .graph
                .constraint(c)
                .ok_or(PlannerError::StaleConstraint(c))?;
            if constraint.is_input() && constraint.is_satisfied() {
                sources.push_back(c);
            }
        }
        let source_count = sources.len();
        let plan = self.make_plan(sources);
        debug!(sources = source_count, steps = plan.len(), "plan extracted");
        Ok(plan)
    }

    /// Orders the constraints reachable from `sources` so each runs after
    /// everything it reads.
    ///
    /// A constraint joins the plan once its inputs are known: computed
    /// earlier in the plan (marked), stay, or not determined at all. Outputs
    /// are marked as constraints join. Constraints whose outputs are stay
    /// were already computed during graph maintenance and never become
    /// reachable here. Assumes every source is satisfied.
    pub(crate) fn make_plan(&mut self, mut todo: VecDeque<ConstraintId>) -> Plan {
        let mark = self.new_mark();
        let mut plan = Plan::new();
        while let Some(c) = todo.pop_front() {
            let out = self.graph.output(c);
            if self.graph.variables[out].mark != mark && self.graph.inputs_known(c, mark) {
                plan.push(c);
                self.graph.variables[out].mark = mark;
                self.graph.add_constraints_consuming_to(out, &mut todo);
            }
        }
        plan
    }

    /// Pushes the current value of `v` through the settled dataflow,
    /// executing every constraint downstream of it.
    pub fn propagate_from(&mut self, v: VariableId) -> Result<(), PlannerError> {
        self.ensure_usable()?;
        if !self.graph.variables.contains(v) {
            return Err(PlannerError::StaleVariable(v));
        }
        let mut todo = VecDeque::new();
        self.graph.add_constraints_consuming_to(v, &mut todo);
        while let Some(c) = todo.pop_front() {
            self.graph.execute(c);
            let out = self.graph.output(c);
            self.graph.add_constraints_consuming_to(out, &mut todo);
        }
        Ok(())
    }
}
