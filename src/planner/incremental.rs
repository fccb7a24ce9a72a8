//! Incremental maintenance of the dataflow: adding and retracting constraints.

use std::collections::VecDeque;

use tracing::trace;

use super::Planner;
use crate::error::PlannerError;
use crate::strength::Strength;
use crate::{ConstraintId, Mark, VariableId};

impl Planner {
    /// Satisfies `c` and walks the override chain it starts.
    ///
    /// Satisfying `c` may override a weaker constraint on its output; that
    /// constraint then tries to find another output, and so on until a
    /// satisfied constraint overrides nothing or a displaced one is too
    /// weak to be satisfied at all. Every step uses the same mark, so the
    /// chain cannot loop back onto a variable it already fixed.
    pub(crate) fn add_incrementally(&mut self, c: ConstraintId) -> Result<(), PlannerError> {
        let mark = self.new_mark();
        let mut overridden = self.satisfy(c, mark)?;
        let mut hops = 0usize;
        while let Some(displaced) = overridden {
            hops += 1;
            overridden = self.satisfy(displaced, mark)?;
        }
        trace!(constraint = %c, mark, hops, "incremental add settled");
        Ok(())
    }

    /// Chooses a method for `c` and installs it into the dataflow.
    ///
    /// Returns the constraint that previously determined the new output, now
    /// unsatisfied. Assumes `c` is not satisfied yet.
    fn satisfy(&mut self, c: ConstraintId, mark: Mark) -> Result<Option<ConstraintId>, PlannerError> {
        self.graph.choose_method(c, mark);
        let constraint = self.graph.constraints[c];
        if !constraint.is_satisfied() {
            if constraint.strength().is_required() {
                return Err(PlannerError::required_unsatisfiable(c));
            }
            return Ok(None);
        }

        // Marked inputs let add_propagate detect a path back from the output.
        for v in constraint.inputs() {
            self.graph.variables[v].mark = mark;
        }
        let out = constraint.output();
        let overridden = self.graph.variables[out].determined_by;
        if let Some(o) = overridden {
            self.graph.constraints[o].mark_unsatisfied();
        }
        self.graph.variables[out].determined_by = Some(c);
        self.add_propagate(c, mark)?;
        self.graph.variables[out].mark = mark;
        Ok(overridden)
    }

    /// Recomputes walk strengths and stay flags downstream of `c`.
    ///
    /// Reaching a variable carrying `mark` means a path leads from the output
    /// of `c` back to one of its inputs. In that case `c` is retracted again
    /// and the cycle reported.
    pub(crate) fn add_propagate(&mut self, c: ConstraintId, mark: Mark) -> Result<(), PlannerError> {
        let mut todo = VecDeque::from([c]);
        while let Some(d) = todo.pop_front() {
            let out = self.graph.output(d);
            if self.graph.variables[out].mark == mark {
                self.remove_incrementally(c)?;
                return Err(PlannerError::cycle(c));
            }
            self.graph.recalculate(d);
            self.graph.add_constraints_consuming_to(out, &mut todo);
        }
        Ok(())
    }

    /// Retracts the satisfied constraint `c` and re-satisfies what it held back.
    ///
    /// Unsatisfied constraints downstream are retried strongest first, so
    /// weak constraints are not added only to be overridden right after.
    pub(crate) fn remove_incrementally(&mut self, c: ConstraintId) -> Result<(), PlannerError> {
        let out = self.graph.output(c);
        self.graph.constraints[c].mark_unsatisfied();
        self.graph.remove_from_graph(c);
        let unsatisfied = self.remove_propagate_from(out);
        trace!(constraint = %c, retry = unsatisfied.len(), "incremental remove");
        for u in unsatisfied {
            // The same constraint can be collected from several variables.
            if !self.graph.constraints[u].is_satisfied() {
                self.add_incrementally(u)?;
            }
        }
        Ok(())
    }

    /// Frees `out` and updates walk strengths and stay flags of everything
    /// downstream of it. Returns the unsatisfied constraints met on the way,
    /// strongest first.
    pub(crate) fn remove_propagate_from(&mut self, out: VariableId) -> Vec<ConstraintId> {
        {
            let v = &mut self.graph.variables[out];
            v.determined_by = None;
            v.walk_strength = Strength::AbsoluteWeakest;
            v.stay = true;
        }

        let mut unsatisfied = Vec::new();
        let mut consumers = VecDeque::new();
        let mut todo = VecDeque::from([out]);
        while let Some(v) = todo.pop_front() {
            unsatisfied.extend(
                self.graph.variables[v]
                    .constraints
                    .iter()
                    .copied()
                    .filter(|&c| !self.graph.constraints[c].is_satisfied()),
            );
            self.graph.add_constraints_consuming_to(v, &mut consumers);
            while let Some(c) = consumers.pop_front() {
                self.graph.recalculate(c);
                todo.push_back(self.graph.output(c));
            }
        }

        unsatisfied.sort_by_key(|&c| self.graph.constraints[c].strength().arithmetic_value());
        unsatisfied
    }
}
