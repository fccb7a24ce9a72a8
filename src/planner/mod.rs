//! The incremental DeltaBlue planner.
//!
//! A [`Planner`] keeps the dataflow over a [`ConstraintGraph`] consistent as
//! constraints come and go:
//!
//! - Adding a constraint may override a weaker one on its output; the
//!   displaced constraint then tries another output, and so on down the
//!   override chain ([`incremental`]).
//! - Removing a satisfied constraint clears the walk strengths downstream
//!   of its output and re-adds the constraints left unsatisfied, strongest
//!   first.
//! - A [`Plan`] extracted from a set of input constraints replays the
//!   current dataflow after those inputs are edited ([`extract`]).
//!
//! Traversals tell visited variables apart with a mark that is bumped once
//! per pass and never reset.
//!
//! # Example
//!
//! ```
//! use deltablue::{Planner, Strength};
//!
//! let mut planner = Planner::new();
//! let a = planner.add_variable(0);
//! let b = planner.add_variable(0);
//! planner.add_equality(a, b, Strength::Required).unwrap();
//! planner.add_stay(b, Strength::StrongDefault).unwrap();
//!
//! planner.change(a, 42).unwrap();
//! assert_eq!(planner.value(b).unwrap(), 42);
//! ```

mod extract;
mod incremental;
mod validate;


pub use validate::InvariantBreach;

use crate::config::PlannerConfig;
use crate::constraints::Constraint;
use crate::error::{PlannerError, ViolationReason};
use crate::graph::ConstraintGraph;
use crate::strength::Strength;
use crate::variable::Variable;
use crate::{ConstraintId, Mark, Value, VariableId};
use tracing::{debug, error};

/// A single-threaded constraint-solving session.
///
/// # Invariants
///
/// - `current_mark` only grows, so a mark is unique within the planner's lifetime
/// - Once a fatal violation has been reported, every mutating operation fails
///   with [`PlannerError::Poisoned`]
#[derive(Debug, Clone)]
pub struct Planner {
    pub(crate) graph: ConstraintGraph,
    current_mark: Mark,
    config: PlannerConfig,
    violation: Option<ViolationReason>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::with_config(PlannerConfig::default())
    }
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            graph: ConstraintGraph::new(),
            current_mark: 1,
            config,
            violation: None,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Read-only view of the variables and constraints.
    pub fn graph(&self) -> &ConstraintGraph {
        &self.graph
    }

    /// The violation that poisoned this planner, if any.
    pub fn violation(&self) -> Option<ViolationReason> {
        self.violation
    }

    pub fn is_poisoned(&self) -> bool {
        self.violation.is_some()
    }

    pub fn variable(&self, id: VariableId) -> Option<&Variable> {
        self.graph.variable(id)
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.graph.constraint(id)
    }

    pub fn variable_count(&self) -> usize {
        self.graph.variable_count()
    }

    pub fn constraint_count(&self) -> usize {
        self.graph.constraint_count()
    }

    /// Creates a free-standing variable holding `value`.
    pub fn add_variable(&mut self, value: Value) -> VariableId {
        self.graph.variables.insert(Variable::new(value))
    }

    /// Frees a variable no constraint references and returns its last value.
    ///
    /// Constraints retracted with [`incremental_remove`](Self::incremental_remove)
    /// still reference their variables until they are destroyed.
    ///
    /// # Errors
    ///
    /// - `StaleVariable` if the handle is not live
    /// - `VariableInUse` if live constraints still reference the variable
    pub fn remove_variable(&mut self, id: VariableId) -> Result<Value, PlannerError> {
        if !self.graph.variables.contains(id) {
            return Err(PlannerError::StaleVariable(id));
        }
        let constraints = self.graph.references(id);
        if constraints > 0 {
            return Err(PlannerError::VariableInUse {
                variable: id,
                constraints,
            });
        }
        self.graph
            .variables
            .remove(id)
            .map(|v| v.value)
            .ok_or(PlannerError::StaleVariable(id))
    }

    pub fn value(&self, id: VariableId) -> Result<Value, PlannerError> {
        self.graph
            .variable(id)
            .map(Variable::value)
            .ok_or(PlannerError::StaleVariable(id))
    }

    /// Assigns a value directly, without planning. Use [`propagate_from`](Self::propagate_from)
    /// or a [`Plan`](crate::Plan) to push it downstream.
    pub fn set_value(&mut self, id: VariableId, value: Value) -> Result<(), PlannerError> {
        let variable = self
            .graph
            .variables
            .get_mut(id)
            .ok_or(PlannerError::StaleVariable(id))?;
        variable.value = value;
        Ok(())
    }

    /// Installs `constraint` into the graph and incrementally satisfies it.
    ///
    /// # Errors
    ///
    /// - `StaleVariable` if the constraint references a dead variable
    /// - `FatalGraphInvariantViolation` if a required constraint cannot be
    ///   satisfied or satisfying it closes a cycle; the planner is poisoned
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId, PlannerError> {
        self.ensure_usable()?;
        if let Some(v) = self.graph.dead_participant(&constraint) {
            return Err(PlannerError::StaleVariable(v));
        }

        let c = self.graph.constraints.insert(constraint);
        self.graph.add_to_graph(c);
        let result = self.add_incrementally(c);
        self.record(result)?;
        debug!(
            constraint = %c,
            kind = constraint.name(),
            strength = %constraint.strength(),
            satisfied = self.graph.constraints[c].is_satisfied(),
            "constraint added"
        );
        Ok(c)
    }

    pub fn add_stay(&mut self, v: VariableId, strength: Strength) -> Result<ConstraintId, PlannerError> {
        self.add_constraint(Constraint::stay(v, strength))
    }

    pub fn add_edit(&mut self, v: VariableId, strength: Strength) -> Result<ConstraintId, PlannerError> {
        self.add_constraint(Constraint::edit(v, strength))
    }

    pub fn add_equality(
        &mut self,
        v1: VariableId,
        v2: VariableId,
        strength: Strength,
    ) -> Result<ConstraintId, PlannerError> {
        self.add_constraint(Constraint::equality(v1, v2, strength))
    }

    /// Relates `dst = src * scale + offset`.
    pub fn add_scale(
        &mut self,
        src: VariableId,
        scale: VariableId,
        offset: VariableId,
        dst: VariableId,
        strength: Strength,
    ) -> Result<ConstraintId, PlannerError> {
        self.add_constraint(Constraint::scale(src, scale, offset, dst, strength))
    }

    /// Removes a constraint from the graph and frees it.
    ///
    /// If it was satisfied, constraints downstream of its output are
    /// repaired first.
    pub fn destroy_constraint(&mut self, c: ConstraintId) -> Result<(), PlannerError> {
        self.ensure_usable()?;
        let constraint = *self
            .graph
            .constraint(c)
            .ok_or(PlannerError::StaleConstraint(c))?;
        if constraint.is_satisfied() {
            let result = self.remove_incrementally(c);
            self.record(result)?;
        }
        self.graph.remove_from_graph(c);
        self.graph.constraints.remove(c);
        debug!(constraint = %c, kind = constraint.name(), "constraint destroyed");
        Ok(())
    }

    /// Attempts to satisfy an installed constraint, repairing the override chain.
    ///
    /// A constraint that was retracted with [`incremental_remove`](Self::incremental_remove)
    /// is registered with its variables again first. Already satisfied constraints are left alone.
    pub fn incremental_add(&mut self, c: ConstraintId) -> Result<(), PlannerError> {
        self.ensure_usable()?;
        let constraint = self
            .graph
            .constraint(c)
            .ok_or(PlannerError::StaleConstraint(c))?;
        if constraint.is_satisfied() {
            return Ok(());
        }
        if let Some(v) = self.graph.dead_participant(constraint) {
            return Err(PlannerError::StaleVariable(v));
        }
        if !self.graph.is_installed(c) {
            self.graph.add_to_graph(c);
        }
        let result = self.add_incrementally(c);
        self.record(result)
    }

    /// Retracts a constraint from the graph without freeing it, re-satisfying
    /// whatever it was holding back.
    pub fn incremental_remove(&mut self, c: ConstraintId) -> Result<(), PlannerError> {
        self.ensure_usable()?;
        let constraint = self
            .graph
            .constraint(c)
            .ok_or(PlannerError::StaleConstraint(c))?;
        if !constraint.is_satisfied() {
            self.graph.remove_from_graph(c);
            return Ok(());
        }
        let result = self.remove_incrementally(c);
        self.record(result)
    }

    /// Sets `variable` to `value` through a temporary preferred edit constraint.
    ///
    /// The value is assigned and the extracted plan executed
    /// [`change_repetitions`](PlannerConfig::change_repetitions) times before
    /// the edit constraint is destroyed again.
    pub fn change(&mut self, variable: VariableId, value: Value) -> Result<(), PlannerError> {
        self.ensure_usable()?;
        if !self.graph.variables.contains(variable) {
            return Err(PlannerError::StaleVariable(variable));
        }

        let edit = self.add_edit(variable, Strength::Preferred)?;
        let plan = self.extract_plan_from_constraints(&[edit])?;
        debug!(variable = %variable, value, steps = plan.len(), "change");
        for _ in 0..self.config.change_repetitions {
            self.graph.variables[variable].value = value;
            plan.execute(self)?;
        }
        self.destroy_constraint(edit)
    }

    fn ensure_usable(&self) -> Result<(), PlannerError> {
        match self.violation {
            Some(reason) => Err(PlannerError::Poisoned { reason }),
            None => Ok(()),
        }
    }

    /// Poisons the planner when `result` carries a fatal violation.
    fn record<T>(&mut self, result: Result<T, PlannerError>) -> Result<T, PlannerError> {
        if let Err(err) = &result {
            if let (Some(reason), None) = (err.violation(), self.violation) {
                error!(%reason, "fatal graph invariant violation");
                self.violation = Some(reason);
            }
        }
        result
    }

    /// Selects a previously unused mark value.
    pub(crate) fn new_mark(&mut self) -> Mark {
        self.current_mark += 1;
        self.current_mark
    }
}
