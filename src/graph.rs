//! Storage for the constraint graph.
//!
//! Variables and constraints live in two generational arenas and refer to
//! each other only through handles, so the variable ↔ constraint
//! back-references never form owning cycles. The arenas own every entity;
//! graph membership is the list of constraints kept on each variable.

use crate::arena::Arena;
use crate::constraints::Constraint;
use crate::variable::Variable;
use crate::{ConstraintId, Mark, VariableId};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct ConstraintGraph {
    pub(crate) variables: Arena<Variable>,
    pub(crate) constraints: Arena<Constraint>,
}

impl ConstraintGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variable(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(id)
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables.iter()
    }

    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.constraints.iter()
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// True if `c` is registered with its participants.
    pub fn is_installed(&self, c: ConstraintId) -> bool {
        self.constraints.get(c).is_some_and(|constraint| {
            constraint.participants().iter().all(|&v| {
                self.variables
                    .get(v)
                    .is_some_and(|variable| variable.constraints.contains(&c))
            })
        })
    }

    /// Number of live constraints naming `v` as a participant, installed or not.
    pub fn references(&self, v: VariableId) -> usize {
        self.constraints
            .iter()
            .filter(|(_, c)| c.participants().contains(&v))
            .count()
    }

    /// First participant of `c` that is no longer live.
    pub(crate) fn dead_participant(&self, c: &Constraint) -> Option<VariableId> {
        c.participants()
            .into_iter()
            .find(|&v| !self.variables.contains(v))
    }

    /// Registers `c` with every variable it references and resets its method.
    pub(crate) fn add_to_graph(&mut self, c: ConstraintId) {
        let constraint = &mut self.constraints[c];
        constraint.mark_unsatisfied();
        for v in constraint.participants() {
            self.variables[v].add_constraint(c);
        }
    }

    /// Unregisters `c` from every live variable it references and resets its method.
    pub(crate) fn remove_from_graph(&mut self, c: ConstraintId) {
        let Some(constraint) = self.constraints.get_mut(c) else {
            return;
        };
        constraint.mark_unsatisfied();
        for v in constraint.participants() {
            if let Some(variable) = self.variables.get_mut(v) {
                variable.remove_constraint(c);
            }
        }
    }

    pub(crate) fn choose_method(&mut self, c: ConstraintId, mark: Mark) {
        self.constraints[c].choose_method(&self.variables, mark);
    }

    pub(crate) fn execute(&mut self, c: ConstraintId) {
        self.constraints[c].execute(&mut self.variables);
    }

    pub(crate) fn recalculate(&mut self, c: ConstraintId) {
        self.constraints[c].recalculate(&mut self.variables);
    }

    pub(crate) fn output(&self, c: ConstraintId) -> VariableId {
        self.constraints[c].output()
    }

    pub(crate) fn inputs_known(&self, c: ConstraintId, mark: Mark) -> bool {
        self.constraints[c].inputs_known(&self.variables, mark)
    }

    /// Appends every satisfied constraint that reads `v`, skipping the one
    /// that determines it.
    pub(crate) fn add_constraints_consuming_to(&self, v: VariableId, coll: &mut VecDeque<ConstraintId>) {
        let variable = &self.variables[v];
        let determining = variable.determined_by;
        coll.extend(
            variable
                .constraints
                .iter()
                .copied()
                .filter(|&c| Some(c) != determining && self.constraints[c].is_satisfied()),
        );
    }
}
