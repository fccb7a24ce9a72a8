//! Consistency checks over the settled dataflow.

use std::collections::HashMap;

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use thiserror::Error;

use super::Planner;
use crate::{ConstraintId, VariableId};

/// A broken dataflow invariant found by [`Planner::check_invariants`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantBreach {
    #[error("Variable {variable} lists constraint {constraint}, which no longer exists")]
    DanglingConstraint {
        variable: VariableId,
        constraint: ConstraintId,
    },

    #[error("Satisfied constraint {constraint} does not determine its output {output}")]
    OutputNotDetermined {
        constraint: ConstraintId,
        output: VariableId,
    },

    #[error("Variable {variable} is determined by {constraint}, which is not among its constraints")]
    DeterminerNotMember {
        variable: VariableId,
        constraint: ConstraintId,
    },

    #[error("Variable {variable} is determined by {constraint}, which is unsatisfied or outputs elsewhere")]
    StaleDeterminer {
        variable: VariableId,
        constraint: ConstraintId,
    },

    #[error("The dataflow graph contains a cycle")]
    DataflowCycle,
}

impl Planner {
    /// Verifies that determiners and satisfied constraints agree and that
    /// the dataflow is acyclic.
    ///
    /// Holds whenever no add or remove is in progress.
    pub fn check_invariants(&self) -> Result<(), InvariantBreach> {
        let graph = &self.graph;
        for (variable, v) in graph.variables() {
            for &constraint in &v.constraints {
                if graph.constraint(constraint).is_none() {
                    return Err(InvariantBreach::DanglingConstraint {
                        variable,
                        constraint,
                    });
                }
            }
            if let Some(constraint) = v.determined_by {
                if !v.constraints.contains(&constraint) {
                    return Err(InvariantBreach::DeterminerNotMember {
                        variable,
                        constraint,
                    });
                }
                let determiner = graph
                    .constraint(constraint)
                    .filter(|c| c.is_satisfied() && c.output() == variable);
                if determiner.is_none() {
                    return Err(InvariantBreach::StaleDeterminer {
                        variable,
                        constraint,
                    });
                }
            }
        }

        for (constraint, c) in graph.constraints() {
            if !c.is_satisfied() {
                continue;
            }
            let output = c.output();
            let determined = graph
                .variable(output)
                .and_then(|v| v.determined_by)
                .is_some_and(|d| d == constraint);
            if !determined {
                return Err(InvariantBreach::OutputNotDetermined { constraint, output });
            }
        }

        if is_cyclic_directed(&self.dataflow_graph()) {
            return Err(InvariantBreach::DataflowCycle);
        }
        Ok(())
    }

    /// Snapshot of the current dataflow: one node per variable and an edge
    /// from every input of a satisfied constraint to its output, weighted
    /// with the constraint.
    pub fn dataflow_graph(&self) -> StableDiGraph<VariableId, ConstraintId> {
        let mut dataflow = StableDiGraph::with_capacity(
            self.graph.variable_count(),
            self.graph.constraint_count(),
        );
        let nodes: HashMap<VariableId, NodeIndex> = self
            .graph
            .variables()
            .map(|(id, _)| (id, dataflow.add_node(id)))
            .collect();

        for (id, c) in self.graph.constraints() {
            if !c.is_satisfied() {
                continue;
            }
            let Some(&to) = nodes.get(&c.output()) else {
                continue;
            };
            for input in c.inputs() {
                if let Some(&from) = nodes.get(&input) {
                    dataflow.add_edge(from, to, id);
                }
            }
        }
        dataflow
    }
}
