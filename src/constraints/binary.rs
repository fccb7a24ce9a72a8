//! Constraints with two possible output variables.

use crate::arena::Arena;
use crate::strength::Strength;
use crate::variable::Variable;
use crate::{Mark, VariableId};
use tracing::warn;

use super::constraint::VariableList;

/// Which way values flow through a satisfied binary constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `v1` is the input, `v2` the output.
    Forward,
    /// `v2` is the input, `v1` the output.
    Backward,
}

/// The relation a binary constraint enforces between `v1` and `v2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `v1 = v2`
    Equality,
    /// `v2 = v1 * scale + offset`; `scale` and `offset` are always inputs.
    Scale {
        scale: VariableId,
        offset: VariableId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryConstraint {
    v1: VariableId,
    v2: VariableId,
    relation: Relation,
    direction: Option<Direction>,
}

impl BinaryConstraint {
    pub(crate) fn new(v1: VariableId, v2: VariableId, relation: Relation) -> Self {
        Self {
            v1,
            v2,
            relation,
            direction: None,
        }
    }

    pub fn v1(&self) -> VariableId {
        self.v1
    }

    pub fn v2(&self) -> VariableId {
        self.v2
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn is_satisfied(&self) -> bool {
        self.direction.is_some()
    }

    /// Output side for the current direction; `v1` when unsatisfied.
    pub fn output(&self) -> VariableId {
        match self.direction {
            Some(Direction::Forward) => self.v2,
            _ => self.v1,
        }
    }

    /// The `v1`/`v2` side feeding the output.
    pub fn input(&self) -> VariableId {
        match self.direction {
            Some(Direction::Forward) => self.v1,
            _ => self.v2,
        }
    }

    pub(crate) fn inputs(&self) -> VariableList {
        let mut inputs = VariableList::new();
        inputs.push(self.input());
        if let Relation::Scale { scale, offset } = self.relation {
            inputs.push(scale);
            inputs.push(offset);
        }
        inputs
    }

    pub(crate) fn participants(&self) -> VariableList {
        let mut vars = VariableList::new();
        vars.push(self.v1);
        vars.push(self.v2);
        if let Relation::Scale { scale, offset } = self.relation {
            vars.push(scale);
            vars.push(offset);
        }
        vars
    }

    pub(crate) fn mark_unsatisfied(&mut self) {
        self.direction = None;
    }

    /// Picks a flow direction from the marks and walk strengths of `v1`/`v2`.
    ///
    /// A variable already marked in this pass was fixed by an earlier
    /// constraint and must not become the output. With neither marked, the
    /// side with the weaker walk strength becomes the output, provided this
    /// constraint is strong enough to override it.
    pub(crate) fn choose_method(
        &mut self,
        strength: Strength,
        variables: &Arena<Variable>,
        mark: Mark,
    ) {
        let v1 = &variables[self.v1];
        let v2 = &variables[self.v2];
        self.direction = if v1.mark == mark {
            (v2.mark != mark && strength.stronger_than(v2.walk_strength))
                .then_some(Direction::Forward)
        } else if v2.mark == mark {
            strength
                .stronger_than(v1.walk_strength)
                .then_some(Direction::Backward)
        } else if v1.walk_strength.weaker_than(v2.walk_strength) {
            strength
                .stronger_than(v1.walk_strength)
                .then_some(Direction::Backward)
        } else {
            strength
                .stronger_than(v2.walk_strength)
                .then_some(Direction::Forward)
        };
    }

    pub(crate) fn execute(&self, variables: &mut Arena<Variable>) {
        match self.relation {
            Relation::Equality => {
                let value = variables[self.input()].value;
                variables[self.output()].value = value;
            }
            Relation::Scale { scale, offset } => {
                let scale_value = variables[scale].value;
                let offset_value = variables[offset].value;
                if self.direction == Some(Direction::Forward) {
                    let src = variables[self.v1].value;
                    variables[self.v2].value = src.wrapping_mul(scale_value).wrapping_add(offset_value);
                } else if scale_value == 0 {
                    warn!(
                        scale = %scale,
                        output = %self.v1,
                        "zero scale factor; backward scale step left its output unchanged"
                    );
                } else {
                    let dst = variables[self.v2].value;
                    // Truncating division, as `/` on integers.
                    variables[self.v1].value = dst.wrapping_sub(offset_value).wrapping_div(scale_value);
                }
            }
        }
    }

    /// Output walk strength is the weaker of this constraint and its input;
    /// the output is stay only if every input is.
    pub(crate) fn recalculate(&self, strength: Strength, variables: &mut Arena<Variable>) {
        let input = &variables[self.input()];
        let walk_strength = strength.weakest(input.walk_strength);
        let mut stay = input.stay;
        if let Relation::Scale { scale, offset } = self.relation {
            stay = stay && variables[scale].stay && variables[offset].stay;
        }

        let out = &mut variables[self.output()];
        out.walk_strength = walk_strength;
        out.stay = stay;
        if stay {
            self.execute(variables);
        }
    }
}
