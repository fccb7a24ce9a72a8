//! The shared constraint protocol and its dispatch over the variant tags.

use crate::arena::Arena;
use crate::strength::Strength;
use crate::variable::Variable;
use crate::{Mark, VariableId};
use smallvec::SmallVec;
use std::fmt;

use super::binary::{BinaryConstraint, Relation};
use super::unary::{UnaryConstraint, UnaryRole};

/// Inline list of variable handles; no constraint touches more than four.
pub type VariableList = SmallVec<[VariableId; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unary(UnaryConstraint),
    Binary(BinaryConstraint),
}

/// A system-maintainable relation over one or two variables, at a given strength.
///
/// A constraint is satisfied once it has chosen a method (a direction for
/// binary constraints). While satisfied, its [`output`](Self::output)
/// variable is determined by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    strength: Strength,
    kind: ConstraintKind,
}

impl Constraint {
    /// Holds `output` constant at planning time.
    pub fn stay(output: VariableId, strength: Strength) -> Self {
        Self {
            strength,
            kind: ConstraintKind::Unary(UnaryConstraint::new(output, UnaryRole::Stay)),
        }
    }

    /// Marks `output` as changed by client code.
    pub fn edit(output: VariableId, strength: Strength) -> Self {
        Self {
            strength,
            kind: ConstraintKind::Unary(UnaryConstraint::new(output, UnaryRole::Edit)),
        }
    }

    /// `v1 = v2`
    pub fn equality(v1: VariableId, v2: VariableId, strength: Strength) -> Self {
        Self {
            strength,
            kind: ConstraintKind::Binary(BinaryConstraint::new(v1, v2, Relation::Equality)),
        }
    }

    /// `dst = src * scale + offset`, solvable for either `src` or `dst`.
    pub fn scale(
        src: VariableId,
        scale: VariableId,
        offset: VariableId,
        dst: VariableId,
        strength: Strength,
    ) -> Self {
        Self {
            strength,
            kind: ConstraintKind::Binary(BinaryConstraint::new(
                src,
                dst,
                Relation::Scale { scale, offset },
            )),
        }
    }

    pub fn strength(&self) -> Strength {
        self.strength
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            ConstraintKind::Unary(u) => match u.role() {
                UnaryRole::Stay => "stay",
                UnaryRole::Edit => "edit",
            },
            ConstraintKind::Binary(b) => match b.relation() {
                Relation::Equality => "equality",
                Relation::Scale { .. } => "scale",
            },
        }
    }

    /// True for constraints driven by external state (edit constraints).
    pub fn is_input(&self) -> bool {
        match &self.kind {
            ConstraintKind::Unary(u) => u.is_input(),
            ConstraintKind::Binary(_) => false,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        match &self.kind {
            ConstraintKind::Unary(u) => u.is_satisfied(),
            ConstraintKind::Binary(b) => b.is_satisfied(),
        }
    }

    /// The variable on the currently chosen output side.
    pub fn output(&self) -> VariableId {
        match &self.kind {
            ConstraintKind::Unary(u) => u.output(),
            ConstraintKind::Binary(b) => b.output(),
        }
    }

    /// Input variables for the currently chosen method.
    pub fn inputs(&self) -> VariableList {
        match &self.kind {
            ConstraintKind::Unary(_) => VariableList::new(),
            ConstraintKind::Binary(b) => b.inputs(),
        }
    }

    /// Every variable this constraint registers with.
    pub fn participants(&self) -> VariableList {
        match &self.kind {
            ConstraintKind::Unary(u) => {
                let mut vars = VariableList::new();
                vars.push(u.output());
                vars
            }
            ConstraintKind::Binary(b) => b.participants(),
        }
    }

    /// True iff every input is computed in this pass (`mark`), stay, or free.
    pub fn inputs_known(&self, variables: &Arena<Variable>, mark: Mark) -> bool {
        self.inputs().iter().all(|&v| {
            let v = &variables[v];
            v.mark == mark || v.stay || v.determined_by.is_none()
        })
    }

    pub(crate) fn mark_unsatisfied(&mut self) {
        match &mut self.kind {
            ConstraintKind::Unary(u) => u.mark_unsatisfied(),
            ConstraintKind::Binary(b) => b.mark_unsatisfied(),
        }
    }

    pub(crate) fn choose_method(&mut self, variables: &Arena<Variable>, mark: Mark) {
        let strength = self.strength;
        match &mut self.kind {
            ConstraintKind::Unary(u) => u.choose_method(strength, variables, mark),
            ConstraintKind::Binary(b) => b.choose_method(strength, variables, mark),
        }
    }

    /// Enforces the relation. Assumes the constraint is satisfied.
    pub(crate) fn execute(&self, variables: &mut Arena<Variable>) {
        match &self.kind {
            ConstraintKind::Unary(u) => u.execute(variables),
            ConstraintKind::Binary(b) => b.execute(variables),
        }
    }

    /// Recomputes walk strength and stay flag of the output, and its value
    /// when stay. Assumes the constraint is satisfied.
    pub(crate) fn recalculate(&self, variables: &mut Arena<Variable>) {
        match &self.kind {
            ConstraintKind::Unary(u) => u.recalculate(self.strength, variables),
            ConstraintKind::Binary(b) => b.recalculate(self.strength, variables),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConstraintKind::Unary(u) => write!(f, "{}({}, {})", self.name(), u.output(), self.strength),
            ConstraintKind::Binary(b) => match b.relation() {
                Relation::Equality => {
                    write!(f, "equality({}, {}, {})", b.v1(), b.v2(), self.strength)
                }
                Relation::Scale { scale, offset } => write!(
                    f,
                    "scale({} * {} + {} = {}, {})",
                    b.v1(),
                    scale,
                    offset,
                    b.v2(),
                    self.strength
                ),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(n: usize) -> (Arena<Variable>, Vec<VariableId>) {
        let mut arena = Arena::new();
        let ids = (0..n).map(|i| arena.insert(Variable::new(i as i32))).collect();
        (arena, ids)
    }

    #[test]
    fn names_and_input_flags() {
        let (_, v) = vars(4);
        assert_eq!(Constraint::stay(v[0], Strength::Default).name(), "stay");
        assert!(Constraint::edit(v[0], Strength::Preferred).is_input());
        assert!(!Constraint::stay(v[0], Strength::Default).is_input());
        assert!(!Constraint::equality(v[0], v[1], Strength::Required).is_input());
        assert_eq!(
            Constraint::scale(v[0], v[1], v[2], v[3], Strength::Required).name(),
            "scale"
        );
    }

    #[test]
    fn new_constraints_are_unsatisfied() {
        let (_, v) = vars(2);
        assert!(!Constraint::stay(v[0], Strength::Default).is_satisfied());
        assert!(!Constraint::equality(v[0], v[1], Strength::Required).is_satisfied());
    }

    #[test]
    fn unary_has_no_inputs() {
        let (variables, v) = vars(1);
        let c = Constraint::edit(v[0], Strength::Preferred);
        assert!(c.inputs().is_empty());
        assert!(c.inputs_known(&variables, 1));
        assert_eq!(c.participants().as_slice(), &[v[0]]);
    }

    #[test]
    fn inputs_known_requires_mark_stay_or_free_inputs() {
        let (mut variables, v) = vars(3);
        let mut c = Constraint::equality(v[0], v[1], Strength::Required);
        variables[v[0]].mark = 2;
        c.choose_method(&variables, 2);
        assert_eq!(c.output(), v[1]);

        // Input v0 is marked with the current pass.
        assert!(c.inputs_known(&variables, 2));

        // Determined, not stay, not marked: unknown.
        variables[v[0]].stay = false;
        variables[v[0]].determined_by = Some(
            Arena::<Constraint>::new().insert(Constraint::stay(v[2], Strength::Default)),
        );
        assert!(!c.inputs_known(&variables, 3));

        variables[v[0]].stay = true;
        assert!(c.inputs_known(&variables, 3));
    }

    #[test]
    fn mark_unsatisfied_clears_method() {
        let (variables, v) = vars(2);
        let mut c = Constraint::equality(v[0], v[1], Strength::Required);
        c.choose_method(&variables, 1);
        assert!(c.is_satisfied());
        c.mark_unsatisfied();
        assert!(!c.is_satisfied());
    }

    #[test]
    fn display_names_participants() {
        let (_, v) = vars(2);
        let text = Constraint::equality(v[0], v[1], Strength::Required).to_string();
        assert!(text.starts_with("equality("));
        assert!(text.contains("required"));
    }
}
