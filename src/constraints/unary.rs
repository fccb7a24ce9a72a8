//! Constraints with a single possible output variable.

use crate::arena::Arena;
use crate::strength::Strength;
use crate::variable::Variable;
use crate::{Mark, VariableId};

/// What a unary constraint stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryRole {
    /// Holds the variable at its current value.
    Stay,
    /// Marks the variable as driven by imperative client code.
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnaryConstraint {
    output: VariableId,
    role: UnaryRole,
    satisfied: bool,
}

impl UnaryConstraint {
    pub(crate) fn new(output: VariableId, role: UnaryRole) -> Self {
        Self {
            output,
            role,
            satisfied: false,
        }
    }

    pub fn output(&self) -> VariableId {
        self.output
    }

    pub fn role(&self) -> UnaryRole {
        self.role
    }

    pub fn is_satisfied(&self) -> bool {
        self.satisfied
    }

    /// Edit constraints are the only input constraints.
    pub fn is_input(&self) -> bool {
        self.role == UnaryRole::Edit
    }

    pub(crate) fn mark_unsatisfied(&mut self) {
        self.satisfied = false;
    }

    /// Satisfiable iff the output is not fixed in this pass and is currently
    /// held by something weaker. Never overrides through a chain.
    pub(crate) fn choose_method(
        &mut self,
        strength: Strength,
        variables: &Arena<Variable>,
        mark: Mark,
    ) {
        let out = &variables[self.output];
        self.satisfied = out.mark != mark && strength.stronger_than(out.walk_strength);
    }

    /// Stay and edit constraints compute nothing; an edited value is
    /// assigned from outside.
    pub(crate) fn execute(&self, _variables: &mut Arena<Variable>) {}

    pub(crate) fn recalculate(&self, strength: Strength, variables: &mut Arena<Variable>) {
        let out = &mut variables[self.output];
        out.walk_strength = strength;
        out.stay = !self.is_input();
        if out.stay {
            self.execute(variables);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Arena<Variable>, VariableId) {
        let mut variables = Arena::new();
        let v = variables.insert(Variable::new(3));
        (variables, v)
    }

    #[test]
    fn chooses_when_stronger_than_walk_strength() {
        let (mut variables, v) = setup();
        variables[v].walk_strength = Strength::Default;
        let mut stay = UnaryConstraint::new(v, UnaryRole::Stay);

        stay.choose_method(Strength::StrongDefault, &variables, 5);
        assert!(stay.is_satisfied());

        stay.choose_method(Strength::WeakDefault, &variables, 5);
        assert!(!stay.is_satisfied());
    }

    #[test]
    fn marked_output_is_never_chosen() {
        let (mut variables, v) = setup();
        variables[v].mark = 9;
        let mut edit = UnaryConstraint::new(v, UnaryRole::Edit);

        edit.choose_method(Strength::Required, &variables, 9);
        assert!(!edit.is_satisfied());
    }

    #[test]
    fn recalculate_sets_walk_strength_and_stay() {
        let (mut variables, v) = setup();
        variables[v].stay = false;

        UnaryConstraint::new(v, UnaryRole::Stay).recalculate(Strength::Default, &mut variables);
        assert_eq!(variables[v].walk_strength, Strength::Default);
        assert!(variables[v].stay);

        UnaryConstraint::new(v, UnaryRole::Edit).recalculate(Strength::Preferred, &mut variables);
        assert_eq!(variables[v].walk_strength, Strength::Preferred);
        assert!(!variables[v].stay);
        assert_eq!(variables[v].value, 3);
    }

    #[test]
    fn only_edit_is_input() {
        let (_, v) = setup();
        assert!(UnaryConstraint::new(v, UnaryRole::Edit).is_input());
        assert!(!UnaryConstraint::new(v, UnaryRole::Stay).is_input());
    }
}
