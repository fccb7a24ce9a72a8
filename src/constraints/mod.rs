//! The constraint family.
//!
//! A constraint is a tagged variant rather than a trait object: unary
//! constraints ([`UnaryConstraint`], covering stay and edit) have a single
//! possible output, binary constraints ([`BinaryConstraint`], covering
//! equality and scale) choose one of two. [`Constraint`] dispatches the
//! shared protocol to the tag-specific functions.

pub mod binary;
pub mod constraint;
pub mod unary;

pub use binary::{BinaryConstraint, Direction, Relation};
pub use constraint::{Constraint, ConstraintKind, VariableList};
pub use unary::{UnaryConstraint, UnaryRole};
