//! deltablue - incremental constraint satisfaction over integer variables
//!
//! Variables are related by multi-way constraints tagged with a
//! [`Strength`]. The [`Planner`] keeps a dataflow in which every variable is
//! computed by at most one constraint, adding and retracting constraints
//! incrementally, and extracts [`Plan`]s that replay the dataflow cheaply
//! when input values change.
//!
//! Stronger constraints always win over weaker ones; required constraints
//! must be satisfied or the planner reports a fatal violation.

pub mod arena;
pub mod config;
pub mod constraints;
pub mod drivers;
pub mod error;
pub mod graph;
pub mod plan;
pub mod planner;
pub mod strength;
pub mod variable;

pub use config::{Config, ConfigError, DriverConfig, PlannerConfig};
pub use constraints::{Constraint, ConstraintKind, Direction, Relation, UnaryRole};
pub use drivers::DriverError;
pub use error::{PlannerError, ViolationReason};
pub use graph::ConstraintGraph;
pub use plan::Plan;
pub use planner::{InvariantBreach, Planner};
pub use strength::Strength;
pub use variable::Variable;

/// Integer value carried by every variable.
pub type Value = i32;

/// Traversal mark; each planner pass draws a fresh one.
pub type Mark = u64;

/// Handle to a variable owned by a [`ConstraintGraph`].
pub type VariableId = arena::Handle<Variable>;

/// Handle to a constraint owned by a [`ConstraintGraph`].
pub type ConstraintId = arena::Handle<Constraint>;
