//! The two canonical DeltaBlue workloads.
//!
//! - **Chain**: a long chain of required equalities with a stay on one end
//!   and an edit on the other; every edited value must reach the far end.
//! - **Projection**: pairs of variables related by a shared scale and
//!   offset; values are changed on either side and in the shared factors.
//!
//! Both double as conformance checks and return a [`DriverError`] when a
//! propagated value is wrong.

use thiserror::Error;
use tracing::info;

use crate::config::{Config, DriverConfig, PlannerConfig};
use crate::error::PlannerError;
use crate::planner::Planner;
use crate::strength::Strength;
use crate::{Value, VariableId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error(transparent)]
    Planner(#[from] PlannerError),

    #[error("{test} failed: expected {expected}, found {actual}")]
    CheckFailed {
        test: &'static str,
        expected: Value,
        actual: Value,
    },

    #[error("Projection test needs at least one variable pair")]
    EmptyProjection,
}

fn check(
    planner: &Planner,
    test: &'static str,
    v: VariableId,
    expected: Value,
) -> Result<(), DriverError> {
    let actual = planner.value(v)?;
    if actual != expected {
        return Err(DriverError::CheckFailed {
            test,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Runs the chain workload with the reference strengths and edit count.
pub fn chain_test(n: usize) -> Result<(), DriverError> {
    chain_test_with(n, &DriverConfig::default(), PlannerConfig::default())
}

/// Builds `n` required equalities over `n + 1` variables, holds the last
/// variable with a stay, edits the first, and checks that every value in
/// `0..chain_edits` arrives at the end of the chain.
pub fn chain_test_with(
    n: usize,
    drivers: &DriverConfig,
    planner_config: PlannerConfig,
) -> Result<(), DriverError> {
    let mut planner = Planner::with_config(planner_config);
    let vars: Vec<VariableId> = (0..=n).map(|_| planner.add_variable(0)).collect();

    for pair in vars.windows(2) {
        planner.add_equality(pair[0], pair[1], Strength::Required)?;
    }
    let first = vars[0];
    let last = vars[n];
    planner.add_stay(last, drivers.chain_stay_strength)?;
    let edit = planner.add_edit(first, drivers.chain_edit_strength)?;
    let plan = planner.extract_plan_from_constraints(&[edit])?;

    let edits = Value::try_from(drivers.chain_edits).unwrap_or(Value::MAX);
    for i in 0..edits {
        planner.set_value(first, i)?;
        plan.execute(&mut planner)?;
        check(&planner, "Chain test", last, i)?;
    }
    planner.destroy_constraint(edit)?;

    info!(event = "chain_test_end", n, steps = plan.len());
    Ok(())
}

/// Runs the projection workload with the default planner configuration.
pub fn projection_test(n: usize) -> Result<(), DriverError> {
    projection_test_with(n, PlannerConfig::default())
}

/// Builds `n` pairs `dst = src * scale + offset` with `scale = 10` and
/// `offset = 1000`, each `src` held by a default-strength stay, then
/// changes a source, a destination, the scale and the offset in turn.
pub fn projection_test_with(n: usize, planner_config: PlannerConfig) -> Result<(), DriverError> {
    let mut planner = Planner::with_config(planner_config);
    let scale = planner.add_variable(10);
    let offset = planner.add_variable(1000);

    let mut last = None;
    let mut dests = Vec::with_capacity(n);
    for i in 1..=n {
        let value = Value::try_from(i).unwrap_or(Value::MAX);
        let src = planner.add_variable(value);
        let dst = planner.add_variable(value);
        dests.push(dst);
        planner.add_stay(src, Strength::Default)?;
        planner.add_scale(src, scale, offset, dst, Strength::Required)?;
        last = Some((src, dst));
    }
    let Some((src, dst)) = last else {
        return Err(DriverError::EmptyProjection);
    };

    planner.change(src, 17)?;
    check(&planner, "Projection test 1", dst, 1170)?;

    planner.change(dst, 1050)?;
    check(&planner, "Projection test 2", src, 5)?;

    planner.change(scale, 5)?;
    for (i, &d) in dests.iter().enumerate().take(n - 1) {
        let expected = (i as Value + 1) * 5 + 1000;
        check(&planner, "Projection test 3", d, expected)?;
    }

    planner.change(offset, 2000)?;
    for (i, &d) in dests.iter().enumerate().take(n - 1) {
        let expected = (i as Value + 1) * 5 + 2000;
        check(&planner, "Projection test 4", d, expected)?;
    }

    info!(event = "projection_test_end", n);
    Ok(())
}

/// Runs both workloads for every configured size, as one benchmark
/// iteration of the reference suite does.
pub fn run_all(config: &Config) -> Result<(), DriverError> {
    for &n in &config.drivers.inner_iterations {
        chain_test_with(n, &config.drivers, config.planner.clone())?;
        projection_test_with(n, config.planner.clone())?;
        info!(event = "inner_iteration_end", n);
    }
    Ok(())
}
