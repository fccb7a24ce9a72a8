//! Walks through a small projection by hand, printing the dataflow after
//! each change.
//!
//! ```text
//! cargo run --example projection_demo
//! ```

use deltablue::{Planner, Strength, VariableId};
use tracing_subscriber::EnvFilter;

fn print_pairs(planner: &Planner, pairs: &[(VariableId, VariableId)]) {
    for (i, &(src, dst)) in pairs.iter().enumerate() {
        let src_value = planner.value(src).unwrap_or_default();
        let dst_value = planner.value(dst).unwrap_or_default();
        let flow = match planner.variable(src).and_then(|v| v.determined_by()) {
            Some(_) => "<-",
            None => "->",
        };
        println!("  pair {i}: src = {src_value:>5} {flow} dst = {dst_value:>5}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut planner = Planner::new();
    let scale = planner.add_variable(10);
    let offset = planner.add_variable(1000);

    let mut pairs = Vec::new();
    for i in 1..=3 {
        let src = planner.add_variable(i);
        let dst = planner.add_variable(i);
        planner.add_stay(src, Strength::Default)?;
        planner.add_scale(src, scale, offset, dst, Strength::Required)?;
        pairs.push((src, dst));
    }

    println!("dst = src * scale + offset, scale = 10, offset = 1000");
    print_pairs(&planner, &pairs);

    let (src, dst) = pairs[2];
    println!("\nchange src of pair 2 to 17");
    planner.change(src, 17)?;
    print_pairs(&planner, &pairs);

    println!("\nchange dst of pair 2 to 1050");
    planner.change(dst, 1050)?;
    print_pairs(&planner, &pairs);

    println!("\nchange scale to 5");
    planner.change(scale, 5)?;
    print_pairs(&planner, &pairs);

    println!("\nchange offset to 2000");
    planner.change(offset, 2000)?;
    print_pairs(&planner, &pairs);

    planner.check_invariants()?;
    println!(
        "\n{} variables, {} constraints, dataflow consistent",
        planner.variable_count(),
        planner.constraint_count()
    );
    Ok(())
}
