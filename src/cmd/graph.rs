//! Dependency graph inspection command (`resource-sequencer graph`).

use anyhow::Result;
use console::style;
use std::path::Path;

use resource_sequencer::dag::build_dependency_graph;
use resource_sequencer::mapping;

pub fn cmd_graph(mapping_file: &Path) -> Result<()> {
    let assignments = mapping::load_assignments(mapping_file)?;
    let graph = build_dependency_graph(&assignments)?;

    println!();
    println!("Dependency graph: {}", mapping_file.display());
    println!("{}", graph);
    println!();

    let in_degree = graph.graph().in_degree();
    let out_degree = graph.graph().out_degree();

    println!("{:<40} {:<4} {:<4}", "Vertex", "In", "Out");
    println!("{:<40} {:<4} {:<4}", "-".repeat(40), "----", "----");
    for (vertex, incoming) in &in_degree {
        println!(
            "{:<40} {:<4} {:<4}",
            graph.label(vertex),
            incoming,
            out_degree.get(*vertex).copied().unwrap_or_default()
        );
    }
    println!();

    match graph.sorted() {
        Some(order) => {
            println!("DAG: {}", style("yes").green());
            let names: Vec<&str> = order.iter().map(|a| a.name.as_str()).collect();
            println!("Order: {}", names.join(", "));
        }
        None => {
            println!("DAG: {}", style("no").red());
            let unresolved = graph.unresolved();
            let names: Vec<&str> = unresolved.iter().map(|a| a.name.as_str()).collect();
            println!("Unresolved: {}", names.join(", "));
        }
    }
    println!();
    Ok(())
}
