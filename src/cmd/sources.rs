//! Source registry listing (`resource-sequencer sources`).

use anyhow::Result;

use resource_sequencer::config::SequencerConfig;

pub fn cmd_sources(config: &SequencerConfig) -> Result<()> {
    let mappings = config.source_mappings();

    println!();
    if mappings.is_empty() {
        println!("No sources registered.");
        println!("Set include_defaults = true or add [sources.mappings] to sequencer.toml.");
        println!();
        return Ok(());
    }

    println!("{:<20} Node type", "Source");
    println!("{:<20} ---------", "--------------------");
    for (name, node_type) in mappings.iter() {
        println!("{:<20} {}", name, node_type);
    }
    println!();
    println!("{} sources registered", mappings.len());
    println!();
    Ok(())
}
