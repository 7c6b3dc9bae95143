//! Batch sequencing command (`resource-sequencer sequence`).

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use resource_sequencer::config::SequencerConfig;
use resource_sequencer::mapping;
use resource_sequencer::sequencer::Batch;
use resource_sequencer::validator::AssignmentValidator;

#[derive(Serialize)]
struct SequenceOutput<'a> {
    batches: Vec<BatchOutput<'a>>,
}

#[derive(Serialize)]
struct BatchOutput<'a> {
    source: &'a str,
    assignments: Vec<&'a str>,
}

impl<'a> From<&Batch<'a>> for BatchOutput<'a> {
    fn from(batch: &Batch<'a>) -> Self {
        Self {
            source: batch.source(),
            assignments: batch.names(),
        }
    }
}

pub fn cmd_sequence(config: &SequencerConfig, mapping_file: &Path, json: bool) -> Result<()> {
    let assignments = mapping::load_assignments(mapping_file)?;
    let validator = AssignmentValidator::new(config.source_mappings());

    let validated = validator.validate(&assignments)?;
    let batches = validated.sequence()?;

    if json {
        let output = SequenceOutput {
            batches: batches.iter().map(BatchOutput::from).collect(),
        };
        let rendered =
            serde_json::to_string_pretty(&output).context("Failed to serialize batches")?;
        println!("{}", rendered);
        return Ok(());
    }

    println!();
    println!("Batches for: {}", mapping_file.display());
    println!();
    println!("{:<6} {:<16} Assignments", "Batch", "Source");
    println!("{:<6} {:<16} -----------", "-----", "----------------");
    for (i, batch) in batches.iter().enumerate() {
        println!(
            "{:<6} {:<16} {}",
            i + 1,
            batch.source(),
            batch.names().join(", ")
        );
    }
    println!();
    println!(
        "{} assignments in {} batches",
        validated.len(),
        batches.len()
    );
    println!();
    Ok(())
}
