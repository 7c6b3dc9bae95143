//! Mapping validation command (`resource-sequencer validate`).

use anyhow::{Result, bail};
use console::style;
use std::path::Path;

use resource_sequencer::config::SequencerConfig;
use resource_sequencer::mapping;
use resource_sequencer::validator::AssignmentValidator;

pub fn cmd_validate(config: &SequencerConfig, target: &Path) -> Result<()> {
    let files = mapping::resolve_targets(target)?;
    let validator = AssignmentValidator::new(config.source_mappings());

    println!();
    let mut failed = 0;
    for file in &files {
        let outcome = mapping::load_assignments(file).and_then(|assignments| {
            let validated = validator.validate(&assignments)?;
            Ok(validated.len())
        });

        match outcome {
            Ok(count) => println!(
                "{} {} ({} assignments)",
                style("[OK]").green(),
                file.display(),
                count
            ),
            Err(e) => {
                failed += 1;
                println!("{} {}", style("[ERR]").red(), file.display());
                for line in format!("{:#}", e).lines() {
                    println!("      {}", line);
                }
            }
        }
    }
    println!();

    if failed > 0 {
        bail!("{} of {} mapping file(s) failed validation", failed, files.len());
    }

    println!("{} mapping file(s) valid.", files.len());
    println!();
    Ok(())
}
