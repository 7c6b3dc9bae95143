//! Configuration view and validation commands (`resource-sequencer config`).

use anyhow::{Context, Result};
use std::path::Path;

use resource_sequencer::config::{CONFIG_FILE, SEQUENCER_DIR, SequencerConfig, SequencerToml};

use super::super::ConfigCommands;

pub fn cmd_config(config: &SequencerConfig, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Sequencer Configuration");
            println!("=======================");
            println!();

            if config.config_path.exists() {
                println!("Config file: {}", config.config_path.display());
            } else {
                println!("No sequencer.toml found at {}", config.config_path.display());
                println!("Using default configuration.");
            }
            println!();

            let toml = &config.toml;
            println!("[sources]");
            println!("  include_defaults = {}", toml.sources.include_defaults);
            if !toml.sources.mappings.is_empty() {
                println!();
                println!("[sources.mappings]");
                for (name, node_type) in toml.sources.mappings.iter() {
                    println!("  \"{}\" = \"{}\"", name, node_type);
                }
            }
            println!();

            println!("[logging]");
            println!("  level = \"{}\"", toml.logging.level);
            println!("  format = \"{}\"", toml.logging.format);
            println!();

            // Show effective values (including env overrides)
            println!("Effective values (with env/CLI overrides):");
            println!("  log_filter = \"{}\"", config.log_filter());
            println!("  log_format = \"{}\"", config.log_format());
            println!("  registered_sources = {}", config.source_mappings().len());
            println!();

            if !config.config_path.exists() {
                println!("Run 'resource-sequencer config init' to create a sequencer.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config.config_path.exists() {
                println!("No sequencer.toml found. Using defaults (valid).");
                return Ok(());
            }

            let warnings = config.validate();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            cmd_config_init(&config.project_dir, Some(&config.config_path))?;
        }
    }

    Ok(())
}

/// Write a default sequencer.toml unless one exists.
pub fn cmd_config_init(project_dir: &Path, config_path: Option<&Path>) -> Result<()> {
    let config_path = match config_path {
        Some(path) => path.to_path_buf(),
        None => project_dir.join(SEQUENCER_DIR).join(CONFIG_FILE),
    };

    if config_path.exists() {
        println!("sequencer.toml already exists at {}", config_path.display());
        println!("Delete it first if you want to recreate it.");
        return Ok(());
    }

    if let Some(parent) = config_path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let toml = SequencerToml::default();
    toml.save(&config_path)?;

    println!("Created sequencer.toml at {}", config_path.display());
    println!();
    println!("You can now customize:");
    println!("  - [sources] include_defaults");
    println!("  - [sources.mappings] for custom dictionary sources");
    println!("  - [logging] level, format");
    println!();

    Ok(())
}
