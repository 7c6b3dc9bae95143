use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use resource_sequencer::config::SequencerConfig;

mod cmd;

#[derive(Parser)]
#[command(name = "resource-sequencer")]
#[command(version, about = "Validate and sequence blueprint resource assignments")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Path to the config file. Defaults to .sequencer/sequencer.toml in the project directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a mapping file or every mapping file of a blueprint
    Validate {
        /// Mapping file, or blueprint directory containing Templates/*-mapping.json
        target: PathBuf,
    },
    /// Print the resolution batches of a mapping file
    Sequence {
        /// Mapping file
        mapping: PathBuf,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the dependency graph of a mapping file
    Graph {
        /// Mapping file
        mapping: PathBuf,
    },
    /// List registered dictionary sources
    Sources,
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default sequencer.toml file
    Init,
}

fn main() -> Result<()> {
    // A missing .env is not an error
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    // `config init` must work even when the current file does not parse
    if let Commands::Config {
        command: Some(ConfigCommands::Init),
    } = &cli.command
    {
        return cmd::cmd_config_init(&project_dir, cli.config.as_deref());
    }

    let config = SequencerConfig::with_cli_args(project_dir, cli.config.clone(), cli.verbose)?;
    resource_sequencer::logging::init(&config.log_filter(), config.log_format())?;

    match &cli.command {
        Commands::Validate { target } => cmd::cmd_validate(&config, target)?,
        Commands::Sequence { mapping, json } => cmd::cmd_sequence(&config, mapping, *json)?,
        Commands::Graph { mapping } => cmd::cmd_graph(mapping)?,
        Commands::Sources => cmd::cmd_sources(&config)?,
        Commands::Config { command } => cmd::cmd_config(&config, command.clone())?,
    }

    Ok(())
}
