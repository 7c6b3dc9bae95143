//! Configuration for the resource sequencer.
//!
//! Settings are read from `.sequencer/sequencer.toml` in the project directory
//! (or an explicit path) and layered as file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [sources]
//! include_defaults = true
//!
//! [sources.mappings]
//! "vault" = "source-rest"
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sequencer_common::SourceMappings;
use std::path::{Path, PathBuf};

use crate::logging;

/// Directory holding sequencer state under the project directory.
pub const SEQUENCER_DIR: &str = ".sequencer";
/// Configuration file name inside [`SEQUENCER_DIR`].
pub const CONFIG_FILE: &str = "sequencer.toml";

/// Filter directive variables, highest precedence first.
pub const LOG_ENV_VARS: [&str; 2] = ["RUST_LOG", "SEQUENCER_LOG"];
pub const LOG_FORMAT_ENV_VAR: &str = "SEQUENCER_LOG_FORMAT";

/// Output format of log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines (default)
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Invalid log format '{}'. Valid values: pretty, json", s),
        }
    }
}

/// Dictionary source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesSection {
    /// Register the built-in sources (input, default, db, rest, ...)
    #[serde(default = "default_include_defaults")]
    pub include_defaults: bool,
    /// Extra source name -> node type registrations
    #[serde(default)]
    pub mappings: SourceMappings,
}

fn default_include_defaults() -> bool {
    true
}

impl Default for SourcesSection {
    fn default() -> Self {
        Self {
            include_defaults: default_include_defaults(),
            mappings: SourceMappings::new(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Filter directive used when no environment variable is set
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    LogFormat::default().to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// The complete sequencer.toml configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SequencerToml {
    /// Source registry settings
    #[serde(default)]
    pub sources: SourcesSection,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSection,
}

impl SequencerToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse sequencer.toml")
    }

    /// Load configuration from `<sequencer_dir>/sequencer.toml`.
    /// Returns default configuration if the file doesn't exist.
    pub fn load_or_default(sequencer_dir: &Path) -> Result<Self> {
        let config_path = sequencer_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize sequencer.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// The registry described by the `[sources]` section.
    pub fn source_mappings(&self) -> SourceMappings {
        let mut mappings = if self.sources.include_defaults {
            SourceMappings::with_defaults()
        } else {
            SourceMappings::new()
        };
        mappings.extend(&self.sources.mappings);
        mappings
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Err(e) = self.logging.format.parse::<LogFormat>() {
            warnings.push(e.to_string());
        }

        if logging::env_filter(&self.logging.level).is_err() {
            warnings.push(format!(
                "Invalid logging level '{}': should be a level (e.g., 'info') or filter directive",
                self.logging.level
            ));
        }

        for (name, node_type) in self.sources.mappings.iter() {
            if name.trim().is_empty() {
                warnings.push(format!("Empty source name mapped to '{}'", node_type));
            }
            if node_type.trim().is_empty() {
                warnings.push(format!("Source '{}' has an empty node type", name));
            }
        }

        if !self.sources.include_defaults && self.sources.mappings.is_empty() {
            warnings.push(
                "No sources registered: every assignment will fail source validation".to_string(),
            );
        }

        warnings
    }
}

/// Effective configuration for one invocation.
///
/// It merges settings from:
/// 1. sequencer.toml file
/// 2. Environment variables
/// 3. CLI arguments
#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// Path to the project directory
    pub project_dir: PathBuf,
    /// Path of the configuration file (may not exist)
    pub config_path: PathBuf,
    /// Parsed sequencer.toml configuration
    pub toml: SequencerToml,
    /// CLI override: verbose mode
    pub verbose: bool,
}

impl SequencerConfig {
    /// Create a SequencerConfig from a project directory.
    pub fn new(project_dir: PathBuf) -> Result<Self> {
        Self::with_cli_args(project_dir, None, false)
    }

    /// Create SequencerConfig with CLI overrides.
    ///
    /// An explicit `config_path` must exist; the default location may be absent.
    pub fn with_cli_args(
        project_dir: PathBuf,
        config_path: Option<PathBuf>,
        verbose: bool,
    ) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;

        let (config_path, toml) = match config_path {
            Some(path) => {
                let toml = SequencerToml::load(&path)?;
                (path, toml)
            }
            None => {
                let sequencer_dir = project_dir.join(SEQUENCER_DIR);
                let toml = SequencerToml::load_or_default(&sequencer_dir)?;
                (sequencer_dir.join(CONFIG_FILE), toml)
            }
        };

        Ok(Self {
            project_dir,
            config_path,
            toml,
            verbose,
        })
    }

    /// Get path to the .sequencer directory.
    pub fn sequencer_dir(&self) -> PathBuf {
        self.project_dir.join(SEQUENCER_DIR)
    }

    /// Registered sources.
    pub fn source_mappings(&self) -> SourceMappings {
        self.toml.source_mappings()
    }

    /// Filter directive (RUST_LOG → SEQUENCER_LOG → --verbose → file).
    pub fn log_filter(&self) -> String {
        LOG_ENV_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| {
                if self.verbose {
                    "debug".to_string()
                } else {
                    self.toml.logging.level.clone()
                }
            })
    }

    /// Log format (SEQUENCER_LOG_FORMAT → file → pretty).
    ///
    /// Unknown values fall back to pretty; `config validate` reports them.
    pub fn log_format(&self) -> LogFormat {
        std::env::var(LOG_FORMAT_ENV_VAR)
            .ok()
            .and_then(|v| v.parse().ok())
            .or_else(|| self.toml.logging.format.parse().ok())
            .unwrap_or_default()
    }

    /// Validate configuration and return warnings.
    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}
