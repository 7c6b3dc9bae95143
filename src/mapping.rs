//! Resource assignment mapping files.
//!
//! A blueprint keeps one JSON mapping file per template under `Templates/`,
//! named `<template>-mapping.json`. Each file is an array of assignment
//! objects with kebab-case keys.

use anyhow::{Context, Result, bail};
use glob::glob;
use sequencer_common::ResourceAssignment;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Blueprint subdirectory holding mapping files.
pub const TEMPLATES_DIR: &str = "Templates";
/// Suffix shared by mapping file names.
pub const MAPPING_SUFFIX: &str = "-mapping.json";

/// Parse a mapping document.
pub fn parse_assignments(content: &str) -> Result<Vec<ResourceAssignment>> {
    serde_json::from_str(content).context("Failed to parse resource assignment mapping")
}

/// Load the assignments of one mapping file.
pub fn load_assignments(path: &Path) -> Result<Vec<ResourceAssignment>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read mapping file: {}", path.display()))?;

    let assignments = parse_assignments(&content)
        .with_context(|| format!("Invalid mapping file: {}", path.display()))?;
    debug!(path = %path.display(), count = assignments.len(), "Loaded resource assignments");
    Ok(assignments)
}

/// Find every `Templates/*-mapping.json` file of a blueprint, sorted by path.
pub fn discover_mapping_files(blueprint_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = blueprint_dir
        .join(TEMPLATES_DIR)
        .join(format!("*{}", MAPPING_SUFFIX));
    let pattern = pattern.to_string_lossy();

    let mut files: Vec<PathBuf> = glob(&pattern)
        .context("Failed to read glob pattern")?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    debug!(blueprint = %blueprint_dir.display(), count = files.len(), "Discovered mapping files");
    Ok(files)
}

/// Expand a command-line target into mapping files.
///
/// A file is taken as-is; a directory is searched as a blueprint.
pub fn resolve_targets(target: &Path) -> Result<Vec<PathBuf>> {
    if target.is_dir() {
        let files = discover_mapping_files(target)?;
        if files.is_empty() {
            bail!(
                "No mapping files found under {}",
                target.join(TEMPLATES_DIR).display()
            );
        }
        Ok(files)
    } else if target.is_file() {
        Ok(vec![target.to_path_buf()])
    } else {
        bail!("Mapping file or blueprint directory not found: {}", target.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MAPPING: &str = r#"[
  {
    "name": "vnf-id",
    "input-param": true,
    "property": { "type": "string", "required": true },
    "dictionary-name": "vnf-id",
    "dictionary-source": "input",
    "dependencies": []
  },
  {
    "name": "vnf-name",
    "input-param": false,
    "property": { "type": "string" },
    "dictionary-name": "vnf_name",
    "dictionary-source": "db",
    "dependencies": ["vnf-id"],
    "dictionary-source-definition": {
      "type": "source-db",
      "properties": { "key-dependencies": ["vnf-id"] }
    }
  }
]"#;

    #[test]
    fn test_parse_assignments() {
        let assignments = parse_assignments(MAPPING).unwrap();

        assert_eq!(assignments.len(), 2);
        assert!(assignments[0].input_param);
        assert_eq!(assignments[1].dictionary_name, "vnf_name");
        assert_eq!(assignments[1].dependencies, vec!["vnf-id"]);
        assert_eq!(assignments[1].key_dependencies(), Ok(Some(vec!["vnf-id"])));
    }

    #[test]
    fn test_parse_invalid_mapping() {
        let err = parse_assignments("{ \"name\": \"not-an-array\" }").unwrap_err();
        assert!(err.to_string().contains("Failed to parse resource assignment mapping"));
    }

    #[test]
    fn test_load_assignments() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("base-mapping.json");
        fs::write(&path, MAPPING).unwrap();

        let assignments = load_assignments(&path).unwrap();
        assert_eq!(assignments[0].name, "vnf-id");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_assignments(&dir.path().join("none-mapping.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read mapping file"));
    }

    #[test]
    fn test_discover_mapping_files_sorted() {
        let dir = tempdir().unwrap();
        let templates = dir.path().join(TEMPLATES_DIR);
        fs::create_dir_all(&templates).unwrap();
        fs::write(templates.join("vf-module-mapping.json"), "[]").unwrap();
        fs::write(templates.join("base-mapping.json"), "[]").unwrap();
        fs::write(templates.join("base-template.vtl"), "").unwrap();

        let files = discover_mapping_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["base-mapping.json", "vf-module-mapping.json"]);
    }

    #[test]
    fn test_resolve_targets() {
        let dir = tempdir().unwrap();
        let templates = dir.path().join(TEMPLATES_DIR);
        fs::create_dir_all(&templates).unwrap();
        let file = templates.join("base-mapping.json");
        fs::write(&file, "[]").unwrap();

        assert_eq!(resolve_targets(&file).unwrap(), vec![file.clone()]);
        assert_eq!(resolve_targets(dir.path()).unwrap(), vec![file]);
        assert!(resolve_targets(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_resolve_targets_empty_blueprint() {
        let dir = tempdir().unwrap();
        let err = resolve_targets(dir.path()).unwrap_err();
        assert!(err.to_string().contains("No mapping files found"));
    }
}
