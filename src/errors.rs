//! Typed error hierarchy for the resource sequencer.
//!
//! Two top-level types cover the two entry points:
//! - `ValidationError` - aggregated validation failure of an assignment set
//! - `SequenceError` - contract violation while sequencing an assignment set

use sequencer_common::{MalformedKeyDependencies, SourceLookupError};
use thiserror::Error;

/// Render names the way the validation messages list them: `[a, b]`.
pub(crate) fn list(names: &[String]) -> String {
    format!("[{}]", names.join(", "))
}

/// A single rule violated by an assignment set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("{reason} for resource assignment({assignment})")]
    UnregisteredSource {
        assignment: String,
        dictionary_source: String,
        reason: SourceLookupError,
    },

    #[error("Duplicate Assignment Template Keys ({}) is Present", list(.0))]
    DuplicateNames(Vec<String>),

    #[error("Duplicate Assignment Dictionary Keys ({}) is Present", list(.0))]
    DuplicateDictionaryNames(Vec<String>),

    #[error("No assignments for Dictionary Keys ({})", list(.0))]
    MissingDependencies(Vec<String>),

    #[error("{reason} for resource assignment({assignment})")]
    MalformedKeyDependencies {
        assignment: String,
        reason: MalformedKeyDependencies,
    },

    #[error("Cyclic Dependency :{graph}")]
    CyclicDependency {
        /// Assignments on or downstream of the cycle
        involved: Vec<String>,
        /// Rendered adjacency of the whole dependency graph
        graph: String,
    },

    /// Graph construction rejected a set the key checks accepted.
    ///
    /// The key checks cover every `SequenceError` the builder raises, so a
    /// set reaching the cycle check builds cleanly; this variant keeps the
    /// builder's error if the two ever drift apart.
    #[error("Failed to build dependency graph: {0}")]
    Graph(SequenceError),
}

/// Validation failure carrying every issue found.
///
/// Displays as one multi-line message, one issue per line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Resource Assignment Validation :{}", render_issues(.issues))]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues.iter().map(|issue| format!("\n{issue}")).collect()
}

impl ValidationError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    /// Whether a dependency cycle was among the issues.
    pub fn has_cycle(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| matches!(issue, ValidationIssue::CyclicDependency { .. }))
    }
}

/// Errors from sequencing an assignment set that skipped or failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("Couldn't get Resource Assignment dependency Key({dependency}) of assignment({assignment})")]
    UnknownDependency { assignment: String, dependency: String },

    #[error("Duplicate Resource Assignment Key({name})")]
    DuplicateAssignment { name: String },

    #[error("{reason} for resource assignment({assignment})")]
    MalformedKeyDependencies {
        assignment: String,
        reason: MalformedKeyDependencies,
    },

    #[error("Cyclic dependency among resource assignments {}", list(.involved))]
    CyclicDependency { involved: Vec<String> },
}
