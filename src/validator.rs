//! Pre-flight validation of resource assignments.
//!
//! Checks run in three steps:
//!
//! 1. **Sources** - every dictionary source must be registered
//! 2. **Keys** - names and dictionary names are unique, `key-dependencies`
//!    are lists of names, and every dependency names an assignment of the
//!    same set
//! 3. **Cycles** - the dependency graph is acyclic
//!
//! All issues of a step are collected before failing. A failed key step stops
//! validation before the cycle step, since a graph over dangling or duplicated
//! keys is meaningless.

use indexmap::{IndexMap, IndexSet};
use sequencer_common::{ResourceAssignment, SourceMappings, SourceRegistry};
use tracing::{debug, warn};

use crate::dag::build_dependency_graph;
use crate::errors::{SequenceError, ValidationError, ValidationIssue};
use crate::sequencer::{self, Batch};

/// Assignment set that passed validation.
///
/// Sequencing through this type cannot hit a contract violation.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedAssignments<'a> {
    assignments: &'a [ResourceAssignment],
}

impl<'a> ValidatedAssignments<'a> {
    pub fn assignments(&self) -> &'a [ResourceAssignment] {
        self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Group the validated assignments into ordered resolution batches.
    pub fn sequence(&self) -> Result<Vec<Batch<'a>>, SequenceError> {
        sequencer::sequence(self.assignments)
    }
}

/// Validator for resource assignment sets.
#[derive(Debug, Clone)]
pub struct AssignmentValidator<R> {
    registry: R,
}

impl AssignmentValidator<SourceMappings> {
    /// A validator that accepts the built-in sources.
    pub fn with_default_sources() -> Self {
        Self::new(SourceMappings::with_defaults())
    }
}

impl<R: SourceRegistry> AssignmentValidator<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Validate an assignment set.
    ///
    /// On failure the error lists every issue found, in check order.
    pub fn validate<'a>(
        &self,
        assignments: &'a [ResourceAssignment],
    ) -> Result<ValidatedAssignments<'a>, ValidationError> {
        let mut issues = self.check_sources(assignments);

        let key_issues = check_keys(assignments);
        if !key_issues.is_empty() {
            issues.extend(key_issues);
            return Err(fail(issues));
        }

        issues.extend(check_cycles(assignments));

        if !issues.is_empty() {
            return Err(fail(issues));
        }

        debug!(count = assignments.len(), "Resource assignments validated");
        Ok(ValidatedAssignments { assignments })
    }

    fn check_sources(&self, assignments: &[ResourceAssignment]) -> Vec<ValidationIssue> {
        debug!("Validating resource assignment sources");
        assignments
            .iter()
            .filter_map(|assignment| {
                self.registry
                    .lookup(&assignment.dictionary_source)
                    .err()
                    .map(|reason| ValidationIssue::UnregisteredSource {
                        assignment: assignment.name.clone(),
                        dictionary_source: assignment.dictionary_source.clone(),
                        reason,
                    })
            })
            .collect()
    }
}

fn fail(issues: Vec<ValidationIssue>) -> ValidationError {
    let err = ValidationError::new(issues);
    warn!("{}", err);
    err
}

/// Values that occur more than once, in order of first occurrence.
fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(value, _)| value.to_string())
        .collect()
}

fn check_keys(assignments: &[ResourceAssignment]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let duplicate_names = duplicates(assignments.iter().map(|a| a.name.as_str()));
    if !duplicate_names.is_empty() {
        issues.push(ValidationIssue::DuplicateNames(duplicate_names));
    }

    let duplicate_dictionary_names =
        duplicates(assignments.iter().map(|a| a.dictionary_name.as_str()));
    if !duplicate_dictionary_names.is_empty() {
        issues.push(ValidationIssue::DuplicateDictionaryNames(
            duplicate_dictionary_names,
        ));
    }

    issues.extend(assignments.iter().filter_map(|assignment| {
        assignment
            .key_dependencies()
            .err()
            .map(|reason| ValidationIssue::MalformedKeyDependencies {
                assignment: assignment.name.clone(),
                reason,
            })
    }));

    let names: IndexSet<&str> = assignments.iter().map(|a| a.name.as_str()).collect();
    let missing: IndexSet<&str> = assignments
        .iter()
        .flat_map(|assignment| assignment.declared_dependencies())
        .filter(|dependency| !names.contains(dependency))
        .collect();
    if !missing.is_empty() {
        issues.push(ValidationIssue::MissingDependencies(
            missing.into_iter().map(str::to_string).collect(),
        ));
    }

    issues
}

fn check_cycles(assignments: &[ResourceAssignment]) -> Option<ValidationIssue> {
    let graph = match build_dependency_graph(assignments) {
        Ok(graph) => graph,
        Err(err) => return Some(ValidationIssue::Graph(err)),
    };

    if graph.is_dag() {
        return None;
    }

    Some(ValidationIssue::CyclicDependency {
        involved: graph
            .unresolved()
            .into_iter()
            .map(|a| a.name.clone())
            .collect(),
        graph: graph.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequencer_common::SourceDefinition;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn validator() -> AssignmentValidator<SourceMappings> {
        AssignmentValidator::with_default_sources()
    }

    fn with_raw_key_dependencies(
        mut assignment: ResourceAssignment,
        value: Value,
    ) -> ResourceAssignment {
        assignment
            .dictionary_source_definition
            .get_or_insert_with(|| SourceDefinition::new("source-db"))
            .properties
            .insert("key-dependencies".to_string(), value);
        assignment
    }

    #[test]
    fn test_empty_input_is_valid() {
        let validated = validator().validate(&[]).unwrap();
        assert!(validated.is_empty());
        assert!(validated.sequence().unwrap().is_empty());
    }

    #[test]
    fn test_valid_assignments() {
        let assignments = vec![
            ResourceAssignment::new("a", "db"),
            ResourceAssignment::new("b", "db").with_dependencies(&["a"]),
            ResourceAssignment::new("c", "input").with_dependencies(&["a"]),
        ];

        let validated = validator().validate(&assignments).unwrap();
        assert_eq!(validated.len(), 3);
    }

    #[test]
    fn test_two_node_cycle() {
        let assignments = vec![
            ResourceAssignment::new("x", "db").with_dependencies(&["y"]),
            ResourceAssignment::new("y", "db").with_dependencies(&["x"]),
        ];

        let err = validator().validate(&assignments).unwrap_err();
        assert!(err.has_cycle());

        let message = err.to_string();
        assert!(message.contains("Cyclic Dependency"));
        assert!(message.contains("(x:x)"));
        assert!(message.contains("(y:y)"));
    }

    #[test]
    fn test_self_loop_cycle() {
        let assignments = vec![
            ResourceAssignment::new("a", "input"),
            ResourceAssignment::new("b", "db").with_dependencies(&["b"]),
        ];

        let err = validator().validate(&assignments).unwrap_err();
        match &err.issues()[0] {
            ValidationIssue::CyclicDependency { involved, graph } => {
                assert_eq!(involved, &vec!["b".to_string()]);
                assert!(graph.contains("(b:b) -> [(b:b)]"));
                assert!(graph.contains("* -> [(a:a)]"));
            }
            other => panic!("Expected CyclicDependency, got {other:?}"),
        }
    }

    #[test]
    fn test_cycle_through_key_dependencies() {
        let assignments = vec![
            ResourceAssignment::new("a", "db").with_key_dependencies(&["b"]),
            ResourceAssignment::new("b", "db").with_dependencies(&["a"]),
        ];

        let err = validator().validate(&assignments).unwrap_err();
        assert!(err.has_cycle());
    }

    #[test]
    fn test_duplicate_names_stop_before_cycle_check() {
        let assignments = vec![
            ResourceAssignment::new("k1", "db")
                .with_dictionary_name("d1")
                .with_dependencies(&["k1"]),
            ResourceAssignment::new("k1", "db").with_dictionary_name("d2"),
        ];

        let err = validator().validate(&assignments).unwrap_err();
        assert_eq!(
            err.issues(),
            &[ValidationIssue::DuplicateNames(vec!["k1".to_string()])]
        );
        assert!(err.to_string().contains("k1"));
    }

    #[test]
    fn test_duplicate_dictionary_names() {
        let assignments = vec![
            ResourceAssignment::new("a", "db").with_dictionary_name("shared"),
            ResourceAssignment::new("b", "db").with_dictionary_name("shared"),
            ResourceAssignment::new("c", "db"),
        ];

        let err = validator().validate(&assignments).unwrap_err();
        assert_eq!(
            err.issues(),
            &[ValidationIssue::DuplicateDictionaryNames(vec![
                "shared".to_string()
            ])]
        );
    }

    #[test]
    fn test_missing_dependencies_listed_once() {
        let assignments = vec![
            ResourceAssignment::new("a", "db").with_dependencies(&["ghost", "phantom"]),
            ResourceAssignment::new("b", "db").with_dependencies(&["ghost"]),
            ResourceAssignment::new("c", "db").with_key_dependencies(&["spectre"]),
        ];

        let err = validator().validate(&assignments).unwrap_err();
        assert_eq!(
            err.issues(),
            &[ValidationIssue::MissingDependencies(vec![
                "ghost".to_string(),
                "phantom".to_string(),
                "spectre".to_string(),
            ])]
        );
    }

    #[test]
    fn test_malformed_key_dependencies_stop_before_cycle_check() {
        let assignments = vec![
            with_raw_key_dependencies(ResourceAssignment::new("a", "db"), json!([42, "ghost"])),
            with_raw_key_dependencies(ResourceAssignment::new("b", "db"), json!("a")),
            ResourceAssignment::new("x", "db").with_dependencies(&["y"]),
            ResourceAssignment::new("y", "db").with_dependencies(&["x"]),
        ];

        let err = validator().validate(&assignments).unwrap_err();
        let malformed: Vec<&str> = err
            .issues()
            .iter()
            .map(|issue| match issue {
                ValidationIssue::MalformedKeyDependencies { assignment, .. } => {
                    assignment.as_str()
                }
                other => panic!("Expected MalformedKeyDependencies, got {other:?}"),
            })
            .collect();

        assert_eq!(malformed, vec!["a", "b"]);
        assert!(!err.has_cycle());
        assert!(err.to_string().contains("Malformed key-dependencies ([42,\"ghost\"])"));
    }

    #[test]
    fn test_key_issues_are_accumulated() {
        let assignments = vec![
            ResourceAssignment::new("a", "db").with_dependencies(&["missing"]),
            ResourceAssignment::new("a", "db"),
        ];

        let err = validator().validate(&assignments).unwrap_err();
        assert_eq!(err.issues().len(), 3);
        assert!(matches!(err.issues()[0], ValidationIssue::DuplicateNames(_)));
        assert!(matches!(
            err.issues()[1],
            ValidationIssue::DuplicateDictionaryNames(_)
        ));
        assert!(matches!(
            err.issues()[2],
            ValidationIssue::MissingDependencies(_)
        ));
    }

    #[test]
    fn test_unregistered_sources_do_not_stop_processing() {
        let assignments = vec![
            ResourceAssignment::new("a", "sdnc"),
            ResourceAssignment::new("b", "vault"),
            ResourceAssignment::new("c", "input"),
        ];

        let err = validator().validate(&assignments).unwrap_err();
        let message = err.to_string();

        assert_eq!(err.issues().len(), 2);
        assert!(message.contains(
            "Failed to get node type for dictionary source(sdnc) for resource assignment(a)"
        ));
        assert!(message.contains("resource assignment(b)"));
    }

    #[test]
    fn test_source_issues_are_reported_with_cycles() {
        let assignments = vec![
            ResourceAssignment::new("x", "sdnc").with_dependencies(&["y"]),
            ResourceAssignment::new("y", "db").with_dependencies(&["x"]),
        ];

        let err = validator().validate(&assignments).unwrap_err();
        assert_eq!(err.issues().len(), 2);
        assert!(matches!(
            err.issues()[0],
            ValidationIssue::UnregisteredSource { .. }
        ));
        assert!(err.has_cycle());
    }

    #[test]
    fn test_custom_source_registry() {
        let mut registry = SourceMappings::new();
        registry.register("vault", "source-rest");
        let validator = AssignmentValidator::new(registry);

        assert!(validator.validate(&[ResourceAssignment::new("a", "vault")]).is_ok());
        assert!(validator.validate(&[ResourceAssignment::new("a", "db")]).is_err());
    }

    #[test]
    fn test_validated_assignments_sequence() {
        let assignments = vec![
            ResourceAssignment::new("a", "db"),
            ResourceAssignment::new("b", "db"),
        ];

        let batches = validator().validate(&assignments).unwrap().sequence().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].names(), vec!["a", "b"]);
    }

    #[test]
    fn test_concurrent_validation_shares_registry() {
        let validator = AssignmentValidator::new(Arc::new(SourceMappings::with_defaults()));

        let acyclic: Vec<ResourceAssignment> = (0..40)
            .map(|i| {
                let source = if i % 4 == 0 { "input" } else { "db" };
                let assignment = ResourceAssignment::new(&format!("r{i}"), source);
                if i % 3 == 0 && i > 0 {
                    assignment.with_dependencies(&[&format!("r{}", i - 1)])
                } else {
                    assignment
                }
            })
            .collect();
        let cyclic = vec![
            ResourceAssignment::new("x", "db").with_dependencies(&["z"]),
            ResourceAssignment::new("y", "db").with_dependencies(&["x"]),
            ResourceAssignment::new("z", "db").with_dependencies(&["y"]),
        ];

        fn names<R: SourceRegistry>(
            validator: &AssignmentValidator<R>,
            assignments: &[ResourceAssignment],
        ) -> Vec<Vec<String>> {
            validator
                .validate(assignments)
                .unwrap()
                .sequence()
                .unwrap()
                .iter()
                .map(|batch| batch.names().into_iter().map(str::to_string).collect())
                .collect()
        }
        let expected_batches = names(&validator, &acyclic);
        let expected_cycle = validator.validate(&cyclic).unwrap_err().to_string();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        let batches = names(&validator, &acyclic);
                        let cycle = validator.validate(&cyclic).unwrap_err().to_string();
                        (batches, cycle)
                    })
                })
                .collect();
            for handle in handles {
                let (batches, cycle) = handle.join().unwrap();
                assert_eq!(batches, expected_batches);
                assert_eq!(cycle, expected_cycle);
            }
        });
    }
}
