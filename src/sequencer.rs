//! Resolution batching of resource assignments.
//!
//! The sequencer walks the assignments in dependency order and groups runs of
//! consecutive assignments that share a dictionary source into batches, so a
//! slow source (a database, a remote device) is visited once per run instead
//! of once per assignment. An assignment never joins a batch that already
//! holds one of its own dependencies, because a batch is resolved as a unit.
//!
//! Batches must be resolved strictly in order: later batches may depend on
//! values produced by earlier ones.

use serde::Serialize;
use sequencer_common::ResourceAssignment;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::dag::build_dependency_graph;
use crate::errors::SequenceError;

/// Assignments resolved together against one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Batch<'a> {
    /// Source shared by every assignment of the batch (as spelled by the first)
    source: &'a str,
    assignments: Vec<&'a ResourceAssignment>,
}

impl<'a> Batch<'a> {
    fn new(first: &'a ResourceAssignment) -> Self {
        Self {
            source: &first.dictionary_source,
            assignments: vec![first],
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn assignments(&self) -> &[&'a ResourceAssignment] {
        &self.assignments
    }

    /// Assignment names in resolution order.
    pub fn names(&self) -> Vec<&'a str> {
        self.assignments.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assignments.iter().any(|a| a.name == name)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

/// Whether two sources name the same resolver.
pub fn same_source(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Group assignments into ordered resolution batches.
///
/// Prefer [`ValidatedAssignments::sequence`](crate::validator::ValidatedAssignments::sequence);
/// called directly, this re-checks the graph and reports duplicate names,
/// unknown dependencies and cycles as [`SequenceError`].
pub fn sequence(assignments: &[ResourceAssignment]) -> Result<Vec<Batch<'_>>, SequenceError> {
    let graph = build_dependency_graph(assignments)?;

    let sorted = graph.sorted().ok_or_else(|| SequenceError::CyclicDependency {
        involved: graph
            .unresolved()
            .into_iter()
            .map(|a| a.name.clone())
            .collect(),
    })?;
    debug!(order = ?sorted.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(), "Sorted sequenced assignments");

    let batches = batch(&sorted);
    info!(
        batches = batches.len(),
        assignments = sorted.len(),
        "Batched sequence: {}",
        describe(&batches)
    );
    Ok(batches)
}

/// Split a dependency-ordered run of assignments into batches.
fn batch<'a>(sorted: &[&'a ResourceAssignment]) -> Vec<Batch<'a>> {
    let mut batches: Vec<Batch<'a>> = Vec::new();
    let mut current: Option<Batch<'a>> = None;
    let mut current_names: HashSet<&'a str> = HashSet::new();

    for (i, &assignment) in sorted.iter().enumerate() {
        let same_as_previous = i
            .checked_sub(1)
            .is_some_and(|p| same_source(&assignment.dictionary_source, &sorted[p].dictionary_source));

        let dependency_presence = assignment
            .declared_dependencies()
            .any(|dependency| current_names.contains(dependency));

        debug!(
            assignment = %assignment.name,
            batch = ?current_names,
            same_as_previous,
            dependency_presence,
            "Checking batch membership"
        );

        if same_as_previous && !dependency_presence {
            if let Some(open) = current.as_mut() {
                open.assignments.push(assignment);
                current_names.insert(assignment.name.as_str());
                continue;
            }
        }

        if let Some(closed) = current.take() {
            batches.push(closed);
        }
        current = Some(Batch::new(assignment));
        current_names.clear();
        current_names.insert(assignment.name.as_str());
    }

    batches.extend(current);
    batches
}

fn describe(batches: &[Batch<'_>]) -> String {
    batches
        .iter()
        .map(|b| format!("{}{:?}", b.source, b.names()))
        .collect::<Vec<_>>()
        .join(" -> ")
}
