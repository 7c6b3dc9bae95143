//! Dependency graph construction from resource assignments.
//!
//! Both the validator and the sequencer work on the graph built here. Each
//! assignment becomes one vertex whose id is its position in the input slice;
//! assignments without dependencies hang off a virtual root vertex.

use sequencer_common::ResourceAssignment;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::dag::graph::DependencyGraph;
use crate::errors::SequenceError;

/// A vertex of the assignment dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentNode {
    /// Virtual predecessor of every assignment that declares no dependency
    Root,
    /// Index into the assignment slice
    Assignment(usize),
}

/// Dependency graph over a borrowed slice of assignments.
#[derive(Debug)]
pub struct AssignmentGraph<'a> {
    assignments: &'a [ResourceAssignment],
    graph: DependencyGraph<AssignmentNode>,
}

impl<'a> AssignmentGraph<'a> {
    /// The underlying generic graph.
    pub fn graph(&self) -> &DependencyGraph<AssignmentNode> {
        &self.graph
    }

    /// The assignment behind a vertex; `None` for the root.
    pub fn assignment(&self, node: &AssignmentNode) -> Option<&'a ResourceAssignment> {
        match *node {
            AssignmentNode::Root => None,
            AssignmentNode::Assignment(index) => self.assignments.get(index),
        }
    }

    pub fn is_dag(&self) -> bool {
        self.graph.is_dag()
    }

    /// Assignments in dependency order, or `None` if the graph has a cycle.
    pub fn sorted(&self) -> Option<Vec<&'a ResourceAssignment>> {
        let order = self.graph.top_sort()?;
        Some(order.into_iter().filter_map(|node| self.assignment(node)).collect())
    }

    /// Assignments that sit on, or downstream of, a dependency cycle.
    pub fn unresolved(&self) -> Vec<&'a ResourceAssignment> {
        self.graph
            .unresolved()
            .into_iter()
            .filter_map(|node| self.assignment(node))
            .collect()
    }

    /// Display label of a vertex: `*` for the root, `(dictionary:name)` otherwise.
    pub fn label(&self, node: &AssignmentNode) -> String {
        match self.assignment(node) {
            Some(assignment) => format!("({}:{})", assignment.dictionary_name, assignment.name),
            None => "*".to_string(),
        }
    }
}

impl fmt::Display for AssignmentGraph<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (vertex, successors) in self.graph.neighbors() {
            let successors: Vec<String> = successors.into_iter().map(|s| self.label(s)).collect();
            write!(f, "\n    {} -> [{}]", self.label(vertex), successors.join(", "))?;
        }
        Ok(())
    }
}

/// Build the dependency graph of a set of assignments.
///
/// Edge sources of an assignment are its `key-dependencies` when declared,
/// else its `dependencies`, else the root. Fails on duplicate names, on
/// `key-dependencies` that are not a list of names and on dependencies that
/// name no assignment.
pub fn build_dependency_graph(
    assignments: &[ResourceAssignment],
) -> Result<AssignmentGraph<'_>, SequenceError> {
    let mut index_map: HashMap<&str, usize> = HashMap::with_capacity(assignments.len());
    for (i, assignment) in assignments.iter().enumerate() {
        if index_map.insert(assignment.name.as_str(), i).is_some() {
            return Err(SequenceError::DuplicateAssignment {
                name: assignment.name.clone(),
            });
        }
    }

    let mut graph = DependencyGraph::new();
    for i in 0..assignments.len() {
        graph.add_vertex(AssignmentNode::Assignment(i));
    }

    for (to, assignment) in assignments.iter().enumerate() {
        let dependencies = assignment.edge_dependencies().map_err(|reason| {
            SequenceError::MalformedKeyDependencies {
                assignment: assignment.name.clone(),
                reason,
            }
        })?;
        if dependencies.is_empty() {
            debug!(to = %assignment.name, "Topological graph link from root");
            graph.add(AssignmentNode::Root, AssignmentNode::Assignment(to));
            continue;
        }

        for dependency in dependencies {
            let from = *index_map.get(dependency).ok_or_else(|| {
                SequenceError::UnknownDependency {
                    assignment: assignment.name.clone(),
                    dependency: dependency.to_string(),
                }
            })?;
            debug!(from = dependency, to = %assignment.name, "Topological graph link");
            graph.add(AssignmentNode::Assignment(from), AssignmentNode::Assignment(to));
        }
    }

    Ok(AssignmentGraph { assignments, graph })
}
