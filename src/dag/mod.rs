//! Dependency graphs for resource assignment ordering.
//!
//! This module provides the graph layer shared by validation and sequencing.
//! A generic directed graph answers ordering questions; the builder turns an
//! assignment set into such a graph.
//!
//! ## Architecture
//!
//! The module has two components:
//!
//! 1. **Graph** - Generic `DependencyGraph<V>` with Kahn's topological sort,
//!    cycle detection and adjacency diagnostics
//! 2. **Builder** - Derives assignment vertices and edges from declared
//!    dependencies, with a virtual root for independent assignments
//!
//! ## Example
//!
//! ```
//! use resource_sequencer::dag::DependencyGraph;
//!
//! let mut graph = DependencyGraph::new();
//! graph.add("vnf-id", "vnf-name");
//! graph.add("vnf-id", "vf-module-id");
//! graph.add("vf-module-id", "vf-module-name");
//!
//! assert!(graph.is_dag());
//! assert_eq!(
//!     graph.top_sort(),
//!     Some(vec![&"vnf-id", &"vnf-name", &"vf-module-id", &"vf-module-name"])
//! );
//! ```

mod builder;
mod graph;

pub use builder::{AssignmentGraph, AssignmentNode, build_dependency_graph};
pub use graph::{DependencyGraph, VertexId};
