//! Generic directed graph with cycle detection and topological ordering.
//!
//! Vertices live in an arena and are addressed by [`VertexId`]; edges are kept
//! as per-vertex successor lists of ids. Insertion order is preserved
//! everywhere, so every ordering and diagnostic map is deterministic for a
//! given sequence of `add` calls.

use anyhow::{Result, bail};
use indexmap::{IndexMap, IndexSet};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

/// Index of a vertex in the graph arena.
pub type VertexId = usize;

/// A directed graph over vertices of type `V`.
///
/// An edge `from -> to` means `from` must come before `to`.
#[derive(Debug, Clone)]
pub struct DependencyGraph<V> {
    /// Vertices indexed by their id
    vertices: Vec<V>,
    /// Map from vertex to its id
    index_map: HashMap<V, VertexId>,
    /// Forward edges: id -> ids that depend on it, in edge insertion order
    successors: Vec<IndexSet<VertexId>>,
}

impl<V> Default for DependencyGraph<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            index_map: HashMap::new(),
            successors: Vec::new(),
        }
    }
}

impl<V: Clone + Eq + Hash> DependencyGraph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex. Nothing happens if it is already present.
    pub fn add_vertex(&mut self, vertex: V) -> VertexId {
        if let Some(&id) = self.index_map.get(&vertex) {
            return id;
        }
        let id = self.vertices.len();
        self.vertices.push(vertex.clone());
        self.index_map.insert(vertex, id);
        self.successors.push(IndexSet::new());
        id
    }

    /// Add the edge `from -> to`, inserting either vertex if new.
    ///
    /// Repeating an existing edge is a no-op. Self-loops are recorded.
    pub fn add(&mut self, from: V, to: V) {
        let from = self.add_vertex(from);
        let to = self.add_vertex(to);
        self.successors[from].insert(to);
    }

    /// Remove the edge `from -> to`. Returns whether an edge was removed.
    pub fn remove(&mut self, from: &V, to: &V) -> Result<bool> {
        let (Some(&from), Some(&to)) = (self.index_map.get(from), self.index_map.get(to)) else {
            bail!("Nonexistent vertex");
        };
        Ok(self.successors[from].shift_remove(&to))
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.index_map.contains_key(vertex)
    }

    pub fn id_of(&self, vertex: &V) -> Option<VertexId> {
        self.index_map.get(vertex).copied()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&V> {
        self.vertices.get(id)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> &[V] {
        &self.vertices
    }

    /// Direct successors of a vertex, in edge insertion order.
    pub fn successors(&self, vertex: &V) -> Vec<&V> {
        self.id_of(vertex)
            .map(|id| self.successors[id].iter().map(|&s| &self.vertices[s]).collect())
            .unwrap_or_default()
    }

    /// Each vertex mapped to its direct successors.
    pub fn neighbors(&self) -> IndexMap<&V, Vec<&V>> {
        self.vertices
            .iter()
            .zip(&self.successors)
            .map(|(vertex, edges)| (vertex, edges.iter().map(|&s| &self.vertices[s]).collect()))
            .collect()
    }

    /// Number of outgoing edges per vertex.
    pub fn out_degree(&self) -> IndexMap<&V, usize> {
        self.vertices
            .iter()
            .zip(&self.successors)
            .map(|(vertex, edges)| (vertex, edges.len()))
            .collect()
    }

    /// Number of incoming edges per vertex.
    pub fn in_degree(&self) -> IndexMap<&V, usize> {
        self.in_degrees()
            .into_iter()
            .enumerate()
            .map(|(id, degree)| (&self.vertices[id], degree))
            .collect()
    }

    fn in_degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.vertices.len()];
        for edges in &self.successors {
            for &to in edges {
                degrees[to] += 1;
            }
        }
        degrees
    }

    /// Run Kahn's algorithm.
    ///
    /// Among the vertices that are ready, the one inserted first is emitted
    /// first. Returns the emitted order and the remaining in-degrees.
    fn kahn(&self) -> (Vec<VertexId>, Vec<usize>) {
        let mut in_degree = self.in_degrees();

        let mut ready: BinaryHeap<Reverse<VertexId>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, deg)| *deg == 0)
            .map(|(id, _)| Reverse(id))
            .collect();

        let mut order = Vec::with_capacity(self.vertices.len());

        while let Some(Reverse(vertex)) = ready.pop() {
            order.push(vertex);

            for &successor in &self.successors[vertex] {
                in_degree[successor] -= 1;
                if in_degree[successor] == 0 {
                    ready.push(Reverse(successor));
                }
            }
        }

        (order, in_degree)
    }

    /// A topological order of all vertices, or `None` if the graph has a cycle.
    pub fn top_sort(&self) -> Option<Vec<&V>> {
        let (order, _) = self.kahn();
        if order.len() != self.vertices.len() {
            return None;
        }
        Some(order.into_iter().map(|id| &self.vertices[id]).collect())
    }

    /// True iff the graph contains no directed cycle.
    pub fn is_dag(&self) -> bool {
        self.kahn().0.len() == self.vertices.len()
    }

    /// Vertices that cannot be ordered: members of a cycle and everything
    /// reachable from one. Empty for a DAG.
    pub fn unresolved(&self) -> Vec<&V> {
        let (_, in_degree) = self.kahn();
        in_degree
            .iter()
            .enumerate()
            .filter(|&(_, deg)| *deg > 0)
            .map(|(id, _)| &self.vertices[id])
            .collect()
    }

    /// Breadth-first hop distance from `start` to every vertex.
    ///
    /// Unreachable vertices map to `None`. Returns `None` if `start` is not
    /// in the graph.
    pub fn bfs_distance(&self, start: &V) -> Option<IndexMap<&V, Option<usize>>> {
        let start = self.id_of(start)?;
        let mut distance: Vec<Option<usize>> = vec![None; self.vertices.len()];
        distance[start] = Some(0);

        let mut queue = VecDeque::from([start]);
        while let Some(vertex) = queue.pop_front() {
            let hops = distance[vertex].unwrap_or_default();
            for &successor in &self.successors[vertex] {
                if distance[successor].is_none() {
                    distance[successor] = Some(hops + 1);
                    queue.push_back(successor);
                }
            }
        }

        Some(
            self.vertices
                .iter()
                .zip(distance)
                .collect(),
        )
    }
}

impl<V: fmt::Display> fmt::Display for DependencyGraph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (vertex, edges) in self.vertices.iter().zip(&self.successors) {
            write!(f, "\n    {} -> [", vertex)?;
            for (i, &successor) in edges.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.vertices[successor])?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
