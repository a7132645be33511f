//! Frozen reaction graph.
//!
//! # Overview
//!
//! [`ReactionGraph`] wraps a [`petgraph`] directed graph whose node weights
//! are reaction ids. An edge `A → B` means "a product of A is a reactant of
//! B". Self-loops are allowed; duplicate edges collapse to one.
//!
//! ## Immutability
//!
//! The graph is frozen once built: there is no way to add or remove nodes
//! or edges through the public API. Transformations
//! ([`ReactionGraph::reversed`], [`ReactionGraph::without_self_loops`],
//! [`ReactionGraph::induced`]) return a new instance.
//!
//! ## Node-set invariant
//!
//! Every edge endpoint must be in the node list. Unlike a lenient builder
//! that auto-adds unknown endpoints, [`ReactionGraph::from_parts`] rejects
//! them with [`GraphError::MalformedInput`] so downstream measures always
//! cover exactly the declared node set.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rgtopo_core::GraphError;
use rgtopo_core::lists;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// ReactionGraph
// ---------------------------------------------------------------------------

/// A frozen directed reaction graph.
#[derive(Debug, Clone)]
pub struct ReactionGraph {
    name: String,
    graph: DiGraph<String, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl ReactionGraph {
    /// Build a graph from a node list and an edge list.
    ///
    /// Nodes keep their first-seen order (duplicates collapse). Edges are
    /// deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidNodeId`] for an id that would not survive
    /// a `save`/`load` cycle, and [`GraphError::MalformedInput`] if an edge
    /// names a node that is not in `nodes`.
    pub fn from_parts<N, S, E, A, B>(
        name: impl Into<String>,
        nodes: N,
        edges: E,
    ) -> Result<Self, GraphError>
    where
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
        E: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut graph = DiGraph::<String, ()>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        for id in nodes {
            let id = id.as_ref();
            if !is_storable_id(id) {
                return Err(GraphError::InvalidNodeId(id.to_string()));
            }
            if !node_map.contains_key(id) {
                let idx = graph.add_node(id.to_string());
                node_map.insert(id.to_string(), idx);
            }
        }

        for (source, target) in edges {
            let (source, target) = (source.as_ref(), target.as_ref());
            let lookup = |id: &str| {
                node_map
                    .get(id)
                    .copied()
                    .ok_or_else(|| GraphError::MalformedInput {
                        from: source.to_string(),
                        to: target.to_string(),
                        missing: id.to_string(),
                    })
            };
            let a = lookup(source)?;
            let b = lookup(target)?;

            // petgraph allows parallel edges; the graph is an edge set.
            if !graph.contains_edge(a, b) {
                graph.add_edge(a, b, ());
            }
        }

        Ok(Self {
            name: name.into(),
            graph,
            node_map,
        })
    }

    /// Load `node.list` and `edge.list` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if either list cannot be read or parsed, or if an
    /// edge references a node missing from `node.list`.
    #[instrument(skip(name))]
    pub fn load(dir: &Path, name: impl Into<String>) -> Result<Self> {
        let nodes = lists::read_node_list(&dir.join(lists::NODE_LIST))
            .with_context(|| format!("read node list in {}", dir.display()))?;
        let edges = lists::read_edge_list(&dir.join(lists::EDGE_LIST))
            .with_context(|| format!("read edge list in {}", dir.display()))?;

        let graph = Self::from_parts(name, nodes, edges)
            .with_context(|| format!("build graph from {}", dir.display()))?;
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph loaded"
        );
        Ok(graph)
    }

    /// Write `node.list` (graph order) and `edge.list` (sorted) into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be written.
    pub fn save(&self, dir: &Path) -> Result<()> {
        lists::write_node_list(&dir.join(lists::NODE_LIST), self.node_ids())
            .with_context(|| format!("write node list in {}", dir.display()))?;
        let edges = self.sorted_edges();
        lists::write_edge_list(&dir.join(lists::EDGE_LIST), edges.iter().copied())
            .with_context(|| format!("write edge list in {}", dir.display()))?;
        Ok(())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same graph under a different name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The underlying petgraph graph (read-only).
    #[must_use]
    pub const fn graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look up the `NodeIndex` for a reaction id.
    #[must_use]
    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Look up a reaction id, failing with [`GraphError::UnknownNode`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if `id` is not a node.
    pub fn require(&self, id: &str) -> Result<NodeIndex, GraphError> {
        self.node_index(id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }

    /// Reaction id of a node. Panics on an index from another graph.
    #[must_use]
    pub fn node_id(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Reaction ids in graph order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.raw_nodes().iter().map(|n| n.weight.as_str())
    }

    /// Edges as `(source, target)` ids, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph
            .edge_references()
            .map(|e| (self.node_id(e.source()), self.node_id(e.target())))
    }

    /// Edges sorted by `(source, target)`.
    #[must_use]
    pub fn sorted_edges(&self) -> Vec<(&str, &str)> {
        let mut edges: Vec<(&str, &str)> = self.edges().collect();
        edges.sort_unstable();
        edges
    }

    #[must_use]
    pub fn node_set(&self) -> BTreeSet<String> {
        self.node_ids().map(str::to_string).collect()
    }

    #[must_use]
    pub fn edge_set(&self) -> BTreeSet<(String, String)> {
        self.edges()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[must_use]
    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        match (self.node_index(source), self.node_index(target)) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    #[must_use]
    pub fn self_loop_count(&self) -> usize {
        self.graph
            .edge_references()
            .filter(|e| e.source() == e.target())
            .count()
    }

    /// Unnormalized in-degree per node, indexed by `NodeIndex::index()`.
    ///
    /// A self-loop counts once towards in-degree and once towards out-degree.
    #[must_use]
    pub fn in_degrees(&self) -> Vec<usize> {
        self.degrees(Direction::Incoming)
    }

    /// Unnormalized out-degree per node, indexed by `NodeIndex::index()`.
    #[must_use]
    pub fn out_degrees(&self) -> Vec<usize> {
        self.degrees(Direction::Outgoing)
    }

    fn degrees(&self, dir: Direction) -> Vec<usize> {
        let mut deg = vec![0usize; self.node_count()];
        for e in self.graph.edge_references() {
            let endpoint = match dir {
                Direction::Incoming => e.target(),
                Direction::Outgoing => e.source(),
            };
            deg[endpoint.index()] += 1;
        }
        deg
    }

    /// A copy with every edge reversed.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut graph = self.graph.clone();
        graph.reverse();
        Self {
            name: self.name.clone(),
            graph,
            node_map: self.node_map.clone(),
        }
    }

    /// A copy with self-loops removed. Node indices are preserved.
    #[must_use]
    pub fn without_self_loops(&self) -> Self {
        let graph = self.graph.filter_map(
            |_, id| Some(id.clone()),
            |eidx, _| {
                let (a, b) = self.graph.edge_endpoints(eidx)?;
                (a != b).then_some(())
            },
        );
        Self {
            name: self.name.clone(),
            graph,
            node_map: self.node_map.clone(),
        }
    }

    /// The subgraph on `nodes` (kept in this graph's order) with exactly the
    /// edges of this graph whose endpoints are both in `nodes`.
    #[must_use]
    pub fn induced(&self, name: impl Into<String>, nodes: &[NodeIndex]) -> Self {
        let mut keep = vec![false; self.node_count()];
        for n in nodes {
            keep[n.index()] = true;
        }

        let graph = self.graph.filter_map(
            |idx, id| keep[idx.index()].then(|| id.clone()),
            |_, _| Some(()),
        );
        let node_map = graph
            .node_indices()
            .map(|idx| (graph[idx].clone(), idx))
            .collect();

        Self {
            name: name.into(),
            graph,
            node_map,
        }
    }

    /// BLAKE3 hash of the sorted edge list, for change detection.
    #[must_use]
    pub fn content_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for (source, target) in self.sorted_edges() {
            hasher.update(source.as_bytes());
            hasher.update(b"\x00");
            hasher.update(target.as_bytes());
            hasher.update(b"\x00");
        }
        format!("blake3:{}", hasher.finalize())
    }
}

/// Non-empty, no surrounding whitespace, no tab or line break.
fn is_storable_id(id: &str) -> bool {
    !id.is_empty() && id.trim() == id && !id.contains(['\t', '\n', '\r'])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
