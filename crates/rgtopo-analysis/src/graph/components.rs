//! Connected-component decomposition.
//!
//! # Overview
//!
//! Components are found on the **undirected** interpretation of the graph
//! and then rebuilt as directed subgraphs:
//!
//! ```text
//! ReactionGraph (directed)
//!        ↓  to_undirected(): (u, v) → {u, v}, reciprocal pairs collapse
//! UnGraph
//!        ↓  BFS in node order
//! node sets (discovery order)
//!        ↓  expand pairs to both directions, keep those in the original
//! Component (directed, original edges only)
//!        ↓  stable sort by node count, descending
//! 000 (giant), 001, 002, …
//! ```
//!
//! ## Reconciliation
//!
//! Expanding an undirected pair `{u, v}` back to directed edges yields both
//! `u → v` and `v → u` even when only one existed. Those leaked reverse
//! edges are dropped by intersecting with the original edge set. The result
//! is cross-checked against plain induction on the original graph; the two
//! must agree.

use std::collections::{BTreeSet, HashSet, VecDeque};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument, warn};

use crate::graph::build::ReactionGraph;

/// One weakly connected component, rebuilt as a directed graph.
#[derive(Debug, Clone)]
pub struct Component {
    rank: usize,
    graph: ReactionGraph,
}

impl Component {
    /// Position in the size-sorted component list (0 = giant component).
    #[must_use]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// Zero-padded rank used as the directory name (`000`, `001`, …).
    #[must_use]
    pub fn label(&self) -> String {
        format_label(self.rank)
    }

    #[must_use]
    pub const fn is_giant(&self) -> bool {
        self.rank == 0
    }

    #[must_use]
    pub const fn graph(&self) -> &ReactionGraph {
        &self.graph
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }
}

/// Directory label for a component rank.
#[must_use]
pub fn format_label(rank: usize) -> String {
    format!("{rank:03}")
}

/// Undirected counterpart of `g` with matching node indices.
///
/// Each directed edge becomes one unordered pair; `u → v` and `v → u`
/// collapse into a single undirected edge.
#[must_use]
pub fn to_undirected(g: &ReactionGraph) -> UnGraph<(), ()> {
    let mut ung = UnGraph::<(), ()>::with_capacity(g.node_count(), g.edge_count());
    for _ in 0..g.node_count() {
        ung.add_node(());
    }

    let mut seen: HashSet<(usize, usize)> = HashSet::with_capacity(g.edge_count());
    for e in g.graph().edge_references() {
        let (a, b) = (e.source().index(), e.target().index());
        let pair = (a.min(b), a.max(b));
        if seen.insert(pair) {
            ung.add_edge(NodeIndex::new(pair.0), NodeIndex::new(pair.1), ());
        }
    }
    ung
}

/// Node sets of the undirected components, in discovery order.
///
/// Members of each set are sorted by node index, i.e. the original graph
/// order.
#[must_use]
pub fn undirected_components(ung: &UnGraph<(), ()>) -> Vec<Vec<NodeIndex>> {
    let mut visited = vec![false; ung.node_count()];
    let mut components = Vec::new();

    for start in ung.node_indices() {
        if visited[start.index()] {
            continue;
        }
        visited[start.index()] = true;

        let mut members = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            members.push(node);
            for neighbor in ung.neighbors(node) {
                if !visited[neighbor.index()] {
                    visited[neighbor.index()] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        members.sort_unstable();
        components.push(members);
    }

    components
}

/// Split `g` into weakly connected components, largest first.
///
/// Ties keep discovery order. Isolated nodes become single-node components
/// with no edges; a lone self-loop stays on its node.
#[must_use]
#[instrument(skip(g), fields(nodes = g.node_count(), edges = g.edge_count()))]
pub fn decompose(g: &ReactionGraph) -> Vec<Component> {
    let ung = to_undirected(g);
    let original: HashSet<(NodeIndex, NodeIndex)> = g
        .graph()
        .edge_references()
        .map(|e| (e.source(), e.target()))
        .collect();

    let members = undirected_components(&ung);
    let mut component_of = vec![0usize; g.node_count()];
    for (c, nodes) in members.iter().enumerate() {
        for n in nodes {
            component_of[n.index()] = c;
        }
    }

    // One pass over each edge set, bucketed by component.
    let mut expanded = vec![BTreeSet::new(); members.len()];
    for e in ung.edge_references() {
        let (a, b) = (e.source(), e.target());
        let bucket = &mut expanded[component_of[a.index()]];
        bucket.insert((a, b));
        bucket.insert((b, a));
    }
    let mut induced = vec![BTreeSet::new(); members.len()];
    for &(a, b) in &original {
        let c = component_of[a.index()];
        if component_of[b.index()] == c {
            induced[c].insert((a, b));
        }
    }

    let mut graphs: Vec<ReactionGraph> = members
        .iter()
        .zip(expanded)
        .zip(induced)
        .map(|((nodes, expanded), induced)| {
            rebuild_directed(g, &original, nodes, expanded, &induced)
        })
        .collect();

    // stable: equal sizes keep discovery order
    graphs.sort_by(|a, b| b.node_count().cmp(&a.node_count()));

    let components: Vec<Component> = graphs
        .into_iter()
        .enumerate()
        .map(|(rank, graph)| Component {
            rank,
            graph: graph.with_name(format_label(rank)),
        })
        .collect();

    debug!(components = components.len(), "decomposition complete");
    components
}

/// Directed subgraph on `members` from its undirected pairs (both
/// directions) reconciled against `original`, cross-checked with `induced`.
fn rebuild_directed(
    g: &ReactionGraph,
    original: &HashSet<(NodeIndex, NodeIndex)>,
    members: &[NodeIndex],
    expanded: BTreeSet<(NodeIndex, NodeIndex)>,
    induced: &BTreeSet<(NodeIndex, NodeIndex)>,
) -> ReactionGraph {
    let (reconciled, leaked) = reconcile(expanded, original);
    if leaked > 0 {
        debug!(leaked, "dropped reverse edges absent from the original graph");
    }
    if *induced != reconciled {
        warn!(
            induced = induced.len(),
            reconciled = reconciled.len(),
            "component edge sets disagree; using reconciled set"
        );
    }

    let nodes = members.iter().map(|&idx| g.node_id(idx));
    let edges = reconciled
        .iter()
        .map(|&(a, b)| (g.node_id(a), g.node_id(b)));

    // Every endpoint is a member by construction, so this cannot fail; fall
    // back to plain induction rather than panic if it ever does.
    ReactionGraph::from_parts(g.name(), nodes, edges)
        .unwrap_or_else(|_| g.induced(g.name(), members))
}

/// Keep only edges present in `original`. Returns the kept set and the
/// number of edges dropped.
#[must_use]
pub fn reconcile(
    candidates: BTreeSet<(NodeIndex, NodeIndex)>,
    original: &HashSet<(NodeIndex, NodeIndex)>,
) -> (BTreeSet<(NodeIndex, NodeIndex)>, usize) {
    let total = candidates.len();
    let kept: BTreeSet<_> = candidates
        .into_iter()
        .filter(|e| original.contains(e))
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}
