//! Cycle detection and transitive successor/predecessor sets.
//!
//! Self-loops are stripped before anything here looks at the graph: a
//! reaction that consumes its own product does not make a component
//! non-linear. Any other directed cycle does, and then no counts are
//! produced at all.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::NodeIndex;
use rgtopo_core::GraphError;
use tracing::{debug, instrument};

use crate::graph::ReactionGraph;

/// Successor/predecessor counts, or the reason they were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reachability {
    /// Acyclic after removing self-loops.
    Linear {
        successors: BTreeMap<String, usize>,
        predecessors: BTreeMap<String, usize>,
    },
    /// Contains a directed cycle of length two or more.
    NonLinear,
}

impl Reachability {
    #[must_use]
    pub const fn is_linear(&self) -> bool {
        matches!(self, Self::Linear { .. })
    }
}

/// `true` if `g` has a directed cycle other than a self-loop.
#[must_use]
pub fn has_cycle(g: &ReactionGraph) -> bool {
    is_cyclic_directed(g.without_self_loops().graph())
}

/// Every node reachable from `id` along outgoing edges, excluding `id`.
///
/// Only meaningful when [`has_cycle`] is `false`; on a cyclic graph the
/// result contains `id`'s whole strongly connected component.
///
/// # Errors
///
/// Returns [`GraphError::UnknownNode`] if `id` is not in `g`.
pub fn transitive_successors(g: &ReactionGraph, id: &str) -> Result<BTreeSet<String>, GraphError> {
    closure(g, id, Direction::Outgoing)
}

/// Every node that reaches `id` along outgoing edges, excluding `id`.
///
/// # Errors
///
/// Returns [`GraphError::UnknownNode`] if `id` is not in `g`.
pub fn transitive_predecessors(
    g: &ReactionGraph,
    id: &str,
) -> Result<BTreeSet<String>, GraphError> {
    closure(g, id, Direction::Incoming)
}

fn closure(g: &ReactionGraph, id: &str, dir: Direction) -> Result<BTreeSet<String>, GraphError> {
    let start = g.require(id)?;
    Ok(reach(g, start, dir)
        .into_iter()
        .map(|idx| g.node_id(idx).to_string())
        .collect())
}

/// Worklist traversal; `start` itself is never included.
fn reach(g: &ReactionGraph, start: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
    let graph = g.graph();
    let mut seen = vec![false; graph.node_count()];
    seen[start.index()] = true;

    let mut out = Vec::new();
    let mut queue = VecDeque::from([start]);
    while let Some(v) = queue.pop_front() {
        for w in graph.neighbors_directed(v, dir) {
            if !seen[w.index()] {
                seen[w.index()] = true;
                out.push(w);
                queue.push_back(w);
            }
        }
    }
    out
}

/// Successor and predecessor counts for every node of an acyclic `g`.
#[must_use]
#[instrument(skip(g), fields(graph = g.name(), nodes = g.node_count()))]
pub fn analyze_reachability(g: &ReactionGraph) -> Reachability {
    let stripped = g.without_self_loops();
    if is_cyclic_directed(stripped.graph()) {
        debug!("directed cycle found, skipping successor counts");
        return Reachability::NonLinear;
    }

    let count = |dir: Direction| -> BTreeMap<String, usize> {
        stripped
            .graph()
            .node_indices()
            .map(|idx| {
                (
                    stripped.node_id(idx).to_string(),
                    reach(&stripped, idx, dir).len(),
                )
            })
            .collect()
    };

    Reachability::Linear {
        successors: count(Direction::Outgoing),
        predecessors: count(Direction::Incoming),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> ReactionGraph {
        ReactionGraph::from_parts("t", nodes.iter().copied(), edges.iter().copied())
            .expect("valid graph")
    }

    fn set(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn triangle_is_cyclic() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        assert!(has_cycle(&g));
        assert_eq!(analyze_reachability(&g), Reachability::NonLinear);
    }

    #[test]
    fn triangle_with_self_loop_is_still_cyclic() {
        let g = graph(
            &["A", "B", "C"],
            &[("A", "B"), ("B", "C"), ("C", "A"), ("A", "A")],
        );
        assert!(has_cycle(&g));
    }

    #[test]
    fn self_loop_alone_is_acyclic() {
        let g = graph(&["A"], &[("A", "A")]);
        assert!(!has_cycle(&g));
        match analyze_reachability(&g) {
            Reachability::Linear {
                successors,
                predecessors,
            } => {
                assert_eq!(successors["A"], 0);
                assert_eq!(predecessors["A"], 0);
            }
            Reachability::NonLinear => panic!("self-loop must not be a cycle"),
        }
    }

    #[test]
    fn two_cycle_is_cyclic() {
        let g = graph(&["A", "B"], &[("A", "B"), ("B", "A")]);
        assert!(has_cycle(&g));
    }

    #[test]
    fn chain_closure() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        assert_eq!(transitive_successors(&g, "A").expect("A"), set(&["B", "C"]));
        assert_eq!(transitive_predecessors(&g, "C").expect("C"), set(&["A", "B"]));
        assert!(transitive_successors(&g, "C").expect("C").is_empty());
    }

    #[test]
    fn diamond_counts_shared_descendant_once() {
        // A → B → D, A → C → D, D → E
        let g = graph(
            &["A", "B", "C", "D", "E"],
            &[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "E")],
        );
        let Reachability::Linear {
            successors,
            predecessors,
        } = analyze_reachability(&g)
        else {
            panic!("diamond is acyclic");
        };
        assert_eq!(successors["A"], 4);
        assert_eq!(successors["B"], 2);
        assert_eq!(successors["E"], 0);
        assert_eq!(predecessors["E"], 4);
        assert_eq!(predecessors["D"], 3);
        assert_eq!(predecessors["A"], 0);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let g = graph(&["A"], &[]);
        assert_eq!(
            transitive_successors(&g, "Z"),
            Err(GraphError::UnknownNode("Z".to_string()))
        );
    }
}
