//! Closeness centrality with the Wasserman–Faust correction.
//!
//! For node `u` with `r` reachable nodes (itself included) at total
//! shortest-path distance `d`:
//!
//! ```text
//! closeness(u) = (r - 1) / d  ·  (r - 1) / (n - 1)
//! ```
//!
//! The second factor scales down nodes that only reach part of the graph.
//! A node that reaches nothing scores 0, as does every node of a
//! single-node graph.

use std::collections::VecDeque;

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use rgtopo_core::ClosenessDirection;
use tracing::instrument;

use crate::graph::ReactionGraph;
use crate::metrics::Measure;

/// Closeness of every node.
///
/// [`ClosenessDirection::Outward`] measures distances from the node along
/// its outgoing edges; [`ClosenessDirection::Inward`] measures distances
/// to the node along incoming edges.
#[must_use]
#[instrument(skip(g), fields(graph = g.name()))]
pub fn closeness_centrality(g: &ReactionGraph, direction: ClosenessDirection) -> Measure {
    let dir = match direction {
        ClosenessDirection::Outward => Direction::Outgoing,
        ClosenessDirection::Inward => Direction::Incoming,
    };
    let n = g.node_count();

    g.graph()
        .node_indices()
        .map(|u| {
            let (reachable, total) = bfs_distances(g, u, dir);
            (g.node_id(u).to_string(), wf_closeness(reachable, total, n))
        })
        .collect()
}

/// Number of nodes reached from `start` (itself included) and the sum of
/// their hop distances.
fn bfs_distances(g: &ReactionGraph, start: NodeIndex, dir: Direction) -> (usize, usize) {
    let graph = g.graph();
    let mut dist: Vec<Option<usize>> = vec![None; graph.node_count()];
    dist[start.index()] = Some(0);

    let mut queue = VecDeque::from([start]);
    let mut reachable = 0usize;
    let mut total = 0usize;

    while let Some(v) = queue.pop_front() {
        let dv = dist[v.index()].unwrap_or(0);
        reachable += 1;
        total += dv;
        for w in graph.neighbors_directed(v, dir) {
            if dist[w.index()].is_none() {
                dist[w.index()] = Some(dv + 1);
                queue.push_back(w);
            }
        }
    }

    (reachable, total)
}

#[allow(clippy::cast_precision_loss)]
fn wf_closeness(reachable: usize, total: usize, n: usize) -> f64 {
    if total == 0 || n <= 1 {
        return 0.0;
    }
    let r = (reachable - 1) as f64;
    (r / total as f64) * (r / (n - 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> ReactionGraph {
        ReactionGraph::from_parts("t", nodes.iter().copied(), edges.iter().copied())
            .expect("valid graph")
    }

    #[test]
    fn chain_outward() {
        // A → B → C
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let cc = closeness_centrality(&g, ClosenessDirection::Outward);

        // A reaches B (1) and C (2): 2/3 · 2/2
        assert!((cc["A"] - 2.0 / 3.0).abs() < 1e-10);
        // B reaches C (1): 1/1 · 1/2
        assert!((cc["B"] - 0.5).abs() < 1e-10);
        assert!((cc["C"] - 0.0).abs() < 1e-10, "sink reaches nothing");
    }

    #[test]
    fn chain_inward_mirrors_outward() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let cc = closeness_centrality(&g, ClosenessDirection::Inward);
        assert!((cc["C"] - 2.0 / 3.0).abs() < 1e-10);
        assert!((cc["B"] - 0.5).abs() < 1e-10);
        assert!((cc["A"] - 0.0).abs() < 1e-10);
    }

    #[test]
    fn cycle_is_uniform() {
        // A → B → C → A: every node reaches the others at 1 and 2
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let cc = closeness_centrality(&g, ClosenessDirection::Outward);
        for id in ["A", "B", "C"] {
            assert!((cc[id] - 2.0 / 3.0).abs() < 1e-10, "{id}");
        }
    }

    #[test]
    fn self_loop_only_scores_zero() {
        let g = graph(&["D"], &[("D", "D")]);
        let cc = closeness_centrality(&g, ClosenessDirection::Outward);
        assert!((cc["D"] - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn values_are_finite_and_bounded() {
        let g = graph(
            &["A", "B", "C", "D", "E"],
            &[("A", "B"), ("B", "C"), ("C", "A"), ("C", "D"), ("E", "D")],
        );
        for v in closeness_centrality(&g, ClosenessDirection::Outward).values() {
            assert!(v.is_finite());
            assert!((0.0..=1.0).contains(v));
        }
    }
}
