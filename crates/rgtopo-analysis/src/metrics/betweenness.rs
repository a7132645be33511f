//! Betweenness centrality via Brandes' algorithm.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted directed graphs:
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest nodes first).
//! 3. Sum the dependency scores across all source nodes.
//!
//! Complexity: O(V * E).
//!
//! # Normalization
//!
//! Scores are divided by `(n - 1)(n - 2)`, the number of ordered pairs that
//! exclude the node itself. Graphs with two or fewer nodes are left
//! unscaled; every score is 0 there anyway.

use std::collections::VecDeque;

use petgraph::{Direction, graph::NodeIndex};
use tracing::instrument;

use crate::graph::ReactionGraph;
use crate::metrics::Measure;

/// Normalized betweenness for every node of `g`.
///
/// Self-loops never lie on a shortest path and do not affect the result.
#[must_use]
#[instrument(skip(g), fields(graph = g.name(), nodes = g.node_count()))]
pub fn betweenness_centrality(g: &ReactionGraph) -> Measure {
    let raw = brandes(g);
    let scale = normalization(g.node_count());
    g.node_ids()
        .zip(raw)
        .map(|(id, score)| (id.to_string(), score * scale))
        .collect()
}

/// Unnormalized betweenness, indexed by `NodeIndex::index()`.
#[must_use]
pub fn brandes(g: &ReactionGraph) -> Vec<f64> {
    let graph = g.graph();
    let n = graph.node_count();
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in graph.node_indices() {
        let si = s.index();

        // Nodes in order of discovery (farthest popped first).
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[si] = 1.0;

        // dist[t]: distance from s to t (-1 = unvisited).
        let mut dist: Vec<i64> = vec![-1; n];
        dist[si] = 0;

        let mut queue: VecDeque<NodeIndex> = VecDeque::from([s]);

        while let Some(v) = queue.pop_front() {
            let vi = v.index();
            stack.push(v);

            for w in graph.neighbors_directed(v, Direction::Outgoing) {
                let wi = w.index();

                if dist[wi] < 0 {
                    dist[wi] = dist[vi] + 1;
                    queue.push_back(w);
                }

                if dist[wi] == dist[vi] + 1 {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(v);
                }
            }
        }

        let mut delta: Vec<f64> = vec![0.0; n];

        while let Some(w) = stack.pop() {
            let wi = w.index();

            for &v in &predecessors[wi] {
                let vi = v.index();
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }

            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    cb
}

#[allow(clippy::cast_precision_loss)]
fn normalization(n: usize) -> f64 {
    if n <= 2 {
        return 1.0;
    }
    1.0 / ((n - 1) * (n - 2)) as f64
}
