//! Normalized degree centrality.
//!
//! `in_degree / (n - 1)`, `out_degree / (n - 1)` and their sum. A
//! single-node graph scores 0 for every variant, self-loop or not.

use crate::graph::ReactionGraph;
use crate::metrics::Measure;

#[must_use]
pub fn in_degree_centrality(g: &ReactionGraph) -> Measure {
    normalized(g, &g.in_degrees())
}

#[must_use]
pub fn out_degree_centrality(g: &ReactionGraph) -> Measure {
    normalized(g, &g.out_degrees())
}

/// `(in + out) / (n - 1)`. A self-loop contributes 2.
#[must_use]
pub fn degree_centrality(g: &ReactionGraph) -> Measure {
    let total: Vec<usize> = g
        .in_degrees()
        .into_iter()
        .zip(g.out_degrees())
        .map(|(i, o)| i + o)
        .collect();
    normalized(g, &total)
}

#[allow(clippy::cast_precision_loss)]
fn normalized(g: &ReactionGraph, degrees: &[usize]) -> Measure {
    let n = g.node_count();
    let scale = if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };
    g.node_ids()
        .zip(degrees)
        .map(|(id, &d)| (id.to_string(), d as f64 * scale))
        .collect()
}
