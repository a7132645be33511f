//! Basic statistics for a reaction graph.
//!
//! # Statistics Provided
//!
//! - **nodes / edges**: sizes of the node and edge sets.
//! - **self_loops**: edges `u → u`.
//! - **density**: `edges / (nodes * (nodes - 1))`; 0.0 for fewer than two
//!   nodes. Self-loops are counted in `edges`, so a graph full of them can
//!   exceed 1.0.
//! - **average / max in- and out-degree**: unnormalized, self-loops count
//!   once each way.
//! - **isolated_nodes**: nodes with no edges at all.
//! - **weak_components**: weakly connected components.
//! - **content_hash**: BLAKE3 of the sorted edge list.

use std::fmt::Write as _;

use petgraph::algo::connected_components;
use serde::Serialize;

use crate::graph::build::ReactionGraph;

/// Summary statistics for one graph, written to `stats.txt`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub name: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub self_loop_count: usize,
    pub density: f64,
    pub average_in_degree: f64,
    pub average_out_degree: f64,
    pub max_in_degree: usize,
    pub max_out_degree: usize,
    pub isolated_node_count: usize,
    pub weak_component_count: usize,
    pub content_hash: String,
}

impl GraphStats {
    #[must_use]
    pub fn from_graph(g: &ReactionGraph) -> Self {
        let node_count = g.node_count();
        let edge_count = g.edge_count();
        let in_deg = g.in_degrees();
        let out_deg = g.out_degrees();

        let isolated_node_count = in_deg
            .iter()
            .zip(&out_deg)
            .filter(|&(&i, &o)| i == 0 && o == 0)
            .count();

        // connected_components treats a directed graph as undirected.
        let weak_component_count = connected_components(g.graph());

        Self {
            name: g.name().to_string(),
            node_count,
            edge_count,
            self_loop_count: g.self_loop_count(),
            density: compute_density(node_count, edge_count),
            average_in_degree: compute_mean(edge_count, node_count),
            average_out_degree: compute_mean(edge_count, node_count),
            max_in_degree: in_deg.iter().copied().max().unwrap_or(0),
            max_out_degree: out_deg.iter().copied().max().unwrap_or(0),
            isolated_node_count,
            weak_component_count,
            content_hash: g.content_hash(),
        }
    }

    /// Plain-text report in `Key: value` lines.
    #[must_use]
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Name: {}", self.name);
        let _ = writeln!(out, "Type: DiGraph");
        let _ = writeln!(out, "Number of nodes: {}", self.node_count);
        let _ = writeln!(out, "Number of edges: {}", self.edge_count);
        let _ = writeln!(out, "Number of self-loops: {}", self.self_loop_count);
        let _ = writeln!(out, "Density: {:.6}", self.density);
        let _ = writeln!(out, "Average in degree: {:.4}", self.average_in_degree);
        let _ = writeln!(out, "Average out degree: {:.4}", self.average_out_degree);
        let _ = writeln!(out, "Max in degree: {}", self.max_in_degree);
        let _ = writeln!(out, "Max out degree: {}", self.max_out_degree);
        let _ = writeln!(out, "Isolated nodes: {}", self.isolated_node_count);
        let _ = writeln!(out, "Weakly connected components: {}", self.weak_component_count);
        let _ = writeln!(out, "Content hash: {}", self.content_hash);
        out
    }
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}

#[allow(clippy::cast_precision_loss)]
fn compute_mean(total: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0_f64;
    }
    total as f64 / count as f64
}
