//! Degree-based node roles.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::graph::ReactionGraph;
use crate::metrics::Measure;
use crate::metrics::degree::{in_degree_centrality, out_degree_centrality};

/// Role of a reaction within its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Only outgoing edges.
    Source,
    /// Only incoming edges.
    Sink,
    Intermediate,
    /// Neither, including a lone node whose only edge is a self-loop.
    Isolated,
}

impl NodeRole {
    /// Classify from in- and out-degree centrality.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn classify(in_centrality: f64, out_centrality: f64) -> Self {
        match (in_centrality == 0.0, out_centrality == 0.0) {
            (true, false) => Self::Source,
            (false, true) => Self::Sink,
            (false, false) => Self::Intermediate,
            (true, true) => Self::Isolated,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Sink => "sink",
            Self::Intermediate => "intermediate",
            Self::Isolated => "isolated",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unnormalized in-degree over out-degree; 0.0 when out-degree is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio_in_out(g: &ReactionGraph) -> Measure {
    let in_deg = g.in_degrees();
    let out_deg = g.out_degrees();
    g.node_ids()
        .enumerate()
        .map(|(i, id)| {
            let ratio = if out_deg[i] == 0 {
                0.0
            } else {
                in_deg[i] as f64 / out_deg[i] as f64
            };
            (id.to_string(), ratio)
        })
        .collect()
}

/// One role per node, from normalized degree centrality.
#[must_use]
pub fn source_sink_classification(g: &ReactionGraph) -> BTreeMap<String, NodeRole> {
    let indeg = in_degree_centrality(g);
    let outdeg = out_degree_centrality(g);
    indeg
        .into_iter()
        .map(|(id, i)| {
            let o = outdeg.get(&id).copied().unwrap_or(0.0);
            (id, NodeRole::classify(i, o))
        })
        .collect()
}
