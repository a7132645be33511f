//! Pipeline driver: graph → components → per-component measures → files.
//!
//! # Output layout
//!
//! ```text
//! <out>/
//!   stats.txt            whole-graph statistics
//!   summary.json         PipelineSummary
//!   000/                 giant component
//!     node.list
//!     edge.list
//!     stats.txt
//!     topology/
//!       indegree.list  outdegree.list  degree.list  ratio_io.list
//!       source_sink.list  closeness.list  betweenness.list
//!       successors.list  predecessors.list      (acyclic only)
//!       eigen_left.list  eigen_right.list       (when enabled)
//!   001/
//!   …
//! ```
//!
//! Components are written first and then reloaded from disk, so every
//! measure is computed from exactly what was persisted.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use rgtopo_core::AnalysisConfig;
use rgtopo_core::lists;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::graph::{GraphStats, ReactionGraph, decompose};
use crate::metrics::Measure;
use crate::metrics::betweenness::betweenness_centrality;
use crate::metrics::closeness::closeness_centrality;
use crate::metrics::degree::{degree_centrality, in_degree_centrality, out_degree_centrality};
use crate::metrics::eigenvector::{
    EigenConfig, EigenvectorOutcome, eigenvector_left, eigenvector_right,
};
use crate::topology::{
    NodeRole, Reachability, analyze_reachability, ratio_in_out, source_sink_classification,
};

/// Subdirectory of a component holding its measure files.
pub const TOPOLOGY_DIR: &str = "topology";
pub const SUMMARY_FILE: &str = "summary.json";

// ---------------------------------------------------------------------------
// ComponentReport
// ---------------------------------------------------------------------------

/// Every measure computed for one component.
///
/// Edge-dependent measures are `None` for a component without edges.
#[derive(Debug, Clone)]
pub struct ComponentReport {
    pub label: String,
    pub stats: GraphStats,
    pub in_degree: Measure,
    pub out_degree: Measure,
    pub degree: Measure,
    pub ratio_io: Measure,
    pub roles: BTreeMap<String, NodeRole>,
    pub closeness: Option<Measure>,
    pub betweenness: Option<Measure>,
    pub reachability: Option<Reachability>,
    pub eigen_left: Option<EigenvectorOutcome>,
    pub eigen_right: Option<EigenvectorOutcome>,
}

impl ComponentReport {
    #[must_use]
    pub const fn has_edges(&self) -> bool {
        self.stats.edge_count > 0
    }

    /// `Some(true)` for an acyclic component, `None` when not computed.
    #[must_use]
    pub fn is_linear(&self) -> Option<bool> {
        self.reachability.as_ref().map(Reachability::is_linear)
    }

    /// Write one measure file per computed measure into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

        write_floats(dir, "indegree", "INDEGREE", &self.in_degree)?;
        write_floats(dir, "outdegree", "OUTDEGREE", &self.out_degree)?;
        write_floats(dir, "degree", "DEGREE", &self.degree)?;
        write_floats(dir, "ratio_io", "RATIO_IO", &self.ratio_io)?;
        write_rows(dir, "source_sink", "SOURCE_SINK", &self.roles)?;

        if let Some(closeness) = &self.closeness {
            write_floats(dir, "closeness", "CLOSENESS", closeness)?;
        }
        if let Some(betweenness) = &self.betweenness {
            write_floats(dir, "betweenness", "BETWEENNESS", betweenness)?;
        }
        if let Some(Reachability::Linear {
            successors,
            predecessors,
        }) = &self.reachability
        {
            write_rows(dir, "successors", "SUCCESSORS", successors)?;
            write_rows(dir, "predecessors", "PREDECESSORS", predecessors)?;
        }
        if let Some(left) = &self.eigen_left {
            write_rows(dir, "eigen_left", "EIGENLEFT", &left.scores)?;
        }
        if let Some(right) = &self.eigen_right {
            write_rows(dir, "eigen_right", "EIGENRIGHT", &right.scores)?;
        }
        Ok(())
    }
}

fn write_floats(dir: &Path, stem: &str, header: &str, measure: &Measure) -> Result<()> {
    let rows = measure
        .iter()
        .map(|(id, v)| (id, crate::metrics::format_value(*v)));
    let path = dir.join(format!("{stem}.list"));
    lists::write_measure(&path, header, rows).with_context(|| format!("write {stem} measure"))
}

fn write_rows<V: std::fmt::Display>(
    dir: &Path,
    stem: &str,
    header: &str,
    rows: &BTreeMap<String, V>,
) -> Result<()> {
    let path = dir.join(format!("{stem}.list"));
    lists::write_measure(&path, header, rows).with_context(|| format!("write {stem} measure"))
}

/// Compute every measure for one component.
///
/// Components without edges only get degree, ratio and role measures.
/// Cyclic components get no successor/predecessor counts.
#[must_use]
#[instrument(skip(g, cfg), fields(graph = g.name()))]
pub fn analyze_component(g: &ReactionGraph, cfg: &AnalysisConfig) -> ComponentReport {
    let stats = GraphStats::from_graph(g);
    let has_edges = g.edge_count() > 0;

    let reachability = has_edges.then(|| analyze_reachability(g));
    if matches!(reachability, Some(Reachability::NonLinear)) {
        warn!(
            component = g.name(),
            "component has cycles; successors/predecessors skipped"
        );
    }

    let eigen = cfg.eigenvector && has_edges;
    let eigen_cfg = EigenConfig::from(cfg);

    ComponentReport {
        label: g.name().to_string(),
        in_degree: in_degree_centrality(g),
        out_degree: out_degree_centrality(g),
        degree: degree_centrality(g),
        ratio_io: ratio_in_out(g),
        roles: source_sink_classification(g),
        closeness: has_edges.then(|| closeness_centrality(g, cfg.closeness_direction)),
        betweenness: has_edges.then(|| betweenness_centrality(g)),
        reachability,
        eigen_left: eigen.then(|| eigenvector_left(g, &eigen_cfg)),
        eigen_right: eigen.then(|| eigenvector_right(g, &eigen_cfg)),
        stats,
    }
}

// ---------------------------------------------------------------------------
// PipelineSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentSummary {
    pub label: String,
    pub nodes: usize,
    pub edges: usize,
    /// `None` when reachability was not computed (no edges).
    pub linear: Option<bool>,
    /// `None` when eigenvector centrality was not requested.
    pub eigenvector_available: Option<bool>,
}

impl From<&ComponentReport> for ComponentSummary {
    fn from(r: &ComponentReport) -> Self {
        let eigenvector_available = match (&r.eigen_left, &r.eigen_right) {
            (Some(left), Some(right)) => Some(left.is_available() && right.is_available()),
            _ => None,
        };
        Self {
            label: r.label.clone(),
            nodes: r.stats.node_count,
            edges: r.stats.edge_count,
            linear: r.is_linear(),
            eigenvector_available,
        }
    }
}

/// Outcome of one [`run`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub graph: GraphStats,
    pub component_count: usize,
    pub giant_component_nodes: usize,
    pub edgeless_components: usize,
    pub components: Vec<ComponentSummary>,
}

impl PipelineSummary {
    /// Human-readable multi-line summary.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "graph {}: {} nodes, {} edges, {} components (giant: {} nodes)\n",
            self.graph.name,
            self.graph.node_count,
            self.graph.edge_count,
            self.component_count,
            self.giant_component_nodes,
        );
        for c in &self.components {
            let linear = match c.linear {
                Some(true) => "linear",
                Some(false) => "cyclic",
                None => "no edges",
            };
            let eigen = match c.eigenvector_available {
                Some(true) => "eigen ok",
                Some(false) => "eigen NA",
                None => "eigen skipped",
            };
            out.push_str(&format!(
                "  {}  nodes={} edges={}  {linear}, {eigen}\n",
                c.label, c.nodes, c.edges
            ));
        }
        out
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Analyze the graph stored in `input_dir`, writing everything under
/// `output_dir`.
///
/// # Errors
///
/// Returns an error if the input lists are missing or malformed, or if any
/// output file cannot be written. Numerical problems never abort a run.
#[instrument(skip(cfg))]
pub fn run(input_dir: &Path, output_dir: &Path, cfg: &AnalysisConfig) -> Result<PipelineSummary> {
    let name = input_dir
        .file_name()
        .map_or_else(|| "graph".to_string(), |n| n.to_string_lossy().into_owned());
    let graph = ReactionGraph::load(input_dir, name)
        .with_context(|| format!("load graph from {}", input_dir.display()))?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;

    let graph_stats = GraphStats::from_graph(&graph);
    lists::write_text(&output_dir.join(lists::STATS_FILE), &graph_stats.to_report())
        .context("write graph stats")?;

    let components = decompose(&graph);
    let labels: Vec<String> = components.iter().map(|c| c.label()).collect();
    for component in &components {
        let dir = output_dir.join(component.label());
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        component.graph().save(&dir)?;
    }

    let total = labels.len();
    let mut reports = Vec::with_capacity(total);
    for (i, (label, component)) in labels.iter().zip(&components).enumerate() {
        let dir = output_dir.join(label);
        let reloaded = ReactionGraph::load(&dir, label.as_str())?;
        if reloaded.node_set() != component.graph().node_set()
            || reloaded.edge_set() != component.graph().edge_set()
        {
            bail!("component {label} changed on disk between save and reload");
        }

        info!(
            "component {}/{total} label={label} nodes={} edges={}",
            i + 1,
            reloaded.node_count(),
            reloaded.edge_count()
        );

        let report = analyze_component(&reloaded, cfg);
        lists::write_text(&dir.join(lists::STATS_FILE), &report.stats.to_report())
            .with_context(|| format!("write stats for component {label}"))?;
        report
            .write_to(&dir.join(TOPOLOGY_DIR))
            .with_context(|| format!("write measures for component {label}"))?;
        reports.push(report);
    }

    let edgeless_components = reports.iter().filter(|r| !r.has_edges()).count();
    if edgeless_components > 0 {
        warn!(
            edgeless_components,
            "components without edges only have degree and role measures"
        );
    }

    let summary = PipelineSummary {
        component_count: reports.len(),
        giant_component_nodes: components.first().map_or(0, crate::graph::Component::node_count),
        edgeless_components,
        components: reports.iter().map(ComponentSummary::from).collect(),
        graph: graph_stats,
    };

    let json = serde_json::to_string_pretty(&summary).context("serialize summary")?;
    lists::write_text(&output_dir.join(SUMMARY_FILE), &json).context("write summary")?;

    Ok(summary)
}
