//! `rgtopo build`: metabolic model to node/edge lists.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rgtopo_analysis::{GraphStats, ReactionGraph};
use rgtopo_core::lists::{self, STATS_FILE};
use rgtopo_core::model::{MetabolicModel, ReactionGraphBuild};
use rgtopo_core::{BuildConfig, GeneIdMode};
use serde::Serialize;
use tracing::info;

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// COBRA JSON model file.
    #[arg(long)]
    pub model: PathBuf,

    /// Directory receiving node.list, edge.list and the gene/subsystem lists.
    #[arg(long)]
    pub out: PathBuf,

    /// Keep currency metabolites when linking reactions.
    #[arg(long)]
    pub keep_currency: bool,

    /// Keep biomass reactions in the graph.
    #[arg(long)]
    pub keep_biomass: bool,

    /// Gene identifier style in the gene lists.
    #[arg(long, value_enum)]
    pub gene_id: Option<GeneIdArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GeneIdArg {
    Entrez,
    Symbol,
}

impl From<GeneIdArg> for GeneIdMode {
    fn from(arg: GeneIdArg) -> Self {
        match arg {
            GeneIdArg::Entrez => Self::Entrez,
            GeneIdArg::Symbol => Self::Symbol,
        }
    }
}

impl BuildArgs {
    /// Apply flag overrides on top of the loaded `[build]` section.
    #[must_use]
    pub fn apply(&self, base: &BuildConfig) -> BuildConfig {
        let mut cfg = base.clone();
        if self.keep_currency {
            cfg.remove_currency = false;
        }
        if self.keep_biomass {
            cfg.remove_biomass = false;
        }
        if let Some(mode) = self.gene_id {
            cfg.gene_id = mode.into();
        }
        cfg
    }
}

#[derive(Debug, Serialize)]
struct BuildReport {
    model: String,
    out: String,
    nodes: usize,
    edges: usize,
    self_loops: usize,
    removed_biomass: Vec<String>,
    subsystems: usize,
    genes: usize,
}

impl BuildReport {
    fn new(model: &Path, out: &Path, build: &ReactionGraphBuild) -> Self {
        Self {
            model: model.display().to_string(),
            out: out.display().to_string(),
            nodes: build.nodes.len(),
            edges: build.edges.len(),
            self_loops: build.self_loop_count(),
            removed_biomass: build.removed_biomass.clone(),
            subsystems: build.subsystems.len(),
            genes: build.genes.len(),
        }
    }
}

/// The built lists as a graph; fails on ids that could not be reloaded.
fn as_graph(out: &Path, build: &ReactionGraphBuild) -> Result<ReactionGraph> {
    let name = out
        .file_name()
        .map_or_else(|| "graph".to_string(), |n| n.to_string_lossy().into_owned());
    let graph = ReactionGraph::from_parts(
        name,
        build.nodes.iter().map(String::as_str),
        build.edges.iter().map(|(a, b)| (a.as_str(), b.as_str())),
    )?;
    Ok(graph)
}

/// Build the reaction graph for `args.model` and write its lists.
///
/// # Errors
///
/// Returns an error if the model cannot be read or parsed, or any list
/// cannot be written.
pub fn run_build(args: &BuildArgs, base: &BuildConfig, output: OutputMode) -> Result<()> {
    let cfg = args.apply(base);
    let model = MetabolicModel::from_path(&args.model)
        .with_context(|| format!("load model {}", args.model.display()))?;
    let build = ReactionGraphBuild::from_model(&model, &cfg);
    let graph = as_graph(&args.out, &build)?;
    build.write_to(&args.out)?;
    lists::write_text(
        &args.out.join(STATS_FILE),
        &GraphStats::from_graph(&graph).to_report(),
    )
    .context("write graph stats")?;
    info!(out = %args.out.display(), "lists written");

    let report = BuildReport::new(&args.model, &args.out, &build);
    render(output, &report, |r, w| {
        writeln!(
            w,
            "{}: {} reactions, {} edges ({} self-loops), {} genes, {} subsystems",
            r.model, r.nodes, r.edges, r.self_loops, r.genes, r.subsystems
        )?;
        if !r.removed_biomass.is_empty() {
            writeln!(w, "removed biomass: {}", r.removed_biomass.join(", "))?;
        }
        writeln!(w, "lists written to {}", r.out)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BuildArgs {
        BuildArgs {
            model: PathBuf::from("m.json"),
            out: PathBuf::from("out"),
            keep_currency: false,
            keep_biomass: false,
            gene_id: None,
        }
    }

    #[test]
    fn no_flags_keep_config() {
        let base = BuildConfig::default();
        assert_eq!(args().apply(&base), base);
    }

    #[test]
    fn flags_override_config() {
        let a = BuildArgs {
            keep_currency: true,
            keep_biomass: true,
            gene_id: Some(GeneIdArg::Symbol),
            ..args()
        };
        let cfg = a.apply(&BuildConfig::default());
        assert!(!cfg.remove_currency);
        assert!(!cfg.remove_biomass);
        assert_eq!(cfg.gene_id, GeneIdMode::Symbol);
    }
}
