//! `rgtopo analyze`: decomposition plus per-component topology files.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rgtopo_analysis::pipeline;
use rgtopo_core::AnalysisConfig;

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Directory holding node.list and edge.list.
    #[arg(long)]
    pub graph: PathBuf,

    /// Directory receiving stats, component directories and summary.json.
    #[arg(long)]
    pub out: PathBuf,

    /// Skip eigenvector centrality.
    #[arg(long)]
    pub no_eigen: bool,

    /// Size cutoff for eigenvector centrality: larger components are
    /// written as NA without attempting the O(n^3) solve. This is not a
    /// numerical failure. 0 removes the cutoff.
    #[arg(long, value_name = "NODES")]
    pub eigen_max_nodes: Option<usize>,
}

impl AnalyzeArgs {
    #[must_use]
    pub fn apply(&self, base: &AnalysisConfig) -> AnalysisConfig {
        let mut cfg = base.clone();
        if self.no_eigen {
            cfg.eigenvector = false;
        }
        if let Some(limit) = self.eigen_max_nodes {
            cfg.eigenvector_max_nodes = limit;
        }
        cfg
    }
}

/// Run the full pipeline and print its summary.
///
/// # Errors
///
/// Returns an error if the input lists are unreadable or inconsistent, or
/// any output file cannot be written.
pub fn run_analyze(args: &AnalyzeArgs, base: &AnalysisConfig, output: OutputMode) -> Result<()> {
    let cfg = args.apply(base);
    let summary = pipeline::run(&args.graph, &args.out, &cfg)?;
    render(output, &summary, |s, w| write!(w, "{}", s.to_text()))
}
