use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use rgtopo_analysis::{GraphStats, ReactionGraph};

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Directory holding node.list and edge.list.
    #[arg(long)]
    pub graph: PathBuf,
}

fn graph_name(dir: &Path) -> String {
    dir.file_name()
        .map_or_else(|| "graph".to_string(), |n| n.to_string_lossy().into_owned())
}

/// Print summary statistics for a graph without writing anything.
///
/// # Errors
///
/// Returns an error if the lists cannot be read or reference unknown nodes.
pub fn run_stats(args: &StatsArgs, output: OutputMode) -> Result<()> {
    let graph = ReactionGraph::load(&args.graph, graph_name(&args.graph))?;
    let stats = GraphStats::from_graph(&graph);
    render(output, &stats, |s, w| write!(w, "{}", s.to_report()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_last_path_component() {
        assert_eq!(graph_name(Path::new("/data/recon3d")), "recon3d");
        assert_eq!(graph_name(Path::new("/")), "graph");
    }
}
