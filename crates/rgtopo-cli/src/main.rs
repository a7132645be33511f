#![forbid(unsafe_code)]

use std::env;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use rgtopo_core::{ConfigError, ErrorCode, GraphError, ListError, ModelError};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;
mod output;

use output::OutputMode;

#[derive(Parser, Debug)]
#[command(
    name = "rgtopo",
    version,
    about = "Reaction-graph construction and topology analysis for metabolic models"
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Config file (defaults to ./rgtopo.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build node and edge lists from a COBRA JSON model.
    Build(cmd::build::BuildArgs),

    /// Decompose a graph and write per-component topology files.
    Analyze(cmd::analyze::AnalyzeArgs),

    /// Print summary statistics for a graph.
    Stats(cmd::stats::StatsArgs),

    /// Generate shell completion scripts.
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("RGTOPO_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "rgtopo=debug,info"
        } else {
            "rgtopo=info,warn"
        })
    });

    let format = env::var("RGTOPO_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// First typed error code in the chain, if any.
fn error_code(err: &anyhow::Error) -> Option<ErrorCode> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<GraphError>() {
            Some(e.code())
        } else if let Some(e) = cause.downcast_ref::<ListError>() {
            Some(e.code())
        } else if let Some(e) = cause.downcast_ref::<ModelError>() {
            Some(e.code())
        } else {
            cause.downcast_ref::<ConfigError>().map(ConfigError::code)
        }
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(&cli);
    if let Some(code) = result.as_ref().err().and_then(error_code) {
        eprintln!("{code}: {}", code.message());
        if let Some(hint) = code.hint() {
            eprintln!("hint: {hint}");
        }
    }
    result
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let output = OutputMode::from_json_flag(cli.json);

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let cwd = env::current_dir()?;
    let config = rgtopo_core::config::load_config(cli.config.as_deref(), &cwd)?;
    debug!(?config, "effective configuration");

    match &cli.command {
        Commands::Build(args) => cmd::build::run_build(args, &config.build, output),
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, &config.analysis, output),
        Commands::Stats(args) => cmd::stats::run_stats(args, output),
        Commands::Completions(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_parses_flags() {
        let cli = Cli::parse_from([
            "rgtopo", "analyze", "--graph", "g", "--out", "o", "--no-eigen",
        ]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.graph, PathBuf::from("g"));
        assert!(args.no_eigen);
    }

    #[test]
    fn build_parses_overrides() {
        let cli = Cli::parse_from([
            "rgtopo",
            "build",
            "--model",
            "m.json",
            "--out",
            "o",
            "--keep-currency",
            "--gene-id",
            "symbol",
        ]);
        let Commands::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert!(args.keep_currency);
        assert!(!args.keep_biomass);
        assert_eq!(args.gene_id, Some(cmd::build::GeneIdArg::Symbol));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "rgtopo", "stats", "--graph", "g", "--json", "--config", "x.toml", "-v",
        ]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["rgtopo", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }

    #[test]
    fn analyze_requires_out() {
        assert!(Cli::try_parse_from(["rgtopo", "analyze", "--graph", "g"]).is_err());
    }

    #[test]
    fn error_code_found_through_context() {
        let err = anyhow::Error::new(GraphError::MalformedInput {
            from: "A".to_string(),
            to: "Z".to_string(),
            missing: "Z".to_string(),
        })
        .context("load graph");
        assert_eq!(error_code(&err), Some(ErrorCode::MalformedInput));
        assert_eq!(error_code(&anyhow::anyhow!("plain")), None);
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
