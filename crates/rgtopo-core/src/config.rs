//! Tool configuration loaded from `rgtopo.toml`.
//!
//! Every field has a default, so an absent file or an empty section is
//! equivalent to the built-in behavior. CLI flags are applied on top of the
//! loaded value by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;

/// File name looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "rgtopo.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RgtopoConfig {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// How gene identifiers from the model are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneIdMode {
    /// Entrez transcript ids (`27349.1`) collapsed to gene ids (`27349`).
    #[default]
    Entrez,
    /// Ids kept verbatim.
    Symbol,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_currency_metabolites")]
    pub currency_metabolites: Vec<String>,
    #[serde(default = "default_compartments")]
    pub compartments: Vec<String>,
    #[serde(default = "default_true")]
    pub remove_currency: bool,
    #[serde(default = "default_true")]
    pub remove_biomass: bool,
    #[serde(default)]
    pub gene_id: GeneIdMode,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            currency_metabolites: default_currency_metabolites(),
            compartments: default_compartments(),
            remove_currency: true,
            remove_biomass: true,
            gene_id: GeneIdMode::default(),
        }
    }
}

/// Which shortest-path distances closeness is computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClosenessDirection {
    /// Distances from the node along outgoing edges.
    #[default]
    Outward,
    /// Distances to the node along incoming edges.
    Inward,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_true")]
    pub eigenvector: bool,
    /// Size cutoff for the dense O(n^3) eigenvector solver: larger
    /// components get `NA` eigenvector scores. 0 means no cutoff.
    #[serde(default = "default_eigenvector_max_nodes")]
    pub eigenvector_max_nodes: usize,
    #[serde(default = "default_eigen_tolerance")]
    pub eigen_tolerance: f64,
    #[serde(default)]
    pub closeness_direction: ClosenessDirection,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            eigenvector: true,
            eigenvector_max_nodes: default_eigenvector_max_nodes(),
            eigen_tolerance: default_eigen_tolerance(),
            closeness_direction: ClosenessDirection::default(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_eigenvector_max_nodes() -> usize {
    0
}

const fn default_eigen_tolerance() -> f64 {
    1e-9
}

fn default_currency_metabolites() -> Vec<String> {
    [
        "adp", "atp", "co2", "o2", "h2o", "h2o2", "h", "k", "na1", "nad", "nadh", "nadp",
        "nadph", "nh4", "pi", "ppi",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_compartments() -> Vec<String> {
    ["c", "e", "l", "m", "x", "r", "g", "n"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Load configuration.
///
/// An explicit `path` must exist. Without one, `rgtopo.toml` in `cwd` is
/// used when present, and defaults otherwise.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_config(path: Option<&Path>, cwd: &Path) -> Result<RgtopoConfig, ConfigError> {
    let path: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = cwd.join(DEFAULT_CONFIG_FILE);
            if !candidate.exists() {
                debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                return Ok(RgtopoConfig::default());
            }
            candidate
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;

    let config = toml::from_str::<RgtopoConfig>(&content)
        .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(None, dir.path()).expect("defaults");
        assert_eq!(cfg, RgtopoConfig::default());
        assert_eq!(cfg.build.currency_metabolites.len(), 16);
        assert_eq!(cfg.build.compartments.len(), 8);
        assert!(cfg.analysis.eigenvector);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_config(Some(&dir.path().join("nope.toml")), dir.path())
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            "[analysis]\neigenvector = false\ncloseness_direction = \"inward\"\n\n[build]\ngene_id = \"symbol\"\n",
        )
        .expect("write config");

        let cfg = load_config(None, dir.path()).expect("parse");
        assert!(!cfg.analysis.eigenvector);
        assert_eq!(cfg.analysis.closeness_direction, ClosenessDirection::Inward);
        assert_eq!(cfg.analysis.eigenvector_max_nodes, 0);
        assert_eq!(cfg.build.gene_id, GeneIdMode::Symbol);
        assert!(cfg.build.remove_currency);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[analysis\neigenvector = ").expect("write");
        let err = load_config(Some(&path), dir.path()).expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.code(), crate::error::ErrorCode::ConfigParseError);
    }
}
