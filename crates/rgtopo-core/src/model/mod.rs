//! Metabolic model input and reaction-graph construction.
//!
//! # Overview
//!
//! A metabolic model is read from COBRA JSON. Each reaction becomes a node;
//! an edge `A → B` means "a product of A is a reactant of B". Ubiquitous
//! currency metabolites (ATP, water, protons, …) are ignored when matching
//! products to reactants, otherwise nearly every pair of reactions would be
//! linked.
//!
//! ## Pipeline
//!
//! ```text
//! model.json
//!      ↓  MetabolicModel::from_path()
//! MetabolicModel
//!      ↓  ReactionGraphBuild::from_model(&model, &BuildConfig)
//! ReactionGraphBuild (nodes, edges, subsystems, genes)
//!      ↓  ReactionGraphBuild::write_to(dir)
//! node.list  edge.list  subsystems.list  gene.list  geneReactions.list
//! ```

pub mod currency;
pub mod genes;
pub mod links;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::config::BuildConfig;
use crate::error::ModelError;
use crate::lists;

pub use currency::CurrencyFilter;
pub use genes::{gene_reaction_pairs, gene_set, normalize_subsystem};
pub use links::infer_edges;

pub const SUBSYSTEMS_LIST: &str = "subsystems.list";
pub const GENE_LIST: &str = "gene.list";
pub const GENE_REACTIONS_LIST: &str = "geneReactions.list";

/// A reaction as stored in COBRA JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Reaction {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Metabolite id → stoichiometric coefficient (negative = consumed).
    #[serde(default)]
    pub metabolites: BTreeMap<String, f64>,
    #[serde(default)]
    pub lower_bound: f64,
    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,
    #[serde(default)]
    pub gene_reaction_rule: String,
    #[serde(default)]
    pub subsystem: Option<String>,
}

const fn default_upper_bound() -> f64 {
    1000.0
}

impl Reaction {
    /// A reaction is reversible when flux is allowed in both directions.
    #[must_use]
    pub fn is_reversible(&self) -> bool {
        self.lower_bound < 0.0 && self.upper_bound > 0.0
    }

    /// Reactants and products in the physiological direction, currency removed.
    ///
    /// Irreversible reactions use the coefficient sign. Reversible reactions
    /// only take metabolites with unit coefficients (`-1.0` reactant, `1.0`
    /// product), which is how the written direction is marked in the source
    /// models.
    #[must_use]
    pub fn oriented_metabolites<'a>(
        &'a self,
        currency: &CurrencyFilter,
    ) -> (BTreeSet<&'a str>, BTreeSet<&'a str>) {
        let reversible = self.is_reversible();
        let mut reactants = BTreeSet::new();
        let mut products = BTreeSet::new();

        for (met, &coef) in &self.metabolites {
            if currency.is_currency(met) {
                continue;
            }
            #[allow(clippy::float_cmp)]
            let (is_reactant, is_product) = if reversible {
                (coef == -1.0, coef == 1.0)
            } else {
                (coef < 0.0, coef > 0.0)
            };
            if is_reactant {
                reactants.insert(met.as_str());
            } else if is_product {
                products.insert(met.as_str());
            }
        }

        (reactants, products)
    }

    /// Gene ids named by the gene-reaction rule.
    pub fn rule_genes(&self) -> impl Iterator<Item = &str> {
        self.gene_reaction_rule
            .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .filter(|tok| !tok.is_empty())
            .filter(|tok| !tok.eq_ignore_ascii_case("and") && !tok.eq_ignore_ascii_case("or"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Gene {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A metabolic model in COBRA JSON form. Only the fields the graph needs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetabolicModel {
    #[serde(default)]
    pub id: Option<String>,
    pub reactions: Vec<Reaction>,
    #[serde(default)]
    pub genes: Vec<Gene>,
}

impl MetabolicModel {
    /// Parse a model from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Parse`] on invalid JSON and
    /// [`ModelError::DuplicateReaction`] if two reactions share an id.
    pub fn from_json(raw: &str, origin: &Path) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(raw).map_err(|source| ModelError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;

        let mut seen = HashSet::with_capacity(model.reactions.len());
        for r in &model.reactions {
            if !seen.insert(r.id.as_str()) {
                return Err(ModelError::DuplicateReaction(r.id.clone()));
            }
        }
        Ok(model)
    }

    /// Read and parse a model file.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the file cannot be read, otherwise as
    /// [`MetabolicModel::from_json`].
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw, path)
    }
}

/// Everything derived from a model: the reaction graph plus bookkeeping lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionGraphBuild {
    /// Reaction ids in model order (biomass removed when configured).
    pub nodes: Vec<String>,
    /// Directed edges, self-loops included.
    pub edges: BTreeSet<(String, String)>,
    /// Reactions dropped by the biomass filter.
    pub removed_biomass: Vec<String>,
    pub subsystems: BTreeSet<String>,
    pub genes: BTreeSet<String>,
    /// `(gene, reaction)` pairs.
    pub gene_reactions: BTreeSet<(String, String)>,
}

impl ReactionGraphBuild {
    #[must_use]
    #[instrument(skip_all, fields(reactions = model.reactions.len()))]
    pub fn from_model(model: &MetabolicModel, config: &BuildConfig) -> Self {
        let (kept, removed_biomass): (Vec<&Reaction>, Vec<&Reaction>) = model
            .reactions
            .iter()
            .partition(|r| !(config.remove_biomass && is_biomass(&r.id)));

        if !removed_biomass.is_empty() {
            info!(
                removed = ?removed_biomass.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
                "removing biomass reactions"
            );
        }

        let currency = CurrencyFilter::from_config(config);
        let edges = infer_edges(&kept, &currency);

        let subsystems = kept
            .iter()
            .filter_map(|r| r.subsystem.as_deref())
            .map(normalize_subsystem)
            .filter(|s| !s.is_empty())
            .collect();

        let genes = gene_set(model, config.gene_id);
        let gene_reactions = gene_reaction_pairs(&kept, config.gene_id);

        info!(
            nodes = kept.len(),
            edges = edges.len(),
            genes = genes.len(),
            "reaction graph built"
        );

        Self {
            nodes: kept.iter().map(|r| r.id.clone()).collect(),
            edges,
            removed_biomass: removed_biomass.iter().map(|r| r.id.clone()).collect(),
            subsystems,
            genes,
            gene_reactions,
        }
    }

    /// Number of self-loop edges.
    #[must_use]
    pub fn self_loop_count(&self) -> usize {
        self.edges.iter().filter(|(a, b)| a == b).count()
    }

    /// Write all list files into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

        lists::write_node_list(&dir.join(lists::NODE_LIST), self.nodes.iter().map(String::as_str))
            .context("write node list")?;
        lists::write_edge_list(
            &dir.join(lists::EDGE_LIST),
            self.edges.iter().map(|(a, b)| (a.as_str(), b.as_str())),
        )
        .context("write edge list")?;
        lists::write_node_list(
            &dir.join(SUBSYSTEMS_LIST),
            self.subsystems.iter().map(String::as_str),
        )
        .context("write subsystems list")?;
        lists::write_node_list(&dir.join(GENE_LIST), self.genes.iter().map(String::as_str))
            .context("write gene list")?;
        lists::write_table(
            &dir.join(GENE_REACTIONS_LIST),
            ("GENE", "REACTION"),
            self.gene_reactions.iter().map(|(g, r)| (g, r)),
        )
        .context("write gene-reaction list")?;

        Ok(())
    }
}

fn is_biomass(id: &str) -> bool {
    id.to_ascii_lowercase().contains("biomass")
}
