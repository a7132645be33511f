//! Gene and subsystem bookkeeping that accompanies a reaction graph.

use std::collections::BTreeSet;

use crate::config::GeneIdMode;

use super::{MetabolicModel, Reaction};

/// Map a model gene id to the reported id.
///
/// In Entrez mode the transcript suffix is dropped (`27349.1` → `27349`).
#[must_use]
pub fn report_gene_id(id: &str, mode: GeneIdMode) -> &str {
    match mode {
        GeneIdMode::Entrez => id.split('.').next().unwrap_or(id),
        GeneIdMode::Symbol => id,
    }
}

/// Unique gene ids of the model.
///
/// Falls back to the ids named in gene-reaction rules when the model has no
/// explicit gene table.
#[must_use]
pub fn gene_set(model: &MetabolicModel, mode: GeneIdMode) -> BTreeSet<String> {
    if model.genes.is_empty() {
        return model
            .reactions
            .iter()
            .flat_map(Reaction::rule_genes)
            .map(|g| report_gene_id(g, mode).to_string())
            .collect();
    }
    model
        .genes
        .iter()
        .map(|g| report_gene_id(&g.id, mode).to_string())
        .collect()
}

/// `(gene, reaction)` pairs for the kept reactions.
#[must_use]
pub fn gene_reaction_pairs(reactions: &[&Reaction], mode: GeneIdMode) -> BTreeSet<(String, String)> {
    reactions
        .iter()
        .flat_map(|r| {
            r.rule_genes()
                .map(move |g| (report_gene_id(g, mode).to_string(), r.id.clone()))
        })
        .collect()
}

/// Unwrap array-style subsystem strings exported by some toolboxes.
///
/// `[array(['Glycolysis'], dtype=object)]` becomes `Glycolysis`; anything
/// else is returned trimmed.
#[must_use]
pub fn normalize_subsystem(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("[array") {
        if let Some(inner) = trimmed.split('\'').nth(1) {
            return inner.to_string();
        }
    }
    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entrez_drops_transcript_suffix() {
        assert_eq!(report_gene_id("27349.1", GeneIdMode::Entrez), "27349");
        assert_eq!(report_gene_id("27349", GeneIdMode::Entrez), "27349");
        assert_eq!(report_gene_id("27349.1", GeneIdMode::Symbol), "27349.1");
    }

    #[test]
    fn array_subsystems_are_unwrapped() {
        assert_eq!(
            normalize_subsystem("[array(['Citric acid cycle'], dtype=object)]"),
            "Citric acid cycle"
        );
        assert_eq!(normalize_subsystem("  Glycolysis "), "Glycolysis");
    }

    #[test]
    fn gene_set_falls_back_to_rules() {
        let model: MetabolicModel = serde_json::from_str(
            r#"{"reactions": [{"id": "R1", "gene_reaction_rule": "1.1 and 2.1"},
                               {"id": "R2", "gene_reaction_rule": "1.2"}]}"#,
        )
        .expect("parse");
        let genes: Vec<String> = gene_set(&model, GeneIdMode::Entrez).into_iter().collect();
        assert_eq!(genes, vec!["1", "2"]);
    }
}
