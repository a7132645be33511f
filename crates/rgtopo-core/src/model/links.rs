//! Edge inference between reactions.
//!
//! `A → B` when a product of `A` is a reactant of `B`. A reaction whose
//! reactants and products overlap gets a self-loop.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::{CurrencyFilter, Reaction};

/// Infer the directed edge set for `reactions`.
///
/// Instead of comparing every pair of reactions, consumers are indexed by
/// metabolite and each product is looked up once.
#[must_use]
pub fn infer_edges(reactions: &[&Reaction], currency: &CurrencyFilter) -> BTreeSet<(String, String)> {
    let oriented: Vec<_> = reactions
        .iter()
        .map(|r| r.oriented_metabolites(currency))
        .collect();

    let mut consumers: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, (reactants, _)) in oriented.iter().enumerate() {
        for &met in reactants {
            consumers.entry(met).or_default().push(i);
        }
    }

    let mut edges = BTreeSet::new();
    for (i, (reactants, products)) in oriented.iter().enumerate() {
        let source = &reactions[i].id;

        if products.iter().any(|p| reactants.contains(p)) {
            edges.insert((source.clone(), source.clone()));
        }

        for &met in products {
            let Some(targets) = consumers.get(met) else {
                continue;
            };
            for &j in targets {
                if j != i {
                    edges.insert((source.clone(), reactions[j].id.clone()));
                }
            }
        }
    }

    debug!(edges = edges.len(), "edges inferred");
    edges
}
