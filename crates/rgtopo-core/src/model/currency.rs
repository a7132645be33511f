//! Currency-metabolite filter.
//!
//! A metabolite id is currency when it is `<base>[<comp>]` (Recon style) or
//! `<base>_<comp>` (BiGG style) with a configured base and compartment.

use std::collections::HashSet;

use crate::config::BuildConfig;

#[derive(Debug, Clone, Default)]
pub struct CurrencyFilter {
    bases: HashSet<String>,
    compartments: HashSet<String>,
}

impl CurrencyFilter {
    /// Build the filter; an empty filter when currency removal is disabled.
    #[must_use]
    pub fn from_config(config: &BuildConfig) -> Self {
        if !config.remove_currency {
            return Self::default();
        }
        Self::new(&config.currency_metabolites, &config.compartments)
    }

    #[must_use]
    pub fn new(bases: &[String], compartments: &[String]) -> Self {
        Self {
            bases: bases.iter().map(|b| b.to_ascii_lowercase()).collect(),
            compartments: compartments.iter().map(|c| c.to_ascii_lowercase()).collect(),
        }
    }

    #[must_use]
    pub fn is_currency(&self, metabolite: &str) -> bool {
        if self.bases.is_empty() {
            return false;
        }
        split_compartment(metabolite).is_some_and(|(base, comp)| {
            self.bases.contains(&base.to_ascii_lowercase())
                && self.compartments.contains(&comp.to_ascii_lowercase())
        })
    }
}

/// Split `atp[c]` or `atp_c` into `("atp", "c")`.
fn split_compartment(id: &str) -> Option<(&str, &str)> {
    if let Some(inner) = id.strip_suffix(']') {
        return inner.rsplit_once('[');
    }
    id.rsplit_once('_')
}
