//! Centrality measures over a single directed (sub)graph.
//!
//! # Overview
//!
//! Each measure answers a different question about a reaction:
//!
//! - **Degree** (`degree`): how many reactions feed it or are fed by it,
//!   normalized by `n - 1`.
//! - **Closeness** (`closeness`): how few hops separate it from the
//!   reactions it can reach.
//! - **Betweenness** (`betweenness`): how often it lies on shortest paths
//!   between other reactions.
//! - **Eigenvector** (`eigenvector`): how strongly it is fed by (left) or
//!   feeds (right) other central reactions.
//!
//! Degree, closeness and betweenness always produce a finite value for
//! every node. Eigenvector centrality is the only measure allowed to yield
//! [`Score::NotAvailable`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use rgtopo_analysis::metrics::{betweenness, closeness, degree, eigenvector};
//!
//! let indeg = degree::in_degree_centrality(&g);
//! let bc = betweenness::betweenness_centrality(&g);
//! let left = eigenvector::eigenvector_left(&g, &EigenConfig::default());
//! ```

use std::collections::BTreeMap;
use std::fmt;

pub mod betweenness;
pub mod closeness;
pub mod degree;
pub mod eigenvector;

/// Node id → value, iterated in id order.
pub type Measure = BTreeMap<String, f64>;

/// A measure value that may be missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    Value(f64),
    /// The computation did not yield a trustworthy value. Written as `NA`.
    NotAvailable,
}

impl Score {
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotAvailable => None,
        }
    }

    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{}", format_value(*v)),
            Self::NotAvailable => f.write_str("NA"),
        }
    }
}

/// Render a float the way measure files expect: always with a decimal
/// point (`0.0`, `0.5`, `1.0`).
#[must_use]
pub fn format_value(v: f64) -> String {
    format!("{v:?}")
}
