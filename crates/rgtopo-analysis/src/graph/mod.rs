//! Reaction graph module.
//!
//! # Overview
//!
//! ```text
//! node.list + edge.list
//!        ↓  build::ReactionGraph::load() / from_parts()
//! ReactionGraph (frozen DiGraph, self-loops allowed)
//!        ↓  components::decompose()
//! Vec<Component>, largest first, labeled 000, 001, …
//!        ↓  stats::GraphStats::from_graph()
//! GraphStats (density, degrees, weak components, content hash)
//! ```
//!
//! ## Change Detection
//!
//! [`ReactionGraph::content_hash`] is a BLAKE3 hash of the sorted edge list.
//! It is recorded in every `stats.txt` so two runs can be compared without
//! diffing the lists.

pub mod build;
pub mod components;
pub mod stats;

pub use build::ReactionGraph;
pub use components::{Component, decompose};
pub use stats::GraphStats;
