#![forbid(unsafe_code)]
//! rgtopo-analysis library.
//!
//! Topology of a directed reaction graph: connected-component
//! decomposition, degree/closeness/betweenness/eigenvector centrality,
//! source/sink roles, and transitive successor/predecessor counts, plus the
//! pipeline that persists them per component.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for return types that touch the
//!   filesystem; pure computations are infallible or return
//!   [`rgtopo_core::GraphError`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod graph;
pub mod metrics;
pub mod pipeline;
pub mod topology;

pub use graph::{Component, GraphStats, ReactionGraph, decompose};
pub use metrics::{Measure, Score};
pub use pipeline::{ComponentReport, PipelineSummary, analyze_component};
pub use topology::{NodeRole, Reachability};
