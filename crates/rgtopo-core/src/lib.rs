#![forbid(unsafe_code)]
//! rgtopo-core library.
//!
//! Shared plumbing for the reaction-graph tools: the error taxonomy,
//! configuration loading, the tab-delimited list formats, and construction
//! of a reaction graph from a metabolic model.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at library seams, `anyhow::Result`
//!   where several of them meet.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod lists;
pub mod model;

pub use config::{AnalysisConfig, BuildConfig, ClosenessDirection, GeneIdMode, RgtopoConfig};
pub use error::{ConfigError, ErrorCode, GraphError, ListError, ModelError};
