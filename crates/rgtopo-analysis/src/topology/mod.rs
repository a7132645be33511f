//! Structural classification of reactions within a component.
//!
//! - [`roles`]: source / sink / intermediate / isolated, and the in/out
//!   degree ratio.
//! - [`reachability`]: cycle detection and, for acyclic components, how
//!   many reactions lie downstream (successors) and upstream
//!   (predecessors) of each reaction.

pub mod reachability;
pub mod roles;

pub use reachability::{
    Reachability, analyze_reachability, has_cycle, transitive_predecessors,
    transitive_successors,
};
pub use roles::{NodeRole, ratio_in_out, source_sink_classification};
