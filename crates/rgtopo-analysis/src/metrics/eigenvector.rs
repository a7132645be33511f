//! Eigenvector centrality via dense eigen-decomposition.
//!
//! # Overview
//!
//! The left eigenvector of the adjacency matrix `A` (`A[u][v] = 1` for
//! `u → v`) for its dominant eigenvalue `λ` satisfies
//!
//! ```text
//! λ · x[v] = Σ_{u → v} x[u]
//! ```
//!
//! so a reaction scores highly when it is fed by high-scoring reactions.
//! The right eigenvector is the same computation on the reversed graph.
//!
//! # Algorithm
//!
//! Power iteration stalls on periodic graphs and converges to zero on
//! acyclic ones, so the dominant pair is found directly:
//!
//! 1. Acyclic graphs (self-loops count as cycles) have a nilpotent
//!    adjacency matrix and are reported as not available up front.
//! 2. Real Schur decomposition of `Aᵀ` (after an orthogonal similarity)
//!    gives every eigenvalue; the one with the largest real part is the
//!    Perron root `λ`. A capped attempt at machine precision is followed by
//!    an uncapped one at a slightly looser deflation threshold.
//! 3. `λ` must be real and simple, or the eigenvector is not unique.
//! 4. The eigenvector is the right singular vector of `Aᵀ - λI` with the
//!    smallest singular value, checked against its residual.
//! 5. The vector is scaled to unit L2 norm with a positive sum.
//!
//! Any failed step yields a [`NonConvergence`] reason and `NA` for every
//! node. Nothing here panics or returns `Err`.

use std::collections::BTreeMap;

use nalgebra::{Complex, DMatrix, DVector};
use petgraph::algo::is_cyclic_directed;
use petgraph::visit::EdgeRef;
use rgtopo_core::AnalysisConfig;
use tracing::{debug, instrument, warn};

use crate::graph::ReactionGraph;
use crate::metrics::Score;

/// Relative distance within which two eigenvalues are treated as equal.
const CLUSTER_TOLERANCE: f64 = 1e-6;

/// Entries smaller than this after normalization are written as 0.
const ZERO_CLAMP: f64 = 1e-12;

/// Deflation threshold for the second Schur attempt, which runs uncapped.
const RELAXED_SCHUR_EPS: f64 = 1e-13;

/// Why an eigenvector centrality was not produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NonConvergence {
    #[error("{nodes} nodes exceeds the configured size cutoff of {limit}")]
    TooLarge { nodes: usize, limit: usize },

    #[error("adjacency matrix is nilpotent (no directed cycle)")]
    Nilpotent,

    #[error("eigen solver did not converge")]
    SolverFailed,

    #[error("dominant eigenvalue is complex ({re} + {im}i)")]
    ComplexDominant { re: f64, im: f64 },

    #[error("dominant eigenvalue {eigenvalue} has multiplicity {multiplicity}")]
    RepeatedDominant { eigenvalue: f64, multiplicity: usize },

    #[error("eigenvector residual {residual:e} above tolerance")]
    Residual { residual: f64 },

    #[error("eigenvector has no definite sign")]
    SignIndefinite,
}

/// Solver limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenConfig {
    /// Graphs with more nodes are reported as [`NonConvergence::TooLarge`];
    /// 0 disables the cutoff.
    pub max_nodes: usize,
    /// Threshold for a zero eigenvalue and for the eigenvector residual.
    pub tolerance: f64,
}

impl Default for EigenConfig {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for EigenConfig {
    fn from(cfg: &AnalysisConfig) -> Self {
        Self {
            max_nodes: cfg.eigenvector_max_nodes,
            tolerance: cfg.eigen_tolerance,
        }
    }
}

/// Eigenvector scores plus the diagnostics behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenvectorOutcome {
    pub scores: BTreeMap<String, Score>,
    /// Dominant eigenvalue, when one was accepted.
    pub eigenvalue: Option<f64>,
    pub failure: Option<NonConvergence>,
}

impl EigenvectorOutcome {
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.failure.is_none()
    }

    fn unavailable(g: &ReactionGraph, reason: NonConvergence) -> Self {
        Self {
            scores: g
                .node_ids()
                .map(|id| (id.to_string(), Score::NotAvailable))
                .collect(),
            eigenvalue: None,
            failure: Some(reason),
        }
    }
}

/// Left (in-edge) eigenvector centrality.
#[must_use]
#[instrument(skip(g, cfg), fields(graph = g.name(), nodes = g.node_count()))]
pub fn eigenvector_left(g: &ReactionGraph, cfg: &EigenConfig) -> EigenvectorOutcome {
    outcome(g, cfg, "left")
}

/// Right (out-edge) eigenvector centrality: the left one of the reversed
/// graph.
#[must_use]
#[instrument(skip(g, cfg), fields(graph = g.name(), nodes = g.node_count()))]
pub fn eigenvector_right(g: &ReactionGraph, cfg: &EigenConfig) -> EigenvectorOutcome {
    outcome(&g.reversed(), cfg, "right")
}

fn outcome(g: &ReactionGraph, cfg: &EigenConfig, side: &str) -> EigenvectorOutcome {
    if g.is_empty() {
        return EigenvectorOutcome {
            scores: BTreeMap::new(),
            eigenvalue: None,
            failure: None,
        };
    }

    match dominant_left(g, cfg) {
        Ok((eigenvalue, vector)) => {
            debug!(side, eigenvalue, "eigenvector centrality computed");
            EigenvectorOutcome {
                scores: g
                    .node_ids()
                    .zip(vector)
                    .map(|(id, v)| (id.to_string(), Score::Value(v)))
                    .collect(),
                eigenvalue: Some(eigenvalue),
                failure: None,
            }
        }
        Err(reason) => {
            warn!(graph = g.name(), side, %reason, "eigenvector centrality not available");
            EigenvectorOutcome::unavailable(g, reason)
        }
    }
}

/// `M[v][u] = 1` for every edge `u → v`, so `M x` sums over in-neighbors.
fn transposed_adjacency(g: &ReactionGraph) -> DMatrix<f64> {
    let n = g.node_count();
    let mut m = DMatrix::<f64>::zeros(n, n);
    for e in g.graph().edge_references() {
        m[(e.target().index(), e.source().index())] = 1.0;
    }
    m
}

/// `H M H` for a fixed Householder reflection `H`; same eigenvalues as `m`.
///
/// Shifted QR stalls on permutation-like matrices such as a bare directed
/// cycle, whose Hessenberg form is already a permutation.
#[allow(clippy::cast_precision_loss)]
fn reflect(m: &DMatrix<f64>) -> DMatrix<f64> {
    let n = m.nrows();
    let v = DVector::<f64>::from_fn(n, |i, _| (i + 1) as f64);
    let h = DMatrix::<f64>::identity(n, n) - (&v * v.transpose()) * (2.0 / v.norm_squared());
    &h * m * &h
}

/// Eigenvalues of `m` from the first Schur attempt that converges.
///
/// Each attempt is `(eps, max_iter)`; `max_iter == 0` means no cap.
fn schur_eigenvalues(m: &DMatrix<f64>, attempts: &[(f64, usize)]) -> Option<Vec<Complex<f64>>> {
    let reflected = reflect(m);
    attempts.iter().enumerate().find_map(|(i, &(eps, max_iter))| {
        let schur = reflected.clone().try_schur(eps, max_iter);
        if schur.is_none() {
            debug!(attempt = i + 1, eps, max_iter, "schur decomposition did not converge");
        }
        schur.map(|s| s.complex_eigenvalues().iter().copied().collect())
    })
}

#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
fn dominant_left(g: &ReactionGraph, cfg: &EigenConfig) -> Result<(f64, Vec<f64>), NonConvergence> {
    let n = g.node_count();
    if cfg.max_nodes != 0 && n > cfg.max_nodes {
        return Err(NonConvergence::TooLarge {
            nodes: n,
            limit: cfg.max_nodes,
        });
    }
    if !is_cyclic_directed(g.graph()) {
        return Err(NonConvergence::Nilpotent);
    }

    let m = transposed_adjacency(g);
    let max_iter = 100 * n + 1000;

    let attempts = [(f64::EPSILON, max_iter), (RELAXED_SCHUR_EPS, 0)];
    let eigenvalues = schur_eigenvalues(&m, &attempts).ok_or(NonConvergence::SolverFailed)?;
    let dominant = eigenvalues
        .iter()
        .copied()
        .max_by(|a, b| a.re.total_cmp(&b.re))
        .ok_or(NonConvergence::SolverFailed)?;

    let lambda = dominant.re;
    let scale = lambda.abs().max(1.0);
    if lambda <= cfg.tolerance {
        return Err(NonConvergence::Nilpotent);
    }
    if dominant.im.abs() > CLUSTER_TOLERANCE * scale {
        return Err(NonConvergence::ComplexDominant {
            re: dominant.re,
            im: dominant.im,
        });
    }

    let multiplicity = eigenvalues
        .iter()
        .filter(|z| {
            (z.re - lambda).abs() <= CLUSTER_TOLERANCE * scale
                && z.im.abs() <= CLUSTER_TOLERANCE * scale
        })
        .count();
    if multiplicity > 1 {
        return Err(NonConvergence::RepeatedDominant {
            eigenvalue: lambda,
            multiplicity,
        });
    }

    let shifted = &m - DMatrix::<f64>::identity(n, n) * lambda;
    let svd = shifted
        .try_svd(false, true, f64::EPSILON, max_iter)
        .ok_or(NonConvergence::SolverFailed)?;
    let v_t = svd.v_t.as_ref().ok_or(NonConvergence::SolverFailed)?;
    let (k, _) = svd
        .singular_values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .ok_or(NonConvergence::SolverFailed)?;
    let x: DVector<f64> = v_t.row(k).transpose();

    let residual = (&m * &x - &x * lambda).norm();
    if residual > cfg.tolerance * scale * (n as f64).sqrt() {
        return Err(NonConvergence::Residual { residual });
    }

    let sum = x.sum();
    let norm = x.norm();
    if norm == 0.0 || sum.abs() <= cfg.tolerance * norm {
        return Err(NonConvergence::SignIndefinite);
    }

    let factor = sum.signum() * norm;
    let scores = x
        .iter()
        .map(|v| {
            let s = v / factor;
            if s.abs() < ZERO_CLAMP { 0.0 } else { s }
        })
        .collect();
    Ok((lambda, scores))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(nodes: &[&str], edges: &[(&str, &str)]) -> ReactionGraph {
        ReactionGraph::from_parts("t", nodes.iter().copied(), edges.iter().copied())
            .expect("valid graph")
    }

    fn value(outcome: &EigenvectorOutcome, id: &str) -> f64 {
        outcome.scores[id].value().expect("score available")
    }

    #[test]
    fn empty_graph_is_empty_and_available() {
        let out = eigenvector_left(&graph(&[], &[]), &EigenConfig::default());
        assert!(out.scores.is_empty());
        assert!(out.is_available());
    }

    #[test]
    fn directed_triangle_is_uniform() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C"), ("C", "A")]);
        let out = eigenvector_left(&g, &EigenConfig::default());
        assert!(out.is_available(), "{:?}", out.failure);
        assert!((out.eigenvalue.expect("eigenvalue") - 1.0).abs() < 1e-9);
        let expected = 1.0 / 3.0_f64.sqrt();
        for id in ["A", "B", "C"] {
            assert!((value(&out, id) - expected).abs() < 1e-8, "{id}");
        }
    }

    #[test]
    fn left_and_right_differ_on_a_tail() {
        // A ↔ B, B → C
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "A"), ("B", "C")]);
        let cfg = EigenConfig::default();

        // x_C = x_B: C is fed by the cycle
        let left = eigenvector_left(&g, &cfg);
        let third = 1.0 / 3.0_f64.sqrt();
        for id in ["A", "B", "C"] {
            assert!((value(&left, id) - third).abs() < 1e-8, "left {id}");
        }

        // C feeds nothing
        let right = eigenvector_right(&g, &cfg);
        let half = 1.0 / 2.0_f64.sqrt();
        assert!((value(&right, "A") - half).abs() < 1e-8);
        assert!((value(&right, "B") - half).abs() < 1e-8);
        assert!((value(&right, "C") - 0.0).abs() < 1e-12);
    }

    #[test]
    fn self_loop_alone_scores_one() {
        let g = graph(&["D"], &[("D", "D")]);
        let out = eigenvector_left(&g, &EigenConfig::default());
        assert!((value(&out, "D") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn acyclic_graph_is_not_available() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let out = eigenvector_left(&g, &EigenConfig::default());
        assert_eq!(out.failure, Some(NonConvergence::Nilpotent));
        assert!(out.scores.values().all(|s| *s == Score::NotAvailable));
        assert_eq!(out.scores.len(), 3);
    }

    #[test]
    fn isolated_node_is_not_available() {
        let out = eigenvector_right(&graph(&["A"], &[]), &EigenConfig::default());
        assert_eq!(out.failure, Some(NonConvergence::Nilpotent));
        assert_eq!(out.scores["A"], Score::NotAvailable);
    }

    #[test]
    fn two_equal_cycles_are_ambiguous() {
        // A ↔ B → C ↔ D: λ = 1 twice
        let g = graph(
            &["A", "B", "C", "D"],
            &[("A", "B"), ("B", "A"), ("B", "C"), ("C", "D"), ("D", "C")],
        );
        let out = eigenvector_left(&g, &EigenConfig::default());
        assert!(
            matches!(out.failure, Some(NonConvergence::RepeatedDominant { .. })),
            "{:?}",
            out.failure
        );
    }

    #[test]
    fn size_limit_applies() {
        let g = graph(&["A", "B"], &[("A", "B"), ("B", "A")]);
        let cfg = EigenConfig {
            max_nodes: 1,
            ..EigenConfig::default()
        };
        let out = eigenvector_left(&g, &cfg);
        assert_eq!(out.failure, Some(NonConvergence::TooLarge { nodes: 2, limit: 1 }));
    }

    #[test]
    fn zero_cutoff_means_unlimited() {
        let cfg = EigenConfig::default();
        assert_eq!(cfg.max_nodes, 0);
        let g = graph(&["A", "B"], &[("A", "B"), ("B", "A")]);
        let out = eigenvector_left(&g, &cfg);
        assert!(out.is_available(), "{:?}", out.failure);
    }

    #[test]
    fn scores_are_unit_norm_and_non_negative() {
        let g = graph(
            &["A", "B", "C", "D", "E"],
            &[("A", "B"), ("B", "C"), ("C", "A"), ("C", "D"), ("D", "E"), ("A", "A")],
        );
        let out = eigenvector_left(&g, &EigenConfig::default());
        assert!(out.is_available(), "{:?}", out.failure);
        let values: Vec<f64> = out.scores.values().filter_map(|s| s.value()).collect();
        let norm: f64 = values.iter().map(|v| v * v).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        assert!(values.iter().all(|v| *v >= -1e-9));
    }

    #[test]
    fn schur_retries_after_hitting_iteration_cap() {
        // 6-cycle with chord A → D: cycles of length 6 and 4 through A, so
        // λ⁶ = λ² + 1
        let g = graph(
            &["A", "B", "C", "D", "E", "F"],
            &[
                ("A", "B"),
                ("B", "C"),
                ("C", "D"),
                ("D", "E"),
                ("E", "F"),
                ("F", "A"),
                ("A", "D"),
            ],
        );
        let m = transposed_adjacency(&g);
        assert!(schur_eigenvalues(&m, &[(f64::EPSILON, 1)]).is_none());

        let attempts = [(f64::EPSILON, 1), (RELAXED_SCHUR_EPS, 0)];
        let eigenvalues = schur_eigenvalues(&m, &attempts).expect("relaxed attempt converges");
        let top = eigenvalues.iter().map(|z| z.re).fold(f64::MIN, f64::max);
        let x = top * top;
        assert!((x * x * x - x - 1.0).abs() < 1e-9, "λ = {top}");

        let out = eigenvector_left(&g, &EigenConfig::default());
        assert!(out.is_available(), "{:?}", out.failure);
        assert!((out.eigenvalue.expect("eigenvalue") - top).abs() < 1e-9);
    }
}
