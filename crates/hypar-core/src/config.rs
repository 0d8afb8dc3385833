//! Run configuration for the partitioning engine.
//!
//! The configuration is deserializable from YAML; every field except `k`
//! has a documented default so partial files stay valid.
//! [`PartitionConfig::validate`] rejects inconsistent configurations before
//! a run starts.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, HyparError};
use crate::ids::PartitionId;

/// Top-level partitioning mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Coarsen once and compute a k-way partition of the coarsest hypergraph.
    #[default]
    DirectKway,
    /// Recursively bisect the hypergraph until k blocks remain.
    RecursiveBisection,
}

/// Objective minimized over cut hyperedges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
    /// Sum of weights of hyperedges spanning more than one block.
    Cut,
    /// The (lambda - 1) metric: sum of w(e) * (lambda(e) - 1).
    #[default]
    Connectivity,
}

/// Rating function used to score candidate contractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RatingFunction {
    /// Heavy-edge rating: sum of w(e) / (|pins(e)| - 1) scaled by the
    /// inverse product of the endpoint weights.
    #[default]
    HeavyEdge,
}

/// Initial partitioning heuristic selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InitialAlgorithm {
    /// Run every heuristic and keep the best candidate.
    #[default]
    Pool,
    /// Random assignment to the lightest fitting block.
    Random,
    /// Breadth-first region growing from random seed vertices.
    Bfs,
    /// Greedy growth absorbing whole hyperedges into the lightest block.
    GreedyHyperedge,
    /// Label propagation over an initial random assignment.
    LabelPropagation,
}

/// Refinement algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RefineAlgorithm {
    /// Move-based k-way FM local search.
    #[default]
    KwayFm,
    /// Two-queue FM for bisections.
    TwowayFm,
}

/// Coarsening phase parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoarseningConfig {
    /// Stop coarsening once at most `multiplier * k` hypernodes remain.
    #[serde(default = "default_contraction_limit_multiplier")]
    pub contraction_limit_multiplier: u32,
    /// Shrink factor `s` in the contraction weight cap `ceil(w(V) / (s * k))`.
    #[serde(default = "default_max_allowed_weight_multiplier")]
    pub max_allowed_weight_multiplier: f64,
    /// Rating function scoring candidate contractions.
    #[serde(default)]
    pub rating: RatingFunction,
    /// Hyperedges with more pins than this are ignored by the rater.
    #[serde(default = "default_large_edge_threshold")]
    pub large_edge_threshold: usize,
}

fn default_contraction_limit_multiplier() -> u32 {
    160
}

fn default_max_allowed_weight_multiplier() -> f64 {
    3.25
}

fn default_large_edge_threshold() -> usize {
    1000
}

impl Default for CoarseningConfig {
    fn default() -> Self {
        Self {
            contraction_limit_multiplier: default_contraction_limit_multiplier(),
            max_allowed_weight_multiplier: default_max_allowed_weight_multiplier(),
            rating: RatingFunction::default(),
            large_edge_threshold: default_large_edge_threshold(),
        }
    }
}

/// Initial partitioning parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialPartitioningConfig {
    /// Number of attempts per heuristic; each attempt draws a fresh
    /// substream seed.
    #[serde(default = "default_initial_runs")]
    pub runs: u32,
    /// Heuristic (or pool of heuristics) producing candidates.
    #[serde(default)]
    pub algorithm: InitialAlgorithm,
}

fn default_initial_runs() -> u32 {
    20
}

impl Default for InitialPartitioningConfig {
    fn default() -> Self {
        Self {
            runs: default_initial_runs(),
            algorithm: InitialAlgorithm::default(),
        }
    }
}

/// Refinement phase parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementConfig {
    /// Refinement algorithm; bisection steps always use two-way FM.
    #[serde(default)]
    pub algorithm: RefineAlgorithm,
    /// Maximum FM passes per uncontraction level.
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,
    /// The stagnation window is `ceil(fraction * sqrt(|border|))` moves
    /// without improvement.
    #[serde(default = "default_stagnation_fraction")]
    pub stagnation_fraction: f64,
    /// Hard cap on moves per pass; 0 means unlimited.
    #[serde(default)]
    pub max_moves: usize,
}

fn default_max_passes() -> u32 {
    3
}

fn default_stagnation_fraction() -> f64 {
    1.0
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            algorithm: RefineAlgorithm::default(),
            max_passes: default_max_passes(),
            stagnation_fraction: default_stagnation_fraction(),
            max_moves: 0,
        }
    }
}

/// Complete configuration of one partitioning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Number of blocks; must be at least 2.
    pub k: PartitionId,
    /// Allowed imbalance; block weights may reach `(1 + epsilon)` times the
    /// perfectly balanced weight. Zero demands perfect balance.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Master seed for all stochastic choices of the run.
    #[serde(default)]
    pub seed: u64,
    /// Objective minimized over cut hyperedges.
    #[serde(default)]
    pub objective: Objective,
    /// Partitioning mode.
    #[serde(default)]
    pub mode: Mode,
    /// Number of V-cycles performed after the initial partition; direct
    /// k-way mode only.
    #[serde(default)]
    pub v_cycles: u32,
    /// Coarsening parameters.
    #[serde(default)]
    pub coarsening: CoarseningConfig,
    /// Initial partitioning parameters.
    #[serde(default)]
    pub initial_partitioning: InitialPartitioningConfig,
    /// Refinement parameters.
    #[serde(default)]
    pub refinement: RefinementConfig,
    /// Suppresses banner and summary output in the CLI.
    #[serde(default)]
    pub quiet_mode: bool,
    /// Recognized for compatibility; forced off whenever fixed vertices are
    /// present. The sparsifier itself is an external preprocessor.
    #[serde(default)]
    pub enable_min_hash_sparsifier: bool,
}

fn default_epsilon() -> f64 {
    0.03
}

impl PartitionConfig {
    /// Returns a default configuration for the given number of blocks.
    pub fn with_k(k: PartitionId) -> Self {
        Self {
            k,
            epsilon: default_epsilon(),
            seed: 0,
            objective: Objective::default(),
            mode: Mode::default(),
            v_cycles: 0,
            coarsening: CoarseningConfig::default(),
            initial_partitioning: InitialPartitioningConfig::default(),
            refinement: RefinementConfig::default(),
            quiet_mode: false,
            enable_min_hash_sparsifier: false,
        }
    }

    /// Checks the configuration for consistency.
    pub fn validate(&self) -> Result<(), HyparError> {
        if self.k < 2 {
            return Err(config_error(
                ErrorInfo::new("bad-k", "k must be at least 2").with_context("k", self.k),
            ));
        }
        if !(self.epsilon >= 0.0) || !self.epsilon.is_finite() {
            return Err(config_error(
                ErrorInfo::new("bad-epsilon", "epsilon must be non-negative and finite")
                    .with_context("epsilon", self.epsilon),
            ));
        }
        if self.v_cycles > 0 && self.mode == Mode::RecursiveBisection {
            return Err(config_error(
                ErrorInfo::new(
                    "vcycle-mode-conflict",
                    "V-cycles are not supported in recursive bisection mode",
                )
                .with_context("v_cycles", self.v_cycles),
            ));
        }
        if self.refinement.algorithm == RefineAlgorithm::TwowayFm
            && self.mode == Mode::DirectKway
            && self.k > 2
        {
            return Err(config_error(
                ErrorInfo::new(
                    "twoway-needs-bisection",
                    "two-way FM refines bisections only; use kway-fm for k > 2",
                )
                .with_context("k", self.k),
            ));
        }
        if self.coarsening.contraction_limit_multiplier == 0 {
            return Err(config_error(ErrorInfo::new(
                "bad-contraction-limit",
                "contraction limit multiplier must be positive",
            )));
        }
        if !(self.coarsening.max_allowed_weight_multiplier > 0.0) {
            return Err(config_error(ErrorInfo::new(
                "bad-weight-multiplier",
                "max allowed weight multiplier must be positive",
            )));
        }
        if self.initial_partitioning.runs == 0 {
            return Err(config_error(ErrorInfo::new(
                "bad-initial-runs",
                "initial partitioning needs at least one run",
            )));
        }
        if self.refinement.max_passes == 0 {
            return Err(config_error(ErrorInfo::new(
                "bad-max-passes",
                "refinement needs at least one pass",
            )));
        }
        if !(self.refinement.stagnation_fraction > 0.0) {
            return Err(config_error(ErrorInfo::new(
                "bad-stagnation-fraction",
                "stagnation fraction must be positive",
            )));
        }
        Ok(())
    }
}

fn config_error(info: ErrorInfo) -> HyparError {
    HyparError::Config(info)
}
