//! Partition quality metrics.
//!
//! Everything here recomputes from scratch in O(|V| + |E|); the refiners
//! track the objective incrementally through the deltas reported by
//! [`Hypergraph::change_part`](hypar_ds::Hypergraph::change_part).

use hypar_core::{HyperedgeWeight, HypernodeWeight, Objective, PartitionId};
use hypar_ds::Hypergraph;

/// Weighted sum of hyperedges spanning more than one block.
pub fn cut(hg: &Hypergraph) -> HyperedgeWeight {
    hg.edges()
        .filter(|&e| hg.connectivity(e) > 1)
        .map(|e| hg.edge_weight(e))
        .sum()
}

/// The (lambda - 1) metric: sum of w(e) * (lambda(e) - 1).
pub fn connectivity(hg: &Hypergraph) -> HyperedgeWeight {
    hg.edges()
        .map(|e| hg.edge_weight(e) * hg.connectivity(e).saturating_sub(1) as HyperedgeWeight)
        .sum()
}

/// The configured objective, recomputed from scratch.
pub fn objective(hg: &Hypergraph, objective: Objective) -> HyperedgeWeight {
    match objective {
        Objective::Cut => cut(hg),
        Objective::Connectivity => connectivity(hg),
    }
}

/// Weight of a perfectly balanced block: `ceil(total / k)`.
pub fn perfect_block_weight(total: HypernodeWeight, k: usize) -> HypernodeWeight {
    (total + k as HypernodeWeight - 1) / k as HypernodeWeight
}

/// Maximum allowed block weight `ceil((1 + epsilon) * ceil(total / k))`.
pub fn max_allowed_block_weight(
    total: HypernodeWeight,
    k: usize,
    epsilon: f64,
) -> HypernodeWeight {
    ((1.0 + epsilon) * perfect_block_weight(total, k) as f64).ceil() as HypernodeWeight
}

/// Relative imbalance `max_p w(V_p) / ceil(total / k) - 1`.
pub fn imbalance(hg: &Hypergraph) -> f64 {
    let perfect = perfect_block_weight(hg.total_weight(), hg.k());
    if perfect == 0 {
        return 0.0;
    }
    let heaviest = (0..hg.k() as PartitionId)
        .map(|b| hg.block_weight(b))
        .max()
        .unwrap_or(0);
    heaviest as f64 / perfect as f64 - 1.0
}

/// Weights of all blocks in block order.
pub fn block_weights(hg: &Hypergraph) -> Vec<HypernodeWeight> {
    (0..hg.k() as PartitionId).map(|b| hg.block_weight(b)).collect()
}
