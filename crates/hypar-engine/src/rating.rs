//! Heavy-edge rating of candidate contractions.

use hypar_core::{CoarseningConfig, HypernodeId, HypernodeWeight};
use hypar_ds::{Hypergraph, InsertOnlySparseSet};

/// Scores contraction partners for a vertex and returns the best one.
///
/// The heavy-edge score of a pair (u, v) is
/// `sum over shared e of w(e) / (|pins(e)| - 1)`, scaled by
/// `1 / (w(u) * w(v))`. Candidates are rejected when the combined weight
/// exceeds the contraction cap, when the fixed-vertex compatibility rules
/// forbid the pair, or (during V-cycle recoarsening) when the endpoints sit
/// in different blocks. Hyperedges larger than the configured threshold are
/// skipped entirely.
pub struct HeavyEdgeRater {
    max_allowed_node_weight: HypernodeWeight,
    large_edge_threshold: usize,
    scores: Vec<f64>,
    touched: InsertOnlySparseSet,
}

impl HeavyEdgeRater {
    /// Sizes the rater for `hg`; the weight cap is
    /// `ceil(w(V) / (shrink * k))`.
    pub fn new(hg: &Hypergraph, config: &CoarseningConfig) -> Self {
        let shrunk_k = (config.max_allowed_weight_multiplier * hg.k() as f64).max(1.0);
        let cap = (hg.total_weight() as f64 / shrunk_k).ceil() as HypernodeWeight;
        let universe = hg.initial_num_nodes();
        Self {
            max_allowed_node_weight: cap.max(1),
            large_edge_threshold: config.large_edge_threshold,
            scores: vec![0.0; universe],
            touched: InsertOnlySparseSet::new(universe),
        }
    }

    /// The contraction weight cap used by this rater.
    pub fn max_allowed_node_weight(&self) -> HypernodeWeight {
        self.max_allowed_node_weight
    }

    /// Best contraction partner for `u`, or None when no neighbour is
    /// admissible. Ties on the score keep the smallest candidate id, which
    /// makes the choice deterministic under the seeded visit order.
    pub fn rate(
        &mut self,
        hg: &Hypergraph,
        u: HypernodeId,
        restrict_to_block: bool,
    ) -> Option<HypernodeId> {
        self.touched.clear();
        for &e in hg.incident_edges(u) {
            let size = hg.edge_size(e);
            if size < 2 || size > self.large_edge_threshold {
                continue;
            }
            let score = hg.edge_weight(e) as f64 / (size - 1) as f64;
            for &p in hg.pins(e) {
                if p == u {
                    continue;
                }
                if self.touched.contains(p) {
                    self.scores[p as usize] += score;
                } else {
                    self.touched.add(p);
                    self.scores[p as usize] = score;
                }
            }
        }

        let weight_u = hg.node_weight(u);
        let mut best: Option<(f64, HypernodeId)> = None;
        for v in self.touched.iter() {
            if !self.admissible(hg, u, v, restrict_to_block) {
                continue;
            }
            let score = self.scores[v as usize] / (weight_u * hg.node_weight(v)) as f64;
            best = match best {
                None => Some((score, v)),
                Some((best_score, best_v)) => {
                    if score > best_score || (score == best_score && v < best_v) {
                        Some((score, v))
                    } else {
                        Some((best_score, best_v))
                    }
                }
            };
        }
        best.map(|(_, v)| v)
    }

    fn admissible(
        &self,
        hg: &Hypergraph,
        u: HypernodeId,
        v: HypernodeId,
        restrict_to_block: bool,
    ) -> bool {
        if hg.node_weight(u) + hg.node_weight(v) > self.max_allowed_node_weight {
            return false;
        }
        // free pairs with free, fixed pairs with fixed of the same block;
        // UNASSIGNED marks free, so a single equality covers both rules
        if hg.fixed_part(u) != hg.fixed_part(v) {
            return false;
        }
        if restrict_to_block && hg.part(u) != hg.part(v) {
            return false;
        }
        true
    }
}
