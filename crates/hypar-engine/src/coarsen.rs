//! Pass-based coarsening driven by heavy-edge ratings.

use hypar_core::{HypernodeId, PartitionConfig, RngHandle};
use hypar_ds::{ContractionMemento, Hypergraph};
use tracing::debug;

use crate::rating::HeavyEdgeRater;

/// Contracts rated vertex pairs until at most
/// `contraction_limit_multiplier * k` hypernodes remain or a full pass
/// produces no contraction. Vertices are visited in a fresh seeded random
/// permutation each pass. With `restrict_to_blocks` set (V-cycle
/// recoarsening) only intra-block pairs are contracted.
///
/// Returns the hierarchy stack: mementos in chronological order, to be
/// popped LIFO during uncoarsening.
pub fn coarsen(
    hg: &mut Hypergraph,
    config: &PartitionConfig,
    rng: &mut RngHandle,
    restrict_to_blocks: bool,
) -> Vec<ContractionMemento> {
    let limit = config.coarsening.contraction_limit_multiplier as usize * hg.k();
    let mut rater = HeavyEdgeRater::new(hg, &config.coarsening);
    let mut mementos = Vec::new();
    let mut permutation: Vec<HypernodeId> = Vec::with_capacity(hg.current_num_nodes());
    let mut pass = 0usize;

    while hg.current_num_nodes() > limit {
        permutation.clear();
        permutation.extend(hg.nodes());
        rng.shuffle(&mut permutation);

        let mut contracted = 0usize;
        for &u in &permutation {
            if hg.current_num_nodes() <= limit {
                break;
            }
            // u may have been contracted away earlier in this pass
            if !hg.is_node_enabled(u) {
                continue;
            }
            if let Some(v) = rater.rate(hg, u, restrict_to_blocks) {
                mementos.push(hg.contract(u, v));
                contracted += 1;
            }
        }
        pass += 1;
        debug!(
            pass,
            contracted,
            nodes = hg.current_num_nodes(),
            edges = hg.current_num_edges(),
            "coarsening pass finished"
        );
        if contracted == 0 {
            break;
        }
    }
    mementos
}
