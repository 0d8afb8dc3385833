//! Initial partitioning of the coarsest hypergraph.
//!
//! A pool of cheap heuristics runs `runs` times each on derived RNG
//! substreams; every candidate is scored by (feasibility, objective,
//! imbalance) and the best one is applied. Fixed vertices are pre-assigned
//! in every attempt. When no candidate satisfies the balance budgets the
//! engine fails with `initial-partitioning-infeasible`.

use std::collections::VecDeque;

use hypar_core::{
    derive_substream_seed, ErrorInfo, HyparError, HyperedgeWeight, HypernodeId, HypernodeWeight,
    InitialAlgorithm, Objective, PartitionConfig, PartitionId, RngHandle, UNASSIGNED,
};
use hypar_ds::Hypergraph;
use tracing::debug;

use crate::metrics;

const LABEL_PROPAGATION_ROUNDS: usize = 5;

const POOL: [InitialAlgorithm; 4] = [
    InitialAlgorithm::Random,
    InitialAlgorithm::Bfs,
    InitialAlgorithm::GreedyHyperedge,
    InitialAlgorithm::LabelPropagation,
];

#[derive(Debug, Clone)]
struct Candidate {
    labels: Vec<PartitionId>,
    feasible: bool,
    objective: HyperedgeWeight,
    imbalance: f64,
}

impl Candidate {
    fn better_than(&self, other: &Candidate) -> bool {
        if self.feasible != other.feasible {
            return self.feasible;
        }
        if self.objective != other.objective {
            return self.objective < other.objective;
        }
        self.imbalance < other.imbalance
    }
}

/// Computes and applies the best initial partition of the current
/// (coarsest) hypergraph.
pub fn initial_partition(
    hg: &mut Hypergraph,
    config: &PartitionConfig,
    budgets: &[HypernodeWeight],
    master_seed: u64,
    warm_start: bool,
) -> Result<(), HyparError> {
    let k = hg.k();
    debug_assert_eq!(budgets.len(), k);

    // fixed vertices alone can bust a block budget; no heuristic recovers
    let mut fixed_weights = vec![0 as HypernodeWeight; k];
    for v in hg.fixed_vertices().collect::<Vec<_>>() {
        fixed_weights[hg.fixed_part(v) as usize] += hg.node_weight(v);
    }
    if let Some(block) = (0..k).find(|&b| fixed_weights[b] > budgets[b]) {
        return Err(HyparError::Infeasible(
            ErrorInfo::new(
                "initial-partitioning-infeasible",
                "fixed vertex weight exceeds the block budget",
            )
            .with_context("block", block)
            .with_context("fixed_weight", fixed_weights[block])
            .with_context("budget", budgets[block]),
        ));
    }

    let single;
    let algorithms: &[InitialAlgorithm] = match config.initial_partitioning.algorithm {
        InitialAlgorithm::Pool => &POOL,
        other => {
            single = [other];
            &single
        }
    };

    // with a warm start the incoming partition competes as a candidate
    let mut best: Option<Candidate> = warm_start.then(|| capture(hg, budgets, config.objective));

    let mut substream = 0u64;
    for attempt in 0..config.initial_partitioning.runs {
        for &algorithm in algorithms {
            let mut rng = RngHandle::from_seed(derive_substream_seed(master_seed, substream));
            substream += 1;
            hg.reset_partition();
            assign_fixed(hg);
            match algorithm {
                InitialAlgorithm::Random => random_assignment(hg, budgets, &mut rng),
                InitialAlgorithm::Bfs => bfs_growing(hg, budgets, &mut rng),
                InitialAlgorithm::GreedyHyperedge => greedy_hyperedge(hg, budgets, &mut rng),
                InitialAlgorithm::LabelPropagation => label_propagation(hg, budgets, &mut rng),
                InitialAlgorithm::Pool => unreachable!("pool expands to concrete algorithms"),
            }
            let candidate = capture(hg, budgets, config.objective);
            debug!(
                ?algorithm,
                attempt,
                objective = candidate.objective,
                feasible = candidate.feasible,
                "initial partitioning candidate"
            );
            if best.as_ref().map_or(true, |b| candidate.better_than(b)) {
                best = Some(candidate);
            }
        }
    }

    let best = best.expect("at least one candidate was produced");
    if !best.feasible {
        return Err(HyparError::Infeasible(ErrorInfo::new(
            "initial-partitioning-infeasible",
            "no heuristic produced a balanced partition of the coarsest hypergraph",
        )));
    }
    hg.reset_partition();
    apply_labels(hg, &best.labels);
    Ok(())
}

fn capture(hg: &Hypergraph, budgets: &[HypernodeWeight], objective: Objective) -> Candidate {
    let feasible =
        (0..hg.k() as PartitionId).all(|b| hg.block_weight(b) <= budgets[b as usize]);
    let labels = (0..hg.initial_num_nodes() as HypernodeId)
        .map(|v| hg.part(v))
        .collect();
    Candidate {
        labels,
        feasible,
        objective: metrics::objective(hg, objective),
        imbalance: metrics::imbalance(hg),
    }
}

fn apply_labels(hg: &mut Hypergraph, labels: &[PartitionId]) {
    let nodes: Vec<HypernodeId> = hg.nodes().collect();
    for v in nodes {
        debug_assert_ne!(labels[v as usize], UNASSIGNED);
        hg.set_part(v, labels[v as usize]);
    }
}

fn assign_fixed(hg: &mut Hypergraph) {
    let fixed: Vec<HypernodeId> = hg.fixed_vertices().collect();
    for v in fixed {
        let block = hg.fixed_part(v);
        hg.set_part(v, block);
    }
}

fn fits(
    hg: &Hypergraph,
    budgets: &[HypernodeWeight],
    v: HypernodeId,
    block: PartitionId,
) -> bool {
    hg.block_weight(block) + hg.node_weight(v) <= budgets[block as usize]
}

fn lightest_block(hg: &Hypergraph, k: usize) -> PartitionId {
    (0..k as PartitionId)
        .min_by_key(|&b| (hg.block_weight(b), b))
        .expect("k >= 2")
}

fn unassigned_nodes(hg: &Hypergraph) -> Vec<HypernodeId> {
    hg.nodes().filter(|&v| hg.part(v) == UNASSIGNED).collect()
}

fn next_unassigned(
    hg: &Hypergraph,
    pending: &[HypernodeId],
    cursor: &mut usize,
) -> Option<HypernodeId> {
    while *cursor < pending.len() {
        let v = pending[*cursor];
        *cursor += 1;
        if hg.part(v) == UNASSIGNED {
            return Some(v);
        }
    }
    None
}

/// Shuffled vertices join a random block that still fits them, falling back
/// to the lightest block.
fn random_assignment(hg: &mut Hypergraph, budgets: &[HypernodeWeight], rng: &mut RngHandle) {
    let k = hg.k();
    let mut nodes = unassigned_nodes(hg);
    rng.shuffle(&mut nodes);
    for v in nodes {
        let start = rng.below(k);
        let mut target = None;
        for offset in 0..k {
            let b = ((start + offset) % k) as PartitionId;
            if fits(hg, budgets, v, b) {
                target = Some(b);
                break;
            }
        }
        let block = target.unwrap_or_else(|| lightest_block(hg, k));
        hg.set_part(v, block);
    }
}

/// Grows one breadth-first region per block from random seeds, round-robin
/// over the blocks.
fn bfs_growing(hg: &mut Hypergraph, budgets: &[HypernodeWeight], rng: &mut RngHandle) {
    let k = hg.k();
    let mut pending = unassigned_nodes(hg);
    rng.shuffle(&mut pending);
    let mut cursor = 0usize;
    let mut remaining = pending.len();
    let mut queues: Vec<VecDeque<HypernodeId>> = (0..k).map(|_| VecDeque::new()).collect();

    while remaining > 0 {
        let mut progressed = false;
        for b in 0..k as PartitionId {
            let v = loop {
                match queues[b as usize].pop_front() {
                    Some(candidate) if hg.part(candidate) == UNASSIGNED => break Some(candidate),
                    Some(_) => continue,
                    None => break next_unassigned(hg, &pending, &mut cursor),
                }
            };
            let Some(v) = v else { continue };
            if fits(hg, budgets, v, b) {
                hg.set_part(v, b);
                remaining -= 1;
                progressed = true;
                enqueue_neighbors(hg, v, &mut queues[b as usize]);
            }
            // a rejected vertex stays unassigned; another frontier or the
            // fallback below picks it up
        }
        if !progressed {
            let Some(v) = pending.iter().copied().find(|&v| hg.part(v) == UNASSIGNED) else {
                break;
            };
            let block = fitting_or_lightest(hg, budgets, v);
            hg.set_part(v, block);
            remaining -= 1;
        }
    }
}

fn enqueue_neighbors(hg: &Hypergraph, v: HypernodeId, queue: &mut VecDeque<HypernodeId>) {
    for &e in hg.incident_edges(v) {
        for &p in hg.pins(e) {
            if hg.part(p) == UNASSIGNED {
                queue.push_back(p);
            }
        }
    }
}

fn fitting_or_lightest(
    hg: &Hypergraph,
    budgets: &[HypernodeWeight],
    v: HypernodeId,
) -> PartitionId {
    let k = hg.k();
    (0..k as PartitionId)
        .filter(|&b| fits(hg, budgets, v, b))
        .min_by_key(|&b| (hg.block_weight(b), b))
        .unwrap_or_else(|| lightest_block(hg, k))
}

/// Repeatedly absorbs the heaviest hyperedge touching the lightest block.
fn greedy_hyperedge(hg: &mut Hypergraph, budgets: &[HypernodeWeight], rng: &mut RngHandle) {
    let k = hg.k();
    let mut pending = unassigned_nodes(hg);
    rng.shuffle(&mut pending);
    let mut cursor = 0usize;
    let mut remaining = pending.len();

    while remaining > 0 {
        let block = lightest_block(hg, k);
        let mut best: Option<(HyperedgeWeight, u32)> = None;
        for e in hg.edges() {
            if hg.pin_count_in_part(e, block) == 0 {
                continue;
            }
            if hg.pins(e).iter().all(|&p| hg.part(p) != UNASSIGNED) {
                continue;
            }
            let w = hg.edge_weight(e);
            best = match best {
                None => Some((w, e)),
                Some((bw, be)) if w > bw || (w == bw && e < be) => Some((w, e)),
                keep => keep,
            };
        }

        let mut progressed = false;
        if let Some((_, e)) = best {
            let free_pins: Vec<HypernodeId> = hg
                .pins(e)
                .iter()
                .copied()
                .filter(|&p| hg.part(p) == UNASSIGNED)
                .collect();
            for p in free_pins {
                if fits(hg, budgets, p, block) {
                    hg.set_part(p, block);
                    remaining -= 1;
                    progressed = true;
                }
            }
        }
        if !progressed {
            // seed the block, or force placement when nothing fits
            let Some(v) = next_unassigned(hg, &pending, &mut cursor) else {
                break;
            };
            let target = if fits(hg, budgets, v, block) {
                block
            } else {
                fitting_or_lightest(hg, budgets, v)
            };
            hg.set_part(v, target);
            remaining -= 1;
        }
    }
}

/// Starts from a random assignment and moves vertices towards their most
/// connected block while the balance budgets allow it.
fn label_propagation(hg: &mut Hypergraph, budgets: &[HypernodeWeight], rng: &mut RngHandle) {
    random_assignment(hg, budgets, rng);
    let k = hg.k();
    let mut order: Vec<HypernodeId> = hg.nodes().filter(|&v| !hg.is_fixed(v)).collect();
    let mut connection = vec![0 as HyperedgeWeight; k];

    for _ in 0..LABEL_PROPAGATION_ROUNDS {
        rng.shuffle(&mut order);
        let mut moved = 0usize;
        for &v in &order {
            let from = hg.part(v);
            connection.fill(0);
            for &e in hg.incident_edges(v) {
                let w = hg.edge_weight(e);
                for &b in hg.connectivity_set(e) {
                    connection[b as usize] += w;
                }
            }
            let mut target = from;
            let mut best_score = connection[from as usize];
            for b in 0..k as PartitionId {
                if b != from && connection[b as usize] > best_score && fits(hg, budgets, v, b) {
                    best_score = connection[b as usize];
                    target = b;
                }
            }
            if target != from {
                hg.change_part(v, from, target);
                moved += 1;
            }
        }
        if moved == 0 {
            break;
        }
    }
}
