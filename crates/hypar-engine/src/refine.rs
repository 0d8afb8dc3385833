//! Move-based FM local search over the gain queue.
//!
//! Both refiners follow the same discipline: seed the queue with the border
//! vertices of the current level, repeatedly perform the highest-gain move
//! that keeps every block within its budget (worsening moves included),
//! and finally roll the move log back to the prefix with the best observed
//! objective. A vertex moves at most once per pass; gains of neighbouring
//! queue entries are delta-updated after every accepted move.

use hypar_core::{
    HyperedgeId, HyperedgeWeight, HypernodeId, HypernodeWeight, Objective, PartitionConfig,
    PartitionId, UNASSIGNED,
};
use hypar_ds::{GainQueue, Hypergraph, InsertOnlySparseSet, MoveDelta};
use tracing::trace;

/// Gain of moving `v` from `from` to `to`, recomputed from scratch:
/// the weight of hyperedges that would leave `from` entirely minus the
/// weight of hyperedges that do not touch `to` yet.
pub fn fm_gain(
    hg: &Hypergraph,
    v: HypernodeId,
    from: PartitionId,
    to: PartitionId,
) -> HyperedgeWeight {
    let mut gain = 0;
    for &e in hg.incident_edges(v) {
        let w = hg.edge_weight(e);
        if hg.pin_count_in_part(e, from) == 1 {
            gain += w;
        }
        if hg.pin_count_in_part(e, to) == 0 {
            gain -= w;
        }
    }
    gain
}

#[derive(Debug, Clone, Copy)]
struct MoveRecord {
    node: HypernodeId,
    from: PartitionId,
    to: PartitionId,
}

/// Dispatches to the configured refinement algorithm.
#[derive(Debug)]
pub enum Refiner {
    /// General k-way FM.
    KWay(KWayFmRefiner),
    /// Two-queue FM for bisections.
    TwoWay(TwoWayFmRefiner),
}

impl Refiner {
    /// Builds the refiner for an instance: bisections refine with two-way
    /// FM, everything else with k-way FM.
    pub fn build(num_nodes: usize, k: usize) -> Self {
        if k == 2 {
            Refiner::TwoWay(TwoWayFmRefiner::new(num_nodes))
        } else {
            Refiner::KWay(KWayFmRefiner::new(num_nodes, k))
        }
    }

    /// Runs refinement passes seeded with `border`; returns true if the
    /// objective improved.
    pub fn refine(
        &mut self,
        hg: &mut Hypergraph,
        border: &[HypernodeId],
        config: &PartitionConfig,
        budgets: &[HypernodeWeight],
    ) -> bool {
        match self {
            Refiner::KWay(r) => r.refine(hg, border, config, budgets),
            Refiner::TwoWay(r) => r.refine(hg, border, config, budgets),
        }
    }
}

fn stagnation_window(fraction: f64, border_len: usize) -> usize {
    ((fraction * (border_len as f64).sqrt()).ceil() as usize).max(1)
}

fn objective_delta(objective: Objective, delta: MoveDelta) -> HyperedgeWeight {
    match objective {
        Objective::Cut => delta.cut,
        Objective::Connectivity => delta.km1,
    }
}

/// k-way FM: one queue entry per (vertex, adjacent block) pair.
#[derive(Debug)]
pub struct KWayFmRefiner {
    k: usize,
    queue: GainQueue,
    locked: InsertOnlySparseSet,
    active: InsertOnlySparseSet,
    adjacent: InsertOnlySparseSet,
    rollback: Vec<MoveRecord>,
    stash: Vec<(HypernodeId, PartitionId, HyperedgeWeight)>,
}

impl KWayFmRefiner {
    /// Sizes the refiner for `num_nodes` hypernodes and `k` blocks.
    pub fn new(num_nodes: usize, k: usize) -> Self {
        Self {
            k,
            queue: GainQueue::new(num_nodes, k),
            locked: InsertOnlySparseSet::new(num_nodes),
            active: InsertOnlySparseSet::new(num_nodes),
            adjacent: InsertOnlySparseSet::new(k),
            rollback: Vec::new(),
            stash: Vec::new(),
        }
    }

    /// Runs up to `max_passes` FM passes; returns true on improvement.
    pub fn refine(
        &mut self,
        hg: &mut Hypergraph,
        border: &[HypernodeId],
        config: &PartitionConfig,
        budgets: &[HypernodeWeight],
    ) -> bool {
        let mut current = crate::metrics::objective(hg, config.objective);
        let start = current;
        for _ in 0..config.refinement.max_passes {
            let before = current;
            current = self.run_pass(hg, border, config, budgets, current);
            if current >= before {
                break;
            }
        }
        current < start
    }

    fn run_pass(
        &mut self,
        hg: &mut Hypergraph,
        border: &[HypernodeId],
        config: &PartitionConfig,
        budgets: &[HypernodeWeight],
        mut current: HyperedgeWeight,
    ) -> HyperedgeWeight {
        self.queue.clear();
        self.locked.clear();
        self.active.clear();
        self.rollback.clear();

        for &v in border {
            if hg.is_node_enabled(v) && !hg.is_fixed(v) && !self.active.contains(v) {
                self.active.add(v);
                self.activate(hg, v);
            }
        }

        let window = stagnation_window(config.refinement.stagnation_fraction, border.len());
        let max_moves = config.refinement.max_moves;
        let mut best = current;
        let mut best_len = 0usize;
        let mut since_best = 0usize;

        while let Some((v, to, gain)) = self.pop_legal(hg, budgets) {
            let from = hg.part(v);
            debug_assert_ne!(from, to);
            let delta = hg.change_part(v, from, to);
            current += objective_delta(config.objective, delta);
            trace!(node = v, from, to, gain, objective = current, "fm move");
            self.locked.add(v);
            self.queue.remove_node(v);
            self.rollback.push(MoveRecord { node: v, from, to });
            self.update_neighbors(hg, v, from, to);

            if current < best {
                best = current;
                best_len = self.rollback.len();
                since_best = 0;
            } else {
                since_best += 1;
            }
            if max_moves != 0 && self.rollback.len() >= max_moves {
                break;
            }
            if since_best >= window {
                break;
            }
        }

        // undo everything after the best prefix
        for record in self.rollback.drain(best_len..).rev() {
            hg.change_part(record.node, record.to, record.from);
        }
        best
    }

    /// Inserts (v, b) moves for every block adjacent to v through its
    /// hyperedges.
    fn activate(&mut self, hg: &Hypergraph, v: HypernodeId) {
        let from = hg.part(v);
        debug_assert_ne!(from, UNASSIGNED);
        self.adjacent.clear();
        for &e in hg.incident_edges(v) {
            for &b in hg.connectivity_set(e) {
                if b != from {
                    self.adjacent.add(b as u32);
                }
            }
        }
        for b in 0..self.k as PartitionId {
            if self.adjacent.contains(b as u32) {
                self.queue.insert(v, b, fm_gain(hg, v, from, b));
            }
        }
    }

    /// Pops the best move whose target block still has room; stashed
    /// oversize candidates are re-queued so they stay available once
    /// weights shift.
    fn pop_legal(
        &mut self,
        hg: &Hypergraph,
        budgets: &[HypernodeWeight],
    ) -> Option<(HypernodeId, PartitionId, HyperedgeWeight)> {
        let mut found = None;
        while let Some((v, to, gain)) = self.queue.pop() {
            if hg.block_weight(to) + hg.node_weight(v) <= budgets[to as usize] {
                found = Some((v, to, gain));
                break;
            }
            self.stash.push((v, to, gain));
        }
        for &(v, to, gain) in &self.stash {
            self.queue.insert(v, to, gain);
        }
        self.stash.clear();
        found
    }

    /// Delta-updates the queue after moving `v` from `from` to `to`.
    ///
    /// Only the pin-count transitions 2->1 and 1->0 on the source block and
    /// 0->1 and 1->2 on the target block change any neighbour's gain, so
    /// each hyperedge of `v` touches its pins at most once.
    fn update_neighbors(
        &mut self,
        hg: &Hypergraph,
        v: HypernodeId,
        from: PartitionId,
        to: PartitionId,
    ) {
        for i in 0..hg.node_degree(v) {
            let e = hg.incident_edges(v)[i];
            let w = hg.edge_weight(e);
            let remaining_from = hg.pin_count_in_part(e, from);
            let arrived_to = hg.pin_count_in_part(e, to);

            if remaining_from == 0 {
                // moving into `from` now costs w(e) for every pin of e
                for j in 0..hg.edge_size(e) {
                    let u = hg.pins(e)[j];
                    if u != v {
                        self.adjust_entry(u, from, -w);
                    }
                }
            } else if remaining_from == 1 {
                // the last pin left in `from` can now free e by leaving
                if let Some(u) = pin_in_part(hg, e, from, v) {
                    self.boost_all_targets(u, w);
                }
            }

            if arrived_to == 1 {
                // e no longer penalizes moves into `to`
                for j in 0..hg.edge_size(e) {
                    let u = hg.pins(e)[j];
                    if u != v {
                        self.credit_target(hg, u, to, w);
                    }
                }
            } else if arrived_to == 2 {
                // the other pin in `to` loses its chance to free e
                if let Some(u) = pin_in_part(hg, e, to, v) {
                    self.boost_all_targets(u, -w);
                }
            }
        }
    }

    fn adjust_entry(&mut self, u: HypernodeId, block: PartitionId, delta: HyperedgeWeight) {
        if !self.locked.contains(u) && self.queue.contains(u, block) {
            self.queue.update_by(u, block, delta);
        }
    }

    /// Adds `delta` to the gain of `(u, block)`, inserting the entry fresh
    /// when `block` just became adjacent to an active vertex.
    fn credit_target(
        &mut self,
        hg: &Hypergraph,
        u: HypernodeId,
        block: PartitionId,
        delta: HyperedgeWeight,
    ) {
        if self.locked.contains(u) || hg.is_fixed(u) || hg.part(u) == block {
            return;
        }
        if self.queue.contains(u, block) {
            self.queue.update_by(u, block, delta);
        } else if self.active.contains(u) {
            self.queue.insert(u, block, fm_gain(hg, u, hg.part(u), block));
        }
    }

    fn boost_all_targets(&mut self, u: HypernodeId, delta: HyperedgeWeight) {
        if self.locked.contains(u) {
            return;
        }
        for b in 0..self.k as PartitionId {
            if self.queue.contains(u, b) {
                self.queue.update_by(u, b, delta);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn queued_gains(&self) -> Vec<(HypernodeId, PartitionId, HyperedgeWeight)> {
        let mut entries = Vec::new();
        let mut queue = self.queue.clone();
        while let Some(entry) = queue.pop() {
            entries.push(entry);
        }
        entries
    }
}

fn pin_in_part(
    hg: &Hypergraph,
    e: HyperedgeId,
    block: PartitionId,
    exclude: HypernodeId,
) -> Option<HypernodeId> {
    hg.pins(e)
        .iter()
        .copied()
        .find(|&p| p != exclude && hg.part(p) == block)
}

/// Two-way FM: a single prospective move per vertex, to the opposite side.
#[derive(Debug)]
pub struct TwoWayFmRefiner {
    queue: GainQueue,
    locked: InsertOnlySparseSet,
    active: InsertOnlySparseSet,
    rollback: Vec<MoveRecord>,
    stash: Vec<(HypernodeId, PartitionId, HyperedgeWeight)>,
}

impl TwoWayFmRefiner {
    /// Sizes the refiner for a bisection of `num_nodes` hypernodes.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            queue: GainQueue::new(num_nodes, 2),
            locked: InsertOnlySparseSet::new(num_nodes),
            active: InsertOnlySparseSet::new(num_nodes),
            rollback: Vec::new(),
            stash: Vec::new(),
        }
    }

    /// Runs up to `max_passes` FM passes; returns true on improvement.
    pub fn refine(
        &mut self,
        hg: &mut Hypergraph,
        border: &[HypernodeId],
        config: &PartitionConfig,
        budgets: &[HypernodeWeight],
    ) -> bool {
        debug_assert_eq!(hg.k(), 2);
        let mut current = crate::metrics::objective(hg, config.objective);
        let start = current;
        for _ in 0..config.refinement.max_passes {
            let before = current;
            current = self.run_pass(hg, border, config, budgets, current);
            if current >= before {
                break;
            }
        }
        current < start
    }

    fn run_pass(
        &mut self,
        hg: &mut Hypergraph,
        border: &[HypernodeId],
        config: &PartitionConfig,
        budgets: &[HypernodeWeight],
        mut current: HyperedgeWeight,
    ) -> HyperedgeWeight {
        self.queue.clear();
        self.locked.clear();
        self.active.clear();
        self.rollback.clear();

        for &v in border {
            if hg.is_node_enabled(v) && !hg.is_fixed(v) && !self.active.contains(v) {
                self.active.add(v);
                let from = hg.part(v);
                let to = 1 - from;
                self.queue.insert(v, to, fm_gain(hg, v, from, to));
            }
        }

        let window = stagnation_window(config.refinement.stagnation_fraction, border.len());
        let max_moves = config.refinement.max_moves;
        let mut best = current;
        let mut best_len = 0usize;
        let mut since_best = 0usize;

        while let Some((v, to, _gain)) = self.pop_legal(hg, budgets) {
            let from = hg.part(v);
            let delta = hg.change_part(v, from, to);
            current += objective_delta(config.objective, delta);
            self.locked.add(v);
            self.rollback.push(MoveRecord { node: v, from, to });
            self.update_neighbors(hg, v, from, to);

            if current < best {
                best = current;
                best_len = self.rollback.len();
                since_best = 0;
            } else {
                since_best += 1;
            }
            if max_moves != 0 && self.rollback.len() >= max_moves {
                break;
            }
            if since_best >= window {
                break;
            }
        }

        for record in self.rollback.drain(best_len..).rev() {
            hg.change_part(record.node, record.to, record.from);
        }
        best
    }

    fn pop_legal(
        &mut self,
        hg: &Hypergraph,
        budgets: &[HypernodeWeight],
    ) -> Option<(HypernodeId, PartitionId, HyperedgeWeight)> {
        let mut found = None;
        while let Some((v, to, gain)) = self.queue.pop() {
            if hg.block_weight(to) + hg.node_weight(v) <= budgets[to as usize] {
                found = Some((v, to, gain));
                break;
            }
            self.stash.push((v, to, gain));
        }
        for &(v, to, gain) in &self.stash {
            self.queue.insert(v, to, gain);
        }
        self.stash.clear();
        found
    }

    /// Two-way delta updates: only the 2->1 / 1->0 transitions on the left
    /// side and 0->1 / 1->2 on the entered side matter.
    fn update_neighbors(
        &mut self,
        hg: &Hypergraph,
        v: HypernodeId,
        from: PartitionId,
        to: PartitionId,
    ) {
        for i in 0..hg.node_degree(v) {
            let e = hg.incident_edges(v)[i];
            let w = hg.edge_weight(e);
            let remaining_from = hg.pin_count_in_part(e, from);
            let arrived_to = hg.pin_count_in_part(e, to);

            if remaining_from == 0 {
                // pins in `to` lose the reward for pulling e out of `from`
                self.adjust_edge_pins(hg, e, v, from, -w);
            } else if remaining_from == 1 {
                if let Some(u) = pin_in_part(hg, e, from, v) {
                    self.adjust_single(u, to, w);
                }
            }

            if arrived_to == 1 {
                self.adjust_edge_pins(hg, e, v, to, w);
            } else if arrived_to == 2 {
                if let Some(u) = pin_in_part(hg, e, to, v) {
                    self.adjust_single(u, from, -w);
                }
            }
        }
    }

    /// Applies `delta` to the queued move of every unlocked pin of `e`
    /// whose move targets `target`.
    fn adjust_edge_pins(
        &mut self,
        hg: &Hypergraph,
        e: HyperedgeId,
        moved: HypernodeId,
        target: PartitionId,
        delta: HyperedgeWeight,
    ) {
        for j in 0..hg.edge_size(e) {
            let u = hg.pins(e)[j];
            if u != moved && hg.part(u) != target {
                self.adjust_single(u, target, delta);
            }
        }
    }

    fn adjust_single(&mut self, u: HypernodeId, target: PartitionId, delta: HyperedgeWeight) {
        if !self.locked.contains(u) && self.queue.contains(u, target) {
            self.queue.update_by(u, target, delta);
        }
    }
}
