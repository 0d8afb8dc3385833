//! Dynamic hypergraph with reversible contractions and incremental
//! partition bookkeeping.
//!
//! Incidence and pin lists keep their live entries in a contiguous prefix;
//! disabling an entry swaps it to the tail of the prefix and shrinks the
//! live count. Every mutation performed by [`Hypergraph::contract`] is
//! recorded as a [`Fixup`], and [`Hypergraph::uncontract`] replays the
//! inverses in reverse order, which restores the arrays to their exact
//! prior layout.
//!
//! Preconditions of all operations are enforced by assertions; violating
//! them is a programming error, not a recoverable failure.

use hypar_core::{
    HyperedgeId, HyperedgeWeight, HypernodeId, HypernodeWeight, PartitionId, UNASSIGNED,
};

use crate::memento::{ContractionMemento, Fixup};

#[derive(Debug, Clone)]
struct Hypernode {
    weight: HypernodeWeight,
    part: PartitionId,
    fixed_part: PartitionId,
    enabled: bool,
    incidence: Vec<HyperedgeId>,
    live: usize,
}

#[derive(Debug, Clone)]
struct Hyperedge {
    weight: HyperedgeWeight,
    enabled: bool,
    pins: Vec<HypernodeId>,
    live: usize,
}

/// Blocks with at least one pin of a hyperedge, as a small dense set.
#[derive(Debug, Clone, Default)]
struct ConnectivitySet {
    blocks: Vec<PartitionId>,
}

impl ConnectivitySet {
    fn contains(&self, block: PartitionId) -> bool {
        self.blocks.contains(&block)
    }

    fn add(&mut self, block: PartitionId) {
        debug_assert!(!self.contains(block));
        self.blocks.push(block);
    }

    fn remove(&mut self, block: PartitionId) {
        let pos = self
            .blocks
            .iter()
            .position(|&b| b == block)
            .expect("block must be in the connectivity set");
        self.blocks.swap_remove(pos);
    }
}

/// Objective deltas caused by a single vertex move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveDelta {
    /// Change of the cut metric (positive = worse).
    pub cut: HyperedgeWeight,
    /// Change of the (lambda - 1) metric (positive = worse).
    pub km1: HyperedgeWeight,
}

/// Dynamic hypergraph for one partitioning run.
///
/// Hypernodes and hyperedges are created once at construction and never
/// destroyed; contraction and partition assignment only flip enabled flags
/// and bookkeeping state. All derived partition state (pin counts per
/// block, connectivity sets, block weights) is maintained incrementally by
/// [`Hypergraph::set_part`], [`Hypergraph::change_part`],
/// [`Hypergraph::contract`] and [`Hypergraph::uncontract`].
#[derive(Debug, Clone)]
pub struct Hypergraph {
    hypernodes: Vec<Hypernode>,
    hyperedges: Vec<Hyperedge>,
    k: usize,
    total_weight: HypernodeWeight,
    num_enabled_hypernodes: usize,
    num_enabled_hyperedges: usize,
    num_assigned: usize,
    num_fixed: usize,
    pins_in_part: Vec<u32>,
    connectivity_sets: Vec<ConnectivitySet>,
    block_weights: Vec<HypernodeWeight>,
    block_sizes: Vec<usize>,
}

impl Hypergraph {
    /// Builds a hypergraph from pin lists and weights.
    ///
    /// `pins[e]` lists the hypernodes of hyperedge `e` without duplicates;
    /// weights default to 1 when the slices are empty. All state is
    /// pre-sized from `num_hypernodes`, the pin lists and `k`.
    pub fn new(
        num_hypernodes: usize,
        k: usize,
        pins: &[Vec<HypernodeId>],
        edge_weights: &[HyperedgeWeight],
        node_weights: &[HypernodeWeight],
    ) -> Self {
        assert!(k >= 2, "a partition needs at least two blocks");
        assert!(
            edge_weights.is_empty() || edge_weights.len() == pins.len(),
            "edge weight table must match the number of hyperedges"
        );
        assert!(
            node_weights.is_empty() || node_weights.len() == num_hypernodes,
            "node weight table must match the number of hypernodes"
        );

        let mut hypernodes: Vec<Hypernode> = (0..num_hypernodes)
            .map(|v| Hypernode {
                weight: node_weights.get(v).copied().unwrap_or(1),
                part: UNASSIGNED,
                fixed_part: UNASSIGNED,
                enabled: true,
                incidence: Vec::new(),
                live: 0,
            })
            .collect();

        let mut hyperedges = Vec::with_capacity(pins.len());
        for (e, edge_pins) in pins.iter().enumerate() {
            debug_assert!(!edge_pins.is_empty(), "hyperedges need at least one pin");
            for &p in edge_pins {
                let node = &mut hypernodes[p as usize];
                debug_assert!(
                    !node.incidence.contains(&(e as HyperedgeId)),
                    "duplicate pin in hyperedge"
                );
                node.incidence.push(e as HyperedgeId);
                node.live += 1;
            }
            hyperedges.push(Hyperedge {
                weight: edge_weights.get(e).copied().unwrap_or(1),
                enabled: true,
                pins: edge_pins.clone(),
                live: edge_pins.len(),
            });
        }

        let total_weight = hypernodes.iter().map(|n| n.weight).sum();
        let num_edges = hyperedges.len();
        Self {
            hypernodes,
            hyperedges,
            k,
            total_weight,
            num_enabled_hypernodes: num_hypernodes,
            num_enabled_hyperedges: num_edges,
            num_assigned: 0,
            num_fixed: 0,
            pins_in_part: vec![0; num_edges * k],
            connectivity_sets: vec![ConnectivitySet::default(); num_edges],
            block_weights: vec![0; k],
            block_sizes: vec![0; k],
        }
    }

    /// Number of blocks this hypergraph was sized for.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of hypernodes created at construction.
    pub fn initial_num_nodes(&self) -> usize {
        self.hypernodes.len()
    }

    /// Number of hyperedges created at construction.
    pub fn initial_num_edges(&self) -> usize {
        self.hyperedges.len()
    }

    /// Number of currently enabled hypernodes.
    pub fn current_num_nodes(&self) -> usize {
        self.num_enabled_hypernodes
    }

    /// Number of currently enabled hyperedges.
    pub fn current_num_edges(&self) -> usize {
        self.num_enabled_hyperedges
    }

    /// Total weight of all enabled hypernodes; invariant under contraction.
    pub fn total_weight(&self) -> HypernodeWeight {
        self.total_weight
    }

    /// Returns true if hypernode `v` is enabled.
    pub fn is_node_enabled(&self, v: HypernodeId) -> bool {
        self.hypernodes[v as usize].enabled
    }

    /// Returns true if hyperedge `e` is enabled.
    pub fn is_edge_enabled(&self, e: HyperedgeId) -> bool {
        self.hyperedges[e as usize].enabled
    }

    /// Weight of hypernode `v`.
    pub fn node_weight(&self, v: HypernodeId) -> HypernodeWeight {
        self.hypernodes[v as usize].weight
    }

    /// Weight of hyperedge `e`.
    pub fn edge_weight(&self, e: HyperedgeId) -> HyperedgeWeight {
        self.hyperedges[e as usize].weight
    }

    /// Number of enabled pins of hyperedge `e`.
    pub fn edge_size(&self, e: HyperedgeId) -> usize {
        self.hyperedges[e as usize].live
    }

    /// Number of enabled hyperedges incident to hypernode `v`.
    pub fn node_degree(&self, v: HypernodeId) -> usize {
        self.hypernodes[v as usize].live
    }

    /// Enabled pins of hyperedge `e`.
    pub fn pins(&self, e: HyperedgeId) -> &[HypernodeId] {
        let edge = &self.hyperedges[e as usize];
        &edge.pins[..edge.live]
    }

    /// Enabled hyperedges incident to hypernode `v`.
    pub fn incident_edges(&self, v: HypernodeId) -> &[HyperedgeId] {
        let node = &self.hypernodes[v as usize];
        &node.incidence[..node.live]
    }

    /// Iterates over all enabled hypernodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = HypernodeId> + '_ {
        self.hypernodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.enabled)
            .map(|(v, _)| v as HypernodeId)
    }

    /// Iterates over all enabled hyperedges in id order.
    pub fn edges(&self) -> impl Iterator<Item = HyperedgeId> + '_ {
        self.hyperedges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.enabled)
            .map(|(e, _)| e as HyperedgeId)
    }

    /// Marks hypernode `v` as fixed to `block`.
    pub fn set_fixed(&mut self, v: HypernodeId, block: PartitionId) {
        assert!(block >= 0 && (block as usize) < self.k);
        let node = &mut self.hypernodes[v as usize];
        assert!(node.fixed_part == UNASSIGNED, "vertex is already fixed");
        node.fixed_part = block;
        self.num_fixed += 1;
    }

    /// Fixed block of `v`, or [`UNASSIGNED`] for a free vertex.
    pub fn fixed_part(&self, v: HypernodeId) -> PartitionId {
        self.hypernodes[v as usize].fixed_part
    }

    /// Returns true if `v` is a fixed vertex.
    pub fn is_fixed(&self, v: HypernodeId) -> bool {
        self.hypernodes[v as usize].fixed_part != UNASSIGNED
    }

    /// Number of fixed vertices.
    pub fn num_fixed_vertices(&self) -> usize {
        self.num_fixed
    }

    /// Iterates over all enabled fixed vertices.
    pub fn fixed_vertices(&self) -> impl Iterator<Item = HypernodeId> + '_ {
        self.nodes().filter(|&v| self.is_fixed(v))
    }

    /// Current block of `v`, or [`UNASSIGNED`].
    pub fn part(&self, v: HypernodeId) -> PartitionId {
        self.hypernodes[v as usize].part
    }

    /// Number of enabled pins of `e` currently in `block`.
    pub fn pin_count_in_part(&self, e: HyperedgeId, block: PartitionId) -> u32 {
        self.pins_in_part[e as usize * self.k + block as usize]
    }

    /// Connectivity lambda(e): number of blocks with at least one pin of `e`.
    pub fn connectivity(&self, e: HyperedgeId) -> usize {
        self.connectivity_sets[e as usize].blocks.len()
    }

    /// Blocks with at least one pin of `e`, in no particular order.
    pub fn connectivity_set(&self, e: HyperedgeId) -> &[PartitionId] {
        &self.connectivity_sets[e as usize].blocks
    }

    /// Total weight of the enabled hypernodes in `block`.
    pub fn block_weight(&self, block: PartitionId) -> HypernodeWeight {
        self.block_weights[block as usize]
    }

    /// Number of enabled hypernodes in `block`.
    pub fn block_size(&self, block: PartitionId) -> usize {
        self.block_sizes[block as usize]
    }

    fn partition_active(&self) -> bool {
        self.num_assigned > 0
    }

    /// Assigns unassigned hypernode `v` to `block`.
    pub fn set_part(&mut self, v: HypernodeId, block: PartitionId) {
        assert!(block >= 0 && (block as usize) < self.k);
        let vidx = v as usize;
        assert!(self.hypernodes[vidx].enabled);
        assert_eq!(
            self.hypernodes[vidx].part, UNASSIGNED,
            "set_part requires an unassigned vertex"
        );
        debug_assert!(
            self.hypernodes[vidx].fixed_part == UNASSIGNED
                || self.hypernodes[vidx].fixed_part == block,
            "fixed vertices must be assigned to their fixed block"
        );
        self.hypernodes[vidx].part = block;
        self.num_assigned += 1;
        self.block_weights[block as usize] += self.hypernodes[vidx].weight;
        self.block_sizes[block as usize] += 1;
        for i in 0..self.hypernodes[vidx].live {
            let e = self.hypernodes[vidx].incidence[i];
            self.inc_pin_count(e, block);
        }
    }

    /// Moves `v` from `from` to `to` and returns the objective deltas.
    pub fn change_part(&mut self, v: HypernodeId, from: PartitionId, to: PartitionId) -> MoveDelta {
        assert!(to >= 0 && (to as usize) < self.k);
        assert_ne!(from, to);
        let vidx = v as usize;
        assert!(self.hypernodes[vidx].enabled);
        assert_eq!(self.hypernodes[vidx].part, from);
        assert!(
            self.hypernodes[vidx].fixed_part == UNASSIGNED,
            "fixed vertices cannot be moved"
        );

        let weight = self.hypernodes[vidx].weight;
        self.hypernodes[vidx].part = to;
        self.block_weights[from as usize] -= weight;
        self.block_sizes[from as usize] -= 1;
        self.block_weights[to as usize] += weight;
        self.block_sizes[to as usize] += 1;

        let mut delta = MoveDelta::default();
        for i in 0..self.hypernodes[vidx].live {
            let e = self.hypernodes[vidx].incidence[i];
            let w = self.hyperedges[e as usize].weight;

            self.dec_pin_count(e, from);
            if self.pin_count_in_part(e, from) == 0 {
                delta.km1 -= w;
                if self.connectivity(e) == 1 {
                    delta.cut -= w;
                }
            }
            self.inc_pin_count(e, to);
            if self.pin_count_in_part(e, to) == 1 {
                delta.km1 += w;
                if self.connectivity(e) == 2 {
                    delta.cut += w;
                }
            }
        }
        delta
    }

    /// Clears the partition: all parts unassigned, all derived state zeroed.
    ///
    /// Fixed-vertex designations survive.
    pub fn reset_partition(&mut self) {
        for node in &mut self.hypernodes {
            node.part = UNASSIGNED;
        }
        self.num_assigned = 0;
        self.block_weights.fill(0);
        self.block_sizes.fill(0);
        self.pins_in_part.fill(0);
        for set in &mut self.connectivity_sets {
            set.blocks.clear();
        }
    }

    /// Contracts `v` into `u` and returns the memento inverting the
    /// operation.
    ///
    /// `u` keeps its identity and absorbs `v`'s weight; `v` is disabled.
    /// Hyperedges containing both lose the pin `v`; hyperedges containing
    /// only `v` substitute `u` in place. Hyperedges left with a single pin
    /// are disabled, and hyperedges that became identical to another edge
    /// incident to `u` are folded into it (weights add up).
    pub fn contract(&mut self, u: HypernodeId, v: HypernodeId) -> ContractionMemento {
        assert_ne!(u, v, "cannot contract a vertex with itself");
        let (uidx, vidx) = (u as usize, v as usize);
        assert!(self.hypernodes[uidx].enabled && self.hypernodes[vidx].enabled);

        let part_v = self.hypernodes[vidx].part;
        if self.partition_active() {
            debug_assert_eq!(
                self.hypernodes[uidx].part, part_v,
                "contractions with an active partition must stay within a block"
            );
        }

        let v_weight = self.hypernodes[vidx].weight;
        self.hypernodes[uidx].weight += v_weight;
        self.hypernodes[vidx].enabled = false;
        self.num_enabled_hypernodes -= 1;
        if part_v != UNASSIGNED {
            // weight migrated onto u inside the same block
            self.num_assigned -= 1;
            self.block_sizes[part_v as usize] -= 1;
        }

        let degree_v = self.hypernodes[vidx].live;
        let mut fixups = Vec::with_capacity(degree_v + 4);

        for i in 0..degree_v {
            let e = self.hypernodes[vidx].incidence[i];
            let pos = self
                .pin_pos(e, v)
                .expect("v must be a live pin of its incident edge");
            if self.pin_pos(e, u).is_some() {
                // u and v share e: drop the pin v
                self.remove_pin_at(e, pos);
                fixups.push(Fixup::PinRemoved { edge: e, pos });
                if part_v != UNASSIGNED {
                    self.dec_pin_count(e, part_v);
                }
            } else {
                // e gains u in v's slot
                self.hyperedges[e as usize].pins[pos] = u;
                fixups.push(Fixup::PinReplaced { edge: e, pos });
                self.append_incidence(u, e);
                fixups.push(Fixup::IncidenceAppended { node: u, edge: e });
            }
        }

        // only edges that lost the pin v can have shrunk to a single pin
        let merged_end = fixups.len();
        for i in 0..merged_end {
            if let Fixup::PinRemoved { edge, .. } = fixups[i] {
                if self.hyperedges[edge as usize].enabled
                    && self.hyperedges[edge as usize].live == 1
                {
                    self.disable_edge(edge, &mut fixups);
                }
            }
        }

        self.fold_parallel_edges(u, &mut fixups);

        ContractionMemento {
            u,
            v,
            v_weight,
            fixups,
        }
    }

    /// Reverts the contraction described by `memento`.
    ///
    /// With an active partition, the revived vertex joins `u`'s current
    /// block and all pin counts and connectivity sets are re-established
    /// for the restored hyperedges.
    pub fn uncontract(&mut self, memento: &ContractionMemento) {
        let (u, v) = (memento.u, memento.v);
        let (uidx, vidx) = (u as usize, v as usize);
        assert!(self.hypernodes[uidx].enabled, "representative must be enabled");
        assert!(!self.hypernodes[vidx].enabled, "partner must still be contracted");

        let part_u = self.hypernodes[uidx].part;
        let active = part_u != UNASSIGNED;

        self.hypernodes[vidx].enabled = true;
        self.num_enabled_hypernodes += 1;
        self.hypernodes[uidx].weight -= memento.v_weight;
        if active {
            self.hypernodes[vidx].part = part_u;
            self.num_assigned += 1;
            self.block_sizes[part_u as usize] += 1;
        }

        for fixup in memento.fixups.iter().rev() {
            match *fixup {
                Fixup::EdgeDisabled { edge } => {
                    self.hyperedges[edge as usize].enabled = true;
                    self.num_enabled_hyperedges += 1;
                    if active {
                        self.rebuild_edge_partition_state(edge);
                    }
                }
                Fixup::EdgeWeightAdded {
                    representative,
                    amount,
                } => {
                    self.hyperedges[representative as usize].weight -= amount;
                }
                Fixup::IncidenceRemoved { node, edge, pos } => {
                    let nidx = node as usize;
                    let live = self.hypernodes[nidx].live;
                    debug_assert_eq!(self.hypernodes[nidx].incidence[live], edge);
                    self.hypernodes[nidx].incidence.swap(pos, live);
                    self.hypernodes[nidx].live = live + 1;
                }
                Fixup::IncidenceAppended { node, edge } => {
                    let nidx = node as usize;
                    let live = self.hypernodes[nidx].live;
                    let last = self.hypernodes[nidx].incidence.len() - 1;
                    debug_assert_eq!(self.hypernodes[nidx].incidence[live - 1], edge);
                    self.hypernodes[nidx].incidence.swap(live - 1, last);
                    self.hypernodes[nidx].incidence.pop();
                    self.hypernodes[nidx].live = live - 1;
                }
                Fixup::PinReplaced { edge, pos } => {
                    debug_assert_eq!(self.hyperedges[edge as usize].pins[pos], u);
                    self.hyperedges[edge as usize].pins[pos] = v;
                }
                Fixup::PinRemoved { edge, pos } => {
                    let eidx = edge as usize;
                    let live = self.hyperedges[eidx].live;
                    debug_assert_eq!(self.hyperedges[eidx].pins[live], v);
                    self.hyperedges[eidx].pins.swap(pos, live);
                    self.hyperedges[eidx].live = live + 1;
                    if active {
                        self.inc_pin_count(edge, part_u);
                    }
                }
            }
        }
    }

    fn pin_pos(&self, e: HyperedgeId, node: HypernodeId) -> Option<usize> {
        let edge = &self.hyperedges[e as usize];
        edge.pins[..edge.live].iter().position(|&p| p == node)
    }

    fn incidence_pos(&self, node: HypernodeId, e: HyperedgeId) -> usize {
        let n = &self.hypernodes[node as usize];
        n.incidence[..n.live]
            .iter()
            .position(|&f| f == e)
            .expect("edge must be in the live incidence prefix")
    }

    fn remove_pin_at(&mut self, e: HyperedgeId, pos: usize) {
        let edge = &mut self.hyperedges[e as usize];
        edge.pins.swap(pos, edge.live - 1);
        edge.live -= 1;
    }

    fn remove_incidence_at(&mut self, node: HypernodeId, pos: usize) {
        let n = &mut self.hypernodes[node as usize];
        n.incidence.swap(pos, n.live - 1);
        n.live -= 1;
    }

    fn append_incidence(&mut self, node: HypernodeId, e: HyperedgeId) {
        let n = &mut self.hypernodes[node as usize];
        n.incidence.push(e);
        let last = n.incidence.len() - 1;
        n.incidence.swap(n.live, last);
        n.live += 1;
    }

    fn inc_pin_count(&mut self, e: HyperedgeId, block: PartitionId) {
        let slot = e as usize * self.k + block as usize;
        self.pins_in_part[slot] += 1;
        if self.pins_in_part[slot] == 1 {
            self.connectivity_sets[e as usize].add(block);
        }
    }

    fn dec_pin_count(&mut self, e: HyperedgeId, block: PartitionId) {
        let slot = e as usize * self.k + block as usize;
        debug_assert!(self.pins_in_part[slot] > 0);
        self.pins_in_part[slot] -= 1;
        if self.pins_in_part[slot] == 0 {
            self.connectivity_sets[e as usize].remove(block);
        }
    }

    /// Disables `e`, unlinking it from the incidence lists of its live pins.
    fn disable_edge(&mut self, e: HyperedgeId, fixups: &mut Vec<Fixup>) {
        let eidx = e as usize;
        for i in 0..self.hyperedges[eidx].live {
            let p = self.hyperedges[eidx].pins[i];
            let pos = self.incidence_pos(p, e);
            self.remove_incidence_at(p, pos);
            fixups.push(Fixup::IncidenceRemoved {
                node: p,
                edge: e,
                pos,
            });
        }
        if self.partition_active() {
            self.clear_edge_partition_state(e);
        }
        self.hyperedges[eidx].enabled = false;
        self.num_enabled_hyperedges -= 1;
        fixups.push(Fixup::EdgeDisabled { edge: e });
    }

    fn clear_edge_partition_state(&mut self, e: HyperedgeId) {
        let eidx = e as usize;
        let mut blocks = std::mem::take(&mut self.connectivity_sets[eidx].blocks);
        for &block in &blocks {
            self.pins_in_part[eidx * self.k + block as usize] = 0;
        }
        blocks.clear();
        self.connectivity_sets[eidx].blocks = blocks;
    }

    fn rebuild_edge_partition_state(&mut self, e: HyperedgeId) {
        let eidx = e as usize;
        debug_assert!(self.connectivity_sets[eidx].blocks.is_empty());
        for i in 0..self.hyperedges[eidx].live {
            let p = self.hyperedges[eidx].pins[i];
            let block = self.hypernodes[p as usize].part;
            debug_assert_ne!(block, UNASSIGNED);
            self.inc_pin_count(e, block);
        }
    }

    /// Folds hyperedges incident to `u` whose enabled pin sets became
    /// identical. The earlier edge in fingerprint order survives and
    /// absorbs the weight.
    fn fold_parallel_edges(&mut self, u: HypernodeId, fixups: &mut Vec<Fixup>) {
        let uidx = u as usize;
        let live = self.hypernodes[uidx].live;
        if live < 2 {
            return;
        }
        let mut fingerprints: Vec<(u64, u32, HyperedgeId)> = Vec::with_capacity(live);
        for i in 0..live {
            let e = self.hypernodes[uidx].incidence[i];
            fingerprints.push((
                self.pin_set_hash(e),
                self.hyperedges[e as usize].live as u32,
                e,
            ));
        }
        fingerprints.sort_unstable();

        let mut start = 0;
        while start < fingerprints.len() {
            let mut end = start + 1;
            while end < fingerprints.len()
                && fingerprints[end].0 == fingerprints[start].0
                && fingerprints[end].1 == fingerprints[start].1
            {
                end += 1;
            }
            if end - start > 1 {
                // hash collisions are possible; verify against every
                // distinct representative seen so far in this group
                let mut representatives: Vec<HyperedgeId> = vec![fingerprints[start].2];
                for candidate in fingerprints[start + 1..end].iter().map(|f| f.2) {
                    let mut folded = false;
                    for r in 0..representatives.len() {
                        let rep = representatives[r];
                        if self.pins_equal(rep, candidate) {
                            self.fold_edge(rep, candidate, fixups);
                            folded = true;
                            break;
                        }
                    }
                    if !folded {
                        representatives.push(candidate);
                    }
                }
            }
            start = end;
        }
    }

    fn fold_edge(&mut self, rep: HyperedgeId, dup: HyperedgeId, fixups: &mut Vec<Fixup>) {
        let amount = self.hyperedges[dup as usize].weight;
        self.hyperedges[rep as usize].weight += amount;
        fixups.push(Fixup::EdgeWeightAdded {
            representative: rep,
            amount,
        });
        self.disable_edge(dup, fixups);
    }

    fn pins_equal(&self, a: HyperedgeId, b: HyperedgeId) -> bool {
        let (ea, eb) = (&self.hyperedges[a as usize], &self.hyperedges[b as usize]);
        if ea.live != eb.live {
            return false;
        }
        ea.pins[..ea.live]
            .iter()
            .all(|p| eb.pins[..eb.live].contains(p))
    }

    fn pin_set_hash(&self, e: HyperedgeId) -> u64 {
        let edge = &self.hyperedges[e as usize];
        let mut acc = 0u64;
        for &p in &edge.pins[..edge.live] {
            acc = acc.wrapping_add(mix64(p as u64 + 1));
        }
        acc
    }
}

fn mix64(value: u64) -> u64 {
    let mut x = value;
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
