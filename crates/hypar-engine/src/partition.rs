//! Partitioner driver: mode dispatch, uncoarsening loop, recursive
//! bisection and V-cycles.

use hypar_core::{
    ErrorInfo, HyparError, HyperedgeWeight, HypernodeId, HypernodeWeight, Mode, PartitionConfig,
    PartitionId, RngHandle, UNASSIGNED,
};
use hypar_ds::{ContractionMemento, Fixup, Hypergraph};
use tracing::{debug, info, warn};

use crate::coarsen::coarsen;
use crate::initial::initial_partition;
use crate::metrics;
use crate::refine::Refiner;

/// Quality summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionSummary {
    /// Weighted cut of the final partition.
    pub cut: HyperedgeWeight,
    /// The (lambda - 1) metric of the final partition.
    pub connectivity: HyperedgeWeight,
    /// Value of the configured objective.
    pub objective: HyperedgeWeight,
    /// Relative imbalance of the final partition.
    pub imbalance: f64,
}

/// Orchestrates one partitioning run per call.
///
/// The configuration is validated once at construction; every call to
/// [`Partitioner::partition`] seeds a fresh [`RngHandle`] from it, so equal
/// inputs produce bit-identical partitions.
#[derive(Debug, Clone)]
pub struct Partitioner {
    config: PartitionConfig,
}

impl Partitioner {
    /// Validates `config` and builds the partitioner.
    pub fn new(config: PartitionConfig) -> Result<Self, HyparError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &PartitionConfig {
        &self.config
    }

    /// Partitions `hg` in place and returns the quality summary.
    ///
    /// On failure no partial partition is left behind as a result
    /// contract; callers must treat the hypergraph labels as unspecified.
    pub fn partition(&self, hg: &mut Hypergraph) -> Result<PartitionSummary, HyparError> {
        assert_eq!(
            hg.k(),
            self.config.k as usize,
            "hypergraph must be sized for the configured k"
        );
        if self.config.enable_min_hash_sparsifier && hg.num_fixed_vertices() > 0 {
            warn!("min-hash sparsifier disabled: fixed vertices are present");
        }

        let mut rng = RngHandle::from_seed(self.config.seed);
        let l_max = metrics::max_allowed_block_weight(
            hg.total_weight(),
            hg.k(),
            self.config.epsilon,
        );
        info!(
            k = hg.k(),
            epsilon = self.config.epsilon,
            max_block_weight = l_max,
            mode = ?self.config.mode,
            "partitioning run started"
        );

        match self.config.mode {
            Mode::DirectKway => {
                let budgets = vec![l_max; hg.k()];
                multilevel(hg, &self.config, &budgets, &mut rng, false)?;
                for cycle in 1..=self.config.v_cycles {
                    let before = metrics::objective(hg, self.config.objective);
                    multilevel(hg, &self.config, &budgets, &mut rng, true)?;
                    let after = metrics::objective(hg, self.config.objective);
                    debug!(cycle, before, after, "V-cycle finished");
                    debug_assert!(after <= before, "V-cycles must never worsen the objective");
                }
            }
            Mode::RecursiveBisection => {
                recursive_bisection(hg, &self.config, &mut rng)?;
            }
        }

        self.self_check(hg)?;
        let summary = PartitionSummary {
            cut: metrics::cut(hg),
            connectivity: metrics::connectivity(hg),
            objective: metrics::objective(hg, self.config.objective),
            imbalance: metrics::imbalance(hg),
        };
        info!(
            cut = summary.cut,
            connectivity = summary.connectivity,
            imbalance = summary.imbalance,
            "partitioning run finished"
        );
        Ok(summary)
    }

    /// Every enabled vertex must carry a block and every fixed vertex its
    /// fixed block; a violation here is a bug, never an input problem.
    fn self_check(&self, hg: &Hypergraph) -> Result<(), HyparError> {
        for v in hg.nodes() {
            let part = hg.part(v);
            if part < 0 || part >= self.config.k {
                return Err(HyparError::Internal(
                    ErrorInfo::new("unassigned-vertex", "vertex left without a block")
                        .with_context("vertex", v),
                ));
            }
        }
        for v in hg.fixed_vertices() {
            if hg.part(v) != hg.fixed_part(v) {
                return Err(HyparError::Internal(
                    ErrorInfo::new(
                        "fixed-vertex-violated",
                        "fixed vertex ended up outside its fixed block",
                    )
                    .with_context("vertex", v)
                    .with_context("expected", hg.fixed_part(v))
                    .with_context("actual", hg.part(v)),
                ));
            }
        }
        Ok(())
    }
}

/// One full multilevel cycle: coarsen, label the coarsest hypergraph,
/// uncoarsen level by level with refinement after every uncontraction.
///
/// With `warm` set the hypergraph already carries a partition: coarsening
/// is restricted to intra-block pairs and the incoming labels compete as an
/// initial-partitioning candidate (the V-cycle flow).
fn multilevel(
    hg: &mut Hypergraph,
    config: &PartitionConfig,
    budgets: &[HypernodeWeight],
    rng: &mut RngHandle,
    warm: bool,
) -> Result<(), HyparError> {
    let mut mementos = coarsen(hg, config, rng, warm);
    debug!(
        levels = mementos.len(),
        coarse_nodes = hg.current_num_nodes(),
        coarse_edges = hg.current_num_edges(),
        "coarsening finished"
    );

    let ip_seed = rng.next_seed();
    initial_partition(hg, config, budgets, ip_seed, warm)?;
    debug!(
        objective = metrics::objective(hg, config.objective),
        "initial partition applied"
    );

    let mut refiner = Refiner::build(hg.initial_num_nodes(), hg.k());

    // the coarsest level gets its own refinement round; for inputs below
    // the contraction limit this is the only one
    let coarse_nodes: Vec<HypernodeId> = hg.nodes().collect();
    refiner.refine(hg, &coarse_nodes, config, budgets);

    let mut border: Vec<HypernodeId> = Vec::new();
    while let Some(memento) = mementos.pop() {
        hg.uncontract(&memento);
        collect_border(hg, &memento, &mut border);
        refiner.refine(hg, &border, config, budgets);
    }
    Ok(())
}

/// The vertices whose gains an uncontraction can change: the two endpoints
/// plus the pins of every hyperedge the uncontraction re-enabled.
fn collect_border(hg: &Hypergraph, memento: &ContractionMemento, border: &mut Vec<HypernodeId>) {
    border.clear();
    border.push(memento.u);
    border.push(memento.v);
    for fixup in &memento.fixups {
        if let Fixup::EdgeDisabled { edge } = fixup {
            border.extend_from_slice(hg.pins(*edge));
        }
    }
}

/// Splits the block range in halves, bisects the (sub-)hypergraph with the
/// full multilevel engine at k = 2, and recurses on both sides.
fn recursive_bisection(
    hg: &mut Hypergraph,
    config: &PartitionConfig,
    rng: &mut RngHandle,
) -> Result<(), HyparError> {
    let k = config.k;
    let perfect_origin = metrics::perfect_block_weight(hg.total_weight(), k as usize);
    let mut labels = vec![UNASSIGNED; hg.initial_num_nodes()];
    let nodes: Vec<HypernodeId> = hg.nodes().collect();
    bisect_range(hg, config, rng, &nodes, 0, k, perfect_origin, &mut labels)?;
    for v in nodes {
        hg.set_part(v, labels[v as usize]);
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn bisect_range(
    hg: &Hypergraph,
    config: &PartitionConfig,
    rng: &mut RngHandle,
    nodes: &[HypernodeId],
    lo: PartitionId,
    num_blocks: PartitionId,
    perfect_origin: HypernodeWeight,
    labels: &mut [PartitionId],
) -> Result<(), HyparError> {
    if num_blocks == 1 {
        for &v in nodes {
            labels[v as usize] = lo;
        }
        return Ok(());
    }

    let k_left = (num_blocks + 1) / 2;
    let k_right = num_blocks - k_left;
    let mid = lo + k_left;

    // spread the imbalance budget over each side's own remaining bisection
    // levels; a terminal side gets the full epsilon, i.e. the global bound
    let budgets = [
        side_budget(perfect_origin, k_left, config.epsilon),
        side_budget(perfect_origin, k_right, config.epsilon),
    ];

    let mut sub = extract_bisection_instance(hg, nodes, mid);
    debug!(
        lo,
        num_blocks,
        nodes = nodes.len(),
        budget_left = budgets[0],
        budget_right = budgets[1],
        "bisection step"
    );
    multilevel(&mut sub, config, &budgets, rng, false)?;

    let mut left = Vec::new();
    let mut right = Vec::new();
    for (sub_id, &orig) in nodes.iter().enumerate() {
        if sub.part(sub_id as HypernodeId) == 0 {
            left.push(orig);
        } else {
            right.push(orig);
        }
    }
    drop(sub);

    bisect_range(hg, config, rng, &left, lo, k_left, perfect_origin, labels)?;
    bisect_range(hg, config, rng, &right, mid, k_right, perfect_origin, labels)
}

/// Weight budget for one side of a bisection, dimensioned for the
/// `ceil(log2(sub_k))` further bisections that side still has to absorb.
/// With `sub_k` = 1 the exponent clamps to one level and the side receives
/// `ceil((1 + epsilon) * perfect)`, the global block bound.
fn side_budget(
    perfect_origin: HypernodeWeight,
    sub_k: PartitionId,
    epsilon: f64,
) -> HypernodeWeight {
    let levels = (sub_k as f64).log2().ceil().max(1.0);
    let epsilon_prime = (1.0 + epsilon).powf(1.0 / levels) - 1.0;
    ((1.0 + epsilon_prime) * (sub_k as HypernodeWeight * perfect_origin) as f64).ceil()
        as HypernodeWeight
}

/// Builds a k = 2 hypergraph induced on `nodes`; hyperedges keep their
/// pins inside the subset and are dropped below two pins. Fixed vertices
/// map to side 0 or 1 depending on which half of the block range their
/// fixed block falls into.
fn extract_bisection_instance(
    hg: &Hypergraph,
    nodes: &[HypernodeId],
    mid: PartitionId,
) -> Hypergraph {
    let mut to_sub = vec![u32::MAX; hg.initial_num_nodes()];
    for (sub_id, &v) in nodes.iter().enumerate() {
        to_sub[v as usize] = sub_id as u32;
    }

    let node_weights: Vec<HypernodeWeight> = nodes.iter().map(|&v| hg.node_weight(v)).collect();
    let mut pins: Vec<Vec<HypernodeId>> = Vec::new();
    let mut edge_weights: Vec<HyperedgeWeight> = Vec::new();
    for e in hg.edges() {
        let sub_pins: Vec<HypernodeId> = hg
            .pins(e)
            .iter()
            .filter(|&&p| to_sub[p as usize] != u32::MAX)
            .map(|&p| to_sub[p as usize])
            .collect();
        if sub_pins.len() >= 2 {
            pins.push(sub_pins);
            edge_weights.push(hg.edge_weight(e));
        }
    }

    let mut sub = Hypergraph::new(nodes.len(), 2, &pins, &edge_weights, &node_weights);
    for (sub_id, &v) in nodes.iter().enumerate() {
        let fixed = hg.fixed_part(v);
        if fixed != UNASSIGNED {
            sub.set_fixed(sub_id as HypernodeId, if fixed < mid { 0 } else { 1 });
        }
    }
    sub
}
