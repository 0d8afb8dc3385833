use hypar_core::{HyparError, Mode, PartitionConfig};
use hypar_ds::Hypergraph;
use hypar_engine::{metrics, Partitioner};

fn build(num_nodes: usize, k: usize, edges: &[&[u32]]) -> Hypergraph {
    let pins: Vec<Vec<u32>> = edges.iter().map(|e| e.to_vec()).collect();
    Hypergraph::new(num_nodes, k, &pins, &[], &[])
}

fn config(k: i32, epsilon: f64, seed: u64) -> PartitionConfig {
    let mut config = PartitionConfig::with_k(k);
    config.epsilon = epsilon;
    config.seed = seed;
    config
}

fn path(num_nodes: usize, k: usize) -> Hypergraph {
    let edges: Vec<Vec<u32>> = (0..num_nodes as u32 - 1).map(|i| vec![i, i + 1]).collect();
    Hypergraph::new(num_nodes, k, &edges, &[], &[])
}

#[test]
fn two_disjoint_pairs_split_with_zero_cut() {
    let mut hg = build(4, 2, &[&[0, 1], &[2, 3]]);
    let partitioner = Partitioner::new(config(2, 0.03, 42)).unwrap();
    let summary = partitioner.partition(&mut hg).unwrap();

    assert_eq!(summary.cut, 0);
    assert_eq!(hg.part(0), hg.part(1));
    assert_eq!(hg.part(2), hg.part(3));
    assert_ne!(hg.part(0), hg.part(2));
}

#[test]
fn path_of_eight_cuts_one_edge() {
    let mut hg = path(8, 2);
    let partitioner = Partitioner::new(config(2, 0.05, 7)).unwrap();
    let summary = partitioner.partition(&mut hg).unwrap();

    assert_eq!(summary.cut, 1);
    let l_max = metrics::max_allowed_block_weight(hg.total_weight(), 2, 0.05);
    assert!(hg.block_weight(0) <= l_max);
    assert!(hg.block_weight(1) <= l_max);
    assert_eq!(hg.block_weight(0) + hg.block_weight(1), 8);
}

#[test]
fn star_with_fixed_center_balances_the_leaves() {
    let mut hg = build(7, 2, &[&[0, 1, 2, 3, 4, 5, 6]]);
    hg.set_fixed(0, 0);
    let partitioner = Partitioner::new(config(2, 0.5, 3)).unwrap();
    let summary = partitioner.partition(&mut hg).unwrap();

    assert_eq!(hg.part(0), 0);
    assert_eq!(summary.connectivity, 1);
    // the tie on the objective resolves towards the flatter split
    assert_eq!(hg.block_weight(0), 4);
    assert_eq!(hg.block_weight(1), 3);
}

#[test]
fn oversized_fixed_block_is_infeasible() {
    let mut hg = Hypergraph::new(2, 2, &[vec![0, 1]], &[], &[10, 10]);
    hg.set_fixed(0, 0);
    hg.set_fixed(1, 0);
    let partitioner = Partitioner::new(config(2, 0.0, 1)).unwrap();

    let err = partitioner.partition(&mut hg).unwrap_err();
    match err {
        HyparError::Infeasible(info) => {
            assert_eq!(info.code, "initial-partitioning-infeasible");
        }
        other => panic!("expected infeasibility, got {other:?}"),
    }
}

#[test]
fn v_cycles_never_worsen_the_objective() {
    let edges: Vec<Vec<u32>> = (0..24u32)
        .map(|i| vec![i, (i + 1) % 24, (i + 7) % 24])
        .collect();

    let mut plain = Hypergraph::new(24, 3, &edges, &[], &[]);
    let summary_plain = Partitioner::new(config(3, 0.1, 99))
        .unwrap()
        .partition(&mut plain)
        .unwrap();

    let mut cycled = Hypergraph::new(24, 3, &edges, &[], &[]);
    let mut cfg = config(3, 0.1, 99);
    cfg.v_cycles = 2;
    let summary_cycled = Partitioner::new(cfg).unwrap().partition(&mut cycled).unwrap();

    assert!(summary_cycled.objective <= summary_plain.objective);
}

#[test]
fn recursive_and_direct_agree_on_the_path_of_sixteen() {
    let l_max = metrics::max_allowed_block_weight(16, 4, 0.03);

    let mut direct = path(16, 4);
    let summary_direct = Partitioner::new(config(4, 0.03, 11))
        .unwrap()
        .partition(&mut direct)
        .unwrap();

    let mut cfg = config(4, 0.03, 11);
    cfg.mode = Mode::RecursiveBisection;
    let mut bisected = path(16, 4);
    let summary_rb = Partitioner::new(cfg).unwrap().partition(&mut bisected).unwrap();

    for summary in [&summary_direct, &summary_rb] {
        // optimum cuts three edges; stay within a factor of two
        assert!(summary.cut <= 6, "cut {} too large", summary.cut);
    }
    for hg in [&direct, &bisected] {
        for block in 0..4 {
            assert!(hg.block_weight(block) <= l_max);
        }
    }
}

#[test]
fn same_seed_gives_bit_identical_partitions() {
    let edges: Vec<Vec<u32>> = (0..30u32)
        .map(|i| vec![i, (i + 1) % 30, (i + 11) % 30])
        .collect();

    let mut first = Hypergraph::new(30, 4, &edges, &[], &[]);
    let mut second = Hypergraph::new(30, 4, &edges, &[], &[]);
    let partitioner = Partitioner::new(config(4, 0.05, 1234)).unwrap();
    partitioner.partition(&mut first).unwrap();
    partitioner.partition(&mut second).unwrap();

    for v in 0..30u32 {
        assert_eq!(first.part(v), second.part(v));
    }
}

#[test]
fn recursive_bisection_admits_a_full_block_on_odd_k() {
    // w(V) = 30, k = 3, epsilon = 0.2: the global bound is 12, and the
    // weight-12 fixed vertex fills its terminal block exactly; the side
    // budgets must not dilute epsilon for a block that splits no further
    let pins = vec![vec![1, 2]];
    let mut hg = Hypergraph::new(3, 3, &pins, &[], &[12, 9, 9]);
    hg.set_fixed(0, 2);
    let mut cfg = config(3, 0.2, 17);
    cfg.mode = Mode::RecursiveBisection;
    let summary = Partitioner::new(cfg).unwrap().partition(&mut hg).unwrap();

    assert_eq!(hg.part(0), 2);
    let l_max = metrics::max_allowed_block_weight(hg.total_weight(), 3, 0.2);
    for block in 0..3 {
        assert!(hg.block_weight(block) <= l_max);
    }
    assert!((summary.imbalance - 0.2).abs() < 1e-9);
}

#[test]
fn fixed_vertices_survive_both_modes() {
    let edges: Vec<Vec<u32>> = (0..20u32).map(|i| vec![i, (i + 1) % 20]).collect();
    for mode in [Mode::DirectKway, Mode::RecursiveBisection] {
        let mut hg = Hypergraph::new(20, 4, &edges, &[], &[]);
        hg.set_fixed(0, 3);
        hg.set_fixed(5, 1);
        hg.set_fixed(13, 0);
        let mut cfg = config(4, 0.2, 5);
        cfg.mode = mode;
        Partitioner::new(cfg).unwrap().partition(&mut hg).unwrap();
        assert_eq!(hg.part(0), 3);
        assert_eq!(hg.part(5), 1);
        assert_eq!(hg.part(13), 0);
    }
}

#[test]
fn vcycles_with_recursive_bisection_are_rejected() {
    let mut cfg = config(4, 0.05, 0);
    cfg.mode = Mode::RecursiveBisection;
    cfg.v_cycles = 1;
    let err = Partitioner::new(cfg).unwrap_err();
    assert!(matches!(err, HyparError::Config(_)));
}
