use hypar_core::{Mode, PartitionConfig, UNASSIGNED};
use hypar_ds::Hypergraph;
use hypar_engine::{metrics, Partitioner};
use proptest::prelude::*;

fn random_instance(
    num_nodes: usize,
    edge_picks: &[Vec<u32>],
    k: usize,
) -> Option<Hypergraph> {
    let mut edges: Vec<Vec<u32>> = Vec::new();
    for pick in edge_picks {
        let mut pins: Vec<u32> = pick.iter().map(|p| p % num_nodes as u32).collect();
        pins.sort_unstable();
        pins.dedup();
        if pins.len() >= 2 {
            edges.push(pins);
        }
    }
    if edges.is_empty() {
        return None;
    }
    Some(Hypergraph::new(num_nodes, k, &edges, &[], &[]))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn partitions_are_complete_and_balanced(
        num_nodes in 6usize..20,
        edge_picks in prop::collection::vec(prop::collection::vec(0u32..64, 2..5), 3..12),
        k in 2i32..5,
        seed in any::<u64>(),
    ) {
        let Some(mut hg) = random_instance(num_nodes, &edge_picks, k as usize) else {
            return Ok(());
        };
        let mut config = PartitionConfig::with_k(k);
        config.epsilon = 0.1;
        config.seed = seed;
        let summary = Partitioner::new(config).unwrap().partition(&mut hg).unwrap();

        let l_max = metrics::max_allowed_block_weight(hg.total_weight(), k as usize, 0.1);
        for v in hg.nodes().collect::<Vec<_>>() {
            let part = hg.part(v);
            prop_assert!(part >= 0 && part < k);
        }
        for block in 0..k {
            prop_assert!(hg.block_weight(block) <= l_max);
        }
        prop_assert!(summary.cut <= summary.connectivity);
        prop_assert_eq!(summary.cut, metrics::cut(&hg));
        prop_assert_eq!(summary.connectivity, metrics::connectivity(&hg));
    }

    #[test]
    fn recursive_bisection_balances_odd_k(
        num_nodes in 6usize..18,
        edge_picks in prop::collection::vec(prop::collection::vec(0u32..64, 2..4), 3..10),
        seed in any::<u64>(),
    ) {
        let Some(mut hg) = random_instance(num_nodes, &edge_picks, 3) else {
            return Ok(());
        };
        let mut config = PartitionConfig::with_k(3);
        config.epsilon = 0.1;
        config.seed = seed;
        config.mode = Mode::RecursiveBisection;
        // unit weights always admit a balanced 3-way partition, so the odd
        // split must never be reported infeasible
        Partitioner::new(config).unwrap().partition(&mut hg).unwrap();

        let l_max = metrics::max_allowed_block_weight(hg.total_weight(), 3, 0.1);
        for block in 0..3 {
            prop_assert!(hg.block_weight(block) <= l_max);
        }
        for v in hg.nodes().collect::<Vec<_>>() {
            let part = hg.part(v);
            prop_assert!(part >= 0 && part < 3);
        }
    }

    #[test]
    fn equal_seeds_reproduce_equal_partitions(
        num_nodes in 6usize..16,
        edge_picks in prop::collection::vec(prop::collection::vec(0u32..64, 2..4), 3..10),
        seed in any::<u64>(),
    ) {
        let Some(mut first) = random_instance(num_nodes, &edge_picks, 2) else {
            return Ok(());
        };
        let Some(mut second) = random_instance(num_nodes, &edge_picks, 2) else {
            return Ok(());
        };
        let mut config = PartitionConfig::with_k(2);
        config.epsilon = 0.2;
        config.seed = seed;
        let partitioner = Partitioner::new(config).unwrap();
        partitioner.partition(&mut first).unwrap();
        partitioner.partition(&mut second).unwrap();
        for v in 0..num_nodes as u32 {
            prop_assert_eq!(first.part(v), second.part(v));
        }
    }

    #[test]
    fn fixed_vertices_are_always_preserved(
        num_nodes in 8usize..16,
        edge_picks in prop::collection::vec(prop::collection::vec(0u32..64, 2..4), 3..10),
        fixed_picks in prop::collection::vec((0u32..16, 0i32..3), 0..4),
        seed in any::<u64>(),
    ) {
        let Some(mut hg) = random_instance(num_nodes, &edge_picks, 3) else {
            return Ok(());
        };
        for &(v, block) in &fixed_picks {
            let v = v % num_nodes as u32;
            if hg.fixed_part(v) == UNASSIGNED {
                hg.set_fixed(v, block);
            }
        }
        let mut config = PartitionConfig::with_k(3);
        config.epsilon = 0.3;
        config.seed = seed;
        match Partitioner::new(config).unwrap().partition(&mut hg) {
            Ok(_) => {
                for v in hg.fixed_vertices().collect::<Vec<_>>() {
                    prop_assert_eq!(hg.part(v), hg.fixed_part(v));
                }
            }
            // a heavy fixed block can make the instance genuinely infeasible
            Err(err) => prop_assert!(matches!(err, hypar_core::HyparError::Infeasible(_))),
        }
    }
}
