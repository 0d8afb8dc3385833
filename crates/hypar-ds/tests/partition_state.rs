use hypar_core::UNASSIGNED;
use hypar_ds::Hypergraph;
use proptest::prelude::*;

fn build(num_nodes: usize, k: usize, edges: &[&[u32]]) -> Hypergraph {
    let pins: Vec<Vec<u32>> = edges.iter().map(|e| e.to_vec()).collect();
    Hypergraph::new(num_nodes, k, &pins, &[], &[])
}

fn cut(hg: &Hypergraph) -> i64 {
    hg.edges()
        .filter(|&e| hg.connectivity(e) > 1)
        .map(|e| hg.edge_weight(e))
        .sum()
}

fn km1(hg: &Hypergraph) -> i64 {
    hg.edges()
        .map(|e| hg.edge_weight(e) * hg.connectivity(e).saturating_sub(1) as i64)
        .sum()
}

#[test]
fn set_part_tracks_pin_counts_and_connectivity() {
    let mut hg = build(4, 2, &[&[0, 1], &[1, 2, 3]]);
    hg.set_part(0, 0);
    hg.set_part(1, 0);
    hg.set_part(2, 1);
    hg.set_part(3, 1);

    assert_eq!(hg.pin_count_in_part(0, 0), 2);
    assert_eq!(hg.pin_count_in_part(0, 1), 0);
    assert_eq!(hg.connectivity(0), 1);

    assert_eq!(hg.pin_count_in_part(1, 0), 1);
    assert_eq!(hg.pin_count_in_part(1, 1), 2);
    assert_eq!(hg.connectivity(1), 2);

    assert_eq!(hg.block_weight(0), 2);
    assert_eq!(hg.block_size(1), 2);
    assert_eq!(cut(&hg), 1);
    assert_eq!(km1(&hg), 1);
}

#[test]
fn change_part_reports_objective_deltas() {
    let mut hg = build(4, 2, &[&[0, 1], &[1, 2, 3]]);
    for (v, b) in [(0, 0), (1, 0), (2, 1), (3, 1)] {
        hg.set_part(v, b);
    }

    let cut_before = cut(&hg);
    let km1_before = km1(&hg);
    let delta = hg.change_part(1, 0, 1);
    assert_eq!(cut(&hg) - cut_before, delta.cut);
    assert_eq!(km1(&hg) - km1_before, delta.km1);

    // edge 0 became cut, edge 1 became internal
    assert_eq!(hg.connectivity(0), 2);
    assert_eq!(hg.connectivity(1), 1);
}

#[test]
fn reset_partition_clears_everything_but_fixed_marks() {
    let mut hg = build(3, 2, &[&[0, 1, 2]]);
    hg.set_fixed(0, 1);
    hg.set_part(0, 1);
    hg.set_part(1, 0);
    hg.set_part(2, 0);

    hg.reset_partition();
    for v in 0..3 {
        assert_eq!(hg.part(v), UNASSIGNED);
    }
    assert_eq!(hg.block_weight(0), 0);
    assert_eq!(hg.pin_count_in_part(0, 0), 0);
    assert_eq!(hg.connectivity(0), 0);
    assert!(hg.is_fixed(0));
    assert_eq!(hg.fixed_part(0), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn deltas_match_recomputation_under_random_moves(
        assignment in prop::collection::vec(0i32..3, 6),
        moves in prop::collection::vec((0u32..6, 0i32..3), 1..12),
    ) {
        let mut hg = build(
            6,
            3,
            &[&[0, 1, 2], &[2, 3], &[3, 4, 5], &[0, 5], &[1, 3, 5]],
        );
        for (v, &b) in assignment.iter().enumerate() {
            hg.set_part(v as u32, b);
        }
        for &(v, to) in &moves {
            let from = hg.part(v);
            if from == to {
                continue;
            }
            let cut_before = cut(&hg);
            let km1_before = km1(&hg);
            let delta = hg.change_part(v, from, to);
            prop_assert_eq!(cut(&hg) - cut_before, delta.cut);
            prop_assert_eq!(km1(&hg) - km1_before, delta.km1);

            for e in hg.edges().collect::<Vec<_>>() {
                let total: u32 = (0..3).map(|b| hg.pin_count_in_part(e, b)).sum();
                prop_assert_eq!(total as usize, hg.pins(e).len());
                let lambda = (0..3).filter(|&b| hg.pin_count_in_part(e, b) > 0).count();
                prop_assert_eq!(hg.connectivity(e), lambda);
            }
        }
    }
}
