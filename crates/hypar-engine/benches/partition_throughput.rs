use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use hypar_core::PartitionConfig;
use hypar_ds::Hypergraph;
use hypar_engine::Partitioner;

/// One four-pin hyperedge per 2x2 window of a rows x cols grid.
fn grid_hypergraph(rows: usize, cols: usize, k: usize) -> Hypergraph {
    let mut edges = Vec::new();
    for row in 0..rows - 1 {
        for col in 0..cols - 1 {
            let base = (row * cols + col) as u32;
            edges.push(vec![
                base,
                base + 1,
                base + cols as u32,
                base + cols as u32 + 1,
            ]);
        }
    }
    Hypergraph::new(rows * cols, k, &edges, &[], &[])
}

fn bench_direct_kway(criterion: &mut Criterion) {
    let mut config = PartitionConfig::with_k(4);
    config.epsilon = 0.05;
    config.seed = 2024;
    config.initial_partitioning.runs = 5;
    let partitioner = Partitioner::new(config).unwrap();

    criterion.bench_function("direct_kway_grid_48x48", |bencher| {
        bencher.iter_batched(
            || grid_hypergraph(48, 48, 4),
            |mut hg| partitioner.partition(&mut hg).unwrap(),
            BatchSize::LargeInput,
        )
    });
}

fn bench_coarsen_only(criterion: &mut Criterion) {
    let config = PartitionConfig::with_k(4);
    criterion.bench_function("coarsen_grid_64x64", |bencher| {
        bencher.iter_batched(
            || grid_hypergraph(64, 64, 4),
            |mut hg| {
                let mut rng = hypar_core::RngHandle::from_seed(7);
                hypar_engine::coarsen::coarsen(&mut hg, &config, &mut rng, false)
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_direct_kway, bench_coarsen_only);
criterion_main!(benches);
