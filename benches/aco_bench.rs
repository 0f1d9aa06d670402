//! Criterion benchmarks for the ant colony.
//!
//! Uses synthetic circle instances so the cost of tour construction and
//! the pheromone update can be measured independent of any data set.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_antcolony::aco::{AcoConfig, AcoRunner, Ant};
use u_antcolony::DistanceGraph;
use u_numflow::random::create_rng;

// ===========================================================================
// Instances
// ===========================================================================

fn circle(n: usize) -> DistanceGraph {
    let coords: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let t = i as f64 / n as f64 * std::f64::consts::TAU;
            (t.cos(), t.sin())
        })
        .collect();
    let distances = coords
        .iter()
        .map(|a| {
            coords
                .iter()
                .map(|b| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt())
                .collect()
        })
        .collect();
    DistanceGraph::new(distances).unwrap()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_ant_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("ant_construct");

    for n in [20usize, 50, 100] {
        let graph = circle(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &graph, |b, graph| {
            let mut rng = create_rng(42);
            b.iter(|| {
                let mut ant = Ant::new(graph, &mut rng);
                ant.construct(graph, 1.0, 2.0, &mut rng).unwrap();
                ant.compute_pheromone_delta(1.0).unwrap();
                black_box(ant.total_cost())
            });
        });
    }

    group.finish();
}

fn bench_colony(c: &mut Criterion) {
    let mut group = c.benchmark_group("colony_run");
    group.sample_size(10);

    for (n, ants, gens) in [(20usize, 10usize, 20usize), (50, 20, 10)] {
        let config = AcoConfig::default()
            .with_ant_count(ants)
            .with_generations(gens)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new("solo", format!("n{n}_m{ants}_g{gens}")),
            &config,
            |b, config| {
                b.iter(|| {
                    let mut graph = circle(n);
                    black_box(AcoRunner::run(&mut graph, config).unwrap().best_cost)
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("local_4", format!("n{n}_m{ants}_g{gens}")),
            &config,
            |b, config| {
                b.iter(|| {
                    let mut graph = circle(n);
                    black_box(AcoRunner::run_local(&mut graph, config, 4).unwrap().best_cost)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_ant_construction, bench_colony);
criterion_main!(benches);
