//! Colony generation loop.
//!
//! [`AcoRunner`] drives a fixed number of generations:
//! construction → gather to coordinator → evaporate + deposit → broadcast
//! → barrier → repeat.
//!
//! # Reproducibility
//!
//! Every ant draws from its own random stream, derived from the run seed,
//! the generation and the ant's global index. The ants a worker owns depend
//! only on its rank, and the coordinator merges them in global index order,
//! so the same seed gives the same result for any worker count and with or
//! without the `parallel` feature.

use std::ops::Range;
use std::time::{Duration, Instant};

use u_numflow::random::create_rng;

use super::ant::Ant;
use super::config::AcoConfig;
use crate::distribution::{ant_range, local_cluster, Communicator, Message, Role, SoloComm};
use crate::error::{AcoError, Result};
use crate::graph::DistanceGraph;

/// Per-generation statistics recorded by the coordinator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Zero-based generation index.
    pub generation: usize,

    /// Ants merged into this generation's update, across all workers.
    pub ants: usize,

    /// Cheapest tour built in this generation (`+inf` with no ants).
    pub best_cost: f64,

    /// Mean tour cost of this generation (`+inf` with no ants).
    pub mean_cost: f64,

    /// Wall time the coordinator spent constructing its own share.
    pub construction_time: Duration,
}

/// Result of a colony run, held by the coordinator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoRun {
    /// Best tour found. Empty if no ant ever ran.
    pub best_tour: Vec<usize>,

    /// Cost of `best_tour` as a closed cycle. `+inf` if no ant ever ran.
    pub best_cost: f64,

    /// Generations executed.
    pub generations: usize,

    /// Best-so-far cost after each generation.
    pub cost_history: Vec<f64>,

    /// Statistics for each generation.
    pub generation_stats: Vec<GenerationStats>,
}

/// What a worker returns from [`AcoRunner::run_worker`].
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerOutcome {
    /// The coordinator's result.
    Coordinator(AcoRun),
    /// Participants only contribute ants.
    Participant,
}

impl WorkerOutcome {
    /// The run result, if this worker was the coordinator.
    pub fn into_run(self) -> Option<AcoRun> {
        match self {
            WorkerOutcome::Coordinator(run) => Some(run),
            WorkerOutcome::Participant => None,
        }
    }
}

/// Executes the ant colony.
///
/// # Usage
///
/// ```
/// use u_antcolony::{aco::{AcoConfig, AcoRunner}, DistanceGraph};
///
/// let mut graph = DistanceGraph::new(vec![
///     vec![0.0, 1.0, 2.0, 2.0],
///     vec![1.0, 0.0, 1.0, 2.0],
///     vec![2.0, 1.0, 0.0, 1.0],
///     vec![2.0, 2.0, 1.0, 0.0],
/// ])
/// .unwrap();
/// let config = AcoConfig::default().with_ant_count(4).with_generations(5).with_seed(42);
///
/// let run = AcoRunner::run(&mut graph, &config).unwrap();
/// assert_eq!(run.best_tour.len(), 4);
/// assert!((graph.tour_cost(&run.best_tour) - run.best_cost).abs() < 1e-9);
/// ```
pub struct AcoRunner;

impl AcoRunner {
    /// Runs the colony as a single worker that coordinates itself.
    pub fn run(graph: &mut DistanceGraph, config: &AcoConfig) -> Result<AcoRun> {
        Self::run_worker(graph, config, &SoloComm)?
            .into_run()
            .ok_or_else(|| AcoError::Transport("single worker did not coordinate".into()))
    }

    /// Runs the colony on `workers` in-process workers, one thread each.
    ///
    /// Each worker owns a private copy of `graph`. On success `graph` is
    /// replaced by the coordinator's copy, so it carries the final
    /// pheromone matrix.
    ///
    /// When several workers fail, the first error that is not a
    /// [`AcoError::Transport`] follow-on is returned.
    pub fn run_local(
        graph: &mut DistanceGraph,
        config: &AcoConfig,
        workers: usize,
    ) -> Result<AcoRun> {
        if workers == 0 {
            return Err(AcoError::InvalidConfig("workers must be at least 1".into()));
        }
        config.validate().map_err(AcoError::InvalidConfig)?;

        // All workers must agree on the seed.
        let config = AcoConfig {
            seed: Some(config.seed.unwrap_or_else(rand::random)),
            ..config.clone()
        };
        let config = &config;
        let shared: &DistanceGraph = graph;

        let results: Vec<Result<(WorkerOutcome, DistanceGraph)>> = std::thread::scope(|scope| {
            let handles: Vec<_> = local_cluster(workers)
                .into_iter()
                .map(|comm| {
                    let mut local = shared.clone();
                    scope.spawn(move || -> Result<(WorkerOutcome, DistanceGraph)> {
                        let outcome = Self::run_worker(&mut local, config, &comm)?;
                        Ok((outcome, local))
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(AcoError::Transport("worker thread panicked".into()))
                    })
                })
                .collect()
        });

        let mut coordinator = None;
        let mut errors = Vec::new();
        for result in results {
            match result {
                Ok((WorkerOutcome::Coordinator(run), local)) => coordinator = Some((run, local)),
                Ok((WorkerOutcome::Participant, _)) => {}
                Err(err) => errors.push(err),
            }
        }
        if !errors.is_empty() {
            let root = errors
                .iter()
                .position(|e| !matches!(e, AcoError::Transport(_)))
                .unwrap_or(0);
            return Err(errors.swap_remove(root));
        }

        let (run, local) = coordinator
            .ok_or_else(|| AcoError::Transport("no worker took the coordinator role".into()))?;
        *graph = local;
        Ok(run)
    }

    /// Runs this worker's side of the colony over `comm`.
    ///
    /// Every worker must call this with the same configuration (seed
    /// included) and an identical graph. The coordinator returns
    /// [`WorkerOutcome::Coordinator`]; other ranks return
    /// [`WorkerOutcome::Participant`] once the last generation's barrier
    /// is passed.
    pub fn run_worker<C: Communicator>(
        graph: &mut DistanceGraph,
        config: &AcoConfig,
        comm: &C,
    ) -> Result<WorkerOutcome> {
        config.validate().map_err(AcoError::InvalidConfig)?;

        let workers = comm.worker_count();
        let rank = comm.rank();
        if rank >= workers {
            return Err(AcoError::Transport(format!(
                "rank {rank} outside a cluster of {workers}"
            )));
        }
        let role = Role::of(rank);
        let seed = config.seed.unwrap_or_else(rand::random);
        let share = ant_range(config.ant_count, workers, rank);

        let mut best_tour = Vec::new();
        let mut best_cost = f64::INFINITY;
        let mut cost_history = Vec::with_capacity(config.generations);
        let mut generation_stats = Vec::with_capacity(config.generations);

        for generation in 0..config.generations {
            let started = Instant::now();
            let mut ants = construct_share(graph, config, seed, generation, share.clone())?;
            let construction_time = started.elapsed();

            match role {
                Role::Participant => {
                    comm.send(Message::Ants(ants), 0)?;
                    match comm.recv(0)? {
                        Message::Pheromone(matrix) => graph.set_pheromones(matrix)?,
                        Message::Ants(_) => {
                            return Err(AcoError::Transport(
                                "expected pheromone from coordinator, got ants".into(),
                            ))
                        }
                    }
                }
                Role::Coordinator => {
                    for source in 1..workers {
                        match comm.recv(source)? {
                            Message::Ants(received) => ants.extend(received),
                            Message::Pheromone(_) => {
                                return Err(AcoError::Transport(format!(
                                    "expected ants from worker {source}, got pheromone"
                                )))
                            }
                        }
                    }

                    for ant in &ants {
                        if ant.total_cost() < best_cost {
                            best_cost = ant.total_cost();
                            best_tour = ant.tour().to_vec();
                        }
                    }
                    let stats = summarize(generation, &ants, construction_time);

                    graph.update_pheromone(&ants, config.rho)?;
                    for dest in 1..workers {
                        comm.send(Message::Pheromone(graph.pheromones().to_vec()), dest)?;
                    }

                    tracing::debug!(
                        generation,
                        rank,
                        ants = stats.ants,
                        generation_best = stats.best_cost,
                        best_cost,
                        "generation complete"
                    );
                    cost_history.push(best_cost);
                    generation_stats.push(stats);
                }
            }

            comm.barrier();
        }

        match role {
            Role::Coordinator => {
                tracing::info!(
                    best_cost,
                    generations = config.generations,
                    workers,
                    "colony finished"
                );
                Ok(WorkerOutcome::Coordinator(AcoRun {
                    best_tour,
                    best_cost,
                    generations: config.generations,
                    cost_history,
                    generation_stats,
                }))
            }
            Role::Participant => Ok(WorkerOutcome::Participant),
        }
    }
}

/// Builds, closes and scores one ant on its own random stream.
fn build_ant(
    graph: &DistanceGraph,
    config: &AcoConfig,
    seed: u64,
    generation: usize,
    index: usize,
) -> Result<Ant> {
    let mut rng = create_rng(ant_seed(seed, generation, index));
    let mut ant = Ant::new(graph, &mut rng);
    ant.construct(graph, config.alpha, config.beta, &mut rng)?;
    ant.compute_pheromone_delta(config.q)?;
    Ok(ant)
}

#[cfg(feature = "parallel")]
fn construct_share(
    graph: &DistanceGraph,
    config: &AcoConfig,
    seed: u64,
    generation: usize,
    share: Range<usize>,
) -> Result<Vec<Ant>> {
    use rayon::prelude::*;

    if config.parallel {
        share
            .into_par_iter()
            .map(|index| build_ant(graph, config, seed, generation, index))
            .collect()
    } else {
        share
            .map(|index| build_ant(graph, config, seed, generation, index))
            .collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn construct_share(
    graph: &DistanceGraph,
    config: &AcoConfig,
    seed: u64,
    generation: usize,
    share: Range<usize>,
) -> Result<Vec<Ant>> {
    share
        .map(|index| build_ant(graph, config, seed, generation, index))
        .collect()
}

/// SplitMix64 over the run seed, generation and global ant index.
fn ant_seed(seed: u64, generation: usize, index: usize) -> u64 {
    let mut z = seed
        ^ (generation as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (index as u64).wrapping_add(1).wrapping_mul(0xD1B5_4A32_D192_ED03);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn summarize(generation: usize, ants: &[Ant], construction_time: Duration) -> GenerationStats {
    let (best_cost, mean_cost) = if ants.is_empty() {
        (f64::INFINITY, f64::INFINITY)
    } else {
        let best = ants
            .iter()
            .map(Ant::total_cost)
            .fold(f64::INFINITY, f64::min);
        let mean = ants.iter().map(Ant::total_cost).sum::<f64>() / ants.len() as f64;
        (best, mean)
    };
    GenerationStats {
        generation,
        ants: ants.len(),
        best_cost,
        mean_cost,
        construction_time,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> DistanceGraph {
        DistanceGraph::new(vec![
            vec![0.0, 1.0, 2.0, 2.0],
            vec![1.0, 0.0, 1.0, 2.0],
            vec![2.0, 1.0, 0.0, 1.0],
            vec![2.0, 2.0, 1.0, 0.0],
        ])
        .unwrap()
    }

    fn ring(n: usize) -> DistanceGraph {
        // Cities on a circle; the optimum visits them in index order.
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

    fn scenario() -> AcoConfig {
        AcoConfig::default()
            .with_ant_count(4)
            .with_generations(5)
            .with_alpha(1.0)
            .with_beta(2.0)
            .with_rho(0.5)
            .with_q(1.0)
            .with_seed(42)
    }

    #[test]
    fn test_square_reaches_optimum() {
        let mut graph = square();
        let run = AcoRunner::run(&mut graph, &scenario()).unwrap();

        // 0-1-2-3-0 costs 1 + 1 + 1 + 2.
        assert!((run.best_cost - 5.0).abs() < 1e-9, "got {}", run.best_cost);
        assert!((graph.tour_cost(&run.best_tour) - 5.0).abs() < 1e-9);
        assert_eq!(run.generations, 5);
    }

    #[test]
    fn test_history_non_increasing() {
        let mut graph = ring(12);
        let config = AcoConfig::default()
            .with_ant_count(8)
            .with_generations(30)
            .with_seed(7);
        let run = AcoRunner::run(&mut graph, &config).unwrap();

        assert_eq!(run.cost_history.len(), 30);
        for window in run.cost_history.windows(2) {
            assert!(window[1] <= window[0]);
        }
        assert_eq!(run.cost_history.last().copied(), Some(run.best_cost));
    }

    #[test]
    fn test_generation_stats() {
        let mut graph = ring(8);
        let config = AcoConfig::default()
            .with_ant_count(6)
            .with_generations(4)
            .with_seed(3);
        let run = AcoRunner::run(&mut graph, &config).unwrap();

        assert_eq!(run.generation_stats.len(), 4);
        for (g, stats) in run.generation_stats.iter().enumerate() {
            assert_eq!(stats.generation, g);
            assert_eq!(stats.ants, 6);
            assert!(stats.best_cost <= stats.mean_cost + 1e-12);
            assert!(stats.best_cost >= run.best_cost - 1e-12);
        }
    }

    #[test]
    fn test_ring_finds_good_tour() {
        let mut graph = ring(10);
        let optimal = graph.tour_cost(&(0..10).collect::<Vec<_>>());
        let config = AcoConfig::default()
            .with_ant_count(10)
            .with_generations(50)
            .with_seed(42);
        let run = AcoRunner::run(&mut graph, &config).unwrap();

        assert!(
            run.best_cost <= optimal * 1.2,
            "expected within 20% of {optimal}, got {}",
            run.best_cost
        );
    }

    #[test]
    fn test_deterministic_with_seed() {
        let config = AcoConfig::default()
            .with_ant_count(5)
            .with_generations(10)
            .with_seed(99);
        let mut g1 = ring(9);
        let mut g2 = ring(9);
        let r1 = AcoRunner::run(&mut g1, &config).unwrap();
        let r2 = AcoRunner::run(&mut g2, &config).unwrap();

        assert_eq!(r1.best_tour, r2.best_tour);
        assert_eq!(r1.best_cost, r2.best_cost);
        assert_eq!(g1.pheromones(), g2.pheromones());
    }

    #[test]
    fn test_zero_ants_only_evaporates() {
        let mut graph = square();
        let config = AcoConfig::default()
            .with_ant_count(0)
            .with_generations(3)
            .with_rho(0.5)
            .with_seed(1);
        let run = AcoRunner::run(&mut graph, &config).unwrap();

        assert!(run.best_tour.is_empty());
        assert!(run.best_cost.is_infinite());
        assert!((graph.pheromone(0, 1) - 1.0 / 16.0 / 8.0).abs() < 1e-15);
        assert_eq!(run.generation_stats[0].ants, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut graph = square();
        let err = AcoRunner::run(&mut graph, &scenario().with_rho(1.0)).unwrap_err();
        assert!(matches!(err, AcoError::InvalidConfig(_)));
    }

    #[test]
    fn test_degenerate_distribution_surfaces() {
        let mut graph = square();
        graph.set_pheromones(vec![vec![0.0; 4]; 4]).unwrap();
        let err = AcoRunner::run(&mut graph, &scenario()).unwrap_err();
        assert!(matches!(err, AcoError::DegenerateDistribution { .. }));
    }

    #[test]
    fn test_local_matches_single_worker() {
        let config = AcoConfig::default()
            .with_ant_count(10)
            .with_generations(8)
            .with_seed(2024);

        let mut solo = ring(9);
        let expected = AcoRunner::run(&mut solo, &config).unwrap();

        for workers in [1, 2, 3, 4] {
            let mut graph = ring(9);
            let run = AcoRunner::run_local(&mut graph, &config, workers).unwrap();
            assert_eq!(run.best_tour, expected.best_tour, "workers = {workers}");
            assert_eq!(run.best_cost, expected.best_cost, "workers = {workers}");
            assert_eq!(run.cost_history, expected.cost_history);
            assert_eq!(graph.pheromones(), solo.pheromones());
        }
    }

    #[test]
    fn test_local_zero_workers() {
        let mut graph = square();
        assert!(matches!(
            AcoRunner::run_local(&mut graph, &scenario(), 0),
            Err(AcoError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_local_reports_root_cause() {
        let mut graph = square();
        graph.set_pheromones(vec![vec![0.0; 4]; 4]).unwrap();
        let err = AcoRunner::run_local(&mut graph, &scenario(), 3).unwrap_err();
        assert!(matches!(err, AcoError::DegenerateDistribution { .. }));
    }

    #[test]
    fn test_participant_outcome() {
        let graph = square();
        let config = scenario();
        let config = &config;
        let outcomes: Vec<WorkerOutcome> = std::thread::scope(|scope| {
            let handles: Vec<_> = local_cluster(2)
                .into_iter()
                .map(|comm| {
                    let mut local = graph.clone();
                    scope.spawn(move || AcoRunner::run_worker(&mut local, config, &comm).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(matches!(outcomes[0], WorkerOutcome::Coordinator(_)));
        assert_eq!(outcomes[1], WorkerOutcome::Participant);
        assert!(outcomes[1].clone().into_run().is_none());
    }

    /// Coordinator of a two-worker cluster whose peer sends `ants`.
    struct FixedPeer {
        ants: Vec<Ant>,
    }

    impl Communicator for FixedPeer {
        fn worker_count(&self) -> usize {
            2
        }
        fn rank(&self) -> usize {
            0
        }
        fn send(&self, _message: Message, _dest: usize) -> Result<()> {
            Ok(())
        }
        fn recv(&self, _source: usize) -> Result<Message> {
            Ok(Message::Ants(self.ants.clone()))
        }
        fn barrier(&self) {}
    }

    #[test]
    fn test_coordinator_rejects_ants_of_other_size() {
        let small = DistanceGraph::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let mut ant = Ant::with_start(&small, 0).unwrap();
        ant.construct(&small, 1.0, 2.0, &mut create_rng(1)).unwrap();
        ant.compute_pheromone_delta(1.0).unwrap();
        let peer = FixedPeer { ants: vec![ant] };

        let mut graph = DistanceGraph::new(vec![
            vec![0.0, 1.0, 2.0],
            vec![1.0, 0.0, 1.5],
            vec![2.0, 1.5, 0.0],
        ])
        .unwrap();
        let err = AcoRunner::run_worker(&mut graph, &scenario(), &peer).unwrap_err();
        assert_eq!(
            err,
            AcoError::InvalidDimension {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_ant_seed_streams_differ() {
        assert_ne!(ant_seed(1, 0, 0), ant_seed(1, 0, 1));
        assert_ne!(ant_seed(1, 0, 0), ant_seed(1, 1, 0));
        assert_ne!(ant_seed(1, 0, 0), ant_seed(2, 0, 0));
        assert_eq!(ant_seed(5, 3, 7), ant_seed(5, 3, 7));
    }
}
