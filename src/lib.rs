//! Ant Colony Optimization for the Traveling Salesman Problem.
//!
//! Given an N×N distance matrix (symmetric or not), the colony searches for
//! a cheap Hamiltonian cycle:
//!
//! - [`DistanceGraph`]: Distance matrix plus the learned pheromone matrix.
//! - [`aco`]: Ants, colony parameters and the generation loop.
//! - [`distribution`]: Splits each generation's ants across workers and
//!   gathers them back to a coordinator for the pheromone update.
//!
//! # Example
//!
//! ```
//! use u_antcolony::aco::{AcoConfig, AcoRunner};
//! use u_antcolony::DistanceGraph;
//!
//! let mut graph = DistanceGraph::new(vec![
//!     vec![0.0, 3.0, 4.0, 2.0],
//!     vec![3.0, 0.0, 1.0, 5.0],
//!     vec![4.0, 1.0, 0.0, 2.0],
//!     vec![2.0, 5.0, 2.0, 0.0],
//! ])
//! .unwrap();
//!
//! let config = AcoConfig::default().with_ant_count(8).with_generations(20).with_seed(1);
//! let run = AcoRunner::run_local(&mut graph, &config, 2).unwrap();
//! assert_eq!(run.best_tour.len(), 4);
//! ```

pub mod aco;
pub mod distribution;
mod error;
mod graph;

pub use error::{AcoError, Result};
pub use graph::DistanceGraph;
