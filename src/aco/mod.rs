//! Ant Colony Optimization for the Traveling Salesman Problem.
//!
//! Implements the Ant System: each generation, every ant builds a full
//! tour by roulette-wheel selection over `τ^α · η^β` (pheromone times
//! inverse distance), then the trail is evaporated and reinforced by
//! every ant's deposit.
//!
//! # Key Types
//!
//! - [`AcoConfig`]: Colony parameters (ants, generations, α, β, ρ, Q, seed)
//! - [`Ant`]: One tour under construction and its pheromone delta
//! - [`AcoRunner`]: Executes the generation loop, alone or as one worker
//!   of a coordinator/participant cluster
//! - [`AcoRun`]: Best tour, its cost and per-generation statistics
//!
//! # References
//!
//! - Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//!   Colony of Cooperating Agents"
//! - Dorigo & Stützle (2004), *Ant Colony Optimization*

mod ant;
mod config;
mod runner;

pub use ant::Ant;
pub use config::AcoConfig;
pub use runner::{AcoRun, AcoRunner, GenerationStats, WorkerOutcome};
