//! Coordinator/worker distribution of ants.
//!
//! A generation's ants are split across `W` workers. Each worker builds
//! its share, participants ship their completed ants to the coordinator
//! (rank 0), the coordinator merges every ant into the pheromone update and
//! broadcasts the new matrix back, and all workers meet at a barrier before
//! the next generation starts.
//!
//! The colony only talks to workers through [`Communicator`]. Two
//! implementations ship with the crate:
//!
//! - [`SoloComm`]: a single worker that is its own coordinator
//! - [`LocalComm`]: in-process workers connected by channels, built with
//!   [`local_cluster`]

mod local;
mod share;

pub use local::{local_cluster, LocalComm};
pub use share::{ant_range, ant_share};

use crate::aco::Ant;
use crate::error::{AcoError, Result};

/// What a worker does in the reduction step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Rank 0: merges all ants, updates and broadcasts pheromone, and owns
    /// the run result.
    Coordinator,
    /// Any other rank: sends its ants and waits for the new pheromone.
    Participant,
}

impl Role {
    /// Role of the worker with the given rank.
    pub fn of(rank: usize) -> Self {
        if rank == 0 {
            Role::Coordinator
        } else {
            Role::Participant
        }
    }
}

/// Payload exchanged between workers at a generation boundary.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Message {
    /// Completed ants, delta matrices included (participant → coordinator).
    Ants(Vec<Ant>),
    /// Updated pheromone matrix (coordinator → participant).
    Pheromone(Vec<Vec<f64>>),
}

/// Message-passing contract between the colony and the worker topology.
///
/// Implementations are assumed reliable; any error aborts the run.
pub trait Communicator {
    /// Number of workers `W`.
    fn worker_count(&self) -> usize;

    /// This worker's rank in `0..W`. Rank 0 coordinates.
    fn rank(&self) -> usize;

    /// Sends `message` to the worker with rank `dest`.
    fn send(&self, message: Message, dest: usize) -> Result<()>;

    /// Blocks until a message from rank `source` arrives.
    fn recv(&self, source: usize) -> Result<Message>;

    /// Blocks until every worker has reached the barrier.
    ///
    /// Called once at the end of each generation.
    fn barrier(&self);

    /// This worker's role.
    fn role(&self) -> Role {
        Role::of(self.rank())
    }
}

/// A single worker with no peers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoloComm;

impl Communicator for SoloComm {
    fn worker_count(&self) -> usize {
        1
    }

    fn rank(&self) -> usize {
        0
    }

    fn send(&self, _message: Message, dest: usize) -> Result<()> {
        Err(AcoError::Transport(format!(
            "single worker cannot send to rank {dest}"
        )))
    }

    fn recv(&self, source: usize) -> Result<Message> {
        Err(AcoError::Transport(format!(
            "single worker cannot receive from rank {source}"
        )))
    }

    fn barrier(&self) {}
}
