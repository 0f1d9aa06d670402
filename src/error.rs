//! Error type shared by the graph, ant, colony and distribution layers.
//!
//! Every variant is fatal for the run: nothing inside a generation is
//! retried.

use thiserror::Error;

/// Errors raised while building a graph or running the colony.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AcoError {
    /// The distance matrix is not square, has fewer than two cities, or an
    /// index / matrix shape does not match the graph size.
    #[error("invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Size the graph requires.
        expected: usize,
        /// Size that was supplied.
        actual: usize,
    },

    /// Every selection weight from `city` summed to zero (or overflowed).
    #[error("degenerate selection distribution at city {city}")]
    DegenerateDistribution {
        /// The ant's current city when selection failed.
        city: usize,
    },

    /// A tour operation that needs a full cycle was called on a partial tour.
    #[error("tour incomplete: visited {visited} of {size} cities")]
    IncompleteTour {
        /// Cities visited so far.
        visited: usize,
        /// Cities in the graph.
        size: usize,
    },

    /// Rejected colony parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker transport failed (peer gone, wrong message, bad rank).
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Shorthand result type for this crate.
pub type Result<T> = std::result::Result<T, AcoError>;
