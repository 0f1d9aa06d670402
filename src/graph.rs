//! Distance and pheromone matrices.
//!
//! [`DistanceGraph`] holds the caller's N×N distance matrix next to the
//! N×N pheromone matrix the colony learns. Distances are never modified;
//! pheromone is written only by the coordinator's global update (or by a
//! resync from the coordinator on the other workers).

use crate::aco::Ant;
use crate::error::{AcoError, Result};

/// Complete directed graph over `N` cities.
///
/// The pheromone matrix is seeded with `1 / N²` on every cell, diagonal
/// included. The diagonal of both matrices is never read.
///
/// # Examples
///
/// ```
/// use u_antcolony::DistanceGraph;
///
/// let graph = DistanceGraph::new(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 1.5],
///     vec![2.0, 1.5, 0.0],
/// ])
/// .unwrap();
///
/// assert_eq!(graph.size(), 3);
/// assert!((graph.pheromone(0, 1) - 1.0 / 9.0).abs() < 1e-12);
/// assert!((graph.tour_cost(&[0, 1, 2]) - 4.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceGraph {
    size: usize,
    distances: Vec<Vec<f64>>,
    pheromones: Vec<Vec<f64>>,
}

impl DistanceGraph {
    /// Builds a graph from a square distance matrix.
    ///
    /// # Errors
    ///
    /// [`AcoError::InvalidDimension`] if there are fewer than two cities or
    /// any row length differs from the number of rows.
    pub fn new(distances: Vec<Vec<f64>>) -> Result<Self> {
        let size = distances.len();
        if size < 2 {
            return Err(AcoError::InvalidDimension {
                expected: 2,
                actual: size,
            });
        }
        if let Some(row) = distances.iter().find(|row| row.len() != size) {
            return Err(AcoError::InvalidDimension {
                expected: size,
                actual: row.len(),
            });
        }

        let tau0 = 1.0 / (size * size) as f64;
        Ok(Self {
            size,
            distances,
            pheromones: vec![vec![tau0; size]; size],
        })
    }

    /// Replaces the pheromone seed value on every cell.
    ///
    /// # Errors
    ///
    /// [`AcoError::InvalidConfig`] unless `tau0` is finite and positive.
    pub fn with_initial_pheromone(mut self, tau0: f64) -> Result<Self> {
        if !(tau0.is_finite() && tau0 > 0.0) {
            return Err(AcoError::InvalidConfig(format!(
                "initial pheromone must be finite and positive, got {tau0}"
            )));
        }
        for row in &mut self.pheromones {
            row.fill(tau0);
        }
        Ok(self)
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from city `i` to city `j`.
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances[i][j]
    }

    /// Pheromone on the edge `i -> j`.
    pub fn pheromone(&self, i: usize, j: usize) -> f64 {
        self.pheromones[i][j]
    }

    /// The full distance matrix.
    pub fn distances(&self) -> &[Vec<f64>] {
        &self.distances
    }

    /// The full pheromone matrix.
    pub fn pheromones(&self) -> &[Vec<f64>] {
        &self.pheromones
    }

    /// Cost of `tour` as a closed cycle, return edge included.
    ///
    /// Returns 0.0 for tours shorter than two cities.
    ///
    /// # Panics
    /// Panics if `tour` contains an index `>= size()`.
    pub fn tour_cost(&self, tour: &[usize]) -> f64 {
        if tour.len() < 2 {
            return 0.0;
        }
        let open: f64 = tour
            .windows(2)
            .map(|w| self.distances[w[0]][w[1]])
            .sum();
        open + self.distances[tour[tour.len() - 1]][tour[0]]
    }

    /// Overwrites the pheromone matrix with one broadcast by the coordinator.
    ///
    /// # Errors
    ///
    /// [`AcoError::InvalidDimension`] if `matrix` is not `size() × size()`.
    pub fn set_pheromones(&mut self, matrix: Vec<Vec<f64>>) -> Result<()> {
        if matrix.len() != self.size {
            return Err(AcoError::InvalidDimension {
                expected: self.size,
                actual: matrix.len(),
            });
        }
        if let Some(row) = matrix.iter().find(|row| row.len() != self.size) {
            return Err(AcoError::InvalidDimension {
                expected: self.size,
                actual: row.len(),
            });
        }
        self.pheromones = matrix;
        Ok(())
    }

    /// Global pheromone update: evaporate, then deposit every ant's delta.
    ///
    /// For each cell: `τ[i][j] = τ[i][j] · rho + Σ ant.delta[i][j]`, with the
    /// ants summed in slice order. `rho` is the retained fraction.
    ///
    /// # Errors
    ///
    /// [`AcoError::InvalidDimension`] if any ant was built on a graph of a
    /// different size. The matrix is left untouched in that case.
    pub fn update_pheromone(&mut self, ants: &[Ant], rho: f64) -> Result<()> {
        for ant in ants {
            self.check_ant(ant)?;
        }
        for (i, row) in self.pheromones.iter_mut().enumerate() {
            for (j, tau) in row.iter_mut().enumerate() {
                *tau *= rho;
                for ant in ants {
                    *tau += ant.pheromone_delta()[i][j];
                }
            }
        }
        Ok(())
    }

    fn check_ant(&self, ant: &Ant) -> Result<()> {
        let delta = ant.pheromone_delta();
        let actual = std::iter::once(delta.len())
            .chain(delta.iter().map(Vec::len))
            .chain(std::iter::once(ant.tour().len()))
            .find(|&len| len != self.size);
        match actual {
            Some(actual) => Err(AcoError::InvalidDimension {
                expected: self.size,
                actual,
            }),
            None => Ok(()),
        }
    }
}
