//! A single ant and its tour construction.
//!
//! An [`Ant`] walks the graph once per generation:
//!
//! 1. start at a city (uniformly random, or fixed with [`Ant::with_start`])
//! 2. call [`pick_next_city`](Ant::pick_next_city) N-1 times
//! 3. [`close_cycle`](Ant::close_cycle) adds the return edge
//! 4. [`compute_pheromone_delta`](Ant::compute_pheromone_delta) fills the
//!    ant's local deposit matrix, which the coordinator merges once
//!
//! # Reference
//!
//! Dorigo, Maniezzo & Colorni (1996), "Ant System: Optimization by a
//! Colony of Cooperating Agents", *IEEE Trans. SMC-B* 26(1), 29-41.

use rand::Rng;

use crate::error::{AcoError, Result};
use crate::graph::DistanceGraph;

/// One candidate tour under construction.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ant {
    tour: Vec<usize>,
    visited: Vec<bool>,
    current: usize,
    total_cost: f64,
    closed: bool,
    // Only needed while constructing; not shipped to the coordinator.
    #[cfg_attr(feature = "serde", serde(skip))]
    visibility: Vec<Vec<f64>>,
    pheromone_delta: Vec<Vec<f64>>,
}

impl Ant {
    /// Creates an ant on a uniformly random start city.
    pub fn new<R: Rng>(graph: &DistanceGraph, rng: &mut R) -> Self {
        let start = rng.random_range(0..graph.size());
        Self::started_at(graph, start)
    }

    /// Creates an ant on a given start city.
    ///
    /// # Errors
    ///
    /// [`AcoError::InvalidDimension`] if `start >= graph.size()`.
    pub fn with_start(graph: &DistanceGraph, start: usize) -> Result<Self> {
        if start >= graph.size() {
            return Err(AcoError::InvalidDimension {
                expected: graph.size(),
                actual: start,
            });
        }
        Ok(Self::started_at(graph, start))
    }

    fn started_at(graph: &DistanceGraph, start: usize) -> Self {
        let n = graph.size();
        let visibility = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { 0.0 } else { 1.0 / graph.distance(i, j) })
                    .collect()
            })
            .collect();

        let mut visited = vec![false; n];
        visited[start] = true;

        let mut tour = Vec::with_capacity(n);
        tour.push(start);

        Self {
            tour,
            visited,
            current: start,
            total_cost: 0.0,
            closed: false,
            visibility,
            pheromone_delta: vec![vec![0.0; n]; n],
        }
    }

    /// Cities visited so far, in order.
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// Accumulated edge cost. Includes the return edge once the cycle is closed.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// The last city appended to the tour.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Whether the return edge has been added.
    pub fn is_complete(&self) -> bool {
        self.closed
    }

    /// Local deposit matrix. All zero until
    /// [`compute_pheromone_delta`](Self::compute_pheromone_delta) runs.
    pub fn pheromone_delta(&self) -> &[Vec<f64>] {
        &self.pheromone_delta
    }

    /// Unvisited cities in ascending index order.
    pub fn remaining(&self) -> impl Iterator<Item = usize> + '_ {
        self.visited
            .iter()
            .enumerate()
            .filter(|&(_, &seen)| !seen)
            .map(|(city, _)| city)
    }

    /// Moves to the next city by roulette-wheel selection.
    ///
    /// Each unvisited city `j` gets weight
    /// `pheromone[current][j]^alpha * visibility[current][j]^beta`. A draw
    /// `r ~ U[0, 1)` is reduced by each normalized weight in ascending city
    /// order; the city that brings `r` to zero or below is chosen. Cities
    /// with zero weight are never chosen.
    ///
    /// # Errors
    ///
    /// [`AcoError::DegenerateDistribution`] if the weights sum to zero or
    /// overflow, which includes calling this with no city left to visit.
    pub fn pick_next_city<R: Rng>(
        &mut self,
        graph: &DistanceGraph,
        alpha: f64,
        beta: f64,
        rng: &mut R,
    ) -> Result<usize> {
        let from = self.current;
        let eta = &self.visibility[from];

        let mut weights = vec![0.0; self.visited.len()];
        let mut total = 0.0;
        for j in self.remaining() {
            let w = graph.pheromone(from, j).powf(alpha) * eta[j].powf(beta);
            weights[j] = w;
            total += w;
        }
        if !(total > 0.0 && total.is_finite()) {
            return Err(AcoError::DegenerateDistribution { city: from });
        }

        let mut r: f64 = rng.random();
        let mut selected = None;
        for j in self.remaining().filter(|&j| weights[j] > 0.0) {
            // Rounding can leave r slightly positive after the last
            // candidate; that candidate is kept.
            selected = Some(j);
            r -= weights[j] / total;
            if r <= 0.0 {
                break;
            }
        }
        let next = selected.ok_or(AcoError::DegenerateDistribution { city: from })?;

        self.total_cost += graph.distance(from, next);
        self.visited[next] = true;
        self.tour.push(next);
        self.current = next;
        Ok(next)
    }

    /// Adds the return edge from the last city to the first.
    ///
    /// Calling it again after the cycle is closed does nothing.
    ///
    /// # Errors
    ///
    /// [`AcoError::IncompleteTour`] if some city is still unvisited.
    pub fn close_cycle(&mut self, graph: &DistanceGraph) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if self.tour.len() != self.visited.len() {
            return Err(AcoError::IncompleteTour {
                visited: self.tour.len(),
                size: self.visited.len(),
            });
        }
        self.total_cost += graph.distance(self.current, self.tour[0]);
        self.closed = true;
        Ok(())
    }

    /// Visits every remaining city and closes the cycle.
    pub fn construct<R: Rng>(
        &mut self,
        graph: &DistanceGraph,
        alpha: f64,
        beta: f64,
        rng: &mut R,
    ) -> Result<()> {
        while self.tour.len() < self.visited.len() {
            self.pick_next_city(graph, alpha, beta, rng)?;
        }
        self.close_cycle(graph)
    }

    /// Fills the local deposit matrix with `q / total_cost` on each forward
    /// edge `tour[k-1] -> tour[k]`.
    ///
    /// The return edge `tour[N-1] -> tour[0]` receives no deposit even
    /// though its distance is part of `total_cost`.
    ///
    /// # Errors
    ///
    /// [`AcoError::IncompleteTour`] if the cycle is not closed yet.
    pub fn compute_pheromone_delta(&mut self, q: f64) -> Result<()> {
        if !self.closed {
            return Err(AcoError::IncompleteTour {
                visited: self.tour.len(),
                size: self.visited.len(),
            });
        }
        for row in &mut self.pheromone_delta {
            row.fill(0.0);
        }
        let deposit = q / self.total_cost;
        for edge in self.tour.windows(2) {
            self.pheromone_delta[edge[0]][edge[1]] = deposit;
        }
        Ok(())
    }
}
