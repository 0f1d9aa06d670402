//! Colony configuration.
//!
//! [`AcoConfig`] holds the parameters of a run. They are fixed for the
//! whole run and identical on every worker.

/// Configuration for the ant colony.
///
/// # Defaults
///
/// ```
/// use u_antcolony::aco::AcoConfig;
///
/// let config = AcoConfig::default();
/// assert_eq!(config.ant_count, 10);
/// assert_eq!(config.generations, 100);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_antcolony::aco::AcoConfig;
///
/// let config = AcoConfig::default()
///     .with_ant_count(20)
///     .with_generations(50)
///     .with_alpha(1.0)
///     .with_beta(3.0)
///     .with_rho(0.6)
///     .with_q(100.0)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcoConfig {
    /// Ants per generation, summed over all workers.
    pub ant_count: usize,

    /// Number of generations. The run always executes exactly this many.
    pub generations: usize,

    /// Pheromone influence exponent (α).
    pub alpha: f64,

    /// Visibility (inverse distance) influence exponent (β).
    pub beta: f64,

    /// Fraction of pheromone retained each generation, in `[0, 1)`.
    ///
    /// This multiplies the trail; it is not the amount evaporated.
    pub rho: f64,

    /// Deposit intensity. Each ant lays `q / tour_cost` per edge.
    pub q: f64,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Whether a worker constructs its ants in parallel using rayon.
    ///
    /// Has no effect unless the `parallel` feature is enabled. Results are
    /// identical either way: every ant draws from its own random stream.
    pub parallel: bool,
}

impl Default for AcoConfig {
    fn default() -> Self {
        Self {
            ant_count: 10,
            generations: 100,
            alpha: 1.0,
            beta: 2.0,
            rho: 0.5,
            q: 1.0,
            seed: None,
            parallel: false,
        }
    }
}

impl AcoConfig {
    /// Sets the number of ants per generation.
    pub fn with_ant_count(mut self, n: usize) -> Self {
        self.ant_count = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the pheromone exponent.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the visibility exponent.
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    /// Sets the retained pheromone fraction.
    pub fn with_rho(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    /// Sets the deposit intensity.
    pub fn with_q(mut self, q: f64) -> Self {
        self.q = q;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel ant construction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Preset for quick runs: 10 ants, 50 generations.
    pub fn fast() -> Self {
        Self {
            ant_count: 10,
            generations: 50,
            ..Self::default()
        }
    }

    /// Preset for moderate runs: 25 ants, 200 generations.
    pub fn balanced() -> Self {
        Self {
            ant_count: 25,
            generations: 200,
            ..Self::default()
        }
    }

    /// Preset for long runs: 50 ants, 500 generations, slower evaporation.
    pub fn quality() -> Self {
        Self {
            ant_count: 50,
            generations: 500,
            rho: 0.8,
            ..Self::default()
        }
    }

    /// Picks a preset from the number of cities.
    ///
    /// - `cities < 30` → [`fast()`](Self::fast)
    /// - `30 ≤ cities < 150` → [`balanced()`](Self::balanced)
    /// - `cities ≥ 150` → [`quality()`](Self::quality)
    pub fn auto_select(cities: usize) -> Self {
        if cities < 30 {
            Self::fast()
        } else if cities < 150 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    /// `ant_count = 0` is accepted: the trail then only evaporates.
    pub fn validate(&self) -> Result<(), String> {
        if self.generations == 0 {
            return Err("generations must be at least 1".into());
        }
        if !(self.alpha.is_finite() && self.alpha >= 0.0) {
            return Err(format!("alpha must be finite and non-negative, got {}", self.alpha));
        }
        if !(self.beta.is_finite() && self.beta >= 0.0) {
            return Err(format!("beta must be finite and non-negative, got {}", self.beta));
        }
        if !(0.0..1.0).contains(&self.rho) {
            return Err(format!("rho must be in [0, 1), got {}", self.rho));
        }
        if !(self.q.is_finite() && self.q > 0.0) {
            return Err(format!("q must be finite and positive, got {}", self.q));
        }
        Ok(())
    }
}
