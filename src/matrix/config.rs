//! Configuration for a benchmark run

use crate::constants::{DEFAULT_TOLERANCE, DEFAULT_TRIALS, TAIL_PERCENTILE};

/// Parameters of one benchmark invocation
///
/// Everything that would otherwise be process-wide state (worker count,
/// random seed) is carried here and passed explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Number of workers in the pool and blocks in a partition plan
    pub n_threads: usize,

    /// Number of timed trials after the priming run
    pub trials: usize,

    /// Absolute elementwise tolerance against the serial reference
    pub tolerance: f32,

    /// Percentile of the timing sample reported as the summary statistic
    pub percentile: f64,

    /// Seed for the dense input vector; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            n_threads: num_cpus::get(), // Use all available cores
            trials: DEFAULT_TRIALS,
            tolerance: DEFAULT_TOLERANCE,
            percentile: TAIL_PERCENTILE,
            seed: None,
        }
    }
}

impl BenchConfig {
    /// Default configuration with a fixed worker count
    pub fn with_threads(n_threads: usize) -> Self {
        Self {
            n_threads,
            ..Self::default()
        }
    }

    pub fn trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
