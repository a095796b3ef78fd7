//! # Benchmark & Validation Harness
//!
//! A run computes the serial reference once, primes the selected kernel with
//! one untimed call, then times `trials` calls with a monotonic clock. After
//! every timed call the output is compared elementwise with the reference; the
//! first mismatch ends the run with [`SpmvError::CorrectnessMismatch`] and no
//! summary is produced. A successful run is reduced to its tail percentile.

use std::fmt;
use std::time::Instant;

use crate::constants::{FLOPS_PER_NONZERO, GIGA};
use crate::error::{try_alloc, try_with_capacity, Result, SpmvError};
use crate::matrix::{BenchConfig, CsrMatrix};
use crate::spmv::{create_kernel, spmv_serial, SpmvKernel, Strategy};
use crate::vector::{generate_vector, make_rng};

/// Returns the value at rank `floor(q * (n - 1))` of the ascending-sorted samples
///
/// The input is left in trial order. An empty sample yields `0.0`.
pub fn percentile(samples: &[f64], q: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q * (sorted.len() - 1) as f64).floor() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

/// First element where two vectors differ by more than `tolerance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub row: usize,
    pub expected: f32,
    pub actual: f32,
}

/// Compares `actual` against `expected` with an absolute elementwise tolerance
///
/// NaN never compares within tolerance. Vectors of different length mismatch
/// at the first missing index.
pub fn compare_vectors(expected: &[f32], actual: &[f32], tolerance: f32) -> Option<Mismatch> {
    for (row, (&e, &a)) in expected.iter().zip(actual).enumerate() {
        if !((e - a).abs() <= tolerance) {
            return Some(Mismatch {
                row,
                expected: e,
                actual: a,
            });
        }
    }

    if expected.len() != actual.len() {
        let row = expected.len().min(actual.len());
        return Some(Mismatch {
            row,
            expected: expected.get(row).copied().unwrap_or(f32::NAN),
            actual: actual.get(row).copied().unwrap_or(f32::NAN),
        });
    }

    None
}

/// Elapsed seconds of each timed trial, in trial order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkSample {
    times: Vec<f64>,
}

impl BenchmarkSample {
    pub fn with_capacity(trials: usize) -> Result<Self> {
        Ok(Self {
            times: try_with_capacity("timing samples", trials)?,
        })
    }

    pub fn push(&mut self, seconds: f64) {
        self.times.push(seconds);
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.times
    }

    pub fn percentile(&self, q: f64) -> f64 {
        percentile(&self.times, q)
    }

    pub fn p90(&self) -> f64 {
        self.percentile(0.9)
    }

    pub fn min(&self) -> f64 {
        self.times.iter().copied().reduce(f64::min).unwrap_or(0.0)
    }

    pub fn median(&self) -> f64 {
        self.percentile(0.5)
    }
}

impl From<Vec<f64>> for BenchmarkSample {
    fn from(times: Vec<f64>) -> Self {
        Self { times }
    }
}

/// Result of one benchmark invocation
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSummary {
    /// Configured worker count
    pub workers: usize,
    /// Strategy name as accepted on the command line
    pub strategy: String,
    /// Configured-percentile latency in seconds (p90 by default)
    pub p90_seconds: f64,
    pub min_seconds: f64,
    pub median_seconds: f64,
    /// Raw timings
    pub sample: BenchmarkSample,
}

impl BenchmarkSummary {
    /// Throughput at the tail latency, counting one multiply and one add per non-zero
    pub fn gflops(&self, nnz: usize) -> f64 {
        if self.p90_seconds <= 0.0 {
            return 0.0;
        }
        FLOPS_PER_NONZERO * nnz as f64 / GIGA / self.p90_seconds
    }
}

impl fmt::Display for BenchmarkSummary {
    /// `workers,strategy,p90` with nanosecond precision
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{:.9}", self.workers, self.strategy, self.p90_seconds)
    }
}

/// Drives timed, validated runs of SpMV kernels over one matrix and input vector
pub struct BenchmarkHarness<'m> {
    matrix: &'m CsrMatrix,
    x: Vec<f32>,
    reference: Vec<f32>,
    config: BenchConfig,
}

impl<'m> BenchmarkHarness<'m> {
    /// Sets up a harness with a caller-supplied input vector
    ///
    /// The serial reference is computed here, once.
    pub fn new(matrix: &'m CsrMatrix, x: Vec<f32>, config: BenchConfig) -> Result<Self> {
        let mut reference = try_alloc("reference vector", matrix.n_rows, 0.0f32)?;
        spmv_serial(matrix, &x, &mut reference)?;

        Ok(Self {
            matrix,
            x,
            reference,
            config,
        })
    }

    /// Sets up a harness with a random input vector drawn per `config.seed`
    pub fn with_random_vector(matrix: &'m CsrMatrix, config: BenchConfig) -> Result<Self> {
        let mut rng = make_rng(config.seed);
        let x = generate_vector(matrix.n_cols, &mut rng)?;
        Self::new(matrix, x, config)
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn input(&self) -> &[f32] {
        &self.x
    }

    pub fn reference(&self) -> &[f32] {
        &self.reference
    }

    /// Benchmarks `strategy` with a kernel built for the configured worker count
    pub fn run(&self, strategy: Strategy) -> Result<BenchmarkSummary> {
        let kernel = create_kernel(strategy, self.matrix, self.config.n_threads)?;
        self.run_kernel(kernel.as_ref())
    }

    /// Benchmarks an already-built kernel
    pub fn run_kernel(&self, kernel: &dyn SpmvKernel) -> Result<BenchmarkSummary> {
        let mut result = try_alloc("result vector", self.matrix.n_rows, 0.0f32)?;
        let mut sample = BenchmarkSample::with_capacity(self.config.trials)?;

        // Untimed priming call
        kernel.multiply(self.matrix, &self.x, &mut result)?;

        for trial in 0..self.config.trials {
            let t0 = Instant::now();
            kernel.multiply(self.matrix, &self.x, &mut result)?;
            let elapsed = t0.elapsed().as_secs_f64();
            sample.push(elapsed);

            if let Some(m) = compare_vectors(&self.reference, &result, self.config.tolerance) {
                warn!(
                    "{}: trial {} row {} expected {} got {}",
                    kernel.name(),
                    trial,
                    m.row,
                    m.expected,
                    m.actual
                );
                return Err(SpmvError::CorrectnessMismatch {
                    strategy: kernel.name().to_string(),
                    trial,
                    row: m.row,
                    expected: m.expected,
                    actual: m.actual,
                });
            }

            debug!("{} trial {}: {:.9}s", kernel.name(), trial, elapsed);
        }

        let summary = BenchmarkSummary {
            workers: self.config.n_threads,
            strategy: kernel.name().to_string(),
            p90_seconds: sample.percentile(self.config.percentile),
            min_seconds: sample.min(),
            median_seconds: sample.median(),
            sample,
        };

        info!(
            "{} with {} workers: p90 {:.9}s, min {:.9}s, {:.3} GFLOP/s",
            summary.strategy,
            summary.workers,
            summary.p90_seconds,
            summary.min_seconds,
            summary.gflops(self.matrix.nnz())
        );

        Ok(summary)
    }
}
