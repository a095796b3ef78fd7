//! Centralized constants for the SpMV benchmark harness
//!
//! All hardcoded defaults used by the harness, the kernels and the CLI live
//! here. Constants are organized by category.

// ============================================================================
// BENCHMARK DEFAULTS
// ============================================================================

/// Number of timed trials per run
pub const DEFAULT_TRIALS: usize = 10;

/// Absolute elementwise tolerance when comparing against the serial reference
pub const DEFAULT_TOLERANCE: f32 = 1e-6;

/// Percentile reported as the tail-latency statistic
pub const TAIL_PERCENTILE: f64 = 0.9;

// ============================================================================
// LOADER
// ============================================================================

/// Upper bound on the entry buffer reserved from a file header before any
/// entry is read; the buffer grows past it as entries arrive
pub const MAX_INITIAL_ENTRIES: usize = 1 << 22;

// ============================================================================
// STRATEGY NAMES
// ============================================================================

/// Name of the sequential baseline
pub const SERIAL_NAME: &str = "serial";

/// Name of the row-count static partition
pub const STATIC_NAME: &str = "static";

/// Name of the non-zero balanced partition
pub const NNZ_BALANCED_NAME: &str = "nnzbal";

// ============================================================================
// THROUGHPUT
// ============================================================================

/// Floating point operations per stored non-zero (one multiply, one add)
pub const FLOPS_PER_NONZERO: f64 = 2.0;

/// Scale from FLOP/s to GFLOP/s
pub const GIGA: f64 = 1e9;

// ============================================================================
// WORKER POOL
// ============================================================================

/// Thread name prefix for benchmark workers
pub const WORKER_THREAD_PREFIX: &str = "spmv-worker";
