//! Error type shared by the loader, partitioner, kernels and harness
//!
//! Every variant is fatal to a benchmark run. Nothing in the crate retries;
//! errors propagate to the binary, which reports them and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, SpmvError>;

/// Errors raised while loading, partitioning, multiplying or benchmarking
#[derive(Debug, Error)]
pub enum SpmvError {
    /// The input file could not be opened or read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path of the file being read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Malformed header, malformed entry, or entry count inconsistent with the header
    #[error(
        "invalid matrix format{}: {message}",
        .line.map(|l| format!(" at line {}", l)).unwrap_or_default()
    )]
    Format {
        /// 1-based line number in the input, when the problem is tied to one
        line: Option<usize>,
        /// What was wrong
        message: String,
    },

    /// Storage for the matrix, a vector or the timing samples could not be reserved
    #[error("failed to allocate {len} elements for {what}")]
    Allocation {
        /// Which buffer failed
        what: &'static str,
        /// Requested element count
        len: usize,
    },

    /// A strategy produced a result that deviates from the serial reference
    #[error(
        "results do not match reference: strategy {strategy}, trial {trial}, \
         row {row}: expected {expected}, got {actual}"
    )]
    CorrectnessMismatch {
        /// Name of the failing strategy
        strategy: String,
        /// 0-based timed trial index
        trial: usize,
        /// First row outside tolerance
        row: usize,
        /// Serial reference value
        expected: f32,
        /// Value produced by the strategy
        actual: f32,
    },

    /// The requested strategy name is not one of `serial`, `static`, `nnzbal`
    #[error("unknown strategy: {0} (expected serial | static | nnzbal)")]
    UnknownStrategy(String),

    /// Worker counts must be at least one
    #[error("invalid worker count: {0}")]
    InvalidWorkerCount(usize),

    /// A partition plan was built for a different worker count than the pool
    #[error("partition plan has {plan} blocks but the pool has {workers} workers")]
    PlanMismatch {
        /// Number of blocks in the plan
        plan: usize,
        /// Number of workers executing it
        workers: usize,
    },

    /// Vector length does not match the matrix shape
    #[error("{what} has length {actual}, expected {expected}")]
    DimensionMismatch {
        /// Which vector
        what: &'static str,
        /// Length implied by the matrix
        expected: usize,
        /// Length supplied
        actual: usize,
    },

    /// The worker pool could not be started
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SpmvError {
    pub(crate) fn format(line: impl Into<Option<usize>>, message: impl Into<String>) -> Self {
        SpmvError::Format {
            line: line.into(),
            message: message.into(),
        }
    }
}

/// Allocates a vector of `len` copies of `fill`, reporting failure instead of aborting
pub fn try_alloc<T: Clone>(what: &'static str, len: usize, fill: T) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| SpmvError::Allocation { what, len })?;
    v.resize(len, fill);
    Ok(v)
}

/// Reserves capacity for `len` elements without initialising them
pub fn try_with_capacity<T>(what: &'static str, len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| SpmvError::Allocation { what, len })?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_alloc_fills() {
        let v = try_alloc("test", 4, 1.5f32).unwrap();
        assert_eq!(v, vec![1.5; 4]);
    }

    #[test]
    fn test_try_alloc_reports_overflow() {
        let err = try_alloc::<u64>("huge", usize::MAX, 0).unwrap_err();
        assert!(matches!(err, SpmvError::Allocation { what: "huge", .. }));
    }

    #[test]
    fn test_format_message_line() {
        let err = SpmvError::format(7, "bad entry");
        assert_eq!(err.to_string(), "invalid matrix format at line 7: bad entry");

        let err = SpmvError::format(None, "count mismatch");
        assert_eq!(err.to_string(), "invalid matrix format: count mismatch");
    }

    #[test]
    fn test_mismatch_message() {
        let err = SpmvError::CorrectnessMismatch {
            strategy: "static".into(),
            trial: 2,
            row: 7,
            expected: 1.0,
            actual: 2.0,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("results do not match reference"));
        assert!(msg.contains("row 7"));
    }
}
