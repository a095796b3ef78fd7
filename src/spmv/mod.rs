//! SpMV kernel family
//!
//! Three interchangeable strategies compute `r = A·x` over the same
//! [`CsrMatrix`]. Every strategy evaluates each row with
//! [`CsrMatrix::row_dot`], so for a given matrix and vector they agree
//! bit for bit; only the assignment of rows to threads differs.

pub mod parallel;
pub mod serial;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::constants::{NNZ_BALANCED_NAME, SERIAL_NAME, STATIC_NAME};
use crate::error::{Result, SpmvError};
use crate::matrix::CsrMatrix;

pub use parallel::{BalancedKernel, StaticKernel, WorkerPool};
pub use serial::{spmv_serial, SerialKernel};

/// Execution strategy selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Sequential baseline
    Serial,
    /// Contiguous equal-row blocks, one per worker
    Static,
    /// Contiguous blocks of roughly equal non-zero count, one per worker
    NnzBalanced,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Serial, Strategy::Static, Strategy::NnzBalanced];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Serial => SERIAL_NAME,
            Strategy::Static => STATIC_NAME,
            Strategy::NnzBalanced => NNZ_BALANCED_NAME,
        }
    }

    pub fn is_parallel(&self) -> bool {
        !matches!(self, Strategy::Serial)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = SpmvError;

    fn from_str(s: &str) -> Result<Self> {
        Strategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| SpmvError::UnknownStrategy(s.to_string()))
    }
}

/// A way of computing `r = matrix · x`
///
/// Implementations overwrite every element of `r` and touch nothing else.
/// They never retry; validating the result is the harness's job.
pub trait SpmvKernel: Send + Sync {
    /// Strategy this kernel implements
    fn strategy(&self) -> Strategy;

    /// Name reported in benchmark output
    fn name(&self) -> &str {
        self.strategy().name()
    }

    /// Computes `r = matrix · x`
    fn multiply(&self, matrix: &CsrMatrix, x: &[f32], r: &mut [f32]) -> Result<()>;
}

/// Builds the kernel for `strategy`
///
/// Parallel strategies get a fresh pool of `n_threads` workers that lives as
/// long as the kernel and partition `matrix` up front. The serial kernel
/// ignores `n_threads`, so any count (including zero) is accepted for it.
pub fn create_kernel(
    strategy: Strategy,
    matrix: &CsrMatrix,
    n_threads: usize,
) -> Result<Box<dyn SpmvKernel>> {
    match strategy {
        Strategy::Serial => Ok(Box::new(SerialKernel)),
        Strategy::Static => {
            let pool = Arc::new(WorkerPool::new(n_threads)?);
            Ok(Box::new(StaticKernel::new(pool, matrix)?))
        }
        Strategy::NnzBalanced => {
            let pool = Arc::new(WorkerPool::new(n_threads)?);
            let kernel = BalancedKernel::new(pool, matrix)?;
            let summary = kernel.plan().summarize(matrix);
            debug!(
                "partition loads: min {} max {} mean {:.1} (imbalance {:.3}, {} empty blocks)",
                summary.min_load,
                summary.max_load,
                summary.mean_load,
                summary.imbalance(),
                summary.empty_blocks
            );
            Ok(Box::new(kernel))
        }
    }
}
