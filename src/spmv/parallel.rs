//! # Parallel SpMV
//!
//! Both parallel strategies run on a [`WorkerPool`]: a rayon thread pool
//! with exactly as many threads as partition blocks. Each call fans out one
//! task per block and joins them all before returning. The output vector is
//! split into disjoint per-block slices up front, so workers never share a
//! writable location.

use std::sync::Arc;

use crate::constants::WORKER_THREAD_PREFIX;
use crate::error::{Result, SpmvError};
use crate::matrix::CsrMatrix;
use crate::partition::{nnz_balanced_partition, static_partition, PartitionPlan};
use crate::spmv::serial::check_dimensions;
use crate::spmv::{SpmvKernel, Strategy};

/// Fixed-size pool of worker threads, built once and reused across trials
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    n_threads: usize,
}

impl WorkerPool {
    pub fn new(n_threads: usize) -> Result<Self> {
        if n_threads == 0 {
            return Err(SpmvError::InvalidWorkerCount(n_threads));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|idx| format!("{}-{}", WORKER_THREAD_PREFIX, idx))
            .build()?;

        Ok(Self { pool, n_threads })
    }

    pub fn n_threads(&self) -> usize {
        self.n_threads
    }

    /// Computes `r = matrix · x` with one task per block of `plan`
    ///
    /// The plan must have one block per worker and must tile the matrix rows.
    pub fn execute(
        &self,
        plan: &PartitionPlan,
        matrix: &CsrMatrix,
        x: &[f32],
        r: &mut [f32],
    ) -> Result<()> {
        if plan.len() != self.n_threads {
            return Err(SpmvError::PlanMismatch {
                plan: plan.len(),
                workers: self.n_threads,
            });
        }
        check_dimensions(matrix, x, r)?;
        if !plan.covers(matrix.n_rows) {
            return Err(SpmvError::DimensionMismatch {
                what: "partition plan rows",
                expected: matrix.n_rows,
                actual: plan.blocks().last().map_or(0, |b| b.end),
            });
        }

        self.pool.scope(|s| {
            let mut rest = r;
            for block in plan.iter() {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(block.len());
                rest = tail;
                let rows = block.rows();

                s.spawn(move |_| {
                    for (out, i) in chunk.iter_mut().zip(rows) {
                        *out = matrix.row_dot(i, x);
                    }
                });
            }
        });

        Ok(())
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("n_threads", &self.n_threads)
            .finish()
    }
}

/// Equal row counts per worker, laid out once for the matrix's row count
#[derive(Debug, Clone)]
pub struct StaticKernel {
    pool: Arc<WorkerPool>,
    plan: PartitionPlan,
}

impl StaticKernel {
    pub fn new(pool: Arc<WorkerPool>, matrix: &CsrMatrix) -> Result<Self> {
        let plan = static_partition(matrix.n_rows, pool.n_threads())?;
        Ok(Self { pool, plan })
    }

    pub fn plan(&self) -> &PartitionPlan {
        &self.plan
    }
}

impl SpmvKernel for StaticKernel {
    fn strategy(&self) -> Strategy {
        Strategy::Static
    }

    fn multiply(&self, matrix: &CsrMatrix, x: &[f32], r: &mut [f32]) -> Result<()> {
        self.pool.execute(&self.plan, matrix, x, r)
    }
}

/// Row blocks from a precomputed nnz-balanced plan
#[derive(Debug, Clone)]
pub struct BalancedKernel {
    pool: Arc<WorkerPool>,
    plan: PartitionPlan,
}

impl BalancedKernel {
    /// Partitions `matrix` for the pool's worker count
    pub fn new(pool: Arc<WorkerPool>, matrix: &CsrMatrix) -> Result<Self> {
        let plan = nnz_balanced_partition(matrix, pool.n_threads())?;
        Ok(Self { pool, plan })
    }

    /// Uses an existing plan; its length must match the pool's worker count
    pub fn with_plan(pool: Arc<WorkerPool>, plan: PartitionPlan) -> Result<Self> {
        if plan.len() != pool.n_threads() {
            return Err(SpmvError::PlanMismatch {
                plan: plan.len(),
                workers: pool.n_threads(),
            });
        }
        Ok(Self { pool, plan })
    }

    pub fn plan(&self) -> &PartitionPlan {
        &self.plan
    }
}

impl SpmvKernel for BalancedKernel {
    fn strategy(&self) -> Strategy {
        Strategy::NnzBalanced
    }

    fn multiply(&self, matrix: &CsrMatrix, x: &[f32], r: &mut [f32]) -> Result<()> {
        self.pool.execute(&self.plan, matrix, x, r)
    }
}
