//! # Row Partitioning for the Parallel Kernels
//!
//! A [`PartitionPlan`] assigns every worker one contiguous, half-open range
//! of rows. Two layouts are provided:
//!
//! 1. **Static**: equal row counts per worker, oblivious to where the
//!    non-zeros are. The first `n_rows % W` blocks take one extra row.
//!
//! 2. **NNZ-balanced**: a greedy single pass that closes a block as soon
//!    as its accumulated non-zero count reaches `nnz / W`. The last block
//!    absorbs whatever remains, however large. When rows run out before
//!    `W - 1` blocks have closed, the blocks that were never reached are
//!    empty (`start == end == n_rows`).
//!
//! Both layouts cover `[0, n_rows)` exactly once, in worker order.

use std::ops::Range;

use crate::error::{Result, SpmvError};
use crate::matrix::CsrMatrix;

/// Half-open row range `[start, end)` assigned to one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBlock {
    pub start: usize,
    pub end: usize,
}

impl RowBlock {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Non-zeros stored in this block's rows
    pub fn nnz(&self, matrix: &CsrMatrix) -> usize {
        matrix.row_ptr[self.end] - matrix.row_ptr[self.start]
    }
}

/// One row block per worker, ordered by worker index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    blocks: Vec<RowBlock>,
}

impl PartitionPlan {
    pub fn blocks(&self) -> &[RowBlock] {
        &self.blocks
    }

    /// Number of blocks, equal to the worker count the plan was built for
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowBlock> {
        self.blocks.iter()
    }

    /// Whether the blocks tile `[0, n_rows)` contiguously, in order, without overlap
    pub fn covers(&self, n_rows: usize) -> bool {
        let mut expected_start = 0;
        for block in &self.blocks {
            if block.start != expected_start || block.end < block.start {
                return false;
            }
            expected_start = block.end;
        }
        expected_start == n_rows
    }

    /// Non-zeros assigned to each block
    pub fn block_loads(&self, matrix: &CsrMatrix) -> Vec<usize> {
        self.blocks.iter().map(|b| b.nnz(matrix)).collect()
    }

    /// Summarizes how evenly the non-zeros are spread across blocks
    pub fn summarize(&self, matrix: &CsrMatrix) -> PartitionSummary {
        let loads = self.block_loads(matrix);
        let total: usize = loads.iter().sum();
        let min_load = loads.iter().copied().min().unwrap_or(0);
        let max_load = loads.iter().copied().max().unwrap_or(0);
        let mean_load = if loads.is_empty() {
            0.0
        } else {
            total as f64 / loads.len() as f64
        };
        let empty_blocks = self.blocks.iter().filter(|b| b.is_empty()).count();

        PartitionSummary {
            blocks: loads.len(),
            empty_blocks,
            min_load,
            max_load,
            mean_load,
        }
    }
}

/// Load statistics of a partition plan over a particular matrix
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionSummary {
    pub blocks: usize,
    pub empty_blocks: usize,
    pub min_load: usize,
    pub max_load: usize,
    pub mean_load: f64,
}

impl PartitionSummary {
    /// `max_load / mean_load`; 1.0 is perfect balance
    pub fn imbalance(&self) -> f64 {
        if self.mean_load == 0.0 {
            1.0
        } else {
            self.max_load as f64 / self.mean_load
        }
    }
}

/// Splits `n_rows` into `workers` contiguous blocks of (nearly) equal row count
pub fn static_partition(n_rows: usize, workers: usize) -> Result<PartitionPlan> {
    if workers == 0 {
        return Err(SpmvError::InvalidWorkerCount(workers));
    }

    let base = n_rows / workers;
    let extra = n_rows % workers;

    let mut blocks = Vec::with_capacity(workers);
    let mut start = 0;
    for w in 0..workers {
        let len = base + usize::from(w < extra);
        blocks.push(RowBlock {
            start,
            end: start + len,
        });
        start += len;
    }

    Ok(PartitionPlan { blocks })
}

/// Greedy one-pass partition of the rows into `workers` blocks of roughly `nnz / workers` non-zeros
pub fn nnz_balanced_partition(matrix: &CsrMatrix, workers: usize) -> Result<PartitionPlan> {
    if workers == 0 {
        return Err(SpmvError::InvalidWorkerCount(workers));
    }

    let n_rows = matrix.n_rows;
    let target = matrix.nnz() / workers;

    let mut blocks = Vec::with_capacity(workers);
    let mut start = 0;
    let mut acc = 0;

    for i in 0..n_rows {
        acc += matrix.row_nnz(i);

        if acc >= target && blocks.len() < workers - 1 {
            blocks.push(RowBlock { start, end: i + 1 });
            start = i + 1;
            acc = 0;
        }
    }

    // The open block takes the remainder; blocks never reached are empty
    blocks.push(RowBlock { start, end: n_rows });
    while blocks.len() < workers {
        blocks.push(RowBlock {
            start: n_rows,
            end: n_rows,
        });
    }

    debug!(
        "nnz-balanced partition: {} rows, {} nnz, {} workers, target {}",
        n_rows,
        matrix.nnz(),
        workers,
        target
    );

    Ok(PartitionPlan { blocks })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix_with_row_counts(counts: &[usize]) -> CsrMatrix {
        let n_rows = counts.len();
        let n_cols = counts.iter().copied().max().unwrap_or(0).max(1);
        let mut row_ptr = vec![0];
        let mut col_idx = Vec::new();
        for &c in counts {
            col_idx.extend(0..c as u32);
            row_ptr.push(col_idx.len());
        }
        let values = vec![1.0; col_idx.len()];
        CsrMatrix::new(n_rows, n_cols, row_ptr, col_idx, values)
    }

    #[test]
    fn test_static_even_split() {
        let plan = static_partition(8, 4).unwrap();
        let ranges: Vec<_> = plan.iter().map(|b| (b.start, b.end)).collect();
        assert_eq!(ranges, vec![(0, 2), (2, 4), (4, 6), (6, 8)]);
    }

    #[test]
    fn test_static_remainder_goes_first() {
        let plan = static_partition(10, 4).unwrap();
        let lens: Vec<_> = plan.iter().map(|b| b.len()).collect();
        assert_eq!(lens, vec![3, 3, 2, 2]);
        assert!(plan.covers(10));
    }

    #[test]
    fn test_static_more_workers_than_rows() {
        let plan = static_partition(2, 4).unwrap();
        assert_eq!(plan.len(), 4);
        assert!(plan.covers(2));
        assert_eq!(plan.summarize(&CsrMatrix::zeros(2, 1)).empty_blocks, 2);
    }

    #[test]
    fn test_balanced_uniform_rows() {
        let m = matrix_with_row_counts(&[2, 2, 2, 2, 2, 2]);
        let plan = nnz_balanced_partition(&m, 3).unwrap();
        assert_eq!(plan.block_loads(&m), vec![4, 4, 4]);
        assert!(plan.covers(6));
    }

    #[test]
    fn test_balanced_skewed_rows() {
        // nnz = 12, target = 4 for 3 workers
        let m = matrix_with_row_counts(&[8, 1, 1, 1, 1]);
        let plan = nnz_balanced_partition(&m, 3).unwrap();
        let ranges: Vec<_> = plan.iter().map(|b| (b.start, b.end)).collect();
        assert_eq!(ranges, vec![(0, 1), (1, 5), (5, 5)]);
        assert!(plan.covers(5));
    }

    #[test]
    fn test_balanced_single_worker_takes_everything() {
        let m = matrix_with_row_counts(&[3, 0, 5]);
        let plan = nnz_balanced_partition(&m, 1).unwrap();
        assert_eq!(plan.blocks(), &[RowBlock { start: 0, end: 3 }]);
    }

    #[test]
    fn test_balanced_zero_target_closes_every_row() {
        // nnz = 2 < W = 4, target = 0
        let m = matrix_with_row_counts(&[1, 1]);
        let plan = nnz_balanced_partition(&m, 4).unwrap();
        let ranges: Vec<_> = plan.iter().map(|b| (b.start, b.end)).collect();
        assert_eq!(ranges, vec![(0, 1), (1, 2), (2, 2), (2, 2)]);
        assert!(plan.covers(2));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let m = matrix_with_row_counts(&[1]);
        assert!(matches!(
            nnz_balanced_partition(&m, 0),
            Err(SpmvError::InvalidWorkerCount(0))
        ));
        assert!(static_partition(1, 0).is_err());
    }

    #[test]
    fn test_summary_imbalance() {
        let m = matrix_with_row_counts(&[6, 2]);
        let plan = static_partition(2, 2).unwrap();
        let summary = plan.summarize(&m);
        assert_eq!(summary.max_load, 6);
        assert_eq!(summary.min_load, 2);
        assert!((summary.imbalance() - 1.5).abs() < 1e-12);
    }
}
