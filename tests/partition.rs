//! Coverage and balance of the partition plans

use proptest::prelude::*;
use spmv_bench::{nnz_balanced_partition, static_partition, CsrMatrix, RowBlock};

/// Matrix whose row i holds `counts[i]` entries
fn matrix_from_row_counts(counts: &[usize]) -> CsrMatrix {
    let n_cols = counts.iter().copied().max().unwrap_or(0).max(1);
    let triplets: Vec<_> = counts
        .iter()
        .enumerate()
        .flat_map(|(i, &c)| (0..c as u32).map(move |j| (i as u32, j, 1.0)))
        .collect();
    let nnz = triplets.len();
    CsrMatrix::from_triplets(counts.len(), n_cols, nnz, triplets).unwrap()
}

#[test]
fn test_power_law_rows() {
    // One heavy row followed by many light ones
    let mut counts = vec![64];
    counts.extend(std::iter::repeat(1).take(64));
    let m = matrix_from_row_counts(&counts);

    let plan = nnz_balanced_partition(&m, 4).unwrap();
    assert!(plan.covers(m.n_rows));
    assert_eq!(plan.blocks()[0], RowBlock { start: 0, end: 1 });

    // 128 nnz / 4 = 32 per block after the heavy row
    let loads = plan.block_loads(&m);
    assert_eq!(loads, vec![64, 32, 32, 0]);
}

#[test]
fn test_balanced_beats_static_on_skew() {
    let counts: Vec<usize> = (0..100).map(|i| if i < 10 { 50 } else { 1 }).collect();
    let m = matrix_from_row_counts(&counts);

    let balanced = nnz_balanced_partition(&m, 4).unwrap().summarize(&m);
    let fixed = static_partition(m.n_rows, 4).unwrap().summarize(&m);
    assert!(balanced.imbalance() < fixed.imbalance());
}

#[test]
fn test_empty_matrix() {
    let m = CsrMatrix::zeros(0, 0);
    let plan = nnz_balanced_partition(&m, 3).unwrap();
    assert_eq!(plan.len(), 3);
    assert!(plan.covers(0));
    assert!(plan.iter().all(|b| b.is_empty()));
}

proptest! {
    #[test]
    fn balanced_plan_covers_rows(
        counts in proptest::collection::vec(0usize..12, 0..60),
        workers in 1usize..16,
    ) {
        let m = matrix_from_row_counts(&counts);
        let plan = nnz_balanced_partition(&m, workers).unwrap();

        prop_assert_eq!(plan.len(), workers);
        prop_assert!(plan.covers(m.n_rows));
        prop_assert_eq!(plan.block_loads(&m).iter().sum::<usize>(), m.nnz());
    }

    #[test]
    fn static_plan_covers_rows(n_rows in 0usize..500, workers in 1usize..64) {
        let plan = static_partition(n_rows, workers).unwrap();

        prop_assert_eq!(plan.len(), workers);
        prop_assert!(plan.covers(n_rows));
        let lens: Vec<usize> = plan.iter().map(|b| b.len()).collect();
        let max = lens.iter().copied().max().unwrap();
        let min = lens.iter().copied().min().unwrap();
        prop_assert!(max - min <= 1);
    }

    #[test]
    fn closed_blocks_reach_target_without_overshooting_a_row(
        counts in proptest::collection::vec(0usize..12, 1..60),
        workers in 2usize..10,
    ) {
        let m = matrix_from_row_counts(&counts);
        prop_assume!(m.nnz() >= workers);

        let target = m.nnz() / workers;
        let max_row = m.max_row_nnz();
        let plan = nnz_balanced_partition(&m, workers).unwrap();

        for block in &plan.blocks()[..workers - 1] {
            if block.end == m.n_rows {
                // Remainder block, or a block that rows ran out before
                continue;
            }
            let load = block.nnz(&m);
            prop_assert!(load >= target.max(1));
            prop_assert!(load < target + max_row);
            if max_row <= target {
                prop_assert!(load <= 2 * target);
            }
            // Closing happened on the first row that reached the target
            let before_last = load - m.row_nnz(block.end - 1);
            prop_assert!(before_last < target);
        }
    }
}
