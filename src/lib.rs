//! # spmv-bench: Sparse Matrix–Vector Multiplication Benchmark
//!
//! Measures and validates three ways of computing `r = A·x` for a sparse
//! `f32` matrix stored in Compressed Sparse Row format.
//!
//! ## Overview
//!
//! 1. **Conversion**: an unordered coordinate list (as read from a Matrix
//!    Market file) is sorted by row and column and compacted into CSR with a
//!    counting pass, an exclusive scan and a cursor-driven scatter.
//!
//! 2. **Partitioning**: rows are split into one contiguous block per worker,
//!    either by row count (static) or greedily by non-zero count (balanced).
//!
//! 3. **Kernels**:
//!    - **serial**: one thread, the reference result
//!    - **static**: equal-row blocks on a fixed worker pool
//!    - **nnzbal**: nnz-balanced blocks on a fixed worker pool
//!
//! 4. **Harness**: one priming call, a fixed number of timed trials, each
//!    checked against the serial reference, reduced to the 90th percentile.
//!
//! ## Usage
//!
//! ```
//! use spmv_bench::{BenchConfig, BenchmarkHarness, CooMatrix, Strategy};
//!
//! let coo = CooMatrix::from_one_based(
//!     3, 3,
//!     vec![(1, 1, 1.0), (1, 2, 2.0), (2, 2, 3.0), (3, 3, 4.0)],
//! ).unwrap();
//! let matrix = coo.into_csr().unwrap();
//!
//! let config = BenchConfig::with_threads(2).trials(3);
//! let harness = BenchmarkHarness::new(&matrix, vec![1.0; 3], config).unwrap();
//! assert_eq!(harness.reference(), &[3.0, 3.0, 4.0]);
//!
//! let summary = harness.run(Strategy::NnzBalanced).unwrap();
//! assert_eq!(summary.strategy, "nnzbal");
//! ```

#[macro_use]
extern crate log;

pub mod bench;
pub mod constants;
pub mod error;
pub mod io;
pub mod matrix;
pub mod partition;
pub mod spmv;
pub mod utils;
pub mod vector;

// Re-export primary components
pub use bench::{compare_vectors, percentile, BenchmarkHarness, BenchmarkSample, BenchmarkSummary};
pub use error::{Result, SpmvError};
pub use io::MatrixMarketReader;
pub use matrix::{BenchConfig, CooMatrix, CsrMatrix, Triplet};
pub use partition::{nnz_balanced_partition, static_partition, PartitionPlan, PartitionSummary, RowBlock};
pub use spmv::{create_kernel, spmv_serial, SpmvKernel, Strategy, WorkerPool};
pub use utils::{from_sprs_csr, to_sprs_csr, SprsCsr};
pub use vector::generate_vector;

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
