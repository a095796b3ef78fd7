// Matrix data structures and construction

pub mod config;
pub mod conversion;
pub mod csr;

pub use config::BenchConfig;
pub use conversion::{CooMatrix, Triplet};
pub use csr::CsrMatrix;
