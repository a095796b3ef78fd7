//! Sequential SpMV, the reference every other strategy is checked against

use crate::error::{Result, SpmvError};
use crate::matrix::CsrMatrix;
use crate::spmv::{SpmvKernel, Strategy};

/// Checks that `x` and `r` have the lengths the matrix shape requires
pub(crate) fn check_dimensions(matrix: &CsrMatrix, x: &[f32], r: &[f32]) -> Result<()> {
    if x.len() != matrix.n_cols {
        return Err(SpmvError::DimensionMismatch {
            what: "input vector",
            expected: matrix.n_cols,
            actual: x.len(),
        });
    }
    if r.len() != matrix.n_rows {
        return Err(SpmvError::DimensionMismatch {
            what: "output vector",
            expected: matrix.n_rows,
            actual: r.len(),
        });
    }
    Ok(())
}

/// Computes `r = matrix · x` on the calling thread
pub fn spmv_serial(matrix: &CsrMatrix, x: &[f32], r: &mut [f32]) -> Result<()> {
    check_dimensions(matrix, x, r)?;

    for (i, out) in r.iter_mut().enumerate() {
        *out = matrix.row_dot(i, x);
    }

    Ok(())
}

/// Single pass over all rows, no concurrency
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialKernel;

impl SpmvKernel for SerialKernel {
    fn strategy(&self) -> Strategy {
        Strategy::Serial
    }

    fn multiply(&self, matrix: &CsrMatrix, x: &[f32], r: &mut [f32]) -> Result<()> {
        spmv_serial(matrix, x, r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_spmv() {
        // [1 2 0]
        // [0 3 0]
        // [0 0 4]
        let m = CsrMatrix::new(
            3, 3,
            vec![0, 2, 3, 4],
            vec![0, 1, 1, 2],
            vec![1.0, 2.0, 3.0, 4.0],
        );
        let mut r = vec![0.0; 3];
        spmv_serial(&m, &[1.0, 1.0, 1.0], &mut r).unwrap();
        assert_eq!(r, vec![3.0, 3.0, 4.0]);
    }

    #[test]
    fn test_serial_overwrites_output() {
        let m = CsrMatrix::zeros(2, 2);
        let mut r = vec![9.0; 2];
        SerialKernel.multiply(&m, &[1.0, 1.0], &mut r).unwrap();
        assert_eq!(r, vec![0.0, 0.0]);
    }

    #[test]
    fn test_dimension_checks() {
        let m = CsrMatrix::identity(3);
        let mut r = vec![0.0; 3];
        assert!(matches!(
            spmv_serial(&m, &[1.0, 1.0], &mut r),
            Err(SpmvError::DimensionMismatch { what: "input vector", .. })
        ));
        let mut short = vec![0.0; 2];
        assert!(matches!(
            spmv_serial(&m, &[1.0; 3], &mut short),
            Err(SpmvError::DimensionMismatch { what: "output vector", .. })
        ));
    }
}
