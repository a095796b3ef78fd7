//! Utilities for converting between our CSR format and sprs

use crate::matrix::CsrMatrix;
use sprs::CsMatI;

/// sprs matrix with the same index widths as [`CsrMatrix`]
pub type SprsCsr = CsMatI<f32, u32, usize>;

/// Converts our CSR matrix to an sprs `CsMatI` in CSR storage
///
/// # Panics
///
/// sprs rejects rows with repeated column indices, so the matrix must not
/// contain duplicate coordinates.
pub fn to_sprs_csr(matrix: &CsrMatrix) -> SprsCsr {
    SprsCsr::new(
        (matrix.n_rows, matrix.n_cols),
        matrix.row_ptr.clone(),
        matrix.col_idx.clone(),
        matrix.values.clone(),
    )
}

/// Converts an sprs matrix to our CSR format, switching storage if needed
pub fn from_sprs_csr(matrix: SprsCsr) -> CsrMatrix {
    let matrix = if matrix.is_csr() {
        matrix
    } else {
        matrix.to_csr()
    };

    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    CsrMatrix::new(n_rows, n_cols, indptr, indices, data)
}
