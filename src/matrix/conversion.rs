//! Conversion from a coordinate list to CSR
//!
//! The conversion is a counting sort over rows: sort the triples by
//! (row, column), count entries per row, turn the counts into row pointers
//! with an exclusive scan, then scatter each entry through a per-row cursor.
//! The cursors live in their own array so `row_ptr` is final as soon as the
//! scan completes.

use crate::error::{try_alloc, Result, SpmvError};
use crate::matrix::CsrMatrix;
use crate::utils::exclusive_scan;

/// A 0-based coordinate entry: (row, column, value)
pub type Triplet = (u32, u32, f32);

/// An unordered coordinate-list matrix together with its declared header
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix {
    /// Declared number of rows
    pub n_rows: usize,
    /// Declared number of columns
    pub n_cols: usize,
    /// Declared number of non-zeros
    pub declared_nnz: usize,
    /// 0-based entries in input order
    pub triplets: Vec<Triplet>,
}

impl CooMatrix {
    /// Builds a coordinate matrix whose declared nnz is the number of triplets
    pub fn new(n_rows: usize, n_cols: usize, triplets: Vec<Triplet>) -> Self {
        Self {
            n_rows,
            n_cols,
            declared_nnz: triplets.len(),
            triplets,
        }
    }

    /// Builds a coordinate matrix from 1-based triples, as stored in Matrix Market files
    ///
    /// Fails with a format error if any index is zero.
    pub fn from_one_based(
        n_rows: usize,
        n_cols: usize,
        triplets: impl IntoIterator<Item = (u32, u32, f32)>,
    ) -> Result<Self> {
        let triplets = triplets
            .into_iter()
            .map(|(r, c, v)| {
                if r == 0 || c == 0 {
                    Err(SpmvError::format(None, format!("index ({}, {}) is not 1-based", r, c)))
                } else {
                    Ok((r - 1, c - 1, v))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(n_rows, n_cols, triplets))
    }

    /// Converts into CSR, consuming the triplets
    pub fn into_csr(self) -> Result<CsrMatrix> {
        CsrMatrix::from_triplets(self.n_rows, self.n_cols, self.declared_nnz, self.triplets)
    }
}

impl CsrMatrix {
    /// Builds a CSR matrix from 0-based triplets in any order
    ///
    /// `declared_nnz` is the count announced by the source header; a
    /// different number of triplets is a format error, as is any index
    /// outside `n_rows × n_cols`. Duplicate coordinates are kept as separate
    /// adjacent entries in input order.
    pub fn from_triplets(
        n_rows: usize,
        n_cols: usize,
        declared_nnz: usize,
        mut triplets: Vec<Triplet>,
    ) -> Result<Self> {
        if triplets.len() != declared_nnz {
            return Err(SpmvError::format(
                None,
                format!(
                    "header declares {} non-zeros but {} entries were supplied",
                    declared_nnz,
                    triplets.len()
                ),
            ));
        }

        if let Some(&(r, c, _)) = triplets
            .iter()
            .find(|&&(r, c, _)| r as usize >= n_rows || c as usize >= n_cols)
        {
            return Err(SpmvError::format(
                None,
                format!("entry ({}, {}) outside {} × {} matrix", r, c, n_rows, n_cols),
            ));
        }

        // Stable, so duplicates keep their input order
        triplets.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut row_counts = try_alloc("row counts", n_rows, 0usize)?;
        for &(row, _, _) in &triplets {
            row_counts[row as usize] += 1;
        }

        let row_ptr = exclusive_scan(&row_counts);

        let nnz = triplets.len();
        let mut col_idx = try_alloc("column indices", nnz, 0u32)?;
        let mut values = try_alloc("values", nnz, 0.0f32)?;

        let mut cursor = row_ptr[..n_rows].to_vec();
        for (row, col, val) in triplets {
            let pos = &mut cursor[row as usize];
            col_idx[*pos] = col;
            values[*pos] = val;
            *pos += 1;
        }

        debug_assert!(cursor.iter().zip(&row_ptr[1..]).all(|(c, end)| c == end));

        Ok(CsrMatrix::new(n_rows, n_cols, row_ptr, col_idx, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unordered_triplets_to_csr() {
        // [1 2 0]
        // [0 3 0]
        // [4 0 5]
        let triplets = vec![
            (2, 2, 5.0),
            (0, 1, 2.0),
            (2, 0, 4.0),
            (1, 1, 3.0),
            (0, 0, 1.0),
        ];
        let csr = CsrMatrix::from_triplets(3, 3, 5, triplets).unwrap();

        assert_eq!(csr.row_ptr, vec![0, 2, 3, 5]);
        assert_eq!(csr.col_idx, vec![0, 1, 1, 0, 2]);
        assert_eq!(csr.values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_empty_rows_are_preserved() {
        let csr = CsrMatrix::from_triplets(4, 2, 2, vec![(3, 1, 1.0), (0, 0, 2.0)]).unwrap();
        assert_eq!(csr.row_ptr, vec![0, 1, 1, 1, 2]);
        assert_eq!(csr.row_nnz(1), 0);
    }

    #[test]
    fn test_duplicates_kept_in_input_order() {
        let csr =
            CsrMatrix::from_triplets(1, 2, 3, vec![(0, 1, 1.0), (0, 0, 2.0), (0, 1, 3.0)]).unwrap();
        assert_eq!(csr.col_idx, vec![0, 1, 1]);
        assert_eq!(csr.values, vec![2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_count_mismatch_is_format_error() {
        let err = CsrMatrix::from_triplets(2, 2, 3, vec![(0, 0, 1.0)]).unwrap_err();
        assert!(matches!(err, SpmvError::Format { line: None, .. }));
    }

    #[test]
    fn test_out_of_range_is_format_error() {
        let err = CsrMatrix::from_triplets(2, 2, 1, vec![(2, 0, 1.0)]).unwrap_err();
        assert!(matches!(err, SpmvError::Format { line: None, .. }));
    }

    #[test]
    fn test_one_based_normalization() {
        let coo = CooMatrix::from_one_based(3, 3, vec![(1, 1, 1.0), (3, 3, 4.0)]).unwrap();
        assert_eq!(coo.triplets, vec![(0, 0, 1.0), (2, 2, 4.0)]);
        assert!(CooMatrix::from_one_based(3, 3, vec![(0, 1, 1.0)]).is_err());
    }

    #[test]
    fn test_empty_matrix() {
        let csr = CsrMatrix::from_triplets(0, 0, 0, Vec::new()).unwrap();
        assert_eq!(csr.row_ptr, vec![0]);
        assert_eq!(csr.nnz(), 0);
    }
}
