//! Compressed Sparse Row (CSR) matrix format implementation

use std::fmt;

/// A sparse `f32` matrix in Compressed Sparse Row (CSR) format
///
/// The CSR format stores a sparse matrix using three arrays:
/// - row_ptr: Array of size n_rows + 1 containing indices into col_idx and values arrays
/// - col_idx: Array of size nnz containing 32-bit column indices of non-zero elements
/// - values: Array of size nnz containing the non-zero values
///
/// The matrix is built once from a coordinate list and never modified
/// afterwards; every SpMV strategy reads the same instance.
#[derive(Clone, PartialEq)]
pub struct CsrMatrix {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Row pointers (size: n_rows + 1)
    /// row_ptr[i] is the index in col_idx and values where row i starts
    /// row_ptr[n_rows] is equal to nnz
    pub row_ptr: Vec<usize>,

    /// Column indices (size: nnz)
    pub col_idx: Vec<u32>,

    /// Non-zero values (size: nnz)
    pub values: Vec<f32>,
}

impl CsrMatrix {
    /// Creates a new CSR matrix with the given dimensions and data
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - row_ptr.len() must be n_rows + 1
    /// - col_idx.len() must equal values.len()
    /// - row_ptr[n_rows] must equal col_idx.len()
    /// - row_ptr must be non-decreasing
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        row_ptr: Vec<usize>,
        col_idx: Vec<u32>,
        values: Vec<f32>,
    ) -> Self {
        assert_eq!(row_ptr.len(), n_rows + 1, "row_ptr.len() must be n_rows + 1");
        assert_eq!(col_idx.len(), values.len(), "col_idx.len() must equal values.len()");
        assert_eq!(row_ptr[0], 0, "row_ptr[0] must be 0");
        assert_eq!(
            row_ptr[n_rows], col_idx.len(),
            "row_ptr[n_rows] must equal col_idx.len()"
        );
        assert!(
            row_ptr.windows(2).all(|w| w[0] <= w[1]),
            "row_ptr must be non-decreasing"
        );

        for &col in &col_idx {
            assert!(
                (col as usize) < n_cols,
                "Column index {} out of bounds (n_cols = {})",
                col,
                n_cols
            );
        }

        Self {
            n_rows,
            n_cols,
            row_ptr,
            col_idx,
            values,
        }
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Number of stored entries in row i
    pub fn row_nnz(&self, i: usize) -> usize {
        self.row_ptr[i + 1] - self.row_ptr[i]
    }

    /// Largest number of stored entries in any single row
    pub fn max_row_nnz(&self) -> usize {
        self.row_ptr
            .windows(2)
            .map(|w| w[1] - w[0])
            .max()
            .unwrap_or(0)
    }

    /// Returns an iterator over the non-zero elements in row i
    ///
    /// Each item is a tuple (col_idx, value) representing a non-zero element
    pub fn row_iter(&self, i: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        assert!(i < self.n_rows, "Row index out of bounds");

        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        self.col_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&col, &val)| (col as usize, val))
    }

    /// Dot product of row i with the dense vector x
    ///
    /// Accumulates in ascending storage order with a single `f32` sum, the
    /// reduction every strategy shares.
    #[inline]
    pub fn row_dot(&self, i: usize, x: &[f32]) -> f32 {
        let start = self.row_ptr[i];
        let end = self.row_ptr[i + 1];

        let mut sum = 0.0f32;
        for (&col, &val) in self.col_idx[start..end].iter().zip(&self.values[start..end]) {
            sum += val * x[col as usize];
        }
        sum
    }

    /// Expands the matrix back into 0-based (row, col, value) triples in storage order
    pub fn to_triplets(&self) -> Vec<(u32, u32, f32)> {
        let mut triplets = Vec::with_capacity(self.nnz());
        for i in 0..self.n_rows {
            for (col, val) in self.row_iter(i) {
                triplets.push((i as u32, col as u32, val));
            }
        }
        triplets
    }

    /// Creates an empty matrix with the given dimensions
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            row_ptr: vec![0; n_rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates an identity matrix of the given size
    pub fn identity(n: usize) -> Self {
        Self {
            n_rows: n,
            n_cols: n,
            row_ptr: (0..=n).collect(),
            col_idx: (0..n as u32).collect(),
            values: vec![1.0; n],
        }
    }
}

impl fmt::Debug for CsrMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CsrMatrix {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        let max_rows_to_print = 5.min(self.n_rows);

        if max_rows_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for i in 0..max_rows_to_print {
                write!(f, "    row {}: ", i)?;
                let start = self.row_ptr[i];
                let end = self.row_ptr[i + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                    continue;
                }

                let shown = 5.min(end - start);
                for j in start..(start + shown) {
                    write!(f, "({}, {:?}) ", self.col_idx[j], self.values[j])?;
                }
                if end - start > shown {
                    write!(f, "... ({} more)", end - start - shown)?;
                }
                writeln!(f)?;
            }

            if self.n_rows > max_rows_to_print {
                writeln!(f, "    ... ({} more rows)", self.n_rows - max_rows_to_print)?;
            }
        }

        write!(f, "}}")
    }
}
