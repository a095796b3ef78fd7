//! Matrix Market input and output
//!
//! Only the coordinate layout is read: `%` lines (the banner and comments)
//! are skipped, the first remaining line is `rows cols nnz`, and each of the
//! following `nnz` lines is `row col [value]` with 1-based indices. A missing
//! value (pattern matrices) reads as `1.0`. Indices are normalized to 0-based
//! on ingestion.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::constants::MAX_INITIAL_ENTRIES;
use crate::error::{try_with_capacity, Result, SpmvError};
use crate::matrix::{CooMatrix, CsrMatrix};

/// Matrix Market format reader/writer
pub struct MatrixMarketReader;

impl MatrixMarketReader {
    /// Reads the header and coordinate entries of a Matrix Market file
    pub fn read_coo<P: AsRef<Path>>(path: P) -> Result<CooMatrix> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SpmvError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(BufReader::new(file), path)
    }

    /// Reads a Matrix Market file straight into CSR
    pub fn read_csr<P: AsRef<Path>>(path: P) -> Result<CsrMatrix> {
        let coo = Self::read_coo(path)?;
        info!(
            "loaded {} x {} matrix with {} non-zeros",
            coo.n_rows, coo.n_cols, coo.declared_nnz
        );
        coo.into_csr()
    }

    /// Parses Matrix Market text from any buffered reader
    ///
    /// `source` is only used to label I/O errors.
    pub fn parse<R: BufRead>(reader: R, source: &Path) -> Result<CooMatrix> {
        let io_err = |e| SpmvError::Io {
            path: PathBuf::from(source),
            source: e,
        };

        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line));

        // Skip the banner and comments, then read the size line
        let mut header = None;
        for (line_no, line) in lines.by_ref() {
            let line = line.map_err(io_err)?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }
            header = Some((line_no, trimmed.to_string()));
            break;
        }

        let (header_line, header) =
            header.ok_or_else(|| SpmvError::format(None, "missing size line"))?;
        let fields: Vec<&str> = header.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(SpmvError::format(
                header_line,
                format!("expected `rows cols nnz`, found {:?}", header),
            ));
        }

        let parse_dim = |s: &str, what: &str| -> Result<usize> {
            let n: usize = s
                .parse()
                .map_err(|_| SpmvError::format(header_line, format!("invalid {}: {:?}", what, s)))?;
            if n > u32::MAX as usize {
                return Err(SpmvError::format(
                    header_line,
                    format!("{} {} exceeds 32-bit index range", what, n),
                ));
            }
            Ok(n)
        };
        let n_rows = parse_dim(fields[0], "number of rows")?;
        let n_cols = parse_dim(fields[1], "number of columns")?;
        let nnz: usize = fields[2].parse().map_err(|_| {
            SpmvError::format(header_line, format!("invalid number of non-zeros: {:?}", fields[2]))
        })?;

        if n_rows == 0 || n_cols == 0 {
            return Err(SpmvError::format(
                header_line,
                format!("matrix has no rows or no columns: {} x {}", n_rows, n_cols),
            ));
        }

        // The header count is untrusted until the entries are read
        let reserve = nnz
            .min(n_rows.saturating_mul(n_cols))
            .min(MAX_INITIAL_ENTRIES);
        let mut triplets = try_with_capacity("coordinate entries", reserve)?;

        for (line_no, line) in lines {
            let line = line.map_err(io_err)?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }

            if triplets.len() == nnz {
                return Err(SpmvError::format(
                    line_no,
                    format!("more entries than the {} declared", nnz),
                ));
            }

            let parts: Vec<&str> = trimmed.split_whitespace().collect();
            if parts.len() < 2 {
                return Err(SpmvError::format(line_no, "expected `row col [value]`"));
            }

            let row = parse_index(parts[0], n_rows, "row", line_no)?;
            let col = parse_index(parts[1], n_cols, "column", line_no)?;
            let val: f32 = match parts.get(2) {
                Some(v) => v
                    .parse()
                    .map_err(|_| SpmvError::format(line_no, format!("invalid value: {:?}", v)))?,
                None => 1.0,
            };

            triplets.push((row, col, val));
        }

        if triplets.len() != nnz {
            return Err(SpmvError::format(
                None,
                format!(
                    "header declares {} non-zeros but only {} entries were read",
                    nnz,
                    triplets.len()
                ),
            ));
        }

        Ok(CooMatrix {
            n_rows,
            n_cols,
            declared_nnz: nnz,
            triplets,
        })
    }

    /// Writes a matrix in Matrix Market coordinate format
    pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: &CsrMatrix) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source| SpmvError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(io_err)?;
        let mut out = BufWriter::new(file);

        writeln!(out, "%%MatrixMarket matrix coordinate real general").map_err(io_err)?;
        writeln!(out, "{} {} {}", matrix.n_rows, matrix.n_cols, matrix.nnz()).map_err(io_err)?;

        for i in 0..matrix.n_rows {
            for (col, val) in matrix.row_iter(i) {
                writeln!(out, "{} {} {}", i + 1, col + 1, val).map_err(io_err)?;
            }
        }

        out.flush().map_err(io_err)
    }
}

/// Parses a 1-based index and converts it to 0-based
fn parse_index(s: &str, bound: usize, what: &str, line: usize) -> Result<u32> {
    let idx: usize = s
        .parse()
        .map_err(|_| SpmvError::format(line, format!("invalid {} index: {:?}", what, s)))?;
    if idx == 0 || idx > bound {
        return Err(SpmvError::format(
            line,
            format!("{} index {} outside 1..={}", what, idx, bound),
        ));
    }
    Ok((idx - 1) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(text: &str) -> Result<CooMatrix> {
        MatrixMarketReader::parse(Cursor::new(text), Path::new("inline.mtx"))
    }

    #[test]
    fn test_parse_general() {
        let coo = parse(
            "%%MatrixMarket matrix coordinate real general\n\
             % comment\n\
             3 3 4\n\
             1 1 1.0\n\
             1 2 2.0\n\
             2 2 3.0\n\
             3 3 4.0\n",
        )
        .unwrap();

        assert_eq!((coo.n_rows, coo.n_cols, coo.declared_nnz), (3, 3, 4));
        assert_eq!(
            coo.triplets,
            vec![(0, 0, 1.0), (0, 1, 2.0), (1, 1, 3.0), (2, 2, 4.0)]
        );
    }

    #[test]
    fn test_pattern_entries_default_to_one() {
        let coo = parse("2 2 1\n2 1\n").unwrap();
        assert_eq!(coo.triplets, vec![(1, 0, 1.0)]);
    }

    #[test]
    fn test_too_few_entries() {
        let err = parse("2 2 3\n1 1 1.0\n2 2 1.0\n").unwrap_err();
        assert!(matches!(err, SpmvError::Format { .. }));
    }

    #[test]
    fn test_too_many_entries() {
        let err = parse("2 2 1\n1 1 1.0\n2 2 1.0\n").unwrap_err();
        assert!(matches!(err, SpmvError::Format { line: Some(3), .. }));
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(parse("3 3\n"), Err(SpmvError::Format { line: Some(1), .. })));
        assert!(matches!(parse("% only comments\n"), Err(SpmvError::Format { .. })));
        assert!(matches!(parse("a b c\n"), Err(SpmvError::Format { .. })));
    }

    #[test]
    fn test_empty_shape_rejected() {
        let err = parse("%%MatrixMarket matrix coordinate real general\n0 0 0\n").unwrap_err();
        assert!(matches!(err, SpmvError::Format { line: Some(2), .. }));
        assert!(matches!(parse("0 3 0\n"), Err(SpmvError::Format { line: Some(1), .. })));
        assert!(matches!(parse("3 0 0\n"), Err(SpmvError::Format { line: Some(1), .. })));
    }

    #[test]
    fn test_overdeclared_count_is_format_error() {
        let err = parse("2 2 99999999999999999\n1 1 1.0\n").unwrap_err();
        assert!(matches!(err, SpmvError::Format { line: None, .. }));

        let err = parse("100000 100000 1000000000\n1 1 1.0\n2 2 1.0\n").unwrap_err();
        assert!(matches!(err, SpmvError::Format { line: None, .. }));
    }

    #[test]
    fn test_index_out_of_range() {
        let err = parse("2 2 1\n3 1 1.0\n").unwrap_err();
        assert!(matches!(err, SpmvError::Format { line: Some(2), .. }));
        let err = parse("2 2 1\n0 1 1.0\n").unwrap_err();
        assert!(matches!(err, SpmvError::Format { line: Some(2), .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = MatrixMarketReader::read_coo("/nonexistent/matrix.mtx").unwrap_err();
        assert!(matches!(err, SpmvError::Io { .. }));
    }
}
