use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::matrix::model::InputMatrix;
use crate::matrix::sparse::SparseColumns;

/// Writes matrices back out in the whitespace format [`MatrixLoader`](crate::MatrixLoader) reads.
pub struct MatrixWriter;

impl MatrixWriter {
    pub fn write_dense<W: Write>(matrix: &InputMatrix, mut writer: W) -> Result<()> {
        for row in matrix.as_matrix().row_iter() {
            let line = row
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Sparse matrices are expanded row by row; absent entries print as `0`.
    pub fn write_sparse<W: Write>(matrix: &SparseColumns, mut writer: W) -> Result<()> {
        let mut rows = vec![vec![0.0f64; matrix.cols()]; matrix.rows()];
        for (col, entries) in matrix.columns().iter().enumerate() {
            for &(row, value) in entries {
                rows[row][col] = value;
            }
        }
        for row in rows {
            let line = row
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_text(matrix: &InputMatrix) -> Result<String> {
        let mut buffer = Vec::new();
        Self::write_dense(matrix, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn write_sparse_to_path(matrix: &SparseColumns, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("create matrix file {:?}", path))?;
        Self::write_sparse(matrix, BufWriter::new(file))
            .with_context(|| format!("write matrix file {:?}", path))
    }

    pub fn write_dense_to_path(matrix: &InputMatrix, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("create matrix file {:?}", path))?;
        Self::write_dense(matrix, BufWriter::new(file))
            .with_context(|| format!("write matrix file {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::MatrixLoader;

    #[test]
    fn text_reloads_to_same_matrix() {
        let matrix =
            InputMatrix::from_row_slice(2, 3, &[1.5, -2.0, 0.0, 1e-7, 3.0, 42.0]).expect("matrix");
        let text = MatrixWriter::to_text(&matrix).expect("write");
        assert_eq!(text.lines().count(), 2);
        let reloaded = MatrixLoader::from_text(&text).expect("reload");
        assert_eq!(reloaded, matrix);
    }

    #[test]
    fn sparse_output_fills_zeros() {
        let mut sparse = SparseColumns::new(2, 3);
        sparse.push(1, 1, 4.0);
        let mut buffer = Vec::new();
        MatrixWriter::write_sparse(&sparse, &mut buffer).expect("write");
        assert_eq!(String::from_utf8(buffer).expect("utf8"), "0 0 0\n0 4 0\n");
    }
}
