use nalgebra::DMatrix;

use crate::error::MatrixError;

/// Dense `rows × cols` design matrix `D`.
///
/// Always holds at least one row and one column; the loader and the
/// sparse conversion are the only constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct InputMatrix {
    data: DMatrix<f64>,
}

impl InputMatrix {
    /// Build from row-major values. Rejects empty shapes and short buffers.
    pub fn from_row_slice(rows: usize, cols: usize, values: &[f64]) -> Result<Self, MatrixError> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::Empty);
        }
        if values.len() != rows * cols {
            return Err(MatrixError::Ragged {
                line: rows,
                expected: rows * cols,
                found: values.len(),
            });
        }
        Ok(Self {
            data: DMatrix::from_row_slice(rows, cols, values),
        })
    }

    pub fn from_matrix(data: DMatrix<f64>) -> Result<Self, MatrixError> {
        if data.is_empty() {
            return Err(MatrixError::Empty);
        }
        Ok(Self { data })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Number of entries different from zero.
    pub fn non_zero_count(&self) -> usize {
        self.data.iter().filter(|v| **v != 0.0).count()
    }

    /// Fraction of non-zero entries, in `[0, 1]`.
    pub fn density(&self) -> f64 {
        self.non_zero_count() as f64 / self.data.len() as f64
    }
}
