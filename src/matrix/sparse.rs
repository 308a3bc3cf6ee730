use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::MatrixError;
use crate::matrix::model::InputMatrix;

/// One sparse column: `(row, value)` pairs sorted by row, no explicit zeros.
pub type SparseColumn = Vec<(usize, f64)>;

/// Column-major sparse design matrix.
///
/// Ray tomography matrices touch only a handful of cells per ray, so most
/// of `D` is zero and the Gram product is cheaper over sorted columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseColumns {
    rows: usize,
    columns: Vec<SparseColumn>,
}

impl SparseColumns {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            columns: vec![Vec::new(); cols],
        }
    }

    pub fn from_dense(matrix: &InputMatrix) -> Self {
        let dense = matrix.as_matrix();
        let columns = dense
            .column_iter()
            .map(|column| {
                column
                    .iter()
                    .enumerate()
                    .filter(|(_, value)| **value != 0.0)
                    .map(|(row, value)| (row, *value))
                    .collect()
            })
            .collect();
        Self {
            rows: dense.nrows(),
            columns,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> &[(usize, f64)] {
        &self.columns[index]
    }

    pub fn columns(&self) -> &[SparseColumn] {
        &self.columns
    }

    pub fn non_zero_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Append an entry to `col`. Rows must arrive in increasing order per
    /// column; zeros are dropped.
    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows, "row {row} outside {} rows", self.rows);
        debug_assert!(
            self.columns[col].last().is_none_or(|(last, _)| *last < row),
            "rows must be appended in increasing order"
        );
        if value != 0.0 {
            self.columns[col].push((row, value));
        }
    }

    pub fn to_dense(&self) -> Result<InputMatrix, MatrixError> {
        let mut dense = DMatrix::zeros(self.rows, self.columns.len());
        for (col, entries) in self.columns.iter().enumerate() {
            for &(row, value) in entries {
                dense[(row, col)] = value;
            }
        }
        InputMatrix::from_matrix(dense)
    }
}

/// Inner product of two sorted sparse columns by merging their row indices.
pub fn sparse_dot(left: &[(usize, f64)], right: &[(usize, f64)]) -> f64 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < left.len() && j < right.len() {
        let (row_l, value_l) = left[i];
        let (row_r, value_r) = right[j];
        if row_l == row_r {
            sum += value_l * value_r;
            i += 1;
            j += 1;
        } else if row_l < row_r {
            i += 1;
        } else {
            j += 1;
        }
    }
    sum
}
