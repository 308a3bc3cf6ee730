use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::matrix::{InputMatrix, SparseColumns, sparse_dot};

/// Which product was used to form `DᵗD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GramPath {
    Dense,
    Sparse,
}

/// Builds the Gram matrix `DᵗD`.
///
/// Only the lower triangle is computed; the upper one is mirrored from it,
/// so the result is symmetric bit for bit whichever path runs.
pub struct GramBuilder;

impl GramBuilder {
    /// Dense product unless the share of non-zeros is at most `sparse_density`.
    pub fn build(matrix: &InputMatrix, sparse_density: f64) -> (DMatrix<f64>, GramPath) {
        match Self::choose_path(matrix, sparse_density) {
            GramPath::Dense => (Self::dense(matrix), GramPath::Dense),
            GramPath::Sparse => (
                Self::from_sparse(&SparseColumns::from_dense(matrix)),
                GramPath::Sparse,
            ),
        }
    }

    pub fn choose_path(matrix: &InputMatrix, sparse_density: f64) -> GramPath {
        if matrix.density() <= sparse_density {
            GramPath::Sparse
        } else {
            GramPath::Dense
        }
    }

    pub fn dense(matrix: &InputMatrix) -> DMatrix<f64> {
        let data = matrix.as_matrix();
        let mut gram = data.tr_mul(data);
        gram.fill_upper_triangle_with_lower_triangle();
        gram
    }

    pub fn from_sparse(matrix: &SparseColumns) -> DMatrix<f64> {
        let n = matrix.cols();
        let lower: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let column_i = matrix.column(i);
                (0..=i)
                    .map(|j| sparse_dot(column_i, matrix.column(j)))
                    .collect()
            })
            .collect();

        let mut gram = DMatrix::zeros(n, n);
        for (i, row) in lower.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                gram[(i, j)] = *value;
                gram[(j, i)] = *value;
            }
        }
        gram
    }
}
