use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Eigen-solver used on the Gram matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    #[default]
    Symmetric,
    PowerDeflation,
}

impl SolverKind {
    pub fn name(&self) -> &'static str {
        match self {
            SolverKind::Symmetric => "symmetric",
            SolverKind::PowerDeflation => "power-deflation",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "symmetric" | "eigh" => Ok(SolverKind::Symmetric),
            "power" | "power-deflation" => Ok(SolverKind::PowerDeflation),
            other => Err(anyhow!("Unknown solver {other:?} (expected symmetric or power)")),
        }
    }
}

/// Eigenvalues paired with eigenvectors stored as columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition {
    pub eigenvalues: DVector<f64>,
    pub eigenvectors: DMatrix<f64>,
}

impl EigenDecomposition {
    pub fn new(eigenvalues: DVector<f64>, eigenvectors: DMatrix<f64>) -> Self {
        debug_assert_eq!(eigenvalues.len(), eigenvectors.ncols());
        Self {
            eigenvalues,
            eigenvectors,
        }
    }

    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    /// Reorder eigenvalues from largest to smallest, moving eigenvector
    /// columns with them. Ties keep their current relative order.
    pub fn sort_descending(&mut self) {
        let order = descending_order(&self.eigenvalues);
        self.eigenvalues =
            DVector::from_iterator(order.len(), order.iter().map(|&i| self.eigenvalues[i]));
        self.eigenvectors = self.eigenvectors.select_columns(order.iter());
    }

    pub fn is_descending(&self) -> bool {
        self.eigenvalues
            .as_slice()
            .windows(2)
            .all(|pair| pair[0] >= pair[1])
    }

    pub fn eigenpair(&self, index: usize) -> Option<(f64, DVector<f64>)> {
        (index < self.len()).then(|| {
            (
                self.eigenvalues[index],
                self.eigenvectors.column(index).into_owned(),
            )
        })
    }
}

fn descending_order(values: &DVector<f64>) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| {
        values[b]
            .partial_cmp(&values[a])
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Dense symmetric eigen-solver backed by `nalgebra::SymmetricEigen`.
pub struct SymmetricSolver {
    max_iterations: usize,
}

impl SymmetricSolver {
    pub fn new(max_iterations: usize) -> Self {
        Self { max_iterations }
    }

    /// Eigen-decompose `gram`; values come back in solver order, unsorted.
    pub fn solve(&self, gram: DMatrix<f64>) -> Result<EigenDecomposition> {
        let (rows, cols) = gram.shape();
        if rows != cols || rows == 0 {
            return Err(AnalysisError::Dimension { rows, cols }.into());
        }
        if let Some(value) = gram.iter().find(|v| !v.is_finite()) {
            return Err(AnalysisError::SolverFailure {
                solver: SolverKind::Symmetric.name(),
                reason: format!("matrix contains non-finite entry {value}"),
            }
            .into());
        }
        let eigen = SymmetricEigen::try_new(gram, f64::EPSILON, self.max_iterations).ok_or_else(
            || AnalysisError::SolverFailure {
                solver: SolverKind::Symmetric.name(),
                reason: format!(
                    "no convergence within {} iterations on a {rows}x{cols} matrix",
                    self.max_iterations
                ),
            },
        )?;
        Ok(EigenDecomposition::new(eigen.eigenvalues, eigen.eigenvectors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_moves_eigenvectors_with_values() {
        let values = DVector::from_vec(vec![1.0, 3.0, 2.0]);
        let vectors = DMatrix::from_row_slice(
            2,
            3,
            &[
                10.0, 30.0, 20.0, //
                11.0, 31.0, 21.0,
            ],
        );
        let mut decomposition = EigenDecomposition::new(values, vectors);
        decomposition.sort_descending();
        assert_eq!(decomposition.eigenvalues.as_slice(), &[3.0, 2.0, 1.0]);
        assert_eq!(decomposition.eigenvectors.column(0).as_slice(), &[30.0, 31.0]);
        assert_eq!(decomposition.eigenvectors.column(2).as_slice(), &[10.0, 11.0]);
        assert!(decomposition.is_descending());
    }

    #[test]
    fn ties_keep_solver_order() {
        let values = DVector::from_vec(vec![2.0, 5.0, 2.0]);
        let vectors = DMatrix::from_row_slice(1, 3, &[0.0, 1.0, 2.0]);
        let mut decomposition = EigenDecomposition::new(values, vectors);
        decomposition.sort_descending();
        let order: Vec<f64> = decomposition.eigenvectors.row(0).iter().copied().collect();
        assert_eq!(order, vec![1.0, 0.0, 2.0]);
    }

    #[test]
    fn symmetric_solver_finds_known_spectrum() {
        let gram = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 2.0]);
        let mut decomposition = SymmetricSolver::new(1000).solve(gram.clone()).expect("solve");
        decomposition.sort_descending();
        assert!((decomposition.eigenvalues[0] - 3.0).abs() < 1e-12);
        assert!((decomposition.eigenvalues[1] - 1.0).abs() < 1e-12);
        for index in 0..2 {
            let (value, vector) = decomposition.eigenpair(index).expect("pair");
            let residual = (&gram * &vector - &vector * value).norm();
            assert!(residual < 1e-12);
        }
    }

    #[test]
    fn rejects_empty_and_rectangular_input() {
        let solver = SymmetricSolver::new(1000);
        for gram in [DMatrix::zeros(0, 0), DMatrix::zeros(2, 3)] {
            let err = solver.solve(gram).expect_err("should fail");
            assert!(matches!(
                err.downcast_ref::<AnalysisError>(),
                Some(AnalysisError::Dimension { .. })
            ));
        }
    }

    #[test]
    fn non_finite_input_is_a_solver_failure() {
        let gram = DMatrix::from_row_slice(2, 2, &[f64::NAN, 1.0, 1.0, 2.0]);
        let err = SymmetricSolver::new(50).solve(gram).expect_err("should fail");
        assert!(matches!(
            err.downcast_ref::<AnalysisError>(),
            Some(AnalysisError::SolverFailure { .. })
        ));
    }

    #[test]
    fn solver_names_parse() {
        assert_eq!(
            "power".parse::<SolverKind>().expect("parse"),
            SolverKind::PowerDeflation
        );
        assert_eq!(
            "Symmetric".parse::<SolverKind>().expect("parse"),
            SolverKind::Symmetric
        );
        assert!("lanczos".parse::<SolverKind>().is_err());
    }
}
