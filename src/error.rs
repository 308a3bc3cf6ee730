use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while turning text into an [`InputMatrix`](crate::matrix::InputMatrix).
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("cannot read matrix file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}, column {column}: {token:?} is not a floating-point number")]
    Parse {
        line: usize,
        column: usize,
        token: String,
    },
    #[error("line {line}: expected {expected} values, found {found}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("matrix input contains no rows")]
    Empty,
}

/// Failures raised by the Gram product or the eigen-solvers.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("expected a non-empty square matrix, got {rows}x{cols}")]
    Dimension { rows: usize, cols: usize },
    #[error("{solver} solver failed: {reason}")]
    SolverFailure {
        solver: &'static str,
        reason: String,
    },
}
