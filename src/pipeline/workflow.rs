use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info};
use nalgebra::DMatrix;

use crate::matrix::{InputMatrix, SparseColumns};
use crate::spectral::{
    EigenDecomposition, GramBuilder, GramPath, PowerDeflationSolver, SolverKind, SymmetricSolver,
};

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub solver: SolverKind,
    /// Use the sparse Gram product when at most this share of `D` is non-zero.
    pub sparse_density: f64,
    /// QR sweeps for the symmetric solver, 25-step blocks for the power solver.
    pub max_iterations: usize,
    pub seed: u64,
    pub tolerance: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            solver: SolverKind::Symmetric,
            sparse_density: 0.1,
            max_iterations: 10_000,
            seed: 1000,
            tolerance: 1e-9,
        }
    }
}

/// Output of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub input_shape: (usize, usize),
    pub gram: DMatrix<f64>,
    pub gram_path: GramPath,
    pub decomposition: EigenDecomposition,
    pub solver: SolverKind,
    pub gram_duration: Duration,
    pub solve_duration: Duration,
}

/// Gram product, eigen-solve and descending sort, in that order.
pub struct SpectralAnalyzer {
    config: AnalysisConfig,
}

impl SpectralAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, matrix: &InputMatrix) -> Result<AnalysisSummary> {
        let gram_start = Instant::now();
        let (gram, gram_path) = GramBuilder::build(matrix, self.config.sparse_density);
        let gram_duration = gram_start.elapsed();
        debug!(
            "Gram matrix {}x{} via {:?} product (input density {:.3})",
            gram.nrows(),
            gram.ncols(),
            gram_path,
            matrix.density()
        );
        self.finish(matrix.shape(), gram, gram_path, gram_duration)
    }

    pub fn analyze_sparse(&self, matrix: &SparseColumns) -> Result<AnalysisSummary> {
        let gram_start = Instant::now();
        let gram = GramBuilder::from_sparse(matrix);
        let gram_duration = gram_start.elapsed();
        debug!(
            "Gram matrix {}x{} from {} sparse entries",
            gram.nrows(),
            gram.ncols(),
            matrix.non_zero_count()
        );
        self.finish(
            (matrix.rows(), matrix.cols()),
            gram,
            GramPath::Sparse,
            gram_duration,
        )
    }

    fn finish(
        &self,
        input_shape: (usize, usize),
        gram: DMatrix<f64>,
        gram_path: GramPath,
        gram_duration: Duration,
    ) -> Result<AnalysisSummary> {
        let solver = self.config.solver;
        let solve_start = Instant::now();
        let mut decomposition = match solver {
            SolverKind::Symmetric => {
                SymmetricSolver::new(self.config.max_iterations).solve(gram.clone())
            }
            SolverKind::PowerDeflation => {
                PowerDeflationSolver::new(self.config.max_iterations, self.config.seed)
                    .solve(&gram)
            }
        }
        .with_context(|| {
            format!(
                "eigen-decompose {}x{} Gram matrix",
                gram.nrows(),
                gram.ncols()
            )
        })?;
        decomposition.sort_descending();
        let solve_duration = solve_start.elapsed();

        info!(
            "Solved {}x{} input with {} solver: {} eigenvalues (gram {:?}, solve {:?})",
            input_shape.0,
            input_shape.1,
            solver,
            decomposition.len(),
            gram_duration,
            solve_duration
        );

        Ok(AnalysisSummary {
            input_shape,
            gram,
            gram_path,
            decomposition,
            solver,
            gram_duration,
            solve_duration,
        })
    }
}
