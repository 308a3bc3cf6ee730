use anyhow::Result;
use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::error::AnalysisError;
use crate::spectral::eigen::{EigenDecomposition, SolverKind};

const STEPS_PER_BLOCK: usize = 25;
const ACCEPT_RESIDUAL: f64 = 0.01;
/// Largest relative residual accepted once the residual stops changing.
pub const STAGNATION_RESIDUAL: f64 = 0.1;
/// A new eigenvalue more than `1 / GROWTH_LIMIT` times the previous one ends the search.
const GROWTH_LIMIT: f64 = 0.1;

/// Power iteration with deflation.
///
/// Eigenpairs are extracted largest first. Each candidate's residual
/// `‖Gv − λv‖² / λ²` is measured against the undeflated matrix. The search
/// stops early on rank-deficient input and may return fewer pairs than the
/// matrix order.
pub struct PowerDeflationSolver {
    max_blocks: usize,
    seed: u64,
}

impl PowerDeflationSolver {
    pub fn new(max_blocks: usize, seed: u64) -> Self {
        Self { max_blocks, seed }
    }

    pub fn solve(&self, gram: &DMatrix<f64>) -> Result<EigenDecomposition> {
        let (rows, cols) = gram.shape();
        if rows != cols || rows == 0 {
            return Err(AnalysisError::Dimension { rows, cols }.into());
        }

        let n = rows;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(self.seed);
        let mut deflated = gram.clone();
        let mut values: Vec<f64> = Vec::with_capacity(n);
        let mut vectors: Vec<DVector<f64>> = Vec::with_capacity(n);

        for index in 0..n {
            let start = DVector::from_fn(n, |_, _| rng.gen_range(0.0f64..1.0f64));
            let Some((lambda, vector)) = self.dominant_pair(&deflated, gram, start) else {
                debug!("Power search for eigenpair {index} did not converge, stopping");
                break;
            };
            match halt_reason(values.last().copied(), lambda) {
                Some(Halt::BelowEpsilon) => {
                    debug!("Eigenvalue {index} below machine epsilon ({lambda:e}), stopping");
                    break;
                }
                Some(Halt::Outgrew) => {
                    debug!("Eigenvalue {index} ({lambda:e}) outgrew its predecessor, stopping");
                    break;
                }
                None => {}
            }

            let outer = &vector * vector.transpose();
            deflated -= outer * lambda;
            values.push(lambda);
            vectors.push(vector);
        }

        if values.is_empty() {
            return Err(AnalysisError::SolverFailure {
                solver: SolverKind::PowerDeflation.name(),
                reason: "no eigenpair converged".to_string(),
            }
            .into());
        }

        Ok(EigenDecomposition::new(
            DVector::from_vec(values),
            DMatrix::from_columns(&vectors),
        ))
    }

    fn dominant_pair(
        &self,
        deflated: &DMatrix<f64>,
        undeflated: &DMatrix<f64>,
        start: DVector<f64>,
    ) -> Option<(f64, DVector<f64>)> {
        let mut vector = normalized(start)?;
        let mut previous_error = f64::MAX;

        for block in 0..self.max_blocks {
            for _ in 0..STEPS_PER_BLOCK {
                vector = normalized(deflated * &vector)?;
            }

            let image = undeflated * &vector;
            let lambda = vector.dot(&image);
            let error = (&image - &vector * lambda).norm_squared() / (lambda * lambda);
            trace!("block {block}: lambda {lambda:e}, relative residual² {error:e}");

            if error <= ACCEPT_RESIDUAL * ACCEPT_RESIDUAL {
                return Some((lambda, vector));
            }
            if (error - previous_error).abs() < f64::EPSILON {
                return (error <= STAGNATION_RESIDUAL * STAGNATION_RESIDUAL)
                    .then_some((lambda, vector));
            }
            previous_error = error;
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    BelowEpsilon,
    Outgrew,
}

/// Whether a converged `lambda` ends the collection given the last accepted eigenvalue.
fn halt_reason(previous: Option<f64>, lambda: f64) -> Option<Halt> {
    if lambda < f64::EPSILON {
        return Some(Halt::BelowEpsilon);
    }
    match previous {
        Some(previous) if previous / lambda < GROWTH_LIMIT => Some(Halt::Outgrew),
        _ => None,
    }
}

fn normalized(vector: DVector<f64>) -> Option<DVector<f64>> {
    let norm = vector.norm();
    if norm <= f64::EPSILON || !norm.is_finite() {
        return None;
    }
    Some(vector / norm)
}
