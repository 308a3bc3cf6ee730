use std::fmt::Write;

use nalgebra::DMatrix;

use crate::spectral::EigenDecomposition;
use crate::verify::VerificationReport;

/// Checks Gram symmetry and `‖Gv − λv‖ ≤ tolerance · max(1, |λ_max|)` for every pair.
pub struct ResidualVerifier;

impl ResidualVerifier {
    pub fn verify(
        gram: &DMatrix<f64>,
        decomposition: &EigenDecomposition,
        tolerance: f64,
    ) -> VerificationReport {
        let mut explanation = String::new();
        if gram.nrows() != gram.ncols() || gram.nrows() != decomposition.eigenvectors.nrows() {
            return VerificationReport::failed(format!(
                "Gram matrix {}x{} does not match eigenvectors of length {}",
                gram.nrows(),
                gram.ncols(),
                decomposition.eigenvectors.nrows()
            ));
        }

        let scale = decomposition
            .eigenvalues
            .iter()
            .fold(1.0f64, |acc, v| acc.max(v.abs()));
        let bound = tolerance * scale;

        let asymmetry = (gram - gram.transpose()).amax();
        let symmetric = asymmetry <= bound;
        let _ = writeln!(
            explanation,
            "Symmetry: max |G - Gt| = {:e} <= {:e}: {}",
            asymmetry, bound, symmetric
        );

        let mut residuals_ok = true;
        for index in 0..decomposition.len() {
            let Some((lambda, vector)) = decomposition.eigenpair(index) else {
                continue;
            };
            let residual = (gram * &vector - &vector * lambda).norm();
            let satisfied = residual <= bound;
            if !satisfied {
                residuals_ok = false;
            }
            let _ = writeln!(
                explanation,
                "i={}: lambda={:.6e}, residual {:e} <= {:e}: {}",
                index, lambda, residual, bound, satisfied
            );
        }

        VerificationReport {
            is_valid: symmetric && residuals_ok,
            explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::SymmetricSolver;
    use nalgebra::DVector;

    #[test]
    fn exact_decomposition_passes() {
        let gram = DMatrix::from_row_slice(2, 2, &[9.0, 12.0, 12.0, 16.0]);
        let decomposition = SymmetricSolver::new(1000).solve(gram.clone()).expect("solve");
        let report = ResidualVerifier::verify(&gram, &decomposition, 1e-9);
        assert!(report.is_valid, "{}", report.explanation);
    }

    #[test]
    fn wrong_eigenvector_fails() {
        let gram = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 1.0]);
        let decomposition = EigenDecomposition::new(
            DVector::from_vec(vec![2.0]),
            DMatrix::from_column_slice(2, 1, &[0.0, 1.0]),
        );
        let report = ResidualVerifier::verify(&gram, &decomposition, 1e-9);
        assert!(!report.is_valid);
    }

    #[test]
    fn asymmetric_gram_fails() {
        let gram = DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.0, 1.0]);
        let decomposition = EigenDecomposition::new(
            DVector::from_vec(vec![1.0, 1.0]),
            DMatrix::identity(2, 2),
        );
        let report = ResidualVerifier::verify(&gram, &decomposition, 1e-9);
        assert!(!report.is_valid);
        assert!(report.explanation.contains("Symmetry"));
    }
}
