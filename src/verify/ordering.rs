use std::fmt::Write;

use crate::spectral::EigenDecomposition;
use crate::verify::VerificationReport;

/// Checks that a sorted spectrum is non-increasing and non-negative up to
/// `tolerance · max(1, λ_max)`.
pub struct OrderingVerifier;

impl OrderingVerifier {
    pub fn verify(decomposition: &EigenDecomposition, tolerance: f64) -> VerificationReport {
        let mut explanation = String::new();
        let values = decomposition.eigenvalues.as_slice();
        if values.is_empty() {
            return VerificationReport::failed("Spectrum is empty");
        }

        let scale = values.iter().fold(1.0f64, |acc, v| acc.max(v.abs()));
        let floor = -tolerance * scale;
        let is_valid = decomposition.is_descending();

        if !is_valid {
            for (i, pair) in values.windows(2).enumerate() {
                if pair[0] < pair[1] || pair[0].is_nan() || pair[1].is_nan() {
                    let _ = writeln!(
                        explanation,
                        "i={}: {:e} < {:e}: order violated",
                        i, pair[0], pair[1]
                    );
                }
            }
        }
        let _ = writeln!(explanation, "Descending order: {}", is_valid);

        let negatives: Vec<(usize, f64)> = values
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| *v < floor)
            .collect();
        for (i, value) in &negatives {
            let _ = writeln!(explanation, "i={}: {:e} below floor {:e}", i, value, floor);
        }
        let _ = writeln!(explanation, "Non-negative: {}", negatives.is_empty());

        VerificationReport {
            is_valid: is_valid && negatives.is_empty(),
            explanation,
        }
    }
}
