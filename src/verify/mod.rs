pub mod ordering;
pub mod residual;

pub use ordering::OrderingVerifier;
pub use residual::ResidualVerifier;

#[derive(Debug, Clone)]
pub struct VerificationReport {
    pub is_valid: bool,
    pub explanation: String,
}

impl VerificationReport {
    fn failed(explanation: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            explanation: explanation.into(),
        }
    }
}
