pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod report;
pub mod spectral;
pub mod tomography;
pub mod verify;

pub use error::{AnalysisError, MatrixError};
pub use matrix::{InputMatrix, MatrixLoader, MatrixWriter, SparseColumns};
pub use pipeline::{AnalysisConfig, AnalysisSummary, SpectralAnalyzer};
pub use report::SpectrumReport;
pub use spectral::{EigenDecomposition, GramBuilder, GramPath, SolverKind};
pub use tomography::{RayPattern, TomographyConfig, TomographyGenerator};
pub use verify::{OrderingVerifier, ResidualVerifier, VerificationReport};
