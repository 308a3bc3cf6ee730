pub mod workflow;

pub use workflow::{AnalysisConfig, AnalysisSummary, SpectralAnalyzer};
