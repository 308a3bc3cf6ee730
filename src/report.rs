use std::io::Write;

use anyhow::Result;
use ndarray::Array1;
use serde::Serialize;

use crate::pipeline::AnalysisSummary;
use crate::spectral::SolverKind;

/// What gets printed for one analysis run.
///
/// `condition_number` is a plain IEEE division of the first and last
/// eigenvalue, so a zero smallest eigenvalue yields `inf` (or `NaN` when
/// both are zero).
#[derive(Debug, Clone, Serialize)]
pub struct SpectrumReport {
    pub count: usize,
    pub condition_number: f64,
    pub eigenvalues: Vec<f64>,
    pub singular_values: Vec<f64>,
    pub solver: SolverKind,
    pub input_shape: (usize, usize),
    pub gram_millis: f64,
    pub solve_millis: f64,
}

impl SpectrumReport {
    pub fn from_summary(summary: &AnalysisSummary) -> Self {
        let eigenvalues: Vec<f64> = summary.decomposition.eigenvalues.iter().copied().collect();
        Self::from_eigenvalues(eigenvalues, summary.solver)
            .with_shape(summary.input_shape)
            .with_timings(
                summary.gram_duration.as_secs_f64() * 1_000.0,
                summary.solve_duration.as_secs_f64() * 1_000.0,
            )
    }

    /// `eigenvalues` must already be in descending order.
    pub fn from_eigenvalues(eigenvalues: Vec<f64>, solver: SolverKind) -> Self {
        let condition_number = match (eigenvalues.first(), eigenvalues.last()) {
            (Some(largest), Some(smallest)) => largest / smallest,
            _ => f64::NAN,
        };
        let singular_values = eigenvalues.iter().map(|v| v.max(0.0).sqrt()).collect();
        Self {
            count: eigenvalues.len(),
            condition_number,
            eigenvalues,
            singular_values,
            solver,
            input_shape: (0, 0),
            gram_millis: 0.0,
            solve_millis: 0.0,
        }
    }

    fn with_shape(mut self, shape: (usize, usize)) -> Self {
        self.input_shape = shape;
        self
    }

    fn with_timings(mut self, gram_millis: f64, solve_millis: f64) -> Self {
        self.gram_millis = gram_millis;
        self.solve_millis = solve_millis;
        self
    }

    /// Three lines: count, ratio, then the full eigenvalue array.
    pub fn write_text<W: Write>(&self, mut writer: W) -> Result<()> {
        let values = Array1::from(self.eigenvalues.clone());
        writeln!(writer, "{}", self.count)?;
        writeln!(writer, "{}", self.condition_number)?;
        // `#` disables ndarray's elision of long arrays.
        writeln!(writer, "{:#}", values)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn to_text(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_text(&mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
