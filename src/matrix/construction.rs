use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;

use crate::error::MatrixError;
use crate::matrix::model::InputMatrix;

/// Reads whitespace-delimited numeric text into an [`InputMatrix`].
///
/// One non-blank line is one row. Blank lines are skipped wherever they
/// appear; the first row fixes the column count for the rest of the file.
#[derive(Debug, Default)]
pub struct MatrixLoader;

const IN_MEMORY: &str = "<text>";
const READER: &str = "<reader>";

impl MatrixLoader {
    /// Parse matrix text held in memory.
    pub fn from_text(text: &str) -> Result<InputMatrix> {
        Self::from_lines(text.lines().map(|line| Ok(line.to_string())), Path::new(IN_MEMORY))
    }

    /// Parse matrix text from any reader. Read failures are reported
    /// against the placeholder path `<reader>`.
    pub fn from_reader<R: Read>(reader: R) -> Result<InputMatrix> {
        Self::from_lines(BufReader::new(reader).lines(), Path::new(READER))
    }

    /// Open and parse a matrix file. The handle is dropped before returning.
    pub fn from_path(path: &Path) -> Result<InputMatrix> {
        let file = File::open(path).map_err(|source| MatrixError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let matrix = Self::from_lines(BufReader::new(file).lines(), path)
            .with_context(|| format!("parse matrix file {:?}", path))?;
        debug!(
            "Loaded {}x{} matrix from {:?}",
            matrix.rows(),
            matrix.cols(),
            path
        );
        Ok(matrix)
    }

    fn from_lines<I>(lines: I, origin: &Path) -> Result<InputMatrix>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let mut values = Vec::new();
        let mut cols = None;
        let mut rows = 0usize;

        for (index, line) in lines.into_iter().enumerate() {
            let line = line.map_err(|source| MatrixError::Io {
                path: origin.to_path_buf(),
                source,
            })?;
            let line_number = index + 1;
            let row = parse_row(&line, line_number)?;
            if row.is_empty() {
                continue;
            }
            match cols {
                None => cols = Some(row.len()),
                Some(expected) if expected != row.len() => {
                    return Err(MatrixError::Ragged {
                        line: line_number,
                        expected,
                        found: row.len(),
                    }
                    .into());
                }
                Some(_) => {}
            }
            values.extend(row);
            rows += 1;
        }

        let cols = cols.ok_or(MatrixError::Empty)?;
        Ok(InputMatrix::from_row_slice(rows, cols, &values)?)
    }
}

fn parse_row(line: &str, line_number: usize) -> Result<Vec<f64>, MatrixError> {
    line.split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f64>().map_err(|_| MatrixError::Parse {
                line: line_number,
                column: index + 1,
                token: token.to_string(),
            })
        })
        .collect()
}
