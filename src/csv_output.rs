//! CSV output format for pairwise significance results
//!
//! Writes the per-metric results table with the columns
//! `System 1, System 2, t-statistic, p-value, Significant`. Floats use
//! Rust's shortest round-trip formatting so a written table parses back to
//! the exact same values.

use crate::significance::PairwiseResult;
use std::io::Read;
use thiserror::Error;

/// Header row of a pairwise results table
pub const RESULTS_HEADER: [&str; 5] =
    ["System 1", "System 2", "t-statistic", "p-value", "Significant"];

/// Errors for results table parsing
#[derive(Error, Debug)]
pub enum ResultsCsvError {
    #[error("results table is missing column {0:?}")]
    MissingColumn(String),

    #[error("row {row}: invalid {column} value {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// One parsed row of a results table
///
/// `significant` is `None` when the source table lacks the `Significant`
/// column; the digest warns about such tables instead of crashing.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub system_a: String,
    pub system_b: String,
    pub statistic: f64,
    pub pvalue: f64,
    pub significant: Option<bool>,
}

impl From<&PairwiseResult> for ResultRow {
    fn from(result: &PairwiseResult) -> Self {
        Self {
            system_a: result.system_a.clone(),
            system_b: result.system_b.clone(),
            statistic: result.statistic,
            pvalue: result.pvalue,
            significant: Some(result.significant),
        }
    }
}

/// A parsed results table
#[derive(Debug, Clone)]
pub struct ParsedResults {
    pub rows: Vec<ResultRow>,
    /// False when the `Significant` column was absent from the source
    pub has_significance: bool,
}

/// Escape CSV field (handle commas, quotes, newlines)
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Format one result as a CSV row
fn format_result(result: &PairwiseResult) -> String {
    let fields = [
        escape_field(&result.system_a),
        escape_field(&result.system_b),
        result.statistic.to_string(),
        result.pvalue.to_string(),
        result.significant.to_string(),
    ];
    fields.join(",")
}

/// Generate the results table as a CSV string
pub fn results_to_csv(results: &[PairwiseResult]) -> String {
    let mut output = String::new();

    output.push_str(&RESULTS_HEADER.join(","));
    output.push('\n');

    for result in results {
        output.push_str(&format_result(result));
        output.push('\n');
    }

    output
}

/// Parse a results table written by [`results_to_csv`]
///
/// The four identifying/statistic columns are required; a missing
/// `Significant` column is tolerated and reported via `has_significance`
/// so the digest can warn instead of crashing.
pub fn parse_results(text: &str) -> Result<ParsedResults, ResultsCsvError> {
    parse_results_reader(text.as_bytes())
}

fn parse_results_reader<R: Read>(reader: R) -> Result<ParsedResults, ResultsCsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &str| {
        position(name).ok_or_else(|| ResultsCsvError::MissingColumn(name.to_string()))
    };

    let system_a_at = required(RESULTS_HEADER[0])?;
    let system_b_at = required(RESULTS_HEADER[1])?;
    let statistic_at = required(RESULTS_HEADER[2])?;
    let pvalue_at = required(RESULTS_HEADER[3])?;
    let significant_at = position(RESULTS_HEADER[4]);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row = index + 2;

        let float_cell = |at: usize, column: &str| -> Result<f64, ResultsCsvError> {
            let cell = record.get(at).unwrap_or("");
            cell.parse().map_err(|_| ResultsCsvError::InvalidValue {
                row,
                column: column.to_string(),
                value: cell.to_string(),
            })
        };

        let significant = match significant_at {
            Some(at) => {
                let cell = record.get(at).unwrap_or("");
                match cell.to_ascii_lowercase().as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => {
                        return Err(ResultsCsvError::InvalidValue {
                            row,
                            column: RESULTS_HEADER[4].to_string(),
                            value: cell.to_string(),
                        })
                    }
                }
            }
            None => None,
        };

        rows.push(ResultRow {
            system_a: record.get(system_a_at).unwrap_or("").to_string(),
            system_b: record.get(system_b_at).unwrap_or("").to_string(),
            statistic: float_cell(statistic_at, RESULTS_HEADER[2])?,
            pvalue: float_cell(pvalue_at, RESULTS_HEADER[3])?,
            significant,
        });
    }

    Ok(ParsedResults {
        rows,
        has_significance: significant_at.is_some(),
    })
}
