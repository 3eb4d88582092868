//! Metric table loading and validation
//!
//! A metric table is a CSV file with one identifier column (`topic` or
//! `input_file`) followed by one column of scores per system. All systems
//! for a metric live in the same file, so the rows of every system column
//! are aligned by construction.

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Accepted identifier column names, tried in order
pub const IDENTIFIER_COLUMNS: [&str; 2] = ["topic", "input_file"];

/// Errors for metric table loading
#[derive(Error, Debug)]
pub enum TableError {
    #[error("metric table not found: {0}")]
    MissingInput(PathBuf),

    #[error("{path}: first column must be 'topic' or 'input_file', got {found:?}")]
    MissingIdentifier { path: PathBuf, found: String },

    #[error("{path}: non-numeric score {value:?} for item {item:?} in column {column:?}")]
    NonNumericCell {
        path: PathBuf,
        item: String,
        column: String,
        value: String,
    },

    #[error("{path}: duplicate item identifier {item:?}")]
    DuplicateItem { path: PathBuf, item: String },

    #[error("{path}: empty item identifier at row {row}")]
    EmptyItem { path: PathBuf, row: usize },

    #[error("{path}: table has no data rows")]
    EmptyTable { path: PathBuf },

    #[error("{path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, TableError>;

/// An item x system score matrix for one evaluation metric
///
/// Rows are items (topics or input files), columns are systems. Scores are
/// stored column-major: one `Vec<f64>` per system, all of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    id_column: String,
    items: Vec<String>,
    systems: Vec<String>,
    scores: Vec<Vec<f64>>,
}

impl MetricTable {
    /// Load a metric table from a CSV file
    ///
    /// The first header cell must be `topic` or `input_file`; every other
    /// header cell names a system. Duplicate and empty item identifiers are
    /// rejected, as are non-numeric score cells and ragged rows.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TableError::MissingInput(path.to_path_buf()));
        }
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|source| TableError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_csv_reader(reader, path)
    }

    /// Parse a metric table from CSV text, attributing errors to `origin`
    pub fn from_csv_str(text: &str, origin: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());
        Self::from_csv_reader(reader, origin)
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>, path: &Path) -> Result<Self> {
        let headers = reader
            .headers()
            .map_err(|source| TableError::Csv {
                path: path.to_path_buf(),
                source,
            })?
            .clone();

        let mut header_iter = headers.iter();
        let id_column = header_iter.next().unwrap_or("").to_string();
        if !IDENTIFIER_COLUMNS.contains(&id_column.as_str()) {
            return Err(TableError::MissingIdentifier {
                path: path.to_path_buf(),
                found: id_column,
            });
        }
        let systems: Vec<String> = header_iter.map(str::to_string).collect();

        let mut items: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut scores: Vec<Vec<f64>> = vec![Vec::new(); systems.len()];

        for (index, record) in reader.records().enumerate() {
            // The csv reader rejects ragged rows (UnequalLengths), so every
            // record here has exactly one cell per header.
            let record = record.map_err(|source| TableError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            let row = index + 2; // 1-based, counting the header line

            let item = record.get(0).unwrap_or("").to_string();
            if item.is_empty() {
                return Err(TableError::EmptyItem {
                    path: path.to_path_buf(),
                    row,
                });
            }
            if !seen.insert(item.clone()) {
                return Err(TableError::DuplicateItem {
                    path: path.to_path_buf(),
                    item,
                });
            }

            for (column, cell) in record.iter().skip(1).enumerate() {
                let value: f64 = cell.parse().map_err(|_| TableError::NonNumericCell {
                    path: path.to_path_buf(),
                    item: item.clone(),
                    column: systems[column].clone(),
                    value: cell.to_string(),
                })?;
                scores[column].push(value);
            }
            items.push(item);
        }

        if items.is_empty() {
            return Err(TableError::EmptyTable {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            id_column,
            items,
            systems,
            scores,
        })
    }

    /// Name of the identifier column (`topic` or `input_file`)
    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    /// Item identifiers in row order
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// System names in column order
    pub fn systems(&self) -> &[String] {
        &self.systems
    }

    /// Scores for one system, in item order
    pub fn scores(&self, system: usize) -> &[f64] {
        &self.scores[system]
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
