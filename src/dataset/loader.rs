//! Spreadsheet loading and schema validation.
//!
//! Reads the input file once, validates the required columns, and produces
//! the in-memory [`ScoreRecord`] table. Workbooks (`.xlsx`) go through
//! calamine; `.csv` files go through the csv crate with serde. The file is
//! opened, parsed fully, and released; nothing is kept open afterwards.

use crate::models::{ScoreRecord, REQUIRED_COLUMNS, SUBJECT_COLUMNS};
use calamine::{open_workbook, Data, DataType, Reader, Xlsx};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised while loading the input spreadsheet.
///
/// All variants are fatal: the dataset either loads completely or not at
/// all. Partitions that are merely too small for some statistic are not an
/// error here; the aggregator records those statistics as undefined.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("input file not found: {}", path.display())]
    MissingFile { path: std::path::PathBuf },

    #[error("unsupported input format: {} (expected .xlsx or .csv)", path.display())]
    UnsupportedFormat { path: std::path::PathBuf },

    #[error("sheet '{sheet}' not found in {}", path.display())]
    MissingSheet {
        sheet: String,
        path: std::path::PathBuf,
    },

    #[error("required column missing: {column}")]
    MissingColumn { column: String },

    #[error("row {row}: cannot parse column '{column}' as a number")]
    InvalidScore { row: usize, column: String },

    #[error("failed to read workbook: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Loads score records from an `.xlsx` workbook or a `.csv` file.
///
/// `sheet` names the worksheet to read from a workbook; it is ignored for
/// CSV input. Fails fast with the offending column name when a required
/// column is absent.
pub fn load_records(path: &Path, sheet: &str) -> Result<Vec<ScoreRecord>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let records = match extension.as_deref() {
        Some("xlsx") => load_xlsx(path, sheet)?,
        Some("csv") => load_csv(path)?,
        _ => {
            return Err(DatasetError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    debug!("Loaded {} score records from {}", records.len(), path.display());
    Ok(records)
}

/// Reads records from a workbook sheet.
fn load_xlsx(path: &Path, sheet: &str) -> Result<Vec<ScoreRecord>, DatasetError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    if !workbook.sheet_names().iter().any(|s| s == sheet) {
        return Err(DatasetError::MissingSheet {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
        });
    }

    let range = workbook.worksheet_range(sheet)?;
    let mut rows = range.rows();

    let header = rows.next().ok_or_else(|| DatasetError::MissingColumn {
        column: REQUIRED_COLUMNS[0].to_string(),
    })?;

    let columns = header_index(header)?;

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        // 1-indexed data row, past the header
        let row_number = i + 2;

        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let student_id = cell_text(row, columns["StudentID"]);
        let teaching_method = cell_text(row, columns["TeachingMethod"]);

        let mut scores = [0.0f64; 5];
        for (slot, column) in scores.iter_mut().zip(SUBJECT_COLUMNS) {
            *slot = row
                .get(columns[column])
                .and_then(|cell| cell.as_f64())
                .ok_or_else(|| DatasetError::InvalidScore {
                    row: row_number,
                    column: column.to_string(),
                })?;
        }

        records.push(ScoreRecord {
            student_id,
            teaching_method,
            english_score: scores[0],
            math_score: scores[1],
            chemistry_score: scores[2],
            physics_score: scores[3],
            biology_score: scores[4],
        });
    }

    Ok(records)
}

/// Maps header cells to column indices, verifying the required columns.
fn header_index(header: &[Data]) -> Result<HashMap<&'static str, usize>, DatasetError> {
    let names: Vec<String> = header
        .iter()
        .map(|cell| cell.as_string().unwrap_or_default().trim().to_string())
        .collect();

    let mut columns = HashMap::new();
    for required in REQUIRED_COLUMNS {
        match names.iter().position(|n| n == required) {
            Some(index) => {
                columns.insert(required, index);
            }
            None => {
                return Err(DatasetError::MissingColumn {
                    column: required.to_string(),
                })
            }
        }
    }

    Ok(columns)
}

/// Renders a cell as text, covering numeric student identifiers.
fn cell_text(row: &[Data], index: usize) -> String {
    match row.get(index) {
        Some(Data::Float(f)) if f.fract() == 0.0 => format!("{}", *f as i64),
        Some(cell) => cell.as_string().unwrap_or_default(),
        None => String::new(),
    }
}

/// Reads records from a CSV file with the same column schema.
fn load_csv(path: &Path) -> Result<Vec<ScoreRecord>, DatasetError> {
    let mut reader = csv::Reader::from_path(path)?;

    // Check the header up front so a missing column is reported by name
    // instead of as a generic deserialization failure on the first row.
    let headers = reader.headers()?.clone();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == required) {
            return Err(DatasetError::MissingColumn {
                column: required.to_string(),
            });
        }
    }

    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: ScoreRecord = result?;
        records.push(record);
    }

    Ok(records)
}
