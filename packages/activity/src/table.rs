//! Reads the activity table into [`RawRow`]s.
//!
//! Supports comma-separated exports (`.csv`) and JSON arrays of row objects
//! (`.json`). Spreadsheet workbooks must be exported to one of these first.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use engagement_map_activity_models::{RawRow, RawValue};

use crate::ActivityError;

/// On-disk table format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    /// Infers the format from the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, ActivityError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(ActivityError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Reads every row of the table at `path`.
///
/// # Errors
///
/// Returns [`ActivityError`] if the file cannot be opened or is not a
/// well-formed table. Individual odd cells are not errors.
pub fn read_table(path: &Path) -> Result<Vec<RawRow>, ActivityError> {
    let format = TableFormat::from_path(path)?;
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let rows = match format {
        TableFormat::Csv => read_csv(reader)?,
        TableFormat::Json => read_json(reader)?,
    };

    log::info!("Read {} activity rows from {}", rows.len(), path.display());

    Ok(rows)
}

/// Parses CSV with a header row. Empty cells become [`RawValue::Missing`];
/// short rows are padded with missing cells.
///
/// # Errors
///
/// Returns [`ActivityError`] if the CSV is malformed or has no header row.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<RawRow>, ActivityError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(ActivityError::Table {
            message: "CSV file contains no header row".to_owned(),
        });
    }

    let mut rows = Vec::new();

    for result in reader.byte_records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Skipping unreadable CSV row: {e}");
                continue;
            }
        };
        let mut row = RawRow::new();

        for (i, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            let cell = record.get(i).map(String::from_utf8_lossy);
            let value = match cell {
                Some(cell) if !cell.trim().is_empty() => RawValue::Text(cell.into_owned()),
                _ => RawValue::Missing,
            };
            row.insert(header.clone(), value);
        }

        rows.push(row);
    }

    Ok(rows)
}

/// Parses a JSON array of objects. `null` becomes [`RawValue::Missing`],
/// numbers stay numeric, and any other scalar is kept as text.
///
/// # Errors
///
/// Returns [`ActivityError`] if the document is not a JSON array.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<RawRow>, ActivityError> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    rows_from_json(&value)
}

/// Converts an already-parsed JSON array of objects into rows. Array
/// elements that are not objects are skipped with a warning.
///
/// # Errors
///
/// Returns [`ActivityError::Table`] if `value` is not an array.
pub fn rows_from_json(value: &serde_json::Value) -> Result<Vec<RawRow>, ActivityError> {
    let items = value.as_array().ok_or_else(|| ActivityError::Table {
        message: "Expected a JSON array of row objects".to_owned(),
    })?;

    let mut rows = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let Some(obj) = item.as_object() else {
            log::warn!("Skipping JSON row {i}: not an object");
            continue;
        };

        let row = obj
            .iter()
            .map(|(key, v)| (key.trim().to_owned(), json_cell(v)))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn json_cell(value: &serde_json::Value) -> RawValue {
    match value {
        serde_json::Value::Null => RawValue::Missing,
        serde_json::Value::Number(n) => n.as_f64().map_or(RawValue::Missing, RawValue::Number),
        serde_json::Value::String(s) => RawValue::Text(s.clone()),
        other => RawValue::Text(other.to_string()),
    }
}
