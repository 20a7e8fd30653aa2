#![allow(clippy::result_large_err)]
//! Raw record files for the command line: CSV, a JSON array, or JSON Lines.

use crate::core::error::AppError;
use crate::core::types::ErrorCategory;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

/// Read every raw record from `path`.
///
/// A `.csv` file (any case) is read as a header row plus data rows. Otherwise
/// a file whose first non-whitespace byte is `[` is read as one JSON array,
/// and anything else as JSON Lines with blank lines skipped.
pub fn load_records(path: &Path) -> Result<Vec<JsonValue>, AppError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::new(
            ErrorCategory::IoError,
            format!("Failed to read records file {}: {}", path.display(), e),
        )
    })?;
    let parsed = if is_csv {
        parse_csv_records(content.as_bytes())
    } else {
        parse_records(&content)
    };
    let records = parsed.map_err(|mut error| {
        error.add_context("path", &path.display().to_string());
        error
    })?;
    tracing::debug!(path = %path.display(), count = records.len(), "records loaded");
    Ok(records)
}

pub fn parse_records(content: &str) -> Result<Vec<JsonValue>, AppError> {
    if content.trim_start().starts_with('[') {
        return match serde_json::from_str(content)? {
            JsonValue::Array(items) => Ok(items),
            _ => Err(AppError::new(
                ErrorCategory::SerializationError,
                "records file must contain a JSON array",
            )),
        };
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            serde_json::from_str(line).map_err(|e| {
                AppError::new(
                    ErrorCategory::SerializationError,
                    format!("invalid JSON on line {}: {}", number + 1, e),
                )
            })
        })
        .collect()
}

/// Read CSV rows as objects keyed by the header row.
///
/// Every value is text. Header cells lose a leading byte-order mark, a
/// repeated header `name` becomes `name__2`, `name__3` and so on, empty rows
/// are skipped, and short rows are padded with `""`. Cells past the last
/// header are dropped.
pub fn parse_csv_records<R: Read>(input: R) -> Result<Vec<JsonValue>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut rows = reader.records();

    let headers = match rows.next() {
        Some(row) => dedupe_headers(row.map_err(csv_error)?.iter()),
        None => return Ok(Vec::new()),
    };

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(csv_error)?;
        if row.iter().all(str::is_empty) && row.len() <= 1 {
            continue;
        }
        let mut record = Map::new();
        for (position, header) in headers.iter().enumerate() {
            let cell = row.get(position).unwrap_or("");
            record.insert(header.clone(), JsonValue::String(cell.to_string()));
        }
        if row.len() > headers.len() {
            tracing::debug!(
                line = ?row.position().map(|p| p.line()),
                extra = row.len() - headers.len(),
                "dropping cells past the last header"
            );
        }
        records.push(JsonValue::Object(record));
    }
    Ok(records)
}

fn dedupe_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .map(|header| {
            let header = header.trim_start_matches('\u{feff}').to_string();
            let count = seen.entry(header.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                header
            } else {
                format!("{}__{}", header, count)
            }
        })
        .collect()
}

fn csv_error(e: csv::Error) -> AppError {
    let message = match e.position() {
        Some(position) => format!("invalid CSV on line {}: {}", position.line(), e),
        None => format!("invalid CSV: {}", e),
    };
    let mut error = AppError::new(ErrorCategory::SerializationError, message);
    error.source = Some(anyhow::anyhow!(e));
    error
}
