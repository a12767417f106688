//! CSV input reader.

use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use crate::table::{Row, TableError, TableResult};

/// Read a header-plus-rows CSV file into rows keyed by the header line.
///
/// Records are parsed one at a time; the full set is returned since it
/// becomes a single transaction payload.
pub fn read_table(path: &Path) -> TableResult<Vec<Row>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TableError::FileNotFound(path.to_path_buf()),
        _ => TableError::Read {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .clone();

    let mut seen = HashSet::with_capacity(headers.len());
    for name in headers.iter() {
        if !seen.insert(name) {
            return Err(TableError::Parse {
                path: path.to_path_buf(),
                line: 1,
                message: format!("duplicate column '{}'", name),
            });
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        rows.push(row);
    }

    tracing::debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "Table read"
    );

    Ok(rows)
}

fn csv_error(path: &Path, err: csv::Error) -> TableError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = err.to_string();

    match err.into_kind() {
        csv::ErrorKind::Io(source) => TableError::Read {
            path: path.to_path_buf(),
            source,
        },
        _ => TableError::Parse {
            path: path.to_path_buf(),
            line,
            message,
        },
    }
}
