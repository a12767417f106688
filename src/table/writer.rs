//! CSV output writer for fetched transactions.

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::ledger::TransactionRecord;
use crate::table::{TableError, TableResult};

/// Write `record.asset.data.content` to `path` as CSV.
///
/// The header is the key list of the first row; every line holds one row's
/// values in header order. Lines are joined with `\n` without a trailing
/// newline and any existing file is overwritten. Nothing is written when the
/// content is missing, malformed or empty. Returns the number of rows written.
pub fn write_table(record: &TransactionRecord, path: &Path) -> TableResult<usize> {
    let content = record.content().ok_or_else(|| {
        TableError::Structural("asset.data.content is not an array".to_string())
    })?;

    let first = match content.first() {
        Some(Value::Object(first)) => first,
        Some(_) => return Err(TableError::Structural("row 0 is not an object".to_string())),
        None => return Err(TableError::EmptyContent),
    };
    let header: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut lines = Vec::with_capacity(content.len());
    for (index, row) in content.iter().enumerate() {
        let fields = row
            .as_object()
            .ok_or_else(|| TableError::Structural(format!("row {} is not an object", index)))?;

        if fields.len() != header.len() {
            return Err(TableError::Structural(format!(
                "row {} has {} columns, header has {}",
                index,
                fields.len(),
                header.len()
            )));
        }

        let mut line = Vec::with_capacity(header.len());
        for column in &header {
            let value = fields.get(*column).ok_or_else(|| {
                TableError::Structural(format!("row {} is missing column '{}'", index, column))
            })?;
            line.push(render_value(value).ok_or_else(|| {
                TableError::Structural(format!(
                    "row {} column '{}' is not a scalar value",
                    index, column
                ))
            })?);
        }
        lines.push(line);
    }

    let encoded = encode(&header, &lines)?;
    fs::write(path, encoded).map_err(|source| TableError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), rows = lines.len(), "Data saved");
    Ok(lines.len())
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn encode(header: &[&str], lines: &[Vec<String>]) -> TableResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header).map_err(encode_error)?;
    for line in lines {
        writer.write_record(line).map_err(encode_error)?;
    }

    let mut buf = writer
        .into_inner()
        .map_err(|e| TableError::Structural(format!("CSV encoding failed: {}", e)))?;
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    Ok(buf)
}

fn encode_error(err: csv::Error) -> TableError {
    TableError::Structural(format!("CSV encoding failed: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(content: Value) -> TransactionRecord {
        TransactionRecord(json!({
            "id": "abc",
            "asset": {"data": {"type": "financial_data", "content": content}}
        }))
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let written = write_table(
            &record(json!([
                {"name": "Alice", "amount": "10"},
                {"name": "Bob", "amount": "20"}
            ])),
            &path,
        )
        .unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "name,amount\nAlice,10\nBob,20"
        );
    }

    #[test]
    fn test_header_follows_first_row_key_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_table(
            &record(json!([
                {"amount": "10", "name": "Alice"},
                {"name": "Bob", "amount": "20"}
            ])),
            &path,
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "amount,name\n10,Alice\n20,Bob"
        );
    }

    #[test]
    fn test_empty_content_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let result = write_table(&record(json!([])), &path);
        assert!(matches!(result, Err(TableError::EmptyContent)));
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_content_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let result = write_table(&TransactionRecord(json!({"asset": {"data": {}}})), &path);
        assert!(matches!(result, Err(TableError::Structural(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_existing_file_untouched_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "previous").unwrap();

        assert!(write_table(&record(json!([])), &path).is_err());
        assert!(write_table(&TransactionRecord(json!(null)), &path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn test_existing_file_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "stale contents that are longer than the new ones").unwrap();

        write_table(&record(json!([{"a": "1"}])), &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n1");
    }

    #[test]
    fn test_mismatched_rows_are_structural() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let result = write_table(
            &record(json!([{"name": "Alice", "amount": "10"}, {"name": "Bob", "memo": "x"}])),
            &path,
        );
        assert!(matches!(result, Err(TableError::Structural(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_values_with_delimiters_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_table(
            &record(json!([{"name": "Smith, Jane", "memo": "line1\nline2"}])),
            &path,
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "name,memo\n\"Smith, Jane\",\"line1\nline2\""
        );
    }

    #[test]
    fn test_scalar_values_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        write_table(
            &record(json!([{"amount": 10, "flag": true, "note": null}])),
            &path,
        )
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "amount,flag,note\n10,true,");
    }

    #[test]
    fn test_missing_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let result = write_table(&record(json!([{"a": "1"}])), &path);
        assert!(matches!(result, Err(TableError::Write { .. })));
    }
}
