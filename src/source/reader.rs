//! Record parsing for the supported formats, from files or fetched text

use super::{Record, SourceError};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Record formats a source may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    Csv,
    Json,
    Yaml,
}

impl RecordFormat {
    pub fn parse(format: &str) -> Result<Self, SourceError> {
        match format.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(RecordFormat::Csv),
            "json" => Ok(RecordFormat::Json),
            "yaml" | "yml" => Ok(RecordFormat::Yaml),
            other => Err(SourceError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Read every record in `path` according to `format`.
///
/// CSV cells are strings, empty cells null. JSON and YAML documents hold
/// either a list of mappings or a single mapping.
pub fn read_records(path: &Path, format: &str) -> Result<Vec<Record>, SourceError> {
    let format = RecordFormat::parse(format)?;
    let text = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(&text, format, &path.display().to_string())
}

/// Parse records from already-acquired text; `origin` names it in errors.
pub fn parse_records(text: &str, format: RecordFormat, origin: &str) -> Result<Vec<Record>, SourceError> {
    match format {
        RecordFormat::Csv => parse_csv(text),
        RecordFormat::Json => into_records(serde_json::from_str(text)?, origin),
        RecordFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
            into_records(serde_json::to_value(yaml)?, origin)
        }
    }
}

fn parse_csv(text: &str) -> Result<Vec<Record>, SourceError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(column, cell)| {
                let value = if cell.is_empty() {
                    Value::Null
                } else {
                    Value::String(cell.to_string())
                };
                (column.to_string(), value)
            })
            .collect();
        records.push(record);
    }
    Ok(records)
}

fn into_records(document: Value, origin: &str) -> Result<Vec<Record>, SourceError> {
    match document {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                _ => Err(SourceError::NotRecords(origin.to_string())),
            })
            .collect(),
        Value::Object(record) => Ok(vec![record]),
        Value::Null => Ok(Vec::new()),
        _ => Err(SourceError::NotRecords(origin.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn csv_cells_are_strings_and_blanks_null() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.csv", "id,score,note\n007,1.50,\n");
        let records = read_records(&path, "csv").unwrap();
        assert_eq!(records[0]["id"], "007");
        assert_eq!(records[0]["score"], "1.50");
        assert_eq!(records[0]["note"], Value::Null);
    }

    #[test]
    fn csv_keeps_column_order() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.csv", "z,a,m\n1,2,3\n");
        let records = read_records(&path, "CSV").unwrap();
        let columns: Vec<_> = records[0].keys().cloned().collect();
        assert_eq!(columns, vec!["z", "a", "m"]);
    }

    #[test]
    fn json_list_and_single_mapping() {
        let dir = TempDir::new().unwrap();
        let list = write(&dir, "l.json", r#"[{"a": 1}, {"a": {"nested": true}}]"#);
        let single = write(&dir, "s.json", r#"{"a": 1}"#);
        assert_eq!(read_records(&list, "json").unwrap().len(), 2);
        assert_eq!(read_records(&single, "json").unwrap().len(), 1);
    }

    #[test]
    fn yaml_documents() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "d.yml", "- name: Ada\n  tags: [math, code]\n- name: Alan\n");
        let records = read_records(&path, "yml").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["tags"][1], "code");
    }

    #[test]
    fn scalar_document_is_not_records() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "x.json", "42");
        assert!(matches!(read_records(&path, "json"), Err(SourceError::NotRecords(_))));
    }

    #[test]
    fn unsupported_format() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "x.xlsx", "");
        assert!(matches!(
            read_records(&path, "xlsx"),
            Err(SourceError::UnsupportedFormat(f)) if f == "xlsx"
        ));
    }

    #[test]
    fn fetched_text_parses_like_a_file() {
        let records = parse_records("id,name\n1,Ada\n", RecordFormat::Csv, "inline").unwrap();
        assert_eq!(records[0]["name"], "Ada");
        assert!(matches!(
            parse_records("\"x\"", RecordFormat::Yaml, "inline"),
            Err(SourceError::NotRecords(origin)) if origin == "inline"
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_records(&dir.path().join("none.json"), "json"),
            Err(SourceError::Io { .. })
        ));
    }
}
