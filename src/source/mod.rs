//! Data acquisition
//!
//! Reads the records a schema's `sources` point at: CSV, JSON and YAML,
//! from local files or `http(s)` endpoints, optionally left-joined with
//! further sources. A source that cannot be read yields `None`, which
//! callers treat as nothing to map.

mod join;
mod reader;
mod remote;

pub use join::left_join;
pub use reader::{parse_records, read_records, RecordFormat};
pub use remote::{fetch_text, is_remote};

use crate::schema::{nullable, optional_scalar};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// One input row: column/field name → value
pub type Record = Map<String, Value>;

/// Errors from reading a single source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("HTTP error fetching {url}: {source}")]
    Remote {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} does not contain records")]
    NotRecords(String),
}

/// Where records come from
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DataSource {
    /// File path, relative to the schema directory
    #[serde(default, deserialize_with = "optional_scalar")]
    pub source: Option<String>,
    /// `csv`, `json`, `yaml` or `yml`
    #[serde(default, deserialize_with = "optional_scalar")]
    pub format: Option<String>,
    /// Left joins, applied in order
    #[serde(default, deserialize_with = "join_list")]
    pub join: Vec<Join>,
}

/// A source joined onto the records of its parent
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Join {
    #[serde(flatten)]
    pub source: DataSource,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub left_on: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub right_on: Option<String>,
}

/// A `sources` entry: a data source plus the objects mapped per record
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceSpec {
    #[serde(flatten)]
    pub source: DataSource,
    #[serde(default, rename = "object", deserialize_with = "object_list")]
    pub objects: Vec<Value>,
}

impl SourceSpec {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

fn join_list<'de, D>(deserializer: D) -> Result<Vec<Join>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => vec![other],
    };
    items
        .into_iter()
        .filter(|item| !item.is_null())
        .map(|item| serde_json::from_value(item).map_err(de::Error::custom))
        .collect()
}

fn object_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let objects: Vec<Value> = match nullable::<_, Value>(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    };
    if objects.iter().any(|o| !o.is_object()) {
        return Err(de::Error::custom("object must be a mapping or a list of mappings"));
    }
    Ok(objects)
}

/// Reads records relative to a base directory
#[derive(Debug, Clone)]
pub struct Sourcer {
    base_dir: PathBuf,
}

impl Sourcer {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Records for `source`, joins applied.
    ///
    /// Missing `source` or `format` gives an empty batch; a source that
    /// cannot be read gives `None`.
    pub fn get_data(&self, source: &DataSource) -> Option<Vec<Record>> {
        let (Some(location), Some(format)) = (source.source.as_deref(), source.format.as_deref())
        else {
            return Some(Vec::new());
        };
        if location.is_empty() || format.is_empty() {
            return Some(Vec::new());
        }

        let mut records = match self.read(location, format) {
            Ok(records) => records,
            Err(e) => {
                warn!(source = location, error = %e, "source acquisition failed");
                return None;
            }
        };
        debug!(source = location, records = records.len(), "source read");

        for join in &source.join {
            let (Some(left_on), Some(right_on)) = (join.left_on.as_deref(), join.right_on.as_deref())
            else {
                debug!(source = location, "join without left_on/right_on skipped");
                continue;
            };
            match self.get_data(&join.source) {
                Some(right) => records = left_join(records, &right, left_on, right_on),
                None => warn!(source = location, "joined source unavailable, join skipped"),
            }
        }
        Some(records)
    }

    fn read(&self, location: &str, format: &str) -> Result<Vec<Record>, SourceError> {
        if is_remote(location) {
            let format = RecordFormat::parse(format)?;
            let text = fetch_text(location)?;
            return parse_records(&text, format, location);
        }
        read_records(&self.base_dir.join(location), format)
    }
}
