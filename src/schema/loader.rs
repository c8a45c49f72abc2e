//! Schema loading: YAML files, `extends` chains and load-time validation

use super::merge::merge;
use super::types::{nullable, optional_scalar, PredicateEntry, SchemaObject};
use crate::export::ExportConfig;
use crate::source::SourceSpec;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while loading or validating a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error in {origin}: {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("YAML to JSON conversion failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("extends cycle through {}", .0.display())]
    ExtendsCycle(PathBuf),

    #[error("schema root in {0} must be a mapping")]
    NotAMapping(String),

    #[error("invalid {location}: {message}")]
    InvalidObject { location: String, message: String },
}

/// A fully merged mapping schema
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Schema {
    /// Default namespace for bare identifiers
    #[serde(default, deserialize_with = "optional_scalar")]
    pub namespace: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub prefixes: IndexMap<String, String>,
    /// Predicate name → predicate map entry
    #[serde(default, deserialize_with = "nullable")]
    pub predicates_map: Map<String, Value>,
    /// Template name → partial schema object
    #[serde(default, deserialize_with = "nullable")]
    pub object_templates: Map<String, Value>,
    /// Default identity → schema object, mapped once against an empty context
    #[serde(default, deserialize_with = "nullable")]
    pub individuals: Map<String, Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub sources: Vec<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub export: ExportConfig,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Schema {
    /// Load a schema file, resolving its `extends` chain.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let tree = load_tree(path, &mut Vec::new())?;
        let mut schema = Self::from_value(tree)?;
        schema.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        info!(path = %path.display(), "schema loaded");
        Ok(schema)
    }

    /// Parse a schema from YAML text. `extends` resolves against the
    /// current directory.
    pub fn from_yaml_str(text: &str) -> Result<Self, SchemaError> {
        let tree = parse_yaml(text, "<inline>")?;
        let tree = resolve_extends(tree, Path::new(""), &mut Vec::new())?;
        Self::from_value(tree)
    }

    /// Build from an already merged tree
    pub fn from_value(tree: Value) -> Result<Self, SchemaError> {
        Ok(serde_json::from_value(tree)?)
    }

    /// Directory sources and exports resolve against
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Source declarations; malformed ones are logged and skipped.
    pub fn source_specs(&self) -> Vec<SourceSpec> {
        self.sources
            .iter()
            .enumerate()
            .filter_map(|(i, raw)| match SourceSpec::from_value(raw) {
                Ok(spec) => Some(spec),
                Err(e) => {
                    warn!(index = i, error = %e, "skipping malformed source");
                    None
                }
            })
            .collect()
    }

    /// Parse every object and predicate entry into its typed view.
    ///
    /// Unknown predicate `type` strings and malformed fragments are
    /// errors; references to undeclared object templates only warn.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (name, entry) in &self.predicates_map {
            self.check_entry(&format!("predicates_map.{}", name), entry)?;
        }
        for (name, object) in &self.object_templates {
            self.check_object(&format!("object_templates.{}", name), object)?;
        }
        for (name, object) in &self.individuals {
            self.check_object(&format!("individuals.{}", name), object)?;
        }
        for (i, raw) in self.sources.iter().enumerate() {
            let location = format!("sources[{}]", i);
            let spec = SourceSpec::from_value(raw).map_err(|e| invalid(&location, e))?;
            for (j, object) in spec.objects.iter().enumerate() {
                self.check_object(&format!("{}.object[{}]", location, j), object)?;
            }
        }
        debug!(
            predicates = self.predicates_map.len(),
            templates = self.object_templates.len(),
            individuals = self.individuals.len(),
            sources = self.sources.len(),
            "schema validated"
        );
        Ok(())
    }

    fn check_object(&self, location: &str, object: &Value) -> Result<(), SchemaError> {
        let parsed = SchemaObject::from_value(object).map_err(|e| invalid(location, e))?;
        for name in &parsed.templates {
            if !self.object_templates.contains_key(name) {
                warn!(location, template = %name, "unknown object template");
            }
        }
        for (key, value) in &parsed.predicates {
            let location = format!("{}.predicates.{}", location, key);
            let items = match value {
                Value::Array(items) => items.iter().collect(),
                other => vec![other],
            };
            for item in items {
                if item.is_object() {
                    self.check_entry(&location, item)?;
                }
            }
        }
        Ok(())
    }

    fn check_entry(&self, location: &str, entry: &Value) -> Result<(), SchemaError> {
        let parsed = PredicateEntry::from_value(entry).map_err(|e| invalid(location, e))?;
        if let Some(object) = &parsed.object {
            self.check_object(&format!("{}.object", location), object)?;
        }
        Ok(())
    }
}

fn invalid(location: &str, error: impl std::fmt::Display) -> SchemaError {
    SchemaError::InvalidObject {
        location: location.to_string(),
        message: error.to_string(),
    }
}

/// Read one file and everything it extends, merged base-first.
fn load_tree(path: &Path, chain: &mut Vec<PathBuf>) -> Result<Value, SchemaError> {
    if !path.exists() {
        return Err(SchemaError::NotFound(path.to_path_buf()));
    }
    let canonical = path.canonicalize().map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if chain.contains(&canonical) {
        return Err(SchemaError::ExtendsCycle(path.to_path_buf()));
    }

    let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tree = parse_yaml(&text, &path.display().to_string())?;

    chain.push(canonical);
    let dir = path.parent().unwrap_or(Path::new(""));
    let merged = resolve_extends(tree, dir, chain);
    chain.pop();
    merged
}

fn resolve_extends(
    mut tree: Value,
    dir: &Path,
    chain: &mut Vec<PathBuf>,
) -> Result<Value, SchemaError> {
    let extends = tree.as_object_mut().and_then(|map| map.remove("extends"));
    match extends {
        Some(Value::String(parent)) if !parent.trim().is_empty() => {
            debug!(extends = %parent, "resolving extended schema");
            let base = load_tree(&dir.join(parent.trim()), chain)?;
            Ok(merge(&base, &tree))
        }
        _ => Ok(tree),
    }
}

/// YAML text → JSON tree; an empty document is an empty mapping.
fn parse_yaml(text: &str, origin: &str) -> Result<Value, SchemaError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|source| SchemaError::Yaml {
            origin: origin.to_string(),
            source,
        })?;
    match serde_json::to_value(yaml)? {
        Value::Null => Ok(Value::Object(Map::new())),
        tree @ Value::Object(_) => Ok(tree),
        _ => Err(SchemaError::NotAMapping(origin.to_string())),
    }
}
