//! Typed views over schema fragments
//!
//! Schema trees stay generic (`serde_json::Value`) so they can be merged;
//! these structs are parsed from a fragment once its merges are applied.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// How a predicate value becomes a triple object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredicateKind {
    /// Literal built from the value
    #[default]
    Literal,
    /// IRI built from the `ref` template
    Ref,
    /// Nested object; its identity is the object
    Object,
    /// Like `Ref`, with subject and object swapped
    ReverseRef,
    /// Like `Object`, with subject and object swapped
    ReverseObject,
}

impl PredicateKind {
    pub fn is_reverse(self) -> bool {
        matches!(self, PredicateKind::ReverseRef | PredicateKind::ReverseObject)
    }
}

/// A declarative node description
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaObject {
    /// Identity template
    #[serde(default, deserialize_with = "optional_scalar")]
    pub uri: Option<String>,
    /// Type-assertion templates
    #[serde(default, rename = "as", deserialize_with = "one_or_many")]
    pub types: Vec<String>,
    /// Guard templates; all must pass
    #[serde(default, rename = "if", deserialize_with = "one_or_many")]
    pub conditions: Vec<String>,
    /// Names of object templates merged underneath this object
    #[serde(default, rename = "template", deserialize_with = "one_or_many")]
    pub templates: Vec<String>,
    /// Predicate name → scalar, list or override mapping
    #[serde(default, deserialize_with = "nullable")]
    pub predicates: Map<String, Value>,
}

impl SchemaObject {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// A rule turning a data value into triples for one predicate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredicateEntry {
    #[serde(default, rename = "type", deserialize_with = "nullable")]
    pub kind: PredicateKind,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub value: Option<String>,
    #[serde(default, rename = "ref", deserialize_with = "optional_scalar")]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub default_value: Option<String>,
    /// Nested object schema for `object` / `reverse_object`
    #[serde(default)]
    pub object: Option<Value>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub datatype: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub default_prefix: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub split_on: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub split_by: Option<String>,
    #[serde(default, deserialize_with = "optional_scalar")]
    pub iterate_on_attribute: Option<String>,
    #[serde(default, rename = "if", deserialize_with = "one_or_many")]
    pub conditions: Vec<String>,
    /// Predicate identity templates; empty means "use the predicate name"
    #[serde(default, rename = "uri", deserialize_with = "one_or_many")]
    pub uris: Vec<String>,
}

impl PredicateEntry {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// Entry used when a predicate has no `predicates_map` declaration
    pub fn default_tree() -> Value {
        json!({"type": "literal", "default_value": "{{__value}}"})
    }

    /// The template producing the base value: `ref` for `Ref`, `value`
    /// otherwise, falling back to `default_value`.
    pub fn value_template(&self) -> Option<&str> {
        let primary = match self.kind {
            PredicateKind::Ref => self.reference.as_deref(),
            _ => self.value.as_deref(),
        };
        primary.or(self.default_value.as_deref())
    }

    /// `(split_on, split_by)` when both are set and non-empty
    pub fn split(&self) -> Option<(&str, &str)> {
        let on = self.split_on.as_deref().filter(|s| !s.is_empty())?;
        let by = self.split_by.as_deref().filter(|s| !s.is_empty())?;
        Some((on, by))
    }

    pub fn iterate_on(&self) -> Option<&str> {
        self.iterate_on_attribute.as_deref().filter(|s| !s.is_empty())
    }
}

/// Object template names referenced by a raw object fragment
pub fn template_refs(object: &Value) -> Vec<String> {
    object
        .get("template")
        .and_then(string_list)
        .unwrap_or_default()
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// `null` → `[]`, scalar → `[scalar]`, list of scalars → list
fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::Array(items) => items.iter().map(scalar_string).collect(),
        other => scalar_string(other).map(|s| vec![s]),
    }
}

pub(crate) fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    string_list(&value)
        .ok_or_else(|| de::Error::custom("expected a string or a list of strings"))
}

pub(crate) fn optional_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        other => scalar_string(&other)
            .map(Some)
            .ok_or_else(|| de::Error::custom("expected a string")),
    }
}

pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
