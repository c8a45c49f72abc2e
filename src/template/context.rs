//! Data context: user data plus engine-reserved fields
//!
//! Templates look up dotted paths. A path is first resolved against the
//! user data; only when that fails is it tried against the reserved
//! layer, addressed with a `__` prefix (`{{__value}}`, `{{__split.name}}`,
//! `{{__index}}`, `{{__<sibling field>}}`).
//!
//! Contexts are copy-on-extend: every `with_*` call returns a new context
//! and leaves the receiver untouched, so sibling branches never observe
//! each other's reserved fields.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Prefix that routes a lookup to the reserved layer
pub const RESERVED_PREFIX: &str = "__";

/// Engine-owned fields injected during recursive evaluation
#[derive(Debug, Clone, Default)]
struct Reserved {
    /// Current split/iteration element
    split: Option<Value>,
    /// Resolved scalar predicate value
    value: Option<Value>,
    /// Position of the record in its source batch
    index: Option<Value>,
    /// Sibling fields copied from a predicate value mapping
    fields: IndexMap<String, Value>,
}

impl Reserved {
    fn set(&mut self, name: &str, value: Value) {
        match name {
            "split" => self.split = Some(value),
            "value" => self.value = Some(value),
            "index" => self.index = Some(value),
            _ => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }

    fn get(&self, name: &str) -> Option<&Value> {
        match name {
            "split" => self.split.as_ref(),
            "value" => self.value.as_ref(),
            "index" => self.index.as_ref(),
            _ => self.fields.get(name),
        }
    }
}

/// The structure templates are resolved against
#[derive(Debug, Clone, Default)]
pub struct DataContext {
    data: Arc<Value>,
    reserved: Reserved,
}

impl DataContext {
    /// Context over a user record
    pub fn new(data: Value) -> Self {
        Self {
            data: Arc::new(data),
            reserved: Reserved::default(),
        }
    }

    /// Context with no user data
    pub fn empty() -> Self {
        Self::new(Value::Object(Map::new()))
    }

    /// The user data layer
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Set the record position (consumes, for construction chains)
    pub fn with_index(mut self, index: usize) -> Self {
        self.reserved.set("index", Value::from(index));
        self
    }

    /// Extend with a resolved scalar value (`{{__value}}`)
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.reserved.set("value", Value::String(value.into()));
        next
    }

    /// Extend with the current split/iteration element (`{{__split}}`)
    pub fn with_split(&self, element: Value) -> Self {
        let mut next = self.clone();
        next.reserved.set("split", element);
        next
    }

    /// Extend with every field of a predicate value mapping (`{{__name}}`)
    pub fn with_fields(&self, fields: &Map<String, Value>) -> Self {
        let mut next = self.clone();
        for (name, value) in fields {
            next.reserved.set(name, value.clone());
        }
        next
    }

    /// Resolve a dotted path, user data first, then reserved fields.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if let Some(found) = navigate(&self.data, path) {
            return Some(found);
        }

        let reserved_path = path.strip_prefix(RESERVED_PREFIX)?;
        let (head, tail) = match reserved_path.split_once('.') {
            Some((head, tail)) => (head, Some(tail)),
            None => (reserved_path, None),
        };
        let root = self.reserved.get(head)?;
        match tail {
            Some(tail) => navigate(root, tail),
            None => Some(root),
        }
    }

    /// Resolve a path to its string form; missing or structured values
    /// render as the empty string.
    pub fn render(&self, path: &str) -> String {
        self.lookup(path).map(scalar_text).unwrap_or_default()
    }
}

/// Walk `path` (dot-separated) through nested mappings and sequences.
fn navigate<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// String form of a leaf value. Null and structured values are empty.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}
