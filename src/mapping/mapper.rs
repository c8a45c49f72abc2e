//! ObjectMapper: recursive schema-object → triple evaluation

use super::guard;
use crate::graph::vocab::{rdf, xsd};
use crate::graph::{Iri, Literal, Term, Triple, TripleSink};
use crate::namespace::Urifier;
use crate::schema::{merge, template_refs, PredicateEntry, PredicateKind, Schema, SchemaObject};
use crate::template::{resolve, scalar_text, DataContext};
use serde_json::{Map, Value};
use std::borrow::Cow;
use tracing::{debug, trace, warn};

/// Interprets schema objects against data contexts and emits triples.
///
/// The mapper itself is immutable; all output goes to the sink passed in,
/// so one mapper can serve many records and many sinks.
#[derive(Debug, Clone, Default)]
pub struct ObjectMapper {
    urifier: Urifier,
    predicates_map: Map<String, Value>,
    object_templates: Map<String, Value>,
    max_depth: Option<usize>,
}

impl ObjectMapper {
    pub fn new(urifier: Urifier) -> Self {
        Self {
            urifier,
            ..Default::default()
        }
    }

    /// Mapper configured with a schema's predicate map and object templates
    pub fn from_schema(schema: &Schema, urifier: Urifier) -> Self {
        Self::new(urifier)
            .with_predicates_map(schema.predicates_map.clone())
            .with_object_templates(schema.object_templates.clone())
    }

    pub fn with_predicates_map(mut self, predicates_map: Map<String, Value>) -> Self {
        self.predicates_map = predicates_map;
        self
    }

    pub fn with_object_templates(mut self, object_templates: Map<String, Value>) -> Self {
        self.object_templates = object_templates;
        self
    }

    /// Stop descending past `max_depth` nested objects. Unbounded by default.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn urifier(&self) -> &Urifier {
        &self.urifier
    }

    /// Map one schema object; returns its identity, or `None` when its
    /// guard fails (nothing is emitted for it or its descendants).
    pub fn add_object(
        &self,
        object: &Value,
        ctx: &DataContext,
        sink: &mut dyn TripleSink,
    ) -> Option<Iri> {
        self.object_at(object, ctx, sink, 0)
    }

    /// Emit the triples for one `predicates` entry of `subject`.
    pub fn add_predicate(
        &self,
        name: &str,
        value: &Value,
        subject: &Iri,
        ctx: &DataContext,
        sink: &mut dyn TripleSink,
    ) {
        self.predicate_at(name, value, subject, ctx, sink, 0)
    }

    fn object_at(
        &self,
        object: &Value,
        ctx: &DataContext,
        sink: &mut dyn TripleSink,
        depth: usize,
    ) -> Option<Iri> {
        if let Some(max) = self.max_depth {
            if depth > max {
                warn!(depth, max, "object nesting exceeds max depth, skipped");
                return None;
            }
        }

        let merged = self.apply_templates(object);
        let schema = match SchemaObject::from_value(&merged) {
            Ok(schema) => schema,
            Err(e) => {
                warn!(error = %e, "invalid schema object skipped");
                return None;
            }
        };

        let identity = self.to_iri(schema.uri.as_deref().unwrap_or_default(), ctx);
        if !guard::passes(&schema.conditions, ctx) {
            debug!(%identity, "object guard failed");
            return None;
        }

        let rdf_type = Iri::new(rdf::TYPE);
        for type_template in &schema.types {
            let class = self.to_iri(type_template, ctx);
            sink.insert(Triple::new(identity.clone(), rdf_type.clone(), class));
        }

        for (name, value) in &schema.predicates {
            self.predicate_at(name, value, &identity, ctx, sink, depth);
        }

        Some(identity)
    }

    /// Templates merge in declaration order (later ones win among
    /// templates); the object itself wins over all of them.
    fn apply_templates<'a>(&self, object: &'a Value) -> Cow<'a, Value> {
        let names = template_refs(object);
        if names.is_empty() {
            return Cow::Borrowed(object);
        }

        let mut base: Option<Value> = None;
        for name in &names {
            match self.object_templates.get(name) {
                Some(template) => {
                    base = Some(match base {
                        Some(acc) => merge(&acc, template),
                        None => template.clone(),
                    });
                }
                None => debug!(template = %name, "unknown object template"),
            }
        }
        match base {
            Some(base) => Cow::Owned(merge(&base, object)),
            None => Cow::Borrowed(object),
        }
    }

    fn predicate_at(
        &self,
        name: &str,
        value: &Value,
        subject: &Iri,
        ctx: &DataContext,
        sink: &mut dyn TripleSink,
        depth: usize,
    ) {
        let items: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for predicate in name.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let entry = self.entry_for(predicate);
            for item in &items {
                self.predicate_value(predicate, &entry, item, subject, ctx, sink, depth);
            }
        }
    }

    /// Default entry with the global `predicates_map` declaration on top
    fn entry_for(&self, predicate: &str) -> Value {
        let default = PredicateEntry::default_tree();
        match self.predicates_map.get(predicate) {
            Some(global @ Value::Object(_)) => merge(&default, global),
            _ => default,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn predicate_value(
        &self,
        predicate: &str,
        entry: &Value,
        item: &Value,
        subject: &Iri,
        ctx: &DataContext,
        sink: &mut dyn TripleSink,
        depth: usize,
    ) {
        let (item_ctx, tree) = match item {
            Value::Object(fields) => (ctx.with_fields(fields), Cow::Owned(merge(entry, item))),
            Value::Null => (ctx.clone(), Cow::Borrowed(entry)),
            scalar => {
                let resolved = resolve(&scalar_text(scalar), ctx);
                (ctx.with_value(resolved), Cow::Borrowed(entry))
            }
        };

        let parsed = match PredicateEntry::from_value(&tree) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(predicate, error = %e, "invalid predicate entry skipped");
                return;
            }
        };

        let predicate_iris: Vec<Iri> = if parsed.uris.is_empty() {
            vec![self.to_iri(predicate, &item_ctx)]
        } else {
            parsed
                .uris
                .iter()
                .map(|uri| self.to_iri(uri, &item_ctx))
                .collect()
        };

        for (pair_subject, pair_object) in self.evaluate_entry(&parsed, subject, &item_ctx, sink, depth) {
            for predicate_iri in &predicate_iris {
                sink.insert(Triple::new(
                    pair_subject.clone(),
                    predicate_iri.clone(),
                    pair_object.clone(),
                ));
            }
        }
    }

    /// Turn one entry + context into `(subject, object)` pairs.
    fn evaluate_entry(
        &self,
        entry: &PredicateEntry,
        subject: &Iri,
        ctx: &DataContext,
        sink: &mut dyn TripleSink,
        depth: usize,
    ) -> Vec<(Iri, Term)> {
        let base = entry
            .value_template()
            .map(|template| resolve(template, ctx))
            .unwrap_or_default();

        let (values, split_mode) = if let Some(attribute) = entry.iterate_on() {
            let values = match ctx.lookup(attribute) {
                Some(Value::Array(items)) => items.clone(),
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![other.clone()],
            };
            (values, true)
        } else if let Some((split_on, split_by)) = entry.split() {
            let values = resolve(split_on, ctx)
                .split(split_by)
                .map(|part| Value::String(part.to_string()))
                .collect();
            (values, true)
        } else {
            (vec![Value::String(base)], false)
        };

        if !guard::passes(&entry.conditions, ctx) {
            trace!(%subject, "predicate guard failed");
            return Vec::new();
        }

        let mut pairs = Vec::with_capacity(values.len());
        for value in values {
            let element_ctx = if split_mode {
                Cow::Owned(ctx.with_split(value.clone()))
            } else {
                Cow::Borrowed(ctx)
            };

            let object: Option<Term> = match entry.kind {
                PredicateKind::Literal => self.literal(entry, &value).map(Term::from),
                PredicateKind::Ref | PredicateKind::ReverseRef => {
                    self.reference(entry, &value, &element_ctx).map(Term::from)
                }
                PredicateKind::Object | PredicateKind::ReverseObject => match &entry.object {
                    Some(schema) => self
                        .object_at(schema, &element_ctx, sink, depth + 1)
                        .map(Term::from),
                    None => {
                        warn!(%subject, "object predicate without an object schema");
                        None
                    }
                },
            };

            match (object, entry.kind.is_reverse()) {
                (Some(Term::Iri(object)), true) => pairs.push((object, Term::Iri(subject.clone()))),
                (Some(object), false) => pairs.push((subject.clone(), object)),
                _ => trace!(%subject, "incomplete pair dropped"),
            }
        }
        pairs
    }

    /// Language wins over datatype; an empty value gives no literal.
    fn literal(&self, entry: &PredicateEntry, value: &Value) -> Option<Literal> {
        let lexical = scalar_text(value);
        if lexical.is_empty() {
            return None;
        }

        let language = entry.language.as_deref().filter(|l| !l.is_empty());
        let datatype = entry.datatype.as_deref().filter(|d| !d.is_empty());
        Some(match (language, datatype) {
            (Some(language), _) => Literal::lang_string(lexical, language),
            (None, Some(datatype)) => Literal::typed(lexical, self.datatype_iri(datatype)),
            (None, None) => Literal::plain(lexical),
        })
    }

    /// Bare names are XSD datatypes; compact or absolute ones expand normally.
    fn datatype_iri(&self, datatype: &str) -> Iri {
        if datatype.contains(':') {
            self.urifier.to_iri(datatype)
        } else {
            Iri::from(format!("{}{}", xsd::NS, datatype))
        }
    }

    /// Only an absent (null) value gives no identity; an empty one still
    /// expands, like any compact identifier.
    fn reference(&self, entry: &PredicateEntry, value: &Value, ctx: &DataContext) -> Option<Iri> {
        if value.is_null() {
            return None;
        }
        let mut raw = scalar_text(value);
        if let Some(prefix) = entry.default_prefix.as_deref().filter(|p| !p.is_empty()) {
            if !raw.contains(':') {
                raw = format!("{}:{}", prefix, raw);
            }
        }
        Some(self.to_iri(&raw, ctx))
    }

    /// Template → compact identifier → IRI
    fn to_iri(&self, template: &str, ctx: &DataContext) -> Iri {
        self.urifier.to_iri(&resolve(template, ctx))
    }
}
