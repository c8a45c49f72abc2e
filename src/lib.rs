//! graphsmith: schema-driven RDF graph construction
//!
//! Turns tabular and hierarchical records into RDF triples, driven by a
//! declarative YAML schema describing object shapes, identity templates
//! and predicate mappings.
//!
//! # Core Concepts
//!
//! - **Templates**: `{{path}}` lookups, `{% uuid %}`-style tokens and
//!   chainable `$fn{{...}}` functions, resolved against a data context
//! - **Identities**: compact identifiers (`ex:Thing`) expanded against
//!   prefix bindings and a default namespace
//! - **Schema objects**: identity, `rdf:type`s, guards and predicates,
//!   mapped recursively by the [`ObjectMapper`]
//!
//! # Example
//!
//! ```
//! use graphsmith::{DataContext, Graph, ObjectMapper, Urifier};
//! use serde_json::json;
//!
//! let urifier = Urifier::new([("ex", "http://example.org/")], Some("http://example.org/"));
//! let mapper = ObjectMapper::new(urifier);
//!
//! let mut graph = Graph::new();
//! let schema = json!({"uri": "ex:person/{{id}}", "predicates": {"ex:name": "{{name}}"}});
//! let ctx = DataContext::new(json!({"id": 1, "name": "Ada"}));
//!
//! let identity = mapper.add_object(&schema, &ctx, &mut graph);
//! assert_eq!(identity.unwrap().as_str(), "http://example.org/person/1");
//! assert_eq!(graph.len(), 1);
//! ```

pub mod export;
pub mod graph;
pub mod mapping;
pub mod namespace;
pub mod pipeline;
pub mod schema;
pub mod source;
pub mod template;

pub use export::{ExportConfig, ExportError, RdfFormat};
pub use graph::{Graph, Iri, Literal, Term, Triple, TripleSink};
pub use mapping::ObjectMapper;
pub use namespace::Urifier;
pub use pipeline::{Pipeline, PipelineError, RunReport};
pub use schema::{PredicateEntry, PredicateKind, Schema, SchemaError, SchemaObject};
pub use source::{DataSource, Record, SourceError, Sourcer};
pub use template::DataContext;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
