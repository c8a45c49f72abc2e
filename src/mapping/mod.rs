//! Object mapper
//!
//! Walks a schema object against a data context and appends
//! `(subject, predicate, object)` triples to a [`TripleSink`]:
//!
//! - the object's identity comes from its `uri` template
//! - `as` templates become `rdf:type` triples
//! - every `predicates` entry is evaluated through its predicate map
//!   entry (`literal`, `ref`, `object`, `reverse_ref`, `reverse_object`)
//!
//! Evaluation never fails. Failed guards skip an object or predicate
//! value; pairs with a missing side are dropped.
//!
//! [`TripleSink`]: crate::graph::TripleSink

mod guard;
mod mapper;


pub use guard::passes;
pub use mapper::ObjectMapper;
