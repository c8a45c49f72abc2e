//! Common test utilities for graphsmith integration tests
//!
//! Builds throwaway project directories (schema plus data files) and
//! inspects the graphs and export files a pipeline run produces.

pub mod fixture;

pub use fixture::{Fixture, FixtureError};

use graphsmith::{Graph, Iri, Literal, Term, Triple};

/// Objects of every `(subject, predicate, _)` triple, in graph order
pub fn objects_of<'a>(graph: &'a Graph, subject: &str, predicate: &str) -> Vec<&'a Term> {
    graph
        .iter()
        .filter(|t| t.subject.as_str() == subject && t.predicate.as_str() == predicate)
        .map(|t| &t.object)
        .collect()
}

pub fn has_ref(graph: &Graph, subject: &str, predicate: &str, object: &str) -> bool {
    graph.contains(&Triple::new(Iri::new(subject), Iri::new(predicate), Iri::new(object)))
}

pub fn has_literal(graph: &Graph, subject: &str, predicate: &str, literal: Literal) -> bool {
    graph.contains(&Triple::new(Iri::new(subject), Iri::new(predicate), literal))
}
