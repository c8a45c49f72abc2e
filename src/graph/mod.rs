//! RDF graph model: terms, triples and sinks

mod store;
mod term;
pub mod vocab;

#[cfg(test)]
mod tests;

pub use store::{Graph, TripleSink};
pub use term::{Iri, Literal, Term, Triple};
