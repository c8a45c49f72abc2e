//! Triple sinks and the in-memory graph

use super::term::{Iri, Term, Triple};
use super::vocab;
use indexmap::{IndexMap, IndexSet};

/// Destination for triples produced by the mapper.
///
/// The mapper assumes a single writer. Hosts that map records in
/// parallel should give each worker its own sink and merge afterwards.
pub trait TripleSink {
    /// Append one triple
    fn insert(&mut self, triple: Triple);
}

/// Bag semantics: every inserted triple is kept, duplicates included.
impl TripleSink for Vec<Triple> {
    fn insert(&mut self, triple: Triple) {
        self.push(triple);
    }
}

/// An RDF graph with namespace bindings.
///
/// Triples are a set (re-inserting an existing triple is a no-op) that
/// remembers insertion order, so serialized output is stable across runs
/// over the same input.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: IndexSet<Triple>,
    namespaces: IndexMap<String, String>,
}

impl Graph {
    /// Create an empty graph with no bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with the default vocabulary bindings, the default
    /// namespace bound to the empty prefix, and the given user prefixes.
    pub fn with_bindings<'a>(
        namespace: Option<&str>,
        prefixes: impl IntoIterator<Item = (&'a String, &'a String)>,
    ) -> Self {
        let mut graph = Self::new();
        for (prefix, ns) in vocab::DEFAULT_BINDINGS {
            graph.bind(*prefix, *ns);
        }
        if let Some(ns) = namespace {
            graph.bind("", crate::namespace::normalize_namespace(ns));
        }
        for (prefix, ns) in prefixes {
            graph.bind(prefix.as_str(), ns.as_str());
        }
        graph
    }

    /// Bind a prefix to a namespace, replacing any previous binding
    pub fn bind(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.namespaces.insert(prefix.into(), namespace.into());
    }

    /// Prefix bindings in binding order
    pub fn namespaces(&self) -> impl Iterator<Item = (&str, &str)> {
        self.namespaces.iter().map(|(p, ns)| (p.as_str(), ns.as_str()))
    }

    /// Insert a triple; returns false if it was already present
    pub fn add(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate triples in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// All objects for a given subject and predicate
    pub fn objects<'a>(
        &'a self,
        subject: &'a Iri,
        predicate: &'a Iri,
    ) -> impl Iterator<Item = &'a Term> + 'a {
        self.triples
            .iter()
            .filter(move |t| &t.subject == subject && &t.predicate == predicate)
            .map(|t| &t.object)
    }

    /// Distinct subjects in first-seen order
    pub fn subjects(&self) -> IndexSet<&Iri> {
        self.triples.iter().map(|t| &t.subject).collect()
    }
}

impl TripleSink for Graph {
    fn insert(&mut self, triple: Triple) {
        self.add(triple);
    }
}

impl Extend<Triple> for Graph {
    fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
        self.triples.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Triple;
    type IntoIter = indexmap::set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
