//! Turtle writer: prefixed names, subjects grouped, `a` for `rdf:type`

use super::ntriples::{iri_ref, literal_with};
use crate::graph::vocab::rdf;
use crate::graph::{Graph, Iri, Term, Triple};
use indexmap::{IndexMap, IndexSet};
use std::cell::RefCell;

pub fn write(graph: &Graph) -> String {
    let compactor = Compactor::new(graph);

    let mut by_subject: IndexMap<&Iri, IndexMap<&Iri, Vec<&Term>>> = IndexMap::new();
    for Triple { subject, predicate, object } in graph {
        by_subject
            .entry(subject)
            .or_default()
            .entry(predicate)
            .or_default()
            .push(object);
    }

    let mut body = String::new();
    for (subject, predicates) in &by_subject {
        body.push_str(&compactor.iri(subject));
        let mut first = true;
        for (predicate, objects) in predicates {
            body.push_str(if first { " " } else { " ;\n    " });
            first = false;
            if predicate.as_str() == rdf::TYPE {
                body.push('a');
            } else {
                body.push_str(&compactor.iri(predicate));
            }
            body.push(' ');
            let rendered: Vec<String> = objects.iter().map(|o| compactor.term(o)).collect();
            body.push_str(&rendered.join(" ,\n        "));
        }
        body.push_str(" .\n\n");
    }

    let mut out = String::new();
    for (prefix, namespace) in compactor.used() {
        out.push_str(&format!("@prefix {}: <{}> .\n", prefix, namespace));
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(&body);
    out
}

/// Shortens IRIs to `prefix:local` using the graph's bindings, and
/// remembers which prefixes it used.
struct Compactor<'g> {
    /// (binding position, prefix, namespace), longest namespace first
    bindings: Vec<(usize, &'g str, &'g str)>,
    used: RefCell<IndexSet<usize>>,
}

impl<'g> Compactor<'g> {
    fn new(graph: &'g Graph) -> Self {
        let mut bindings: Vec<(usize, &str, &str)> = graph
            .namespaces()
            .enumerate()
            .filter(|(_, (_, ns))| !ns.is_empty())
            .map(|(position, (prefix, ns))| (position, prefix, ns))
            .collect();
        bindings.sort_by(|a, b| b.2.len().cmp(&a.2.len()));
        Self {
            bindings,
            used: RefCell::new(IndexSet::new()),
        }
    }

    fn iri(&self, iri: &Iri) -> String {
        for (position, prefix, namespace) in &self.bindings {
            if let Some(local) = iri.as_str().strip_prefix(*namespace) {
                if is_local_name(local) {
                    self.used.borrow_mut().insert(*position);
                    return format!("{}:{}", prefix, local);
                }
            }
        }
        iri_ref(iri)
    }

    fn term(&self, term: &Term) -> String {
        match term {
            Term::Iri(iri) => self.iri(iri),
            Term::Literal(literal) => literal_with(literal, |dt| self.iri(dt)),
        }
    }

    /// Used bindings, in graph binding order
    fn used(&self) -> Vec<(&'g str, &'g str)> {
        let used = self.used.borrow();
        let mut pairs: Vec<(usize, &'g str, &'g str)> = self
            .bindings
            .iter()
            .filter(|(position, _, _)| used.contains(position))
            .copied()
            .collect();
        pairs.sort_by_key(|(position, _, _)| *position);
        pairs.into_iter().map(|(_, prefix, ns)| (prefix, ns)).collect()
    }
}

/// Conservative PN_LOCAL check: letters, digits, `_`, `-`, and `.` not
/// in last position. Empty locals are allowed (`ex:`).
fn is_local_name(local: &str) -> bool {
    if local.ends_with('.') || local.starts_with('-') || local.starts_with('.') {
        return false;
    }
    local
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Literal;

    fn graph() -> Graph {
        let mut graph = Graph::new();
        graph.bind("ex", "http://example.org/");
        graph.bind("foaf", "http://xmlns.com/foaf/0.1/");
        graph.bind("unused", "http://unused.org/");
        graph
    }

    #[test]
    fn groups_subjects_and_predicates() {
        let mut graph = graph();
        let a = Iri::new("http://example.org/a");
        graph.add(Triple::new(a.clone(), Iri::new(rdf::TYPE), Iri::new("http://xmlns.com/foaf/0.1/Person")));
        graph.add(Triple::new(a.clone(), Iri::new("http://xmlns.com/foaf/0.1/name"), Literal::plain("Ada")));
        graph.add(Triple::new(a, Iri::new("http://xmlns.com/foaf/0.1/name"), Literal::lang_string("Ada L.", "en")));

        let out = write(&graph);
        assert_eq!(
            out,
            "@prefix ex: <http://example.org/> .\n\
             @prefix foaf: <http://xmlns.com/foaf/0.1/> .\n\
             \n\
             ex:a a foaf:Person ;\n    \
             foaf:name \"Ada\" ,\n        \"Ada L.\"@en .\n\n"
        );
    }

    #[test]
    fn unbound_or_awkward_iris_stay_bracketed() {
        let mut graph = graph();
        graph.add(Triple::new(
            Iri::new("http://other.org/x"),
            Iri::new("http://example.org/p"),
            Iri::new("http://example.org/with space"),
        ));
        let out = write(&graph);
        assert!(out.contains("<http://other.org/x> ex:p <http://example.org/with\\u0020space> ."));
    }

    #[test]
    fn most_specific_namespace_wins() {
        let mut graph = Graph::new();
        graph.bind("ex", "http://example.org/");
        graph.bind("exv", "http://example.org/vocab/");
        graph.add(Triple::new(
            Iri::new("http://example.org/a"),
            Iri::new("http://example.org/vocab/p"),
            Literal::typed("1", Iri::new("http://example.org/vocab/Unit")),
        ));
        let out = write(&graph);
        assert!(out.contains("ex:a exv:p \"1\"^^exv:Unit ."));
    }

    #[test]
    fn empty_graph_is_empty() {
        assert_eq!(write(&graph()), "");
    }
}
