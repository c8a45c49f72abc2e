//! Serialization and graph-store tests

use serde_json::{json, Value};

/// Fixture: a typed-literal triple as exchanged with downstream tools
fn typed_triple_fixture() -> Value {
    json!({
        "subject": "http://example.org/alice",
        "predicate": "http://example.org/age",
        "object": {
            "lexical": "42",
            "datatype": "http://www.w3.org/2001/XMLSchema#integer"
        }
    })
}

/// Fixture: an IRI-object triple
fn ref_triple_fixture() -> Value {
    json!({
        "subject": "http://example.org/alice",
        "predicate": "http://xmlns.com/foaf/0.1/knows",
        "object": "http://example.org/bob"
    })
}

#[cfg(test)]
mod serialization_tests {
    use super::*;
    use crate::graph::{Iri, Literal, Term, Triple};

    #[test]
    fn iri_serializes_as_string() {
        let iri = Iri::new("http://example.org/alice");
        let json = serde_json::to_string(&iri).unwrap();
        assert_eq!(json, "\"http://example.org/alice\"");
    }

    #[test]
    fn iri_term_serializes_untagged() {
        let term = Term::from(Iri::new("http://example.org/bob"));
        let json = serde_json::to_value(&term).unwrap();
        assert_eq!(json, "http://example.org/bob");
    }

    #[test]
    fn plain_literal_skips_absent_annotations() {
        let term = Term::from(Literal::plain("Alice"));
        let json = serde_json::to_value(&term).unwrap();
        assert_eq!(json["lexical"], "Alice");
        assert!(json.get("datatype").is_none());
        assert!(json.get("language").is_none());
    }

    #[test]
    fn can_deserialize_typed_triple_fixture() {
        let triple: Triple = serde_json::from_value(typed_triple_fixture()).unwrap();
        assert_eq!(triple.subject.as_str(), "http://example.org/alice");
        let literal = triple.object.as_literal().expect("object should be a literal");
        assert_eq!(literal.lexical, "42");
        assert_eq!(
            literal.datatype.as_ref().map(Iri::as_str),
            Some("http://www.w3.org/2001/XMLSchema#integer")
        );
    }

    #[test]
    fn can_deserialize_ref_triple_fixture() {
        let triple: Triple = serde_json::from_value(ref_triple_fixture()).unwrap();
        assert_eq!(
            triple.object.as_iri().map(Iri::as_str),
            Some("http://example.org/bob")
        );
    }

    #[test]
    fn lang_string_roundtrip() {
        let triple = Triple::new(
            Iri::new("http://example.org/alice"),
            Iri::new("http://xmlns.com/foaf/0.1/name"),
            Literal::lang_string("Alice", "en"),
        );

        let json = serde_json::to_string(&triple).unwrap();
        let triple2: Triple = serde_json::from_str(&json).unwrap();
        assert_eq!(triple, triple2);
    }
}

#[cfg(test)]
mod store_tests {
    use crate::graph::{Graph, Iri, Literal, Term, Triple, TripleSink};

    fn alice_name(name: &str) -> Triple {
        Triple::new(
            Iri::new("http://example.org/alice"),
            Iri::new("http://xmlns.com/foaf/0.1/name"),
            Literal::plain(name),
        )
    }

    #[test]
    fn graph_collapses_duplicate_triples() {
        let mut graph = Graph::new();
        assert!(graph.add(alice_name("Alice")));
        assert!(!graph.add(alice_name("Alice")));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn vec_sink_keeps_duplicates() {
        let mut sink: Vec<Triple> = Vec::new();
        TripleSink::insert(&mut sink, alice_name("Alice"));
        TripleSink::insert(&mut sink, alice_name("Alice"));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn graph_preserves_insertion_order() {
        let mut graph = Graph::new();
        graph.insert(alice_name("B"));
        graph.insert(alice_name("A"));
        let names: Vec<_> = graph
            .iter()
            .filter_map(|t| t.object.as_literal())
            .map(|l| l.lexical.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn objects_filters_by_subject_and_predicate() {
        let mut graph = Graph::new();
        graph.insert(alice_name("Alice"));
        graph.insert(alice_name("Al"));
        let subject = Iri::new("http://example.org/alice");
        let predicate = Iri::new("http://xmlns.com/foaf/0.1/name");
        let found: Vec<&Term> = graph.objects(&subject, &predicate).collect();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn with_bindings_binds_default_namespace_and_user_prefixes() {
        let prefixes = indexmap::IndexMap::from([
            ("ex".to_string(), "http://example.org/".to_string()),
            ("foaf".to_string(), "http://example.org/my-foaf/".to_string()),
        ]);
        let graph = Graph::with_bindings(Some("http://default.org"), &prefixes);
        let bindings: indexmap::IndexMap<&str, &str> = graph.namespaces().collect();

        assert_eq!(bindings.get(""), Some(&"http://default.org/"));
        assert_eq!(bindings.get("ex"), Some(&"http://example.org/"));
        // user prefixes win over defaults
        assert_eq!(bindings.get("foaf"), Some(&"http://example.org/my-foaf/"));
        assert_eq!(bindings.get("rdf"), Some(&crate::graph::vocab::rdf::NS));
    }

    #[test]
    fn default_bindings_expand_common_vocabularies() {
        let graph = Graph::with_bindings(Some("http://default.org/"), &indexmap::IndexMap::<String, String>::new());
        let urifier = crate::namespace::Urifier::new(graph.namespaces(), Some("http://default.org/"));

        assert_eq!(
            urifier.to_iri("geo:lat").as_str(),
            "http://www.opengis.net/ont/geosparql#lat"
        );
        assert_eq!(urifier.to_iri("sh:NodeShape").as_str(), "http://www.w3.org/ns/shacl#NodeShape");
        assert_eq!(urifier.to_iri("time:Instant").as_str(), "http://www.w3.org/2006/time#Instant");
        assert_eq!(urifier.to_iri("org:Organization").as_str(), "http://www.w3.org/ns/org#Organization");
    }
}
