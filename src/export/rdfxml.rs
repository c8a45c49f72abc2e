//! RDF/XML writer: one `rdf:Description` per subject

use crate::graph::vocab::rdf;
use crate::graph::{Graph, Iri, Term};
use indexmap::IndexMap;
use tracing::warn;

pub fn write(graph: &Graph) -> String {
    let namespaces = Namespaces::for_graph(graph);

    let mut by_subject: IndexMap<&Iri, Vec<(String, &Term)>> = IndexMap::new();
    for triple in graph {
        let Some(qname) = namespaces.qname(&triple.predicate) else {
            warn!(predicate = %triple.predicate, "predicate has no XML qualified name, triple skipped");
            continue;
        };
        by_subject
            .entry(&triple.subject)
            .or_default()
            .push((qname, &triple.object));
    }

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<rdf:RDF");
    for (prefix, namespace) in &namespaces.declared {
        out.push_str(&format!("\n   xmlns:{}=\"{}\"", prefix, escape_attr(namespace)));
    }
    out.push_str("\n>\n");

    for (subject, properties) in &by_subject {
        out.push_str(&format!(
            "  <rdf:Description rdf:about=\"{}\">\n",
            escape_attr(subject.as_str())
        ));
        for (qname, object) in properties {
            out.push_str("    ");
            out.push_str(&property(qname, object));
            out.push('\n');
        }
        out.push_str("  </rdf:Description>\n");
    }
    out.push_str("</rdf:RDF>\n");
    out
}

fn property(qname: &str, object: &Term) -> String {
    match object {
        Term::Iri(iri) => format!("<{} rdf:resource=\"{}\"/>", qname, escape_attr(iri.as_str())),
        Term::Literal(literal) => {
            let attribute = match (&literal.language, &literal.datatype) {
                (Some(language), _) => format!(" xml:lang=\"{}\"", escape_attr(language)),
                (None, Some(datatype)) => {
                    format!(" rdf:datatype=\"{}\"", escape_attr(datatype.as_str()))
                }
                (None, None) => String::new(),
            };
            format!(
                "<{q}{a}>{text}</{q}>",
                q = qname,
                a = attribute,
                text = escape_text(&literal.lexical)
            )
        }
    }
}

/// Prefixes declared on `rdf:RDF`: the graph's bindings where they cover
/// a predicate namespace, generated `nsN` prefixes otherwise.
struct Namespaces {
    declared: IndexMap<String, String>,
    by_namespace: IndexMap<String, String>,
}

impl Namespaces {
    fn for_graph(graph: &Graph) -> Self {
        let bound: IndexMap<&str, &str> = graph
            .namespaces()
            .filter(|(prefix, _)| !prefix.is_empty() && !prefix.starts_with("xml") && *prefix != "rdf")
            .map(|(prefix, ns)| (ns, prefix))
            .collect();

        let mut namespaces = Self {
            declared: IndexMap::new(),
            by_namespace: IndexMap::new(),
        };
        namespaces.declare("rdf", rdf::NS);

        let mut generated = 0;
        for triple in graph {
            let Some((namespace, _)) = split_iri(triple.predicate.as_str()) else {
                continue;
            };
            if namespaces.by_namespace.contains_key(namespace) {
                continue;
            }
            match bound.get(namespace) {
                Some(prefix) => namespaces.declare(prefix, namespace),
                None => loop {
                    generated += 1;
                    let prefix = format!("ns{}", generated);
                    if !namespaces.declared.contains_key(&prefix) && !bound.values().any(|p| *p == prefix) {
                        namespaces.declare(&prefix, namespace);
                        break;
                    }
                },
            }
        }
        namespaces
    }

    fn declare(&mut self, prefix: &str, namespace: &str) {
        self.declared.insert(prefix.to_string(), namespace.to_string());
        self.by_namespace.insert(namespace.to_string(), prefix.to_string());
    }

    fn qname(&self, predicate: &Iri) -> Option<String> {
        let (namespace, local) = split_iri(predicate.as_str())?;
        let prefix = self.by_namespace.get(namespace)?;
        Some(format!("{}:{}", prefix, local))
    }
}

/// Split an IRI into namespace and an XML NCName local part
fn split_iri(iri: &str) -> Option<(&str, &str)> {
    let tail_start = iri
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_name_char(*c))
        .last()
        .map(|(i, _)| i)?;
    let local_start = iri[tail_start..]
        .char_indices()
        .find(|(_, c)| is_name_start_char(*c))
        .map(|(i, _)| tail_start + i)?;
    if local_start == 0 {
        return None;
    }
    Some((&iri[..local_start], &iri[local_start..]))
}

fn is_name_start_char(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c) || c.is_numeric() || c == '-' || c == '.'
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
