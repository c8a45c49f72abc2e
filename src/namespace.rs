//! Compact identifier expansion
//!
//! Turns `prefix:local`, `/local`, `:local` and bare `local` strings into
//! absolute IRIs using a prefix table and a default namespace. Expansion
//! is plain string concatenation; no IRI normalization is attempted.

use crate::graph::Iri;
use indexmap::IndexMap;

/// Ensure a namespace ends in a separator (`/` or `#`), appending `/`
/// when it has neither.
pub fn normalize_namespace(namespace: &str) -> String {
    if namespace.ends_with('/') || namespace.ends_with('#') {
        namespace.to_string()
    } else {
        format!("{}/", namespace)
    }
}

/// Expands compact identifiers into IRIs.
///
/// Pure with respect to its inputs: equal compact strings always expand
/// to equal IRIs for a given table and default namespace.
#[derive(Debug, Clone, Default)]
pub struct Urifier {
    namespaces: IndexMap<String, String>,
    default_namespace: Option<String>,
}

impl Urifier {
    /// Build from prefix bindings and an optional default namespace.
    ///
    /// The default namespace is normalized to end with a separator.
    pub fn new<I, P, N>(bindings: I, default_namespace: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (P, N)>,
        P: Into<String>,
        N: Into<String>,
    {
        Self {
            namespaces: bindings
                .into_iter()
                .map(|(p, n)| (p.into(), n.into()))
                .collect(),
            default_namespace: default_namespace.map(normalize_namespace),
        }
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Look up the namespace bound to a prefix
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    /// Replace a leading bound `prefix:` with its namespace.
    ///
    /// Only the segment before the first `:` is considered; later colons
    /// are left alone.
    pub fn expand_prefix(&self, compact: &str) -> String {
        if let Some((prefix, local)) = compact.split_once(':') {
            if let Some(ns) = self.namespaces.get(prefix) {
                return format!("{}{}", ns, local);
            }
        }
        compact.to_string()
    }

    /// Expand a compact identifier into an IRI. Never fails.
    pub fn to_iri(&self, compact: &str) -> Iri {
        let expanded = self.expand_prefix(compact);
        if expanded.starts_with("http") {
            return Iri::from(expanded);
        }

        let local = expanded
            .strip_prefix('/')
            .or_else(|| expanded.strip_prefix(':'))
            .unwrap_or(&expanded);

        match &self.default_namespace {
            Some(ns) => Iri::from(format!("{}{}", ns, local)),
            None => Iri::new(local),
        }
    }
}
