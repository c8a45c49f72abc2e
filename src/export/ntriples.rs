//! N-Triples writer and the term escaping shared with Turtle

use crate::graph::{Graph, Iri, Literal, Term};

/// One line per triple, in graph order
pub fn write(graph: &Graph) -> String {
    let mut out = String::new();
    for triple in graph {
        out.push_str(&iri_ref(&triple.subject));
        out.push(' ');
        out.push_str(&iri_ref(&triple.predicate));
        out.push(' ');
        out.push_str(&term(&triple.object));
        out.push_str(" .\n");
    }
    out
}

pub(super) fn term(term: &Term) -> String {
    match term {
        Term::Iri(iri) => iri_ref(iri),
        Term::Literal(literal) => literal_with(literal, iri_ref),
    }
}

/// `"lexical"`, `"lexical"@lang` or `"lexical"^^<datatype>`
pub(super) fn literal_with(literal: &Literal, datatype: impl Fn(&Iri) -> String) -> String {
    let mut out = quoted(&literal.lexical);
    if let Some(language) = &literal.language {
        out.push('@');
        out.push_str(language);
    } else if let Some(dt) = &literal.datatype {
        out.push_str("^^");
        out.push_str(&datatype(dt));
    }
    out
}

/// `<iri>`, with characters IRIREF forbids written as `\u` escapes
pub(super) fn iri_ref(iri: &Iri) -> String {
    let mut out = String::with_capacity(iri.as_str().len() + 2);
    out.push('<');
    for ch in iri.as_str().chars() {
        match ch {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                out.push_str(&format!("\\u{:04X}", ch as u32));
            }
            c if (c as u32) <= 0x20 => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('>');
    out
}

/// Double-quoted string literal body
pub(super) fn quoted(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => result.push_str(&format!("\\u{:04X}", c as u32)),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Triple;

    #[test]
    fn writes_one_line_per_triple() {
        let mut graph = Graph::new();
        graph.add(Triple::new(
            Iri::new("http://ex/a"),
            Iri::new("http://ex/p"),
            Iri::new("http://ex/b"),
        ));
        graph.add(Triple::new(
            Iri::new("http://ex/a"),
            Iri::new("http://ex/name"),
            Literal::lang_string("Ada", "en"),
        ));
        assert_eq!(
            write(&graph),
            "<http://ex/a> <http://ex/p> <http://ex/b> .\n<http://ex/a> <http://ex/name> \"Ada\"@en .\n"
        );
    }

    #[test]
    fn typed_literals_carry_datatype() {
        let lit = Literal::typed("5", Iri::new("http://www.w3.org/2001/XMLSchema#integer"));
        assert_eq!(
            term(&Term::from(lit)),
            "\"5\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(quoted("say \"hi\"\n\\"), "\"say \\\"hi\\\"\\n\\\\\"");
    }

    #[test]
    fn forbidden_iri_characters_are_escaped() {
        assert_eq!(iri_ref(&Iri::new("http://ex/a b>")), "<http://ex/a\\u0020b\\u003E>");
    }
}
