//! Template grammar
//!
//! ```text
//! template  := segment*
//! segment   := variable | special | call | text
//! variable  := "{{" path "}}"          path has no '{', '}' or '$'
//! special   := "{%" name "%}"          name has no '{', '}', '$' or '%'
//! call      := "$" word "{{" template "}}"
//! ```
//!
//! Anything that does not form a complete construct is literal text, so
//! parsing never fails. Call arguments are themselves templates, which is
//! what lets calls nest (`$upper{{$slug{{...}}}}`) and evaluate
//! innermost-first.

/// One parsed piece of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, copied through
    Text(String),
    /// `{{path}}` lookup into the data context
    Variable(String),
    /// `{% name %}` zero-argument special token
    Special(String),
    /// `$name{{args}}` function application
    Call { name: String, args: Vec<Segment> },
}

/// Parse a template into segments
pub fn parse(template: &str) -> Vec<Segment> {
    let mut parser = Parser {
        src: template,
        pos: 0,
        calls_only: false,
    };
    let (segments, _) = parser.sequence(false);
    segments
}

/// Parse rendered text for function calls only.
///
/// `{{...}}` and `{%...%}` stay literal text, so only `Text` and `Call`
/// segments are produced.
pub fn parse_calls(text: &str) -> Vec<Segment> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        calls_only: true,
    };
    let (segments, _) = parser.sequence(false);
    segments
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    calls_only: bool,
}

impl<'a> Parser<'a> {
    /// Parse segments until end of input, or until the closing `}}` of a
    /// call when `nested`. Returns whether a closing `}}` was consumed.
    fn sequence(&mut self, nested: bool) -> (Vec<Segment>, bool) {
        let mut segments = Vec::new();
        let mut text = String::new();

        while self.pos < self.src.len() {
            let rest = &self.src[self.pos..];

            if nested && rest.starts_with("}}") {
                self.pos += 2;
                flush(&mut text, &mut segments);
                return (segments, true);
            }

            if !self.calls_only {
                if let Some((path, len)) = scan_delimited(rest, "{{", "}}", &['{', '}', '$']) {
                    flush(&mut text, &mut segments);
                    segments.push(Segment::Variable(path.to_string()));
                    self.pos += len;
                    continue;
                }

                if let Some((name, len)) = scan_delimited(rest, "{%", "%}", &['{', '}', '$', '%']) {
                    flush(&mut text, &mut segments);
                    segments.push(Segment::Special(name.to_string()));
                    self.pos += len;
                    continue;
                }
            }

            if let Some(name) = call_head(rest) {
                let start = self.pos;
                self.pos += 1 + name.len() + 2;
                let (args, closed) = self.sequence(true);
                if closed {
                    flush(&mut text, &mut segments);
                    segments.push(Segment::Call {
                        name: name.to_string(),
                        args,
                    });
                    continue;
                }
                // unterminated call: the `$` is plain text, rescan after it
                self.pos = start;
            }

            let ch = rest.chars().next().unwrap_or_default();
            text.push(ch);
            self.pos += ch.len_utf8();
        }

        flush(&mut text, &mut segments);
        (segments, false)
    }
}

fn flush(text: &mut String, segments: &mut Vec<Segment>) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}

/// Match `open inner close` at the start of `rest`, where `inner` is
/// non-blank and free of `forbidden` characters. Returns the trimmed
/// inner text and the total matched length.
fn scan_delimited<'s>(
    rest: &'s str,
    open: &str,
    close: &str,
    forbidden: &[char],
) -> Option<(&'s str, usize)> {
    let body = rest.strip_prefix(open)?;
    let end = body.find(close)?;
    let inner = &body[..end];
    if inner.trim().is_empty() || inner.contains(forbidden) {
        return None;
    }
    Some((inner.trim(), open.len() + end + close.len()))
}

/// Match `$word{{` at the start of `rest`, returning `word`.
fn call_head(rest: &str) -> Option<&str> {
    let after = rest.strip_prefix('$')?;
    let name_len = after
        .char_indices()
        .find(|(_, c)| !(c.is_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(after.len());
    if name_len == 0 || !after[name_len..].starts_with("{{") {
        return None;
    }
    Some(&after[..name_len])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Segment {
        Segment::Text(s.to_string())
    }

    fn var(s: &str) -> Segment {
        Segment::Variable(s.to_string())
    }

    #[test]
    fn plain_text_is_one_segment() {
        assert_eq!(parse("hello world"), vec![text("hello world")]);
    }

    #[test]
    fn variables_are_trimmed() {
        assert_eq!(
            parse("ex:{{ id }}/x"),
            vec![text("ex:"), var("id"), text("/x")]
        );
    }

    #[test]
    fn special_tokens_parse() {
        assert_eq!(
            parse("{% uuid %}"),
            vec![Segment::Special("uuid".to_string())]
        );
    }

    #[test]
    fn calls_nest_innermost_first() {
        assert_eq!(
            parse("$upper{{$slug{{My Name}}}}"),
            vec![Segment::Call {
                name: "upper".to_string(),
                args: vec![Segment::Call {
                    name: "slug".to_string(),
                    args: vec![text("My Name")],
                }],
            }]
        );
    }

    #[test]
    fn call_arguments_may_contain_variables() {
        assert_eq!(
            parse("$lower{{ {{name}} }}"),
            vec![Segment::Call {
                name: "lower".to_string(),
                args: vec![text(" "), var("name"), text(" ")],
            }]
        );
    }

    #[test]
    fn unterminated_constructs_are_text() {
        assert_eq!(parse("{{open"), vec![text("{{open")]);
        assert_eq!(parse("$upper{{abc"), vec![text("$upper{{abc")]);
        assert_eq!(parse("cost: $5"), vec![text("cost: $5")]);
    }

    #[test]
    fn blank_variable_is_text() {
        assert_eq!(parse("{{ }}"), vec![text("{{ }}")]);
    }

    #[test]
    fn call_scan_leaves_variables_as_text() {
        assert_eq!(
            parse_calls("$upper{{x}} {{name}}"),
            vec![
                Segment::Call {
                    name: "upper".to_string(),
                    args: vec![text("x")],
                },
                text(" {{name}}"),
            ]
        );
        assert_eq!(parse_calls("{% uuid %}"), vec![text("{% uuid %}")]);
    }

    #[test]
    fn dollar_inside_braces_is_not_a_variable() {
        assert_eq!(parse("{{$x}}"), vec![text("{{$x}}")]);
    }
}
