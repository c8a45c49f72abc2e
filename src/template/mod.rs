//! Template resolver
//!
//! Fills template strings from a [`DataContext`]:
//!
//! - `{{key}}`, `{{key.sub}}`: value lookup (missing or structured → empty)
//! - `{% uuid %}`, `{% timestamp %}`, `{% datetime %}`, `{% date %}`, `{% time %}`
//! - `$fn{{args}}`: functions, nestable (`$upper{{$slug{{ {{name}} }}}}`)
//!
//! Resolution never fails. Looked-up values, special tokens and function
//! arguments are trimmed, and so is the final result.
//!
//! Variables and special tokens are substituted once. The rendered text is
//! then rescanned for `$fn{{...}}` calls until none remain, so a call that
//! arrives through a looked-up value is applied too. `{{` in looked-up data
//! is never substituted again.

mod context;
mod functions;
mod parser;
mod special;

pub use context::{scalar_text, DataContext, RESERVED_PREFIX};
pub use parser::{parse, parse_calls, Segment};

/// Upper bound on call rescans of one rendered template
const MAX_REWRITES: usize = 16;

/// A parsed template, reusable across contexts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Self {
        Self {
            segments: parser::parse(source),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Render against a context; the result is trimmed
    pub fn render(&self, ctx: &DataContext) -> String {
        let mut out = render_segments(&self.segments, ctx);
        for _ in 0..MAX_REWRITES {
            let calls = parser::parse_calls(&out);
            if !calls.iter().any(|s| matches!(s, Segment::Call { .. })) {
                break;
            }
            out = render_segments(&calls, ctx);
        }
        out.trim().to_string()
    }
}

/// Parse and render `template` against `ctx` in one step
pub fn resolve(template: &str, ctx: &DataContext) -> String {
    Template::parse(template).render(ctx)
}

fn render_segments(segments: &[Segment], ctx: &DataContext) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Variable(path) => out.push_str(ctx.render(path).trim()),
            Segment::Special(name) => out.push_str(special::expand(name).trim()),
            Segment::Call { name, args } => {
                let arg = render_segments(args, ctx);
                out.push_str(&functions::apply(name, arg.trim()));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> DataContext {
        DataContext::new(json!({
            "name": "  Ada Lovelace ",
            "address": {"city": "London"},
            "empty": "",
            "nested": {"deep": {"x": 1}}
        }))
    }

    #[test]
    fn substitutes_variables() {
        assert_eq!(resolve("person/{{name}}", &ctx()), "person/Ada Lovelace");
        assert_eq!(resolve("{{address.city}}", &ctx()), "London");
    }

    #[test]
    fn missing_paths_resolve_empty() {
        assert_eq!(resolve("x{{nope}}y", &ctx()), "xy");
        assert_eq!(resolve("{{address.zip.code}}", &ctx()), "");
    }

    #[test]
    fn structured_values_never_leak() {
        assert_eq!(resolve("[{{nested}}]", &ctx()), "[]");
        assert_eq!(resolve("[{{nested.deep}}]", &ctx()), "[]");
    }

    #[test]
    fn function_chaining_applies_innermost_first() {
        assert_eq!(resolve("$upper{{$slug{{My Name}}}}", &DataContext::empty()), "MY-NAME");
    }

    #[test]
    fn functions_see_substituted_variables() {
        assert_eq!(resolve("ex:$slug{{ {{name}} }}", &ctx()), "ex:ada-lovelace");
    }

    #[test]
    fn or_provides_inline_defaults() {
        assert_eq!(resolve("$or{{ {{empty}} ; unknown }}", &ctx()), "unknown");
        assert_eq!(resolve("$or{{ {{address.city}} ; unknown }}", &ctx()), "London");
    }

    #[test]
    fn result_is_trimmed() {
        assert_eq!(resolve("   padded   ", &DataContext::empty()), "padded");
    }

    #[test]
    fn special_tokens_are_evaluated_per_occurrence() {
        let out = resolve("{% uuid %}|{% uuid %}", &DataContext::empty());
        let (a, b) = out.split_once('|').unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn calls_in_looked_up_values_are_applied() {
        let ctx = DataContext::new(json!({"raw": "$upper{{abc}}"}));
        assert_eq!(resolve("{{raw}}", &ctx), "ABC");
    }

    #[test]
    fn looked_up_variables_are_not_substituted_again() {
        let ctx = DataContext::new(json!({"raw": "$upper{{x}} {{name}}", "name": "Ada"}));
        assert_eq!(resolve("{{raw}}", &ctx), "X {{name}}");
    }

    #[test]
    fn function_output_forming_a_call_is_applied() {
        let ctx = DataContext::new(json!({"fn": "upper", "arg": "abc"}));
        assert_eq!(resolve("${{fn}}{{ {{arg}} }}", &ctx), "ABC");
    }

    #[test]
    fn parsed_template_is_reusable() {
        let template = Template::parse("id-{{n}}");
        assert_eq!(template.render(&DataContext::new(json!({"n": 1}))), "id-1");
        assert_eq!(template.render(&DataContext::new(json!({"n": 2}))), "id-2");
    }
}
