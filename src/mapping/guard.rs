//! `if` guards

use crate::template::{resolve, DataContext};

/// True when every condition resolves to something other than the empty
/// string or a case-insensitive `false`. No conditions always pass.
pub fn passes(conditions: &[String], ctx: &DataContext) -> bool {
    conditions.iter().all(|condition| {
        let resolved = resolve(condition, ctx);
        !resolved.is_empty() && !resolved.eq_ignore_ascii_case("false")
    })
}
