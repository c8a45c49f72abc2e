//! Built-in template functions (`$name{{args}}`)
//!
//! Every function takes the already-resolved, trimmed argument text.
//! Multi-argument functions split it on `;` and trim each part. Unknown
//! names and malformed arguments return the argument text unchanged.

use md5::{Digest, Md5};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;

/// Characters left as-is by `urlencode`: unreserved plus `/`
const PATH_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Apply the named function to its argument text
pub fn apply(name: &str, arg: &str) -> String {
    let result = match name {
        "lower" => Some(arg.to_lowercase()),
        "upper" => Some(arg.to_uppercase()),
        "ucfirst" => Some(ucfirst(arg)),
        "ucword" => Some(ucword(arg)),
        "slug" => Some(slugify(arg)),
        "stripall" => Some(strip_trailing_symbols(arg)),
        "urlencode" => Some(utf8_percent_encode(arg, PATH_SAFE).to_string()),
        "md5" => Some(md5_hex(arg)),
        "or" => first_non_empty(arg),
        "replace" => replace(arg),
        "padleft" => pad(arg, true),
        "padright" => pad(arg, false),
        "int" | "number" => to_integer(arg),
        "float" => to_float(arg),
        _ => None,
    };
    result.unwrap_or_else(|| arg.to_string())
}

/// Split `arg` on `;` into exactly `n` trimmed parts
fn split_args(arg: &str, n: usize) -> Option<Vec<&str>> {
    let parts: Vec<&str> = arg.split(';').map(str::trim).collect();
    (parts.len() == n).then_some(parts)
}

fn ucfirst(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn ucword(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if at_word_start && !ch.is_whitespace() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch.is_whitespace();
    }
    out
}

/// Lower-case, alphanumeric runs joined by single `-`; quotes vanish.
fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_separator = false;
    for ch in text.chars() {
        if ch == '\'' || ch == '"' || ch == '\u{2019}' {
            continue;
        }
        if ch.is_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('-');
            }
            pending_separator = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    out
}

fn strip_trailing_symbols(text: &str) -> String {
    text.trim_end_matches(|c: char| !c.is_ascii_alphanumeric())
        .trim()
        .to_string()
}

fn md5_hex(text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn first_non_empty(arg: &str) -> Option<String> {
    let parts = split_args(arg, 2)?;
    let chosen = if parts[0].is_empty() { parts[1] } else { parts[0] };
    Some(chosen.to_string())
}

/// `pattern ; replacement ; text`; a literal `\s` in the output becomes a space
fn replace(arg: &str) -> Option<String> {
    let parts = split_args(arg, 3)?;
    let re = Regex::new(parts[0]).ok()?;
    Some(re.replace_all(parts[2], parts[1]).replace("\\s", " "))
}

/// `length ; fill ; text` with a single fill character
fn pad(arg: &str, left: bool) -> Option<String> {
    let parts = split_args(arg, 3)?;
    let width: usize = parts[0].parse().ok()?;
    let mut fill_chars = parts[1].chars();
    let fill = fill_chars.next()?;
    if fill_chars.next().is_some() {
        return None;
    }

    let text = parts[2];
    let missing = width.saturating_sub(text.chars().count());
    let padding: String = std::iter::repeat(fill).take(missing).collect();
    Some(if left {
        format!("{}{}", padding, text)
    } else {
        format!("{}{}", text, padding)
    })
}

fn to_integer(arg: &str) -> Option<String> {
    if let Ok(i) = arg.parse::<i64>() {
        return Some(i.to_string());
    }
    let f = arg.parse::<f64>().ok().filter(|f| f.is_finite())?;
    Some((f.trunc() as i64).to_string())
}

fn to_float(arg: &str) -> Option<String> {
    let f = arg.parse::<f64>().ok()?;
    Some(format!("{:?}", f))
}
