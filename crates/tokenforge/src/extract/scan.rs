//! Balanced-brace scanning over unevaluated JavaScript/TypeScript source.
//!
//! Config files are never executed. Instead, named object literals are found
//! by text scanning: the block for `colors: { ... }` starts at the first `{`
//! after the key and ends where brace depth returns to zero. String literals
//! and comments are skipped so braces inside them do not count.
//!
//! A non-greedy `\{[^}]+\}` regex would stop at the first inner `}` and drop
//! everything after a nested object, which is why block boundaries are never
//! found with a regex here.

use regex::Regex;
use tracing::debug;

/// Nesting limit for a single block. Deeper input is treated as unbalanced.
pub const MAX_DEPTH: usize = 64;

/// Removes `//` and `/* */` comments, leaving string literals untouched.
///
/// Line comments keep their newline so entries stay separated.
pub fn strip_js_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut copied_from = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i = skip_string(bytes, i, quote);
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                out.push_str(&source[copied_from..i]);
                let end = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map_or(bytes.len(), |p| i + p);
                i = end;
                copied_from = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                out.push_str(&source[copied_from..i]);
                let end = source[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |p| i + 2 + p + 2);
                out.push(' ');
                i = end;
                copied_from = end;
            }
            _ => i += 1,
        }
    }
    out.push_str(&source[copied_from..]);
    out
}

/// Returns the index just past the string literal opening at `start`.
fn skip_string(bytes: &[u8], start: usize, quote: u8) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Returns the text between the brace at `open` and its matching `}`.
///
/// `source.as_bytes()[open]` must be `{`. Returns `None` when the block is
/// unbalanced or nests deeper than [`MAX_DEPTH`].
pub fn balanced_body(source: &str, open: usize) -> Option<&str> {
    let bytes = source.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i = skip_string(bytes, i, quote);
                continue;
            }
            b'{' => {
                depth += 1;
                if depth > MAX_DEPTH {
                    debug!(open, "block nests too deeply, giving up");
                    return None;
                }
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&source[open + 1..i]);
                }
            }
            _ => {}
        }
        i += 1;
    }
    debug!(open, "unbalanced block");
    None
}

/// Builds the pattern matching the start of an object literal bound to `name`.
///
/// Matches `name: {`, `'name': {` and `"name": {`. The key must not be part
/// of a longer identifier, so `textColors: {` does not match `colors`.
pub fn object_block_pattern(name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r#"(?:^|[^\w$])["']?{}["']?\s*:\s*\{{"#,
        regex::escape(name)
    ))
}

/// Returns the body of every object literal whose start `pattern` matches.
///
/// `pattern` comes from [`object_block_pattern`] and must end at the `{`.
pub fn find_object_blocks<'a>(source: &'a str, pattern: &Regex) -> Vec<&'a str> {
    pattern
        .find_iter(source)
        .filter_map(|m| balanced_body(source, m.end() - 1))
        .collect()
}

/// Splits `text` at every top-level occurrence of `separator`.
///
/// "Top level" means outside string literals and outside `{}`, `[]` and `()`.
pub fn split_top_level(text: &str, separator: u8) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for index in top_level_positions(text, separator) {
        parts.push(&text[start..index]);
        start = index + 1;
    }
    parts.push(&text[start..]);
    parts
}

/// Splits `key: value` at the first top-level colon.
pub fn split_key_value(entry: &str) -> Option<(&str, &str)> {
    let index = top_level_positions(entry, b':').into_iter().next()?;
    Some((&entry[..index], &entry[index + 1..]))
}

fn top_level_positions(text: &str, target: u8) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut positions = Vec::new();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => {
                i = skip_string(bytes, i, quote);
                continue;
            }
            b'{' | b'[' | b'(' => depth += 1,
            b'}' | b']' | b')' => depth = depth.saturating_sub(1),
            b if b == target && depth == 0 => positions.push(i),
            _ => {}
        }
        i += 1;
    }
    positions
}
