//! Token value extraction.
//!
//! Raw token maps carry either plain strings or wrapper objects:
//!
//! ```json
//! {
//!   "primary": "221 83% 53%",
//!   "accent": { "value": "262 83% 58%", "description": "brand accent" }
//! }
//! ```
//!
//! Extraction is best-effort. Entries that are neither a string nor a wrapper
//! with a string `value` are dropped without error, as are blank strings.
//! Wrappers written in the `$value` / `$description` style are accepted too.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::color::normalize_color;
use crate::model::{format_number, Token, TokenCollection, TokenType};

/// Extracts `key -> value` strings from a raw token map.
pub fn extract_values(map: &Map<String, Value>) -> BTreeMap<String, String> {
    map.iter()
        .filter_map(|(key, raw)| {
            let (value, _) = wrapped_value(raw)?;
            let value = value.trim();
            (!value.is_empty()).then(|| (key.clone(), value.to_string()))
        })
        .collect()
}

/// Extracts typed tokens from a raw token map, keeping wrapper descriptions.
pub fn extract_tokens(map: &Map<String, Value>, token_type: TokenType) -> TokenCollection {
    map.iter()
        .filter_map(|(key, raw)| {
            let (value, description) = wrapped_value(raw)?;
            make_token(value, token_type, description).map(|token| (key.clone(), token))
        })
        .collect()
}

/// Builds a token from a raw string, or `None` when the value is blank.
///
/// Color tokens are normalized to HSL triples when the notation is understood.
pub fn make_token(value: &str, token_type: TokenType, description: Option<&str>) -> Option<Token> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let value = match token_type {
        TokenType::Color => normalize_color(value),
        _ => value.to_string(),
    };
    let mut token = Token::new(value, token_type);
    token.description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    Some(token)
}

/// Returns `(value, description)` for a plain string or a string wrapper.
pub(crate) fn wrapped_value(raw: &Value) -> Option<(&str, Option<&str>)> {
    match raw {
        Value::String(s) => Some((s, None)),
        Value::Object(object) => match leaf_payload(object)? {
            Value::String(s) => Some((s, description_of(object))),
            _ => None,
        },
        _ => None,
    }
}

/// The `value` (or `$value`) field of a wrapper object.
pub(crate) fn leaf_payload(object: &Map<String, Value>) -> Option<&Value> {
    object.get("value").or_else(|| object.get("$value"))
}

pub(crate) fn description_of(object: &Map<String, Value>) -> Option<&str> {
    object
        .get("description")
        .or_else(|| object.get("$description"))
        .and_then(Value::as_str)
}

/// Renders a leaf value as a flat string.
///
/// Strings pass through, numbers print without a trailing `.0` and arrays of
/// strings (font stacks) are joined with `", "`.
pub(crate) fn scalar_text(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_f64().map(format_number),
        Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

/// Renders a shadow leaf, composing structured export shadows into CSS.
///
/// Token exports often describe shadows as
/// `{ "x": 0, "y": 1, "blur": 2, "spread": 0, "color": "#0000000d" }`
/// or an array of such layers.
pub(crate) fn shadow_text(raw: &Value) -> Option<String> {
    match raw {
        Value::Object(layer) => shadow_layer(layer),
        Value::Array(layers) if layers.iter().all(Value::is_object) => {
            let parts: Vec<String> = layers
                .iter()
                .filter_map(Value::as_object)
                .filter_map(shadow_layer)
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => scalar_text(other),
    }
}

/// Nesting limit when flattening arbitrary token trees.
pub const MAX_FLATTEN_DEPTH: usize = 32;

/// A leaf found while flattening a token tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Leaf<'a> {
    pub key: String,
    pub value: &'a Value,
    pub description: Option<&'a str>,
}

/// Flattens nested groups into leaves, joining keys with `-`.
///
/// An object carrying `value` (or `$value`) is a leaf and is not descended
/// into. Strings, numbers and arrays are leaves too. Keys starting with `$`
/// are metadata and skipped.
pub(crate) fn flatten_leaves<'a>(
    map: &'a Map<String, Value>,
    prefix: Option<&str>,
    depth: usize,
    out: &mut Vec<Leaf<'a>>,
) {
    if depth > MAX_FLATTEN_DEPTH {
        debug!(prefix, "token tree nests too deeply");
        return;
    }

    for (key, raw) in map {
        flatten_entry(key, raw, prefix, depth, out);
    }
}

/// Flattens one `key: raw` entry of a token tree into `out`.
pub(crate) fn flatten_entry<'a>(
    key: &str,
    raw: &'a Value,
    prefix: Option<&str>,
    depth: usize,
    out: &mut Vec<Leaf<'a>>,
) {
    if key.starts_with('$') {
        return;
    }
    let full_key = match prefix {
        Some(prefix) => format!("{}-{}", prefix, key),
        None => key.to_string(),
    };
    match raw {
        Value::Object(object) => match leaf_payload(object) {
            Some(payload) => out.push(Leaf {
                key: full_key,
                value: payload,
                description: description_of(object),
            }),
            None => flatten_leaves(object, Some(&full_key), depth + 1, out),
        },
        Value::String(_) | Value::Number(_) | Value::Array(_) => out.push(Leaf {
            key: full_key,
            value: raw,
            description: None,
        }),
        Value::Null | Value::Bool(_) => {}
    }
}

/// Builds a token of `token_type` from a flattened leaf.
///
/// Shadows are composed with [`shadow_text`]; opacity numbers stay numeric.
pub(crate) fn leaf_token(leaf: &Leaf<'_>, token_type: TokenType) -> Option<Token> {
    if token_type == TokenType::Opacity {
        if let Some(n) = leaf.value.as_f64() {
            let mut token = Token::new(n, token_type);
            token.description = leaf.description.map(str::to_string);
            return Some(token);
        }
    }
    let text = match token_type {
        TokenType::Shadow => shadow_text(leaf.value),
        _ => scalar_text(leaf.value),
    }?;
    make_token(&text, token_type, leaf.description)
}

fn shadow_layer(layer: &Map<String, Value>) -> Option<String> {
    let length = |name: &str| -> String {
        match layer.get(name) {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v == 0.0 => "0".to_string(),
                Some(v) => format!("{}px", format_number(v)),
                None => "0".to_string(),
            },
            Some(Value::String(s)) if !s.trim().is_empty() => {
                let s = s.trim();
                if s.parse::<f64>().is_ok() && s != "0" {
                    format!("{}px", s)
                } else {
                    s.to_string()
                }
            }
            _ => "0".to_string(),
        }
    };

    let color = layer.get("color").and_then(Value::as_str)?;
    let mut css = format!(
        "{} {} {} {} {}",
        length("x"),
        length("y"),
        length("blur"),
        length("spread"),
        color.trim()
    );
    if layer.get("type").and_then(Value::as_str) == Some("innerShadow") {
        css.insert_str(0, "inset ");
    }
    Some(css)
}
