//! Hand-written token JSON.
//!
//! ```json
//! {
//!   "colors": { "primary": "221 83% 53%", "accent": { "value": "#8b5cf6" } },
//!   "spacing": { "sm": "8px" },
//!   "borderRadius": { "lg": "0.5rem" }
//! }
//! ```
//!
//! Each category accepts a canonical key and one alias. When both are present
//! the canonical key wins and the alias is ignored.

use serde_json::Value;
use tracing::debug;

use super::{insert_leaves, insert_typography, object_field};
use crate::classify::{Category, TypographyKind};
use crate::error::json_kind;
use crate::model::DesignTokens;
use crate::value::{extract_tokens, flatten_leaves};

/// `(canonical, alias, category)` for the flat categories.
pub const CATEGORY_KEYS: &[(&str, &str, Category)] = &[
    ("colors", "color", Category::Color),
    ("spacing", "space", Category::Spacing),
    ("borderRadius", "radii", Category::Radius),
    ("shadows", "boxShadow", Category::Shadow),
];

/// Canonical and alias key for typography. A bare `fontSize` object fills
/// `typography.fontSize`.
pub const TYPOGRAPHY_KEYS: (&str, &str) = ("typography", "fontSize");

/// Extracts tokens from a parsed JSON value.
///
/// Unknown top-level keys are ignored; a non-object value yields an empty
/// result.
pub fn extract_json(input: &Value) -> DesignTokens {
    let mut tokens = DesignTokens::new();
    let Some(root) = input.as_object() else {
        debug!(found = json_kind(input), "token JSON is not an object");
        return tokens;
    };

    for &(canonical, alias, category) in CATEGORY_KEYS {
        let Some(map) = object_field(root, canonical).or_else(|| object_field(root, alias)) else {
            continue;
        };
        let Some(token_type) = category.token_type() else {
            continue;
        };
        for (key, token) in extract_tokens(map, token_type) {
            tokens.insert(category, key, token);
        }
    }

    let (canonical, alias) = TYPOGRAPHY_KEYS;
    if let Some(map) = object_field(root, canonical) {
        insert_typography(&mut tokens, map);
    } else if let Some(map) = object_field(root, alias) {
        let mut leaves = Vec::new();
        flatten_leaves(map, None, 0, &mut leaves);
        insert_leaves(
            &mut tokens,
            leaves,
            Category::Typography(TypographyKind::FontSize),
        );
    }

    debug!(tokens = tokens.token_count(), "extracted token JSON");
    tokens
}
