//! Design-token export JSON.
//!
//! Three shapes are recognized, checked in this order:
//!
//! 1. **Tokens Studio**: a `$themes` or `global` key. The `global` set is
//!    used when present, otherwise the set the first theme points at.
//! 2. **Simple**: any of `colors`, `spacing` or `typography` at the top level.
//! 3. **Nested**: anything else. The tree is flattened (`brand.primary.500`
//!    becomes `brand-primary-500`) and every key goes through the
//!    [classifier](crate::classify). Only colors, spacing, radius and shadows
//!    are kept from this shape.
//!
//! Parsing never fails. Input that yields nothing gives an empty
//! [`DesignTokens`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::classify::{Category, Classifier};
use crate::error::json_kind;
use crate::extract::{
    insert_animation, insert_category, insert_leaves, insert_typography, object_field,
};
use crate::model::DesignTokens;
use crate::value::flatten_leaves;

/// Category objects read from Tokens Studio sets and simple exports. The
/// first key found wins.
const EXPORT_CATEGORIES: &[(&[&str], Category)] = &[
    (&["colors", "color"], Category::Color),
    (&["spacing", "space"], Category::Spacing),
    (&["borderRadius", "radii", "radius"], Category::Radius),
    (&["boxShadow", "shadows"], Category::Shadow),
];

/// Extra category objects read from simple exports only.
const SIMPLE_ONLY_CATEGORIES: &[(&[&str], Category)] = &[
    (&["borders", "borderWidth"], Category::Border),
    (&["opacity"], Category::Opacity),
];

/// Categories kept from the nested fallback.
const NESTED_CATEGORIES: &[Category] = &[
    Category::Color,
    Category::Spacing,
    Category::Radius,
    Category::Shadow,
];

/// Shape of an export document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    TokensStudio,
    Simple,
    Nested,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::TokensStudio => "tokens-studio",
            ExportFormat::Simple => "simple",
            ExportFormat::Nested => "nested",
        })
    }
}

/// Detects the export shape, or `None` when `input` is not an object.
pub fn detect_format(input: &Value) -> Option<ExportFormat> {
    let root = input.as_object()?;
    let format = if root.contains_key("$themes") || root.contains_key("global") {
        ExportFormat::TokensStudio
    } else if ["colors", "spacing", "typography"]
        .iter()
        .any(|key| root.contains_key(*key))
    {
        ExportFormat::Simple
    } else {
        ExportFormat::Nested
    };
    Some(format)
}

/// Parses an export document with the default classifier.
pub fn parse_export(input: &Value) -> DesignTokens {
    parse_export_with(input, &Classifier::new())
}

/// Parses an export document, classifying nested keys with `classifier`.
pub fn parse_export_with(input: &Value, classifier: &Classifier) -> DesignTokens {
    let Some(format) = detect_format(input) else {
        debug!(found = json_kind(input), "export is not an object");
        return DesignTokens::new();
    };
    let Some(root) = input.as_object() else {
        return DesignTokens::new();
    };
    debug!(%format, "detected export format");

    let tokens = match format {
        ExportFormat::TokensStudio => match tokens_studio_set(root) {
            Some(set) => {
                let mut tokens = DesignTokens::new();
                insert_categories(&mut tokens, set, EXPORT_CATEGORIES);
                tokens
            }
            None => {
                debug!("no token set found in Tokens Studio export");
                DesignTokens::new()
            }
        },
        ExportFormat::Simple => parse_simple(root),
        ExportFormat::Nested => parse_nested(root, classifier),
    };

    if tokens.is_empty() {
        debug!(%format, "export yielded no tokens");
    }
    tokens
}

/// Picks the token set a Tokens Studio export describes.
///
/// `global` wins. Otherwise `$themes` is consulted: as an object its first
/// object-valued entry is the set; as an array the first theme's
/// `selectedTokenSets` names the set: the first `enabled` one, or the first
/// `source` one when none is enabled. If that lookup fails, the first
/// object-valued top-level set is used.
fn tokens_studio_set(root: &Map<String, Value>) -> Option<&Map<String, Value>> {
    if let Some(global) = object_field(root, "global") {
        return Some(global);
    }

    let selected = match root.get("$themes") {
        Some(Value::Object(themes)) => themes.values().find_map(Value::as_object),
        Some(Value::Array(themes)) => themes
            .first()
            .and_then(Value::as_object)
            .and_then(|theme| object_field(theme, "selectedTokenSets"))
            .and_then(|sets| {
                selected_set(root, sets, "enabled").or_else(|| selected_set(root, sets, "source"))
            }),
        _ => None,
    };

    selected.or_else(|| {
        root.iter()
            .filter(|(key, _)| !key.starts_with('$'))
            .find_map(|(_, value)| value.as_object())
    })
}

fn selected_set<'a>(
    root: &'a Map<String, Value>,
    sets: &Map<String, Value>,
    status: &str,
) -> Option<&'a Map<String, Value>> {
    sets.iter()
        .filter(|(_, value)| value.as_str() == Some(status))
        .find_map(|(name, _)| object_field(root, name))
}

fn insert_categories(
    tokens: &mut DesignTokens,
    set: &Map<String, Value>,
    categories: &[(&[&str], Category)],
) {
    for (names, category) in categories {
        if let Some(map) = names.iter().find_map(|name| object_field(set, name)) {
            let stored = insert_category(tokens, map, *category);
            debug!(category = %category, stored, "export category");
        }
    }
}

fn parse_simple(root: &Map<String, Value>) -> DesignTokens {
    let mut tokens = DesignTokens::new();
    insert_categories(&mut tokens, root, EXPORT_CATEGORIES);
    insert_categories(&mut tokens, root, SIMPLE_ONLY_CATEGORIES);
    if let Some(typography) = object_field(root, "typography") {
        insert_typography(&mut tokens, typography);
    }
    if let Some(animation) = object_field(root, "animation") {
        insert_animation(&mut tokens, animation);
    }
    tokens
}

fn parse_nested(root: &Map<String, Value>, classifier: &Classifier) -> DesignTokens {
    let mut leaves = Vec::new();
    flatten_leaves(root, None, 0, &mut leaves);

    let mut tokens = DesignTokens::new();
    let mut skipped = 0usize;
    for leaf in leaves {
        let category = classifier.classify(&leaf.key);
        if NESTED_CATEGORIES.contains(&category) {
            insert_leaves(&mut tokens, vec![leaf], category);
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        debug!(skipped, "nested export keys outside structural categories");
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ColorKeywords;
    use crate::model::TokenCollection;
    use serde_json::json;

    fn value<'a>(collection: &'a Option<TokenCollection>, key: &str) -> Option<&'a str> {
        collection.as_ref()?.get(key)?.value.as_str()
    }

    // =========================================================================
    // Detection
    // =========================================================================

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(&json!({ "global": {} })),
            Some(ExportFormat::TokensStudio)
        );
        assert_eq!(
            detect_format(&json!({ "$themes": [], "core": {} })),
            Some(ExportFormat::TokensStudio)
        );
        assert_eq!(
            detect_format(&json!({ "typography": {} })),
            Some(ExportFormat::Simple)
        );
        assert_eq!(detect_format(&json!({ "brand": {} })), Some(ExportFormat::Nested));
        assert_eq!(detect_format(&json!([1])), None);
    }

    // =========================================================================
    // Tokens Studio
    // =========================================================================

    #[test]
    fn test_tokens_studio_global() {
        let tokens = parse_export(&json!({
            "global": {
                "color": {
                    "primary": { "value": "#3b82f6", "type": "color" },
                    "gray": { "100": { "value": "#f3f4f6", "type": "color" } },
                },
                "spacing": { "sm": { "value": "8", "type": "spacing" } },
                "borderRadius": { "lg": { "value": "12px", "type": "borderRadius" } },
                "boxShadow": {
                    "md": {
                        "value": { "x": "0", "y": "4", "blur": "6", "spread": "-1", "color": "#0000001a", "type": "dropShadow" },
                        "type": "boxShadow",
                    },
                },
            },
            "$themes": [],
        }));

        assert_eq!(value(&tokens.colors, "primary"), Some("217 91% 60%"));
        assert_eq!(value(&tokens.colors, "gray-100"), Some("220 14% 96%"));
        assert_eq!(value(&tokens.spacing, "sm"), Some("8"));
        assert_eq!(value(&tokens.radius, "lg"), Some("12px"));
        assert_eq!(value(&tokens.shadows, "md"), Some("0 4px 6px -1px #0000001a"));
    }

    #[test]
    fn test_tokens_studio_selected_set() {
        let tokens = parse_export(&json!({
            "core": { "colors": { "primary": { "value": "0 0% 0%" } } },
            "brand": { "colors": { "primary": { "value": "0 0% 100%" } } },
            "$themes": [
                { "name": "Brand", "selectedTokenSets": { "core": "disabled", "brand": "enabled" } },
            ],
        }));
        assert_eq!(value(&tokens.colors, "primary"), Some("0 0% 100%"));
    }

    #[test]
    fn test_tokens_studio_enabled_set_beats_source() {
        let tokens = parse_export(&json!({
            "core": { "colors": { "primary": { "value": "0 0% 0%" } } },
            "brand": { "colors": { "primary": { "value": "0 0% 100%" } } },
            "$themes": [
                { "name": "Brand", "selectedTokenSets": { "core": "source", "brand": "enabled" } },
            ],
        }));
        assert_eq!(value(&tokens.colors, "primary"), Some("0 0% 100%"));
    }

    #[test]
    fn test_tokens_studio_source_set_when_none_enabled() {
        let tokens = parse_export(&json!({
            "brand": { "colors": { "primary": { "value": "0 0% 100%" } } },
            "core": { "colors": { "primary": { "value": "0 0% 0%" } } },
            "$themes": [
                { "name": "Core", "selectedTokenSets": { "brand": "disabled", "core": "source" } },
            ],
        }));
        assert_eq!(value(&tokens.colors, "primary"), Some("0 0% 0%"));
    }

    #[test]
    fn test_tokens_studio_theme_object() {
        let tokens = parse_export(&json!({
            "$themes": { "light": { "space": { "md": "16px" } } },
        }));
        assert_eq!(value(&tokens.spacing, "md"), Some("16px"));
    }

    #[test]
    fn test_tokens_studio_fallback_to_first_set() {
        let tokens = parse_export(&json!({
            "$themes": [],
            "$metadata": { "tokenSetOrder": ["core"] },
            "core": { "radii": { "sm": "4px" } },
        }));
        assert_eq!(value(&tokens.radius, "sm"), Some("4px"));
    }

    // =========================================================================
    // Simple
    // =========================================================================

    #[test]
    fn test_simple_format() {
        let tokens = parse_export(&json!({
            "colors": { "primary": "221 83% 53%" },
            "spacing": { "4": "1rem" },
            "typography": {
                "fontFamily": { "sans": ["Inter", "sans-serif"] },
                "fontSize": { "base": "16px" },
            },
            "animation": { "fast": "150ms", "ease-out": "cubic-bezier(0, 0, 0.2, 1)" },
            "borders": { "thin": "1px solid" },
            "opacity": { "disabled": 0.5 },
        }));
        assert_eq!(value(&tokens.colors, "primary"), Some("221 83% 53%"));
        assert_eq!(value(&tokens.spacing, "4"), Some("1rem"));

        let typography = tokens.typography.as_ref().unwrap();
        assert_eq!(value(&typography.font_family, "sans"), Some("Inter, sans-serif"));
        assert_eq!(value(&typography.font_size, "base"), Some("16px"));

        let animation = tokens.animation.as_ref().unwrap();
        assert_eq!(value(&animation.duration, "fast"), Some("150ms"));
        assert!(animation.easing.as_ref().unwrap().contains_key("ease-out"));

        assert_eq!(value(&tokens.borders, "thin"), Some("1px solid"));
        assert_eq!(
            tokens.opacity.as_ref().unwrap()["disabled"].value.as_number(),
            Some(0.5)
        );
    }

    // =========================================================================
    // Nested
    // =========================================================================

    #[test]
    fn test_nested_primary_color() {
        let tokens = parse_export(&json!({
            "brand": { "primaryColor": { "value": "221 83% 53%" } },
        }));
        assert_eq!(value(&tokens.colors, "brand-primaryColor"), Some("221 83% 53%"));
        assert_eq!(tokens.token_count(), 1);
    }

    #[test]
    fn test_nested_keeps_structural_categories_only() {
        let tokens = parse_export(&json!({
            "theme": {
                "radius": { "md": "6px" },
                "shadow": { "sm": "0 1px 2px black" },
                "gap": { "sm": "4px" },
                "font-family": { "body": "Inter" },
                "opacity": { "half": 0.5 },
                "misc": { "thing": "x" },
            },
        }));
        assert_eq!(value(&tokens.radius, "theme-radius-md"), Some("6px"));
        assert_eq!(value(&tokens.shadows, "theme-shadow-sm"), Some("0 1px 2px black"));
        assert_eq!(value(&tokens.spacing, "theme-gap-sm"), Some("4px"));
        assert!(tokens.typography.is_none());
        assert!(tokens.opacity.is_none());
        assert_eq!(tokens.token_count(), 3);
    }

    #[test]
    fn test_nested_with_semantic_roles() {
        let input = json!({ "palette": { "primary": "#000000" } });
        assert!(parse_export(&input).is_empty());

        let classifier = Classifier::new().with_color_keywords(ColorKeywords::SemanticRoles);
        let tokens = parse_export_with(&input, &classifier);
        assert_eq!(value(&tokens.colors, "palette-primary"), Some("0 0% 0%"));
    }

    #[test]
    fn test_no_data_is_empty() {
        assert!(parse_export(&json!({})).is_empty());
        assert!(parse_export(&json!(null)).is_empty());
        assert!(parse_export(&json!({ "global": "oops" })).is_empty());
    }
}
