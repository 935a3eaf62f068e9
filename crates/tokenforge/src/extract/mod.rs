//! Format extractors.
//!
//! Each extractor turns one kind of raw input into a partial
//! [`DesignTokens`]. None of them fail: input they cannot read yields an
//! empty or partial result and a `tracing` event.
//!
//! | Input                        | Extractor                                   |
//! |------------------------------|---------------------------------------------|
//! | Hand-written token JSON      | [`extract_json`]                            |
//! | Tailwind config source text  | [`extract_tailwind_config`]                 |
//! | CSS custom properties        | [`extract_css_variables`]                   |
//! | Light/dark theme CSS         | [`extract_theme_css`]                       |

pub mod css;
pub mod json;
pub mod scan;
pub mod tailwind;

pub use css::{
    collect_custom_properties, extract_css_variables, extract_css_variables_with,
    extract_theme_css, CustomProperty, ThemeScope,
};
pub use json::extract_json;
pub use tailwind::extract_tailwind_config;

use serde_json::{Map, Value};

use crate::classify::{AnimationKind, Category, TypographyKind};
use crate::model::DesignTokens;
use crate::normalize::{animation_kind_for, typography_kind_for_key};
use crate::value::{flatten_entry, flatten_leaves, leaf_payload, leaf_token, scalar_text, Leaf};

/// Returns `map[name]` when it is an object.
pub(crate) fn object_field<'a>(
    map: &'a Map<String, Value>,
    name: &str,
) -> Option<&'a Map<String, Value>> {
    map.get(name).and_then(Value::as_object)
}

/// Inserts every leaf into `category`. Returns the number stored.
pub(crate) fn insert_leaves(
    tokens: &mut DesignTokens,
    leaves: Vec<Leaf<'_>>,
    category: Category,
) -> usize {
    let Some(token_type) = category.token_type() else {
        return 0;
    };
    let mut stored = 0;
    for leaf in leaves {
        if let Some(token) = leaf_token(&leaf, token_type) {
            if tokens.insert(category, leaf.key, token) {
                stored += 1;
            }
        }
    }
    stored
}

/// Flattens a whole category object and inserts it into `category`.
pub(crate) fn insert_category(
    tokens: &mut DesignTokens,
    map: &Map<String, Value>,
    category: Category,
) -> usize {
    let mut leaves = Vec::new();
    flatten_leaves(map, None, 0, &mut leaves);
    insert_leaves(tokens, leaves, category)
}

/// Splits a category object into leaves of named sub-maps and loose leaves.
///
/// `{ "fontFamily": { "sans": "Inter" }, "body": "16px" }` yields
/// `(Some(FontFamily), sans)` and `(None, body)`. Sub-map leaves keep their
/// own keys without the group name.
fn grouped_leaves<'a, K: Copy>(
    map: &'a Map<String, Value>,
    group_kind: impl Fn(&str) -> Option<K>,
) -> Vec<(Option<K>, Leaf<'a>)> {
    let mut out = Vec::new();
    for (key, raw) in map {
        let mut leaves = Vec::new();
        let kind = match (group_kind(key), raw) {
            (Some(kind), Value::Object(group)) if leaf_payload(group).is_none() => {
                flatten_leaves(group, None, 1, &mut leaves);
                Some(kind)
            }
            _ => {
                flatten_entry(key, raw, None, 0, &mut leaves);
                None
            }
        };
        out.extend(leaves.into_iter().map(|leaf| (kind, leaf)));
    }
    out
}

/// Inserts a typography object: known sub-maps (`fontFamily`, `fontSize`,
/// `fontWeight`, `lineHeight`, `letterSpacing`) go to their slot, loose keys
/// are placed with [`typography_kind_for_key`].
pub(crate) fn insert_typography(tokens: &mut DesignTokens, map: &Map<String, Value>) -> usize {
    let mut stored = 0;
    for (kind, leaf) in grouped_leaves(map, TypographyKind::from_field_name) {
        let kind = kind.unwrap_or_else(|| typography_kind_for_key(&leaf.key));
        stored += insert_leaves(tokens, vec![leaf], Category::Typography(kind));
    }
    stored
}

/// Inserts an animation object: `duration` and `easing` sub-maps go to their
/// slot, loose keys are placed with [`animation_kind_for`].
pub(crate) fn insert_animation(tokens: &mut DesignTokens, map: &Map<String, Value>) -> usize {
    let group_kind = |name: &str| match name {
        "duration" | "durations" => Some(AnimationKind::Duration),
        "easing" | "easings" | "timing" => Some(AnimationKind::Easing),
        _ => None,
    };
    let mut stored = 0;
    for (kind, leaf) in grouped_leaves(map, group_kind) {
        let kind = kind.unwrap_or_else(|| {
            let text = scalar_text(leaf.value).unwrap_or_default();
            animation_kind_for(&leaf.key, &text)
        });
        stored += insert_leaves(tokens, vec![leaf], Category::Animation(kind));
    }
    stored
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_insert_typography_groups_and_loose_keys() {
        let map = object(json!({
            "fontFamily": { "sans": ["Inter", "sans-serif"] },
            "fontWeight": { "bold": 700 },
            "leading-tight": "1.25",
            "body": { "value": "16px" },
        }));
        let mut tokens = DesignTokens::new();
        assert_eq!(insert_typography(&mut tokens, &map), 4);

        let typography = tokens.typography.unwrap();
        assert_eq!(
            typography.font_family.unwrap()["sans"].value.as_str(),
            Some("Inter, sans-serif")
        );
        assert_eq!(typography.font_weight.unwrap()["bold"].value.as_str(), Some("700"));
        assert!(typography.line_height.unwrap().contains_key("leading-tight"));
        assert!(typography.font_size.unwrap().contains_key("body"));
    }

    #[test]
    fn test_insert_animation() {
        let map = object(json!({
            "duration": { "fast": "150ms" },
            "standard": "cubic-bezier(0.4, 0, 0.2, 1)",
            "slow": "500ms",
        }));
        let mut tokens = DesignTokens::new();
        assert_eq!(insert_animation(&mut tokens, &map), 3);

        let animation = tokens.animation.unwrap();
        let duration = animation.duration.unwrap();
        assert!(duration.contains_key("fast"));
        assert!(duration.contains_key("slow"));
        assert!(animation.easing.unwrap().contains_key("standard"));
    }

    #[test]
    fn test_insert_category_flattens() {
        let map = object(json!({ "blue": { "100": "#dbeafe", "500": { "value": "#3b82f6" } } }));
        let mut tokens = DesignTokens::new();
        assert_eq!(insert_category(&mut tokens, &map, Category::Color), 2);
        let colors = tokens.colors.unwrap();
        assert_eq!(colors["blue-500"].value.as_str(), Some("217 91% 60%"));
    }
}
