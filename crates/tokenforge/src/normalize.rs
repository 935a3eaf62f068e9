//! Conversion between [`SimpleDesignTokens`] (flat storage form) and
//! [`DesignTokens`] (typed form).
//!
//! Both directions are total. Going from full to simple drops descriptions and
//! flattens the typography and animation sub-maps into one map each. Going
//! back, the sub-map is inferred from the key (and for animation, the value).
//! Typography uses the classifier's typography keywords in the same order,
//! then a few fallbacks:
//!
//! | key contains (first match wins)     | typography slot  |
//! |-------------------------------------|------------------|
//! | `font-family`                       | `fontFamily`     |
//! | `text-`, `size`                     | `fontSize`       |
//! | `weight`                            | `fontWeight`     |
//! | `leading`, then `line-height`       | `lineHeight`     |
//! | `tracking`, then `letter-spacing`   | `letterSpacing`  |
//! | `font`                              | `fontFamily`     |
//! | anything else                       | `fontSize`       |
//!
//! For every token built from value and category alone,
//! `to_simple_tokens(&to_full_tokens(&s)) == s` where `s` is itself a
//! simple projection.
//!
//! The simple form is lossy in three ways: descriptions are dropped, token
//! types collapse into the category, and typography (or animation) sub-maps
//! that share a key collapse into one entry. `fontSize.sm = 14px` next to
//! `lineHeight.sm = 20px` projects to a single `sm = 20px`, which reads back
//! as `fontSize.sm`.

use std::collections::BTreeMap;

use crate::classify::{
    normalize_key, AnimationKind, Category, TypographyKind, EASING_KEYWORDS, TYPOGRAPHY_KEYWORDS,
};
use crate::model::{DesignTokens, SimpleDesignTokens, Token, TokenCollection, TokenType, TokenValue};

/// Value prefixes that mark an animation value as an easing curve.
const EASING_VALUE_PREFIXES: &[&str] = &["cubic-bezier", "ease", "linear", "steps"];

/// Picks the typography slot for a key.
///
/// Agrees with the classifier on every key its typography branch matches.
pub fn typography_kind_for_key(key: &str) -> TypographyKind {
    let key = normalize_key(key);
    if let Some((_, kind)) = TYPOGRAPHY_KEYWORDS
        .iter()
        .find(|(keyword, _)| key.contains(keyword))
    {
        return *kind;
    }
    if key.contains("line-height") {
        TypographyKind::LineHeight
    } else if key.contains("letter-spacing") {
        TypographyKind::LetterSpacing
    } else if key.contains("font") {
        TypographyKind::FontFamily
    } else {
        TypographyKind::FontSize
    }
}

/// Picks duration or easing for an animation entry.
///
/// Easing keywords in the key, or a value that reads like a timing function,
/// mean easing. Everything else is a duration.
pub fn animation_kind_for(key: &str, value: &str) -> AnimationKind {
    let key = normalize_key(key);
    let value = value.trim().to_ascii_lowercase();
    if EASING_KEYWORDS.iter().any(|k| key.contains(k))
        || EASING_VALUE_PREFIXES.iter().any(|p| value.starts_with(p))
    {
        AnimationKind::Easing
    } else {
        AnimationKind::Duration
    }
}

/// Expands the flat storage form into typed tokens.
pub fn to_full_tokens(simple: &SimpleDesignTokens) -> DesignTokens {
    let mut tokens = DesignTokens::new();

    let flat = [
        (&simple.colors, Category::Color),
        (&simple.spacing, Category::Spacing),
        (&simple.radius, Category::Radius),
        (&simple.shadows, Category::Shadow),
        (&simple.borders, Category::Border),
    ];
    for (map, category) in flat {
        insert_strings(&mut tokens, map.as_ref(), |_, _| category);
    }

    insert_strings(&mut tokens, simple.typography.as_ref(), |key, _| {
        Category::Typography(typography_kind_for_key(key))
    });
    insert_strings(&mut tokens, simple.animation.as_ref(), |key, value| {
        Category::Animation(animation_kind_for(key, value))
    });

    if let Some(opacity) = &simple.opacity {
        for (key, value) in opacity {
            tokens.insert(
                Category::Opacity,
                key.clone(),
                Token::new(*value, TokenType::Opacity),
            );
        }
    }

    tokens
}

fn insert_strings(
    tokens: &mut DesignTokens,
    map: Option<&BTreeMap<String, String>>,
    category_for: impl Fn(&str, &str) -> Category,
) {
    let Some(map) = map else {
        return;
    };
    for (key, value) in map {
        let category = category_for(key, value);
        if let Some(token_type) = category.token_type() {
            tokens.insert(category, key.clone(), Token::new(value.as_str(), token_type));
        }
    }
}

/// Projects typed tokens into the flat storage form.
///
/// Typography sub-maps are flattened in `fontFamily, fontSize, fontWeight,
/// lineHeight, letterSpacing` order and animation in `duration, easing`
/// order; on a key collision the later sub-map wins. Opacity strings that
/// parse as numbers (`"0.5"`, `"50%"`) are kept, anything else is dropped.
pub fn to_simple_tokens(tokens: &DesignTokens) -> SimpleDesignTokens {
    let typography = tokens.typography.as_ref().and_then(|t| {
        flatten_strings(TypographyKind::ALL.iter().map(|kind| t.get(*kind)))
    });
    let animation = tokens.animation.as_ref().and_then(|a| {
        flatten_strings([a.duration.as_ref(), a.easing.as_ref()])
    });

    SimpleDesignTokens {
        colors: strings(tokens.colors.as_ref()),
        spacing: strings(tokens.spacing.as_ref()),
        radius: strings(tokens.radius.as_ref()),
        shadows: strings(tokens.shadows.as_ref()),
        typography,
        animation,
        borders: strings(tokens.borders.as_ref()),
        opacity: tokens.opacity.as_ref().and_then(opacity_numbers),
    }
}

fn strings(collection: Option<&TokenCollection>) -> Option<BTreeMap<String, String>> {
    flatten_strings([collection])
}

fn flatten_strings<'a>(
    collections: impl IntoIterator<Item = Option<&'a TokenCollection>>,
) -> Option<BTreeMap<String, String>> {
    let map: BTreeMap<String, String> = collections
        .into_iter()
        .flatten()
        .flat_map(|c| c.iter())
        .filter(|(_, token)| !token.value.is_blank())
        .map(|(key, token)| (key.clone(), token.value.to_simple_string()))
        .collect();
    (!map.is_empty()).then_some(map)
}

fn opacity_numbers(collection: &TokenCollection) -> Option<BTreeMap<String, f64>> {
    let map: BTreeMap<String, f64> = collection
        .iter()
        .filter_map(|(key, token)| opacity_value(&token.value).map(|n| (key.clone(), n)))
        .collect();
    (!map.is_empty()).then_some(map)
}

fn opacity_value(value: &TokenValue) -> Option<f64> {
    let n = match value {
        TokenValue::Number(n) => *n,
        TokenValue::String(s) => {
            let s = s.trim();
            match s.strip_suffix('%') {
                Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0,
                None => s.parse::<f64>().ok()?,
            }
        }
    };
    n.is_finite().then_some(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypographyTokens;

    fn simple_map(pairs: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_typography_kind_for_key() {
        assert_eq!(typography_kind_for_key("font-sans"), TypographyKind::FontFamily);
        assert_eq!(typography_kind_for_key("fontFamily"), TypographyKind::FontFamily);
        assert_eq!(typography_kind_for_key("font-size-lg"), TypographyKind::FontSize);
        assert_eq!(typography_kind_for_key("text-sm"), TypographyKind::FontSize);
        assert_eq!(typography_kind_for_key("font-weight-bold"), TypographyKind::FontWeight);
        assert_eq!(typography_kind_for_key("leading-tight"), TypographyKind::LineHeight);
        assert_eq!(typography_kind_for_key("lineHeight"), TypographyKind::LineHeight);
        assert_eq!(typography_kind_for_key("tracking-wide"), TypographyKind::LetterSpacing);
        assert_eq!(typography_kind_for_key("body"), TypographyKind::FontSize);
    }

    #[test]
    fn test_typography_kind_agrees_with_classifier() {
        for key in [
            "text-weight-bold",
            "text-leading",
            "font-family-sans",
            "font-weight-bold",
            "leading-tight",
            "tracking-wide",
            "text-sm",
        ] {
            let Category::Typography(kind) = crate::classify::classify(key) else {
                panic!("{key} should classify as typography");
            };
            assert_eq!(typography_kind_for_key(key), kind, "{key}");
        }
        assert_eq!(typography_kind_for_key("text-weight-bold"), TypographyKind::FontSize);
    }

    #[test]
    fn test_animation_kind_for() {
        assert_eq!(animation_kind_for("fast", "150ms"), AnimationKind::Duration);
        assert_eq!(animation_kind_for("ease-out", "whatever"), AnimationKind::Easing);
        assert_eq!(
            animation_kind_for("standard", "cubic-bezier(0.4, 0, 0.2, 1)"),
            AnimationKind::Easing
        );
        assert_eq!(animation_kind_for("smooth", "linear"), AnimationKind::Easing);
    }

    #[test]
    fn test_to_full_assigns_types() {
        let simple = SimpleDesignTokens {
            colors: simple_map(&[("primary", "221 83% 53%")]),
            spacing: simple_map(&[("sm", "8px")]),
            shadows: simple_map(&[("md", "0 4px 6px black")]),
            typography: simple_map(&[("font-sans", "Inter, sans-serif"), ("text-sm", "14px")]),
            animation: simple_map(&[("fast", "150ms"), ("ease-in", "cubic-bezier(0.4, 0, 1, 1)")]),
            opacity: Some([("disabled".to_string(), 0.5)].into_iter().collect()),
            ..Default::default()
        };
        let full = to_full_tokens(&simple);

        assert_eq!(full.colors.as_ref().unwrap()["primary"].token_type, TokenType::Color);
        assert_eq!(full.spacing.as_ref().unwrap()["sm"].token_type, TokenType::Dimension);
        assert_eq!(full.shadows.as_ref().unwrap()["md"].token_type, TokenType::Shadow);

        let typography = full.typography.as_ref().unwrap();
        assert_eq!(
            typography.font_family.as_ref().unwrap()["font-sans"].value.as_str(),
            Some("Inter, sans-serif")
        );
        assert!(typography.font_size.as_ref().unwrap().contains_key("text-sm"));

        let animation = full.animation.as_ref().unwrap();
        assert!(animation.duration.as_ref().unwrap().contains_key("fast"));
        assert_eq!(
            animation.easing.as_ref().unwrap()["ease-in"].token_type,
            TokenType::CubicBezier
        );

        assert_eq!(
            full.opacity.as_ref().unwrap()["disabled"].value.as_number(),
            Some(0.5)
        );
    }

    #[test]
    fn test_to_simple_drops_descriptions_and_flattens() {
        let mut full = DesignTokens::new();
        full.insert(
            Category::Color,
            "primary",
            Token::new("221 83% 53%", TokenType::Color).with_description("brand"),
        );
        full.typography = Some(TypographyTokens {
            font_weight: Some(
                [("bold".to_string(), Token::new(700.0, TokenType::FontWeight))]
                    .into_iter()
                    .collect(),
            ),
            ..Default::default()
        });

        let simple = to_simple_tokens(&full);
        assert_eq!(simple.colors, simple_map(&[("primary", "221 83% 53%")]));
        assert_eq!(simple.typography, simple_map(&[("bold", "700")]));
        assert!(simple.spacing.is_none());
    }

    #[test]
    fn test_shared_typography_key_collapses() {
        let mut full = DesignTokens::new();
        full.insert(
            Category::Typography(TypographyKind::FontSize),
            "sm",
            Token::new("14px", TokenType::FontSize),
        );
        full.insert(
            Category::Typography(TypographyKind::LineHeight),
            "sm",
            Token::new("20px", TokenType::LineHeight),
        );

        let simple = to_simple_tokens(&full);
        assert_eq!(simple.typography, simple_map(&[("sm", "20px")]));

        let back = to_full_tokens(&simple);
        let typography = back.typography.unwrap();
        assert_eq!(typography.font_size.unwrap()["sm"].value.as_str(), Some("20px"));
        assert!(typography.line_height.is_none());
    }

    #[test]
    fn test_opacity_strings() {
        let mut full = DesignTokens::new();
        full.insert(Category::Opacity, "half", Token::new("0.5", TokenType::Opacity));
        full.insert(Category::Opacity, "pct", Token::new("25%", TokenType::Opacity));
        full.insert(Category::Opacity, "bad", Token::new("ghost", TokenType::Opacity));

        let opacity = to_simple_tokens(&full).opacity.unwrap();
        assert_eq!(opacity.len(), 2);
        assert_eq!(opacity["half"], 0.5);
        assert_eq!(opacity["pct"], 0.25);
    }

    #[test]
    fn test_empty_categories_stay_absent() {
        let mut full = DesignTokens::new();
        full.colors = Some(TokenCollection::new());
        let simple = to_simple_tokens(&full);
        assert!(simple.colors.is_none());
        assert!(to_full_tokens(&SimpleDesignTokens::default()).is_empty());
    }

    #[test]
    fn test_round_trip_on_simple_projection() {
        let simple = SimpleDesignTokens {
            colors: simple_map(&[("primary", "221 83% 53%"), ("muted", "#eee")]),
            radius: simple_map(&[("lg", "0.5rem")]),
            typography: simple_map(&[("bold", "700"), ("font-mono", "JetBrains Mono")]),
            borders: simple_map(&[("thin", "1px solid")]),
            ..Default::default()
        };
        let once = to_simple_tokens(&to_full_tokens(&simple));
        assert_eq!(once, simple);
        assert_eq!(to_simple_tokens(&to_full_tokens(&once)), once);
    }
}
