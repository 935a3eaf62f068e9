//! Merging of partial extraction results.
//!
//! Sources are applied in order. Within each category a later source
//! overwrites keys from earlier ones; categories a source does not carry are
//! left alone. Typography and animation are merged per sub-map.
//!
//! ```rust
//! use tokenforge::{merge, Category, DesignTokens, Token, TokenType};
//!
//! let mut tailwind = DesignTokens::new();
//! tailwind.insert(Category::Color, "primary", Token::new("0 0% 0%", TokenType::Color));
//!
//! let mut css = DesignTokens::new();
//! css.insert(Category::Color, "primary", Token::new("0 0% 100%", TokenType::Color));
//! css.insert(Category::Spacing, "sm", Token::new("8px", TokenType::Dimension));
//!
//! let merged = merge([tailwind, css]);
//! assert_eq!(merged.colors.unwrap()["primary"].value.as_str(), Some("0 0% 100%"));
//! assert!(merged.spacing.is_some());
//! ```

use crate::model::{AnimationTokens, DesignTokens, TokenCollection, TypographyTokens};

/// Merges `sources` in order, later sources taking precedence.
pub fn merge(sources: impl IntoIterator<Item = DesignTokens>) -> DesignTokens {
    sources.into_iter().fold(DesignTokens::new(), |mut acc, source| {
        merge_into(&mut acc, source);
        acc
    })
}

/// Merges `source` into `target`, `source` taking precedence.
pub fn merge_into(target: &mut DesignTokens, source: DesignTokens) {
    let DesignTokens {
        colors,
        spacing,
        radius,
        shadows,
        typography,
        animation,
        borders,
        opacity,
    } = source;

    merge_collection(&mut target.colors, colors);
    merge_collection(&mut target.spacing, spacing);
    merge_collection(&mut target.radius, radius);
    merge_collection(&mut target.shadows, shadows);
    merge_collection(&mut target.borders, borders);
    merge_collection(&mut target.opacity, opacity);

    if let Some(source) = typography {
        let target = target.typography.get_or_insert_with(TypographyTokens::default);
        merge_collection(&mut target.font_family, source.font_family);
        merge_collection(&mut target.font_size, source.font_size);
        merge_collection(&mut target.font_weight, source.font_weight);
        merge_collection(&mut target.line_height, source.line_height);
        merge_collection(&mut target.letter_spacing, source.letter_spacing);
    }

    if let Some(source) = animation {
        let target = target.animation.get_or_insert_with(AnimationTokens::default);
        merge_collection(&mut target.duration, source.duration);
        merge_collection(&mut target.easing, source.easing);
    }
}

fn merge_collection(target: &mut Option<TokenCollection>, source: Option<TokenCollection>) {
    let Some(source) = source else {
        return;
    };
    match target {
        Some(target) => target.extend(source),
        None => *target = Some(source),
    }
}
