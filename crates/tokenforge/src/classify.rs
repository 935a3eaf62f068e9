//! Heuristic key classification.
//!
//! Token sources share no schema, so a flattened key such as
//! `brand-primaryColor` or `border-radius-lg` is assigned to a category by
//! keyword matching. The keyword sets below are evaluated in a fixed priority
//! order; the first set that matches wins:
//!
//! | Priority | Category | Keywords |
//! |----------|----------|----------|
//! | 1 | shadow | `shadow` |
//! | 2 | radius | `radius`, `radii` |
//! | 3 | spacing | `space`, `spacing`, `gap`, `padding`, `margin`, purely numeric keys |
//! | 4 | color | `color`, `background`, `foreground`, `border` |
//! | 5 | typography | `font-family`, `text-`, `size`, `weight`, `leading`, `tracking` |
//! | 6 | opacity | `opacity`, `alpha` |
//! | 7 | animation | `duration`, `delay`, `easing`, `ease`, `timing`, `bezier` |
//! | 8 | border | `stroke`, `outline` |
//!
//! Radius is checked before color so `border-radius-lg` is a radius even
//! though it contains `border`.
//!
//! Keys are lowercased and camelCase/snake_case boundaries become `-` before
//! matching, so `fontFamily` and `font_family` both match `font-family`.
//!
//! # Semantic color roles
//!
//! The legacy color keyword set does not match role names like `primary` or
//! `destructive`. [`ColorKeywords::SemanticRoles`] adds those names to the
//! color slot; [`classify`] always uses [`ColorKeywords::Legacy`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::TokenType;

pub const SHADOW_KEYWORDS: &[&str] = &["shadow"];
pub const RADIUS_KEYWORDS: &[&str] = &["radius", "radii"];
pub const SPACING_KEYWORDS: &[&str] = &["space", "spacing", "gap", "padding", "margin"];
pub const COLOR_KEYWORDS: &[&str] = &["color", "background", "foreground", "border"];

/// Role names treated as colors under [`ColorKeywords::SemanticRoles`].
pub const SEMANTIC_COLOR_ROLES: &[&str] = &[
    "primary",
    "secondary",
    "accent",
    "muted",
    "destructive",
    "success",
    "warning",
    "info",
    "ring",
    "input",
    "card",
    "popover",
    "chart",
];

/// Typography keywords, checked in order.
pub const TYPOGRAPHY_KEYWORDS: &[(&str, TypographyKind)] = &[
    ("font-family", TypographyKind::FontFamily),
    ("text-", TypographyKind::FontSize),
    ("size", TypographyKind::FontSize),
    ("weight", TypographyKind::FontWeight),
    ("leading", TypographyKind::LineHeight),
    ("tracking", TypographyKind::LetterSpacing),
];

pub const OPACITY_KEYWORDS: &[&str] = &["opacity", "alpha"];
pub const DURATION_KEYWORDS: &[&str] = &["duration", "delay"];
pub const EASING_KEYWORDS: &[&str] = &["easing", "ease", "timing", "bezier"];
pub const BORDER_KEYWORDS: &[&str] = &["stroke", "outline"];

/// Typography sub-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypographyKind {
    FontFamily,
    FontSize,
    FontWeight,
    LineHeight,
    LetterSpacing,
}

impl TypographyKind {
    /// All sub-types, in the order they are merged and flattened.
    pub const ALL: [TypographyKind; 5] = [
        TypographyKind::FontFamily,
        TypographyKind::FontSize,
        TypographyKind::FontWeight,
        TypographyKind::LineHeight,
        TypographyKind::LetterSpacing,
    ];

    pub fn token_type(self) -> TokenType {
        match self {
            TypographyKind::FontFamily => TokenType::FontFamily,
            TypographyKind::FontSize => TokenType::FontSize,
            TypographyKind::FontWeight => TokenType::FontWeight,
            TypographyKind::LineHeight => TokenType::LineHeight,
            TypographyKind::LetterSpacing => TokenType::LetterSpacing,
        }
    }

    /// Serialized field name of the sub-map (`fontFamily`, ...).
    pub fn field_name(self) -> &'static str {
        self.token_type().as_str()
    }

    /// Dotted category path (`typography.fontFamily`, ...).
    pub fn path(self) -> &'static str {
        match self {
            TypographyKind::FontFamily => "typography.fontFamily",
            TypographyKind::FontSize => "typography.fontSize",
            TypographyKind::FontWeight => "typography.fontWeight",
            TypographyKind::LineHeight => "typography.lineHeight",
            TypographyKind::LetterSpacing => "typography.letterSpacing",
        }
    }

    /// Looks up a sub-type by its serialized field name.
    pub fn from_field_name(name: &str) -> Option<Self> {
        TypographyKind::ALL
            .into_iter()
            .find(|kind| kind.field_name() == name)
    }
}

/// Animation sub-type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationKind {
    Duration,
    Easing,
}

impl AnimationKind {
    pub fn token_type(self) -> TokenType {
        match self {
            AnimationKind::Duration => TokenType::Duration,
            AnimationKind::Easing => TokenType::CubicBezier,
        }
    }
}

/// Semantic category a token key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Color,
    Spacing,
    Radius,
    Shadow,
    Typography(TypographyKind),
    Animation(AnimationKind),
    Border,
    Opacity,
    Unclassified,
}

impl Category {
    /// Token type stored for this category, `None` when unclassified.
    pub fn token_type(self) -> Option<TokenType> {
        match self {
            Category::Color => Some(TokenType::Color),
            Category::Spacing | Category::Radius => Some(TokenType::Dimension),
            Category::Shadow => Some(TokenType::Shadow),
            Category::Typography(kind) => Some(kind.token_type()),
            Category::Animation(kind) => Some(kind.token_type()),
            Category::Border => Some(TokenType::Border),
            Category::Opacity => Some(TokenType::Opacity),
            Category::Unclassified => None,
        }
    }

    pub fn is_classified(self) -> bool {
        self != Category::Unclassified
    }

    /// Category path as it appears in serialized [`DesignTokens`](crate::DesignTokens).
    pub fn path(self) -> &'static str {
        match self {
            Category::Color => "colors",
            Category::Spacing => "spacing",
            Category::Radius => "radius",
            Category::Shadow => "shadows",
            Category::Typography(kind) => kind.path(),
            Category::Animation(AnimationKind::Duration) => "animation.duration",
            Category::Animation(AnimationKind::Easing) => "animation.easing",
            Category::Border => "borders",
            Category::Opacity => "opacity",
            Category::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Which keyword set backs the color slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorKeywords {
    /// `color`, `background`, `foreground`, `border` only.
    #[default]
    Legacy,
    /// Legacy keywords plus [`SEMANTIC_COLOR_ROLES`].
    SemanticRoles,
}

/// Key classifier with a configurable color keyword set.
///
/// # Example
///
/// ```rust
/// use tokenforge::classify::{Category, Classifier, ColorKeywords};
///
/// let legacy = Classifier::new();
/// assert_eq!(legacy.classify("primary"), Category::Unclassified);
///
/// let roles = Classifier::new().with_color_keywords(ColorKeywords::SemanticRoles);
/// assert_eq!(roles.classify("primary"), Category::Color);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classifier {
    color_keywords: ColorKeywords,
}

impl Classifier {
    pub const fn new() -> Self {
        Self {
            color_keywords: ColorKeywords::Legacy,
        }
    }

    pub const fn with_color_keywords(self, color_keywords: ColorKeywords) -> Self {
        Self { color_keywords }
    }

    pub fn color_keywords(&self) -> ColorKeywords {
        self.color_keywords
    }

    /// Assigns `key` to a category. Same key, same answer.
    pub fn classify(&self, key: &str) -> Category {
        let key = normalize_key(key);
        let key = key.as_str();

        if contains_any(key, SHADOW_KEYWORDS) {
            return Category::Shadow;
        }
        if contains_any(key, RADIUS_KEYWORDS) {
            return Category::Radius;
        }
        if contains_any(key, SPACING_KEYWORDS) || is_numeric_key(key) {
            return Category::Spacing;
        }
        if contains_any(key, COLOR_KEYWORDS)
            || (self.color_keywords == ColorKeywords::SemanticRoles
                && contains_any(key, SEMANTIC_COLOR_ROLES))
        {
            return Category::Color;
        }
        if let Some((_, kind)) = TYPOGRAPHY_KEYWORDS
            .iter()
            .find(|(keyword, _)| key.contains(keyword))
        {
            return Category::Typography(*kind);
        }
        if contains_any(key, OPACITY_KEYWORDS) {
            return Category::Opacity;
        }
        if contains_any(key, DURATION_KEYWORDS) {
            return Category::Animation(AnimationKind::Duration);
        }
        if contains_any(key, EASING_KEYWORDS) {
            return Category::Animation(AnimationKind::Easing);
        }
        if contains_any(key, BORDER_KEYWORDS) {
            return Category::Border;
        }
        Category::Unclassified
    }
}

/// Classifies `key` with the legacy keyword sets.
pub fn classify(key: &str) -> Category {
    Classifier::new().classify(key)
}

fn contains_any(key: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| key.contains(keyword))
}

/// Digits with at most one decimal point (`4`, `0.5`, `96`).
fn is_numeric_key(key: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;
    for c in key.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// Lowercases `key` and turns camelCase humps and underscores into `-`.
pub(crate) fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for c in key.trim().chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else if c == '_' {
            out.push('-');
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}
