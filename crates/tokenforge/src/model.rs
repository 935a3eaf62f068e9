//! Canonical design token model.
//!
//! Two representations exist side by side:
//!
//! - [`DesignTokens`]: typed tokens (`{ value, type, description? }`) grouped
//!   by category. This is what theming and code generation consume.
//! - [`SimpleDesignTokens`]: flat string maps per category, used for storage.
//!
//! Every category is optional in both. An absent category means no source
//! provided data for it, which is different from a present but empty map.
//!
//! Collections are `BTreeMap`s so serialized output is stable. Key order has
//! no meaning.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::{AnimationKind, Category, TypographyKind};

/// The type of a single design token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenType {
    Color,
    Dimension,
    FontFamily,
    FontWeight,
    FontSize,
    LineHeight,
    LetterSpacing,
    Shadow,
    Duration,
    CubicBezier,
    Border,
    Opacity,
}

impl TokenType {
    /// Returns the serialized name of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Color => "color",
            TokenType::Dimension => "dimension",
            TokenType::FontFamily => "fontFamily",
            TokenType::FontWeight => "fontWeight",
            TokenType::FontSize => "fontSize",
            TokenType::LineHeight => "lineHeight",
            TokenType::LetterSpacing => "letterSpacing",
            TokenType::Shadow => "shadow",
            TokenType::Duration => "duration",
            TokenType::CubicBezier => "cubicBezier",
            TokenType::Border => "border",
            TokenType::Opacity => "opacity",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token value: either a string (`"8px"`, `"221 83% 53%"`) or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    String(String),
    Number(f64),
}

impl TokenValue {
    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TokenValue::String(s) => Some(s),
            TokenValue::Number(_) => None,
        }
    }

    /// Returns the numeric value, parsing strings when possible.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            TokenValue::Number(n) => Some(*n),
            TokenValue::String(s) => s.trim().parse().ok(),
        }
    }

    /// Returns `true` if this value carries nothing usable.
    pub fn is_blank(&self) -> bool {
        match self {
            TokenValue::String(s) => s.trim().is_empty(),
            TokenValue::Number(n) => !n.is_finite(),
        }
    }

    /// Renders the value as the flat string stored in [`SimpleDesignTokens`].
    ///
    /// Whole numbers print without a fractional part (`4`, not `4.0`).
    pub fn to_simple_string(&self) -> String {
        match self {
            TokenValue::String(s) => s.clone(),
            TokenValue::Number(n) => format_number(*n),
        }
    }
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_simple_string())
    }
}

impl From<&str> for TokenValue {
    fn from(value: &str) -> Self {
        TokenValue::String(value.to_string())
    }
}

impl From<String> for TokenValue {
    fn from(value: String) -> Self {
        TokenValue::String(value)
    }
}

impl From<f64> for TokenValue {
    fn from(value: f64) -> Self {
        TokenValue::Number(value)
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// A single typed design token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub value: TokenValue,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Token {
    /// Creates a token without a description.
    pub fn new(value: impl Into<TokenValue>, token_type: TokenType) -> Self {
        Self {
            value: value.into(),
            token_type,
            description: None,
        }
    }

    /// Attaches a description, returning `self` for chaining.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Tokens of one category, keyed by token name.
pub type TokenCollection = BTreeMap<String, Token>;

/// Typography tokens, split by sub-type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypographyTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<TokenCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<TokenCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<TokenCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<TokenCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<TokenCollection>,
}

impl TypographyTokens {
    /// Returns the sub-map for `kind`.
    pub fn get(&self, kind: TypographyKind) -> Option<&TokenCollection> {
        match kind {
            TypographyKind::FontFamily => self.font_family.as_ref(),
            TypographyKind::FontSize => self.font_size.as_ref(),
            TypographyKind::FontWeight => self.font_weight.as_ref(),
            TypographyKind::LineHeight => self.line_height.as_ref(),
            TypographyKind::LetterSpacing => self.letter_spacing.as_ref(),
        }
    }

    /// Returns the mutable slot for `kind`.
    pub fn slot_mut(&mut self, kind: TypographyKind) -> &mut Option<TokenCollection> {
        match kind {
            TypographyKind::FontFamily => &mut self.font_family,
            TypographyKind::FontSize => &mut self.font_size,
            TypographyKind::FontWeight => &mut self.font_weight,
            TypographyKind::LineHeight => &mut self.line_height,
            TypographyKind::LetterSpacing => &mut self.letter_spacing,
        }
    }

    /// Total number of tokens across all sub-maps.
    pub fn token_count(&self) -> usize {
        TypographyKind::ALL
            .iter()
            .filter_map(|kind| self.get(*kind))
            .map(BTreeMap::len)
            .sum()
    }
}

/// Animation tokens, split into durations and easing curves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TokenCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<TokenCollection>,
}

impl AnimationTokens {
    pub fn get(&self, kind: AnimationKind) -> Option<&TokenCollection> {
        match kind {
            AnimationKind::Duration => self.duration.as_ref(),
            AnimationKind::Easing => self.easing.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, kind: AnimationKind) -> &mut Option<TokenCollection> {
        match kind {
            AnimationKind::Duration => &mut self.duration,
            AnimationKind::Easing => &mut self.easing,
        }
    }

    pub fn token_count(&self) -> usize {
        self.duration.as_ref().map_or(0, BTreeMap::len)
            + self.easing.as_ref().map_or(0, BTreeMap::len)
    }
}

/// The full, typed token model.
///
/// Extractors return partial values of this type (most categories `None`);
/// the [merger](crate::merge) combines them into one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<TokenCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<TokenCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "borderRadius")]
    pub radius: Option<TokenCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadows: Option<TokenCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<TypographyTokens>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationTokens>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borders: Option<TokenCollection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<TokenCollection>,
}

impl DesignTokens {
    /// Creates an empty token set with every category absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `token` under `key` in the collection for `category`.
    ///
    /// The category collection is created on first insert. Returns `false`
    /// (and stores nothing) for [`Category::Unclassified`] or a blank value,
    /// so a present key always has a non-empty value.
    pub fn insert(&mut self, category: Category, key: impl Into<String>, token: Token) -> bool {
        if token.value.is_blank() {
            return false;
        }
        let Some(slot) = self.slot_mut(category) else {
            return false;
        };
        slot.get_or_insert_with(TokenCollection::new)
            .insert(key.into(), token);
        true
    }

    /// Returns the collection for `category`, if present.
    pub fn collection(&self, category: Category) -> Option<&TokenCollection> {
        match category {
            Category::Color => self.colors.as_ref(),
            Category::Spacing => self.spacing.as_ref(),
            Category::Radius => self.radius.as_ref(),
            Category::Shadow => self.shadows.as_ref(),
            Category::Border => self.borders.as_ref(),
            Category::Opacity => self.opacity.as_ref(),
            Category::Typography(kind) => self.typography.as_ref().and_then(|t| t.get(kind)),
            Category::Animation(kind) => self.animation.as_ref().and_then(|a| a.get(kind)),
            Category::Unclassified => None,
        }
    }

    fn slot_mut(&mut self, category: Category) -> Option<&mut Option<TokenCollection>> {
        let slot = match category {
            Category::Color => &mut self.colors,
            Category::Spacing => &mut self.spacing,
            Category::Radius => &mut self.radius,
            Category::Shadow => &mut self.shadows,
            Category::Border => &mut self.borders,
            Category::Opacity => &mut self.opacity,
            Category::Typography(kind) => self
                .typography
                .get_or_insert_with(TypographyTokens::default)
                .slot_mut(kind),
            Category::Animation(kind) => self
                .animation
                .get_or_insert_with(AnimationTokens::default)
                .slot_mut(kind),
            Category::Unclassified => return None,
        };
        Some(slot)
    }

    /// Total number of tokens across every category.
    pub fn token_count(&self) -> usize {
        let flat = [
            &self.colors,
            &self.spacing,
            &self.radius,
            &self.shadows,
            &self.borders,
            &self.opacity,
        ]
        .into_iter()
        .map(|c| c.as_ref().map_or(0, BTreeMap::len))
        .sum::<usize>();

        flat + self.typography.as_ref().map_or(0, TypographyTokens::token_count)
            + self.animation.as_ref().map_or(0, AnimationTokens::token_count)
    }

    /// Returns `true` if no category holds a single token.
    pub fn is_empty(&self) -> bool {
        self.token_count() == 0
    }

    /// Lists every token as `(category path, key, token)`.
    ///
    /// Category paths use the serialized names, with sub-maps joined by a dot
    /// (`typography.fontSize`, `animation.easing`).
    pub fn entries(&self) -> Vec<(&'static str, &str, &Token)> {
        let mut out = Vec::new();
        push_entries(&mut out, "colors", self.colors.as_ref());
        push_entries(&mut out, "spacing", self.spacing.as_ref());
        push_entries(&mut out, "radius", self.radius.as_ref());
        push_entries(&mut out, "shadows", self.shadows.as_ref());
        if let Some(typography) = &self.typography {
            for kind in TypographyKind::ALL {
                push_entries(&mut out, kind.path(), typography.get(kind));
            }
        }
        if let Some(animation) = &self.animation {
            push_entries(&mut out, "animation.duration", animation.duration.as_ref());
            push_entries(&mut out, "animation.easing", animation.easing.as_ref());
        }
        push_entries(&mut out, "borders", self.borders.as_ref());
        push_entries(&mut out, "opacity", self.opacity.as_ref());
        out
    }
}

fn push_entries<'a>(
    out: &mut Vec<(&'static str, &'a str, &'a Token)>,
    path: &'static str,
    collection: Option<&'a TokenCollection>,
) {
    if let Some(collection) = collection {
        for (key, token) in collection {
            out.push((path, key.as_str(), token));
        }
    }
}

/// Returns `true` if `tokens` holds at least one token in any category.
///
/// Emptiness is not an error; callers decide what to do with it.
pub fn has_token_content(tokens: &DesignTokens) -> bool {
    !tokens.is_empty()
}

/// Flat string maps per category, the storage form of [`DesignTokens`].
///
/// Descriptions are dropped, token types collapse into category membership and
/// list-valued font families are a single comma-delimited string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleDesignTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "borderRadius")]
    pub radius: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadows: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borders: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<BTreeMap<String, f64>>,
}

impl SimpleDesignTokens {
    /// Total number of entries across every category.
    pub fn token_count(&self) -> usize {
        [
            &self.colors,
            &self.spacing,
            &self.radius,
            &self.shadows,
            &self.typography,
            &self.animation,
            &self.borders,
        ]
        .into_iter()
        .map(|c| c.as_ref().map_or(0, BTreeMap::len))
        .sum::<usize>()
            + self.opacity.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.token_count() == 0
    }
}
