//! # Tokenforge - Design Token Extraction and Normalization
//!
//! `tokenforge` turns loosely structured descriptions of a design system into
//! one typed token model. It reads:
//!
//! - hand-written token JSON (`{"colors": {...}, "spacing": {...}}`)
//! - Tailwind config source text, without evaluating it
//! - CSS custom properties from `:root`, plus light/dark theme stylesheets
//! - design-token exports in Tokens Studio, flat category or nested shape
//!
//! Everything here is a pure function over text or parsed JSON. There is no
//! filesystem or network access; callers hand in the content.
//!
//! ## Core Concepts
//!
//! - [`DesignTokens`]: typed tokens per category, every category optional
//! - [`SimpleDesignTokens`]: the flat `key -> string` storage form
//! - [`Classifier`]: assigns a key like `border-radius-lg` to a [`Category`]
//! - [`merge`]: combines partial results, later sources winning
//! - [`to_full_tokens`] / [`to_simple_tokens`]: convert between the two forms
//!
//! ## Quick Start
//!
//! ```rust
//! use tokenforge::{extract_css_variables, extract_tailwind_config, merge, to_simple_tokens};
//!
//! let tailwind = extract_tailwind_config(r#"
//!     module.exports = {
//!       theme: {
//!         colors: { primary: { DEFAULT: '#3b82f6', foreground: '#ffffff' } },
//!         borderRadius: { lg: '0.5rem' },
//!       },
//!     }
//! "#);
//! let css = extract_css_variables(":root { --border-color: 214 32% 91%; --radius-lg: 12px; }");
//!
//! let tokens = merge([tailwind, css]);
//! let simple = to_simple_tokens(&tokens);
//!
//! let colors = simple.colors.unwrap();
//! assert_eq!(colors["primary"], "217 91% 60%");
//! assert_eq!(colors["border-color"], "214 32% 91%");
//! assert_eq!(simple.radius.unwrap()["radius-lg"], "12px");
//! ```
//!
//! ## Simple Form
//!
//! [`SimpleDesignTokens`] is lossy. Descriptions and token types are dropped,
//! and typography or animation sub-maps that share a key collapse into one
//! entry (`fontSize.sm` and `lineHeight.sm` become a single `sm`, the later
//! sub-map winning). See [`normalize`] for the ordering.
//!
//! ## Failure Model
//!
//! Extractors never fail. Input they cannot read gives an empty or partial
//! result and a `tracing` event. Only the text entry points in [`import`]
//! return errors, for text that is not a JSON object. Whether an import
//! produced anything is checked with [`has_token_content`].
//!
//! ```rust
//! use tokenforge::{parse_token_json, ImportReport};
//!
//! let report = ImportReport::from(parse_token_json("{ invalid"));
//! assert!(!report.success);
//! ```

pub mod classify;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod import;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod value;

pub use classify::{classify, AnimationKind, Category, Classifier, ColorKeywords, TypographyKind};
pub use color::{normalize_color, to_hsl_triple};
pub use config::{ImportOptions, ThemeCssMode};
pub use error::{ConfigError, ImportError, Result};
pub use export::{detect_format, parse_export, parse_export_with, ExportFormat};
pub use extract::{
    extract_css_variables, extract_css_variables_with, extract_json, extract_tailwind_config,
    extract_theme_css,
};
pub use import::{
    extract_source, import_sources, parse_export_json, parse_token_json, require_content,
    ImportReport, Source, SourceKind,
};
pub use merge::{merge, merge_into};
pub use model::{
    has_token_content, AnimationTokens, DesignTokens, SimpleDesignTokens, Token,
    TokenCollection, TokenType, TokenValue, TypographyTokens,
};
pub use normalize::{animation_kind_for, to_full_tokens, to_simple_tokens, typography_kind_for_key};
pub use value::{extract_tokens, extract_values};
