//! Import options.
//!
//! Every field has a default, so an empty document is a valid configuration:
//!
//! ```yaml
//! # Inputs larger than this are skipped.
//! max_input_bytes: 2097152
//! # Treat primary/secondary/accent/... as color keys.
//! semantic_color_roles: false
//! # When to read CSS files as light/dark themes: auto | always | never
//! theme_css: auto
//! ```

use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, ColorKeywords};
use crate::error::ConfigError;

/// Default cap on the size of a single input.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 2 * 1024 * 1024;

/// When CSS sources are also read as a light/dark theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeCssMode {
    /// Only when the stylesheet declares a dark scope (`.dark` or a dark
    /// media query).
    #[default]
    Auto,
    Always,
    Never,
}

/// Options for the multi-source [import pipeline](crate::import).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportOptions {
    pub max_input_bytes: usize,
    pub semantic_color_roles: bool,
    pub theme_css: ThemeCssMode,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            semantic_color_roles: false,
            theme_css: ThemeCssMode::Auto,
        }
    }
}

impl ImportOptions {
    /// Parses options from a YAML document.
    ///
    /// ```rust
    /// use tokenforge::{ImportOptions, ThemeCssMode};
    ///
    /// let options = ImportOptions::from_yaml("theme_css: never").unwrap();
    /// assert_eq!(options.theme_css, ThemeCssMode::Never);
    /// assert!(!options.semantic_color_roles);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The classifier these options describe.
    pub fn classifier(&self) -> Classifier {
        let color_keywords = if self.semantic_color_roles {
            ColorKeywords::SemanticRoles
        } else {
            ColorKeywords::Legacy
        };
        Classifier::new().with_color_keywords(color_keywords)
    }
}
