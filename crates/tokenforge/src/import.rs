//! Top-level import entry points.
//!
//! [`parse_token_json`] is the one hard-failing entry point: text that is not
//! JSON, or JSON that is not an object, is an [`ImportError`]. Wrap the result
//! in an [`ImportReport`] to get the `{ success, tokens, error }` shape.
//!
//! [`import_sources`] runs the whole pipeline over several named inputs:
//! each source's kind is detected from its name and content, the matching
//! extractor runs, and the results are merged. Tailwind configs are merged
//! first so stylesheets and token files can override them; other sources keep
//! their given order. A source that cannot be read contributes nothing and is
//! logged; it never aborts the import.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::classify::Classifier;
use crate::config::{ImportOptions, ThemeCssMode};
use crate::error::{json_kind, ImportError, Result};
use crate::export::parse_export_with;
use crate::extract::css::{
    collect_custom_properties, has_dark_scope, theme_from_properties, variables_from_properties,
};
use crate::extract::json::{CATEGORY_KEYS, TYPOGRAPHY_KEYS};
use crate::extract::{extract_json, extract_tailwind_config};
use crate::merge::merge;
use crate::model::DesignTokens;

/// Parses hand-written token JSON (the paste-box format).
///
/// ```rust
/// use tokenforge::import::{parse_token_json, ImportReport};
///
/// let tokens = parse_token_json(r#"{"colors": {"primary": "221 83% 53%"}}"#).unwrap();
/// assert_eq!(tokens.token_count(), 1);
///
/// let report = ImportReport::from(parse_token_json("{ invalid"));
/// assert!(!report.success);
/// assert!(report.error.is_some());
/// ```
pub fn parse_token_json(text: &str) -> Result<DesignTokens> {
    let value = parse_object(text)?;
    Ok(extract_json(&value))
}

/// Parses an export document from text with the default classifier.
pub fn parse_export_json(text: &str) -> Result<DesignTokens> {
    parse_export_json_with(text, &Classifier::new())
}

/// Parses an export document from text.
pub fn parse_export_json_with(text: &str, classifier: &Classifier) -> Result<DesignTokens> {
    let value = parse_object(text)?;
    Ok(parse_export_with(&value, classifier))
}

fn parse_object(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(ImportError::NotAnObject {
            found: json_kind(&value),
        });
    }
    Ok(value)
}

/// Outcome of a hard-failing import, in a serializable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<DesignTokens>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<DesignTokens>> for ImportReport {
    fn from(result: Result<DesignTokens>) -> Self {
        match result {
            Ok(tokens) => Self {
                success: true,
                tokens: Some(tokens),
                error: None,
            },
            Err(err) => Self {
                success: false,
                tokens: None,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Returns `tokens`, or [`ImportError::NoTokens`] when there are none.
pub fn require_content(tokens: DesignTokens) -> Result<DesignTokens> {
    if tokens.is_empty() {
        return Err(ImportError::NoTokens);
    }
    Ok(tokens)
}

/// What kind of input a source holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    TailwindConfig,
    Css,
    /// JSON whose top-level keys are all token categories.
    TokenJson,
    /// Any other JSON object, read as a design-token export.
    ExportJson,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::TailwindConfig => "tailwind-config",
            SourceKind::Css => "css",
            SourceKind::TokenJson => "token-json",
            SourceKind::ExportJson => "export-json",
        })
    }
}

impl SourceKind {
    /// Detects the kind from a file name, falling back to the content.
    pub fn detect(name: &str, text: &str) -> Option<Self> {
        let file_name = name
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(name)
            .to_ascii_lowercase();
        let extension = file_name.rsplit_once('.').map(|(_, ext)| ext);

        match extension {
            Some("css" | "scss" | "pcss" | "postcss") => return Some(SourceKind::Css),
            Some("json") => return Some(json_source_kind(text)),
            Some("js" | "cjs" | "mjs" | "ts" | "cts" | "mts")
                if file_name.starts_with("tailwind") =>
            {
                return Some(SourceKind::TailwindConfig);
            }
            _ => {}
        }

        let trimmed = text.trim_start();
        if trimmed.starts_with('{') {
            Some(json_source_kind(text))
        } else if (text.contains("module.exports") || text.contains("export default"))
            && text.contains("theme")
        {
            Some(SourceKind::TailwindConfig)
        } else if text.contains(":root") || (text.contains(".dark") && text.contains("--")) {
            Some(SourceKind::Css)
        } else {
            None
        }
    }
}

fn is_token_json_key(key: &str) -> bool {
    let (typography, font_size) = TYPOGRAPHY_KEYS;
    key == typography
        || key == font_size
        || CATEGORY_KEYS
            .iter()
            .any(|(canonical, alias, _)| key == *canonical || key == *alias)
}

fn json_source_kind(text: &str) -> SourceKind {
    let Ok(Value::Object(root)) = serde_json::from_str::<Value>(text) else {
        return SourceKind::ExportJson;
    };
    if !root.is_empty() && root.keys().all(|key| is_token_json_key(key)) {
        SourceKind::TokenJson
    } else {
        SourceKind::ExportJson
    }
}

/// A named input for [`import_sources`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source<'a> {
    pub name: &'a str,
    pub text: &'a str,
    pub kind: Option<SourceKind>,
}

impl<'a> Source<'a> {
    /// Creates a source, detecting its kind.
    pub fn new(name: &'a str, text: &'a str) -> Self {
        Self {
            name,
            text,
            kind: SourceKind::detect(name, text),
        }
    }

    /// Overrides the detected kind.
    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Runs the extractor for one source.
///
/// Oversized, unrecognized or unreadable sources yield an empty result.
pub fn extract_source(source: &Source<'_>, options: &ImportOptions) -> DesignTokens {
    let name = source.name;
    if source.text.len() > options.max_input_bytes {
        warn!(
            name,
            bytes = source.text.len(),
            limit = options.max_input_bytes,
            "input too large, skipping"
        );
        return DesignTokens::new();
    }
    let Some(kind) = source.kind else {
        debug!(name, "unrecognized source, skipping");
        return DesignTokens::new();
    };

    let classifier = options.classifier();
    let tokens = match kind {
        SourceKind::TailwindConfig => extract_tailwind_config(source.text),
        SourceKind::Css => css_tokens(source.text, &classifier, options.theme_css),
        SourceKind::TokenJson => parse_token_json(source.text).unwrap_or_else(|err| {
            warn!(name, error = %err, "skipping token JSON");
            DesignTokens::new()
        }),
        SourceKind::ExportJson => parse_export_json_with(source.text, &classifier)
            .unwrap_or_else(|err| {
                warn!(name, error = %err, "skipping export JSON");
                DesignTokens::new()
            }),
    };

    debug!(name, %kind, tokens = tokens.token_count(), "extracted source");
    tokens
}

fn css_tokens(css: &str, classifier: &Classifier, mode: ThemeCssMode) -> DesignTokens {
    let properties = collect_custom_properties(css);
    let variables = variables_from_properties(&properties, classifier);
    let read_theme = match mode {
        ThemeCssMode::Always => true,
        ThemeCssMode::Never => false,
        ThemeCssMode::Auto => has_dark_scope(&properties),
    };
    if read_theme {
        merge([variables, theme_from_properties(&properties)])
    } else {
        variables
    }
}

/// Extracts every source and merges the results.
///
/// Tailwind configs come first; every other source follows in the given
/// order, so later sources win on key collisions.
pub fn import_sources(sources: &[Source<'_>], options: &ImportOptions) -> DesignTokens {
    let (tailwind, rest): (Vec<&Source<'_>>, Vec<&Source<'_>>) = sources
        .iter()
        .partition(|source| source.kind == Some(SourceKind::TailwindConfig));

    let merged = merge(
        tailwind
            .into_iter()
            .chain(rest)
            .map(|source| extract_source(source, options)),
    );
    debug!(
        sources = sources.len(),
        tokens = merged.token_count(),
        "import finished"
    );
    merged
}
