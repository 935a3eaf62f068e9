//! Tailwind config extraction from unevaluated source text.
//!
//! Four theme blocks are read: `colors`, `spacing`, `fontFamily` and
//! `borderRadius`. Each is located with the balanced-brace scanner, then split
//! into top-level entries. Leaf values are matched with small regexes:
//!
//! ```js
//! colors: {
//!   border: 'hsl(214 32% 91%)',              // -> colors.border
//!   primary: {
//!     DEFAULT: '#3b82f6',                    // -> colors.primary
//!     500: '#3b82f6',                        // -> colors.primary-500
//!   },
//! },
//! fontFamily: {
//!   sans: ['Inter', ...defaultTheme.fontFamily.sans],  // -> "Inter"
//! },
//! ```
//!
//! Nested keys are joined with `-`, and `DEFAULT` collapses onto its parent.
//! Values that are not string literals (identifiers, spreads, function calls)
//! are skipped. When a block appears more than once (`theme.colors` and
//! `theme.extend.colors`), later blocks overwrite keys from earlier ones.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::scan;
use crate::classify::{Category, TypographyKind};
use crate::model::DesignTokens;
use crate::value::make_token;

/// Theme blocks read from a config, with the category each one fills.
pub const TAILWIND_BLOCKS: &[(&str, Category)] = &[
    ("colors", Category::Color),
    ("spacing", Category::Spacing),
    ("fontFamily", Category::Typography(TypographyKind::FontFamily)),
    ("borderRadius", Category::Radius),
];

/// [`TAILWIND_BLOCKS`] with each block's start pattern, compiled once.
static BLOCK_PATTERNS: Lazy<Vec<(&'static str, Category, Regex)>> = Lazy::new(|| {
    TAILWIND_BLOCKS
        .iter()
        .filter_map(|&(name, category)| {
            scan::object_block_pattern(name)
                .ok()
                .map(|pattern| (name, category, pattern))
        })
        .collect()
});

/// Nesting limit for objects inside a theme block.
const MAX_NESTING: usize = 8;

static KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(?:"([^"]+)"|'([^']+)'|([A-Za-z0-9_$.\-]+))\s*$"#)
        .expect("static regex is valid")
});

static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(?:"([^"]*)"|'([^']*)'|`([^`$]*)`)\s*$"#).expect("static regex is valid")
});

static ARRAY_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"|'([^']*)'"#).expect("static regex is valid"));

/// Extracts tokens from the source text of a Tailwind config.
pub fn extract_tailwind_config(source: &str) -> DesignTokens {
    let cleaned = scan::strip_js_comments(source);
    let mut tokens = DesignTokens::new();

    for (block_name, category, pattern) in BLOCK_PATTERNS.iter() {
        let (block_name, category) = (*block_name, *category);
        let Some(token_type) = category.token_type() else {
            continue;
        };
        for body in scan::find_object_blocks(&cleaned, pattern) {
            let mut leaves = Vec::new();
            collect_leaves(body, None, 0, &mut leaves);
            trace!(block = block_name, leaves = leaves.len(), "tailwind block");
            for (key, value) in leaves {
                if let Some(token) = make_token(&value, token_type, None) {
                    tokens.insert(category, key, token);
                }
            }
        }
    }

    if tokens.is_empty() {
        debug!("no tokens found in tailwind config");
    }
    tokens
}

/// Collects `(flattened key, value)` pairs from an isolated block body.
fn collect_leaves(body: &str, prefix: Option<&str>, depth: usize, out: &mut Vec<(String, String)>) {
    if depth > MAX_NESTING {
        debug!(prefix, "tailwind object nests too deeply");
        return;
    }

    for entry in scan::split_top_level(body, b',') {
        let Some((raw_key, raw_value)) = scan::split_key_value(entry) else {
            continue;
        };
        let Some(key) = parse_key(raw_key) else {
            trace!(key = raw_key.trim(), "skipping computed key");
            continue;
        };
        let full_key = join_key(prefix, key);
        let raw_value = raw_value.trim();

        if raw_value.starts_with('{') {
            if let Some(inner) = scan::balanced_body(raw_value, 0) {
                collect_leaves(inner, Some(&full_key), depth + 1, out);
            }
        } else if raw_value.starts_with('[') {
            let items: Vec<&str> = ARRAY_ITEM
                .captures_iter(raw_value)
                .filter_map(|c| c.get(1).or_else(|| c.get(2)))
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
                .collect();
            if !items.is_empty() {
                out.push((full_key, items.join(", ")));
            }
        } else if let Some(literal) = parse_string_literal(raw_value) {
            out.push((full_key, literal.to_string()));
        } else {
            trace!(key = %full_key, "skipping non-literal value");
        }
    }
}

fn parse_key(raw: &str) -> Option<&str> {
    let caps = KEY.captures(raw)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

fn parse_string_literal(raw: &str) -> Option<&str> {
    let caps = STRING_LITERAL.captures(raw)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str())
}

fn join_key(prefix: Option<&str>, key: &str) -> String {
    match (prefix, key) {
        (Some(prefix), "DEFAULT") => prefix.to_string(),
        (Some(prefix), key) => format!("{}-{}", prefix, key),
        (None, key) => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TokenCollection;

    fn value<'a>(collection: &'a Option<TokenCollection>, key: &str) -> Option<&'a str> {
        collection.as_ref()?.get(key)?.value.as_str()
    }

    const CONFIG: &str = r##"
/** @type {import('tailwindcss').Config} */
const defaultTheme = require('tailwindcss/defaultTheme')

module.exports = {
  content: ['./src/**/*.{js,ts,jsx,tsx}'],
  theme: {
    colors: {
      border: 'hsl(214 32% 91%)',
      primary: {
        DEFAULT: '#3b82f6',
        500: "#3b82f6",
        foreground: 'hsl(var(--primary-foreground))',
      },
      // brand: '#ff0000',
      white: colors.white,
    },
    extend: {
      spacing: {
        '128': '32rem',
        sm: '8px',
      },
      fontFamily: {
        sans: ['"Inter var"', ...defaultTheme.fontFamily.sans],
        mono: ['JetBrains Mono', 'monospace'],
      },
      borderRadius: {
        lg: `var(--radius)`,
        md: 'calc(var(--radius) - 2px)',
      },
    },
  },
  plugins: [require('tailwindcss-animate')],
}
"##;

    #[test]
    fn test_extracts_nested_colors() {
        let tokens = extract_tailwind_config(CONFIG);
        assert_eq!(value(&tokens.colors, "primary"), Some("217 91% 60%"));
        assert_eq!(value(&tokens.colors, "primary-500"), Some("217 91% 60%"));
        assert_eq!(value(&tokens.colors, "border"), Some("214 32% 91%"));
        assert_eq!(
            value(&tokens.colors, "primary-foreground"),
            Some("hsl(var(--primary-foreground))")
        );
    }

    #[test]
    fn test_skips_comments_and_identifiers() {
        let tokens = extract_tailwind_config(CONFIG);
        let colors = tokens.colors.as_ref().unwrap();
        assert!(!colors.contains_key("brand"));
        assert!(!colors.contains_key("white"));
    }

    #[test]
    fn test_spacing_and_radius() {
        let tokens = extract_tailwind_config(CONFIG);
        assert_eq!(value(&tokens.spacing, "128"), Some("32rem"));
        assert_eq!(value(&tokens.spacing, "sm"), Some("8px"));
        assert_eq!(value(&tokens.radius, "lg"), Some("var(--radius)"));
        assert_eq!(value(&tokens.radius, "md"), Some("calc(var(--radius) - 2px)"));
    }

    #[test]
    fn test_font_family_arrays() {
        let tokens = extract_tailwind_config(CONFIG);
        let families = tokens.typography.as_ref().unwrap().font_family.clone();
        assert_eq!(value(&families, "sans"), Some("\"Inter var\""));
        assert_eq!(value(&families, "mono"), Some("JetBrains Mono, monospace"));
    }

    #[test]
    fn test_later_blocks_overwrite() {
        let source = r#"
            theme: {
              colors: { primary: '#000000' },
              extend: { colors: { primary: '#ffffff' } },
            }
        "#;
        let tokens = extract_tailwind_config(source);
        assert_eq!(value(&tokens.colors, "primary"), Some("0 0% 100%"));
    }

    #[test]
    fn test_sibling_after_nested_object() {
        let source = r##"
            colors: {
              primary: { 500: '#3b82f6', 600: { DEFAULT: '#2563eb' } },
              accent: '#ff0000',
              muted: { DEFAULT: '#000000', },
              ring: 'hsl(215 20% 65%)'
            }
        "##;
        let tokens = extract_tailwind_config(source);
        assert_eq!(value(&tokens.colors, "primary-500"), Some("217 91% 60%"));
        assert_eq!(value(&tokens.colors, "primary-600"), Some("221 83% 53%"));
        assert_eq!(value(&tokens.colors, "accent"), Some("0 100% 50%"));
        assert_eq!(value(&tokens.colors, "muted"), Some("0 0% 0%"));
        assert_eq!(value(&tokens.colors, "ring"), Some("215 20% 65%"));
        assert_eq!(tokens.colors.as_ref().map(|c| c.len()), Some(5));
    }

    #[test]
    fn test_block_patterns_cover_every_block() {
        assert_eq!(BLOCK_PATTERNS.len(), TAILWIND_BLOCKS.len());
        for (name, _, pattern) in BLOCK_PATTERNS.iter() {
            let source = format!("{{ {name}: {{ a: '1px' }} }}");
            assert_eq!(scan::find_object_blocks(&source, pattern), vec![" a: '1px' "]);
        }
    }

    #[test]
    fn test_garbage_yields_empty() {
        assert!(extract_tailwind_config("").is_empty());
        assert!(extract_tailwind_config("colors: { unclosed: '#fff'").is_empty());
        assert!(extract_tailwind_config("export default {}").is_empty());
    }

    #[test]
    fn test_join_key() {
        assert_eq!(join_key(None, "DEFAULT"), "DEFAULT");
        assert_eq!(join_key(Some("primary"), "DEFAULT"), "primary");
        assert_eq!(join_key(Some("primary"), "500"), "primary-500");
    }
}
