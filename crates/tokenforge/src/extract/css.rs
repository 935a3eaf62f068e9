//! Custom-property extraction from CSS stylesheets.
//!
//! Built on `cssparser`, so block boundaries, strings and comments are handled
//! by a real tokenizer. Only custom properties (`--name: value`) are read.
//!
//! Which rules count:
//!
//! - `:root { ... }` is the light (default) scope
//! - `.dark { ... }`, and `:root` inside `@media (prefers-color-scheme: dark)`,
//!   is the dark scope
//! - rules inside `@layer`, `@supports` and other `@media` blocks are read as
//!   if they were at the top level
//!
//! Other selectors and at-rules (`@keyframes`, `@font-face`, ...) are skipped.
//!
//! Two extractors sit on top of the collected properties:
//! [`extract_css_variables`] classifies each light-scope name into a category,
//! while [`extract_theme_css`] stores every property as a color, prefixed with
//! `light-` or `dark-`.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, Token,
};
use tracing::debug;

use crate::classify::{Category, Classifier};
use crate::model::{DesignTokens, TokenType};
use crate::value::make_token;

/// Theme a custom property was declared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeScope {
    Light,
    Dark,
}

impl ThemeScope {
    fn prefix(self) -> &'static str {
        match self {
            ThemeScope::Light => "light",
            ThemeScope::Dark => "dark",
        }
    }
}

/// A `--name: value` declaration. `name` has the leading `--` removed and
/// `value` is the raw declaration text, trimmed, without `!important`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomProperty {
    pub scope: ThemeScope,
    pub name: String,
    pub value: String,
}

/// Collects custom properties from theme rules, in source order.
pub fn collect_custom_properties(css: &str) -> Vec<CustomProperty> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);

    let mut theme_parser = ThemeRuleParser {
        properties: Vec::new(),
        dark_media: false,
    };

    let rule_list_parser = cssparser::StyleSheetParser::new(&mut parser, &mut theme_parser);
    for result in rule_list_parser {
        if let Err((error, _)) = result {
            debug!(line = error.location.line, "skipping CSS rule");
        }
    }

    theme_parser.properties
}

/// Extracts light-scope custom properties, classified by name.
///
/// Properties whose name matches no category are dropped.
pub fn extract_css_variables(css: &str) -> DesignTokens {
    extract_css_variables_with(css, &Classifier::new())
}

/// [`extract_css_variables`] with an explicit classifier.
pub fn extract_css_variables_with(css: &str, classifier: &Classifier) -> DesignTokens {
    variables_from_properties(&collect_custom_properties(css), classifier)
}

/// Extracts a light/dark theme: every property becomes a color keyed
/// `light-<name>` or `dark-<name>`.
pub fn extract_theme_css(css: &str) -> DesignTokens {
    theme_from_properties(&collect_custom_properties(css))
}

pub(crate) fn variables_from_properties(
    properties: &[CustomProperty],
    classifier: &Classifier,
) -> DesignTokens {
    let mut tokens = DesignTokens::new();
    let mut dropped = 0usize;

    for property in properties.iter().filter(|p| p.scope == ThemeScope::Light) {
        let category = classifier.classify(&property.name);
        let Some(token_type) = category.token_type() else {
            dropped += 1;
            continue;
        };
        if let Some(token) = make_token(&property.value, token_type, None) {
            tokens.insert(category, property.name.clone(), token);
        }
    }

    if dropped > 0 {
        debug!(dropped, "unclassified custom properties");
    }
    tokens
}

pub(crate) fn theme_from_properties(properties: &[CustomProperty]) -> DesignTokens {
    let mut tokens = DesignTokens::new();
    for property in properties {
        let key = format!("{}-{}", property.scope.prefix(), property.name);
        if let Some(token) = make_token(&property.value, TokenType::Color, None) {
            tokens.insert(Category::Color, key, token);
        }
    }
    tokens
}

/// Returns `true` if `properties` declares anything for the dark scope.
pub(crate) fn has_dark_scope(properties: &[CustomProperty]) -> bool {
    properties.iter().any(|p| p.scope == ThemeScope::Dark)
}

struct ThemeRuleParser {
    properties: Vec<CustomProperty>,
    dark_media: bool,
}

/// How the contents of an at-rule block are read.
#[derive(Clone, Copy, PartialEq, Eq)]
enum AtBlock {
    Transparent,
    DarkMedia,
}

/// One selector of a rule prelude, reduced to what decides its theme scope.
///
/// Only a single compound made of `:root`, `.dark` and `html` counts:
/// `:root`, `.dark`, `:root.dark`, `html.dark`. Descendant and child
/// selectors such as `.dark .card` belong to components, not the theme.
#[derive(Debug, Default)]
struct SelectorScan {
    compounds: usize,
    pending_combinator: bool,
    root: bool,
    dark: bool,
    html: bool,
    other: bool,
}

impl SelectorScan {
    fn start_compound(&mut self) {
        if self.compounds == 0 || self.pending_combinator {
            self.compounds += 1;
            self.pending_combinator = false;
        }
    }

    fn scope(&self, dark_media: bool) -> Option<ThemeScope> {
        if self.compounds != 1 || self.other {
            return None;
        }
        match (self.root, self.dark, self.html) {
            (_, true, _) => Some(ThemeScope::Dark),
            (true, false, false) if dark_media => Some(ThemeScope::Dark),
            (true, false, false) => Some(ThemeScope::Light),
            _ => None,
        }
    }
}

impl<'i> QualifiedRuleParser<'i> for ThemeRuleParser {
    type Prelude = ThemeScope;
    type QualifiedRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        let mut scope = None;
        let mut selector = SelectorScan::default();

        while let Ok(token) = input.next_including_whitespace().cloned() {
            match token {
                Token::Comma => {
                    scope = scope.or(selector.scope(self.dark_media));
                    selector = SelectorScan::default();
                }
                Token::WhiteSpace(_) | Token::Delim('>' | '+' | '~') => {
                    selector.pending_combinator = true;
                }
                Token::Colon => {
                    selector.start_compound();
                    if input.expect_ident_matching("root").is_ok() {
                        selector.root = true;
                    } else {
                        selector.other = true;
                    }
                }
                Token::Delim('.') => {
                    selector.start_compound();
                    if input.expect_ident_matching("dark").is_ok() {
                        selector.dark = true;
                    } else {
                        selector.other = true;
                    }
                }
                Token::Ident(ref name) if name.eq_ignore_ascii_case("html") => {
                    selector.start_compound();
                    selector.html = true;
                }
                _ => {
                    selector.start_compound();
                    selector.other = true;
                }
            }
        }

        scope
            .or(selector.scope(self.dark_media))
            .ok_or_else(|| input.new_custom_error::<(), ()>(()))
    }

    fn parse_block<'t>(
        &mut self,
        scope: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        let mut decl_parser = CustomPropertyParser;
        let rule_parser = RuleBodyParser::new(input, &mut decl_parser);

        for (name, value) in rule_parser.flatten() {
            self.properties.push(CustomProperty { scope, name, value });
        }
        Ok(())
    }
}

impl<'i> AtRuleParser<'i> for ThemeRuleParser {
    type Prelude = AtBlock;
    type AtRule = ();
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i, Self::Error>> {
        match name.as_ref() {
            "layer" | "supports" => {
                while input.next().is_ok() {}
                Ok(AtBlock::Transparent)
            }
            "media" => {
                let mut dark = false;
                loop {
                    match input.next() {
                        Ok(Token::ParenthesisBlock) => {
                            let is_dark: Result<bool, ParseError<'i, ()>> =
                                input.parse_nested_block(|input| {
                                    input.expect_ident_matching("prefers-color-scheme")?;
                                    input.expect_colon()?;
                                    Ok(input.expect_ident_matching("dark").is_ok())
                                });
                            if let Ok(true) = is_dark {
                                dark = true;
                            }
                        }
                        Err(_) => break,
                        Ok(_) => {}
                    }
                }
                Ok(if dark {
                    AtBlock::DarkMedia
                } else {
                    AtBlock::Transparent
                })
            }
            _ => Err(input.new_custom_error::<(), ()>(())),
        }
    }

    fn parse_block<'t>(
        &mut self,
        block: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i, Self::Error>> {
        let old_dark_media = self.dark_media;
        if block == AtBlock::DarkMedia {
            self.dark_media = true;
        }

        let list_parser = cssparser::StyleSheetParser::new(input, self);
        for _ in list_parser {}

        self.dark_media = old_dark_media;
        Ok(())
    }
}

struct CustomPropertyParser;

impl<'i> DeclarationParser<'i> for CustomPropertyParser {
    type Declaration = (String, String);
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let Some(name) = name.as_ref().strip_prefix("--") else {
            return Err(input.new_custom_error::<(), ()>(()));
        };
        let name = name.to_string();

        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let raw = input.slice_from(start).trim();
        let value = strip_important(raw).to_string();

        if name.is_empty() || value.is_empty() {
            return Err(input.new_custom_error::<(), ()>(()));
        }
        Ok((name, value))
    }
}

impl<'i> AtRuleParser<'i> for CustomPropertyParser {
    type Prelude = ();
    type AtRule = (String, String);
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for CustomPropertyParser {
    type Prelude = ();
    type QualifiedRule = (String, String);
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, (String, String), ()> for CustomPropertyParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

fn strip_important(value: &str) -> &str {
    let lower = value.to_ascii_lowercase();
    match lower.rfind('!') {
        Some(bang) if lower[bang + 1..].trim() == "important" => value[..bang].trim_end(),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ColorKeywords;
    use crate::model::TokenCollection;

    fn value<'a>(collection: &'a Option<TokenCollection>, key: &str) -> Option<&'a str> {
        collection.as_ref()?.get(key)?.value.as_str()
    }

    const SHADCN: &str = r#"
@tailwind base;

@layer base {
  :root {
    --background: 0 0% 100%;
    --foreground: 222.2 84% 4.9%;
    --primary: 221.2 83.2% 53.3%;
    --radius: 0.5rem;
  }

  .dark {
    --background: 222.2 84% 4.9%;
    --foreground: 210 40% 98%;
  }
}

body { color: red; --not-theme: 1px; }
"#;

    #[test]
    fn test_collect_scopes() {
        let properties = collect_custom_properties(SHADCN);
        assert_eq!(properties.len(), 6);
        assert_eq!(
            properties[0],
            CustomProperty {
                scope: ThemeScope::Light,
                name: "background".into(),
                value: "0 0% 100%".into(),
            }
        );
        assert_eq!(properties[4].scope, ThemeScope::Dark);
        assert!(properties.iter().all(|p| p.name != "not-theme"));
    }

    #[test]
    fn test_root_radius_and_shadow() {
        let tokens =
            extract_css_variables(":root{--radius-md:8px;--shadow-sm:0 1px 2px rgba(0,0,0,.05);}");
        assert_eq!(value(&tokens.radius, "radius-md"), Some("8px"));
        assert_eq!(
            value(&tokens.shadows, "shadow-sm"),
            Some("0 1px 2px rgba(0,0,0,.05)")
        );
    }

    #[test]
    fn test_variables_classify_and_drop() {
        let tokens = extract_css_variables(SHADCN);
        assert_eq!(value(&tokens.colors, "background"), Some("0 0% 100%"));
        assert_eq!(value(&tokens.colors, "foreground"), Some("222.2 84% 4.9%"));
        assert_eq!(value(&tokens.radius, "radius"), Some("0.5rem"));
        // Legacy keywords do not know semantic roles.
        assert!(!tokens.colors.as_ref().unwrap().contains_key("primary"));
    }

    #[test]
    fn test_variables_with_semantic_roles() {
        let classifier = Classifier::new().with_color_keywords(ColorKeywords::SemanticRoles);
        let tokens = extract_css_variables_with(SHADCN, &classifier);
        assert_eq!(value(&tokens.colors, "primary"), Some("221.2 83.2% 53.3%"));
    }

    #[test]
    fn test_variables_ignore_dark_scope() {
        let tokens = extract_css_variables(SHADCN);
        assert_eq!(tokens.colors.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_theme_css_prefixes() {
        let tokens = extract_theme_css(SHADCN);
        let colors = tokens.colors.as_ref().unwrap();
        assert_eq!(colors.len(), 6);
        assert_eq!(value(&tokens.colors, "light-primary"), Some("221.2 83.2% 53.3%"));
        assert_eq!(value(&tokens.colors, "dark-foreground"), Some("210 40% 98%"));
        assert_eq!(value(&tokens.colors, "light-radius"), Some("0.5rem"));
        assert!(tokens.radius.is_none());
    }

    #[test]
    fn test_dark_media_query() {
        let css = r#"
            :root { --background: #ffffff; }
            @media (prefers-color-scheme: dark) {
              :root { --background: #000000; }
            }
            @media (min-width: 640px) {
              :root { --spacing-lg: 2rem; }
            }
        "#;
        let tokens = extract_theme_css(css);
        assert_eq!(value(&tokens.colors, "light-background"), Some("0 0% 100%"));
        assert_eq!(value(&tokens.colors, "dark-background"), Some("0 0% 0%"));

        let variables = extract_css_variables(css);
        assert_eq!(value(&variables.colors, "background"), Some("0 0% 100%"));
        assert_eq!(value(&variables.spacing, "spacing-lg"), Some("2rem"));
    }

    #[test]
    fn test_dark_scope_needs_whole_selector() {
        let css = r#"
            :root.dark { --ring: 0 0% 10%; }
            html.dark { --border: 0 0% 20%; }
            .dark .card { --card-color: #000; }
            .dark > .popover { --popover-color: #000; }
            .dark.card { --chip-color: #000; }
            .card, :root { --accent-color: #fff; }
        "#;
        let properties = collect_custom_properties(css);
        let names: Vec<(&str, ThemeScope)> = properties
            .iter()
            .map(|p| (p.name.as_str(), p.scope))
            .collect();
        assert_eq!(
            names,
            vec![
                ("ring", ThemeScope::Dark),
                ("border", ThemeScope::Dark),
                ("accent-color", ThemeScope::Light),
            ]
        );
    }

    #[test]
    fn test_component_dark_rule_keeps_theme_off() {
        let css = ":root { --background: 0 0% 100%; } .dark .card { --card-color: #000; }";
        let properties = collect_custom_properties(css);
        assert!(!has_dark_scope(&properties));
        let tokens = extract_theme_css(css);
        assert!(!tokens.colors.as_ref().unwrap().contains_key("dark-card-color"));
    }

    #[test]
    fn test_important_and_comments() {
        let css = ":root { /* brand */ --border-color: #fff !important; --empty: ; }";
        let properties = collect_custom_properties(css);
        assert_eq!(properties.len(), 1);
        assert_eq!(properties[0].value, "#fff");
    }

    #[test]
    fn test_skips_other_at_rules() {
        let css = r#"
            @keyframes spin { from { --x-color: red; } }
            @font-face { font-family: Inter; }
            :root { --text-base: 1rem; }
        "#;
        let tokens = extract_css_variables(css);
        assert!(tokens.colors.is_none());
        let sizes = tokens.typography.as_ref().unwrap().font_size.as_ref().unwrap();
        assert_eq!(sizes["text-base"].value.as_str(), Some("1rem"));
    }

    #[test]
    fn test_garbage_yields_empty() {
        assert!(collect_custom_properties("").is_empty());
        assert!(collect_custom_properties("}}}{{{").is_empty());
        assert!(extract_css_variables(":root { --a: 1px").is_empty());
    }

    #[test]
    fn test_strip_important() {
        assert_eq!(strip_important("red !important"), "red");
        assert_eq!(strip_important("red ! IMPORTANT"), "red");
        assert_eq!(strip_important("red"), "red");
    }
}
