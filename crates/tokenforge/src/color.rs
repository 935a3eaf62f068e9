//! Color value normalization.
//!
//! Colors are stored as HSL triples without the `hsl()` wrapper or commas,
//! e.g. `"221 83% 53%"`. Consuming code wraps them at use time.
//!
//! Supported input forms:
//!
//! - HSL triples: `221 83% 53%`, `222.2 84% 4.9%` (kept verbatim when the hue
//!   is already in `0..360` without a `deg` unit)
//! - Hex: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa` (alpha is ignored)
//! - `rgb()` / `rgba()`: comma or space syntax, numbers or percentages
//! - `hsl()` / `hsla()`: comma or space syntax, optional `deg`
//!
//! Anything else (`var(--x)`, `oklch(...)`, named colors) is not understood;
//! [`normalize_color`] then returns the trimmed input unchanged.
//!
//! # Example
//!
//! ```rust
//! use tokenforge::color::{normalize_color, to_hsl_triple};
//!
//! assert_eq!(to_hsl_triple("#3b82f6").as_deref(), Some("217 91% 60%"));
//! assert_eq!(to_hsl_triple("hsl(221, 83%, 53%)").as_deref(), Some("221 83% 53%"));
//! assert_eq!(normalize_color("var(--brand)"), "var(--brand)");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

static HSL_TRIPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?)(deg)?\s+(\d+(?:\.\d+)?%)\s+(\d+(?:\.\d+)?%)$")
        .expect("static regex is valid")
});

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Parsed color in one of the understood notations.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorDef {
    /// Already an HSL triple; carried through verbatim.
    Triple(String),
    /// Channel values from hex or `rgb()`.
    Rgb(Rgb),
    /// Components from `hsl()`, as hue degrees and saturation/lightness percentages.
    Hsl(f64, f64, f64),
}

impl ColorDef {
    /// Parses a color from a string value.
    pub fn parse_string(s: &str) -> Result<Self, String> {
        let s = s.trim();

        if let Some(caps) = HSL_TRIPLE.captures(s) {
            return Ok(ColorDef::Triple(canonical_triple(s, &caps)));
        }

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).map(ColorDef::Rgb);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = function_args(&lower, &["rgb", "rgba"]) {
            return parse_rgb_args(args).map(ColorDef::Rgb);
        }
        if let Some(args) = function_args(&lower, &["hsl", "hsla"]) {
            return parse_hsl_args(args);
        }

        Err(format!("Unsupported color notation: {}", s))
    }

    /// Renders this color as an `"H S% L%"` triple.
    pub fn to_triple(&self) -> String {
        match self {
            ColorDef::Triple(s) => s.clone(),
            ColorDef::Rgb(rgb) => {
                let (h, s, l) = rgb_to_hsl(*rgb);
                format!("{} {}% {}%", h.round(), s.round(), l.round())
            }
            ColorDef::Hsl(h, s, l) => format!(
                "{} {}% {}%",
                trim_float(wrap_hue(*h)),
                trim_float(*s),
                trim_float(*l)
            ),
        }
    }
}

/// Converts `input` to an HSL triple if the notation is understood.
pub fn to_hsl_triple(input: &str) -> Option<String> {
    ColorDef::parse_string(input).ok().map(|c| c.to_triple())
}

/// Returns the HSL triple for `input`, or the trimmed input when the notation
/// is not understood.
pub fn normalize_color(input: &str) -> String {
    to_hsl_triple(input).unwrap_or_else(|| input.trim().to_string())
}

/// Rewrites a matched triple only when its hue carries `deg` or lies
/// outside `0..360`.
fn canonical_triple(s: &str, caps: &regex::Captures<'_>) -> String {
    let hue_text = &caps[1];
    let hue: f64 = hue_text.parse().unwrap_or(0.0);
    if caps.get(2).is_none() && (0.0..360.0).contains(&hue) {
        return s.to_string();
    }
    format!("{} {} {}", trim_float(wrap_hue(hue)), &caps[3], &caps[4])
}

/// Wraps a hue in degrees into `0..360`.
fn wrap_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    if (h * 100.0).round() >= 36000.0 {
        0.0
    } else {
        h
    }
}

/// Parses a hex color code (without the # prefix).
fn parse_hex(hex: &str) -> Result<Rgb, String> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("Invalid hex: #{}", hex));
    }

    let channel = |s: &str| {
        u8::from_str_radix(s, 16).map_err(|_| format!("Invalid hex: #{}", hex))
    };

    match hex.len() {
        // #rgb / #rgba -> #rrggbb
        3 | 4 => Ok(Rgb(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        // #rrggbb / #rrggbbaa
        6 | 8 => Ok(Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => Err(format!(
            "Invalid hex color: #{} (must be 3, 4, 6 or 8 digits)",
            hex
        )),
    }
}

/// Returns the text between the parentheses of `name(...)`.
fn function_args<'a>(s: &'a str, names: &[&str]) -> Option<&'a str> {
    let open = s.find('(')?;
    if !s.ends_with(')') || !names.contains(&s[..open].trim()) {
        return None;
    }
    Some(&s[open + 1..s.len() - 1])
}

/// Splits function arguments on commas, whitespace and the `/` alpha separator.
/// Only the first three components are returned.
fn components(args: &str) -> Result<[&str; 3], String> {
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() < 3 {
        return Err(format!(
            "color function requires 3 components, got {}",
            parts.len()
        ));
    }
    Ok([parts[0], parts[1], parts[2]])
}

fn parse_rgb_args(args: &str) -> Result<Rgb, String> {
    let parts = components(args)?;
    let mut channels = [0u8; 3];
    for (i, part) in parts.iter().enumerate() {
        let value = match part.strip_suffix('%') {
            Some(pct) => parse_number(pct)? * 2.55,
            None => parse_number(part)?,
        };
        channels[i] = value.round().clamp(0.0, 255.0) as u8;
    }
    Ok(Rgb(channels[0], channels[1], channels[2]))
}

fn parse_hsl_args(args: &str) -> Result<ColorDef, String> {
    let [h, s, l] = components(args)?;
    let h = h.strip_suffix("deg").unwrap_or(h);
    let s = s.strip_suffix('%').unwrap_or(s);
    let l = l.strip_suffix('%').unwrap_or(l);
    Ok(ColorDef::Hsl(
        parse_number(h)?,
        parse_number(s)?,
        parse_number(l)?,
    ))
}

fn parse_number(s: &str) -> Result<f64, String> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| format!("Invalid color component '{}': expected a number", s))
}

/// Formats with at most two decimals and no trailing zeros.
fn trim_float(n: f64) -> String {
    let rounded = (n * 100.0).round() / 100.0;
    let text = format!("{:.2}", rounded);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Converts sRGB to HSL (hue in degrees, saturation and lightness in percent).
fn rgb_to_hsl(Rgb(r, g, b): Rgb) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l * 100.0);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    ((h * 60.0) % 360.0, s * 100.0, l * 100.0)
}
