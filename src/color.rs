//! Color descriptors.
//!
//! SVG paint values reach us as free-form text: sometimes a bare `#abc`,
//! sometimes a whole attribute value with a `url(...)` reference and a
//! fallback color after it.  [`color_to_hex`] scans such a descriptor from
//! left to right and returns the first color it can make sense of, as six
//! lowercase hex digits without the leading `#`.
//!
//! The recognized notations are:
//!
//! * `#rgb` shorthand, where each digit is doubled.
//! * `#rrggbb`.
//! * `rgb(r, g, b)`, where each component is an integer in 0-255 or a
//!   percentage in 0%-100%.  Out-of-range components are clamped.
//! * CSS color keywords like `white` or `cornflowerblue`, in any case.

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::ColorError;

/// An opaque RGB color.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub fn new(r: u8, g: u8, b: u8) -> HexColor {
        HexColor { r, g, b }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// Alternatives are tried in order at each position, so `rgb(` wins over the
// bare word `rgb` and a six-digit hex wins over its three-digit prefix.
static COLOR_SCANNER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)",
        r"#(?P<hex6>[0-9a-f]{6})\b",
        r"|#(?P<hex3>[0-9a-f]{3})\b",
        r"|rgb\(\s*(?P<r>-?[0-9]+(?:\.[0-9]+)?%?)\s*,\s*(?P<g>-?[0-9]+(?:\.[0-9]+)?%?)\s*,\s*(?P<b>-?[0-9]+(?:\.[0-9]+)?%?)\s*\)",
        r"|\b(?P<word>[a-z]+)\b",
    ))
    .expect("color scanner regex must compile")
});

/// Finds the first color in `descriptor` and returns it as six lowercase hex digits.
///
/// ```
/// use svgreplay::color_to_hex;
///
/// assert_eq!(color_to_hex("#9ab").unwrap(), "99aabb");
/// assert_eq!(color_to_hex("url(#grad) rgb(16, 32, 48)").unwrap(), "102030");
/// assert!(color_to_hex("none").is_err());
/// ```
pub fn color_to_hex(descriptor: &str) -> Result<String, ColorError> {
    parse_color(descriptor).map(|color| color.to_string())
}

/// Like [`color_to_hex`], but returns the color components.
pub fn parse_color(descriptor: &str) -> Result<HexColor, ColorError> {
    COLOR_SCANNER
        .captures_iter(descriptor)
        .find_map(|caps| color_from_captures(&caps))
        .ok_or_else(|| ColorError::NoColorFound(descriptor.to_string()))
}

fn color_from_captures(caps: &Captures<'_>) -> Option<HexColor> {
    if let Some(hex) = caps.name("hex6") {
        let s = hex.as_str();
        Some(HexColor::new(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        ))
    } else if let Some(hex) = caps.name("hex3") {
        let s = hex.as_str();
        Some(HexColor::new(
            hex_digit_doubled(&s[0..1])?,
            hex_digit_doubled(&s[1..2])?,
            hex_digit_doubled(&s[2..3])?,
        ))
    } else if let (Some(r), Some(g), Some(b)) = (caps.name("r"), caps.name("g"), caps.name("b")) {
        Some(HexColor::new(
            rgb_component(r.as_str())?,
            rgb_component(g.as_str())?,
            rgb_component(b.as_str())?,
        ))
    } else {
        caps.name("word").and_then(|word| named_color(word.as_str()))
    }
}

fn hex_byte(s: &str) -> Option<u8> {
    u8::from_str_radix(s, 16).ok()
}

fn hex_digit_doubled(s: &str) -> Option<u8> {
    hex_byte(s).map(|d| d * 0x11)
}

/// Parses one `rgb()` component, clamping it into range.
///
/// Percentages map linearly onto 0-255 and are truncated, so `50%` is 127.
fn rgb_component(s: &str) -> Option<u8> {
    if let Some(percent) = s.strip_suffix('%') {
        let p: f64 = percent.parse().ok()?;
        Some((p.clamp(0.0, 100.0) * 255.0 / 100.0) as u8)
    } else {
        let n: f64 = s.parse().ok()?;
        Some(n.clamp(0.0, 255.0) as u8)
    }
}

/// Looks up a CSS color keyword.
///
/// `transparent` and `currentColor` are keywords too, but neither names an
/// opaque RGB value, so they are not colors for our purposes.
fn named_color(name: &str) -> Option<HexColor> {
    match cssparser::parse_color_keyword(name) {
        Ok(cssparser::Color::RGBA(rgba)) if rgba.alpha == 255 => {
            Some(HexColor::new(rgba.red, rgba.green, rgba.blue))
        }
        _ => None,
    }
}
