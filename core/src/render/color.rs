use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::prelude::{MapError, MapResult};

/// 8-bit RGBA color.
///
/// Parses `#RGB`, `#RRGGBB`, `#RRGGBBAA`, `rgb(r, g, b)` and
/// `rgba(r, g, b, a)` with `a` in `0.0..=1.0`. Serializes as `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Accent colors for visits that do not carry their own.
pub const FALLBACK_PALETTE: [Rgba; 6] = [
    Rgba::rgb(0xE8, 0x74, 0x0C),
    Rgba::rgb(0x8B, 0x5C, 0xF6),
    Rgba::rgb(0x2D, 0x9F, 0x5D),
    Rgba::rgb(0xE8, 0x43, 0x93),
    Rgba::rgb(0xD4, 0xA0, 0x17),
    Rgba::rgb(0x3B, 0x82, 0xF6),
];

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(0xFF, 0xFF, 0xFF);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn palette(index: usize) -> Self {
        FALLBACK_PALETTE[index % FALLBACK_PALETTE.len()]
    }

    pub fn alpha_f32(&self) -> f32 {
        f32::from(self.a) / 255.0
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// `#RRGGBB` without the alpha channel, for formats that carry opacity
    /// separately.
    pub fn to_rgb_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn parse(input: &str) -> MapResult<Self> {
        let value = input.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| MapError::InvalidColor(input.to_string()));
        }
        let lower = value.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(args).ok_or_else(|| MapError::InvalidColor(input.to_string()));
        }
        Err(MapError::InvalidColor(input.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let mut nibbles = hex.chars().filter_map(|c| c.to_digit(16)).map(|d| (d * 17) as u8);
            Some(Rgba::rgb(nibbles.next()?, nibbles.next()?, nibbles.next()?))
        }
        6 => Some(Rgba::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Rgba::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}

fn parse_functional(args: &str) -> Option<Rgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |part: &str| part.parse::<u8>().ok();
    match parts.as_slice() {
        [r, g, b] => Some(Rgba::rgb(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => {
            let alpha = a.parse::<f32>().ok().filter(|a| (0.0..=1.0).contains(a))?;
            Some(Rgba::rgba(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                (alpha * 255.0).round() as u8,
            ))
        }
        _ => None,
    }
}

impl FromStr for Rgba {
    type Err = MapError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Rgba::parse(value)
    }
}

impl TryFrom<String> for Rgba {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgba::parse(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Rgba::parse("#E8740C").unwrap(), Rgba::rgb(0xE8, 0x74, 0x0C));
        assert_eq!(
            Rgba::parse("#E8740C60").unwrap(),
            Rgba::rgba(0xE8, 0x74, 0x0C, 0x60)
        );
        assert_eq!(Rgba::parse("#fff").unwrap(), Rgba::WHITE);
    }

    #[test]
    fn parses_css_functional_forms() {
        assert_eq!(
            Rgba::parse("rgba(13, 17, 23, 0.92)").unwrap(),
            Rgba::rgba(13, 17, 23, 235)
        );
        assert_eq!(Rgba::parse("rgb(255,255,255)").unwrap(), Rgba::WHITE);
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "E8740C", "#12345", "#GGGGGG", "rgba(1,2,3,4)", "rgb(300,0,0)"] {
            assert!(Rgba::parse(input).is_err(), "{input} should not parse");
        }
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgba::rgba(1, 2, 3, 4)).unwrap();
        assert_eq!(json, "\"#01020304\"");
        let parsed: Rgba = serde_json::from_str("\"#0D1117\"").unwrap();
        assert_eq!(parsed, Rgba::rgb(0x0D, 0x11, 0x17));
        assert!(serde_json::from_str::<Rgba>("\"navy\"").is_err());
    }

    #[test]
    fn palette_wraps_around() {
        assert_eq!(Rgba::palette(0), Rgba::palette(FALLBACK_PALETTE.len()));
        assert_ne!(Rgba::palette(0), Rgba::palette(1));
    }
}
