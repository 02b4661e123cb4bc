use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// An opaque RGB color. Translucency is decided by whoever draws or exports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    // These match the CSS named colors
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 128, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Parses "#rrggbb"
    pub fn hex(raw: &str) -> Result<Color> {
        let digits = match raw.strip_prefix('#') {
            Some(x) if x.len() == 6 && x.is_ascii() => x,
            _ => bail!("{} isn't a #rrggbb color", raw),
        };
        let r = u8::from_str_radix(&digits[0..2], 16)?;
        let g = u8::from_str_radix(&digits[2..4], 16)?;
        let b = u8::from_str_radix(&digits[4..6], 16)?;
        Ok(Color::rgb(r, g, b))
    }

    /// Accepts either a hex code or one of a few color names.
    pub fn parse(raw: &str) -> Result<Color> {
        match raw.to_ascii_lowercase().as_str() {
            "black" => Ok(Color::BLACK),
            "white" => Ok(Color::WHITE),
            "blue" => Ok(Color::BLUE),
            "red" => Ok(Color::RED),
            "green" => Ok(Color::GREEN),
            _ => Color::hex(raw),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// KML orders channels as aabbggrr. `alpha` is clamped to [0, 1].
    pub fn to_kml(self, alpha: f64) -> String {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("{:02x}{:02x}{:02x}{:02x}", a, self.b, self.g, self.r)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Color> {
        Color::parse(raw)
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(raw: String) -> Result<Color> {
        Color::parse(&raw)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> String {
        color.to_hex()
    }
}
