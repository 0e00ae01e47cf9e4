//! Request colors.

use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::Rgba8,
    error::{CardError, CardResult},
};

/// Color as written in a request: `"#3B82F6"`, `{ "r": 59, "g": 130, "b": 246 }` or
/// `[59, 130, 246, 255]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardColor(pub Rgba8);

impl CardColor {
    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn parse(s: &str) -> CardResult<Self> {
        parse_hex(s).map(Self).map_err(CardError::invalid_configuration)
    }

    /// The wrapped color.
    pub fn rgba8(self) -> Rgba8 {
        self.0
    }

    /// Lowercase hex, with an alpha pair only when not opaque.
    pub fn to_hex(self) -> String {
        let Rgba8 { r, g, b, a } = self.0;
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}

impl From<Rgba8> for CardColor {
    fn from(c: Rgba8) -> Self {
        Self(c)
    }
}

impl Serialize for CardColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CardColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            RgbaObj {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "opaque")]
                a: u8,
            },
            Arr(Vec<u8>),
        }

        fn opaque() -> u8 {
            255
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map(Self).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self(Rgba8::new(r, g, b, a))),
            Repr::Arr(v) => match v.as_slice() {
                &[r, g, b] => Ok(Self(Rgba8::opaque(r, g, b))),
                &[r, g, b, a] => Ok(Self(Rgba8::new(r, g, b, a))),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    let Some(hex) = s.strip_prefix('#') else {
        return Err(format!("color \"{s}\" must start with '#'"));
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex color \"{s}\""));
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    fn hex_nibble(c: &str) -> Result<u8, String> {
        hex_byte(c).map(|n| n * 17)
    }

    match hex.len() {
        3 => Ok(Rgba8::opaque(
            hex_nibble(&hex[0..1])?,
            hex_nibble(&hex[1..2])?,
            hex_nibble(&hex[2..3])?,
        )),
        6 => Ok(Rgba8::opaque(
            hex_byte(&hex[0..2])?,
            hex_byte(&hex[2..4])?,
            hex_byte(&hex[4..6])?,
        )),
        8 => Ok(Rgba8::new(
            hex_byte(&hex[0..2])?,
            hex_byte(&hex[2..4])?,
            hex_byte(&hex[4..6])?,
            hex_byte(&hex[6..8])?,
        )),
        _ => Err("hex color must be #RGB, #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/color.rs"]
mod tests;
