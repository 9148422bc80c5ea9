//! Colour type and parsing.

use std::fmt;
use std::str::FromStr;

use crate::error::{AssemblerError, Result};

/// Alpha values below this are treated as empty space.
pub const ALPHA_CUTOFF: u8 = 128;

/// An RGBA pixel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Opaque grey with all three channels set to `value`.
    ///
    /// Priority masks encode their band value this way.
    pub const fn grey(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// Fully transparent colour.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Black. Also the "no priority" value on the priority canvas.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a hex colour string.
    ///
    /// Accepts `#RRGGBB` and `#RRGGBBAA`, with or without the leading `#`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        match hex.len() {
            _ if !hex.is_ascii() => Err(AssemblerError::Parse {
                message: format!("Invalid hex colour: {}", s),
                help: Some("Hex colours may only contain 0-9 and A-F".to_string()),
            }),
            6 => {
                let r = parse_hex_byte(&hex[0..2])?;
                let g = parse_hex_byte(&hex[2..4])?;
                let b = parse_hex_byte(&hex[4..6])?;
                Ok(Self::rgb(r, g, b))
            }
            8 => {
                let r = parse_hex_byte(&hex[0..2])?;
                let g = parse_hex_byte(&hex[2..4])?;
                let b = parse_hex_byte(&hex[4..6])?;
                let a = parse_hex_byte(&hex[6..8])?;
                Ok(Self::new(r, g, b, a))
            }
            _ => Err(AssemblerError::Parse {
                message: format!("Invalid hex colour: {}", s),
                help: Some("Use #RRGGBB or #RRGGBBAA format".to_string()),
            }),
        }
    }

    /// Convert to an RGBA array.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build from an RGBA array.
    pub fn from_rgba(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    /// True when the pixel is too transparent to be kept.
    pub fn is_transparent(self) -> bool {
        self.a < ALPHA_CUTOFF
    }

    /// Check if the colour is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

impl FromStr for Colour {
    type Err = AssemblerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parse a two-character hex byte.
fn parse_hex_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| AssemblerError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_6digit() {
        let c = Colour::from_hex("#FF4500").unwrap();
        assert_eq!(c, Colour::rgb(255, 69, 0));

        let c = Colour::from_hex("51e9f4").unwrap();
        assert_eq!(c, Colour::rgb(0x51, 0xe9, 0xf4));
    }

    #[test]
    fn test_from_hex_8digit() {
        let c = Colour::from_hex("#FF000080").unwrap();
        assert_eq!(c, Colour::new(255, 0, 0, 128));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(Colour::from_hex("#GGGGGG").is_err());
        assert!(Colour::from_hex("#F00").is_err());
        assert!(Colour::from_hex("").is_err());
    }

    #[test]
    fn test_from_hex_non_ascii() {
        assert!(Colour::from_hex("1é123").is_err());
        assert!(Colour::from_hex("#ééé").is_err());
        assert!(Colour::from_hex("00ff0€").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Colour::rgb(255, 0, 0)), "#FF0000");
        assert_eq!(format!("{}", Colour::new(255, 0, 0, 128)), "#FF000080");
    }

    #[test]
    fn test_transparency_cutoff() {
        assert!(Colour::new(10, 10, 10, 127).is_transparent());
        assert!(!Colour::new(10, 10, 10, 128).is_transparent());
        assert!(Colour::TRANSPARENT.is_transparent());
        assert!(Colour::grey(46).is_opaque());
    }
}
