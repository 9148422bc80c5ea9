//! Fixed colour palettes.
//!
//! A palette is the closed set of opaque colours that may appear on an
//! assembled canvas. It is read-only once built; the builtin palette is
//! created lazily the first time it is asked for.

use std::collections::HashSet;
use std::sync::OnceLock;

use crate::error::{AssemblerError, Result};

use super::Colour;

/// The 32-colour palette of the 2000x2000 canvas from 2022.
const PALETTE_2022: [Colour; 32] = [
    Colour::rgb(0, 0, 0),
    Colour::rgb(0, 117, 111),
    Colour::rgb(0, 158, 170),
    Colour::rgb(0, 163, 104),
    Colour::rgb(0, 204, 120),
    Colour::rgb(0, 204, 192),
    Colour::rgb(106, 92, 255),
    Colour::rgb(109, 0, 26),
    Colour::rgb(109, 72, 47),
    Colour::rgb(126, 237, 86),
    Colour::rgb(129, 30, 159),
    Colour::rgb(137, 141, 144),
    Colour::rgb(148, 179, 255),
    Colour::rgb(156, 105, 38),
    Colour::rgb(180, 74, 192),
    Colour::rgb(190, 0, 57),
    Colour::rgb(212, 215, 217),
    Colour::rgb(222, 16, 127),
    Colour::rgb(228, 171, 255),
    Colour::rgb(255, 56, 129),
    Colour::rgb(255, 69, 0),
    Colour::rgb(255, 153, 170),
    Colour::rgb(255, 168, 0),
    Colour::rgb(255, 180, 112),
    Colour::rgb(255, 214, 53),
    Colour::rgb(255, 248, 184),
    Colour::rgb(255, 255, 255),
    Colour::rgb(36, 80, 164),
    Colour::rgb(54, 144, 234),
    Colour::rgb(73, 58, 193),
    Colour::rgb(81, 82, 82),
    Colour::rgb(81, 233, 244),
];

/// An ordered, duplicate-free set of allowed colours.
#[derive(Debug, Clone)]
pub struct Palette {
    /// Palette name
    pub name: String,

    /// Colours in listing order. Nearest-colour ties resolve to the earlier entry.
    colours: Vec<Colour>,

    /// Membership lookup for the exact-match fast path.
    members: HashSet<Colour>,
}

impl Palette {
    /// Build a palette from a list of opaque colours.
    ///
    /// Duplicates are dropped, keeping the first occurrence.
    pub fn new(name: impl Into<String>, colours: impl IntoIterator<Item = Colour>) -> Result<Self> {
        let name = name.into();
        let mut ordered = Vec::new();
        let mut members = HashSet::new();

        for colour in colours {
            if !colour.is_opaque() {
                return Err(AssemblerError::Config {
                    message: format!("Palette '{}' contains non-opaque colour {}", name, colour),
                    help: Some("Palette entries must have alpha 255".to_string()),
                });
            }
            if members.insert(colour) {
                ordered.push(colour);
            }
        }

        if ordered.is_empty() {
            return Err(AssemblerError::Config {
                message: format!("Palette '{}' has no colours", name),
                help: None,
            });
        }

        Ok(Self {
            name,
            colours: ordered,
            members,
        })
    }

    /// Parse a palette from hex strings (`#RRGGBB`).
    pub fn from_hex_list(name: impl Into<String>, hex: &[String]) -> Result<Self> {
        let colours = hex
            .iter()
            .map(|s| Colour::from_hex(s))
            .collect::<Result<Vec<_>>>()?;
        Self::new(name, colours)
    }

    /// The builtin palette, shared for the lifetime of the process.
    pub fn builtin() -> &'static Palette {
        static BUILTIN: OnceLock<Palette> = OnceLock::new();
        BUILTIN.get_or_init(|| Palette {
            name: "2022".to_string(),
            colours: PALETTE_2022.to_vec(),
            members: PALETTE_2022.iter().copied().collect(),
        })
    }

    /// Check whether a colour is an exact member.
    pub fn contains(&self, colour: Colour) -> bool {
        self.members.contains(&colour)
    }

    /// Iterate colours in listing order.
    pub fn colours(&self) -> impl Iterator<Item = Colour> + '_ {
        self.colours.iter().copied()
    }

    /// Get the number of colours.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Check if the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::builtin().clone()
    }
}
