//! Palette normalization.
//!
//! Snaps every pixel of a source image to either full transparency or an
//! exact palette colour. Pixels that needed a nearest-colour search are
//! tallied so callers can decide whether the image is trustworthy enough
//! for automatic placement.

use std::collections::HashSet;

use crate::render::Raster;
use crate::types::{Colour, Palette};

/// Largest tolerated replacement distance before an image is considered
/// unsuitable for automatic placement.
pub const MAX_CLEAN_DISTANCE: f64 = 5.0;

/// Weighted distance between two colours.
///
/// Only the red and green channels contribute, weighted 0.3 and 0.59. Blue
/// and alpha are ignored. Existing outputs depend on which colour this picks
/// for borderline pixels, so it must not be widened to three channels.
pub fn colour_distance(a: Colour, b: Colour) -> f64 {
    let dr = 0.3 * (f64::from(a.r) - f64::from(b.r));
    let dg = 0.59 * (f64::from(a.g) - f64::from(b.g));
    (dr * dr + dg * dg).sqrt()
}

/// Closest palette colour to `colour`, with its distance.
///
/// Ties resolve to the earliest palette entry.
pub fn nearest(palette: &Palette, colour: Colour) -> (Colour, f64) {
    let mut best = Colour::TRANSPARENT;
    let mut best_distance = f64::INFINITY;
    for candidate in palette.colours() {
        let distance = colour_distance(candidate, colour);
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    (best, best_distance)
}

/// Outcome of normalizing a single pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalized {
    /// Alpha below the cutoff; replaced with full transparency.
    Transparent,
    /// Already a palette colour.
    Exact(Colour),
    /// Replaced by the nearest palette colour.
    Nearest { colour: Colour, distance: f64 },
}

impl Normalized {
    pub fn colour(self) -> Colour {
        match self {
            Normalized::Transparent => Colour::TRANSPARENT,
            Normalized::Exact(colour) | Normalized::Nearest { colour, .. } => colour,
        }
    }
}

/// Normalize one pixel against the palette.
pub fn normalize_colour(palette: &Palette, colour: Colour) -> Normalized {
    if colour.is_transparent() {
        return Normalized::Transparent;
    }
    if palette.contains(colour) {
        return Normalized::Exact(colour);
    }
    let (colour, distance) = nearest(palette, colour);
    Normalized::Nearest { colour, distance }
}

/// A distinct source colour that had to be replaced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub original: Colour,
    pub replacement: Colour,
    pub distance: f64,
}

/// Per-image tally of what normalization changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeReport {
    /// Pixels whose red or green channel changed.
    pub fixed_pixels: usize,

    /// Pixels that only differed in alpha (or blue) from their replacement.
    pub semi_transparent_pixels: usize,

    /// Distinct replacements among fixed pixels, in first-seen order.
    pub mismatches: Vec<Mismatch>,

    /// Largest replacement distance among fixed pixels.
    pub max_distance: f64,
}

impl NormalizeReport {
    /// True if nothing was replaced.
    pub fn is_untouched(&self) -> bool {
        self.fixed_pixels == 0 && self.semi_transparent_pixels == 0
    }

    /// Whether every replacement stayed within `threshold`.
    pub fn is_clean(&self, threshold: f64) -> bool {
        self.max_distance <= threshold
    }
}

/// Normalize every pixel of `image` in place.
pub fn normalize_image(palette: &Palette, image: &mut Raster) -> NormalizeReport {
    let mut report = NormalizeReport::default();
    let mut seen: HashSet<(Colour, Colour)> = HashSet::new();

    for pixel in image.pixels_mut() {
        let original = *pixel;
        match normalize_colour(palette, original) {
            Normalized::Transparent => *pixel = Colour::TRANSPARENT,
            Normalized::Exact(_) => {}
            Normalized::Nearest { colour, distance } => {
                if (original.r, original.g) == (colour.r, colour.g) {
                    report.semi_transparent_pixels += 1;
                } else {
                    report.fixed_pixels += 1;
                    if seen.insert((original, colour)) {
                        report.mismatches.push(Mismatch {
                            original,
                            replacement: colour,
                            distance,
                        });
                        report.max_distance = report.max_distance.max(distance);
                    }
                }
                *pixel = colour;
            }
        }
    }

    report
}
