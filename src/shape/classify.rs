//! Edge/interior classification of a normalized sub-image.
//!
//! This is a single row-major pass over local adjacency, not a contour
//! tracer. Transparent pixels discovered while sampling ahead are cached so
//! later pixels can test their neighbours in O(1). Holes that are never
//! sampled ahead of time can be missed, so the result is only exact for
//! near-convex shapes. That approximation is intentional: downstream masks
//! depend on it.

use crate::render::Raster;

use super::neighbours;

/// Classification of a single pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClass {
    Transparent,
    Edge,
    Interior,
}

/// Per-pixel classification of one sub-image.
#[derive(Debug, Clone)]
pub struct Classification {
    width: usize,
    height: usize,
    classes: Vec<PixelClass>,
}

impl Classification {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Class of the pixel at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<PixelClass> {
        if x < self.width && y < self.height {
            Some(self.classes[y * self.width + x])
        } else {
            None
        }
    }

    /// All classes, row-major.
    pub fn classes(&self) -> &[PixelClass] {
        &self.classes
    }

    /// Flat indices of every pixel with the given class.
    pub fn indices_of(&self, class: PixelClass) -> impl Iterator<Item = usize> + '_ {
        self.classes
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| c == class)
            .map(|(i, _)| i)
    }

    /// Number of pixels with the given class.
    pub fn count(&self, class: PixelClass) -> usize {
        self.classes.iter().filter(|&&c| c == class).count()
    }
}

/// Classify every pixel of `image` as transparent, edge or interior.
pub fn classify(image: &Raster) -> Classification {
    let (width, height) = image.size();
    let mut known_transparent = vec![false; width * height];
    let mut classes = vec![PixelClass::Transparent; width * height];

    for y in 0..height {
        for x in 0..width {
            let i = image.index(x, y);
            if known_transparent[i] {
                continue;
            }
            if image.pixels()[i].is_transparent() {
                known_transparent[i] = true;
                continue;
            }

            classes[i] = if is_edge(image, &mut known_transparent, x, y) {
                PixelClass::Edge
            } else {
                PixelClass::Interior
            };
        }
    }

    Classification {
        width,
        height,
        classes,
    }
}

/// Decide whether an opaque pixel sits on the shape boundary.
///
/// Samples a few pixels ahead of the scan (more on row 1 and column 1, where
/// the pixels above or to the left were border pixels and never sampled) and
/// records any transparent ones in `known_transparent`.
fn is_edge(image: &Raster, known_transparent: &mut [bool], x: usize, y: usize) -> bool {
    let (width, height) = image.size();
    if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
        return true;
    }

    let ahead = [(x + 1, y), (x - 1, y + 1), (x, y + 1), (x + 1, y + 1)];
    let samples = if y == 1 {
        &ahead[..]
    } else if x == 1 {
        &ahead[1..]
    } else {
        &ahead[3..]
    };

    let mut found = false;
    for &(sx, sy) in samples {
        let i = image.index(sx, sy);
        if image.pixels()[i].is_transparent() {
            known_transparent[i] = true;
            found = true;
        }
    }
    if found {
        return true;
    }

    neighbours(x, y, width, height).any(|i| known_transparent[i])
}
