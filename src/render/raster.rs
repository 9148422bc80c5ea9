//! Flat RGBA pixel grids.

use image::RgbaImage;

use crate::types::Colour;

/// A grid of colours stored row-major in one flat buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Colour>,
}

impl Raster {
    /// Create a raster filled with a single colour.
    pub fn filled(width: usize, height: usize, colour: Colour) -> Self {
        Self {
            width,
            height,
            pixels: vec![colour; width * height],
        }
    }

    /// Create a fully transparent raster.
    pub fn transparent(width: usize, height: usize) -> Self {
        Self::filled(width, height, Colour::TRANSPARENT)
    }

    /// Build from nested rows (`rows[y][x]`).
    pub fn from_rows(rows: Vec<Vec<Colour>>) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        let mut pixels = Vec::with_capacity(width * height);
        for row in rows {
            debug_assert_eq!(row.len(), width, "ragged raster rows");
            pixels.extend(row);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Get the width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the dimensions as (width, height).
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Flat index of `(x, y)`. Callers must stay in bounds.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Get a pixel at the given position.
    pub fn get(&self, x: usize, y: usize) -> Option<Colour> {
        if x < self.width && y < self.height {
            Some(self.pixels[self.index(x, y)])
        } else {
            None
        }
    }

    /// Set a pixel; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, colour: Colour) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = colour;
        }
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Colour] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Colour] {
        &mut self.pixels
    }

    /// Copy out the rectangle `[x1, x2) x [y1, y2)`.
    ///
    /// The rectangle must lie within the raster.
    pub fn crop(&self, x1: usize, y1: usize, x2: usize, y2: usize) -> Raster {
        let width = x2.saturating_sub(x1);
        let height = y2.saturating_sub(y1);
        let mut pixels = Vec::with_capacity(width * height);
        for y in y1..y1 + height {
            let start = self.index(x1, y);
            pixels.extend_from_slice(&self.pixels[start..start + width]);
        }
        Raster {
            width,
            height,
            pixels,
        }
    }

    /// Convert from an `image` RGBA buffer.
    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        Self {
            width: img.width() as usize,
            height: img.height() as usize,
            pixels: img.pixels().map(|p| Colour::from_rgba(p.0)).collect(),
        }
    }

    /// Convert to an `image` RGBA buffer.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut buffer = Vec::with_capacity(self.pixels.len() * 4);
        for colour in &self.pixels {
            buffer.extend_from_slice(&colour.to_rgba());
        }
        RgbaImage::from_raw(self.width as u32, self.height as u32, buffer)
            .unwrap_or_else(|| RgbaImage::new(self.width as u32, self.height as u32))
    }
}
