//! Compositing and erasing sub-images on canvases.

use crate::error::{AssemblerError, Result};
use crate::types::{Colour, TemplateEntry};

use super::Raster;

/// Binarized alpha channel of a sub-image: opaque wherever alpha is non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransparencyMask {
    width: usize,
    height: usize,
    opaque: Vec<bool>,
}

impl TransparencyMask {
    /// Derive the mask from an image's alpha channel.
    pub fn from_image(image: &Raster) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            opaque: image.pixels().iter().map(|c| c.a != 0).collect(),
        }
    }

    /// A mask that is opaque everywhere.
    pub fn solid(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            opaque: vec![true; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_opaque(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.opaque[y * self.width + x]
    }
}

/// What an erased pixel becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    /// Full transparency, for colour canvases.
    Transparent,
    /// Opaque black, meaning "no priority" on the priority canvas.
    NoPriority,
}

impl EraseMode {
    pub fn fill(self) -> Colour {
        match self {
            EraseMode::Transparent => Colour::TRANSPARENT,
            EraseMode::NoPriority => Colour::BLACK,
        }
    }
}

/// Check that `entry`'s placed rectangle of `width` x `height` lies on the canvas.
///
/// Returns the placement as unsigned coordinates.
pub fn placement(
    entry: &TemplateEntry,
    width: usize,
    height: usize,
    canvas: &Raster,
) -> Result<(usize, usize)> {
    let fits = entry.x >= 0
        && entry.y >= 0
        && span_end(entry.x, width).is_some_and(|x2| x2 <= canvas.width() as i64)
        && span_end(entry.y, height).is_some_and(|y2| y2 <= canvas.height() as i64);

    if !fits {
        return Err(AssemblerError::Geometry {
            message: format!(
                "'{}' is not entirely on canvas: {}x{} at ({}, {}) on a {}x{} canvas",
                entry.name,
                width,
                height,
                entry.x,
                entry.y,
                canvas.width(),
                canvas.height()
            ),
            help: Some("Move the entry or crop its image so it fits inside the canvas".to_string()),
        });
    }

    Ok((entry.x as usize, entry.y as usize))
}

/// End coordinate (exclusive) of a run of `len` pixels starting at `origin`.
///
/// `None` when the coordinate does not fit in an `i64`.
pub(crate) fn span_end(origin: i64, len: usize) -> Option<i64> {
    i64::try_from(len).ok().and_then(|len| origin.checked_add(len))
}

/// Alpha-composite `image` onto `canvas` at the entry's position.
pub fn composite(canvas: &mut Raster, entry: &TemplateEntry, image: &Raster) -> Result<()> {
    let (ox, oy) = placement(entry, image.width(), image.height(), canvas)?;

    for sy in 0..image.height() {
        for sx in 0..image.width() {
            let src = image.pixels()[image.index(sx, sy)];
            let i = canvas.index(ox + sx, oy + sy);
            let dst = canvas.pixels()[i];
            canvas.pixels_mut()[i] = over(src, dst);
        }
    }

    Ok(())
}

/// Overwrite the entry's footprint with `mode`'s fill wherever `mask` is opaque.
///
/// Pixels falling outside the canvas are skipped.
pub fn erase(canvas: &mut Raster, entry: &TemplateEntry, mask: &TransparencyMask, mode: EraseMode) {
    let fill = mode.fill();
    for my in 0..mask.height() {
        let Some(y) = span_end(entry.y, my) else {
            break;
        };
        if y < 0 || y >= canvas.height() as i64 {
            continue;
        }
        for mx in 0..mask.width() {
            let Some(x) = span_end(entry.x, mx) else {
                break;
            };
            if x < 0 || x >= canvas.width() as i64 || !mask.is_opaque(mx, my) {
                continue;
            }
            canvas.set(x as usize, y as usize, fill);
        }
    }
}

/// Porter-Duff "over": `src` drawn on top of `dst`.
fn over(src: Colour, dst: Colour) -> Colour {
    match src.a {
        255 => return src,
        0 => return dst,
        _ => {}
    }

    let sa = f32::from(src.a) / 255.0;
    let da = f32::from(dst.a) / 255.0 * (1.0 - sa);
    let out_a = sa + da;
    if out_a <= 0.0 {
        return Colour::TRANSPARENT;
    }

    let channel = |s: u8, d: u8| -> u8 {
        ((f32::from(s) * sa + f32::from(d) * da) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Colour::new(
        channel(src.r, dst.r),
        channel(src.g, dst.g),
        channel(src.b, dst.b),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Colour = Colour::rgb(190, 0, 57);
    const BLUE: Colour = Colour::rgb(36, 80, 164);

    fn entry(x: i64, y: i64) -> TemplateEntry {
        TemplateEntry::new("test", x, y).with_image("test.png")
    }

    #[test]
    fn test_composite_places_pixels() {
        let mut canvas = Raster::transparent(10, 10);
        let image = Raster::filled(3, 2, RED);
        composite(&mut canvas, &entry(4, 5), &image).unwrap();

        assert_eq!(canvas.get(4, 5), Some(RED));
        assert_eq!(canvas.get(6, 6), Some(RED));
        assert_eq!(canvas.get(7, 5), Some(Colour::TRANSPARENT));
        assert_eq!(canvas.get(4, 7), Some(Colour::TRANSPARENT));
    }

    #[test]
    fn test_composite_keeps_destination_under_transparency() {
        let mut canvas = Raster::filled(4, 4, BLUE);
        let mut image = Raster::filled(2, 2, RED);
        image.set(1, 1, Colour::TRANSPARENT);
        composite(&mut canvas, &entry(0, 0), &image).unwrap();

        assert_eq!(canvas.get(0, 0), Some(RED));
        assert_eq!(canvas.get(1, 1), Some(BLUE));
    }

    #[test]
    fn test_composite_exact_fit() {
        let mut canvas = Raster::transparent(10, 10);
        let image = Raster::filled(5, 5, RED);
        assert!(composite(&mut canvas, &entry(5, 5), &image).is_ok());
        assert_eq!(canvas.get(9, 9), Some(RED));
    }

    #[test]
    fn test_composite_off_canvas_is_fatal() {
        let mut canvas = Raster::transparent(10, 10);
        let image = Raster::filled(5, 5, RED);

        for (x, y) in [(6, 0), (0, 6), (-1, 0), (0, -1)] {
            let err = composite(&mut canvas, &entry(x, y), &image).unwrap_err();
            assert!(matches!(err, AssemblerError::Geometry { .. }));
            assert!(err.to_string().contains("'test'"));
        }
        assert!(canvas.pixels().iter().all(|&c| c == Colour::TRANSPARENT));
    }

    #[test]
    fn test_far_away_entry_is_geometry_error() {
        let mut canvas = Raster::transparent(10, 10);
        let image = Raster::filled(2, 2, RED);

        for (x, y) in [(i64::MAX, 0), (0, i64::MAX), (i64::MAX - 1, i64::MAX - 1)] {
            let err = composite(&mut canvas, &entry(x, y), &image).unwrap_err();
            assert!(matches!(err, AssemblerError::Geometry { .. }));
        }
    }

    #[test]
    fn test_erase_far_away_entry_is_noop() {
        let mut canvas = Raster::filled(4, 4, BLUE);
        let mask = TransparencyMask::solid(3, 3);
        erase(&mut canvas, &entry(i64::MAX - 1, 0), &mask, EraseMode::Transparent);
        erase(&mut canvas, &entry(0, i64::MAX), &mask, EraseMode::Transparent);
        assert!(canvas.pixels().iter().all(|&c| c == BLUE));
    }

    #[test]
    fn test_composite_then_erase_clears_footprint() {
        let mut canvas = Raster::transparent(8, 8);
        let image = Raster::filled(4, 4, RED);
        let placed = entry(2, 2);

        composite(&mut canvas, &placed, &image).unwrap();
        erase(&mut canvas, &placed, &TransparencyMask::solid(4, 4), EraseMode::Transparent);

        assert!(canvas.pixels().iter().all(|&c| c == Colour::TRANSPARENT));
    }

    #[test]
    fn test_erase_follows_mask() {
        let mut canvas = Raster::filled(3, 3, BLUE);
        let mut image = Raster::filled(3, 3, RED);
        image.set(1, 1, Colour::TRANSPARENT);
        let mask = TransparencyMask::from_image(&image);

        erase(&mut canvas, &entry(0, 0), &mask, EraseMode::Transparent);

        assert_eq!(canvas.get(0, 0), Some(Colour::TRANSPARENT));
        assert_eq!(canvas.get(1, 1), Some(BLUE));
    }

    #[test]
    fn test_erase_no_priority_fills_black() {
        let mut canvas = Raster::filled(2, 2, Colour::grey(48));
        erase(&mut canvas, &entry(0, 0), &TransparencyMask::solid(1, 2), EraseMode::NoPriority);
        assert_eq!(canvas.get(0, 1), Some(Colour::BLACK));
        assert_eq!(canvas.get(1, 1), Some(Colour::grey(48)));
    }

    #[test]
    fn test_erase_clips_to_canvas() {
        let mut canvas = Raster::filled(4, 4, BLUE);
        erase(&mut canvas, &entry(-2, 3), &TransparencyMask::solid(4, 4), EraseMode::Transparent);
        assert_eq!(canvas.get(0, 3), Some(Colour::TRANSPARENT));
        assert_eq!(canvas.get(1, 3), Some(Colour::TRANSPARENT));
        assert_eq!(canvas.get(2, 3), Some(BLUE));
        assert_eq!(canvas.get(0, 2), Some(BLUE));
    }

    #[test]
    fn test_mask_binarizes_any_alpha() {
        let image = Raster::from_rows(vec![vec![
            Colour::new(0, 0, 0, 0),
            Colour::new(0, 0, 0, 1),
            Colour::new(0, 0, 0, 255),
        ]]);
        let mask = TransparencyMask::from_image(&image);
        assert!(!mask.is_opaque(0, 0));
        assert!(mask.is_opaque(1, 0));
        assert!(mask.is_opaque(2, 0));
    }

    #[test]
    fn test_over_blends_partial_alpha() {
        let result = over(Colour::new(255, 255, 255, 128), Colour::BLACK);
        assert_eq!(result.a, 255);
        assert_eq!(result.r, 128);
        assert_eq!(over(Colour::TRANSPARENT, Colour::TRANSPARENT), Colour::TRANSPARENT);
    }
}
