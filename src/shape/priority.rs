//! Priority masks.
//!
//! The mask is built by eroding a shape from its edge inward, one ring per
//! pass, painting each ring with a slightly lower grey than the last. After
//! the final pass everything left over gets the base value for the entry's
//! priority. Consumers key off these exact band values.

use crate::render::Raster;
use crate::types::{Colour, Priority};

use super::classify::{classify, Classification, PixelClass};
use super::neighbours;

/// Number of rings painted before the remaining interior is flooded.
pub const EROSION_PASSES: u8 = 6;

/// Extra value given to the outermost ring.
const RING_HEADROOM: u16 = 25;

/// Drop in value between consecutive rings.
const RING_STEP: u16 = 5;

/// Grey value painted on ring `pass` (0 = outermost).
pub fn band_value(priority: Priority, pass: u8) -> u8 {
    let value = u16::from(priority.base_band()) + RING_HEADROOM - RING_STEP * u16::from(pass);
    assert!(
        value <= u16::from(u8::MAX),
        "priority band {} for pass {} exceeds 255",
        value,
        pass
    );
    value as u8
}

/// Build the priority mask for an already classified sub-image.
pub fn priority_mask(classification: &Classification, priority: Priority) -> Raster {
    let width = classification.width();
    let height = classification.height();
    let mut mask = Raster::transparent(width, height);

    let mut interior: Vec<bool> = classification
        .classes()
        .iter()
        .map(|&c| c == PixelClass::Interior)
        .collect();
    let mut frontier: Vec<usize> = classification.indices_of(PixelClass::Edge).collect();

    for pass in 0..EROSION_PASSES {
        let colour = Colour::grey(band_value(priority, pass));
        let mut next = Vec::new();

        for &i in &frontier {
            mask.pixels_mut()[i] = colour;
            for n in neighbours(i % width, i / width, width, height) {
                if interior[n] {
                    interior[n] = false;
                    next.push(n);
                }
            }
        }

        frontier = next;
    }

    let base = Colour::grey(priority.base_band());
    for i in frontier {
        mask.pixels_mut()[i] = base;
    }
    for (i, inside) in interior.into_iter().enumerate() {
        if inside {
            mask.pixels_mut()[i] = base;
        }
    }

    mask
}

/// Classify `image` and build its priority mask.
pub fn generate_priority_mask(image: &Raster, priority: Priority) -> Raster {
    priority_mask(&classify(image), priority)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILL: Colour = Colour::rgb(0, 163, 104);

    fn priority(value: i64) -> Priority {
        Priority::new("test", value).unwrap()
    }

    fn grey_at(mask: &Raster, x: usize, y: usize) -> u8 {
        let c = mask.get(x, y).unwrap();
        assert_eq!((c.r, c.g, c.a), (c.b, c.b, 255), "not a grey mask pixel at ({}, {})", x, y);
        c.b
    }

    #[test]
    fn test_band_values() {
        let p = priority(1);
        let bands: Vec<u8> = (0..EROSION_PASSES).map(|pass| band_value(p, pass)).collect();
        assert_eq!(bands, vec![48, 43, 38, 33, 28, 23]);
        assert_eq!(band_value(priority(10), 0), 255);
    }

    #[test]
    fn test_solid_square_center_and_ring() {
        let image = Raster::filled(15, 15, FILL);
        let mask = generate_priority_mask(&image, priority(1));

        assert_eq!(grey_at(&mask, 7, 7), 23);
        for i in 0..15 {
            assert_eq!(grey_at(&mask, i, 0), 48);
            assert_eq!(grey_at(&mask, 0, i), 48);
            assert_eq!(grey_at(&mask, i, 14), 48);
            assert_eq!(grey_at(&mask, 14, i), 48);
        }
    }

    #[test]
    fn test_rings_step_inward() {
        let image = Raster::filled(20, 20, FILL);
        let mask = generate_priority_mask(&image, priority(2));

        let expected = [71, 66, 61, 56, 51, 46, 46, 46, 46, 46];
        for (ring, &value) in expected.iter().enumerate() {
            assert_eq!(grey_at(&mask, ring, 10), value, "ring {}", ring);
        }
    }

    #[test]
    fn test_transparent_pixels_stay_transparent() {
        let mut image = Raster::filled(5, 5, FILL);
        image.set(2, 2, Colour::TRANSPARENT);
        let mask = generate_priority_mask(&image, priority(3));
        assert_eq!(mask.get(2, 2), Some(Colour::TRANSPARENT));
        // Everything around the hole is edge.
        assert_eq!(grey_at(&mask, 1, 1), 69 + 25);
    }

    #[test]
    fn test_small_shape_is_all_outer_ring() {
        let image = Raster::filled(2, 3, FILL);
        let mask = generate_priority_mask(&image, priority(1));
        assert!(mask.pixels().iter().all(|&c| c == Colour::grey(48)));
    }

    #[test]
    fn test_highest_priority_stays_in_range() {
        let image = Raster::filled(30, 30, FILL);
        let mask = generate_priority_mask(&image, priority(10));
        assert_eq!(grey_at(&mask, 0, 0), 255);
        assert_eq!(grey_at(&mask, 15, 15), 230);
    }
}
