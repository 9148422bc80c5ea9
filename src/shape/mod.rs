//! Shape analysis: edge/interior classification and priority masks.

mod classify;
mod priority;

pub use classify::{classify, Classification, PixelClass};
pub use priority::{band_value, generate_priority_mask, priority_mask, EROSION_PASSES};

const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Flat indices of the in-bounds 8-neighbours of `(x, y)`.
pub(crate) fn neighbours(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
) -> impl Iterator<Item = usize> {
    NEIGHBOUR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        (nx < width && ny < height).then_some(ny * width + nx)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours_corner() {
        let mut found: Vec<usize> = neighbours(0, 0, 3, 3).collect();
        found.sort();
        assert_eq!(found, vec![1, 3, 4]);
    }

    #[test]
    fn test_neighbours_middle() {
        assert_eq!(neighbours(1, 1, 3, 3).count(), 8);
        assert!(neighbours(1, 1, 3, 3).all(|i| i != 4));
    }
}
