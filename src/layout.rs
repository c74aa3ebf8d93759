use crate::geometry::Rect;
use crate::keys::{KeyColor, KeyId, SampleId, BLACK_SAMPLES, NUM_WHITE_KEYS, WHITE_SAMPLES};

/// Black keys span the top portion of the height only.
pub const BLACK_HEIGHT_FRACTION: f32 = 0.67;

/// Half-width of a black key, in white-key units.
pub const BLACK_HALF_WIDTH: f32 = 0.25;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Key {
    pub id: KeyId,
    pub color: KeyColor,
    pub rect: Rect,
    pub sample: SampleId,
}

/// Key geometry for a given surface size.
///
/// Kept in a core module so desktop + Android can share the same layout.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardLayout {
    width: f32,
    height: f32,
    whites: Vec<Key>,
    blacks: Vec<Key>,
}

impl KeyboardLayout {
    /// Computes the 14 white and 10 black key rectangles.
    ///
    /// White key i (0-based) spans one fourteenth of the width, full height.
    /// The black key with id k is centered on the boundary between white keys
    /// k-1 and k, half a white key wide, top 67% of the height. Non-positive
    /// or non-finite sizes produce zero-area rects that hit-test nothing.
    pub fn compute(width: f32, height: f32) -> Self {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };

        let unit = width / NUM_WHITE_KEYS as f32;
        let black_bottom = BLACK_HEIGHT_FRACTION * height;

        let whites = WHITE_SAMPLES
            .iter()
            .enumerate()
            .map(|(i, &sample)| Key {
                id: KeyId(i as u8 + 1),
                color: KeyColor::White,
                rect: Rect::new(i as f32 * unit, 0.0, (i + 1) as f32 * unit, height),
                sample,
            })
            .collect();

        let blacks = BLACK_SAMPLES
            .iter()
            .map(|&(id, sample)| {
                let boundary = (id - 1) as f32 * unit;
                Key {
                    id: KeyId(id),
                    color: KeyColor::Black,
                    rect: Rect::new(
                        boundary - BLACK_HALF_WIDTH * unit,
                        0.0,
                        boundary + BLACK_HALF_WIDTH * unit,
                        black_bottom,
                    ),
                    sample,
                }
            })
            .collect();

        Self {
            width,
            height,
            whites,
            blacks,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn white_unit(&self) -> f32 {
        self.width / NUM_WHITE_KEYS as f32
    }

    pub fn whites(&self) -> &[Key] {
        &self.whites
    }

    pub fn blacks(&self) -> &[Key] {
        &self.blacks
    }

    pub fn black_at(&self, x: f32, y: f32) -> Option<&Key> {
        self.blacks.iter().find(|k| k.rect.contains(x, y))
    }

    pub fn white_at(&self, x: f32, y: f32) -> Option<&Key> {
        self.whites.iter().find(|k| k.rect.contains(x, y))
    }

    /// Resolves a point to a key. Black keys overlap the whites below them
    /// and always win.
    pub fn key_at(&self, x: f32, y: f32) -> Option<&Key> {
        self.black_at(x, y).or_else(|| self.white_at(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whites_tile_the_width() {
        let l = KeyboardLayout::compute(1400.0, 300.0);
        assert_eq!(l.whites().len(), 14);

        assert_eq!(l.whites()[0].rect.left, 0.0);
        for pair in l.whites().windows(2) {
            assert_eq!(pair[0].rect.right, pair[1].rect.left);
        }
        let last = l.whites().last().unwrap();
        assert!((last.rect.right - 1400.0).abs() < 1e-3);

        for (i, k) in l.whites().iter().enumerate() {
            assert_eq!(k.id, KeyId(i as u8 + 1));
            assert_eq!(k.rect.top, 0.0);
            assert_eq!(k.rect.bottom, 300.0);
            assert_eq!(k.rect.width(), 100.0);
        }
    }

    #[test]
    fn blacks_straddle_boundaries_in_top_two_thirds() {
        let l = KeyboardLayout::compute(1400.0, 300.0);
        assert_eq!(l.blacks().len(), 10);

        for k in l.blacks() {
            let boundary = (k.id.0 - 1) as f32 * 100.0;
            assert_eq!(k.rect.left, boundary - 25.0);
            assert_eq!(k.rect.right, boundary + 25.0);
            assert_eq!(k.rect.top, 0.0);
            assert_eq!(k.rect.bottom, BLACK_HEIGHT_FRACTION * 300.0);
            assert!(k.rect.left >= 0.0 && k.rect.right <= 1400.0);
        }

        let ids: Vec<u8> = l.blacks().iter().map(|k| k.id.0).collect();
        assert_eq!(ids, vec![2, 3, 5, 6, 7, 9, 10, 12, 13, 14]);
    }

    #[test]
    fn black_wins_over_white_on_overlap() {
        let l = KeyboardLayout::compute(1400.0, 300.0);

        // Just right of the C2/D2 boundary, inside the Db2 rect and also
        // geometrically inside white key 2.
        let k = l.key_at(110.0, 50.0).unwrap();
        assert_eq!(k.color, KeyColor::Black);
        assert_eq!(k.id, KeyId(2));
        assert_eq!(k.sample, SampleId::Db2);

        // Same x below the black key's bottom lands on white key 2.
        let k = l.key_at(110.0, 250.0).unwrap();
        assert_eq!(k.color, KeyColor::White);
        assert_eq!(k.id, KeyId(2));
        assert_eq!(k.sample, SampleId::D2);
    }

    #[test]
    fn no_key_outside_the_surface() {
        let l = KeyboardLayout::compute(1400.0, 300.0);
        assert_eq!(l.key_at(-1.0, 50.0), None);
        assert_eq!(l.key_at(1400.0, 50.0), None);
        assert_eq!(l.key_at(700.0, 300.0), None);
        assert_eq!(l.key_at(700.0, -0.1), None);
    }

    #[test]
    fn degenerate_sizes_hit_test_nothing() {
        for (w, h) in [(0.0, 300.0), (1400.0, 0.0), (-5.0, 300.0), (f32::NAN, 300.0)] {
            let l = KeyboardLayout::compute(w, h);
            assert_eq!(l.whites().len(), 14);
            assert_eq!(l.blacks().len(), 10);
            assert!(l.whites().iter().chain(l.blacks()).all(|k| !k.rect.has_area()));
            assert_eq!(l.key_at(0.0, 0.0), None);
        }
    }

    #[test]
    fn same_size_computes_the_same_layout() {
        let a = KeyboardLayout::compute(733.0, 412.0);
        let b = KeyboardLayout::compute(733.0, 412.0);
        assert_eq!(a, b);
    }
}
