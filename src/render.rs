use crate::geometry::Rect;
use crate::keys::{KeySet, NUM_WHITE_KEYS};
use crate::layout::KeyboardLayout;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DrawColor {
    White,
    Black,
    Pressed,
}

/// One primitive for the render surface. Frontends map `DrawColor` to actual
/// pixel values and rasterize in list order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: DrawColor,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: DrawColor,
    },
}

/// Builds the frame's draw list: white key fills, the interior key
/// separators, then black key fills. Blacks come last so they paint over the
/// whites they overlap.
pub fn scene(layout: &KeyboardLayout, pressed_white: KeySet, pressed_black: KeySet) -> Vec<DrawOp> {
    let mut ops = Vec::with_capacity(layout.whites().len() + layout.blacks().len() + 13);

    for k in layout.whites() {
        let color = if pressed_white.contains(k.id) {
            DrawColor::Pressed
        } else {
            DrawColor::White
        };
        ops.push(DrawOp::FillRect {
            rect: k.rect,
            color,
        });
    }

    let unit = layout.white_unit();
    for i in 1..NUM_WHITE_KEYS {
        let x = i as f32 * unit;
        ops.push(DrawOp::Line {
            x1: x,
            y1: 0.0,
            x2: x,
            y2: layout.height(),
            color: DrawColor::Black,
        });
    }

    for k in layout.blacks() {
        let color = if pressed_black.contains(k.id) {
            DrawColor::Pressed
        } else {
            DrawColor::Black
        };
        ops.push(DrawOp::FillRect {
            rect: k.rect,
            color,
        });
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyId;

    #[test]
    fn scene_draws_whites_then_lines_then_blacks() {
        let l = KeyboardLayout::compute(1400.0, 300.0);
        let ops = scene(&l, KeySet::EMPTY, KeySet::EMPTY);
        assert_eq!(ops.len(), 14 + 13 + 10);

        for op in &ops[..14] {
            assert!(matches!(
                op,
                DrawOp::FillRect {
                    color: DrawColor::White,
                    ..
                }
            ));
        }
        for op in &ops[14..27] {
            assert!(matches!(
                op,
                DrawOp::Line {
                    color: DrawColor::Black,
                    ..
                }
            ));
        }
        for op in &ops[27..] {
            assert!(matches!(
                op,
                DrawOp::FillRect {
                    color: DrawColor::Black,
                    ..
                }
            ));
        }
    }

    #[test]
    fn pressed_keys_change_fill_color() {
        let l = KeyboardLayout::compute(1400.0, 300.0);
        let mut whites = KeySet::EMPTY;
        whites.insert(KeyId(1));
        let mut blacks = KeySet::EMPTY;
        blacks.insert(KeyId(2));

        let ops = scene(&l, whites, blacks);

        assert!(matches!(
            ops[0],
            DrawOp::FillRect {
                color: DrawColor::Pressed,
                ..
            }
        ));
        assert!(matches!(
            ops[1],
            DrawOp::FillRect {
                color: DrawColor::White,
                ..
            }
        ));
        // First black key (id 2) is the first op after the separators.
        assert!(matches!(
            ops[27],
            DrawOp::FillRect {
                color: DrawColor::Pressed,
                ..
            }
        ));
        assert!(matches!(
            ops[28],
            DrawOp::FillRect {
                color: DrawColor::Black,
                ..
            }
        ));
    }

    #[test]
    fn separators_sit_on_white_boundaries() {
        let l = KeyboardLayout::compute(1400.0, 300.0);
        let ops = scene(&l, KeySet::EMPTY, KeySet::EMPTY);

        let xs: Vec<f32> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { x1, .. } => Some(*x1),
                _ => None,
            })
            .collect();
        let expected: Vec<f32> = (1..14).map(|i| i as f32 * 100.0).collect();
        assert_eq!(xs, expected);
    }
}
