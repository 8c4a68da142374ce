use crate::foundation::core::{Rect, Rotation};

/// Rotate `rect` clockwise by `angle` inside a `width` x `height` surface.
///
/// `width`/`height` describe the surface before rotation; for 90 and 270 degrees the result lives
/// in a `height` x `width` surface.
pub fn rotate_rect(rect: Rect, angle: Rotation, width: i32, height: i32) -> Rect {
    let (l, t, r, b) = (rect.left, rect.top, rect.right(), rect.bottom());
    match angle {
        Rotation::Deg0 => rect,
        Rotation::Deg90 => Rect::from_edges(height - b, l, height - t, r),
        Rotation::Deg180 => Rect::from_edges(width - r, height - b, width - l, height - t),
        Rotation::Deg270 => Rect::from_edges(t, width - r, b, width - l),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geom/rotate.rs"]
mod tests;
