use super::*;

const W: i32 = 100;
const H: i32 = 50;

#[test]
fn identity_leaves_rect_alone() {
    let r = Rect::new(3, 4, 10, 20);
    assert_eq!(rotate_rect(r, Rotation::Deg0, W, H), r);
}

#[test]
fn quarter_turn_swaps_extent() {
    let r = Rect::new(10, 5, 20, 8);
    let q = rotate_rect(r, Rotation::Deg90, W, H);
    assert_eq!(q, Rect::from_edges(H - 13, 10, H - 5, 30));
    assert_eq!((q.width, q.height), (8, 20));
}

#[test]
fn half_turn_mirrors_both_axes() {
    let r = Rect::new(0, 0, 10, 10);
    assert_eq!(rotate_rect(r, Rotation::Deg180, W, H), Rect::new(90, 40, 10, 10));
}

#[test]
fn rotation_then_inverse_is_identity() {
    let r = Rect::new(7, 11, 13, 17);
    for angle in [Rotation::Deg90, Rotation::Deg180, Rotation::Deg270] {
        let rotated = rotate_rect(r, angle, W, H);
        let (w2, h2) = if angle.swaps_axes() { (H, W) } else { (W, H) };
        assert_eq!(rotate_rect(rotated, angle.inverse(), w2, h2), r, "{angle:?}");
    }
}

#[test]
fn full_surface_maps_to_full_surface() {
    let full = Rect::new(0, 0, W, H);
    assert_eq!(rotate_rect(full, Rotation::Deg90, W, H), Rect::new(0, 0, H, W));
    assert_eq!(rotate_rect(full, Rotation::Deg270, W, H), Rect::new(0, 0, H, W));
}
