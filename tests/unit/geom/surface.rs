use super::*;
use crate::foundation::core::BufferId;
use crate::foundation::error::BlitErrorKind;

fn buffer(addr: u64, len: usize) -> BufferDesc {
    BufferDesc::new(BufferId(1), addr, len)
}

fn rgba(w: u32, h: u32) -> SurfaceGeom {
    SurfaceGeom::new(w, h, w * 4, FormatCode::RGBA8888)
}

#[test]
fn aligned_surface_has_no_shift() {
    let s = resolve_surface(&buffer(0x1000, 64 * 256), &rgba(64, 64), Rect::new(0, 0, 64, 64))
        .unwrap();
    assert_eq!(s.align, Alignment::default());
    assert_eq!(s.rect, Rect::new(0, 0, 64, 64));
    assert_eq!(s.aligned_width, 64);
    assert_eq!(s.planes.len(), 1);
    assert_eq!(s.base_offset(), 0);
}

#[test]
fn misalignment_shifts_origin_and_widens_surface() {
    let s = resolve_surface(&buffer(0x1010, 64 * 256), &rgba(64, 64), Rect::new(2, 3, 10, 10))
        .unwrap();
    assert_eq!(s.align.remainder, 16);
    assert_eq!(s.align.pixalign, 4);
    assert_eq!(s.rect, Rect::new(6, 3, 10, 10));
    assert_eq!(s.aligned_width, 68);
    assert_eq!(s.base_offset(), -16);
}

#[test]
fn misalignment_must_be_whole_pixels() {
    let err = resolve_surface(&buffer(0x1002, 64 * 256), &rgba(64, 64), Rect::new(0, 0, 4, 4))
        .unwrap_err();
    assert_eq!(err.kind(), BlitErrorKind::InvalidArgument);
}

#[test]
fn rect_bounds_are_checked_in_the_logical_view() {
    let geom = rgba(64, 32).rotated(Rotation::Deg90);
    // Logical view is 32 wide, 64 high.
    assert!(resolve_surface(&buffer(0, 64 * 32 * 4), &geom, Rect::new(0, 0, 32, 64)).is_ok());
    let err = resolve_surface(&buffer(0, 64 * 32 * 4), &geom, Rect::new(0, 0, 64, 32))
        .unwrap_err();
    assert_eq!(err.kind(), BlitErrorKind::InvalidRectangle);
    let err = resolve_surface(&buffer(0, 64 * 32 * 4), &geom, Rect::new(0, 0, -1, 4))
        .unwrap_err();
    assert_eq!(err.kind(), BlitErrorKind::InvalidRectangle);
}

#[test]
fn rotated_rect_maps_to_memory_orientation() {
    let geom = rgba(64, 32).rotated(Rotation::Deg90);
    let s = resolve_surface(&buffer(0, 64 * 32 * 4), &geom, Rect::new(0, 0, 8, 16)).unwrap();
    // Logical (32x64) rotated back by 270 degrees into the 64x32 memory layout.
    assert_eq!(s.rect, Rect::new(0, 24, 16, 8));
    assert_eq!(s.to_physical(s.logical_rect), s.rect);
}

#[test]
fn mirror_axes_swap_on_quarter_turn() {
    let geom = rgba(16, 16).rotated(Rotation::Deg270).mirrored(Mirror {
        horizontal: true,
        vertical: false,
    });
    let s = resolve_surface(&buffer(0, 16 * 64), &geom, Rect::new(0, 0, 16, 16)).unwrap();
    assert!(s.hw_mirror.vertical);
    assert!(!s.hw_mirror.horizontal);
}

#[test]
fn buffer_too_small_is_rejected() {
    let err =
        resolve_surface(&buffer(0, 100), &rgba(64, 64), Rect::new(0, 0, 1, 1)).unwrap_err();
    assert_eq!(err.kind(), BlitErrorKind::InvalidArgument);
}

#[test]
fn short_stride_is_rejected() {
    let geom = SurfaceGeom::new(64, 64, 128, FormatCode::RGBA8888);
    assert!(resolve_surface(&buffer(0, 1 << 20), &geom, Rect::new(0, 0, 1, 1)).is_err());
}

#[test]
fn planar_yuv_gets_chroma_fixups() {
    let geom = SurfaceGeom::new(64, 32, 64, FormatCode::NV12);
    let s = resolve_surface(&buffer(0x2008, 64 * 48), &geom, Rect::new(0, 0, 64, 32)).unwrap();
    assert_eq!(s.align.pixalign, 8);
    assert_eq!(s.planes.len(), 2);
    assert_eq!(s.planes[0].surface_offset, -8);
    assert_eq!(s.planes[1].surface_offset, 64 * 32 - 8);

    let geom = SurfaceGeom::new(64, 32, 64, FormatCode::I420);
    let s = resolve_surface(&buffer(0, 64 * 48), &geom, Rect::new(0, 0, 64, 32)).unwrap();
    assert_eq!(s.planes.len(), 3);
    assert_eq!(s.planes[1].surface_offset, 64 * 32);
    assert_eq!(s.planes[2].surface_offset, 64 * 32 + 32 * 16);
    assert_eq!(s.planes[2].stride, 32);
}

#[test]
fn yuv_rect_must_follow_subsampling() {
    let geom = SurfaceGeom::new(64, 32, 64, FormatCode::NV12);
    let err = resolve_surface(&buffer(0, 64 * 48), &geom, Rect::new(1, 0, 8, 8)).unwrap_err();
    assert_eq!(err.kind(), BlitErrorKind::InvalidRectangle);
}

#[test]
fn multi_source_requires_shared_alignment() {
    let dst = resolve_surface(&buffer(0, 32 * 128), &rgba(32, 32), Rect::new(0, 0, 32, 32))
        .unwrap();
    let same = resolve_surface(&buffer(0x40, 32 * 128), &rgba(32, 32), Rect::new(0, 0, 32, 32))
        .unwrap();
    let shifted =
        resolve_surface(&buffer(0x44, 32 * 128 + 4), &rgba(32, 32), Rect::new(0, 0, 32, 32))
            .unwrap();
    let smaller = resolve_surface(&buffer(0, 32 * 128), &rgba(32, 32), Rect::new(0, 0, 16, 16))
        .unwrap();
    assert!(multi_source_compatible(&dst, &same));
    assert!(!multi_source_compatible(&dst, &shifted));
    assert!(!multi_source_compatible(&dst, &smaller));
}

#[test]
fn planar_source_disables_multi_source_but_keeps_alignment() {
    let dst = resolve_surface(&buffer(0, 32 * 128), &rgba(32, 32), Rect::new(0, 0, 32, 32))
        .unwrap();
    let nv12 = resolve_surface(
        &buffer(0x10, 32 * 48),
        &SurfaceGeom::new(32, 32, 32, FormatCode::NV12),
        Rect::new(0, 0, 32, 32),
    )
    .unwrap();
    assert!(!multi_source_compatible(&dst, &nv12));
    assert_eq!(nv12.align.pixalign, 16);
    assert_eq!(nv12.rect.left, 16);
}

#[test]
fn rect_with_overflowing_edges_is_rejected() {
    let b = buffer(0, 64 * 64 * 4);
    for rect in [
        Rect::new(i32::MAX, 0, 1, 1),
        Rect::new(0, i32::MAX - 1, 4, 4),
    ] {
        let err = resolve_surface(&b, &rgba(64, 64), rect).unwrap_err();
        assert_eq!(err.kind(), BlitErrorKind::InvalidRectangle, "{rect:?}");
    }
}
