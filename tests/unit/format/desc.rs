use super::*;
use crate::foundation::error::BlitErrorKind;

fn kind_of(code: FormatCode) -> BlitErrorKind {
    parse_format(code).unwrap_err().kind()
}

#[test]
fn argb8888_layout() {
    let d = parse_format(FormatCode::ARGB8888).unwrap();
    assert_eq!(d.bits_per_pixel, 32);
    assert_eq!(d.hw_format, HwFormat::A8R8G8B8);
    assert_eq!(d.swizzle, Swizzle::Argb);
    assert_eq!(d.channels[0].mask, 0x00FF_0000);
    assert_eq!(d.channels[1].mask, 0x0000_FF00);
    assert_eq!(d.channels[2].mask, 0x0000_00FF);
    assert_eq!(d.channels[3].mask, 0xFF00_0000);
    assert!(!d.zero_fill);
    assert_eq!(d.bytes_per_pixel(), 4);
}

#[test]
fn rgba_and_bgra_put_alpha_low() {
    let rgba = parse_format(FormatCode::RGBA8888).unwrap();
    assert_eq!(rgba.swizzle, Swizzle::Rgba);
    assert_eq!(rgba.channels[0].mask, 0xFF00_0000);
    assert_eq!(rgba.channels[3].mask, 0x0000_00FF);

    let bgra = parse_format(FormatCode::BGRA8888).unwrap();
    assert_eq!(bgra.swizzle, Swizzle::Bgra);
    assert_eq!(bgra.channels[2].mask, 0xFF00_0000);
    assert_eq!(bgra.channels[0].mask, 0x0000_FF00);
}

#[test]
fn sixteen_bit_formats() {
    let d = parse_format(FormatCode::RGB565).unwrap();
    assert_eq!(d.hw_format, HwFormat::R5G6B5);
    assert_eq!(d.channels[0].mask, 0xF800);
    assert_eq!(d.channels[1].mask, 0x07E0);
    assert_eq!(d.channels[2].mask, 0x001F);
    assert!(!d.has_alpha());
    assert!(!d.zero_fill);

    let d = parse_format(FormatCode::ARGB1555).unwrap();
    assert_eq!(d.hw_format, HwFormat::A1R5G5B5);
    assert_eq!(d.channels[3].mask, 0x8000);

    let d = parse_format(FormatCode::XRGB4444).unwrap();
    assert_eq!(d.hw_format, HwFormat::X4R4G4B4);
    assert!(d.zero_fill);
    assert_eq!(d.pad.mask, 0xF000);
}

#[test]
fn rgb_validation_rejects_unsupported_layouts() {
    assert_eq!(
        kind_of(FormatCode::rgb(24, 24, false, false, false, false)),
        BlitErrorKind::UnsupportedFormat
    );
    assert_eq!(
        kind_of(FormatCode::rgb(18, 32, false, false, false, false)),
        BlitErrorKind::UnsupportedFormat
    );
    assert_eq!(
        kind_of(FormatCode::rgb(16, 16, true, false, false, false)),
        BlitErrorKind::UnsupportedFormat
    );
    assert_eq!(
        kind_of(FormatCode::rgb(15, 32, false, false, false, false)),
        BlitErrorKind::UnsupportedFormat
    );
    // Planar RGB.
    assert_eq!(
        kind_of(FormatCode(FormatCode::XRGB8888.0 | (1 << 26))),
        BlitErrorKind::UnsupportedFormat
    );
}

#[test]
fn swizzle_is_table_driven_by_placement() {
    let cases = [
        (false, false, Swizzle::Argb),
        (true, false, Swizzle::Abgr),
        (false, true, Swizzle::Rgba),
        (true, true, Swizzle::Bgra),
    ];
    for (reversed, lj, want) in cases {
        for alpha in [false, true] {
            let code = FormatCode::rgb(24, 32, alpha, false, reversed, lj);
            assert_eq!(parse_format(code).unwrap().swizzle, want, "{code:?}");
        }
    }
}

#[test]
fn yuv_packed_and_planar() {
    let d = parse_format(FormatCode::UYVY).unwrap();
    assert_eq!(d.hw_format, HwFormat::Uyvy);
    assert_eq!(d.bits_per_pixel, 16);
    assert!(!d.is_planar());
    assert_eq!(d.bytes_per_pixel(), 2);

    let d = parse_format(FormatCode::NV21).unwrap();
    assert_eq!(d.hw_format, HwFormat::Nv12);
    assert_eq!(d.swizzle, Swizzle::Vu);
    assert_eq!(d.plane_count(), 2);
    assert_eq!(d.bytes_per_pixel(), 1);

    let d = parse_format(FormatCode::YV12).unwrap();
    assert_eq!(d.hw_format, HwFormat::Yv12);
    assert_eq!(d.plane_count(), 3);
    assert!(d.yuv.unwrap().uv_swapped);
}

#[test]
fn yuv_validation() {
    use crate::format::ColorSpace;
    // Claimed container mismatch.
    assert_eq!(
        kind_of(FormatCode::yuv(ColorSpace::YcbcrBt601, 1, 2, 0, 16)),
        BlitErrorKind::UnsupportedFormat
    );
    // 4:2:2 planar.
    assert_eq!(
        kind_of(FormatCode::yuv(ColorSpace::YcbcrBt601, 0, 2, 0, 16)),
        BlitErrorKind::UnsupportedFormat
    );
    // 4:4:4.
    assert_eq!(
        kind_of(FormatCode::yuv(ColorSpace::YcbcrBt709, 2, 1, 0, 24)),
        BlitErrorKind::UnsupportedFormat
    );
    // 4:2:0 single plane.
    assert_eq!(
        kind_of(FormatCode::yuv(ColorSpace::YcbcrBt601, 1, 1, 0, 12)),
        BlitErrorKind::UnsupportedFormat
    );
    // Unknown colour space.
    assert_eq!(
        kind_of(FormatCode(0x7000_0000)),
        BlitErrorKind::UnsupportedFormat
    );
}

#[test]
fn bt709_keeps_layout() {
    let code = FormatCode::NV12.with_color_space(crate::format::ColorSpace::YcbcrBt709);
    let d = parse_format(code).unwrap();
    assert_eq!(d.color_space, crate::format::ColorSpace::YcbcrBt709);
    assert_eq!(d.hw_format, HwFormat::Nv12);
}

#[test]
fn padded_formats_share_channel_order_with_alpha_formats() {
    let x = parse_format(FormatCode::XRGB8888).unwrap();
    let a = parse_format(FormatCode::ARGB8888).unwrap();
    assert_eq!(x.swizzle, a.swizzle);
    assert_eq!(x.channels[..3], a.channels[..3]);
    assert_eq!(x.hw_format, HwFormat::X8R8G8B8);
    assert_eq!(a.hw_format, HwFormat::A8R8G8B8);
}
