use super::*;
use crate::format::{FormatCode, parse_format};

#[test]
fn encode_argb8888() {
    let d = parse_format(FormatCode::ARGB8888).unwrap();
    assert_eq!(encode_pixel(&d, [0x11, 0x22, 0x33, 0x44]).unwrap(), 0x4411_2233);
    let d = parse_format(FormatCode::RGBA8888).unwrap();
    assert_eq!(encode_pixel(&d, [0x11, 0x22, 0x33, 0x44]).unwrap(), 0x1122_3344);
}

#[test]
fn decode_widens_by_replication() {
    let d = parse_format(FormatCode::RGB565).unwrap();
    assert_eq!(decode_pixel(&d, 0xFFFF).unwrap(), [0xFF, 0xFF, 0xFF, 0xFF]);
    assert_eq!(decode_pixel(&d, 0x0000).unwrap(), [0, 0, 0, 0xFF]);
    // 5-bit 0b10000 widens to 0b1000_0100.
    assert_eq!(decode_pixel(&d, 0x8000).unwrap()[0], 0x84);

    let d = parse_format(FormatCode::ARGB1555).unwrap();
    assert_eq!(decode_pixel(&d, 0x8000).unwrap()[3], 0xFF);
    assert_eq!(decode_pixel(&d, 0x0000).unwrap()[3], 0x00);
}

#[test]
fn encode_zeroes_pad_bits() {
    let d = parse_format(FormatCode::XRGB8888).unwrap();
    assert_eq!(encode_pixel(&d, [1, 2, 3, 0x80]).unwrap(), 0x0001_0203);
}

#[test]
fn yuv_pixels_are_rejected() {
    let d = parse_format(FormatCode::NV12).unwrap();
    assert!(encode_pixel(&d, [0; 4]).is_err());
    assert!(decode_pixel(&d, 0).is_err());
}

#[test]
fn premultiply_rounds() {
    assert_eq!(premultiply([255, 128, 0, 128]), [128, 64, 0, 128]);
    assert_eq!(premultiply([200, 100, 50, 255]), [200, 100, 50, 255]);
    assert_eq!(premultiply([200, 100, 50, 0]), [0, 0, 0, 0]);
}
