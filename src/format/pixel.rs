use crate::foundation::error::{BlitError, BlitResult};
use crate::format::desc::{Channel, FormatDesc};

/// Pack straight `[r, g, b, a]` bytes into one pixel of `desc`.
///
/// Channels narrower than 8 bits keep the most significant bits. Alpha is dropped for formats
/// without an alpha channel, and pad bits are zero.
pub fn encode_pixel(desc: &FormatDesc, rgba: [u8; 4]) -> BlitResult<u32> {
    ensure_rgb(desc)?;
    let mut pixel = 0u32;
    for (ch, v) in desc.channels.iter().zip(rgba) {
        if ch.width == 0 {
            continue;
        }
        let narrowed = u32::from(v) >> (8 - ch.width);
        pixel |= (narrowed << ch.shift) & ch.mask;
    }
    Ok(pixel)
}

/// Unpack one pixel of `desc` into `[r, g, b, a]` bytes, widening by bit replication.
///
/// Formats without alpha decode as opaque.
pub fn decode_pixel(desc: &FormatDesc, pixel: u32) -> BlitResult<[u8; 4]> {
    ensure_rgb(desc)?;
    let mut out = [0u8; 4];
    for (slot, ch) in out.iter_mut().zip(desc.channels) {
        *slot = widen(ch, pixel);
    }
    if !desc.has_alpha() {
        out[3] = 0xFF;
    }
    Ok(out)
}

/// Scale colour channels by alpha, rounding to nearest.
pub fn premultiply(rgba: [u8; 4]) -> [u8; 4] {
    let a = u32::from(rgba[3]);
    let mul = |c: u8| ((u32::from(c) * a + 127) / 255) as u8;
    [mul(rgba[0]), mul(rgba[1]), mul(rgba[2]), rgba[3]]
}

fn widen(ch: Channel, pixel: u32) -> u8 {
    let w = u32::from(ch.width);
    if w == 0 {
        return 0;
    }
    let v = ch.extract(pixel);
    let mut acc = 0u32;
    let mut filled = 0u32;
    while filled < 8 {
        acc = (acc << w) | v;
        filled += w;
    }
    (acc >> (filled - 8)) as u8
}

fn ensure_rgb(desc: &FormatDesc) -> BlitResult<()> {
    if desc.is_yuv() {
        return Err(BlitError::unsupported_format(format!(
            "{:?}: pixel access requires an RGB format",
            desc.code
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/format/pixel.rs"]
mod tests;
