//! Fixed-point conventions shared by the filter generator and the register encoder.
//!
//! - scale factors are unsigned 1.31 (`ONE_1_31` is 1.0),
//! - filter coefficients are signed 2.14 (`ONE_2_14` is 1.0),
//! - stretch steps are unsigned 16.16.

/// 1.0 in unsigned 1.31.
pub const ONE_1_31: u32 = 0x8000_0000;
/// 1.0 in signed 2.14.
pub const ONE_2_14: i32 = 0x4000;
/// 1.0 in unsigned 16.16.
pub const ONE_16_16: u32 = 0x1_0000;

/// `min(num / den, 1.0)` in 1.31. A zero denominator yields 1.0.
pub fn ratio_1_31(num: u32, den: u32) -> u32 {
    if den == 0 || num >= den {
        return ONE_1_31;
    }
    ((u64::from(num) << 31) / u64::from(den)) as u32
}

/// `src / dst` in 16.16, saturating at `u32::MAX`.
pub fn step_16_16(src: u32, dst: u32) -> u32 {
    if dst == 0 {
        return 0;
    }
    let step = (u64::from(src) << 16) / u64::from(dst);
    u32::try_from(step).unwrap_or(u32::MAX)
}

/// Division rounding half away from zero.
pub fn div_round(num: i128, den: i128) -> i128 {
    debug_assert!(den != 0);
    let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
    if num >= 0 {
        (num + den / 2) / den
    } else {
        -((-num + den / 2) / den)
    }
}

/// Raw 16-bit two's complement pattern of a 2.14 coefficient.
pub fn coeff_bits(c: i16) -> u16 {
    c as u16
}

/// Inverse of [`coeff_bits`].
pub fn coeff_from_bits(bits: u16) -> i16 {
    bits as i16
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/fixed.rs"]
mod tests;
