//! Fixed-point trigonometry for the resampling kernels.
//!
//! Angles are Q32 multiples of pi (`1 << 32` is pi); results are Q1.30.

/// `sin(i * pi / 128)` for `i` in `0..=64`, Q1.30.
const QUARTER_SINE: [i64; 65] = [
    0x00000000, 0x0192155F, 0x0323ECBE, 0x04B54825,
    0x0645E9AF, 0x07D59396, 0x09640837, 0x0AF10A22,
    0x0C7C5C1E, 0x0E05C135, 0x0F8CFCBE, 0x1111D263,
    0x1294062F, 0x14135C94, 0x158F9A76, 0x17088531,
    0x187DE2A7, 0x19EF7944, 0x1B5D100A, 0x1CC66E99,
    0x1E2B5D38, 0x1F8BA4DC, 0x20E70F32, 0x223D66A8,
    0x238E7673, 0x24DA0A9A, 0x261FEFFA, 0x275FF452,
    0x2899E64A, 0x29CD9578, 0x2AFAD269, 0x2C216EAA,
    0x2D413CCD, 0x2E5A1070, 0x2F6BBE45, 0x30761C18,
    0x317900D6, 0x32744493, 0x3367C090, 0x34534F41,
    0x3536CC52, 0x361214B0, 0x36E5068A, 0x37AF8159,
    0x387165E3, 0x392A9642, 0x39DAF5E8, 0x3A8269A3,
    0x3B20D79E, 0x3BB6276E, 0x3C42420A, 0x3CC511D9,
    0x3D3E82AE, 0x3DAE81CF, 0x3E14FDF7, 0x3E71E759,
    0x3EC52FA0, 0x3F0EC9F5, 0x3F4EAAFE, 0x3F84C8E2,
    0x3FB11B48, 0x3FD39B5A, 0x3FEC43C7, 0x3FFB10C1,
    0x40000000,
];

pub(crate) const ONE_Q30: i64 = 1 << 30;
/// pi in Q2.30.
const PI_Q30: i128 = 3_373_259_426;

const QUARTER: i64 = 1 << 31;
const STEP_BITS: u32 = 25;
const STEP_MASK: i64 = (1 << STEP_BITS) - 1;

/// Sine over `[0, pi/2]` with `pos` in `[0, QUARTER]`, linearly interpolated.
fn quarter_sine(pos: i64) -> i64 {
    let idx = (pos >> STEP_BITS) as usize;
    if idx >= 64 {
        return QUARTER_SINE[64];
    }
    let frac = pos & STEP_MASK;
    let (a, b) = (QUARTER_SINE[idx], QUARTER_SINE[idx + 1]);
    a + (((b - a) * frac) >> STEP_BITS)
}

/// `sin(pi * x)` for `x` in Q32.
pub(crate) fn sin_pi(x: i64) -> i64 {
    if x < 0 {
        return -sin_pi(-x);
    }
    let pos = x & (QUARTER - 1);
    match (x >> 31) & 3 {
        0 => quarter_sine(pos),
        1 => quarter_sine(QUARTER - pos),
        2 => -quarter_sine(pos),
        _ => -quarter_sine(QUARTER - pos),
    }
}

/// Normalised `sinc(x) = sin(pi x) / (pi x)` for `x` in Q32, Q1.30 result.
pub(crate) fn sinc(x: i64) -> i64 {
    if x == 0 {
        return ONE_Q30;
    }
    let num = i128::from(sin_pi(x)) << 62;
    let den = PI_Q30 * i128::from(x);
    (num / den) as i64
}

#[cfg(test)]
#[path = "../../tests/unit/filter/sine.rs"]
mod tests;
