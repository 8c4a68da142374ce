use crate::filter::sine::{ONE_Q30, sinc};
use crate::foundation::error::{BlitError, BlitResult};
use crate::foundation::fixed::{ONE_1_31, ONE_2_14, div_round};

/// Sub-pixel phase resolution.
pub const PHASE_BITS: u32 = 5;
pub const PHASES: usize = 1 << PHASE_BITS;
/// Taps per phase row as stored in the kernel registers; smaller kernels are centred.
pub const ROW_TAPS: usize = 9;
pub const KERNEL_SIZES: [u32; 5] = [1, 3, 5, 7, 9];

const CENTER: usize = ROW_TAPS / 2;

/// Residual correction order around the centre tap.
const CORRECTION_ORDER: [isize; ROW_TAPS] = [0, 1, -1, 2, -2, 3, -3, 4, -4];

/// Per-phase 2.14 tap coefficients for one kernel size and scale factor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterKernel {
    size: u32,
    scale: u32,
    coeffs: [[i16; ROW_TAPS]; PHASES],
}

impl FilterKernel {
    pub fn size(&self) -> u32 {
        self.size
    }

    /// 1.31 scale factor the kernel was generated for.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn phase(&self, p: usize) -> &[i16; ROW_TAPS] {
        &self.coeffs[p]
    }

    pub fn phases(&self) -> &[[i16; ROW_TAPS]; PHASES] {
        &self.coeffs
    }

    pub fn phase_sum(&self, p: usize) -> i32 {
        self.coeffs[p].iter().map(|&c| i32::from(c)).sum()
    }
}

/// Generate a windowed-sinc kernel.
///
/// `scale` is `min(dst / src, 1)` in 1.31; values above 1.0 are clamped. Every phase sums to
/// exactly `0x4000`.
pub fn generate_kernel(size: u32, scale: u32) -> BlitResult<FilterKernel> {
    if !KERNEL_SIZES.contains(&size) {
        return Err(BlitError::invalid_argument(format!(
            "kernel size {size} not in {KERNEL_SIZES:?}"
        )));
    }
    if scale == 0 {
        return Err(BlitError::invalid_argument("zero scale factor"));
    }
    let scale = scale.min(ONE_1_31);
    let mut coeffs = [[0i16; ROW_TAPS]; PHASES];
    for (p, row) in coeffs.iter_mut().enumerate() {
        *row = phase_row(size, scale, p);
    }
    Ok(FilterKernel {
        size,
        scale,
        coeffs,
    })
}

fn phase_row(size: u32, scale: u32, phase: usize) -> [i16; ROW_TAPS] {
    let mut row = [0i16; ROW_TAPS];
    let half = (size / 2) as isize;
    if half == 0 {
        row[CENTER] = ONE_2_14 as i16;
        return row;
    }

    // Distances in 1/64 of a pixel: d = (t - c) - (phase / 32 - 1/2).
    let sub = 2 * phase as i64 - 32;
    let mut weights = [0i64; ROW_TAPS];
    for off in -half..=half {
        let d = off as i64 * 64 - sub;
        weights[tap(off)] = weight(d, size, scale);
    }
    let total: i64 = weights.iter().sum();
    if total <= 0 {
        row[CENTER] = ONE_2_14 as i16;
        return row;
    }

    let mut sum = 0i32;
    for off in -half..=half {
        let i = tap(off);
        let c = div_round(
            i128::from(weights[i]) * i128::from(ONE_2_14),
            i128::from(total),
        ) as i16;
        row[i] = c;
        sum += i32::from(c);
    }

    let mut residual = ONE_2_14 - sum;
    let order: Vec<usize> = CORRECTION_ORDER
        .iter()
        .filter(|o| o.abs() <= half)
        .map(|&o| tap(o))
        .collect();
    let mut k = 0;
    while residual != 0 {
        let step = residual.signum();
        let i = order[k % order.len()];
        row[i] += step as i16;
        residual -= step;
        k += 1;
    }
    row
}

fn tap(off: isize) -> usize {
    (CENTER as isize + off) as usize
}

/// `sinc(d * f) * sinc(d / a)` inside the window `|d| < a = size / 2`, Q1.30.
fn weight(d64: i64, size: u32, scale: u32) -> i64 {
    let window = 32 * i64::from(size);
    if d64.abs() >= window {
        return 0;
    }
    // Q32 arguments: d = d64 / 64, f = scale / 2^31.
    let lobe = d64 * i64::from(scale) / 32;
    let win = (d64 << 32) / window;
    (sinc(lobe) * sinc(win)) / ONE_Q30
}

#[cfg(test)]
#[path = "../../tests/unit/filter/kernel.rs"]
mod tests;
