use smallvec::{SmallVec, smallvec};

use crate::foundation::core::Rect;
use crate::foundation::fixed::{ratio_1_31, step_16_16};

/// Requested resampling quality.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleQuality {
    /// Nearest-neighbour stretch, no filter kernel.
    Fastest,
    Good,
    Better,
    Best,
    /// Kernel size picked from the scaling ratio.
    #[default]
    Auto,
}

/// Kernel bank a filter pass programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterType {
    Horizontal,
    Vertical,
}

/// `min(dst / src, 1)` in 1.31.
pub fn scale_factor(src_len: u32, dst_len: u32) -> u32 {
    ratio_1_31(dst_len, src_len)
}

/// Taps needed to resample `src_len` pixels into `dst_len`.
pub fn kernel_size(quality: ScaleQuality, src_len: u32, dst_len: u32) -> u32 {
    if src_len == dst_len {
        return 1;
    }
    let src = u64::from(src_len);
    let dst = u64::from(dst_len);
    match quality {
        ScaleQuality::Fastest => 1,
        ScaleQuality::Good => 3,
        ScaleQuality::Better => 5,
        ScaleQuality::Best => {
            if src > 2 * dst {
                9
            } else {
                7
            }
        }
        ScaleQuality::Auto => {
            if dst > src {
                3
            } else if src <= 2 * dst {
                5
            } else if src <= 4 * dst {
                7
            } else {
                9
            }
        }
    }
}

/// One axis of a filter pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisFilter {
    pub size: u32,
    /// 1.31 kernel scale factor.
    pub scale: u32,
    /// 16.16 source step per destination pixel.
    pub step: u32,
}

impl AxisFilter {
    pub fn new(quality: ScaleQuality, src_len: u32, dst_len: u32) -> Self {
        Self {
            size: kernel_size(quality, src_len, dst_len),
            scale: scale_factor(src_len, dst_len),
            step: step_16_16(src_len, dst_len),
        }
    }

    pub fn scales(&self) -> bool {
        self.size > 1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassKind {
    Horizontal,
    Vertical,
    Combined,
}

/// Where a pass reads from or writes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassSurface {
    /// The caller's source or destination surface.
    Caller,
    Temp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterPass {
    pub kind: PassKind,
    pub h: AxisFilter,
    pub v: AxisFilter,
    pub input: PassSurface,
    pub src_rect: Rect,
    pub output: PassSurface,
    pub dst_rect: Rect,
}

/// Intermediate surface of a two-pass filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TempPlan {
    pub width: u32,
    pub height: u32,
    pub bleed_left: u32,
    pub bleed_right: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterPlan {
    pub passes: SmallVec<[FilterPass; 2]>,
    pub temp: Option<TempPlan>,
}

impl FilterPlan {
    pub fn is_two_pass(&self) -> bool {
        self.passes.len() == 2
    }
}

fn combinable(size: u32) -> bool {
    matches!(size, 3 | 5)
}

/// Decide how to resample `src_rect` into `dst_rect`.
///
/// Both rectangles share one orientation. `src_bounds` limits how far the second pass of a
/// two-pass filter may read beyond `src_rect`.
pub fn plan_filter(
    src_rect: Rect,
    dst_rect: Rect,
    quality: ScaleQuality,
    src_bounds: Rect,
) -> FilterPlan {
    let h = AxisFilter::new(quality, src_rect.width as u32, dst_rect.width as u32);
    let v = AxisFilter::new(quality, src_rect.height as u32, dst_rect.height as u32);

    let single = |kind| FilterPlan {
        passes: smallvec![FilterPass {
            kind,
            h,
            v,
            input: PassSurface::Caller,
            src_rect,
            output: PassSurface::Caller,
            dst_rect,
        }],
        temp: None,
    };

    match (h.scales(), v.scales()) {
        (true, true) if combinable(h.size) && combinable(v.size) => single(PassKind::Combined),
        (true, true) => {
            let half = h.size / 2;
            let margin_left = (src_rect.left - src_bounds.left).max(0) as u32;
            let margin_right = (src_bounds.right() - src_rect.right()).max(0) as u32;
            let bleed_left = half.min(margin_left);
            let bleed_right = half.min(margin_right);
            let temp = TempPlan {
                width: src_rect.width as u32 + bleed_left + bleed_right,
                height: dst_rect.height as u32,
                bleed_left,
                bleed_right,
            };
            let unscaled = AxisFilter::new(quality, 1, 1);
            let vertical = FilterPass {
                kind: PassKind::Vertical,
                h: unscaled,
                v,
                input: PassSurface::Caller,
                src_rect: Rect::new(
                    src_rect.left - bleed_left as i32,
                    src_rect.top,
                    temp.width as i32,
                    src_rect.height,
                ),
                output: PassSurface::Temp,
                dst_rect: Rect::new(0, 0, temp.width as i32, temp.height as i32),
            };
            let horizontal = FilterPass {
                kind: PassKind::Horizontal,
                h,
                v: unscaled,
                input: PassSurface::Temp,
                src_rect: Rect::new(
                    bleed_left as i32,
                    0,
                    src_rect.width,
                    temp.height as i32,
                ),
                output: PassSurface::Caller,
                dst_rect,
            };
            FilterPlan {
                passes: smallvec![vertical, horizontal],
                temp: Some(temp),
            }
        }
        (false, true) => single(PassKind::Vertical),
        _ => single(PassKind::Horizontal),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filter/plan.rs"]
mod tests;
