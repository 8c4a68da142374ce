use std::fmt;
use std::str::FromStr;

use crate::foundation::error::BlitError;

/// Colour space of a [`FormatCode`], bits 31..28.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Rgb,
    YcbcrBt601,
    YcbcrBt709,
}

impl ColorSpace {
    pub(crate) fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            0 => Some(Self::Rgb),
            1 => Some(Self::YcbcrBt601),
            2 => Some(Self::YcbcrBt709),
            _ => None,
        }
    }

    const fn bits(self) -> u32 {
        match self {
            Self::Rgb => 0,
            Self::YcbcrBt601 => 1,
            Self::YcbcrBt709 => 2,
        }
    }
}

/// Abstract pixel-format code.
///
/// RGB layout:
///
/// | bits   | field |
/// |--------|-------|
/// | 31..28 | colour space (0) |
/// | 27..26 | layout: 0 packed, 1 planar |
/// | 24     | reversed (BGR) order |
/// | 23     | left-justified (alpha/pad in the low bits) |
/// | 22     | alpha present |
/// | 21     | premultiplied |
/// | 15..8  | container bits |
/// | 7..0   | colour depth |
///
/// YUV layout:
///
/// | bits   | field |
/// |--------|-------|
/// | 31..28 | colour space (1 BT.601, 2 BT.709) |
/// | 27..26 | subsampling: 0 4:2:2, 1 4:2:0, 2 4:4:4 |
/// | 25..24 | plane count |
/// | 23..20 | component order |
/// | 15..8  | claimed bits per pixel |
#[derive(
    Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, PartialOrd, Ord,
)]
#[serde(transparent)]
pub struct FormatCode(pub u32);

pub(crate) const SPACE_SHIFT: u32 = 28;
pub(crate) const LAYOUT_SHIFT: u32 = 26;
pub(crate) const PLANES_SHIFT: u32 = 24;
pub(crate) const REVERSED_BIT: u32 = 1 << 24;
pub(crate) const LEFT_JUSTIFIED_BIT: u32 = 1 << 23;
pub(crate) const ORDER_SHIFT: u32 = 20;
pub(crate) const ALPHA_BIT: u32 = 1 << 22;
pub(crate) const PREMULT_BIT: u32 = 1 << 21;
pub(crate) const CONTAINER_SHIFT: u32 = 8;

/// 4:2:2 component orders.
pub(crate) const ORDER_YUYV: u32 = 0;
pub(crate) const ORDER_UYVY: u32 = 1;
pub(crate) const ORDER_YVYU: u32 = 2;
pub(crate) const ORDER_VYUY: u32 = 3;
/// 4:2:0 chroma orders.
pub(crate) const ORDER_UV: u32 = 0;
pub(crate) const ORDER_VU: u32 = 1;

pub(crate) const SUBSAMPLE_422: u32 = 0;
pub(crate) const SUBSAMPLE_420: u32 = 1;
pub(crate) const SUBSAMPLE_444: u32 = 2;

impl FormatCode {
    /// 32-bit, alpha in the low byte: `R G B A` from MSB to LSB.
    pub const RGBA8888: Self = Self::rgb(24, 32, true, false, false, true);
    /// `B G R A` from MSB to LSB.
    pub const BGRA8888: Self = Self::rgb(24, 32, true, false, true, true);
    /// `A R G B` from MSB to LSB.
    pub const ARGB8888: Self = Self::rgb(24, 32, true, false, false, false);
    /// `A B G R` from MSB to LSB.
    pub const ABGR8888: Self = Self::rgb(24, 32, true, false, true, false);
    pub const XRGB8888: Self = Self::rgb(24, 32, false, false, false, false);
    pub const XBGR8888: Self = Self::rgb(24, 32, false, false, true, false);
    pub const RGBX8888: Self = Self::rgb(24, 32, false, false, false, true);
    /// Premultiplied `A R G B`.
    pub const ARGB8888_PRE: Self = Self::rgb(24, 32, true, true, false, false);
    pub const RGB565: Self = Self::rgb(16, 16, false, false, false, false);
    pub const BGR565: Self = Self::rgb(16, 16, false, false, true, false);
    pub const ARGB1555: Self = Self::rgb(15, 16, true, false, false, false);
    pub const XRGB1555: Self = Self::rgb(15, 16, false, false, false, false);
    pub const ARGB4444: Self = Self::rgb(12, 16, true, false, false, false);
    pub const XRGB4444: Self = Self::rgb(12, 16, false, false, false, false);

    pub const YUYV: Self = Self::yuv(ColorSpace::YcbcrBt601, SUBSAMPLE_422, 1, ORDER_YUYV, 16);
    pub const UYVY: Self = Self::yuv(ColorSpace::YcbcrBt601, SUBSAMPLE_422, 1, ORDER_UYVY, 16);
    pub const YVYU: Self = Self::yuv(ColorSpace::YcbcrBt601, SUBSAMPLE_422, 1, ORDER_YVYU, 16);
    pub const VYUY: Self = Self::yuv(ColorSpace::YcbcrBt601, SUBSAMPLE_422, 1, ORDER_VYUY, 16);
    pub const NV12: Self = Self::yuv(ColorSpace::YcbcrBt601, SUBSAMPLE_420, 2, ORDER_UV, 12);
    pub const NV21: Self = Self::yuv(ColorSpace::YcbcrBt601, SUBSAMPLE_420, 2, ORDER_VU, 12);
    pub const I420: Self = Self::yuv(ColorSpace::YcbcrBt601, SUBSAMPLE_420, 3, ORDER_UV, 12);
    pub const YV12: Self = Self::yuv(ColorSpace::YcbcrBt601, SUBSAMPLE_420, 3, ORDER_VU, 12);

    const NAMED: [(&'static str, Self); 25] = [
        ("rgba8888", Self::RGBA8888),
        ("bgra8888", Self::BGRA8888),
        ("argb8888", Self::ARGB8888),
        ("abgr8888", Self::ABGR8888),
        ("xrgb8888", Self::XRGB8888),
        ("xbgr8888", Self::XBGR8888),
        ("rgbx8888", Self::RGBX8888),
        ("argb8888_pre", Self::ARGB8888_PRE),
        ("rgb565", Self::RGB565),
        ("bgr565", Self::BGR565),
        ("argb1555", Self::ARGB1555),
        ("xrgb1555", Self::XRGB1555),
        ("argb4444", Self::ARGB4444),
        ("xrgb4444", Self::XRGB4444),
        ("yuyv", Self::YUYV),
        ("uyvy", Self::UYVY),
        ("yvyu", Self::YVYU),
        ("vyuy", Self::VYUY),
        ("nv12", Self::NV12),
        ("nv21", Self::NV21),
        ("i420", Self::I420),
        ("yv12", Self::YV12),
        ("nv12_709", Self::NV12.with_space_const(ColorSpace::YcbcrBt709)),
        ("yuyv_709", Self::YUYV.with_space_const(ColorSpace::YcbcrBt709)),
        ("i420_709", Self::I420.with_space_const(ColorSpace::YcbcrBt709)),
    ];

    /// Short lowercase name of a well-known code.
    pub fn name(self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, c)| *c == self)
            .map(|(n, _)| *n)
    }

    /// Packed RGB code. `depth` counts colour bits only.
    pub const fn rgb(
        depth: u32,
        container: u32,
        alpha: bool,
        premultiplied: bool,
        reversed: bool,
        left_justified: bool,
    ) -> Self {
        let mut v = (depth & 0xFF) | ((container & 0xFF) << CONTAINER_SHIFT);
        if alpha {
            v |= ALPHA_BIT;
        }
        if premultiplied {
            v |= PREMULT_BIT;
        }
        if reversed {
            v |= REVERSED_BIT;
        }
        if left_justified {
            v |= LEFT_JUSTIFIED_BIT;
        }
        Self(v)
    }

    pub const fn yuv(
        space: ColorSpace,
        subsampling: u32,
        planes: u32,
        order: u32,
        claimed_bpp: u32,
    ) -> Self {
        Self(
            (space.bits() << SPACE_SHIFT)
                | ((subsampling & 0x3) << LAYOUT_SHIFT)
                | ((planes & 0x3) << PLANES_SHIFT)
                | ((order & 0xF) << ORDER_SHIFT)
                | ((claimed_bpp & 0xFF) << CONTAINER_SHIFT),
        )
    }

    /// Same code with the colour space replaced (YUV codes only).
    pub fn with_color_space(self, space: ColorSpace) -> Self {
        self.with_space_const(space)
    }

    const fn with_space_const(self, space: ColorSpace) -> Self {
        Self((self.0 & !(0xF << SPACE_SHIFT)) | (space.bits() << SPACE_SHIFT))
    }

    pub(crate) fn space_bits(self) -> u32 {
        self.0 >> SPACE_SHIFT
    }

    pub(crate) fn layout_bits(self) -> u32 {
        (self.0 >> LAYOUT_SHIFT) & 0x3
    }

    pub(crate) fn plane_bits(self) -> u32 {
        (self.0 >> PLANES_SHIFT) & 0x3
    }

    pub(crate) fn order_bits(self) -> u32 {
        (self.0 >> ORDER_SHIFT) & 0xF
    }

    pub(crate) fn container_bits(self) -> u32 {
        (self.0 >> CONTAINER_SHIFT) & 0xFF
    }

    pub(crate) fn depth_bits(self) -> u32 {
        self.0 & 0xFF
    }

    pub(crate) fn flag(self, bit: u32) -> bool {
        self.0 & bit != 0
    }
}

impl fmt::Debug for FormatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FormatCode({:#010x})", self.0)
    }
}

impl FromStr for FormatCode {
    type Err = BlitError;

    /// Accepts a format name (`argb8888`, `nv12`) or a `0x` hex code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Some((_, code)) = Self::NAMED.iter().find(|(n, _)| n.eq_ignore_ascii_case(t)) {
            return Ok(*code);
        }
        t.strip_prefix("0x")
            .or_else(|| t.strip_prefix("0X"))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .map(Self)
            .ok_or_else(|| BlitError::unsupported_format(format!("unknown format '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/format/code.rs"]
mod tests;
