use crate::foundation::error::{BlitError, BlitResult};
use crate::format::code::{
    ALPHA_BIT, ColorSpace, FormatCode, LEFT_JUSTIFIED_BIT, ORDER_UV, ORDER_UYVY, ORDER_VU,
    ORDER_VYUY, ORDER_YUYV, ORDER_YVYU, PREMULT_BIT, REVERSED_BIT, SUBSAMPLE_420, SUBSAMPLE_422,
    SUBSAMPLE_444,
};

/// Native pixel formats of the accelerator, with their register codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HwFormat {
    X4R4G4B4,
    A4R4G4B4,
    X1R5G5B5,
    A1R5G5B5,
    R5G6B5,
    X8R8G8B8,
    A8R8G8B8,
    Yuy2,
    Uyvy,
    Yv12,
    Nv12,
}

impl HwFormat {
    pub fn code(self) -> u32 {
        match self {
            Self::X4R4G4B4 => 0,
            Self::A4R4G4B4 => 1,
            Self::X1R5G5B5 => 2,
            Self::A1R5G5B5 => 3,
            Self::R5G6B5 => 4,
            Self::X8R8G8B8 => 5,
            Self::A8R8G8B8 => 6,
            Self::Yuy2 => 7,
            Self::Uyvy => 8,
            Self::Yv12 => 15,
            Self::Nv12 => 17,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::X4R4G4B4,
            1 => Self::A4R4G4B4,
            2 => Self::X1R5G5B5,
            3 => Self::A1R5G5B5,
            4 => Self::R5G6B5,
            5 => Self::X8R8G8B8,
            6 => Self::A8R8G8B8,
            7 => Self::Yuy2,
            8 => Self::Uyvy,
            15 => Self::Yv12,
            17 => Self::Nv12,
            _ => return None,
        })
    }
}

/// Channel placement as programmed into the swizzle field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Swizzle {
    Argb,
    Rgba,
    Abgr,
    Bgra,
    /// Chroma in Cb, Cr order.
    Uv,
    /// Chroma in Cr, Cb order.
    Vu,
}

impl Swizzle {
    pub fn code(self) -> u32 {
        match self {
            Self::Argb | Self::Uv => 0,
            Self::Rgba | Self::Vu => 1,
            Self::Abgr => 2,
            Self::Bgra => 3,
        }
    }
}

/// Indexed by `reversed | left_justified << 1`.
///
/// Padding occupies the alpha slot, so `X` and `A` variants share a channel order and differ only
/// in their [`HwFormat`].
const SWIZZLE_TABLE: [Swizzle; 4] = [Swizzle::Argb, Swizzle::Abgr, Swizzle::Rgba, Swizzle::Bgra];

/// One colour channel inside the packed pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Channel {
    pub shift: u8,
    pub width: u8,
    pub mask: u32,
}

impl Channel {
    const fn new(shift: u32, width: u32) -> Self {
        let mask = if width == 0 {
            0
        } else {
            ((1u32 << width) - 1) << shift
        };
        Self {
            shift: shift as u8,
            width: width as u8,
            mask,
        }
    }

    pub fn extract(self, pixel: u32) -> u32 {
        (pixel & self.mask) >> self.shift
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct YuvLayout {
    /// Horizontal and vertical chroma decimation (`(2, 1)` for 4:2:2, `(2, 2)` for 4:2:0).
    pub chroma_div: (u32, u32),
    pub planes: u32,
    pub uv_swapped: bool,
}

/// Parsed pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormatDesc {
    pub code: FormatCode,
    pub color_space: ColorSpace,
    /// Container width of one pixel; 12 for 4:2:0.
    pub bits_per_pixel: u32,
    pub hw_format: HwFormat,
    pub swizzle: Swizzle,
    /// Red, green, blue and alpha channels. Empty for YUV formats.
    pub channels: [Channel; 4],
    /// Unused bits of an alpha-less RGB container.
    pub pad: Channel,
    pub premultiplied: bool,
    /// Pad bits are written as zero and read as opaque alpha.
    pub zero_fill: bool,
    pub yuv: Option<YuvLayout>,
}

impl FormatDesc {
    pub fn is_yuv(&self) -> bool {
        self.yuv.is_some()
    }

    pub fn is_planar(&self) -> bool {
        self.yuv.is_some_and(|y| y.planes > 1)
    }

    pub fn plane_count(&self) -> u32 {
        self.yuv.map_or(1, |y| y.planes)
    }

    pub fn has_alpha(&self) -> bool {
        self.channels[3].width > 0
    }

    /// Bytes per pixel of the first (or only) plane.
    pub fn bytes_per_pixel(&self) -> u32 {
        if self.is_planar() {
            1
        } else {
            self.bits_per_pixel / 8
        }
    }
}

/// Translate an abstract format code.
pub fn parse_format(code: FormatCode) -> BlitResult<FormatDesc> {
    let Some(space) = ColorSpace::from_bits(code.space_bits()) else {
        return Err(unsupported(code, "unknown colour space"));
    };
    let desc = match space {
        ColorSpace::Rgb => parse_rgb(code)?,
        ColorSpace::YcbcrBt601 | ColorSpace::YcbcrBt709 => parse_yuv(code, space)?,
    };
    debug_assert!(desc.is_yuv() || desc.bits_per_pixel == packed_width(&desc));
    Ok(desc)
}

fn packed_width(desc: &FormatDesc) -> u32 {
    desc.channels
        .iter()
        .chain(std::iter::once(&desc.pad))
        .map(|c| u32::from(c.width))
        .sum()
}

fn unsupported(code: FormatCode, why: &str) -> BlitError {
    BlitError::unsupported_format(format!("{code:?}: {why}"))
}

fn parse_rgb(code: FormatCode) -> BlitResult<FormatDesc> {
    if code.layout_bits() != 0 {
        return Err(unsupported(code, "planar RGB"));
    }
    let depth = code.depth_bits();
    let container = code.container_bits();
    let alpha = code.flag(ALPHA_BIT);
    let premultiplied = code.flag(PREMULT_BIT);

    let (widths, required_container, hw_plain, hw_alpha) = match depth {
        12 => ([4, 4, 4], 16, HwFormat::X4R4G4B4, Some(HwFormat::A4R4G4B4)),
        15 => ([5, 5, 5], 16, HwFormat::X1R5G5B5, Some(HwFormat::A1R5G5B5)),
        16 => ([5, 6, 5], 16, HwFormat::R5G6B5, None),
        24 => ([8, 8, 8], 32, HwFormat::X8R8G8B8, Some(HwFormat::A8R8G8B8)),
        _ => return Err(unsupported(code, "colour depth")),
    };
    if container == 24 && depth == 24 {
        return Err(unsupported(code, "24-bit container"));
    }
    if container != required_container {
        return Err(unsupported(code, "container does not match depth"));
    }
    let hw_format = match (alpha, hw_alpha) {
        (false, _) => hw_plain,
        (true, Some(hw)) => hw,
        (true, None) => return Err(unsupported(code, "no room for alpha")),
    };
    if premultiplied && !alpha {
        return Err(unsupported(code, "premultiplied without alpha"));
    }

    let reversed = code.flag(REVERSED_BIT);
    let left_justified = code.flag(LEFT_JUSTIFIED_BIT);
    let placement = usize::from(reversed) | (usize::from(left_justified) << 1);
    let swizzle = SWIZZLE_TABLE[placement];

    let extra = container - depth;
    let [rw, gw, bw] = widths;
    // Shifts of (first, second, third) colour channel and the alpha/pad slot.
    let (c0, c1, c2, a) = if left_justified {
        (extra + bw + gw, extra + bw, extra, 0)
    } else {
        (bw + gw, bw, 0, depth)
    };
    let (r, b) = if reversed { (c2, c0) } else { (c0, c2) };
    let channels = [
        Channel::new(r, rw),
        Channel::new(c1, gw),
        Channel::new(b, bw),
        if alpha {
            Channel::new(a, extra)
        } else {
            Channel::default()
        },
    ];
    let pad = if alpha {
        Channel::default()
    } else {
        Channel::new(a, extra)
    };

    Ok(FormatDesc {
        code,
        color_space: ColorSpace::Rgb,
        bits_per_pixel: container,
        hw_format,
        swizzle,
        channels,
        pad,
        premultiplied,
        zero_fill: !alpha && extra > 0,
        yuv: None,
    })
}

fn parse_yuv(code: FormatCode, space: ColorSpace) -> BlitResult<FormatDesc> {
    let planes = code.plane_bits();
    let order = code.order_bits();
    let (bpp, layout, hw_format, swizzle) = match code.layout_bits() {
        SUBSAMPLE_422 => {
            if planes != 1 {
                return Err(unsupported(code, "4:2:2 must be a single packed plane"));
            }
            let (hw, swz) = match order {
                ORDER_YUYV => (HwFormat::Yuy2, Swizzle::Uv),
                ORDER_YVYU => (HwFormat::Yuy2, Swizzle::Vu),
                ORDER_UYVY => (HwFormat::Uyvy, Swizzle::Uv),
                ORDER_VYUY => (HwFormat::Uyvy, Swizzle::Vu),
                _ => return Err(unsupported(code, "4:2:2 component order")),
            };
            (
                16,
                YuvLayout {
                    chroma_div: (2, 1),
                    planes,
                    uv_swapped: swz == Swizzle::Vu,
                },
                hw,
                swz,
            )
        }
        SUBSAMPLE_420 => {
            let hw = match planes {
                2 => HwFormat::Nv12,
                3 => HwFormat::Yv12,
                _ => return Err(unsupported(code, "4:2:0 needs two or three planes")),
            };
            let swz = match order {
                ORDER_UV => Swizzle::Uv,
                ORDER_VU => Swizzle::Vu,
                _ => return Err(unsupported(code, "4:2:0 chroma order")),
            };
            (
                12,
                YuvLayout {
                    chroma_div: (2, 2),
                    planes,
                    uv_swapped: swz == Swizzle::Vu,
                },
                hw,
                swz,
            )
        }
        SUBSAMPLE_444 => return Err(unsupported(code, "4:4:4 is not supported")),
        _ => return Err(unsupported(code, "chroma subsampling")),
    };
    if code.container_bits() != bpp {
        return Err(unsupported(
            code,
            "claimed bits per pixel does not match subsampling",
        ));
    }
    Ok(FormatDesc {
        code,
        color_space: space,
        bits_per_pixel: bpp,
        hw_format,
        swizzle,
        channels: [Channel::default(); 4],
        pad: Channel::default(),
        premultiplied: false,
        zero_fill: false,
        yuv: Some(layout),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/format/desc.rs"]
mod tests;
