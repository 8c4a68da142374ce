//! Register map and field encodings of the accelerator's 2D state.

use crate::blend::{BlendConfig, FactorConfig, FactorMode, GlobalAlphaMode};
use crate::foundation::core::Mirror;
use crate::foundation::fixed::{coeff_bits, coeff_from_bits};

pub const OP_LOAD_STATE: u32 = 1;
pub const OP_END: u32 = 2;
pub const OP_NOP: u32 = 3;
pub const OP_START_DE: u32 = 4;

const OPCODE_SHIFT: u32 = 27;
const COUNT_SHIFT: u32 = 16;
const COUNT_MASK: u32 = 0x3FF;

/// Largest register run one LOAD_STATE header can describe.
pub const MAX_LOAD_COUNT: usize = COUNT_MASK as usize;

pub const fn opcode(header: u32) -> u32 {
    header >> OPCODE_SHIFT
}

pub const fn load_state_header(reg: u16, count: usize) -> u32 {
    (OP_LOAD_STATE << OPCODE_SHIFT) | (((count as u32) & COUNT_MASK) << COUNT_SHIFT) | reg as u32
}

/// `(reg, count)` of a LOAD_STATE header.
pub const fn load_state_fields(header: u32) -> (u16, usize) {
    (
        (header & 0xFFFF) as u16,
        ((header >> COUNT_SHIFT) & COUNT_MASK) as usize,
    )
}

pub const fn start_de_header(rect_count: usize) -> u32 {
    (OP_START_DE << OPCODE_SHIFT) | (((rect_count as u32) & 0xFF) << 8)
}

pub const fn start_de_count(header: u32) -> usize {
    ((header >> 8) & 0xFF) as usize
}

pub const NOP: u32 = OP_NOP << OPCODE_SHIFT;
pub const END: u32 = OP_END << OPCODE_SHIFT;

// Destination state, loaded as one run.
pub const DEST_ADDRESS: u16 = 0x0490;
pub const DEST_STRIDE: u16 = 0x0491;
pub const DEST_ROTATION_CONFIG: u16 = 0x0492;
pub const DEST_CONFIG: u16 = 0x0493;
pub const DEST_ROTATION_HEIGHT: u16 = 0x0494;
pub const DEST_ROT_MIRROR: u16 = 0x0495;
pub const DEST_REGS: usize = 6;

pub const CLIP_TOP_LEFT: u16 = 0x04A0;
pub const CLIP_BOTTOM_RIGHT: u16 = 0x04A1;
pub const MULTI_SOURCE_CONFIG: u16 = 0x04A8;
pub const CLEAR_COLOR: u16 = 0x04A9;
pub const STRETCH_FACTOR_H: u16 = 0x04AA;
pub const STRETCH_FACTOR_V: u16 = 0x04AB;

pub const FILTER_CONFIG: u16 = 0x04B0;
pub const VR_SOURCE_LOW: u16 = 0x04B1;
pub const VR_SOURCE_HIGH: u16 = 0x04B2;
pub const VR_ORIGIN_X: u16 = 0x04B3;
pub const VR_ORIGIN_Y: u16 = 0x04B4;
pub const VR_TARGET_LOW: u16 = 0x04B5;
pub const VR_TARGET_HIGH: u16 = 0x04B6;
pub const VR_START: u16 = 0x04B7;
pub const FILTER_REGS: usize = 7;

pub const FILTER_KERNEL_H: u16 = 0x0C00;
pub const FILTER_KERNEL_V: u16 = 0x0D00;
/// Words of one kernel table: 32 phases of 9 coefficients, two per word.
pub const KERNEL_WORDS: usize = 144;

// Source banks: bank `i` starts at `SRC_BANK_BASE + i * SRC_BANK_STRIDE`.
pub const SRC_BANK_BASE: u16 = 0x4A00;
pub const SRC_BANK_STRIDE: u16 = 0x20;
pub const SRC_BANKS: usize = 4;

pub const SRC_ADDRESS: u16 = 0;
pub const SRC_STRIDE: u16 = 1;
pub const SRC_ROTATION_CONFIG: u16 = 2;
pub const SRC_CONFIG: u16 = 3;
pub const SRC_ORIGIN: u16 = 4;
pub const SRC_SIZE: u16 = 5;
pub const SRC_ROTATION_HEIGHT: u16 = 6;
pub const SRC_ROT_MIRROR: u16 = 7;
pub const SRC_U_ADDRESS: u16 = 8;
pub const SRC_U_STRIDE: u16 = 9;
pub const SRC_V_ADDRESS: u16 = 10;
pub const SRC_V_STRIDE: u16 = 11;
pub const SRC_ALPHA_CONTROL: u16 = 12;
pub const SRC_ALPHA_MODES: u16 = 13;
pub const SRC_GLOBAL_SRC_COLOR: u16 = 14;
pub const SRC_GLOBAL_DST_COLOR: u16 = 15;
pub const SRC_ROP: u16 = 16;
pub const SRC_COLOR_MULTIPLY: u16 = 17;
pub const SRC_REGS: usize = 18;

pub const fn src_bank(index: usize) -> u16 {
    SRC_BANK_BASE + index as u16 * SRC_BANK_STRIDE
}

/// Register name for the disassembler.
pub fn register_name(reg: u16) -> Option<String> {
    let fixed = match reg {
        DEST_ADDRESS => "DEST_ADDRESS",
        DEST_STRIDE => "DEST_STRIDE",
        DEST_ROTATION_CONFIG => "DEST_ROTATION_CONFIG",
        DEST_CONFIG => "DEST_CONFIG",
        DEST_ROTATION_HEIGHT => "DEST_ROTATION_HEIGHT",
        DEST_ROT_MIRROR => "DEST_ROT_MIRROR",
        CLIP_TOP_LEFT => "CLIP_TOP_LEFT",
        CLIP_BOTTOM_RIGHT => "CLIP_BOTTOM_RIGHT",
        MULTI_SOURCE_CONFIG => "MULTI_SOURCE_CONFIG",
        CLEAR_COLOR => "CLEAR_COLOR",
        STRETCH_FACTOR_H => "STRETCH_FACTOR_H",
        STRETCH_FACTOR_V => "STRETCH_FACTOR_V",
        FILTER_CONFIG => "FILTER_CONFIG",
        VR_SOURCE_LOW => "VR_SOURCE_LOW",
        VR_SOURCE_HIGH => "VR_SOURCE_HIGH",
        VR_ORIGIN_X => "VR_ORIGIN_X",
        VR_ORIGIN_Y => "VR_ORIGIN_Y",
        VR_TARGET_LOW => "VR_TARGET_LOW",
        VR_TARGET_HIGH => "VR_TARGET_HIGH",
        VR_START => "VR_START",
        _ => "",
    };
    if !fixed.is_empty() {
        return Some(fixed.to_owned());
    }
    for (base, name) in [(FILTER_KERNEL_H, "FILTER_KERNEL_H"), (FILTER_KERNEL_V, "FILTER_KERNEL_V")] {
        if (base..base + KERNEL_WORDS as u16).contains(&reg) {
            return Some(format!("{name}[{}]", reg - base));
        }
    }
    let end = src_bank(SRC_BANKS);
    if (SRC_BANK_BASE..end).contains(&reg) {
        let bank = (reg - SRC_BANK_BASE) / SRC_BANK_STRIDE;
        let field = match (reg - SRC_BANK_BASE) % SRC_BANK_STRIDE {
            SRC_ADDRESS => "ADDRESS",
            SRC_STRIDE => "STRIDE",
            SRC_ROTATION_CONFIG => "ROTATION_CONFIG",
            SRC_CONFIG => "CONFIG",
            SRC_ORIGIN => "ORIGIN",
            SRC_SIZE => "SIZE",
            SRC_ROTATION_HEIGHT => "ROTATION_HEIGHT",
            SRC_ROT_MIRROR => "ROT_MIRROR",
            SRC_U_ADDRESS => "U_ADDRESS",
            SRC_U_STRIDE => "U_STRIDE",
            SRC_V_ADDRESS => "V_ADDRESS",
            SRC_V_STRIDE => "V_STRIDE",
            SRC_ALPHA_CONTROL => "ALPHA_CONTROL",
            SRC_ALPHA_MODES => "ALPHA_MODES",
            SRC_GLOBAL_SRC_COLOR => "GLOBAL_SRC_COLOR",
            SRC_GLOBAL_DST_COLOR => "GLOBAL_DST_COLOR",
            SRC_ROP => "ROP",
            SRC_COLOR_MULTIPLY => "COLOR_MULTIPLY",
            _ => return None,
        };
        return Some(format!("SRC{bank}_{field}"));
    }
    None
}

fn field(value: u32, shift: u32, width: u32) -> u32 {
    (value >> shift) & ((1 << width) - 1)
}

fn bit(value: u32, shift: u32) -> bool {
    (value >> shift) & 1 != 0
}

/// Pack two 16-bit coordinates, `x` in the low half.
pub fn pack_xy(x: i32, y: i32) -> u32 {
    ((y as u32 & 0xFFFF) << 16) | (x as u32 & 0xFFFF)
}

pub fn unpack_xy(word: u32) -> (i32, i32) {
    ((word & 0xFFFF) as i32, (word >> 16) as i32)
}

/// Operation selected in the destination config.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Command {
    Bitblt,
    Clear,
    Stretch,
    MultiSource,
    Filter,
}

impl Command {
    pub fn code(self) -> u32 {
        match self {
            Self::Bitblt => 0,
            Self::Clear => 1,
            Self::Stretch => 2,
            Self::MultiSource => 3,
            Self::Filter => 4,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::Bitblt,
            1 => Self::Clear,
            2 => Self::Stretch,
            3 => Self::MultiSource,
            4 => Self::Filter,
            _ => return None,
        })
    }
}

/// Format fields shared by source and destination config registers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub format: u32,
    pub swizzle: u32,
    pub premultiplied: bool,
    pub zero_fill: bool,
    pub bt709: bool,
    pub uv_swap: bool,
    /// Destination only.
    pub command: u32,
}

impl SurfaceConfig {
    pub fn encode(&self) -> u32 {
        (self.format & 0x1F)
            | ((self.swizzle & 0x3) << 8)
            | ((self.command & 0xF) << 12)
            | (u32::from(self.premultiplied) << 16)
            | (u32::from(self.zero_fill) << 17)
            | (u32::from(self.bt709) << 18)
            | (u32::from(self.uv_swap) << 19)
    }

    pub fn decode(word: u32) -> Self {
        Self {
            format: field(word, 0, 5),
            swizzle: field(word, 8, 2),
            command: field(word, 12, 4),
            premultiplied: bit(word, 16),
            zero_fill: bit(word, 17),
            bt709: bit(word, 18),
            uv_swap: bit(word, 19),
        }
    }
}

/// Surface width and rotation, as loaded into `*_ROTATION_CONFIG`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RotationConfig {
    pub width: u32,
    pub quarter_turns: u32,
}

impl RotationConfig {
    pub fn encode(&self) -> u32 {
        (self.width & 0xFFFF) | ((self.quarter_turns & 0x3) << 16)
    }

    pub fn decode(word: u32) -> Self {
        Self {
            width: field(word, 0, 16),
            quarter_turns: field(word, 16, 2),
        }
    }
}

pub fn encode_rot_mirror(quarter_turns: u32, mirror: Mirror) -> u32 {
    (quarter_turns & 0x3) | (mirror.bits() << 4)
}

pub fn decode_rot_mirror(word: u32) -> (u32, Mirror) {
    (
        field(word, 0, 2),
        Mirror {
            horizontal: bit(word, 4),
            vertical: bit(word, 5),
        },
    )
}

/// Factor and usage fields of `SRC*_ALPHA_MODES`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlphaModes {
    pub src_mode: u32,
    pub src_reverse: bool,
    pub dst_mode: u32,
    pub dst_reverse: bool,
    pub global_alpha: u32,
    pub src1_used: bool,
    pub src2_used: bool,
}

impl AlphaModes {
    pub fn from_blend(cfg: &BlendConfig) -> Self {
        Self {
            src_mode: cfg.src.mode.code(),
            src_reverse: cfg.src.reverse,
            dst_mode: cfg.dst.mode.code(),
            dst_reverse: cfg.dst.reverse,
            global_alpha: cfg.global_alpha.code(),
            src1_used: cfg.src1_used,
            src2_used: cfg.src2_used,
        }
    }

    pub fn encode(&self) -> u32 {
        (self.src_mode & 0x7)
            | (u32::from(self.src_reverse) << 3)
            | ((self.dst_mode & 0x7) << 4)
            | (u32::from(self.dst_reverse) << 7)
            | ((self.global_alpha & 0x3) << 8)
            | (u32::from(self.src1_used) << 12)
            | (u32::from(self.src2_used) << 13)
    }

    pub fn decode(word: u32) -> Self {
        Self {
            src_mode: field(word, 0, 3),
            src_reverse: bit(word, 3),
            dst_mode: field(word, 4, 3),
            dst_reverse: bit(word, 7),
            global_alpha: field(word, 8, 2),
            src1_used: bit(word, 12),
            src2_used: bit(word, 13),
        }
    }

    /// Rebuild the blend configuration; `None` when a mode field holds no known factor.
    pub fn to_blend(&self, global_src_alpha: u8, global_dst_alpha: u8) -> Option<BlendConfig> {
        let global_alpha = match self.global_alpha {
            0 => GlobalAlphaMode::None,
            1 => GlobalAlphaMode::Replace,
            2 => GlobalAlphaMode::Scaled,
            _ => return None,
        };
        let src = FactorMode::from_code(self.src_mode)?;
        let dst = FactorMode::from_code(self.dst_mode)?;
        Some(BlendConfig {
            dst: FactorConfig {
                mode: dst,
                reverse: self.dst_reverse,
                src1_used: false,
                src2_used: false,
            },
            src: FactorConfig {
                mode: src,
                reverse: self.src_reverse,
                src1_used: false,
                src2_used: false,
            },
            src1_used: self.src1_used,
            src2_used: self.src2_used,
            global_alpha,
            global_src_alpha,
            global_dst_alpha,
        })
    }
}

/// Premultiplication stages around the blender.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorMultiply {
    pub src_premultiply: bool,
    pub dst_premultiply: bool,
    pub dst_demultiply: bool,
}

impl ColorMultiply {
    pub fn encode(&self) -> u32 {
        u32::from(self.src_premultiply)
            | (u32::from(self.dst_premultiply) << 1)
            | (u32::from(self.dst_demultiply) << 2)
    }

    pub fn decode(word: u32) -> Self {
        Self {
            src_premultiply: bit(word, 0),
            dst_premultiply: bit(word, 1),
            dst_demultiply: bit(word, 2),
        }
    }
}

pub fn encode_multi_source(count: usize) -> u32 {
    (count as u32 & 0x7) | (1 << 8)
}

pub fn decode_multi_source(word: u32) -> usize {
    field(word, 0, 3) as usize
}

/// Which axes a filter pass resamples.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    /// 0 horizontal, 1 vertical, 2 both.
    pub pass: u32,
    pub h_taps: u32,
    pub v_taps: u32,
}

impl FilterConfig {
    pub fn encode(&self) -> u32 {
        (self.pass & 0x3) | ((self.h_taps & 0xF) << 4) | ((self.v_taps & 0xF) << 8)
    }

    pub fn decode(word: u32) -> Self {
        Self {
            pass: field(word, 0, 2),
            h_taps: field(word, 4, 4),
            v_taps: field(word, 8, 4),
        }
    }
}

/// Pack two 2.14 coefficients into one kernel word, first in the low half.
pub fn pack_coeffs(lo: i16, hi: i16) -> u32 {
    u32::from(coeff_bits(lo)) | (u32::from(coeff_bits(hi)) << 16)
}

pub fn unpack_coeffs(word: u32) -> (i16, i16) {
    (
        coeff_from_bits(word as u16),
        coeff_from_bits((word >> 16) as u16),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/hw/regs.rs"]
mod tests;
