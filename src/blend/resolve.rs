use crate::blend::code::{BlendSpec, GlobalAlphaMode};
use crate::blend::table::BLEND_XLATE;
use crate::foundation::error::{BlitError, BlitResult};

/// Hardware blend-factor modes.
///
/// Each factor is evaluated for one operand ("self") against the other operand of the blend.
/// Without `reverse`, the alpha/colour modes read the *other* operand; with it they read self.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum FactorMode {
    Zero,
    One,
    /// Alpha.
    Normal,
    /// One minus alpha.
    Inversed,
    Color,
    ColorInversed,
    /// `min(A_self, 1 - A_other)`.
    SaturatedAlpha,
    /// `min(A_other, 1 - A_self)`.
    SaturatedDestAlpha,
}

impl FactorMode {
    pub fn code(self) -> u32 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Normal => 2,
            Self::Inversed => 3,
            Self::Color => 4,
            Self::ColorInversed => 5,
            Self::SaturatedAlpha => 6,
            Self::SaturatedDestAlpha => 7,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::Zero,
            1 => Self::One,
            2 => Self::Normal,
            3 => Self::Inversed,
            4 => Self::Color,
            5 => Self::ColorInversed,
            6 => Self::SaturatedAlpha,
            7 => Self::SaturatedDestAlpha,
            _ => return None,
        })
    }
}

/// Hardware configuration of one blend factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct FactorConfig {
    pub mode: FactorMode,
    pub reverse: bool,
    pub src1_used: bool,
    pub src2_used: bool,
}

impl FactorConfig {
    pub(crate) const fn new(mode: FactorMode, reverse: bool, src1: bool, src2: bool) -> Self {
        Self {
            mode,
            reverse,
            src1_used: src1,
            src2_used: src2,
        }
    }
}

/// Resolved blend, ready for register encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct BlendConfig {
    /// Factor applied to the background (k1).
    pub dst: FactorConfig,
    /// Factor applied to the source (k2).
    pub src: FactorConfig,
    pub src1_used: bool,
    pub src2_used: bool,
    pub global_alpha: GlobalAlphaMode,
    pub global_src_alpha: u8,
    pub global_dst_alpha: u8,
}

impl BlendConfig {
    /// Plain source copy: background ignored.
    pub fn copy() -> Self {
        Self {
            dst: FactorConfig::new(FactorMode::Zero, false, false, false),
            src: FactorConfig::new(FactorMode::One, false, true, false),
            src1_used: true,
            src2_used: false,
            global_alpha: GlobalAlphaMode::None,
            global_src_alpha: 0xFF,
            global_dst_alpha: 0xFF,
        }
    }
}

/// Translate a Porter-Duff coefficient set into the accelerator's factor configuration.
pub fn resolve_blend(spec: BlendSpec) -> BlitResult<BlendConfig> {
    let code = spec.code;
    if code.class() != 0 {
        return Err(BlitError::unsupported_blend(format!(
            "{code:?}: unsupported equation class"
        )));
    }
    let Some(global_alpha) = code.global_alpha() else {
        return Err(BlitError::unsupported_blend(format!(
            "{code:?}: unknown global alpha mode"
        )));
    };

    let (k1, k2, k3, k4) = (code.k1(), code.k2(), code.k3(), code.k4());
    let dst_entry = &BLEND_XLATE[usize::from(k1)];
    let src_entry = &BLEND_XLATE[usize::from(k2)];
    let (Some(dst), Some(src)) = (dst_entry.as_dst, src_entry.as_src) else {
        return Err(BlitError::unsupported_blend(format!(
            "{code:?}: colour coefficient has no hardware factor"
        )));
    };
    if !dst_entry.matches(k3) {
        return Err(BlitError::unsupported_blend(format!(
            "{code:?}: alpha coefficient k3 does not match k1"
        )));
    }
    if !src_entry.matches(k4) {
        return Err(BlitError::unsupported_blend(format!(
            "{code:?}: alpha coefficient k4 does not match k2"
        )));
    }

    let mut src1_used = dst.src1_used || src.src1_used;
    let src2_used = dst.src2_used || src.src2_used;
    if global_alpha != GlobalAlphaMode::None {
        src1_used = true;
    }

    Ok(BlendConfig {
        dst,
        src,
        src1_used,
        src2_used,
        global_alpha,
        global_src_alpha: spec.global_src_alpha,
        global_dst_alpha: spec.global_dst_alpha,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/blend/resolve.rs"]
mod tests;
