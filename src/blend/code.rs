use std::fmt;
use std::str::FromStr;

use crate::foundation::error::BlitError;

const K1_SHIFT: u32 = 18;
const K2_SHIFT: u32 = 12;
const K3_SHIFT: u32 = 6;
const K4_SHIFT: u32 = 0;
const GLOBAL_SHIFT: u32 = 24;
const CLASS_SHIFT: u32 = 28;

/// How the constant alpha values of a [`BlendSpec`] apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlobalAlphaMode {
    #[default]
    None,
    /// Per-pixel alpha replaced by the constant.
    Replace,
    /// Per-pixel alpha multiplied by the constant.
    Scaled,
}

impl GlobalAlphaMode {
    pub fn code(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Replace => 1,
            Self::Scaled => 2,
        }
    }

    fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Replace),
            2 => Some(Self::Scaled),
            _ => None,
        }
    }
}

/// Packed blend descriptor: `[class:4][global:4][k1:6][k2:6][k3:6][k4:6]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "CodeRepr", into = "u32")]
pub struct BlendCode(pub u32);

impl BlendCode {
    pub const CLEAR: Self = Self::new(0x10, 0x10, 0x10, 0x10);
    pub const SRC: Self = Self::new(0x10, 0x00, 0x10, 0x00);
    pub const DST: Self = Self::new(0x00, 0x10, 0x00, 0x10);
    pub const SRC_OVER: Self = Self::new(0x31, 0x00, 0x31, 0x00);
    pub const DST_OVER: Self = Self::new(0x00, 0x33, 0x00, 0x33);
    pub const SRC_IN: Self = Self::new(0x10, 0x23, 0x10, 0x23);
    pub const DST_IN: Self = Self::new(0x21, 0x10, 0x21, 0x10);
    pub const SRC_OUT: Self = Self::new(0x10, 0x33, 0x10, 0x33);
    pub const DST_OUT: Self = Self::new(0x31, 0x10, 0x31, 0x10);
    pub const SRC_ATOP: Self = Self::new(0x31, 0x23, 0x31, 0x23);
    pub const DST_ATOP: Self = Self::new(0x21, 0x33, 0x21, 0x33);
    pub const XOR: Self = Self::new(0x31, 0x33, 0x31, 0x33);
    pub const ADD: Self = Self::new(0x00, 0x00, 0x00, 0x00);

    const NAMED: [(&'static str, Self); 13] = [
        ("clear", Self::CLEAR),
        ("src", Self::SRC),
        ("dst", Self::DST),
        ("src_over", Self::SRC_OVER),
        ("dst_over", Self::DST_OVER),
        ("src_in", Self::SRC_IN),
        ("dst_in", Self::DST_IN),
        ("src_out", Self::SRC_OUT),
        ("dst_out", Self::DST_OUT),
        ("src_atop", Self::SRC_ATOP),
        ("dst_atop", Self::DST_ATOP),
        ("xor", Self::XOR),
        ("add", Self::ADD),
    ];

    pub const fn new(k1: u8, k2: u8, k3: u8, k4: u8) -> Self {
        Self(
            ((k1 as u32 & 0x3F) << K1_SHIFT)
                | ((k2 as u32 & 0x3F) << K2_SHIFT)
                | ((k3 as u32 & 0x3F) << K3_SHIFT)
                | ((k4 as u32 & 0x3F) << K4_SHIFT),
        )
    }

    pub fn with_global_alpha(self, mode: GlobalAlphaMode) -> Self {
        Self((self.0 & !(0xF << GLOBAL_SHIFT)) | (mode.code() << GLOBAL_SHIFT))
    }

    /// Colour factor applied to the background.
    pub fn k1(self) -> u8 {
        ((self.0 >> K1_SHIFT) & 0x3F) as u8
    }

    /// Colour factor applied to the source.
    pub fn k2(self) -> u8 {
        ((self.0 >> K2_SHIFT) & 0x3F) as u8
    }

    /// Alpha factor applied to the background.
    pub fn k3(self) -> u8 {
        ((self.0 >> K3_SHIFT) & 0x3F) as u8
    }

    /// Alpha factor applied to the source.
    pub fn k4(self) -> u8 {
        ((self.0 >> K4_SHIFT) & 0x3F) as u8
    }

    pub fn class(self) -> u32 {
        self.0 >> CLASS_SHIFT
    }

    /// `None` for an unknown mode value.
    pub fn global_alpha(self) -> Option<GlobalAlphaMode> {
        GlobalAlphaMode::from_code((self.0 >> GLOBAL_SHIFT) & 0xF)
    }

    pub fn name(self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, c)| *c == self)
            .map(|(n, _)| *n)
    }
}

impl fmt::Debug for BlendCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BlendCode(k1={:#04x} k2={:#04x} k3={:#04x} k4={:#04x} global={} class={})",
            self.k1(),
            self.k2(),
            self.k3(),
            self.k4(),
            (self.0 >> GLOBAL_SHIFT) & 0xF,
            self.class()
        )
    }
}

impl FromStr for BlendCode {
    type Err = BlitError;

    /// Accepts a Porter-Duff name (`src_over`), a `0x` hex code or a decimal code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if let Some((_, code)) = Self::NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(t))
        {
            return Ok(*code);
        }
        let parsed = match t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => t.parse::<u32>(),
        };
        parsed
            .map(Self)
            .map_err(|_| BlitError::invalid_argument(format!("unknown blend code '{s}'")))
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Num(u32),
    Text(String),
}

impl TryFrom<CodeRepr> for BlendCode {
    type Error = BlitError;

    fn try_from(value: CodeRepr) -> Result<Self, Self::Error> {
        match value {
            CodeRepr::Num(n) => Ok(Self(n)),
            CodeRepr::Text(s) => s.parse(),
        }
    }
}

impl From<BlendCode> for u32 {
    fn from(value: BlendCode) -> Self {
        value.0
    }
}

/// A blend request: coefficients plus the constant alpha values used by the global modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlendSpec {
    pub code: BlendCode,
    #[serde(default = "opaque")]
    pub global_src_alpha: u8,
    #[serde(default = "opaque")]
    pub global_dst_alpha: u8,
}

fn opaque() -> u8 {
    0xFF
}

impl BlendSpec {
    pub fn new(code: BlendCode) -> Self {
        Self {
            code,
            global_src_alpha: 0xFF,
            global_dst_alpha: 0xFF,
        }
    }
}

impl From<BlendCode> for BlendSpec {
    fn from(code: BlendCode) -> Self {
        Self::new(code)
    }
}
