use std::fmt;

use crate::blend::resolve::{FactorConfig, FactorMode};

/// Symbolic meaning of a coefficient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Factor {
    Zero,
    One,
    C1,
    A1,
    C2,
    A2,
    OneMinusC1,
    OneMinusA1,
    OneMinusC2,
    OneMinusA2,
    /// `min(A1, 1 - A2)`.
    SatA1,
    /// `min(A2, 1 - A1)`.
    SatA2,
    Undefined,
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::C1 => "C1",
            Self::A1 => "A1",
            Self::C2 => "C2",
            Self::A2 => "A2",
            Self::OneMinusC1 => "1-C1",
            Self::OneMinusA1 => "1-A1",
            Self::OneMinusC2 => "1-C2",
            Self::OneMinusA2 => "1-A2",
            Self::SatA1 => "min(A1,1-A2)",
            Self::SatA2 => "min(A2,1-A1)",
            Self::Undefined => "undefined",
        };
        f.write_str(s)
    }
}

/// Which operand a factor multiplies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// k1/k3, multiplies operand 2.
    Background,
    /// k2/k4, multiplies operand 1.
    Source,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Operand {
    First,
    Second,
}

const SEL_C1: u8 = 0;
const SEL_A1: u8 = 1;
const SEL_C2: u8 = 2;
const SEL_A2: u8 = 3;

fn operand_factor(sel: u8, inverted: bool) -> Factor {
    match (sel, inverted) {
        (SEL_C1, false) => Factor::C1,
        (SEL_A1, false) => Factor::A1,
        (SEL_C2, false) => Factor::C2,
        (SEL_A2, false) => Factor::A2,
        (SEL_C1, true) => Factor::OneMinusC1,
        (SEL_A1, true) => Factor::OneMinusA1,
        (SEL_C2, true) => Factor::OneMinusC2,
        (_, true) => Factor::OneMinusA2,
        _ => Factor::Undefined,
    }
}

/// Decode a 6-bit `[mode:2][aux:2][sel:2]` coefficient.
///
/// - mode 0: `(1 - aux) + sel`, only `aux == sel` (one) is defined,
/// - mode 1: `aux - sel`, only `aux == sel` (zero) is defined,
/// - mode 2: `sel` when `aux` is C1 or equals `sel`; `min(sel, 1 - aux)` for the two alpha pairs,
/// - mode 3: `1 - sel` when `aux` is C1 or equals `sel`.
pub fn decode_coefficient(k: u8) -> Factor {
    let mode = (k >> 4) & 0x3;
    let aux = (k >> 2) & 0x3;
    let sel = k & 0x3;
    match mode {
        0 if aux == sel => Factor::One,
        1 if aux == sel => Factor::Zero,
        2 if aux == SEL_C1 || aux == sel => operand_factor(sel, false),
        2 if (aux, sel) == (SEL_A2, SEL_A1) => Factor::SatA1,
        2 if (aux, sel) == (SEL_A1, SEL_A2) => Factor::SatA2,
        3 if aux == SEL_C1 || aux == sel => operand_factor(sel, true),
        _ => Factor::Undefined,
    }
}

impl FactorConfig {
    /// Symbolic factor computed by this hardware configuration when used on `side`.
    pub fn symbolic(&self, side: Side) -> Factor {
        let (this, other) = match side {
            Side::Background => (Operand::Second, Operand::First),
            Side::Source => (Operand::First, Operand::Second),
        };
        let read = if self.reverse { this } else { other };
        let pick = |first: Factor, second: Factor| match read {
            Operand::First => first,
            Operand::Second => second,
        };
        let sat_self = |op: Operand| match op {
            Operand::First => Factor::SatA1,
            Operand::Second => Factor::SatA2,
        };
        match self.mode {
            FactorMode::Zero => Factor::Zero,
            FactorMode::One => Factor::One,
            FactorMode::Normal => pick(Factor::A1, Factor::A2),
            FactorMode::Inversed => pick(Factor::OneMinusA1, Factor::OneMinusA2),
            FactorMode::Color => pick(Factor::C1, Factor::C2),
            FactorMode::ColorInversed => pick(Factor::OneMinusC1, Factor::OneMinusC2),
            FactorMode::SaturatedAlpha => sat_self(this),
            FactorMode::SaturatedDestAlpha => sat_self(other),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blend/symbolic.rs"]
mod tests;
