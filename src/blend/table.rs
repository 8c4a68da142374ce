//! Coefficient translation table.
//!
//! Rows are indexed by the 6-bit coefficient. A row lists the one or two alpha coefficients that
//! may accompany it and the hardware factor it maps to as background factor (k1) and as source
//! factor (k2). Rows without a factor are combinations the hardware cannot express.

use crate::blend::resolve::{FactorConfig, FactorMode};

#[derive(Clone, Copy, Debug)]
pub(crate) struct XlateEntry {
    pub(crate) match1: u8,
    pub(crate) match2: u8,
    pub(crate) as_dst: Option<FactorConfig>,
    pub(crate) as_src: Option<FactorConfig>,
}

impl XlateEntry {
    pub(crate) fn matches(&self, alpha: u8) -> bool {
        self.as_dst.is_some() && (alpha == self.match1 || alpha == self.match2)
    }
}

const fn e(match1: u8, match2: u8, as_dst: FactorConfig, as_src: FactorConfig) -> XlateEntry {
    XlateEntry {
        match1,
        match2,
        as_dst: Some(as_dst),
        as_src: Some(as_src),
    }
}

const U: XlateEntry = XlateEntry {
    match1: 0xFF,
    match2: 0xFF,
    as_dst: None,
    as_src: None,
};

use FactorMode::{
    Color, ColorInversed, Inversed, Normal, One, SaturatedAlpha, SaturatedDestAlpha, Zero,
};

// Background-side factors (self = operand 2).
const D_ZERO: FactorConfig = FactorConfig::new(Zero, false, false, false);
const D_ONE: FactorConfig = FactorConfig::new(One, false, false, true);
const D_C1: FactorConfig = FactorConfig::new(Color, false, true, true);
const D_A1: FactorConfig = FactorConfig::new(Normal, false, true, true);
const D_C2: FactorConfig = FactorConfig::new(Color, true, false, true);
const D_A2: FactorConfig = FactorConfig::new(Normal, true, false, true);
const D_INV_C1: FactorConfig = FactorConfig::new(ColorInversed, false, true, true);
const D_INV_A1: FactorConfig = FactorConfig::new(Inversed, false, true, true);
const D_INV_C2: FactorConfig = FactorConfig::new(ColorInversed, true, false, true);
const D_INV_A2: FactorConfig = FactorConfig::new(Inversed, true, false, true);
const D_SAT_A1: FactorConfig = FactorConfig::new(SaturatedDestAlpha, false, true, true);
const D_SAT_A2: FactorConfig = FactorConfig::new(SaturatedAlpha, false, true, true);

// Source-side factors (self = operand 1).
const S_ZERO: FactorConfig = FactorConfig::new(Zero, false, false, false);
const S_ONE: FactorConfig = FactorConfig::new(One, false, true, false);
const S_C1: FactorConfig = FactorConfig::new(Color, true, true, false);
const S_A1: FactorConfig = FactorConfig::new(Normal, true, true, false);
const S_C2: FactorConfig = FactorConfig::new(Color, false, true, true);
const S_A2: FactorConfig = FactorConfig::new(Normal, false, true, true);
const S_INV_C1: FactorConfig = FactorConfig::new(ColorInversed, true, true, false);
const S_INV_A1: FactorConfig = FactorConfig::new(Inversed, true, true, false);
const S_INV_C2: FactorConfig = FactorConfig::new(ColorInversed, false, true, true);
const S_INV_A2: FactorConfig = FactorConfig::new(Inversed, false, true, true);
const S_SAT_A1: FactorConfig = FactorConfig::new(SaturatedAlpha, false, true, true);
const S_SAT_A2: FactorConfig = FactorConfig::new(SaturatedDestAlpha, false, true, true);

pub(crate) static BLEND_XLATE: [XlateEntry; 64] = [
    /* 0x00 one       */ e(0x00, 0x00, D_ONE, S_ONE),
    /* 0x01           */ U,
    /* 0x02           */ U,
    /* 0x03           */ U,
    /* 0x04           */ U,
    /* 0x05 one       */ e(0x00, 0x05, D_ONE, S_ONE),
    /* 0x06           */ U,
    /* 0x07           */ U,
    /* 0x08           */ U,
    /* 0x09           */ U,
    /* 0x0a one       */ e(0x00, 0x0A, D_ONE, S_ONE),
    /* 0x0b           */ U,
    /* 0x0c           */ U,
    /* 0x0d 1-a2+a1   */ U,
    /* 0x0e           */ U,
    /* 0x0f one       */ e(0x00, 0x0F, D_ONE, S_ONE),
    /* 0x10 zero      */ e(0x10, 0x10, D_ZERO, S_ZERO),
    /* 0x11           */ U,
    /* 0x12           */ U,
    /* 0x13           */ U,
    /* 0x14           */ U,
    /* 0x15 zero      */ e(0x10, 0x15, D_ZERO, S_ZERO),
    /* 0x16           */ U,
    /* 0x17           */ U,
    /* 0x18           */ U,
    /* 0x19           */ U,
    /* 0x1a zero      */ e(0x10, 0x1A, D_ZERO, S_ZERO),
    /* 0x1b           */ U,
    /* 0x1c           */ U,
    /* 0x1d           */ U,
    /* 0x1e           */ U,
    /* 0x1f zero      */ e(0x10, 0x1F, D_ZERO, S_ZERO),
    /* 0x20 c1        */ e(0x21, 0x20, D_C1, S_C1),
    /* 0x21 a1        */ e(0x21, 0x21, D_A1, S_A1),
    /* 0x22 c2        */ e(0x23, 0x22, D_C2, S_C2),
    /* 0x23 a2        */ e(0x23, 0x23, D_A2, S_A2),
    /* 0x24 min(c1,1-a1) */ U,
    /* 0x25 a1        */ e(0x21, 0x25, D_A1, S_A1),
    /* 0x26           */ U,
    /* 0x27 sat a2    */ e(0x00, 0x00, D_SAT_A2, S_SAT_A2),
    /* 0x28 min(c1,1-c2) */ U,
    /* 0x29           */ U,
    /* 0x2a c2        */ e(0x23, 0x2A, D_C2, S_C2),
    /* 0x2b           */ U,
    /* 0x2c           */ U,
    /* 0x2d sat a1    */ e(0x00, 0x00, D_SAT_A1, S_SAT_A1),
    /* 0x2e           */ U,
    /* 0x2f a2        */ e(0x23, 0x2F, D_A2, S_A2),
    /* 0x30 1-c1      */ e(0x31, 0x30, D_INV_C1, S_INV_C1),
    /* 0x31 1-a1      */ e(0x31, 0x31, D_INV_A1, S_INV_A1),
    /* 0x32 1-c2      */ e(0x33, 0x32, D_INV_C2, S_INV_C2),
    /* 0x33 1-a2      */ e(0x33, 0x33, D_INV_A2, S_INV_A2),
    /* 0x34           */ U,
    /* 0x35 1-a1      */ e(0x31, 0x35, D_INV_A1, S_INV_A1),
    /* 0x36           */ U,
    /* 0x37           */ U,
    /* 0x38           */ U,
    /* 0x39           */ U,
    /* 0x3a 1-c2      */ e(0x33, 0x3A, D_INV_C2, S_INV_C2),
    /* 0x3b           */ U,
    /* 0x3c           */ U,
    /* 0x3d           */ U,
    /* 0x3e           */ U,
    /* 0x3f 1-a2      */ e(0x33, 0x3F, D_INV_A2, S_INV_A2),
];
