use super::*;

#[test]
fn decodes_documented_values() {
    assert_eq!(decode_coefficient(0x00), Factor::One);
    assert_eq!(decode_coefficient(0x0F), Factor::One);
    assert_eq!(decode_coefficient(0x15), Factor::Zero);
    assert_eq!(decode_coefficient(0x20), Factor::C1);
    assert_eq!(decode_coefficient(0x23), Factor::A2);
    assert_eq!(decode_coefficient(0x25), Factor::A1);
    assert_eq!(decode_coefficient(0x2D), Factor::SatA1);
    assert_eq!(decode_coefficient(0x27), Factor::SatA2);
    assert_eq!(decode_coefficient(0x31), Factor::OneMinusA1);
    assert_eq!(decode_coefficient(0x3A), Factor::OneMinusC2);
}

#[test]
fn off_diagonal_modes_are_undefined() {
    for k in [0x01, 0x0D, 0x11, 0x24, 0x28, 0x34, 0x3D] {
        assert_eq!(decode_coefficient(k), Factor::Undefined, "{k:#04x}");
    }
}

#[test]
fn reverse_flips_the_operand_read() {
    let cfg = FactorConfig::new(FactorMode::Normal, false, true, true);
    assert_eq!(cfg.symbolic(Side::Background), Factor::A1);
    assert_eq!(cfg.symbolic(Side::Source), Factor::A2);
    let cfg = FactorConfig::new(FactorMode::Normal, true, true, true);
    assert_eq!(cfg.symbolic(Side::Background), Factor::A2);
    assert_eq!(cfg.symbolic(Side::Source), Factor::A1);
}

#[test]
fn saturate_modes_depend_on_side() {
    let sat = FactorConfig::new(FactorMode::SaturatedAlpha, false, true, true);
    assert_eq!(sat.symbolic(Side::Source), Factor::SatA1);
    assert_eq!(sat.symbolic(Side::Background), Factor::SatA2);
    let sat_dest = FactorConfig::new(FactorMode::SaturatedDestAlpha, false, true, true);
    assert_eq!(sat_dest.symbolic(Side::Background), Factor::SatA1);
}

#[test]
fn display_is_compact() {
    assert_eq!(Factor::OneMinusA1.to_string(), "1-A1");
    assert_eq!(Factor::SatA2.to_string(), "min(A2,1-A1)");
}
