use super::*;

#[test]
fn ratio_clamps_to_one() {
    assert_eq!(ratio_1_31(10, 10), ONE_1_31);
    assert_eq!(ratio_1_31(20, 10), ONE_1_31);
    assert_eq!(ratio_1_31(5, 10), 0x4000_0000);
    assert_eq!(ratio_1_31(1, 4), 0x2000_0000);
    assert_eq!(ratio_1_31(3, 0), ONE_1_31);
}

#[test]
fn step_is_source_over_destination() {
    assert_eq!(step_16_16(64, 64), ONE_16_16);
    assert_eq!(step_16_16(64, 128), 0x8000);
    assert_eq!(step_16_16(128, 64), 0x2_0000);
    assert_eq!(step_16_16(1, 0), 0);
}

#[test]
fn div_round_is_symmetric() {
    assert_eq!(div_round(5, 2), 3);
    assert_eq!(div_round(-5, 2), -3);
    assert_eq!(div_round(4, 3), 1);
    assert_eq!(div_round(-4, 3), -1);
    assert_eq!(div_round(7, -2), -4);
}

#[test]
fn coefficient_bits_roundtrip_negative_values() {
    assert_eq!(coeff_bits(-1), 0xFFFF);
    assert_eq!(coeff_from_bits(0xFFFF), -1);
    assert_eq!(coeff_from_bits(coeff_bits(0x4000)), 0x4000);
}
