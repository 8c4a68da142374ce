use super::*;
use crate::blend::table::BLEND_XLATE;
use crate::blend::code::BlendCode;
use crate::blend::symbolic::{Factor, Side, decode_coefficient};
use crate::foundation::error::BlitErrorKind;

fn alpha_equivalent(f: Factor) -> Factor {
    match f {
        Factor::C1 => Factor::A1,
        Factor::C2 => Factor::A2,
        Factor::OneMinusC1 => Factor::OneMinusA1,
        Factor::OneMinusC2 => Factor::OneMinusA2,
        Factor::SatA1 | Factor::SatA2 => Factor::One,
        other => other,
    }
}

fn resolve(k1: u8, k2: u8, k3: u8, k4: u8) -> BlitResult<BlendConfig> {
    resolve_blend(BlendSpec::new(BlendCode::new(k1, k2, k3, k4)))
}

#[test]
fn over_uses_both_sources() {
    let cfg = resolve_blend(BlendSpec::new(BlendCode::SRC_OVER)).unwrap();
    assert_eq!(cfg.dst.mode, FactorMode::Inversed);
    assert!(!cfg.dst.reverse);
    assert_eq!(cfg.src.mode, FactorMode::One);
    assert!(cfg.src1_used);
    assert!(cfg.src2_used);
    assert_eq!(cfg.global_alpha, GlobalAlphaMode::None);
}

#[test]
fn src_copy_ignores_background() {
    let cfg = resolve_blend(BlendSpec::new(BlendCode::SRC)).unwrap();
    assert!(cfg.src1_used);
    assert!(!cfg.src2_used);
    assert_eq!(cfg, BlendConfig::copy());
}

#[test]
fn table_defines_exactly_24_coefficients() {
    let defined = (0u8..64)
        .filter(|&k| decode_coefficient(k) != Factor::Undefined)
        .count();
    assert_eq!(defined, 24);
    for k in 0u8..64 {
        let entry = &BLEND_XLATE[usize::from(k)];
        assert_eq!(
            entry.as_dst.is_some(),
            decode_coefficient(k) != Factor::Undefined,
            "k={k:#04x}"
        );
    }
}

#[test]
fn background_factor_accepts_only_legal_alpha_matches() {
    for k in 0u8..64 {
        let f = decode_coefficient(k);
        let entry = &BLEND_XLATE[usize::from(k)];
        for k3 in 0u8..64 {
            let res = resolve(k, 0x00, k3, 0x00);
            if f == Factor::Undefined {
                assert_eq!(
                    res.unwrap_err().kind(),
                    BlitErrorKind::UnsupportedBlendCombination
                );
                continue;
            }
            let legal = k3 == entry.match1 || k3 == entry.match2;
            match res {
                Ok(cfg) => {
                    assert!(legal, "k1={k:#04x} k3={k3:#04x} should be rejected");
                    assert_eq!(cfg.dst.symbolic(Side::Background), f, "k1={k:#04x}");
                }
                Err(e) => {
                    assert!(!legal, "k1={k:#04x} k3={k3:#04x} should resolve");
                    assert_eq!(e.kind(), BlitErrorKind::UnsupportedBlendCombination);
                }
            }
        }
    }
}

#[test]
fn source_factor_accepts_only_legal_alpha_matches() {
    for k in 0u8..64 {
        let f = decode_coefficient(k);
        let entry = &BLEND_XLATE[usize::from(k)];
        for k4 in 0u8..64 {
            let res = resolve(0x10, k, 0x10, k4);
            if f == Factor::Undefined {
                assert!(res.is_err());
                continue;
            }
            let legal = k4 == entry.match1 || k4 == entry.match2;
            assert_eq!(res.is_ok(), legal, "k2={k:#04x} k4={k4:#04x}");
            if let Ok(cfg) = res {
                assert_eq!(cfg.src.symbolic(Side::Source), f, "k2={k:#04x}");
            }
        }
    }
}

#[test]
fn first_match_is_the_alpha_equivalent() {
    for k in 0u8..64 {
        let f = decode_coefficient(k);
        if f == Factor::Undefined {
            continue;
        }
        let entry = &BLEND_XLATE[usize::from(k)];
        assert_eq!(
            decode_coefficient(entry.match1),
            alpha_equivalent(f),
            "k={k:#04x}"
        );
    }
}

#[test]
fn plausible_but_unsupported_combinations_are_rejected() {
    // 1 - A2 + A1
    assert!(resolve(0x0D, 0x00, 0x0D, 0x00).is_err());
    // min(C1, 1 - C2)
    assert!(resolve(0x10, 0x28, 0x10, 0x28).is_err());
}

#[test]
fn unsupported_class_and_global_mode() {
    let code = BlendCode(BlendCode::SRC_OVER.0 | (1 << 28));
    assert_eq!(
        resolve_blend(BlendSpec::new(code)).unwrap_err().kind(),
        BlitErrorKind::UnsupportedBlendCombination
    );
    let code = BlendCode(BlendCode::SRC_OVER.0 | (7 << 24));
    assert!(resolve_blend(BlendSpec::new(code)).is_err());
}

#[test]
fn global_alpha_marks_source_used() {
    let spec = BlendSpec {
        code: BlendCode::DST.with_global_alpha(GlobalAlphaMode::Scaled),
        global_src_alpha: 0x80,
        global_dst_alpha: 0xFF,
    };
    let cfg = resolve_blend(spec).unwrap();
    assert!(cfg.src1_used);
    assert_eq!(cfg.global_alpha, GlobalAlphaMode::Scaled);
    assert_eq!(cfg.global_src_alpha, 0x80);
}

#[test]
fn named_porter_duff_modes_resolve() {
    for code in [
        BlendCode::CLEAR,
        BlendCode::SRC,
        BlendCode::DST,
        BlendCode::SRC_OVER,
        BlendCode::DST_OVER,
        BlendCode::SRC_IN,
        BlendCode::DST_IN,
        BlendCode::SRC_OUT,
        BlendCode::DST_OUT,
        BlendCode::SRC_ATOP,
        BlendCode::DST_ATOP,
        BlendCode::XOR,
        BlendCode::ADD,
    ] {
        resolve_blend(BlendSpec::new(code)).unwrap();
    }
}
