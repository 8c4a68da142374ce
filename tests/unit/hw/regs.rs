use super::*;
use crate::blend::{BlendCode, BlendSpec, resolve_blend};

#[test]
fn headers_carry_opcode_and_fields() {
    let h = load_state_header(DEST_ADDRESS, DEST_REGS);
    assert_eq!(opcode(h), OP_LOAD_STATE);
    assert_eq!(load_state_fields(h), (DEST_ADDRESS, DEST_REGS));

    let de = start_de_header(3);
    assert_eq!(opcode(de), OP_START_DE);
    assert_eq!(start_de_count(de), 3);
    assert_eq!(opcode(END), OP_END);
    assert_eq!(opcode(NOP), OP_NOP);
}

#[test]
fn source_banks_are_strided() {
    assert_eq!(src_bank(0), 0x4A00);
    assert_eq!(src_bank(3), 0x4A60);
    assert!(SRC_REGS <= SRC_BANK_STRIDE as usize);
}

#[test]
fn register_names() {
    assert_eq!(register_name(DEST_CONFIG).as_deref(), Some("DEST_CONFIG"));
    assert_eq!(
        register_name(src_bank(2) + SRC_ROP).as_deref(),
        Some("SRC2_ROP")
    );
    assert_eq!(
        register_name(FILTER_KERNEL_V + 10).as_deref(),
        Some("FILTER_KERNEL_V[10]")
    );
    assert_eq!(register_name(0x0001), None);
    assert_eq!(register_name(src_bank(0) + 0x1F), None);
}

#[test]
fn xy_packing_keeps_sixteen_bits_each() {
    let w = pack_xy(0x1234, 0x7FFF);
    assert_eq!(w, 0x7FFF_1234);
    assert_eq!(unpack_xy(w), (0x1234, 0x7FFF));
}

#[test]
fn surface_config_fields() {
    let c = SurfaceConfig {
        format: 6,
        swizzle: 3,
        premultiplied: true,
        zero_fill: false,
        bt709: true,
        uv_swap: false,
        command: Command::MultiSource.code(),
    };
    let w = c.encode();
    assert_eq!(w & 0x1F, 6);
    assert_eq!((w >> 12) & 0xF, 3);
    assert_eq!(SurfaceConfig::decode(w), c);
    assert_eq!(Command::from_code(c.command), Some(Command::MultiSource));
}

#[test]
fn alpha_modes_rebuild_blend() {
    let cfg = resolve_blend(BlendSpec::new(BlendCode::SRC_OVER)).unwrap();
    let modes = AlphaModes::from_blend(&cfg);
    let back = AlphaModes::decode(modes.encode())
        .to_blend(cfg.global_src_alpha, cfg.global_dst_alpha)
        .unwrap();
    assert_eq!(back.src.mode, cfg.src.mode);
    assert_eq!(back.dst.mode, cfg.dst.mode);
    assert_eq!(back.dst.reverse, cfg.dst.reverse);
    assert!(back.src1_used && back.src2_used);
}

#[test]
fn rotation_and_mirror_fields() {
    let r = RotationConfig {
        width: 640,
        quarter_turns: 3,
    };
    assert_eq!(RotationConfig::decode(r.encode()), r);
    let m = Mirror {
        horizontal: false,
        vertical: true,
    };
    assert_eq!(decode_rot_mirror(encode_rot_mirror(1, m)), (1, m));
}

#[test]
fn kernel_coefficients_pack_signed() {
    let w = pack_coeffs(-3, 0x4000);
    assert_eq!(w, 0x4000_FFFD);
    assert_eq!(unpack_coeffs(w), (-3, 0x4000));
}

#[test]
fn multi_source_count() {
    assert_eq!(decode_multi_source(encode_multi_source(4)), 4);
    assert_ne!(encode_multi_source(2) & (1 << 8), 0);
}
