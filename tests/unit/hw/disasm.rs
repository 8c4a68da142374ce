use super::*;

#[test]
fn decodes_mixed_stream() {
    let words = [
        regs::load_state_header(regs::CLIP_TOP_LEFT, 2),
        regs::pack_xy(0, 0),
        regs::pack_xy(16, 8),
        0,
        regs::start_de_header(1),
        0,
        regs::pack_xy(1, 2),
        regs::pack_xy(5, 6),
        regs::END,
        regs::NOP,
    ];
    let recs = disassemble(&words).unwrap();
    assert_eq!(recs.len(), 4);
    assert_eq!(recs[0].value_of(regs::CLIP_BOTTOM_RIGHT), Some(regs::pack_xy(16, 8)));
    assert_eq!(
        recs[1],
        Record::StartDe {
            offset: 4,
            rects: vec![Rect::from_edges(1, 2, 5, 6)]
        }
    );
    assert_eq!(recs[2], Record::End { offset: 8 });
    assert_eq!(recs[3], Record::Nop { offset: 9 });
}

#[test]
fn truncated_record_is_an_error() {
    let words = [regs::load_state_header(regs::DEST_ADDRESS, 6), 0, 0];
    assert!(disassemble(&words).is_err());
}

#[test]
fn unknown_opcode_is_an_error() {
    assert!(disassemble(&[7 << 27]).is_err());
}

#[test]
fn listing_names_registers() {
    let words = [
        regs::load_state_header(regs::MULTI_SOURCE_CONFIG, 1),
        regs::encode_multi_source(3),
    ];
    let text = listing(&words).unwrap();
    assert!(text.contains("MULTI_SOURCE_CONFIG"));
    assert!(text.contains("3 sources"));
}
