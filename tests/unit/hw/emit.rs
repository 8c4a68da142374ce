use super::*;
use crate::batch::Pools;
use crate::filter::generate_kernel;
use crate::format::FormatCode;
use crate::foundation::core::{BufferDesc, BufferId};
use crate::foundation::opts::ContextOpts;
use crate::geom::{SurfaceGeom, resolve_surface};
use crate::hw::disasm::{Record, disassemble};

fn pools() -> Pools {
    Pools::new(&ContextOpts {
        buffer_size: 512,
        ..ContextOpts::default()
    })
}

fn surface(format: FormatCode, addr: u64) -> ResolvedSurface {
    let geom = SurfaceGeom::new(32, 32, 128, format);
    resolve_surface(
        &BufferDesc::new(BufferId(1), addr, 128 * 64),
        &geom,
        Rect::new(0, 0, 32, 32),
    )
    .unwrap()
}

fn records(batch: &Batch) -> Vec<Record> {
    batch
        .buffers()
        .flat_map(|b| disassemble(b.words()).unwrap())
        .collect()
}

#[test]
fn load_state_pads_to_record_alignment() {
    assert_eq!(load_state_len(1), 8);
    assert_eq!(load_state_len(2), 16);
    assert_eq!(load_state_len(6), 32);
    assert_eq!(load_state_len(regs::SRC_REGS), 80);
}

#[test]
fn dest_record_has_one_fixup_on_address() {
    let p = pools();
    let mut batch = Batch::new();
    let s = surface(FormatCode::ARGB8888, 0x1010);
    emit_dest(
        &mut batch,
        &p,
        DestTarget {
            surface: &s,
            handle: DeviceHandle(5),
        },
        Command::Bitblt,
    )
    .unwrap();

    let fixups: Vec<_> = batch.fixups().collect();
    assert_eq!(fixups.len(), 1);
    assert_eq!(fixups[0].1.buffer_offset, 4);
    assert_eq!(fixups[0].1.surface_offset, -16);

    let recs = records(&batch);
    assert_eq!(recs[0].reg(), Some(regs::DEST_ADDRESS));
    let rot = RotationConfig::decode(recs[0].value_of(regs::DEST_ROTATION_CONFIG).unwrap());
    assert_eq!(rot.width, 36);
}

#[test]
fn planar_source_patches_every_plane() {
    let p = pools();
    let mut batch = Batch::new();
    let s = surface(FormatCode::I420, 0x2000);
    let layer = SourceLayer {
        surface: &s,
        handle: DeviceHandle(9),
        rect: s.rect,
        op: LayerOp::Rop(0xCC),
        multiply: ColorMultiply::default(),
    };
    emit_source(&mut batch, &p, 1, &layer).unwrap();

    let words: Vec<u32> = batch.fixups().map(|(_, f)| f.buffer_offset / 4).collect();
    assert_eq!(words, vec![1, 9, 11]);
    let recs = records(&batch);
    assert_eq!(recs[0].reg(), Some(regs::src_bank(1)));
    assert_eq!(
        recs[0].value_of(regs::src_bank(1) + regs::SRC_ROP),
        Some(0xCCCC)
    );
}

#[test]
fn blend_layer_enables_alpha() {
    let p = pools();
    let mut batch = Batch::new();
    let s = surface(FormatCode::ARGB8888, 0x2000);
    let cfg = crate::blend::resolve_blend(crate::blend::BlendSpec::new(
        crate::blend::BlendCode::SRC_OVER,
    ))
    .unwrap();
    let layer = SourceLayer {
        surface: &s,
        handle: DeviceHandle(9),
        rect: s.rect,
        op: LayerOp::Blend(cfg),
        multiply: ColorMultiply::default(),
    };
    emit_source(&mut batch, &p, 0, &layer).unwrap();
    let recs = records(&batch);
    assert_eq!(recs[0].value_of(regs::SRC_BANK_BASE + regs::SRC_ALPHA_CONTROL), Some(1));
    let modes = AlphaModes::decode(
        recs[0]
            .value_of(regs::SRC_BANK_BASE + regs::SRC_ALPHA_MODES)
            .unwrap(),
    );
    assert!(modes.src1_used && modes.src2_used);
}

#[test]
fn bank_out_of_range_is_rejected() {
    let p = pools();
    let mut batch = Batch::new();
    let s = surface(FormatCode::ARGB8888, 0x2000);
    let layer = SourceLayer {
        surface: &s,
        handle: DeviceHandle(1),
        rect: s.rect,
        op: LayerOp::Rop(0xCC),
        multiply: ColorMultiply::default(),
    };
    assert!(emit_source(&mut batch, &p, regs::SRC_BANKS, &layer).is_err());
}

#[test]
fn kernel_upload_is_chunked() {
    let p = pools();
    let mut batch = Batch::new();
    let k = generate_kernel(5, 0x4000_0000).unwrap();
    emit_kernel(&mut batch, &p, FilterType::Vertical, &k).unwrap();
    let recs = records(&batch);
    let regs_loaded: Vec<u16> = recs.iter().filter_map(Record::reg).collect();
    assert_eq!(
        regs_loaded,
        vec![
            regs::FILTER_KERNEL_V,
            regs::FILTER_KERNEL_V + 48,
            regs::FILTER_KERNEL_V + 96
        ]
    );
    let packed = pack_kernel(&k);
    assert_eq!(packed.len(), regs::KERNEL_WORDS);
    assert_eq!(regs::unpack_coeffs(packed[0]), (k.phase(0)[0], k.phase(0)[1]));
}

#[test]
fn start_de_encodes_edges() {
    let p = pools();
    let mut batch = Batch::new();
    emit_start_de(&mut batch, &p, &[Rect::new(4, 2, 10, 6)]).unwrap();
    emit_end(&mut batch, &p).unwrap();
    let recs = records(&batch);
    assert_eq!(
        recs[0],
        Record::StartDe {
            offset: 0,
            rects: vec![Rect::new(4, 2, 10, 6)]
        }
    );
    assert!(matches!(recs[1], Record::End { offset: 4 }));
}

#[test]
fn filter_origin_centres_first_sample() {
    // 2:1 downscale: first sample sits halfway between source pixels 0 and 1.
    assert_eq!(filter_origin(0, 0x2_0000), 0x8000);
    assert_eq!(filter_origin(0, 0x1_0000), 0);
    assert_eq!(filter_origin(3, 0x1_0000), 0x3_0000);
}
