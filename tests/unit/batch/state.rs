use super::*;
use crate::foundation::opts::ContextOpts;

fn pools(buffer_size: usize, max_buffers: usize) -> Pools {
    Pools::new(&ContextOpts {
        buffer_size,
        max_buffers,
        fixup_chunk_len: 2,
        ..ContextOpts::default()
    })
}

#[test]
fn claim_rounds_to_record_alignment() {
    let p = pools(256, 4);
    let mut b = Batch::new();
    let c1 = b.claim(&p, 12).unwrap();
    let c2 = b.claim(&p, 8).unwrap();
    assert_eq!(c1, Claim { buffer: 0, offset: 0, len: 16 });
    assert_eq!(c2, Claim { buffer: 0, offset: 16, len: 8 });
    assert_eq!(b.claimed_bytes(), 24);
    assert_eq!(b.used_bytes(), 24);
}

#[test]
fn claim_never_straddles_buffers() {
    let p = pools(256, 4);
    let mut b = Batch::new();
    b.claim(&p, 200).unwrap();
    let c = b.claim(&p, 64).unwrap();
    assert_eq!(c.buffer, 1);
    assert_eq!(c.offset, 0);
    assert_eq!(b.buffer_count(), 2);
    assert_eq!(b.claimed_bytes(), 264);
}

#[test]
fn oversized_record_is_invalid_argument() {
    let p = pools(256, 4);
    let mut b = Batch::new();
    let err = b.claim(&p, 264).unwrap_err();
    assert_eq!(err.kind(), crate::BlitErrorKind::InvalidArgument);
}

#[test]
fn exhausted_buffer_pool_is_out_of_memory() {
    let p = pools(256, 1);
    let mut b = Batch::new();
    b.claim(&p, 256).unwrap();
    let err = b.claim(&p, 8).unwrap_err();
    assert_eq!(err.kind(), crate::BlitErrorKind::OutOfMemory);
}

#[test]
fn fixups_chain_in_chunks_and_patch() {
    let p = pools(256, 4);
    let mut b = Batch::new();
    let c = b.claim(&p, 16).unwrap();
    b.record_mut(&c).copy_from_slice(&[1, 0, 0, 0]);
    b.add_fixup(&p, &c, 1, DeviceHandle(7), 4).unwrap();
    b.add_fixup(&p, &c, 2, DeviceHandle(7), -4).unwrap();
    b.add_fixup(&p, &c, 3, DeviceHandle(9), 0).unwrap();
    assert_eq!(b.fixup_count(), 3);
    assert_eq!(b.fixup_chunk_count(), 2);

    b.patch_fixups(|h| Ok(if h == DeviceHandle(7) { 0x1000 } else { 0x2000 }))
        .unwrap();
    assert_eq!(b.snapshot(), vec![vec![1, 0x1004, 0x0ffc, 0x2000]]);
}

#[test]
fn fixup_outside_claim_is_rejected() {
    let p = pools(256, 4);
    let mut b = Batch::new();
    let c = b.claim(&p, 8).unwrap();
    assert!(b.add_fixup(&p, &c, 2, DeviceHandle(1), 0).is_err());
}

#[test]
fn negative_patched_address_is_mapping_error() {
    let p = pools(256, 4);
    let mut b = Batch::new();
    let c = b.claim(&p, 8).unwrap();
    b.add_fixup(&p, &c, 0, DeviceHandle(1), -64).unwrap();
    let err = b.patch_fixups(|_| Ok(0x20)).unwrap_err();
    assert_eq!(err.kind(), crate::BlitErrorKind::DeviceMapping);
}

#[test]
fn cache_regions_are_deduplicated() {
    let mut b = Batch::new();
    let r = CacheRegion {
        buffer: BufferId(1),
        virt_addr: 0,
        len: 64,
    };
    b.maintain_before(r, Direction::ToDevice);
    b.maintain_before(r, Direction::ToDevice);
    b.maintain_before(r, Direction::Bidirectional);
    b.maintain_after(r);
    b.maintain_after(r);
    assert_eq!(b.cache_before.len(), 2);
    assert_eq!(b.cache_after.len(), 1);
}
