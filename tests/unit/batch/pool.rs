use super::*;

fn opts(max_batches: usize) -> ContextOpts {
    ContextOpts {
        buffer_size: 256,
        max_batches,
        ..ContextOpts::default()
    }
}

#[test]
fn fresh_pools_start_empty() {
    let pools = Pools::new(&opts(4));
    assert_eq!(pools.stats(), PoolStats::default());
    let list: FreeList<CommandBuffer> = FreeList::default();
    assert!(list.free.is_empty());
    assert_eq!((list.allocated, list.oom), (0, 0));
}

#[test]
fn freed_slot_is_reused_with_new_generation() {
    let pools = Pools::new(&opts(1));
    let h1 = pools.allocate_batch().unwrap();
    let batch = pools.checkout(h1).unwrap();
    pools.free_batch(h1, batch).unwrap();

    let h2 = pools.allocate_batch().unwrap();
    assert_eq!(h1.index(), h2.index());
    assert_ne!(h1, h2);
    let err = pools.checkout(h1).unwrap_err();
    assert_eq!(err.kind(), crate::BlitErrorKind::BatchState);
}

#[test]
fn arena_limit_is_out_of_memory() {
    let pools = Pools::new(&opts(2));
    pools.allocate_batch().unwrap();
    pools.allocate_batch().unwrap();
    let err = pools.allocate_batch().unwrap_err();
    assert_eq!(err.kind(), crate::BlitErrorKind::OutOfMemory);
    assert_eq!(pools.stats().out_of_memory, 1);
}

#[test]
fn checked_out_batch_is_busy() {
    let pools = Pools::new(&opts(2));
    let h = pools.allocate_batch().unwrap();
    let batch = pools.checkout(h).unwrap();
    assert!(pools.checkout(h).is_err());
    pools.park(h, batch).unwrap();
    assert!(pools.checkout(h).is_ok());
}

#[test]
fn park_requires_checkout() {
    let pools = Pools::new(&opts(2));
    let h = pools.allocate_batch().unwrap();
    let err = pools.park(h, Batch::new()).unwrap_err();
    assert_eq!(err.kind(), crate::BlitErrorKind::BatchState);
}

#[test]
fn free_returns_storage_to_pools() {
    let pools = Pools::new(&opts(2));
    let h = pools.allocate_batch().unwrap();
    let mut batch = pools.checkout(h).unwrap();
    batch.claim(&pools, 200).unwrap();
    let c = batch.claim(&pools, 200).unwrap();
    batch
        .add_fixup(&pools, &c, 0, crate::device::DeviceHandle(1), 0)
        .unwrap();
    pools.free_batch(h, batch).unwrap();

    let stats = pools.stats();
    assert_eq!(stats.buffers_allocated, 2);
    assert_eq!(stats.buffers_free, 2);
    assert_eq!(stats.fixup_chunks_allocated, 1);
    assert_eq!(stats.fixup_chunks_free, 1);
    assert_eq!(stats.batches_free, 1);
}

#[test]
fn recycled_buffers_start_clean() {
    let pools = Pools::new(&opts(2));
    let h = pools.allocate_batch().unwrap();
    let mut batch = pools.checkout(h).unwrap();
    let c = batch.claim(&pools, 8).unwrap();
    batch.record_mut(&c).copy_from_slice(&[0xdead, 0xbeef]);
    pools.free_batch(h, batch).unwrap();

    let h = pools.allocate_batch().unwrap();
    let mut batch = pools.checkout(h).unwrap();
    assert!(batch.is_empty());
    let c = batch.claim(&pools, 8).unwrap();
    assert_eq!(batch.record_mut(&c), &[0, 0]);
}
