use super::*;

#[test]
fn mapping_preserves_in_page_offset() {
    let sim = SimDevice::new();
    let h = sim
        .map(&BufferDesc::new(BufferId(1), 0x5000_0010, 4096))
        .unwrap();
    let addr = sim.resolve(h).unwrap();
    assert_eq!(addr % 0x1000, 0x10);
    assert_eq!(sim.address_of(BufferId(1)), Some(addr));

    sim.unmap(h);
    assert!(sim.resolve(h).is_err());
    assert_eq!(sim.live_mappings(), 0);
}

#[test]
fn mappings_do_not_overlap() {
    let sim = SimDevice::new();
    let a = sim.map(&BufferDesc::new(BufferId(1), 0, 0x2800)).unwrap();
    let b = sim.map(&BufferDesc::new(BufferId(2), 0, 16)).unwrap();
    assert!(sim.resolve(b).unwrap() >= sim.resolve(a).unwrap() + 0x2800);
}

#[test]
fn injected_failures() {
    let sim = SimDevice::new();
    sim.fail_map_for(BufferId(3));
    assert!(sim.map(&BufferDesc::new(BufferId(3), 0, 16)).is_err());

    sim.fail_submit(true);
    let s = Submission {
        buffers: vec![vec![0]],
        ops: vec![],
    };
    assert!(sim.submit(&s).is_err());
    assert!(sim.submissions().is_empty());
}

#[test]
fn scratch_buffers_get_distinct_ids() {
    let sim = SimDevice::new();
    let a = sim.allocate(100).unwrap();
    let b = sim.allocate(100).unwrap();
    assert_ne!(a.id, b.id);
    assert!(a.id.0 >= TEMP_ID_BASE);
    assert_eq!(a.length, 100);
    sim.release(&a);
    assert_eq!(
        sim.count(|e| matches!(e, SimEvent::Release { .. })),
        1
    );
}
