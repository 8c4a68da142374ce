use super::*;

#[test]
fn unscaled_kernel_is_identity() {
    let k = generate_kernel(1, ONE_1_31).unwrap();
    for p in 0..PHASES {
        assert_eq!(k.phase(p)[CENTER], 0x4000);
        assert_eq!(k.phase_sum(p), 0x4000);
    }
}

#[test]
fn every_phase_sums_to_one() {
    for size in KERNEL_SIZES {
        for scale in [ONE_1_31, 0x6000_0000, 0x4000_0000, 0x2000_0000, 0x0800_0000, 1] {
            let k = generate_kernel(size, scale).unwrap();
            for p in 0..PHASES {
                assert_eq!(k.phase_sum(p), 0x4000, "size={size} scale={scale:#x} p={p}");
            }
        }
    }
}

#[test]
fn taps_stay_inside_the_window() {
    let k = generate_kernel(3, ONE_1_31).unwrap();
    for p in 0..PHASES {
        let row = k.phase(p);
        assert_eq!(&row[..3], &[0, 0, 0]);
        assert_eq!(&row[6..], &[0, 0, 0]);
    }
}

#[test]
fn centre_phase_is_symmetric() {
    // Phase 16 samples exactly on the centre pixel.
    let k = generate_kernel(5, 0x4000_0000).unwrap();
    let row = k.phase(16);
    assert_eq!(row[3], row[5]);
    assert_eq!(row[2], row[6]);
    assert!(row[4] > row[3]);
}

#[test]
fn mirrored_phases_mirror_taps() {
    let k = generate_kernel(7, ONE_1_31).unwrap();
    for p in 1..PHASES {
        let a = k.phase(p);
        let b = k.phase(PHASES - p);
        // Rounding residuals may land on different taps; allow one unit.
        for t in 0..ROW_TAPS {
            let diff = i32::from(a[t]) - i32::from(b[ROW_TAPS - 1 - t]);
            assert!(diff.abs() <= 1, "p={p} t={t} {a:?} {b:?}");
        }
    }
}

#[test]
fn rejects_bad_sizes() {
    assert!(generate_kernel(4, ONE_1_31).is_err());
    assert!(generate_kernel(11, ONE_1_31).is_err());
    assert!(generate_kernel(3, 0).is_err());
}

#[test]
fn scale_above_one_is_clamped() {
    let k = generate_kernel(3, u32::MAX).unwrap();
    assert_eq!(k.scale(), ONE_1_31);
}
