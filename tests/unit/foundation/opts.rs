use super::*;

#[test]
fn defaults_validate() {
    let opts = ContextOpts::default();
    opts.validate().unwrap();
    assert_eq!(opts.buffer_size, 4096);
    assert_eq!(opts.filter_cache_depth, 5);
    assert!(opts.multi_source);
}

#[test]
fn partial_json_fills_defaults() {
    let opts = ContextOpts::from_json_str(r#"{ "max_buffers": 3, "multi_source": false }"#).unwrap();
    assert_eq!(opts.max_buffers, 3);
    assert!(!opts.multi_source);
    assert_eq!(opts.buffer_size, ContextOpts::default().buffer_size);
}

#[test]
fn rejects_inconsistent_values() {
    let bad = [
        ContextOpts {
            buffer_size: 1001,
            ..ContextOpts::default()
        },
        ContextOpts {
            buffer_size: 64,
            ..ContextOpts::default()
        },
        ContextOpts {
            fixup_chunk_len: 0,
            ..ContextOpts::default()
        },
        ContextOpts {
            filter_cache_depth: 0,
            ..ContextOpts::default()
        },
        ContextOpts {
            temp_alignment: 48,
            ..ContextOpts::default()
        },
    ];
    for opts in bad {
        assert!(opts.validate().is_err(), "{opts:?}");
    }
}

#[test]
fn malformed_json_is_invalid_argument() {
    let err = ContextOpts::from_json_str("{ nope").unwrap_err();
    assert_eq!(
        err.kind(),
        crate::foundation::error::BlitErrorKind::InvalidArgument
    );
}
