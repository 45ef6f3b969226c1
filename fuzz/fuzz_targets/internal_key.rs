#![no_main]

use libfuzzer_sys::fuzz_target;
use lsmiter::db::dbformat::{InternalKey, ValueType, compare_internal_keys, parse_internal_key};
use lsmiter::util::Slice;

// Fuzz target for internal key parsing and ordering.
// Arbitrary bytes must either parse or fail with Corruption, never panic.
fuzz_target!(|data: &[u8]| {
    if data.len() > 65535 {
        return;
    }

    let raw = Slice::from(data);
    if let Err(status) = parse_internal_key(&raw) {
        assert!(status.is_corruption(), "unexpected status: {status:?}");
    }

    let user_key = Slice::from(data);
    let sequences = [0u64, 1, 42, (1 << 56) - 1];
    let value_types = [
        ValueType::Deletion,
        ValueType::Value,
        ValueType::Merge,
        ValueType::SingleDeletion,
    ];

    for &seq in &sequences {
        for &vtype in &value_types {
            let encoded = InternalKey::new(user_key.clone(), seq, vtype).encode();
            let parsed = parse_internal_key(&encoded)
                .unwrap_or_else(|e| panic!("failed to parse {data:?} seq {seq}: {e}"));
            assert_eq!(parsed.user_key, user_key);
            assert_eq!(parsed.sequence, seq);
            assert_eq!(parsed.value_type, vtype);
        }
    }

    // Newer versions of the same user key sort first.
    let newer = InternalKey::new(user_key.clone(), 100, ValueType::Value).encode();
    let older = InternalKey::new(user_key.clone(), 99, ValueType::Value).encode();
    assert!(compare_internal_keys(newer.data(), older.data()).is_lt());

    if data.len() > 1 {
        let shorter = InternalKey::new(Slice::from(&data[..1]), 0, ValueType::Value).encode();
        let longer = InternalKey::new(user_key, (1 << 56) - 1, ValueType::Value).encode();
        assert!(compare_internal_keys(shorter.data(), longer.data()).is_lt());
    }
});
