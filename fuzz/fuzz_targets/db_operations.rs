#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use lsmiter::{CounterMerge, DB, DBOptions, Iterator, ReadOptions, Slice};

// Fuzz target for writes followed by cursor scans.
// A forward scan and a backward scan must see the same entries.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let opts = DBOptions {
        merge_operator: Some(Arc::new(CounterMerge)),
        max_sequential_skip_in_iterations: (data[0] % 4) as u64,
        write_buffer_size: 256,
        ..Default::default()
    };
    let Ok(db) = DB::open(opts) else {
        return;
    };

    let mut i = 1;
    while i + 1 < data.len() {
        let op_type = data[i] % 5;
        let key = Slice::from(vec![b'a' + data[i + 1] % 8]);
        i += 2;

        let _ = match op_type {
            0 => db.put(key, Slice::from((data[i - 1] as i64).to_string())),
            1 => db.delete(key),
            2 => db.single_delete(key),
            3 => db.merge(key, Slice::from("1")),
            _ => {
                db.switch_memtable();
                Ok(())
            },
        };
    }

    let Ok(mut iter) = db.iter(&ReadOptions::default()) else {
        return;
    };

    let mut forward = Vec::new();
    let mut ok = iter.seek_to_first();
    while let Ok(true) = ok {
        forward.push((iter.key(), iter.value()));
        ok = iter.next();
    }
    assert!(ok.is_ok());

    let mut backward = Vec::new();
    let mut ok = iter.seek_to_last();
    while let Ok(true) = ok {
        backward.push((iter.key(), iter.value()));
        ok = iter.prev();
    }
    assert!(ok.is_ok());

    backward.reverse();
    assert_eq!(forward, backward);
});
