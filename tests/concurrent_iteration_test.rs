//! Cursors running on many threads while writers keep adding versions.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use lsmiter::iterator::Iterator as _;
use lsmiter::{CounterMerge, DB, DBOptions, ReadOptions, Slice, WriteBatch};
use rayon::prelude::*;

const NUM_KEYS: usize = 32;

fn key(i: usize) -> Slice {
    Slice::from(format!("key{i:03}"))
}

/// Every batch adds one to every key, so any consistent snapshot shows the
/// same counter value for all keys.
fn increment_all(db: &DB) {
    let mut batch = WriteBatch::with_capacity(NUM_KEYS);
    for i in 0..NUM_KEYS {
        batch.merge(key(i), Slice::from("1"));
    }
    db.write(batch).unwrap();
}

#[test]
fn test_concurrent_scans_see_whole_batches() {
    let db = Arc::new(
        DB::open(DBOptions {
            merge_operator: Some(Arc::new(CounterMerge)),
            write_buffer_size: 16 * 1024,
            max_sequential_skip_in_iterations: 4,
            ..Default::default()
        })
        .unwrap(),
    );
    increment_all(&db);

    let stop = Arc::new(AtomicBool::new(false));
    let writer = {
        let db = Arc::clone(&db);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut batches = 1;
            while !stop.load(Ordering::Relaxed) && batches < 200 {
                increment_all(&db);
                batches += 1;
            }
        })
    };

    (0..64).into_par_iter().for_each(|round| {
        let mut iter = db.iter(&ReadOptions::default()).unwrap();
        let mut values = Vec::with_capacity(NUM_KEYS);
        if round % 2 == 0 {
            iter.seek_to_first().unwrap();
            while iter.valid() {
                values.push(iter.value().to_string());
                iter.next().unwrap();
            }
        } else {
            iter.seek_to_last().unwrap();
            while iter.valid() {
                values.push(iter.value().to_string());
                iter.prev().unwrap();
            }
        }
        iter.status().unwrap();

        assert_eq!(values.len(), NUM_KEYS);
        assert!(values.iter().all(|v| *v == values[0]), "torn batch: {values:?}");
    });

    stop.store(true, Ordering::Relaxed);
    writer.join().unwrap();
}

#[test]
fn test_parallel_snapshot_reads() {
    let db = DB::open(DBOptions::default()).unwrap();
    let mut snapshots = Vec::new();
    for version in 0..20 {
        for i in 0..NUM_KEYS {
            db.put(key(i), Slice::from(format!("v{version}"))).unwrap();
        }
        snapshots.push((version, db.snapshot()));
        if version % 5 == 4 {
            db.switch_memtable();
        }
    }

    snapshots.par_iter().for_each(|(version, snapshot)| {
        let read = ReadOptions {
            snapshot: Some(*snapshot),
            ..Default::default()
        };
        let mut iter = db.iter(&read).unwrap();
        let mut count = 0;
        iter.seek_to_first().unwrap();
        while iter.valid() {
            assert_eq!(iter.value().to_string(), format!("v{version}"));
            count += 1;
            iter.next().unwrap();
        }
        assert_eq!(count, NUM_KEYS);
    });
}
