use std::sync::Arc;

use lsmiter::iterator::Iterator as _;
use lsmiter::{CounterMerge, DB, DBOptions, ReadOptions, Slice, Statistics, StatisticsSnapshot};

fn scan(db: &DB) {
    let mut iter = db.iter(&ReadOptions::default()).unwrap();
    iter.seek_to_first().unwrap();
    while iter.valid() {
        iter.next().unwrap();
    }
}

#[test]
fn test_statistics_basic_tracking() {
    let db = DB::open(DBOptions::default()).unwrap();
    let stats = db.statistics();

    assert_eq!(stats.snapshot(), StatisticsSnapshot::default());

    db.put(Slice::from("key1"), Slice::from("value1")).unwrap();
    db.put(Slice::from("key2"), Slice::from("value2")).unwrap();
    scan(&db);

    let s = stats.snapshot();
    assert_eq!(s.num_seek, 1);
    assert_eq!(s.num_next, 2);
    assert_eq!(s.num_seek_found + s.num_next_found, 2);
    assert_eq!(s.iter_bytes_read, 2 * (4 + 6));
    assert_eq!(s.num_iterators, 0);

    let report = stats.report();
    assert!(report.contains("Iterator Statistics"));
    assert!(report.contains("Skip/Seek:"));
    assert!(report.contains("Merge:"));
}

#[test]
fn test_statistics_shared_through_options() {
    let stats = Arc::new(Statistics::new());
    let db = DB::open(DBOptions {
        merge_operator: Some(Arc::new(CounterMerge)),
        max_sequential_skip_in_iterations: 2,
        statistics: Some(stats.clone()),
        ..Default::default()
    })
    .unwrap();
    assert!(Arc::ptr_eq(db.statistics(), &stats));

    for _ in 0..10 {
        db.put(Slice::from("hot"), Slice::from("1")).unwrap();
    }
    db.put(Slice::from("next"), Slice::from("2")).unwrap();
    db.merge(Slice::from("next"), Slice::from("3")).unwrap();
    scan(&db);

    assert!(stats.num_reseeks() > 0);
    assert_eq!(stats.num_merge_operations(), 1);
    assert!(stats.snapshot().internal_key_skipped > 0);
}

#[test]
fn test_statistics_json_and_reset() {
    let db = DB::open(DBOptions::default()).unwrap();
    db.put(Slice::from("a"), Slice::from("1")).unwrap();
    scan(&db);

    let json = db.statistics().to_json().unwrap();
    let parsed: StatisticsSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, db.statistics().snapshot());

    let _live = db.iter(&ReadOptions::default()).unwrap();
    db.statistics().reset();
    let s = db.statistics().snapshot();
    assert_eq!(s.num_seek, 0);
    assert_eq!(s.iter_bytes_read, 0);
    assert_eq!(s.num_iterators, 1);
}
