use std::sync::Arc;

use lsmiter::iterator::Iterator as _;
use lsmiter::{
    CounterMerge, DB, DBOptions, MergeOperator, ReadOptions, Result, Slice, Status,
    StringAppendMerge,
};

fn get(db: &DB, key: &str) -> Option<String> {
    db.get(&ReadOptions::default(), &Slice::from(key))
        .unwrap()
        .map(|v| v.to_string())
}

#[test]
fn test_counter_merge_operator() {
    let options = DBOptions {
        merge_operator: Some(Arc::new(CounterMerge)),
        ..Default::default()
    };
    let db = DB::open(options).unwrap();

    db.put(Slice::from("counter"), Slice::from("10")).unwrap();
    for delta in ["5", "3", "-2"] {
        db.merge(Slice::from("counter"), Slice::from(delta)).unwrap();
    }

    assert_eq!(get(&db, "counter"), Some("16".to_string()));
}

#[test]
fn test_counter_merge_without_base() {
    let options = DBOptions {
        merge_operator: Some(Arc::new(CounterMerge)),
        ..Default::default()
    };
    let db = DB::open(options).unwrap();

    db.merge(Slice::from("fresh"), Slice::from("7")).unwrap();
    assert_eq!(get(&db, "fresh"), Some("7".to_string()));

    // Operands written after a delete start from nothing.
    db.put(Slice::from("reset"), Slice::from("100")).unwrap();
    db.delete(Slice::from("reset")).unwrap();
    db.merge(Slice::from("reset"), Slice::from("1")).unwrap();
    assert_eq!(get(&db, "reset"), Some("1".to_string()));
}

#[test]
fn test_string_append_merge_operator() {
    let options = DBOptions {
        merge_operator: Some(Arc::new(StringAppendMerge::new(","))),
        ..Default::default()
    };
    let db = DB::open(options).unwrap();

    db.put(Slice::from("log"), Slice::from("a")).unwrap();
    db.merge(Slice::from("log"), Slice::from("b")).unwrap();
    db.switch_memtable();
    db.merge(Slice::from("log"), Slice::from("c")).unwrap();
    db.merge(Slice::from("log"), Slice::from("d")).unwrap();

    assert_eq!(get(&db, "log"), Some("a,b,c,d".to_string()));

    let mut iter = db.iter(&ReadOptions::default()).unwrap();
    assert!(iter.seek_to_last().unwrap());
    assert_eq!(iter.value().to_string(), "a,b,c,d");
}

#[test]
fn test_merge_without_operator_fails_reads() {
    let db = DB::open(DBOptions::default()).unwrap();
    db.merge(Slice::from("k"), Slice::from("1")).unwrap();

    let err = db.get(&ReadOptions::default(), &Slice::from("k")).unwrap_err();
    assert!(err.is_merge_operator_missing());
}

/// Keeps the largest operand seen; rejects anything that is not a number.
struct MaxMerge;

impl MergeOperator for MaxMerge {
    fn name(&self) -> &str {
        "MaxMerge"
    }

    fn full_merge(&self, _key: &Slice, existing_value: Option<&Slice>, operands: &[Slice]) -> Result<Slice> {
        let parse = |s: &Slice| {
            s.to_string()
                .parse::<u64>()
                .map_err(|e| Status::invalid_argument(e.to_string()))
        };
        let mut max = existing_value.map(parse).transpose()?.unwrap_or(0);
        for operand in operands {
            max = max.max(parse(operand)?);
        }
        Ok(Slice::from(max.to_string()))
    }
}

#[test]
fn test_custom_merge_operator() {
    let options = DBOptions {
        merge_operator: Some(Arc::new(MaxMerge)),
        ..Default::default()
    };
    let db = DB::open(options).unwrap();

    db.merge(Slice::from("max"), Slice::from("3")).unwrap();
    db.merge(Slice::from("max"), Slice::from("9")).unwrap();
    db.merge(Slice::from("max"), Slice::from("4")).unwrap();
    assert_eq!(get(&db, "max"), Some("9".to_string()));

    db.merge(Slice::from("max"), Slice::from("nine")).unwrap();
    let err = db.get(&ReadOptions::default(), &Slice::from("max")).unwrap_err();
    assert!(err.is_merge_operator_failed());
    assert_eq!(db.statistics().snapshot().num_merge_failures, 1);
}
