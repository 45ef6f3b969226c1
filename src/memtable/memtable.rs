use std::cmp::Ordering;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use crossbeam_skiplist::SkipMap;

use crate::db::dbformat::{InternalKey, SequenceNumber, ValueType, compare_internal_keys};
use crate::iterator::MemTableIterator;
use crate::util::Slice;

/// Encoded internal key ordered by `compare_internal_keys`.
#[derive(Clone, Debug)]
pub struct MemTableKey(Slice);

impl MemTableKey {
    pub fn new(encoded: Slice) -> Self {
        MemTableKey(encoded)
    }

    pub fn encoded(&self) -> &Slice {
        &self.0
    }
}

impl PartialEq for MemTableKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MemTableKey {}

impl PartialOrd for MemTableKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MemTableKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_internal_keys(self.0.data(), other.0.data())
    }
}

/// In-memory write buffer holding every version of every key.
///
/// Nothing is overwritten in place: each write adds a new internal key, and
/// readers reconcile versions through [`crate::DBIter`].
pub struct MemTable {
    table: Arc<SkipMap<MemTableKey, Slice>>,
    approximate_memory: AtomicUsize,
}

impl MemTable {
    pub fn new() -> Self {
        MemTable {
            table: Arc::new(SkipMap::new()),
            approximate_memory: AtomicUsize::new(0),
        }
    }

    pub fn add(&self, sequence: SequenceNumber, value_type: ValueType, key: &Slice, value: &Slice) {
        let encoded_key = InternalKey::new(key.clone(), sequence, value_type).encode();
        self.add_encoded(encoded_key, value.clone());
    }

    /// Insert an already-encoded internal key.
    pub fn add_encoded(&self, encoded_key: Slice, value: Slice) {
        let mem_usage = encoded_key.size() + value.size();
        self.approximate_memory
            .fetch_add(mem_usage, AtomicOrdering::Relaxed);

        self.table.insert(MemTableKey::new(encoded_key), value);
    }

    pub fn iter(&self) -> MemTableIterator {
        MemTableIterator::new(self.table.clone())
    }

    pub fn approximate_memory_usage(&self) -> usize {
        self.approximate_memory.load(AtomicOrdering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for MemTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::dbformat::parse_internal_key;
    use crate::iterator::InternalIterator;

    #[test]
    fn test_memtable_orders_versions_newest_first() {
        let memtable = MemTable::new();

        memtable.add(1, ValueType::Value, &Slice::from("key1"), &Slice::from("v1"));
        memtable.add(3, ValueType::Value, &Slice::from("key1"), &Slice::from("v3"));
        memtable.add(2, ValueType::Deletion, &Slice::from("key1"), &Slice::empty());
        memtable.add(1, ValueType::Value, &Slice::from("key0"), &Slice::from("v0"));
        assert_eq!(memtable.len(), 4);

        let mut iter = memtable.iter();
        iter.seek_to_first();
        let mut seen = Vec::new();
        while iter.valid() {
            let ikey = parse_internal_key(&iter.key()).unwrap();
            seen.push((ikey.user_key.to_string(), ikey.sequence, ikey.value_type));
            iter.next();
        }

        assert_eq!(
            seen,
            vec![
                ("key0".to_string(), 1, ValueType::Value),
                ("key1".to_string(), 3, ValueType::Value),
                ("key1".to_string(), 2, ValueType::Deletion),
                ("key1".to_string(), 1, ValueType::Value),
            ]
        );
    }

    #[test]
    fn test_memtable_memory_usage() {
        let memtable = MemTable::new();
        assert!(memtable.is_empty());
        assert_eq!(memtable.approximate_memory_usage(), 0);

        memtable.add(1, ValueType::Value, &Slice::from("key1"), &Slice::from("value1"));
        assert_eq!(memtable.approximate_memory_usage(), "key1".len() + 8 + "value1".len());
    }
}
