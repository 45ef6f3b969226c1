use std::ops::Bound;
use std::sync::Arc;

use crossbeam_skiplist::SkipMap;
use crossbeam_skiplist::map::Entry;

use crate::{
    iterator::InternalIterator,
    memtable::MemTableKey,
    util::{Result, Slice},
};

/// Iterator for MemTable
///
/// Walks the skiplist in internal key order, exposing every physical entry
/// (values, tombstones and merge operands alike).
///
/// # Implementation Notes
///
/// The iterator does not borrow the skiplist. It remembers the current
/// `(key, value)` handles and repositions with `lower_bound`/`upper_bound`
/// relative to the current key, so concurrent inserts are picked up and
/// `prev()` is as cheap as `next()`.
///
/// Keys are reference-counted handles into the memtable, so they stay valid
/// for as long as the caller holds them: once pinned, the iterator reports
/// every key as pinned.
pub struct MemTableIterator {
    map: Arc<SkipMap<MemTableKey, Slice>>,
    current: Option<(MemTableKey, Slice)>,
    pinned: bool,
}

impl MemTableIterator {
    pub fn new(map: Arc<SkipMap<MemTableKey, Slice>>) -> Self {
        MemTableIterator {
            map,
            current: None,
            pinned: false,
        }
    }

    fn set_current(&mut self, entry: Option<Entry<'_, MemTableKey, Slice>>) {
        self.current = entry.map(|e| (e.key().clone(), e.value().clone()));
    }
}

impl InternalIterator for MemTableIterator {
    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn seek_to_first(&mut self) {
        let map = self.map.clone();
        self.set_current(map.front());
    }

    fn seek_to_last(&mut self) {
        let map = self.map.clone();
        self.set_current(map.back());
    }

    fn seek(&mut self, target: &Slice) {
        let map = self.map.clone();
        let target = MemTableKey::new(target.clone());
        self.set_current(map.lower_bound(Bound::Included(&target)));
    }

    fn next(&mut self) {
        debug_assert!(self.valid());
        let Some((key, _)) = self.current.take() else {
            return;
        };
        let map = self.map.clone();
        self.set_current(map.lower_bound(Bound::Excluded(&key)));
    }

    fn prev(&mut self) {
        debug_assert!(self.valid());
        let Some((key, _)) = self.current.take() else {
            return;
        };
        let map = self.map.clone();
        self.set_current(map.upper_bound(Bound::Excluded(&key)));
    }

    fn key(&self) -> Slice {
        self.current
            .as_ref()
            .map(|(k, _)| k.encoded().clone())
            .unwrap_or_else(Slice::empty)
    }

    fn value(&self) -> Slice {
        self.current
            .as_ref()
            .map(|(_, v)| v.clone())
            .unwrap_or_else(Slice::empty)
    }

    fn status(&self) -> Result<()> {
        Ok(())
    }

    fn pin_data(&mut self) -> Result<()> {
        self.pinned = true;
        Ok(())
    }

    fn release_pinned_data(&mut self) -> Result<()> {
        self.pinned = false;
        Ok(())
    }

    fn is_key_pinned(&self) -> bool {
        self.pinned && self.valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::dbformat::{InternalKey, MAX_SEQUENCE_NUMBER, VALUE_TYPE_FOR_SEEK, ValueType, parse_internal_key};
    use crate::memtable::MemTable;

    fn user_key(iter: &MemTableIterator) -> String {
        parse_internal_key(&iter.key()).unwrap().user_key.to_string()
    }

    fn seek_key(key: &str, seq: u64) -> Slice {
        InternalKey::new(Slice::from(key), seq, VALUE_TYPE_FOR_SEEK).encode()
    }

    #[test]
    fn test_memtable_iterator_basic() {
        let mem = MemTable::new();
        mem.add(1, ValueType::Value, &Slice::from("key1"), &Slice::from("value1"));
        mem.add(2, ValueType::Value, &Slice::from("key2"), &Slice::from("value2"));
        mem.add(3, ValueType::Value, &Slice::from("key3"), &Slice::from("value3"));

        let mut iter = mem.iter();
        assert!(!iter.valid());
        iter.seek_to_first();
        assert!(iter.valid());
        assert_eq!(user_key(&iter), "key1");
        assert_eq!(iter.value(), Slice::from("value1"));

        iter.next();
        assert_eq!(user_key(&iter), "key2");

        iter.next();
        assert_eq!(user_key(&iter), "key3");

        iter.next();
        assert!(!iter.valid());
    }

    #[test]
    fn test_memtable_iterator_backward() {
        let mem = MemTable::new();
        mem.add(1, ValueType::Value, &Slice::from("a"), &Slice::from("1"));
        mem.add(2, ValueType::Merge, &Slice::from("b"), &Slice::from("2"));
        mem.add(3, ValueType::Deletion, &Slice::from("c"), &Slice::empty());

        let mut iter = mem.iter();
        iter.seek_to_last();
        assert_eq!(user_key(&iter), "c");
        iter.prev();
        assert_eq!(user_key(&iter), "b");
        iter.next();
        assert_eq!(user_key(&iter), "c");
        iter.prev();
        iter.prev();
        assert_eq!(user_key(&iter), "a");
        iter.prev();
        assert!(!iter.valid());
    }

    #[test]
    fn test_memtable_iterator_seek_respects_sequence() {
        let mem = MemTable::new();
        mem.add(5, ValueType::Value, &Slice::from("k"), &Slice::from("v5"));
        mem.add(3, ValueType::Value, &Slice::from("k"), &Slice::from("v3"));
        mem.add(1, ValueType::Value, &Slice::from("m"), &Slice::from("m1"));

        let mut iter = mem.iter();

        iter.seek(&seek_key("k", MAX_SEQUENCE_NUMBER));
        assert_eq!(iter.value(), Slice::from("v5"));

        iter.seek(&seek_key("k", 4));
        assert_eq!(iter.value(), Slice::from("v3"));

        iter.seek(&seek_key("k", 2));
        assert_eq!(user_key(&iter), "m");

        iter.seek(&seek_key("z", MAX_SEQUENCE_NUMBER));
        assert!(!iter.valid());
    }

    #[test]
    fn test_memtable_iterator_pinning() {
        let mem = MemTable::new();
        mem.add(1, ValueType::Value, &Slice::from("a"), &Slice::from("1"));

        let mut iter = mem.iter();
        iter.seek_to_first();
        assert!(!iter.is_key_pinned());
        iter.pin_data().unwrap();
        assert!(iter.is_key_pinned());

        let held = iter.key();
        iter.next();
        assert_eq!(parse_internal_key(&held).unwrap().user_key, Slice::from("a"));

        iter.release_pinned_data().unwrap();
        iter.seek_to_first();
        assert!(!iter.is_key_pinned());
    }
}
