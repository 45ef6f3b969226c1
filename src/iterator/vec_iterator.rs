use crate::{
    db::dbformat::{InternalKey, SequenceNumber, ValueType, compare_internal_keys},
    iterator::InternalIterator,
    util::{Result, Slice},
};

/// Internal iterator over an immutable, sorted vector of encoded entries
///
/// Entries are sorted once at construction with `compare_internal_keys`.
/// Because raw keys are accepted as-is, a `VecIterator` can carry keys that
/// do not parse, which is how corruption handling is exercised.
pub struct VecIterator {
    entries: Vec<(Slice, Slice)>,
    pos: Option<usize>,
    pinned: bool,
}

impl VecIterator {
    pub fn new(mut entries: Vec<(Slice, Slice)>) -> Self {
        entries.sort_by(|a, b| compare_internal_keys(a.0.data(), b.0.data()));
        VecIterator {
            entries,
            pos: None,
            pinned: false,
        }
    }

    pub fn builder() -> VecIteratorBuilder {
        VecIteratorBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects `(user_key, sequence, type, value)` entries for a [`VecIterator`].
#[derive(Default)]
pub struct VecIteratorBuilder {
    entries: Vec<(Slice, Slice)>,
}

impl VecIteratorBuilder {
    pub fn add(
        mut self,
        user_key: impl Into<Slice>,
        sequence: SequenceNumber,
        value_type: ValueType,
        value: impl Into<Slice>,
    ) -> Self {
        let key = InternalKey::new(user_key.into(), sequence, value_type).encode();
        self.entries.push((key, value.into()));
        self
    }

    pub fn put(self, user_key: &str, sequence: SequenceNumber, value: &str) -> Self {
        self.add(user_key, sequence, ValueType::Value, value)
    }

    pub fn delete(self, user_key: &str, sequence: SequenceNumber) -> Self {
        self.add(user_key, sequence, ValueType::Deletion, Slice::empty())
    }

    pub fn single_delete(self, user_key: &str, sequence: SequenceNumber) -> Self {
        self.add(user_key, sequence, ValueType::SingleDeletion, Slice::empty())
    }

    pub fn merge(self, user_key: &str, sequence: SequenceNumber, operand: &str) -> Self {
        self.add(user_key, sequence, ValueType::Merge, operand)
    }

    /// Add an entry whose raw key is stored verbatim.
    pub fn add_raw(mut self, raw_key: impl Into<Slice>, value: impl Into<Slice>) -> Self {
        self.entries.push((raw_key.into(), value.into()));
        self
    }

    pub fn build(self) -> VecIterator {
        VecIterator::new(self.entries)
    }
}

impl InternalIterator for VecIterator {
    fn valid(&self) -> bool {
        self.pos.is_some()
    }

    fn seek_to_first(&mut self) {
        self.pos = if self.entries.is_empty() { None } else { Some(0) };
    }

    fn seek_to_last(&mut self) {
        self.pos = self.entries.len().checked_sub(1);
    }

    fn seek(&mut self, target: &Slice) {
        let idx = self
            .entries
            .partition_point(|(k, _)| compare_internal_keys(k.data(), target.data()).is_lt());
        self.pos = (idx < self.entries.len()).then_some(idx);
    }

    fn next(&mut self) {
        debug_assert!(self.valid());
        self.pos = self
            .pos
            .map(|p| p + 1)
            .filter(|&p| p < self.entries.len());
    }

    fn prev(&mut self) {
        debug_assert!(self.valid());
        self.pos = self.pos.and_then(|p| p.checked_sub(1));
    }

    fn key(&self) -> Slice {
        self.pos
            .map(|p| self.entries[p].0.clone())
            .unwrap_or_else(Slice::empty)
    }

    fn value(&self) -> Slice {
        self.pos
            .map(|p| self.entries[p].1.clone())
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
    use crate::db::dbformat::{MAX_SEQUENCE_NUMBER, VALUE_TYPE_FOR_SEEK, parse_internal_key};

    #[test]
    fn test_vec_iterator_sorts_and_walks_both_ways() {
        let mut iter = VecIterator::builder()
            .put("b", 1, "b1")
            .put("a", 1, "a1")
            .put("a", 2, "a2")
            .build();
        assert_eq!(iter.len(), 3);

        iter.seek_to_first();
        assert_eq!(iter.value(), Slice::from("a2"));
        iter.next();
        assert_eq!(iter.value(), Slice::from("a1"));
        iter.next();
        assert_eq!(iter.value(), Slice::from("b1"));
        iter.next();
        assert!(!iter.valid());

        iter.seek_to_last();
        assert_eq!(iter.value(), Slice::from("b1"));
        iter.prev();
        iter.prev();
        assert_eq!(iter.value(), Slice::from("a2"));
        iter.prev();
        assert!(!iter.valid());
    }

    #[test]
    fn test_vec_iterator_seek() {
        let mut iter = VecIterator::builder()
            .put("a", 5, "a5")
            .put("a", 3, "a3")
            .put("c", 1, "c1")
            .build();

        iter.seek(&InternalKey::new(Slice::from("a"), 4, VALUE_TYPE_FOR_SEEK).encode());
        assert_eq!(iter.value(), Slice::from("a3"));

        iter.seek(&InternalKey::new(Slice::from("b"), MAX_SEQUENCE_NUMBER, VALUE_TYPE_FOR_SEEK).encode());
        assert_eq!(iter.value(), Slice::from("c1"));

        iter.seek(&InternalKey::new(Slice::from("d"), MAX_SEQUENCE_NUMBER, VALUE_TYPE_FOR_SEEK).encode());
        assert!(!iter.valid());
    }

    #[test]
    fn test_vec_iterator_keeps_corrupted_keys() {
        let mut raw = b"a".to_vec();
        raw.extend_from_slice(&((4u64 << 8) | 0x55).to_le_bytes());

        let mut iter = VecIterator::builder()
            .put("a", 5, "a5")
            .put("a", 3, "a3")
            .add_raw(raw, "junk")
            .build();

        iter.seek_to_first();
        iter.next();
        assert!(parse_internal_key(&iter.key()).unwrap_err().is_corruption());
        assert_eq!(iter.value(), Slice::from("junk"));
    }
}
