use crate::{db::dbformat::ValueType, util::Slice};

/// Write operation type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Put { key: Slice, value: Slice },
    Delete { key: Slice },
    SingleDelete { key: Slice },
    Merge { key: Slice, operand: Slice },
}

impl WriteOp {
    pub fn key(&self) -> &Slice {
        match self {
            WriteOp::Put { key, .. }
            | WriteOp::Delete { key }
            | WriteOp::SingleDelete { key }
            | WriteOp::Merge { key, .. } => key,
        }
    }

    /// Entry kind and payload this operation stores in the memtable
    pub fn entry(&self) -> (ValueType, Slice) {
        match self {
            WriteOp::Put { value, .. } => (ValueType::Value, value.clone()),
            WriteOp::Delete { .. } => (ValueType::Deletion, Slice::empty()),
            WriteOp::SingleDelete { .. } => (ValueType::SingleDeletion, Slice::empty()),
            WriteOp::Merge { operand, .. } => (ValueType::Merge, operand.clone()),
        }
    }
}

/// WriteBatch accumulates multiple write operations for atomic execution
///
/// Operations get consecutive sequence numbers in insertion order, and no
/// reader observes part of a batch.
pub struct WriteBatch {
    /// Operations in insertion order
    ops: Vec<WriteOp>,
    /// Approximate memory usage in bytes
    data_size: usize,
}

impl WriteBatch {
    /// Create a new empty WriteBatch
    #[inline]
    pub fn new() -> Self {
        WriteBatch {
            ops: Vec::new(),
            data_size: 0,
        }
    }

    /// Create WriteBatch with reserved capacity
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        WriteBatch {
            ops: Vec::with_capacity(capacity),
            data_size: 0,
        }
    }

    /// Add a Put operation to the batch
    pub fn put(&mut self, key: Slice, value: Slice) {
        self.data_size += key.size() + value.size();
        self.ops.push(WriteOp::Put { key, value });
    }

    /// Add a Delete operation to the batch
    pub fn delete(&mut self, key: Slice) {
        self.data_size += key.size();
        self.ops.push(WriteOp::Delete { key });
    }

    /// Add a SingleDelete operation to the batch
    ///
    /// Reads treat it exactly like `delete`.
    pub fn single_delete(&mut self, key: Slice) {
        self.data_size += key.size();
        self.ops.push(WriteOp::SingleDelete { key });
    }

    /// Add a Merge operand to the batch
    pub fn merge(&mut self, key: Slice, operand: Slice) {
        self.data_size += key.size() + operand.size();
        self.ops.push(WriteOp::Merge { key, operand });
    }

    /// Get all operations
    #[inline]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Number of operations in the batch
    #[inline]
    pub fn count(&self) -> usize {
        self.ops.len()
    }

    /// Clear all operations
    pub fn clear(&mut self) {
        self.ops.clear();
        self.data_size = 0;
    }

    /// Approximate memory usage in bytes
    #[inline]
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Check if batch is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl Default for WriteBatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_batch_basic() {
        let mut batch = WriteBatch::new();

        batch.put(Slice::from("key1"), Slice::from("value1"));
        batch.merge(Slice::from("key2"), Slice::from("+1"));
        batch.delete(Slice::from("key3"));
        batch.single_delete(Slice::from("key4"));

        assert_eq!(batch.count(), 4);
        assert_eq!(batch.data_size(), 4 + 6 + 4 + 2 + 4 + 4);
    }

    #[test]
    fn test_write_batch_entries() {
        let mut batch = WriteBatch::with_capacity(2);
        batch.merge(Slice::from("k"), Slice::from("+1"));
        batch.single_delete(Slice::from("k"));

        let ops = batch.ops();
        assert_eq!(ops[0].key(), &Slice::from("k"));
        assert_eq!(ops[0].entry(), (ValueType::Merge, Slice::from("+1")));
        assert_eq!(ops[1].entry(), (ValueType::SingleDeletion, Slice::empty()));
    }

    #[test]
    fn test_write_batch_clear() {
        let mut batch = WriteBatch::new();

        batch.put(Slice::from("key1"), Slice::from("value1"));
        assert_eq!(batch.count(), 1);

        batch.clear();
        assert!(batch.is_empty());
        assert_eq!(batch.data_size(), 0);
    }
}
