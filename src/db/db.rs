use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use parking_lot::{Mutex, RwLock};

use crate::{
    db::{
        db_iter::{DBIter, new_db_iterator},
        dbformat::SequenceNumber,
        options::{DBOptions, ReadOptions},
        snapshot::Snapshot,
        write_batch::WriteBatch,
    },
    iterator::{InternalIterator, Iterator as _, MergingIterator},
    memtable::MemTable,
    statistics::Statistics,
    util::{Result, Slice},
};

/// Memtables a cursor reads from.
struct MemTables {
    /// Receives every write
    mem: Arc<MemTable>,
    /// Frozen memtables, newest first
    imm: Vec<Arc<MemTable>>,
    /// Bumped on every memtable switch
    version_number: u64,
}

/// In-memory multi-version store.
///
/// Every write gets a fresh sequence number and lands in the active memtable
/// as a new version; nothing is overwritten. Readers resolve versions through
/// a [`DBIter`] at a snapshot sequence, so a cursor never observes a partly
/// applied [`WriteBatch`].
pub struct DB {
    memtables: RwLock<MemTables>,
    /// Serializes writers and sequence assignment
    write_lock: Mutex<()>,
    /// Highest sequence number visible to readers
    last_sequence: AtomicU64,
    options: DBOptions,
    statistics: Arc<Statistics>,
}

impl DB {
    pub fn open(mut options: DBOptions) -> Result<Self> {
        let statistics = options
            .statistics
            .get_or_insert_with(|| Arc::new(Statistics::new()))
            .clone();

        Ok(DB {
            memtables: RwLock::new(MemTables {
                mem: Arc::new(MemTable::new()),
                imm: Vec::new(),
                version_number: 0,
            }),
            write_lock: Mutex::new(()),
            last_sequence: AtomicU64::new(0),
            options,
            statistics,
        })
    }

    #[inline]
    pub fn put(&self, key: Slice, value: Slice) -> Result<()> {
        let mut batch = WriteBatch::with_capacity(1);
        batch.put(key, value);
        self.write(batch)
    }

    #[inline]
    pub fn delete(&self, key: Slice) -> Result<()> {
        let mut batch = WriteBatch::with_capacity(1);
        batch.delete(key);
        self.write(batch)
    }

    #[inline]
    pub fn single_delete(&self, key: Slice) -> Result<()> {
        let mut batch = WriteBatch::with_capacity(1);
        batch.single_delete(key);
        self.write(batch)
    }

    #[inline]
    pub fn merge(&self, key: Slice, operand: Slice) -> Result<()> {
        let mut batch = WriteBatch::with_capacity(1);
        batch.merge(key, operand);
        self.write(batch)
    }

    /// Apply a write batch atomically
    ///
    /// Operations get consecutive sequence numbers in batch order. The last
    /// one is published only after the whole batch is in the memtable.
    pub fn write(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let _writer = self.write_lock.lock();
        let first = self.last_sequence.load(Ordering::Acquire) + 1;
        let last = first + batch.count() as u64 - 1;

        let should_switch = {
            let memtables = self.memtables.read();
            for (seq, op) in (first..=last).zip(batch.ops()) {
                let (value_type, value) = op.entry();
                memtables.mem.add(seq, value_type, op.key(), &value);
            }
            memtables.mem.approximate_memory_usage() >= self.options.write_buffer_size
        };

        self.last_sequence.store(last, Ordering::Release);

        if should_switch {
            self.switch_memtable();
        }
        Ok(())
    }

    /// Point lookup through a cursor, so merges and tombstones resolve the
    /// same way they do for scans.
    pub fn get(&self, options: &ReadOptions, key: &Slice) -> Result<Option<Slice>> {
        let mut iter = self.iter(options)?;
        if iter.seek(key)? && iter.key() == *key {
            return Ok(Some(iter.value()));
        }
        iter.status()?;
        Ok(None)
    }

    /// Create a snapshot at the latest published sequence number
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.latest_sequence_number())
    }

    pub fn latest_sequence_number(&self) -> SequenceNumber {
        self.last_sequence.load(Ordering::Acquire)
    }

    /// Create a cursor over the active and frozen memtables
    pub fn iter(&self, options: &ReadOptions) -> Result<DBIter> {
        let sequence = match &options.snapshot {
            Some(snapshot) => snapshot.sequence(),
            None => self.latest_sequence_number(),
        };

        let (children, version_number) = {
            let memtables = self.memtables.read();
            let mut children: Vec<Box<dyn InternalIterator>> = Vec::with_capacity(1 + memtables.imm.len());
            children.push(Box::new(memtables.mem.iter()));
            for imm in &memtables.imm {
                children.push(Box::new(imm.iter()));
            }
            (children, memtables.version_number)
        };

        new_db_iterator(
            Box::new(MergingIterator::new(children)),
            &self.options,
            options,
            sequence,
            version_number,
        )
    }

    /// Freeze the active memtable and start a fresh one
    pub fn switch_memtable(&self) {
        let mut memtables = self.memtables.write();
        if memtables.mem.is_empty() {
            return;
        }
        let frozen = std::mem::replace(&mut memtables.mem, Arc::new(MemTable::new()));
        log::debug!(
            "switch memtable: frozen {} entries, {} bytes",
            frozen.len(),
            frozen.approximate_memory_usage()
        );
        memtables.imm.insert(0, frozen);
        memtables.version_number += 1;
    }

    /// Number of frozen memtables
    pub fn num_immutable_memtables(&self) -> usize {
        self.memtables.read().imm.len()
    }

    pub fn statistics(&self) -> &Arc<Statistics> {
        &self.statistics
    }

    pub fn options(&self) -> &DBOptions {
        &self.options
    }
}
