pub mod db;
pub mod iterator;
pub mod memtable;
pub mod merge;
pub mod statistics;
pub mod util;

pub use db::{
    DB, DBIter, DBOptions, ReadOptions, SequenceNumber, Snapshot, ValueType, WriteBatch, WriteOp,
};
pub use iterator::{InternalIterator, Iterator};
pub use merge::{CounterMerge, MergeOperator, StringAppendMerge};
pub use statistics::{Statistics, StatisticsSnapshot};
pub use util::{Code, FixedPrefixTransform, Result, Slice, SliceTransform, Status};
