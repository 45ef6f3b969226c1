pub mod db;
pub mod db_iter;
pub mod dbformat;
pub mod options;
pub mod snapshot;
pub mod write_batch;

pub use db::DB;
pub use db_iter::{DBIter, PROPERTY_IS_KEY_PINNED, PROPERTY_SUPER_VERSION_NUMBER, new_db_iterator};
pub use dbformat::{InternalKey, MAX_SEQUENCE_NUMBER, ParsedInternalKey, SequenceNumber, ValueType};
pub use options::{DBOptions, DEFAULT_MAX_SEQUENTIAL_SKIP_IN_ITERATIONS, ReadOptions};
pub use snapshot::Snapshot;
pub use write_batch::{WriteBatch, WriteOp};
