use std::sync::Arc;

use crate::{
    db::snapshot::Snapshot,
    merge::MergeOperator,
    statistics::Statistics,
    util::{Slice, SliceTransform},
};

/// Default for `DBOptions::max_sequential_skip_in_iterations`.
pub const DEFAULT_MAX_SEQUENTIAL_SKIP_IN_ITERATIONS: u64 = 8;

#[derive(Clone)]
pub struct DBOptions {
    /// Folds merge operands into values. Reading a merge entry without one
    /// fails the cursor with `MergeOperatorMissing`.
    pub merge_operator: Option<Arc<dyn MergeOperator>>,
    /// Prefix used by `ReadOptions::prefix_same_as_start`.
    pub prefix_extractor: Option<Arc<dyn SliceTransform>>,
    /// Superseded versions of one key a cursor steps over before it reseeks.
    pub max_sequential_skip_in_iterations: u64,
    /// Active memtable size that triggers a switch to a fresh memtable.
    pub write_buffer_size: usize,
    pub statistics: Option<Arc<Statistics>>,
}

impl Default for DBOptions {
    fn default() -> Self {
        DBOptions {
            merge_operator: None,
            prefix_extractor: None,
            max_sequential_skip_in_iterations: DEFAULT_MAX_SEQUENTIAL_SKIP_IN_ITERATIONS,
            write_buffer_size: 4 * 1024 * 1024, // 4MB
            statistics: None,
        }
    }
}

#[derive(Clone, Default)]
pub struct ReadOptions {
    /// Read as of this snapshot; `None` reads the latest published sequence.
    pub snapshot: Option<Snapshot>,
    /// Exclusive upper bound on user keys exposed by the cursor.
    pub iterate_upper_bound: Option<Slice>,
    /// Stop once the key prefix differs from the prefix the cursor was
    /// positioned at. Needs `DBOptions::prefix_extractor`.
    pub prefix_same_as_start: bool,
    /// Keep substrate key buffers instead of copying them.
    pub pin_data: bool,
}
