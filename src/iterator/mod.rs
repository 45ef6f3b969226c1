//! Iterator module for lsmiter
//!
//! Two layers of iterators live here:
//!
//! - [`InternalIterator`]: the substrate. Walks *physical* entries keyed by
//!   internal key `(user_key, sequence, type)`, several per user key.
//! - [`Iterator`]: the user-facing cursor. Walks *logical* entries, one per
//!   visible user key, as of a snapshot. Implemented by [`crate::DBIter`].
//!
//! # Architecture
//!
//! ```text
//! DB::iter()
//!     ↓
//! DBIter                       (logical keys, snapshot, merge, bounds)
//!     ↓
//! MergingIterator              (physical entries, k-way merge)
//!     ├─→ MemTableIterator (active, newest)
//!     └─→ [MemTableIterator, ...] (frozen, oldest last)
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Physical order**: substrates yield entries by user key ascending,
//!    sequence descending (newest version of a key first)
//! 2. **Cheap handles**: `key()`/`value()` return [`Slice`] handles that share
//!    the substrate buffer instead of copying bytes
//! 3. **Bidirectional**: every substrate supports `prev()` and `seek_to_last()`
//! 4. **Corruption stays local**: substrates may carry keys that do not parse;
//!    the cursor skips them and records the error

use crate::util::{Result, Slice, Status};

/// Iterator trait for traversing logical key-value pairs in sorted order
///
/// # Lifecycle
///
/// An iterator starts in an invalid state. Call one of the seek methods
/// to position it:
///
/// ```ignore
/// let mut iter = db.iter(&ReadOptions::default())?;
/// iter.seek_to_first()?;  // Position at first key
/// while iter.valid() {
///     println!("{:?}: {:?}", iter.key(), iter.value());
///     iter.next()?;
/// }
/// iter.status()?;  // Distinguish end-of-data from an error
/// ```
///
/// # Error Handling
///
/// Positioning operations return `Err` when the iterator hit a fatal error
/// (e.g. a failing merge operator); it is then invalid and `status()` returns
/// the same error. Corrupted entries that were skipped do not fail the call
/// but are reported by `status()`.
pub trait Iterator {
    /// Position at the first key in the source
    ///
    /// Returns Ok(true) if positioned, Ok(false) if source is empty
    fn seek_to_first(&mut self) -> Result<bool>;

    /// Position at the last key in the source
    ///
    /// Returns Ok(true) if positioned, Ok(false) if source is empty
    fn seek_to_last(&mut self) -> Result<bool>;

    /// Position at the first key >= target
    ///
    /// If no such key exists, iterator becomes invalid.
    /// Returns Ok(true) if positioned, Ok(false) if not found
    fn seek(&mut self, target: &Slice) -> Result<bool>;

    /// Move to the next entry
    ///
    /// Prerequisite: valid() == true
    /// Returns Ok(true) if moved, Ok(false) if reached end
    fn next(&mut self) -> Result<bool>;

    /// Move to the previous entry
    ///
    /// Prerequisite: valid() == true
    /// Returns Ok(true) if moved, Ok(false) if reached beginning
    fn prev(&mut self) -> Result<bool>;

    /// Get current key
    ///
    /// Prerequisite: valid() == true
    fn key(&self) -> Slice;

    /// Get current value
    ///
    /// Prerequisite: valid() == true
    fn value(&self) -> Slice;

    /// Check if iterator is positioned at a valid entry
    ///
    /// Returns false if:
    /// - Iterator hasn't been positioned yet
    /// - Iterator has reached the end
    /// - An error occurred
    fn valid(&self) -> bool;

    /// `Ok(())` unless an error was observed since the last seek
    fn status(&self) -> Result<()>;
}

/// Sorted source of physical entries keyed by encoded internal key
///
/// Entries are ordered by [`crate::db::dbformat::compare_internal_keys`]. The
/// positioning methods never fail; a source that hits an error becomes
/// invalid and reports it from `status()`.
pub trait InternalIterator {
    fn valid(&self) -> bool;

    fn seek_to_first(&mut self);

    fn seek_to_last(&mut self);

    /// Position at the first entry whose internal key is >= `target`
    fn seek(&mut self, target: &Slice);

    /// Prerequisite: valid() == true
    fn next(&mut self);

    /// Prerequisite: valid() == true
    fn prev(&mut self);

    /// Encoded internal key of the current entry
    ///
    /// Prerequisite: valid() == true
    fn key(&self) -> Slice;

    /// Prerequisite: valid() == true
    fn value(&self) -> Slice;

    fn status(&self) -> Result<()>;

    /// Promise that key buffers handed out stay immutable while pinned, so
    /// callers may keep them instead of copying.
    fn pin_data(&mut self) -> Result<()> {
        Err(Status::not_supported("pinning not supported by this iterator"))
    }

    fn release_pinned_data(&mut self) -> Result<()> {
        Ok(())
    }

    /// True if the current key stays valid until `release_pinned_data`
    fn is_key_pinned(&self) -> bool {
        false
    }
}

mod memtable_iterator;
mod merging_iterator;
mod vec_iterator;

pub use memtable_iterator::MemTableIterator;
pub use merging_iterator::MergingIterator;
pub use vec_iterator::VecIterator;
