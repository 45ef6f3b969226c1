//! User-facing cursor over a multi-version substrate.
//!
//! The substrate ([`InternalIterator`]) yields every physical entry
//! `(user_key, sequence, type) => value`, newest version of a key first.
//! [`DBIter`] folds those into one logical entry per visible user key as of
//! a snapshot sequence: it hides entries newer than the snapshot, drops keys
//! whose newest visible entry is a tombstone, and runs the merge operator
//! over merge operands.
//!
//! The position of the substrate depends on the direction of travel:
//!
//! - **Forward**: the substrate sits on the entry that produced `key()` (or,
//!   for a merged entry, on the first entry past the operands it consumed).
//! - **Reverse**: the substrate sits just before every entry whose user key
//!   equals `key()`, and the value is always materialized in `saved_value`.
//!
//! Long runs of superseded versions of one key are not walked one by one:
//! after `max_sequential_skip_in_iterations` steps the cursor seeks straight
//! past them.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    db::dbformat::{
        InternalKey, MAX_SEQUENCE_NUMBER, ParsedInternalKey, SequenceNumber, VALUE_TYPE_FOR_SEEK,
        ValueType, parse_internal_key,
    },
    db::options::{DBOptions, ReadOptions},
    iterator::{InternalIterator, Iterator},
    merge::MergeOperator,
    statistics::Statistics,
    util::{Result, Slice, SliceTransform, Status},
};

pub const PROPERTY_SUPER_VERSION_NUMBER: &str = "lsmiter.iterator.super-version-number";
pub const PROPERTY_IS_KEY_PINNED: &str = "lsmiter.iterator.is-key-pinned";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

/// User key of the current logical entry.
///
/// Holds a handle into the substrate's buffer when the substrate pins its
/// keys, and a private copy otherwise.
#[derive(Default)]
struct IterKey {
    key: Slice,
    pinned: bool,
}

impl IterKey {
    fn set_key(&mut self, key: &Slice, copy: bool) {
        self.key = if copy { key.deep_copy() } else { key.clone() };
        self.pinned = !copy;
    }

    fn clear(&mut self) {
        self.key = Slice::empty();
        self.pinned = false;
    }

    fn get(&self) -> &Slice {
        &self.key
    }

    fn is_key_pinned(&self) -> bool {
        self.pinned
    }
}

/// Create a cursor over `internal_iter` reading at `sequence`.
pub fn new_db_iterator(
    internal_iter: Box<dyn InternalIterator>,
    options: &DBOptions,
    read_options: &ReadOptions,
    sequence: SequenceNumber,
    version_number: u64,
) -> Result<DBIter> {
    let mut iter = DBIter::new(internal_iter, options, read_options, sequence, version_number);
    if read_options.pin_data {
        iter.pin_data()?;
    }
    Ok(iter)
}

/// Cursor exposing one logical entry per visible user key.
///
/// Single-threaded: each scan owns its cursor and its substrate iterator.
/// Concurrent scans are isolated by their snapshot sequence, not by locks.
pub struct DBIter {
    iter: Box<dyn InternalIterator>,
    sequence: SequenceNumber,
    merge_operator: Option<Arc<dyn MergeOperator>>,
    prefix_extractor: Option<Arc<dyn SliceTransform>>,
    statistics: Option<Arc<Statistics>>,

    status: Status,
    saved_key: IterKey,
    saved_value: Slice,
    direction: Direction,
    valid: bool,
    current_entry_is_merged: bool,
    max_skip: u64,
    version_number: u64,
    iterate_upper_bound: Option<Slice>,
    prefix_same_as_start: bool,
    prefix_start: Option<Slice>,
    pinned: bool,
    // Operands for the key being resolved backward, newest first.
    merge_operands: VecDeque<Slice>,
}

impl DBIter {
    pub fn new(
        iter: Box<dyn InternalIterator>,
        options: &DBOptions,
        read_options: &ReadOptions,
        sequence: SequenceNumber,
        version_number: u64,
    ) -> Self {
        if let Some(stats) = &options.statistics {
            stats.record_iterator_created();
        }
        DBIter {
            iter,
            sequence: sequence.min(MAX_SEQUENCE_NUMBER),
            merge_operator: options.merge_operator.clone(),
            prefix_extractor: options.prefix_extractor.clone(),
            statistics: options.statistics.clone(),
            status: Status::ok(),
            saved_key: IterKey::default(),
            saved_value: Slice::empty(),
            direction: Direction::Forward,
            valid: false,
            current_entry_is_merged: false,
            max_skip: options.max_sequential_skip_in_iterations,
            version_number,
            iterate_upper_bound: read_options.iterate_upper_bound.clone(),
            prefix_same_as_start: read_options.prefix_same_as_start,
            prefix_start: None,
            pinned: false,
            merge_operands: VecDeque::new(),
        }
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    pub fn pin_data(&mut self) -> Result<()> {
        self.iter.pin_data()?;
        self.pinned = true;
        Ok(())
    }

    pub fn release_pinned_data(&mut self) -> Result<()> {
        self.iter.release_pinned_data()?;
        self.pinned = false;
        Ok(())
    }

    pub fn property(&self, name: &str) -> Result<String> {
        match name {
            PROPERTY_SUPER_VERSION_NUMBER => Ok(self.version_number.to_string()),
            PROPERTY_IS_KEY_PINNED => {
                if !self.valid {
                    return Ok("Iterator is not valid.".to_string());
                }
                let pinned = self.pinned && self.saved_key.is_key_pinned();
                Ok(if pinned { "1" } else { "0" }.to_string())
            },
            _ => Err(Status::invalid_argument(format!(
                "unidentified property: {name}"
            ))),
        }
    }

    pub fn upper_bound(&self) -> Option<&Slice> {
        self.iterate_upper_bound.as_ref()
    }

    /// Replace the upper bound. Takes effect on the next positioning call.
    pub fn set_upper_bound(&mut self, upper_bound: Option<Slice>) {
        self.iterate_upper_bound = upper_bound;
    }

    /// Resume a forward scan that stopped at the old upper bound.
    ///
    /// The substrate still sits on the first entry at or past the old bound,
    /// so the scan continues from there without a seek.
    pub fn revalidate_after_upper_bound_change(&mut self) -> Result<bool> {
        if self.iter.valid() && self.direction == Direction::Forward {
            self.valid = true;
            let result = self.find_next_user_entry(false);
            return self.finish(result);
        }
        Ok(self.valid)
    }

    #[inline]
    fn record(&self, f: impl FnOnce(&Statistics)) {
        if let Some(stats) = &self.statistics {
            f(stats);
        }
    }

    fn record_found(&self, f: impl FnOnce(&Statistics, u64)) {
        if self.valid {
            let bytes = (self.key().size() + self.value().size()) as u64;
            self.record(|s| f(s, bytes));
        }
    }

    /// Convert the outcome of an internal step into the cursor contract.
    fn finish(&mut self, result: Result<()>) -> Result<bool> {
        match result {
            Ok(()) => {
                if !self.valid {
                    self.iter.status()?;
                }
                Ok(self.valid)
            },
            Err(status) => {
                self.valid = false;
                self.status = status.clone();
                Err(status)
            },
        }
    }

    fn clear_saved_value(&mut self) {
        self.saved_value = Slice::empty();
    }

    fn save_key(&mut self, user_key: &Slice) {
        let copy = !self.iter.is_key_pinned();
        self.saved_key.set_key(user_key, copy);
    }

    fn prefix_of(&self, key: &Slice) -> Option<Slice> {
        if !self.prefix_same_as_start {
            return None;
        }
        self.prefix_extractor.as_ref().map(|p| p.transform(key))
    }

    fn check_prefix(&mut self) {
        if !self.valid {
            return;
        }
        if let Some(start) = &self.prefix_start {
            if self.prefix_of(self.saved_key.get()).as_ref() != Some(start) {
                self.valid = false;
            }
        }
    }

    /// Parse the substrate's current key, recording corruption.
    fn parse_key(&mut self) -> Option<ParsedInternalKey> {
        let key = self.iter.key();
        match parse_internal_key(&key) {
            Ok(ikey) => Some(ikey),
            Err(err) => {
                log::error!("corrupted internal key in DBIter: {key:?}: {err}");
                self.record(|s| s.record_corrupted_key());
                self.status = Status::corruption("corrupted internal key in DBIter");
                None
            },
        }
    }

    /// Step over unparseable entries in `direction`.
    ///
    /// Returns the parsed current entry, or `None` once the substrate is
    /// exhausted.
    fn find_parseable_key(&mut self, direction: Direction) -> Option<ParsedInternalKey> {
        while self.iter.valid() {
            if let Some(ikey) = self.parse_key() {
                return Some(ikey);
            }
            match direction {
                Direction::Forward => self.iter.next(),
                Direction::Reverse => self.iter.prev(),
            }
        }
        None
    }

    fn reseek(&mut self, target: &Slice) {
        log::trace!("reseek in DBIter to {target:?}");
        self.iter.seek(target);
        self.record(|s| s.record_reseek());
    }

    fn full_merge(&self, existing_value: Option<&Slice>, operands: &[Slice]) -> Result<Slice> {
        let merge_operator = self.require_merge_operator()?;
        let start = Instant::now();
        let result = merge_operator.full_merge(self.saved_key.get(), existing_value, operands);
        self.record(|s| s.record_merge(start.elapsed().as_nanos() as u64));

        result.map_err(|err| {
            log::warn!(
                "merge operator {} failed on key {:?}: {err}",
                merge_operator.name(),
                self.saved_key.get()
            );
            self.record(|s| s.record_merge_failure());
            Status::merge_operator_failed(format!("{}: {err}", merge_operator.name()))
        })
    }

    fn require_merge_operator(&self) -> Result<&Arc<dyn MergeOperator>> {
        self.merge_operator.as_ref().ok_or_else(|| {
            log::error!("DBOptions::merge_operator is None");
            Status::merge_operator_missing("merge operator must be set to read merge entries")
        })
    }

    fn seek_to_first_impl(&mut self) -> Result<()> {
        self.status = Status::ok();
        self.direction = Direction::Forward;
        self.clear_saved_value();
        self.saved_key.clear();
        self.prefix_start = None;

        self.iter.seek_to_first();
        self.record(|s| s.record_seek());

        if self.iter.valid() {
            self.find_next_user_entry(false)?;
            self.record_found(|s, bytes| s.record_seek_found(bytes));
        } else {
            self.valid = false;
        }
        if self.valid {
            self.prefix_start = self.prefix_of(self.saved_key.get());
        }
        Ok(())
    }

    fn seek_to_last_impl(&mut self) -> Result<()> {
        self.status = Status::ok();
        self.direction = Direction::Reverse;
        self.clear_saved_value();
        self.saved_key.clear();
        self.prefix_start = None;

        self.iter.seek_to_last();
        self.record(|s| s.record_seek());

        // With an upper bound, start from the last entry below it.
        if self.iter.valid() {
            if let Some(bound) = self.iterate_upper_bound.clone() {
                let last_key = InternalKey::new(bound, MAX_SEQUENCE_NUMBER, VALUE_TYPE_FOR_SEEK).encode();
                self.iter.seek(&last_key);
                if !self.iter.valid() {
                    self.iter.seek_to_last();
                } else {
                    self.iter.prev();
                    if !self.iter.valid() {
                        self.valid = false;
                        return Ok(());
                    }
                }
            }
        }

        self.prev_internal()?;
        self.record_found(|s, bytes| s.record_seek_found(bytes));
        if self.valid {
            self.prefix_start = self.prefix_of(self.saved_key.get());
        }
        Ok(())
    }

    fn seek_impl(&mut self, target: &Slice) -> Result<()> {
        self.status = Status::ok();
        self.direction = Direction::Forward;
        self.clear_saved_value();
        self.saved_key.clear();
        self.prefix_start = self.prefix_of(target);

        let seek_key = InternalKey::new(target.clone(), self.sequence, VALUE_TYPE_FOR_SEEK).encode();
        self.iter.seek(&seek_key);
        self.record(|s| s.record_seek());

        if self.iter.valid() {
            self.find_next_user_entry(false)?;
            self.check_prefix();
            self.record_found(|s, bytes| s.record_seek_found(bytes));
        } else {
            self.valid = false;
        }
        Ok(())
    }

    fn next_impl(&mut self) -> Result<()> {
        if self.direction == Direction::Reverse {
            self.find_next_user_key();
            self.direction = Direction::Forward;
            if !self.iter.valid() {
                self.iter.seek_to_first();
            }
        } else if self.iter.valid() && !self.current_entry_is_merged {
            // The substrate sits on the entry we just returned. A merged entry
            // already left it past the operands it consumed.
            self.iter.next();
        }

        self.record(|s| s.record_next());
        if !self.iter.valid() {
            self.valid = false;
            return Ok(());
        }
        self.find_next_user_entry(true)?;
        self.check_prefix();
        self.record_found(|s, bytes| s.record_next_found(bytes));
        Ok(())
    }

    fn prev_impl(&mut self) -> Result<()> {
        if self.direction == Direction::Forward {
            self.reverse_to_backward();
        }
        self.prev_internal()?;
        self.record(|s| s.record_prev());
        self.check_prefix();
        self.record_found(|s, bytes| s.record_prev_found(bytes));
        Ok(())
    }

    // PRE: the substrate is valid; `saved_key` holds the current user key
    //      if `skipping`.
    // POST: if valid, `saved_key` holds the next visible user key and, for a
    //       merged entry, `saved_value` the merged value.
    //
    // In between, `saved_key` may hold a user key hidden by a tombstone.
    fn find_next_user_entry(&mut self, mut skipping: bool) -> Result<()> {
        debug_assert!(self.iter.valid());
        debug_assert_eq!(self.direction, Direction::Forward);
        self.current_entry_is_merged = false;
        let mut num_skipped: u64 = 0;
        loop {
            if let Some(ikey) = self.parse_key() {
                if let Some(bound) = &self.iterate_upper_bound {
                    if ikey.user_key >= *bound {
                        break;
                    }
                }

                if ikey.sequence <= self.sequence {
                    if skipping && ikey.user_key <= *self.saved_key.get() {
                        num_skipped += 1;
                        self.record(|s| s.record_internal_key_skipped());
                    } else {
                        match ikey.value_type {
                            ValueType::Deletion | ValueType::SingleDeletion => {
                                // Everything older for this key is hidden.
                                self.save_key(&ikey.user_key);
                                skipping = true;
                                num_skipped = 0;
                                self.record(|s| s.record_internal_delete_skipped());
                            },
                            ValueType::Value => {
                                self.valid = true;
                                self.save_key(&ikey.user_key);
                                return Ok(());
                            },
                            ValueType::Merge => {
                                self.save_key(&ikey.user_key);
                                self.current_entry_is_merged = true;
                                self.valid = true;
                                return self.merge_values_new_to_old();
                            },
                        }
                    }
                }
            }

            // Too many versions of the key being skipped: seek to its last
            // possible entry, (key, 0, Deletion), instead of stepping.
            if skipping && num_skipped > self.max_skip {
                num_skipped = 0;
                let last_key = InternalKey::new(self.saved_key.get().clone(), 0, ValueType::Deletion).encode();
                self.reseek(&last_key);
            } else {
                self.iter.next();
            }

            if !self.iter.valid() {
                break;
            }
        }
        self.valid = false;
        Ok(())
    }

    // Fold the merge operands of `saved_key`, scanning from newer to older.
    //
    // PRE: the substrate sits on the newest visible merge entry of the key.
    // POST: `saved_value` holds the merged value; the substrate sits on the
    //       first entry past the ones consumed (or is invalid).
    fn merge_values_new_to_old(&mut self) -> Result<()> {
        self.require_merge_operator()?;

        let mut operands = vec![self.iter.value()];
        self.iter.next();
        while self.iter.valid() {
            let Some(ikey) = self.parse_key() else {
                self.iter.next();
                continue;
            };

            if ikey.user_key != *self.saved_key.get() {
                break;
            }
            match ikey.value_type {
                ValueType::Deletion | ValueType::SingleDeletion => {
                    // Leave the substrate past the tombstone.
                    self.iter.next();
                    break;
                },
                ValueType::Value => {
                    let base = self.iter.value();
                    self.saved_value = self.full_merge(Some(&base), &operands)?;
                    self.iter.next();
                    return Ok(());
                },
                ValueType::Merge => {
                    operands.push(self.iter.value());
                    self.iter.next();
                },
            }
        }

        // Ran out of entries for the key or hit a tombstone: no base value.
        self.saved_value = self.full_merge(None, &operands)?;
        Ok(())
    }

    fn reverse_to_backward(&mut self) {
        if self.current_entry_is_merged {
            // The merge consumed entries past the current key; walk back until
            // the substrate is on the current key again.
            if !self.iter.valid() {
                self.iter.seek_to_last();
            }
            let mut ikey = self.find_parseable_key(Direction::Reverse);
            while let Some(k) = ikey {
                if k.user_key <= *self.saved_key.get() {
                    break;
                }
                self.iter.prev();
                ikey = self.find_parseable_key(Direction::Reverse);
            }
        }

        self.find_prev_user_key();
        self.direction = Direction::Reverse;
    }

    fn prev_internal(&mut self) -> Result<()> {
        while let Some(ikey) = self.find_parseable_key(Direction::Reverse) {
            self.save_key(&ikey.user_key);
            let found = self.find_value_for_current_key()?;
            if found {
                self.valid = true;
            }
            if let Some(k) = self.find_parseable_key(Direction::Reverse) {
                if k.user_key == *self.saved_key.get() {
                    self.find_prev_user_key();
                }
            }
            if found {
                return Ok(());
            }
        }

        self.valid = false;
        Ok(())
    }

    // Resolve `saved_key` by walking its entries from oldest to newest.
    //
    // Returns true and fills `saved_value` if the newest visible entry is not
    // a tombstone. The substrate is left on the entry before the newest
    // visible one, or on an invisible newer entry of the same key.
    fn find_value_for_current_key(&mut self) -> Result<bool> {
        debug_assert!(self.iter.valid());
        self.merge_operands.clear();
        // Last non-merge entry seen, and the last entry of any kind.
        let mut last_not_merge_type = ValueType::Deletion;
        let mut last_key_entry_type = ValueType::Deletion;

        let mut num_skipped: u64 = 0;
        let mut ikey = self.find_parseable_key(Direction::Reverse);
        while let Some(k) = ikey {
            if k.sequence > self.sequence || k.user_key != *self.saved_key.get() {
                break;
            }
            // Too many versions: resolve from the newest visible one instead.
            if num_skipped >= self.max_skip {
                return self.find_value_for_current_key_using_seek();
            }

            last_key_entry_type = k.value_type;
            match k.value_type {
                ValueType::Value => {
                    self.merge_operands.clear();
                    self.saved_value = self.iter.value();
                    last_not_merge_type = ValueType::Value;
                },
                ValueType::Deletion | ValueType::SingleDeletion => {
                    self.merge_operands.clear();
                    last_not_merge_type = k.value_type;
                    self.record(|s| s.record_internal_delete_skipped());
                },
                ValueType::Merge => {
                    self.require_merge_operator()?;
                    // Walking toward newer entries: each operand is the newest
                    // so far.
                    self.merge_operands.push_front(self.iter.value());
                },
            }

            self.record(|s| s.record_internal_key_skipped());
            self.iter.prev();
            num_skipped += 1;
            ikey = self.find_parseable_key(Direction::Reverse);
        }

        match last_key_entry_type {
            ValueType::Deletion | ValueType::SingleDeletion => {
                self.valid = false;
                Ok(false)
            },
            ValueType::Merge => {
                let operands = Vec::from(std::mem::take(&mut self.merge_operands));
                let base = (last_not_merge_type == ValueType::Value).then(|| self.saved_value.clone());
                self.saved_value = self.full_merge(base.as_ref(), &operands)?;
                self.valid = true;
                Ok(true)
            },
            ValueType::Value => {
                self.valid = true;
                Ok(true)
            },
        }
    }

    // Resolve `saved_key` with a seek to its newest visible entry, then walk
    // forward over its merge operands.
    //
    // POST: the substrate sits on an entry of `saved_key`.
    fn find_value_for_current_key_using_seek(&mut self) -> Result<bool> {
        let last_key = InternalKey::new(self.saved_key.get().clone(), self.sequence, VALUE_TYPE_FOR_SEEK).encode();
        self.reseek(&last_key);

        let first = match self.find_parseable_key(Direction::Forward) {
            Some(k) if k.user_key == *self.saved_key.get() => k,
            _ => {
                // Every visible entry of the key was unparseable.
                self.position_before_saved_key();
                self.valid = false;
                return Ok(false);
            },
        };

        match first.value_type {
            ValueType::Value => {
                self.saved_value = self.iter.value();
                self.valid = true;
                return Ok(true);
            },
            ValueType::Deletion | ValueType::SingleDeletion => {
                self.valid = false;
                return Ok(false);
            },
            ValueType::Merge => {},
        }

        self.require_merge_operator()?;
        let mut operands = Vec::new();
        let mut ikey = Some(first);
        while let Some(k) = &ikey {
            if k.user_key != *self.saved_key.get() || k.value_type != ValueType::Merge {
                break;
            }
            operands.push(self.iter.value());
            self.iter.next();
            ikey = self.find_parseable_key(Direction::Forward);
        }

        match ikey {
            Some(k) if k.user_key == *self.saved_key.get() && k.value_type == ValueType::Value => {
                let base = self.iter.value();
                self.saved_value = self.full_merge(Some(&base), &operands)?;
            },
            Some(k) if k.user_key == *self.saved_key.get() && k.value_type.is_tombstone() => {
                self.saved_value = self.full_merge(None, &operands)?;
            },
            _ => {
                self.saved_value = self.full_merge(None, &operands)?;
                // Put the substrate back on an entry of saved_key.
                self.reseek(&last_key);
            },
        }
        self.valid = true;
        Ok(true)
    }

    /// Leave the substrate on the last entry whose user key is below
    /// `saved_key`, or invalid if there is none.
    fn position_before_saved_key(&mut self) {
        if !self.iter.valid() {
            self.iter.seek_to_last();
        }
        while let Some(k) = self.find_parseable_key(Direction::Reverse) {
            if k.user_key < *self.saved_key.get() {
                break;
            }
            self.iter.prev();
        }
    }

    // Used when turning from reverse to forward: step to the first entry of
    // `saved_key`. The key is close by, so no seek.
    fn find_next_user_key(&mut self) {
        while let Some(k) = self.find_parseable_key(Direction::Forward) {
            if k.user_key == *self.saved_key.get() {
                break;
            }
            self.iter.next();
        }
    }

    // Step back past every entry of `saved_key`.
    fn find_prev_user_key(&mut self) {
        let mut num_skipped: u64 = 0;
        while let Some(k) = self.find_parseable_key(Direction::Reverse) {
            let cmp = k.user_key.cmp(self.saved_key.get());
            let same_key = cmp.is_eq();
            if !(same_key || (cmp.is_gt() && k.sequence > self.sequence)) {
                break;
            }
            if same_key {
                if num_skipped >= self.max_skip {
                    // Jump to the newest entry of the key; prev() below then
                    // leaves it.
                    num_skipped = 0;
                    let first_key =
                        InternalKey::new(self.saved_key.get().clone(), MAX_SEQUENCE_NUMBER, VALUE_TYPE_FOR_SEEK)
                            .encode();
                    self.reseek(&first_key);
                } else {
                    num_skipped += 1;
                }
            }
            self.iter.prev();
        }
    }
}

impl Iterator for DBIter {
    fn seek_to_first(&mut self) -> Result<bool> {
        let result = self.seek_to_first_impl();
        self.finish(result)
    }

    fn seek_to_last(&mut self) -> Result<bool> {
        let result = self.seek_to_last_impl();
        self.finish(result)
    }

    fn seek(&mut self, target: &Slice) -> Result<bool> {
        let result = self.seek_impl(target);
        self.finish(result)
    }

    fn next(&mut self) -> Result<bool> {
        debug_assert!(self.valid, "next() on an invalid DBIter");
        if !self.valid {
            return Ok(false);
        }
        let result = self.next_impl();
        self.finish(result)
    }

    fn prev(&mut self) -> Result<bool> {
        debug_assert!(self.valid, "prev() on an invalid DBIter");
        if !self.valid {
            return Ok(false);
        }
        let result = self.prev_impl();
        self.finish(result)
    }

    fn key(&self) -> Slice {
        debug_assert!(self.valid);
        self.saved_key.get().clone()
    }

    fn value(&self) -> Slice {
        debug_assert!(self.valid);
        if self.direction == Direction::Forward && !self.current_entry_is_merged {
            self.iter.value()
        } else {
            self.saved_value.clone()
        }
    }

    fn valid(&self) -> bool {
        self.valid
    }

    fn status(&self) -> Result<()> {
        if self.status.is_ok() {
            self.iter.status()
        } else {
            Err(self.status.clone())
        }
    }
}

impl Drop for DBIter {
    fn drop(&mut self) {
        self.record(|s| s.record_iterator_dropped());
    }
}
