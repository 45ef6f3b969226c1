use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::util::Result;

/// Read-path statistics
///
/// Thread-safe counters shared by every cursor created with the same
/// `DBOptions::statistics`. Uses atomic counters for lock-free updates.
#[derive(Debug, Default)]
pub struct Statistics {
    // Cursors currently alive
    pub num_iterators: AtomicI64,

    // Positioning operations
    pub num_seek: AtomicU64,
    pub num_seek_found: AtomicU64,
    pub num_next: AtomicU64,
    pub num_next_found: AtomicU64,
    pub num_prev: AtomicU64,
    pub num_prev_found: AtomicU64,
    pub iter_bytes_read: AtomicU64,

    // Skip/seek trade-off
    pub num_reseeks_in_iteration: AtomicU64,
    pub internal_key_skipped: AtomicU64,
    pub internal_delete_skipped: AtomicU64,

    // Merge operator
    pub num_merge_operations: AtomicU64,
    pub merge_time_nanos: AtomicU64,

    // Error counts
    pub num_corrupted_keys: AtomicU64,
    pub num_merge_failures: AtomicU64,
}

/// Point-in-time copy of [`Statistics`], serializable for export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub num_iterators: i64,
    pub num_seek: u64,
    pub num_seek_found: u64,
    pub num_next: u64,
    pub num_next_found: u64,
    pub num_prev: u64,
    pub num_prev_found: u64,
    pub iter_bytes_read: u64,
    pub num_reseeks_in_iteration: u64,
    pub internal_key_skipped: u64,
    pub internal_delete_skipped: u64,
    pub num_merge_operations: u64,
    pub merge_time_nanos: u64,
    pub num_corrupted_keys: u64,
    pub num_merge_failures: u64,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    // Cursor lifetime
    #[inline]
    pub fn record_iterator_created(&self) {
        self.num_iterators.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_iterator_dropped(&self) {
        self.num_iterators.fetch_sub(1, Ordering::Relaxed);
    }

    // Positioning
    #[inline]
    pub fn record_seek(&self) {
        self.num_seek.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_seek_found(&self, bytes: u64) {
        self.num_seek_found.fetch_add(1, Ordering::Relaxed);
        self.iter_bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_next(&self) {
        self.num_next.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_next_found(&self, bytes: u64) {
        self.num_next_found.fetch_add(1, Ordering::Relaxed);
        self.iter_bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_prev(&self) {
        self.num_prev.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_prev_found(&self, bytes: u64) {
        self.num_prev_found.fetch_add(1, Ordering::Relaxed);
        self.iter_bytes_read.fetch_add(bytes, Ordering::Relaxed);
    }

    // Skip/seek
    #[inline]
    pub fn record_reseek(&self) {
        self.num_reseeks_in_iteration
            .fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_internal_key_skipped(&self) {
        self.internal_key_skipped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_internal_delete_skipped(&self) {
        self.internal_delete_skipped
            .fetch_add(1, Ordering::Relaxed);
    }

    // Merge
    #[inline]
    pub fn record_merge(&self, nanos: u64) {
        self.num_merge_operations.fetch_add(1, Ordering::Relaxed);
        self.merge_time_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    // Error tracking
    #[inline]
    pub fn record_corrupted_key(&self) {
        self.num_corrupted_keys.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_merge_failure(&self) {
        self.num_merge_failures.fetch_add(1, Ordering::Relaxed);
    }

    // Getters (snapshot values)
    pub fn num_iterators(&self) -> i64 {
        self.num_iterators.load(Ordering::Relaxed)
    }

    pub fn num_reseeks(&self) -> u64 {
        self.num_reseeks_in_iteration.load(Ordering::Relaxed)
    }

    pub fn num_merge_operations(&self) -> u64 {
        self.num_merge_operations.load(Ordering::Relaxed)
    }

    pub fn num_corrupted_keys(&self) -> u64 {
        self.num_corrupted_keys.load(Ordering::Relaxed)
    }

    pub fn iter_bytes_read(&self) -> u64 {
        self.iter_bytes_read.load(Ordering::Relaxed)
    }

    /// Fraction of positioning calls that landed on an entry
    pub fn found_rate(&self) -> f64 {
        let calls = (self.num_seek.load(Ordering::Relaxed)
            + self.num_next.load(Ordering::Relaxed)
            + self.num_prev.load(Ordering::Relaxed)) as f64;
        let found = (self.num_seek_found.load(Ordering::Relaxed)
            + self.num_next_found.load(Ordering::Relaxed)
            + self.num_prev_found.load(Ordering::Relaxed)) as f64;
        if calls > 0.0 { found / calls } else { 0.0 }
    }

    pub fn avg_merge_time_micros(&self) -> f64 {
        let total = self.merge_time_nanos.load(Ordering::Relaxed) as f64;
        let count = self.num_merge_operations.load(Ordering::Relaxed) as f64;
        if count > 0.0 { total / count / 1000.0 } else { 0.0 }
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            num_iterators: self.num_iterators.load(Ordering::Relaxed),
            num_seek: self.num_seek.load(Ordering::Relaxed),
            num_seek_found: self.num_seek_found.load(Ordering::Relaxed),
            num_next: self.num_next.load(Ordering::Relaxed),
            num_next_found: self.num_next_found.load(Ordering::Relaxed),
            num_prev: self.num_prev.load(Ordering::Relaxed),
            num_prev_found: self.num_prev_found.load(Ordering::Relaxed),
            iter_bytes_read: self.iter_bytes_read.load(Ordering::Relaxed),
            num_reseeks_in_iteration: self.num_reseeks_in_iteration.load(Ordering::Relaxed),
            internal_key_skipped: self.internal_key_skipped.load(Ordering::Relaxed),
            internal_delete_skipped: self.internal_delete_skipped.load(Ordering::Relaxed),
            num_merge_operations: self.num_merge_operations.load(Ordering::Relaxed),
            merge_time_nanos: self.merge_time_nanos.load(Ordering::Relaxed),
            num_corrupted_keys: self.num_corrupted_keys.load(Ordering::Relaxed),
            num_merge_failures: self.num_merge_failures.load(Ordering::Relaxed),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Reset all counters except the live iterator gauge
    pub fn reset(&self) {
        self.num_seek.store(0, Ordering::Relaxed);
        self.num_seek_found.store(0, Ordering::Relaxed);
        self.num_next.store(0, Ordering::Relaxed);
        self.num_next_found.store(0, Ordering::Relaxed);
        self.num_prev.store(0, Ordering::Relaxed);
        self.num_prev_found.store(0, Ordering::Relaxed);
        self.iter_bytes_read.store(0, Ordering::Relaxed);
        self.num_reseeks_in_iteration.store(0, Ordering::Relaxed);
        self.internal_key_skipped.store(0, Ordering::Relaxed);
        self.internal_delete_skipped.store(0, Ordering::Relaxed);
        self.num_merge_operations.store(0, Ordering::Relaxed);
        self.merge_time_nanos.store(0, Ordering::Relaxed);
        self.num_corrupted_keys.store(0, Ordering::Relaxed);
        self.num_merge_failures.store(0, Ordering::Relaxed);
    }

    /// Get a formatted statistics report
    pub fn report(&self) -> String {
        let s = self.snapshot();
        format!(
            "Iterator Statistics:\n\
            \n\
            Cursors:\n\
            - Live:          {}\n\
            - Seeks:         {} (found {})\n\
            - Next:          {} (found {})\n\
            - Prev:          {} (found {})\n\
            - Found rate:    {:.2}%\n\
            - Bytes read:    {} ({:.2} MB)\n\
            \n\
            Skip/Seek:\n\
            - Reseeks:       {}\n\
            - Keys skipped:  {}\n\
            - Tombstones:    {}\n\
            \n\
            Merge:\n\
            - Operations:    {}\n\
            - Avg time:      {:.2} us\n\
            \n\
            Errors:\n\
            - Corrupt keys:  {}\n\
            - Merge fails:   {}",
            s.num_iterators,
            s.num_seek,
            s.num_seek_found,
            s.num_next,
            s.num_next_found,
            s.num_prev,
            s.num_prev_found,
            self.found_rate() * 100.0,
            s.iter_bytes_read,
            s.iter_bytes_read as f64 / 1024.0 / 1024.0,
            s.num_reseeks_in_iteration,
            s.internal_key_skipped,
            s.internal_delete_skipped,
            s.num_merge_operations,
            self.avg_merge_time_micros(),
            s.num_corrupted_keys,
            s.num_merge_failures,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_basic() {
        let stats = Statistics::new();

        stats.record_seek();
        stats.record_seek_found(10);
        stats.record_next();
        stats.record_next_found(20);
        stats.record_next();

        let s = stats.snapshot();
        assert_eq!(s.num_seek, 1);
        assert_eq!(s.num_next, 2);
        assert_eq!(s.num_next_found, 1);
        assert_eq!(stats.iter_bytes_read(), 30);
    }

    #[test]
    fn test_found_rate() {
        let stats = Statistics::new();

        stats.record_seek();
        stats.record_seek_found(1);
        stats.record_prev();
        stats.record_prev_found(1);
        stats.record_prev();
        stats.record_prev_found(1);
        stats.record_next();

        assert_eq!(stats.found_rate(), 0.75);
    }

    #[test]
    fn test_iterator_gauge() {
        let stats = Statistics::new();
        stats.record_iterator_created();
        stats.record_iterator_created();
        stats.record_iterator_dropped();
        assert_eq!(stats.num_iterators(), 1);

        stats.reset();
        assert_eq!(stats.num_iterators(), 1);
    }

    #[test]
    fn test_statistics_reset() {
        let stats = Statistics::new();

        stats.record_reseek();
        stats.record_merge(500);
        stats.record_corrupted_key();

        stats.reset();

        assert_eq!(stats.num_reseeks(), 0);
        assert_eq!(stats.num_merge_operations(), 0);
        assert_eq!(stats.num_corrupted_keys(), 0);
    }

    #[test]
    fn test_merge_time() {
        let stats = Statistics::new();
        stats.record_merge(2000);
        stats.record_merge(4000);
        assert_eq!(stats.avg_merge_time_micros(), 3.0);
    }

    #[test]
    fn test_statistics_json_roundtrip() {
        let stats = Statistics::new();
        stats.record_reseek();
        stats.record_internal_key_skipped();

        let json = stats.to_json().unwrap();
        let parsed: StatisticsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, stats.snapshot());
        assert_eq!(parsed.num_reseeks_in_iteration, 1);
    }

    #[test]
    fn test_statistics_report() {
        let stats = Statistics::new();

        stats.record_seek();
        stats.record_seek_found(1024);
        stats.record_reseek();

        let report = stats.report();
        assert!(report.contains("Seeks:         1 (found 1)"));
        assert!(report.contains("Reseeks:       1"));
        assert!(report.contains("Found rate:    100.00%"));
    }
}
