use crate::db::dbformat::SequenceNumber;

/// Snapshot provides a consistent point-in-time view of the database
///
/// Only entries with `sequence <= snapshot.sequence()` are visible to a
/// cursor reading at this snapshot. Snapshots are plain sequence numbers:
/// nothing is garbage collected, so holding one costs nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    sequence: SequenceNumber,
}

impl Snapshot {
    /// Create a new snapshot at the given sequence number
    pub fn new(sequence: SequenceNumber) -> Self {
        Snapshot { sequence }
    }

    /// Get the snapshot's sequence number
    #[inline]
    pub fn sequence(&self) -> SequenceNumber {
        self.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_basic() {
        let snapshot = Snapshot::new(100);
        assert_eq!(snapshot.sequence(), 100);
    }

    #[test]
    fn test_snapshot_copy() {
        let snapshot1 = Snapshot::new(100);
        let snapshot2 = snapshot1;

        assert_eq!(snapshot1, snapshot2);
    }
}
