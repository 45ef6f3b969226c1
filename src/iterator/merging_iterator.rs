use std::{cmp::Ordering, collections::BinaryHeap};

use crate::{
    db::dbformat::compare_internal_keys,
    iterator::InternalIterator,
    util::{Result, Slice},
};

/// Merging iterator for combining multiple sorted internal iterators
///
/// Uses a heap to merge multiple sorted child iterators into one stream of
/// physical entries in internal key order. This is how a cursor sees the
/// active memtable and every frozen memtable as a single substrate.
///
/// # Architecture
///
/// ```text
/// MergingIterator
///     ├─→ Heap of (key, child_index), min-heap forward / max-heap reverse
///     ├─→ Vec<Box<dyn InternalIterator>> (children)
///     └─→ current: index of the child positioned at the merged entry
/// ```
///
/// # Direction
///
/// Moving forward, every child is positioned at its first entry `>=` the
/// current key; moving backward, at its last entry `<=` it. Changing
/// direction re-seeks every non-current child, like RocksDB's merger.
///
/// # Priority Rules
///
/// Internal keys carry unique sequence numbers, so ties only happen when
/// the same entry is present in two children. Ties go to the lower index
/// (the newer source).
pub struct MergingIterator {
    children: Vec<Box<dyn InternalIterator>>,
    heap: BinaryHeap<HeapEntry>,
    direction: Direction,
    current: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Direction {
    Forward,
    Reverse,
}

/// Entry in the heap. `BinaryHeap` pops its maximum, so the forward
/// ordering is reversed to get a min-heap.
struct HeapEntry {
    key: Slice,
    index: usize,
    direction: Direction,
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_key = compare_internal_keys(self.key.data(), other.key.data());
        // Lower index wins ties in both directions.
        let by_index = other.index.cmp(&self.index);
        match self.direction {
            Direction::Forward => by_key.reverse().then(by_index),
            Direction::Reverse => by_key.then(by_index),
        }
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for HeapEntry {}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl MergingIterator {
    /// Create a new merging iterator from multiple child iterators
    ///
    /// # Priority Order
    /// - children[0] has highest priority (e.g., active MemTable)
    /// - children[n] has lowest priority (e.g., oldest frozen MemTable)
    pub fn new(children: Vec<Box<dyn InternalIterator>>) -> Self {
        MergingIterator {
            children,
            heap: BinaryHeap::new(),
            direction: Direction::Forward,
            current: None,
        }
    }

    /// Rebuild heap with current positions of all valid children
    fn rebuild_heap(&mut self, direction: Direction) {
        self.direction = direction;
        self.heap.clear();
        for (index, child) in self.children.iter().enumerate() {
            if child.valid() {
                self.heap.push(HeapEntry {
                    key: child.key(),
                    index,
                    direction,
                });
            }
        }
        self.current = self.heap.peek().map(|e| e.index);
    }

    /// Re-insert the current child after it moved, then pick the new top
    fn advance_current(&mut self) {
        if let Some(top) = self.heap.pop() {
            let child = &self.children[top.index];
            if child.valid() {
                self.heap.push(HeapEntry {
                    key: child.key(),
                    index: top.index,
                    direction: self.direction,
                });
            }
        }
        self.current = self.heap.peek().map(|e| e.index);
    }

    fn switch_to_forward(&mut self) {
        let key = self.key();
        let current = self.current;
        for (index, child) in self.children.iter_mut().enumerate() {
            if Some(index) == current {
                continue;
            }
            child.seek(&key);
            if child.valid() && compare_internal_keys(child.key().data(), key.data()).is_eq() {
                child.next();
            }
        }
        self.rebuild_heap(Direction::Forward);
        debug_assert_eq!(self.current, current);
    }

    fn switch_to_reverse(&mut self) {
        let key = self.key();
        let current = self.current;
        for (index, child) in self.children.iter_mut().enumerate() {
            if Some(index) == current {
                continue;
            }
            // Position at the last entry < key.
            child.seek(&key);
            if child.valid() {
                child.prev();
            } else {
                child.seek_to_last();
            }
        }
        self.rebuild_heap(Direction::Reverse);
        debug_assert_eq!(self.current, current);
    }
}

impl InternalIterator for MergingIterator {
    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn seek_to_first(&mut self) {
        for child in &mut self.children {
            child.seek_to_first();
        }
        self.rebuild_heap(Direction::Forward);
    }

    fn seek_to_last(&mut self) {
        for child in &mut self.children {
            child.seek_to_last();
        }
        self.rebuild_heap(Direction::Reverse);
    }

    fn seek(&mut self, target: &Slice) {
        for child in &mut self.children {
            child.seek(target);
        }
        self.rebuild_heap(Direction::Forward);
    }

    fn next(&mut self) {
        debug_assert!(self.valid());
        if self.direction != Direction::Forward {
            self.switch_to_forward();
        }
        if let Some(index) = self.current {
            self.children[index].next();
            self.advance_current();
        }
    }

    fn prev(&mut self) {
        debug_assert!(self.valid());
        if self.direction != Direction::Reverse {
            self.switch_to_reverse();
        }
        if let Some(index) = self.current {
            self.children[index].prev();
            self.advance_current();
        }
    }

    fn key(&self) -> Slice {
        self.current
            .map(|i| self.children[i].key())
            .unwrap_or_else(Slice::empty)
    }

    fn value(&self) -> Slice {
        self.current
            .map(|i| self.children[i].value())
            .unwrap_or_else(Slice::empty)
    }

    fn status(&self) -> Result<()> {
        self.children.iter().try_for_each(|child| child.status())
    }

    fn pin_data(&mut self) -> Result<()> {
        self.children.iter_mut().try_for_each(|child| child.pin_data())
    }

    fn release_pinned_data(&mut self) -> Result<()> {
        self.children
            .iter_mut()
            .try_for_each(|child| child.release_pinned_data())
    }

    fn is_key_pinned(&self) -> bool {
        self.current
            .is_some_and(|i| self.children[i].is_key_pinned())
    }
}
