//! Internal key format shared by the memtable, the substrate iterators and
//! the user-facing cursor.
//!
//! An internal key is the user key followed by an 8-byte little-endian tag
//! packing `(sequence << 8) | value_type`:
//!
//! ```text
//! +----------------+-------------------------------+
//! | user_key (N B) | (sequence << 8 | type) fixed64 |
//! +----------------+-------------------------------+
//! ```
//!
//! Internal keys sort by user key ascending, then by tag descending, so for
//! one user key the newest version comes first.

use std::cmp::Ordering;

use crate::util::{Result, Slice, Status};

pub type SequenceNumber = u64;

/// Sequence numbers use the upper 56 bits of the tag.
pub const MAX_SEQUENCE_NUMBER: SequenceNumber = (1u64 << 56) - 1;

const TAG_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    Deletion = 0x0,
    Value = 0x1,
    Merge = 0x2,
    SingleDeletion = 0x7,
}

/// Largest tag in use. Seeking to `(key, seq, VALUE_TYPE_FOR_SEEK)` lands on
/// the first entry of `key` whose sequence is `<= seq`.
pub const VALUE_TYPE_FOR_SEEK: ValueType = ValueType::SingleDeletion;

impl ValueType {
    pub fn is_tombstone(self) -> bool {
        matches!(self, ValueType::Deletion | ValueType::SingleDeletion)
    }
}

impl TryFrom<u8> for ValueType {
    type Error = Status;

    fn try_from(tag: u8) -> Result<Self> {
        match tag {
            0x0 => Ok(ValueType::Deletion),
            0x1 => Ok(ValueType::Value),
            0x2 => Ok(ValueType::Merge),
            0x7 => Ok(ValueType::SingleDeletion),
            other => Err(Status::corruption(format!(
                "unknown value type {other:#x} in internal key"
            ))),
        }
    }
}

#[inline]
pub fn pack_sequence_and_type(sequence: SequenceNumber, value_type: ValueType) -> u64 {
    debug_assert!(sequence <= MAX_SEQUENCE_NUMBER);
    (sequence << 8) | value_type as u64
}

/// Internal key under construction, owned.
#[derive(Clone, Debug)]
pub struct InternalKey {
    user_key: Slice,
    sequence: SequenceNumber,
    value_type: ValueType,
}

impl InternalKey {
    pub fn new(user_key: Slice, sequence: SequenceNumber, value_type: ValueType) -> Self {
        InternalKey {
            user_key,
            sequence,
            value_type,
        }
    }

    pub fn encode(&self) -> Slice {
        let mut buf = Vec::with_capacity(self.user_key.size() + TAG_SIZE);
        buf.extend_from_slice(self.user_key.data());
        buf.extend_from_slice(&pack_sequence_and_type(self.sequence, self.value_type).to_le_bytes());
        Slice::from(buf)
    }

    pub fn user_key(&self) -> &Slice {
        &self.user_key
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
}

/// A decoded internal key. `user_key` shares the buffer of the raw key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedInternalKey {
    pub user_key: Slice,
    pub sequence: SequenceNumber,
    pub value_type: ValueType,
}

/// Decode a raw internal key.
///
/// Fails with `Corruption` when the key is too short to carry a tag or when
/// the tag names an unknown value type.
pub fn parse_internal_key(internal_key: &Slice) -> Result<ParsedInternalKey> {
    let n = internal_key.size();
    if n < TAG_SIZE {
        return Err(Status::corruption(format!(
            "internal key too short: {n} bytes"
        )));
    }
    let tag = decode_tag(&internal_key.data()[n - TAG_SIZE..]);
    let value_type = ValueType::try_from((tag & 0xff) as u8)?;
    Ok(ParsedInternalKey {
        user_key: internal_key.sub_slice(..n - TAG_SIZE),
        sequence: tag >> 8,
        value_type,
    })
}

/// The user key portion of a raw internal key, without validating the tag.
pub fn extract_user_key(internal_key: &[u8]) -> &[u8] {
    split_internal_key(internal_key).0
}

fn split_internal_key(internal_key: &[u8]) -> (&[u8], u64) {
    if internal_key.len() < TAG_SIZE {
        return (internal_key, 0);
    }
    let (user_key, tag) = internal_key.split_at(internal_key.len() - TAG_SIZE);
    (user_key, decode_tag(tag))
}

#[inline]
fn decode_tag(tag: &[u8]) -> u64 {
    let mut buf = [0u8; TAG_SIZE];
    buf.copy_from_slice(tag);
    u64::from_le_bytes(buf)
}

/// Total order over raw internal keys: user key ascending, tag descending.
///
/// Malformed keys still get a position: a key shorter than the tag is
/// treated as all user key with tag 0.
pub fn compare_internal_keys(a: &[u8], b: &[u8]) -> Ordering {
    let (a_user, a_tag) = split_internal_key(a);
    let (b_user, b_tag) = split_internal_key(b);
    a_user.cmp(b_user).then_with(|| b_tag.cmp(&a_tag))
}
