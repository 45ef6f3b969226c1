use std::cmp::Ordering;
use std::fmt;
use std::ops::RangeBounds;

use bytes::Bytes;

/// Immutable byte string shared by reference count.
///
/// Cloning a `Slice` or taking a sub-slice never copies the underlying bytes,
/// which lets iterators hand out keys and values that stay valid after the
/// iterator moves on.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Slice {
    data: Bytes,
}

impl Slice {
    pub fn new(data: Vec<u8>) -> Self {
        Slice {
            data: Bytes::from(data),
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        Slice {
            data: Bytes::copy_from_slice(data),
        }
    }

    pub fn empty() -> Self {
        Slice { data: Bytes::new() }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn compare(&self, other: &Slice) -> Ordering {
        self.data.cmp(&other.data)
    }

    pub fn starts_with(&self, prefix: &Slice) -> bool {
        self.data.starts_with(&prefix.data)
    }

    /// Zero-copy view of a byte range of this slice.
    pub fn sub_slice(&self, range: impl RangeBounds<usize>) -> Slice {
        Slice {
            data: self.data.slice(range),
        }
    }

    /// Copy into a buffer that shares nothing with `self`.
    pub fn deep_copy(&self) -> Slice {
        Slice::from_bytes(&self.data)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }
}

impl From<Vec<u8>> for Slice {
    fn from(data: Vec<u8>) -> Self {
        Slice::new(data)
    }
}

impl From<&[u8]> for Slice {
    fn from(data: &[u8]) -> Self {
        Slice::from_bytes(data)
    }
}

impl From<Bytes> for Slice {
    fn from(data: Bytes) -> Self {
        Slice { data }
    }
}

impl From<String> for Slice {
    fn from(s: String) -> Self {
        Slice::new(s.into_bytes())
    }
}

impl From<&str> for Slice {
    fn from(s: &str) -> Self {
        Slice::from_bytes(s.as_bytes())
    }
}

impl AsRef<[u8]> for Slice {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl PartialOrd for Slice {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Slice {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl fmt::Debug for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.data) {
            Ok(s) => write!(f, "Slice(\"{s}\")"),
            Err(_) => write!(f, "Slice({:?})", self.data.as_ref()),
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match std::str::from_utf8(&self.data) {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "{:?}", self.data.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_creation() {
        let s1 = Slice::from("hello");
        assert_eq!(s1.size(), 5);
        assert_eq!(s1.data(), b"hello");
    }

    #[test]
    fn test_slice_compare() {
        let s1 = Slice::from("abc");
        let s2 = Slice::from("def");
        assert!(s1 < s2);
        assert_eq!(s1.compare(&s2), Ordering::Less);
    }

    #[test]
    fn test_slice_empty() {
        let s = Slice::empty();
        assert!(s.is_empty());
        assert_eq!(s.size(), 0);
    }

    #[test]
    fn test_sub_slice_shares_buffer() {
        let s = Slice::from("hello world");
        let head = s.sub_slice(..5);
        assert_eq!(head, Slice::from("hello"));
        assert_eq!(head.data().as_ptr(), s.data().as_ptr());

        let copy = head.deep_copy();
        assert_eq!(copy, head);
        assert_ne!(copy.data().as_ptr(), s.data().as_ptr());
    }

    #[test]
    fn test_slice_starts_with() {
        let s = Slice::from("hello world");
        let prefix = Slice::from("hello");
        assert!(s.starts_with(&prefix));
    }
}
