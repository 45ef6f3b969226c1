use crate::util::Slice;

/// Maps a user key to the prefix used by prefix-bounded scans.
///
/// With `ReadOptions::prefix_same_as_start`, a cursor stops as soon as the
/// prefix of the key it would expose differs from the prefix of the key it
/// was positioned at.
pub trait SliceTransform: Send + Sync {
    fn name(&self) -> &str;

    /// Extract the prefix of `key`. The result must be a prefix of `key`.
    fn transform(&self, key: &Slice) -> Slice;

    /// Whether `key` has a well-defined prefix under this transform.
    fn in_domain(&self, _key: &Slice) -> bool {
        true
    }
}

/// Uses the first `len` bytes of a key as its prefix.
///
/// Keys shorter than `len` are their own prefix.
pub struct FixedPrefixTransform {
    len: usize,
    name: String,
}

impl FixedPrefixTransform {
    pub fn new(len: usize) -> Self {
        FixedPrefixTransform {
            len,
            name: format!("lsmiter.FixedPrefix.{len}"),
        }
    }
}

impl SliceTransform for FixedPrefixTransform {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, key: &Slice) -> Slice {
        key.sub_slice(..self.len.min(key.size()))
    }

    fn in_domain(&self, key: &Slice) -> bool {
        key.size() >= self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_prefix() {
        let t = FixedPrefixTransform::new(3);
        assert_eq!(t.name(), "lsmiter.FixedPrefix.3");
        assert_eq!(t.transform(&Slice::from("abcdef")), Slice::from("abc"));
        assert_eq!(t.transform(&Slice::from("ab")), Slice::from("ab"));
        assert!(t.in_domain(&Slice::from("abc")));
        assert!(!t.in_domain(&Slice::from("ab")));
    }
}
