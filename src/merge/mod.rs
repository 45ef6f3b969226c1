use crate::{Result, Slice, Status};

/// Trait for implementing custom merge operators
///
/// A merge operator defines how to combine a base value with a sequence of
/// merge operands. This enables efficient atomic read-modify-write operations.
///
/// Operands are always passed **newest first**: `operands[0]` is the operand
/// with the highest sequence number, the last element is the one written
/// right after `existing_value`.
///
/// # Examples
///
/// ```ignore
/// struct CounterMerge;
///
/// impl MergeOperator for CounterMerge {
///     fn name(&self) -> &str {
///         "CounterMerge"
///     }
///
///     fn full_merge(&self, key: &Slice, existing_value: Option<&Slice>, operands: &[Slice]) -> Result<Slice> {
///         let mut sum = existing_value
///             .map(|v| parse_i64(v))
///             .transpose()?
///             .unwrap_or(0);
///
///         for operand in operands {
///             sum += parse_i64(operand)?;
///         }
///
///         Ok(Slice::from(sum.to_string()))
///     }
/// }
/// ```
pub trait MergeOperator: Send + Sync {
    /// Returns the name of this merge operator
    fn name(&self) -> &str;

    /// Combines a base value with a sequence of merge operands
    ///
    /// # Arguments
    /// * `key` - The key being merged
    /// * `existing_value` - The base value, `None` when the key had no value
    ///   below the operands (never written, or hidden by a tombstone)
    /// * `operands` - Merge operands, newest first
    ///
    /// # Returns
    /// The merged value, or an error if the merge cannot be performed. The
    /// reading cursor surfaces the error as `MergeOperatorFailed`.
    fn full_merge(
        &self,
        key: &Slice,
        existing_value: Option<&Slice>,
        operands: &[Slice],
    ) -> Result<Slice>;

    /// Optional: Combines adjacent merge operands (newest first) into one
    ///
    /// Returning `None` means the operands cannot be combined without a base.
    fn partial_merge(&self, _key: &Slice, operands: &[Slice]) -> Option<Slice> {
        if operands.len() == 1 {
            Some(operands[0].clone())
        } else {
            None
        }
    }
}

fn parse_i64(v: &Slice) -> Result<i64> {
    std::str::from_utf8(v.data())
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .ok_or_else(|| Status::invalid_argument(format!("not an integer: {v:?}")))
}

/// Built-in merge operator for integer counters
///
/// Interprets values and operands as decimal i64 integers and adds them.
/// A value or operand that does not parse fails the merge.
pub struct CounterMerge;

impl MergeOperator for CounterMerge {
    fn name(&self) -> &str {
        "CounterMerge"
    }

    fn full_merge(
        &self,
        _key: &Slice,
        existing_value: Option<&Slice>,
        operands: &[Slice],
    ) -> Result<Slice> {
        let mut sum = existing_value.map(parse_i64).transpose()?.unwrap_or(0);

        for operand in operands {
            sum = sum.wrapping_add(parse_i64(operand)?);
        }

        Ok(Slice::from(sum.to_string()))
    }

    fn partial_merge(&self, _key: &Slice, operands: &[Slice]) -> Option<Slice> {
        if operands.is_empty() {
            return None;
        }

        let mut sum: i64 = 0;
        for operand in operands {
            sum = sum.wrapping_add(parse_i64(operand).ok()?);
        }

        Some(Slice::from(sum.to_string()))
    }
}

/// Built-in merge operator for appending strings
///
/// Appends operands to the existing value in write order, so the result
/// reads oldest to newest.
pub struct StringAppendMerge {
    delimiter: String,
}

impl StringAppendMerge {
    pub fn new(delimiter: impl Into<String>) -> Self {
        StringAppendMerge {
            delimiter: delimiter.into(),
        }
    }

    // An empty base or operand still takes a delimiter slot.
    fn join<'a>(&self, mut result: String, has_base: bool, parts: impl Iterator<Item = &'a Slice>) -> String {
        for (i, part) in parts.enumerate() {
            if has_base || i > 0 {
                result.push_str(&self.delimiter);
            }
            result.push_str(&String::from_utf8_lossy(part.data()));
        }
        result
    }
}

impl Default for StringAppendMerge {
    fn default() -> Self {
        StringAppendMerge::new("")
    }
}

impl MergeOperator for StringAppendMerge {
    fn name(&self) -> &str {
        "StringAppendMerge"
    }

    fn full_merge(
        &self,
        _key: &Slice,
        existing_value: Option<&Slice>,
        operands: &[Slice],
    ) -> Result<Slice> {
        let base = existing_value
            .map(|v| String::from_utf8_lossy(v.data()).into_owned())
            .unwrap_or_default();

        Ok(Slice::from(self.join(base, existing_value.is_some(), operands.iter().rev())))
    }

    fn partial_merge(&self, _key: &Slice, operands: &[Slice]) -> Option<Slice> {
        if operands.is_empty() {
            return None;
        }

        Some(Slice::from(self.join(String::new(), false, operands.iter().rev())))
    }
}
