pub mod slice;
pub mod slice_transform;
pub mod status;

pub use slice::Slice;
pub use slice_transform::{FixedPrefixTransform, SliceTransform};
pub use status::{Code, Result, Status};
