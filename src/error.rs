use thiserror::Error;

/// Reasons an [`Interval`](crate::Interval) cannot be built.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalError {
    /// The start point comes after the end point.
    #[error("interval start comes after its end")]
    InvalidRange,
    /// The start point equals the end point.
    #[error("interval start equals its end")]
    DegenerateRange,
}

/// Returned by [`IntervalTree::min`](crate::IntervalTree::min) and
/// [`IntervalTree::max`](crate::IntervalTree::max) when the tree holds nothing.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[error("interval tree is empty")]
pub struct EmptyTreeError;
