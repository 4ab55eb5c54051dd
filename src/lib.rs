//! Implementation of an interval tree ([`IntervalTree`]) over half-open intervals
//! `[start, end)`. Each node of the binary search tree caches the greatest end-point
//! of its subtree, as in the augmented tree described in Cormen et al.
//! (2009, Section 14.3: Interval trees, pp. 348–354). It answers "does any stored
//! interval overlap this one?" and "which stored intervals overlap this one?", and
//! gives access to the leftmost and rightmost stored intervals.
//!
//! Any type satisfying the [`Ord`] trait can be used as a time point: integers,
//! `chrono` timestamps, dates...
//!
//! The tree is deliberately simple: it is never rebalanced and intervals cannot be
//! removed. It is not synchronized either; wrap it in a lock to share it across
//! threads.

mod error;
mod interval;
/// An interval tree implemented with an unbalanced binary search tree.
pub mod interval_tree;
mod node;

pub use error::{EmptyTreeError, IntervalError};
pub use interval::{overlaps, Interval};
pub use interval_tree::{IntervalTree, SearchStrategy};
