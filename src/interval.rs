use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::IntervalError;

/// A non-empty half-open interval `[start, end)`.
///
/// The only way to get one is through [`Interval::new`], which rejects inverted and
/// zero-length ranges. Intervals are never mutated afterwards, so `start < end` holds
/// for as long as the value exists.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "RawInterval<K>",
        bound(deserialize = "K: Deserialize<'de> + Ord")
    )
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Interval<K> {
    start: K,
    end: K,
}

impl<K> Interval<K>
where
    K: Ord,
{
    /// Builds the interval `[start, end)`.
    ///
    /// ```
    /// use overlap_interval_tree::{Interval, IntervalError};
    ///
    /// assert!(Interval::new(1, 5).is_ok());
    /// assert_eq!(Interval::new(5, 1), Err(IntervalError::InvalidRange));
    /// assert_eq!(Interval::new(3, 3), Err(IntervalError::DegenerateRange));
    /// ```
    pub fn new(start: K, end: K) -> Result<Interval<K>, IntervalError> {
        if start > end {
            Err(IntervalError::InvalidRange)
        } else if start == end {
            Err(IntervalError::DegenerateRange)
        } else {
            Ok(Interval { start, end })
        }
    }

    /// Whether `self` and `other` share at least one point.
    ///
    /// Intervals that only touch at an endpoint do not overlap, since `end` is
    /// excluded from each of them.
    pub fn overlaps(&self, other: &Interval<K>) -> bool {
        overlaps(self, other)
    }
}

impl<K> Interval<K> {
    /// Inclusive lower bound.
    pub fn start(&self) -> &K {
        &self.start
    }

    /// Exclusive upper bound.
    pub fn end(&self) -> &K {
        &self.end
    }

    /// Consumes the interval, returning `(start, end)`.
    pub fn into_inner(self) -> (K, K) {
        (self.start, self.end)
    }
}

/// Half-open overlap test: `a.start < b.end && a.end > b.start`.
///
/// Symmetric in its arguments.
pub fn overlaps<K>(a: &Interval<K>, b: &Interval<K>) -> bool
where
    K: Ord,
{
    a.start < b.end && a.end > b.start
}

impl<K> fmt::Display for Interval<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{},{}[", self.start, self.end)
    }
}

// Unchecked wire form. Deserialization goes through `Interval::new`.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawInterval<K> {
    start: K,
    end: K,
}

#[cfg(feature = "serde")]
impl<K> TryFrom<RawInterval<K>> for Interval<K>
where
    K: Ord,
{
    type Error = IntervalError;

    fn try_from(raw: RawInterval<K>) -> Result<Self, Self::Error> {
        Interval::new(raw.start, raw.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(start: i64, end: i64) -> Interval<i64> {
        Interval::new(start, end).unwrap()
    }

    #[test]
    fn construction_validates_range() {
        assert_eq!(Interval::new(3, 3), Err(IntervalError::DegenerateRange));
        assert_eq!(Interval::new(4, 2), Err(IntervalError::InvalidRange));

        let interval = Interval::new(2, 4).unwrap();
        assert_eq!(interval.start(), &2);
        assert_eq!(interval.end(), &4);
        assert_eq!(interval.into_inner(), (2, 4));
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let a = iv(1, 2);
        let b = iv(2, 3);

        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn contained_and_partial_intervals_overlap() {
        let outer = iv(0, 10);
        let inner = iv(3, 4);
        let partial = iv(8, 12);

        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
        assert!(outer.overlaps(&partial));
        assert!(outer.overlaps(&outer));
        assert!(!inner.overlaps(&partial));
    }

    #[test]
    fn overlap_is_symmetric() {
        let points = [-3, 0, 1, 2, 5, 7, 8];
        let mut intervals = vec![];
        for &s in points.iter() {
            for &e in points.iter().filter(|&&e| e > s) {
                intervals.push(iv(s, e));
            }
        }

        for a in intervals.iter() {
            for b in intervals.iter() {
                assert_eq!(
                    overlaps(a, b),
                    overlaps(b, a),
                    "asymmetric overlap between {} and {}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", iv(1, 5)), "[1,5[");
    }
}
