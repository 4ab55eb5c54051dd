use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, instrument};

use crate::error::EmptyTreeError;
use crate::interval::Interval;
use crate::node::Node;

/// How overlap queries walk the tree.
///
/// Both strategies return exactly the same intervals; they only differ in how many
/// nodes get visited.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// Visit every node.
    #[default]
    Exhaustive,
    /// Skip any subtree whose max end-point is not past the query's start.
    Pruned,
}

/// An unbalanced interval tree of half-open [`Interval`]s.
///
/// Each node caches the greatest end-point found in its subtree. New intervals are
/// routed left when they end before the visited node starts, and right otherwise.
/// The tree is never rebalanced and intervals cannot be removed.
///
/// ```
/// use overlap_interval_tree::{Interval, IntervalTree};
///
/// let mut tree = IntervalTree::new();
/// tree.insert(Interval::new(10, 20).unwrap());
/// tree.insert(Interval::new(0, 5).unwrap());
/// tree.insert(Interval::new(25, 30).unwrap());
///
/// assert!(tree.overlaps(&Interval::new(4, 11).unwrap()));
/// assert!(!tree.overlaps(&Interval::new(20, 25).unwrap()));
/// assert_eq!(tree.find_overlap(&Interval::new(4, 11).unwrap()).len(), 2);
/// ```
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        from = "SerializedTree<K>",
        bound(deserialize = "K: Deserialize<'de> + Ord + Clone")
    )
)]
#[derive(Clone, PartialEq)]
pub struct IntervalTree<K> {
    root: Option<Box<Node<K>>>,
    size: usize,
    strategy: SearchStrategy,
}

impl<K> fmt::Display for IntervalTree<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.root {
            Some(ref root) => write!(f, "{}", root),
            None => write!(f, "Empty tree"),
        }
    }
}

impl<K> fmt::Debug for IntervalTree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("IntervalTree")
            .field("strategy", &self.strategy)
            .field("intervals", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<K> Default for IntervalTree<K> {
    fn default() -> IntervalTree<K> {
        IntervalTree {
            root: None,
            size: 0,
            strategy: SearchStrategy::default(),
        }
    }
}

impl<K> IntervalTree<K> {
    /// Creates an empty tree searching with [`SearchStrategy::Exhaustive`].
    pub fn new() -> IntervalTree<K> {
        IntervalTree::default()
    }

    /// Creates an empty tree searching with `strategy`.
    pub fn with_strategy(strategy: SearchStrategy) -> IntervalTree<K> {
        IntervalTree {
            strategy,
            ..IntervalTree::default()
        }
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Changes the search strategy. Query results are unaffected.
    pub fn set_strategy(&mut self, strategy: SearchStrategy) {
        self.strategy = strategy;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of intervals stored, duplicates included.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Inserts `interval`. Duplicates are kept as separate nodes.
    ///
    /// ```
    /// use overlap_interval_tree::{Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// assert!(tree.is_empty());
    ///
    /// tree.insert(Interval::new(1, 2).unwrap());
    /// assert!(!tree.is_empty());
    /// assert_eq!(tree.len(), 1);
    /// ```
    #[instrument(level = "trace", skip_all, fields(size = self.size))]
    pub fn insert(&mut self, interval: Interval<K>)
    where
        K: Ord + Clone,
    {
        match self.root {
            Some(ref mut root) => root.insert(interval),
            None => {
                debug!("creating root node");
                self.root = Some(Box::new(Node::new(interval)));
            }
        }
        self.size += 1;
    }

    /// Returns the interval held by the leftmost node.
    ///
    /// Which interval that is depends on the insertion history; it is not always the
    /// one with the smallest start.
    pub fn min(&self) -> Result<&Interval<K>, EmptyTreeError> {
        self.root.as_ref().map(|root| root.min()).ok_or(EmptyTreeError)
    }

    /// Returns the interval held by the rightmost node.
    ///
    /// ```
    /// use overlap_interval_tree::{EmptyTreeError, Interval, IntervalTree};
    ///
    /// let mut tree = IntervalTree::new();
    /// assert_eq!(tree.max(), Err(EmptyTreeError));
    ///
    /// tree.insert(Interval::new(10, 20).unwrap());
    /// tree.insert(Interval::new(30, 40).unwrap());
    /// assert_eq!(tree.max(), Ok(&Interval::new(30, 40).unwrap()));
    /// ```
    pub fn max(&self) -> Result<&Interval<K>, EmptyTreeError> {
        self.root.as_ref().map(|root| root.max()).ok_or(EmptyTreeError)
    }

    /// Whether any stored interval overlaps `query`.
    pub fn overlaps(&self, query: &Interval<K>) -> bool
    where
        K: Ord,
    {
        self.iter_overlaps(query).next().is_some()
    }

    /// Returns every stored interval overlapping `query`, in no particular order.
    ///
    /// ```
    /// use overlap_interval_tree::{Interval, IntervalTree};
    ///
    /// let tree: IntervalTree<_> = [(0, 5), (5, 10), (8, 12)]
    ///     .into_iter()
    ///     .map(|(s, e)| Interval::new(s, e).unwrap())
    ///     .collect();
    ///
    /// let mut found = tree.find_overlap(&Interval::new(4, 9).unwrap());
    /// found.sort_by_key(|i| *i.start());
    /// assert_eq!(
    ///     found,
    ///     vec![
    ///         &Interval::new(0, 5).unwrap(),
    ///         &Interval::new(5, 10).unwrap(),
    ///         &Interval::new(8, 12).unwrap(),
    ///     ]
    /// );
    /// ```
    pub fn find_overlap(&self, query: &Interval<K>) -> Vec<&Interval<K>>
    where
        K: Ord,
    {
        self.iter_overlaps(query).collect()
    }

    /// Lazily yields the stored intervals overlapping `query`.
    ///
    /// Yields the same intervals as [`IntervalTree::find_overlap`] without
    /// materializing them up front.
    pub fn iter_overlaps<'a, 'q>(&'a self, query: &'q Interval<K>) -> Overlaps<'a, 'q, K> {
        Overlaps {
            stack: self.root.as_deref().into_iter().collect(),
            query,
            strategy: self.strategy,
        }
    }

    /// Iterates over all stored intervals in pre-order: every node before its left
    /// subtree, and the left subtree before the right one.
    ///
    /// Re-inserting the yielded intervals, in order, into an empty tree rebuilds the
    /// same shape.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }
}

impl<K> Extend<Interval<K>> for IntervalTree<K>
where
    K: Ord + Clone,
{
    fn extend<I: IntoIterator<Item = Interval<K>>>(&mut self, iter: I) {
        for interval in iter {
            self.insert(interval);
        }
    }
}

impl<K> FromIterator<Interval<K>> for IntervalTree<K>
where
    K: Ord + Clone,
{
    fn from_iter<I: IntoIterator<Item = Interval<K>>>(iter: I) -> IntervalTree<K> {
        let mut tree = IntervalTree::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, K> IntoIterator for &'a IntervalTree<K> {
    type Item = &'a Interval<K>;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

/// Pre-order iterator over a tree's intervals. See [`IntervalTree::iter`].
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> fmt::Debug for Iter<'a, K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Iter")
            .field("pending", &self.stack.len())
            .finish()
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a Interval<K>;

    fn next(&mut self) -> Option<&'a Interval<K>> {
        let node = self.stack.pop()?;
        if let Some(right) = node.right.as_deref() {
            self.stack.push(right);
        }
        if let Some(left) = node.left.as_deref() {
            self.stack.push(left);
        }
        Some(&node.interval)
    }
}

/// Lazy overlap search. See [`IntervalTree::iter_overlaps`].
pub struct Overlaps<'a, 'q, K> {
    stack: Vec<&'a Node<K>>,
    query: &'q Interval<K>,
    strategy: SearchStrategy,
}

impl<'a, 'q, K> fmt::Debug for Overlaps<'a, 'q, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Overlaps")
            .field("query", self.query)
            .field("strategy", &self.strategy)
            .field("pending", &self.stack.len())
            .finish()
    }
}

impl<'a, 'q, K> Iterator for Overlaps<'a, 'q, K>
where
    K: Ord,
{
    type Item = &'a Interval<K>;

    fn next(&mut self) -> Option<&'a Interval<K>> {
        while let Some(node) = self.stack.pop() {
            if !node.may_overlap(self.query, self.strategy) {
                continue;
            }
            if let Some(right) = node.right.as_deref() {
                self.stack.push(right);
            }
            if let Some(left) = node.left.as_deref() {
                self.stack.push(left);
            }
            if node.interval.overlaps(self.query) {
                return Some(&node.interval);
            }
        }
        None
    }
}

// Wire form of a tree: its search strategy and its intervals in pre-order.
// Deserializing re-inserts them, which rebuilds the subtree maxima.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(bound(deserialize = "K: Deserialize<'de> + Ord"))]
struct SerializedTree<K> {
    strategy: SearchStrategy,
    intervals: Vec<Interval<K>>,
}

#[cfg(feature = "serde")]
#[derive(Serialize)]
struct SerializedTreeRef<'a, K> {
    strategy: SearchStrategy,
    intervals: Vec<&'a Interval<K>>,
}

#[cfg(feature = "serde")]
impl<K> From<SerializedTree<K>> for IntervalTree<K>
where
    K: Ord + Clone,
{
    fn from(serialized: SerializedTree<K>) -> IntervalTree<K> {
        let mut tree = IntervalTree::with_strategy(serialized.strategy);
        tree.extend(serialized.intervals);
        tree
    }
}

#[cfg(feature = "serde")]
impl<K> Serialize for IntervalTree<K>
where
    K: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        SerializedTreeRef {
            strategy: self.strategy,
            intervals: self.iter().collect(),
        }
        .serialize(serializer)
    }
}
