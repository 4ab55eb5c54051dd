use std::fmt;

use tracing::trace;

use crate::interval::Interval;
use crate::interval_tree::SearchStrategy;

// The tree is never rebalanced, so a node chain can be as long as the tree itself.
// Every walk below uses a loop or an explicit stack instead of recursion.
pub(crate) struct Node<K> {
    pub interval: Interval<K>,
    pub subtree_max: K, // Max end-point over this node and its descendants.
    pub left: Option<Box<Node<K>>>,
    pub right: Option<Box<Node<K>>>,
}

enum DumpStep<'a, K> {
    Node(&'a Node<K>),
    Text(&'static str),
}

impl<K> fmt::Display for Node<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut steps = vec![DumpStep::Node(self)];
        while let Some(step) = steps.pop() {
            match step {
                DumpStep::Text(text) => write!(f, "{}", text)?,
                DumpStep::Node(node) => {
                    write!(f, " {{ {} ({})", node.interval, node.subtree_max)?;
                    steps.push(DumpStep::Text("} "));
                    if let Some(right) = node.right.as_deref() {
                        steps.push(DumpStep::Node(right));
                        steps.push(DumpStep::Text(" right:"));
                    }
                    if let Some(left) = node.left.as_deref() {
                        steps.push(DumpStep::Node(left));
                        steps.push(DumpStep::Text(" left:"));
                    }
                }
            }
        }
        Ok(())
    }
}

impl<K> Clone for Node<K>
where
    K: Clone,
{
    fn clone(&self) -> Node<K> {
        // Node, right, left order, reversed: children always come before their parent.
        let mut order = Vec::new();
        let mut pending: Vec<&Node<K>> = Vec::new();
        pending.extend(self.left.as_deref());
        pending.extend(self.right.as_deref());
        while let Some(node) = pending.pop() {
            order.push(node);
            pending.extend(node.left.as_deref());
            pending.extend(node.right.as_deref());
        }

        let mut built: Vec<Box<Node<K>>> = Vec::new();
        for node in order.into_iter().rev() {
            let copy = node.shallow_clone(&mut built);
            built.push(Box::new(copy));
        }
        self.shallow_clone(&mut built)
    }
}

impl<K> Node<K>
where
    K: Clone,
{
    // Copies this node, taking its already cloned children off the top of `built`.
    fn shallow_clone(&self, built: &mut Vec<Box<Node<K>>>) -> Node<K> {
        let right = if self.right.is_some() { built.pop() } else { None };
        let left = if self.left.is_some() { built.pop() } else { None };
        Node {
            interval: self.interval.clone(),
            subtree_max: self.subtree_max.clone(),
            left,
            right,
        }
    }
}

impl<K> PartialEq for Node<K>
where
    K: PartialEq,
{
    fn eq(&self, other: &Node<K>) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.interval != b.interval || a.subtree_max != b.subtree_max {
                return false;
            }
            for (x, y) in [(&a.left, &b.left), (&a.right, &b.right)] {
                match (x.as_deref(), y.as_deref()) {
                    (None, None) => {}
                    (Some(x), Some(y)) => pending.push((x, y)),
                    _ => return false,
                }
            }
        }
        true
    }
}

impl<K> Drop for Node<K> {
    fn drop(&mut self) {
        // Detach descendants so each box is dropped childless.
        let mut pending: Vec<Box<Node<K>>> = Vec::new();
        pending.extend(self.left.take());
        pending.extend(self.right.take());
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl<K> Node<K> {
    pub fn new(interval: Interval<K>) -> Node<K>
    where
        K: Clone,
    {
        let max = interval.end().clone();

        Node {
            interval,
            subtree_max: max,
            left: None,
            right: None,
        }
    }

    /// Inserts `interval` below this node.
    ///
    /// An interval whose end comes before a node's start goes left; everything else,
    /// including intervals that start earlier but reach into that node, goes right.
    /// Subtree maxima only grow, so every node on the path is raised on the way down.
    pub fn insert(&mut self, interval: Interval<K>)
    where
        K: Ord + Clone,
    {
        let mut node = self;
        let mut depth = 1usize;
        loop {
            node.maybe_update_subtree_max(interval.end());
            let child = if interval.end() < node.interval.start() {
                &mut node.left
            } else {
                &mut node.right
            };

            match child {
                Some(next) => {
                    node = &mut **next;
                    depth += 1;
                }
                None => {
                    *child = Some(Box::new(Node::new(interval)));
                    trace!(depth, "inserted leaf");
                    return;
                }
            }
        }
    }

    pub fn maybe_update_subtree_max(&mut self, inserted_end: &K)
    where
        K: Ord + Clone,
    {
        if self.subtree_max < *inserted_end {
            self.subtree_max = inserted_end.clone();
        }
    }

    /// Whether this subtree has to be visited at all when looking for `query`.
    ///
    /// Under [`SearchStrategy::Pruned`], a subtree whose max end-point is not past
    /// `query.start` cannot hold an overlapping interval.
    pub fn may_overlap(&self, query: &Interval<K>, strategy: SearchStrategy) -> bool
    where
        K: Ord,
    {
        match strategy {
            SearchStrategy::Exhaustive => true,
            SearchStrategy::Pruned => {
                let visit = *query.start() < self.subtree_max;
                if !visit {
                    trace!("pruning subtree");
                }
                visit
            }
        }
    }

    /// Interval of the leftmost node.
    pub fn min(&self) -> &Interval<K> {
        let mut curr = self;
        while let Some(left) = &curr.left {
            curr = left;
        }
        &curr.interval
    }

    /// Interval of the rightmost node. This is not necessarily the interval with
    /// the greatest end-point.
    pub fn max(&self) -> &Interval<K> {
        let mut curr = self;
        while let Some(right) = &curr.right {
            curr = right;
        }
        &curr.interval
    }
}
