//! Deferred random trees.
//!
//! A [`DeferredTree`] is an unbounded tree of independent random fractions
//! in `[0, 1)`. Each node resolves its fraction the first time it is
//! queried and keeps it for the lifetime of the tree; every query then
//! compares that fraction against the query's own parameters. Consequently:
//!
//! - the same query on the same node always gives the same answer,
//! - the scale of a query does not matter: `chance_test(1, 2)` and
//!   `chance_test(50, 100)` agree, and `random2(x) / x` is the same
//!   fraction for every `x` up to rounding,
//! - answers are monotonic: a larger ratio can only turn false into true.
//!
//! The fraction is stored as a lazily extended string of 32-bit digits.
//! Most queries are decided by the first digit; a query whose threshold
//! falls inside that digit's interval draws further digits until it is
//! decided, so comparisons are exact for every denominator.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. A parent maps
//! integer keys to child ids; children are created on demand and never
//! removed, and the whole tree is dropped as a unit. Every method taking a
//! [`NodeId`] panics if the id was not issued by that tree.

use std::collections::BTreeMap;

use delve_core::rng::BitSource;
use tracing::trace;

/// Handle to a node of one [`DeferredTree`].
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct DeferredNode {
    /// Base-2^32 digits of the fraction; empty while unresolved.
    digits: Vec<u32>,
    children: BTreeMap<i32, NodeId>,
}

/// An unbounded, lazily populated tree of stable random fractions.
#[derive(Debug)]
pub struct DeferredTree {
    nodes: Vec<DeferredNode>,
}

impl Default for DeferredTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DeferredTree {
    /// Creates a tree holding only an unresolved root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![DeferredNode::default()],
        }
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: NodeId) -> &DeferredNode {
        assert!(id.0 < self.nodes.len(), "node {} is not part of this tree", id.0);
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut DeferredNode {
        assert!(id.0 < self.nodes.len(), "node {} is not part of this tree", id.0);
        &mut self.nodes[id.0]
    }

    /// The child of `parent` at `key`, created unresolved if absent.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was issued by another tree.
    pub fn child(&mut self, parent: NodeId, key: i32) -> NodeId {
        if let Some(&id) = self.node(parent).children.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(DeferredNode::default());
        self.node_mut(parent).children.insert(key, id);
        id
    }

    /// The child of `parent` at `key`, if it has been created.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was issued by another tree.
    #[must_use]
    pub fn get_child(&self, parent: NodeId, key: i32) -> Option<NodeId> {
        self.node(parent).children.get(&key).copied()
    }

    /// Follows `keys` from the root, creating nodes as needed.
    pub fn path(&mut self, keys: &[i32]) -> NodeId {
        keys.iter()
            .fold(self.root(), |node, &key| self.child(node, key))
    }

    /// Whether `node` has fixed its fraction.
    ///
    /// # Panics
    ///
    /// Panics if `node` was issued by another tree.
    #[must_use]
    pub fn is_resolved(&self, node: NodeId) -> bool {
        !self.node(node).digits.is_empty()
    }

    /// The leading 64 bits of `node`'s fraction, or `None` while unresolved.
    ///
    /// # Panics
    ///
    /// Panics if `node` was issued by another tree.
    #[must_use]
    pub fn fraction(&self, node: NodeId) -> Option<f64> {
        let digits = &self.node(node).digits;
        let first = f64::from(*digits.first()?);
        let second = f64::from(digits.get(1).copied().unwrap_or(0));
        Some((first + second / 4_294_967_296.0) / 4_294_967_296.0)
    }

    /// Digit `index` of `node`'s fraction, drawing digits up to it if needed.
    fn digit<R: BitSource + ?Sized>(&mut self, node: NodeId, index: usize, rng: &mut R) -> u128 {
        let digits = &mut self.node_mut(node).digits;
        if digits.is_empty() {
            trace!(node = node.0, "resolving deferred node");
        }
        while digits.len() <= index {
            digits.push(rng.next_u32());
        }
        u128::from(digits[index])
    }

    /// Whether the fraction from digit `index` onwards is below `x / y`,
    /// for `0 < x <= y <= 2^32`.
    fn below_ratio<R: BitSource + ?Sized>(
        &mut self,
        node: NodeId,
        mut x: u128,
        y: u128,
        mut index: usize,
        rng: &mut R,
    ) -> bool {
        loop {
            if x >= y {
                return true;
            }
            // The digit places the fraction in [lo, lo + y) / (y << 32).
            let lo = self.digit(node, index, rng) * y;
            let hi = lo + y;
            let threshold = x << 32;
            if threshold <= lo {
                return false;
            }
            if hi <= threshold {
                return true;
            }
            // Threshold is inside this digit: compare the remaining digits.
            x = threshold - lo;
            index += 1;
        }
    }

    /// True iff `node`'s fraction is below `x / y`.
    ///
    /// Always false when `x <= 0` and always true when `x >= y`, without
    /// resolving the node.
    ///
    /// # Panics
    ///
    /// Panics if `node` was issued by another tree.
    pub fn chance_test<R: BitSource + ?Sized>(
        &mut self,
        node: NodeId,
        x: i32,
        y: i32,
        rng: &mut R,
    ) -> bool {
        if x <= 0 {
            return false;
        }
        if x >= y {
            return true;
        }
        self.below_ratio(node, x.unsigned_abs().into(), y.unsigned_abs().into(), 0, rng)
    }

    /// `chance_test(node, 1, n)`.
    ///
    /// # Panics
    ///
    /// Panics if `node` was issued by another tree.
    pub fn one_in<R: BitSource + ?Sized>(&mut self, node: NodeId, n: i32, rng: &mut R) -> bool {
        self.chance_test(node, 1, n, rng)
    }

    /// `floor(fraction * bound)` for `bound <= 2^32`; 0 when `bound <= 1`.
    fn below_bound<R: BitSource + ?Sized>(&mut self, node: NodeId, bound: u64, rng: &mut R) -> u64 {
        if bound <= 1 {
            return 0;
        }
        let bound = u128::from(bound);
        let lo = self.digit(node, 0, rng) * bound;
        let low_value = lo >> 32;
        let high_value = (lo + bound) >> 32;
        let picked = if low_value == high_value {
            low_value
        } else {
            // The digit straddles high_value / bound; later digits decide.
            let threshold = (high_value << 32) - lo;
            if self.below_ratio(node, threshold, bound, 1, rng) {
                low_value
            } else {
                high_value
            }
        };
        u64::try_from(picked).unwrap_or(u64::MAX)
    }

    /// `floor(fraction * max)`; 0 when `max <= 1`.
    ///
    /// # Panics
    ///
    /// Panics if `node` was issued by another tree.
    pub fn random2<R: BitSource + ?Sized>(&mut self, node: NodeId, max: i32, rng: &mut R) -> i32 {
        if max <= 1 {
            return 0;
        }
        let value = self.below_bound(node, u64::from(max.unsigned_abs()), rng);
        i32::try_from(value).unwrap_or(i32::MAX)
    }

    /// `low + floor(fraction * (high - low + 1))`, uniform over the whole
    /// inclusive range.
    ///
    /// # Panics
    ///
    /// Panics if `low > high` or `node` was issued by another tree.
    pub fn random_range<R: BitSource + ?Sized>(
        &mut self,
        node: NodeId,
        low: i32,
        high: i32,
        rng: &mut R,
    ) -> i32 {
        assert!(low <= high, "random_range: low {low} exceeds high {high}");
        let span = (i64::from(high) - i64::from(low) + 1).unsigned_abs();
        let offset = self.below_bound(node, span, rng);
        let value = i64::from(low) + i64::try_from(offset).unwrap_or(i64::MAX);
        i32::try_from(value).unwrap_or(high)
    }

    /// Truncated average of `rolls` draws taken from the children `0..rolls`
    /// of `node`: the first from `[0, max)`, the rest from `[0, max]`.
    ///
    /// Each draw lives on its own child, so the average is as stable under
    /// repeated queries as a single draw.
    ///
    /// # Panics
    ///
    /// Panics if `rolls < 1` or `node` was issued by another tree.
    pub fn random2avg<R: BitSource + ?Sized>(
        &mut self,
        node: NodeId,
        max: i32,
        rolls: i32,
        rng: &mut R,
    ) -> i32 {
        assert!(rolls >= 1, "random2avg: rolls must be positive, got {rolls}");
        let first = self.child(node, 0);
        let mut sum = i64::from(self.random2(first, max, rng));
        for i in 1..rolls {
            let child = self.child(node, i);
            sum += i64::from(self.random2(child, max.saturating_add(1), rng));
        }
        i32::try_from(sum / i64::from(rolls)).unwrap_or(i32::MAX)
    }
}
