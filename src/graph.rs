//! Borrowed temporal adjacency view.

use crate::edge::Timestamp;

/// Neighbors a node interacted with at one instant, in arrival order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBucket<T> {
    pub time: T,
    pub neighbors: Vec<usize>,
}

/// A temporal graph view that returns **borrowed** time buckets.
///
/// Walks are generic over this trait so that a step never clones a node's
/// adjacency.
pub trait TemporalGraphRef {
    type Time: Timestamp;

    /// Outgoing buckets of `node`, sorted by ascending time.
    ///
    /// Requirements:
    /// - bucket times are strictly increasing
    /// - every bucket is non-empty
    /// - nodes with no outgoing edges return an empty slice
    fn buckets_ref(&self, node: usize) -> &[TimeBucket<Self::Time>];

    /// Buckets of `node` whose time is `>= time`.
    fn buckets_from(&self, node: usize, time: Self::Time) -> &[TimeBucket<Self::Time>] {
        let buckets = self.buckets_ref(node);
        let start = buckets.partition_point(|b| b.time < time);
        &buckets[start..]
    }

    fn out_degree(&self, node: usize) -> usize {
        self.buckets_ref(node).iter().map(|b| b.neighbors.len()).sum()
    }
}
