//! Stream graph: node -> time -> neighbors, built once from temporal edges.

use crate::edge::{TemporalEdge, Timestamp};
use crate::error::{Error, Result};
use crate::graph::{TemporalGraphRef, TimeBucket};
use crate::numeric::sample_index;
use crate::sampling::SamplingDistribution;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

/// An immutable stream graph `S = (V, E^T, T)`.
///
/// Each source node owns a time-sorted list of [`TimeBucket`]s; within a
/// bucket, neighbors keep the order their edges arrived in. Only outgoing
/// adjacency is recorded: callers wanting an undirected view ingest both
/// `(u, v, t)` and `(v, u, t)` (see [`crate::source::force_undirected`]).
#[derive(Debug, Clone)]
pub struct StreamGraph<T> {
    adjacency: BTreeMap<usize, Vec<TimeBucket<T>>>,
    /// Flattened edges, stably sorted by time.
    by_time: Vec<TemporalEdge<T>>,
    number_of_edges: usize,
}

impl<T: Timestamp> StreamGraph<T> {
    /// Index `edges`. Fails on the first edge whose time is not comparable (NaN).
    pub fn build<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = TemporalEdge<T>>,
    {
        let mut staged: BTreeMap<usize, Vec<(T, usize)>> = BTreeMap::new();
        let mut number_of_edges = 0usize;

        for (index, edge) in edges.into_iter().enumerate() {
            if !edge.time.is_comparable() {
                return Err(Error::MalformedEdge {
                    index,
                    reason: format!(
                        "time {} of edge {} -> {} is not comparable",
                        edge.time, edge.source, edge.destination
                    ),
                });
            }
            staged.entry(edge.source).or_default().push((edge.time, edge.destination));
            number_of_edges += 1;
        }

        let adjacency: BTreeMap<usize, Vec<TimeBucket<T>>> = staged
            .into_iter()
            .map(|(node, mut events)| {
                // Stable: arrival order survives inside each bucket.
                events.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
                let mut buckets: Vec<TimeBucket<T>> = Vec::new();
                for (time, destination) in events {
                    match buckets.last_mut() {
                        Some(bucket) if bucket.time == time => bucket.neighbors.push(destination),
                        _ => buckets.push(TimeBucket { time, neighbors: vec![destination] }),
                    }
                }
                (node, buckets)
            })
            .collect();

        let mut by_time = flatten(&adjacency, number_of_edges);
        by_time.sort_by(|a, b| a.time.partial_cmp(&b.time).unwrap_or(Ordering::Equal));

        debug!(
            nodes = adjacency.len(),
            edges = number_of_edges,
            "built stream graph"
        );

        Ok(Self { adjacency, by_time, number_of_edges })
    }

    /// [`StreamGraph::build`] from plain `(source, destination, time)` triples.
    pub fn from_triples<I>(triples: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize, T)>,
    {
        Self::build(triples.into_iter().map(TemporalEdge::from))
    }

    /// Distinct nodes seen as an edge source.
    ///
    /// A node that only ever appears as a destination is not counted.
    pub fn number_of_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of triples ingested, duplicates included.
    pub fn number_of_edges(&self) -> usize {
        self.number_of_edges
    }

    pub fn is_empty(&self) -> bool {
        self.number_of_edges == 0
    }

    /// Whether `node` has at least one outgoing edge.
    pub fn contains_node(&self, node: usize) -> bool {
        self.adjacency.contains_key(&node)
    }

    /// Times at which `node` has outgoing neighbors, ascending.
    pub fn times(&self, node: usize) -> impl Iterator<Item = T> + '_ {
        self.buckets_ref(node).iter().map(|b| b.time)
    }

    /// Neighbors of `node` at exactly `time`, in arrival order.
    pub fn neighbors_at(&self, node: usize, time: T) -> Option<&[usize]> {
        let buckets = self.buckets_ref(node);
        let i = buckets.partition_point(|b| b.time < time);
        buckets
            .get(i)
            .filter(|b| b.time == time)
            .map(|b| b.neighbors.as_slice())
    }

    /// Earliest and latest edge time, `None` when the graph is empty.
    pub fn time_bounds(&self) -> Option<(T, T)> {
        Some((self.by_time.first()?.time, self.by_time.last()?.time))
    }

    /// Flatten back into triples.
    ///
    /// Unsorted order is by source node, then time, then arrival. With
    /// `sort_by_time` the output is stably sorted by time only, so equal-time
    /// edges keep their flattened order.
    pub fn edges(&self, sort_by_time: bool) -> Vec<TemporalEdge<T>> {
        if sort_by_time {
            self.by_time.clone()
        } else {
            flatten(&self.adjacency, self.number_of_edges)
        }
    }

    /// Draw one edge in two stages: a timestamp weighted by `distribution`
    /// (one key per edge, so a time carried by `k` edges gets `k` entries), then
    /// a uniform pick among the edges at that timestamp.
    pub fn sample_edge<D, R>(&self, distribution: &D, reverse: bool, rng: &mut R) -> Result<TemporalEdge<T>>
    where
        D: SamplingDistribution + ?Sized,
        R: Rng,
    {
        let edges = &self.by_time;
        let Some(origin) = edges.first().map(|e| e.time) else {
            return Err(Error::EmptyGraph);
        };

        // Shift by the earliest time so integer keys stay exact as f64.
        let keys: Vec<f64> = edges.iter().map(|e| e.time.delta(origin)).collect();
        let probs = distribution.compute_distribution(&keys, reverse);
        let drawn = sample_index(rng, &probs).ok_or(Error::EmptyGraph)?;
        let sampled_time = edges[drawn].time;

        let start = edges.partition_point(|e| e.time < sampled_time);
        let end = edges.partition_point(|e| e.time <= sampled_time);
        let pick = rng.random_range(start..end);
        Ok(edges[pick])
    }
}

fn flatten<T: Timestamp>(adjacency: &BTreeMap<usize, Vec<TimeBucket<T>>>, capacity: usize) -> Vec<TemporalEdge<T>> {
    let mut edges = Vec::with_capacity(capacity);
    for (&node, buckets) in adjacency {
        for bucket in buckets {
            for &neighbor in &bucket.neighbors {
                edges.push(TemporalEdge::new(node, neighbor, bucket.time));
            }
        }
    }
    edges
}

impl<T: Timestamp> TemporalGraphRef for StreamGraph<T> {
    type Time = T;

    fn buckets_ref(&self, node: usize) -> &[TimeBucket<T>] {
        self.adjacency.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{Linear, Uniform};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn example() -> StreamGraph<i64> {
        StreamGraph::from_triples([(0, 1, 10), (1, 2, 10), (1, 2, 15), (2, 0, 20)]).unwrap()
    }

    #[test]
    fn counts_match_input() {
        let g = example();
        assert_eq!(g.number_of_nodes(), 3);
        assert_eq!(g.number_of_edges(), 4);
    }

    #[test]
    fn duplicate_triples_are_counted_and_kept() {
        let g = StreamGraph::from_triples([(0, 1, 5i64), (0, 1, 5), (0, 2, 5)]).unwrap();
        assert_eq!(g.number_of_edges(), 3);
        assert_eq!(g.neighbors_at(0, 5), Some(&[1, 1, 2][..]));
    }

    #[test]
    fn destination_only_nodes_are_not_counted() {
        // Node 9 only ever receives edges.
        let g = StreamGraph::from_triples([(0, 9, 1i64), (1, 9, 2)]).unwrap();
        assert_eq!(g.number_of_nodes(), 2);
        assert!(!g.contains_node(9));
        assert_eq!(g.out_degree(9), 0);
    }

    #[test]
    fn buckets_keep_arrival_order_and_sort_times() {
        let g = StreamGraph::from_triples([(0, 3, 20i64), (0, 2, 10), (0, 1, 20), (0, 4, 10)]).unwrap();
        assert_eq!(g.times(0).collect::<Vec<_>>(), vec![10, 20]);
        assert_eq!(g.neighbors_at(0, 10), Some(&[2, 4][..]));
        assert_eq!(g.neighbors_at(0, 20), Some(&[3, 1][..]));
        assert_eq!(g.neighbors_at(0, 15), None);
        assert_eq!(g.neighbors_at(7, 10), None);
    }

    #[test]
    fn buckets_from_filters_past_times() {
        let g = example();
        let future: Vec<i64> = g.buckets_from(1, 11).iter().map(|b| b.time).collect();
        assert_eq!(future, vec![15]);
        assert!(g.buckets_from(2, 21).is_empty());
        assert_eq!(g.buckets_from(1, 10).len(), 2);
    }

    #[test]
    fn nan_time_is_rejected() {
        let err = StreamGraph::from_triples([(0, 1, 1.0f64), (1, 2, f64::NAN)]).unwrap_err();
        assert!(matches!(err, Error::MalformedEdge { index: 1, .. }));
    }

    #[test]
    fn sorted_edges_are_stable_on_ties() {
        let g = StreamGraph::from_triples([(2, 0, 1i64), (0, 1, 1), (1, 2, 0)]).unwrap();
        let sorted: Vec<_> = g.edges(true).iter().map(TemporalEdge::as_tuple).collect();
        // Flattening visits node 0 before node 2, and the time sort keeps that.
        assert_eq!(sorted, vec![(1, 2, 0), (0, 1, 1), (2, 0, 1)]);
        assert_eq!(g.edges(false).len(), 3);
    }

    #[test]
    fn cached_time_order_matches_fresh_sort() {
        let g = StreamGraph::from_triples([(3, 0, 7i64), (0, 1, 9), (1, 2, 7), (0, 2, 7), (2, 1, 1)]).unwrap();
        let mut fresh = g.edges(false);
        fresh.sort_by(|a, b| a.time.cmp(&b.time));
        assert_eq!(g.edges(true), fresh);
        // Repeated sampling reads the same cached order.
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for _ in 0..50 {
            let e = g.sample_edge(&Uniform, false, &mut rng).unwrap();
            assert!(fresh.contains(&e));
        }
        assert_eq!(g.edges(true), fresh);
    }

    #[test]
    fn time_bounds_span_all_nodes() {
        assert_eq!(example().time_bounds(), Some((10, 20)));
        let empty = StreamGraph::<i64>::from_triples(Vec::<(usize, usize, i64)>::new()).unwrap();
        assert_eq!(empty.time_bounds(), None);
        assert!(empty.is_empty());
    }

    #[test]
    fn sample_edge_on_empty_graph_fails() {
        let g = StreamGraph::<u64>::build(Vec::<TemporalEdge<u64>>::new()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(g.sample_edge(&Uniform, false, &mut rng), Err(Error::EmptyGraph)));
    }

    #[test]
    fn sample_edge_returns_an_ingested_edge() {
        let g = example();
        let all = g.edges(false);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let e = g.sample_edge(&Linear, false, &mut rng).unwrap();
            assert!(all.contains(&e));
        }
    }

    #[test]
    fn sample_edge_time_mass_scales_with_edge_count() {
        // Time 1 carries three edges, time 2 one edge. Under uniform weights
        // time 1 should be drawn ~3/4 of the time.
        let g = StreamGraph::from_triples([(0, 1, 1i64), (1, 2, 1), (2, 3, 1), (3, 0, 2)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let trials = 8_000;
        let at_one = (0..trials)
            .filter(|_| g.sample_edge(&Uniform, false, &mut rng).unwrap().time == 1)
            .count();
        let frac = at_one as f64 / trials as f64;
        assert!((frac - 0.75).abs() < 0.03, "fraction at t=1 was {frac}");
    }

    #[test]
    fn sample_edge_is_uniform_among_equal_times() {
        // Three edges share t=1; each should take ~1/3 of the draws landing there.
        let g = StreamGraph::from_triples([(0, 1, 1i64), (1, 2, 1), (2, 3, 1), (3, 0, 2)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(29);
        let mut counts = [0usize; 3];
        let mut at_one = 0usize;
        for _ in 0..12_000 {
            let e = g.sample_edge(&Linear, false, &mut rng).unwrap();
            if e.time == 1 {
                at_one += 1;
                counts[e.source] += 1;
            }
        }
        for c in counts {
            let frac = c as f64 / at_one as f64;
            assert!((frac - 1.0 / 3.0).abs() < 0.03, "counts={counts:?} of {at_one}");
        }
    }

    #[test]
    fn linear_edge_sampling_favors_late_times() {
        // Ranks: t=1 -> 1, t=2 -> 2 => late edge drawn ~2/3 of the time.
        let g = StreamGraph::from_triples([(0, 1, 1i64), (1, 0, 2)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let trials = 9_000;
        let late = (0..trials)
            .filter(|_| g.sample_edge(&Linear, false, &mut rng).unwrap().time == 2)
            .count();
        let frac = late as f64 / trials as f64;
        assert!((frac - 2.0 / 3.0).abs() < 0.03, "fraction at t=2 was {frac}");

        let early = (0..trials)
            .filter(|_| g.sample_edge(&Linear, true, &mut rng).unwrap().time == 1)
            .count();
        let frac = early as f64 / trials as f64;
        assert!((frac - 2.0 / 3.0).abs() < 0.03, "reverse fraction at t=1 was {frac}");
    }
}
