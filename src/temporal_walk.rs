//! Time-respecting random walks over a stream graph.
//!
//! A walk starts from a seed edge `(u, v)` at time `t0` and repeatedly moves
//! from the current node `j` at time `t` to a neighbor recorded at some
//! `t' >= t`. The candidate times are weighted by the walk's distribution over
//! the deltas `t' - t` with `reverse = true`, so under the linear policy the
//! closest future event is the most likely one. Among the neighbors at the drawn
//! time, one is picked uniformly.
//!
//! Running out of future edges is a normal outcome: the walk comes back shorter
//! than requested and its [`Termination`] says why.

use crate::edge::{TemporalEdge, Timestamp};
use crate::error::{Error, Result};
use crate::graph::TemporalGraphRef;
use crate::numeric::sample_index;
use crate::sampling::{Distribution, SamplingDistribution, Strategy};
use crate::stream_graph::StreamGraph;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// Cap on up-front reservations: lengths and walk counts are user input.
const MAX_PREALLOC: usize = 64;

/// Parameters for temporal walk generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WalkConfig {
    /// Target walk length (in nodes), at least 2.
    pub length: usize,
    /// Policy used both for seed-edge sampling and for each step.
    pub strategy: Strategy,
    /// Number of walks for batch generation.
    pub num_walks: usize,
    /// Seed for deterministic RNG.
    pub seed: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self { length: 20, strategy: Strategy::Linear, num_walks: 1, seed: 42 }
    }
}

/// Why a walk stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination<T> {
    /// The walk reached its target length.
    Completed,
    /// `node` has no recorded outgoing edges at all.
    NoOutgoingEdges { node: usize },
    /// `node` has outgoing edges, but all of them are earlier than `time`.
    NoFutureEdges { node: usize, time: T },
}

/// Outcome of a single transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition<T> {
    Advance { node: usize, time: T },
    Stop(Termination<T>),
}

/// A realized temporal walk.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemporalWalk<T> {
    /// Visited nodes, seed edge first.
    pub nodes: Vec<usize>,
    /// `times[i]` is the time of the edge `nodes[i] -> nodes[i + 1]`.
    pub times: Vec<T>,
    pub termination: Termination<T>,
}

impl<T: Timestamp> TemporalWalk<T> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.termination, Termination::Completed)
    }

    pub fn terminated_early(&self) -> bool {
        !self.is_complete()
    }

    /// The walk as a sequence of temporal edges.
    pub fn edges(&self) -> Vec<TemporalEdge<T>> {
        self.nodes
            .windows(2)
            .zip(&self.times)
            .map(|(pair, &time)| TemporalEdge::new(pair[0], pair[1], time))
            .collect()
    }
}

/// Temporal random walker with a fixed target length and sampling policy.
#[derive(Debug, Clone, Copy)]
pub struct TemporalRandomWalk {
    length: usize,
    distribution: Distribution,
}

impl TemporalRandomWalk {
    /// Fails on `length < 2` or a strategy without an implementation.
    pub fn new(length: usize, strategy: Strategy) -> Result<Self> {
        if length < 2 {
            return Err(Error::InvalidWalkLength(length));
        }
        let distribution = Distribution::from_strategy(strategy)?;
        Ok(Self { length, distribution })
    }

    pub fn from_config(config: &WalkConfig) -> Result<Self> {
        Self::new(config.length, config.strategy)
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    /// Walk from the seed edge `start = (u, v)` observed at `time`.
    pub fn walk<G, R>(&self, graph: &G, start: (usize, usize), time: G::Time, rng: &mut R) -> TemporalWalk<G::Time>
    where
        G: TemporalGraphRef,
        R: Rng,
    {
        let (u, v) = start;
        let mut nodes = Vec::with_capacity(self.length.min(MAX_PREALLOC));
        let mut times = Vec::with_capacity((self.length - 1).min(MAX_PREALLOC));
        nodes.push(u);
        nodes.push(v);
        times.push(time);

        let mut curr = v;
        let mut t = time;
        let mut termination = Termination::Completed;

        for _ in 2..self.length {
            match self.step(graph, curr, t, rng) {
                Transition::Advance { node, time } => {
                    trace!(from = curr, to = node, time = %time, "walk step");
                    nodes.push(node);
                    times.push(time);
                    curr = node;
                    t = time;
                }
                Transition::Stop(reason) => {
                    debug!(
                        reached = nodes.len(),
                        requested = self.length,
                        reason = ?reason,
                        "temporal walk terminated early"
                    );
                    termination = reason;
                    break;
                }
            }
        }

        TemporalWalk { nodes, times, termination }
    }

    /// One transition from `node` at `time`.
    pub fn step<G, R>(&self, graph: &G, node: usize, time: G::Time, rng: &mut R) -> Transition<G::Time>
    where
        G: TemporalGraphRef,
        R: Rng,
    {
        if graph.buckets_ref(node).is_empty() {
            return Transition::Stop(Termination::NoOutgoingEdges { node });
        }
        let no_future = Transition::Stop(Termination::NoFutureEdges { node, time });

        let future = graph.buckets_from(node, time);
        let deltas: Vec<f64> = future.iter().map(|b| b.time.delta(time)).collect();
        // Smallest delta gets the largest weight.
        let probs = self.distribution.compute_distribution(&deltas, true);
        let Some(i) = sample_index(rng, &probs) else {
            return no_future;
        };

        let bucket = &future[i];
        match bucket.neighbors.choose(rng) {
            Some(&next) => Transition::Advance { node: next, time: bucket.time },
            None => no_future,
        }
    }
}

/// Sample `config.num_walks` seed edges from `graph` and walk from each.
///
/// Seed edges are drawn with [`StreamGraph::sample_edge`] using the configured
/// strategy and `reverse = false`, so the linear policy favors recent edges.
pub fn generate_temporal_walks<T: Timestamp>(
    graph: &StreamGraph<T>,
    config: WalkConfig,
) -> Result<Vec<TemporalWalk<T>>> {
    let walker = TemporalRandomWalk::from_config(&config)?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut walks = Vec::with_capacity(config.num_walks.min(MAX_PREALLOC));
    for _ in 0..config.num_walks {
        walks.push(seeded_walk(graph, &walker, &mut rng)?);
    }
    Ok(walks)
}

/// Walk once from each of the given seed edges (sharded or replayed seeds).
pub fn generate_temporal_walks_from_edges<G: TemporalGraphRef>(
    graph: &G,
    seeds: &[TemporalEdge<G::Time>],
    config: WalkConfig,
) -> Result<Vec<TemporalWalk<G::Time>>> {
    let walker = TemporalRandomWalk::from_config(&config)?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    Ok(seeds
        .iter()
        .map(|e| walker.walk(graph, (e.source, e.destination), e.time, &mut rng))
        .collect())
}

/// Deterministic parallel variant of [`generate_temporal_walks`].
///
/// Invariant: output is stable for a fixed `seed`, independent of Rayon thread
/// count. It differs from the sequential output because every walk owns an RNG
/// derived from `(seed, walk index)`.
#[cfg(feature = "parallel")]
pub fn generate_temporal_walks_parallel<T: Timestamp>(
    graph: &StreamGraph<T>,
    config: WalkConfig,
) -> Result<Vec<TemporalWalk<T>>> {
    use rayon::prelude::*;

    let walker = TemporalRandomWalk::from_config(&config)?;
    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }

    (0..config.num_walks)
        .into_par_iter()
        .map(|i| {
            let mut rng = ChaCha8Rng::seed_from_u64(mix64(config.seed ^ (i as u64)));
            seeded_walk(graph, &walker, &mut rng)
        })
        .collect()
}

fn seeded_walk<T: Timestamp, R: Rng>(
    graph: &StreamGraph<T>,
    walker: &TemporalRandomWalk,
    rng: &mut R,
) -> Result<TemporalWalk<T>> {
    let seed = graph.sample_edge(&walker.distribution, false, rng)?;
    Ok(walker.walk(graph, (seed.source, seed.destination), seed.time, rng))
}

#[cfg(feature = "parallel")]
fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}
