//! # streamwalk
//!
//! Stream graphs and time-respecting biased random walks.
//!
//! A stream graph indexes timestamped interactions `(u, v, t)` as
//! node -> time -> neighbors. A temporal random walk grows a path through it
//! without ever moving backward in time, picking each next event under a
//! sampling policy:
//!
//! - `uniform`: every candidate time is equally likely
//! - `linear`: weight proportional to dense rank, so the closest future event
//!   is favored during a walk and recent edges are favored when sampling seeds
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use streamwalk::{Strategy, StreamGraph, TemporalRandomWalk};
//!
//! let g = StreamGraph::from_triples([(0, 1, 10i64), (1, 2, 10), (1, 2, 15), (2, 0, 20)]).unwrap();
//! let walker = TemporalRandomWalk::new(4, Strategy::Uniform).unwrap();
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let walk = walker.walk(&g, (0, 1), 10, &mut rng);
//! assert_eq!(walk.nodes, vec![0, 1, 2, 0]);
//! ```

pub mod edge;
pub mod error;
pub mod graph;
pub mod numeric;
pub mod sampling;
pub mod source;
pub mod stream_graph;
pub mod temporal_walk;

pub use edge::{TemporalEdge, Timestamp};
pub use error::{Error, Result};
pub use graph::{TemporalGraphRef, TimeBucket};
pub use numeric::{dense_rank, normalize, quantile, quantile_position, sample_index};
pub use sampling::{sampling_factory, Distribution, Linear, SamplingDistribution, Strategy, Uniform};
pub use stream_graph::StreamGraph;
pub use temporal_walk::{
    generate_temporal_walks, generate_temporal_walks_from_edges, TemporalRandomWalk, TemporalWalk,
    Termination, Transition, WalkConfig,
};

#[cfg(feature = "parallel")]
pub use temporal_walk::generate_temporal_walks_parallel;
