//! Sampling distributions over ordered numeric keys.
//!
//! A distribution turns a sequence of keys (timestamps, or time deltas during a
//! walk) into one probability per key:
//!
//! - [`Uniform`]: every key gets `1/n`.
//! - [`Linear`]: probability proportional to the key's dense rank, so keys
//!   toward one temporal extreme are linearly more likely. With
//!   `reverse = true` the smallest key gets the largest rank.
//!
//! `exponential` is a reserved tag; selecting it fails with
//! [`Error::UnsupportedStrategy`].

use crate::error::{Error, Result};
use crate::numeric::{dense_rank, normalize};
use std::fmt;
use std::str::FromStr;

/// Strategy tag selecting a sampling distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    Uniform,
    #[default]
    Linear,
    Exponential,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Uniform => "uniform",
            Strategy::Linear => "linear",
            Strategy::Exponential => "exponential",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(Strategy::Uniform),
            "linear" => Ok(Strategy::Linear),
            "exponential" => Ok(Strategy::Exponential),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

/// Capability shared by all sampling policies.
pub trait SamplingDistribution {
    fn strategy(&self) -> Strategy;

    /// One non-negative weight per key, summing to 1 (empty for empty keys).
    ///
    /// Keys must not be NaN.
    fn compute_distribution(&self, keys: &[f64], reverse: bool) -> Vec<f64>;
}

/// Unbiased policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Uniform;

impl SamplingDistribution for Uniform {
    fn strategy(&self) -> Strategy {
        Strategy::Uniform
    }

    fn compute_distribution(&self, keys: &[f64], _reverse: bool) -> Vec<f64> {
        let n = keys.len();
        if n == 0 {
            return Vec::new();
        }
        vec![1.0 / n as f64; n]
    }
}

/// Time-biased policy: weight proportional to dense rank.
///
/// Ties receive equal weight per element, so a rank shared by `k` keys holds
/// `k` times the mass of a singleton rank.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl SamplingDistribution for Linear {
    fn strategy(&self) -> Strategy {
        Strategy::Linear
    }

    fn compute_distribution(&self, keys: &[f64], reverse: bool) -> Vec<f64> {
        let ranks = if reverse {
            let negated: Vec<f64> = keys.iter().map(|k| -k).collect();
            dense_rank(&negated)
        } else {
            dense_rank(keys)
        };
        let mut probs: Vec<f64> = ranks.into_iter().map(|r| r as f64).collect();
        normalize(&mut probs);
        probs
    }
}

/// Enum dispatch over the implemented policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distribution {
    Uniform,
    Linear,
}

impl Distribution {
    pub fn from_strategy(strategy: Strategy) -> Result<Self> {
        match strategy {
            Strategy::Uniform => Ok(Distribution::Uniform),
            Strategy::Linear => Ok(Distribution::Linear),
            Strategy::Exponential => Err(Error::UnsupportedStrategy(strategy)),
        }
    }
}

impl SamplingDistribution for Distribution {
    fn strategy(&self) -> Strategy {
        match self {
            Distribution::Uniform => Uniform.strategy(),
            Distribution::Linear => Linear.strategy(),
        }
    }

    fn compute_distribution(&self, keys: &[f64], reverse: bool) -> Vec<f64> {
        match self {
            Distribution::Uniform => Uniform.compute_distribution(keys, reverse),
            Distribution::Linear => Linear.compute_distribution(keys, reverse),
        }
    }
}

/// Resolve a strategy tag (`"uniform"`, `"linear"`, `"exponential"`) to a distribution.
pub fn sampling_factory(tag: &str) -> Result<Distribution> {
    Distribution::from_strategy(tag.parse()?)
}
