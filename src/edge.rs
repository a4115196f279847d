//! Temporal edge and timestamp types.

use std::fmt;

/// A totally ordered, subtractable time value.
///
/// Implemented for the primitive integer and float types. Float timestamps are
/// only comparable when they are not NaN; [`crate::StreamGraph::build`] rejects
/// edges whose time fails [`Timestamp::is_comparable`].
pub trait Timestamp: Copy + PartialOrd + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Lossy view used as a sampling key.
    fn as_f64(self) -> f64;

    /// `self - origin` as a sampling key.
    fn delta(self, origin: Self) -> f64;

    fn is_comparable(self) -> bool {
        true
    }
}

macro_rules! impl_int_timestamp {
    ($($t:ty),*) => {$(
        impl Timestamp for $t {
            fn as_f64(self) -> f64 {
                self as f64
            }

            fn delta(self, origin: Self) -> f64 {
                (self as i128 - origin as i128) as f64
            }
        }
    )*};
}

macro_rules! impl_float_timestamp {
    ($($t:ty),*) => {$(
        impl Timestamp for $t {
            fn as_f64(self) -> f64 {
                self as f64
            }

            fn delta(self, origin: Self) -> f64 {
                (self - origin) as f64
            }

            fn is_comparable(self) -> bool {
                !self.is_nan()
            }
        }
    )*};
}

impl_int_timestamp!(i32, i64, u32, u64, usize);
impl_float_timestamp!(f32, f64);

/// One interaction `source -> destination` at `time`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemporalEdge<T> {
    pub source: usize,
    pub destination: usize,
    pub time: T,
}

impl<T: Timestamp> TemporalEdge<T> {
    pub fn new(source: usize, destination: usize, time: T) -> Self {
        Self { source, destination, time }
    }

    /// The same interaction seen from the destination.
    pub fn reversed(&self) -> Self {
        Self::new(self.destination, self.source, self.time)
    }

    pub fn as_tuple(&self) -> (usize, usize, T) {
        (self.source, self.destination, self.time)
    }
}

impl<T: Timestamp> From<(usize, usize, T)> for TemporalEdge<T> {
    fn from((source, destination, time): (usize, usize, T)) -> Self {
        Self::new(source, destination, time)
    }
}
