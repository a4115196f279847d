//! Ranking and weighted-draw utilities shared by the samplers.

use ordered_float::OrderedFloat;
use rand::Rng;

/// Dense rank of each key: 1 for the smallest value, ties share a rank,
/// ranks are consecutive.
///
/// Keys must not be NaN. `-0.0` and `0.0` share a rank.
pub fn dense_rank(keys: &[f64]) -> Vec<usize> {
    let mut distinct: Vec<OrderedFloat<f64>> = keys.iter().copied().map(OrderedFloat).collect();
    distinct.sort_unstable();
    distinct.dedup();
    keys.iter()
        .map(|&k| match distinct.binary_search(&OrderedFloat(k)) {
            Ok(i) | Err(i) => i + 1,
        })
        .collect()
}

/// Scale `scores` in place so they sum to 1. All-zero input is left alone.
pub fn normalize(scores: &mut [f64]) {
    let sum: f64 = scores.iter().sum();
    if sum > 0.0 {
        for s in scores {
            *s /= sum;
        }
    }
}

/// Draw an index with probability proportional to `weights` (inverse CDF).
///
/// Returns `None` for empty input. If no weight is positive the draw falls
/// back to a uniform index.
pub fn sample_index<R: Rng>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    match weights.len() {
        0 => return None,
        1 => return Some(0),
        _ => {}
    }

    let sum: f64 = weights.iter().copied().filter(|w| *w > 0.0).sum();
    if !(sum > 0.0) {
        return Some(rng.random_range(0..weights.len()));
    }

    let mut r = rng.random::<f64>() * sum;
    let mut last_positive = 0;
    for (i, &w) in weights.iter().enumerate() {
        if !(w > 0.0) {
            continue;
        }
        if r < w {
            return Some(i);
        }
        r -= w;
        last_positive = i;
    }
    // Float drift can leave `r` marginally above the final weight.
    Some(last_positive)
}

/// Position of quantile `p` among `n` ascending values: the lower order
/// statistic's index and the interpolation weight toward the next one.
/// `None` when `n == 0`.
pub fn quantile_position(n: usize, p: f64) -> Option<(usize, f64)> {
    if n == 0 {
        return None;
    }
    let pos = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = (pos.floor() as usize).min(n - 1);
    Some((lo, pos - lo as f64))
}

/// Quantile `p` in `[0, 1]` of ascending `sorted` values, interpolating
/// linearly between the two nearest order statistics. `None` when empty.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    let (lo, frac) = quantile_position(sorted.len(), p)?;
    let hi = (lo + 1).min(sorted.len() - 1);
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn dense_rank_shares_ties_without_gaps() {
        assert_eq!(dense_rank(&[10.0, 10.0, 15.0, 20.0, 15.0]), vec![1, 1, 2, 3, 2]);
        assert_eq!(dense_rank(&[3.0, 1.0, 2.0]), vec![3, 1, 2]);
        assert!(dense_rank(&[]).is_empty());
    }

    #[test]
    fn dense_rank_treats_signed_zero_as_equal() {
        assert_eq!(dense_rank(&[-0.0, 0.0, -1.0]), vec![2, 2, 1]);
    }

    #[test]
    fn normalize_basic() {
        let mut s = vec![1.0, 3.0];
        normalize(&mut s);
        assert_eq!(s, vec![0.25, 0.75]);

        let mut z = vec![0.0, 0.0];
        normalize(&mut z);
        assert_eq!(z, vec![0.0, 0.0]);
    }

    #[test]
    fn quantile_interpolates_between_order_statistics() {
        let v: Vec<f64> = (1..=10).map(f64::from).collect();
        assert!((quantile(&v, 0.8).unwrap() - 8.2).abs() < 1e-12);
        assert_eq!(quantile(&v, 0.0), Some(1.0));
        assert_eq!(quantile(&v, 1.0), Some(10.0));
        assert_eq!(quantile(&[4.0], 0.3), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn quantile_position_splits_index_and_weight() {
        let (lo, frac) = quantile_position(10, 0.8).unwrap();
        assert_eq!(lo, 7);
        assert!((frac - 0.2).abs() < 1e-12);
        assert_eq!(quantile_position(5, 1.0), Some((4, 0.0)));
        assert_eq!(quantile_position(0, 0.5), None);
    }

    #[test]
    fn sample_index_never_picks_zero_weight() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..2_000 {
            let i = sample_index(&mut rng, &[0.0, 1.0, 0.0, 2.0]).unwrap();
            assert!(i == 1 || i == 3, "picked zero-weight index {i}");
        }
        assert_eq!(sample_index(&mut rng, &[]), None);
        assert_eq!(sample_index(&mut rng, &[0.5]), Some(0));
    }

    #[test]
    fn sample_index_distribution_smoke() {
        // Deterministic chi-squared smoke test, same shape as the alias-table check.
        let probs = [0.1, 0.2, 0.7];
        let trials = 20_000usize;
        let mut counts = [0usize; 3];
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..trials {
            counts[sample_index(&mut rng, &probs).unwrap()] += 1;
        }

        let chi2: f64 = counts
            .iter()
            .zip(probs.iter())
            .map(|(&c, &p)| {
                let e = trials as f64 * p;
                let diff = c as f64 - e;
                (diff * diff) / e
            })
            .sum();
        assert!(chi2 < 50.0, "chi2 too large (chi2={chi2:.2}), counts={counts:?}");
    }
}
