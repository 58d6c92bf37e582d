// Performance scoring and per-year percentile thresholds.

use crate::config::PerformanceConfig;
use serde::{Deserialize, Serialize};

/// Weighted batting score: `hits_weight * hits + doubles_weight * doubles`.
pub fn weighted_score(hits: u32, doubles: u32, weights: &PerformanceConfig) -> f64 {
    weights.hits_weight * f64::from(hits) + weights.doubles_weight * f64::from(doubles)
}

/// The standard score: `0.5 * hits + doubles`.
pub fn performance_score(hits: u32, doubles: u32) -> f64 {
    weighted_score(hits, doubles, &PerformanceConfig::default())
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Cut points derived from one year's score distribution.
///
/// `medium` and `high` are the scores at the configured percentile positions
/// (33rd and 67th by default) of the ascending distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub max: f64,
    pub count: usize,
    pub average: f64,
}

/// Thresholds at the 33rd/67th percentiles.
///
/// Returns `None` for an empty distribution; an empty year has no
/// thresholds and must not be categorized.
pub fn compute_thresholds(scores: &[f64]) -> Option<PerformanceThresholds> {
    let defaults = PerformanceConfig::default();
    compute_thresholds_at(scores, defaults.medium_percentile, defaults.high_percentile)
}

/// Thresholds at arbitrary percentile positions in `[0, 1)`.
///
/// The position of percentile `p` is `floor(p * n)` in the ascending sort.
/// The average is summed over the sorted scores.
pub fn compute_thresholds_at(
    scores: &[f64],
    medium_percentile: f64,
    high_percentile: f64,
) -> Option<PerformanceThresholds> {
    if scores.is_empty() {
        return None;
    }
    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let at = |p: f64| -> f64 {
        let idx = ((n as f64) * p).floor() as usize;
        sorted[idx.min(n - 1)]
    };

    Some(PerformanceThresholds {
        low: sorted[0],
        medium: at(medium_percentile),
        high: at(high_percentile),
        max: sorted[n - 1],
        count: n,
        average: sorted.iter().sum::<f64>() / n as f64,
    })
}

// ---------------------------------------------------------------------------
// Per-year statistics
// ---------------------------------------------------------------------------

/// Everything kept about one year's score distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    #[serde(flatten)]
    pub thresholds: PerformanceThresholds,
    pub total_players: usize,
    /// Scores in joined-population order.
    pub raw_scores: Vec<f64>,
}

impl PerformanceStats {
    /// `None` when `raw_scores` is empty.
    pub fn from_scores(
        raw_scores: Vec<f64>,
        medium_percentile: f64,
        high_percentile: f64,
    ) -> Option<Self> {
        let thresholds = compute_thresholds_at(&raw_scores, medium_percentile, high_percentile)?;
        Some(PerformanceStats {
            thresholds,
            total_players: raw_scores.len(),
            raw_scores,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn score_formula() {
        assert!(approx_eq(performance_score(150, 30), 105.0, 1e-12));
        assert!(approx_eq(performance_score(0, 0), 0.0, 1e-12));
        assert!(approx_eq(performance_score(1, 0), 0.5, 1e-12));
    }

    #[test]
    fn weighted_score_respects_weights() {
        let weights = PerformanceConfig {
            hits_weight: 1.0,
            doubles_weight: 2.0,
            ..PerformanceConfig::default()
        };
        assert!(approx_eq(weighted_score(10, 5, &weights), 20.0, 1e-12));
    }

    #[test]
    fn empty_distribution_has_no_thresholds() {
        assert!(compute_thresholds(&[]).is_none());
        assert!(PerformanceStats::from_scores(vec![], 0.33, 0.67).is_none());
    }

    #[test]
    fn single_score_collapses_all_thresholds() {
        let t = compute_thresholds(&[105.0]).unwrap();
        assert_eq!(t.low, 105.0);
        assert_eq!(t.medium, 105.0);
        assert_eq!(t.high, 105.0);
        assert_eq!(t.max, 105.0);
        assert_eq!(t.count, 1);
        assert_eq!(t.average, 105.0);
    }

    #[test]
    fn percentile_positions_use_floor() {
        // n = 10: medium at floor(3.3) = 3, high at floor(6.7) = 6.
        let scores: Vec<f64> = (0..10).rev().map(|i| i as f64 * 10.0).collect();
        let t = compute_thresholds(&scores).unwrap();
        assert_eq!(t.low, 0.0);
        assert_eq!(t.medium, 30.0);
        assert_eq!(t.high, 60.0);
        assert_eq!(t.max, 90.0);
        assert_eq!(t.count, 10);
        assert!(approx_eq(t.average, 45.0, 1e-9));
    }

    #[test]
    fn three_scores() {
        // n = 3: medium at floor(0.99) = 0, high at floor(2.01) = 2.
        let t = compute_thresholds(&[20.0, 5.0, 10.0]).unwrap();
        assert_eq!(t.medium, 5.0);
        assert_eq!(t.high, 20.0);
    }

    #[test]
    fn input_order_is_left_untouched() {
        let scores = vec![3.0, 1.0, 2.0];
        let _ = compute_thresholds(&scores);
        assert_eq!(scores, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn thresholds_are_ordered_and_average_bounded() {
        let distributions: Vec<Vec<f64>> = vec![
            vec![1.0],
            vec![2.0, 2.0],
            vec![0.0, 100.0],
            vec![7.5, 3.0, 99.0, 42.0, 42.0, 0.5],
            (0..97).map(|i| ((i * 37) % 101) as f64 * 0.5).collect(),
        ];
        for scores in distributions {
            let t = compute_thresholds(&scores).unwrap();
            assert!(t.low <= t.medium, "{scores:?}");
            assert!(t.medium <= t.high, "{scores:?}");
            assert!(t.high <= t.max, "{scores:?}");
            assert!(t.average >= t.low && t.average <= t.max, "{scores:?}");
        }
    }

    #[test]
    fn stats_keep_raw_scores_in_input_order() {
        let stats = PerformanceStats::from_scores(vec![9.0, 1.0, 5.0], 0.33, 0.67).unwrap();
        assert_eq!(stats.total_players, 3);
        assert_eq!(stats.raw_scores, vec![9.0, 1.0, 5.0]);
        assert_eq!(stats.thresholds.low, 1.0);
    }
}
