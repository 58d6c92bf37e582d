// Ordinal category labels for salaries and performance, and the pure
// functions that assign them.

use crate::config::{SalaryBands, WinPercentageBands};
use crate::pipeline::scoring::PerformanceThresholds;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Salary categories
// ---------------------------------------------------------------------------

/// Salary tier. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SalaryCategory {
    #[serde(rename = "Low Salary")]
    Low,
    #[serde(rename = "Medium Salary")]
    Medium,
    #[serde(rename = "High Salary")]
    High,
}

impl SalaryCategory {
    /// Fixed node materialization order.
    pub const ALL: [SalaryCategory; 3] = [
        SalaryCategory::Low,
        SalaryCategory::Medium,
        SalaryCategory::High,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SalaryCategory::Low => "Low Salary",
            SalaryCategory::Medium => "Medium Salary",
            SalaryCategory::High => "High Salary",
        }
    }
}

impl fmt::Display for SalaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Performance categories
// ---------------------------------------------------------------------------

/// Performance tier. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PerformanceCategory {
    #[serde(rename = "Low Performance")]
    Low,
    #[serde(rename = "Medium Performance")]
    Medium,
    #[serde(rename = "High Performance")]
    High,
}

impl PerformanceCategory {
    /// Fixed node materialization order.
    pub const ALL: [PerformanceCategory; 3] = [
        PerformanceCategory::Low,
        PerformanceCategory::Medium,
        PerformanceCategory::High,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceCategory::Low => "Low Performance",
            PerformanceCategory::Medium => "Medium Performance",
            PerformanceCategory::High => "High Performance",
        }
    }
}

impl fmt::Display for PerformanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Classifiers
// ---------------------------------------------------------------------------

impl SalaryBands {
    /// High at or above `high`, Medium at or above `medium`, else Low.
    /// NaN lands in Low.
    pub fn categorize(&self, salary: f64) -> SalaryCategory {
        if salary >= self.high {
            SalaryCategory::High
        } else if salary >= self.medium {
            SalaryCategory::Medium
        } else {
            SalaryCategory::Low
        }
    }
}

impl WinPercentageBands {
    pub fn categorize(&self, win_percentage: f64) -> PerformanceCategory {
        if win_percentage >= self.high {
            PerformanceCategory::High
        } else if win_percentage >= self.medium {
            PerformanceCategory::Medium
        } else {
            PerformanceCategory::Low
        }
    }
}

/// Categorize a salary against the standard bands ($6M high, $2.5M medium).
pub fn categorize_salary(salary: f64) -> SalaryCategory {
    SalaryBands::default().categorize(salary)
}

/// Categorize a performance score against one year's percentile thresholds.
///
/// Taking the thresholds by reference makes "categorize before the year's
/// thresholds exist" unrepresentable.
pub fn categorize_performance(score: f64, thresholds: &PerformanceThresholds) -> PerformanceCategory {
    if score >= thresholds.high {
        PerformanceCategory::High
    } else if score >= thresholds.medium {
        PerformanceCategory::Medium
    } else {
        PerformanceCategory::Low
    }
}

/// Categorize a team's win percentage (team-record schema): 0.600+ High,
/// 0.500+ Medium.
pub fn categorize_win_percentage(win_percentage: f64) -> PerformanceCategory {
    WinPercentageBands::default().categorize(win_percentage)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds(medium: f64, high: f64) -> PerformanceThresholds {
        PerformanceThresholds {
            low: 0.0,
            medium,
            high,
            max: high,
            count: 3,
            average: medium,
        }
    }

    #[test]
    fn salary_band_boundaries() {
        assert_eq!(categorize_salary(0.0), SalaryCategory::Low);
        assert_eq!(categorize_salary(300_000.0), SalaryCategory::Low);
        assert_eq!(categorize_salary(2_499_999.99), SalaryCategory::Low);
        assert_eq!(categorize_salary(2_500_000.0), SalaryCategory::Medium);
        assert_eq!(categorize_salary(5_999_999.0), SalaryCategory::Medium);
        assert_eq!(categorize_salary(6_000_000.0), SalaryCategory::High);
        assert_eq!(categorize_salary(25_000_000.0), SalaryCategory::High);
    }

    #[test]
    fn salary_nan_is_low() {
        assert_eq!(categorize_salary(f64::NAN), SalaryCategory::Low);
    }

    #[test]
    fn salary_categorization_is_monotonic() {
        let samples: Vec<f64> = (0..=200).map(|i| i as f64 * 50_000.0).collect();
        for pair in samples.windows(2) {
            assert!(
                categorize_salary(pair[0]) <= categorize_salary(pair[1]),
                "{} ranked above {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn custom_bands() {
        let bands = SalaryBands {
            high: 1_000.0,
            medium: 500.0,
        };
        assert_eq!(bands.categorize(499.0), SalaryCategory::Low);
        assert_eq!(bands.categorize(500.0), SalaryCategory::Medium);
        assert_eq!(bands.categorize(1_000.0), SalaryCategory::High);
    }

    #[test]
    fn performance_uses_inclusive_cut_points() {
        let t = thresholds(40.0, 80.0);
        assert_eq!(categorize_performance(39.9, &t), PerformanceCategory::Low);
        assert_eq!(categorize_performance(40.0, &t), PerformanceCategory::Medium);
        assert_eq!(categorize_performance(79.9, &t), PerformanceCategory::Medium);
        assert_eq!(categorize_performance(80.0, &t), PerformanceCategory::High);
    }

    #[test]
    fn performance_equal_thresholds_collapse_to_high() {
        let t = thresholds(105.0, 105.0);
        assert_eq!(categorize_performance(105.0, &t), PerformanceCategory::High);
        assert_eq!(categorize_performance(104.0, &t), PerformanceCategory::Low);
    }

    #[test]
    fn win_percentage_bands() {
        assert_eq!(categorize_win_percentage(0.620), PerformanceCategory::High);
        assert_eq!(categorize_win_percentage(0.600), PerformanceCategory::High);
        assert_eq!(categorize_win_percentage(0.500), PerformanceCategory::Medium);
        assert_eq!(categorize_win_percentage(0.432), PerformanceCategory::Low);
    }

    #[test]
    fn labels_and_serialized_names_agree() {
        for cat in SalaryCategory::ALL {
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.label()));
        }
        for cat in PerformanceCategory::ALL {
            assert_eq!(cat.to_string(), cat.label());
            let json = serde_json::to_string(&cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.label()));
        }
    }
}
