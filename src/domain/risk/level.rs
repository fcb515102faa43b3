//! Canonical threshold classification.
//!
//! Every score bucket in the system (heatmap, dashboard summary, department
//! distribution) goes through [`RiskLevel::from_score`], and every KRI
//! breach or status goes through [`Severity::from_breach`]. No other module
//! carries its own boundaries.

use serde::{Deserialize, Serialize};

/// Risk level of a likelihood × impact score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const CRITICAL_FROM: f64 = 20.0;
    pub const HIGH_FROM: f64 = 15.0;
    pub const MEDIUM_FROM: f64 = 10.0;

    /// Buckets a score: critical ≥ 20, high ≥ 15, medium ≥ 10, otherwise low.
    ///
    /// NaN falls through to `Low`.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::CRITICAL_FROM {
            RiskLevel::Critical
        } else if score >= Self::HIGH_FROM {
            RiskLevel::High
        } else if score >= Self::MEDIUM_FROM {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// Severity of a KRI breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// How far `current` exceeds `threshold`, as a percentage of the threshold.
    ///
    /// Plain IEEE arithmetic: a zero threshold yields ±infinity or NaN.
    pub fn percentage_over(current: f64, threshold: f64) -> f64 {
        (current - threshold) / threshold * 100.0
    }

    /// Critical above 50 % over, high above 25 %, medium above 10 %, else low.
    pub fn from_percentage_over(percentage_over: f64) -> Self {
        if percentage_over > 50.0 {
            Severity::Critical
        } else if percentage_over > 25.0 {
            Severity::High
        } else if percentage_over > 10.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Severity of a breach of `threshold` by `current`.
    pub fn from_breach(current: f64, threshold: f64) -> Self {
        Self::from_percentage_over(Self::percentage_over(current, threshold))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn severity_examples_match_dashboard_styling() {
        assert_eq!(Severity::percentage_over(16.0, 10.0), 60.0);
        assert_eq!(Severity::from_breach(16.0, 10.0), Severity::Critical);
        assert_eq!(Severity::from_breach(12.0, 10.0), Severity::Medium);
        assert_eq!(Severity::from_breach(11.0, 10.0), Severity::Low);
    }

    #[test]
    fn severity_boundaries_are_exclusive() {
        assert_eq!(Severity::from_percentage_over(50.0), Severity::High);
        assert_eq!(Severity::from_percentage_over(50.1), Severity::Critical);
        assert_eq!(Severity::from_percentage_over(25.0), Severity::Medium);
        assert_eq!(Severity::from_percentage_over(10.0), Severity::Low);
    }

    #[test]
    fn zero_threshold_follows_float_semantics() {
        assert_eq!(Severity::from_breach(3.0, 0.0), Severity::Critical);
        assert_eq!(Severity::from_breach(0.0, 0.0), Severity::Low);
    }

    #[test]
    fn risk_level_boundaries_are_inclusive() {
        assert_eq!(RiskLevel::from_score(20.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(19.9), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(15.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(10.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(9.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(f64::NAN), RiskLevel::Low);
    }

    proptest! {
        #[test]
        fn severity_is_deterministic(current in -1e6f64..1e6, threshold in -1e6f64..1e6) {
            prop_assert_eq!(
                Severity::from_breach(current, threshold),
                Severity::from_breach(current, threshold)
            );
        }

        #[test]
        fn severity_is_monotonic_in_current(a in 0.0f64..1e4, b in 0.0f64..1e4, threshold in 0.1f64..1e3) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Severity::from_breach(lo, threshold) <= Severity::from_breach(hi, threshold));
        }

        #[test]
        fn risk_level_is_monotonic(a in 0.0f64..25.0, b in 0.0f64..25.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(RiskLevel::from_score(lo) <= RiskLevel::from_score(hi));
        }
    }
}
