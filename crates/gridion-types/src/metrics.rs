// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use serde::{Deserialize, Serialize};

/// Ordered severity rating of a boundary or cable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// Direction of the recent average flow change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

/// Percentage cutoffs mapping a risk score to a [`RiskLevel`].
///
/// A score below `medium` is low, below `high` is medium, below `critical`
/// is high, and anything at or above `critical` is critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium: 40.0,
            high: 70.0,
            critical: 90.0,
        }
    }
}

impl RiskThresholds {
    pub fn classify(&self, score: f64) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Dead band (MW) around zero mean change inside which a trend reads stable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendBands {
    pub stable_mw: f64,
}

impl Default for TrendBands {
    fn default() -> Self {
        Self { stable_mw: 75.0 }
    }
}

impl TrendBands {
    /// Map a signed mean interval-to-interval change to a trend direction.
    pub fn classify(&self, mean_change_mw: f64) -> Trend {
        if mean_change_mw > self.stable_mw {
            Trend::Rising
        } else if mean_change_mw < -self.stable_mw {
            Trend::Falling
        } else {
            Trend::Stable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds_boundaries() {
        let t = RiskThresholds::default();
        assert_eq!(t.classify(0.0), RiskLevel::Low);
        assert_eq!(t.classify(39.9), RiskLevel::Low);
        assert_eq!(t.classify(40.0), RiskLevel::Medium);
        assert_eq!(t.classify(70.0), RiskLevel::High);
        assert_eq!(t.classify(90.0), RiskLevel::Critical);
        assert_eq!(t.classify(250.0), RiskLevel::Critical);
    }

    #[test]
    fn test_risk_levels_are_ordered() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_trend_dead_band() {
        let bands = TrendBands::default();
        assert_eq!(bands.classify(200.0), Trend::Rising);
        assert_eq!(bands.classify(-200.0), Trend::Falling);
        assert_eq!(bands.classify(75.0), Trend::Stable);
        assert_eq!(bands.classify(-75.0), Trend::Stable);
        assert_eq!(bands.classify(0.0), Trend::Stable);
    }
}
