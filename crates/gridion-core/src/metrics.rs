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

//! Derived boundary metrics: utilization, volatility, trend direction and
//! the per-boundary constraint risk models.
//!
//! Scores are deterministic functions of the flow series; identical inputs
//! always produce identical assessments.

use serde::Serialize;

use gridion_types::{RiskLevel, RiskThresholds, Trend, TrendBands};

use crate::schemas::{FRANCE_CAPACITY_MW, SCOTTISH_BOUNDARY_CAPACITY_MW};

/// Absolute flow as a percentage of capacity, deliberately unclamped so
/// overload conditions read above 100.
pub fn utilization(flow_mw: f64, capacity_mw: f64) -> f64 {
    if capacity_mw <= 0.0 {
        return 0.0;
    }
    flow_mw.abs() / capacity_mw * 100.0
}

/// Mean absolute interval-to-interval change across a flow series (MW).
/// Zero for series shorter than two points.
pub fn flow_volatility(flows: &[f64]) -> f64 {
    if flows.len() <= 1 {
        return 0.0;
    }
    let total: f64 = flows.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    #[expect(clippy::cast_precision_loss, reason = "series lengths are small")]
    let steps = (flows.len() - 1) as f64;
    total / steps
}

/// Signed mean interval-to-interval change (MW); zero for short series.
pub fn mean_change(flows: &[f64]) -> f64 {
    if flows.len() <= 1 {
        return 0.0;
    }
    let total: f64 = flows.windows(2).map(|w| w[1] - w[0]).sum();
    #[expect(clippy::cast_precision_loss, reason = "series lengths are small")]
    let steps = (flows.len() - 1) as f64;
    total / steps
}

/// A scored transmission or interconnection boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintModel {
    /// Combined IFA, IFA2 and ElecLink corridor.
    FranceBoundary,
    /// The B6 Anglo-Scottish transmission boundary.
    ScottishBoundary,
    /// BritNed.
    DutchBoundary,
}

/// Inputs common to every boundary scoring formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryInputs {
    /// Most recent net flow across the boundary (MW, signed).
    pub latest_flow_mw: f64,
    /// Volatility of the flow series feeding the score (MW).
    pub volatility_mw: f64,
    /// Latest estimated embedded wind output (MW); only the Scottish
    /// boundary reads it.
    pub embedded_wind_mw: f64,
}

impl ConstraintModel {
    pub fn name(self) -> &'static str {
        match self {
            Self::FranceBoundary => "France interconnection",
            Self::ScottishBoundary => "B6 Scottish boundary",
            Self::DutchBoundary => "Netherlands interconnection",
        }
    }

    pub fn capacity_mw(self) -> f64 {
        match self {
            Self::FranceBoundary => FRANCE_CAPACITY_MW,
            Self::ScottishBoundary => SCOTTISH_BOUNDARY_CAPACITY_MW,
            Self::DutchBoundary => 1000.0,
        }
    }

    /// Risk score in 0..=95. Each boundary weighs utilization differently
    /// and adds stress bonuses for the conditions that bind it in practice.
    pub fn score(self, inputs: &BoundaryInputs) -> f64 {
        let util = utilization(inputs.latest_flow_mw, self.capacity_mw()) / 100.0;
        let raw = match self {
            Self::FranceBoundary => {
                let surge = if inputs.latest_flow_mw.abs() > 4000.0 {
                    15.0
                } else {
                    0.0
                };
                util * 60.0 + inputs.volatility_mw / 100.0 * 20.0 + surge
            }
            Self::ScottishBoundary => {
                let wind_bonus = if inputs.embedded_wind_mw > 4000.0 {
                    25.0
                } else {
                    0.0
                };
                let transfer_bonus = if inputs.latest_flow_mw.abs() > 5000.0 {
                    20.0
                } else {
                    0.0
                };
                util * 50.0 + wind_bonus + transfer_bonus
            }
            Self::DutchBoundary => util * 80.0,
        };
        raw.min(95.0)
    }
}

/// One boundary's full derived assessment, as served to the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryAssessment {
    pub boundary: &'static str,
    pub latest_flow_mw: f64,
    pub capacity_mw: f64,
    pub utilization_pct: f64,
    pub volatility_mw: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub trend: Trend,
}

/// Score one boundary from its windowed flow series.
pub fn assess_boundary(
    model: ConstraintModel,
    flows: &[f64],
    embedded_wind_mw: f64,
    thresholds: &RiskThresholds,
    bands: &TrendBands,
) -> BoundaryAssessment {
    let latest_flow_mw = flows.last().copied().unwrap_or(0.0);
    let volatility_mw = flow_volatility(flows);
    let inputs = BoundaryInputs {
        latest_flow_mw,
        volatility_mw,
        embedded_wind_mw,
    };
    let risk_score = model.score(&inputs);
    BoundaryAssessment {
        boundary: model.name(),
        latest_flow_mw,
        capacity_mw: model.capacity_mw(),
        utilization_pct: utilization(latest_flow_mw, model.capacity_mw()),
        volatility_mw,
        risk_score,
        risk_level: thresholds.classify(risk_score),
        trend: bands.classify(mean_change(flows)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utilization_is_unclamped_and_sign_blind() {
        assert_eq!(utilization(500.0, 1000.0), 50.0);
        assert_eq!(utilization(-500.0, 1000.0), 50.0);
        assert_eq!(utilization(1200.0, 1000.0), 120.0);
        assert_eq!(utilization(500.0, 0.0), 0.0);
    }

    #[test]
    fn test_volatility_of_short_series_is_zero() {
        assert_eq!(flow_volatility(&[]), 0.0);
        assert_eq!(flow_volatility(&[1500.0]), 0.0);
    }

    #[test]
    fn test_volatility_is_mean_absolute_change() {
        // Changes: +100, -300 => mean |delta| = 200
        assert_eq!(flow_volatility(&[1000.0, 1100.0, 800.0]), 200.0);
    }

    #[test]
    fn test_mean_change_is_signed() {
        assert_eq!(mean_change(&[1000.0, 1100.0, 800.0]), -100.0);
        assert_eq!(mean_change(&[1000.0, 1200.0]), 200.0);
    }

    #[test]
    fn test_french_boundary_score() {
        // 2700 MW of 5400 => 50% util => 30 points; calm, no surge
        let inputs = BoundaryInputs {
            latest_flow_mw: 2700.0,
            volatility_mw: 0.0,
            embedded_wind_mw: 0.0,
        };
        assert!((ConstraintModel::FranceBoundary.score(&inputs) - 30.0).abs() < 1e-9);

        // Surge bonus kicks in above 4000 MW absolute
        let inputs = BoundaryInputs {
            latest_flow_mw: -4500.0,
            volatility_mw: 200.0,
            embedded_wind_mw: 0.0,
        };
        let expected = 4500.0 / 5400.0 * 60.0 + 200.0 / 100.0 * 20.0 + 15.0;
        assert!((ConstraintModel::FranceBoundary.score(&inputs) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_scottish_boundary_wind_and_transfer_bonuses() {
        let inputs = BoundaryInputs {
            latest_flow_mw: 5600.0,
            volatility_mw: 0.0,
            embedded_wind_mw: 4200.0,
        };
        // util 0.8 * 50 + 25 wind + 20 transfer = 85
        assert!((ConstraintModel::ScottishBoundary.score(&inputs) - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_scores_cap_at_95() {
        let inputs = BoundaryInputs {
            latest_flow_mw: 20000.0,
            volatility_mw: 5000.0,
            embedded_wind_mw: 9000.0,
        };
        assert_eq!(ConstraintModel::FranceBoundary.score(&inputs), 95.0);
        assert_eq!(ConstraintModel::ScottishBoundary.score(&inputs), 95.0);
        assert_eq!(ConstraintModel::DutchBoundary.score(&inputs), 95.0);
    }

    #[test]
    fn test_identical_inputs_give_identical_scores() {
        let inputs = BoundaryInputs {
            latest_flow_mw: 3100.0,
            volatility_mw: 140.0,
            embedded_wind_mw: 3000.0,
        };
        let a = ConstraintModel::FranceBoundary.score(&inputs);
        let b = ConstraintModel::FranceBoundary.score(&inputs);
        assert_eq!(a, b);
    }

    #[test]
    fn test_assess_boundary_empty_series() {
        let assessment = assess_boundary(
            ConstraintModel::DutchBoundary,
            &[],
            0.0,
            &RiskThresholds::default(),
            &TrendBands::default(),
        );
        assert_eq!(assessment.risk_score, 0.0);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(assessment.trend, Trend::Stable);
    }

    #[test]
    fn test_assess_boundary_classifies_trend_from_signed_changes() {
        // Rising by 200 MW per interval, well above the 75 MW dead band
        let flows = [1000.0, 1200.0, 1400.0, 1600.0];
        let assessment = assess_boundary(
            ConstraintModel::FranceBoundary,
            &flows,
            0.0,
            &RiskThresholds::default(),
            &TrendBands::default(),
        );
        assert_eq!(assessment.trend, Trend::Rising);
        assert_eq!(assessment.latest_flow_mw, 1600.0);
    }
}
