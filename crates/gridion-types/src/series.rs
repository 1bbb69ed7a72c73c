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

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One plotted interval with its pre-rendered axis labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Canonical UTC instant of the interval start
    pub timestamp: DateTime<Utc>,

    /// Compact axis label, local wall-clock "HH:MM"
    pub short_label: String,

    /// Tooltip label, local "Mon DD, HH:MM"
    pub long_label: String,

    /// Aggregated values keyed by output field name
    pub values: BTreeMap<String, f64>,
}

/// Whether a series was built from real intervals or the window came up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesStatus {
    Ok,
    NoData,
}

/// A chart-ready series as served to the dashboard frontend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesResponse {
    pub status: SeriesStatus,
    pub points: Vec<SeriesPoint>,
}

impl SeriesResponse {
    /// Wrap points, marking the empty window explicitly instead of serving
    /// fabricated placeholder values.
    pub fn from_points(points: Vec<SeriesPoint>) -> Self {
        let status = if points.is_empty() {
            SeriesStatus::NoData
        } else {
            SeriesStatus::Ok
        };
        Self { status, points }
    }
}
