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

/// How a chart selects its slice of the fetched settlement records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowSpec {
    /// The latest N non-future intervals, e.g. 48 for a rolling day.
    TrailingIntervals(usize),

    /// The most recent fully elapsed UTC calendar day present in the data,
    /// falling back to the trailing 48 intervals when none exists.
    PreviousDay,

    /// Every valid interval the store holds, oldest first.
    All,
}

impl WindowSpec {
    /// One rolling day of half-hour intervals.
    pub const DAY: Self = Self::TrailingIntervals(48);

    /// One rolling week of half-hour intervals.
    pub const WEEK: Self = Self::TrailingIntervals(336);
}
