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

//! Window selection over fetched settlement records.
//!
//! Every chart shares the same normalization: resolve, sort, deduplicate,
//! drop future intervals, then cut the requested slice.

use chrono::{DateTime, Utc};
use tracing::warn;

use gridion_types::{SettlementRecord, WindowSpec};

use crate::timeline::{latest_valid_instant, resolve_period};

/// A record paired with its canonical instant, as produced by [`select`].
pub type ResolvedRecord = (DateTime<Utc>, SettlementRecord);

/// Normalize raw records and cut the requested window, oldest first.
///
/// Records that cannot be resolved to an instant are skipped. Duplicate
/// (date, period) pairs keep their first occurrence in input order.
/// Intervals starting after the latest fully elapsed half-hour boundary
/// are excluded before the slice is taken.
pub fn select(
    records: &[SettlementRecord],
    window: WindowSpec,
    now: DateTime<Utc>,
) -> Vec<ResolvedRecord> {
    let cutoff = latest_valid_instant(now);

    let mut resolved: Vec<ResolvedRecord> = records
        .iter()
        .filter_map(|record| {
            match resolve_period(record.settlement_date, record.settlement_period) {
                Ok(instant) => Some((instant, record.clone())),
                Err(e) => {
                    warn!(
                        date = %record.settlement_date,
                        period = record.settlement_period,
                        "skipping unresolvable record: {e}"
                    );
                    None
                }
            }
        })
        .collect();

    // Stable, so equal keys keep input order and dedup keeps the first
    resolved.sort_by_key(|(instant, _)| *instant);
    resolved.dedup_by_key(|(_, record)| record.interval_key());
    resolved.retain(|(instant, _)| *instant <= cutoff);

    match window {
        WindowSpec::All => resolved,
        WindowSpec::TrailingIntervals(n) => trailing(resolved, n),
        WindowSpec::PreviousDay => {
            // Day keys come from the resolved UTC instants, not the
            // settlement date; in summer the two disagree around midnight.
            let today = cutoff.date_naive();
            let yesterday = resolved
                .iter()
                .map(|(instant, _)| instant.date_naive())
                .filter(|day| *day < today)
                .max();
            match yesterday {
                Some(day) => resolved
                    .into_iter()
                    .filter(|(instant, _)| instant.date_naive() == day)
                    .collect(),
                // Nothing before today yet, e.g. right after midnight
                None => trailing(resolved, 48),
            }
        }
    }
}

fn trailing(resolved: Vec<ResolvedRecord>, n: usize) -> Vec<ResolvedRecord> {
    let skip = resolved.len().saturating_sub(n);
    resolved.into_iter().skip(skip).collect()
}
