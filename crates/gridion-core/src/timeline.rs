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

//! Settlement-period timeline arithmetic.
//!
//! GB settlement days run on Europe/London wall clock, so a (date, period)
//! pair is resolved through that zone before becoming a canonical UTC
//! instant. On the autumn clock change the ambiguous hour maps to its
//! earliest offset; on the spring change the skipped hour maps one hour
//! forward.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Europe::London;

use gridion_types::{DataError, DataResult};

/// Resolve a settlement (date, period) pair to its canonical UTC instant.
///
/// Period 1 starts at local midnight; each period covers 30 minutes.
pub fn resolve_period(date: NaiveDate, period: u32) -> DataResult<DateTime<Utc>> {
    if !(1..=48).contains(&period) {
        return Err(DataError::InvalidPeriod(period));
    }
    let offset_minutes = i64::from(period - 1) * 30;
    let wall = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| DataError::Parse(format!("unrepresentable settlement date {date}")))?
        + Duration::minutes(offset_minutes);

    let resolved = match London.from_local_datetime(&wall) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => match London.from_local_datetime(&(wall + Duration::hours(1))) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
            LocalResult::None => {
                return Err(DataError::Parse(format!(
                    "wall time {wall} has no mapping in Europe/London"
                )));
            }
        },
    };
    Ok(resolved.to_utc())
}

/// The latest interval start that can already hold real data: `now` floored
/// to the previous half-hour boundary.
pub fn latest_valid_instant(now: DateTime<Utc>) -> DateTime<Utc> {
    let floored_minute = if now.minute() >= 30 { 30 } else { 0 };
    now.with_minute(floored_minute)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// Compact axis label, local wall clock.
pub fn short_label(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&London).format("%H:%M").to_string()
}

/// Tooltip label, local wall clock with the calendar day.
pub fn long_label(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&London)
        .format("%b %d, %H:%M")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_resolve_period_winter_matches_utc() {
        // GMT season: local midnight is UTC midnight
        let instant = resolve_period(date(2025, 1, 15), 1).unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-01-15T00:00:00+00:00");

        let instant = resolve_period(date(2025, 1, 15), 48).unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-01-15T23:30:00+00:00");
    }

    #[test]
    fn test_resolve_period_summer_shifts_back_one_hour() {
        // BST season: local midnight is 23:00 UTC the previous day
        let instant = resolve_period(date(2025, 7, 10), 1).unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-07-09T23:00:00+00:00");

        let instant = resolve_period(date(2025, 7, 10), 27).unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-07-10T12:00:00+00:00");
    }

    #[test]
    fn test_resolve_period_spring_gap_moves_forward() {
        // 2025-03-30 01:00 local does not exist; it resolves to 02:00 BST
        let instant = resolve_period(date(2025, 3, 30), 3).unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-03-30T01:00:00+00:00");
    }

    #[test]
    fn test_resolve_period_autumn_overlap_takes_earliest() {
        // 2025-10-26 01:00 local occurs twice; the BST occurrence wins
        let instant = resolve_period(date(2025, 10, 26), 3).unwrap();
        assert_eq!(instant.to_rfc3339(), "2025-10-26T00:00:00+00:00");
    }

    #[test]
    fn test_resolve_period_rejects_out_of_range() {
        assert!(matches!(
            resolve_period(date(2025, 1, 1), 0),
            Err(DataError::InvalidPeriod(0))
        ));
        assert!(matches!(
            resolve_period(date(2025, 1, 1), 49),
            Err(DataError::InvalidPeriod(49))
        ));
    }

    #[test]
    fn test_latest_valid_instant_floors_to_half_hour() {
        let now = "2025-08-30T14:47:12Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            latest_valid_instant(now).to_rfc3339(),
            "2025-08-30T14:30:00+00:00"
        );

        let now = "2025-08-30T14:29:59Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(
            latest_valid_instant(now).to_rfc3339(),
            "2025-08-30T14:00:00+00:00"
        );

        let now = "2025-08-30T14:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(latest_valid_instant(now), now);
    }

    #[test]
    fn test_labels_use_london_wall_clock() {
        let instant = "2025-07-10T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(short_label(instant), "13:00");
        assert_eq!(long_label(instant), "Jul 10, 13:00");

        let instant = "2025-01-15T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(short_label(instant), "12:00");
    }
}
