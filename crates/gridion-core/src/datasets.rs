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

//! Auxiliary datasets: negative day-ahead prices (CSV), REPD onshore wind
//! capacity (GeoJSON) and constraint management spend (datastore rows).
//!
//! All three parsers are tolerant of upstream schema drift: rows that fail
//! to parse are skipped, and column names are detected rather than assumed.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use gridion_types::{DataError, DataResult};

/// Monthly counts of negative day-ahead price periods for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NegativePriceSummary {
    pub year: i32,
    /// Count of negative-price periods per calendar month, January first.
    pub monthly_counts: [u32; 12],
    pub total: u32,
}

/// Count negative-price delivery periods per month of `year`.
///
/// Column positions are found from the header: the first column whose name
/// contains `delivery_from` and the one named `price`. Rows with a missing
/// date or unparseable price are skipped.
pub fn negative_price_summary(csv_text: &str, year: i32) -> DataResult<NegativePriceSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| DataError::Parse(format!("negative price CSV has no header: {e}")))?;
    let date_idx = headers
        .iter()
        .position(|h| h.to_lowercase().contains("delivery_from"))
        .ok_or_else(|| DataError::Parse("no delivery_from column".to_owned()))?;
    let price_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("price"))
        .ok_or_else(|| DataError::Parse("no price column".to_owned()))?;

    let mut monthly_counts = [0u32; 12];
    let mut total = 0u32;
    let mut skipped = 0usize;

    for row in reader.records() {
        let Ok(row) = row else {
            skipped += 1;
            continue;
        };
        let date = row.get(date_idx).and_then(parse_flexible_date);
        let price = row
            .get(price_idx)
            .and_then(|p| p.trim().parse::<f64>().ok());
        let (Some(date), Some(price)) = (date, price) else {
            skipped += 1;
            continue;
        };
        if price < 0.0 && date.year() == year {
            let month0 = date.month0() as usize;
            monthly_counts[month0] += 1;
            total += 1;
        }
    }

    if skipped > 0 {
        debug!(skipped, "skipped unparseable negative price rows");
    }
    Ok(NegativePriceSummary {
        year,
        monthly_counts,
        total,
    })
}

#[derive(Debug, Deserialize)]
struct GeoFeatureCollection {
    #[serde(default)]
    features: Vec<GeoFeature>,
}

#[derive(Debug, Deserialize)]
struct GeoFeature {
    #[serde(default)]
    geometry: Option<serde_json::Value>,
    #[serde(default)]
    properties: serde_json::Map<String, serde_json::Value>,
}

/// Installed onshore wind capacity north and south of the border.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindCapacityComparison {
    pub scotland_gw: f64,
    pub england_gw: f64,
}

/// Aggregate REPD onshore wind capacity for Scotland and England (GW).
///
/// A site counts when it is onshore wind, operational or under
/// construction, outside Northern Ireland, has positive installed capacity
/// and carries geometry. All sizes count, including sub-25 MW sites.
pub fn wind_capacity_comparison(geojson_text: &str) -> DataResult<WindCapacityComparison> {
    let collection: GeoFeatureCollection = serde_json::from_str(geojson_text)
        .map_err(|e| DataError::Parse(format!("malformed REPD GeoJSON: {e}")))?;

    let mut scotland_mw = 0.0;
    let mut england_mw = 0.0;

    for feature in &collection.features {
        let prop_str = |key: &str| -> String {
            feature
                .properties
                .get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_lowercase()
        };
        let capacity_mw = feature
            .properties
            .get("Installed Capacity (MWelec)")
            .and_then(loose_number)
            .unwrap_or(0.0);

        let technology = prop_str("Technology Type");
        let status = prop_str("Development Status (short)");
        let country = prop_str("Country");

        let has_geometry = feature
            .geometry
            .as_ref()
            .is_some_and(|g| g.get("coordinates").is_some());

        if technology != "wind onshore"
            || !(status == "operational" || status == "under construction")
            || country == "northern ireland"
            || capacity_mw <= 0.0
            || !has_geometry
        {
            continue;
        }

        if country.contains("scotland") {
            scotland_mw += capacity_mw;
        } else if country.contains("england") {
            england_mw += capacity_mw;
        }
    }

    Ok(WindCapacityComparison {
        scotland_gw: round2(scotland_mw / 1000.0),
        england_gw: round2(england_mw / 1000.0),
    })
}

/// Year-to-date constraint spend with a flat-rate projection to year end.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendSummary {
    pub year: i32,
    /// Raw monthly totals, January first.
    pub monthly_totals: [f64; 12],
    /// Cumulative actual spend up to the last completed month; `None` past it.
    pub cumulative_actual: [Option<f64>; 12],
    /// Cumulative projection seeded at the cutoff month; `None` before it.
    pub cumulative_projected: [Option<f64>; 12],
    pub ytd_total: f64,
}

/// Aggregate constraint-spend rows into monthly totals for the year of `now`.
///
/// The upstream resource has renamed its columns before, so both the date
/// and the cost fields are detected per row: the date from a candidate-key
/// list falling back to any ISO-dated string value, the cost from an
/// explicit total-cost column falling back to summing every cost component.
pub fn constraint_spend_summary(
    rows: &[serde_json::Map<String, serde_json::Value>],
    now: DateTime<Utc>,
) -> SpendSummary {
    let year = now.year();
    let mut monthly_totals = [0.0f64; 12];

    for row in rows {
        let Some(date) = detect_date(row) else {
            continue;
        };
        if date.year() != year {
            continue;
        }
        monthly_totals[date.month0() as usize] += extract_total_cost(row);
    }

    // Project from the end of the last fully completed month. In January
    // nothing has completed yet, so there is no actual line to project from.
    let Some(cutoff) = (now.month0() as usize).checked_sub(1) else {
        return SpendSummary {
            year,
            monthly_totals,
            cumulative_actual: [None; 12],
            cumulative_projected: [None; 12],
            ytd_total: 0.0,
        };
    };
    let mut cumulative_actual = [None; 12];
    let mut running = 0.0;
    for (month, total) in monthly_totals.iter().enumerate().take(cutoff + 1) {
        running += total;
        cumulative_actual[month] = Some(running.round());
    }
    let ytd_total = running;
    #[expect(clippy::cast_precision_loss, reason = "at most 12 months")]
    let monthly_avg = ytd_total / (cutoff + 1) as f64;

    let mut cumulative_projected = [None; 12];
    cumulative_projected[cutoff] = Some(running.round());
    let mut projected = running;
    for slot in cumulative_projected.iter_mut().skip(cutoff + 1) {
        projected += monthly_avg;
        *slot = Some(projected.round());
    }

    SpendSummary {
        year,
        monthly_totals,
        cumulative_actual,
        cumulative_projected,
        ytd_total,
    }
}

const DATE_CANDIDATES: [&str; 5] = [
    "Date",
    "date",
    "Settlement Date",
    "Settlement date",
    "Settlement Date (UTC)",
];

fn detect_date(row: &serde_json::Map<String, serde_json::Value>) -> Option<NaiveDate> {
    for key in DATE_CANDIDATES {
        if let Some(date) = row
            .get(key)
            .and_then(serde_json::Value::as_str)
            .and_then(parse_flexible_date)
        {
            return Some(date);
        }
    }
    // Fallback: the first string value that carries an ISO date
    row.values()
        .filter_map(serde_json::Value::as_str)
        .find_map(parse_flexible_date)
}

fn extract_total_cost(row: &serde_json::Map<String, serde_json::Value>) -> f64 {
    let total_key = row
        .keys()
        .find(|k| {
            let lower = k.to_lowercase();
            lower.contains("total") && lower.contains("cost")
        })
        .cloned();
    if let Some(key) = total_key {
        return row.get(&key).and_then(loose_number).unwrap_or(0.0);
    }
    row.iter()
        .filter(|(k, _)| k.to_lowercase().contains("cost"))
        .filter_map(|(_, v)| loose_number(v))
        .sum()
}

/// Accept `YYYY-MM-DD` anywhere in a plain-date or datetime string.
fn parse_flexible_date(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn loose_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Null
        | serde_json::Value::Bool(_)
        | serde_json::Value::Array(_)
        | serde_json::Value::Object(_) => None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
