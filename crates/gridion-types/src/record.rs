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

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

/// Field names as published by the NESO demand/flow datastore resource.
///
/// Flow sign convention (load-bearing for every consumer): positive MW is
/// import into GB, negative MW is export from GB.
pub mod fields {
    /// National Demand (MW)
    pub const ND: &str = "ND";
    /// Transmission System Demand (MW)
    pub const TSD: &str = "TSD";
    pub const IFA_FLOW: &str = "IFA_FLOW";
    pub const IFA2_FLOW: &str = "IFA2_FLOW";
    pub const BRITNED_FLOW: &str = "BRITNED_FLOW";
    pub const NEMO_FLOW: &str = "NEMO_FLOW";
    pub const NSL_FLOW: &str = "NSL_FLOW";
    pub const ELECLINK_FLOW: &str = "ELECLINK_FLOW";
    pub const VIKING_FLOW: &str = "VIKING_FLOW";
    pub const GREENLINK_FLOW: &str = "GREENLINK_FLOW";
    pub const EMBEDDED_WIND_GENERATION: &str = "EMBEDDED_WIND_GENERATION";
    pub const EMBEDDED_SOLAR_GENERATION: &str = "EMBEDDED_SOLAR_GENERATION";
    pub const PUMP_STORAGE_PUMPING: &str = "PUMP_STORAGE_PUMPING";
    pub const SCOTTISH_TRANSFER: &str = "SCOTTISH_TRANSFER";

    /// Every interconnector cable flow field, one per cable.
    pub const ALL_CABLE_FLOWS: [&str; 8] = [
        IFA_FLOW,
        IFA2_FLOW,
        ELECLINK_FLOW,
        BRITNED_FLOW,
        NEMO_FLOW,
        NSL_FLOW,
        VIKING_FLOW,
        GREENLINK_FLOW,
    ];
}

const DATE_KEY: &str = "SETTLEMENT_DATE";
const PERIOD_KEY: &str = "SETTLEMENT_PERIOD";

/// One half-hour settlement interval of grid state.
///
/// Immutable after creation; absent readings are read as 0.0 downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// Nominal calendar day of the interval
    pub settlement_date: NaiveDate,

    /// 1-indexed half-hour slot within the day, always in 1..=48
    pub settlement_period: u32,

    /// Named numeric readings (MW) keyed by upstream field name
    #[serde(default)]
    pub readings: BTreeMap<String, f64>,
}

impl SettlementRecord {
    /// Build a record with an already validated period.
    pub fn new(
        settlement_date: NaiveDate,
        settlement_period: u32,
        readings: BTreeMap<String, f64>,
    ) -> DataResult<Self> {
        if !(1..=48).contains(&settlement_period) {
            return Err(DataError::InvalidPeriod(settlement_period));
        }
        Ok(Self {
            settlement_date,
            settlement_period,
            readings,
        })
    }

    /// Read a field, defaulting absent values to 0.0 (never NaN/null).
    pub fn value(&self, field: &str) -> f64 {
        self.readings.get(field).copied().unwrap_or(0.0)
    }

    /// Identity of the interval, used for deduplication.
    pub fn interval_key(&self) -> (NaiveDate, u32) {
        (self.settlement_date, self.settlement_period)
    }

    /// Convert one row object of the CKAN `datastore_search` envelope.
    ///
    /// Non-numeric extra fields (`_id`, the date itself) are skipped rather
    /// than failing the row; a missing or malformed date/period fails it.
    pub fn from_row(row: &serde_json::Map<String, serde_json::Value>) -> DataResult<Self> {
        let date_raw = row
            .get(DATE_KEY)
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| DataError::Parse(format!("row missing {DATE_KEY}")))?;
        let settlement_date = parse_settlement_date(date_raw)?;

        let settlement_period = row
            .get(PERIOD_KEY)
            .and_then(number_like)
            .ok_or_else(|| DataError::Parse(format!("row missing {PERIOD_KEY}")))?;
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "range-checked in new()"
        )]
        let settlement_period = settlement_period.round().max(0.0) as u32;

        let mut readings = BTreeMap::new();
        for (key, value) in row {
            if key == DATE_KEY || key == PERIOD_KEY || key == "_id" {
                continue;
            }
            if let Some(v) = number_like(value) {
                readings.insert(key.clone(), v);
            }
        }

        Self::new(settlement_date, settlement_period, readings)
    }
}

/// Accept numbers directly or as strings, like CKAN sometimes delivers them.
fn number_like(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Null
        | serde_json::Value::Bool(_)
        | serde_json::Value::Array(_)
        | serde_json::Value::Object(_) => None,
    }
}

/// The resource serves either plain dates or midnight datetimes.
fn parse_settlement_date(raw: &str) -> DataResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .map_err(|e| DataError::Parse(format!("bad settlement date '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_from_row_parses_numeric_fields() {
        let record = SettlementRecord::from_row(&row(json!({
            "_id": 17,
            "SETTLEMENT_DATE": "2025-08-30",
            "SETTLEMENT_PERIOD": 5,
            "ND": 28450.0,
            "IFA_FLOW": -750,
            "FORECAST_FLAG": "N"
        })))
        .unwrap();

        assert_eq!(
            record.settlement_date,
            NaiveDate::from_ymd_opt(2025, 8, 30).unwrap()
        );
        assert_eq!(record.settlement_period, 5);
        assert_eq!(record.value(fields::ND), 28450.0);
        assert_eq!(record.value(fields::IFA_FLOW), -750.0);
        // Absent and non-numeric fields both read as zero
        assert_eq!(record.value(fields::BRITNED_FLOW), 0.0);
        assert_eq!(record.value("FORECAST_FLAG"), 0.0);
    }

    #[test]
    fn test_from_row_accepts_datetime_dates_and_string_numbers() {
        let record = SettlementRecord::from_row(&row(json!({
            "SETTLEMENT_DATE": "2025-08-30T00:00:00",
            "SETTLEMENT_PERIOD": "12",
            "TSD": "31500.5"
        })))
        .unwrap();

        assert_eq!(record.settlement_period, 12);
        assert_eq!(record.value(fields::TSD), 31500.5);
    }

    #[test]
    fn test_period_out_of_range_is_rejected() {
        let result = SettlementRecord::from_row(&row(json!({
            "SETTLEMENT_DATE": "2025-08-30",
            "SETTLEMENT_PERIOD": 49,
            "ND": 1.0
        })));
        assert!(matches!(result, Err(DataError::InvalidPeriod(49))));

        let result = SettlementRecord::from_row(&row(json!({
            "SETTLEMENT_DATE": "2025-08-30",
            "SETTLEMENT_PERIOD": 0,
            "ND": 1.0
        })));
        assert!(matches!(result, Err(DataError::InvalidPeriod(0))));
    }

    #[test]
    fn test_missing_date_fails_the_row() {
        let result = SettlementRecord::from_row(&row(json!({
            "SETTLEMENT_PERIOD": 1
        })));
        assert!(matches!(result, Err(DataError::Parse(_))));
    }
}
