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

//! Chart series assembly: window selection, schema evaluation and labels
//! combined into frontend-ready responses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use gridion_types::{
    RiskThresholds, SeriesPoint, SeriesResponse, SettlementRecord, TrendBands, WindowSpec, fields,
};

use crate::aggregate::AggregationSchema;
use crate::metrics::{BoundaryAssessment, ConstraintModel, assess_boundary, utilization};
use crate::schemas::{CABLES, COUNTRIES, FRANCE_FIELDS};
use crate::timeline::{long_label, short_label};
use crate::window::select;

/// A cable below this absolute flow counts as standby on the country cards.
const CARD_ACTIVE_THRESHOLD_MW: f64 = 100.0;

/// Build one chart series from raw records.
///
/// Empty windows come back as an explicit no-data response, never as
/// fabricated values.
pub fn build_series(
    records: &[SettlementRecord],
    schema: &AggregationSchema,
    window: WindowSpec,
    now: DateTime<Utc>,
) -> SeriesResponse {
    let points = select(records, window, now)
        .into_iter()
        .map(|(instant, record)| SeriesPoint {
            timestamp: instant,
            short_label: short_label(instant),
            long_label: long_label(instant),
            values: schema.apply(&record),
        })
        .collect();
    SeriesResponse::from_points(points)
}

/// Assess every modelled boundary against the windowed records.
pub fn boundary_assessments(
    records: &[SettlementRecord],
    window: WindowSpec,
    now: DateTime<Utc>,
    thresholds: &RiskThresholds,
    bands: &TrendBands,
) -> Vec<BoundaryAssessment> {
    let windowed = select(records, window, now);

    let france: Vec<f64> = windowed
        .iter()
        .map(|(_, r)| FRANCE_FIELDS.iter().map(|f| r.value(f)).sum())
        .collect();
    let scottish: Vec<f64> = windowed
        .iter()
        .map(|(_, r)| r.value(fields::SCOTTISH_TRANSFER))
        .collect();
    let dutch: Vec<f64> = windowed
        .iter()
        .map(|(_, r)| r.value(fields::BRITNED_FLOW))
        .collect();

    let embedded_wind_mw = windowed
        .last()
        .map(|(_, record)| record.value(fields::EMBEDDED_WIND_GENERATION))
        .unwrap_or(0.0);

    vec![
        assess_boundary(
            ConstraintModel::FranceBoundary,
            &france,
            embedded_wind_mw,
            thresholds,
            bands,
        ),
        assess_boundary(
            ConstraintModel::ScottishBoundary,
            &scottish,
            embedded_wind_mw,
            thresholds,
            bands,
        ),
        assess_boundary(
            ConstraintModel::DutchBoundary,
            &dutch,
            embedded_wind_mw,
            thresholds,
            bands,
        ),
    ]
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CableDetail {
    pub name: &'static str,
    pub flow_mw: f64,
    pub capacity_mw: f64,
    pub utilization_pct: f64,
    pub status: &'static str,
    pub commissioned: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryDetail {
    pub country: &'static str,
    pub total_flow_mw: f64,
    pub capacity_mw: f64,
    pub utilization_pct: f64,
    pub cables: Vec<CableDetail>,
}

/// Per-country cards built from the latest interval: total flow,
/// utilization and a per-cable breakdown. With no records every flow
/// reads zero and every cable is standby.
pub fn country_detail(records: &[SettlementRecord], now: DateTime<Utc>) -> Vec<CountryDetail> {
    let latest = select(records, WindowSpec::TrailingIntervals(1), now)
        .pop()
        .map(|(_, record)| record);

    COUNTRIES
        .iter()
        .map(|country| {
            let cables: Vec<CableDetail> = CABLES
                .iter()
                .filter(|cable| country.fields.contains(&cable.field))
                .map(|cable| {
                    let flow = latest.as_ref().map_or(0.0, |r| r.value(cable.field));
                    CableDetail {
                        name: cable.name,
                        flow_mw: flow,
                        capacity_mw: cable.capacity_mw,
                        utilization_pct: utilization(flow, cable.capacity_mw),
                        status: if flow.abs() > CARD_ACTIVE_THRESHOLD_MW {
                            "active"
                        } else {
                            "standby"
                        },
                        commissioned: cable.commissioned,
                    }
                })
                .collect();
            let total_flow_mw: f64 = cables.iter().map(|c| c.flow_mw).sum();
            CountryDetail {
                country: country.name,
                total_flow_mw,
                capacity_mw: country.capacity_mw,
                utilization_pct: utilization(total_flow_mw, country.capacity_mw),
                cables,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use gridion_types::SeriesStatus;

    use super::*;
    use crate::schemas;

    fn record(period: u32, pairs: &[(&str, f64)]) -> SettlementRecord {
        let readings = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), *v))
            .collect::<BTreeMap<_, _>>();
        SettlementRecord::new(
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            period,
            readings,
        )
        .unwrap()
    }

    fn noon() -> DateTime<Utc> {
        "2025-01-15T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_build_series_labels_and_values() {
        let records = vec![
            record(1, &[(fields::ND, 28000.0), (fields::TSD, 30000.0)]),
            record(2, &[(fields::ND, 27500.0), (fields::TSD, 29500.0)]),
        ];
        let series = build_series(&records, &schemas::demand(), WindowSpec::DAY, noon());

        assert_eq!(series.status, SeriesStatus::Ok);
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[0].short_label, "00:00");
        assert_eq!(series.points[1].short_label, "00:30");
        assert_eq!(series.points[0].long_label, "Jan 15, 00:00");
        assert_eq!(series.points[0].values.get("nationalDemand"), Some(&28000.0));
    }

    #[test]
    fn test_empty_window_reports_no_data() {
        let series = build_series(&[], &schemas::demand(), WindowSpec::DAY, noon());
        assert_eq!(series.status, SeriesStatus::NoData);
        assert!(series.points.is_empty());
    }

    #[test]
    fn test_boundary_assessments_cover_all_models() {
        let records = vec![
            record(
                1,
                &[
                    (fields::IFA_FLOW, 2000.0),
                    (fields::IFA2_FLOW, 700.0),
                    (fields::SCOTTISH_TRANSFER, 4800.0),
                    (fields::BRITNED_FLOW, 900.0),
                    (fields::EMBEDDED_WIND_GENERATION, 4200.0),
                ],
            ),
            record(
                2,
                &[
                    (fields::IFA_FLOW, 2100.0),
                    (fields::IFA2_FLOW, 800.0),
                    (fields::SCOTTISH_TRANSFER, 5100.0),
                    (fields::BRITNED_FLOW, 950.0),
                    (fields::EMBEDDED_WIND_GENERATION, 4400.0),
                ],
            ),
        ];

        let assessments = boundary_assessments(
            &records,
            WindowSpec::DAY,
            noon(),
            &RiskThresholds::default(),
            &TrendBands::default(),
        );

        assert_eq!(assessments.len(), 3);
        // France reads the summed corridor, latest interval
        assert_eq!(assessments[0].latest_flow_mw, 2900.0);
        // Scottish model sees the latest embedded wind estimate
        assert!(assessments[1].risk_score > 0.0);
        assert_eq!(assessments[2].latest_flow_mw, 950.0);
    }

    #[test]
    fn test_country_detail_groups_and_classifies() {
        let records = vec![record(
            1,
            &[
                (fields::IFA_FLOW, 1500.0),
                (fields::IFA2_FLOW, 60.0),
                (fields::NSL_FLOW, -1400.0),
            ],
        )];
        let cards = country_detail(&records, noon());

        assert_eq!(cards.len(), 6);
        let france = &cards[0];
        assert_eq!(france.country, "France");
        assert_eq!(france.total_flow_mw, 1560.0);
        assert_eq!(france.cables.len(), 3);
        assert_eq!(france.cables[0].status, "active");
        // 60 MW is below the activity threshold
        assert_eq!(france.cables[1].status, "standby");
        assert_eq!(france.cables[2].flow_mw, 0.0);

        let norway = cards.iter().find(|c| c.country == "Norway").unwrap();
        assert_eq!(norway.total_flow_mw, -1400.0);
        assert_eq!(norway.cables[0].status, "active");
        assert_eq!(norway.utilization_pct, 100.0);
    }

    #[test]
    fn test_country_detail_empty_store() {
        let cards = country_detail(&[], noon());
        assert_eq!(cards.len(), 6);
        assert!(cards.iter().all(|c| c.total_flow_mw == 0.0));
        assert!(
            cards
                .iter()
                .flat_map(|c| &c.cables)
                .all(|cable| cable.status == "standby")
        );
    }
}
