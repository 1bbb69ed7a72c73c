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

//! Map geometry: cable routes with real endpoint coordinates and the
//! styled GeoJSON feature assembly consumed by the map renderer.
//!
//! This module only produces data. Camera moves and animation timing are
//! the renderer's business.

use chrono::{DateTime, Utc};

use gridion_types::{SettlementRecord, WindowSpec};

use crate::schemas::{CABLES, Cable};
use crate::window::select;

/// (longitude, latitude)
pub type LonLat = (f64, f64);

/// A cable's physical landing points, GB end first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CableRoute {
    pub cable: Cable,
    pub gb_end: LonLat,
    pub far_end: LonLat,
    pub far_end_name: &'static str,
}

/// Landing coordinates for the eight interconnectors, paired index-for-index
/// with [`CABLES`].
pub const CABLE_ROUTES: [CableRoute; 8] = [
    CableRoute {
        cable: CABLES[0],
        gb_end: (1.113_289_511_710_579_9, 51.103_418_620_953_185),
        far_end: (1.843_746_695_419_794_3, 50.918_586_806_151_38),
        far_end_name: "Les Mandarins",
    },
    CableRoute {
        cable: CABLES[1],
        gb_end: (-1.078_082_039_417_061_8, 50.783_244_393_535_5),
        far_end: (-0.355_564_607_704_686_8, 49.252_922_881_363_524),
        far_end_name: "Tourbe",
    },
    CableRoute {
        cable: CABLES[2],
        gb_end: (1.251_511_226_202_367, 51.119_688_611_777_29),
        far_end: (2.000_793_976_918_258_6, 50.992_424_908_248_61),
        far_end_name: "Coquelles",
    },
    CableRoute {
        cable: CABLES[3],
        gb_end: (0.784_401_174_393_911_5, 51.421_044_153_972_9),
        far_end: (4.010_945_866_841_263, 51.937_569_564_556_1),
        far_end_name: "Maasvlakte",
    },
    CableRoute {
        cable: CABLES[4],
        gb_end: (1.425_909_959_533_029, 51.380_671_861_070_9),
        far_end: (3.148_836_171_637_843_2, 51.311_241_673_097),
        far_end_name: "Zeebrugge",
    },
    CableRoute {
        cable: CABLES[5],
        gb_end: (-1.537_758_263_094_745_7, 55.146_957_919_112_81),
        far_end: (5.914_769_385_343_425, 59.285_628_836_998_23),
        far_end_name: "Kvilldal",
    },
    CableRoute {
        cable: CABLES[6],
        gb_end: (0.248_547_664_828_626_75, 53.296_602_032_182_8),
        far_end: (8.257_409_460_962_705, 55.698_473_397_145_55),
        far_end_name: "Revsing",
    },
    CableRoute {
        cable: CABLES[7],
        gb_end: (-5.121_986_599_180_269, 51.747_221_260_687_866),
        far_end: (-7.067_225_838_405_891, 52.192_342_881_089_2),
        far_end_name: "Great Island",
    },
];

/// Installed wind capacity north of the B6 boundary (GW).
pub const B6_INSTALLED_NORTH_GW: f64 = 12.0;
/// B6 transfer limit southward (GW).
pub const B6_TRANSFER_LIMIT_GW: f64 = 5.5;

/// Default map camera center over GB.
pub const MAP_CENTER: LonLat = (-3.542_218, 53.072_854);

const IMPORT_COLOR: &str = "#3b82f6";
const EXPORT_COLOR: &str = "#f97316";
const IDLE_COLOR: &str = "#666666";

/// Flow magnitude below which a cable renders as idle.
const ACTIVE_FLOW_MW: f64 = 50.0;
/// Flow magnitude below which no flow dots are seeded.
const DOT_FLOW_MW: f64 = 10.0;

/// Build the styled feature collection for the map sink from the latest
/// valid record: one line feature per cable plus seed points for the flow
/// dots the renderer animates.
pub fn map_features(records: &[SettlementRecord], now: DateTime<Utc>) -> serde_json::Value {
    let latest = select(records, WindowSpec::TrailingIntervals(1), now)
        .into_iter()
        .next_back()
        .map(|(_, record)| record);

    let mut features = Vec::new();
    for route in &CABLE_ROUTES {
        let flow = latest
            .as_ref()
            .map(|r| r.value(route.cable.field))
            .unwrap_or(0.0);
        features.push(line_feature(route, flow));
        features.extend(dot_features(route, flow));
    }

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

fn line_feature(route: &CableRoute, flow: f64) -> serde_json::Value {
    let cable = route.cable;
    let utilization = flow.abs() / cable.capacity_mw;
    let active = flow.abs() > ACTIVE_FLOW_MW;

    let color = if !active {
        IDLE_COLOR
    } else if flow > 0.0 {
        IMPORT_COLOR
    } else {
        EXPORT_COLOR
    };
    let width = if active {
        (utilization * 8.0).clamp(2.0, 8.0)
    } else {
        2.0
    };

    serde_json::json!({
        "type": "Feature",
        "properties": {
            "kind": "cable",
            "name": cable.name,
            "counterparty": cable.counterparty,
            "farEnd": route.far_end_name,
            "flow": flow,
            "capacity": cable.capacity_mw,
            "utilization": (utilization * 100.0).round(),
            "status": if active { "active" } else { "idle" },
            "color": color,
            "width": width,
        },
        "geometry": {
            "type": "LineString",
            "coordinates": [
                [route.gb_end.0, route.gb_end.1],
                [route.far_end.0, route.far_end.1],
            ],
        },
    })
}

/// Evenly spaced seed points along the route. The renderer advances them;
/// `speed` and `reverse` tell it how fast and which way.
fn dot_features(route: &CableRoute, flow: f64) -> Vec<serde_json::Value> {
    if flow.abs() <= DOT_FLOW_MW {
        return Vec::new();
    }

    let (dx, dy) = (
        route.far_end.0 - route.gb_end.0,
        route.far_end.1 - route.gb_end.1,
    );
    let distance = dx.hypot(dy);
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "clamped to 3..=8"
    )]
    let base = (distance * 20.0).floor().clamp(3.0, 8.0) as usize;

    // The long subsea routes get denser dot trails
    let num_dots = match route.cable.name {
        "NSL" => (base * 3).min(15),
        "Viking Link" => (base * 2).min(12),
        _ => base,
    };
    let speed = flow.abs() / 1000.0;

    (0..num_dots)
        .map(|i| {
            #[expect(clippy::cast_precision_loss, reason = "dot counts are tiny")]
            let progress = i as f64 / num_dots as f64;
            serde_json::json!({
                "type": "Feature",
                "properties": {
                    "kind": "flowDot",
                    "cable": route.cable.name,
                    "progress": progress,
                    "speed": speed,
                    "reverse": flow < 0.0,
                },
                "geometry": {
                    "type": "Point",
                    "coordinates": [
                        route.gb_end.0 + dx * progress,
                        route.gb_end.1 + dy * progress,
                    ],
                },
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;
    use gridion_types::fields;

    use super::*;

    fn record(pairs: &[(&str, f64)]) -> SettlementRecord {
        let readings = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), *v))
            .collect::<BTreeMap<_, _>>();
        SettlementRecord::new(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(), 1, readings).unwrap()
    }

    fn noon() -> DateTime<Utc> {
        "2025-01-15T12:00:00Z".parse().unwrap()
    }

    fn cable_features(collection: &serde_json::Value) -> Vec<&serde_json::Value> {
        collection["features"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|f| f["properties"]["kind"] == "cable")
            .collect()
    }

    #[test]
    fn test_every_cable_gets_a_line_feature() {
        let collection = map_features(&[record(&[])], noon());
        assert_eq!(cable_features(&collection).len(), CABLE_ROUTES.len());
    }

    #[test]
    fn test_import_and_export_styling() {
        let collection = map_features(
            &[record(&[
                (fields::IFA_FLOW, 1500.0),
                (fields::NSL_FLOW, -1200.0),
                (fields::NEMO_FLOW, 20.0),
            ])],
            noon(),
        );
        let cables = cable_features(&collection);
        let by_name = |name: &str| {
            cables
                .iter()
                .find(|f| f["properties"]["name"] == name)
                .unwrap()
        };

        assert_eq!(by_name("IFA")["properties"]["color"], IMPORT_COLOR);
        assert_eq!(by_name("IFA")["properties"]["status"], "active");
        assert_eq!(by_name("NSL")["properties"]["color"], EXPORT_COLOR);
        // 20 MW is below the activity threshold
        assert_eq!(by_name("Nemo Link")["properties"]["status"], "idle");
        assert_eq!(by_name("Nemo Link")["properties"]["color"], IDLE_COLOR);
    }

    #[test]
    fn test_width_scales_with_utilization() {
        let collection = map_features(&[record(&[(fields::IFA_FLOW, 2000.0)])], noon());
        let cables = cable_features(&collection);
        let ifa = cables
            .iter()
            .find(|f| f["properties"]["name"] == "IFA")
            .unwrap();
        // Full utilization caps at width 8
        assert_eq!(ifa["properties"]["width"], 8.0);
        assert_eq!(ifa["properties"]["utilization"], 100.0);
    }

    #[test]
    fn test_dots_seeded_only_for_flowing_cables() {
        let collection = map_features(&[record(&[(fields::VIKING_FLOW, -900.0)])], noon());
        let features = collection["features"].as_array().unwrap();
        let dots: Vec<_> = features
            .iter()
            .filter(|f| f["properties"]["kind"] == "flowDot")
            .collect();
        assert!(!dots.is_empty());
        assert!(dots.iter().all(|d| d["properties"]["cable"] == "Viking Link"));
        assert!(dots.iter().all(|d| d["properties"]["reverse"] == true));
    }

    #[test]
    fn test_empty_store_renders_idle_map() {
        let collection = map_features(&[], noon());
        let cables = cable_features(&collection);
        assert_eq!(cables.len(), 8);
        assert!(cables.iter().all(|f| f["properties"]["status"] == "idle"));
    }
}
