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

//! Canonical chart schemas and the physical constants behind them.
//!
//! Positive MW is always import into GB, negative is export.

use gridion_types::fields;

use crate::aggregate::{AggregationSchema, FieldFormula};

/// One interconnector cable with its nameplate capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cable {
    pub name: &'static str,
    pub field: &'static str,
    pub counterparty: &'static str,
    pub capacity_mw: f64,
    pub commissioned: &'static str,
}

pub const CABLES: [Cable; 8] = [
    Cable {
        name: "IFA",
        field: fields::IFA_FLOW,
        counterparty: "France",
        capacity_mw: 2000.0,
        commissioned: "1986 (upgraded 2019)",
    },
    Cable {
        name: "IFA2",
        field: fields::IFA2_FLOW,
        counterparty: "France",
        capacity_mw: 1000.0,
        commissioned: "2021",
    },
    Cable {
        name: "ElecLink",
        field: fields::ELECLINK_FLOW,
        counterparty: "France",
        capacity_mw: 1000.0,
        commissioned: "2019",
    },
    Cable {
        name: "BritNed",
        field: fields::BRITNED_FLOW,
        counterparty: "Netherlands",
        capacity_mw: 1000.0,
        commissioned: "2011",
    },
    Cable {
        name: "Nemo Link",
        field: fields::NEMO_FLOW,
        counterparty: "Belgium",
        capacity_mw: 1000.0,
        commissioned: "2019",
    },
    Cable {
        name: "NSL",
        field: fields::NSL_FLOW,
        counterparty: "Norway",
        capacity_mw: 1400.0,
        commissioned: "2021",
    },
    Cable {
        name: "Viking Link",
        field: fields::VIKING_FLOW,
        counterparty: "Denmark",
        capacity_mw: 1400.0,
        commissioned: "2023",
    },
    Cable {
        name: "Greenlink",
        field: fields::GREENLINK_FLOW,
        counterparty: "Ireland",
        capacity_mw: 500.0,
        commissioned: "2024",
    },
];

/// A country grouping of one or more cables.
#[derive(Debug, Clone, Copy)]
pub struct CountryGroup {
    pub name: &'static str,
    pub fields: &'static [&'static str],
    pub capacity_mw: f64,
}

pub const FRANCE_FIELDS: [&str; 3] = [fields::IFA_FLOW, fields::IFA2_FLOW, fields::ELECLINK_FLOW];

/// Headline French boundary capacity used by the constraint model; covers
/// the commissioned corridor rather than the sum of today's nameplates.
pub const FRANCE_CAPACITY_MW: f64 = 5400.0;

/// Thermal limit of the B6 Anglo-Scottish transmission boundary.
pub const SCOTTISH_BOUNDARY_CAPACITY_MW: f64 = 7000.0;

pub const COUNTRIES: [CountryGroup; 6] = [
    CountryGroup {
        name: "France",
        fields: &FRANCE_FIELDS,
        capacity_mw: FRANCE_CAPACITY_MW,
    },
    CountryGroup {
        name: "Netherlands",
        fields: &[fields::BRITNED_FLOW],
        capacity_mw: 1000.0,
    },
    CountryGroup {
        name: "Belgium",
        fields: &[fields::NEMO_FLOW],
        capacity_mw: 1000.0,
    },
    CountryGroup {
        name: "Norway",
        fields: &[fields::NSL_FLOW],
        capacity_mw: 1400.0,
    },
    CountryGroup {
        name: "Denmark",
        fields: &[fields::VIKING_FLOW],
        capacity_mw: 1400.0,
    },
    CountryGroup {
        name: "Ireland",
        fields: &[fields::GREENLINK_FLOW],
        capacity_mw: 500.0,
    },
];

/// National and transmission system demand.
pub fn demand() -> AggregationSchema {
    AggregationSchema::new(
        "demand",
        vec![
            ("nationalDemand", FieldFormula::Source(fields::ND)),
            ("transmissionDemand", FieldFormula::Source(fields::TSD)),
        ],
    )
}

const EXTRA_LOAD_FORMULA: FieldFormula = FieldFormula::Difference {
    minuend: fields::TSD,
    subtrahend: fields::ND,
};
const NATIONAL_DEMAND_FORMULA: FieldFormula = FieldFormula::Source(fields::ND);

/// TSD minus ND: station load, pumping and interconnector export headroom.
pub fn extra_load() -> AggregationSchema {
    AggregationSchema::new(
        "extraLoad",
        vec![
            ("extraLoad", EXTRA_LOAD_FORMULA),
            (
                "extraLoadPct",
                FieldFormula::PercentOf {
                    numerator: &EXTRA_LOAD_FORMULA,
                    denominator: &NATIONAL_DEMAND_FORMULA,
                },
            ),
            (
                "pumpStoragePumping",
                FieldFormula::Source(fields::PUMP_STORAGE_PUMPING),
            ),
        ],
    )
}

/// Net flow per counterparty country plus the overall net.
pub fn country_flows() -> AggregationSchema {
    let mut fields_out: Vec<(&'static str, FieldFormula)> = COUNTRIES
        .iter()
        .map(|country| (country.name, FieldFormula::Sum(country.fields)))
        .collect();
    fields_out.push(("net", FieldFormula::Sum(&fields::ALL_CABLE_FLOWS)));
    AggregationSchema::new("countryFlows", fields_out)
}

/// Each cable's flow individually.
pub fn cable_flows() -> AggregationSchema {
    AggregationSchema::new(
        "cableFlows",
        CABLES
            .iter()
            .map(|cable| (cable.name, FieldFormula::Source(cable.field)))
            .collect(),
    )
}

/// Estimated distribution-connected wind and solar.
pub fn embedded_generation() -> AggregationSchema {
    AggregationSchema::new(
        "embeddedGeneration",
        vec![
            (
                "embeddedWind",
                FieldFormula::Source(fields::EMBEDDED_WIND_GENERATION),
            ),
            (
                "embeddedSolar",
                FieldFormula::Source(fields::EMBEDDED_SOLAR_GENERATION),
            ),
            (
                "embeddedTotal",
                FieldFormula::Sum(&[
                    fields::EMBEDDED_WIND_GENERATION,
                    fields::EMBEDDED_SOLAR_GENERATION,
                ]),
            ),
        ],
    )
}

/// Demand against imports and embedded generation, with the import share.
pub fn grid_balance() -> AggregationSchema {
    AggregationSchema::new(
        "gridBalance",
        vec![
            ("demand", FieldFormula::Source(fields::ND)),
            ("netImports", FieldFormula::Sum(&fields::ALL_CABLE_FLOWS)),
            (
                "embeddedGeneration",
                FieldFormula::Sum(&[
                    fields::EMBEDDED_WIND_GENERATION,
                    fields::EMBEDDED_SOLAR_GENERATION,
                ]),
            ),
        ],
    )
}
