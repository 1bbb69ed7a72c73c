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

//! Core data pipeline for the GridION dashboard: settlement-period
//! timeline arithmetic, window selection, field aggregation, derived
//! boundary metrics, and the NESO datastore client feeding it all.

pub mod aggregate;
pub mod datasets;
pub mod geo;
pub mod metrics;
pub mod neso;
pub mod schemas;
pub mod series;
pub mod store;
pub mod timeline;
pub mod window;

pub use aggregate::{AggregationSchema, FieldFormula};
pub use metrics::{BoundaryAssessment, ConstraintModel, flow_volatility, utilization};
pub use neso::{NesoClient, resources};
pub use store::{DataHub, RecordStore};
pub use timeline::{latest_valid_instant, resolve_period};
pub use window::select;
