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

//! Declarative per-interval field aggregation.
//!
//! Charts differ only in which upstream fields they combine and how; the
//! combination rules live in data rather than in per-chart code.

use std::collections::BTreeMap;

use gridion_types::SettlementRecord;

/// How one output field is computed from a record's readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldFormula {
    /// Pass one upstream field through unchanged.
    Source(&'static str),

    /// Sum a set of upstream fields.
    Sum(&'static [&'static str]),

    /// `minuend - subtrahend`, e.g. TSD minus ND for the extra load.
    Difference {
        minuend: &'static str,
        subtrahend: &'static str,
    },

    /// `numerator / denominator * 100`, reading 0.0 when the denominator
    /// is zero rather than producing NaN. Operands are formulas, so a
    /// derived quantity can be expressed as a share of another field.
    PercentOf {
        numerator: &'static FieldFormula,
        denominator: &'static FieldFormula,
    },
}

impl FieldFormula {
    pub fn evaluate(&self, record: &SettlementRecord) -> f64 {
        match self {
            Self::Source(field) => record.value(field),
            Self::Sum(fields) => fields.iter().map(|f| record.value(f)).sum(),
            Self::Difference {
                minuend,
                subtrahend,
            } => record.value(minuend) - record.value(subtrahend),
            Self::PercentOf {
                numerator,
                denominator,
            } => {
                let denom = denominator.evaluate(record);
                if denom == 0.0 {
                    0.0
                } else {
                    numerator.evaluate(record) / denom * 100.0
                }
            }
        }
    }
}

/// A named set of output fields with their formulas.
#[derive(Debug, Clone)]
pub struct AggregationSchema {
    pub name: &'static str,
    pub fields: Vec<(&'static str, FieldFormula)>,
}

impl AggregationSchema {
    pub fn new(name: &'static str, fields: Vec<(&'static str, FieldFormula)>) -> Self {
        Self { name, fields }
    }

    /// Evaluate every output field against one record.
    pub fn apply(&self, record: &SettlementRecord) -> BTreeMap<String, f64> {
        self.fields
            .iter()
            .map(|(name, formula)| ((*name).to_owned(), formula.evaluate(record)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
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

    #[test]
    fn test_formulas_evaluate() {
        let r = record(&[
            (fields::ND, 28000.0),
            (fields::TSD, 31000.0),
            (fields::IFA_FLOW, 1500.0),
            (fields::IFA2_FLOW, -500.0),
        ]);

        assert_eq!(FieldFormula::Source(fields::ND).evaluate(&r), 28000.0);
        assert_eq!(
            FieldFormula::Sum(&[fields::IFA_FLOW, fields::IFA2_FLOW]).evaluate(&r),
            1000.0
        );
        assert_eq!(
            FieldFormula::Difference {
                minuend: fields::TSD,
                subtrahend: fields::ND
            }
            .evaluate(&r),
            3000.0
        );
    }

    #[test]
    fn test_percent_of_guards_zero_denominator() {
        const NUMERATOR: FieldFormula = FieldFormula::Source(fields::IFA_FLOW);
        const DENOMINATOR: FieldFormula = FieldFormula::Source(fields::ND);
        let percent = FieldFormula::PercentOf {
            numerator: &NUMERATOR,
            denominator: &DENOMINATOR,
        };

        let r = record(&[(fields::IFA_FLOW, 1500.0)]);
        assert_eq!(percent.evaluate(&r), 0.0);

        let r = record(&[(fields::IFA_FLOW, 1500.0), (fields::ND, 30000.0)]);
        assert_eq!(percent.evaluate(&r), 5.0);
    }

    #[test]
    fn test_percent_of_derived_numerator() {
        const EXTRA: FieldFormula = FieldFormula::Difference {
            minuend: fields::TSD,
            subtrahend: fields::ND,
        };
        const ND_ONLY: FieldFormula = FieldFormula::Source(fields::ND);
        let percent = FieldFormula::PercentOf {
            numerator: &EXTRA,
            denominator: &ND_ONLY,
        };

        let r = record(&[(fields::ND, 30000.0), (fields::TSD, 31500.0)]);
        assert_eq!(percent.evaluate(&r), 5.0);
    }

    #[test]
    fn test_schema_apply_names_outputs() {
        let schema = AggregationSchema::new(
            "demand",
            vec![
                ("nd", FieldFormula::Source(fields::ND)),
                ("tsd", FieldFormula::Source(fields::TSD)),
            ],
        );
        let out = schema.apply(&record(&[(fields::ND, 1.0), (fields::TSD, 2.0)]));
        assert_eq!(out.get("nd"), Some(&1.0));
        assert_eq!(out.get("tsd"), Some(&2.0));
    }

    #[test]
    fn test_missing_fields_read_as_zero() {
        let schema = AggregationSchema::new(
            "empty",
            vec![("sum", FieldFormula::Sum(&fields::ALL_CABLE_FLOWS))],
        );
        let out = schema.apply(&record(&[]));
        assert_eq!(out.get("sum"), Some(&0.0));
    }
}
