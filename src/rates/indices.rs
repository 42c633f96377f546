//! Monthly cost indices and the polynomial escalation formula
//!
//! Escalation re-prices a base-period cost for a target period using a
//! weighted sum of index ratios (steel, labor, concrete, fuel). Index rows
//! are an append-only history; coefficients come from the formula active on
//! the quotation date.

use crate::error::EngineError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A (year, month) pricing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    /// Month 1-12
    pub month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// First day of the period; None for an invalid month
    pub fn first_day(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

/// One row of the monthly index history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyIndex {
    /// Month 1-12
    pub month: u32,

    pub year: i32,

    pub steel_index: f64,

    pub labor_index: f64,

    pub concrete_index: f64,

    pub fuel_index: f64,

    /// Dollar exchange rate the steel index was derived from
    pub dollar_rate: f64,
}

impl MonthlyIndex {
    /// History key, ordered chronologically
    pub fn key(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    /// Re-derive the steel index from a new dollar rate
    ///
    /// Steel is dollar-denominated, so a rate move re-prices it by a single
    /// proportional update rather than a full formula recomputation. The
    /// other components are untouched.
    pub fn with_dollar_rate(&self, new_rate: f64) -> Self {
        let steel_index = if self.dollar_rate > 0.0 {
            self.steel_index * new_rate / self.dollar_rate
        } else {
            self.steel_index
        };

        Self {
            steel_index,
            dollar_rate: new_rate,
            ..self.clone()
        }
    }
}

/// Append-only history of monthly indices, one row per (year, month)
#[derive(Debug, Clone, Default)]
pub struct IndexHistory {
    rows: BTreeMap<(i32, u32), MonthlyIndex>,
}

impl IndexHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<MonthlyIndex>) -> Self {
        let mut history = Self::new();
        for row in rows {
            history.insert(row);
        }
        history
    }

    /// Insert a row; an existing period is never overwritten
    ///
    /// Returns false (and keeps the existing row) when the period is already
    /// present.
    pub fn insert(&mut self, row: MonthlyIndex) -> bool {
        let key = row.key();
        if self.rows.contains_key(&key) {
            log::warn!("index row for {}/{} already exists, keeping the original", key.1, key.0);
            return false;
        }
        self.rows.insert(key, row);
        true
    }

    /// Look up the row for a period, or a typed configuration error
    pub fn get(&self, year: i32, month: u32) -> Result<&MonthlyIndex, EngineError> {
        self.rows
            .get(&(year, month))
            .ok_or(EngineError::MissingIndex { month, year })
    }

    /// Look up the row for a pricing period
    pub fn get_period(&self, period: Period) -> Result<&MonthlyIndex, EngineError> {
        self.get(period.year, period.month)
    }

    /// Most recent row, if any
    pub fn latest(&self) -> Option<&MonthlyIndex> {
        self.rows.values().next_back()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Active polynomial coefficient set with its effective date range
///
/// Coefficients sum to 1.0 by convention; drift is surfaced through
/// `coefficient_sum`, not rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolynomialFormula {
    pub steel_coefficient: f64,

    pub labor_coefficient: f64,

    pub concrete_coefficient: f64,

    pub fuel_coefficient: f64,

    pub effective_from: NaiveDate,

    /// Open-ended when None
    pub effective_to: Option<NaiveDate>,
}

impl Default for PolynomialFormula {
    fn default() -> Self {
        Self {
            steel_coefficient: 0.35,
            labor_coefficient: 0.30,
            concrete_coefficient: 0.25,
            fuel_coefficient: 0.10,
            effective_from: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            effective_to: None,
        }
    }
}

impl PolynomialFormula {
    /// Sum of the four coefficients (1.0 by convention)
    pub fn coefficient_sum(&self) -> f64 {
        self.steel_coefficient
            + self.labor_coefficient
            + self.concrete_coefficient
            + self.fuel_coefficient
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.map_or(true, |to| date <= to)
    }

    /// Escalation factor between a base and a target period
    ///
    /// `factor = Σ (target.x / base.x) × coefficient_x` over steel, labor,
    /// concrete and fuel. A zero base component is a fatal configuration
    /// error: base indices must be seeded before use.
    pub fn escalation_factor(
        &self,
        base: &MonthlyIndex,
        target: &MonthlyIndex,
    ) -> Result<f64, EngineError> {
        let components: [(&'static str, f64, f64, f64); 4] = [
            ("steel", base.steel_index, target.steel_index, self.steel_coefficient),
            ("labor", base.labor_index, target.labor_index, self.labor_coefficient),
            ("concrete", base.concrete_index, target.concrete_index, self.concrete_coefficient),
            ("fuel", base.fuel_index, target.fuel_index, self.fuel_coefficient),
        ];

        let mut factor = 0.0;
        for (component, base_value, target_value, coefficient) in components {
            if base_value <= 0.0 {
                return Err(EngineError::ZeroBaseIndex {
                    component,
                    month: base.month,
                    year: base.year,
                });
            }
            factor += target_value / base_value * coefficient;
        }

        Ok(factor)
    }

    /// The factor expressed as a display percentage: `(factor − 1) × 100`
    pub fn adjustment_percent(factor: f64) -> f64 {
        (factor - 1.0) * 100.0
    }
}

/// All formula rows ever configured; at most one is active on a given date
#[derive(Debug, Clone, Default)]
pub struct FormulaSet {
    formulas: Vec<PolynomialFormula>,
}

impl FormulaSet {
    pub fn new(formulas: Vec<PolynomialFormula>) -> Self {
        Self { formulas }
    }

    /// Formula active on the given date, or a typed configuration error
    pub fn active_on(&self, date: NaiveDate) -> Result<&PolynomialFormula, EngineError> {
        self.formulas
            .iter()
            .find(|f| f.is_active_on(date))
            .ok_or(EngineError::NoActiveFormula { date })
    }
}
