//! Per-piece costing engine
//!
//! Runs the three-layer cost model over each piece: materials + process
//! base cost, then discount, general adjustment and special-category
//! adjustment, then the polynomial escalation factor. Pieces carrying a
//! commercial unit price bypass the materials/process model but flow
//! through the same layers.

use super::breakdown::{CostBreakdown, QuotationCosting};
use crate::error::EngineError;
use crate::piece::Piece;
use crate::rates::{Period, PolynomialFormula, Rates};

/// Coefficient sums further from 1.0 than this are logged as drift
const COEFFICIENT_DRIFT_TOLERANCE: f64 = 1e-6;

/// Costing engine for one pricing run
///
/// The escalation factor is resolved once per run from the base and target
/// periods; every piece of the run escalates by the same factor.
#[derive(Debug)]
pub struct CostingEngine<'a> {
    rates: &'a Rates,
    factor: f64,
}

impl<'a> CostingEngine<'a> {
    /// Resolve the escalation factor between two periods and build the engine
    ///
    /// The formula is the one active on the first day of the target period.
    pub fn for_periods(rates: &'a Rates, base: Period, target: Period) -> Result<Self, EngineError> {
        let base_index = rates.indices.get_period(base)?;
        let target_index = rates.indices.get_period(target)?;

        let quote_date = target.first_day().ok_or_else(|| {
            EngineError::InvalidInput(format!("invalid target period {}/{}", target.month, target.year))
        })?;
        let formula = rates.formulas.active_on(quote_date)?;

        let sum = formula.coefficient_sum();
        if (sum - 1.0).abs() > COEFFICIENT_DRIFT_TOLERANCE {
            log::warn!("polynomial coefficients sum to {:.6}, expected 1.0", sum);
        }

        let factor = formula.escalation_factor(base_index, target_index)?;
        Ok(Self { rates, factor })
    }

    /// Build an engine with an explicit escalation factor
    ///
    /// Used when validating historical prices against a known factor and by
    /// the draft path, where the factor comes straight from the workbook.
    pub fn with_factor(rates: &'a Rates, factor: f64) -> Self {
        Self { rates, factor }
    }

    /// The escalation factor applied to every piece of this run
    pub fn polynomial_factor(&self) -> f64 {
        self.factor
    }

    /// The factor as a display percentage
    pub fn adjustment_percent(&self) -> f64 {
        PolynomialFormula::adjustment_percent(self.factor)
    }

    /// Cost every piece of a quotation
    pub fn cost_pieces(&self, pieces: &[Piece]) -> Result<QuotationCosting, EngineError> {
        let mut costing = QuotationCosting::new();
        for piece in pieces {
            costing.add_row(self.cost_piece(piece)?);
        }
        Ok(costing)
    }

    /// Run the full cost pipeline for a single piece
    pub fn cost_piece(&self, piece: &Piece) -> Result<CostBreakdown, EngineError> {
        validate_piece(piece)?;

        let mut row = CostBreakdown::new(piece.piece_id, &piece.name, piece.quantity);
        row.measure = piece.measure();
        row.weight_tons = piece.total_weight_tons();
        row.polynomial_factor = self.factor;

        let measure_per_piece = piece.measure_per_piece();

        // Base cost per measure unit: commercial price when present,
        // otherwise BOM materials plus factory process cost
        let per_measure_base = match piece.unit_price {
            Some(price) => price,
            None => {
                let materials = self.rates.materials.resolve(&piece.bom, piece.family_alpha);
                let process = self.rates.process.cost_per_measure(piece);

                row.materials_cost = materials.amount * measure_per_piece;
                row.materials_estimated = materials.estimated;
                row.process_cost = process * measure_per_piece;

                materials.amount + process
            }
        };

        row.base_cost = per_measure_base * measure_per_piece;

        let scale = &self.rates.adjustments;
        row.after_discount = row.base_cost * (1.0 + scale.general_discount_pct / 100.0);
        row.after_adjustment = row.after_discount * (1.0 + scale.general_adjustment_pct / 100.0);
        row.after_special_adjustment = if piece.category.is_special() {
            row.after_adjustment * (1.0 + scale.special_adjustment_pct / 100.0)
        } else {
            row.after_adjustment
        };

        row.final_unit_cost = row.after_special_adjustment * self.factor;
        row.total_cost = row.final_unit_cost * piece.quantity as f64;

        Ok(row)
    }
}

/// Reject pieces the cost model cannot price
fn validate_piece(piece: &Piece) -> Result<(), EngineError> {
    let non_negative = [
        ("weight per measure", piece.weight_per_measure),
        ("length", piece.length_m),
        ("width", piece.width_m),
        ("height", piece.height_m),
        ("volume", piece.volume_m3),
        ("steel", piece.steel_kg),
    ];
    for (field, value) in non_negative {
        if value < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "piece {} has negative {}",
                piece.piece_id, field
            )));
        }
    }

    if piece.unit_price.is_some_and(|p| p < 0.0) {
        return Err(EngineError::InvalidInput(format!(
            "piece {} has a negative unit price",
            piece.piece_id
        )));
    }

    if piece.unit_weight_kg.is_some_and(|w| w < 0.0) {
        return Err(EngineError::InvalidInput(format!(
            "piece {} has a negative unit weight",
            piece.piece_id
        )));
    }

    for line in &piece.bom {
        if line.quantity_per_unit < 0.0 || line.scrap_pct < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "piece {} BOM line for material {} has negative values",
                piece.piece_id, line.material_id
            )));
        }
    }

    if !piece.has_weight_source() {
        return Err(EngineError::InvalidInput(format!(
            "piece {} has neither a usable weight nor a BOM to derive one",
            piece.piece_id
        )));
    }

    Ok(())
}
