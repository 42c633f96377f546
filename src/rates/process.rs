//! Factory process cost parameters

use crate::piece::Piece;
use serde::{Deserialize, Serialize};

/// Per-ton process costs and labor-hour rates for one pricing context
///
/// One active set per context. Amounts are in quotation currency; the
/// per-ton components apply to the piece weight, the labor components to
/// concrete volume and reinforcement steel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessParameters {
    /// Curing energy cost per ton
    pub curing_energy_per_ton: f64,

    /// Factory overhead per ton
    pub factory_overhead_per_ton: f64,

    /// Company overhead per ton
    pub company_overhead_per_ton: f64,

    /// Profit margin per ton
    pub profit_per_ton: f64,

    /// Engineering cost per ton
    pub engineering_per_ton: f64,

    /// Labor cost per hour
    pub labor_hour_rate: f64,

    /// Labor hours per cubic meter of concrete
    pub hours_per_m3_concrete: f64,

    /// Labor hours per kilogram of reinforcement steel
    pub hours_per_kg_steel: f64,
}

impl Default for ProcessParameters {
    fn default() -> Self {
        Self {
            curing_energy_per_ton: 1_800.0,
            factory_overhead_per_ton: 5_200.0,
            company_overhead_per_ton: 3_100.0,
            profit_per_ton: 4_500.0,
            engineering_per_ton: 900.0,
            labor_hour_rate: 6_500.0,
            hours_per_m3_concrete: 1.6,
            hours_per_kg_steel: 0.012,
        }
    }
}

impl ProcessParameters {
    /// Sum of the per-ton cost components
    pub fn per_ton_total(&self) -> f64 {
        self.curing_energy_per_ton
            + self.factory_overhead_per_ton
            + self.company_overhead_per_ton
            + self.profit_per_ton
            + self.engineering_per_ton
    }

    /// Process cost of a piece per measure unit
    ///
    /// Per-ton overhead applies to the weight behind one measure unit;
    /// labor applies to the concrete volume and steel mass per measure unit.
    pub fn cost_per_measure(&self, piece: &Piece) -> f64 {
        let measure = piece.measure_per_piece();
        let weight_per_measure = if measure > 0.0 {
            piece.piece_weight_tons() / measure
        } else {
            0.0
        };

        let overhead = weight_per_measure * self.per_ton_total();
        let labor = self.labor_hour_rate
            * (piece.volume_m3 * self.hours_per_m3_concrete
                + piece.steel_kg * self.hours_per_kg_steel);

        overhead + labor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{AdjustmentCategory, Piece, UnitOfMeasure};

    #[test]
    fn test_per_ton_total() {
        let params = ProcessParameters::default();
        assert!((params.per_ton_total() - 15_500.0).abs() < 1e-9);
    }

    fn simple_params() -> ProcessParameters {
        ProcessParameters {
            curing_energy_per_ton: 1_000.0,
            factory_overhead_per_ton: 2_000.0,
            company_overhead_per_ton: 0.0,
            profit_per_ton: 0.0,
            engineering_per_ton: 0.0,
            labor_hour_rate: 100.0,
            hours_per_m3_concrete: 2.0,
            hours_per_kg_steel: 0.01,
        }
    }

    #[test]
    fn test_cost_per_measure() {
        let piece = Piece {
            weight_per_measure: 0.5,
            volume_m3: 0.2,
            steel_kg: 10.0,
            ..Piece::new(1, "Anclaje", UnitOfMeasure::Unit, AdjustmentCategory::General, 4)
        };

        // overhead: 0.5 t * 3000 = 1500
        // labor: 100 * (0.2 * 2.0 + 10 * 0.01) = 50
        assert!((simple_params().cost_per_measure(&piece) - 1_550.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_measure_piece_contributes_labor_only() {
        // Area piece with no dimensions has zero measure per piece
        let piece = Piece {
            weight_per_measure: 0.5,
            volume_m3: 0.2,
            steel_kg: 10.0,
            ..Piece::new(2, "Panel", UnitOfMeasure::Area, AdjustmentCategory::General, 4)
        };

        assert!((simple_params().cost_per_measure(&piece) - 50.0).abs() < 1e-9);
    }
}
