//! Cost breakdown output structures

use serde::{Deserialize, Serialize};

/// Full cost trace for one piece line
///
/// Layer costs are per single piece; `total_cost = final_unit_cost ×
/// quantity`. Nothing is rounded here, presentation rounding happens at the
/// aggregation boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostBreakdown {
    // Identity
    pub piece_id: u32,
    pub piece_name: String,
    pub quantity: u32,

    // Physicals
    pub measure: f64,
    pub weight_tons: f64,

    // Cost model inputs (per piece)
    pub materials_cost: f64,
    pub materials_estimated: bool,
    pub process_cost: f64,

    // Layered costs (per piece)
    pub base_cost: f64,
    pub after_discount: f64,
    pub after_adjustment: f64,
    pub after_special_adjustment: f64,

    // Escalation
    pub polynomial_factor: f64,

    // Results
    pub final_unit_cost: f64,
    pub total_cost: f64,
}

impl CostBreakdown {
    /// Create a breakdown row with identity set and values zeroed
    pub fn new(piece_id: u32, piece_name: &str, quantity: u32) -> Self {
        Self {
            piece_id,
            piece_name: piece_name.to_string(),
            quantity,
            measure: 0.0,
            weight_tons: 0.0,
            materials_cost: 0.0,
            materials_estimated: false,
            process_cost: 0.0,
            base_cost: 0.0,
            after_discount: 0.0,
            after_adjustment: 0.0,
            after_special_adjustment: 0.0,
            polynomial_factor: 1.0,
            final_unit_cost: 0.0,
            total_cost: 0.0,
        }
    }
}

/// Per-piece costing output for a full quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationCosting {
    pub breakdowns: Vec<CostBreakdown>,
}

impl QuotationCosting {
    pub fn new() -> Self {
        Self { breakdowns: Vec::new() }
    }

    pub fn add_row(&mut self, row: CostBreakdown) {
        self.breakdowns.push(row);
    }

    /// Summary statistics across all piece lines
    pub fn summary(&self) -> CostingSummary {
        let total_quantity: u32 = self.breakdowns.iter().map(|r| r.quantity).sum();
        let total_weight_tons: f64 = self.breakdowns.iter().map(|r| r.weight_tons).sum();
        let subtotal: f64 = self.breakdowns.iter().map(|r| r.total_cost).sum();
        let any_estimated = self.breakdowns.iter().any(|r| r.materials_estimated);

        CostingSummary {
            piece_lines: self.breakdowns.len() as u32,
            total_quantity,
            total_weight_tons,
            subtotal,
            any_estimated,
        }
    }
}

impl Default for QuotationCosting {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of a quotation's piece costing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostingSummary {
    pub piece_lines: u32,
    pub total_quantity: u32,
    pub total_weight_tons: f64,
    pub subtotal: f64,

    /// True when any line priced against incomplete data; callers must
    /// surface this to the user
    pub any_estimated: bool,
}
