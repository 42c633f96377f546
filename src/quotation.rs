//! Quotation totals and the workflow boundary

use crate::costing::CostBreakdown;
use crate::rounding::round_money;
use serde::{Deserialize, Serialize};

/// Workflow state of a quotation
///
/// The engine only computes values consumed at draft/presented time;
/// performing transitions is the calling layer's responsibility. The
/// predicate below just answers which moves are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotationStatus {
    Draft,
    Presented,
    Approved,
    Rejected,
    Cancelled,
}

impl Default for QuotationStatus {
    fn default() -> Self {
        QuotationStatus::Draft
    }
}

impl QuotationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            QuotationStatus::Approved | QuotationStatus::Rejected | QuotationStatus::Cancelled
        )
    }

    /// Whether the workflow allows moving to `next`
    ///
    /// Draft → Presented → Approved | Rejected; any non-terminal state can
    /// be cancelled.
    pub fn can_transition(&self, next: QuotationStatus) -> bool {
        match (self, next) {
            (QuotationStatus::Draft, QuotationStatus::Presented) => true,
            (QuotationStatus::Presented, QuotationStatus::Approved) => true,
            (QuotationStatus::Presented, QuotationStatus::Rejected) => true,
            (from, QuotationStatus::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Final money lines of a quotation
///
/// Every component is rounded to 2 decimals before the final sum, so the
/// grand total always equals the sum of the printed components.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationTotals {
    /// Sum of per-piece total costs
    pub subtotal_pieces: f64,

    /// General expenses markup on the piece subtotal
    pub general_expenses: f64,

    /// Freight total, markup included
    pub transport: f64,

    /// Mounting total, markup included
    pub mounting: f64,

    /// Extra negotiated items
    pub additionals: f64,

    pub grand_total: f64,
}

impl QuotationTotals {
    /// Aggregate the final budget from its priced parts
    pub fn compute(
        breakdowns: &[CostBreakdown],
        gg_pct: f64,
        transport: f64,
        mounting: f64,
        additionals: f64,
    ) -> Self {
        let subtotal_pieces: f64 = breakdowns.iter().map(|b| round_money(b.total_cost)).sum();
        let subtotal_pieces = round_money(subtotal_pieces);
        let general_expenses = round_money(subtotal_pieces * gg_pct / 100.0);

        let transport = round_money(transport);
        let mounting = round_money(mounting);
        let additionals = round_money(additionals);

        let grand_total =
            round_money(subtotal_pieces + general_expenses + transport + mounting + additionals);

        Self {
            subtotal_pieces,
            general_expenses,
            transport,
            mounting,
            additionals,
            grand_total,
        }
    }
}
