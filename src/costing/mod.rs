//! Three-layer piece costing with polynomial escalation

mod breakdown;
mod engine;

pub use breakdown::{CostBreakdown, CostingSummary, QuotationCosting};
pub use engine::CostingEngine;
