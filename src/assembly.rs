//! Assembly and crane logistics pricing
//!
//! Mounting is priced from the tonnage to assemble, the crane round trip to
//! the site, and crew-plus-crane days, with the general expenses markup on
//! the subtotal.

use crate::error::EngineError;
use crate::rates::AssemblyRates;
use crate::rounding::round_money;
use serde::{Deserialize, Serialize};

/// Mounting work requested for a quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyParams {
    /// Total tons to mount
    pub total_tons: f64,

    /// Crew-plus-crane days on site
    pub assembly_days: f64,

    /// One-way crane transfer distance in km
    pub crane_transfer_km: f64,

    /// Days a second crane is needed (0 when disabled)
    #[serde(default)]
    pub extra_crane_days: f64,
}

/// Priced mounting work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblySummary {
    /// Per-ton mounting cost
    pub standard_cost: f64,

    /// Crane round trip to the site
    pub crane_transfer_cost: f64,

    /// Crew and crane days, including the extra crane when requested
    pub crew_cost: f64,

    pub subtotal: f64,

    pub general_expenses: f64,

    pub total: f64,
}

/// Prices mounting work against the assembly rates
pub struct AssemblyPricer<'a> {
    rates: &'a AssemblyRates,

    /// General expenses percentage (GG)
    gg_pct: f64,
}

impl<'a> AssemblyPricer<'a> {
    pub fn new(rates: &'a AssemblyRates, gg_pct: f64) -> Self {
        Self { rates, gg_pct }
    }

    pub fn price(&self, params: &AssemblyParams) -> Result<AssemblySummary, EngineError> {
        let non_negative = [
            ("total tons", params.total_tons),
            ("assembly days", params.assembly_days),
            ("crane transfer km", params.crane_transfer_km),
            ("extra crane days", params.extra_crane_days),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "assembly parameter {} is negative",
                    field
                )));
            }
        }

        let standard_cost = params.total_tons * self.rates.assembly_per_ton;
        // Round trip
        let crane_transfer_cost = params.crane_transfer_km * 2.0 * self.rates.crane_km_cost;
        let crew_cost = params.assembly_days * self.rates.crew_with_crane_day
            + params.extra_crane_days * self.rates.extra_crane_day;

        let subtotal = round_money(standard_cost + crane_transfer_cost + crew_cost);
        let general_expenses = round_money(subtotal * self.gg_pct / 100.0);

        Ok(AssemblySummary {
            standard_cost: round_money(standard_cost),
            crane_transfer_cost: round_money(crane_transfer_cost),
            crew_cost: round_money(crew_cost),
            subtotal,
            general_expenses,
            total: round_money(subtotal + general_expenses),
        })
    }
}
