//! Quotation engine for pricing full budgets
//!
//! Pre-loads the reference tables once, then prices any number of
//! quotation requests without re-reading CSV files. Every invocation owns
//! its working data, so quotations may be priced in parallel by the caller.

use crate::assembly::{AssemblyParams, AssemblyPricer, AssemblySummary};
use crate::costing::{CostBreakdown, CostingEngine, CostingSummary};
use crate::error::EngineError;
use crate::freight::{
    FreightEstimate, FreightPacker, FreightPricer, FreightSummary, PackerConfig, TruckAllocation,
};
use crate::piece::Piece;
use crate::quotation::QuotationTotals;
use crate::rates::{Period, Rates};
use serde::{Deserialize, Serialize};

/// Everything the engine needs to price one quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationRequest {
    pub pieces: Vec<Piece>,

    /// Factory-to-site distance in km
    pub distance_km: f64,

    /// Period the piece prices were established in
    pub base_period: Period,

    /// Period the quotation is priced for
    pub target_period: Period,

    /// Mounting work, when quoted
    #[serde(default)]
    pub assembly: Option<AssemblyParams>,

    /// Extra negotiated items added to the grand total
    #[serde(default)]
    pub additionals: f64,

    #[serde(default)]
    pub packing: PackerConfig,
}

/// Complete priced output for one quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationResult {
    pub breakdowns: Vec<CostBreakdown>,

    pub costing_summary: CostingSummary,

    /// Escalation factor applied to every piece
    pub polynomial_factor: f64,

    pub trucks: Vec<TruckAllocation>,

    pub freight: FreightSummary,

    pub assembly: Option<AssemblySummary>,

    pub totals: QuotationTotals,

    /// True when any piece priced against incomplete reference data;
    /// must be surfaced to the user alongside the totals
    pub partial_pricing: bool,
}

/// Pre-loaded quotation engine
///
/// # Example
/// ```ignore
/// let engine = QuotationEngine::from_csv()?;
///
/// for request in requests {
///     let result = engine.price(&request)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct QuotationEngine {
    rates: Rates,
}

impl QuotationEngine {
    /// Engine with the built-in workbook defaults
    pub fn new() -> Self {
        Self {
            rates: Rates::default_pricing(),
        }
    }

    /// Engine loading reference tables from the default data/rates/ location
    pub fn from_csv() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            rates: Rates::from_csv()?,
        })
    }

    /// Engine loading reference tables from a specific directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            rates: Rates::from_csv_path(path)?,
        })
    }

    /// Engine with pre-built reference data
    pub fn with_rates(rates: Rates) -> Self {
        Self { rates }
    }

    /// Get reference to the rates for inspection
    pub fn rates(&self) -> &Rates {
        &self.rates
    }

    /// Get mutable reference to the rates for customization
    pub fn rates_mut(&mut self) -> &mut Rates {
        &mut self.rates
    }

    /// Price one quotation end to end
    ///
    /// Piece costing, truck packing, freight, optional mounting, and the
    /// aggregated totals, in that order. Fails fast on configuration or
    /// input problems without partial output.
    pub fn price(&self, request: &QuotationRequest) -> Result<QuotationResult, EngineError> {
        self.rates.validate()?;
        validate_request(request)?;

        let costing_engine =
            CostingEngine::for_periods(&self.rates, request.base_period, request.target_period)?;
        let costing = costing_engine.cost_pieces(&request.pieces)?;
        let costing_summary = costing.summary();

        let packer = FreightPacker::new(
            &self.rates.trucks,
            &self.rates.false_tonnage,
            request.packing.clone(),
        );
        let mut trucks = packer.pack(&request.pieces)?;

        let gg_pct = self.rates.general_expenses_pct;
        let pricer = FreightPricer::new(&self.rates.freight, gg_pct);
        let freight = pricer.price_trucks(&mut trucks, request.distance_km)?;

        let assembly = match &request.assembly {
            Some(params) => Some(AssemblyPricer::new(&self.rates.assembly, gg_pct).price(params)?),
            None => None,
        };
        let mounting_total = assembly.as_ref().map_or(0.0, |a| a.total);

        let totals = QuotationTotals::compute(
            &costing.breakdowns,
            gg_pct,
            freight.transport_total,
            mounting_total,
            request.additionals,
        );

        Ok(QuotationResult {
            partial_pricing: costing_summary.any_estimated,
            polynomial_factor: costing_engine.polynomial_factor(),
            breakdowns: costing.breakdowns,
            costing_summary,
            trucks,
            freight,
            assembly,
            totals,
        })
    }

    /// Price several quotations with the same reference data
    pub fn price_batch(
        &self,
        requests: &[QuotationRequest],
    ) -> Vec<Result<QuotationResult, EngineError>> {
        requests.iter().map(|r| self.price(r)).collect()
    }

    /// Draft freight estimate from total weight alone
    pub fn estimate_freight(
        &self,
        total_tons: f64,
        distance_km: f64,
    ) -> Result<FreightEstimate, EngineError> {
        FreightPricer::new(&self.rates.freight, self.rates.general_expenses_pct).estimate_trips(
            total_tons,
            &self.rates.trucks,
            distance_km,
        )
    }
}

impl Default for QuotationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_request(request: &QuotationRequest) -> Result<(), EngineError> {
    if request.distance_km < 0.0 {
        return Err(EngineError::InvalidInput(
            "distance must not be negative".to_string(),
        ));
    }
    if request.additionals < 0.0 {
        return Err(EngineError::InvalidInput(
            "additionals must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{AdjustmentCategory, UnitOfMeasure};
    use crate::rounding::round_money;

    fn sample_pieces() -> Vec<Piece> {
        vec![
            Piece {
                length_m: 5.0,
                width_m: 1.8,
                height_m: 0.15,
                volume_m3: 0.15,
                weight_per_measure: 0.233,
                unit_price: Some(55.5),
                ..Piece::new(1, "Losa", UnitOfMeasure::Area, AdjustmentCategory::Special, 16)
            },
            Piece {
                length_m: 9.5,
                width_m: 0.5,
                height_m: 0.5,
                volume_m3: 0.25,
                weight_per_measure: 0.61,
                unit_price: Some(105.0),
                ..Piece::new(2, "Pilar", UnitOfMeasure::Length, AdjustmentCategory::General, 12)
            },
            Piece {
                unit_weight_kg: Some(500.0),
                unit_price: Some(120.0),
                ..Piece::new(3, "Anclaje", UnitOfMeasure::Unit, AdjustmentCategory::General, 8)
            },
        ]
    }

    fn sample_request() -> QuotationRequest {
        QuotationRequest {
            pieces: sample_pieces(),
            distance_km: 120.0,
            base_period: Period::new(2024, 1),
            target_period: Period::new(2024, 3),
            assembly: Some(AssemblyParams {
                total_tons: 30.0,
                assembly_days: 1.0,
                crane_transfer_km: 50.0,
                extra_crane_days: 0.0,
            }),
            additionals: 150_000.0,
            packing: PackerConfig::default(),
        }
    }

    #[test]
    fn test_full_quotation() {
        let engine = QuotationEngine::new();
        let result = engine.price(&sample_request()).unwrap();

        assert_eq!(result.breakdowns.len(), 3);
        assert!(result.polynomial_factor > 1.0);
        assert!(!result.trucks.is_empty());
        assert!(result.freight.transport_total > 0.0);
        assert!(result.assembly.is_some());
        assert!(!result.partial_pricing);

        // all placed units accounted for
        let placed: u32 = result.trucks.iter().map(|t| t.unit_count()).sum();
        assert_eq!(placed, 36);

        let totals = &result.totals;
        assert_eq!(
            totals.grand_total,
            round_money(
                totals.subtotal_pieces
                    + totals.general_expenses
                    + totals.transport
                    + totals.mounting
                    + totals.additionals
            )
        );
        assert_eq!(totals.transport, result.freight.transport_total);
        assert_eq!(totals.mounting, result.assembly.as_ref().unwrap().total);
        assert_eq!(totals.additionals, 150_000.0);
    }

    #[test]
    fn test_same_request_same_budget() {
        let engine = QuotationEngine::new();
        let request = sample_request();

        let first = engine.price(&request).unwrap();
        let second = engine.price(&request).unwrap();

        assert_eq!(first.totals.grand_total.to_bits(), second.totals.grand_total.to_bits());
        assert_eq!(first.trucks.len(), second.trucks.len());
        assert_eq!(
            first.freight.transport_total.to_bits(),
            second.freight.transport_total.to_bits()
        );
    }

    #[test]
    fn test_distance_outside_tiers() {
        let engine = QuotationEngine::new();
        let request = QuotationRequest {
            distance_km: 2_000.0,
            ..sample_request()
        };

        assert_eq!(
            engine.price(&request).unwrap_err(),
            EngineError::DistanceOutsideTiers { distance_km: 2_000.0 }
        );
    }

    #[test]
    fn test_negative_distance_rejected() {
        let engine = QuotationEngine::new();
        let request = QuotationRequest {
            distance_km: -5.0,
            ..sample_request()
        };

        assert!(matches!(
            engine.price(&request).unwrap_err(),
            EngineError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_partial_pricing_is_surfaced() {
        let engine = QuotationEngine::new();
        let mut request = sample_request();
        // piece costed from a family estimate instead of a commercial price
        request.pieces[2].unit_price = None;
        request.pieces[2].family_alpha = Some(90.0);

        let result = engine.price(&request).unwrap();
        assert!(result.partial_pricing);
    }

    #[test]
    fn test_quotation_without_assembly() {
        let engine = QuotationEngine::new();
        let request = QuotationRequest {
            assembly: None,
            ..sample_request()
        };

        let result = engine.price(&request).unwrap();
        assert!(result.assembly.is_none());
        assert_eq!(result.totals.mounting, 0.0);
    }

    #[test]
    fn test_batch_matches_single_runs() {
        let engine = QuotationEngine::new();
        let requests = vec![sample_request(), sample_request()];

        let batch = engine.price_batch(&requests);
        assert_eq!(batch.len(), 2);

        let single = engine.price(&requests[0]).unwrap();
        let from_batch = batch[0].as_ref().unwrap();
        assert_eq!(single.totals.grand_total, from_batch.totals.grand_total);
    }

    #[test]
    fn test_draft_freight_estimate() {
        let engine = QuotationEngine::new();
        let estimate = engine.estimate_freight(30.0, 120.0).unwrap();

        assert_eq!(estimate.trips, 2);
        assert_eq!(estimate.transport_total, 2_200_000.0);
    }
}
