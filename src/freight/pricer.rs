//! Freight pricing over a packed truck plan

use super::truck::TruckAllocation;
use crate::error::EngineError;
use crate::rates::{FreightRateTable, LengthCategory, TruckFleet};
use crate::rounding::{round_money, round_weight, trips_for};
use serde::{Deserialize, Serialize};

/// Priced freight for one quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreightSummary {
    pub truck_count: u32,

    pub real_weight_tons: f64,

    pub billable_weight_tons: f64,

    /// Sum of per-truck costs before the markup
    pub transport_base: f64,

    /// General expenses markup on the base
    pub general_expenses: f64,

    pub transport_total: f64,
}

/// Trip-count freight estimate for draft budgets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreightEstimate {
    pub trips: u32,

    pub transport_base: f64,

    pub general_expenses: f64,

    pub transport_total: f64,
}

/// Prices trucks against the distance-tiered rate table
pub struct FreightPricer<'a> {
    table: &'a FreightRateTable,

    /// General expenses percentage (GG)
    gg_pct: f64,
}

impl<'a> FreightPricer<'a> {
    pub fn new(table: &'a FreightRateTable, gg_pct: f64) -> Self {
        Self { table, gg_pct }
    }

    /// Price every truck of a packed plan and aggregate the totals
    ///
    /// Each truck bills `max(real, false)` tons at the tier rate for its
    /// length bucket. Money is rounded to 2 decimals per truck before
    /// summing so the total always matches the printed per-truck costs.
    pub fn price_trucks(
        &self,
        trucks: &mut [TruckAllocation],
        distance_km: f64,
    ) -> Result<FreightSummary, EngineError> {
        let tier = self.table.find_tier(distance_km)?;

        let mut transport_base = 0.0;
        let mut real_weight = 0.0;
        let mut billable_weight = 0.0;

        for truck in trucks.iter_mut() {
            let category = LengthCategory::for_length(truck.max_piece_length_m);
            let rate = tier.ton_rate(category);

            truck.cost = round_money(truck.billable_weight_tons() * rate);

            transport_base += truck.cost;
            real_weight += truck.real_weight_tons;
            billable_weight += truck.billable_weight_tons();
        }

        let transport_base = round_money(transport_base);
        let general_expenses = round_money(transport_base * self.gg_pct / 100.0);

        Ok(FreightSummary {
            truck_count: trucks.len() as u32,
            real_weight_tons: round_weight(real_weight),
            billable_weight_tons: round_weight(billable_weight),
            transport_base,
            general_expenses,
            transport_total: round_money(transport_base + general_expenses),
        })
    }

    /// Draft estimate from total weight alone
    ///
    /// Prices `ceil(total / capacity)` full standard-truck trips at the
    /// tier's flat trip rate; used before a piece-level plan exists.
    pub fn estimate_trips(
        &self,
        total_tons: f64,
        fleet: &TruckFleet,
        distance_km: f64,
    ) -> Result<FreightEstimate, EngineError> {
        fleet.validate()?;
        let tier = self.table.find_tier(distance_km)?;

        let trips = trips_for(total_tons, fleet.standard.max_payload_tons);
        let transport_base = round_money(trips as f64 * tier.trip_rate);
        let general_expenses = round_money(transport_base * self.gg_pct / 100.0);

        Ok(FreightEstimate {
            trips,
            transport_base,
            general_expenses,
            transport_total: round_money(transport_base + general_expenses),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{FreightRateTier, TruckClass};

    fn truck(real: f64, false_min: f64, max_length: f64) -> TruckAllocation {
        TruckAllocation {
            truck_number: 1,
            truck_class: TruckClass::Standard,
            length_category: LengthCategory::for_length(max_length),
            pieces: vec![],
            real_weight_tons: real,
            false_weight_tons: false_min,
            max_piece_length_m: max_length,
            requires_escort: false,
            cost: 0.0,
        }
    }

    #[test]
    fn test_trip_estimate_scenario() {
        // 30 t over 120 km with 26 t trucks: 2 trips at the 100-150 km rate
        let table = FreightRateTable::default_pricing();
        let pricer = FreightPricer::new(&table, 10.0);
        let fleet = TruckFleet::default();

        let estimate = pricer.estimate_trips(30.0, &fleet, 120.0).unwrap();
        assert_eq!(estimate.trips, 2);
        assert_eq!(estimate.transport_base, 2_000_000.0);
        assert_eq!(estimate.general_expenses, 200_000.0);
        assert_eq!(estimate.transport_total, 2_200_000.0);
    }

    #[test]
    fn test_truck_pricing_uses_billable_weight() {
        let table = FreightRateTable::new(vec![FreightRateTier {
            km_from: 0.0,
            km_to: 200.0,
            ton_rate_under_12m: 30_000.0,
            ton_rate_over_12m: 40_000.0,
            trip_rate: 0.0,
        }]);
        let pricer = FreightPricer::new(&table, 10.0);

        // 12 t real but 18 t minimum: bills 18 t
        let mut trucks = vec![truck(12.0, 18.0, 9.0), truck(20.0, 18.0, 14.5)];
        let summary = pricer.price_trucks(&mut trucks, 80.0).unwrap();

        assert_eq!(trucks[0].cost, 18.0 * 30_000.0);
        // over-12m bucket
        assert_eq!(trucks[1].cost, 20.0 * 40_000.0);

        assert_eq!(summary.truck_count, 2);
        assert_eq!(summary.real_weight_tons, 32.0);
        assert_eq!(summary.billable_weight_tons, 38.0);
        assert_eq!(summary.transport_base, 540_000.0 + 800_000.0);
        assert_eq!(summary.general_expenses, 134_000.0);
        assert_eq!(summary.transport_total, 1_474_000.0);
    }

    #[test]
    fn test_distance_outside_tiers_fails() {
        let table = FreightRateTable::default_pricing();
        let pricer = FreightPricer::new(&table, 10.0);

        let mut trucks = vec![truck(10.0, 18.0, 9.0)];
        let err = pricer.price_trucks(&mut trucks, 650.0).unwrap_err();
        assert_eq!(err, EngineError::DistanceOutsideTiers { distance_km: 650.0 });
    }

    #[test]
    fn test_totals_match_components() {
        let table = FreightRateTable::default_pricing();
        let pricer = FreightPricer::new(&table, 10.0);

        let mut trucks = vec![
            truck(13.37, 18.0, 9.0),
            truck(25.91, 18.0, 11.0),
            truck(7.05, 18.0, 6.0),
        ];
        let summary = pricer.price_trucks(&mut trucks, 45.0).unwrap();

        let rebuilt: f64 = trucks.iter().map(|t| t.cost).sum();
        assert_eq!(round_money(rebuilt), summary.transport_base);
        assert_eq!(
            summary.transport_total,
            round_money(summary.transport_base + summary.general_expenses)
        );
    }
}
