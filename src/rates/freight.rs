//! Freight rate tiers, truck specifications and assembly rates

use crate::error::EngineError;
use crate::piece::Piece;
use serde::{Deserialize, Serialize};

/// Length classification driving truck class and freight rate buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthCategory {
    Under12m,
    Over12m,
}

impl LengthCategory {
    pub fn for_length(length_m: f64) -> Self {
        if length_m > 12.0 {
            LengthCategory::Over12m
        } else {
            LengthCategory::Under12m
        }
    }
}

/// Truck class, chosen by the longest piece on board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TruckClass {
    /// Flatbed up to 12 m
    Standard,
    /// Extensible trailer, 12 to 21.5 m
    Medium,
    /// Special transport beyond 21.5 m
    Extended,
}

impl TruckClass {
    /// Class required to carry a piece of the given length
    pub fn for_length(length_m: f64) -> Self {
        if length_m > 21.5 {
            TruckClass::Extended
        } else if length_m > 12.0 {
            TruckClass::Medium
        } else {
            TruckClass::Standard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TruckClass::Standard => "standard",
            TruckClass::Medium => "medium",
            TruckClass::Extended => "extended",
        }
    }
}

/// One freight rate bracket
///
/// `ton_rate_*` price detailed per-truck freight by billable ton; the flat
/// `trip_rate` prices the draft estimator's full-truck trips. A bracket
/// matches when `km_from <= distance <= km_to`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreightRateTier {
    pub km_from: f64,

    pub km_to: f64,

    /// Rate per billable ton for pieces up to 12 m
    pub ton_rate_under_12m: f64,

    /// Rate per billable ton for pieces over 12 m
    pub ton_rate_over_12m: f64,

    /// Flat rate per truck trip
    pub trip_rate: f64,
}

impl FreightRateTier {
    pub fn contains(&self, distance_km: f64) -> bool {
        self.km_from <= distance_km && distance_km <= self.km_to
    }

    /// Per-ton rate for a length bucket
    ///
    /// Falls back to the other bucket when the requested one is unset,
    /// so a table seeded with a single rate column still prices.
    pub fn ton_rate(&self, category: LengthCategory) -> f64 {
        let (wanted, other) = match category {
            LengthCategory::Under12m => (self.ton_rate_under_12m, self.ton_rate_over_12m),
            LengthCategory::Over12m => (self.ton_rate_over_12m, self.ton_rate_under_12m),
        };
        if wanted > 0.0 {
            wanted
        } else {
            other
        }
    }
}

/// Distance-tiered freight rate table
///
/// Tiers are non-overlapping by convention; lookup must produce exactly one
/// match, anything else is a configuration error.
#[derive(Debug, Clone, Default)]
pub struct FreightRateTable {
    tiers: Vec<FreightRateTier>,
}

impl FreightRateTable {
    pub fn new(tiers: Vec<FreightRateTier>) -> Self {
        Self { tiers }
    }

    /// Default brackets used until a commercial table is loaded
    pub fn default_pricing() -> Self {
        Self::new(vec![
            FreightRateTier { km_from: 0.0, km_to: 50.0, ton_rate_under_12m: 28_000.0, ton_rate_over_12m: 36_000.0, trip_rate: 750_000.0 },
            FreightRateTier { km_from: 50.0, km_to: 100.0, ton_rate_under_12m: 32_000.0, ton_rate_over_12m: 38_000.0, trip_rate: 900_000.0 },
            FreightRateTier { km_from: 100.0, km_to: 150.0, ton_rate_under_12m: 36_000.0, ton_rate_over_12m: 44_000.0, trip_rate: 1_000_000.0 },
            FreightRateTier { km_from: 150.0, km_to: 250.0, ton_rate_under_12m: 45_000.0, ton_rate_over_12m: 55_000.0, trip_rate: 1_400_000.0 },
            FreightRateTier { km_from: 250.0, km_to: 500.0, ton_rate_under_12m: 60_000.0, ton_rate_over_12m: 75_000.0, trip_rate: 2_200_000.0 },
        ])
    }

    /// The unique tier containing the distance
    ///
    /// Brackets share boundary values (a 100 km trip matches both the
    /// 50-100 and 100-150 brackets in the default table), so only interior
    /// double-matches count as ambiguity.
    pub fn find_tier(&self, distance_km: f64) -> Result<&FreightRateTier, EngineError> {
        let mut matches = self.tiers.iter().filter(|t| t.contains(distance_km));

        let first = matches
            .next()
            .ok_or(EngineError::DistanceOutsideTiers { distance_km })?;

        if let Some(second) = matches.next() {
            // Shared boundary between consecutive brackets is fine
            if first.km_to != second.km_from {
                return Err(EngineError::AmbiguousRateTier { distance_km });
            }
        }

        Ok(first)
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }
}

/// Physical truck specification for one class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckSpec {
    pub max_payload_tons: f64,

    pub deck_length_m: f64,

    pub deck_width_m: f64,

    pub max_stack_height_m: f64,

    pub max_stack_layers: u32,

    /// Fraction of the geometric deck volume usable for cargo
    pub usable_volume_factor: f64,
}

impl TruckSpec {
    /// Usable cargo volume in cubic meters
    pub fn usable_volume_m3(&self) -> f64 {
        self.deck_length_m * self.deck_width_m * self.max_stack_height_m * self.usable_volume_factor
    }

    /// Volume/footprint bound on how many units of a piece fit on one truck
    ///
    /// `min(payload/weight, volume/pieceVolume, floor-footprint × layers)`,
    /// every term floored and clamped to at least one unit.
    pub fn units_per_truck(&self, piece: &Piece) -> u32 {
        let by_weight = floor_term(self.max_payload_tons, piece.piece_weight_tons());

        let piece_volume = piece.volume_m3 * piece.measure_per_piece();
        let by_volume = floor_term(self.usable_volume_m3(), piece_volume);

        let per_layer = floor_term(self.deck_length_m, piece.length_m)
            .saturating_mul(floor_term(self.deck_width_m, piece.width_m));
        let layers = floor_term(self.max_stack_height_m, piece.height_m)
            .min(self.max_stack_layers.max(1));
        let by_footprint = per_layer.saturating_mul(layers).max(1);

        by_weight.min(by_volume).min(by_footprint).max(1)
    }
}

/// Floored capacity/demand ratio, clamped to at least 1
///
/// A zero or unknown demand never restricts the count.
fn floor_term(capacity: f64, demand: f64) -> u32 {
    if demand <= 0.0 {
        return u32::MAX;
    }
    if capacity <= 0.0 {
        return 1;
    }
    ((capacity / demand).floor() as u32).max(1)
}

/// Truck specifications per class
#[derive(Debug, Clone)]
pub struct TruckFleet {
    pub standard: TruckSpec,
    pub medium: TruckSpec,
    pub extended: TruckSpec,
}

impl Default for TruckFleet {
    fn default() -> Self {
        Self {
            standard: TruckSpec {
                max_payload_tons: 26.0,
                deck_length_m: 12.0,
                deck_width_m: 2.5,
                max_stack_height_m: 2.6,
                max_stack_layers: 3,
                usable_volume_factor: 0.85,
            },
            medium: TruckSpec {
                max_payload_tons: 28.0,
                deck_length_m: 21.5,
                deck_width_m: 2.5,
                max_stack_height_m: 2.0,
                max_stack_layers: 2,
                usable_volume_factor: 0.80,
            },
            extended: TruckSpec {
                max_payload_tons: 42.0,
                deck_length_m: 30.0,
                deck_width_m: 3.0,
                max_stack_height_m: 1.5,
                max_stack_layers: 1,
                usable_volume_factor: 0.75,
            },
        }
    }
}

impl TruckFleet {
    pub fn spec(&self, class: TruckClass) -> &TruckSpec {
        match class {
            TruckClass::Standard => &self.standard,
            TruckClass::Medium => &self.medium,
            TruckClass::Extended => &self.extended,
        }
    }

    /// Reject classes configured without payload
    pub fn validate(&self) -> Result<(), EngineError> {
        for class in [TruckClass::Standard, TruckClass::Medium, TruckClass::Extended] {
            if self.spec(class).max_payload_tons <= 0.0 {
                return Err(EngineError::ZeroTruckCapacity { class: class.as_str() });
            }
        }
        Ok(())
    }
}

/// Minimum billable tons per length category ("false tonnage")
///
/// Carriers bill at least this weight per truck regardless of the real
/// cargo; applied only when the real weight is below the minimum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FalseTonnage {
    pub under_12m_min_tons: f64,
    pub over_12m_min_tons: f64,
}

impl Default for FalseTonnage {
    fn default() -> Self {
        Self {
            under_12m_min_tons: 18.0,
            over_12m_min_tons: 24.0,
        }
    }
}

impl FalseTonnage {
    pub fn min_tons(&self, category: LengthCategory) -> f64 {
        match category {
            LengthCategory::Under12m => self.under_12m_min_tons,
            LengthCategory::Over12m => self.over_12m_min_tons,
        }
    }
}

/// Rates for assembly/mounting work
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssemblyRates {
    /// Mounting rate per ton assembled
    pub assembly_per_ton: f64,

    /// Crane transfer cost per kilometer (one way)
    pub crane_km_cost: f64,

    /// Crew plus crane cost per assembly day
    pub crew_with_crane_day: f64,

    /// Additional crane cost per day when a second crane is needed
    pub extra_crane_day: f64,
}

impl Default for AssemblyRates {
    fn default() -> Self {
        Self {
            assembly_per_ton: 18_000.0,
            crane_km_cost: 3_500.0,
            crew_with_crane_day: 1_200_000.0,
            extra_crane_day: 850_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{AdjustmentCategory, UnitOfMeasure};

    #[test]
    fn test_tier_lookup_is_unique() {
        let table = FreightRateTable::default_pricing();

        let tier = table.find_tier(120.0).unwrap();
        assert_eq!(tier.km_from, 100.0);
        assert_eq!(tier.trip_rate, 1_000_000.0);

        // boundary distances resolve to the lower bracket
        let boundary = table.find_tier(100.0).unwrap();
        assert_eq!(boundary.km_from, 50.0);

        assert_eq!(
            table.find_tier(900.0).unwrap_err(),
            EngineError::DistanceOutsideTiers { distance_km: 900.0 }
        );
    }

    #[test]
    fn test_overlapping_tiers_are_rejected() {
        let table = FreightRateTable::new(vec![
            FreightRateTier { km_from: 0.0, km_to: 120.0, ton_rate_under_12m: 1.0, ton_rate_over_12m: 1.0, trip_rate: 1.0 },
            FreightRateTier { km_from: 100.0, km_to: 200.0, ton_rate_under_12m: 2.0, ton_rate_over_12m: 2.0, trip_rate: 2.0 },
        ]);

        assert_eq!(
            table.find_tier(110.0).unwrap_err(),
            EngineError::AmbiguousRateTier { distance_km: 110.0 }
        );
    }

    #[test]
    fn test_ton_rate_bucket_fallback() {
        let tier = FreightRateTier {
            km_from: 0.0,
            km_to: 100.0,
            ton_rate_under_12m: 30_000.0,
            ton_rate_over_12m: 0.0,
            trip_rate: 0.0,
        };

        assert_eq!(tier.ton_rate(LengthCategory::Under12m), 30_000.0);
        assert_eq!(tier.ton_rate(LengthCategory::Over12m), 30_000.0);
    }

    #[test]
    fn test_truck_class_breakpoints() {
        assert_eq!(TruckClass::for_length(8.0), TruckClass::Standard);
        assert_eq!(TruckClass::for_length(12.0), TruckClass::Standard);
        assert_eq!(TruckClass::for_length(12.5), TruckClass::Medium);
        assert_eq!(TruckClass::for_length(21.5), TruckClass::Medium);
        assert_eq!(TruckClass::for_length(25.0), TruckClass::Extended);
    }

    #[test]
    fn test_units_per_truck_bound() {
        let spec = TruckSpec {
            max_payload_tons: 26.0,
            deck_length_m: 12.0,
            deck_width_m: 2.5,
            max_stack_height_m: 2.6,
            max_stack_layers: 3,
            usable_volume_factor: 1.0,
        };

        let piece = Piece {
            length_m: 5.0,
            width_m: 1.2,
            height_m: 0.8,
            volume_m3: 1.0,
            unit_weight_kg: Some(6_000.0),
            ..Piece::new(1, "Panel", UnitOfMeasure::Unit, AdjustmentCategory::General, 20)
        };

        // weight: floor(26/6) = 4
        // volume: floor(78/1) = 78
        // footprint: floor(12/5)=2 × floor(2.5/1.2)=2, layers min(3, floor(2.6/0.8)=3) -> 12
        assert_eq!(spec.units_per_truck(&piece), 4);
    }

    #[test]
    fn test_unknown_dimensions_do_not_restrict() {
        let spec = TruckFleet::default().standard.clone();
        let piece = Piece {
            unit_weight_kg: Some(4_000.0),
            ..Piece::new(3, "Panel", UnitOfMeasure::Unit, AdjustmentCategory::General, 10)
        };
        // no dimensions or volume given: only the payload bound applies
        assert_eq!(spec.units_per_truck(&piece), 6);
    }

    #[test]
    fn test_units_per_truck_never_zero() {
        let spec = TruckFleet::default().standard.clone();
        let heavy = Piece {
            unit_weight_kg: Some(40_000.0),
            ..Piece::new(2, "Viga puente", UnitOfMeasure::Unit, AdjustmentCategory::General, 1)
        };
        assert_eq!(spec.units_per_truck(&heavy), 1);
    }

    #[test]
    fn test_fleet_validation() {
        let mut fleet = TruckFleet::default();
        assert!(fleet.validate().is_ok());

        fleet.medium.max_payload_tons = 0.0;
        assert_eq!(
            fleet.validate().unwrap_err(),
            EngineError::ZeroTruckCapacity { class: "medium" }
        );
    }

    #[test]
    fn test_false_tonnage_by_category() {
        let ft = FalseTonnage::default();
        assert_eq!(ft.min_tons(LengthCategory::Under12m), 18.0);
        assert_eq!(ft.min_tons(LengthCategory::Over12m), 24.0);
    }
}
