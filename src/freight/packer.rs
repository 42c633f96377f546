//! Deterministic first-fit truck packer
//!
//! Packing is a pure function of the input: pieces are partitioned into
//! individual and groupable transport, groupable units are sorted by
//! descending weight with a stable sort (ties keep input order) and placed
//! first-fit into open trucks. Every placement decision depends on the fill
//! state of already-opened trucks, so this step is strictly sequential.

use super::truck::{PlacedPiece, TruckAllocation};
use crate::error::EngineError;
use crate::piece::Piece;
use crate::rates::{FalseTonnage, LengthCategory, TruckClass, TruckFleet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Packing limits beyond the physical truck specs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackerConfig {
    /// Hard cap on piece units per grouped truck
    pub max_pieces_per_truck: u32,

    /// Also bound units by the volume/footprint capacity of the truck deck
    pub volume_check: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            max_pieces_per_truck: 6,
            volume_check: true,
        }
    }
}

/// Bin-packs pieces into trucks for one quotation run
pub struct FreightPacker<'a> {
    fleet: &'a TruckFleet,
    false_tonnage: &'a FalseTonnage,
    config: PackerConfig,
}

impl<'a> FreightPacker<'a> {
    pub fn new(fleet: &'a TruckFleet, false_tonnage: &'a FalseTonnage, config: PackerConfig) -> Self {
        Self { fleet, false_tonnage, config }
    }

    /// Pack all pieces into trucks
    ///
    /// Individual pieces (over 25 t, over 12 m, or flagged) ride alone, one
    /// unit per truck, in input order. Groupable units then fill standard
    /// trucks first-fit by descending weight.
    pub fn pack(&self, pieces: &[Piece]) -> Result<Vec<TruckAllocation>, EngineError> {
        self.fleet.validate()?;

        let mut trucks: Vec<TruckAllocation> = Vec::new();

        for piece in pieces.iter().filter(|p| p.needs_individual_transport()) {
            for _ in 0..piece.quantity {
                let truck = self.open_individual_truck(piece, trucks.len() as u32 + 1);
                trucks.push(truck);
            }
        }

        let mut groupable: Vec<&Piece> = pieces
            .iter()
            .filter(|p| p.quantity > 0 && !p.needs_individual_transport())
            .collect();
        // Stable: equal weights keep their input order
        groupable.sort_by(|a, b| {
            b.piece_weight_tons()
                .partial_cmp(&a.piece_weight_tons())
                .unwrap_or(Ordering::Equal)
        });

        // Indices of grouped trucks still accepting cargo
        let mut open: Vec<usize> = Vec::new();

        for piece in groupable {
            let unit_weight = piece.piece_weight_tons();
            let spec = self.fleet.spec(TruckClass::Standard);

            let mut unit_cap = self.config.max_pieces_per_truck.max(1);
            if self.config.volume_check {
                unit_cap = unit_cap.min(spec.units_per_truck(piece));
            }

            for _ in 0..piece.quantity {
                let slot = open.iter().copied().find(|&idx| {
                    let truck = &trucks[idx];
                    truck.real_weight_tons + unit_weight <= spec.max_payload_tons
                        && truck.unit_count() < unit_cap
                });

                let idx = match slot {
                    Some(idx) => idx,
                    None => {
                        let truck = TruckAllocation {
                            truck_number: trucks.len() as u32 + 1,
                            truck_class: TruckClass::Standard,
                            length_category: LengthCategory::Under12m,
                            pieces: Vec::new(),
                            real_weight_tons: 0.0,
                            false_weight_tons: self
                                .false_tonnage
                                .min_tons(LengthCategory::Under12m),
                            max_piece_length_m: 0.0,
                            requires_escort: false,
                            cost: 0.0,
                        };
                        trucks.push(truck);
                        open.push(trucks.len() - 1);
                        trucks.len() - 1
                    }
                };

                place_unit(&mut trucks[idx], piece, unit_weight);
            }
        }

        Ok(trucks)
    }

    fn open_individual_truck(&self, piece: &Piece, truck_number: u32) -> TruckAllocation {
        let truck_class = TruckClass::for_length(piece.length_m);
        let length_category = LengthCategory::for_length(piece.length_m);
        let unit_weight = piece.piece_weight_tons();

        if unit_weight > self.fleet.spec(truck_class).max_payload_tons {
            log::warn!(
                "piece {} ({:.3} t) exceeds the {} truck payload, allocating anyway",
                piece.piece_id,
                unit_weight,
                truck_class.as_str()
            );
        }

        TruckAllocation {
            truck_number,
            truck_class,
            length_category,
            pieces: vec![PlacedPiece {
                piece_id: piece.piece_id,
                piece_name: piece.name.clone(),
                units: 1,
                unit_weight_tons: unit_weight,
            }],
            real_weight_tons: unit_weight,
            false_weight_tons: self.false_tonnage.min_tons(length_category),
            max_piece_length_m: piece.length_m,
            requires_escort: piece.requires_escort,
            cost: 0.0,
        }
    }
}

/// Add one unit of a piece to a truck
fn place_unit(truck: &mut TruckAllocation, piece: &Piece, unit_weight: f64) {
    truck.real_weight_tons += unit_weight;
    truck.max_piece_length_m = truck.max_piece_length_m.max(piece.length_m);

    if let Some(placed) = truck.pieces.iter_mut().find(|p| p.piece_id == piece.piece_id) {
        placed.units += 1;
    } else {
        truck.pieces.push(PlacedPiece {
            piece_id: piece.piece_id,
            piece_name: piece.name.clone(),
            units: 1,
            unit_weight_tons: unit_weight,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{AdjustmentCategory, UnitOfMeasure};

    fn unit_piece(id: u32, name: &str, quantity: u32, weight_kg: f64) -> Piece {
        Piece {
            unit_weight_kg: Some(weight_kg),
            length_m: 6.0,
            width_m: 1.2,
            ..Piece::new(id, name, UnitOfMeasure::Unit, AdjustmentCategory::General, quantity)
        }
    }

    fn packer_parts() -> (TruckFleet, FalseTonnage) {
        (TruckFleet::default(), FalseTonnage::default())
    }

    fn pack(pieces: &[Piece], config: PackerConfig) -> Vec<TruckAllocation> {
        let (fleet, false_tonnage) = packer_parts();
        FreightPacker::new(&fleet, &false_tonnage, config)
            .pack(pieces)
            .unwrap()
    }

    fn no_volume_check() -> PackerConfig {
        PackerConfig {
            volume_check: false,
            ..PackerConfig::default()
        }
    }

    #[test]
    fn test_units_are_conserved() {
        let pieces = vec![
            unit_piece(1, "Panel", 7, 4_000.0),
            unit_piece(2, "Pilar", 5, 8_000.0),
            unit_piece(3, "Viga larga", 2, 14_000.0),
        ];

        let trucks = pack(&pieces, PackerConfig::default());

        let placed: u32 = trucks.iter().map(|t| t.unit_count()).sum();
        assert_eq!(placed, 14);
    }

    #[test]
    fn test_payload_never_exceeded() {
        let pieces = vec![
            unit_piece(1, "Panel", 12, 5_500.0),
            unit_piece(2, "Pilar", 9, 7_200.0),
        ];

        let fleet = TruckFleet::default();
        let trucks = pack(&pieces, PackerConfig::default());

        for truck in &trucks {
            assert!(truck.real_weight_tons <= fleet.spec(truck.truck_class).max_payload_tons + 1e-9);
        }
    }

    #[test]
    fn test_heaviest_units_place_first() {
        let pieces = vec![
            unit_piece(1, "Liviano", 1, 2_000.0),
            unit_piece(2, "Pesado", 1, 20_000.0),
        ];

        let trucks = pack(&pieces, no_volume_check());

        // Both fit one truck: the heavy unit opened it
        assert_eq!(trucks.len(), 1);
        assert_eq!(trucks[0].pieces[0].piece_id, 2);
    }

    #[test]
    fn test_equal_weights_keep_input_order() {
        let pieces = vec![
            unit_piece(7, "A", 1, 3_000.0),
            unit_piece(8, "B", 1, 3_000.0),
            unit_piece(9, "C", 1, 3_000.0),
        ];

        let trucks = pack(&pieces, no_volume_check());
        let order: Vec<u32> = trucks[0].pieces.iter().map(|p| p.piece_id).collect();
        assert_eq!(order, vec![7, 8, 9]);
    }

    #[test]
    fn test_individual_pieces_ride_alone() {
        let long = Piece {
            weight_per_measure: 0.9,
            length_m: 18.0,
            ..Piece::new(1, "Viga 18m", UnitOfMeasure::Length, AdjustmentCategory::General, 2)
        };
        let escorted = Piece {
            requires_escort: true,
            ..unit_piece(2, "Especial", 1, 6_000.0)
        };
        let heavy = unit_piece(3, "Macizo", 1, 26_000.0);
        let normal = unit_piece(4, "Panel", 3, 4_000.0);

        let trucks = pack(&[long.clone(), escorted, heavy, normal], no_volume_check());

        // 2 long + 1 escorted + 1 heavy + 1 grouped
        assert_eq!(trucks.len(), 5);

        let medium_trucks: Vec<_> = trucks
            .iter()
            .filter(|t| t.truck_class == TruckClass::Medium)
            .collect();
        assert_eq!(medium_trucks.len(), 2);
        for truck in medium_trucks {
            assert_eq!(truck.unit_count(), 1);
            assert_eq!(truck.length_category, LengthCategory::Over12m);
        }

        assert!(trucks.iter().any(|t| t.requires_escort && t.unit_count() == 1));

        let grouped: Vec<_> = trucks.iter().filter(|t| t.unit_count() > 1).collect();
        assert_eq!(grouped.len(), 1);
        assert!(!grouped[0].requires_escort);
    }

    #[test]
    fn test_truck_class_by_length() {
        let very_long = Piece {
            weight_per_measure: 0.9,
            length_m: 24.0,
            ..Piece::new(1, "Viga puente", UnitOfMeasure::Length, AdjustmentCategory::General, 1)
        };

        let trucks = pack(&[very_long], PackerConfig::default());
        assert_eq!(trucks.len(), 1);
        assert_eq!(trucks[0].truck_class, TruckClass::Extended);
    }

    #[test]
    fn test_max_pieces_per_truck() {
        let pieces = vec![unit_piece(1, "Anclaje", 10, 500.0)];

        let config = PackerConfig {
            max_pieces_per_truck: 4,
            volume_check: false,
        };
        let trucks = pack(&pieces, config);

        assert_eq!(trucks.len(), 3);
        assert_eq!(trucks.iter().map(TruckAllocation::unit_count).max(), Some(4));
    }

    #[test]
    fn test_false_weight_set_per_category() {
        let trucks = pack(&[unit_piece(1, "Panel", 2, 4_000.0)], no_volume_check());
        assert_eq!(trucks.len(), 1);
        assert_eq!(trucks[0].false_weight_tons, 18.0);
        assert!(trucks[0].billable_weight_tons() > trucks[0].real_weight_tons);
    }

    #[test]
    fn test_packing_is_deterministic() {
        let pieces = vec![
            unit_piece(1, "Panel", 9, 4_100.0),
            unit_piece(2, "Pilar", 4, 4_100.0),
            unit_piece(3, "Grada", 11, 2_050.0),
        ];

        let first = pack(&pieces, PackerConfig::default());
        let second = pack(&pieces, PackerConfig::default());

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.truck_number, b.truck_number);
            assert_eq!(a.unit_count(), b.unit_count());
            assert_eq!(a.real_weight_tons.to_bits(), b.real_weight_tons.to_bits());
        }
    }

    #[test]
    fn test_zero_capacity_fleet_rejected() {
        let mut fleet = TruckFleet::default();
        fleet.standard.max_payload_tons = 0.0;
        let false_tonnage = FalseTonnage::default();

        let packer = FreightPacker::new(&fleet, &false_tonnage, PackerConfig::default());
        let err = packer.pack(&[unit_piece(1, "Panel", 1, 4_000.0)]).unwrap_err();
        assert_eq!(err, EngineError::ZeroTruckCapacity { class: "standard" });
    }
}
