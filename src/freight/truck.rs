//! Truck allocation output entities

use crate::rates::{LengthCategory, TruckClass};
use serde::{Deserialize, Serialize};

/// Units of one piece loaded on a truck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub piece_id: u32,
    pub piece_name: String,
    pub units: u32,
    pub unit_weight_tons: f64,
}

impl PlacedPiece {
    pub fn weight_tons(&self) -> f64 {
        self.units as f64 * self.unit_weight_tons
    }
}

/// One loaded truck of the freight plan
///
/// Produced by the packer, priced by the pricer, discarded after the
/// quotation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TruckAllocation {
    /// Position in the plan, 1-based
    pub truck_number: u32,

    pub truck_class: TruckClass,

    pub length_category: LengthCategory,

    pub pieces: Vec<PlacedPiece>,

    /// Actual cargo weight
    pub real_weight_tons: f64,

    /// Carrier minimum billable weight for the length category
    pub false_weight_tons: f64,

    /// Longest piece on board, drives the rate bucket
    pub max_piece_length_m: f64,

    pub requires_escort: bool,

    /// Freight cost, filled by the pricer
    pub cost: f64,
}

impl TruckAllocation {
    /// Weight the carrier bills: the real weight, or the category minimum
    /// when the real weight falls below it
    pub fn billable_weight_tons(&self) -> f64 {
        self.real_weight_tons.max(self.false_weight_tons)
    }

    /// Total piece units on board
    pub fn unit_count(&self) -> u32 {
        self.pieces.iter().map(|p| p.units).sum()
    }
}
