//! Piece data structures matching the quotation bill-of-pieces format

use serde::{Deserialize, Serialize};

/// Pieces heavier than this ride alone in their own truck
pub const INDIVIDUAL_WEIGHT_LIMIT_TONS: f64 = 25.0;

/// Pieces longer than this cannot be grouped with others
pub const GROUPABLE_LENGTH_LIMIT_M: f64 = 12.0;

/// Unit of measure a piece is quoted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitOfMeasure {
    /// Priced per piece
    Unit,
    /// Priced per linear meter
    Length,
    /// Priced per square meter
    Area,
}

/// Adjustment category driving the special-adjustment cost layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdjustmentCategory {
    General,
    Special,
}

impl AdjustmentCategory {
    pub fn is_special(&self) -> bool {
        matches!(self, AdjustmentCategory::Special)
    }
}

/// One bill-of-materials line: raw material consumed per measure unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BomLine {
    /// Material identifier, resolved against the material price table
    pub material_id: u32,

    /// Quantity consumed per measure unit of the piece
    pub quantity_per_unit: f64,

    /// Scrap allowance as a percentage (5.0 = 5% extra material)
    pub scrap_pct: f64,
}

impl BomLine {
    /// Effective quantity including the scrap allowance
    pub fn effective_quantity(&self) -> f64 {
        self.quantity_per_unit * (1.0 + self.scrap_pct / 100.0)
    }
}

/// A single line of the bill of pieces for a quotation run
///
/// Immutable reference data while the engine computes. Weights are in tons
/// per measure unit; dimensions in meters; volumes in cubic meters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Piece {
    /// Piece identifier within the quotation
    pub piece_id: u32,

    /// Commercial name ("Losa", "Viga TT", ...)
    pub name: String,

    /// Unit the piece is measured and priced in
    pub unit_of_measure: UnitOfMeasure,

    /// Cost-adjustment category
    pub category: AdjustmentCategory,

    /// Number of pieces quoted
    pub quantity: u32,

    /// Piece length in meters
    pub length_m: f64,

    /// Piece width in meters
    pub width_m: f64,

    /// Piece height in meters
    pub height_m: f64,

    /// Concrete volume per measure unit
    pub volume_m3: f64,

    /// Weight in tons per measure unit
    pub weight_per_measure: f64,

    /// Reinforcement steel per measure unit, in kilograms
    #[serde(default)]
    pub steel_kg: f64,

    /// Override weight per piece in kilograms, for Unit-measured pieces
    /// whose weight is known directly rather than per measure
    #[serde(default)]
    pub unit_weight_kg: Option<f64>,

    /// Commercial sale price per measure unit. When present, costing uses it
    /// directly instead of the BOM + process cost model.
    #[serde(default)]
    pub unit_price: Option<f64>,

    /// Estimated materials cost per measure unit for pieces without a BOM,
    /// taken from the piece family
    #[serde(default)]
    pub family_alpha: Option<f64>,

    /// Bill of materials per measure unit (may be empty)
    #[serde(default)]
    pub bom: Vec<BomLine>,

    /// Must travel alone regardless of weight and length
    #[serde(default)]
    pub individual_transport: bool,

    /// Requires a road escort (implies individual transport)
    #[serde(default)]
    pub requires_escort: bool,
}

impl Piece {
    /// Create a piece with the identifying fields set and physicals zeroed
    pub fn new(
        piece_id: u32,
        name: &str,
        unit_of_measure: UnitOfMeasure,
        category: AdjustmentCategory,
        quantity: u32,
    ) -> Self {
        Self {
            piece_id,
            name: name.to_string(),
            unit_of_measure,
            category,
            quantity,
            length_m: 0.0,
            width_m: 0.0,
            height_m: 0.0,
            volume_m3: 0.0,
            weight_per_measure: 0.0,
            steel_kg: 0.0,
            unit_weight_kg: None,
            unit_price: None,
            family_alpha: None,
            bom: Vec::new(),
            individual_transport: false,
            requires_escort: false,
        }
    }

    /// Measure per single piece: 1 for Unit, length for Length,
    /// length × width for Area
    pub fn measure_per_piece(&self) -> f64 {
        match self.unit_of_measure {
            UnitOfMeasure::Unit => 1.0,
            UnitOfMeasure::Length => self.length_m,
            UnitOfMeasure::Area => self.length_m * self.width_m,
        }
    }

    /// Total quoted measure for the line (quantity × measure per piece)
    pub fn measure(&self) -> f64 {
        self.quantity as f64 * self.measure_per_piece()
    }

    /// Weight of a single piece in tons
    ///
    /// Unit-measured pieces may carry a direct per-piece weight in kg; all
    /// others derive weight from the measure.
    pub fn piece_weight_tons(&self) -> f64 {
        match (self.unit_of_measure, self.unit_weight_kg) {
            (UnitOfMeasure::Unit, Some(kg)) => kg / 1000.0,
            _ => self.measure_per_piece() * self.weight_per_measure,
        }
    }

    /// Total weight of the line in tons
    pub fn total_weight_tons(&self) -> f64 {
        self.quantity as f64 * self.piece_weight_tons()
    }

    /// Whether the piece must ride alone in its own truck
    pub fn needs_individual_transport(&self) -> bool {
        self.individual_transport
            || self.requires_escort
            || self.piece_weight_tons() > INDIVIDUAL_WEIGHT_LIMIT_TONS
            || self.length_m > GROUPABLE_LENGTH_LIMIT_M
    }

    /// Whether the line carries any usable weight source
    pub fn has_weight_source(&self) -> bool {
        self.piece_weight_tons() > 0.0 || !self.bom.is_empty()
    }
}
