//! Load a bill of pieces from CSV

use super::{AdjustmentCategory, Piece, UnitOfMeasure};
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Default sample piece list shipped with the repository
pub const DEFAULT_PIECES_PATH: &str = "data/pieces_example.csv";

/// Raw CSV row matching the piece-list export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "PieceID")]
    piece_id: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Unit")]
    unit: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Quantity")]
    quantity: u32,
    #[serde(rename = "LengthM")]
    length_m: f64,
    #[serde(rename = "WidthM")]
    width_m: f64,
    #[serde(rename = "HeightM")]
    height_m: f64,
    #[serde(rename = "VolumeM3")]
    volume_m3: f64,
    #[serde(rename = "WeightPerMeasure")]
    weight_per_measure: f64,
    #[serde(rename = "SteelKg")]
    steel_kg: f64,
    #[serde(rename = "UnitWeightKg")]
    unit_weight_kg: Option<f64>,
    #[serde(rename = "UnitPrice")]
    unit_price: Option<f64>,
    #[serde(rename = "IndividualTransport")]
    individual_transport: u8,
    #[serde(rename = "RequiresEscort")]
    requires_escort: u8,
}

impl CsvRow {
    fn to_piece(self) -> Result<Piece, Box<dyn Error>> {
        let unit_of_measure = match self.unit.as_str() {
            "UNIT" => UnitOfMeasure::Unit,
            "LENGTH" => UnitOfMeasure::Length,
            "AREA" => UnitOfMeasure::Area,
            other => return Err(format!("Unknown Unit: {}", other).into()),
        };

        let category = match self.category.as_str() {
            "GENERAL" => AdjustmentCategory::General,
            "SPECIAL" => AdjustmentCategory::Special,
            other => return Err(format!("Unknown Category: {}", other).into()),
        };

        Ok(Piece {
            piece_id: self.piece_id,
            name: self.name,
            unit_of_measure,
            category,
            quantity: self.quantity,
            length_m: self.length_m,
            width_m: self.width_m,
            height_m: self.height_m,
            volume_m3: self.volume_m3,
            weight_per_measure: self.weight_per_measure,
            steel_kg: self.steel_kg,
            unit_weight_kg: self.unit_weight_kg,
            unit_price: self.unit_price,
            family_alpha: None,
            bom: Vec::new(),
            individual_transport: self.individual_transport != 0,
            requires_escort: self.requires_escort != 0,
        })
    }
}

/// Load all pieces from a CSV file
pub fn load_pieces<P: AsRef<Path>>(path: P) -> Result<Vec<Piece>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut pieces = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        pieces.push(row.to_piece()?);
    }

    Ok(pieces)
}

/// Load pieces from any reader (e.g., string buffer, request body)
pub fn load_pieces_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Piece>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut pieces = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        pieces.push(row.to_piece()?);
    }

    Ok(pieces)
}

/// Load the sample piece list from the default location
pub fn load_default_pieces() -> Result<Vec<Piece>, Box<dyn Error>> {
    load_pieces(DEFAULT_PIECES_PATH)
}
