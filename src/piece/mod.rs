//! Bill-of-pieces data model and loaders

mod data;
pub mod loader;

pub use data::{
    AdjustmentCategory, BomLine, Piece, UnitOfMeasure, GROUPABLE_LENGTH_LIMIT_M,
    INDIVIDUAL_WEIGHT_LIMIT_TONS,
};
pub use loader::{load_default_pieces, load_pieces, load_pieces_from_reader};
