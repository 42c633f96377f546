//! Truck packing and freight pricing

mod packer;
mod pricer;
mod truck;

pub use packer::{FreightPacker, PackerConfig};
pub use pricer::{FreightEstimate, FreightPricer, FreightSummary};
pub use truck::{PlacedPiece, TruckAllocation};
