//! Inspect the truck plan for a piece list at several distances
//!
//! Usage: cargo run --bin freight_plan

use precast_quotation::freight::{FreightPacker, FreightPricer, PackerConfig};
use precast_quotation::piece::load_default_pieces;
use precast_quotation::rates::Rates;

fn main() {
    env_logger::init();

    println!("Loading pieces from data/pieces_example.csv...");
    let pieces = load_default_pieces().expect("Failed to load piece list");

    let rates = Rates::from_csv().unwrap_or_else(|_| Rates::default_pricing());

    let packer = FreightPacker::new(&rates.trucks, &rates.false_tonnage, PackerConfig::default());
    let trucks = packer.pack(&pieces).expect("Failed to pack pieces");

    let total_units: u32 = pieces.iter().map(|p| p.quantity).sum();
    let placed_units: u32 = trucks.iter().map(|t| t.unit_count()).sum();

    println!("\n{}", "=".repeat(70));
    println!("Packing plan: {} trucks for {} units", trucks.len(), total_units);
    println!("{}", "=".repeat(70));
    assert_eq!(total_units, placed_units, "packer lost units");

    for truck in &trucks {
        println!(
            "\nTruck #{} ({}, escort={})",
            truck.truck_number,
            truck.truck_class.as_str(),
            truck.requires_escort
        );
        for placed in &truck.pieces {
            println!(
                "    {:>3} x {:<20} {:>8.3} t each",
                placed.units, placed.piece_name, placed.unit_weight_tons
            );
        }
        println!(
            "    real {:.3} t, billable {:.3} t, longest piece {:.1} m",
            truck.real_weight_tons,
            truck.billable_weight_tons(),
            truck.max_piece_length_m
        );
    }

    // Price the same plan at each distance bracket
    let pricer = FreightPricer::new(&rates.freight, rates.general_expenses_pct);

    println!("\n{}", "=".repeat(70));
    println!("Freight pricing by distance");
    println!("{}", "=".repeat(70));
    println!("{:>10} {:>16} {:>16} {:>16}", "Km", "Base", "GG", "Total");

    for distance_km in [30.0, 75.0, 120.0, 200.0, 400.0] {
        let mut plan = trucks.clone();
        match pricer.price_trucks(&mut plan, distance_km) {
            Ok(summary) => println!(
                "{:>10.0} {:>16.2} {:>16.2} {:>16.2}",
                distance_km, summary.transport_base, summary.general_expenses, summary.transport_total
            ),
            Err(err) => println!("{:>10.0} {}", distance_km, err),
        }
    }
}
