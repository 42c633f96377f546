//! Precast Quotation CLI
//!
//! Command-line interface for pricing a quotation from a piece list

use clap::Parser;
use precast_quotation::assembly::AssemblyParams;
use precast_quotation::engine::{QuotationEngine, QuotationRequest};
use precast_quotation::freight::PackerConfig;
use precast_quotation::piece::{load_default_pieces, load_pieces};
use precast_quotation::rates::{Period, PolynomialFormula};
use precast_quotation::rounding::round_percent;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "precast-quotation", about = "Price a precast-concrete quotation")]
struct Args {
    /// Piece list CSV (defaults to the bundled example)
    #[arg(long)]
    pieces: Option<PathBuf>,

    /// Factory-to-site distance in km
    #[arg(long, default_value_t = 120.0)]
    distance_km: f64,

    /// Crew-plus-crane days on site
    #[arg(long, default_value_t = 1.0)]
    assembly_days: f64,

    /// One-way crane transfer distance in km
    #[arg(long, default_value_t = 50.0)]
    crane_km: f64,

    /// Output CSV path for the per-piece breakdown
    #[arg(long, default_value = "quotation_output.csv")]
    output: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    println!("Precast Quotation v0.1.0");
    println!("========================\n");

    let pieces = match &args.pieces {
        Some(path) => load_pieces(path).expect("Failed to load piece list"),
        None => load_default_pieces().expect("Failed to load bundled piece list"),
    };
    println!("Loaded {} piece lines", pieces.len());

    let engine = match QuotationEngine::from_csv() {
        Ok(engine) => engine,
        Err(err) => {
            println!("Could not load data/rates ({}), using workbook defaults", err);
            QuotationEngine::new()
        }
    };

    let total_tons: f64 = pieces.iter().map(|p| p.total_weight_tons()).sum();

    let request = QuotationRequest {
        pieces,
        distance_km: args.distance_km,
        base_period: Period::new(2024, 1),
        target_period: Period::new(2024, 3),
        assembly: Some(AssemblyParams {
            total_tons,
            assembly_days: args.assembly_days,
            crane_transfer_km: args.crane_km,
            extra_crane_days: 0.0,
        }),
        additionals: 0.0,
        packing: PackerConfig::default(),
    };

    let result = engine.price(&request).expect("Failed to price quotation");

    // Per-piece breakdown
    let adjustment = round_percent(PolynomialFormula::adjustment_percent(result.polynomial_factor));
    println!("\nPiece costing (factor {:.6}, adjustment {:+.1}%):", result.polynomial_factor, adjustment);
    println!("{:>4} {:<18} {:>5} {:>10} {:>10} {:>14} {:>14} {:>16}",
        "ID", "Name", "Qty", "Measure", "Tons", "Base", "Unit", "Total");
    println!("{}", "-".repeat(100));
    for row in &result.breakdowns {
        println!("{:>4} {:<18} {:>5} {:>10.2} {:>10.3} {:>14.2} {:>14.2} {:>16.2}",
            row.piece_id,
            row.piece_name,
            row.quantity,
            row.measure,
            row.weight_tons,
            row.base_cost,
            row.final_unit_cost,
            row.total_cost,
        );
    }

    // Truck plan
    println!("\nFreight plan ({} trucks, {:.3} t billable):",
        result.freight.truck_count, result.freight.billable_weight_tons);
    for truck in &result.trucks {
        let load: Vec<String> = truck
            .pieces
            .iter()
            .map(|p| format!("{}x{}", p.units, p.piece_name))
            .collect();
        println!("  #{:<3} {:<9} {:>7.3} t real {:>7.3} t billable  escort={}  [{}]",
            truck.truck_number,
            truck.truck_class.as_str(),
            truck.real_weight_tons,
            truck.billable_weight_tons(),
            truck.requires_escort,
            load.join(", "),
        );
    }

    // Write full breakdown to CSV
    let mut file = File::create(&args.output).expect("Unable to create CSV file");
    writeln!(file, "PieceID,Name,Qty,Measure,Tons,Materials,Process,Base,AfterDiscount,AfterAdjustment,AfterSpecial,Factor,UnitCost,TotalCost").unwrap();
    for row in &result.breakdowns {
        writeln!(file, "{},{},{},{:.3},{:.3},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.6},{:.2},{:.2}",
            row.piece_id,
            row.piece_name,
            row.quantity,
            row.measure,
            row.weight_tons,
            row.materials_cost,
            row.process_cost,
            row.base_cost,
            row.after_discount,
            row.after_adjustment,
            row.after_special_adjustment,
            row.polynomial_factor,
            row.final_unit_cost,
            row.total_cost,
        ).unwrap();
    }
    println!("\nFull breakdown written to: {}", args.output.display());

    // Totals
    let totals = &result.totals;
    println!("\nQuotation totals:");
    println!("  Pieces subtotal:   ${:>16.2}", totals.subtotal_pieces);
    println!("  General expenses:  ${:>16.2}", totals.general_expenses);
    println!("  Transport:         ${:>16.2}", totals.transport);
    println!("  Mounting:          ${:>16.2}", totals.mounting);
    println!("  Additionals:       ${:>16.2}", totals.additionals);
    println!("  Grand total:       ${:>16.2}", totals.grand_total);

    if result.partial_pricing {
        println!("\nWARNING: some pieces were priced against incomplete data (estimated)");
    }
}
