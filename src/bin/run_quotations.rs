//! Price a quotation sweep for the bundled piece list
//!
//! Runs the same bill of pieces across a grid of site distances and target
//! periods, in parallel, and writes the aggregated totals for comparison
//! with the commercial workbook.

use anyhow::{anyhow, Context};
use precast_quotation::assembly::AssemblyParams;
use precast_quotation::engine::{QuotationEngine, QuotationRequest};
use precast_quotation::freight::PackerConfig;
use precast_quotation::piece::load_default_pieces;
use precast_quotation::rates::Period;
use rayon::prelude::*;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

/// One cell of the sweep grid
#[derive(Debug, Clone)]
struct Scenario {
    distance_km: f64,
    target: Period,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let start = Instant::now();
    println!("Loading pieces from data/pieces_example.csv...");

    let pieces = load_default_pieces().map_err(|e| anyhow!("failed to load piece list: {e}"))?;
    println!("Loaded {} piece lines in {:?}", pieces.len(), start.elapsed());

    let engine =
        QuotationEngine::from_csv().map_err(|e| anyhow!("failed to load rates: {e}"))?;

    let total_tons: f64 = pieces.iter().map(|p| p.total_weight_tons()).sum();

    let distances = [40.0, 80.0, 120.0, 200.0, 350.0];
    let targets = [Period::new(2024, 1), Period::new(2024, 2), Period::new(2024, 3)];

    let scenarios: Vec<Scenario> = distances
        .iter()
        .flat_map(|&distance_km| {
            targets.iter().map(move |&target| Scenario { distance_km, target })
        })
        .collect();

    println!("Pricing {} scenarios...", scenarios.len());
    let pricing_start = Instant::now();

    // Each invocation owns its working data, so scenarios price in parallel
    let results: Vec<_> = scenarios
        .par_iter()
        .map(|scenario| {
            let request = QuotationRequest {
                pieces: pieces.clone(),
                distance_km: scenario.distance_km,
                base_period: Period::new(2024, 1),
                target_period: scenario.target,
                assembly: Some(AssemblyParams {
                    total_tons,
                    assembly_days: 2.0,
                    crane_transfer_km: scenario.distance_km,
                    extra_crane_days: 0.0,
                }),
                additionals: 0.0,
                packing: PackerConfig::default(),
            };
            (scenario.clone(), engine.price(&request))
        })
        .collect();

    println!("Pricing complete in {:?}", pricing_start.elapsed());

    let output_path = "quotation_sweep_output.csv";
    let mut file = File::create(output_path).context("failed to create output file")?;

    writeln!(file, "DistanceKm,TargetYear,TargetMonth,Factor,Trucks,BillableTons,PiecesSubtotal,GG,Transport,Mounting,GrandTotal")?;

    for (scenario, result) in &results {
        match result {
            Ok(result) => {
                writeln!(
                    file,
                    "{},{},{},{:.6},{},{:.3},{:.2},{:.2},{:.2},{:.2},{:.2}",
                    scenario.distance_km,
                    scenario.target.year,
                    scenario.target.month,
                    result.polynomial_factor,
                    result.freight.truck_count,
                    result.freight.billable_weight_tons,
                    result.totals.subtotal_pieces,
                    result.totals.general_expenses,
                    result.totals.transport,
                    result.totals.mounting,
                    result.totals.grand_total,
                )?;
            }
            Err(err) => {
                println!(
                    "  scenario {:.0} km / {}-{:02} failed: {}",
                    scenario.distance_km, scenario.target.year, scenario.target.month, err
                );
            }
        }
    }

    println!("Output written to {}", output_path);

    // Print summary stats
    let priced: Vec<_> = results.iter().filter_map(|(s, r)| r.as_ref().ok().map(|r| (s, r))).collect();
    if let (Some((_, cheapest)), Some((_, dearest))) = (
        priced.iter().min_by(|a, b| a.1.totals.grand_total.total_cmp(&b.1.totals.grand_total)),
        priced.iter().max_by(|a, b| a.1.totals.grand_total.total_cmp(&b.1.totals.grand_total)),
    ) {
        println!("\nSweep summary ({} scenarios priced):", priced.len());
        println!("  Cheapest: ${:.2}", cheapest.totals.grand_total);
        println!("  Dearest:  ${:.2}", dearest.totals.grand_total);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
