//! CSV-based reference table loader
//!
//! Loads pricing reference tables from CSV files in data/rates/

use super::{FreightRateTier, MaterialPrice, MonthlyIndex, TruckFleet};
use std::error::Error;
use std::fs::File;
use std::path::Path;

/// Default path to the rates directory
pub const DEFAULT_RATES_PATH: &str = "data/rates";

/// Load material prices from CSV
/// Columns: MaterialID, Price
pub fn load_material_prices(path: &Path) -> Result<Vec<MaterialPrice>, Box<dyn Error>> {
    let file = File::open(path.join("material_prices.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut prices = Vec::new();

    for result in reader.records() {
        let record = result?;
        let material_id: u32 = record[0].parse()?;
        let price: f64 = record[1].parse()?;
        prices.push(MaterialPrice { material_id, price });
    }

    Ok(prices)
}

/// Load the monthly index history from CSV
/// Columns: Year, Month, SteelIndex, LaborIndex, ConcreteIndex, FuelIndex, DollarRate
pub fn load_monthly_indices(path: &Path) -> Result<Vec<MonthlyIndex>, Box<dyn Error>> {
    let file = File::open(path.join("monthly_indices.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        rows.push(MonthlyIndex {
            year: record[0].parse()?,
            month: record[1].parse()?,
            steel_index: record[2].parse()?,
            labor_index: record[3].parse()?,
            concrete_index: record[4].parse()?,
            fuel_index: record[5].parse()?,
            dollar_rate: record[6].parse()?,
        });
    }

    Ok(rows)
}

/// Load freight rate tiers from CSV
/// Columns: KmFrom, KmTo, TonRateUnder12m, TonRateOver12m, TripRate
pub fn load_freight_tiers(path: &Path) -> Result<Vec<FreightRateTier>, Box<dyn Error>> {
    let file = File::open(path.join("freight_rate_tiers.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut tiers = Vec::new();

    for result in reader.records() {
        let record = result?;
        tiers.push(FreightRateTier {
            km_from: record[0].parse()?,
            km_to: record[1].parse()?,
            ton_rate_under_12m: record[2].parse()?,
            ton_rate_over_12m: record[3].parse()?,
            trip_rate: record[4].parse()?,
        });
    }

    Ok(tiers)
}

/// Load truck specifications from CSV
/// Columns: Class, MaxPayloadTons, DeckLengthM, DeckWidthM, MaxStackHeightM,
/// MaxStackLayers, UsableVolumeFactor
pub fn load_truck_specs(path: &Path) -> Result<TruckFleet, Box<dyn Error>> {
    let file = File::open(path.join("truck_specs.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut fleet = TruckFleet::default();

    for result in reader.records() {
        let record = result?;
        let spec = super::TruckSpec {
            max_payload_tons: record[1].parse()?,
            deck_length_m: record[2].parse()?,
            deck_width_m: record[3].parse()?,
            max_stack_height_m: record[4].parse()?,
            max_stack_layers: record[5].parse()?,
            usable_volume_factor: record[6].parse()?,
        };

        match &record[0] {
            "standard" => fleet.standard = spec,
            "medium" => fleet.medium = spec,
            "extended" => fleet.extended = spec,
            other => return Err(format!("Unknown truck class: {}", other).into()),
        }
    }

    Ok(fleet)
}

/// All reference tables loaded from a rates directory
pub struct LoadedRates {
    pub material_prices: Vec<MaterialPrice>,
    pub monthly_indices: Vec<MonthlyIndex>,
    pub freight_tiers: Vec<FreightRateTier>,
    pub trucks: TruckFleet,
}

impl LoadedRates {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self, Box<dyn Error>> {
        Self::load_from(Path::new(DEFAULT_RATES_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            material_prices: load_material_prices(path)?,
            monthly_indices: load_monthly_indices(path)?,
            freight_tiers: load_freight_tiers(path)?,
            trucks: load_truck_specs(path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_rates() {
        let result = LoadedRates::load_default();
        assert!(result.is_ok(), "Failed to load rates: {:?}", result.err());

        let rates = result.unwrap();

        // Check material prices loaded
        assert!(!rates.material_prices.is_empty());

        // Check index history loaded
        assert!(rates.monthly_indices.len() >= 3);

        // Check freight tiers loaded and cover short hauls
        assert!(rates.freight_tiers.iter().any(|t| t.contains(30.0)));

        // Check truck specs loaded
        assert!(rates.trucks.standard.max_payload_tons > 0.0);
    }
}
