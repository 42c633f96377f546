//! Read-only reference data consumed by one pricing run
//!
//! Material prices, process parameters, index history, polynomial formulas,
//! freight tables and truck specs. The engine never mutates these; a `Rates`
//! value is a snapshot owned by the caller for the duration of a computation.

mod freight;
mod indices;
mod materials;
mod process;
pub mod loader;

pub use freight::{
    AssemblyRates, FalseTonnage, FreightRateTable, FreightRateTier, LengthCategory, TruckClass,
    TruckFleet, TruckSpec,
};
pub use indices::{FormulaSet, IndexHistory, MonthlyIndex, Period, PolynomialFormula};
pub use loader::LoadedRates;
pub use materials::{MaterialPrice, MaterialPriceTable, MaterialsCost};
pub use process::ProcessParameters;

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Commercial adjustment percentages applied after the base cost
///
/// The discount is stored as a negative percentage by convention; the
/// special adjustment applies only to pieces in the special category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentScale {
    pub general_discount_pct: f64,

    pub general_adjustment_pct: f64,

    pub special_adjustment_pct: f64,
}

impl Default for AdjustmentScale {
    fn default() -> Self {
        Self {
            general_discount_pct: -5.0,
            general_adjustment_pct: 8.0,
            special_adjustment_pct: 12.0,
        }
    }
}

/// Container for all reference data of a pricing context
#[derive(Debug, Clone)]
pub struct Rates {
    pub materials: MaterialPriceTable,
    pub process: ProcessParameters,
    pub adjustments: AdjustmentScale,
    pub indices: IndexHistory,
    pub formulas: FormulaSet,
    pub freight: FreightRateTable,
    pub trucks: TruckFleet,
    pub false_tonnage: FalseTonnage,
    pub assembly: AssemblyRates,

    /// General expenses markup percentage (GG)
    pub general_expenses_pct: f64,
}

impl Rates {
    /// Reference data matching the commercial workbook defaults
    pub fn default_pricing() -> Self {
        Self {
            materials: MaterialPriceTable::new(),
            process: ProcessParameters::default(),
            adjustments: AdjustmentScale::default(),
            indices: IndexHistory::from_rows(default_index_rows()),
            formulas: FormulaSet::new(vec![PolynomialFormula::default()]),
            freight: FreightRateTable::default_pricing(),
            trucks: TruckFleet::default(),
            false_tonnage: FalseTonnage::default(),
            assembly: AssemblyRates::default(),
            general_expenses_pct: 10.0,
        }
    }

    /// Load reference tables from CSV files in the default location (data/rates/)
    pub fn from_csv() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_csv_path(Path::new(loader::DEFAULT_RATES_PATH))
    }

    /// Load reference tables from CSV files in a specific directory
    ///
    /// Tables present in the directory replace the workbook defaults;
    /// everything else keeps its default.
    pub fn from_csv_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let loaded = LoadedRates::load_from(path)?;

        Ok(Self {
            materials: MaterialPriceTable::from_prices(&loaded.material_prices),
            indices: IndexHistory::from_rows(loaded.monthly_indices),
            freight: FreightRateTable::new(loaded.freight_tiers),
            trucks: loaded.trucks,
            ..Self::default_pricing()
        })
    }

    /// Reject reference data the engine cannot price with
    pub fn validate(&self) -> Result<(), EngineError> {
        self.trucks.validate()?;
        Ok(())
    }
}

/// Index rows seeded from the commercial workbook
fn default_index_rows() -> Vec<MonthlyIndex> {
    vec![
        MonthlyIndex {
            month: 1,
            year: 2024,
            steel_index: 1_432.70,
            labor_index: 118.42,
            concrete_index: 742.15,
            fuel_index: 987.30,
            dollar_rate: 905.40,
        },
        MonthlyIndex {
            month: 2,
            year: 2024,
            steel_index: 1_448.90,
            labor_index: 119.07,
            concrete_index: 745.80,
            fuel_index: 1_002.60,
            dollar_rate: 928.10,
        },
        MonthlyIndex {
            month: 3,
            year: 2024,
            steel_index: 1_461.20,
            labor_index: 119.65,
            concrete_index: 751.33,
            fuel_index: 995.40,
            dollar_rate: 941.70,
        },
    ]
}
