//! Material prices and the bill-of-materials cost resolver

use crate::piece::BomLine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Price of one raw material, valid for a single pricing context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialPrice {
    pub material_id: u32,
    pub price: f64,
}

/// Materials cost of a piece per measure unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialsCost {
    pub amount: f64,

    /// True when the amount is not fully grounded in priced BOM lines:
    /// the BOM was empty (fallback estimate) or a material had no price
    pub estimated: bool,
}

/// Material price table for one pricing context (zone/month)
///
/// Keyed by material id in an ordered map so resolution order is
/// deterministic regardless of load order.
#[derive(Debug, Clone, Default)]
pub struct MaterialPriceTable {
    prices: BTreeMap<u32, f64>,
}

impl MaterialPriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a price list; the last price wins on duplicate ids
    pub fn from_prices(prices: &[MaterialPrice]) -> Self {
        let mut table = Self::new();
        for p in prices {
            table.insert(p.material_id, p.price);
        }
        table
    }

    pub fn insert(&mut self, material_id: u32, price: f64) {
        self.prices.insert(material_id, price);
    }

    pub fn get(&self, material_id: u32) -> Option<f64> {
        self.prices.get(&material_id).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Resolve a piece's BOM into a materials cost per measure unit
    ///
    /// A missing material price resolves to 0 rather than failing, so a
    /// quotation can still be drafted with incomplete pricing data; the
    /// result is flagged `estimated` and the gap is logged. An empty BOM
    /// falls back to `family_alpha` (a caller-supplied estimate) when given.
    pub fn resolve(&self, bom: &[BomLine], family_alpha: Option<f64>) -> MaterialsCost {
        if bom.is_empty() {
            return MaterialsCost {
                amount: family_alpha.unwrap_or(0.0),
                estimated: true,
            };
        }

        let mut amount = 0.0;
        let mut missing_price = false;

        for line in bom {
            match self.get(line.material_id) {
                Some(price) => {
                    amount += line.effective_quantity() * price;
                }
                None => {
                    log::warn!(
                        "no price for material {}, resolving its cost as 0",
                        line.material_id
                    );
                    missing_price = true;
                }
            }
        }

        MaterialsCost {
            amount,
            estimated: missing_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MaterialPriceTable {
        MaterialPriceTable::from_prices(&[
            MaterialPrice { material_id: 1, price: 100.0 },
            MaterialPrice { material_id: 2, price: 250.0 },
        ])
    }

    #[test]
    fn test_resolve_with_scrap() {
        let bom = vec![
            BomLine { material_id: 1, quantity_per_unit: 2.0, scrap_pct: 5.0 },
            BomLine { material_id: 2, quantity_per_unit: 0.5, scrap_pct: 0.0 },
        ];

        let cost = table().resolve(&bom, None);
        // 2 * 1.05 * 100 + 0.5 * 250
        assert!((cost.amount - 335.0).abs() < 1e-9);
        assert!(!cost.estimated);
    }

    #[test]
    fn test_missing_price_resolves_to_zero() {
        let bom = vec![
            BomLine { material_id: 1, quantity_per_unit: 1.0, scrap_pct: 0.0 },
            BomLine { material_id: 99, quantity_per_unit: 4.0, scrap_pct: 0.0 },
        ];

        let cost = table().resolve(&bom, None);
        assert!((cost.amount - 100.0).abs() < 1e-9);
        assert!(cost.estimated);
    }

    #[test]
    fn test_empty_bom_falls_back_to_family_alpha() {
        let cost = table().resolve(&[], Some(480.0));
        assert_eq!(cost.amount, 480.0);
        assert!(cost.estimated);

        let no_fallback = table().resolve(&[], None);
        assert_eq!(no_fallback.amount, 0.0);
        assert!(no_fallback.estimated);
    }

    #[test]
    fn test_duplicate_id_last_wins() {
        let table = MaterialPriceTable::from_prices(&[
            MaterialPrice { material_id: 7, price: 10.0 },
            MaterialPrice { material_id: 7, price: 12.0 },
        ]);
        assert_eq!(table.get(7), Some(12.0));
        assert_eq!(table.len(), 1);
    }
}
