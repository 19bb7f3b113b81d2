//! Score-weighted allocation over a fixed asset table

use serde::Serialize;

/// Static attributes of an investable asset, all on a 0..1 scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetProfile {
    pub name: &'static str,
    pub risk: f64,
    pub expected_return: f64,
    pub tax_save: f64,
    pub liquidity: f64,
    pub expense_ratio: f64,
}

/// Asset table: [risk, return, tax_save, liquidity, expense_ratio]
pub const ASSETS: &[AssetProfile] = &[
    AssetProfile { name: "NPS", risk: 0.4, expected_return: 0.0711, tax_save: 0.9, liquidity: 0.1, expense_ratio: 0.001 },
    AssetProfile { name: "Index Fund", risk: 0.7, expected_return: 0.1449, tax_save: 0.1, liquidity: 0.8, expense_ratio: 0.002 },
    AssetProfile { name: "ELSS", risk: 0.8, expected_return: 0.12, tax_save: 0.8, liquidity: 0.3, expense_ratio: 0.015 },
    AssetProfile { name: "PPF", risk: 0.1, expected_return: 0.071, tax_save: 0.9, liquidity: 0.05, expense_ratio: 0.0 },
    AssetProfile { name: "Gold ETF", risk: 0.5, expected_return: 0.08, tax_save: 0.0, liquidity: 0.9, expense_ratio: 0.005 },
    AssetProfile { name: "Fixed Deposit", risk: 0.05, expected_return: 0.065, tax_save: 0.2, liquidity: 0.6, expense_ratio: 0.0 },
];

/// Lowest score any asset can receive
pub const MIN_SCORE: f64 = 0.1;

/// Horizons longer than this favour tax saving over liquidity
pub const LONG_HORIZON_YEARS: u32 = 10;

/// Longest projection horizon the simulator accepts
pub const MAX_HORIZON_YEARS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetAllocation {
    pub asset: &'static str,
    pub score: f64,
    pub weight: f64,
    pub amount: f64,
}

/// Fit of an asset to a risk appetite and horizon
pub fn score(asset: &AssetProfile, risk_val: f64, period: u32) -> f64 {
    let risk_fit = 1.0 - (asset.risk - risk_val).abs();
    let horizon_fit = if period > LONG_HORIZON_YEARS {
        asset.tax_save
    } else {
        asset.liquidity
    };
    (0.5 * risk_fit + 0.5 * horizon_fit - asset.expense_ratio).max(MIN_SCORE)
}

/// Split `savings` across `assets` in proportion to their scores
pub fn allocate(assets: &[AssetProfile], savings: f64, risk_val: f64, period: u32) -> Vec<AssetAllocation> {
    let scores: Vec<f64> = assets.iter().map(|a| score(a, risk_val, period)).collect();
    let total: f64 = scores.iter().sum();

    assets
        .iter()
        .zip(scores)
        .map(|(asset, score)| {
            let weight = if total > 0.0 { score / total } else { 0.0 };
            AssetAllocation {
                asset: asset.name,
                score,
                weight,
                amount: savings * weight,
            }
        })
        .collect()
}

/// Value of `amount` after compounding annually at `rate` for `years`
pub fn future_value(amount: f64, rate: f64, years: u32) -> f64 {
    let years = i32::try_from(years).unwrap_or(i32::MAX);
    amount * (1.0 + rate).powi(years)
}
