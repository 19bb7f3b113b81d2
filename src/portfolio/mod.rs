//! Standalone round-up simulator and portfolio allocator
//!
//! Independent of the transaction pipeline: a single purchase is rounded up to the
//! next multiple of `simulator_step` and the spare change is spread over `ASSETS`.

pub mod allocator;

pub use allocator::{allocate, future_value, score, AssetAllocation, AssetProfile, ASSETS, MAX_HORIZON_YEARS};

use crate::config::EngineConfig;
use crate::transactions::{round_cents, roundup::ceiling_to};
use serde::Serialize;

/// Basic simulator output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundupSummary {
    pub saved: f64,
    pub invested_on_port: u32,
}

/// Advanced simulator output: round-up, allocation and projected value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundupSimulation {
    pub transaction_amount: f64,
    pub saved: f64,
    pub period: u32,
    pub risk_val: f64,
    pub allocation: Vec<AssetAllocation>,
    pub nominal_value: f64,
    pub real_value: f64,
}

/// Spare change left by rounding `amount` up to the simulator step
pub fn roundup_savings(amount: f64, config: &EngineConfig) -> f64 {
    round_cents(ceiling_to(amount, config.simulator_step) - amount)
}

pub fn simulate_basic(amount: f64, risk_value: f64, config: &EngineConfig) -> RoundupSummary {
    log::debug!("Basic round-up for {} at risk {}", amount, risk_value);
    RoundupSummary {
        saved: roundup_savings(amount, config),
        invested_on_port: config.basic_portfolio_id,
    }
}

pub fn simulate_allocation(amount: f64, period: u32, risk_val: f64, config: &EngineConfig) -> RoundupSimulation {
    let saved = roundup_savings(amount, config);
    RoundupSimulation {
        transaction_amount: amount,
        saved,
        period,
        risk_val,
        allocation: allocate(ASSETS, saved, risk_val, period),
        nominal_value: round_cents(future_value(saved, config.allocator_nominal_rate, period)),
        real_value: round_cents(future_value(saved, config.allocator_real_rate, period)),
    }
}
