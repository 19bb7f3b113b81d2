//! Savings windows: q/p adjusted remanents compounded to retirement

use crate::config::EngineConfig;
use crate::transactions::{
    in_any_period, override_remanent, round_cents, timestamp, validate_and_enrich, Period, Transaction,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Investment vehicle the savings are projected into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnProfile {
    /// National Pension Scheme, with the tax deduction benefit
    Nps,
    /// Index fund, no tax benefit
    Index,
}

impl ReturnProfile {
    pub fn rate(&self, config: &EngineConfig) -> f64 {
        match self {
            ReturnProfile::Nps => config.nps_rate,
            ReturnProfile::Index => config.index_rate,
        }
    }

    pub fn has_tax_benefit(&self) -> bool {
        matches!(self, ReturnProfile::Nps)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnsRequest {
    pub age: u32,
    /// Monthly wage
    pub wage: f64,
    /// Annual inflation in percent (5 = 5%)
    pub inflation: f64,
    #[serde(default)]
    pub q: Vec<Period>,
    #[serde(default)]
    pub p: Vec<Period>,
    #[serde(default)]
    pub k: Vec<Period>,
    pub transactions: Vec<Transaction>,
}

/// Projection for one k-period
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsWindow {
    #[serde(with = "timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub end: NaiveDateTime,
    pub amount: f64,
    pub profit: f64,
    pub tax_benefit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsResponse {
    pub transactions_total_amount: f64,
    pub transactions_total_ceiling: f64,
    pub savings_by_dates: Vec<SavingsWindow>,
}

/// Years left to compound: until retirement, or the fallback horizon past it
pub fn investment_years(age: u32, config: &EngineConfig) -> u32 {
    if age < config.retirement_age {
        config.retirement_age - age
    } else {
        config.fallback_years
    }
}

/// Tax saved by deducting an NPS contribution from annual income
pub fn nps_tax_benefit(contribution: f64, monthly_wage: f64, config: &EngineConfig) -> f64 {
    let annual_income = monthly_wage * 12.0;
    let deduction = contribution
        .min(config.nps_deduction_fraction * annual_income)
        .min(config.nps_deduction_cap);
    config.tax.tax(annual_income) - config.tax.tax(annual_income - deduction)
}

/// Project returns for one of the configured profiles
pub fn calculate_returns(request: &ReturnsRequest, profile: ReturnProfile, config: &EngineConfig) -> ReturnsResponse {
    project_returns(request, profile.rate(config), profile.has_tax_benefit(), config)
}

/// Project returns at an explicit nominal rate
///
/// Validation here applies no wage cap. Transactions outside every k period are
/// dropped silently; each k window is aggregated independently, so a transaction
/// inside two overlapping windows counts toward both.
pub fn project_returns(request: &ReturnsRequest, rate: f64, with_tax_benefit: bool, config: &EngineConfig) -> ReturnsResponse {
    let validated = validate_and_enrich(&request.transactions, None);

    let transactions_total_amount = round_cents(validated.valid.iter().map(|tx| tx.amount).sum());
    let transactions_total_ceiling = round_cents(validated.valid.iter().map(|tx| tx.ceiling).sum());

    let retained: Vec<(NaiveDateTime, f64)> = validated
        .valid
        .iter()
        .filter(|tx| in_any_period(&request.k, tx.date))
        .map(|tx| {
            let raw = Transaction { date: tx.date, amount: tx.amount };
            (tx.date, override_remanent(&raw, &request.q, &request.p))
        })
        .collect();

    let years = investment_years(request.age, config) as i32;
    let growth = (1.0 + rate).powi(years);
    let deflator = (1.0 + request.inflation / 100.0).powi(years);

    log::debug!(
        "Projecting {} of {} valid transactions over {} k windows, {} years at {:.4}",
        retained.len(),
        validated.valid.len(),
        request.k.len(),
        years,
        rate
    );

    let savings_by_dates = request
        .k
        .iter()
        .map(|window| {
            let k_sum: f64 = retained
                .iter()
                .filter(|(date, _)| window.contains(*date))
                .map(|(_, remanent)| remanent)
                .sum();
            let real = k_sum * growth / deflator;
            let tax_benefit = if with_tax_benefit {
                nps_tax_benefit(k_sum, request.wage, config)
            } else {
                0.0
            };
            SavingsWindow {
                start: window.start,
                end: window.end,
                amount: round_cents(k_sum),
                profit: round_cents(real - k_sum),
                tax_benefit: round_cents(tax_benefit),
            }
        })
        .collect();

    ReturnsResponse {
        transactions_total_amount,
        transactions_total_ceiling,
        savings_by_dates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::parse_timestamp;
    use approx::assert_abs_diff_eq;

    fn ts(raw: &str) -> NaiveDateTime {
        parse_timestamp(raw).unwrap()
    }

    fn window(start: &str, end: &str) -> Period {
        Period::new(ts(start), ts(end))
    }

    fn october() -> Period {
        window("2021-10-01 00:00:00", "2021-10-31 23:59:59")
    }

    fn q_and_p_request() -> ReturnsRequest {
        ReturnsRequest {
            age: 30,
            wage: 50_000.0,
            inflation: 5.0,
            q: vec![Period { fixed: 50.0, ..window("2021-10-01 00:00:00", "2021-10-15 23:59:59") }],
            p: vec![Period { extra: 20.0, ..october() }],
            k: vec![october()],
            transactions: vec![Transaction { date: ts("2021-10-01 20:15:00"), amount: 1519.0 }],
        }
    }

    #[test]
    fn test_returns_with_q_and_p_logic() {
        let config = EngineConfig::default();
        let result = project_returns(&q_and_p_request(), 0.08, false, &config);
        assert_eq!(result.savings_by_dates.len(), 1);
        assert_eq!(result.savings_by_dates[0].amount, 70.0);
    }

    #[test]
    fn test_index_profit() {
        let config = EngineConfig::default();
        let result = calculate_returns(&q_and_p_request(), ReturnProfile::Index, &config);
        let window = &result.savings_by_dates[0];

        let expected = 70.0 * 1.1449_f64.powi(30) / 1.05_f64.powi(30) - 70.0;
        assert_abs_diff_eq!(window.profit, expected, epsilon = 0.006);
        assert_eq!(window.tax_benefit, 0.0);
        assert_eq!(result.transactions_total_amount, 1519.0);
        assert_eq!(result.transactions_total_ceiling, 1600.0);
    }

    #[test]
    fn test_nps_below_rebate_has_no_benefit() {
        // 50k/month = 600k/year, inside the rebate
        let config = EngineConfig::default();
        let result = calculate_returns(&q_and_p_request(), ReturnProfile::Nps, &config);
        assert_eq!(result.savings_by_dates[0].tax_benefit, 0.0);
    }

    #[test]
    fn test_nps_tax_benefit() {
        // 1.2M/year: deduction of 70 falls in the 15% slab
        let config = EngineConfig::default();
        let request = ReturnsRequest { wage: 100_000.0, ..q_and_p_request() };
        let result = calculate_returns(&request, ReturnProfile::Nps, &config);
        assert_abs_diff_eq!(result.savings_by_dates[0].tax_benefit, 10.5, epsilon = 1e-9);
    }

    #[test]
    fn test_nps_deduction_capped() {
        let config = EngineConfig::default();
        // 10% of 2.4M = 240k, capped to 200k; all of it inside the 30% slab
        let benefit = nps_tax_benefit(1_000_000.0, 200_000.0, &config);
        assert_abs_diff_eq!(benefit, 60_000.0, epsilon = 1e-6);

        // 10% of annual income binds before the absolute cap
        let benefit = nps_tax_benefit(1_000_000.0, 100_000.0, &config);
        let expected = config.tax.tax(1_200_000.0) - config.tax.tax(1_080_000.0);
        assert_abs_diff_eq!(benefit, expected, epsilon = 1e-6);
    }

    #[test]
    fn test_investment_years() {
        let config = EngineConfig::default();
        assert_eq!(investment_years(30, &config), 30);
        assert_eq!(investment_years(59, &config), 1);
        assert_eq!(investment_years(60, &config), 5);
        assert_eq!(investment_years(75, &config), 5);
    }

    #[test]
    fn test_transactions_outside_k_dropped_but_totalled() {
        let config = EngineConfig::default();
        let mut request = q_and_p_request();
        request.transactions.push(Transaction { date: ts("2021-12-05 10:00:00"), amount: 250.0 });
        request.transactions.push(Transaction { date: ts("2021-10-20 10:00:00"), amount: -40.0 });

        let result = project_returns(&request, 0.08, false, &config);
        assert_eq!(result.savings_by_dates[0].amount, 70.0);
        assert_eq!(result.transactions_total_amount, 1769.0);
        assert_eq!(result.transactions_total_ceiling, 1900.0);
    }

    #[test]
    fn test_windows_are_independent() {
        let config = EngineConfig::default();
        let request = ReturnsRequest {
            age: 65,
            wage: 50_000.0,
            inflation: 0.0,
            q: vec![],
            p: vec![],
            k: vec![
                october(),
                window("2021-10-15 00:00:00", "2021-11-30 23:59:59"),
                window("2022-01-01 00:00:00", "2022-01-31 23:59:59"),
            ],
            transactions: vec![
                Transaction { date: ts("2021-10-05 10:00:00"), amount: 1519.0 },
                Transaction { date: ts("2021-10-20 10:00:00"), amount: 250.0 },
                Transaction { date: ts("2021-11-03 10:00:00"), amount: 620.0 },
            ],
        };
        let result = project_returns(&request, 0.10, false, &config);
        let amounts: Vec<f64> = result.savings_by_dates.iter().map(|w| w.amount).collect();
        assert_eq!(amounts, vec![131.0, 130.0, 0.0]);
        assert_eq!(result.savings_by_dates[2].profit, 0.0);

        // Past retirement: five years at 10%, no inflation
        let expected = 131.0 * 1.1_f64.powi(5) - 131.0;
        assert_abs_diff_eq!(result.savings_by_dates[0].profit, expected, epsilon = 0.006);
    }

    #[test]
    fn test_no_wage_cap_in_returns() {
        let config = EngineConfig::default();
        let request = ReturnsRequest {
            wage: 100.0,
            q: vec![],
            p: vec![],
            transactions: vec![
                Transaction { date: ts("2021-10-02 10:00:00"), amount: 1.0 },
                Transaction { date: ts("2021-10-03 10:00:00"), amount: 2.0 },
            ],
            ..q_and_p_request()
        };
        let result = project_returns(&request, 0.08, false, &config);
        assert_eq!(result.savings_by_dates[0].amount, 197.0);
    }

    #[test]
    fn test_response_field_names() {
        let config = EngineConfig::default();
        let result = calculate_returns(&q_and_p_request(), ReturnProfile::Nps, &config);
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("transactionsTotalAmount").is_some());
        assert!(value.get("transactionsTotalCeiling").is_some());
        let window = &value["savingsByDates"][0];
        assert_eq!(window["start"], "2021-10-01 00:00:00");
        assert_eq!(window["end"], "2021-10-31 23:59:59");
        assert!(window.get("taxBenefit").is_some());
    }
}
