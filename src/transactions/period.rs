//! Date windows: k-period inclusion, q-period overrides and p-period bonuses

use super::{
    roundup::enrich, timestamp, FilterResult, FilteredTransaction, InvalidTransaction, Rejection, Transaction,
    ValidationResult,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// An inclusive date window
///
/// The same shape serves all three roles; which list a period arrives in decides
/// whether `fixed` (q), `extra` (p) or neither (k) is read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(with = "timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub end: NaiveDateTime,
    #[serde(default)]
    pub fixed: f64,
    #[serde(default)]
    pub extra: f64,
}

impl Period {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end, fixed: 0.0, extra: 0.0 }
    }

    /// Inclusive on both ends
    pub fn contains(&self, date: NaiveDateTime) -> bool {
        self.start <= date && date <= self.end
    }
}

pub fn in_any_period(periods: &[Period], date: NaiveDateTime) -> bool {
    periods.iter().any(|p| p.contains(date))
}

/// Final remanent for a transaction after q and p rules
///
/// Among matching q periods the latest `start` wins (ties go to the one listed
/// first) and its `fixed` replaces the baseline. Every matching p period then
/// adds its `extra`.
pub fn override_remanent(tx: &Transaction, q: &[Period], p: &[Period]) -> f64 {
    let mut remanent = enrich(tx).remanent;

    let mut q_matches: Vec<&Period> = q.iter().filter(|period| period.contains(tx.date)).collect();
    q_matches.sort_by(|a, b| b.start.cmp(&a.start));
    if let Some(latest) = q_matches.first() {
        remanent = latest.fixed;
    }

    remanent
        + p.iter()
            .filter(|period| period.contains(tx.date))
            .map(|period| period.extra)
            .sum::<f64>()
}

/// Tag valid transactions with k-period membership
///
/// Transactions outside every k period move to the invalid bucket.
pub fn filter_by_k_periods(validated: ValidationResult, k: &[Period]) -> FilterResult {
    let mut result = FilterResult {
        valid: Vec::with_capacity(validated.valid.len()),
        invalid: validated.invalid,
    };

    for tx in validated.valid {
        if in_any_period(k, tx.date) {
            result.valid.push(FilteredTransaction { transaction: tx, in_k_period: true });
        } else {
            result.invalid.push(InvalidTransaction::new(tx, &Rejection::OutsideKPeriod));
        }
    }

    log::debug!(
        "k-period filter over {} windows: {} inside, {} invalid",
        k.len(),
        result.valid.len(),
        result.invalid.len()
    );
    result
}
