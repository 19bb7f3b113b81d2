//! Two-phase transaction validation
//!
//! Phase 1 classifies rows one at a time (negative amounts, duplicates).
//! Phase 2 checks the survivors' total remanent against the wage cap and, if the
//! cap is exceeded, re-partitions the whole batch into the invalid bucket.

use super::{enrich_all, round_cents, EnrichedTransaction, InvalidTransaction, Transaction, ValidationResult};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::fmt;

/// Why a transaction ended up in the invalid bucket
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    NegativeAmount,
    Duplicate,
    WageCapExceeded { total: f64, threshold: f64 },
    OutsideKPeriod,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NegativeAmount => write!(f, "Negative amounts are not allowed"),
            Rejection::Duplicate => write!(f, "Duplicate transaction"),
            Rejection::WageCapExceeded { total, threshold } => write!(
                f,
                "Total remanent {:.2} exceeds the wage cap of {:.2}",
                total, threshold
            ),
            Rejection::OutsideKPeriod => write!(f, "Transaction does not fall within any k-period"),
        }
    }
}

/// Batch-level remanent limit derived from a monthly wage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WageCap {
    pub wage: f64,
    pub fraction: f64,
}

impl WageCap {
    /// `None` when no wage is supplied or the wage is not positive
    pub fn new(wage: Option<f64>, fraction: f64) -> Option<Self> {
        wage.filter(|w| *w > 0.0).map(|wage| Self { wage, fraction })
    }

    pub fn threshold(&self) -> f64 {
        self.fraction * self.wage
    }
}

/// Duplicate key: timestamp plus amount in whole cents
fn duplicate_key(tx: &EnrichedTransaction) -> (NaiveDateTime, i64) {
    (tx.date, (tx.amount * 100.0).round() as i64)
}

/// Phase 1: per-row rules, first occurrence of a (date, amount) pair wins
fn classify_rows(transactions: Vec<EnrichedTransaction>) -> ValidationResult {
    let mut seen = HashSet::with_capacity(transactions.len());
    let mut result = ValidationResult::default();

    for tx in transactions {
        if tx.amount < 0.0 {
            result.invalid.push(InvalidTransaction::new(tx, &Rejection::NegativeAmount));
        } else if !seen.insert(duplicate_key(&tx)) {
            result.invalid.push(InvalidTransaction::new(tx, &Rejection::Duplicate));
        } else {
            result.valid.push(tx);
        }
    }

    result
}

/// Phase 2: all-or-nothing wage cap over the phase 1 survivors
fn apply_wage_cap(rows: ValidationResult, cap: Option<WageCap>) -> ValidationResult {
    let Some(cap) = cap else {
        return rows;
    };

    let total = round_cents(rows.valid.iter().map(|tx| tx.remanent).sum());
    let threshold = cap.threshold();
    if total <= threshold {
        return rows;
    }

    log::debug!(
        "Wage cap exceeded: remanent {:.2} > {:.2}, rejecting {} transactions",
        total,
        threshold,
        rows.valid.len()
    );
    let reason = Rejection::WageCapExceeded { total, threshold };
    let mut invalid = rows.invalid;
    invalid.extend(rows.valid.into_iter().map(|tx| InvalidTransaction::new(tx, &reason)));

    ValidationResult { valid: Vec::new(), invalid }
}

/// Validate already-enriched transactions
pub fn validate(transactions: Vec<EnrichedTransaction>, cap: Option<WageCap>) -> ValidationResult {
    let input_len = transactions.len();
    let result = apply_wage_cap(classify_rows(transactions), cap);
    log::debug!(
        "Validated {} transactions: {} valid, {} invalid",
        input_len,
        result.valid.len(),
        result.invalid.len()
    );
    result
}

/// Enrich raw transactions, then validate them
pub fn validate_and_enrich(transactions: &[Transaction], cap: Option<WageCap>) -> ValidationResult {
    validate(enrich_all(transactions), cap)
}
