//! Round-up enrichment: ceiling and remanent per transaction

use super::{EnrichedTransaction, Transaction};

/// Transactions are rounded up to the next multiple of this amount
pub const ROUND_UP_STEP: f64 = 100.0;

/// Round to two decimal places
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Smallest multiple of `step` that is >= `amount`
pub fn ceiling_to(amount: f64, step: f64) -> f64 {
    (amount / step).ceil() * step
}

/// Compute ceiling and remanent for a single transaction
///
/// Negative amounts are enriched arithmetically; rejecting them is the validator's job.
pub fn enrich(tx: &Transaction) -> EnrichedTransaction {
    let ceiling = ceiling_to(tx.amount, ROUND_UP_STEP);
    EnrichedTransaction {
        date: tx.date,
        amount: tx.amount,
        ceiling,
        remanent: round_cents(ceiling - tx.amount),
    }
}

/// Enrich a batch, preserving input order
pub fn enrich_all(transactions: &[Transaction]) -> Vec<EnrichedTransaction> {
    transactions.iter().map(enrich).collect()
}
