//! Request bodies for the transaction endpoints

use crate::transactions::{Period, Transaction};
use serde::Deserialize;

/// `transactions:validator` body; `ceiling`/`remanent` on input rows are recomputed
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorRequest {
    #[serde(default)]
    pub wage: Option<f64>,
    pub transactions: Vec<Transaction>,
}

/// `transactions:filter` body
///
/// `q` and `p` are accepted for symmetry with the returns endpoints but do not
/// affect filtering.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub q: Vec<Period>,
    #[serde(default)]
    pub p: Vec<Period>,
    #[serde(default)]
    pub k: Vec<Period>,
    #[serde(default)]
    pub wage: Option<f64>,
    pub transactions: Vec<Transaction>,
}
