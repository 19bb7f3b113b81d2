//! Transaction data structures, round-up enrichment, validation and period rules

pub mod roundup;
pub mod validator;
pub mod period;

pub use roundup::{enrich, enrich_all, round_cents, ROUND_UP_STEP};
pub use validator::{validate, validate_and_enrich, Rejection, WageCap};
pub use period::{filter_by_k_periods, in_any_period, override_remanent, Period};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wire format for every timestamp the service accepts or returns
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Serde adapter for `YYYY-MM-DD HH:MM:SS` timestamps
///
/// Malformed strings and calendar-invalid dates (e.g. `2021-02-30`) fail
/// deserialization, so they are rejected while the request body is parsed.
pub mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(|err| {
            de::Error::custom(format!(
                "invalid timestamp '{}' (expected YYYY-MM-DD HH:MM:SS): {}",
                raw, err
            ))
        })
    }
}

/// A raw transaction as received
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    pub amount: f64,
}

/// A transaction with its round-up ceiling and remanent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTransaction {
    #[serde(with = "timestamp")]
    pub date: NaiveDateTime,
    pub amount: f64,
    pub ceiling: f64,
    pub remanent: f64,
}

/// A rejected transaction and the reason it was rejected
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidTransaction {
    #[serde(flatten)]
    pub transaction: EnrichedTransaction,
    pub message: String,
    /// Only set by the k-period filter
    #[serde(rename = "inKPeriod", skip_serializing_if = "Option::is_none")]
    pub in_k_period: Option<bool>,
}

impl InvalidTransaction {
    pub fn new(transaction: EnrichedTransaction, reason: &Rejection) -> Self {
        Self {
            transaction,
            message: reason.to_string(),
            in_k_period: match reason {
                Rejection::OutsideKPeriod => Some(false),
                _ => None,
            },
        }
    }
}

/// Disjoint valid/invalid partition of a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: Vec<EnrichedTransaction>,
    pub invalid: Vec<InvalidTransaction>,
}

/// A valid transaction tagged with its k-period membership
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredTransaction {
    #[serde(flatten)]
    pub transaction: EnrichedTransaction,
    #[serde(rename = "inKPeriod")]
    pub in_k_period: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterResult {
    pub valid: Vec<FilteredTransaction>,
    pub invalid: Vec<InvalidTransaction>,
}

/// Parse a timestamp in the wire format
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
}
