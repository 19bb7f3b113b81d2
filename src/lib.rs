//! Retirement engine: round-up savings and return projections
//!
//! Transactions are enriched with a round-up "remanent", validated, bucketed into
//! reporting windows and projected forward under an NPS or index-fund profile.
//! A separate simulator allocates a single round-up across a fixed asset table.

pub mod api;
pub mod config;
pub mod error;
pub mod portfolio;
pub mod returns;
pub mod transactions;

pub use config::EngineConfig;
pub use error::{ApiError, ConfigError};
pub use returns::{calculate_returns, ReturnProfile, ReturnsRequest, ReturnsResponse, SavingsWindow};
pub use transactions::{EnrichedTransaction, Period, Transaction, ValidationResult};
