//! Return projections for round-up savings grouped by k-period

mod tax;
mod projection;

pub use tax::{TaxSchedule, TaxSlab};
pub use projection::{
    calculate_returns, investment_years, nps_tax_benefit, project_returns, ReturnProfile, ReturnsRequest,
    ReturnsResponse, SavingsWindow,
};
