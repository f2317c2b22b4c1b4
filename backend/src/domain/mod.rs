//! Domain layer of the budget ledger.
//!
//! Services here own every business rule: period overlap, allocation limits,
//! and the balance bookkeeping that keeps each category's remaining amount
//! equal to its allocation minus the transactions charged against it.

pub mod allocation_service;
pub mod analytics_service;
pub mod commands;
pub mod errors;
pub mod identity_service;
pub mod models;
pub mod money;
pub mod period_service;
pub mod transaction_service;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_utils;

pub use allocation_service::AllocationService;
pub use analytics_service::AnalyticsService;
pub use errors::{ErrorKind, LedgerError, LedgerResult};
pub use identity_service::IdentityService;
pub use period_service::PeriodService;
pub use transaction_service::TransactionService;
