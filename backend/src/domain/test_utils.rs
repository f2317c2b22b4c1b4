//! Fixtures shared by the service tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::PayFrequency;
use tempfile::TempDir;

use super::commands::allocations::CategorySpec;
use super::commands::periods::CreatePeriodCommand;
use super::models::user::AuthenticatedUser;
use super::{
    AllocationService, AnalyticsService, IdentityService, PeriodService, TransactionService,
};
use crate::storage::DbConnection;

pub(crate) struct Services {
    pub identity: IdentityService,
    pub periods: PeriodService,
    pub allocations: AllocationService,
    pub transactions: TransactionService,
    pub analytics: AnalyticsService,
}

pub(crate) async fn setup() -> Services {
    services_on(DbConnection::init_in_memory().await.unwrap())
}

/// Services over a WAL database file inside `dir`, for tests that need
/// several connections at once.
pub(crate) async fn setup_file(dir: &TempDir) -> Services {
    let url = format!("sqlite:{}", dir.path().join("ledger.db").display());
    services_on(DbConnection::new(&url).await.unwrap())
}

fn services_on(db: DbConnection) -> Services {
    let allocations = AllocationService::new(db.clone());
    Services {
        identity: IdentityService::new(db.clone()),
        periods: PeriodService::new(db.clone(), allocations.clone()),
        allocations,
        transactions: TransactionService::new(db.clone()),
        analytics: AnalyticsService::new(db),
    }
}

pub(crate) async fn user(services: &Services, email: &str) -> AuthenticatedUser {
    services.identity.resolve(email, None).await.unwrap()
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn spec(name: &str, amount: Decimal) -> CategorySpec {
    CategorySpec {
        name: name.to_string(),
        allocated_amount: amount,
    }
}

pub(crate) fn bi_weekly(start: NaiveDate, income: Decimal, categories: Vec<CategorySpec>) -> CreatePeriodCommand {
    CreatePeriodCommand {
        start_date: start,
        frequency: PayFrequency::BiWeekly,
        total_income: income,
        categories,
    }
}
