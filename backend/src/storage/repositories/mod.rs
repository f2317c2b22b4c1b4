//! Repositories run on a caller-supplied connection so that services can
//! compose several calls inside one `sqlx::Transaction`.

pub mod analytics_repository;
pub mod category_repository;
pub mod period_repository;
pub mod transaction_repository;
pub mod user_repository;

pub use analytics_repository::AnalyticsRepository;
pub use category_repository::CategoryRepository;
pub use period_repository::PeriodRepository;
pub use transaction_repository::TransactionRepository;
pub use user_repository::UserRepository;

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::str::FromStr;

/// Read a TEXT column holding an enum label
pub(crate) fn decode_label<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = shared::ParseEnumError>,
{
    let raw: String = row.try_get(column)?;
    raw.parse::<T>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
