//! Storage layer: SQLite connection management and repositories.

pub mod connection;
pub mod repositories;

pub use connection::DbConnection;
pub use repositories::{
    AnalyticsRepository, CategoryRepository, PeriodRepository, TransactionRepository,
    UserRepository,
};
