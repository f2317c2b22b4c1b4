pub mod analytics_mapper;
pub mod category_mapper;
pub mod period_mapper;
pub mod transaction_mapper;

pub use analytics_mapper::AnalyticsMapper;
pub use category_mapper::CategoryMapper;
pub use period_mapper::PeriodMapper;
pub use transaction_mapper::TransactionMapper;
