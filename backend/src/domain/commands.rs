//! Domain-level command and query types.
//!
//! Services consume these instead of the `shared` DTOs; the REST layer maps
//! requests onto them.

pub mod periods {
    use super::allocations::CategorySpec;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::{PayFrequency, PayPeriodStatus};

    /// Input for creating a new pay period.
    #[derive(Debug, Clone)]
    pub struct CreatePeriodCommand {
        pub start_date: NaiveDate,
        pub frequency: PayFrequency,
        pub total_income: Decimal,
        pub categories: Vec<CategorySpec>,
    }

    /// Partial update; `None` leaves the field untouched.
    #[derive(Debug, Clone, Default)]
    pub struct UpdatePeriodCommand {
        pub status: Option<PayPeriodStatus>,
        pub total_income: Option<Decimal>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct PeriodListQuery {
        pub status: Option<PayPeriodStatus>,
    }
}

pub mod allocations {
    use rust_decimal::Decimal;

    /// Unvalidated category entry as received from a caller.
    #[derive(Debug, Clone)]
    pub struct CategorySpec {
        pub name: String,
        pub allocated_amount: Decimal,
    }

    /// Replace the categories of a pay period.
    #[derive(Debug, Clone)]
    pub struct AllocateCommand {
        pub pay_period_id: i64,
        pub allocations: Vec<CategorySpec>,
    }
}

pub mod transactions {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use shared::TransactionSource;

    pub const DEFAULT_LIST_LIMIT: u32 = 100;
    pub const MAX_LIST_LIMIT: u32 = 500;

    /// Input for recording a new transaction.
    #[derive(Debug, Clone)]
    pub struct CreateTransactionCommand {
        pub budget_category_id: i64,
        pub amount: Decimal,
        pub description: String,
        pub transaction_date: Option<DateTime<Utc>>,
        pub source: TransactionSource,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateTransactionCommand {
        pub description: Option<String>,
        pub amount: Option<Decimal>,
    }

    /// Query parameters for listing transactions.
    #[derive(Debug, Clone, Default)]
    pub struct TransactionListQuery {
        pub pay_period_id: Option<i64>,
        pub category_id: Option<i64>,
        pub limit: Option<u32>,
        pub offset: Option<u32>,
    }

    impl TransactionListQuery {
        pub fn effective_limit(&self) -> u32 {
            self.limit
                .unwrap_or(DEFAULT_LIST_LIMIT)
                .clamp(1, MAX_LIST_LIMIT)
        }

        pub fn effective_offset(&self) -> u32 {
            self.offset.unwrap_or(0)
        }
    }
}
