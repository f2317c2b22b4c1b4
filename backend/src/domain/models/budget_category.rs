use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetCategory {
    pub id: i64,
    pub pay_period_id: i64,
    pub name: String,
    pub allocated_amount: Decimal,
    pub remaining_amount: Decimal,
    /// Bumped on every balance change; writers compare-and-swap on it
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a category insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudgetCategory {
    pub name: String,
    pub allocated_cents: i64,
}
