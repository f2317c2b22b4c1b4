use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::TransactionSource;

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub pay_period_id: i64,
    pub budget_category_id: i64,
    pub amount: Decimal,
    pub description: String,
    pub transaction_date: DateTime<Utc>,
    pub source: TransactionSource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a transaction insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub budget_category_id: i64,
    pub amount_cents: i64,
    pub description: String,
    pub transaction_date: DateTime<Utc>,
    pub source: TransactionSource,
}
