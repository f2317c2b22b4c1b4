use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How often a pay period recurs; drives the derived end date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    Weekly,
    #[default]
    #[serde(alias = "bi-weekly")]
    BiWeekly,
    Monthly,
}

/// Lifecycle state of a pay period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayPeriodStatus {
    Active,
    Completed,
}

/// How a transaction entered the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionSource {
    #[default]
    Manual,
    Api,
}

/// Error returned when a stored enum label is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl PayFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayFrequency::Weekly => "weekly",
            PayFrequency::BiWeekly => "bi_weekly",
            PayFrequency::Monthly => "monthly",
        }
    }
}

impl FromStr for PayFrequency {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(PayFrequency::Weekly),
            "bi_weekly" | "bi-weekly" => Ok(PayFrequency::BiWeekly),
            "monthly" => Ok(PayFrequency::Monthly),
            other => Err(ParseEnumError {
                kind: "pay frequency",
                value: other.to_string(),
            }),
        }
    }
}

impl PayPeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayPeriodStatus::Active => "active",
            PayPeriodStatus::Completed => "completed",
        }
    }
}

impl FromStr for PayPeriodStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PayPeriodStatus::Active),
            "completed" => Ok(PayPeriodStatus::Completed),
            other => Err(ParseEnumError {
                kind: "pay period status",
                value: other.to_string(),
            }),
        }
    }
}

impl TransactionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionSource::Manual => "manual",
            TransactionSource::Api => "api",
        }
    }
}

impl FromStr for TransactionSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(TransactionSource::Manual),
            "api" => Ok(TransactionSource::Api),
            other => Err(ParseEnumError {
                kind: "transaction source",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PayFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PayPeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TransactionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Budget categories and allocation
// ---------------------------------------------------------------------------

/// A named spending bucket within one pay period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: i64,
    pub pay_period_id: i64,
    pub name: String,
    pub allocated_amount: Decimal,
    /// Live spendable balance: allocated minus the sum of live transactions
    pub remaining_amount: Decimal,
    /// Optimistic-concurrency counter, bumped on every balance change
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

/// One entry of an allocation batch (also used for initial categories)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    /// Category name (1-100 characters)
    pub name: String,
    pub allocated_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocateBudgetRequest {
    pub pay_period_id: i64,
    pub allocations: Vec<CategoryAllocation>,
}

// ---------------------------------------------------------------------------
// Pay periods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayPeriod {
    pub id: i64,
    pub user_id: i64,
    pub start_date: NaiveDate,
    /// Derived from start date and frequency, inclusive
    pub end_date: NaiveDate,
    pub frequency: PayFrequency,
    pub total_income: Decimal,
    pub status: PayPeriodStatus,
    pub created_at: DateTime<Utc>,
    pub budget_categories: Vec<BudgetCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePayPeriodRequest {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub frequency: PayFrequency,
    pub total_income: Decimal,
    /// Optional categories created together with the period
    #[serde(default)]
    pub budget_categories: Vec<CategoryAllocation>,
}

/// Query string of `GET /api/budget/pay-periods`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PayPeriodListQuery {
    pub status_filter: Option<PayPeriodStatus>,
}

/// Only status and income can change once a period exists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdatePayPeriodRequest {
    pub status: Option<PayPeriodStatus>,
    pub total_income: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// A single expense charged to a budget category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub pay_period_id: i64,
    pub budget_category_id: i64,
    /// Always positive; it is deducted from the category balance
    pub amount: Decimal,
    pub description: String,
    pub transaction_date: DateTime<Utc>,
    pub source: TransactionSource,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub budget_category_id: i64,
    pub amount: Decimal,
    /// Description of the transaction (max 255 characters)
    pub description: String,
    /// Optional date override - uses current time if not provided
    #[serde(default)]
    pub transaction_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: TransactionSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkCreateTransactionsRequest {
    pub transactions: Vec<CreateTransactionRequest>,
}

/// Query string of `GET /api/transactions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TransactionListQuery {
    pub pay_period_id: Option<i64>,
    pub category_id: Option<i64>,
    /// Page size, defaults to 100 and is capped at 500
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UpdateTransactionRequest {
    pub description: Option<String>,
    pub amount: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: BudgetCategory,
    pub allocated: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummaryResponse {
    pub pay_period: PayPeriod,
    pub total_allocated: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    pub categories_summary: Vec<CategorySummary>,
}

/// Per-category spending line for a single pay period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub budget_category_id: i64,
    pub category_name: String,
    pub allocated_amount: Decimal,
    pub total_spent: Decimal,
    pub remaining_amount: Decimal,
    pub transaction_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    pub category: String,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingTrendPoint {
    pub pay_period_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_income: Decimal,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingAnalytics {
    pub total_periods: i64,
    pub total_income: Decimal,
    pub total_spent: Decimal,
    pub average_spending_per_period: Decimal,
    pub top_categories: Vec<TopCategory>,
    pub spending_trend: Vec<SpendingTrendPoint>,
}

/// Body returned with every non-2xx response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error kind, e.g. `insufficient_funds`
    pub error: String,
    pub message: String,
}
