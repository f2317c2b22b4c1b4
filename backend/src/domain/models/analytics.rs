//! Read-only rollups produced by the analytics service.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::budget_category::BudgetCategory;
use super::pay_period::PayPeriodDetails;

/// Spend aggregated from the live transactions of one category
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpending {
    pub category: BudgetCategory,
    pub spent: Decimal,
    pub transaction_count: i64,
}

impl CategorySpending {
    pub fn remaining(&self) -> Decimal {
        self.category.allocated_amount - self.spent
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period: PayPeriodDetails,
    pub total_allocated: Decimal,
    pub total_spent: Decimal,
    pub total_remaining: Decimal,
    pub categories: Vec<CategorySpending>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRanking {
    pub name: String,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTrendPoint {
    pub pay_period_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_income: Decimal,
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpendingAnalytics {
    pub total_periods: i64,
    pub total_income: Decimal,
    pub total_spent: Decimal,
    pub average_spending_per_period: Decimal,
    pub top_categories: Vec<CategoryRanking>,
    pub spending_trend: Vec<PeriodTrendPoint>,
}
