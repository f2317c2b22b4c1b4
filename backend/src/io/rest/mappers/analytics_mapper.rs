use super::category_mapper::CategoryMapper;
use super::period_mapper::PeriodMapper;
use crate::domain::models::analytics::{
    CategorySpending, PeriodSummary, SpendingAnalytics as DomainAnalytics,
};
use shared::{
    CategorySummary, PeriodSummaryResponse, SpendingAnalytics as SharedAnalytics,
    SpendingTrendPoint, TopCategory, TransactionSummary,
};

pub struct AnalyticsMapper;

impl AnalyticsMapper {
    pub fn to_period_summary(summary: PeriodSummary) -> PeriodSummaryResponse {
        PeriodSummaryResponse {
            pay_period: PeriodMapper::to_dto(summary.period),
            total_allocated: summary.total_allocated,
            total_spent: summary.total_spent,
            total_remaining: summary.total_remaining,
            categories_summary: summary
                .categories
                .into_iter()
                .map(|line| {
                    let remaining = line.remaining();
                    CategorySummary {
                        allocated: line.category.allocated_amount,
                        spent: line.spent,
                        remaining,
                        category: CategoryMapper::to_dto(line.category),
                    }
                })
                .collect(),
        }
    }

    pub fn to_transaction_summary(line: CategorySpending) -> TransactionSummary {
        TransactionSummary {
            budget_category_id: line.category.id,
            category_name: line.category.name,
            allocated_amount: line.category.allocated_amount,
            total_spent: line.spent,
            remaining_amount: line.category.remaining_amount,
            transaction_count: line.transaction_count,
        }
    }

    pub fn to_spending_analytics(analytics: DomainAnalytics) -> SharedAnalytics {
        SharedAnalytics {
            total_periods: analytics.total_periods,
            total_income: analytics.total_income,
            total_spent: analytics.total_spent,
            average_spending_per_period: analytics.average_spending_per_period,
            top_categories: analytics
                .top_categories
                .into_iter()
                .map(|ranking| TopCategory {
                    category: ranking.name,
                    total_spent: ranking.total_spent,
                })
                .collect(),
            spending_trend: analytics
                .spending_trend
                .into_iter()
                .map(|point| SpendingTrendPoint {
                    pay_period_id: point.pay_period_id,
                    start_date: point.start_date,
                    end_date: point.end_date,
                    total_income: point.total_income,
                    total_spent: point.total_spent,
                })
                .collect(),
        }
    }
}
