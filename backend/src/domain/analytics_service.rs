//! Read-only rollups over periods, categories and transactions.
//!
//! Spend is always summed from live transactions in SQL rather than derived
//! from category balances.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::errors::{LedgerError, LedgerResult};
use super::models::analytics::{CategorySpending, PeriodSummary, SpendingAnalytics};
use super::models::pay_period::PayPeriodDetails;
use super::models::user::AuthenticatedUser;
use super::money;
use crate::storage::{AnalyticsRepository, DbConnection, PeriodRepository};

const TOP_CATEGORY_LIMIT: u32 = 5;

#[derive(Clone)]
pub struct AnalyticsService {
    db: DbConnection,
    period_repository: PeriodRepository,
    analytics_repository: AnalyticsRepository,
}

impl AnalyticsService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            db,
            period_repository: PeriodRepository,
            analytics_repository: AnalyticsRepository,
        }
    }

    /// Allocated, spent and remaining totals of one period with a
    /// per-category breakdown.
    pub async fn period_summary(
        &self,
        user: &AuthenticatedUser,
        pay_period_id: i64,
    ) -> LedgerResult<PeriodSummary> {
        let mut snapshot = self.db.begin_read().await?;

        let period = self
            .period_repository
            .find_for_user(&mut snapshot, user.id, pay_period_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("pay period"))?;

        let categories = self
            .analytics_repository
            .category_spending(&mut snapshot, period.id)
            .await?;
        snapshot.commit().await?;

        let total_allocated: Decimal = categories.iter().map(|c| c.category.allocated_amount).sum();
        let total_spent: Decimal = categories.iter().map(|c| c.spent).sum();

        debug!("Summarised pay period {} for user {}", period.id, user.id);
        Ok(PeriodSummary {
            period: PayPeriodDetails {
                period,
                categories: categories.iter().map(|c| c.category.clone()).collect(),
            },
            total_allocated,
            total_spent,
            total_remaining: total_allocated - total_spent,
            categories,
        })
    }

    /// Per-category spend lines of one period.
    pub async fn spending_summary(
        &self,
        user: &AuthenticatedUser,
        pay_period_id: i64,
    ) -> LedgerResult<Vec<CategorySpending>> {
        let mut conn = self.db.acquire().await?;

        let period = self
            .period_repository
            .find_for_user(&mut conn, user.id, pay_period_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("pay period"))?;

        Ok(self
            .analytics_repository
            .category_spending(&mut conn, period.id)
            .await?)
    }

    /// Totals, averages and rankings across all of the user's periods.
    pub async fn spending_analytics(&self, user: &AuthenticatedUser) -> LedgerResult<SpendingAnalytics> {
        let mut snapshot = self.db.begin_read().await?;

        let totals = self.analytics_repository.user_totals(&mut snapshot, user.id).await?;
        let top_categories = self
            .analytics_repository
            .top_categories(&mut snapshot, user.id, TOP_CATEGORY_LIMIT)
            .await?;
        let spending_trend = self
            .analytics_repository
            .period_trend(&mut snapshot, user.id)
            .await?;
        snapshot.commit().await?;

        let total_spent = money::from_cents(totals.spent_cents);
        let mut average_spending_per_period = if totals.period_count == 0 {
            Decimal::ZERO
        } else {
            (total_spent / Decimal::from(totals.period_count))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };
        average_spending_per_period.rescale(2);

        Ok(SpendingAnalytics {
            total_periods: totals.period_count,
            total_income: money::from_cents(totals.income_cents),
            total_spent,
            average_spending_per_period,
            top_categories,
            spending_trend,
        })
    }
}
