//! Allocation engine: splits a pay period's income across budget categories.
//!
//! An allocation batch replaces every category of the period in one unit of
//! work, so the allocated total of a period is always the total of the most
//! recent batch and never exceeds the period's income.

use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::{info, warn};

use super::commands::allocations::{AllocateCommand, CategorySpec};
use super::errors::{LedgerError, LedgerResult};
use super::models::budget_category::{BudgetCategory, NewBudgetCategory};
use super::models::user::AuthenticatedUser;
use super::{money, validation};
use crate::storage::{CategoryRepository, DbConnection, PeriodRepository, TransactionRepository};

#[derive(Clone)]
pub struct AllocationService {
    db: DbConnection,
    period_repository: PeriodRepository,
    category_repository: CategoryRepository,
    transaction_repository: TransactionRepository,
}

impl AllocationService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            db,
            period_repository: PeriodRepository,
            category_repository: CategoryRepository,
            transaction_repository: TransactionRepository,
        }
    }

    /// Validate every entry of a batch, reporting the first malformed one.
    pub fn validate_batch(specs: &[CategorySpec]) -> LedgerResult<Vec<NewBudgetCategory>> {
        specs
            .iter()
            .map(|spec| -> LedgerResult<NewBudgetCategory> {
                Ok(NewBudgetCategory {
                    name: validation::category_name(&spec.name)?,
                    allocated_cents: money::non_negative_cents(
                        "allocated_amount",
                        spec.allocated_amount,
                    )?,
                })
            })
            .collect()
    }

    /// Reject a batch whose total exceeds `income_cents`; equality is accepted.
    pub fn ensure_within_income(
        categories: &[NewBudgetCategory],
        income_cents: i64,
    ) -> LedgerResult<()> {
        let allocated: i64 = categories.iter().map(|c| c.allocated_cents).sum();
        if allocated > income_cents {
            warn!(
                "Rejected allocation of {} cents against income of {} cents",
                allocated, income_cents
            );
            return Err(LedgerError::OverAllocation {
                allocated: money::from_cents(allocated),
                income: money::from_cents(income_cents),
            });
        }
        Ok(())
    }

    /// Insert one category inside the caller's unit of work.
    ///
    /// The remaining balance starts equal to the allocation at version 0.
    pub async fn create_category(
        &self,
        conn: &mut SqliteConnection,
        pay_period_id: i64,
        category: &NewBudgetCategory,
        now: DateTime<Utc>,
    ) -> LedgerResult<BudgetCategory> {
        let id = self
            .category_repository
            .insert(conn, pay_period_id, category, now)
            .await?;

        self.category_repository
            .find_by_id(conn, id)
            .await?
            .ok_or_else(|| LedgerError::not_found("budget category"))
    }

    /// Replace the categories of a pay period with a new batch.
    pub async fn allocate(
        &self,
        user: &AuthenticatedUser,
        command: AllocateCommand,
    ) -> LedgerResult<Vec<BudgetCategory>> {
        let categories = Self::validate_batch(&command.allocations)?;

        let mut tx = self.db.begin().await?;

        let period = self
            .period_repository
            .find_for_user(&mut tx, user.id, command.pay_period_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("pay period"))?;

        let income_cents = money::checked_cents("total_income", period.total_income)?;
        Self::ensure_within_income(&categories, income_cents)?;

        if self
            .transaction_repository
            .exists_for_period(&mut tx, period.id)
            .await?
        {
            warn!(
                "Refusing to replace categories of pay period {} that already has transactions",
                period.id
            );
            return Err(LedgerError::CategoriesInUse {
                period_id: period.id,
            });
        }

        let removed = self
            .category_repository
            .delete_for_period(&mut tx, period.id)
            .await?;

        let now = Utc::now();
        let mut created = Vec::with_capacity(categories.len());
        for category in &categories {
            created.push(self.create_category(&mut tx, period.id, category, now).await?);
        }

        tx.commit().await?;

        info!(
            "Allocated {} categories to pay period {} (replaced {})",
            created.len(),
            period.id,
            removed
        );
        Ok(created)
    }

    /// Categories of a pay period owned by the user
    pub async fn list_categories(
        &self,
        user: &AuthenticatedUser,
        pay_period_id: i64,
    ) -> LedgerResult<Vec<BudgetCategory>> {
        let mut conn = self.db.acquire().await?;

        let period = self
            .period_repository
            .find_for_user(&mut conn, user.id, pay_period_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("pay period"))?;

        Ok(self
            .category_repository
            .list_for_period(&mut conn, period.id)
            .await?)
    }

    pub async fn get_category(
        &self,
        user: &AuthenticatedUser,
        category_id: i64,
    ) -> LedgerResult<BudgetCategory> {
        let mut conn = self.db.acquire().await?;

        self.category_repository
            .find_for_user(&mut conn, user.id, category_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("budget category"))
    }
}
