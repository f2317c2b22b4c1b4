//! Period manager: pay period lifecycle and the non-overlap rule for active
//! periods.

use chrono::Utc;
use shared::PayPeriodStatus;
use sqlx::SqliteConnection;
use tracing::{info, warn};

use super::allocation_service::AllocationService;
use super::commands::periods::{CreatePeriodCommand, PeriodListQuery, UpdatePeriodCommand};
use super::errors::{LedgerError, LedgerResult};
use super::models::pay_period::{period_end_date, PayPeriod, PayPeriodDetails};
use super::models::user::AuthenticatedUser;
use super::money;
use crate::storage::repositories::period_repository::NewPayPeriodRow;
use crate::storage::{CategoryRepository, DbConnection, PeriodRepository};

#[derive(Clone)]
pub struct PeriodService {
    db: DbConnection,
    period_repository: PeriodRepository,
    category_repository: CategoryRepository,
    allocation_service: AllocationService,
}

impl PeriodService {
    pub fn new(db: DbConnection, allocation_service: AllocationService) -> Self {
        Self {
            db,
            period_repository: PeriodRepository,
            category_repository: CategoryRepository,
            allocation_service,
        }
    }

    /// Create an active pay period, optionally with its first categories.
    pub async fn create_period(
        &self,
        user: &AuthenticatedUser,
        command: CreatePeriodCommand,
    ) -> LedgerResult<PayPeriodDetails> {
        let income_cents = money::non_negative_cents("total_income", command.total_income)?;
        let categories = AllocationService::validate_batch(&command.categories)?;
        let end_date = period_end_date(command.start_date, command.frequency)
            .ok_or_else(|| LedgerError::validation("start_date", "is outside the supported range"))?;
        AllocationService::ensure_within_income(&categories, income_cents)?;

        let mut tx = self.db.begin().await?;

        if let Some(existing_id) = self
            .period_repository
            .find_overlapping_active(&mut tx, user.id, command.start_date, end_date, None)
            .await?
        {
            warn!(
                "Pay period {}..{} for user {} overlaps active period {}",
                command.start_date, end_date, user.id, existing_id
            );
            return Err(LedgerError::PeriodOverlap { existing_id });
        }

        let now = Utc::now();
        let period_id = self
            .period_repository
            .insert(
                &mut tx,
                &NewPayPeriodRow {
                    user_id: user.id,
                    start_date: command.start_date,
                    end_date,
                    frequency: command.frequency,
                    total_income_cents: income_cents,
                    now,
                },
            )
            .await?;

        let mut created = Vec::with_capacity(categories.len());
        for category in &categories {
            created.push(
                self.allocation_service
                    .create_category(&mut tx, period_id, category, now)
                    .await?,
            );
        }

        let period = self.require_period(&mut tx, user, period_id).await?;
        tx.commit().await?;

        info!(
            "Created pay period {} ({} to {}) with {} categories for user {}",
            period.id,
            period.start_date,
            period.end_date,
            created.len(),
            user.id
        );
        Ok(PayPeriodDetails {
            period,
            categories: created,
        })
    }

    /// Change status and/or income of a pay period.
    pub async fn update_period(
        &self,
        user: &AuthenticatedUser,
        period_id: i64,
        command: UpdatePeriodCommand,
    ) -> LedgerResult<PayPeriodDetails> {
        let income_cents = command
            .total_income
            .map(|income| money::non_negative_cents("total_income", income))
            .transpose()?;

        let mut tx = self.db.begin().await?;
        let existing = self.require_period(&mut tx, user, period_id).await?;

        if let Some(income_cents) = income_cents {
            let allocated = self
                .category_repository
                .allocated_total_cents(&mut tx, existing.id)
                .await?;
            if allocated > income_cents {
                warn!(
                    "Income of pay period {} cannot drop below its allocations",
                    existing.id
                );
                return Err(LedgerError::OverAllocation {
                    allocated: money::from_cents(allocated),
                    income: money::from_cents(income_cents),
                });
            }
        }

        if command.status == Some(PayPeriodStatus::Active)
            && existing.status != PayPeriodStatus::Active
        {
            if let Some(existing_id) = self
                .period_repository
                .find_overlapping_active(
                    &mut tx,
                    user.id,
                    existing.start_date,
                    existing.end_date,
                    Some(existing.id),
                )
                .await?
            {
                warn!(
                    "Cannot reactivate pay period {}: overlaps active period {}",
                    existing.id, existing_id
                );
                return Err(LedgerError::PeriodOverlap { existing_id });
            }
        }

        self.period_repository
            .update(&mut tx, existing.id, command.status, income_cents, Utc::now())
            .await?;

        let details = self.load_details(&mut tx, user, existing.id).await?;
        tx.commit().await?;

        info!("Updated pay period {}", existing.id);
        Ok(details)
    }

    /// List the user's pay periods, newest first.
    pub async fn list_periods(
        &self,
        user: &AuthenticatedUser,
        query: PeriodListQuery,
    ) -> LedgerResult<Vec<PayPeriodDetails>> {
        let mut conn = self.db.acquire().await?;

        let periods = self
            .period_repository
            .list_for_user(&mut conn, user.id, query.status)
            .await?;

        let mut details = Vec::with_capacity(periods.len());
        for period in periods {
            let categories = self
                .category_repository
                .list_for_period(&mut conn, period.id)
                .await?;
            details.push(PayPeriodDetails { period, categories });
        }
        Ok(details)
    }

    pub async fn get_period(
        &self,
        user: &AuthenticatedUser,
        period_id: i64,
    ) -> LedgerResult<PayPeriodDetails> {
        let mut conn = self.db.acquire().await?;
        self.load_details(&mut conn, user, period_id).await
    }

    /// The most recent active pay period.
    pub async fn current_period(&self, user: &AuthenticatedUser) -> LedgerResult<PayPeriodDetails> {
        let mut conn = self.db.acquire().await?;

        let period = self
            .period_repository
            .find_current(&mut conn, user.id)
            .await?
            .ok_or_else(|| LedgerError::not_found("active pay period"))?;

        let categories = self
            .category_repository
            .list_for_period(&mut conn, period.id)
            .await?;
        Ok(PayPeriodDetails { period, categories })
    }

    /// Delete a pay period with its categories and transactions.
    ///
    /// Returns false when the period does not exist or belongs to someone else.
    pub async fn delete_period(&self, user: &AuthenticatedUser, period_id: i64) -> LedgerResult<bool> {
        let mut tx = self.db.begin().await?;

        let Some(period) = self
            .period_repository
            .find_for_user(&mut tx, user.id, period_id)
            .await?
        else {
            return Ok(false);
        };

        let deleted = self.period_repository.delete_cascade(&mut tx, period.id).await?;
        tx.commit().await?;

        info!("Deleted pay period {} of user {}", period.id, user.id);
        Ok(deleted)
    }

    async fn require_period(
        &self,
        conn: &mut SqliteConnection,
        user: &AuthenticatedUser,
        period_id: i64,
    ) -> LedgerResult<PayPeriod> {
        self.period_repository
            .find_for_user(conn, user.id, period_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("pay period"))
    }

    async fn load_details(
        &self,
        conn: &mut SqliteConnection,
        user: &AuthenticatedUser,
        period_id: i64,
    ) -> LedgerResult<PayPeriodDetails> {
        let period = self.require_period(conn, user, period_id).await?;
        let categories = self
            .category_repository
            .list_for_period(conn, period.id)
            .await?;
        Ok(PayPeriodDetails { period, categories })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_utils::{bi_weekly, date, setup, spec, user};
    use crate::domain::ErrorKind;
    use rust_decimal_macros::dec;
    use shared::PayFrequency;

    #[tokio::test]
    async fn test_create_derives_end_date_and_categories() {
        let services = setup().await;
        let alice = user(&services, "alice@example.com").await;

        let details = services
            .periods
            .create_period(
                &alice,
                bi_weekly(
                    date(2024, 1, 1),
                    dec!(2000),
                    vec![spec("Groceries", dec!(500)), spec("Rent", dec!(1200))],
                ),
            )
            .await
            .unwrap();

        assert_eq!(details.period.end_date, date(2024, 1, 14));
        assert_eq!(details.period.status, PayPeriodStatus::Active);
        assert_eq!(details.period.total_income, dec!(2000));
        assert_eq!(details.categories.len(), 2);
        assert_eq!(details.categories[0].remaining_amount, dec!(500));
    }

    #[tokio::test]
    async fn test_monthly_period_in_december_ends_on_new_years_eve() {
        let services = setup().await;
        let alice = user(&services, "alice@example.com").await;

        let details = services
            .periods
            .create_period(
                &alice,
                CreatePeriodCommand {
                    start_date: date(2024, 12, 1),
                    frequency: PayFrequency::Monthly,
                    total_income: dec!(3000),
                    categories: vec![],
                },
            )
            .await
            .unwrap();

        assert_eq!(details.period.end_date, date(2024, 12, 31));
    }

    #[tokio::test]
    async fn test_overlapping_active_period_is_rejected() {
        let services = setup().await;
        let alice = user(&services, "alice@example.com").await;

        services
            .periods
            .create_period(&alice, bi_weekly(date(2024, 1, 1), dec!(2000), vec![]))
            .await
            .unwrap();

        let err = services
            .periods
            .create_period(&alice, bi_weekly(date(2024, 1, 8), dec!(2000), vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        // Adjacent period starting the day after is fine
        services
            .periods
            .create_period(&alice, bi_weekly(date(2024, 1, 15), dec!(2000), vec![]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_overlap_is_checked_per_user() {
        let services = setup().await;
        let alice = user(&services, "alice@example.com").await;
        let bob = user(&services, "bob@example.com").await;

        services
            .periods
            .create_period(&alice, bi_weekly(date(2024, 1, 1), dec!(2000), vec![]))
            .await
            .unwrap();
        services
            .periods
            .create_period(&bob, bi_weekly(date(2024, 1, 8), dec!(2000), vec![]))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_completed_period_does_not_block_and_cannot_be_reactivated_over_another() {
        let services = setup().await;
        let alice = user(&services, "alice@example.com").await;

        let first = services
            .periods
            .create_period(&alice, bi_weekly(date(2024, 1, 1), dec!(2000), vec![]))
            .await
            .unwrap();
        services
            .periods
            .update_period(
                &alice,
                first.period.id,
                UpdatePeriodCommand {
                    status: Some(PayPeriodStatus::Completed),
                    total_income: None,
                },
            )
            .await
            .unwrap();

        services
            .periods
            .create_period(&alice, bi_weekly(date(2024, 1, 8), dec!(2000), vec![]))
            .await
            .unwrap();

        let err = services
            .periods
            .update_period(
                &alice,
                first.period.id,
                UpdatePeriodCommand {
                    status: Some(PayPeriodStatus::Active),
                    total_income: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::PeriodOverlap { .. }));
    }

    #[tokio::test]
    async fn test_initial_categories_over_income_are_rejected() {
        let services = setup().await;
        let alice = user(&services, "alice@example.com").await;

        let err = services
            .periods
            .create_period(
                &alice,
                bi_weekly(date(2024, 1, 1), dec!(1000), vec![spec("Rent", dec!(1000.01))]),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OverAllocation);

        let periods = services
            .periods
            .list_periods(&alice, PeriodListQuery::default())
            .await
            .unwrap();
        assert!(periods.is_empty());
    }

    #[tokio::test]
    async fn test_income_cannot_drop_below_allocations() {
        let services = setup().await;
        let alice = user(&services, "alice@example.com").await;
        let details = services
            .periods
            .create_period(
                &alice,
                bi_weekly(date(2024, 1, 1), dec!(2000), vec![spec("Rent", dec!(1200))]),
            )
            .await
            .unwrap();

        let err = services
            .periods
            .update_period(
                &alice,
                details.period.id,
                UpdatePeriodCommand {
                    status: None,
                    total_income: Some(dec!(1199.99)),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OverAllocation);

        let updated = services
            .periods
            .update_period(
                &alice,
                details.period.id,
                UpdatePeriodCommand {
                    status: None,
                    total_income: Some(dec!(1200)),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.period.total_income, dec!(1200));
        assert_eq!(updated.period.status, PayPeriodStatus::Active);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_filters_status() {
        let services = setup().await;
        let alice = user(&services, "alice@example.com").await;

        let january = services
            .periods
            .create_period(&alice, bi_weekly(date(2024, 1, 1), dec!(2000), vec![]))
            .await
            .unwrap();
        services
            .periods
            .create_period(&alice, bi_weekly(date(2024, 1, 15), dec!(2000), vec![]))
            .await
            .unwrap();
        services
            .periods
            .update_period(
                &alice,
                january.period.id,
                UpdatePeriodCommand {
                    status: Some(PayPeriodStatus::Completed),
                    total_income: None,
                },
            )
            .await
            .unwrap();

        let all = services
            .periods
            .list_periods(&alice, PeriodListQuery::default())
            .await
            .unwrap();
        let starts: Vec<_> = all.iter().map(|d| d.period.start_date).collect();
        assert_eq!(starts, vec![date(2024, 1, 15), date(2024, 1, 1)]);

        let completed = services
            .periods
            .list_periods(
                &alice,
                PeriodListQuery {
                    status: Some(PayPeriodStatus::Completed),
                },
            )
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].period.id, january.period.id);

        let current = services.periods.current_period(&alice).await.unwrap();
        assert_eq!(current.period.start_date, date(2024, 1, 15));
    }

    #[tokio::test]
    async fn test_periods_are_private_to_their_owner() {
        let services = setup().await;
        let alice = user(&services, "alice@example.com").await;
        let mallory = user(&services, "mallory@example.com").await;
        let details = services
            .periods
            .create_period(&alice, bi_weekly(date(2024, 1, 1), dec!(2000), vec![]))
            .await
            .unwrap();

        let err = services
            .periods
            .get_period(&mallory, details.period.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = services
            .periods
            .update_period(&mallory, details.period.id, UpdatePeriodCommand::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        assert!(!services
            .periods
            .delete_period(&mallory, details.period.id)
            .await
            .unwrap());
        assert_eq!(
            services.periods.current_period(&mallory).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_delete_removes_categories_and_transactions() {
        let services = setup().await;
        let alice = user(&services, "alice@example.com").await;
        let details = services
            .periods
            .create_period(
                &alice,
                bi_weekly(date(2024, 1, 1), dec!(2000), vec![spec("Rent", dec!(1200))]),
            )
            .await
            .unwrap();
        let rent_id = details.categories[0].id;
        let spent = services
            .transactions
            .create_transaction(
                &alice,
                crate::domain::commands::transactions::CreateTransactionCommand {
                    budget_category_id: rent_id,
                    amount: dec!(600),
                    description: "Half of rent".to_string(),
                    transaction_date: None,
                    source: shared::TransactionSource::Manual,
                },
            )
            .await
            .unwrap();

        assert!(services
            .periods
            .delete_period(&alice, details.period.id)
            .await
            .unwrap());

        assert_eq!(
            services.periods.get_period(&alice, details.period.id).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            services.allocations.get_category(&alice, rent_id).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            services.transactions.get_transaction(&alice, spent.id).await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
