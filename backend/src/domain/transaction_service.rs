//! Transaction ledger.
//!
//! Every operation keeps `remaining = allocated - sum(live transaction amounts)`
//! for the affected category. The balance write and the transaction write
//! share one database transaction, and the balance write is a compare-and-swap
//! on the category's version so a concurrent writer can never be overwritten.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::TransactionSource;
use sqlx::SqliteConnection;
use tracing::{info, warn};

use super::commands::transactions::{
    CreateTransactionCommand, TransactionListQuery, UpdateTransactionCommand,
};
use super::errors::{LedgerError, LedgerResult};
use super::models::budget_category::BudgetCategory;
use super::models::transaction::{NewTransaction, Transaction};
use super::models::user::AuthenticatedUser;
use super::{money, validation};
use crate::storage::{CategoryRepository, DbConnection, TransactionRepository};

#[derive(Clone)]
pub struct TransactionService {
    db: DbConnection,
    category_repository: CategoryRepository,
    transaction_repository: TransactionRepository,
}

impl TransactionService {
    pub fn new(db: DbConnection) -> Self {
        Self {
            db,
            category_repository: CategoryRepository,
            transaction_repository: TransactionRepository,
        }
    }

    fn validate(command: CreateTransactionCommand) -> LedgerResult<NewTransaction> {
        Ok(NewTransaction {
            budget_category_id: command.budget_category_id,
            amount_cents: money::positive_cents("amount", command.amount)?,
            description: validation::description(&command.description)?,
            transaction_date: command.transaction_date.unwrap_or_else(Utc::now),
            source: command.source,
        })
    }

    /// Record an expense against a budget category.
    pub async fn create_transaction(
        &self,
        user: &AuthenticatedUser,
        command: CreateTransactionCommand,
    ) -> LedgerResult<Transaction> {
        let new_transaction = Self::validate(command)?;

        let mut tx = self.db.begin().await?;
        let transaction = self
            .record(&mut tx, user, &new_transaction, Utc::now())
            .await?;
        tx.commit().await?;

        info!(
            "Recorded transaction {} of {} against category {}",
            transaction.id, transaction.amount, transaction.budget_category_id
        );
        Ok(transaction)
    }

    /// Record a batch of transactions atomically.
    ///
    /// Items are applied in order, each seeing the balance effects of the ones
    /// before it. Every item is stored with source `api`. The first failure
    /// rolls back the whole batch and is reported with the item's index.
    pub async fn bulk_create_transactions(
        &self,
        user: &AuthenticatedUser,
        commands: Vec<CreateTransactionCommand>,
    ) -> LedgerResult<Vec<Transaction>> {
        let new_transactions = commands
            .into_iter()
            .enumerate()
            .map(|(index, mut command)| {
                command.source = TransactionSource::Api;
                Self::validate(command).map_err(|e| e.at_index(index))
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        let mut tx = self.db.begin().await?;
        let now = Utc::now();
        let mut recorded = Vec::with_capacity(new_transactions.len());
        for (index, new_transaction) in new_transactions.iter().enumerate() {
            let transaction = self
                .record(&mut tx, user, new_transaction, now)
                .await
                .map_err(|e| {
                    warn!("Bulk transaction batch failed at item {}: {}", index, e);
                    e.at_index(index)
                })?;
            recorded.push(transaction);
        }
        tx.commit().await?;

        info!("Recorded {} transactions in bulk", recorded.len());
        Ok(recorded)
    }

    /// Change the description and/or amount of a transaction.
    ///
    /// An amount change moves the category balance by the difference; an
    /// increase must fit in the current remaining balance.
    pub async fn update_transaction(
        &self,
        user: &AuthenticatedUser,
        transaction_id: i64,
        command: UpdateTransactionCommand,
    ) -> LedgerResult<Transaction> {
        let description = command
            .description
            .as_deref()
            .map(validation::description)
            .transpose()?;
        let amount_cents = command
            .amount
            .map(|amount| money::positive_cents("amount", amount))
            .transpose()?;

        let mut tx = self.db.begin().await?;
        let existing = self.require_transaction(&mut tx, user, transaction_id).await?;
        let now = Utc::now();

        if let Some(new_amount) = amount_cents.map(money::from_cents) {
            let delta = new_amount - existing.amount;
            if !delta.is_zero() {
                let category = self
                    .require_category_by_id(&mut tx, existing.budget_category_id)
                    .await?;
                if delta > category.remaining_amount {
                    warn!(
                        "Insufficient funds in category {} to raise transaction {} by {}",
                        category.id, existing.id, delta
                    );
                    return Err(LedgerError::InsufficientFunds {
                        available: category.remaining_amount,
                        requested: delta,
                    });
                }
                self.apply_balance(&mut tx, &category, category.remaining_amount - delta, now)
                    .await?;
            }
        }

        self.transaction_repository
            .update(&mut tx, existing.id, description.as_deref(), amount_cents, now)
            .await?;

        let updated = self.require_transaction(&mut tx, user, existing.id).await?;
        tx.commit().await?;

        info!("Updated transaction {}", updated.id);
        Ok(updated)
    }

    /// Delete a transaction, returning its amount to the category balance.
    ///
    /// Returns false when the transaction does not exist or belongs to someone
    /// else.
    pub async fn delete_transaction(
        &self,
        user: &AuthenticatedUser,
        transaction_id: i64,
    ) -> LedgerResult<bool> {
        let mut tx = self.db.begin().await?;

        let Some(existing) = self
            .transaction_repository
            .find_for_user(&mut tx, user.id, transaction_id)
            .await?
        else {
            return Ok(false);
        };

        let category = self
            .require_category_by_id(&mut tx, existing.budget_category_id)
            .await?;
        self.apply_balance(
            &mut tx,
            &category,
            category.remaining_amount + existing.amount,
            Utc::now(),
        )
        .await?;

        let deleted = self.transaction_repository.delete(&mut tx, existing.id).await?;
        tx.commit().await?;

        info!(
            "Deleted transaction {}, restored {} to category {}",
            existing.id, existing.amount, category.id
        );
        Ok(deleted)
    }

    pub async fn get_transaction(
        &self,
        user: &AuthenticatedUser,
        transaction_id: i64,
    ) -> LedgerResult<Transaction> {
        let mut conn = self.db.acquire().await?;
        self.require_transaction(&mut conn, user, transaction_id).await
    }

    /// List the user's transactions, newest first.
    pub async fn list_transactions(
        &self,
        user: &AuthenticatedUser,
        query: TransactionListQuery,
    ) -> LedgerResult<Vec<Transaction>> {
        let mut conn = self.db.acquire().await?;
        Ok(self
            .transaction_repository
            .list_for_user(&mut conn, user.id, &query)
            .await?)
    }

    /// Charge one validated transaction inside the caller's unit of work.
    async fn record(
        &self,
        conn: &mut SqliteConnection,
        user: &AuthenticatedUser,
        new_transaction: &NewTransaction,
        now: DateTime<Utc>,
    ) -> LedgerResult<Transaction> {
        let category = self
            .category_repository
            .find_for_user(conn, user.id, new_transaction.budget_category_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("budget category"))?;

        let amount = money::from_cents(new_transaction.amount_cents);
        if category.remaining_amount < amount {
            warn!(
                "Insufficient funds in category {}: {} available, {} requested",
                category.id, category.remaining_amount, amount
            );
            return Err(LedgerError::InsufficientFunds {
                available: category.remaining_amount,
                requested: amount,
            });
        }

        self.apply_balance(conn, &category, category.remaining_amount - amount, now)
            .await?;

        let id = self
            .transaction_repository
            .insert(conn, category.pay_period_id, new_transaction, now)
            .await?;

        self.require_transaction(conn, user, id).await
    }

    /// Write a new remaining balance, failing if the category changed since
    /// it was read.
    async fn apply_balance(
        &self,
        conn: &mut SqliteConnection,
        category: &BudgetCategory,
        remaining: Decimal,
        now: DateTime<Utc>,
    ) -> LedgerResult<()> {
        let remaining_cents = money::checked_cents("remaining_amount", remaining)?;
        let swapped = self
            .category_repository
            .compare_and_set_remaining(conn, category.id, category.version, remaining_cents, now)
            .await?;

        if !swapped {
            warn!("Stale balance for category {}", category.id);
            return Err(LedgerError::StaleBalance {
                category_id: category.id,
            });
        }
        Ok(())
    }

    async fn require_transaction(
        &self,
        conn: &mut SqliteConnection,
        user: &AuthenticatedUser,
        transaction_id: i64,
    ) -> LedgerResult<Transaction> {
        self.transaction_repository
            .find_for_user(conn, user.id, transaction_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("transaction"))
    }

    async fn require_category_by_id(
        &self,
        conn: &mut SqliteConnection,
        category_id: i64,
    ) -> LedgerResult<BudgetCategory> {
        self.category_repository
            .find_by_id(conn, category_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("budget category"))
    }
}
