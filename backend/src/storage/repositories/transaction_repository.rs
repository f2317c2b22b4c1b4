use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use super::decode_label;
use crate::domain::commands::transactions::TransactionListQuery;
use crate::domain::models::transaction::{NewTransaction, Transaction};
use crate::domain::money;

/// Repository for ledger transactions
#[derive(Clone, Default)]
pub struct TransactionRepository;

impl TransactionRepository {
    /// Store a transaction in the database and return its id
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        pay_period_id: i64,
        transaction: &NewTransaction,
        now: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions
                (pay_period_id, budget_category_id, amount_cents, description, transaction_date, source, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(pay_period_id)
        .bind(transaction.budget_category_id)
        .bind(transaction.amount_cents)
        .bind(&transaction.description)
        .bind(transaction.transaction_date)
        .bind(transaction.source.as_str())
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Find a transaction whose period belongs to `user_id`
    pub async fn find_for_user(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT t.id, t.pay_period_id, t.budget_category_id, t.amount_cents, t.description,
                   t.transaction_date, t.source, t.created_at, t.updated_at
            FROM transactions t
            JOIN pay_periods p ON p.id = t.pay_period_id
            WHERE t.id = ? AND p.user_id = ?
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// List a user's transactions, newest first, with optional filters
    pub async fn list_for_user(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        query: &TransactionListQuery,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.pay_period_id, t.budget_category_id, t.amount_cents, t.description,
                   t.transaction_date, t.source, t.created_at, t.updated_at
            FROM transactions t
            JOIN pay_periods p ON p.id = t.pay_period_id
            WHERE p.user_id = ?
              AND (? IS NULL OR t.pay_period_id = ?)
              AND (? IS NULL OR t.budget_category_id = ?)
            ORDER BY t.transaction_date DESC, t.id DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(user_id)
        .bind(query.pay_period_id)
        .bind(query.pay_period_id)
        .bind(query.category_id)
        .bind(query.category_id)
        .bind(i64::from(query.effective_limit()))
        .bind(i64::from(query.effective_offset()))
        .fetch_all(&mut *conn)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    /// Apply a partial update; `None` keeps the stored value
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        transaction_id: i64,
        description: Option<&str>,
        amount_cents: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE transactions
            SET description = COALESCE(?, description),
                amount_cents = COALESCE(?, amount_cents),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(description)
        .bind(amount_cents)
        .bind(now)
        .bind(transaction_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn delete(
        &self,
        conn: &mut SqliteConnection,
        transaction_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(transaction_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether any transaction is charged to a category of the period
    pub async fn exists_for_period(
        &self,
        conn: &mut SqliteConnection,
        pay_period_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let row = sqlx::query(
            "SELECT EXISTS (SELECT 1 FROM transactions WHERE pay_period_id = ?) AS present",
        )
        .bind(pay_period_id)
        .fetch_one(&mut *conn)
        .await?;

        let present: i64 = row.try_get("present")?;
        Ok(present != 0)
    }

    fn map_row(row: &SqliteRow) -> Result<Transaction, sqlx::Error> {
        Ok(Transaction {
            id: row.try_get("id")?,
            pay_period_id: row.try_get("pay_period_id")?,
            budget_category_id: row.try_get("budget_category_id")?,
            amount: money::from_cents(row.try_get("amount_cents")?),
            description: row.try_get("description")?,
            transaction_date: row.try_get("transaction_date")?,
            source: decode_label(row, "source")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
