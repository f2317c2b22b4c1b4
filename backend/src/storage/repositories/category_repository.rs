use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::domain::models::budget_category::{BudgetCategory, NewBudgetCategory};
use crate::domain::money;

/// Repository for budget categories and their balances
#[derive(Clone, Default)]
pub struct CategoryRepository;

impl CategoryRepository {
    /// Insert a category whose remaining balance starts at its allocation
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        pay_period_id: i64,
        category: &NewBudgetCategory,
        now: DateTime<Utc>,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO budget_categories
                (pay_period_id, name, allocated_cents, remaining_cents, version, created_at, updated_at)
            VALUES (?, ?, ?, ?, 0, ?, ?)
            "#,
        )
        .bind(pay_period_id)
        .bind(&category.name)
        .bind(category.allocated_cents)
        .bind(category.allocated_cents)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_id(
        &self,
        conn: &mut SqliteConnection,
        category_id: i64,
    ) -> Result<Option<BudgetCategory>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, pay_period_id, name, allocated_cents, remaining_cents, version, created_at, updated_at
            FROM budget_categories
            WHERE id = ?
            "#,
        )
        .bind(category_id)
        .fetch_optional(&mut *conn)
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// Find a category whose period belongs to `user_id`
    pub async fn find_for_user(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        category_id: i64,
    ) -> Result<Option<BudgetCategory>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT c.id, c.pay_period_id, c.name, c.allocated_cents, c.remaining_cents,
                   c.version, c.created_at, c.updated_at
            FROM budget_categories c
            JOIN pay_periods p ON p.id = c.pay_period_id
            WHERE c.id = ? AND p.user_id = ?
            "#,
        )
        .bind(category_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    pub async fn list_for_period(
        &self,
        conn: &mut SqliteConnection,
        pay_period_id: i64,
    ) -> Result<Vec<BudgetCategory>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, pay_period_id, name, allocated_cents, remaining_cents, version, created_at, updated_at
            FROM budget_categories
            WHERE pay_period_id = ?
            ORDER BY id
            "#,
        )
        .bind(pay_period_id)
        .fetch_all(&mut *conn)
        .await?;

        rows.iter().map(Self::map_row).collect()
    }

    /// Sum of allocations in a period, in cents
    pub async fn allocated_total_cents(
        &self,
        conn: &mut SqliteConnection,
        pay_period_id: i64,
    ) -> Result<i64, sqlx::Error> {
        let row = sqlx::query(
            "SELECT COALESCE(SUM(allocated_cents), 0) AS total FROM budget_categories WHERE pay_period_id = ?",
        )
        .bind(pay_period_id)
        .fetch_one(&mut *conn)
        .await?;

        row.try_get("total")
    }

    pub async fn delete_for_period(
        &self,
        conn: &mut SqliteConnection,
        pay_period_id: i64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM budget_categories WHERE pay_period_id = ?")
            .bind(pay_period_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Store a new remaining balance if the row still carries
    /// `expected_version`. Returns false when another writer got there first.
    pub async fn compare_and_set_remaining(
        &self,
        conn: &mut SqliteConnection,
        category_id: i64,
        expected_version: i64,
        remaining_cents: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE budget_categories
            SET remaining_cents = ?, version = version + 1, updated_at = ?
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(remaining_cents)
        .bind(now)
        .bind(category_id)
        .bind(expected_version)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub(crate) fn map_row(row: &SqliteRow) -> Result<BudgetCategory, sqlx::Error> {
        Ok(BudgetCategory {
            id: row.try_get("id")?,
            pay_period_id: row.try_get("pay_period_id")?,
            name: row.try_get("name")?,
            allocated_amount: money::from_cents(row.try_get("allocated_cents")?),
            remaining_amount: money::from_cents(row.try_get("remaining_cents")?),
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
