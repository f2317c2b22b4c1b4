use chrono::{DateTime, NaiveDate, Utc};
use shared::{PayFrequency, PayPeriodStatus};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use super::decode_label;
use crate::domain::models::pay_period::PayPeriod;
use crate::domain::money;

const PERIOD_COLUMNS: &str = "id, user_id, start_date, end_date, frequency, \
     total_income_cents, status, created_at, updated_at";

/// Row values for a new pay period
#[derive(Debug, Clone)]
pub struct NewPayPeriodRow {
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub frequency: PayFrequency,
    pub total_income_cents: i64,
    pub now: DateTime<Utc>,
}

/// Repository for pay periods
#[derive(Clone, Default)]
pub struct PeriodRepository;

impl PeriodRepository {
    /// Insert an active pay period and return its id
    pub async fn insert(
        &self,
        conn: &mut SqliteConnection,
        period: &NewPayPeriodRow,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO pay_periods
                (user_id, start_date, end_date, frequency, total_income_cents, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(period.user_id)
        .bind(period.start_date)
        .bind(period.end_date)
        .bind(period.frequency.as_str())
        .bind(period.total_income_cents)
        .bind(PayPeriodStatus::Active.as_str())
        .bind(period.now)
        .bind(period.now)
        .execute(&mut *conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Find a period owned by `user_id`
    pub async fn find_for_user(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        period_id: i64,
    ) -> Result<Option<PayPeriod>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM pay_periods WHERE id = ? AND user_id = ?",
            PERIOD_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(period_id)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// List a user's periods, newest start date first
    pub async fn list_for_user(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        status: Option<PayPeriodStatus>,
    ) -> Result<Vec<PayPeriod>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM pay_periods \
             WHERE user_id = ? AND (? IS NULL OR status = ?) \
             ORDER BY start_date DESC, id DESC",
            PERIOD_COLUMNS
        );
        let status = status.map(|s| s.as_str());
        let rows = sqlx::query(&sql)
            .bind(user_id)
            .bind(status)
            .bind(status)
            .fetch_all(&mut *conn)
            .await?;

        rows.iter().map(Self::map_row).collect()
    }

    /// Most recent active period of a user
    pub async fn find_current(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<Option<PayPeriod>, sqlx::Error> {
        let sql = format!(
            "SELECT {} FROM pay_periods \
             WHERE user_id = ? AND status = 'active' \
             ORDER BY start_date DESC, id DESC LIMIT 1",
            PERIOD_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// Id of an active period of the user intersecting `[start, end]`,
    /// ignoring `exclude_id`
    pub async fn find_overlapping_active(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<i64>,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id FROM pay_periods
            WHERE user_id = ?
              AND status = 'active'
              AND start_date <= ?
              AND end_date >= ?
              AND (? IS NULL OR id != ?)
            ORDER BY start_date
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(end)
        .bind(start)
        .bind(exclude_id)
        .bind(exclude_id)
        .fetch_optional(&mut *conn)
        .await?;

        row.map(|r| r.try_get("id")).transpose()
    }

    /// Apply a partial update; `None` keeps the stored value
    pub async fn update(
        &self,
        conn: &mut SqliteConnection,
        period_id: i64,
        status: Option<PayPeriodStatus>,
        total_income_cents: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE pay_periods
            SET status = COALESCE(?, status),
                total_income_cents = COALESCE(?, total_income_cents),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .bind(total_income_cents)
        .bind(now)
        .bind(period_id)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Delete a period with its transactions and categories.
    ///
    /// Must run inside a transaction; returns false when nothing was deleted.
    pub async fn delete_cascade(
        &self,
        conn: &mut SqliteConnection,
        period_id: i64,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query("DELETE FROM transactions WHERE pay_period_id = ?")
            .bind(period_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query("DELETE FROM budget_categories WHERE pay_period_id = ?")
            .bind(period_id)
            .execute(&mut *conn)
            .await?;

        let result = sqlx::query("DELETE FROM pay_periods WHERE id = ?")
            .bind(period_id)
            .execute(&mut *conn)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    fn map_row(row: &SqliteRow) -> Result<PayPeriod, sqlx::Error> {
        Ok(PayPeriod {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            frequency: decode_label(row, "frequency")?,
            total_income: money::from_cents(row.try_get("total_income_cents")?),
            status: decode_label(row, "status")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
