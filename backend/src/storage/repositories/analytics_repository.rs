//! Aggregation queries; nothing here writes.

use sqlx::{Row, SqliteConnection};

use super::category_repository::CategoryRepository;
use crate::domain::models::analytics::{CategoryRanking, CategorySpending, PeriodTrendPoint};
use crate::domain::money;

/// Totals across every pay period of a user, in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserTotals {
    pub period_count: i64,
    pub income_cents: i64,
    pub spent_cents: i64,
}

#[derive(Clone, Default)]
pub struct AnalyticsRepository;

impl AnalyticsRepository {
    /// Per-category spend of one period, summed from live transactions
    pub async fn category_spending(
        &self,
        conn: &mut SqliteConnection,
        pay_period_id: i64,
    ) -> Result<Vec<CategorySpending>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.pay_period_id, c.name, c.allocated_cents, c.remaining_cents,
                   c.version, c.created_at, c.updated_at,
                   COALESCE(SUM(t.amount_cents), 0) AS spent_cents,
                   COUNT(t.id) AS transaction_count
            FROM budget_categories c
            LEFT JOIN transactions t ON t.budget_category_id = c.id
            WHERE c.pay_period_id = ?
            GROUP BY c.id
            ORDER BY c.id
            "#,
        )
        .bind(pay_period_id)
        .fetch_all(&mut *conn)
        .await?;

        rows.iter()
            .map(|row| -> Result<CategorySpending, sqlx::Error> {
                Ok(CategorySpending {
                    category: CategoryRepository::map_row(row)?,
                    spent: money::from_cents(row.try_get("spent_cents")?),
                    transaction_count: row.try_get("transaction_count")?,
                })
            })
            .collect()
    }

    pub async fn user_totals(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<UserTotals, sqlx::Error> {
        let periods = sqlx::query(
            r#"
            SELECT COUNT(*) AS period_count,
                   COALESCE(SUM(total_income_cents), 0) AS income_cents
            FROM pay_periods
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        let spent = sqlx::query(
            r#"
            SELECT COALESCE(SUM(t.amount_cents), 0) AS spent_cents
            FROM transactions t
            JOIN pay_periods p ON p.id = t.pay_period_id
            WHERE p.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(UserTotals {
            period_count: periods.try_get("period_count")?,
            income_cents: periods.try_get("income_cents")?,
            spent_cents: spent.try_get("spent_cents")?,
        })
    }

    /// Categories grouped by name across all the user's periods, biggest
    /// spend first, ties broken alphabetically
    pub async fn top_categories(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
        limit: u32,
    ) -> Result<Vec<CategoryRanking>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT c.name AS name, SUM(t.amount_cents) AS spent_cents
            FROM transactions t
            JOIN budget_categories c ON c.id = t.budget_category_id
            JOIN pay_periods p ON p.id = c.pay_period_id
            WHERE p.user_id = ?
            GROUP BY c.name
            ORDER BY spent_cents DESC, c.name ASC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(&mut *conn)
        .await?;

        rows.iter()
            .map(|row| -> Result<CategoryRanking, sqlx::Error> {
                Ok(CategoryRanking {
                    name: row.try_get("name")?,
                    total_spent: money::from_cents(row.try_get("spent_cents")?),
                })
            })
            .collect()
    }

    /// One point per period in ascending start-date order
    pub async fn period_trend(
        &self,
        conn: &mut SqliteConnection,
        user_id: i64,
    ) -> Result<Vec<PeriodTrendPoint>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT p.id AS id, p.start_date AS start_date, p.end_date AS end_date,
                   p.total_income_cents AS total_income_cents,
                   COALESCE(SUM(t.amount_cents), 0) AS spent_cents
            FROM pay_periods p
            LEFT JOIN transactions t ON t.pay_period_id = p.id
            WHERE p.user_id = ?
            GROUP BY p.id
            ORDER BY p.start_date ASC, p.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        rows.iter()
            .map(|row| -> Result<PeriodTrendPoint, sqlx::Error> {
                Ok(PeriodTrendPoint {
                    pay_period_id: row.try_get("id")?,
                    start_date: row.try_get("start_date")?,
                    end_date: row.try_get("end_date")?,
                    total_income: money::from_cents(row.try_get("total_income_cents")?),
                    total_spent: money::from_cents(row.try_get("spent_cents")?),
                })
            })
            .collect()
    }
}
