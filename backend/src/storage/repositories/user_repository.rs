use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::domain::models::user::User;

/// Repository for user identities
#[derive(Clone, Default)]
pub struct UserRepository;

impl UserRepository {
    pub async fn find_by_email(
        &self,
        conn: &mut SqliteConnection,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, email, display_name, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// Insert the user unless the email is already registered
    pub async fn insert_if_absent(
        &self,
        conn: &mut SqliteConnection,
        email: &str,
        display_name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, display_name, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(email)
        .bind(display_name)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    fn map_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            display_name: row.try_get("display_name")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
