use anyhow::Result;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const MAX_READ_CONNECTIONS: u32 = 5;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const WRITE_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        display_name TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pay_periods (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users (id),
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        frequency TEXT NOT NULL CHECK (frequency IN ('weekly', 'bi_weekly', 'monthly')),
        total_income_cents INTEGER NOT NULL CHECK (total_income_cents >= 0),
        status TEXT NOT NULL CHECK (status IN ('active', 'completed')),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_pay_periods_user_status
    ON pay_periods (user_id, status, start_date)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS budget_categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        pay_period_id INTEGER NOT NULL REFERENCES pay_periods (id),
        name TEXT NOT NULL,
        allocated_cents INTEGER NOT NULL CHECK (allocated_cents >= 0),
        remaining_cents INTEGER NOT NULL,
        version INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_budget_categories_period
    ON budget_categories (pay_period_id)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        pay_period_id INTEGER NOT NULL REFERENCES pay_periods (id),
        budget_category_id INTEGER NOT NULL REFERENCES budget_categories (id),
        amount_cents INTEGER NOT NULL CHECK (amount_cents > 0),
        description TEXT NOT NULL,
        transaction_date TEXT NOT NULL,
        source TEXT NOT NULL CHECK (source IN ('manual', 'api')),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_transactions_category
    ON transactions (budget_category_id)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_transactions_period
    ON transactions (pay_period_id)
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_transactions_date
    ON transactions (transaction_date DESC)
    "#,
];

/// DbConnection manages the SQLite pools and schema.
///
/// Readers share a pool of WAL connections. Every write unit goes through a
/// separate single-connection pool, so writers queue on acquisition instead
/// of racing each other for the database write lock.
#[derive(Clone)]
pub struct DbConnection {
    pool: SqlitePool,
    writer: SqlitePool,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and ensure the schema exists
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .acquire_timeout(WRITE_ACQUIRE_TIMEOUT)
            .connect_with(options.clone())
            .await?;
        Self::setup_schema(&writer).await?;

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_READ_CONNECTIONS)
            .connect_with(options)
            .await?;

        info!("Database ready at {}", url);

        Ok(Self { pool, writer })
    }

    /// Private in-memory database, used by tests.
    ///
    /// Every pooled connection to `sqlite::memory:` would see its own empty
    /// database, so the pool is pinned to one connection that never expires
    /// and serves both readers and writers.
    pub async fn init_in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            writer: pool.clone(),
            pool,
        })
    }

    /// Get a reference to the read pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a write unit of work on the writer connection; it rolls back
    /// unless committed
    pub async fn begin(&self) -> Result<sqlx::Transaction<'static, Sqlite>, sqlx::Error> {
        self.writer.begin().await
    }

    /// Start a read-only unit of work; every query in it sees one snapshot
    pub async fn begin_read(&self) -> Result<sqlx::Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Borrow a connection for read-only work
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.pool.acquire().await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(*statement).execute(pool).await?;
        }
        Ok(())
    }
}
