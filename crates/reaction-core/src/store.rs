//! SQLite-backed sample store
//!
//! One pooled handle shared by every caller. Each operation is a single
//! statement that borrows a connection from the pool for its duration.

use std::collections::BTreeMap;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::{Error, Result};
use crate::stats::Welford;

/// Connection settings for the sample store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// sqlx connection string, e.g. `sqlite:reaction.db?mode=rwc`
    pub database_url: String,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:reaction.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampleStore {
    pool: SqlitePool,
}

impl SampleStore {
    /// Open (creating if needed) the database and run migrations
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        tracing::info!("Connecting to database: {}", config.database_url);

        let options = SqliteConnectOptions::from_str(&config.database_url)?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    /// Private in-memory database. Pinned to a single connection that never
    /// expires, since every new SQLite memory connection is a fresh database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS samples (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL REFERENCES users(user_id),
                value REAL NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        // Per-user aggregation is the hot path
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_samples_user_id ON samples(user_id)
            "#,
        )
        .execute(pool)
        .await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Insert the user if not already known. Duplicate ids are a no-op.
    pub async fn ensure_user(&self, user_id: &str) -> Result<()> {
        let result = sqlx::query("INSERT OR IGNORE INTO users (user_id) VALUES (?)")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            tracing::info!("Created user: {}", user_id);
        }
        Ok(())
    }

    pub async fn user_exists(&self, user_id: &str) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Append a sample for an existing user.
    ///
    /// The existence check and the insert are one statement, so a sample can
    /// never be written for a user that is not in the table.
    pub async fn record_sample(&self, user_id: &str, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::InvalidInput(format!(
                "value must be a finite number, got {}",
                value
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO samples (user_id, value)
            SELECT ?, ?
            WHERE EXISTS (SELECT 1 FROM users WHERE user_id = ?)
            "#,
        )
        .bind(user_id)
        .bind(value)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::Referential(user_id.to_string()));
        }

        tracing::debug!("Recorded sample for {}: {}", user_id, value);
        Ok(())
    }

    /// All sample values for one user
    pub async fn user_samples(&self, user_id: &str) -> Result<Vec<f64>> {
        let values: Vec<f64> =
            sqlx::query_scalar("SELECT value FROM samples WHERE user_id = ? ORDER BY id")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(values)
    }

    /// Mean sample value of every user with at least one sample.
    ///
    /// Averaged here rather than with SQL `AVG`, whose plain sum overflows
    /// for large finite values.
    pub async fn per_user_means(&self) -> Result<BTreeMap<String, f64>> {
        let rows: Vec<(String, f64)> = sqlx::query_as("SELECT user_id, value FROM samples")
            .fetch_all(&self.pool)
            .await?;

        let mut per_user: BTreeMap<String, Welford> = BTreeMap::new();
        for (user_id, value) in rows {
            per_user.entry(user_id).or_default().update(value);
        }
        Ok(per_user
            .into_iter()
            .map(|(user_id, acc)| (user_id, acc.mean()))
            .collect())
    }

    pub async fn user_count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    pub async fn sample_count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM samples")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
