//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use monies_types::{
    Comparison, Money, MoneyRecord, MoneyRepository, RecordId, RepoError,
};

use crate::column::{ColumnType, CurrencyBinding, MoneyColumn};
use crate::predicate::Predicate;
use crate::types::DbMoneyRecord;

const SELECT_RECORDS: &str = "SELECT id, label, amount, amount_currency FROM money_records";

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
///
/// Amounts are stored as reduced digit text with the currency in the sibling
/// `amount_currency` column, so equal amounts are stored identically.
pub struct SqliteMoneyRepo {
    pool: SqlitePool,
    column: MoneyColumn,
}

impl SqliteMoneyRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // one connection: every connection to `sqlite::memory:` opens its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let repo = Self::with_pool(pool)?;
        repo.create_schema().await?;

        tracing::info!(database_url, "SQLite money repository ready");
        Ok(repo)
    }

    /// Wraps an existing pool without running migrations.
    pub fn with_pool(pool: SqlitePool) -> Result<Self, RepoError> {
        let column = MoneyColumn::new(
            "amount",
            ColumnType::Text,
            CurrencyBinding::Column("amount_currency".into()),
        )?;
        Ok(Self { pool, column })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the amount column description.
    pub fn column(&self) -> &MoneyColumn {
        &self.column
    }

    /// Creates the database schema (for testing with existing pool).
    pub async fn create_schema(&self) -> Result<(), RepoError> {
        let ddl = include_str!("../migrations/0001_create_money_records.sql");
        sqlx::query(ddl)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn select_where(&self, predicate: Option<&Predicate>) -> Result<Vec<MoneyRecord>, RepoError> {
        let sql = match predicate {
            Some(predicate) => format!("{SELECT_RECORDS} WHERE {} ORDER BY rowid", predicate.sql()),
            None => format!("{SELECT_RECORDS} ORDER BY rowid"),
        };
        tracing::debug!(
            predicate = %predicate.map(ToString::to_string).unwrap_or_default(),
            "Selecting money records"
        );

        let mut query = sqlx::query_as::<_, DbMoneyRecord>(&sql);
        for bind in predicate.map(Predicate::binds).unwrap_or_default() {
            query = query.bind(bind.to_text());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter()
            .map(|row| row.into_domain(&self.column))
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl MoneyRepository for SqliteMoneyRepo {
    async fn insert(&self, label: &str, amount: &Money) -> Result<MoneyRecord, RepoError> {
        let id = RecordId::new();
        let serialized = self.column.serialize(amount)?;

        sqlx::query(
            r#"INSERT INTO money_records (id, label, amount, amount_currency) VALUES (?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(label)
        .bind(serialized.to_text())
        .bind(amount.currency().as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(MoneyRecord {
            id,
            label: label.to_string(),
            amount: amount.clone(),
        })
    }

    async fn get(&self, id: RecordId) -> Result<Option<MoneyRecord>, RepoError> {
        let row: Option<DbMoneyRecord> = sqlx::query_as(&format!("{SELECT_RECORDS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(|row| row.into_domain(&self.column)).transpose()
    }

    async fn find(&self, op: Comparison, value: &Money) -> Result<Vec<MoneyRecord>, RepoError> {
        match op {
            // stored text is canonical, so equality can run in SQL
            Comparison::Eq | Comparison::Ne => {
                let predicate = self.column.predicate(op, value)?;
                self.select_where(Some(&predicate)).await
            }
            // text order is not numeric order
            _ => {
                let predicate = self.column.currency_predicate(value)?;
                let records = self.select_where(predicate.as_ref()).await?;
                let mut matched = Vec::with_capacity(records.len());
                for record in records {
                    if satisfies(op, record.amount.compare(value)?) {
                        matched.push(record);
                    }
                }
                Ok(matched)
            }
        }
    }
}

fn satisfies(op: Comparison, ordering: Option<std::cmp::Ordering>) -> bool {
    use std::cmp::Ordering::{Equal, Greater, Less};

    matches!(
        (op, ordering),
        (Comparison::Eq, Some(Equal))
            | (Comparison::Ne, Some(Less | Greater))
            | (Comparison::Lt, Some(Less))
            | (Comparison::Le, Some(Less | Equal))
            | (Comparison::Gt, Some(Greater))
            | (Comparison::Ge, Some(Greater | Equal))
    )
}
