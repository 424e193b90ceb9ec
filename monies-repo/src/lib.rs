//! # Monies Repository
//!
//! Persistence adapters for money values: column codecs that map a value to
//! text or decimal columns, query predicates over those columns, and a SQLite
//! implementation of the `MoneyRepository` port.

#[cfg(not(feature = "sqlite"))]
compile_error!("Enable a repo feature: `sqlite`.");

pub mod column;
pub mod predicate;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "sqlite")]
mod types;

#[cfg(feature = "sqlite")]
#[cfg(test)]
mod sqlite_tests;

pub use column::{ColumnType, ColumnValue, CurrencyBinding, MoneyColumn};
pub use predicate::Predicate;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteMoneyRepo;

/// Build and initialize a repository from a database URL.
///
/// Connects, creates the `money_records` table if missing and returns a
/// ready-to-use repository.
///
/// # Examples
///
/// ```ignore
/// let repo = build_repo("sqlite://monies.db?mode=rwc").await?;
/// ```
#[cfg(feature = "sqlite")]
pub async fn build_repo(database_url: &str) -> anyhow::Result<SqliteMoneyRepo> {
    SqliteMoneyRepo::new(database_url).await
}
