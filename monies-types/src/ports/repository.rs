//! Repository port trait.

use crate::domain::{Comparison, Money, MoneyRecord, RecordId};
use crate::error::RepoError;

/// Storage of labelled money values.
///
/// Adapters decide the column layout; every stored amount must load back
/// equal to the amount that was inserted.
#[async_trait::async_trait]
pub trait MoneyRepository: Send + Sync + 'static {
    /// Stores `amount` under a new id.
    async fn insert(&self, label: &str, amount: &Money) -> Result<MoneyRecord, RepoError>;

    /// Gets a record by ID.
    async fn get(&self, id: RecordId) -> Result<Option<MoneyRecord>, RepoError>;

    /// Lists the records whose amount satisfies `amount <op> value`.
    async fn find(&self, op: Comparison, value: &Money) -> Result<Vec<MoneyRecord>, RepoError>;
}
