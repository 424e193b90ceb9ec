//! Database row types.

use sqlx::FromRow;

use monies_types::{MoneyRecord, RecordId, RepoError};

use crate::column::MoneyColumn;

/// Money record row from database.
#[derive(FromRow)]
pub struct DbMoneyRecord {
    pub id: String,
    pub label: String,
    pub amount: String,
    pub amount_currency: Option<String>,
}

impl DbMoneyRecord {
    pub fn into_domain(self, column: &MoneyColumn) -> Result<MoneyRecord, RepoError> {
        let uuid = uuid::Uuid::parse_str(&self.id).map_err(|e| RepoError::Database(e.to_string()))?;

        let raw = column.raw_from_text(&self.amount)?;
        let amount = column.deserialize(&raw, self.amount_currency.as_deref())?;

        Ok(MoneyRecord {
            id: RecordId::from_uuid(uuid),
            label: self.label,
            amount,
        })
    }
}
