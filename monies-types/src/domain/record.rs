//! Persisted money records.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Money;

/// Unique identifier for a stored money value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Creates a new random RecordId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a RecordId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A labelled amount as stored by a [`MoneyRepository`].
///
/// [`MoneyRepository`]: crate::ports::MoneyRepository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyRecord {
    pub id: RecordId,
    pub label: String,
    pub amount: Money,
}

/// Comparison operator of a money query predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    /// The SQL operator.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_round_trip() {
        let id = RecordId::new();
        let parsed: RecordId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_record_serde() {
        let record = MoneyRecord {
            id: RecordId::new(),
            label: "rent".into(),
            amount: Money::new(120000, 2, "GBP").unwrap(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["amount"], "1200.00 GBP");
        let back: MoneyRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
