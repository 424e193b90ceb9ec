//! Mapping between money values and persisted columns.
//!
//! A money column stores either text or an exact decimal. Its currency is
//! either embedded in the text (unbound), fixed for the whole column, or read
//! from a sibling column of the same row.

use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use monies_types::digits::{self, DumpOptions};
use monies_types::{Comparison, Currency, Money, MoneyError};

use crate::predicate::Predicate;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A[A-Za-z_][A-Za-z0-9_]*\z").expect("valid identifier pattern"));

/// Storage type of the amount column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Decimal,
}

/// Where a column's currency comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrencyBinding {
    /// Stored with the amount as `"<digits> <currency>"`; text columns only.
    Unbound,
    /// Every row is in this currency.
    Fixed(Currency),
    /// Read from the named column of the same row.
    Column(String),
}

/// A serialized amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    Text(String),
    Decimal(Decimal),
}

impl ColumnValue {
    /// Textual form, as bound to databases without a native decimal type.
    pub fn to_text(&self) -> String {
        match self {
            ColumnValue::Text(text) => text.clone(),
            ColumnValue::Decimal(decimal) => decimal.to_string(),
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Text(text) => write!(f, "'{text}'"),
            ColumnValue::Decimal(decimal) => write!(f, "{decimal}"),
        }
    }
}

/// Serialization rules for one money column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyColumn {
    name: String,
    column_type: ColumnType,
    currency: CurrencyBinding,
}

impl MoneyColumn {
    /// Describes the column `name`.
    ///
    /// # Errors
    /// `InvalidArgument` when a name is not a plain SQL identifier, or for an
    /// unbound currency on a decimal column.
    pub fn new(
        name: &str,
        column_type: ColumnType,
        currency: CurrencyBinding,
    ) -> Result<Self, MoneyError> {
        validate_identifier(name)?;
        match &currency {
            CurrencyBinding::Unbound if column_type == ColumnType::Decimal => {
                return Err(MoneyError::InvalidArgument(format!(
                    "can't serialize money to decimal column {name} without currency"
                )));
            }
            CurrencyBinding::Column(sibling) => validate_identifier(sibling)?,
            _ => {}
        }
        Ok(Self {
            name: name.to_string(),
            column_type,
            currency,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn currency(&self) -> &CurrencyBinding {
        &self.currency
    }

    /// Name of the sibling currency column, if any.
    pub fn currency_column(&self) -> Option<&str> {
        match &self.currency {
            CurrencyBinding::Column(name) => Some(name),
            _ => None,
        }
    }

    /// Converts `value` into its stored form.
    ///
    /// The value is reduced first, so equal amounts always serialize to the
    /// same column value.
    pub fn serialize(&self, value: &Money) -> Result<ColumnValue, MoneyError> {
        let value = value.reduced();
        match &self.currency {
            CurrencyBinding::Unbound => return Ok(ColumnValue::Text(value.dump())),
            CurrencyBinding::Fixed(currency) if currency != value.currency() => {
                return Err(MoneyError::CurrencyMismatch {
                    expected: currency.clone(),
                    got: value.currency().clone(),
                });
            }
            _ => {}
        }
        match self.column_type {
            ColumnType::Text => Ok(ColumnValue::Text(digits::dump(
                &value,
                &DumpOptions::default(),
            ))),
            ColumnType::Decimal => Ok(ColumnValue::Decimal(value.to_decimal()?)),
        }
    }

    /// Rebuilds a value from its stored form.
    ///
    /// `sibling_currency` is the content of the sibling currency column and
    /// is only read for [`CurrencyBinding::Column`].
    pub fn deserialize(
        &self,
        raw: &ColumnValue,
        sibling_currency: Option<&str>,
    ) -> Result<Money, MoneyError> {
        let currency = match &self.currency {
            CurrencyBinding::Unbound => {
                return match raw {
                    ColumnValue::Text(text) => Money::load(text),
                    ColumnValue::Decimal(_) => Err(MoneyError::InvalidArgument(format!(
                        "column {} stores text, got a decimal",
                        self.name
                    ))),
                };
            }
            CurrencyBinding::Fixed(currency) => currency.clone(),
            CurrencyBinding::Column(sibling) => {
                let code = sibling_currency.ok_or_else(|| {
                    MoneyError::InvalidArgument(format!(
                        "can't deserialize column {} without a value for {sibling}",
                        self.name
                    ))
                })?;
                Currency::new(code)?
            }
        };

        match raw {
            ColumnValue::Text(text) => digits::load(text, currency.as_str()),
            ColumnValue::Decimal(decimal) => Ok(Money::from_decimal(*decimal, currency)),
        }
    }

    /// Reads a raw database value stored as text for this column's type.
    pub fn raw_from_text(&self, text: &str) -> Result<ColumnValue, MoneyError> {
        match self.column_type {
            ColumnType::Text => Ok(ColumnValue::Text(text.to_string())),
            ColumnType::Decimal => Decimal::from_str(text)
                .map(ColumnValue::Decimal)
                .map_err(|e| MoneyError::ParseError(format!("can't read {text:?} as decimal: {e}"))),
        }
    }

    /// Builds `<column> <op> ?`, adding `AND <currency column> = ?` for a
    /// sibling currency column.
    ///
    /// # Errors
    /// `CurrencyMismatch` when `value` is not in a fixed column currency.
    pub fn predicate(&self, op: Comparison, value: &Money) -> Result<Predicate, MoneyError> {
        let serialized = self.serialize(value)?;
        let mut predicate = Predicate::new(format!("{} {} ?", self.name, op.as_sql()), serialized);
        if let Some(sibling) = self.currency_column() {
            predicate = predicate.and(
                format!("{sibling} = ?"),
                ColumnValue::Text(value.currency().to_string()),
            );
        }
        Ok(predicate)
    }

    /// Restricts rows to the currency of `value` without comparing amounts.
    ///
    /// `None` when the column cannot express the restriction in SQL: an
    /// unbound column embeds the currency in the amount text, and a fixed
    /// column holds one currency only.
    pub fn currency_predicate(&self, value: &Money) -> Result<Option<Predicate>, MoneyError> {
        match &self.currency {
            CurrencyBinding::Unbound => Ok(None),
            CurrencyBinding::Fixed(currency) if currency != value.currency() => {
                Err(MoneyError::CurrencyMismatch {
                    expected: currency.clone(),
                    got: value.currency().clone(),
                })
            }
            CurrencyBinding::Fixed(_) => Ok(None),
            CurrencyBinding::Column(sibling) => Ok(Some(Predicate::new(
                format!("{sibling} = ?"),
                ColumnValue::Text(value.currency().to_string()),
            ))),
        }
    }
}

fn validate_identifier(name: &str) -> Result<(), MoneyError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(MoneyError::InvalidArgument(format!(
            "{name:?} is not a valid column name"
        )))
    }
}
