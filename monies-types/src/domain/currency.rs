//! Currency code attached to every money value.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::error::MoneyError;

/// An opaque, case-sensitive currency code such as `GBP`.
///
/// The only validation is that the code is non-empty; callers are trusted to
/// supply real ISO codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Creates a currency code, rejecting the empty string.
    pub fn new(code: impl Into<String>) -> Result<Self, MoneyError> {
        let code = code.into();
        if code.is_empty() {
            return Err(MoneyError::InvalidArgument(
                "currency code cannot be empty".into(),
            ));
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Currency {
    type Error = MoneyError;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl TryFrom<&str> for Currency {
    type Error = MoneyError;

    fn try_from(code: &str) -> Result<Self, Self::Error> {
        Self::new(code)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl AsRef<str> for Currency {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Currency {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Currency {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Currency {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_currency_fails() {
        assert!(matches!(
            Currency::new(""),
            Err(MoneyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_currency_is_case_sensitive() {
        let upper = Currency::new("GBP").unwrap();
        let lower = Currency::new("gbp").unwrap();
        assert_ne!(upper, lower);
        assert_eq!(upper, "GBP");
    }

    #[test]
    fn test_currency_serde_rejects_empty() {
        let ok: Currency = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(ok.as_str(), "EUR");
        assert!(serde_json::from_str::<Currency>("\"\"").is_err());
    }
}
