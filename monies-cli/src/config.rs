//! Configuration loading from environment.

use std::env;

use monies_types::MoniesConfig;
use monies_types::format::DEFAULT_FORMAT;

const DEFAULT_DATABASE_URL: &str = "sqlite://monies.db?mode=rwc";

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Currency for input that names none (`MONIES_CURRENCY`).
    pub default_currency: Option<String>,
    /// Format preset used by `format` (`MONIES_FORMAT`).
    pub format: String,
    pub database_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let default_currency = lookup("MONIES_CURRENCY").filter(|code| !code.trim().is_empty());

        let format = lookup("MONIES_FORMAT").unwrap_or_else(|| DEFAULT_FORMAT.to_string());

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let config = Self {
            default_currency,
            format,
            database_url,
        };
        // fail at startup rather than on first use
        config.monies()?.formats.get(&config.format)?;
        Ok(config)
    }

    /// Builds the parser and formatter registries.
    pub fn monies(&self) -> anyhow::Result<MoniesConfig> {
        let mut monies = MoniesConfig::new();
        if let Some(code) = &self.default_currency {
            monies = monies.with_default_currency(code.trim())?;
        }
        Ok(monies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.default_currency, None);
        assert_eq!(config.format, "default");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("MONIES_CURRENCY", "EUR"),
            ("MONIES_FORMAT", "eu"),
            ("DATABASE_URL", "sqlite::memory:"),
        ])
        .unwrap();
        assert_eq!(config.default_currency.as_deref(), Some("EUR"));
        assert_eq!(config.format, "eu");

        let monies = config.monies().unwrap();
        assert_eq!(monies.parse("1,50").unwrap().to_string(), "1.50 EUR");
    }

    #[test]
    fn test_blank_currency_is_unset() {
        let config = load(&[("MONIES_CURRENCY", "  ")]).unwrap();
        assert_eq!(config.default_currency, None);
    }

    #[test]
    fn test_unknown_format_fails() {
        assert!(load(&[("MONIES_FORMAT", "klingon")]).is_err());
    }
}
