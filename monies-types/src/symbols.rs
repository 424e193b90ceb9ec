//! Bidirectional currency symbol table.

use std::collections::HashMap;

use crate::domain::Currency;
use crate::error::MoneyError;

/// Symbols registered by [`SymbolTable::default`].
pub const DEFAULT_SYMBOLS: [(&str, &str); 13] = [
    ("$", "USD"),
    ("€", "EUR"),
    ("¥", "JPY"),
    ("£", "GBP"),
    ("A$", "AUD"),
    ("C$", "CAD"),
    ("CHF", "CHF"),
    ("元", "CNY"),
    ("HK$", "HKD"),
    ("NZ$", "NZD"),
    ("S$", "SGD"),
    ("₹", "INR"),
    ("MX$", "MXN"),
];

/// Maps currency symbols to codes and codes back to symbols.
///
/// Both directions stay consistent on every write; when several symbols map
/// to one code the most recently registered symbol wins the reverse lookup.
/// Remapping that symbol to another code hands the reverse lookup back to the
/// newest symbol still mapped to the old code.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    by_symbol: HashMap<String, Currency>,
    by_code: HashMap<Currency, String>,
    // oldest first
    registered: Vec<String>,
    // longest first, rebuilt on write
    symbol_matchers: Vec<String>,
    code_matchers: Vec<Currency>,
}

impl SymbolTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            by_symbol: HashMap::new(),
            by_code: HashMap::new(),
            registered: Vec::new(),
            symbol_matchers: Vec::new(),
            code_matchers: Vec::new(),
        }
    }

    /// Registers `symbol` for `code`, replacing any previous mapping of the
    /// symbol.
    pub fn register(&mut self, symbol: &str, code: &str) -> Result<(), MoneyError> {
        self.insert(symbol, code)?;
        self.rebuild_matchers();
        Ok(())
    }

    /// Registers every pair in order.
    pub fn extend<'a, I>(&mut self, pairs: I) -> Result<(), MoneyError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let result = pairs
            .into_iter()
            .try_for_each(|(symbol, code)| self.insert(symbol, code));
        self.rebuild_matchers();
        result
    }

    /// Returns the currency registered for `symbol`.
    pub fn lookup(&self, symbol: &str) -> Result<&Currency, MoneyError> {
        self.by_symbol
            .get(symbol)
            .ok_or_else(|| MoneyError::NotFound(format!("currency for symbol {symbol:?}")))
    }

    /// Returns the symbol registered for `code`.
    pub fn reverse_lookup(&self, code: &str) -> Result<&str, MoneyError> {
        self.by_code
            .get(code)
            .map(String::as_str)
            .ok_or_else(|| MoneyError::NotFound(format!("symbol for currency {code:?}")))
    }

    /// Longest registered symbol that prefixes `text`, with its currency.
    pub fn match_symbol(&self, text: &str) -> Option<(&str, &Currency)> {
        let symbol = self
            .symbol_matchers
            .iter()
            .find(|symbol| text.starts_with(symbol.as_str()))?;
        let currency = self.by_symbol.get(symbol)?;
        Some((symbol.as_str(), currency))
    }

    /// Longest registered currency code that prefixes `text`.
    pub fn match_code(&self, text: &str) -> Option<&Currency> {
        self.code_matchers
            .iter()
            .find(|code| text.starts_with(code.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    fn insert(&mut self, symbol: &str, code: &str) -> Result<(), MoneyError> {
        if symbol.is_empty() {
            return Err(MoneyError::InvalidArgument(
                "currency symbol cannot be empty".into(),
            ));
        }
        let currency = Currency::new(code)?;

        self.registered.retain(|s| s != symbol);
        self.registered.push(symbol.to_string());

        if let Some(previous) = self.by_symbol.insert(symbol.to_string(), currency.clone()) {
            if previous != currency
                && self.by_code.get(&previous).is_some_and(|s| s == symbol)
            {
                let fallback = self
                    .registered
                    .iter()
                    .rev()
                    .find(|s| self.by_symbol.get(s.as_str()) == Some(&previous))
                    .cloned();
                match fallback {
                    Some(fallback) => {
                        self.by_code.insert(previous, fallback);
                    }
                    None => {
                        self.by_code.remove(&previous);
                    }
                }
            }
        }
        self.by_code.insert(currency, symbol.to_string());

        tracing::debug!(symbol, code, "Registered currency symbol");
        Ok(())
    }

    fn rebuild_matchers(&mut self) {
        let mut symbols: Vec<String> = self.by_symbol.keys().cloned().collect();
        symbols.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut codes: Vec<Currency> = self.by_symbol.values().cloned().collect();
        codes.sort_by(|a, b| b.as_str().len().cmp(&a.as_str().len()).then_with(|| a.cmp(b)));
        codes.dedup();

        self.symbol_matchers = symbols;
        self.code_matchers = codes;
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        let mut table = Self::new();
        for (symbol, code) in DEFAULT_SYMBOLS {
            table
                .insert(symbol, code)
                .expect("default symbols are non-empty");
        }
        table.rebuild_matchers();
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let table = SymbolTable::default();
        assert_eq!(table.len(), 13);
        assert_eq!(table.lookup("£").unwrap(), "GBP");
        assert_eq!(table.lookup("HK$").unwrap(), "HKD");
        assert_eq!(table.reverse_lookup("EUR").unwrap(), "€");
        assert_eq!(table.reverse_lookup("CHF").unwrap(), "CHF");
    }

    #[test]
    fn test_missing_entries() {
        let table = SymbolTable::default();
        assert!(matches!(table.lookup("₽"), Err(MoneyError::NotFound(_))));
        assert!(matches!(
            table.reverse_lookup("XYZ"),
            Err(MoneyError::NotFound(_))
        ));
    }

    #[test]
    fn test_register_updates_both_directions() {
        let mut table = SymbolTable::new();
        table.register("₽", "RUB").unwrap();
        assert_eq!(table.lookup("₽").unwrap(), "RUB");
        assert_eq!(table.reverse_lookup("RUB").unwrap(), "₽");

        // remapping a symbol drops its stale inverse entry
        table.register("₽", "XYZ").unwrap();
        assert_eq!(table.lookup("₽").unwrap(), "XYZ");
        assert!(table.reverse_lookup("RUB").is_err());
        assert_eq!(table.reverse_lookup("XYZ").unwrap(), "₽");
    }

    #[test]
    fn test_remap_keeps_remaining_symbol_for_old_code() {
        let mut table = SymbolTable::new();
        table.register("R", "RUB").unwrap();
        table.register("₽", "RUB").unwrap();
        assert_eq!(table.reverse_lookup("RUB").unwrap(), "₽");

        table.register("₽", "XYZ").unwrap();
        assert_eq!(table.lookup("R").unwrap(), "RUB");
        assert_eq!(table.reverse_lookup("RUB").unwrap(), "R");
        assert_eq!(table.reverse_lookup("XYZ").unwrap(), "₽");
    }

    #[test]
    fn test_remap_prefers_newest_remaining_symbol() {
        let mut table = SymbolTable::new();
        table
            .extend([("a", "RUB"), ("b", "RUB"), ("c", "RUB")])
            .unwrap();
        table.register("c", "XYZ").unwrap();
        assert_eq!(table.reverse_lookup("RUB").unwrap(), "b");

        table.register("b", "XYZ").unwrap();
        assert_eq!(table.reverse_lookup("RUB").unwrap(), "a");
        assert_eq!(table.reverse_lookup("XYZ").unwrap(), "b");
    }

    #[test]
    fn test_last_write_wins_reverse_lookup() {
        let mut table = SymbolTable::new();
        table.extend([("US$", "USD"), ("$", "USD")]).unwrap();
        assert_eq!(table.reverse_lookup("USD").unwrap(), "$");
        assert_eq!(table.lookup("US$").unwrap(), "USD");
    }

    #[test]
    fn test_register_rejects_empty_input() {
        let mut table = SymbolTable::new();
        assert!(matches!(
            table.register("", "GBP"),
            Err(MoneyError::InvalidArgument(_))
        ));
        assert!(matches!(
            table.register("£", ""),
            Err(MoneyError::InvalidArgument(_))
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_longest_symbol_match() {
        let table = SymbolTable::default();
        let (symbol, currency) = table.match_symbol("HK$10").unwrap();
        assert_eq!(symbol, "HK$");
        assert_eq!(currency, "HKD");

        let (symbol, currency) = table.match_symbol("$10").unwrap();
        assert_eq!(symbol, "$");
        assert_eq!(currency, "USD");

        assert!(table.match_symbol("10 GBP").is_none());
    }

    #[test]
    fn test_code_match() {
        let table = SymbolTable::default();
        assert_eq!(table.match_code("GBP and more").unwrap(), "GBP");
        assert!(table.match_code("XYZ").is_none());

        let mut table = SymbolTable::new();
        table.extend([("x", "EU"), ("y", "EUR")]).unwrap();
        assert_eq!(table.match_code("EUR").unwrap(), "EUR");
    }
}
