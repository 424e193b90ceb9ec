//! Registries shared by the parser and the formatter.

use crate::domain::{Currency, Money};
use crate::error::MoneyError;
use crate::format::{FormatOptions, FormatRegistry};
use crate::parser::Parser;
use crate::symbols::SymbolTable;

/// Symbol table, format presets and default currency.
///
/// Built explicitly and passed by reference; nothing here is global, so
/// independent configurations can coexist.
#[derive(Debug, Clone, Default)]
pub struct MoniesConfig {
    pub symbols: SymbolTable,
    pub formats: FormatRegistry,
    /// Currency assigned to parsed input that names none.
    pub default_currency: Option<Currency>,
}

impl MoniesConfig {
    /// Seeded registries with no default currency.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_currency(mut self, code: &str) -> Result<Self, MoneyError> {
        self.default_currency = Some(Currency::new(code)?);
        Ok(self)
    }

    /// Formats `value` with the preset called `name`.
    ///
    /// # Errors
    /// - `InvalidArgument` for an unknown preset or conflicting options
    /// - `NotFound` when a symbol is requested for a currency without one
    pub fn format(
        &self,
        value: &Money,
        name: &str,
        options: FormatOptions,
    ) -> Result<String, MoneyError> {
        self.formats.get(name)?.render(value, &self.symbols, options)
    }

    /// Parses free text; see [`Parser::parse`].
    pub fn parse(&self, text: &str) -> Result<Money, MoneyError> {
        Parser::new(self).parse(text)
    }
}
