//! Named presentation presets for money values.

use std::collections::HashMap;

use crate::digits::{self, DumpOptions};
use crate::domain::Money;
use crate::error::MoneyError;
use crate::symbols::SymbolTable;

/// Name of the preset used when none is given.
pub const DEFAULT_FORMAT: &str = "default";

/// A presentation preset: fixed fractional digits and separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub scale: u32,
    pub zero: String,
    pub separator: String,
    pub thousands_separator: Option<String>,
}

impl Format {
    /// `1,234.56`
    pub fn en() -> Self {
        Self {
            scale: 2,
            zero: "0.00".into(),
            separator: ".".into(),
            thousands_separator: Some(",".into()),
        }
    }

    /// `1.234,56`
    pub fn eu() -> Self {
        Self {
            scale: 2,
            zero: "0,00".into(),
            separator: ",".into(),
            thousands_separator: Some(".".into()),
        }
    }

    fn dump_options(&self) -> DumpOptions {
        DumpOptions {
            scale: Some(self.scale),
            zero: self.zero.clone(),
            separator: self.separator.clone(),
            thousands_separator: self.thousands_separator.clone(),
        }
    }

    /// Renders `value`, truncating to the preset's scale.
    ///
    /// # Errors
    /// - `InvalidArgument` when both `symbol` and `code` are requested
    /// - `NotFound` when the currency has no registered symbol
    pub fn render(
        &self,
        value: &Money,
        symbols: &SymbolTable,
        options: FormatOptions,
    ) -> Result<String, MoneyError> {
        if options.symbol && options.code {
            return Err(MoneyError::InvalidArgument(
                "can't format with both symbol and code options".into(),
            ));
        }

        let digits = digits::dump(value, &self.dump_options());

        if options.symbol {
            let symbol = symbols.reverse_lookup(value.currency().as_str())?;
            Ok(format!("{symbol}{digits}"))
        } else if options.code {
            Ok(format!("{digits} {}", value.currency()))
        } else {
            Ok(digits)
        }
    }
}

/// Decorations added around the formatted digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Prefix the currency symbol.
    pub symbol: bool,
    /// Append the currency code.
    pub code: bool,
}

/// Presets by name.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: HashMap<String, Format>,
}

impl FormatRegistry {
    /// Creates a registry without any preset.
    pub fn empty() -> Self {
        Self {
            formats: HashMap::new(),
        }
    }

    /// Adds or replaces the preset called `name`.
    pub fn register(&mut self, name: impl Into<String>, format: Format) {
        let name = name.into();
        tracing::debug!(name = %name, "Registered format");
        self.formats.insert(name, format);
    }

    pub fn get(&self, name: &str) -> Result<&Format, MoneyError> {
        self.formats
            .get(name)
            .ok_or_else(|| MoneyError::InvalidArgument(format!("unknown format: {name:?}")))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("en", Format::en());
        registry.register(DEFAULT_FORMAT, Format::en());
        registry.register("eu", Format::eu());
        registry
    }
}
