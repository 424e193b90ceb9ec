//! Free-text money parser.
//!
//! Reads inputs such as `1.99 GBP`, `£1.99` or `-€1.999,00` in a single
//! left-to-right pass. The decimal separator is sniffed from the whole input
//! before scanning: a comma followed by exactly two digits, or a comma that
//! comes after a period, makes the comma the decimal separator. The sniff is a
//! heuristic, so `123.456` always reads as a fraction.
//!
//! With a decimal comma the thousands separator is `.` or a thin space
//! (U+2009); a plain space never groups digits.

use num_bigint::BigInt;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::config::MoniesConfig;
use crate::domain::{Currency, Money};
use crate::error::MoneyError;

static COMMA_TWO_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\d{2}\b").expect("valid separator sniff pattern"));

const THIN_SPACE: char = '\u{2009}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Separators {
    decimal: char,
    thousands: &'static [char],
}

impl Separators {
    const POINT: Separators = Separators {
        decimal: '.',
        thousands: &[','],
    };

    const COMMA: Separators = Separators {
        decimal: ',',
        thousands: &['.', THIN_SPACE],
    };

    fn sniff(text: &str) -> Self {
        if COMMA_TWO_DIGITS.is_match(text) {
            return Self::COMMA;
        }
        match (text.find('.'), text.find(',')) {
            (Some(point), Some(comma)) if comma > point => Self::COMMA,
            _ => Self::POINT,
        }
    }
}

/// Cursor over the unconsumed input.
struct Scanner<'t> {
    rest: &'t str,
}

impl<'t> Scanner<'t> {
    fn eat_char(&mut self, accept: impl Fn(char) -> bool) -> Option<char> {
        let c = self.rest.chars().next().filter(|c| accept(*c))?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    fn eat_prefix(&mut self, prefix: &str) {
        self.rest = &self.rest[prefix.len()..];
    }

    fn digits(&mut self) -> Option<&'t str> {
        let len = self
            .rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(self.rest.len());
        if len == 0 {
            return None;
        }
        let (digits, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(digits)
    }

    /// Consumes `separator` only when digits follow it.
    fn separated_digits(&mut self, accept: impl Fn(char) -> bool) -> Option<&'t str> {
        let saved = self.rest;
        self.eat_char(accept)?;
        match self.digits() {
            Some(digits) => Some(digits),
            None => {
                self.rest = saved;
                None
            }
        }
    }
}

/// Parses free text into money using the registries of a [`MoniesConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    config: &'a MoniesConfig,
}

impl<'a> Parser<'a> {
    pub fn new(config: &'a MoniesConfig) -> Self {
        Self { config }
    }

    /// Parses `text`.
    ///
    /// The currency is the trailing code if present, else the code of a
    /// leading symbol, else the configured default currency. Input after the
    /// optional trailing code is ignored.
    ///
    /// # Errors
    /// `ParseError` when there are no integral digits or no currency can be
    /// determined.
    pub fn parse(&self, text: &str) -> Result<Money, MoneyError> {
        let separators = Separators::sniff(text);
        let symbols = &self.config.symbols;
        let mut scanner = Scanner { rest: text };

        let mut negative = scanner.eat_char(|c| c == '-').is_some();

        let mut symbol_currency: Option<&Currency> = None;
        if let Some((symbol, currency)) = symbols.match_symbol(scanner.rest) {
            scanner.eat_prefix(symbol);
            symbol_currency = Some(currency);
        }

        if !negative {
            negative = scanner.eat_char(|c| c == '-').is_some();
        }

        let Some(first) = scanner.digits() else {
            tracing::debug!(input = text, "No integral digits");
            return Err(MoneyError::ParseError(format!("can't parse {text:?}")));
        };
        let mut digits = first.to_string();
        while let Some(group) = scanner.separated_digits(|c| separators.thousands.contains(&c)) {
            digits.push_str(group);
        }

        let mut scale = 0;
        if let Some(fraction) = scanner.separated_digits(|c| c == separators.decimal) {
            digits.push_str(fraction);
            scale = fraction.len() as u32;
        }

        scanner.eat_char(char::is_whitespace);

        let code_currency = symbols.match_code(scanner.rest);

        let currency = code_currency
            .or(symbol_currency)
            .or(self.config.default_currency.as_ref())
            .ok_or_else(|| MoneyError::ParseError(format!("can't parse {text:?} without currency")))?;

        let magnitude = BigInt::from_str(&digits)
            .map_err(|e| MoneyError::ParseError(format!("can't parse {text:?}: {e}")))?;
        let value = Money::from_parts(magnitude, scale, currency.clone());

        tracing::trace!(input = text, decimal = %separators.decimal, "Parsed money");

        Ok(if negative { -value } else { value })
    }
}
