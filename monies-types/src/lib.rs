//! # Monies Types
//!
//! Exact-decimal money: an arbitrary-precision, currency-tagged fixed-point
//! value with arithmetic, rounding, parsing and formatting. This crate has
//! no IO dependencies; persistence adapters live in `monies-repo` and
//! implement the port traits defined here.
//!
//! ## Layout
//!
//! - `domain/` - the money value, operands, rounding modes, stored records
//! - `digits` - plain digit-string codec
//! - `symbols`, `format`, `parser` - presentation and free-text input
//! - `config` - the registries the parser and formatter read
//! - `ports/` - trait definitions that adapters must implement
//! - `error` - error types

pub mod config;
pub mod digits;
pub mod domain;
pub mod error;
pub mod format;
pub mod parser;
pub mod ports;
pub mod symbols;

// Re-export commonly used types
pub use config::MoniesConfig;
pub use digits::DumpOptions;
pub use domain::{
    Comparison, Currency, DEFAULT_DIVISION_DIGITS, DecomposedDecimal, Money, MoneyRecord,
    Operand, RecordId, RoundingMode,
};
pub use error::{MoneyError, RepoError};
pub use format::{Format, FormatOptions, FormatRegistry};
pub use parser::Parser;
pub use ports::MoneyRepository;
pub use symbols::SymbolTable;
