//! Domain models for exact-decimal money.

pub mod currency;
pub mod money;
pub mod operand;
pub mod record;
pub mod rounding;


pub use currency::Currency;
pub use money::{DEFAULT_DIVISION_DIGITS, Money};
pub use operand::{DecomposedDecimal, Operand};
pub use record::{Comparison, MoneyRecord, RecordId};
pub use rounding::RoundingMode;
