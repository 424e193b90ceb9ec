//! The closed set of numeric values money can be combined with.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use rust_decimal::Decimal;

use super::money::{BASE, Money, pow10};
use crate::error::MoneyError;

/// A decimal floating-point value split into its parts.
///
/// The represented value is `sign × 0.digits × base^exponent`, so `400` is
/// `(1, 4, 10, 3)` and `0.004` is `(1, 4, 10, -2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecomposedDecimal {
    sign: i8,
    digits: BigInt,
    base: u32,
    exponent: i64,
}

impl DecomposedDecimal {
    /// Builds a decomposition from its parts.
    ///
    /// `digits` is taken by absolute value; a zero `sign` or zero `digits`
    /// yields zero.
    pub fn new(sign: i8, digits: BigInt, exponent: i64) -> Self {
        let digits = digits.abs();
        if sign == 0 || digits.is_zero() {
            return Self {
                sign: 0,
                digits: BigInt::zero(),
                base: BASE,
                exponent: 0,
            };
        }
        Self {
            sign: sign.signum(),
            digits,
            base: BASE,
            exponent,
        }
    }

    pub fn sign(&self) -> i8 {
        self.sign
    }

    pub fn digits(&self) -> &BigInt {
        &self.digits
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    pub fn is_zero(&self) -> bool {
        self.sign == 0
    }

    /// Returns the `(value, scale)` pair with `value × 10^-scale` equal to
    /// this decimal.
    ///
    /// Fails with `InvalidArgument` when the exponent puts the shift or the
    /// scale outside `u32`.
    pub fn effective(&self) -> Result<(BigInt, u32), MoneyError> {
        if self.is_zero() {
            return Ok((BigInt::zero(), 0));
        }
        let out_of_range =
            || MoneyError::InvalidArgument(format!("decimal exponent {} out of range", self.exponent));

        let length = i64::try_from(self.digits.to_string().len()).map_err(|_| out_of_range())?;
        let shift = self.exponent.checked_sub(length).ok_or_else(out_of_range)?;
        let places = u32::try_from(shift.unsigned_abs()).map_err(|_| out_of_range())?;

        let value = &self.digits * BigInt::from(self.sign);
        if shift > 0 {
            Ok((value * pow10(places), 0))
        } else {
            Ok((value, places))
        }
    }
}

impl From<Decimal> for DecomposedDecimal {
    fn from(decimal: Decimal) -> Self {
        let decimal = decimal.normalize();
        let mantissa = BigInt::from(decimal.mantissa());
        if mantissa.is_zero() {
            return Self::new(0, BigInt::zero(), 0);
        }
        let sign = if mantissa.is_negative() { -1 } else { 1 };
        let mut digits = mantissa.abs();
        let mut trailing: i64 = 0;
        let ten = BigInt::from(BASE);
        while (&digits % &ten).is_zero() {
            digits /= &ten;
            trailing += 1;
        }
        let length = digits.to_string().len() as i64;
        let exponent = length + trailing - i64::from(decimal.scale());
        Self::new(sign, digits, exponent)
    }
}

/// A value that money can be added to, multiplied, divided or converted by.
///
/// Every variant has an exact value; combining dispatches over this closed
/// set rather than through open-ended conversion.
#[derive(Debug, Clone)]
pub enum Operand {
    Integer(BigInt),
    Rational(BigRational),
    Decimal(DecomposedDecimal),
    Money(Money),
}

impl Operand {
    /// Returns true for a zero of any variant.
    pub fn is_zero(&self) -> bool {
        match self {
            Operand::Integer(i) => i.is_zero(),
            Operand::Rational(r) => r.is_zero(),
            Operand::Decimal(d) => d.is_zero(),
            Operand::Money(m) => m.is_zero(),
        }
    }

    /// Short name of the variant for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Operand::Integer(_) => "integer",
            Operand::Rational(_) => "rational",
            Operand::Decimal(_) => "decimal",
            Operand::Money(_) => "money",
        }
    }
}

macro_rules! impl_integer_operand {
    ($($int:ty),* $(,)?) => {
        $(
            impl From<$int> for Operand {
                fn from(value: $int) -> Self {
                    Operand::Integer(BigInt::from(value))
                }
            }
        )*
    };
}

impl_integer_operand!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl From<BigInt> for Operand {
    fn from(value: BigInt) -> Self {
        Operand::Integer(value)
    }
}

impl From<&BigInt> for Operand {
    fn from(value: &BigInt) -> Self {
        Operand::Integer(value.clone())
    }
}

impl From<BigRational> for Operand {
    fn from(value: BigRational) -> Self {
        if value.denom().is_one() {
            Operand::Integer(value.to_integer())
        } else {
            Operand::Rational(value)
        }
    }
}

impl From<Decimal> for Operand {
    fn from(value: Decimal) -> Self {
        Operand::Decimal(DecomposedDecimal::from(value))
    }
}

impl From<DecomposedDecimal> for Operand {
    fn from(value: DecomposedDecimal) -> Self {
        Operand::Decimal(value)
    }
}

impl From<Money> for Operand {
    fn from(value: Money) -> Self {
        Operand::Money(value)
    }
}

impl From<&Money> for Operand {
    fn from(value: &Money) -> Self {
        Operand::Money(value.clone())
    }
}
