//! Exact-decimal monetary value with embedded currency.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;
use std::str::FromStr;
use std::sync::Arc;

use super::currency::Currency;
use super::operand::{DecomposedDecimal, Operand};
use super::rounding::RoundingMode;
use crate::digits::{self, DumpOptions};
use crate::error::MoneyError;

/// Radix of the magnitude digits.
pub(crate) const BASE: u32 = 10;

/// Fractional digits produced by division when no limit is given.
pub const DEFAULT_DIVISION_DIGITS: u32 = 16;

pub(crate) fn pow10(exponent: u32) -> BigInt {
    BigInt::from(BASE).pow(exponent)
}

#[derive(Debug)]
struct Repr {
    magnitude: BigInt,
    scale: u32,
    currency: Currency,
}

/// An immutable amount of money: `magnitude × 10^-scale` in `currency`.
///
/// Values are cheap handles over shared storage. Operations that leave a
/// value unchanged (adding zero, rounding to at least the current scale, ...)
/// return the very same instance, which [`Money::ptr_eq`] can observe.
///
/// Equality is numeric: `1.0 GBP == 1.00 GBP`, and values in different
/// currencies are never equal or ordered.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Money(Arc<Repr>);

impl Money {
    /// Creates a new Money value.
    ///
    /// # Validation
    /// - Currency cannot be empty
    pub fn new(magnitude: impl Into<BigInt>, scale: u32, currency: &str) -> Result<Self, MoneyError> {
        let currency = Currency::new(currency)?;
        Ok(Self::from_parts(magnitude.into(), scale, currency))
    }

    /// Creates a Money value from already validated parts.
    pub fn from_parts(magnitude: BigInt, scale: u32, currency: Currency) -> Self {
        Self(Arc::new(Repr {
            magnitude,
            scale,
            currency,
        }))
    }

    /// Creates a zero-value Money for the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::from_parts(BigInt::zero(), 0, currency)
    }

    /// Creates a whole amount.
    pub fn from_integer(value: impl Into<BigInt>, currency: Currency) -> Self {
        Self::from_parts(value.into(), 0, currency)
    }

    /// Creates a value from an exact fraction by long division of the
    /// numerator by the denominator.
    pub fn from_rational(value: BigRational, currency: Currency) -> Result<Self, MoneyError> {
        let (numer, denom) = value.into_raw();
        Self::from_parts(numer, 0, currency).checked_div(denom)
    }

    /// Creates a value from a decimal floating-point number.
    pub fn from_decimal(value: Decimal, currency: Currency) -> Self {
        let value = value.normalize();
        Self::from_parts(BigInt::from(value.mantissa()), value.scale(), currency)
    }

    /// Creates a value from a decomposed decimal.
    pub fn from_decomposed(value: &DecomposedDecimal, currency: Currency) -> Result<Self, MoneyError> {
        let (magnitude, scale) = value.effective()?;
        Ok(Self::from_parts(magnitude, scale, currency))
    }

    /// Converts any operand into money. A money operand is returned as is,
    /// whatever its currency.
    pub fn from_operand(value: impl Into<Operand>, currency: Currency) -> Result<Self, MoneyError> {
        match value.into() {
            Operand::Money(money) => Ok(money),
            Operand::Integer(i) => Ok(Self::from_integer(i, currency)),
            Operand::Rational(r) => Self::from_rational(r, currency),
            Operand::Decimal(d) => Self::from_decomposed(&d, currency),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the digits of the value without the decimal point.
    pub fn magnitude(&self) -> &BigInt {
        &self.0.magnitude
    }

    /// Returns the number of implied fractional digits.
    pub fn scale(&self) -> u32 {
        self.0.scale
    }

    /// Returns the currency.
    pub fn currency(&self) -> &Currency {
        &self.0.currency
    }

    /// Returns true when both handles share the same storage.
    pub fn ptr_eq(a: &Money, b: &Money) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude().is_zero()
    }

    pub fn is_nonzero(&self) -> bool {
        !self.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.magnitude().is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.magnitude().is_positive()
    }

    /// Number of decimal digits in the magnitude, 0 for zero.
    pub fn precision(&self) -> usize {
        if self.is_zero() {
            return 0;
        }
        self.magnitude().abs().to_string().len()
    }

    /// Whole part of the value, truncated toward zero.
    pub fn to_integer(&self) -> BigInt {
        self.magnitude() / pow10(self.scale())
    }

    /// Exact value as a fraction.
    pub fn to_rational(&self) -> BigRational {
        BigRational::new(self.magnitude().clone(), pow10(self.scale()))
    }

    /// Value as a `rust_decimal::Decimal`.
    ///
    /// # Errors
    /// `InvalidArgument` if the value does not fit the decimal's 96-bit
    /// mantissa or 28-digit scale.
    pub fn to_decimal(&self) -> Result<Decimal, MoneyError> {
        let out_of_range = || {
            MoneyError::InvalidArgument(format!("{self:?} is out of range for a decimal"))
        };
        let mantissa = i128::try_from(self.magnitude()).map_err(|_| out_of_range())?;
        Decimal::try_from_i128_with_scale(mantissa, self.scale()).map_err(|_| out_of_range())
    }

    /// Returns the canonical form with trailing fractional zeros removed.
    pub fn reduced(&self) -> Money {
        let reducible = self.scale() > 0
            && (self.is_zero() || self.magnitude().is_multiple_of(&BigInt::from(BASE)));
        if reducible {
            self.reduce(self.magnitude().clone(), self.scale())
        } else {
            self.clone()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Arithmetic
    // ─────────────────────────────────────────────────────────────────────────

    /// Checked addition.
    ///
    /// Adding zero of any numeric type returns `self` itself. Adding money
    /// requires the same currency; any other non-zero operand is a type
    /// mismatch.
    pub fn checked_add(&self, rhs: impl Into<Operand>) -> Result<Money, MoneyError> {
        match rhs.into() {
            Operand::Money(other) => {
                self.ensure_same_currency(&other)?;
                if other.is_zero() {
                    Ok(self.clone())
                } else if self.is_zero() {
                    Ok(other)
                } else {
                    Ok(self.add_aligned(&other))
                }
            }
            operand if operand.is_zero() => Ok(self.clone()),
            operand => Err(MoneyError::TypeMismatch(format!(
                "can't add {} to money",
                operand.kind()
            ))),
        }
    }

    /// Checked subtraction, `self + (-rhs)` under the same rules as
    /// [`Money::checked_add`].
    pub fn checked_sub(&self, rhs: impl Into<Operand>) -> Result<Money, MoneyError> {
        match rhs.into() {
            Operand::Money(other) => {
                self.ensure_same_currency(&other)?;
                if other.is_zero() {
                    return Ok(self.clone());
                }
                self.checked_add(-&other)
            }
            operand if operand.is_zero() => Ok(self.clone()),
            operand => Err(MoneyError::TypeMismatch(format!(
                "can't subtract {} from money",
                operand.kind()
            ))),
        }
    }

    /// Checked multiplication by an integer, rational or decimal.
    ///
    /// Multiplying money by money is dimensionally invalid and fails with
    /// `TypeMismatch`.
    pub fn checked_mul(&self, rhs: impl Into<Operand>) -> Result<Money, MoneyError> {
        match rhs.into() {
            Operand::Integer(i) => Ok(self.reduce(self.magnitude() * i, self.scale())),
            Operand::Rational(r) => {
                let (numer, denom) = r.into_raw();
                self.checked_mul(numer)?.checked_div(denom)
            }
            Operand::Decimal(d) => {
                let (value, scale) = d.effective()?;
                Ok(self.reduce(self.magnitude() * value, self.scale() + scale))
            }
            Operand::Money(_) => Err(MoneyError::TypeMismatch(
                "money can't be multiplied by money".into(),
            )),
        }
    }

    /// Checked division with at most [`DEFAULT_DIVISION_DIGITS`] fractional
    /// digits.
    pub fn checked_div(&self, rhs: impl Into<Operand>) -> Result<Money, MoneyError> {
        self.div_with_digits(rhs, DEFAULT_DIVISION_DIGITS)
    }

    /// Checked division producing at most `max_digits` fractional digits.
    ///
    /// Long division stops early once the remainder is zero. A quotient whose
    /// scale already reaches `max_digits` gets no further digits.
    ///
    /// # Errors
    /// - `InvalidArgument` if `max_digits` is 0
    /// - `DivisionByZero` for a zero divisor of any type
    /// - `CurrencyMismatch` for a money divisor in another currency
    pub fn div_with_digits(
        &self,
        rhs: impl Into<Operand>,
        max_digits: u32,
    ) -> Result<Money, MoneyError> {
        if max_digits < 1 {
            return Err(MoneyError::InvalidArgument(
                "digits must be greater than or equal to 1".into(),
            ));
        }
        let rhs = rhs.into();
        if rhs.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        match rhs {
            Operand::Money(other) => {
                self.ensure_same_currency(&other)?;
                if self.scale() >= other.scale() {
                    Ok(self.long_divide(
                        self.magnitude(),
                        self.scale() - other.scale(),
                        other.magnitude(),
                        max_digits,
                    ))
                } else {
                    let value = self.magnitude() * pow10(other.scale() - self.scale());
                    Ok(self.long_divide(&value, 0, other.magnitude(), max_digits))
                }
            }
            Operand::Integer(i) => Ok(self.long_divide(self.magnitude(), self.scale(), &i, max_digits)),
            Operand::Rational(r) => {
                let (numer, denom) = r.into_raw();
                self.checked_mul(denom)?.div_with_digits(numer, max_digits)
            }
            Operand::Decimal(d) => {
                let divisor = Money::from_decomposed(&d, self.currency().clone())?;
                self.div_with_digits(divisor, max_digits)
            }
        }
    }

    /// Three-way comparison.
    ///
    /// Money must share the currency; zero of any numeric type compares
    /// against the sign of `self`. Anything else is unordered (`Ok(None)`).
    pub fn compare(&self, other: impl Into<Operand>) -> Result<Option<Ordering>, MoneyError> {
        match other.into() {
            Operand::Money(other) => {
                self.ensure_same_currency(&other)?;
                let (lhs, rhs, _) = self.aligned(&other);
                Ok(Some(lhs.cmp(&rhs)))
            }
            operand if operand.is_zero() => Ok(Some(self.magnitude().cmp(&BigInt::zero()))),
            _ => Ok(None),
        }
    }

    /// Converts into another currency.
    ///
    /// With a money `rate` the result is in the rate's currency, and a rate
    /// in the same currency returns `self` itself. A numeric rate needs the
    /// target `currency`. Integer, decimal and money rates multiply exactly;
    /// a rational rate divides with [`DEFAULT_DIVISION_DIGITS`].
    pub fn convert(&self, rate: impl Into<Operand>, currency: Option<&str>) -> Result<Money, MoneyError> {
        match rate.into() {
            Operand::Money(rate) => {
                if currency.is_some() {
                    return Err(MoneyError::InvalidArgument(
                        "can't convert with both a money rate and a currency argument".into(),
                    ));
                }
                if rate.currency() == self.currency() {
                    return Ok(self.clone());
                }
                Ok(rate.reduce(
                    rate.magnitude() * self.magnitude(),
                    rate.scale() + self.scale(),
                ))
            }
            operand => {
                let currency = currency.ok_or_else(|| {
                    MoneyError::InvalidArgument(format!(
                        "can't convert with a {} rate without a currency argument",
                        operand.kind()
                    ))
                })?;
                let currency = Currency::new(currency)?;
                Money::from_parts(self.magnitude().clone(), self.scale(), currency).checked_mul(operand)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rounding
    // ─────────────────────────────────────────────────────────────────────────

    /// Rounds to `digits` fractional digits.
    ///
    /// Returns `self` itself when `digits` is not below the current scale.
    pub fn round(&self, digits: u32, mode: RoundingMode) -> Money {
        if digits >= self.scale() {
            return self.clone();
        }
        let unit = pow10(self.scale() - digits);
        let half = &unit / 2;
        let (mut kept, dropped) = self.magnitude().abs().div_rem(&unit);

        if mode.increments(self.is_negative(), &kept, &dropped, &half) {
            kept += 1;
        }
        if self.is_negative() {
            kept = -kept;
        }

        if digits == 0 {
            Money::from_parts(kept, 0, self.currency().clone())
        } else {
            self.reduce(kept, digits)
        }
    }

    pub fn ceil(&self, digits: u32) -> Money {
        self.round(digits, RoundingMode::Ceiling)
    }

    pub fn floor(&self, digits: u32) -> Money {
        self.round(digits, RoundingMode::Floor)
    }

    /// Drops fractional digits below `digits` without rounding.
    pub fn truncate(&self, digits: u32) -> Money {
        if digits >= self.scale() {
            return self.clone();
        }
        let value = self.magnitude() / pow10(self.scale() - digits);
        self.reduce(value, digits)
    }

    /// Integral part as money.
    pub fn fix(&self) -> Money {
        self.truncate(0)
    }

    /// Fractional part as money, carrying the sign of `self`.
    pub fn frac(&self) -> Money {
        let fix = self.fix();
        if fix.is_zero() {
            return self.reduced();
        }
        self.add_aligned(&-fix)
    }

    /// Absolute value; `self` itself when not negative.
    pub fn abs(&self) -> Money {
        if !self.is_negative() {
            return self.clone();
        }
        -self
    }

    /// Splits the value into `parts` shares truncated to `digits` fractional
    /// digits. The last share absorbs the remainder so the shares always sum
    /// to `self`.
    pub fn allocate(&self, parts: u32, digits: u32) -> Result<Vec<Money>, MoneyError> {
        if parts < 1 {
            return Err(MoneyError::InvalidArgument(
                "parts must be greater than or equal to 1".into(),
            ));
        }
        let share = self
            .div_with_digits(parts, digits.max(DEFAULT_DIVISION_DIGITS))?
            .truncate(digits);
        let allocated = share.checked_mul(parts - 1)?;

        let mut shares = vec![share; parts as usize - 1];
        shares.push(self.add_aligned(&-allocated));
        Ok(shares)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Wire formats
    // ─────────────────────────────────────────────────────────────────────────

    /// Human string form, `"<digits> <currency>"`.
    pub fn dump(&self) -> String {
        format!(
            "{} {}",
            digits::dump(self, &DumpOptions::default()),
            self.currency()
        )
    }

    /// Inverse of [`Money::dump`].
    pub fn load(s: &str) -> Result<Money, MoneyError> {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(value), Some(currency), None) => digits::load(value, currency),
            _ => Err(MoneyError::ParseError(format!(
                "can't load {s:?}, expected \"<digits> <currency>\""
            ))),
        }
    }

    /// Raw triple form, `"<magnitude> <scale> <currency>"`.
    pub fn to_raw(&self) -> String {
        format!("{} {} {}", self.magnitude(), self.scale(), self.currency())
    }

    /// Inverse of [`Money::to_raw`].
    pub fn from_raw(s: &str) -> Result<Money, MoneyError> {
        let mut parts = s.split_whitespace();
        let (Some(magnitude), Some(scale), Some(currency), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(MoneyError::InvalidArgument(format!(
                "{s:?} is not a raw money triple"
            )));
        };
        let magnitude = BigInt::from_str(magnitude).map_err(|_| {
            MoneyError::InvalidArgument(format!("{magnitude:?} is not a valid value argument"))
        })?;
        let scale = scale.parse::<u32>().map_err(|_| {
            MoneyError::InvalidArgument(format!("{scale:?} is not a valid scale argument"))
        })?;
        Money::new(magnitude, scale, currency)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency() != other.currency() {
            return Err(MoneyError::currency_mismatch(self.currency(), other.currency()));
        }
        Ok(())
    }

    /// Both magnitudes expressed at the larger of the two scales.
    fn aligned(&self, other: &Money) -> (BigInt, BigInt, u32) {
        let scale = self.scale().max(other.scale());
        let lhs = self.magnitude() * pow10(scale - self.scale());
        let rhs = other.magnitude() * pow10(scale - other.scale());
        (lhs, rhs, scale)
    }

    fn add_aligned(&self, other: &Money) -> Money {
        let (lhs, rhs, scale) = self.aligned(other);
        self.reduce(lhs + rhs, scale)
    }

    /// Builds a value in this currency with trailing zeros stripped.
    fn reduce(&self, mut value: BigInt, mut scale: u32) -> Money {
        if value.is_zero() {
            return Money::zero(self.currency().clone());
        }
        let base = BigInt::from(BASE);
        while scale > 0 {
            let (quotient, remainder) = value.div_rem(&base);
            if !remainder.is_zero() {
                break;
            }
            value = quotient;
            scale -= 1;
        }
        Money::from_parts(value, scale, self.currency().clone())
    }

    /// Digit-by-digit long division of `value × 10^-scale` by `divisor`.
    fn long_divide(&self, value: &BigInt, mut scale: u32, divisor: &BigInt, max_scale: u32) -> Money {
        let divisor_abs = divisor.abs();
        let base = BigInt::from(BASE);
        let mut quotient = BigInt::zero();
        let mut carry = BigInt::zero();

        let (_, digits) = value.to_radix_be(BASE);
        for digit in digits {
            let dividend = &carry + BigInt::from(digit);
            let (q, r) = dividend.div_rem(&divisor_abs);
            quotient = quotient * &base + q;
            carry = r * &base;
        }

        while scale < max_scale && !carry.is_zero() {
            let (q, r) = carry.div_rem(&divisor_abs);
            quotient = quotient * &base + q;
            carry = r * &base;
            scale += 1;
        }

        if value.is_negative() != divisor.is_negative() {
            quotient = -quotient;
        }
        self.reduce(quotient, scale)
    }

    fn cmp_money(&self, other: &Money) -> Option<Ordering> {
        if self.currency() != other.currency() {
            return None;
        }
        let (lhs, rhs, _) = self.aligned(other);
        Some(lhs.cmp(&rhs))
    }
}

impl Neg for &Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money::from_parts(-self.magnitude(), self.scale(), self.currency().clone())
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        -&self
    }
}

impl PartialEq for Money {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_money(other) == Some(Ordering::Equal)
    }
}

impl Eq for Money {}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.cmp_money(other)
    }
}

impl Hash for Money {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let reduced = self.reduced();
        reduced.magnitude().hash(state);
        reduced.scale().hash(state);
        reduced.currency().hash(state);
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

impl fmt::Debug for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Money({})", self.dump())
    }
}

impl FromStr for Money {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::load(s)
    }
}

impl TryFrom<String> for Money {
    type Error = MoneyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Money::load(&s)
    }
}

impl From<Money> for String {
    fn from(money: Money) -> Self {
        money.dump()
    }
}
