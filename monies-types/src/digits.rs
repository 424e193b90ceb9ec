//! Conversion between money values and plain decimal digit strings.
//!
//! [`dump`] renders a value with configurable separators, padding and
//! truncation; [`load`] reads the canonical `-?\d+(\.\d+)?` form back. For
//! canonical strings the two are exact inverses.

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::domain::money::pow10;
use crate::domain::{Currency, Money};
use crate::error::MoneyError;

static CANONICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A-?\d+(\.\d+)?\z").expect("valid canonical digits pattern"));

/// Rendering options for [`dump`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOptions {
    /// Exact number of fractional digits to render; pads with zeros or
    /// truncates. `None` renders the value's own scale.
    pub scale: Option<u32>,
    /// Rendered in place of any zero value.
    pub zero: String,
    pub separator: String,
    pub thousands_separator: Option<String>,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            scale: None,
            zero: "0".into(),
            separator: ".".into(),
            thousands_separator: None,
        }
    }
}

/// Renders the digits of `value`.
///
/// A target scale below the value's scale truncates; it never rounds.
pub fn dump(value: &Money, options: &DumpOptions) -> String {
    if value.is_zero() {
        return options.zero.clone();
    }

    let digits = value.magnitude().abs().to_string();
    let scale = value.scale() as usize;

    let (integral, mut fraction) = if digits.len() > scale {
        let (integral, fraction) = digits.split_at(digits.len() - scale);
        (integral.to_string(), fraction.to_string())
    } else {
        ("0".to_string(), format!("{digits:0>scale$}"))
    };

    if let Some(target) = options.scale {
        let target = target as usize;
        if target > fraction.len() {
            fraction.push_str(&"0".repeat(target - fraction.len()));
        } else {
            fraction.truncate(target);
        }
    }

    let mut out = String::with_capacity(digits.len() + 8);
    if value.is_negative() {
        out.push('-');
    }
    match &options.thousands_separator {
        Some(separator) => out.push_str(&group_thousands(&integral, separator)),
        None => out.push_str(&integral),
    }
    if !fraction.is_empty() {
        out.push_str(&options.separator);
        out.push_str(&fraction);
    }
    out
}

fn group_thousands(integral: &str, separator: &str) -> String {
    let mut grouped = String::with_capacity(integral.len() + integral.len() / 3 * separator.len());
    for (i, ch) in integral.chars().enumerate() {
        if i > 0 && (integral.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Returns true for strings in the canonical `-?\d+(\.\d+)?` form.
pub fn is_canonical(s: &str) -> bool {
    CANONICAL.is_match(s)
}

/// Reads a canonical digit string into a value in `currency`.
///
/// The scale is the number of fractional digits, so `"1.50"` loads as
/// `(150, 2)`.
pub fn load(s: &str, currency: &str) -> Result<Money, MoneyError> {
    let currency = Currency::new(currency)?;
    if !is_canonical(s) {
        return Err(MoneyError::ParseError(format!("can't load {s:?} as digits")));
    }

    let (integral, fraction) = match s.split_once('.') {
        Some((integral, fraction)) => (integral, Some(fraction)),
        None => (s, None),
    };
    let parse = |digits: &str| {
        BigInt::from_str(digits)
            .map_err(|e| MoneyError::ParseError(format!("can't load {s:?} as digits: {e}")))
    };

    let mut value = parse(integral)?;
    let mut scale = 0;
    if let Some(fraction) = fraction {
        scale = fraction.len() as u32;
        let fraction = parse(fraction)?;
        value *= pow10(scale);
        if s.starts_with('-') {
            value -= fraction;
        } else {
            value += fraction;
        }
    }
    Ok(Money::from_parts(value, scale, currency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gbp(magnitude: i64, scale: u32) -> Money {
        Money::new(magnitude, scale, "GBP").unwrap()
    }

    fn plain(value: &Money) -> String {
        dump(value, &DumpOptions::default())
    }

    #[test]
    fn test_dump_plain_values() {
        assert_eq!(plain(&gbp(0, 0)), "0");
        assert_eq!(plain(&gbp(0, 3)), "0");
        assert_eq!(plain(&gbp(1, 0)), "1");
        assert_eq!(plain(&gbp(199, 2)), "1.99");
        assert_eq!(plain(&gbp(12, 2)), "0.12");
        assert_eq!(plain(&gbp(1, 3)), "0.001");
        assert_eq!(plain(&gbp(-75, 2)), "-0.75");
        assert_eq!(plain(&gbp(1011000, 0)), "1011000");
    }

    #[test]
    fn test_dump_with_scale_pads_and_truncates() {
        let options = DumpOptions {
            scale: Some(2),
            ..DumpOptions::default()
        };
        assert_eq!(dump(&gbp(1, 0), &options), "1.00");
        assert_eq!(dump(&gbp(1, 5), &options), "0.00");
        assert_eq!(dump(&gbp(66, 3), &options), "0.06");
        assert_eq!(dump(&gbp(1234567, 3), &options), "1234.56");
    }

    #[test]
    fn test_dump_with_zero_scale_omits_separator() {
        let options = DumpOptions {
            scale: Some(0),
            ..DumpOptions::default()
        };
        assert_eq!(dump(&gbp(199, 2), &options), "1");
        assert_eq!(dump(&gbp(5, 2), &options), "0");
    }

    #[test]
    fn test_dump_with_separators() {
        let options = DumpOptions {
            scale: Some(2),
            zero: "0,00".into(),
            separator: ",".into(),
            thousands_separator: Some(".".into()),
        };
        assert_eq!(dump(&gbp(101100011, 2), &options), "1.011.000,11");
        assert_eq!(dump(&gbp(0, 0), &options), "0,00");
        assert_eq!(dump(&gbp(-123456, 3), &options), "-123,45");
        assert_eq!(dump(&gbp(999, 0), &options), "999,00");
    }

    #[test]
    fn test_dump_with_multibyte_thousands_separator() {
        let options = DumpOptions {
            thousands_separator: Some("\u{2009}".into()),
            ..DumpOptions::default()
        };
        assert_eq!(dump(&gbp(1234567, 0), &options), "1\u{2009}234\u{2009}567");
    }

    #[test]
    fn test_load_values() {
        let value = load("1.99", "GBP").unwrap();
        assert_eq!(value.magnitude(), &BigInt::from(199));
        assert_eq!(value.scale(), 2);

        let value = load("-0.05", "GBP").unwrap();
        assert_eq!(value.magnitude(), &BigInt::from(-5));
        assert_eq!(value.scale(), 2);

        let value = load("1999", "GBP").unwrap();
        assert_eq!(value.magnitude(), &BigInt::from(1999));
        assert_eq!(value.scale(), 0);
    }

    #[test]
    fn test_load_rejects_non_canonical_input() {
        for input in ["", "abc", "1.", ".5", "1,99", "1.2.3", "--1", "1e5"] {
            assert!(
                matches!(load(input, "GBP"), Err(MoneyError::ParseError(_))),
                "{input:?} should not load"
            );
        }
        assert!(matches!(load("1.99", ""), Err(MoneyError::InvalidArgument(_))));
    }

    proptest! {
        #[test]
        fn dump_then_load_round_trips(magnitude in any::<i64>(), scale in 0u32..24) {
            let value = gbp(magnitude, scale);
            let loaded = load(&plain(&value), "GBP").unwrap();
            prop_assert_eq!(loaded, value);
        }
    }
}
