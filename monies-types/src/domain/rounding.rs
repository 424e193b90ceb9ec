//! Rounding modes and the increment decision used by [`Money::round`].
//!
//! [`Money::round`]: super::Money::round

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MoneyError;

/// How digits dropped by rounding affect the digits that are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Toward zero.
    #[serde(alias = "truncate")]
    Down,
    /// Away from zero.
    Up,
    /// Toward positive infinity.
    #[serde(alias = "ceil")]
    Ceiling,
    /// Toward negative infinity.
    Floor,
    /// Nearest neighbour, ties away from zero.
    #[default]
    #[serde(alias = "default")]
    HalfUp,
    /// Nearest neighbour, ties toward zero.
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour.
    #[serde(alias = "banker")]
    HalfEven,
}

impl RoundingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundingMode::Down => "down",
            RoundingMode::Up => "up",
            RoundingMode::Ceiling => "ceiling",
            RoundingMode::Floor => "floor",
            RoundingMode::HalfUp => "half_up",
            RoundingMode::HalfDown => "half_down",
            RoundingMode::HalfEven => "half_even",
        }
    }

    /// Decides whether the kept magnitude moves one unit away from zero.
    ///
    /// `kept` and `dropped` are the absolute kept digits and dropped suffix;
    /// `half` is exactly half a unit of the kept part (`5 × 10^(n-1)` for `n`
    /// dropped digits).
    pub(crate) fn increments(
        self,
        negative: bool,
        kept: &BigInt,
        dropped: &BigInt,
        half: &BigInt,
    ) -> bool {
        let inexact = !dropped.is_zero();
        match self {
            RoundingMode::Down => false,
            RoundingMode::Up => inexact,
            RoundingMode::Ceiling => inexact && !negative,
            RoundingMode::Floor => inexact && negative,
            RoundingMode::HalfUp => dropped >= half,
            RoundingMode::HalfDown => dropped > half,
            RoundingMode::HalfEven => dropped > half || (dropped == half && kept.is_odd()),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "down" | "truncate" => Ok(RoundingMode::Down),
            "up" => Ok(RoundingMode::Up),
            "ceiling" | "ceil" => Ok(RoundingMode::Ceiling),
            "floor" => Ok(RoundingMode::Floor),
            "half_up" | "default" => Ok(RoundingMode::HalfUp),
            "half_down" => Ok(RoundingMode::HalfDown),
            "half_even" | "banker" => Ok(RoundingMode::HalfEven),
            _ => Err(MoneyError::InvalidArgument(format!(
                "invalid rounding mode: {s:?}"
            ))),
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_and_aliases() {
        assert_eq!("truncate".parse::<RoundingMode>().unwrap(), RoundingMode::Down);
        assert_eq!("ceil".parse::<RoundingMode>().unwrap(), RoundingMode::Ceiling);
        assert_eq!("banker".parse::<RoundingMode>().unwrap(), RoundingMode::HalfEven);
        assert_eq!("default".parse::<RoundingMode>().unwrap(), RoundingMode::HalfUp);
        assert_eq!(RoundingMode::default(), RoundingMode::HalfUp);
    }

    #[test]
    fn test_unknown_mode_fails() {
        assert!(matches!(
            "foo".parse::<RoundingMode>(),
            Err(MoneyError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mode_serde() {
        let mode: RoundingMode = serde_json::from_str("\"banker\"").unwrap();
        assert_eq!(mode, RoundingMode::HalfEven);
        assert_eq!(
            serde_json::to_string(&RoundingMode::HalfDown).unwrap(),
            "\"half_down\""
        );
    }

    #[test]
    fn test_half_compares_whole_dropped_suffix() {
        let kept = BigInt::from(71364);
        let half = BigInt::from(500);
        let exact = BigInt::from(500);
        let above = BigInt::from(501);
        assert!(!RoundingMode::HalfDown.increments(false, &kept, &exact, &half));
        assert!(RoundingMode::HalfDown.increments(false, &kept, &above, &half));
        assert!(!RoundingMode::HalfEven.increments(false, &kept, &exact, &half));
        assert!(RoundingMode::HalfUp.increments(false, &kept, &exact, &half));
    }
}
