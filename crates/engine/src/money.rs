use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Characters accepted as thousands separators in user input.
pub const SEPARATORS: [char; 4] = ['.', ',', ' ', '_'];

/// Delimiter placed between digit groups when rendering.
pub const GROUP_DELIMITER: char = ',';

/// Non-negative money amount in the smallest currency unit.
///
/// There are no fractional subunits: `50.000`, `50,000`, `50 000`, `50_000`
/// and `50000` all denote the same amount.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount: Amount = "50.000".parse().unwrap();
/// assert_eq!(amount.units(), 50_000);
/// assert_eq!(amount.to_string(), "50,000");
/// assert!("12a".parse::<Amount>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Largest amount a single entry may carry.
    ///
    /// Over nine thousand entries of this size still sum within `i64`.
    pub const MAX: Amount = Amount(999_999_999_999_999);

    /// Creates an amount from raw units. Negative values and values above
    /// [`Amount::MAX`] are rejected.
    pub fn new(units: i64) -> Result<Self, EngineError> {
        if units < 0 {
            return Err(EngineError::InvalidAmount(format!(
                "amount must not be negative: {units}"
            )));
        }
        if units > Self::MAX.0 {
            return Err(EngineError::InvalidAmount(format!(
                "amount too large: {units}"
            )));
        }
        Ok(Self(units))
    }

    /// Returns the raw value in units.
    #[must_use]
    pub const fn units(self) -> i64 {
        self.0
    }

    /// One participant's half of a shared expense, rounded half up.
    #[must_use]
    pub const fn half(self) -> Amount {
        Amount(self.0 / 2 + self.0 % 2)
    }

    /// Divides the amount into `parts` shares.
    ///
    /// Every share is `amount / parts`; the remainder is added to the first
    /// share, so the shares always sum to the original amount.
    #[must_use]
    pub fn split(self, parts: usize) -> Vec<Amount> {
        let Ok(divisor) = i64::try_from(parts) else {
            return Vec::new();
        };
        if divisor == 0 {
            return Vec::new();
        }

        let base = self.0 / divisor;
        let remainder = self.0 % divisor;
        let mut shares = vec![Amount(base); parts];
        shares[0] = Amount(base + remainder);
        shares
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, digit) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(GROUP_DELIMITER);
            }
            grouped.push(digit);
        }
        f.write_str(&grouped)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

// Sums saturate at `i64::MAX` instead of wrapping.
impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = *self + rhs;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses user input into an amount.
    ///
    /// Separators from [`SEPARATORS`] are stripped; what remains must be a
    /// non-empty run of ASCII digits no larger than [`Amount::MAX`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.chars().filter(|c| !SEPARATORS.contains(c)).collect();

        if digits.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(EngineError::InvalidAmount(format!("not a number: {s}")));
        }

        match digits.parse::<i64>() {
            Ok(units) if units <= Self::MAX.0 => Ok(Amount(units)),
            _ => Err(EngineError::InvalidAmount("amount too large".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<i64, EngineError> {
        s.parse::<Amount>().map(Amount::units)
    }

    #[test]
    fn parse_strips_every_separator_kind() {
        for raw in ["50.000", "50,000", "50 000", "50_000", "50000"] {
            assert_eq!(parse(raw).unwrap(), 50_000, "input {raw:?}");
        }
        assert_eq!(parse("1.234.567").unwrap(), 1_234_567);
        assert_eq!(parse("1,2_3 4").unwrap(), 1234);
    }

    #[test]
    fn parse_rejects_non_digit_residue() {
        for raw in ["", "abc", "12a", "-5", "+5", "..", " ", "1e3", "١٢"] {
            assert!(
                matches!(parse(raw), Err(EngineError::InvalidAmount(_))),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_amounts_above_the_maximum() {
        assert_eq!(parse("999.999.999.999.999").unwrap(), Amount::MAX.units());
        for raw in ["1.000.000.000.000.000", "9.000.000.000.000.000.000", "99999999999999999999"] {
            assert!(
                matches!(parse(raw), Err(EngineError::InvalidAmount(_))),
                "input {raw:?}"
            );
        }
        assert!(Amount::new(Amount::MAX.units() + 1).is_err());
    }

    #[test]
    fn addition_saturates_instead_of_wrapping() {
        assert_eq!(Amount(i64::MAX) + Amount(1), Amount(i64::MAX));

        let mut total = Amount(i64::MAX - 1);
        total += Amount(5);
        assert_eq!(total, Amount(i64::MAX));

        let sum: Amount = [Amount(i64::MAX), Amount(i64::MAX)].into_iter().sum();
        assert_eq!(sum, Amount(i64::MAX));
        assert_eq!(Amount::MAX + Amount::MAX, Amount(1_999_999_999_999_998));
    }

    #[test]
    fn parse_accepts_zero() {
        assert_eq!(parse("0").unwrap(), 0);
    }

    #[test]
    fn display_groups_digits_by_three() {
        assert_eq!(Amount(0).to_string(), "0");
        assert_eq!(Amount(999).to_string(), "999");
        assert_eq!(Amount(1000).to_string(), "1,000");
        assert_eq!(Amount(25_000).to_string(), "25,000");
        assert_eq!(Amount(1_234_567).to_string(), "1,234,567");
    }

    #[test]
    fn half_rounds_up() {
        assert_eq!(Amount(50_000).half(), Amount(25_000));
        assert_eq!(Amount(50_001).half(), Amount(25_001));
        assert_eq!(Amount(1).half(), Amount(1));
        assert_eq!(Amount(0).half(), Amount(0));
    }

    #[test]
    fn split_keeps_the_total() {
        assert_eq!(Amount(50_000).split(2), vec![Amount(25_000), Amount(25_000)]);
        assert_eq!(Amount(50_001).split(2), vec![Amount(25_001), Amount(25_000)]);
        assert_eq!(
            Amount(100).split(3),
            vec![Amount(34), Amount(33), Amount(33)]
        );
        for total in [0, 1, 7, 99_999, 1_000_001] {
            for parts in 1..=4 {
                let sum: Amount = Amount(total).split(parts).into_iter().sum();
                assert_eq!(sum, Amount(total));
            }
        }
    }

    #[test]
    fn split_into_zero_parts_is_empty() {
        assert!(Amount(10).split(0).is_empty());
    }

    #[test]
    fn new_rejects_negative() {
        assert!(Amount::new(-1).is_err());
        assert_eq!(Amount::new(5).unwrap().units(), 5);
    }
}
