//! Value amounts
//!
//! Everything inside the ledger is counted in wei. Ether strings only appear
//! at the edges (configuration, CLI input, display).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Number of wei in one ether.
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

const ETHER_DECIMALS: usize = 18;

/// Value in the smallest currency unit (wei)
///
/// Serialized as a decimal string so that values above `u64::MAX` survive
/// JSON and YAML round trips.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(pub u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn new(wei: u128) -> Self {
        Self(wei)
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Whole ether, e.g. `Amount::ether(1)` is 10^18 wei.
    pub fn ether(ether: u64) -> Self {
        Self(u128::from(ether) * WEI_PER_ETHER)
    }

    pub fn wei(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Parse a decimal ether string such as `"0.001"` or `"1.5"`.
    pub fn from_ether(input: &str) -> Result<Self, AmountParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(AmountParseError::Empty);
        }

        let (whole, fraction) = match input.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (input, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(AmountParseError::Empty);
        }
        if fraction.len() > ETHER_DECIMALS {
            return Err(AmountParseError::TooManyDecimals(fraction.len()));
        }

        let whole = parse_digits(whole)?;
        let fraction_value = parse_digits(fraction)?;
        let scale = 10u128.pow((ETHER_DECIMALS - fraction.len()) as u32);

        whole
            .checked_mul(WEI_PER_ETHER)
            .and_then(|wei| wei.checked_add(fraction_value * scale))
            .map(Self)
            .ok_or(AmountParseError::Overflow)
    }

    /// Format as ether: trailing zeros trimmed, at least one fractional digit.
    pub fn to_ether_string(&self) -> String {
        let whole = self.0 / WEI_PER_ETHER;
        let fraction = self.0 % WEI_PER_ETHER;
        let fraction = format!("{:018}", fraction);
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            format!("{}.0", whole)
        } else {
            format!("{}.{}", whole, fraction)
        }
    }
}

fn parse_digits(digits: &str) -> Result<u128, AmountParseError> {
    if digits.is_empty() {
        return Ok(0);
    }
    if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
        return Err(AmountParseError::InvalidDigit(bad));
    }
    digits.parse::<u128>().map_err(|_| AmountParseError::Overflow)
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ETH", self.to_ether_string())
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ether(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<u128>()
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Errors from parsing an ether string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountParseError {
    #[error("Empty amount")]
    Empty,

    #[error("Invalid character in amount: {0:?}")]
    InvalidDigit(char),

    #[error("Too many decimal places: {0} (maximum 18)")]
    TooManyDecimals(usize),

    #[error("Amount does not fit in 128 bits of wei")]
    Overflow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ether() {
        assert_eq!(Amount::from_ether("1").unwrap(), Amount::ether(1));
        assert_eq!(
            Amount::from_ether("0.001").unwrap(),
            Amount::new(1_000_000_000_000_000)
        );
        assert_eq!(
            Amount::from_ether("1.5").unwrap(),
            Amount::new(1_500_000_000_000_000_000)
        );
        assert_eq!(Amount::from_ether(".5").unwrap(), Amount::from_ether("0.5").unwrap());
        assert_eq!(Amount::from_ether("0.000000000000000001").unwrap(), Amount::new(1));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Amount::from_ether(""), Err(AmountParseError::Empty));
        assert_eq!(Amount::from_ether("."), Err(AmountParseError::Empty));
        assert_eq!(Amount::from_ether("-1"), Err(AmountParseError::InvalidDigit('-')));
        assert_eq!(Amount::from_ether("1e3"), Err(AmountParseError::InvalidDigit('e')));
        assert_eq!(
            Amount::from_ether("0.0000000000000000001"),
            Err(AmountParseError::TooManyDecimals(19))
        );
        assert_eq!(
            Amount::from_ether("999999999999999999999999999999"),
            Err(AmountParseError::Overflow)
        );
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(Amount::ether(1).to_ether_string(), "1.0");
        assert_eq!(Amount::zero().to_ether_string(), "0.0");
        assert_eq!(Amount::from_ether("0.001").unwrap().to_ether_string(), "0.001");
        assert_eq!(Amount::from_ether("12.50").unwrap().to_string(), "12.5 ETH");
    }

    #[test]
    fn test_checked_and_saturating_math() {
        assert_eq!(Amount::new(1).saturating_add(Amount::new(5)), Amount::new(6));
        assert_eq!(
            Amount::new(u128::MAX).saturating_add(Amount::new(1)),
            Amount::new(u128::MAX)
        );
        assert_eq!(Amount::new(u128::MAX).checked_add(Amount::new(1)), None);
        assert_eq!(Amount::new(1).checked_sub(Amount::new(2)), None);
        assert_eq!(Amount::new(1).saturating_sub(Amount::new(2)), Amount::zero());
    }

    #[test]
    fn test_serializes_as_wei_string() {
        let amount = Amount::ether(1);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"1000000000000000000\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
