//! An arbitrary precision signed token amount.
use crate::error::GenesisError;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{AddAssign, SubAssign};
use std::str::FromStr;

/// Token amount in the chain's smallest unit.
///
/// Genesis balances do not fit in 64 bits, so they are kept as big integers and
/// stored in JSON as decimal strings. The amount is signed: deducting from an
/// underfunded treasury is allowed to go below zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Balance(BigInt);

impl Balance {
    pub fn zero() -> Self {
        Balance(BigInt::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }
}

impl From<u64> for Balance {
    fn from(v: u64) -> Balance {
        Balance(BigInt::from(v))
    }
}

impl FromStr for Balance {
    type Err = GenesisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('-').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|c| c.is_ascii_digit()) {
            return Err(GenesisError::InvalidBalance(s.to_string()));
        }
        BigInt::from_str(s)
            .map(Balance)
            .map_err(|_| GenesisError::InvalidBalance(s.to_string()))
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'a> AddAssign<&'a Balance> for Balance {
    fn add_assign(&mut self, other: &Balance) {
        self.0 += &other.0;
    }
}

impl<'a> SubAssign<&'a Balance> for Balance {
    fn sub_assign(&mut self, other: &Balance) {
        self.0 -= &other.0;
    }
}

impl<'a> Sum<&'a Balance> for Balance {
    fn sum<I: Iterator<Item = &'a Balance>>(iter: I) -> Balance {
        iter.fold(Balance::zero(), |mut total, balance| {
            total += balance;
            total
        })
    }
}

impl Serialize for Balance {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Balance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Balance::from_str(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let amount = "1000000000000000000000000000";
        assert_eq!(Balance::from_str(amount).unwrap().to_string(), amount);
        assert_eq!(Balance::from_str("-5").unwrap().to_string(), "-5");
        assert_eq!(Balance::from_str("0").unwrap(), Balance::zero());

        Balance::from_str("").unwrap_err();
        Balance::from_str("-").unwrap_err();
        Balance::from_str("+5").unwrap_err();
        Balance::from_str("1e25").unwrap_err();
        Balance::from_str("1.0").unwrap_err();
    }

    #[test]
    fn test_arithmetic_beyond_u128() {
        let mut balance = Balance::from_str("1000000000000000000000000000000000000000").unwrap();
        let step = Balance::from_str("10000000000000000000000000").unwrap();
        balance -= &step;
        assert_eq!(
            balance.to_string(),
            "999999999999990000000000000000000000000"
        );
        balance += &step;
        assert_eq!(
            balance.to_string(),
            "1000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_negative_result() {
        let mut balance = Balance::from(1);
        balance -= &Balance::from(3);
        assert!(balance.is_negative());
        assert_eq!(balance.to_string(), "-2");
    }

    #[test]
    fn test_sum() {
        let balances = vec![Balance::from(1), Balance::from(2), Balance::from(3)];
        assert_eq!(balances.iter().sum::<Balance>(), Balance::from(6));
        assert!(Vec::<Balance>::new().iter().sum::<Balance>().is_zero());
    }

    #[test]
    fn test_serde() {
        let balance = Balance::from_str("10000000000000000000000000").unwrap();
        let json = serde_json::to_string(&balance).unwrap();
        assert_eq!(json, "\"10000000000000000000000000\"");
        assert_eq!(serde_json::from_str::<Balance>(&json).unwrap(), balance);

        serde_json::from_str::<Balance>("10").unwrap_err();
        serde_json::from_str::<Balance>("\"ten\"").unwrap_err();
    }
}
