//! Native token amount type.

use std::fmt::{self, Display};
use std::ops::{Add, Sub};
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseAmountError;

/// One wei (10^-18 ETH).
const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;
/// One gwei in wei (10^-9 ETH = 10^9 wei).
const WEI_PER_GWEI: u128 = 1_000_000_000;

/// A native token amount with wei precision (10^-18 ETH).
///
/// # Creating Amounts
///
/// Use the typed constructors for compile-time safety:
///
/// ```
/// use relay_kit::TokenAmount;
///
/// let one_eth = TokenAmount::eth(1);
/// let tip = TokenAmount::gwei(5);
/// let dust = TokenAmount::wei(1);
/// ```
///
/// # Parsing from Strings
///
/// String parsing is available for runtime input:
/// - `"5 ETH"` or `"5 eth"` - whole ETH
/// - `"1.5 ETH"` - decimal ETH
/// - `"500 gwei"` - gwei
/// - `"1000 wei"` - wei
///
/// Raw numbers are NOT accepted to prevent unit confusion.
///
/// ```
/// use relay_kit::TokenAmount;
///
/// let amount: TokenAmount = "0.1 ETH".parse().unwrap();
/// assert_eq!(amount, TokenAmount::gwei(100_000_000));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TokenAmount(u128);

impl TokenAmount {
    /// Zero.
    pub const ZERO: Self = Self(0);
    /// One wei.
    pub const ONE_WEI: Self = Self(1);
    /// One ETH.
    pub const ONE_ETH: Self = Self(WEI_PER_ETH);

    /// Create from whole ETH.
    pub const fn eth(eth: u128) -> Self {
        Self(eth * WEI_PER_ETH)
    }

    /// Create from gwei (10^-9 ETH).
    pub const fn gwei(gwei: u128) -> Self {
        Self(gwei * WEI_PER_GWEI)
    }

    /// Create from wei (10^-18 ETH).
    pub const fn wei(wei: u128) -> Self {
        Self(wei)
    }

    /// Parse from decimal ETH (e.g., "1.5").
    pub fn from_eth_decimal(s: &str) -> Result<Self, ParseAmountError> {
        let s = s.trim();

        if let Some(dot_pos) = s.find('.') {
            let integer_part = &s[..dot_pos];
            let decimal_part = &s[dot_pos + 1..];

            let integer: u128 = if integer_part.is_empty() {
                0
            } else {
                integer_part
                    .parse()
                    .map_err(|_| ParseAmountError::InvalidNumber(s.to_string()))?
            };

            // Parse decimal part (truncate to 18 digits)
            let decimal_str = if decimal_part.len() > 18 {
                &decimal_part[..18]
            } else {
                decimal_part
            };

            let decimal: u128 = if decimal_str.is_empty() {
                0
            } else {
                decimal_str
                    .parse()
                    .map_err(|_| ParseAmountError::InvalidNumber(s.to_string()))?
            };

            // Scale the decimal part
            let decimal_scale = 18 - decimal_str.len();
            let decimal_wei = decimal * 10u128.pow(decimal_scale as u32);

            let total = integer
                .checked_mul(WEI_PER_ETH)
                .and_then(|v| v.checked_add(decimal_wei))
                .ok_or(ParseAmountError::Overflow)?;

            Ok(Self(total))
        } else {
            // Whole ETH
            let eth: u128 = s
                .parse()
                .map_err(|_| ParseAmountError::InvalidNumber(s.to_string()))?;
            eth.checked_mul(WEI_PER_ETH)
                .map(Self)
                .ok_or(ParseAmountError::Overflow)
        }
    }

    /// Get the raw wei value.
    pub const fn as_wei(&self) -> u128 {
        self.0
    }

    /// Get whole ETH (truncated).
    pub const fn as_eth(&self) -> u128 {
        self.0 / WEI_PER_ETH
    }

    /// Checked addition.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Saturating subtraction.
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Check if zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl FromStr for TokenAmount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        // "X ETH" or "X eth"
        if let Some(value) = s.strip_suffix(" ETH").or_else(|| s.strip_suffix(" eth")) {
            return Self::from_eth_decimal(value.trim());
        }

        // "X gwei"
        if let Some(value) = s.strip_suffix(" gwei") {
            let v: u128 = value
                .trim()
                .parse()
                .map_err(|_| ParseAmountError::InvalidNumber(s.to_string()))?;
            return v
                .checked_mul(WEI_PER_GWEI)
                .map(Self)
                .ok_or(ParseAmountError::Overflow);
        }

        // "X wei"
        if let Some(value) = s.strip_suffix(" wei") {
            let v: u128 = value
                .trim()
                .parse()
                .map_err(|_| ParseAmountError::InvalidNumber(s.to_string()))?;
            return Ok(Self(v));
        }

        // Bare number = error (ambiguous)
        if s.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(ParseAmountError::AmbiguousAmount(s.to_string()));
        }

        Err(ParseAmountError::InvalidFormat(s.to_string()))
    }
}

impl TryFrom<&str> for TokenAmount {
    type Error = ParseAmountError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "0 ETH");
        }

        let eth = self.0 / WEI_PER_ETH;
        let remainder = self.0 % WEI_PER_ETH;

        if remainder == 0 {
            write!(f, "{} ETH", eth)
        } else if self.0 % WEI_PER_GWEI == 0 {
            write!(f, "{} gwei", self.0 / WEI_PER_GWEI)
        } else {
            write!(f, "{} wei", self.0)
        }
    }
}

impl Add for TokenAmount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for TokenAmount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        Ok(Self(s.parse().map_err(serde::de::Error::custom)?))
    }
}

impl BorshSerialize for TokenAmount {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.0, writer)
    }
}

impl BorshDeserialize for TokenAmount {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Self(u128::deserialize_reader(reader)?))
    }
}
