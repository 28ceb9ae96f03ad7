//! Ledger address type.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseAddressError;
use crate::types::{CryptoHash, PublicKey};

/// An opaque 32-byte ledger address.
///
/// Every balance on the ledger is held under an address: key-owned balances
/// live at the address derived from the holder's public key
/// ([`Address::of_key`]), deployed accounts live at addresses the ledger
/// derives at deployment time.
///
/// The text form is `0x`-prefixed lowercase hex.
///
/// # Examples
///
/// ```
/// use relay_kit::{Address, SecretKey};
///
/// let key = SecretKey::generate_ed25519();
/// let addr = Address::of_key(&key.public_key());
/// assert!(!addr.is_zero());
///
/// let parsed: Address = addr.to_string().parse().unwrap();
/// assert_eq!(parsed, addr);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; 32]);

impl Address {
    /// The zero address. Never a valid resolution target.
    pub const ZERO: Self = Self([0; 32]);

    /// Create from raw 32 bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The address of a key-owned balance: a digest of the public key.
    pub fn of_key(public_key: &PublicKey) -> Self {
        let bytes = borsh::to_vec(public_key).expect("key serialization should never fail");
        Self(*CryptoHash::hash(&bytes).as_bytes())
    }

    /// Get the raw 32 bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .ok_or_else(|| ParseAddressError::MissingPrefix(s.to_string()))?;

        let bytes = hex::decode(hex_part).map_err(|e| ParseAddressError::InvalidHex(e.to_string()))?;

        if bytes.len() != 32 {
            return Err(ParseAddressError::InvalidLength(bytes.len()));
        }

        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl TryFrom<&str> for Address {
    type Error = ParseAddressError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl BorshSerialize for Address {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&self.0)
    }
}

impl BorshDeserialize for Address {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut bytes = [0u8; 32];
        reader.read_exact(&mut bytes)?;
        Ok(Self(bytes))
    }
}
