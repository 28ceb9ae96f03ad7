//! Signer trait and implementations.
//!
//! A `Signer` holds the owner's key material and produces signed operations.
//! This is the client side of the relay flow: the owner signs once, off any
//! execution path, and hands the result to a relayer.
//!
//! # Example
//!
//! ```rust
//! use relay_kit::{Address, InMemorySigner, SecretKey, Signer, TokenAmount, UserOperation};
//!
//! let key = SecretKey::generate_ed25519();
//! let account = Address::from_bytes([1; 32]);
//! let signer = InMemorySigner::new(key);
//!
//! let op = UserOperation {
//!     sender: "alice.eth".parse().unwrap(),
//!     recipient: "bob.eth".parse().unwrap(),
//!     value: TokenAmount::gwei(100),
//!     data: Vec::new(),
//!     sequence: 0,
//! };
//!
//! let signed = signer.sign_operation(op, account).unwrap();
//! assert!(signed.verify(&account, &signer.public_key()));
//! ```

use crate::error::{ParseKeyError, SignerError};
use crate::types::{Address, PublicKey, SecretKey, SignedOperation, UserOperation};

/// Trait for signing operations.
///
/// Implementations hold the owner's key however they like (in memory, in an
/// HSM, behind a remote API) and produce signatures over the operation
/// signing schema for a given account address.
pub trait Signer {
    /// The public key signatures will verify against.
    fn public_key(&self) -> PublicKey;

    /// Sign an operation for the given sender account address.
    fn sign_operation(
        &self,
        operation: UserOperation,
        account: Address,
    ) -> Result<SignedOperation, SignerError>;
}

/// A signer holding a single secret key in memory.
pub struct InMemorySigner {
    secret_key: SecretKey,
}

impl InMemorySigner {
    /// Create from a secret key.
    pub fn new(secret_key: SecretKey) -> Self {
        Self { secret_key }
    }

    /// Create from a key string (e.g., `"ed25519:..."`).
    pub fn from_key_str(s: &str) -> Result<Self, ParseKeyError> {
        Ok(Self {
            secret_key: s.parse()?,
        })
    }

    /// Create from a BIP-39 seed phrase using the default HD path.
    pub fn from_seed_phrase(phrase: &str) -> Result<Self, SignerError> {
        Ok(Self {
            secret_key: SecretKey::from_seed_phrase(phrase)?,
        })
    }

    /// The underlying secret key.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }
}

impl Signer for InMemorySigner {
    fn public_key(&self) -> PublicKey {
        self.secret_key.public_key()
    }

    fn sign_operation(
        &self,
        operation: UserOperation,
        account: Address,
    ) -> Result<SignedOperation, SignerError> {
        Ok(operation.sign(&self.secret_key, &account))
    }
}
