//! User operations and their signing schema.
//!
//! A [`UserOperation`] is a signed instruction to move native value from a
//! named sender account to a named recipient. The owner signs it once,
//! client-side, over a fixed typed schema; a relayer later submits it without
//! being able to alter any field.
//!
//! # Signing schema
//!
//! The signed digest is reconstructed identically by signer and verifier:
//!
//! 1. Serialize [`USER_OPERATION_SIGN_PREFIX`] as little-endian u32
//! 2. Serialize the domain (`"UserOperation"`, `"1"`, sender account address)
//!    as Borsh
//! 3. Serialize the operation fields (sender, recipient, value, data,
//!    sequence) as Borsh
//! 4. Concatenate and hash with SHA-256
//!
//! The domain commits to the sender account's *address*, so a signature is
//! valid for exactly one account. The fields commit to the *name strings*:
//! re-pointing a name in the directory never alters the meaning of an
//! already-signed operation.
//!
//! # Example
//!
//! ```rust
//! use relay_kit::{Address, SecretKey, TokenAmount, UserOperation};
//!
//! let key = SecretKey::generate_ed25519();
//! let account = Address::from_bytes([1; 32]);
//!
//! let op = UserOperation {
//!     sender: "alice.eth".parse().unwrap(),
//!     recipient: "bob.eth".parse().unwrap(),
//!     value: TokenAmount::gwei(100_000_000),
//!     data: Vec::new(),
//!     sequence: 0,
//! };
//!
//! let signed = op.sign(&key, &account);
//! assert!(signed.verify(&account, &key.public_key()));
//! ```

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{Address, CryptoHash, Name, PublicKey, SecretKey, Signature, TokenAmount};

/// Signing tag prefix: 2^30 + 4337 = 1073746161.
///
/// Prepended to the signing payload so operation digests can never collide
/// with any other signed payload kind.
pub const USER_OPERATION_SIGN_PREFIX: u32 = (1 << 30) + 4337;

/// Domain name the signature is bound under.
pub const OPERATION_DOMAIN_NAME: &str = "UserOperation";

/// Domain version the signature is bound under.
pub const OPERATION_DOMAIN_VERSION: &str = "1";

/// Signing domain for Borsh serialization.
///
/// Fields are serialized in this order:
/// 1. name: string - Always "UserOperation"
/// 2. version: string - Always "1"
/// 3. account: 32 bytes - The sender account address the signature is for
#[derive(BorshSerialize)]
struct OperationDomain {
    name: String,
    version: String,
    account: Address,
}

/// An unsigned operation: move `value` from the account behind `sender` to
/// whatever address `recipient` resolves to at execution time.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct UserOperation {
    /// Name of the sending account.
    pub sender: Name,
    /// Name of the recipient.
    pub recipient: Name,
    /// Native value to transfer.
    pub value: TokenAmount,
    /// Opaque payload, signature-bound but not executed.
    pub data: Vec<u8>,
    /// The sender account's expected current sequence number.
    pub sequence: u64,
}

impl UserOperation {
    /// Compute the digest this operation is signed over, for the given
    /// sender account address.
    pub fn signing_digest(&self, account: &Address) -> CryptoHash {
        let domain = OperationDomain {
            name: OPERATION_DOMAIN_NAME.to_string(),
            version: OPERATION_DOMAIN_VERSION.to_string(),
            account: *account,
        };

        let mut buf = Vec::new();
        buf.extend_from_slice(&USER_OPERATION_SIGN_PREFIX.to_le_bytes());
        buf.extend_from_slice(
            &borsh::to_vec(&domain).expect("domain serialization should never fail"),
        );
        buf.extend_from_slice(&borsh::to_vec(self).expect("operation serialization should never fail"));

        CryptoHash::hash(&buf)
    }

    /// Sign this operation for the given sender account address.
    pub fn sign(self, key: &SecretKey, account: &Address) -> SignedOperation {
        let digest = self.signing_digest(account);
        let signature = key.sign(digest.as_bytes());
        SignedOperation {
            operation: self,
            signature,
        }
    }
}

/// A signed operation ready for relay submission.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct SignedOperation {
    /// The unsigned operation.
    pub operation: UserOperation,
    /// The owner's signature over the signing digest.
    pub signature: Signature,
}

impl SignedOperation {
    /// Verify the signature for the given sender account address and owner
    /// key.
    ///
    /// Reconstructs the signing digest from the operation's own fields, so
    /// any tampering invalidates the signature.
    pub fn verify(&self, account: &Address, owner: &PublicKey) -> bool {
        let digest = self.operation.signing_digest(account);
        self.signature.verify(digest.as_bytes(), owner)
    }

    /// Name of the sending account.
    pub fn sender(&self) -> &Name {
        &self.operation.sender
    }

    /// Name of the recipient.
    pub fn recipient(&self) -> &Name {
        &self.operation.recipient
    }

    /// Native value to transfer.
    pub fn value(&self) -> TokenAmount {
        self.operation.value
    }

    /// Opaque payload.
    pub fn data(&self) -> &[u8] {
        &self.operation.data
    }

    /// The sequence number this operation consumes.
    pub fn sequence(&self) -> u64 {
        self.operation.sequence
    }

    /// Serialize to bytes for transport to a relayer.
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("signed operation serialization should never fail")
    }

    /// Serialize to base64 for transport over a text channel.
    pub fn to_base64(&self) -> String {
        use base64::{Engine as _, engine::general_purpose::STANDARD};
        STANDARD.encode(self.to_bytes())
    }

    /// Deserialize from bytes.
    ///
    /// Use this to reconstruct an operation that was serialized with
    /// [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        borsh::from_slice(bytes).map_err(|e| {
            Error::InvalidOperation(format!("Failed to deserialize signed operation: {}", e))
        })
    }

    /// Deserialize from base64.
    ///
    /// Use this to reconstruct an operation that was serialized with
    /// [`to_base64`](Self::to_base64).
    pub fn from_base64(s: &str) -> Result<Self, Error> {
        use base64::{Engine as _, engine::general_purpose::STANDARD};
        let bytes = STANDARD
            .decode(s)
            .map_err(|e| Error::InvalidOperation(format!("Invalid base64: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}
