//! Error types for relay-kit.
//!
//! This module provides comprehensive error types for all relay-kit operations.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) — Main error type, returned by most operations
//!   - [`ResolveError`] — Name resolution failures (no resolver, no record)
//!   - [`ExecuteError`] — Operation execution failures (caller, sequence,
//!     signature, transfer)
//!   - [`OpError`] — Per-operation outcome inside a batch
//!   - [`DirectoryError`] — Directory bookkeeping failures
//!   - [`ParseNameError`] — Invalid name format
//!   - [`ParseAddressError`] — Invalid address format
//!   - [`ParseAmountError`] — Invalid token amount format
//!   - [`ParseKeyError`] — Invalid key format
//!   - [`SignerError`] — Signing operation failures
//!
//! # Error Handling Examples
//!
//! ## Pattern Matching on Batch Outcomes
//!
//! ```rust
//! use relay_kit::{OpError, ExecuteError, OpOutcome};
//!
//! fn describe(outcome: &OpOutcome) -> &'static str {
//!     match outcome {
//!         Ok(_) => "executed",
//!         Err(OpError::Execute(ExecuteError::InvalidSequence { .. })) => "stale sequence",
//!         Err(_) => "rejected",
//!     }
//! }
//! ```
//!
//! ## Checking Retryable Errors
//!
//! ```rust
//! use relay_kit::OpError;
//!
//! fn should_resubmit(err: &OpError) -> bool {
//!     err.is_retryable()
//! }
//! ```

use thiserror::Error;

use crate::types::{Address, Name, TokenAmount};

/// Error parsing a name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseNameError {
    #[error("Name is empty")]
    Empty,

    #[error("Name '{0}' is too long (max 255 characters)")]
    TooLong(String),

    #[error("Name '{0}' contains invalid character '{1}'")]
    InvalidChar(String, char),

    #[error("Name '{0}' has invalid format")]
    InvalidFormat(String),
}

/// Error parsing an address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("Address '{0}' is missing the '0x' prefix")]
    MissingPrefix(String),

    #[error("Invalid hex encoding: {0}")]
    InvalidHex(String),

    #[error("Invalid address length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Error parsing a crypto hash.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseHashError {
    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    #[error("Invalid hash length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Error parsing a token amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("Ambiguous amount '{0}'. Use explicit units like '5 ETH' or '1000 wei'")]
    AmbiguousAmount(String),

    #[error("Invalid amount format: '{0}'")]
    InvalidFormat(String),

    #[error("Invalid number in amount: '{0}'")]
    InvalidNumber(String),

    #[error("Amount overflow: value too large")]
    Overflow,
}

/// Error parsing a public or secret key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Invalid key format: expected 'ed25519:...' or 'secp256k1:...'")]
    InvalidFormat,

    #[error("Unknown key type: '{0}'")]
    UnknownKeyType(String),

    #[error("Invalid base58 encoding: {0}")]
    InvalidBase58(String),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid curve point: key bytes do not represent a valid point on the curve")]
    InvalidCurvePoint,
}

/// Error during signing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("Invalid seed phrase")]
    InvalidSeedPhrase,

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),
}

// ============================================================================
// Resolution Errors
// ============================================================================

/// Error resolving a name to an address.
///
/// A name resolves through two levels: the registry must point the name at a
/// resolver, and that resolver must hold a non-zero address record for the
/// name. A missing link at either level is an error, never a default
/// address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Name '{0}' has no resolver configured")]
    NoResolver(Name),

    #[error("Name '{0}' has no address record")]
    NoRecord(Name),

    #[error("Name '{0}' resolves to the zero address")]
    ZeroRecord(Name),
}

/// Error mutating directory bookkeeping.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Caller {caller} is not authorized to modify '{name}'")]
    NotAuthorized { name: String, caller: Address },

    #[error("Name '{0}' is not registered")]
    UnknownName(Name),

    #[error("Resolver {0} does not exist")]
    UnknownResolver(u32),

    #[error("Name '{0}' has no resolver to write records into")]
    NoResolver(Name),

    #[error("Name '{0}' is already registered")]
    AlreadyRegistered(Name),

    #[error("Invalid label: {0}")]
    InvalidLabel(#[from] ParseNameError),
}

// ============================================================================
// Execution Errors
// ============================================================================

/// Error executing an operation against an account.
///
/// Any of these leaves the account and ledger exactly as they were: the
/// sequence number is only consumed when the whole operation commits.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecuteError {
    #[error("No account deployed at {0}")]
    UnknownAccount(Address),

    #[error("Caller {actual} is not the bound relay point {expected}")]
    UnauthorizedCaller { expected: Address, actual: Address },

    #[error("Invalid sequence: operation carries {got}, account expects {expected}")]
    InvalidSequence { expected: u64, got: u64 },

    #[error("Signature does not verify against the account owner")]
    InvalidSignature,

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        required: TokenAmount,
        available: TokenAmount,
    },

    #[error("Balance overflow on recipient")]
    BalanceOverflow,
}

impl ExecuteError {
    /// Check if this error is retryable.
    ///
    /// A stale sequence is retryable once the client refetches the current
    /// sequence and re-signs; an underfunded transfer is retryable after
    /// funding, with the same signature. A bad signature or a wrong caller
    /// never becomes valid by retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExecuteError::InvalidSequence { .. } | ExecuteError::InsufficientBalance { .. }
        )
    }
}

/// Per-operation outcome error inside a batch.
///
/// Distinguishes which resolution failed so a relayer can attribute the
/// failure without re-resolving anything.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OpError {
    #[error("Sender name resolution failed: {0}")]
    SenderResolution(#[source] ResolveError),

    #[error("Recipient name resolution failed: {0}")]
    RecipientResolution(#[source] ResolveError),

    #[error(transparent)]
    Execute(#[from] ExecuteError),
}

impl OpError {
    /// Check if the operation could succeed on resubmission.
    ///
    /// Resolution failures are not retryable until the registry changes.
    pub fn is_retryable(&self) -> bool {
        match self {
            OpError::SenderResolution(_) | OpError::RecipientResolution(_) => false,
            OpError::Execute(e) => e.is_retryable(),
        }
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for relay-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Parsing ───
    #[error(transparent)]
    ParseName(#[from] ParseNameError),

    #[error(transparent)]
    ParseAddress(#[from] ParseAddressError),

    #[error(transparent)]
    ParseHash(#[from] ParseHashError),

    #[error(transparent)]
    ParseAmount(#[from] ParseAmountError),

    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),

    // ─── Resolution ───
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    // ─── Execution ───
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    Operation(#[from] OpError),

    // ─── Signing ───
    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    // ─── Serialization ───
    #[error("Invalid operation encoding: {0}")]
    InvalidOperation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_error_display() {
        assert_eq!(ParseNameError::Empty.to_string(), "Name is empty");
        assert_eq!(
            ParseNameError::InvalidChar("Alice.eth".to_string(), 'A').to_string(),
            "Name 'Alice.eth' contains invalid character 'A'"
        );
        assert_eq!(
            ParseNameError::InvalidFormat("bad..name".to_string()).to_string(),
            "Name 'bad..name' has invalid format"
        );
    }

    #[test]
    fn test_execute_error_is_retryable() {
        assert!(
            ExecuteError::InvalidSequence {
                expected: 3,
                got: 2
            }
            .is_retryable()
        );
        assert!(
            ExecuteError::InsufficientBalance {
                required: TokenAmount::eth(1),
                available: TokenAmount::ZERO,
            }
            .is_retryable()
        );

        assert!(!ExecuteError::InvalidSignature.is_retryable());
        assert!(!ExecuteError::UnknownAccount(Address::ZERO).is_retryable());
        assert!(
            !ExecuteError::UnauthorizedCaller {
                expected: Address::ZERO,
                actual: Address::ZERO,
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_op_error_is_retryable() {
        let name: Name = "ghost.eth".parse().unwrap();
        assert!(!OpError::SenderResolution(ResolveError::NoRecord(name.clone())).is_retryable());
        assert!(!OpError::RecipientResolution(ResolveError::NoResolver(name)).is_retryable());
        assert!(
            OpError::Execute(ExecuteError::InvalidSequence {
                expected: 1,
                got: 0
            })
            .is_retryable()
        );
        assert!(!OpError::Execute(ExecuteError::InvalidSignature).is_retryable());
    }

    #[test]
    fn test_resolve_error_display() {
        let name: Name = "ghost.eth".parse().unwrap();
        assert_eq!(
            ResolveError::NoResolver(name.clone()).to_string(),
            "Name 'ghost.eth' has no resolver configured"
        );
        assert_eq!(
            ResolveError::NoRecord(name.clone()).to_string(),
            "Name 'ghost.eth' has no address record"
        );
        assert_eq!(
            ResolveError::ZeroRecord(name).to_string(),
            "Name 'ghost.eth' resolves to the zero address"
        );
    }

    #[test]
    fn test_execute_error_display() {
        let err = ExecuteError::InvalidSequence {
            expected: 5,
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid sequence: operation carries 3, account expects 5"
        );

        let err = ExecuteError::InsufficientBalance {
            required: TokenAmount::eth(1),
            available: TokenAmount::ZERO,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: required 1 ETH, available 0 ETH"
        );
    }

    #[test]
    fn test_error_from_conversions() {
        let err: Error = ParseNameError::Empty.into();
        assert!(matches!(err, Error::ParseName(_)));

        let err: Error = ExecuteError::InvalidSignature.into();
        assert!(matches!(err, Error::Execute(_)));

        let name: Name = "ghost.eth".parse().unwrap();
        let err: Error = ResolveError::NoRecord(name).into();
        assert!(matches!(err, Error::Resolve(_)));

        let err: Error = SignerError::InvalidSeedPhrase.into();
        assert!(matches!(err, Error::Signing(_)));
    }
}
