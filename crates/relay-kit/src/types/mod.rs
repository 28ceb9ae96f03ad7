//! Core types for relay-kit.
//!
//! Hand-rolled types for names, addresses, keys, amounts and operations,
//! designed for ergonomic use in client and relayer code.

mod address;
mod hash;
mod key;
mod name;
mod operation;
mod units;

pub use address::Address;
pub use hash::CryptoHash;
pub use key::{DEFAULT_HD_PATH, KeyType, PublicKey, SecretKey, Signature, generate_seed_phrase};
pub use name::{Name, NameNode};
pub use operation::{
    OPERATION_DOMAIN_NAME, OPERATION_DOMAIN_VERSION, SignedOperation, USER_OPERATION_SIGN_PREFIX,
    UserOperation,
};
pub use units::TokenAmount;
