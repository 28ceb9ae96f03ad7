//! A name-resolving meta-transaction relay with single-owner smart accounts.
//!
//! **relay-kit** lets a third-party relayer submit batches of pre-signed
//! operations on behalf of account owners. Each operation executes only if
//! it carries a valid owner signature, matches the account's expected
//! sequence number, and its human-readable sender/recipient names resolve
//! through the injected name directory. Each operation's failure is
//! isolated from the rest of the batch.
//!
//! # Quick Start
//!
//! ```rust
//! use relay_kit::*;
//!
//! // A ledger, a relay point address, and a name directory.
//! let relay_address = Address::from_bytes([100; 32]);
//! let root = Address::from_bytes([9; 32]);
//! let mut directory = InMemoryDirectory::new(root);
//! let resolver = directory.add_resolver();
//! let tld = directory.set_top_name_owner(root, "eth", root).unwrap();
//!
//! // Alice deploys an account bound to the relay point and funds it.
//! let mut ledger = Ledger::new();
//! let alice_key = SecretKey::generate_ed25519();
//! let alice_account = ledger.deploy_account(alice_key.public_key(), relay_address);
//! ledger.deposit(alice_account, TokenAmount::eth(1)).unwrap();
//!
//! // Register alice.eth -> her account and bob.eth -> his address.
//! let alice_owner = Address::of_key(&alice_key.public_key());
//! let alice = directory.register(&tld, "alice", alice_owner).unwrap();
//! directory.set_resolver(alice_owner, &alice, resolver).unwrap();
//! directory.set_address(alice_owner, &alice, alice_account).unwrap();
//!
//! let bob_address = Address::from_bytes([7; 32]);
//! let bob = directory.register(&tld, "bob", bob_address).unwrap();
//! directory.set_resolver(bob_address, &bob, resolver).unwrap();
//! directory.set_address(bob_address, &bob, bob_address).unwrap();
//!
//! // Alice signs an operation once; a relayer submits it.
//! let relay = RelayPoint::new(relay_address, directory);
//! let signed = UserOperation {
//!     sender: alice,
//!     recipient: bob,
//!     value: "0.1 ETH".parse().unwrap(),
//!     data: Vec::new(),
//!     sequence: 0,
//! }
//! .sign(&alice_key, &alice_account);
//!
//! let outcomes = relay.handle_ops(&mut ledger, &[signed]);
//! assert!(outcomes[0].is_ok());
//! assert_eq!(ledger.balance(&bob_address), TokenAmount::gwei(100_000_000));
//! ```
//!
//! # Design Principles
//!
//! 1. **Signatures bind names, not addresses**: resolution happens at
//!    execution time, so re-pointing a name redirects future operations but
//!    can never alter the meaning of an already-signed one
//! 2. **Exact sequence matching**: an operation is valid at one point in an
//!    account's history; replay and reordering fail structurally
//! 3. **Per-operation isolation**: a batch reports one outcome per slot and
//!    never unwinds; independent operations stay independent
//! 4. **Injected resolution**: the relay point is handed its
//!    [`NameDirectory`] at construction, so tests substitute a
//!    deterministic one
//! 5. **Atomic execution**: sequence increment and transfer commit together
//!    or not at all; a failed transfer never burns a sequence number
//!
//! # Core Types
//!
//! - [`Name`] - Validated hierarchical name ("alice.eth")
//! - [`Address`] - 32-byte ledger address
//! - [`TokenAmount`] - Native value with wei precision
//! - [`UserOperation`], [`SignedOperation`] - The signed intent
//! - [`PublicKey`], [`SecretKey`], [`Signature`] - Cryptographic keys
//! - [`Ledger`], [`BasicAccount`] - Execution substrate
//! - [`RelayPoint`] - Batch orchestrator
//!
//! # String Parsing
//!
//! Many types support parsing from human-readable strings:
//!
//! ```
//! use relay_kit::{Address, Name, TokenAmount};
//!
//! let amount: TokenAmount = "5 ETH".parse().unwrap();
//! let name: Name = "alice.eth".parse().unwrap();
//! ```

pub mod account;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod relay;
pub mod signer;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{
    DirectoryError, Error, ExecuteError, OpError, ParseAddressError, ParseAmountError,
    ParseHashError, ParseKeyError, ParseNameError, ResolveError, SignerError,
};
pub use types::*;

// Re-export component types
pub use account::BasicAccount;
pub use directory::{InMemoryDirectory, NameDirectory, ResolverId};
pub use ledger::Ledger;
pub use relay::{OpOutcome, OpReceipt, RelayPoint};
pub use signer::{InMemorySigner, Signer};
