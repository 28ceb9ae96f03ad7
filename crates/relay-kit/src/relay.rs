//! The relay point: batch orchestration over named operations.
//!
//! A relayer collects signed operations from clients and submits them in a
//! batch. The relay point resolves each operation's sender and recipient
//! names through its injected [`NameDirectory`], then drives the sender
//! account's verify-and-execute entry point on the ledger. Operations are
//! independent: one failing never rolls back an earlier one and never blocks
//! a later one, and every slot's outcome is reported to the caller.
//!
//! # Example
//!
//! ```rust
//! use relay_kit::{
//!     Address, InMemoryDirectory, Ledger, RelayPoint, SecretKey, TokenAmount, UserOperation,
//! };
//!
//! // Bootstrap: a directory with alice.eth -> her deployed account and
//! // bob.eth -> his key-owned address.
//! let relay_address = Address::from_bytes([100; 32]);
//! let root = Address::from_bytes([9; 32]);
//! let mut directory = InMemoryDirectory::new(root);
//! let resolver = directory.add_resolver();
//! let tld = directory.set_top_name_owner(root, "eth", root).unwrap();
//!
//! let mut ledger = Ledger::new();
//! let alice_key = SecretKey::generate_ed25519();
//! let alice_account = ledger.deploy_account(alice_key.public_key(), relay_address);
//! ledger.deposit(alice_account, TokenAmount::eth(1)).unwrap();
//!
//! let bob_key = SecretKey::generate_ed25519();
//! let bob_address = Address::of_key(&bob_key.public_key());
//!
//! let alice_owner = Address::of_key(&alice_key.public_key());
//! let alice = directory.register(&tld, "alice", alice_owner).unwrap();
//! directory.set_resolver(alice_owner, &alice, resolver).unwrap();
//! directory.set_address(alice_owner, &alice, alice_account).unwrap();
//!
//! let bob = directory.register(&tld, "bob", bob_address).unwrap();
//! directory.set_resolver(bob_address, &bob, resolver).unwrap();
//! directory.set_address(bob_address, &bob, bob_address).unwrap();
//!
//! // Alice signs an operation; the relayer batches it.
//! let relay = RelayPoint::new(relay_address, directory);
//! let op = UserOperation {
//!     sender: alice.clone(),
//!     recipient: bob.clone(),
//!     value: "0.1 ETH".parse().unwrap(),
//!     data: Vec::new(),
//!     sequence: 0,
//! };
//! let signed = op.sign(&alice_key, &alice_account);
//!
//! let outcomes = relay.handle_ops(&mut ledger, &[signed]);
//! assert!(outcomes[0].is_ok());
//! assert_eq!(ledger.balance(&bob_address), "0.1 ETH".parse().unwrap());
//! assert_eq!(ledger.sequence(&alice_account), Some(1));
//! ```

use crate::directory::NameDirectory;
use crate::error::{OpError, ResolveError};
use crate::ledger::Ledger;
use crate::types::{Address, Name, NameNode, SignedOperation, TokenAmount};

/// Record of a successfully executed operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpReceipt {
    /// Resolved sender account address.
    pub sender: Address,
    /// Resolved recipient address.
    pub recipient: Address,
    /// Value transferred.
    pub value: TokenAmount,
    /// The sequence number this operation consumed.
    pub sequence: u64,
}

/// Per-operation outcome of a batch.
pub type OpOutcome = Result<OpReceipt, OpError>;

/// The orchestrator: resolves names and dispatches operations to accounts on
/// behalf of a relayer.
///
/// The directory is injected at construction and treated as read-only;
/// resolution runs freshly for every operation because records may change
/// between submissions.
pub struct RelayPoint<D> {
    address: Address,
    directory: D,
}

impl<D: NameDirectory> RelayPoint<D> {
    /// Create a relay point at `address` resolving through `directory`.
    ///
    /// Accounts must be deployed bound to this same `address` for the relay
    /// point to drive them.
    pub fn new(address: Address, directory: D) -> Self {
        Self { address, directory }
    }

    /// The address accounts must be bound to.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Resolve a name through the directory, outside of execution.
    ///
    /// Lets integrators pre-check resolution without submitting anything.
    pub fn resolve_name(&self, name: &Name) -> Result<Address, ResolveError> {
        self.directory.resolve(name)
    }

    /// Compute a name's node in the name tree.
    pub fn namehash(&self, name: &Name) -> NameNode {
        name.node()
    }

    /// Process a batch of signed operations in order.
    ///
    /// Returns one outcome per input operation, same order. Each operation
    /// is resolved and executed independently: a failure is recorded in its
    /// slot and the batch continues. Nothing here rolls back: an earlier
    /// operation's effects stand even if every later one fails.
    pub fn handle_ops(&self, ledger: &mut Ledger, ops: &[SignedOperation]) -> Vec<OpOutcome> {
        ops.iter()
            .map(|op| {
                let outcome = self.execute_one(ledger, op);
                match &outcome {
                    Ok(receipt) => tracing::debug!(
                        sender = %op.sender(),
                        recipient = %op.recipient(),
                        value = %receipt.value,
                        sequence = receipt.sequence,
                        "operation accepted"
                    ),
                    Err(err) => tracing::warn!(
                        sender = %op.sender(),
                        recipient = %op.recipient(),
                        error = %err,
                        "operation rejected"
                    ),
                }
                outcome
            })
            .collect()
    }

    fn execute_one(&self, ledger: &mut Ledger, op: &SignedOperation) -> OpOutcome {
        let sender = self
            .directory
            .resolve(op.sender())
            .map_err(OpError::SenderResolution)?;
        let recipient = self
            .directory
            .resolve(op.recipient())
            .map_err(OpError::RecipientResolution)?;

        ledger.verify_and_execute(sender, self.address, op, recipient)?;

        Ok(OpReceipt {
            sender,
            recipient,
            value: op.value(),
            sequence: op.sequence(),
        })
    }
}
