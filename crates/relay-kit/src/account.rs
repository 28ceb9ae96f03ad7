//! Single-owner programmable accounts.

use serde::{Deserialize, Serialize};

use crate::error::ExecuteError;
use crate::types::{Address, PublicKey, SignedOperation};

/// A single-owner account: an owner key, an immutable relay-point binding,
/// and a strictly increasing sequence counter.
///
/// The owner and relay point are fixed at deployment and have no mutators.
/// The sequence starts at 0 and advances by exactly 1 each time an operation
/// from this account commits, and only then. An operation whose sequence
/// does not match exactly is rejected, which is both the replay protection
/// and the ordering guarantee: a signed operation is valid at one point in
/// the account's history and nowhere else.
///
/// Accounts live inside a [`Ledger`](crate::Ledger), which owns their
/// balances and drives execution; this type holds the verification rules.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BasicAccount {
    address: Address,
    owner: PublicKey,
    relay_point: Address,
    sequence: u64,
}

impl BasicAccount {
    /// Create a fresh account at sequence 0. Called by the ledger at
    /// deployment.
    pub(crate) fn new(address: Address, owner: PublicKey, relay_point: Address) -> Self {
        Self {
            address,
            owner,
            relay_point,
            sequence: 0,
        }
    }

    /// The address this account is deployed at.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The owner's public key. Immutable.
    pub fn owner(&self) -> &PublicKey {
        &self.owner
    }

    /// The only address allowed to drive this account. Immutable.
    pub fn relay_point(&self) -> Address {
        self.relay_point
    }

    /// The next expected sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Run the verification gauntlet for an operation, without touching any
    /// state.
    ///
    /// Checks in order: the caller must be the bound relay point, the
    /// operation's sequence must equal the current sequence exactly, and the
    /// signature must verify against the owner key over the digest keyed to
    /// this account's address.
    pub fn verify_operation(
        &self,
        caller: Address,
        op: &SignedOperation,
    ) -> Result<(), ExecuteError> {
        if caller != self.relay_point {
            return Err(ExecuteError::UnauthorizedCaller {
                expected: self.relay_point,
                actual: caller,
            });
        }

        if op.sequence() != self.sequence {
            return Err(ExecuteError::InvalidSequence {
                expected: self.sequence,
                got: op.sequence(),
            });
        }

        if !op.verify(&self.address, &self.owner) {
            return Err(ExecuteError::InvalidSignature);
        }

        Ok(())
    }

    /// Consume the current sequence number. Called by the ledger only after
    /// every check and the transfer feasibility test have passed.
    pub(crate) fn advance_sequence(&mut self) {
        self.sequence += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Name, SecretKey, TokenAmount, UserOperation};

    fn operation(sequence: u64) -> UserOperation {
        UserOperation {
            sender: "alice.eth".parse::<Name>().unwrap(),
            recipient: "bob.eth".parse::<Name>().unwrap(),
            value: TokenAmount::gwei(100),
            data: vec![],
            sequence,
        }
    }

    fn account_with_owner() -> (BasicAccount, SecretKey, Address) {
        let owner = SecretKey::generate_ed25519();
        let relay_point = Address::from_bytes([2; 32]);
        let account = BasicAccount::new(
            Address::from_bytes([1; 32]),
            owner.public_key(),
            relay_point,
        );
        (account, owner, relay_point)
    }

    #[test]
    fn test_valid_operation_passes() {
        let (account, owner, relay_point) = account_with_owner();
        let signed = operation(0).sign(&owner, &account.address());
        assert!(account.verify_operation(relay_point, &signed).is_ok());
    }

    #[test]
    fn test_caller_check_comes_first() {
        let (account, owner, _) = account_with_owner();
        let intruder = Address::from_bytes([66; 32]);

        // Even a perfectly valid operation is rejected from the wrong caller.
        let signed = operation(0).sign(&owner, &account.address());
        assert!(matches!(
            account.verify_operation(intruder, &signed),
            Err(ExecuteError::UnauthorizedCaller { .. })
        ));

        // And so is a garbage one: the caller check wins.
        let wrong_key = SecretKey::generate_ed25519();
        let signed = operation(7).sign(&wrong_key, &account.address());
        assert!(matches!(
            account.verify_operation(intruder, &signed),
            Err(ExecuteError::UnauthorizedCaller { .. })
        ));
    }

    #[test]
    fn test_sequence_must_match_exactly() {
        let (account, owner, relay_point) = account_with_owner();

        // Account is at 0: a future sequence is rejected, not queued.
        let signed = operation(1).sign(&owner, &account.address());
        assert_eq!(
            account.verify_operation(relay_point, &signed),
            Err(ExecuteError::InvalidSequence {
                expected: 0,
                got: 1
            })
        );

        let signed = operation(0).sign(&owner, &account.address());
        assert!(account.verify_operation(relay_point, &signed).is_ok());
    }

    #[test]
    fn test_signature_from_non_owner_rejected() {
        let (account, _, relay_point) = account_with_owner();
        let mallory = SecretKey::generate_ed25519();

        let signed = operation(0).sign(&mallory, &account.address());
        assert_eq!(
            account.verify_operation(relay_point, &signed),
            Err(ExecuteError::InvalidSignature)
        );
    }

    #[test]
    fn test_signature_for_other_account_rejected() {
        // Domain binding: a signature for account A replayed against
        // account B fails B's verification.
        let (account_a, owner, relay_point) = account_with_owner();
        let account_b = BasicAccount::new(
            Address::from_bytes([3; 32]),
            owner.public_key(),
            relay_point,
        );

        let signed = operation(0).sign(&owner, &account_a.address());
        assert!(account_a.verify_operation(relay_point, &signed).is_ok());
        assert_eq!(
            account_b.verify_operation(relay_point, &signed),
            Err(ExecuteError::InvalidSignature)
        );
    }
}
