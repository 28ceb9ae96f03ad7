//! The execution substrate: balances, deployed accounts, and the atomic
//! verify-and-execute transition.
//!
//! One [`Ledger`] owns all native balances and every deployed
//! [`BasicAccount`]. Calls run to completion one at a time: there is no
//! internal threading and no locking, and nothing outside the ledger can
//! mutate account state. Races between relayers targeting the same account
//! are settled by whichever operation reaches the sequence check first; the
//! loser gets [`ExecuteError::InvalidSequence`] and must re-sign with the
//! updated sequence.

use std::collections::HashMap;

use crate::account::BasicAccount;
use crate::error::ExecuteError;
use crate::types::{Address, CryptoHash, PublicKey, SignedOperation, TokenAmount};

/// Single-threaded owner of all native balances and deployed accounts.
#[derive(Default)]
pub struct Ledger {
    balances: HashMap<Address, TokenAmount>,
    accounts: HashMap<Address, BasicAccount>,
    deployed: u64,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// The native balance held at an address. Unknown addresses hold zero.
    pub fn balance(&self, address: &Address) -> TokenAmount {
        self.balances
            .get(address)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Credit an address with native value.
    pub fn deposit(&mut self, address: Address, amount: TokenAmount) -> Result<(), ExecuteError> {
        let credited = self
            .balance(&address)
            .checked_add(amount)
            .ok_or(ExecuteError::BalanceOverflow)?;
        self.balances.insert(address, credited);
        tracing::debug!(address = %address, amount = %amount, "deposit");
        Ok(())
    }

    /// Deploy a new [`BasicAccount`] bound to `relay_point`, owned by the
    /// holder of `owner`.
    ///
    /// The account address is derived deterministically from the owner key,
    /// the relay point, and a deployment counter, so repeated deployments
    /// never collide. The account starts at sequence 0 with a zero balance.
    pub fn deploy_account(&mut self, owner: PublicKey, relay_point: Address) -> Address {
        let mut seed =
            borsh::to_vec(&owner).expect("key serialization should never fail");
        seed.extend_from_slice(relay_point.as_bytes());
        seed.extend_from_slice(&self.deployed.to_le_bytes());
        let address = Address::from_bytes(*CryptoHash::hash(&seed).as_bytes());

        self.accounts
            .insert(address, BasicAccount::new(address, owner, relay_point));
        self.deployed += 1;
        tracing::debug!(address = %address, relay_point = %relay_point, "account deployed");
        address
    }

    /// The account deployed at an address, if any.
    pub fn account(&self, address: &Address) -> Option<&BasicAccount> {
        self.accounts.get(address)
    }

    /// The next expected sequence number of the account at an address.
    ///
    /// Clients read this to fill in the `sequence` field of their next
    /// operation.
    pub fn sequence(&self, address: &Address) -> Option<u64> {
        self.accounts.get(address).map(|a| a.sequence())
    }

    /// Verify an operation against the account at `sender` and, if every
    /// check passes, execute its transfer to `recipient`.
    ///
    /// This is one atomic state transition: the caller, sequence, and
    /// signature checks run first, then both post-transfer balances are
    /// computed with checked arithmetic, and only if all of that succeeds
    /// are the sequence increment and the two balance writes committed.
    /// A failed transfer therefore never consumes the sequence number, and
    /// the owner's signature stays valid for a retry after funding.
    pub fn verify_and_execute(
        &mut self,
        sender: Address,
        caller: Address,
        op: &SignedOperation,
        recipient: Address,
    ) -> Result<(), ExecuteError> {
        let account = self
            .accounts
            .get_mut(&sender)
            .ok_or(ExecuteError::UnknownAccount(sender))?;
        account.verify_operation(caller, op)?;

        let value = op.value();
        let available = self
            .balances
            .get(&sender)
            .copied()
            .unwrap_or(TokenAmount::ZERO);
        let debited = available
            .checked_sub(value)
            .ok_or(ExecuteError::InsufficientBalance {
                required: value,
                available,
            })?;
        let credited = self
            .balances
            .get(&recipient)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
            .checked_add(value)
            .ok_or(ExecuteError::BalanceOverflow)?;

        // Every check has passed; commit the transition as one unit.
        account.advance_sequence();
        if sender != recipient {
            self.balances.insert(sender, debited);
            self.balances.insert(recipient, credited);
        }

        tracing::debug!(
            sender = %sender,
            recipient = %recipient,
            value = %value,
            sequence = op.sequence(),
            "operation executed"
        );
        Ok(())
    }
}
