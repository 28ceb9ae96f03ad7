//! End-to-end relay scenarios: directory bootstrap, signing, batching, and
//! the failure isolation contract.

use std::cell::RefCell;
use std::rc::Rc;

use relay_kit::{
    Address, ExecuteError, InMemoryDirectory, InMemorySigner, Ledger, Name, OpError, RelayPoint,
    SecretKey, SignedOperation, Signer, TokenAmount, UserOperation,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The full bootstrap: a directory with an "eth" top-level name, a funded
/// account for alice behind alice.eth, and bob.eth pointing at bob's
/// key-owned address.
struct World {
    relay: RelayPoint<Rc<RefCell<InMemoryDirectory>>>,
    directory: Rc<RefCell<InMemoryDirectory>>,
    ledger: Ledger,
    tld: Name,
    alice: Name,
    alice_key: SecretKey,
    alice_owner: Address,
    alice_account: Address,
    bob: Name,
    bob_address: Address,
}

fn bootstrap() -> World {
    init_tracing();

    let relay_address = Address::from_bytes([100; 32]);
    let root = Address::from_bytes([9; 32]);

    // Registry, registrar and resolver bootstrap.
    let mut directory = InMemoryDirectory::new(root);
    let resolver = directory.add_resolver();
    let tld = directory.set_top_name_owner(root, "eth", root).unwrap();

    let mut ledger = Ledger::new();

    // Alice: a deployed account bound to the relay point, funded with 1 ETH.
    let alice_key = SecretKey::generate_ed25519();
    let alice_owner = Address::of_key(&alice_key.public_key());
    let alice_account = ledger.deploy_account(alice_key.public_key(), relay_address);
    ledger.deposit(alice_account, TokenAmount::eth(1)).unwrap();

    // Bob: a plain key-owned address.
    let bob_key = SecretKey::generate_ed25519();
    let bob_address = Address::of_key(&bob_key.public_key());

    // First-come-first-served registration, then each owner wires up their
    // own resolver record.
    let alice = directory.register(&tld, "alice", alice_owner).unwrap();
    directory.set_resolver(alice_owner, &alice, resolver).unwrap();
    directory
        .set_address(alice_owner, &alice, alice_account)
        .unwrap();

    let bob = directory.register(&tld, "bob", bob_address).unwrap();
    directory.set_resolver(bob_address, &bob, resolver).unwrap();
    directory.set_address(bob_address, &bob, bob_address).unwrap();

    let directory = Rc::new(RefCell::new(directory));
    World {
        relay: RelayPoint::new(relay_address, Rc::clone(&directory)),
        directory,
        ledger,
        tld,
        alice,
        alice_key,
        alice_owner,
        alice_account,
        bob,
        bob_address,
    }
}

fn transfer_op(world: &World, sequence: u64, value: TokenAmount) -> SignedOperation {
    UserOperation {
        sender: world.alice.clone(),
        recipient: world.bob.clone(),
        value,
        data: Vec::new(),
        sequence,
    }
    .sign(&world.alice_key, &world.alice_account)
}

#[test]
fn transfer_between_named_accounts() {
    let mut world = bootstrap();

    // Pre-checks, independent of any transfer.
    assert_eq!(
        world.relay.resolve_name(&world.alice).unwrap(),
        world.alice_account
    );
    assert_eq!(
        world.relay.resolve_name(&world.bob).unwrap(),
        world.bob_address
    );
    assert_eq!(
        world.relay.namehash(&world.alice),
        world.alice.node()
    );

    // The client reads the account's sequence, builds and signs.
    let sequence = world.ledger.sequence(&world.alice_account).unwrap();
    let signed = transfer_op(&world, sequence, "0.1 ETH".parse().unwrap());

    let outcomes = world.relay.handle_ops(&mut world.ledger, &[signed]);
    assert_eq!(outcomes.len(), 1);
    let receipt = outcomes[0].as_ref().unwrap();
    assert_eq!(receipt.sender, world.alice_account);
    assert_eq!(receipt.recipient, world.bob_address);
    assert_eq!(receipt.value, "0.1 ETH".parse().unwrap());

    assert_eq!(
        world.ledger.balance(&world.alice_account),
        "0.9 ETH".parse().unwrap()
    );
    assert_eq!(
        world.ledger.balance(&world.bob_address),
        "0.1 ETH".parse().unwrap()
    );
    assert_eq!(world.ledger.sequence(&world.alice_account), Some(1));
}

#[test]
fn replayed_operation_is_rejected() {
    let mut world = bootstrap();
    let signed = transfer_op(&world, 0, TokenAmount::gwei(1));

    let outcomes = world
        .relay
        .handle_ops(&mut world.ledger, &[signed.clone(), signed]);
    assert!(outcomes[0].is_ok());
    assert_eq!(
        outcomes[1],
        Err(OpError::Execute(ExecuteError::InvalidSequence {
            expected: 1,
            got: 0
        }))
    );

    // Exactly one transfer happened.
    assert_eq!(world.ledger.balance(&world.bob_address), TokenAmount::gwei(1));
    assert_eq!(world.ledger.sequence(&world.alice_account), Some(1));
}

#[test]
fn signature_does_not_transfer_between_accounts() {
    let mut world = bootstrap();

    // Alice deploys a second account and points alice.eth at it. An
    // operation signed for the first account must not authorize the second.
    let relay_address = world.relay.address();
    let second_account = world
        .ledger
        .deploy_account(world.alice_key.public_key(), relay_address);
    world
        .ledger
        .deposit(second_account, TokenAmount::eth(1))
        .unwrap();

    let signed_for_first = transfer_op(&world, 0, TokenAmount::gwei(1));

    world
        .directory
        .borrow_mut()
        .set_address(world.alice_owner, &world.alice, second_account)
        .unwrap();

    let outcomes = world
        .relay
        .handle_ops(&mut world.ledger, &[signed_for_first]);
    assert_eq!(
        outcomes[0],
        Err(OpError::Execute(ExecuteError::InvalidSignature))
    );
    assert_eq!(world.ledger.sequence(&second_account), Some(0));
    assert_eq!(world.ledger.balance(&second_account), TokenAmount::eth(1));
}

#[test]
fn unregistered_name_never_resolves_to_a_default() {
    let world = bootstrap();
    let ghost: Name = "ghost.eth".parse().unwrap();

    let err = world.relay.resolve_name(&ghost).unwrap_err();
    // The error carries the name; no zero address sneaks out as a value.
    assert_eq!(err.to_string(), "Name 'ghost.eth' has no resolver configured");
}

#[test]
fn mixed_batch_isolates_the_stale_operation() {
    let mut world = bootstrap();

    let stale = transfer_op(&world, 5, TokenAmount::gwei(7));
    let valid = transfer_op(&world, 0, TokenAmount::gwei(3));

    let outcomes = world.relay.handle_ops(&mut world.ledger, &[stale, valid]);
    assert!(outcomes[0].is_err());
    assert!(outcomes[1].is_ok());

    // State reflects only the valid operation.
    assert_eq!(world.ledger.balance(&world.bob_address), TokenAmount::gwei(3));
    assert_eq!(world.ledger.sequence(&world.alice_account), Some(1));

    // The stale failure is retryable advice for the client, not a dead end.
    assert!(outcomes[0].as_ref().unwrap_err().is_retryable());
}

#[test]
fn direct_execution_requires_the_bound_relay_point() {
    let mut world = bootstrap();
    let signed = transfer_op(&world, 0, TokenAmount::gwei(1));

    let intruder = Address::from_bytes([66; 32]);
    let result =
        world
            .ledger
            .verify_and_execute(world.alice_account, intruder, &signed, world.bob_address);
    assert!(matches!(
        result,
        Err(ExecuteError::UnauthorizedCaller { .. })
    ));
    assert_eq!(world.ledger.sequence(&world.alice_account), Some(0));
}

#[test]
fn failed_transfer_keeps_the_signature_usable() {
    let mut world = bootstrap();

    // More than alice has.
    let signed = transfer_op(&world, 0, TokenAmount::eth(5));

    let outcomes = world
        .relay
        .handle_ops(&mut world.ledger, &[signed.clone()]);
    assert!(matches!(
        outcomes[0],
        Err(OpError::Execute(ExecuteError::InsufficientBalance { .. }))
    ));
    assert_eq!(world.ledger.sequence(&world.alice_account), Some(0));

    // Fund and resubmit the identical signed operation.
    world
        .ledger
        .deposit(world.alice_account, TokenAmount::eth(10))
        .unwrap();
    let outcomes = world.relay.handle_ops(&mut world.ledger, &[signed]);
    assert!(outcomes[0].is_ok());
    assert_eq!(world.ledger.balance(&world.bob_address), TokenAmount::eth(5));
}

#[test]
fn repointed_name_redirects_the_next_operation() {
    let mut world = bootstrap();

    // Bob migrates: bob.eth now points at a new address. Alice's operation
    // was signed before the move but names bob.eth, not an address, so the
    // transfer follows the name.
    let new_bob = Address::from_bytes([77; 32]);
    world
        .directory
        .borrow_mut()
        .set_address(world.bob_address, &world.bob, new_bob)
        .unwrap();

    let signed = transfer_op(&world, 0, TokenAmount::gwei(42));
    let outcomes = world.relay.handle_ops(&mut world.ledger, &[signed]);
    assert!(outcomes[0].is_ok());

    assert_eq!(world.ledger.balance(&new_bob), TokenAmount::gwei(42));
    assert_eq!(world.ledger.balance(&world.bob_address), TokenAmount::ZERO);
}

#[test]
fn operation_survives_transport_to_the_relayer() {
    let mut world = bootstrap();

    // Client side: sign through the Signer seam and encode for transport.
    let signer = InMemorySigner::new(world.alice_key.clone());
    let signed = signer
        .sign_operation(
            UserOperation {
                sender: world.alice.clone(),
                recipient: world.bob.clone(),
                value: TokenAmount::gwei(1),
                data: Vec::new(),
                sequence: 0,
            },
            world.alice_account,
        )
        .unwrap();
    let wire = signed.to_base64();

    // Relayer side: decode and submit.
    let received = SignedOperation::from_base64(&wire).unwrap();
    let outcomes = world.relay.handle_ops(&mut world.ledger, &[received]);
    assert!(outcomes[0].is_ok());
    assert_eq!(world.ledger.balance(&world.bob_address), TokenAmount::gwei(1));
}

#[test]
fn cancel_by_burning_the_sequence_number() {
    let mut world = bootstrap();

    // Alice signed a payment she regrets. Before it is processed she
    // submits a zero-value operation at the same sequence number.
    let regretted = transfer_op(&world, 0, "0.5 ETH".parse().unwrap());
    let cancel = UserOperation {
        sender: world.alice.clone(),
        recipient: world.alice.clone(),
        value: TokenAmount::ZERO,
        data: Vec::new(),
        sequence: 0,
    }
    .sign(&world.alice_key, &world.alice_account);

    let outcomes = world.relay.handle_ops(&mut world.ledger, &[cancel]);
    assert!(outcomes[0].is_ok());

    // The regretted operation now fails structurally.
    let outcomes = world.relay.handle_ops(&mut world.ledger, &[regretted]);
    assert_eq!(
        outcomes[0],
        Err(OpError::Execute(ExecuteError::InvalidSequence {
            expected: 1,
            got: 0
        }))
    );
    assert_eq!(
        world.ledger.balance(&world.alice_account),
        TokenAmount::eth(1)
    );
}

#[test]
fn subname_owners_manage_their_own_records() {
    let mut world = bootstrap();

    // Alice hands pay.alice.eth to a payment processor address.
    let processor = Address::from_bytes([55; 32]);
    let resolver = 0;
    {
        let mut dir = world.directory.borrow_mut();
        let pay = dir
            .set_subname_owner(world.alice_owner, &world.alice, "pay", processor)
            .unwrap();
        assert_eq!(pay.as_str(), "pay.alice.eth");
        dir.set_resolver(processor, &pay, resolver).unwrap();
        dir.set_address(processor, &pay, processor).unwrap();
    }

    let pay: Name = "pay.alice.eth".parse().unwrap();
    assert_eq!(world.relay.resolve_name(&pay).unwrap(), processor);

    // Depth does not special-case anything: alice can pay the subname.
    let signed = UserOperation {
        sender: world.alice.clone(),
        recipient: pay,
        value: TokenAmount::gwei(9),
        data: Vec::new(),
        sequence: 0,
    }
    .sign(&world.alice_key, &world.alice_account);
    let outcomes = world.relay.handle_ops(&mut world.ledger, &[signed]);
    assert!(outcomes[0].is_ok());
    assert_eq!(world.ledger.balance(&processor), TokenAmount::gwei(9));
}

#[test]
fn fcfs_registration_is_first_come_first_served() {
    let world = bootstrap();
    let mallory = Address::from_bytes([66; 32]);

    // alice.eth is taken.
    assert!(
        world
            .directory
            .borrow_mut()
            .register(&world.tld, "alice", mallory)
            .is_err()
    );

    // A fresh label is free.
    assert!(
        world
            .directory
            .borrow_mut()
            .register(&world.tld, "carol", mallory)
            .is_ok()
    );
}
