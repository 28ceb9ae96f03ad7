//! Name resolution.
//!
//! The relay point never looks names up in a global registry: it is handed a
//! [`NameDirectory`] at construction and queries it freshly for every
//! operation. That keeps resolution substitutable in tests and makes the
//! read-only boundary explicit: nothing in this crate ever writes through
//! the directory during execution.
//!
//! [`InMemoryDirectory`] is the deterministic reference implementation: a
//! two-level structure of registry entries (who owns a name, which resolver
//! serves it) and per-resolver address record stores.
//!
//! # Example
//!
//! ```rust
//! use relay_kit::{Address, InMemoryDirectory, NameDirectory};
//!
//! let root = Address::from_bytes([9; 32]);
//! let mut directory = InMemoryDirectory::new(root);
//! let resolver = directory.add_resolver();
//!
//! let tld = directory.set_top_name_owner(root, "eth", root).unwrap();
//! let alice_addr = Address::from_bytes([1; 32]);
//! let alice = directory.register(&tld, "alice", alice_addr).unwrap();
//! directory.set_resolver(alice_addr, &alice, resolver).unwrap();
//! directory.set_address(alice_addr, &alice, alice_addr).unwrap();
//!
//! assert_eq!(directory.resolve(&alice).unwrap(), alice_addr);
//! ```

use std::collections::HashMap;

use crate::error::{DirectoryError, ResolveError};
use crate::types::{Address, Name, NameNode};

/// Read-only name resolution capability.
///
/// Implementations must return an error (never a zero or default address)
/// when a name has no live address record, and must re-evaluate on every
/// call: records may change between operations.
pub trait NameDirectory {
    /// Resolve a name to its currently registered address.
    fn resolve(&self, name: &Name) -> Result<Address, ResolveError>;
}

/// Shared references resolve through the same directory.
impl<D: NameDirectory + ?Sized> NameDirectory for &D {
    fn resolve(&self, name: &Name) -> Result<Address, ResolveError> {
        (**self).resolve(name)
    }
}

impl<D: NameDirectory + ?Sized> NameDirectory for std::rc::Rc<std::cell::RefCell<D>> {
    fn resolve(&self, name: &Name) -> Result<Address, ResolveError> {
        self.borrow().resolve(name)
    }
}

/// Identifier of a resolver record store inside an [`InMemoryDirectory`].
pub type ResolverId = u32;

/// Registry entry: who owns a node and which resolver serves it.
#[derive(Clone, Debug)]
struct RegistryEntry {
    owner: Address,
    resolver: Option<ResolverId>,
}

/// Deterministic two-level directory for tests and integrators.
///
/// Level one is the registry: node → owner + resolver assignment. Level two
/// is a set of resolver stores: node → address record. All mutations are
/// gated on ownership of the touched name; the root of the name tree is
/// owned by the address passed to [`InMemoryDirectory::new`].
pub struct InMemoryDirectory {
    registry: HashMap<NameNode, RegistryEntry>,
    resolvers: Vec<HashMap<NameNode, Address>>,
}

impl InMemoryDirectory {
    /// Create a directory whose root node is owned by `root_owner`.
    pub fn new(root_owner: Address) -> Self {
        let mut registry = HashMap::new();
        registry.insert(
            NameNode::ROOT,
            RegistryEntry {
                owner: root_owner,
                resolver: None,
            },
        );
        Self {
            registry,
            resolvers: Vec::new(),
        }
    }

    /// Add an empty resolver record store and return its id.
    pub fn add_resolver(&mut self) -> ResolverId {
        self.resolvers.push(HashMap::new());
        (self.resolvers.len() - 1) as ResolverId
    }

    /// The owner of a name, if registered.
    pub fn owner(&self, name: &Name) -> Option<Address> {
        self.registry.get(&name.node()).map(|e| e.owner)
    }

    fn entry_owner(&self, node: NameNode) -> Option<Address> {
        self.registry.get(&node).map(|e| e.owner)
    }

    /// Assign a top-level name (e.g. "eth") to an owner.
    ///
    /// Only the root owner may do this.
    pub fn set_top_name_owner(
        &mut self,
        caller: Address,
        label: &str,
        owner: Address,
    ) -> Result<Name, DirectoryError> {
        let root_owner = self
            .entry_owner(NameNode::ROOT)
            .expect("root entry is seeded at construction");
        if caller != root_owner {
            return Err(DirectoryError::NotAuthorized {
                name: label.to_string(),
                caller,
            });
        }

        let name = Name::new(label)?;
        self.assign(name.node(), owner);
        tracing::debug!(name = %name, owner = %owner, "top-level name assigned");
        Ok(name)
    }

    /// Assign a subname of `parent` to an owner.
    ///
    /// Only the owner of `parent` may do this; re-assigning an existing
    /// subname is allowed (ownership transfer).
    pub fn set_subname_owner(
        &mut self,
        caller: Address,
        parent: &Name,
        label: &str,
        owner: Address,
    ) -> Result<Name, DirectoryError> {
        match self.owner(parent) {
            Some(parent_owner) if parent_owner == caller => {}
            _ => {
                return Err(DirectoryError::NotAuthorized {
                    name: parent.to_string(),
                    caller,
                });
            }
        }

        let name = parent.child(label)?;
        self.assign(name.node(), owner);
        tracing::debug!(name = %name, owner = %owner, "subname assigned");
        Ok(name)
    }

    /// First-come-first-served registration of a subname of `parent`.
    ///
    /// The registrar role: anyone may claim an unowned label, nobody may
    /// take an owned one.
    pub fn register(
        &mut self,
        parent: &Name,
        label: &str,
        owner: Address,
    ) -> Result<Name, DirectoryError> {
        let name = parent.child(label)?;
        if self.owner(&name).is_some() {
            return Err(DirectoryError::AlreadyRegistered(name));
        }

        self.assign(name.node(), owner);
        tracing::debug!(name = %name, owner = %owner, "name registered");
        Ok(name)
    }

    /// Point a name at a resolver.
    ///
    /// Only the name's owner may do this.
    pub fn set_resolver(
        &mut self,
        caller: Address,
        name: &Name,
        resolver: ResolverId,
    ) -> Result<(), DirectoryError> {
        if resolver as usize >= self.resolvers.len() {
            return Err(DirectoryError::UnknownResolver(resolver));
        }

        let entry = self
            .registry
            .get_mut(&name.node())
            .ok_or_else(|| DirectoryError::UnknownName(name.clone()))?;
        if entry.owner != caller {
            return Err(DirectoryError::NotAuthorized {
                name: name.to_string(),
                caller,
            });
        }

        entry.resolver = Some(resolver);
        tracing::debug!(name = %name, resolver, "resolver set");
        Ok(())
    }

    /// Write a name's address record into its assigned resolver.
    ///
    /// Only the name's owner may do this; the name must already have a
    /// resolver.
    pub fn set_address(
        &mut self,
        caller: Address,
        name: &Name,
        address: Address,
    ) -> Result<(), DirectoryError> {
        let entry = self
            .registry
            .get(&name.node())
            .ok_or_else(|| DirectoryError::UnknownName(name.clone()))?;
        if entry.owner != caller {
            return Err(DirectoryError::NotAuthorized {
                name: name.to_string(),
                caller,
            });
        }

        let resolver = entry
            .resolver
            .ok_or_else(|| DirectoryError::NoResolver(name.clone()))?;
        self.resolvers[resolver as usize].insert(name.node(), address);
        tracing::debug!(name = %name, address = %address, "address record set");
        Ok(())
    }

    fn assign(&mut self, node: NameNode, owner: Address) {
        match self.registry.get_mut(&node) {
            Some(entry) => entry.owner = owner,
            None => {
                self.registry.insert(
                    node,
                    RegistryEntry {
                        owner,
                        resolver: None,
                    },
                );
            }
        }
    }
}

impl NameDirectory for InMemoryDirectory {
    fn resolve(&self, name: &Name) -> Result<Address, ResolveError> {
        let node = name.node();

        let resolver = self
            .registry
            .get(&node)
            .and_then(|e| e.resolver)
            .ok_or_else(|| ResolveError::NoResolver(name.clone()))?;

        let address = self.resolvers[resolver as usize]
            .get(&node)
            .copied()
            .ok_or_else(|| ResolveError::NoRecord(name.clone()))?;

        if address.is_zero() {
            return Err(ResolveError::ZeroRecord(name.clone()));
        }

        Ok(address)
    }
}
