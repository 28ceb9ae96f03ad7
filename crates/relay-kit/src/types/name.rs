//! Human-readable hierarchical names with validation.

use std::fmt::{self, Display};
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::error::ParseNameError;

/// Maximum total length of a name.
const MAX_NAME_LEN: usize = 255;

/// A human-readable hierarchical name.
///
/// Names are dot-separated sequences of lowercase labels, resolved leftmost
/// label first: "alice.eth" is the label "alice" under the top-level name
/// "eth". Valid labels contain `a-z`, `0-9`, `-` and `_`, with no leading or
/// trailing `-`/`_`.
///
/// # Examples
///
/// ```
/// use relay_kit::Name;
///
/// let name: Name = "alice.eth".parse().unwrap();
/// assert_eq!(name.label(), "alice");
/// assert_eq!(name.parent().unwrap().as_str(), "eth");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Name(String);

/// A node in the name tree: the 32-byte hash a resolver keys its records by.
///
/// The root node is 32 zero bytes; each child node is
/// `keccak256(parent_node ‖ keccak256(label))`. Registries and resolvers see
/// only nodes, never the name text.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameNode([u8; 32]);

impl Name {
    /// Parse and validate a name.
    pub fn new(s: impl Into<String>) -> Result<Self, ParseNameError> {
        let s = s.into();
        Self::validate(&s)?;
        Ok(Self(s))
    }

    /// Validate a name string.
    fn validate(s: &str) -> Result<(), ParseNameError> {
        if s.is_empty() {
            return Err(ParseNameError::Empty);
        }

        if s.len() > MAX_NAME_LEN {
            return Err(ParseNameError::TooLong(s.to_string()));
        }

        for c in s.chars() {
            if !matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.') {
                return Err(ParseNameError::InvalidChar(s.to_string(), c));
            }
        }

        // No leading/trailing dots, no consecutive dots
        if s.starts_with('.') || s.ends_with('.') || s.contains("..") {
            return Err(ParseNameError::InvalidFormat(s.to_string()));
        }

        // No leading/trailing hyphens or underscores per label
        for label in s.split('.') {
            if label.is_empty() {
                return Err(ParseNameError::InvalidFormat(s.to_string()));
            }
            if label.starts_with('-') || label.ends_with('-') {
                return Err(ParseNameError::InvalidFormat(s.to_string()));
            }
            if label.starts_with('_') || label.ends_with('_') {
                return Err(ParseNameError::InvalidFormat(s.to_string()));
            }
        }

        Ok(())
    }

    /// The leftmost label (e.g., "alice.eth" → "alice").
    pub fn label(&self) -> &str {
        match self.0.find('.') {
            Some(i) => &self.0[..i],
            None => &self.0,
        }
    }

    /// The parent name (e.g., "alice.eth" → "eth"), or `None` for a
    /// top-level name.
    pub fn parent(&self) -> Option<Name> {
        self.0
            .find('.')
            .map(|i| Name(self.0[i + 1..].to_string()))
    }

    /// Check if this is a top-level name (no dots, like "eth").
    pub fn is_top_level(&self) -> bool {
        !self.0.contains('.')
    }

    /// Construct a child name from a label under this name.
    ///
    /// ```
    /// use relay_kit::Name;
    ///
    /// let tld: Name = "eth".parse().unwrap();
    /// assert_eq!(tld.child("alice").unwrap().as_str(), "alice.eth");
    /// ```
    pub fn child(&self, label: &str) -> Result<Name, ParseNameError> {
        Name::new(format!("{}.{}", label, self.0))
    }

    /// Compute this name's node in the name tree.
    ///
    /// Folds over the labels right to left, starting from the root node.
    pub fn node(&self) -> NameNode {
        let mut node = NameNode::ROOT.0;
        for label in self.0.rsplit('.') {
            let label_hash = keccak256(label.as_bytes());
            let mut buf = [0u8; 64];
            buf[..32].copy_from_slice(&node);
            buf[32..].copy_from_slice(&label_hash);
            node = keccak256(&buf);
        }
        NameNode(node)
    }

    /// Get as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&Keccak256::digest(data));
    bytes
}

impl FromStr for Name {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for Name {
    type Error = ParseNameError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl TryFrom<String> for Name {
    type Error = ParseNameError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl BorshSerialize for Name {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.0, writer)
    }
}

impl BorshDeserialize for Name {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let s = String::deserialize_reader(reader)?;
        Ok(Self(s))
    }
}

impl NameNode {
    /// The root node (32 zero bytes).
    pub const ROOT: Self = Self([0; 32]);

    /// Create from raw 32 bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw 32 bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Display for NameNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for NameNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameNode({})", self)
    }
}
