//! Node representation in the genders database.

use super::group::GroupId;

/// Maximum byte length of an expanded node name, per the original
/// `MAXHOSTNAMELEN`.
pub const MAX_HOSTNAME_LEN: usize = 64;

/// A node record: a short, dotless hostname plus the attrval-groups
/// that contribute its attributes.
///
/// Node names are not required to be unique by this type (see
/// `SPEC_FULL.md` §3); the loader's own dedup-on-insert means two
/// `Node` records sharing a name never actually occur via `load`/`lint`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub(crate) name: String,

    /// Non-owning references into the database's group table, in the
    /// order the source lines contributed them.
    pub(crate) groups: Vec<GroupId>,

    /// Sum of `len(group)` over `groups`; cached so `getmaxattrs`-style
    /// bookkeeping doesn't need to re-walk every group.
    pub(crate) attr_count: usize,
}

impl Node {
    pub(crate) fn new(name: String) -> Self {
        Node {
            name,
            groups: Vec::new(),
            attr_count: 0,
        }
    }

    /// The node's short hostname.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of attrval pairs contributed by this node's groups.
    pub fn attr_count(&self) -> usize {
        self.attr_count
    }

    /// The groups this node references, in registration order.
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }
}
