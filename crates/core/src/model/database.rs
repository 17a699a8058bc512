//! The loaded model: node table, group table, attribute set, and the
//! node-name index, plus the derived statistics callers use to size
//! output buffers.

use std::collections::HashMap;

use indexmap::IndexSet;

use super::group::{Group, GroupId};
use super::node::Node;

/// Sizing multiplier applied to the node index's reserved capacity,
/// mirroring the original `GENDERS_HASH_MULTIPLIER` hash-table sizing
/// (kept as a reserve hint; `HashMap` itself manages real growth).
const NODE_INDEX_CAPACITY_MULTIPLIER: usize = 2;

/// The fully-loaded, immutable-after-load genders model.
///
/// Built by `crate::io::parser::load`/`lint` and owned by a loaded
/// [`crate::Genders`] handle.
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Database {
    pub(crate) nodes: Vec<Node>,
    pub(crate) groups: Vec<Group>,
    pub(crate) attrs: IndexSet<String>,

    /// node name -> indices into `nodes` sharing that name, in
    /// registration order. `getattr`/`testattr`/etc. use the first
    /// entry when multiple are present.
    pub(crate) node_index: HashMap<String, Vec<usize>>,

    pub(crate) local_hostname: String,

    pub(crate) max_attrs: usize,
    pub(crate) max_node_len: usize,
    pub(crate) max_attr_len: usize,
    pub(crate) max_val_len: usize,
}

impl Database {
    pub(crate) fn new() -> Self {
        Database::default()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }

    pub fn max_attrs(&self) -> usize {
        self.max_attrs
    }

    pub fn max_node_len(&self) -> usize {
        self.max_node_len
    }

    pub fn max_attr_len(&self) -> usize {
        self.max_attr_len
    }

    pub fn max_val_len(&self) -> usize {
        self.max_val_len
    }

    pub fn local_hostname(&self) -> &str {
        &self.local_hostname
    }

    pub(crate) fn group(&self, id: GroupId) -> &Group {
        &self.groups[id]
    }

    pub(crate) fn node_at(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.iter().map(String::as_str)
    }

    pub fn has_attr(&self, attr: &str) -> bool {
        self.attrs.contains(attr)
    }

    /// Look up the first-registered node record bearing `name`, if any.
    pub(crate) fn find_node(&self, name: &str) -> Option<&Node> {
        let indices = self.node_index.get(name)?;
        indices.first().map(|&i| &self.nodes[i])
    }

    pub(crate) fn has_node(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    /// Builds the node index from the populated `nodes` table. Called
    /// once, at the end of a successful `load`.
    pub(crate) fn build_node_index(&mut self) {
        let mut index: HashMap<String, Vec<usize>> =
            HashMap::with_capacity(self.nodes.len() * NODE_INDEX_CAPACITY_MULTIPLIER);
        for (i, node) in self.nodes.iter().enumerate() {
            index.entry(node.name.clone()).or_default().push(i);
        }
        self.node_index = index;
    }

    /// Finds an existing node record by name (linear scan, matching
    /// the original's `_insert_node` lookup), or appends and returns a
    /// new one.
    pub(crate) fn find_or_insert_node(&mut self, name: &str) -> usize {
        if let Some(i) = self.nodes.iter().position(|n| n.name == name) {
            return i;
        }
        self.nodes.push(Node::new(name.to_string()));
        self.nodes.len() - 1
    }

    /// Appends a group to the table and returns its id.
    pub(crate) fn push_group(&mut self, group: Group) -> GroupId {
        self.groups.push(group);
        self.groups.len() - 1
    }

    /// Whether any group already referenced by `node_index_in_table`
    /// carries `attr` (the duplicate-attribute-across-groups check).
    pub(crate) fn node_has_attr(&self, node_table_index: usize, attr: &str) -> bool {
        self.nodes[node_table_index]
            .groups
            .iter()
            .any(|&gid| self.groups[gid].contains(attr))
    }
}
