//! Attrval-groups: one source line's attribute list, shared by every
//! node the line enumerates.

/// Index of a [`Group`] within a database's group table.
///
/// A non-owning handle: the table itself owns the `Group` values, and
/// `Node` records refer to them by id rather than by pointer, per the
/// ownership redesign in `SPEC_FULL.md` §9.
pub type GroupId = usize;

/// One attribute name, with an optional value.
///
/// The value may contain `%n` / `%%`, expanded at query time against a
/// specific node (see `crate::expand`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttrVal {
    pub attr: String,
    pub val: Option<String>,
}

impl AttrVal {
    pub fn new(attr: String, val: Option<String>) -> Self {
        AttrVal { attr, val }
    }
}

/// The attribute list parsed from one source line, shared (by id) by
/// every node the line's hostname range expanded to.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub(crate) attrvals: Vec<AttrVal>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.attrvals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrvals.is_empty()
    }

    pub fn attrvals(&self) -> &[AttrVal] {
        &self.attrvals
    }

    /// The attrval for `attr`, if this group carries it.
    pub fn find(&self, attr: &str) -> Option<&AttrVal> {
        self.attrvals.iter().find(|av| av.attr == attr)
    }

    /// Whether this group already carries `attr`, used for the
    /// duplicate-attribute-within-a-line check.
    pub fn contains(&self, attr: &str) -> bool {
        self.find(attr).is_some()
    }
}
