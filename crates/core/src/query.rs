//! Query operations on a loaded handle: the enumerate/test/check
//! surface described in `SPEC_FULL.md` §4.3, plus the output-buffer
//! sizing helpers in §4.4.
//!
//! Every public method here borrows the database via
//! [`Genders::require_loaded`], runs its logic against that borrow in
//! a free function, and only then touches `self` again to record
//! `errnum` — keeping the "is this handle usable" bookkeeping out of
//! the way of the actual query logic.

use crate::error::{GendersError, Result};
use crate::expand::substituted;
use crate::handle::Genders;
use crate::model::{AttrVal, Database, Node};

impl Genders {
    /// Number of distinct node records in the database.
    pub fn getnumnodes(&mut self) -> Result<usize> {
        let db = self.require_loaded()?;
        let n = db.num_nodes();
        self.set_ok();
        Ok(n)
    }

    /// Number of distinct attribute names across the whole database.
    pub fn getnumattrs(&mut self) -> Result<usize> {
        let db = self.require_loaded()?;
        let n = db.num_attrs();
        self.set_ok();
        Ok(n)
    }

    /// Largest number of attributes carried by any single node.
    pub fn getmaxattrs(&mut self) -> Result<usize> {
        let db = self.require_loaded()?;
        let n = db.max_attrs();
        self.set_ok();
        Ok(n)
    }

    /// Longest node name, in bytes, including the local hostname.
    pub fn getmaxnodelen(&mut self) -> Result<usize> {
        let db = self.require_loaded()?;
        let n = db.max_node_len();
        self.set_ok();
        Ok(n)
    }

    /// Longest attribute name, in bytes.
    pub fn getmaxattrlen(&mut self) -> Result<usize> {
        let db = self.require_loaded()?;
        let n = db.max_attr_len();
        self.set_ok();
        Ok(n)
    }

    /// Longest attribute value, in bytes, after `%n` substitution.
    pub fn getmaxvallen(&mut self) -> Result<usize> {
        let db = self.require_loaded()?;
        let n = db.max_val_len();
        self.set_ok();
        Ok(n)
    }

    /// Writes the resolved local hostname into `out`, returning the
    /// number of bytes written. `out` must hold the name plus a
    /// trailing NUL slot, matching the original buffer-discipline API.
    pub fn getnodename(&mut self, out: &mut [u8]) -> Result<usize> {
        let db = self.require_loaded()?;
        let name = db.local_hostname().as_bytes();
        let result = if name.len() + 1 > out.len() {
            Err(GendersError::Overflow)
        } else {
            out[..name.len()].copy_from_slice(name);
            Ok(name.len())
        };
        match result {
            Ok(n) => {
                self.set_ok();
                Ok(n)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Allocates an output buffer sized to hold every node name.
    pub fn nodelist_create(&mut self) -> Result<Vec<Option<String>>> {
        let db = self.require_loaded()?;
        let n = db.num_nodes();
        self.set_ok();
        Ok(vec![Some(String::new()); n])
    }

    /// Allocates an output buffer sized to hold every attribute name.
    pub fn attrlist_create(&mut self) -> Result<Vec<Option<String>>> {
        let db = self.require_loaded()?;
        let n = db.num_attrs();
        self.set_ok();
        Ok(vec![Some(String::new()); n])
    }

    /// Allocates an output buffer sized to hold every attribute's
    /// value (same capacity as [`Genders::attrlist_create`]; kept as a
    /// distinct method for symmetry with the original three-buffer API).
    pub fn vallist_create(&mut self) -> Result<Vec<Option<String>>> {
        let db = self.require_loaded()?;
        let n = db.num_attrs();
        self.set_ok();
        Ok(vec![Some(String::new()); n])
    }

    /// Clears each occupied slot of a node-name buffer for reuse.
    pub fn nodelist_clear(&mut self, list: &mut [Option<String>]) -> Result<()> {
        self.require_loaded()?;
        clear_slots(list);
        self.set_ok();
        Ok(())
    }

    /// Clears each occupied slot of an attribute-name buffer for reuse.
    pub fn attrlist_clear(&mut self, list: &mut [Option<String>]) -> Result<()> {
        self.require_loaded()?;
        clear_slots(list);
        self.set_ok();
        Ok(())
    }

    /// Clears each occupied slot of a value buffer for reuse.
    pub fn vallist_clear(&mut self, list: &mut [Option<String>]) -> Result<()> {
        self.require_loaded()?;
        clear_slots(list);
        self.set_ok();
        Ok(())
    }

    /// Releases a node-name buffer. Ownership already does the work;
    /// this exists for symmetry with `nodelist_create`.
    pub fn nodelist_destroy(&mut self, list: Vec<Option<String>>) -> Result<()> {
        self.require_loaded()?;
        drop(list);
        self.set_ok();
        Ok(())
    }

    /// Releases an attribute-name buffer.
    pub fn attrlist_destroy(&mut self, list: Vec<Option<String>>) -> Result<()> {
        self.require_loaded()?;
        drop(list);
        self.set_ok();
        Ok(())
    }

    /// Releases a value buffer.
    pub fn vallist_destroy(&mut self, list: Vec<Option<String>>) -> Result<()> {
        self.require_loaded()?;
        drop(list);
        self.set_ok();
        Ok(())
    }

    /// Writes the names of every node matching the optional `attr`/`val`
    /// filter into `out`, in registration order, returning the count
    /// written. `attr: None` matches every node; `attr: Some(a), val:
    /// None` matches every node carrying `a` regardless of value;
    /// `attr: Some(a), val: Some(v)` matches nodes where `a` is set to
    /// exactly `v` (after `%n` substitution, or literally).
    pub fn getnodes(
        &mut self,
        out: &mut [Option<String>],
        attr: Option<&str>,
        val: Option<&str>,
    ) -> Result<usize> {
        let db = self.require_loaded()?;
        match getnodes_inner(db, out, attr, val) {
            Ok(n) => {
                self.set_ok();
                Ok(n)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Writes the attribute names (and, if `out_vals` is supplied,
    /// their substituted values) carried by `node` (or the local
    /// hostname when `None`) into `out_attrs`/`out_vals`.
    pub fn getattr(
        &mut self,
        node: Option<&str>,
        out_attrs: &mut [Option<String>],
        out_vals: Option<&mut [Option<String>]>,
    ) -> Result<usize> {
        let db = self.require_loaded()?;
        let node_name = node.unwrap_or_else(|| db.local_hostname()).to_string();
        match getattr_inner(db, &node_name, out_attrs, out_vals) {
            Ok(n) => {
                self.set_ok();
                Ok(n)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Writes every distinct attribute name in the database into `out`.
    pub fn getattr_all(&mut self, out: &mut [Option<String>]) -> Result<usize> {
        let db = self.require_loaded()?;
        match getattr_all_inner(db, out) {
            Ok(n) => {
                self.set_ok();
                Ok(n)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Whether `node` (or the local hostname when `None`) carries
    /// `attr`. If it does and `out_val` is supplied, writes the
    /// substituted value into it (left untouched when the attribute
    /// carries no value).
    pub fn testattr(
        &mut self,
        node: Option<&str>,
        attr: &str,
        out_val: Option<&mut String>,
    ) -> Result<bool> {
        let db = self.require_loaded()?;
        let node_name = node.unwrap_or_else(|| db.local_hostname()).to_string();
        match testattr_inner(db, &node_name, attr, out_val) {
            Ok(b) => {
                self.set_ok();
                Ok(b)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Whether `node` (or the local hostname when `None`) carries
    /// `attr` set to `val` (or carries `attr` at all, when `val` is
    /// `None`).
    pub fn testattrval(
        &mut self,
        node: Option<&str>,
        attr: &str,
        val: Option<&str>,
    ) -> Result<bool> {
        let db = self.require_loaded()?;
        let node_name = node.unwrap_or_else(|| db.local_hostname()).to_string();
        match testattrval_inner(db, &node_name, attr, val) {
            Ok(b) => {
                self.set_ok();
                Ok(b)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Whether `name` (or the local hostname when `None`) is a known
    /// node.
    pub fn isnode(&mut self, name: Option<&str>) -> Result<bool> {
        let db = self.require_loaded()?;
        let found = match name {
            Some(n) => db.has_node(n),
            None => db.has_node(db.local_hostname()),
        };
        self.set_ok();
        Ok(found)
    }

    /// Whether `attr` is a known attribute name anywhere in the database.
    pub fn isattr(&mut self, attr: &str) -> Result<bool> {
        let db = self.require_loaded()?;
        let found = db.has_attr(attr);
        self.set_ok();
        Ok(found)
    }

    /// Whether any node carries `attr` set to exactly `val`.
    pub fn isattrval(&mut self, attr: &str, val: &str) -> Result<bool> {
        let db = self.require_loaded()?;
        match isattrval_inner(db, attr, val) {
            Ok(b) => {
                self.set_ok();
                Ok(b)
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}

fn clear_slots(list: &mut [Option<String>]) {
    for slot in list.iter_mut() {
        if let Some(s) = slot {
            s.clear();
        }
    }
}

/// Writes `value` into the `index`-th slot of `out`.
///
/// `Overflow` when `index` is past the end of `out` (the caller's
/// buffer was sized too small); `NullPtr` when the slot exists but was
/// handed in as `None` (the caller's equivalent of a null output
/// pointer).
fn put(out: &mut [Option<String>], index: usize, value: &str) -> Result<()> {
    let slot = out.get_mut(index).ok_or(GendersError::Overflow)?;
    match slot {
        Some(s) => {
            s.clear();
            s.push_str(value);
            Ok(())
        }
        None => Err(GendersError::NullPtr),
    }
}

/// The attrval `node` carries for `attr`, found by walking the groups
/// the node references, if any.
fn find_attr<'d>(db: &'d Database, node: &Node, attr: &str) -> Option<&'d AttrVal> {
    node.groups().iter().find_map(|&gid| db.group(gid).find(attr))
}

/// Whether `av`'s value matches `val`, either literally or after `%n`
/// substitution against `node_name`. Both forms are checked — an
/// attribute whose value happens to contain a literal `%n` sequence
/// that nonetheless equals `val` verbatim still counts as a match.
fn value_matches(db: &Database, node_name: &str, av: &AttrVal, val: &str) -> Result<bool> {
    let Some(v) = &av.val else {
        return Ok(false);
    };
    let expanded = substituted(v, node_name, db.max_val_len())?;
    Ok(expanded.as_ref() == val || v.as_str() == val)
}

fn getnodes_inner(
    db: &Database,
    out: &mut [Option<String>],
    attr: Option<&str>,
    val: Option<&str>,
) -> Result<usize> {
    let mut index = 0usize;
    for node in db.nodes() {
        let save = match attr {
            None => true,
            Some(a) => match find_attr(db, node, a) {
                None => false,
                Some(av) => match val {
                    None => true,
                    Some(v) => av.val.is_some() && value_matches(db, node.name(), av, v)?,
                },
            },
        };
        if save {
            put(out, index, node.name())?;
            index += 1;
        }
    }
    Ok(index)
}

fn getattr_inner(
    db: &Database,
    node_name: &str,
    out_attrs: &mut [Option<String>],
    mut out_vals: Option<&mut [Option<String>]>,
) -> Result<usize> {
    let node = db.find_node(node_name).ok_or(GendersError::NotFound)?;
    let mut index = 0usize;
    for &gid in node.groups() {
        for av in db.group(gid).attrvals() {
            put(out_attrs, index, &av.attr)?;
            if let Some(vals) = out_vals.as_deref_mut() {
                if let Some(v) = &av.val {
                    let expanded = substituted(v, node.name(), db.max_val_len())?;
                    put(vals, index, expanded.as_ref())?;
                }
            }
            index += 1;
        }
    }
    Ok(index)
}

fn getattr_all_inner(db: &Database, out: &mut [Option<String>]) -> Result<usize> {
    let mut index = 0usize;
    for name in db.attr_names() {
        put(out, index, name)?;
        index += 1;
    }
    Ok(index)
}

fn testattr_inner(
    db: &Database,
    node_name: &str,
    attr: &str,
    out_val: Option<&mut String>,
) -> Result<bool> {
    let node = db.find_node(node_name).ok_or(GendersError::NotFound)?;
    match find_attr(db, node, attr) {
        None => Ok(false),
        Some(av) => {
            if let (Some(out), Some(v)) = (out_val, &av.val) {
                let expanded = substituted(v, node.name(), db.max_val_len())?;
                out.clear();
                out.push_str(expanded.as_ref());
            }
            Ok(true)
        }
    }
}

fn testattrval_inner(
    db: &Database,
    node_name: &str,
    attr: &str,
    val: Option<&str>,
) -> Result<bool> {
    let node = db.find_node(node_name).ok_or(GendersError::NotFound)?;
    match find_attr(db, node, attr) {
        None => Ok(false),
        Some(av) => match val {
            None => Ok(true),
            Some(v) => {
                if av.val.is_none() {
                    return Ok(false);
                }
                value_matches(db, node.name(), av, v)
            }
        },
    }
}

fn isattrval_inner(db: &Database, attr: &str, val: &str) -> Result<bool> {
    for node in db.nodes() {
        if let Some(av) = find_attr(db, node, attr) {
            if av.val.is_some() && value_matches(db, node.name(), av, val)? {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Database;

    fn sample_db() -> Database {
        let mut db = Database::new();
        let idx_a = db.find_or_insert_node("n1");
        let idx_b = db.find_or_insert_node("n2");

        let mut group = crate::model::Group::default();
        group.attrvals.push(AttrVal::new("compute".to_string(), None));
        group
            .attrvals
            .push(AttrVal::new("rack".to_string(), Some("%n-rack".to_string())));
        let gid = db.push_group(group);
        db.nodes[idx_a].groups.push(gid);
        db.nodes[idx_b].groups.push(gid);

        db.attrs.insert("compute".to_string());
        db.attrs.insert("rack".to_string());
        db.max_val_len = 32;
        db.max_node_len = 2;
        db.max_attr_len = 7;
        db.max_attrs = 2;
        db.local_hostname = "n1".to_string();
        db.build_node_index();
        db
    }

    #[test]
    fn getnodes_with_no_filter_returns_all() {
        let db = sample_db();
        let mut out = vec![Some(String::new()); 2];
        let n = getnodes_inner(&db, &mut out, None, None).unwrap();
        assert_eq!(n, 2);
        assert_eq!(out[0].as_deref(), Some("n1"));
        assert_eq!(out[1].as_deref(), Some("n2"));
    }

    #[test]
    fn getnodes_filters_by_attr_and_substituted_value() {
        let db = sample_db();
        let mut out = vec![Some(String::new()); 2];
        let n = getnodes_inner(&db, &mut out, Some("rack"), Some("n2-rack")).unwrap();
        assert_eq!(n, 1);
        assert_eq!(out[0].as_deref(), Some("n2"));
    }

    #[test]
    fn getattr_writes_attrs_and_substituted_vals() {
        let db = sample_db();
        let mut attrs = vec![Some(String::new()); 2];
        let mut vals = vec![Some(String::new()); 2];
        let n = getattr_inner(&db, "n1", &mut attrs, Some(&mut vals)).unwrap();
        assert_eq!(n, 2);
        assert_eq!(attrs[0].as_deref(), Some("compute"));
        assert_eq!(attrs[1].as_deref(), Some("rack"));
        assert_eq!(vals[1].as_deref(), Some("n1-rack"));
    }

    #[test]
    fn testattr_reports_missing_attribute() {
        let db = sample_db();
        assert!(!testattr_inner(&db, "n1", "nope", None).unwrap());
    }

    #[test]
    fn put_reports_overflow_and_nullptr() {
        let mut out: Vec<Option<String>> = vec![None];
        assert!(matches!(put(&mut out, 1, "x"), Err(GendersError::Overflow)));
        assert!(matches!(put(&mut out, 0, "x"), Err(GendersError::NullPtr)));
    }
}
