//! The genders file loader: turns a text database into a
//! [`Database`], and its non-destructive `lint` twin.
//!
//! Both modes share one line parser (`parse_line`); they differ only
//! in what happens when a line fails to parse (§4.2 of
//! `SPEC_FULL.md`): `load` aborts immediately, `lint` records a
//! diagnostic and keeps going.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use crate::config::Config;
use crate::error::{GendersError, Result};
use crate::model::{AttrVal, Database, Group, MAX_HOSTNAME_LEN};

use super::{Diagnostic, ParseError, MAX_LINE_LEN};

/// Loads a genders database from `path`, failing on the first
/// malformed line (the strict `load` path).
pub fn load(path: &Path) -> Result<Database> {
    let file = File::open(path).map_err(GendersError::Open)?;
    let reader = BufReader::new(file);
    let mut db = Database::new();
    log::debug!("loading genders database from {}", path.display());
    read_and_parse(reader, &mut db, None)?;

    if db.num_nodes() == 0 {
        return Err(GendersError::Parse(ParseError::new(
            0,
            "No nodes successfully parsed",
        )));
    }

    finalize(&mut db);
    log::debug!(
        "loaded genders database: {} nodes, {} attrs",
        db.num_nodes(),
        db.num_attrs()
    );
    Ok(db)
}

/// Parses `path` into a throwaway model, reporting every malformed
/// line to `sink` instead of aborting. Returns the number of
/// diagnostics reported.
pub fn lint(path: &Path, sink: &mut dyn Write) -> Result<usize> {
    let file = File::open(path).map_err(GendersError::Open)?;
    let reader = BufReader::new(file);
    let mut db = Database::new();
    log::debug!("linting genders database at {}", path.display());
    let errcount = read_and_parse(reader, &mut db, Some(sink))?;

    if db.num_nodes() == 0 {
        let _ = writeln!(sink, "No nodes successfully parsed");
        log::warn!("lint of {} produced no nodes", path.display());
        return Err(GendersError::Parse(ParseError::new(
            0,
            "No nodes successfully parsed",
        )));
    }

    Ok(errcount)
}

/// Reads `reader` line by line, feeding each logical line to
/// [`parse_line`]. `sink` selects the mode: `None` aborts on the
/// first malformed line (`load`); `Some` records a diagnostic and
/// continues (`lint`). Returns the number of diagnostics recorded
/// (always 0 when `sink` is `None`, since that path returns early).
fn read_and_parse<R: Read>(
    mut reader: BufReader<R>,
    db: &mut Database,
    mut sink: Option<&mut dyn Write>,
) -> Result<usize> {
    let mut errcount = 0usize;
    let mut line_no = 0usize;
    let mut raw = Vec::new();

    loop {
        raw.clear();
        let n = reader
            .read_until(b'\n', &mut raw)
            .map_err(GendersError::Read)?;
        if n == 0 {
            break;
        }
        line_no += 1;

        if raw.len() > MAX_LINE_LEN {
            // Overflow is fatal in both modes (§4.2).
            let reason = "exceeds maximum allowed length".to_string();
            if let Some(s) = sink.as_deref_mut() {
                let _ = writeln!(s, "{}", Diagnostic { line: line_no, reason: reason.clone() });
            }
            return Err(GendersError::Parse(ParseError::new(line_no, reason)));
        }

        let owned;
        let line: &str = match std::str::from_utf8(&raw) {
            Ok(s) => s,
            Err(_) => {
                owned = String::from_utf8_lossy(&raw).into_owned();
                &owned
            }
        };
        let line = line.trim_end_matches(['\n', '\r']);

        if let Err(reason) = parse_line(db, line) {
            match sink.as_deref_mut() {
                Some(s) => {
                    let diag = Diagnostic {
                        line: line_no,
                        reason,
                    };
                    log::warn!("genders parse error: {diag}");
                    let _ = writeln!(s, "{diag}");
                    errcount += 1;
                }
                None => {
                    return Err(GendersError::Parse(ParseError::new(line_no, reason)));
                }
            }
        }
    }

    Ok(errcount)
}

/// Parses one logical (comment-stripped, newline-stripped) line and
/// folds it into `db`. Returns a human-readable reason on failure;
/// the caller attaches the line number.
fn parse_line(db: &mut Database, raw_line: &str) -> std::result::Result<(), String> {
    let line = match raw_line.find('#') {
        Some(i) => &raw_line[..i],
        None => raw_line,
    };
    let line = line.trim_end();
    if line.is_empty() {
        return Ok(());
    }
    let line = line.trim_start();

    let (nodenames, rest) = match line.find([' ', '\t']) {
        Some(i) => (&line[..i], line[i..].trim_start()),
        None => (line, ""),
    };

    let mut group = Group::default();
    if !rest.is_empty() {
        if rest.contains(' ') || rest.contains('\t') {
            return Err("white space in attribute list".to_string());
        }

        for piece in rest.split(',') {
            if piece.is_empty() {
                // strtok-style: consecutive/trailing commas produce no token.
                continue;
            }
            let (attr, val) = match piece.split_once('=') {
                Some((a, v)) => (a, Some(v.to_string())),
                None => (piece, None),
            };
            if attr.is_empty() {
                return Err("invalid attribute name".to_string());
            }
            if group.contains(attr) {
                return Err(format!("duplicate attribute \"{attr}\" listed"));
            }
            group.attrvals.push(AttrVal::new(attr.to_string(), val));
        }
    }

    let names = super::hostlist::expand(nodenames).map_err(|e| e.to_string())?;

    // Global bookkeeping over this line's attribute list, once per
    // line regardless of how many nodes the range expands to.
    let mut line_n_subst_max = 0usize;
    for av in &group.attrvals {
        db.attrs.insert(av.attr.clone());
        db.max_attr_len = db.max_attr_len.max(av.attr.len());
        if let Some(v) = &av.val {
            if v.contains("%n") {
                line_n_subst_max = line_n_subst_max.max(v.len());
            } else {
                db.max_val_len = db.max_val_len.max(v.len());
            }
        }
    }

    let has_attrs = !group.attrvals.is_empty();
    let group_len = group.attrvals.len();
    let group_id = if has_attrs {
        Some(db.push_group(group))
    } else {
        None
    };

    let mut line_max_node_len = 0usize;
    for name in &names {
        if name.len() > MAX_HOSTNAME_LEN {
            return Err("hostname too long".to_string());
        }
        if name.contains('.') {
            return Err("node not a shortened hostname".to_string());
        }

        let idx = db.find_or_insert_node(name);

        if let Some(gid) = group_id {
            if group_conflicts_with_node(db, idx, gid) {
                return Err(format!("duplicate attributed listed for node \"{name}\""));
            }
            db.nodes[idx].groups.push(gid);
            db.nodes[idx].attr_count += group_len;
        }

        db.max_node_len = db.max_node_len.max(name.len());
        line_max_node_len = line_max_node_len.max(name.len());
        db.max_attrs = db.max_attrs.max(db.nodes[idx].attr_count);
    }

    if line_n_subst_max > 0 {
        let candidate = (line_n_subst_max + line_max_node_len).saturating_sub(2);
        db.max_val_len = db.max_val_len.max(candidate);
    }

    Ok(())
}

fn group_conflicts_with_node(db: &Database, node_idx: usize, group_id: usize) -> bool {
    db.group(group_id)
        .attrvals()
        .iter()
        .any(|av| db.node_has_attr(node_idx, &av.attr))
}

/// Finishes assembling a successfully-parsed database: resolves the
/// local hostname, folds it into `maxnodelen`, and builds the
/// node-name index.
fn finalize(db: &mut Database) {
    let hostname = Config::local_hostname();
    db.max_node_len = db.max_node_len.max(hostname.len());
    db.local_hostname = hostname;
    db.build_node_index();
}
