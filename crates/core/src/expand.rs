//! `%n` / `%%` substitution.
//!
//! `%n` expands to the name of the node a value is being evaluated
//! against; `%%` is a literal `%`. Per the redesign in `SPEC_FULL.md`
//! §9, the scratch buffer is allocated fresh per call rather than
//! shared on the handle, which is the "acceptable strengthening" the
//! original spec's concurrency section explicitly invites.

use std::borrow::Cow;

use crate::error::{GendersError, Result};

/// Whether `value` contains a substitution token at all. Values
/// without `%n`/`%%` never allocate a scratch buffer — see
/// [`substituted`].
pub fn needs_expansion(value: &str) -> bool {
    value.contains("%n") || value.contains("%%")
}

/// Returns `value` unchanged if it needs no substitution, or the
/// expansion of `value` against `node_name` otherwise.
///
/// `max_val_len` is the handle's precomputed `maxvallen` (§4.4),
/// used only to validate the loader's bookkeeping — see the
/// `Internal` error case below, which should never trigger for a
/// value that actually came from a successfully-loaded database.
pub fn substituted<'a>(value: &'a str, node_name: &str, max_val_len: usize) -> Result<Cow<'a, str>> {
    if !needs_expansion(value) {
        return Ok(Cow::Borrowed(value));
    }

    if value.len().saturating_sub(2) + node_name.len() > max_val_len + 1 {
        return Err(GendersError::Internal(
            "value length after %n substitution exceeds precomputed maxvallen",
        ));
    }

    let mut out = String::with_capacity(value.len() + node_name.len());
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 1 < bytes.len() {
            match bytes[i + 1] {
                b'%' => {
                    out.push('%');
                    i += 2;
                    continue;
                }
                b'n' => {
                    out.push_str(node_name);
                    i += 2;
                    continue;
                }
                _ => {
                    // A lone `%` followed by anything other than `n` or
                    // `%` emits `%` literally, then falls through to
                    // process the next byte as ordinary input. This is
                    // not a strict escape grammar — preserved verbatim
                    // per the Open Question in SPEC_FULL.md §9.
                    out.push('%');
                    i += 1;
                    continue;
                }
            }
        }
        // Safe: we only ever re-slice at byte boundaries we arrived at
        // by stepping over whole `char`s below.
        let ch_len = utf8_char_len(bytes[i]);
        let end = (i + ch_len).min(bytes.len());
        out.push_str(std::str::from_utf8(&bytes[i..end]).unwrap_or("\u{FFFD}"));
        i = end;
    }

    Ok(Cow::Owned(out))
}

fn utf8_char_len(first_byte: u8) -> usize {
    if first_byte & 0x80 == 0 {
        1
    } else if first_byte & 0xE0 == 0xC0 {
        2
    } else if first_byte & 0xF0 == 0xE0 {
        3
    } else if first_byte & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_without_percent_is_unchanged() {
        let out = substituted("plain-value", "n1", 64).unwrap();
        assert_eq!(out, "plain-value");
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn percent_n_expands_to_node_name() {
        let out = substituted("/srv/%n/data", "n2", 64).unwrap();
        assert_eq!(out, "/srv/n2/data");
    }

    #[test]
    fn double_percent_is_literal_percent() {
        let out = substituted("%%root", "n1", 64).unwrap();
        assert_eq!(out, "%root");
    }

    #[test]
    fn lone_percent_before_other_char_emits_percent_and_continues() {
        // "%x" -> "%" followed by ordinary "x".
        let out = substituted("a%xb", "n1", 64).unwrap();
        assert_eq!(out, "a%xb");
    }

    #[test]
    fn internal_error_when_precomputed_bound_is_too_small() {
        let err = substituted("%n", "a-very-long-node-name-indeed", 1).unwrap_err();
        assert!(matches!(err, GendersError::Internal(_)));
    }
}
