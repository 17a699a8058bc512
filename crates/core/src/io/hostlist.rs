//! Hostname range expansion.
//!
//! Turns a token such as `n[01-03]` into the ordered sequence
//! `n01, n02, n03`. This is the "hostname range expander" collaborator
//! `SPEC_FULL.md` §6 describes — no published crate implements this
//! exact bracket notation, so it lives here behind the narrow
//! `expand` function the parser consumes, rather than as a bespoke
//! dependency.
//!
//! Supported grammar (informally):
//!
//! ```text
//! token   := item (',' item)*
//! item    := prefix '[' rangelist ']' suffix | plain
//! rangelist := range (',' range)*
//! range   := digits | digits '-' digits
//! ```
//!
//! A `digits` component with a leading zero fixes the zero-padded
//! width for every value that range produces (`[01-03]` yields
//! `01, 02, 03`, not `1, 2, 3`).

use crate::error::GendersError;

/// Expands a nodename-range token into the ordered node names it
/// denotes. Order matches the order the ranges and list elements
/// appear in `token`.
pub fn expand(token: &str) -> crate::error::Result<Vec<String>> {
    if token.is_empty() {
        return Err(GendersError::Parameters("empty nodename-range token"));
    }

    let mut out = Vec::new();
    for item in split_top_level_commas(token) {
        expand_item(item, &mut out)?;
    }
    Ok(out)
}

/// Splits on commas that are not nested inside `[...]`.
fn split_top_level_commas(token: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, ch) in token.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&token[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&token[start..]);
    parts
}

fn expand_item(item: &str, out: &mut Vec<String>) -> crate::error::Result<()> {
    match (item.find('['), item.rfind(']')) {
        (Some(open), Some(close)) if open < close => {
            let prefix = &item[..open];
            let suffix = &item[close + 1..];
            let inner = &item[open + 1..close];
            for range in inner.split(',') {
                expand_range(prefix, range, suffix, out)?;
            }
            Ok(())
        }
        _ => {
            out.push(item.to_string());
            Ok(())
        }
    }
}

fn expand_range(
    prefix: &str,
    range: &str,
    suffix: &str,
    out: &mut Vec<String>,
) -> crate::error::Result<()> {
    match range.split_once('-') {
        Some((lo, hi)) => {
            let (lo_val, lo_width) = parse_component(lo)?;
            let (hi_val, _) = parse_component(hi)?;
            if hi_val < lo_val {
                return Err(GendersError::Parameters(
                    "nodename-range: descending numeric range",
                ));
            }
            for n in lo_val..=hi_val {
                out.push(format!("{prefix}{n:0width$}{suffix}", width = lo_width));
            }
            Ok(())
        }
        None => {
            if let Ok((val, width)) = parse_component(range) {
                out.push(format!("{prefix}{val:0width$}{suffix}", width = width));
            } else {
                // Non-numeric bracket element, e.g. `n[a,b]`: pass through
                // literally rather than rejecting the whole token.
                out.push(format!("{prefix}{range}{suffix}"));
            }
            Ok(())
        }
    }
}

/// Parses a bracket component as a number, returning its value and the
/// zero-padded width it should be rendered at.
fn parse_component(s: &str) -> crate::error::Result<(u64, usize)> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GendersError::Parameters(
            "nodename-range: non-numeric bracket component",
        ));
    }
    let val: u64 = s
        .parse()
        .map_err(|_| GendersError::Parameters("nodename-range: number too large"))?;
    let width = if s.len() > 1 && s.starts_with('0') {
        s.len()
    } else {
        0
    };
    Ok((val, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name_passes_through() {
        assert_eq!(expand("n1").unwrap(), vec!["n1"]);
    }

    #[test]
    fn simple_range() {
        assert_eq!(expand("n[1-3]").unwrap(), vec!["n1", "n2", "n3"]);
    }

    #[test]
    fn zero_padded_range() {
        assert_eq!(expand("n[01-03]").unwrap(), vec!["n01", "n02", "n03"]);
    }

    #[test]
    fn mixed_list_and_range() {
        assert_eq!(
            expand("n[1-3,5]").unwrap(),
            vec!["n1", "n2", "n3", "n5"]
        );
    }

    #[test]
    fn comma_separated_items() {
        assert_eq!(expand("a,b[1-2]").unwrap(), vec!["a", "b1", "b2"]);
    }

    #[test]
    fn suffix_after_bracket() {
        assert_eq!(expand("n[1-2]-ib0").unwrap(), vec!["n1-ib0", "n2-ib0"]);
    }

    #[test]
    fn descending_range_is_an_error() {
        assert!(expand("n[3-1]").is_err());
    }
}
