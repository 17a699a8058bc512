//! In-memory cluster configuration database.
//!
//! A genders file assigns zero or more "attributes" (optionally valued)
//! to each node in a cluster, using compact hostname-range syntax for
//! the common case of attributes shared across many nodes:
//!
//! ```text
//! node[01-04]    compute,rack=a1
//! node[01-02]    interactive
//! master         compute,login
//! ```
//!
//! [`Genders`] loads such a file into memory and answers node/attribute
//! queries against it. The handle's lifecycle — create, load once,
//! query, destroy — and its `errnum`/`strerror` error-reporting
//! surface mirror the original C `libgenders` API; see `DESIGN.md` for
//! the redesign decisions this port makes along the way.
//!
//! ```no_run
//! use genders_core::Genders;
//!
//! let mut g = Genders::new();
//! g.load(None)?;
//! let n = g.getnumnodes()?;
//! println!("{n} nodes loaded");
//! # Ok::<(), genders_core::GendersError>(())
//! ```

mod config;
mod error;
mod expand;
mod handle;
mod io;
mod model;
mod query;

pub use config::{Config, DEFAULT_GENDERS_FILE, GENDERS_FILE_ENV};
pub use error::{ErrorCode, GendersError, Result};
pub use handle::Genders;
pub use io::{hostlist, Diagnostic, ParseError, MAX_LINE_LEN};
pub use model::{AttrVal, Database, Group, GroupId, Node, MAX_HOSTNAME_LEN};
