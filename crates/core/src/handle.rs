//! The `Genders` handle: lifecycle operations (`create`/`destroy`/
//! `load`/`lint`/`errnum`/`strerror`/`set_errnum`). Query operations
//! live in `crate::query`, as an `impl Genders` block kept separate
//! for file-size hygiene — they're one logical type.

use std::path::Path;

use crate::config::Config;
use crate::error::{ErrorCode, GendersError, Result};
use crate::model::Database;

/// Internal lifecycle state. Encodes "destroyed" as a distinct
/// variant rather than a poisoned magic number — the redesign
/// `SPEC_FULL.md` §9 calls for in a language with sum types.
#[derive(Debug)]
enum State {
    Unloaded,
    Loaded(Database),
    Destroyed,
}

/// An in-memory, read-only cluster configuration database handle.
///
/// Mirrors the lifecycle of the original `genders_t` handle:
/// `create` (via [`Genders::new`]) produces an empty, unloaded
/// handle; [`Genders::load`] populates it exactly once; every query
/// requires a loaded handle; [`Genders::destroy`] releases it and
/// poisons further use.
#[derive(Debug)]
pub struct Genders {
    state: State,
    errnum: ErrorCode,
}

impl Default for Genders {
    fn default() -> Self {
        Self::new()
    }
}

impl Genders {
    /// Creates an empty, unloaded handle. Infallible in this port —
    /// see `SPEC_FULL.md` §4.1 for why `OutMem` is not reachable here.
    pub fn new() -> Genders {
        Genders {
            state: State::Unloaded,
            errnum: ErrorCode::Success,
        }
    }

    /// Releases the handle's owned memory and poisons it: every
    /// subsequent call returns [`GendersError::Magic`] /
    /// [`ErrorCode::Magic`].
    pub fn destroy(&mut self) {
        self.state = State::Destroyed;
        self.errnum = ErrorCode::Magic;
    }

    /// The last error code recorded by a call on this handle.
    ///
    /// A destroyed handle always reports [`ErrorCode::Magic`] here,
    /// regardless of what was last recorded before `destroy` — this is
    /// itself a public operation on the handle, and every public
    /// operation is guarded against the destroyed state.
    pub fn errnum(&self) -> ErrorCode {
        if matches!(self.state, State::Destroyed) {
            return ErrorCode::Magic;
        }
        self.errnum
    }

    /// Fixed English text for `code`, matching the original
    /// `errmsg[]` table verbatim.
    pub fn strerror(code: ErrorCode) -> &'static str {
        code.message()
    }

    /// Overwrites the handle's recorded error code, as callers porting
    /// from the C API's `genders_set_errnum` might after handling an
    /// error out of band. Out-of-range raw ordinals are not exposed
    /// here since `ErrorCode` is already a closed enum; this exists
    /// for symmetry with `errnum`/`strerror`.
    pub fn set_errnum(&mut self, code: ErrorCode) {
        if matches!(self.state, State::Destroyed) {
            return;
        }
        self.errnum = code;
    }

    /// Loads `path` (or the resolved default when `None`) into this
    /// handle. Fails with [`GendersError::IsLoaded`] if already
    /// loaded, or [`GendersError::Magic`] if destroyed.
    pub fn load(&mut self, path: Option<&Path>) -> Result<()> {
        self.require_unloaded()?;

        let resolved = match path {
            Some(p) => p.to_path_buf(),
            None => Config::default_genders_file(),
        };

        match crate::io::parser::load(&resolved) {
            Ok(db) => {
                self.state = State::Loaded(db);
                self.set_ok();
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Parses `path` (or the resolved default when `None`) without
    /// mutating this handle's visible state, reporting diagnostics to
    /// `sink`. Returns the number of parse errors found; `Ok(0)`
    /// means the file is clean.
    pub fn lint(&mut self, path: Option<&Path>, sink: &mut dyn std::io::Write) -> Result<usize> {
        self.require_live()?;

        let resolved = match path {
            Some(p) => p.to_path_buf(),
            None => Config::default_genders_file(),
        };

        match crate::io::parser::lint(&resolved, sink) {
            Ok(count) => {
                self.set_ok();
                Ok(count)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Rejects the call if the handle was destroyed.
    pub(crate) fn require_live(&mut self) -> Result<()> {
        if matches!(self.state, State::Destroyed) {
            return Err(self.fail(GendersError::Magic));
        }
        Ok(())
    }

    pub(crate) fn require_unloaded(&mut self) -> Result<()> {
        self.require_live()?;
        if matches!(self.state, State::Loaded(_)) {
            return Err(self.fail(GendersError::IsLoaded));
        }
        Ok(())
    }

    pub(crate) fn require_loaded(&mut self) -> Result<&Database> {
        self.require_live()?;
        if matches!(self.state, State::Loaded(_)) {
            match &self.state {
                State::Loaded(db) => Ok(db),
                _ => unreachable!(),
            }
        } else {
            Err(self.fail(GendersError::NotLoaded))
        }
    }

    pub(crate) fn set_ok(&mut self) {
        self.errnum = ErrorCode::Success;
    }

    /// Records `err`'s code on the handle and returns it, so call
    /// sites can write `return Err(self.fail(e));`.
    pub(crate) fn fail(&mut self, err: GendersError) -> GendersError {
        self.errnum = err.code();
        err
    }
}
