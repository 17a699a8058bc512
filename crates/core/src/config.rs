//! Resolution of the default genders database path.
//!
//! Mirrors the layered override pattern this pack's CLIs use for
//! config resolution: an environment variable takes precedence over a
//! compile-time default.

use std::env;
use std::path::PathBuf;

/// Compile-time default database path, used when neither a caller path
/// nor the `GENDERS_FILE` environment variable is set.
pub const DEFAULT_GENDERS_FILE: &str = "/etc/genders";

/// Environment variable checked before falling back to
/// [`DEFAULT_GENDERS_FILE`].
pub const GENDERS_FILE_ENV: &str = "GENDERS_FILE";

/// Resolves the database path `load`/`lint` use when called with `None`.
#[derive(Debug, Clone)]
pub struct Config;

impl Config {
    /// Returns `$GENDERS_FILE` if set and non-empty, else
    /// [`DEFAULT_GENDERS_FILE`].
    pub fn default_genders_file() -> PathBuf {
        match env::var(GENDERS_FILE_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(DEFAULT_GENDERS_FILE),
        }
    }

    /// Best-effort local short hostname, truncated at the first `.`.
    ///
    /// Tries `$HOSTNAME` first, then `/proc/sys/kernel/hostname` (the
    /// Linux-only source of truth when the environment variable isn't
    /// set), and falls back to an empty string rather than failing
    /// `load` — a cluster config database with no matching local node
    /// is a perfectly ordinary setup.
    pub fn local_hostname() -> String {
        let raw = env::var("HOSTNAME")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                std::fs::read_to_string("/proc/sys/kernel/hostname")
                    .ok()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_default();
        match raw.split_once('.') {
            Some((short, _)) => short.to_string(),
            None => raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // GENDERS_FILE_ENV is process-global state; serialize the tests that
    // touch it so they don't race under `cargo test`'s default thread pool.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn falls_back_to_default_when_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::remove_var(GENDERS_FILE_ENV);
        assert_eq!(
            Config::default_genders_file(),
            PathBuf::from(DEFAULT_GENDERS_FILE)
        );
    }

    #[test]
    fn honors_env_override() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var(GENDERS_FILE_ENV, "/tmp/my-genders");
        assert_eq!(
            Config::default_genders_file(),
            PathBuf::from("/tmp/my-genders")
        );
        env::remove_var(GENDERS_FILE_ENV);
    }
}
