use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::OsString;
use std::path::PathBuf;

/// Session context the shell runs commands in.
///
/// The environment contains:
/// - `vars`: a snapshot of the environment variables, used for `PATH` and
///   `HOME` lookups and passed to launched programs.
/// - `current_dir`: the session's working directory. `cd` changes this, not
///   the working directory of the shell process itself.
/// - `should_exit`: set by the `exit` builtin; the read loop stops once it is true.
#[derive(Debug, Clone)]
pub struct Environment {
    pub vars: HashMap<String, String>,
    pub current_dir: PathBuf,
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_os_vars(stdenv::vars_os(), current_dir)
    }

    /// Build an environment from raw variables, skipping any that are not
    /// valid UTF-8.
    pub fn from_os_vars(vars: impl IntoIterator<Item = (OsString, OsString)>, current_dir: impl Into<PathBuf>) -> Self {
        let vars = vars.into_iter().filter_map(|(k, v)| match (k.into_string(), v.into_string()) {
            (Ok(k), Ok(v)) => Some((k, v)),
            (k, _) => {
                tracing::debug!(key = ?k, "skipping non UTF-8 environment variable");
                None
            }
        });
        Self::with_vars(vars, current_dir)
    }

    /// Build an environment from explicit variables and working directory.
    pub fn with_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>, current_dir: impl Into<PathBuf>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            current_dir: current_dir.into(),
            should_exit: false,
        }
    }

    /// Get the value of a variable from the snapshot.
    pub fn get_var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Set or override a variable in the snapshot.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
