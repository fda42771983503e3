use crate::env::Environment;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Resolve `name` using the session's `PATH` and working directory.
///
/// An unset `PATH` behaves like an empty one.
pub fn resolve_command(env: &Environment, name: &str) -> Option<PathBuf> {
    let search_paths = env.get_var("PATH").unwrap_or_default();
    let found = find_command_path(OsStr::new(search_paths), &env.current_dir, name);
    tracing::debug!(name, ?found, "resolved command");
    found
}

/// Resolve a command name to an executable the way a typical shell would.
///
/// Behavior:
/// - Empty name: returns `None`.
/// - Name containing a path separator (`/bin/sh`, `./foo`, `bin/tool`): the
///   search path is not consulted; the path, relative to `current_dir` if not
///   absolute, is returned when it is executable.
/// - Bare name: delegated to [`find_in_path`].
pub fn find_command_path(search_paths: &OsStr, current_dir: &Path, name: &str) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    if name.contains(std::path::MAIN_SEPARATOR) {
        let candidate = current_dir.join(name);
        return is_executable(&candidate).then_some(candidate);
    }

    find_in_path(search_paths, current_dir, name)
}

/// Search each directory of `search_paths` in order for an executable `name`.
///
/// Empty entries are skipped, so an empty search path finds nothing. Relative
/// entries are taken relative to `current_dir` so the result is absolute.
/// Every call re-stats the candidates; nothing is cached.
pub fn find_in_path(search_paths: &OsStr, current_dir: &Path, name: &str) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| current_dir.join(dir).join(name))
        .find(|candidate| is_executable(candidate))
}

/// True if `path` is a regular file with any execute permission bit set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}
