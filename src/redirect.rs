//! Extraction of output redirections from a token sequence.

use regex::Regex;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Matches `>`, `>>`, `1>`, `1>>`, `2>`, `2>>`, optionally fused with a filename.
static REDIRECT_OPERATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^([12]?)(>>?)(.*)$").expect("redirection operator pattern is valid")
});

/// How a redirection target file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Create the file, or truncate it if it exists (`>`).
    Truncate,
    /// Create the file, or append to it if it exists (`>>`).
    Append,
}

/// A file a standard stream is diverted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub path: PathBuf,
    pub mode: OpenMode,
}

impl RedirectTarget {
    pub fn new(path: impl Into<PathBuf>, mode: OpenMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }

    pub fn is_append(&self) -> bool {
        self.mode == OpenMode::Append
    }

    /// Opens the target, resolving a relative path against `base`.
    ///
    /// The file is created if missing with the platform default permissions.
    pub fn open(&self, base: &Path) -> io::Result<File> {
        let path = base.join(&self.path);
        let mut options = OpenOptions::new();
        options.create(true).write(true);
        match self.mode {
            OpenMode::Truncate => options.truncate(true),
            OpenMode::Append => options.append(true),
        };
        options.open(path)
    }
}

/// Where stdout and stderr of one command line go.
///
/// `None` means the stream is inherited from the shell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectionPlan {
    pub stdout: Option<RedirectTarget>,
    pub stderr: Option<RedirectTarget>,
}

impl RedirectionPlan {
    pub fn is_empty(&self) -> bool {
        self.stdout.is_none() && self.stderr.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Parses `token` as a redirection operator.
///
/// Returns the stream, the open mode and the fused filename (empty when the
/// filename is expected in the next token).
fn parse_operator(token: &str) -> Option<(Stream, OpenMode, &str)> {
    let caps = REDIRECT_OPERATOR.captures(token)?;
    let stream = match caps.get(1).map_or("", |m| m.as_str()) {
        "2" => Stream::Stderr,
        _ => Stream::Stdout,
    };
    let mode = match caps.get(2).map_or(">", |m| m.as_str()) {
        ">>" => OpenMode::Append,
        _ => OpenMode::Truncate,
    };
    let rest = caps.get(3).map_or("", |m| m.as_str());
    Some((stream, mode, rest))
}

/// Splits `tokens` into the command tokens and the redirection plan.
///
/// Operators may stand alone (`> out.txt`) or be fused with their filename
/// (`>out.txt`). A later operator for the same stream replaces an earlier
/// one. An operator with no filename after it is dropped.
pub fn resolve_redirections(tokens: Vec<String>) -> (Vec<String>, RedirectionPlan) {
    let mut command = Vec::with_capacity(tokens.len());
    let mut plan = RedirectionPlan::default();
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        let Some((stream, mode, fused)) = parse_operator(&token) else {
            command.push(token);
            continue;
        };

        let filename = if fused.is_empty() {
            match tokens.next() {
                Some(next) => next,
                None => {
                    tracing::warn!(operator = %token, "redirection without a filename, ignoring");
                    continue;
                }
            }
        } else {
            fused.to_string()
        };

        let target = Some(RedirectTarget::new(filename, mode));
        match stream {
            Stream::Stdout => plan.stdout = target,
            Stream::Stderr => plan.stderr = target,
        }
    }

    tracing::trace!(?command, ?plan, "resolved redirections");
    (command, plan)
}
