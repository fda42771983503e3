use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported to the user while interpreting one line.
///
/// None of them ends the session; the `Display` output is the message
/// written to the error stream.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("cd: missing argument")]
    CdMissingOperand,

    #[error("cd: HOME not set")]
    CdHomeUnset,

    #[error("cd: {0}: No such file or directory")]
    CdNoSuchDirectory(String),

    #[error("{}: {source}", .path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ShellError {
    /// Exit status recorded for a line that failed with this error.
    pub fn status(&self) -> i32 {
        match self {
            ShellError::CommandNotFound(_) => 127,
            ShellError::Launch { .. } => 126,
            _ => 1,
        }
    }
}
