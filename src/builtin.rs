//! Effects of the commands implemented by the shell itself.

use crate::command::{Builtin, ExitCode};
use crate::env::Environment;
use crate::error::ShellError;
use crate::path::resolve_command;
use std::fs;
use std::io::Write;

/// Write the arguments separated by spaces, followed by a newline.
pub(crate) fn echo(args: &[String], stdout: &mut dyn Write) -> Result<ExitCode, ShellError> {
    writeln!(stdout, "{}", args.join(" "))?;
    Ok(0)
}

/// Print the session's working directory.
pub(crate) fn pwd(env: &Environment, stdout: &mut dyn Write) -> Result<ExitCode, ShellError> {
    writeln!(stdout, "{}", env.current_dir.display())?;
    Ok(0)
}

/// Change the session's working directory.
///
/// A bare `~` stands for `$HOME`. Arguments after the first are ignored.
pub(crate) fn cd(args: &[String], env: &mut Environment) -> Result<ExitCode, ShellError> {
    let arg = args.first().ok_or(ShellError::CdMissingOperand)?;
    let target = if arg == "~" {
        env.get_var("HOME").ok_or(ShellError::CdHomeUnset)?.to_string()
    } else {
        arg.clone()
    };

    let new_dir = env.current_dir.join(&target);
    match fs::canonicalize(&new_dir) {
        // Looking up `.` inside needs search permission, like chdir does.
        Ok(canonical) if canonical.is_dir() && fs::metadata(canonical.join(".")).is_ok() => {
            tracing::debug!(dir = %canonical.display(), "changed directory");
            env.set_var("PWD", canonical.to_string_lossy());
            env.current_dir = canonical;
            Ok(0)
        }
        _ => Err(ShellError::CdNoSuchDirectory(target)),
    }
}

/// Report how each name would be interpreted as a command.
///
/// Exits with 1 if any name could not be found.
pub(crate) fn type_(
    args: &[String],
    env: &Environment,
    stdout: &mut dyn Write,
) -> Result<ExitCode, ShellError> {
    let mut status = 0;
    for name in args {
        if Builtin::from_name(name).is_some() {
            writeln!(stdout, "{name} is a shell builtin")?;
        } else if let Some(path) = resolve_command(env, name) {
            writeln!(stdout, "{name} is {}", path.display())?;
        } else {
            writeln!(stdout, "{name}: not found")?;
            status = 1;
        }
    }
    Ok(status)
}

/// Ask the read loop to stop. Arguments are ignored.
pub(crate) fn exit(env: &mut Environment) -> Result<ExitCode, ShellError> {
    env.should_exit = true;
    Ok(0)
}
