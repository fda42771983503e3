use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Commands implemented by the shell itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Builtin {
    Echo,
    Pwd,
    Cd,
    Type,
    Exit,
}

impl Builtin {
    /// Look a builtin up by the name the user typed.
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// A command line's first token, classified once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Builtin(Builtin),
    External(&'a str),
}

impl<'a> Command<'a> {
    pub fn classify(name: &'a str) -> Self {
        match Builtin::from_name(name) {
            Some(builtin) => Command::Builtin(builtin),
            None => Command::External(name),
        }
    }
}

/// Everything needed to start an external program.
///
/// `argv[0]` is the command name exactly as typed, which may differ from
/// `program`. Standard input is always inherited; `None` for stdout or
/// stderr means the stream is inherited too.
#[derive(Debug)]
pub struct LaunchRequest {
    pub program: PathBuf,
    pub argv: Vec<String>,
    pub current_dir: PathBuf,
    pub vars: HashMap<String, String>,
    pub stdout: Option<File>,
    pub stderr: Option<File>,
}

/// Runs external programs to completion on behalf of the dispatcher.
pub trait Launcher {
    /// Spawn the program described by `request`, wait for it and return its
    /// exit code. Errors mean the program could not be started or waited on.
    fn launch(&mut self, request: LaunchRequest) -> io::Result<ExitCode>;
}

/// [`Launcher`] backed by `std::process::Command`.
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&mut self, request: LaunchRequest) -> io::Result<ExitCode> {
        let mut cmd = std::process::Command::new(&request.program);

        #[cfg(unix)]
        if let Some(arg0) = request.argv.first() {
            use std::os::unix::process::CommandExt;
            cmd.arg0(arg0);
        }

        cmd.args(request.argv.iter().skip(1))
            .envs(request.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&request.current_dir)
            .stdin(Stdio::inherit())
            .stdout(request.stdout.map_or_else(Stdio::inherit, Stdio::from))
            .stderr(request.stderr.map_or_else(Stdio::inherit, Stdio::from));

        let exit_status = cmd.spawn()?.wait()?;
        match exit_status.code() {
            Some(x) => Ok(x),
            None => Ok(terminated_by_signal(exit_status)),
        }
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}
