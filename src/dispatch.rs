use crate::builtin;
use crate::command::{Builtin, Command, ExitCode, LaunchRequest, Launcher};
use crate::env::Environment;
use crate::error::ShellError;
use crate::path::resolve_command;
use crate::redirect::{RedirectTarget, RedirectionPlan};
use std::fs::File;
use std::io::Write;

/// Files opened for one command's redirections.
///
/// Dropping it closes them, whatever happened to the command.
#[derive(Debug, Default)]
struct OpenedRedirections {
    stdout: Option<File>,
    stderr: Option<File>,
}

impl OpenedRedirections {
    fn open(plan: &RedirectionPlan, env: &Environment) -> Result<Self, ShellError> {
        let open = |target: &Option<RedirectTarget>| {
            target
                .as_ref()
                .map(|t| {
                    t.open(&env.current_dir).map_err(|source| ShellError::Redirect {
                        path: t.path.clone(),
                        source,
                    })
                })
                .transpose()
        };
        Ok(Self {
            stdout: open(&plan.stdout)?,
            stderr: open(&plan.stderr)?,
        })
    }
}

/// Runs one command line's command tokens against the session.
///
/// `stdout` is the shell's inherited standard output, used by builtins when
/// their output is not redirected. External programs get their streams from
/// the [`LaunchRequest`] handed to `launcher`.
pub struct Dispatcher<'a> {
    pub env: &'a mut Environment,
    pub launcher: &'a mut dyn Launcher,
    pub stdout: &'a mut dyn Write,
}

impl Dispatcher<'_> {
    /// Perform the effect of `tokens` with redirections from `plan`.
    ///
    /// Empty `tokens` do nothing. Only `echo` and external programs honor
    /// the plan; `exit`, `pwd`, `cd` and `type` ignore it.
    pub fn dispatch(&mut self, tokens: &[String], plan: &RedirectionPlan) -> Result<ExitCode, ShellError> {
        let Some((name, args)) = tokens.split_first() else {
            return Ok(0);
        };

        let command = Command::classify(name);
        tracing::debug!(?command, ?args, "dispatching");

        match command {
            Command::Builtin(Builtin::Exit) => builtin::exit(self.env),
            Command::Builtin(Builtin::Echo) => {
                let opened = OpenedRedirections::open(plan, self.env)?;
                // A stderr target is only created; echo never writes to it.
                match opened.stdout {
                    Some(mut file) => builtin::echo(args, &mut file),
                    None => builtin::echo(args, self.stdout),
                }
            }
            Command::Builtin(Builtin::Pwd) => builtin::pwd(self.env, self.stdout),
            Command::Builtin(Builtin::Cd) => builtin::cd(args, self.env),
            Command::Builtin(Builtin::Type) => builtin::type_(args, self.env, self.stdout),
            Command::External(name) => self.launch(name, tokens, plan),
        }
    }

    fn launch(&mut self, name: &str, argv: &[String], plan: &RedirectionPlan) -> Result<ExitCode, ShellError> {
        let program =
            resolve_command(self.env, name).ok_or_else(|| ShellError::CommandNotFound(name.to_string()))?;
        let opened = OpenedRedirections::open(plan, self.env)?;

        let request = LaunchRequest {
            program,
            argv: argv.to_vec(),
            current_dir: self.env.current_dir.clone(),
            vars: self.env.vars.clone(),
            stdout: opened.stdout,
            stderr: opened.stderr,
        };
        tracing::debug!(?request, "launching");

        // Builtin output written so far must land before the child's.
        self.stdout.flush()?;

        let status = self.launcher.launch(request).map_err(|source| ShellError::Launch {
            program: name.to_string(),
            source,
        })?;
        tracing::debug!(name, status, "command finished");
        Ok(status)
    }
}
