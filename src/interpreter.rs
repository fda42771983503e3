use crate::command::{ExitCode, Launcher, ProcessLauncher};
use crate::dispatch::Dispatcher;
use crate::env::Environment;
use crate::lexer::split_into_tokens;
use crate::redirect::resolve_redirections;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};

/// A minimal interactive shell session.
///
/// The interpreter owns the session [`Environment`] and the [`Launcher`] used
/// for external programs. Each input line goes through tokenization,
/// redirection extraction and dispatch; errors are reported and the session
/// carries on.
///
/// Example
/// ```
/// use line_shell::Interpreter;
/// let mut sh = Interpreter::default();
/// let mut out = Vec::new();
/// let code = sh.execute_line("echo 'hello  world'", &mut out, &mut std::io::sink());
/// assert_eq!(code, 0);
/// assert_eq!(out, b"hello  world\n");
/// ```
pub struct Interpreter {
    env: Environment,
    launcher: Box<dyn Launcher>,
    last_status: ExitCode,
}

impl Interpreter {
    /// Create an interpreter with an explicit session context and launcher.
    pub fn new(env: Environment, launcher: Box<dyn Launcher>) -> Self {
        Self {
            env,
            launcher,
            last_status: 0,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Exit status of the most recent non-empty line.
    pub fn last_status(&self) -> ExitCode {
        self.last_status
    }

    /// True once `exit` has been run.
    pub fn should_exit(&self) -> bool {
        self.env.should_exit
    }

    /// Interpret one line of input.
    ///
    /// Builtin output goes to `stdout`; error messages go to `stderr`.
    /// Returns the line's exit status. Blank lines leave the status unchanged.
    pub fn execute_line(&mut self, line: &str, stdout: &mut dyn Write, stderr: &mut dyn Write) -> ExitCode {
        let line = line.trim();
        if line == "exit" {
            self.env.should_exit = true;
            return self.last_status;
        }

        let tokens = split_into_tokens(line);
        if tokens.is_empty() {
            return self.last_status;
        }
        let (command, plan) = resolve_redirections(tokens);

        let mut dispatcher = Dispatcher {
            env: &mut self.env,
            launcher: self.launcher.as_mut(),
            stdout,
        };
        self.last_status = match dispatcher.dispatch(&command, &plan) {
            Ok(status) => status,
            Err(err) => {
                tracing::debug!(error = ?err, "line failed");
                if let Err(write_err) = writeln!(stderr, "{err}") {
                    tracing::warn!(error = %write_err, "could not report error to stderr");
                }
                err.status()
            }
        };
        self.last_status
    }

    /// Read-Eval-Print Loop over the terminal.
    ///
    /// Stops on `exit`, end of input or interrupt. Other read failures are
    /// returned as errors.
    pub fn repl(&mut self, prompt: &str) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;

        while !self.env.should_exit {
            match rl.readline(prompt) {
                Ok(line) => {
                    self.execute_line(&line, &mut io::stdout(), &mut io::stderr());
                }
                Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => {
                    tracing::debug!("input closed");
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Interpreter over the current process environment, launching real processes.
    fn default() -> Self {
        Self::new(Environment::new(), Box::new(ProcessLauncher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn interpreter_in(dir: &std::path::Path) -> Interpreter {
        let mut env = Environment::new();
        env.current_dir = dir.to_path_buf();
        Interpreter::new(env, Box::new(ProcessLauncher))
    }

    fn run(sh: &mut Interpreter, line: &str) -> (ExitCode, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = sh.execute_line(line, &mut out, &mut err);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_blank_lines_produce_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = interpreter_in(dir.path());
        for line in ["", "   ", "\t \t"] {
            assert_eq!(run(&mut sh, line), (0, String::new(), String::new()));
        }
        assert!(!sh.should_exit());
    }

    #[test]
    fn test_echo_quoting() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = interpreter_in(dir.path());
        let (_, out, _) = run(&mut sh, r#"echo 'a   b' "c\"d" e\ f"#);
        assert_eq!(out, "a   b c\"d e f\n");
    }

    #[test]
    fn test_echo_redirect_truncate_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = interpreter_in(dir.path());

        run(&mut sh, "echo foo > f.txt");
        assert_eq!(fs::read_to_string(dir.path().join("f.txt")).unwrap(), "foo\n");
        run(&mut sh, "echo foo > f.txt");
        assert_eq!(fs::read_to_string(dir.path().join("f.txt")).unwrap(), "foo\n");

        run(&mut sh, "echo bar >>g.txt");
        run(&mut sh, "echo baz 1>> g.txt");
        assert_eq!(fs::read_to_string(dir.path().join("g.txt")).unwrap(), "bar\nbaz\n");
    }

    #[test]
    fn test_cd_failure_message_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = interpreter_in(dir.path());
        let (code, out, err) = run(&mut sh, "cd /no/such/dir/here");
        assert_eq!(code, 1);
        assert!(out.is_empty());
        assert_eq!(err, "cd: /no/such/dir/here: No such file or directory\n");
        assert_eq!(sh.env().current_dir, dir.path());
    }

    #[test]
    fn test_command_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = interpreter_in(dir.path());
        let (code, _, err) = run(&mut sh, "lskjdf --flag");
        assert_eq!(code, 127);
        assert_eq!(err, "lskjdf: command not found\n");
        assert_eq!(sh.last_status(), 127);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unwritable_stderr_keeps_session_going() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = interpreter_in(dir.path());

        let code = sh.execute_line("lskjdf", &mut Vec::new(), &mut BrokenPipe);
        assert_eq!(code, 127);
        assert!(!sh.should_exit());

        let mut out = Vec::new();
        assert_eq!(sh.execute_line("echo still here", &mut out, &mut BrokenPipe), 0);
        assert_eq!(out, b"still here\n");
    }

    #[test]
    fn test_exit_line_stops_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = interpreter_in(dir.path());
        run(&mut sh, "  exit  ");
        assert!(sh.should_exit());

        let mut sh = interpreter_in(dir.path());
        run(&mut sh, "exit 1 > out.txt");
        assert!(sh.should_exit());
        assert!(!dir.path().join("out.txt").exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_external_command_redirections() {
        let dir = tempfile::tempdir().unwrap();
        let mut sh = interpreter_in(dir.path());

        let (code, _, _) = run(&mut sh, "sh -c 'echo out; echo err >&2; exit 2' >o.txt 2> e.txt");
        assert_eq!(code, 2);
        assert_eq!(fs::read_to_string(dir.path().join("o.txt")).unwrap(), "out\n");
        assert_eq!(fs::read_to_string(dir.path().join("e.txt")).unwrap(), "err\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_external_command_runs_in_session_dir() {
        let dir = tempfile::tempdir().unwrap();
        let canonical = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir(canonical.join("work")).unwrap();
        let mut sh = interpreter_in(&canonical);

        run(&mut sh, "cd work");
        run(&mut sh, "sh -c pwd > where.txt");
        let printed = fs::read_to_string(canonical.join("work").join("where.txt")).unwrap();
        assert_eq!(printed.trim_end(), canonical.join("work").to_str().unwrap());
    }
}
