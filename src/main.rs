use argh::FromArgs;
use line_shell::Interpreter;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::prelude::*;

#[derive(FromArgs)]
/// A minimal interactive command-line shell.
struct Args {
    /// prompt printed before each input line
    #[argh(option, default = "String::from(\"$ \")")]
    prompt: String,

    /// interpret a single line and exit with its status
    #[argh(option, short = 'c')]
    command: Option<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Args = argh::from_env();
    let mut sh = Interpreter::default();

    if let Some(line) = args.command {
        let status = sh.execute_line(&line, &mut io::stdout(), &mut io::stderr());
        io::stdout().flush()?;
        return Ok(ExitCode::from((status & 0xff) as u8));
    }

    sh.repl(&args.prompt)?;
    Ok(ExitCode::SUCCESS)
}
