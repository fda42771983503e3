//! A minimal interactive command-line shell.
//!
//! Each input line is split into shell-style tokens, output redirections
//! (`>`, `>>`, `1>`, `1>>`, `2>`, `2>>`) are extracted, and the remaining
//! command is either run as a builtin (`echo`, `pwd`, `cd`, `type`, `exit`)
//! or resolved on `PATH` and launched as an external program.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`],
//! [`env`] and [`error`] expose the session context, the launch seam for
//! external programs and the error type.

mod builtin;
pub mod command;
mod dispatch;
pub mod env;
pub mod error;
mod interpreter;
mod lexer;
mod path;
mod redirect;

pub use dispatch::Dispatcher;
pub use interpreter::Interpreter;
pub use lexer::split_into_tokens;
pub use path::{find_command_path, find_in_path, resolve_command};
pub use redirect::{OpenMode, RedirectTarget, RedirectionPlan, resolve_redirections};
