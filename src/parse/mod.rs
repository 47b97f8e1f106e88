use std::fmt;

pub mod redirect;
pub mod tokenize;

pub use redirect::{split_redirections, CommandSpec, RedirectKind, Redirection};
pub use tokenize::{expand, ParsedLine};

/// Problems with what the user typed. The line is dropped and the shell moves
/// on to the next prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    TooLong { len: usize, limit: usize },
    MissingRedirectTarget(RedirectKind),
    EmptyCommand,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::TooLong { len, limit } => {
                write!(f, "line too long: {} bytes (must be under {})", len, limit)
            }
            ParseError::MissingRedirectTarget(kind) => {
                write!(f, "syntax error: expected a file name after '{}'", kind)
            }
            ParseError::EmptyCommand => write!(f, "syntax error: no command to run"),
        }
    }
}

impl std::error::Error for ParseError {}
