use std::fmt;

use super::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// `<`: replace standard input.
    Input,
    /// `>` (or `>>`): replace standard output, truncating the target.
    Output,
}

impl RedirectKind {
    fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(RedirectKind::Input),
            // no append mode: `>>` truncates like `>`
            ">" | ">>" => Some(RedirectKind::Output),
            _ => None,
        }
    }
}

impl fmt::Display for RedirectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectKind::Input => write!(f, "<"),
            RedirectKind::Output => write!(f, ">"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub kind: RedirectKind,
    pub path: String,
}

/// An external command with its redirections pulled out of the argv.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub args: Vec<String>,
    pub redirections: Vec<Redirection>,
}

impl CommandSpec {
    pub fn program(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }
}

/// Scan left to right, moving every `< path` / `> path` pair out of the
/// argument list. Redirections keep the order they were written in.
pub fn split_redirections(tokens: Vec<String>) -> Result<CommandSpec, ParseError> {
    let mut args = Vec::with_capacity(tokens.len());
    let mut redirections = Vec::new();
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        match RedirectKind::from_token(&token) {
            Some(kind) => {
                let path = tokens
                    .next()
                    .ok_or(ParseError::MissingRedirectTarget(kind))?;
                redirections.push(Redirection { kind, path });
            }
            None => args.push(token),
        }
    }

    if args.is_empty() {
        return Err(ParseError::EmptyCommand);
    }

    Ok(CommandSpec { args, redirections })
}
