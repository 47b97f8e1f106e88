use crate::core::commands::CommandError;
use crate::core::config::ConfigError;
use crate::process::ProcessError;

#[derive(Debug)]
pub enum ShellError {
    Readline(rustyline::error::ReadlineError),
    Io(std::io::Error),
    CommandError(CommandError),
    ProcessError(ProcessError),
    ConfigError(ConfigError),
    FlagError(String),
}

impl ShellError {
    /// Fatal errors end the session after tracked jobs are cleaned up.
    pub fn is_fatal(&self) -> bool {
        match self {
            ShellError::CommandError(e) => e.is_fatal(),
            ShellError::ProcessError(e) => e.is_fatal(),
            _ => true,
        }
    }
}

impl From<rustyline::error::ReadlineError> for ShellError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ShellError::Readline(err)
    }
}

impl From<std::io::Error> for ShellError {
    fn from(err: std::io::Error) -> Self {
        ShellError::Io(err)
    }
}

impl From<CommandError> for ShellError {
    fn from(err: CommandError) -> Self {
        ShellError::CommandError(err)
    }
}

impl From<ProcessError> for ShellError {
    fn from(err: ProcessError) -> Self {
        ShellError::ProcessError(err)
    }
}

impl From<ConfigError> for ShellError {
    fn from(err: ConfigError) -> Self {
        ShellError::ConfigError(err)
    }
}

impl std::fmt::Display for ShellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShellError::Readline(e) => write!(f, "Readline error: {}", e),
            ShellError::Io(e) => write!(f, "IO error: {}", e),
            ShellError::CommandError(e) => write!(f, "{}", e),
            ShellError::ProcessError(e) => write!(f, "Process error: {}", e),
            ShellError::ConfigError(e) => write!(f, "Config error: {}", e),
            ShellError::FlagError(msg) => write!(f, "Flag error: {}", msg),
        }
    }
}

impl std::error::Error for ShellError {}
