use std::collections::BTreeMap;
use std::io;

mod builtin;
mod cd;

pub use builtin::{ExitCommand, StatusCommand};
pub use cd::CdCommand;

use crate::core::state::ShellState;
use crate::parse::{split_redirections, ParseError, ParsedLine};
use crate::process::executor::{Launch, ProcessExecutor};
use crate::process::{JobError, ProcessError};

#[derive(Debug)]
pub enum CommandError {
    Parse(ParseError),
    Directory { path: String, source: io::Error },
    HomeDirNotFound,
    IoError(io::Error),
    ProcessError(ProcessError),
    JobError(JobError),
}

impl CommandError {
    /// Resource exhaustion ends the session; everything else is reported and
    /// the next prompt is shown.
    pub fn is_fatal(&self) -> bool {
        match self {
            CommandError::ProcessError(e) => e.is_fatal(),
            CommandError::JobError(e) => e.is_fatal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Parse(err) => write!(f, "{}", err),
            CommandError::Directory { path, source } => write!(f, "cd: {}: {}", path, source),
            CommandError::HomeDirNotFound => write!(f, "cd: home directory not found"),
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
            CommandError::ProcessError(err) => write!(f, "{}", err),
            CommandError::JobError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<io::Error> for CommandError {
    fn from(err: io::Error) -> Self {
        CommandError::IoError(err)
    }
}

impl From<ParseError> for CommandError {
    fn from(err: ParseError) -> Self {
        CommandError::Parse(err)
    }
}

impl From<ProcessError> for CommandError {
    fn from(err: ProcessError) -> Self {
        CommandError::ProcessError(err)
    }
}

impl From<JobError> for CommandError {
    fn from(err: JobError) -> Self {
        CommandError::JobError(err)
    }
}

/// Whether the interactive cycle keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub trait Command {
    /// `args` excludes the command name itself.
    fn execute(&self, args: &[String], state: &mut ShellState) -> Result<Flow, CommandError>;
}

#[derive(Clone)]
enum CommandType {
    Cd(CdCommand),
    Status(StatusCommand),
    Exit(ExitCommand),
}

impl Command for CommandType {
    fn execute(&self, args: &[String], state: &mut ShellState) -> Result<Flow, CommandError> {
        match self {
            CommandType::Cd(cmd) => cmd.execute(args, state),
            CommandType::Status(cmd) => cmd.execute(args, state),
            CommandType::Exit(cmd) => cmd.execute(args, state),
        }
    }
}

/// Routes a parsed line to a built-in or to a new process.
#[derive(Clone)]
pub struct CommandExecutor {
    commands: BTreeMap<&'static str, CommandType>,
    process_executor: ProcessExecutor,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("cd", CommandType::Cd(CdCommand::new()));
        commands.insert("status", CommandType::Status(StatusCommand::new()));
        commands.insert("exit", CommandType::Exit(ExitCommand::new()));

        Self {
            commands,
            process_executor: ProcessExecutor::new(),
        }
    }

    pub fn execute(&self, line: ParsedLine, state: &mut ShellState) -> Result<Flow, CommandError> {
        let Some(command) = line.args.first() else {
            return Ok(Flow::Continue);
        };
        if command.starts_with('#') {
            return Ok(Flow::Continue);
        }

        if let Some(cmd) = self.commands.get(command.as_str()) {
            return cmd.execute(&line.args[1..], state);
        }

        self.launch(line, state)?;
        Ok(Flow::Continue)
    }

    fn launch(&self, line: ParsedLine, state: &mut ShellState) -> Result<(), CommandError> {
        let background = line.background;
        let spec = split_redirections(line.args)?;
        if background {
            state.jobs.ensure_capacity()?;
        }

        match self.process_executor.launch(&spec, background)? {
            Launch::Foreground(status) => {
                state.record_foreground(status);
                if status.is_signaled() {
                    println!("{}", status);
                }
            }
            Launch::Background { pid, finished } => {
                state.jobs.register(pid, finished)?;
                println!("The background process ID is: {}", pid);
            }
        }
        Ok(())
    }
}
