mod editor;
mod plain;

pub use editor::EditorSource;
pub use plain::StdinSource;

use crate::error::ShellError;
use crate::process::signal::SignalFlags;

/// Where raw command lines come from.
pub trait LineSource {
    /// The next line without its terminator, or `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError>;

    /// Whether a person is typing at a terminal.
    fn is_interactive(&self) -> bool;
}

/// Pick a line editor for terminals and a plain reader for anything else
/// (pipes, files, test harnesses).
pub fn open(show_prompt: bool, signals: &SignalFlags) -> Result<Box<dyn LineSource>, ShellError> {
    let tty = unsafe { libc::isatty(libc::STDIN_FILENO) == 1 && libc::isatty(libc::STDOUT_FILENO) == 1 };
    if tty {
        log::debug!("reading input with the line editor");
        Ok(Box::new(EditorSource::new(show_prompt, signals.clone())?))
    } else {
        log::debug!("reading input from plain stdin");
        Ok(Box::new(StdinSource::new(show_prompt)))
    }
}
