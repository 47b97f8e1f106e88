use std::fmt;

use crate::process::jobs::JobRegistry;

/// Decoded outcome of a finished child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Exited(i32),
    Signaled(i32),
}

impl ExitStatus {
    /// Decode a raw status word as filled in by `waitpid`.
    pub fn from_raw(status: libc::c_int) -> Self {
        if libc::WIFEXITED(status) {
            ExitStatus::Exited(libc::WEXITSTATUS(status))
        } else {
            ExitStatus::Signaled(libc::WTERMSIG(status))
        }
    }

    pub fn is_signaled(&self) -> bool {
        matches!(self, ExitStatus::Signaled(_))
    }
}

impl Default for ExitStatus {
    fn default() -> Self {
        ExitStatus::Exited(0)
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatus::Exited(code) => write!(f, "exit value {}", code),
            ExitStatus::Signaled(signal) => write!(f, "terminated by signal {}.", signal),
        }
    }
}

/// Transition reported when foreground-only mode flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChange {
    Entered,
    Left,
}

impl fmt::Display for ModeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeChange::Entered => write!(f, "Now entering foreground-only mode (& is now ignored)"),
            ModeChange::Left => write!(f, "Leaving foreground-only mode"),
        }
    }
}

/// Session-wide mutable state, owned by the main cycle.
///
/// Signal handlers never touch this directly; they raise atomic flags that the
/// cycle drains and then applies here.
pub struct ShellState {
    status: ExitStatus,
    foreground_only: bool,
    pub jobs: JobRegistry,
}

impl ShellState {
    pub fn new(max_jobs: usize) -> Self {
        Self {
            status: ExitStatus::default(),
            foreground_only: false,
            jobs: JobRegistry::new(max_jobs),
        }
    }

    pub fn status(&self) -> ExitStatus {
        self.status
    }

    /// Only foreground completions land here; background results go through
    /// the job registry.
    pub fn record_foreground(&mut self, status: ExitStatus) {
        self.status = status;
    }

    pub fn foreground_only(&self) -> bool {
        self.foreground_only
    }

    pub fn toggle_foreground_only(&mut self) -> ModeChange {
        self.foreground_only = !self.foreground_only;
        log::debug!("foreground-only mode is now {}", self.foreground_only);
        if self.foreground_only {
            ModeChange::Entered
        } else {
            ModeChange::Left
        }
    }
}
