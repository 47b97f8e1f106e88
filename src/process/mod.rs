use std::fmt;
use std::io;

use crate::core::state::ExitStatus;

pub mod executor;
pub mod jobs;
pub mod redirect;
pub mod signal;

pub type Pid = libc::pid_t;

#[derive(Debug)]
pub enum ProcessError {
    Fork(io::Error),
    Wait(io::Error),
    NulByte(String),
    SignalError(String),
    Other(String),
}

impl ProcessError {
    /// Failing to create a process means the system is out of resources; the
    /// shell cannot keep going.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProcessError::Fork(_))
    }
}

impl From<io::Error> for ProcessError {
    fn from(e: io::Error) -> Self {
        ProcessError::Other(e.to_string())
    }
}

impl From<ctrlc::Error> for ProcessError {
    fn from(e: ctrlc::Error) -> Self {
        ProcessError::SignalError(e.to_string())
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Fork(e) => write!(f, "cannot create child process: {}", e),
            ProcessError::Wait(e) => write!(f, "wait failed: {}", e),
            ProcessError::NulByte(arg) => write!(f, "argument contains a nul byte: {:?}", arg),
            ProcessError::SignalError(msg) => write!(f, "Signal error: {}", msg),
            ProcessError::Other(msg) => write!(f, "Other error: {}", msg),
        }
    }
}

impl std::error::Error for ProcessError {}

#[derive(Debug, PartialEq, Eq)]
pub enum JobError {
    Capacity(usize),
    Duplicate(Pid),
}

impl JobError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, JobError::Capacity(_))
    }
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::Capacity(max) => {
                write!(f, "too many background jobs (limit is {})", max)
            }
            JobError::Duplicate(pid) => write!(f, "pid {} is already tracked", pid),
        }
    }
}

impl std::error::Error for JobError {}

/// `waitpid` for one child. With `nohang`, `Ok(None)` means it is still
/// running. Interrupted waits are retried.
pub(crate) fn wait_pid(pid: Pid, nohang: bool) -> io::Result<Option<ExitStatus>> {
    let options = if nohang { libc::WNOHANG } else { 0 };
    let mut status: libc::c_int = 0;
    loop {
        let rc = unsafe { libc::waitpid(pid, &mut status, options) };
        if rc == pid {
            return Ok(Some(ExitStatus::from_raw(status)));
        }
        if rc == 0 {
            return Ok(None);
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}
