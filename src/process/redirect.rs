//! Redirections as the child applies them.
//!
//! Everything that allocates happens in [`prepare`], before `fork`. The child
//! side only calls `open`, `dup2`, `close`, `write` and `_exit`.

use std::ffi::CString;

use super::ProcessError;
use crate::parse::{RedirectKind, Redirection};

const DEV_NULL: &str = "/dev/null";

#[derive(Debug)]
pub(crate) struct PreparedRedirect {
    target_fd: libc::c_int,
    flags: libc::c_int,
    path: CString,
    failure: Vec<u8>,
}

impl PreparedRedirect {
    fn new(kind: RedirectKind, path: &str) -> Result<Self, ProcessError> {
        let (target_fd, flags, direction) = match kind {
            RedirectKind::Input => (libc::STDIN_FILENO, libc::O_RDONLY, "input"),
            RedirectKind::Output => (
                libc::STDOUT_FILENO,
                libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC,
                "output",
            ),
        };
        let c_path =
            CString::new(path).map_err(|_| ProcessError::NulByte(path.to_string()))?;

        Ok(Self {
            target_fd,
            flags,
            path: c_path,
            failure: format!("cannot open {} for {}\n", path, direction).into_bytes(),
        })
    }
}

/// Resolve what the child will open. Background jobs get `/dev/null` for any
/// standard stream the user did not redirect.
pub(crate) fn prepare(
    redirections: &[Redirection],
    background: bool,
) -> Result<Vec<PreparedRedirect>, ProcessError> {
    let mut prepared = Vec::with_capacity(redirections.len() + 2);

    if background {
        for kind in [RedirectKind::Input, RedirectKind::Output] {
            if !redirections.iter().any(|r| r.kind == kind) {
                prepared.push(PreparedRedirect::new(kind, DEV_NULL)?);
            }
        }
    }

    for redirection in redirections {
        prepared.push(PreparedRedirect::new(redirection.kind, &redirection.path)?);
    }

    Ok(prepared)
}

/// Rewire the standard descriptors in the freshly forked child. On the first
/// failure the diagnostic is written to stderr and the child exits with 1.
///
/// # Safety
/// Must only be called in the child between `fork` and `exec`.
pub(crate) unsafe fn apply_in_child(prepared: &[PreparedRedirect]) {
    for redirect in prepared {
        let fd = libc::open(redirect.path.as_ptr(), redirect.flags, 0o644 as libc::c_uint);
        if fd < 0 {
            child_fail(&redirect.failure);
        }
        if fd != redirect.target_fd {
            if libc::dup2(fd, redirect.target_fd) < 0 {
                child_fail(&redirect.failure);
            }
            libc::close(fd);
        }
    }
}

/// Write `message` to stderr and leave the child without running any of the
/// parent's destructors or atexit hooks.
pub(crate) unsafe fn child_fail(message: &[u8]) -> ! {
    libc::write(
        libc::STDERR_FILENO,
        message.as_ptr() as *const libc::c_void,
        message.len(),
    );
    libc::_exit(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirection(kind: RedirectKind, path: &str) -> Redirection {
        Redirection {
            kind,
            path: path.to_string(),
        }
    }

    #[test]
    fn test_prepare_foreground_keeps_order() {
        let prepared = prepare(
            &[
                redirection(RedirectKind::Output, "out.txt"),
                redirection(RedirectKind::Input, "in.txt"),
            ],
            false,
        )
        .unwrap();

        assert_eq!(prepared.len(), 2);
        assert_eq!(prepared[0].target_fd, libc::STDOUT_FILENO);
        assert_eq!(prepared[0].path.to_str().unwrap(), "out.txt");
        assert_eq!(prepared[1].target_fd, libc::STDIN_FILENO);
        assert_eq!(prepared[1].flags, libc::O_RDONLY);
        assert_eq!(prepared[1].failure, b"cannot open in.txt for input\n");
    }

    #[test]
    fn test_prepare_background_defaults_to_dev_null() {
        let prepared = prepare(&[], true).unwrap();
        assert_eq!(prepared.len(), 2);
        assert!(prepared.iter().all(|p| p.path.to_str().unwrap() == DEV_NULL));
    }

    #[test]
    fn test_prepare_background_respects_user_redirect() {
        let prepared = prepare(&[redirection(RedirectKind::Output, "log.txt")], true).unwrap();
        assert_eq!(prepared.len(), 2);
        assert_eq!(prepared[0].target_fd, libc::STDIN_FILENO);
        assert_eq!(prepared[0].path.to_str().unwrap(), DEV_NULL);
        assert_eq!(prepared[1].path.to_str().unwrap(), "log.txt");
    }

    #[test]
    fn test_prepare_rejects_nul_byte() {
        let result = prepare(&[redirection(RedirectKind::Input, "a\0b")], false);
        assert!(matches!(result, Err(ProcessError::NulByte(_))));
    }
}
