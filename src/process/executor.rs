use std::ffi::CString;
use std::io::{self, Write};
use std::ptr;

use super::redirect::{self, PreparedRedirect};
use super::{signal, wait_pid, Pid, ProcessError};
use crate::core::state::ExitStatus;
use crate::parse::CommandSpec;

/// What the parent ends up with after launching a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// The child ran to completion while the shell waited.
    Foreground(ExitStatus),
    /// The child keeps running. `finished` is set when the immediate
    /// non-blocking poll already collected it.
    Background {
        pid: Pid,
        finished: Option<ExitStatus>,
    },
}

/// Everything the child needs, built before `fork` so the child never
/// allocates.
struct ExecPlan {
    argv: Vec<CString>,
    redirects: Vec<PreparedRedirect>,
    not_found: Vec<u8>,
}

impl ExecPlan {
    fn new(spec: &CommandSpec, background: bool) -> Result<Self, ProcessError> {
        let argv = spec
            .args
            .iter()
            .map(|arg| CString::new(arg.as_str()).map_err(|_| ProcessError::NulByte(arg.clone())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            argv,
            redirects: redirect::prepare(&spec.redirections, background)?,
            not_found: format!("{}: no such command\n", spec.program()).into_bytes(),
        })
    }
}

#[derive(Clone, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Fork and exec `spec`. In the foreground this blocks until the child
    /// terminates; in the background it returns right after the child is
    /// created.
    pub fn launch(&self, spec: &CommandSpec, background: bool) -> Result<Launch, ProcessError> {
        let plan = ExecPlan::new(spec, background)?;
        let mut argv_ptrs: Vec<*const libc::c_char> =
            plan.argv.iter().map(|arg| arg.as_ptr()).collect();
        argv_ptrs.push(ptr::null());

        // Anything still buffered would otherwise be lost or reordered around
        // the child's output.
        let _ = io::stdout().flush();

        let pid = unsafe { libc::fork() };
        match pid {
            -1 => Err(ProcessError::Fork(io::Error::last_os_error())),
            0 => unsafe { exec_child(&plan, &argv_ptrs, background) },
            pid => {
                log::debug!(
                    "forked {} for {:?} ({})",
                    pid,
                    spec.program(),
                    if background { "background" } else { "foreground" }
                );
                if background {
                    let finished = wait_pid(pid, true).map_err(ProcessError::Wait)?;
                    Ok(Launch::Background { pid, finished })
                } else {
                    let status = wait_foreground(pid)?;
                    log::debug!("foreground {} finished: {}", pid, status);
                    Ok(Launch::Foreground(status))
                }
            }
        }
    }
}

fn wait_foreground(pid: Pid) -> Result<ExitStatus, ProcessError> {
    match wait_pid(pid, false) {
        Ok(Some(status)) => Ok(status),
        Ok(None) => Err(ProcessError::Other(format!(
            "blocking wait for {} returned without a status",
            pid
        ))),
        Err(e) => Err(ProcessError::Wait(e)),
    }
}

unsafe fn exec_child(plan: &ExecPlan, argv: &[*const libc::c_char], background: bool) -> ! {
    signal::restore_child_signals(background);
    redirect::apply_in_child(&plan.redirects);
    libc::execvp(argv[0], argv.as_ptr());
    redirect::child_fail(&plan.not_found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{split_redirections, RedirectKind, Redirection};
    use serial_test::serial;
    use std::fs;

    fn spec(line: &str) -> CommandSpec {
        split_redirections(line.split_whitespace().map(String::from).collect()).unwrap()
    }

    #[test]
    #[serial]
    fn test_foreground_exit_code() {
        // "exit 3" has to reach sh as one argument, so build the spec by hand.
        let spec = CommandSpec {
            args: vec!["sh".into(), "-c".into(), "exit 3".into()],
            redirections: Vec::new(),
        };
        assert_eq!(
            ProcessExecutor::new().launch(&spec, false).unwrap(),
            Launch::Foreground(ExitStatus::Exited(3))
        );
    }

    #[test]
    #[serial]
    fn test_foreground_killed_by_signal() {
        let spec = CommandSpec {
            args: vec!["sh".into(), "-c".into(), "kill -9 $$".into()],
            redirections: Vec::new(),
        };
        assert_eq!(
            ProcessExecutor::new().launch(&spec, false).unwrap(),
            Launch::Foreground(ExitStatus::Signaled(9))
        );
    }

    #[test]
    #[serial]
    fn test_child_does_not_inherit_ignored_sigpipe() {
        // SigIgn is a hex mask; bit 13 (0x1000) is SIGPIPE
        let spec = CommandSpec {
            args: vec![
                "sh".into(),
                "-c".into(),
                "m=$(grep SigIgn /proc/self/status | cut -f2); [ $(( 0x$m & 0x1000 )) -eq 0 ]"
                    .into(),
            ],
            redirections: Vec::new(),
        };
        assert_eq!(
            ProcessExecutor::new().launch(&spec, false).unwrap(),
            Launch::Foreground(ExitStatus::Exited(0))
        );
    }

    #[test]
    #[serial]
    fn test_unknown_command_fails_only_the_child() {
        let launch = ProcessExecutor::new()
            .launch(&spec("definitely-not-a-real-command-xyz"), false)
            .unwrap();
        assert_eq!(launch, Launch::Foreground(ExitStatus::Exited(1)));
    }

    #[test]
    #[serial]
    fn test_output_then_input_redirection() {
        let dir = std::env::temp_dir().join(format!("smallsh-exec-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let out = dir.join("out.txt");
        fs::write(&out, "stale content that must be truncated\n").unwrap();

        let executor = ProcessExecutor::new();
        let echo = CommandSpec {
            args: vec!["echo".into(), "hi".into()],
            redirections: vec![Redirection {
                kind: RedirectKind::Output,
                path: out.to_string_lossy().into_owned(),
            }],
        };
        assert_eq!(
            executor.launch(&echo, false).unwrap(),
            Launch::Foreground(ExitStatus::Exited(0))
        );
        assert_eq!(fs::read_to_string(&out).unwrap(), "hi\n");

        let wc = CommandSpec {
            args: vec!["wc".into(), "-l".into()],
            redirections: vec![Redirection {
                kind: RedirectKind::Input,
                path: out.to_string_lossy().into_owned(),
            }],
        };
        assert_eq!(
            executor.launch(&wc, false).unwrap(),
            Launch::Foreground(ExitStatus::Exited(0))
        );

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_missing_input_file_fails_the_child() {
        let cat = CommandSpec {
            args: vec!["cat".into()],
            redirections: vec![Redirection {
                kind: RedirectKind::Input,
                path: "/nonexistent/smallsh/input".into(),
            }],
        };
        assert_eq!(
            ProcessExecutor::new().launch(&cat, false).unwrap(),
            Launch::Foreground(ExitStatus::Exited(1))
        );
    }

    #[test]
    #[serial]
    fn test_background_returns_immediately() {
        let sleeper = CommandSpec {
            args: vec!["sleep".into(), "5".into()],
            redirections: Vec::new(),
        };
        let launch = ProcessExecutor::new().launch(&sleeper, true).unwrap();
        let Launch::Background { pid, finished } = launch else {
            panic!("expected a background launch, got {:?}", launch);
        };
        assert!(pid > 0);
        assert_eq!(finished, None);

        unsafe {
            libc::kill(pid, libc::SIGKILL);
        }
        assert_eq!(
            wait_pid(pid, false).unwrap(),
            Some(ExitStatus::Signaled(libc::SIGKILL))
        );
    }
}
