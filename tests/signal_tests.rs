use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread;
use std::time::Duration;

struct Session {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl Session {
    /// Start the shell and wait until it has answered one command, so its
    /// signal handlers are known to be in place.
    fn start() -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_smallsh"))
            .arg("-q")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        let stdin = child.stdin.take().unwrap();
        let stdout = BufReader::new(child.stdout.take().unwrap());
        let mut session = Session {
            child,
            stdin,
            stdout,
        };

        session.send("status");
        assert_eq!(session.next_line(), "exit value 0");
        session
    }

    fn send(&mut self, line: &str) {
        writeln!(self.stdin, "{}", line).unwrap();
        self.stdin.flush().unwrap();
    }

    fn next_line(&mut self) -> String {
        let mut line = String::new();
        self.stdout.read_line(&mut line).unwrap();
        line.trim_end_matches('\n').to_string()
    }

    fn signal(&self, signal: libc::c_int) {
        unsafe {
            libc::kill(self.child.id() as libc::pid_t, signal);
        }
    }

    fn finish(mut self) {
        self.send("exit");
        drop(self.stdin);
        let status = self.child.wait().unwrap();
        assert!(status.success());
    }
}

#[test]
fn test_sigtstp_toggles_foreground_only_mode() {
    let mut session = Session::start();

    session.signal(libc::SIGTSTP);
    session.send("true &");
    session.send("status");
    assert_eq!(
        session.next_line(),
        "Now entering foreground-only mode (& is now ignored)"
    );
    // ran in the foreground: no background notice before the status line
    assert_eq!(session.next_line(), "exit value 0");

    session.signal(libc::SIGTSTP);
    session.send("true &");
    assert_eq!(session.next_line(), "Leaving foreground-only mode");
    assert!(session
        .next_line()
        .starts_with("The background process ID is: "));

    session.finish();
}

#[test]
fn test_sigint_does_not_kill_the_shell() {
    let mut session = Session::start();

    session.signal(libc::SIGINT);
    // the interrupt flag is raised from a helper thread
    thread::sleep(Duration::from_millis(300));
    session.send("status");

    assert_eq!(session.next_line(), "");
    assert_eq!(session.next_line(), "caught signal 2 (SIGINT)");
    assert_eq!(session.next_line(), "exit value 0");

    session.finish();
}
