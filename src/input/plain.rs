use std::io::{self, BufRead, Write};

use super::LineSource;
use crate::error::ShellError;

/// Line-at-a-time reader for non-terminal stdin.
pub struct StdinSource {
    show_prompt: bool,
}

impl StdinSource {
    pub fn new(show_prompt: bool) -> Self {
        Self { show_prompt }
    }
}

impl LineSource for StdinSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        if self.show_prompt {
            let mut stdout = io::stdout().lock();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_terminator(line)))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

fn strip_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
