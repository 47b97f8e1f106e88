use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::LineSource;
use crate::error::ShellError;
use crate::process::signal::SignalFlags;

/// Terminal input through rustyline. History is never recorded.
pub struct EditorSource {
    editor: DefaultEditor,
    show_prompt: bool,
    signals: SignalFlags,
}

impl EditorSource {
    pub fn new(show_prompt: bool, signals: SignalFlags) -> Result<Self, ShellError> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            show_prompt,
            signals,
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ShellError> {
        let prompt = if self.show_prompt { prompt } else { "" };
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            // raw mode turns Ctrl-C into a key press; report it like the signal
            Err(ReadlineError::Interrupted) => {
                self.signals.raise_interrupt();
                Ok(Some(String::new()))
            }
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }
}
