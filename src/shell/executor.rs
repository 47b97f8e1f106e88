use crate::core::commands::{CommandError, Flow};
use crate::parse;

pub(crate) trait CommandHandler {
    fn execute_line(&mut self, line: &str) -> Result<Flow, CommandError>;
}

impl CommandHandler for super::Shell {
    fn execute_line(&mut self, line: &str) -> Result<Flow, CommandError> {
        let parsed = parse::expand(
            line,
            self.pid,
            self.state.foreground_only(),
            self.config.line_limit,
        )?;
        if parsed.is_blank() {
            return Ok(Flow::Continue);
        }

        self.executor.execute(parsed, &mut self.state)
    }
}
