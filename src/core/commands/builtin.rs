use super::{Command, CommandError, Flow};
use crate::core::state::ShellState;

/// `status`: print how the last foreground command ended.
#[derive(Clone)]
pub struct StatusCommand;

impl Default for StatusCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for StatusCommand {
    fn execute(&self, _args: &[String], state: &mut ShellState) -> Result<Flow, CommandError> {
        println!("{}", state.status());
        Ok(Flow::Continue)
    }
}

/// `exit`: stop every background job, then end the cycle.
#[derive(Clone)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute(&self, _args: &[String], state: &mut ShellState) -> Result<Flow, CommandError> {
        for report in state.jobs.terminate_all() {
            log::debug!("{}", report);
        }
        Ok(Flow::Exit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::ExitStatus;

    #[test]
    fn test_exit_command() {
        let mut state = ShellState::new(4);
        state
            .jobs
            .register(100_001, Some(ExitStatus::Exited(0)))
            .unwrap();

        let flow = ExitCommand::new().execute(&[], &mut state).unwrap();
        assert_eq!(flow, Flow::Exit);
        assert!(state.jobs.is_empty());
    }

    #[test]
    fn test_status_leaves_state_alone() {
        let mut state = ShellState::new(4);
        state.record_foreground(ExitStatus::Signaled(9));

        let flow = StatusCommand::new().execute(&[], &mut state).unwrap();
        assert_eq!(flow, Flow::Continue);
        assert_eq!(state.status(), ExitStatus::Signaled(9));
    }
}
