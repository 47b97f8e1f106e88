mod executor;

use crate::{
    core::{
        commands::{CommandExecutor, Flow},
        config::Config,
        state::ShellState,
    },
    error::ShellError,
    flags::Flags,
    highlight::Highlighter,
    input::{self, LineSource},
    process::signal::{self, SignalFlags},
};

use executor::CommandHandler;

pub struct Shell {
    pub(crate) source: Box<dyn LineSource>,
    pub(crate) config: Config,
    pub(crate) state: ShellState,
    pub(crate) signals: SignalFlags,
    pub(crate) flags: Flags,
    pub(crate) executor: CommandExecutor,
    pub(crate) highlighter: Highlighter,
    pub(crate) pid: u32,
}

impl Shell {
    pub fn new(flags: Flags) -> Result<Self, ShellError> {
        let config = Config::load(&flags)?;
        let signals = SignalFlags::new();
        signals.install()?;

        let source = input::open(!flags.is_set("quiet"), &signals)?;
        let highlighter = Highlighter::new(source.is_interactive());

        Ok(Shell {
            source,
            state: ShellState::new(config.max_jobs),
            config,
            signals,
            flags,
            executor: CommandExecutor::new(),
            highlighter,
            pid: std::process::id(),
        })
    }

    /// The interactive cycle. Returns once `exit` runs or input ends; fatal
    /// errors are returned after background jobs have been stopped.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            self.report_signals();
            self.report_jobs();

            let line = match self.source.read_line(&self.config.prompt) {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    self.shutdown();
                    return Err(e);
                }
            };
            self.report_signals();

            match self.execute_line(&line) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) if e.is_fatal() => {
                    self.shutdown();
                    return Err(e.into());
                }
                Err(e) => self.report_error(&e.to_string()),
            }
            // Ctrl-C during a foreground wait belongs to the child, which has
            // already been reported.
            self.signals.take_interrupt();
        }

        self.shutdown();
        if !self.flags.is_set("quiet") {
            println!("Now exiting.");
        }
        Ok(())
    }

    /// Apply whatever the signal handlers flagged since the last drain.
    fn report_signals(&mut self) {
        if self.signals.take_stop() {
            let change = self.state.toggle_foreground_only();
            println!("{}", change);
        }
        if self.signals.take_interrupt() {
            println!();
            println!("{}", self.highlighter.highlight_hint(&signal::interrupt_notice()));
        }
    }

    fn report_jobs(&mut self) {
        for report in self.state.jobs.poll() {
            println!("{}", report);
        }
    }

    fn report_error(&self, message: &str) {
        eprintln!("{}", self.highlighter.highlight_error(message));
    }

    fn shutdown(&mut self) {
        if self.state.jobs.is_empty() {
            return;
        }
        log::debug!("stopping {} background jobs", self.state.jobs.len());
        for report in self.state.jobs.terminate_all() {
            log::debug!("{}", report);
        }
    }
}
