use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::process::ProcessError;

use libc::{signal, SIGINT, SIGPIPE, SIGTSTP, SIG_DFL, SIG_IGN};

/// Pending-signal flags shared between the handlers and the main cycle.
///
/// Handlers only ever store `true`. The cycle swaps the flags back to `false`
/// and does the printing and the mode bookkeeping itself. Several deliveries
/// between two drains collapse into one.
#[derive(Clone, Default)]
pub struct SignalFlags {
    interrupt: Arc<AtomicBool>,
    stop: Arc<AtomicBool>,
}

impl SignalFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook `SIGINT` and `SIGTSTP` for the shell process. Can only be done
    /// once per process.
    pub fn install(&self) -> Result<(), ProcessError> {
        let interrupt = Arc::clone(&self.interrupt);
        ctrlc::set_handler(move || {
            interrupt.store(true, Ordering::SeqCst);
        })?;

        signal_hook::flag::register(SIGTSTP, Arc::clone(&self.stop))
            .map_err(|e| ProcessError::SignalError(format!("SIGTSTP: {}", e)))?;

        log::debug!("signal handlers installed");
        Ok(())
    }

    /// Record an interrupt that arrived as input rather than as a signal
    /// (Ctrl-C while the line editor holds the terminal in raw mode).
    pub fn raise_interrupt(&self) {
        self.interrupt.store(true, Ordering::SeqCst);
    }

    pub fn take_interrupt(&self) -> bool {
        self.interrupt.swap(false, Ordering::SeqCst)
    }

    pub fn take_stop(&self) -> bool {
        self.stop.swap(false, Ordering::SeqCst)
    }
}

/// Printed by the main cycle when it drains a pending interrupt.
pub fn interrupt_notice() -> String {
    format!("caught signal {} (SIGINT)", SIGINT)
}

/// Reset dispositions in a forked child before `exec`.
///
/// The Rust runtime ignores `SIGPIPE` in the shell, and ignored dispositions
/// survive `exec`, so it goes back to the default here. Foreground children die on Ctrl-C like any program would; background
/// children ignore it. No child can be stopped with Ctrl-Z, which keeps the
/// shell's foreground wait from hanging.
///
/// # Safety
/// Only call between `fork` and `exec`.
pub(crate) unsafe fn restore_child_signals(background: bool) {
    signal(SIGPIPE, SIG_DFL);
    signal(SIGINT, if background { SIG_IGN } else { SIG_DFL });
    signal(SIGTSTP, SIG_IGN);
}
