//! Interrupt handling.
//!
//! While a token is armed, a Ctrl+C only sets its flag: the running script
//! is killed, or the open prompt reports an interrupt once it returns, and
//! the run unwinds through the usual error path. Armed sections are the ones
//! that hold the terminal or a child process. A Ctrl+C anywhere else ends the
//! process with the conventional interrupt status.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::debug;

/// Exit status used when the user interrupts outside an armed section.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, Default)]
struct CancelState {
    armed: AtomicBool,
    cancelled: AtomicBool,
}

/// Shared cancellation flag between the interrupt handler and the runner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    pub fn is_armed(&self) -> bool {
        self.state.armed.load(Ordering::SeqCst)
    }

    /// Route interrupts to this token until the guard is dropped.
    ///
    /// Clears any earlier cancellation.
    pub fn arm(&self) -> ArmGuard {
        self.state.cancelled.store(false, Ordering::SeqCst);
        self.state.armed.store(true, Ordering::SeqCst);
        ArmGuard {
            state: Arc::clone(&self.state),
        }
    }

    /// Install the process-wide Ctrl+C handler. Can only succeed once per
    /// process.
    pub fn install_interrupt_handler(&self) -> Result<(), ctrlc::Error> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            if token.on_interrupt() == Interrupt::Exit {
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        })
    }

    fn on_interrupt(&self) -> Interrupt {
        if self.is_armed() {
            debug!("Interrupt received, cancelling armed section");
            self.cancel();
            Interrupt::Deferred
        } else {
            Interrupt::Exit
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Interrupt {
    Deferred,
    Exit,
}

/// Keeps a [`CancelToken`] armed while alive.
#[derive(Debug)]
pub struct ArmGuard {
    state: Arc<CancelState>,
}

impl Drop for ArmGuard {
    fn drop(&mut self) {
        self.state.armed.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arming_clears_previous_cancellation() {
        let token = CancelToken::new();
        token.cancel();

        let _guard = token.arm();

        assert!(token.is_armed());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn dropping_guard_disarms() {
        let token = CancelToken::new();
        {
            let _guard = token.arm();
            token.cancel();
        }

        assert!(!token.is_armed());
        assert!(token.is_cancelled());
    }

    #[test]
    fn interrupt_while_armed_only_sets_the_flag() {
        let token = CancelToken::new();
        let _guard = token.arm();

        assert_eq!(token.on_interrupt(), Interrupt::Deferred);
        assert!(token.is_cancelled());
    }

    #[test]
    fn interrupt_while_disarmed_exits() {
        let token = CancelToken::new();

        assert_eq!(token.on_interrupt(), Interrupt::Exit);
        assert!(!token.is_cancelled());
    }

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let handler_side = token.clone();
        let _guard = token.arm();

        handler_side.cancel();

        assert!(token.is_cancelled());
    }
}
