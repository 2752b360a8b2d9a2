//! Registration of the process-level Ctrl+C trap.
//!
//! The `ctrlc` crate keeps the actual signal handler minimal (it only writes
//! to a self-pipe) and runs our callback on a dedicated thread. The prompt,
//! formatting and publishing therefore never execute in signal context.

use std::process;
use std::sync::Arc;

use log::{debug, error};

use super::handler::{HandlerOutcome, InterruptHandler, SIGINT};

/// Errors from installing the interrupt trap
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    #[error("An interrupt handler is already installed for this process")]
    AlreadyInstalled,
    #[error("Failed to install interrupt handler: {0}")]
    Install(#[source] ctrlc::Error),
}

impl From<ctrlc::Error> for SignalError {
    fn from(err: ctrlc::Error) -> Self {
        match err {
            ctrlc::Error::MultipleHandlers => Self::AlreadyInstalled,
            other => Self::Install(other),
        }
    }
}

/// Route Ctrl+C to `handler` for the rest of the process lifetime.
///
/// Only one trap can be installed per process.
pub fn install(handler: Arc<InterruptHandler>) -> Result<(), SignalError> {
    ctrlc::set_handler(move || match handler.handle(SIGINT) {
        HandlerOutcome::Continue => {}
        HandlerOutcome::Exit(code) => {
            if code != 0 {
                error!("Interrupted with handler disabled");
            }
            process::exit(code);
        }
    })?;
    debug!("Interrupt handler installed");
    Ok(())
}
