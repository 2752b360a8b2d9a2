//! Cooperative cancellation for long-running computations.
//!
//! A computation creates an [`Interruption`] from the shared [`SignalBus`]
//! and calls [`Interruption::check`] at safe points. `Abort` makes every
//! following check fail; `Pause` toggles a paused state in which `check`
//! blocks until the next `Pause` (resume) or `Abort` arrives.

use std::sync::mpsc::TryRecvError;

use log::{debug, info};

use crate::signal::{SignalBus, SignalEvent, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Cancelled by user")]
pub struct Cancelled;

/// Consumer-side view of the signal bus for one computation.
pub struct Interruption {
    subscription: Subscription,
    cancelled: bool,
    paused: bool,
}

impl Interruption {
    /// Subscribe to `bus`; only events published from now on are seen.
    pub fn new(bus: &SignalBus) -> Self {
        Self {
            subscription: bus.subscribe(),
            cancelled: false,
            paused: false,
        }
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Apply pending events without blocking, even when paused.
    pub fn poll(&mut self) -> Result<(), Cancelled> {
        while !self.cancelled {
            match self.subscription.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.end_of_stream();
                    break;
                }
            }
        }
        self.status()
    }

    /// Apply pending events and wait out a pause.
    pub fn check(&mut self) -> Result<(), Cancelled> {
        self.poll()?;
        while self.paused && !self.cancelled {
            match self.subscription.recv() {
                Some(event) => self.apply(event),
                None => self.end_of_stream(),
            }
        }
        self.status()
    }

    fn apply(&mut self, event: SignalEvent) {
        match event {
            SignalEvent::Abort => {
                info!("Cancellation requested, stopping computation...");
                self.cancelled = true;
            }
            SignalEvent::Pause if self.paused => {
                info!("Resuming computation");
                self.paused = false;
            }
            SignalEvent::Pause => {
                info!("Computation paused, interrupt and pause again to resume");
                self.paused = true;
            }
        }
    }

    // A completed or replaced bus cannot deliver a resume.
    fn end_of_stream(&mut self) {
        if self.paused {
            debug!("Signal bus closed while paused, resuming");
        }
        self.paused = false;
    }

    fn status(&self) -> Result<(), Cancelled> {
        if self.cancelled {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}
