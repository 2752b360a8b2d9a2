//! Process-wide cancellation signal bus.
//!
//! An interrupt (Ctrl+C) is translated into a small set of [`SignalEvent`]s
//! that any number of long-running computations can observe without touching
//! the OS directly. The bus is an explicitly constructed service: the binary
//! creates one and shares it through an `Arc`, tests build their own.
//!
//! Delivery is synchronous. `publish` returns only after every channel sink
//! has been fed and every callback observer has run, so observers must not
//! block and must not call back into the same bus.

mod handler;
mod trap;

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub use handler::{
    Answer, HandlerOutcome, InterruptHandler, Prompt, StdioPrompt, DISABLED_EXIT_CODE, MENU,
    SIGINT,
};
pub use trap::{install, SignalError};

/// Control events published on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalEvent {
    /// Suspend the current computation without losing its state.
    Pause,
    /// Finish the current computation early.
    Abort,
}

impl std::fmt::Display for SignalEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pause => write!(f, "pause"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

/// Callback-style subscriber.
///
/// Any `Fn(SignalEvent) + Send + Sync` closure is an observer that ignores
/// end-of-stream.
pub trait Observer: Send + Sync {
    fn on_next(&self, event: SignalEvent);

    fn on_completed(&self) {}
}

impl<F> Observer for F
where
    F: Fn(SignalEvent) + Send + Sync,
{
    fn on_next(&self, event: SignalEvent) {
        self(event)
    }
}

enum Sink {
    Channel(Sender<SignalEvent>),
    Observer(Box<dyn Observer>),
}

/// One generation of the bus. Once completed it never reopens.
struct Channel {
    generation: u64,
    completed: bool,
    sinks: Vec<Sink>,
}

impl Channel {
    fn open(generation: u64) -> Self {
        Self {
            generation,
            completed: false,
            sinks: Vec::new(),
        }
    }

    /// Notify observers and drop every sender so receivers hit end-of-stream.
    fn complete(&mut self) {
        if self.completed {
            return;
        }
        self.completed = true;
        for sink in self.sinks.drain(..) {
            if let Sink::Observer(observer) = sink {
                observer.on_completed();
            }
        }
    }
}

/// Broadcast channel for [`SignalEvent`]s.
///
/// A single mutex guards the live channel, so `reset` can never interleave
/// with `publish`, `subscribe` or `complete`.
pub struct SignalBus {
    channel: Mutex<Channel>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self {
            channel: Mutex::new(Channel::open(0)),
        }
    }

    // A panicking observer must not wedge the interrupt path.
    fn lock(&self) -> MutexGuard<'_, Channel> {
        self.channel.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Broadcast `event` to every current subscriber, in subscription order.
    ///
    /// Publishing on a completed bus is a no-op.
    pub fn publish(&self, event: SignalEvent) {
        let mut channel = self.lock();
        if channel.completed {
            warn!(
                "Ignoring {} event: signal bus (generation {}) is completed",
                event, channel.generation
            );
            return;
        }

        // Receivers that were dropped are pruned on the way.
        channel.sinks.retain(|sink| match sink {
            Sink::Channel(sender) => sender.send(event).is_ok(),
            Sink::Observer(observer) => {
                observer.on_next(event);
                true
            }
        });
        debug!("Published {} to {} subscriber(s)", event, channel.sinks.len());
    }

    /// Receive every event published from now on. Never blocks.
    ///
    /// On a completed bus the returned handle is already at end-of-stream.
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = mpsc::channel();
        let mut channel = self.lock();
        if !channel.completed {
            channel.sinks.push(Sink::Channel(sender));
        }
        Subscription {
            receiver,
            generation: channel.generation,
        }
    }

    /// Register a callback run synchronously inside `publish`.
    ///
    /// Returns false if the bus is already completed.
    pub fn subscribe_fn<O>(&self, observer: O) -> bool
    where
        O: Observer + 'static,
    {
        let mut channel = self.lock();
        if channel.completed {
            observer.on_completed();
            return false;
        }
        channel.sinks.push(Sink::Observer(Box::new(observer)));
        true
    }

    /// Signal end-of-stream to all subscribers. Later publishes are ignored
    /// until [`reset`](Self::reset).
    pub fn complete(&self) {
        let mut channel = self.lock();
        debug!("Completing signal bus (generation {})", channel.generation);
        channel.complete();
    }

    /// Tear down the current channel and install a fresh one.
    ///
    /// Handles obtained before the reset never see later events.
    pub fn reset(&self) {
        let mut channel = self.lock();
        channel.complete();
        let generation = channel.generation + 1;
        *channel = Channel::open(generation);
        debug!("Signal bus reset to generation {}", generation);
    }

    pub fn is_completed(&self) -> bool {
        self.lock().completed
    }

    /// Number of live subscribers on the current channel.
    pub fn subscriber_count(&self) -> usize {
        self.lock().sinks.len()
    }

    /// Incremented by every [`reset`](Self::reset).
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving end of a [`SignalBus::subscribe`] call.
///
/// Iterating blocks until the next event and stops at end-of-stream.
pub struct Subscription {
    receiver: Receiver<SignalEvent>,
    generation: u64,
}

impl Subscription {
    /// Bus generation this handle belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Next pending event without blocking.
    pub fn try_recv(&self) -> Result<SignalEvent, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block until the next event; `None` once the channel is completed or replaced.
    pub fn recv(&self) -> Option<SignalEvent> {
        self.receiver.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<SignalEvent, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// All events currently queued, oldest first.
    pub fn drain(&self) -> Vec<SignalEvent> {
        self.receiver.try_iter().collect()
    }
}

impl Iterator for Subscription {
    type Item = SignalEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}
