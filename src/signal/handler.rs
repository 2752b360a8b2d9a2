use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};

use super::{SignalBus, SignalEvent};

/// Interrupt signal number (SIGINT on POSIX, also 2 in the Windows CRT).
pub const SIGINT: i32 = 2;

/// Exit status used when an interrupt arrives while the handler is disabled.
pub const DISABLED_EXIT_CODE: i32 = -1;

/// Menu shown when the user interrupts a running computation.
pub const MENU: &str = "\n[SignalHandler] \
    Immediately return to prompt / \
    Prematurely finish computations / \
    Pause current computation / \
    Do nothing (I/C/P/D)? ";

/// What the caller of [`InterruptHandler::handle`] has to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    Continue,
    Exit(i32),
}

/// User choice read from the interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// `I`: complete the bus and terminate the process.
    Immediately,
    /// `C`: abort the current algorithm.
    Cancel,
    /// `P`: pause the current computation.
    Pause,
    /// `D` or anything unrecognized.
    Continue,
}

impl From<Option<char>> for Answer {
    /// Exact, case-sensitive match on the first character.
    fn from(input: Option<char>) -> Self {
        match input {
            Some('I') => Self::Immediately,
            Some('C') => Self::Cancel,
            Some('P') => Self::Pause,
            _ => Self::Continue,
        }
    }
}

/// Console access for the interrupt handler - allows scripting in tests
pub trait Prompt: Send + Sync {
    /// Show `menu` and read a single character answer.
    fn ask(&self, menu: &str) -> io::Result<Option<char>>;

    /// Print an informational line.
    fn say(&self, message: &str);
}

impl<P: Prompt + ?Sized> Prompt for Arc<P> {
    fn ask(&self, menu: &str) -> io::Result<Option<char>> {
        (**self).ask(menu)
    }

    fn say(&self, message: &str) {
        (**self).say(message)
    }
}

/// Prompt on the process's stdin/stdout.
pub struct StdioPrompt;

impl StdioPrompt {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdioPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for StdioPrompt {
    fn ask(&self, menu: &str) -> io::Result<Option<char>> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(menu.as_bytes())?;
        stdout.flush()?;

        // Reading the whole line also consumes the trailing newline.
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.chars().next())
    }

    fn say(&self, message: &str) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "[SignalHandler] {}", message);
        let _ = stdout.flush();
    }
}

/// Turns an interrupt into a bus action.
///
/// Runs outside the OS trap (see [`install`](super::install)), so it may
/// block on the prompt, allocate and publish freely.
pub struct InterruptHandler {
    bus: Arc<SignalBus>,
    prompt: Box<dyn Prompt>,
    active: AtomicBool,
}

impl InterruptHandler {
    pub fn new(bus: Arc<SignalBus>, prompt: Box<dyn Prompt>) -> Self {
        Self {
            bus,
            prompt,
            active: AtomicBool::new(true),
        }
    }

    /// Handler on the real terminal.
    pub fn stdio(bus: Arc<SignalBus>) -> Self {
        Self::new(bus, Box::new(StdioPrompt::new()))
    }

    pub fn with_active(self, active: bool) -> Self {
        self.set_active(active);
        self
    }

    /// When inactive, an interrupt terminates the process without prompting.
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn bus(&self) -> &Arc<SignalBus> {
        &self.bus
    }

    /// Handle one received signal and report what the process should do.
    pub fn handle(&self, signal: i32) -> HandlerOutcome {
        if !self.is_active() {
            debug!("Interrupt handler disabled, exiting");
            return HandlerOutcome::Exit(DISABLED_EXIT_CODE);
        }

        if signal != SIGINT {
            self.prompt.say(&format!("Unknown signal {} received", signal));
            return HandlerOutcome::Continue;
        }

        let answer = match self.prompt.ask(MENU) {
            Ok(input) => Answer::from(input),
            Err(err) => {
                info!("Could not read answer ({}), continuing", err);
                Answer::Continue
            }
        };
        self.apply(answer)
    }

    fn apply(&self, answer: Answer) -> HandlerOutcome {
        match answer {
            Answer::Immediately => {
                self.prompt.say("Killing the application...");
                self.bus.complete();
                HandlerOutcome::Exit(0)
            }
            Answer::Cancel => {
                self.prompt.say("Terminating prematurely current algorithm...");
                self.bus.publish(SignalEvent::Abort);
                HandlerOutcome::Continue
            }
            Answer::Pause => {
                self.prompt.say("Pausing current computation...");
                self.bus.publish(SignalEvent::Pause);
                HandlerOutcome::Continue
            }
            Answer::Continue => {
                self.prompt.say("Continuing...");
                HandlerOutcome::Continue
            }
        }
    }
}
