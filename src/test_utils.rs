//! Shared test utilities for creating test fixtures.
//!
//! This module provides a scripted console prompt and an event recorder
//! used across multiple test modules.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::signal::{Observer, Prompt, SignalEvent};

/// Prompt that replays canned answers and records everything shown.
///
/// Once the answers run out, `ask` fails with `UnexpectedEof`.
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<Option<char>>>,
    menus: Mutex<Vec<String>>,
    messages: Mutex<Vec<String>>,
    asked: AtomicUsize,
}

impl ScriptedPrompt {
    pub fn new(answers: &[Option<char>]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            menus: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
            asked: AtomicUsize::new(0),
        }
    }

    pub fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }

    pub fn menus(&self) -> Vec<String> {
        self.menus.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&self, menu: &str) -> io::Result<Option<char>> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.menus.lock().unwrap().push(menu.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
    }

    fn say(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Shared record of what an observer saw.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<SignalEvent>>>,
    completions: Arc<AtomicUsize>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observer feeding this log; register it with `SignalBus::subscribe_fn`.
    pub fn observer(&self) -> RecordingObserver {
        RecordingObserver { log: self.clone() }
    }

    pub fn events(&self) -> Vec<SignalEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    pub fn is_completed(&self) -> bool {
        self.completions() > 0
    }
}

pub struct RecordingObserver {
    log: EventLog,
}

impl Observer for RecordingObserver {
    fn on_next(&self, event: SignalEvent) {
        self.log.events.lock().unwrap().push(event);
    }

    fn on_completed(&self) {
        self.log.completions.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_prompt_replays_answers() {
        let prompt = ScriptedPrompt::new(&[Some('C'), None]);

        assert_eq!(prompt.ask("menu").unwrap(), Some('C'));
        assert_eq!(prompt.ask("menu").unwrap(), None);
        assert!(prompt.ask("menu").is_err());
        assert_eq!(prompt.times_asked(), 3);
    }

    #[test]
    fn test_event_log_records() {
        let log = EventLog::new();
        let observer = log.observer();

        observer.on_next(SignalEvent::Abort);
        observer.on_completed();

        assert_eq!(log.events(), vec![SignalEvent::Abort]);
        assert!(log.is_completed());
    }
}
