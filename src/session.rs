use crate::clipboard;
use crate::compare::{compare, CharState, Comparison};
use crate::metrics::SessionResult;
use crate::timer::{SessionTimer, TickScheduler, TimerId};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first keystroke of the round
    Idle,
    InProgress,
    /// Reference fully typed; results available, input refused
    Locked,
}

/// One round of typing a reference text
#[derive(Debug)]
pub struct TypingSession {
    reference: String,
    reference_len: usize,
    typed: String,
    states: Vec<CharState>,
    incorrect_keystrokes: u64,
    timer: SessionTimer,
    phase: Phase,
    result: Option<SessionResult>,
    enabled: bool,
}

impl TypingSession {
    pub fn new(reference: String, scheduler: Box<dyn TickScheduler>) -> Self {
        let mut session = Self::unloaded(scheduler);
        session.load(reference);
        session
    }

    /// A session with no reference text; input stays disabled until [`load`](Self::load)
    pub fn unloaded(scheduler: Box<dyn TickScheduler>) -> Self {
        Self {
            reference: String::new(),
            reference_len: 0,
            typed: String::new(),
            states: Vec::new(),
            incorrect_keystrokes: 0,
            timer: SessionTimer::new(scheduler),
            phase: Phase::Idle,
            result: None,
            enabled: false,
        }
    }

    /// Replace the reference text and start a fresh round
    pub fn load(&mut self, reference: String) {
        self.reference_len = reference.chars().count();
        self.reference = reference;
        self.enabled = self.reference_len > 0;
        self.reset();
    }

    /// Drop the reference text and refuse input until the next [`load`](Self::load)
    pub fn unload(&mut self) {
        self.reference.clear();
        self.reference_len = 0;
        self.enabled = false;
        self.reset();
    }

    /// Back to idle with the same reference text
    pub fn reset(&mut self) {
        self.typed.clear();
        self.states = Comparison::unset(&self.reference).states;
        self.incorrect_keystrokes = 0;
        self.timer.reset();
        self.result = None;
        self.phase = Phase::Idle;
    }

    pub fn type_char(&mut self, c: char, now: Instant) -> bool {
        if !self.input_enabled() {
            return false;
        }
        self.typed.push(c);
        self.on_input_changed(now);
        true
    }

    pub fn backspace(&mut self, now: Instant) -> bool {
        if !self.input_enabled() || self.typed.pop().is_none() {
            return false;
        }
        self.on_input_changed(now);
        true
    }

    /// Paste into the input; only the placeholder ever lands
    pub fn paste(&mut self, clipboard: &str, now: Instant) -> bool {
        if !self.input_enabled() {
            return false;
        }
        self.typed = clipboard::paste_into(&self.typed, clipboard);
        self.on_input_changed(now);
        true
    }

    /// Replace the whole input value, as a text field edit would
    pub fn set_input(&mut self, value: &str, now: Instant) -> bool {
        if !self.input_enabled() {
            return false;
        }
        self.typed = value.to_string();
        self.on_input_changed(now);
        true
    }

    /// What a copy of the reference text puts on the clipboard
    pub fn copy_reference(&self) -> &'static str {
        clipboard::copy_payload(&self.reference)
    }

    pub fn on_tick(&mut self, id: TimerId) -> bool {
        self.timer.on_tick(id)
    }

    fn on_input_changed(&mut self, now: Instant) {
        if self.phase == Phase::Idle {
            let id = self.timer.start(now);
            self.phase = Phase::InProgress;
            debug!(timer = ?id, "round started");
        }

        let comparison = compare(&self.reference, &self.typed);
        self.states = comparison.states;
        self.incorrect_keystrokes += comparison.mismatches;

        if self.typed.chars().count() >= self.reference_len {
            self.complete(now);
        }
    }

    fn complete(&mut self, now: Instant) {
        self.timer.stop();
        let result = SessionResult::compute(
            &self.typed,
            &self.reference,
            self.timer.elapsed_since_start(now),
            self.incorrect_keystrokes,
        );
        info!(
            wpm = result.words_per_minute,
            accuracy = result.accuracy,
            "round complete"
        );
        self.result = Some(result);
        self.phase = Phase::Locked;
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn states(&self) -> &[CharState] {
        &self.states
    }

    pub fn incorrect_keystrokes(&self) -> u64 {
        self.incorrect_keystrokes
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn input_enabled(&self) -> bool {
        self.enabled && self.phase != Phase::Locked
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    /// Elapsed time as `M:SS`
    pub fn clock(&self) -> String {
        self.timer.display()
    }
}
