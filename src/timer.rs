use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Period of the elapsed-time display
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Identifies one started timer; ticks from a cancelled timer are ignored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Source of periodic ticks for the session timer
pub trait TickScheduler: Send {
    /// Begin delivering ticks tagged with `id` every `period`
    fn start(&mut self, id: TimerId, period: Duration);
    /// Stop delivering ticks for `id`. Cancelling an unknown id is a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// Scheduler that never ticks on its own; tests deliver ticks by hand and
/// inspect which timers are live through a clone.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

#[derive(Debug, Default)]
struct ManualState {
    active: BTreeSet<TimerId>,
    started: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Vec<TimerId> {
        self.with_state(|s| s.active.iter().copied().collect())
    }

    /// Total number of timers ever started
    pub fn started(&self) -> usize {
        self.with_state(|s| s.started)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ManualState) -> T) -> T {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

impl TickScheduler for ManualScheduler {
    fn start(&mut self, id: TimerId, _period: Duration) {
        self.with_state(|s| {
            s.active.insert(id);
            s.started += 1;
        });
    }

    fn cancel(&mut self, id: TimerId) {
        self.with_state(|s| {
            s.active.remove(&id);
        });
    }
}

/// Elapsed-seconds counter for one round with at most one live tick handle
pub struct SessionTimer {
    scheduler: Box<dyn TickScheduler>,
    active: Option<TimerId>,
    next_id: u64,
    started_at: Option<Instant>,
    elapsed_secs: u64,
}

impl SessionTimer {
    pub fn new(scheduler: Box<dyn TickScheduler>) -> Self {
        Self {
            scheduler,
            active: None,
            next_id: 0,
            started_at: None,
            elapsed_secs: 0,
        }
    }

    /// Start ticking from `now`, cancelling any handle that is still live
    pub fn start(&mut self, now: Instant) -> TimerId {
        self.stop();

        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.scheduler.start(id, TICK_INTERVAL);
        self.active = Some(id);
        self.started_at = Some(now);
        id
    }

    /// Cancel the live handle, keeping the elapsed count
    pub fn stop(&mut self) {
        if let Some(id) = self.active.take() {
            self.scheduler.cancel(id);
        }
    }

    pub fn reset(&mut self) {
        self.stop();
        self.started_at = None;
        self.elapsed_secs = 0;
    }

    /// Count one tick if it belongs to the live handle
    pub fn on_tick(&mut self, id: TimerId) -> bool {
        if self.active == Some(id) {
            self.elapsed_secs += 1;
            true
        } else {
            false
        }
    }

    pub fn active(&self) -> Option<TimerId> {
        self.active
    }

    /// Wall-clock time since the timer was started
    pub fn elapsed_since_start(&self, now: Instant) -> Duration {
        self.started_at
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    /// Elapsed ticks as `M:SS`
    pub fn display(&self) -> String {
        format_clock(self.elapsed_secs)
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for SessionTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTimer")
            .field("active", &self.active)
            .field("started_at", &self.started_at)
            .field("elapsed_secs", &self.elapsed_secs)
            .finish_non_exhaustive()
    }
}

pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
