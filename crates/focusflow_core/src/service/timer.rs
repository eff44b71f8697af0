//! Countdown timer state machine.
//!
//! # Responsibility
//! - Own mode, remaining seconds and the single repeating tick.
//! - Push a [`TimerSnapshot`] to the sink after every state change.
//!
//! # Invariants
//! - `0 <= remaining <= mode.total_seconds()` at all times.
//! - At most one tick handle exists; `running` is exactly "a handle is set".
//! - `stop`, `reset` and expiry drop the handle before returning, so no tick
//!   fires after a logical stop.

use crate::render::{TimerSink, TimerSnapshot};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Period of one countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One of the three fixed countdown durations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimerMode {
    #[default]
    Pomodoro,
    Short,
    Long,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [Self::Pomodoro, Self::Short, Self::Long];

    /// Full duration of the mode in seconds.
    pub fn total_seconds(self) -> u32 {
        match self {
            Self::Pomodoro => 25 * 60,
            Self::Short => 5 * 60,
            Self::Long => 15 * 60,
        }
    }

    /// Stable token accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pomodoro => "pomodoro",
            Self::Short => "short",
            Self::Long => "long",
        }
    }

    /// Button label shown by the mode switcher.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pomodoro => "Pomodoro",
            Self::Short => "Curto",
            Self::Long => "Longo",
        }
    }
}

impl Display for TimerMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = TimerModeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pomodoro" => Ok(Self::Pomodoro),
            "short" => Ok(Self::Short),
            "long" => Ok(Self::Long),
            other => Err(TimerModeParseError(other.to_string())),
        }
    }
}

/// Unknown mode token coming from the input surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerModeParseError(pub String);

impl Display for TimerModeParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported timer mode `{}`; expected pomodoro|short|long",
            self.0
        )
    }
}

impl Error for TimerModeParseError {}

/// Formats seconds as zero-padded `MM:SS`. Minutes are not wrapped.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Result of firing one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was idle; nothing happened.
    Idle,
    /// One second elapsed.
    Advanced { remaining: u32 },
    /// Countdown had already reached zero; timer stopped and reset.
    Expired,
}

/// Cancellable repeating tick owned by the timer.
#[derive(Debug, Clone, Copy)]
struct TickHandle {
    next_due: Instant,
}

/// Single countdown clock with pomodoro/short/long modes.
pub struct PomodoroTimer<S: TimerSink> {
    mode: TimerMode,
    remaining: u32,
    tick: Option<TickHandle>,
    sink: S,
}

impl<S: TimerSink> PomodoroTimer<S> {
    /// Creates an idle timer in pomodoro mode and renders it once.
    pub fn new(sink: S) -> Self {
        let mode = TimerMode::default();
        let mut timer = Self {
            mode,
            remaining: mode.total_seconds(),
            tick: None,
            sink,
        };
        timer.render();
        timer
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    /// Deadline of the pending tick, if running.
    pub fn next_due(&self) -> Option<Instant> {
        self.tick.map(|handle| handle.next_due)
    }

    /// Elapsed fraction of the current mode.
    pub fn progress(&self) -> f64 {
        let total = self.mode.total_seconds();
        f64::from(total - self.remaining) / f64::from(total)
    }

    pub fn format_remaining(&self) -> String {
        format_time(self.remaining)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            remaining_seconds: self.remaining,
            remaining_formatted: self.format_remaining(),
            progress: self.progress(),
            running: self.is_running(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Switches mode, stopping and resetting the countdown.
    pub fn set_mode(&mut self, mode: TimerMode) {
        info!(
            "event=timer_set_mode module=timer status=ok from={} to={}",
            self.mode, mode
        );
        self.mode = mode;
        self.reset();
    }

    /// Starts ticking from now. No-op when already running.
    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Starts ticking with the first tick due one period after `now`.
    pub fn start_at(&mut self, now: Instant) {
        if self.is_running() {
            return;
        }
        self.tick = Some(TickHandle {
            next_due: now + TICK_PERIOD,
        });
        info!(
            "event=timer_start module=timer status=ok mode={} remaining={}",
            self.mode, self.remaining
        );
        self.render();
    }

    /// Pauses, keeping `remaining` as is. No-op when idle.
    pub fn stop(&mut self) {
        if self.tick.take().is_none() {
            return;
        }
        info!(
            "event=timer_stop module=timer status=ok mode={} remaining={}",
            self.mode, self.remaining
        );
        self.render();
    }

    /// Stops when running, starts otherwise.
    pub fn toggle(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Cancels any tick and restores the full duration of the current mode.
    pub fn reset(&mut self) {
        self.tick = None;
        self.remaining = self.mode.total_seconds();
        debug!(
            "event=timer_reset module=timer status=ok mode={} remaining={}",
            self.mode, self.remaining
        );
        self.render();
    }

    /// Fires one tick immediately.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Idle;
        }

        if self.remaining > 0 {
            self.remaining -= 1;
            self.render();
            return TickOutcome::Advanced {
                remaining: self.remaining,
            };
        }

        self.tick = None;
        info!(
            "event=timer_expired module=timer status=ok mode={}",
            self.mode
        );
        self.sink.timer_expired(self.mode);
        self.reset();
        TickOutcome::Expired
    }

    /// Fires every tick due at or before `now`, returning how many fired.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let mut fired = 0;
        while let Some(handle) = self.tick {
            if handle.next_due > now {
                break;
            }
            self.tick = Some(TickHandle {
                next_due: handle.next_due + TICK_PERIOD,
            });
            self.tick();
            fired += 1;
        }
        fired
    }

    fn render(&mut self) {
        let snapshot = self.snapshot();
        self.sink.render_timer(&snapshot);
    }
}
