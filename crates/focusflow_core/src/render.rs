//! Render-sink capabilities consumed by the core services.
//!
//! # Responsibility
//! - Describe what the core hands to a display surface after each change.
//! - Keep presentation technology out of core: sinks only receive snapshots.
//!
//! # Invariants
//! - Core never reads state back from a sink.

use crate::model::category::CategoryInfo;
use crate::model::task::{Task, TaskStats};
use crate::service::timer::TimerMode;
use crate::storage::StorageError;

/// Blocking notice shown when task creation is attempted with a blank title.
pub const EMPTY_TITLE_NOTICE: &str = "Por favor, digite uma tarefa.";
/// End-of-countdown alert text.
pub const EXPIRED_NOTICE: &str = "Tempo esgotado! Hora de descansar ou focar.";

/// Display surface for the task list side of the app.
pub trait TaskSink {
    fn render_tasks(&mut self, tasks: &[Task]);
    fn render_stats(&mut self, stats: TaskStats);
    fn render_categories(&mut self, categories: &[CategoryInfo]);

    /// Called when a mutation was applied in memory but could not be persisted.
    fn storage_warning(&mut self, _error: &StorageError) {}
}

/// Immutable view of the countdown handed to a [`TimerSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub remaining_seconds: u32,
    /// `MM:SS`, zero padded.
    pub remaining_formatted: String,
    /// Elapsed share of the current mode, in `[0.0, 1.0]`.
    pub progress: f64,
    pub running: bool,
}

/// Display surface for the countdown.
pub trait TimerSink {
    fn render_timer(&mut self, snapshot: &TimerSnapshot);
    /// The countdown reached zero; the surface should alert the user.
    fn timer_expired(&mut self, mode: TimerMode);
}

/// Sink that drops everything. Handy for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TaskSink for NullSink {
    fn render_tasks(&mut self, _tasks: &[Task]) {}
    fn render_stats(&mut self, _stats: TaskStats) {}
    fn render_categories(&mut self, _categories: &[CategoryInfo]) {}
}

impl TimerSink for NullSink {
    fn render_timer(&mut self, _snapshot: &TimerSnapshot) {}
    fn timer_expired(&mut self, _mode: TimerMode) {}
}
