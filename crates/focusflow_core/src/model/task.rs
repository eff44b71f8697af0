//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and its wire field names.
//! - Validate raw input-surface values before a task is created.
//!
//! # Invariants
//! - `id` is unique within one store and never reassigned.
//! - `title` is never blank for a stored task.
//! - `start`/`end` hold either free-form `HH:MM` text or [`UNSET_TIME`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable task identifier, derived from creation time in epoch milliseconds.
pub type TaskId = i64;

/// Sentinel stored in `start`/`end` when the user left the field blank.
pub const UNSET_TIME: &str = "--:--";

/// One to-do item with an optional time window and a category tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Display title, stored exactly as entered.
    pub title: String,
    pub start: String,
    pub end: String,
    /// Free-form category; known names only matter for color mapping.
    pub category: String,
    pub completed: bool,
    /// Serialized as `createdAt` to match the persisted layout.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Builds a pending task from validated input.
    ///
    /// Blank `start`/`end` values collapse to [`UNSET_TIME`].
    pub fn from_input(
        id: TaskId,
        input: NewTask,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        input.validate()?;
        Ok(Self {
            id,
            title: input.title,
            start: time_or_unset(input.start),
            end: time_or_unset(input.end),
            category: input.category,
            completed: false,
            created_at,
        })
    }

    /// Whether the task carries a start time worth displaying.
    pub fn has_time_window(&self) -> bool {
        self.start != UNSET_TIME
    }

    /// Flips completion and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

/// Raw form values supplied by the input surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub category: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            start: None,
            end: None,
            category: category.into(),
        }
    }

    /// Sets the optional time window.
    pub fn with_window(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.end = Some(end.into());
        self
    }

    /// Rejects whitespace-only titles.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

fn time_or_unset(value: Option<String>) -> String {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => UNSET_TIME.to_string(),
    }
}

/// Completed/pending counters derived from the current collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub completed: usize,
    pub pending: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            completed,
            pending: tasks.len() - completed,
        }
    }

    pub fn total(&self) -> usize {
        self.completed + self.pending
    }
}

/// Input validation failures for task creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be blank"),
        }
    }
}

impl Error for TaskValidationError {}

#[cfg(test)]
mod tests {
    use super::{NewTask, Task, TaskStats, TaskValidationError, UNSET_TIME};
    use chrono::{TimeZone, Utc};

    fn created_at() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn blank_window_collapses_to_sentinel() {
        let input = NewTask::new("Revisar PR", "Trabalho").with_window("", "  ");
        let task = Task::from_input(7, input, created_at()).expect("title is present");

        assert_eq!(task.start, UNSET_TIME);
        assert_eq!(task.end, UNSET_TIME);
        assert!(!task.has_time_window());
        assert!(!task.completed);
    }

    #[test]
    fn title_is_kept_verbatim() {
        let input = NewTask::new("  ler capítulo 3 ", "Estudo").with_window("08:00", "09:00");
        let task = Task::from_input(1, input, created_at()).expect("title is present");

        assert_eq!(task.title, "  ler capítulo 3 ");
        assert!(task.has_time_window());
    }

    #[test]
    fn whitespace_title_is_rejected() {
        let err = NewTask::new(" \t\n", "Pessoal")
            .validate()
            .expect_err("blank title must fail");
        assert_eq!(err, TaskValidationError::EmptyTitle);
    }

    #[test]
    fn stats_count_completed_and_pending() {
        let mut done = Task::from_input(1, NewTask::new("a", "x"), created_at()).unwrap();
        done.toggle();
        let open = Task::from_input(2, NewTask::new("b", "x"), created_at()).unwrap();

        let stats = TaskStats::from_tasks(&[done, open]);
        assert_eq!(stats, TaskStats { completed: 1, pending: 1 });
        assert_eq!(stats.total(), 2);
    }
}
