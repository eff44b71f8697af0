//! Core state for FocusFlow: a persisted task list and a pomodoro countdown.
//! Display and input surfaces live outside this crate and talk to it through
//! the sink traits in [`render`].

pub mod config;
pub mod logging;
pub mod model;
pub mod render;
pub mod service;
pub mod storage;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::category::{category_color, known_categories, CategoryInfo};
pub use model::task::{NewTask, Task, TaskId, TaskStats, TaskValidationError, UNSET_TIME};
pub use render::{
    NullSink, TaskSink, TimerSink, TimerSnapshot, EMPTY_TITLE_NOTICE, EXPIRED_NOTICE,
};
pub use service::task_store::{Clock, SystemClock, TaskStore, TASKS_STORAGE_KEY};
pub use service::timer::{
    format_time, PomodoroTimer, TickOutcome, TimerMode, TimerModeParseError, TICK_PERIOD,
};
pub use storage::{KeyValueStore, MemoryKvStore, SqliteKvStore, StorageError, StorageResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
