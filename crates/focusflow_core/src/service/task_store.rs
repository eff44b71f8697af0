//! Task store service.
//!
//! # Responsibility
//! - Own the ordered task collection (newest first).
//! - Persist the whole collection after every successful mutation.
//! - Push tasks and stats to the sink after every change.
//!
//! # Invariants
//! - Task ids are unique. They increase in creation order until an id of
//!   `TaskId::MAX` is present, after which the lowest free id is reused.
//! - A failed write never rolls back the in-memory mutation.
//! - Log lines carry ids and counts only, never titles.

use crate::model::category::known_categories;
use crate::model::task::{NewTask, Task, TaskId, TaskStats, TaskValidationError};
use crate::render::TaskSink;
use crate::storage::{KeyValueStore, StorageError};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::BTreeSet;

/// Storage key holding the serialized task collection.
pub const TASKS_STORAGE_KEY: &str = "focusflow_tasks";

/// Source of wall-clock "now" for creation timestamps and ids.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Ordered task collection backed by a key-value store.
pub struct TaskStore<S: KeyValueStore, R: TaskSink, C: Clock = SystemClock> {
    storage: S,
    sink: R,
    clock: C,
    tasks: Vec<Task>,
}

impl<S: KeyValueStore, R: TaskSink> TaskStore<S, R, SystemClock> {
    /// Creates an empty store; call [`TaskStore::init`] to load saved tasks.
    pub fn new(storage: S, sink: R) -> Self {
        Self::with_clock(storage, sink, SystemClock)
    }
}

impl<S: KeyValueStore, R: TaskSink, C: Clock> TaskStore<S, R, C> {
    pub fn with_clock(storage: S, sink: R, clock: C) -> Self {
        Self {
            storage,
            sink,
            clock,
            tasks: Vec::new(),
        }
    }

    /// Loads persisted tasks and renders categories, tasks and stats.
    pub fn init(&mut self) {
        self.load();
        self.sink.render_categories(known_categories());
        self.render();
    }

    /// Replaces the in-memory collection with the persisted one.
    ///
    /// Absent, unreadable or malformed data yields an empty collection.
    pub fn load(&mut self) {
        self.tasks = match self.storage.load(TASKS_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => tasks,
                Err(err) => {
                    warn!(
                        "event=tasks_load module=task_store status=error error_code=malformed_data error={}",
                        err
                    );
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(
                    "event=tasks_load module=task_store status=error error_code=storage_read_failed error={}",
                    err
                );
                Vec::new()
            }
        };
        info!(
            "event=tasks_load module=task_store status=ok count={}",
            self.tasks.len()
        );
    }

    /// Creates a pending task at the top of the list.
    ///
    /// # Errors
    /// - `TaskValidationError::EmptyTitle` when the title is blank; nothing
    ///   is mutated or persisted in that case.
    pub fn create(&mut self, input: NewTask) -> Result<Task, TaskValidationError> {
        if let Err(err) = input.validate() {
            debug!("event=task_create module=task_store status=rejected reason={err}");
            return Err(err);
        }

        let created_at = self.clock.now();
        let id = self.next_id(created_at);
        let task = Task::from_input(id, input, created_at)?;
        self.tasks.insert(0, task.clone());
        info!(
            "event=task_create module=task_store status=ok task_id={} count={}",
            id,
            self.tasks.len()
        );

        self.save_and_render();
        Ok(task)
    }

    /// Flips completion of the task with `id`. Returns whether it was found.
    pub fn toggle(&mut self, id: TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            debug!("event=task_toggle module=task_store status=not_found task_id={id}");
            return false;
        };
        let completed = task.toggle();
        info!(
            "event=task_toggle module=task_store status=ok task_id={} completed={}",
            id, completed
        );

        self.save_and_render();
        true
    }

    /// Removes the task with `id`. Returns whether a removal happened.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!("event=task_delete module=task_store status=not_found task_id={id}");
            return false;
        }
        info!(
            "event=task_delete module=task_store status=ok task_id={} count={}",
            id,
            self.tasks.len()
        );

        self.save_and_render();
        true
    }

    /// Read-only view of the tasks, newest first.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn sink(&self) -> &R {
        &self.sink
    }

    /// Consumes the store, handing back its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Creation time in milliseconds, bumped past every existing id.
    ///
    /// When the highest id is `TaskId::MAX` there is nothing above it; the
    /// lowest unused non-negative id is taken instead.
    fn next_id(&self, created_at: DateTime<Utc>) -> TaskId {
        let candidate = created_at.timestamp_millis();
        match self.tasks.iter().map(|task| task.id).max() {
            Some(max_id) if max_id >= candidate => {
                max_id.checked_add(1).unwrap_or_else(|| {
                    warn!("event=task_id_alloc module=task_store status=exhausted max_id={max_id}");
                    self.lowest_free_id()
                })
            }
            _ => candidate,
        }
    }

    fn lowest_free_id(&self) -> TaskId {
        let used: BTreeSet<TaskId> = self.tasks.iter().map(|task| task.id).collect();
        (0..TaskId::MAX)
            .find(|id| !used.contains(id))
            .unwrap_or_default()
    }

    fn save_and_render(&mut self) {
        if let Err(err) = self.persist() {
            warn!(
                "event=tasks_save module=task_store status=error error_code=storage_write_failed count={} error={}",
                self.tasks.len(),
                err
            );
            self.sink.storage_warning(&err);
        }
        self.render();
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&self.tasks)
            .map_err(|err| StorageError::Unavailable(format!("serialize tasks: {err}")))?;
        self.storage.save(TASKS_STORAGE_KEY, &payload)
    }

    fn render(&mut self) {
        self.sink.render_tasks(&self.tasks);
        self.sink.render_stats(TaskStats::from_tasks(&self.tasks));
    }
}
