//! Domain model for the task list.
//!
//! # Responsibility
//! - Define the task record persisted by the task store.
//! - Provide the category catalog consumed by render sinks.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal; nothing else references a task.

pub mod category;
pub mod task;
