//! Core use-case services.
//!
//! # Responsibility
//! - Own the mutable application state behind explicit instances.
//! - Keep input and display surfaces decoupled from storage details.
//!
//! The task store and the timer never talk to each other.

pub mod task_store;
pub mod timer;
