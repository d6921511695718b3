//! Core domain model for the task log.
//!
//! This crate contains the fundamental types for:
//! - Activities: contiguous start/end intervals of work
//! - Tasks: named owners of ordered activities
//! - Task collections: ordered, identifier-unique sets of tasks
//! - Identifier validation

mod activity;
mod collection;
mod task;
mod types;

pub use activity::Activity;
pub use collection::TaskCollection;
pub use task::Task;
pub use types::{TaskId, ValidationError};
