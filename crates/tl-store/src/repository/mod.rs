//! Repository contracts and their store-backed implementations.
//!
//! A repository binds a codec to a backing store. Every read returns an
//! owned snapshot and every write takes ownership of its input, so no caller
//! can alias what the next read will return.
//!
//! Some repositories can start, pause or delete tasks more efficiently than
//! the generic read-modify-write cycle. They advertise that through the
//! `as_*` capability probes, which the service checks before falling back.

use chrono::{DateTime, Utc};
use tl_core::{Task, TaskCollection};

use crate::StoreError;
use crate::codec::Codec;
use crate::store::Store;

mod calendar;
mod log;
mod memory;

pub use calendar::CalendarRepository;
pub use log::LogRepository;
pub use memory::MemoryRepository;

/// A collection of tasks persisted somewhere.
pub trait TaskRepository {
    /// Returns every task.
    fn get_tasks(&mut self) -> Result<TaskCollection, StoreError>;

    /// Returns the task with `identifier`, or `None` if it is unknown.
    fn get_task(&mut self, identifier: &str) -> Result<Option<Task>, StoreError> {
        Ok(self.get_tasks()?.remove(identifier))
    }

    /// Inserts `task`, or replaces every activity of the task with its identifier.
    fn set_task(&mut self, task: Task) -> Result<(), StoreError> {
        let mut tasks = self.get_tasks()?;
        tasks.upsert(task);
        self.set_tasks(tasks)
    }

    /// Replaces the whole content of the repository; an empty collection clears it.
    fn set_tasks(&mut self, tasks: TaskCollection) -> Result<(), StoreError>;

    /// Native start/pause support, if the repository has it.
    fn as_starter_pauser(&mut self) -> Option<&mut dyn StarterPauser> {
        None
    }

    /// Native deletion support, if the repository has it.
    fn as_deleter(&mut self) -> Option<&mut dyn Deleter> {
        None
    }
}

/// A repository that can start and pause tasks directly.
pub trait StarterPauser: TaskRepository {
    /// Starts the task at `at`, creating it if needed. No-op if already running.
    fn start_task(&mut self, identifier: &str, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Pauses the task at `at`. No-op if it is unknown or not running.
    fn pause_task(&mut self, identifier: &str, at: DateTime<Utc>) -> Result<(), StoreError>;
}

/// A repository that can delete tasks directly.
pub trait Deleter: TaskRepository {
    fn delete_task(&mut self, identifier: &str) -> Result<(), StoreError>;

    fn delete_tasks(&mut self) -> Result<(), StoreError>;
}

impl<R: TaskRepository + ?Sized> TaskRepository for Box<R> {
    fn get_tasks(&mut self) -> Result<TaskCollection, StoreError> {
        (**self).get_tasks()
    }

    fn get_task(&mut self, identifier: &str) -> Result<Option<Task>, StoreError> {
        (**self).get_task(identifier)
    }

    fn set_task(&mut self, task: Task) -> Result<(), StoreError> {
        (**self).set_task(task)
    }

    fn set_tasks(&mut self, tasks: TaskCollection) -> Result<(), StoreError> {
        (**self).set_tasks(tasks)
    }

    fn as_starter_pauser(&mut self) -> Option<&mut dyn StarterPauser> {
        (**self).as_starter_pauser()
    }

    fn as_deleter(&mut self) -> Option<&mut dyn Deleter> {
        (**self).as_deleter()
    }
}

/// Decodes the whole store; a store that was never written is empty.
fn read_tasks<C: Codec, S: Store>(codec: &C, store: &mut S) -> Result<TaskCollection, StoreError> {
    match store.open_read()? {
        Some(mut reader) => codec.decode(&mut *reader),
        None => Ok(TaskCollection::new()),
    }
}

/// Truncates the store and encodes `tasks` into it.
fn write_tasks<C: Codec, S: Store>(
    codec: &C,
    store: &mut S,
    tasks: &TaskCollection,
) -> Result<(), StoreError> {
    let mut writer = store.open_rewrite()?;
    codec.encode(tasks, &mut *writer)
}
