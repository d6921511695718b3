//! Task operations on top of any repository.

use std::path::Path;

use chrono::{DateTime, Utc};
use tl_core::{Task, TaskCollection, TaskId};

use crate::StoreError;
use crate::codec::CalendarCodec;
use crate::format::Format;
use crate::repository::TaskRepository;

/// Starts, pauses, switches, deletes and exports tasks.
///
/// Repositories with native start/pause or delete support are driven through
/// it; everything else goes through a read-modify-write of the affected task.
#[derive(Debug)]
pub struct TaskService<R> {
    repository: R,
    calendar: CalendarCodec,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            calendar: CalendarCodec::default(),
        }
    }

    /// Sets the calendar header values used by [`Self::export`].
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarCodec) -> Self {
        self.calendar = calendar;
        self
    }

    pub const fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    pub fn get_task(&mut self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        self.repository.get_task(id.as_str())
    }

    pub fn get_tasks(&mut self) -> Result<TaskCollection, StoreError> {
        self.repository.get_tasks()
    }

    pub fn set_task(&mut self, task: Task) -> Result<(), StoreError> {
        self.repository.set_task(task)
    }

    pub fn set_tasks(&mut self, tasks: TaskCollection) -> Result<(), StoreError> {
        self.repository.set_tasks(tasks)
    }

    pub fn start_task(&mut self, id: &TaskId) -> Result<(), StoreError> {
        self.start_task_at(id, Utc::now())
    }

    /// Starts `id` at `at`, creating the task if it does not exist yet.
    pub fn start_task_at(&mut self, id: &TaskId, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.start(id.as_str(), at)
    }

    pub fn pause_task(&mut self, id: &TaskId) -> Result<(), StoreError> {
        self.pause_task_at(id, Utc::now())
    }

    /// Pauses `id` at `at`. Unknown or idle tasks are left alone.
    pub fn pause_task_at(&mut self, id: &TaskId, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.pause(id.as_str(), at)
    }

    pub fn switch_task(&mut self, id: &TaskId) -> Result<(), StoreError> {
        self.switch_task_at(id, Utc::now())
    }

    /// Pauses every running task other than `id`, then starts `id`.
    pub fn switch_task_at(&mut self, id: &TaskId, at: DateTime<Utc>) -> Result<(), StoreError> {
        let others: Vec<String> = self
            .repository
            .get_tasks()?
            .running()
            .filter(|task| task.identifier != id.as_str())
            .map(|task| task.identifier.clone())
            .collect();

        for identifier in &others {
            self.pause(identifier, at)?;
        }
        self.start(id.as_str(), at)
    }

    pub fn delete_task(&mut self, id: &TaskId) -> Result<(), StoreError> {
        if let Some(native) = self.repository.as_deleter() {
            return native.delete_task(id.as_str());
        }

        let mut tasks = self.repository.get_tasks()?;
        if tasks.remove(id.as_str()).is_none() {
            tracing::debug!(%id, "task not found, nothing to delete");
            return Ok(());
        }
        self.repository.set_tasks(tasks)
    }

    pub fn delete_tasks(&mut self) -> Result<(), StoreError> {
        if let Some(native) = self.repository.as_deleter() {
            return native.delete_tasks();
        }
        self.repository.set_tasks(TaskCollection::new())
    }

    /// Writes every task into a file of `format` at `destination`, replacing
    /// whatever the file held before.
    pub fn export(&mut self, format: Format, destination: &Path) -> Result<(), StoreError> {
        let tasks = self.repository.get_tasks()?;
        tracing::debug!(%format, destination = %destination.display(), tasks = tasks.len(), "exporting");
        format
            .open_file(destination, &self.calendar)
            .set_tasks(tasks)
    }

    fn start(&mut self, identifier: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(native) = self.repository.as_starter_pauser() {
            return native.start_task(identifier, at);
        }

        let mut task = self
            .repository
            .get_task(identifier)?
            .unwrap_or_else(|| Task::new(identifier));
        if !task.start(at) {
            tracing::debug!(%identifier, "task already running");
            return Ok(());
        }
        self.repository.set_task(task)
    }

    fn pause(&mut self, identifier: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(native) = self.repository.as_starter_pauser() {
            return native.pause_task(identifier, at);
        }

        let Some(mut task) = self.repository.get_task(identifier)? else {
            tracing::debug!(%identifier, "task not found, nothing to pause");
            return Ok(());
        };
        if !task.pause(at) {
            tracing::debug!(%identifier, "task not running");
            return Ok(());
        }
        self.repository.set_task(task)
    }
}
