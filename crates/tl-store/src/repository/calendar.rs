use chrono::{DateTime, Utc};
use tl_core::TaskCollection;

use super::{StarterPauser, TaskRepository, read_tasks, write_tasks};
use crate::StoreError;
use crate::codec::CalendarCodec;
use crate::store::Store;

/// Task repository persisted as a calendar document.
///
/// The format has no way to append a single action, so starting and
/// pausing decode the whole document, change one task and re-encode it.
#[derive(Debug)]
pub struct CalendarRepository<S> {
    store: S,
    codec: CalendarCodec,
}

impl<S: Store> CalendarRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_codec(store, CalendarCodec::default())
    }

    pub const fn with_codec(store: S, codec: CalendarCodec) -> Self {
        Self { store, codec }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: Store> TaskRepository for CalendarRepository<S> {
    fn get_tasks(&mut self) -> Result<TaskCollection, StoreError> {
        read_tasks(&self.codec, &mut self.store)
    }

    fn set_tasks(&mut self, tasks: TaskCollection) -> Result<(), StoreError> {
        tracing::debug!(tasks = tasks.len(), "rewriting calendar");
        write_tasks(&self.codec, &mut self.store, &tasks)
    }

    fn as_starter_pauser(&mut self) -> Option<&mut dyn StarterPauser> {
        Some(self)
    }
}

impl<S: Store> StarterPauser for CalendarRepository<S> {
    fn start_task(&mut self, identifier: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut tasks = self.get_tasks()?;
        if !tasks.get_or_insert(identifier).start(at) {
            tracing::debug!(%identifier, "task already running");
            return Ok(());
        }
        self.set_tasks(tasks)
    }

    fn pause_task(&mut self, identifier: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut tasks = self.get_tasks()?;
        let paused = tasks.get_mut(identifier).is_some_and(|task| task.pause(at));
        if !paused {
            tracing::debug!(%identifier, "task not running");
            return Ok(());
        }
        self.set_tasks(tasks)
    }
}
