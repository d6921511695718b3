use std::io::Write;

use chrono::{DateTime, Utc};
use tl_core::TaskCollection;

use super::{StarterPauser, TaskRepository, read_tasks, write_tasks};
use crate::StoreError;
use crate::codec::{Action, LogCodec};
use crate::store::Store;

/// Task repository persisted as an append-only start/stop log.
///
/// Starting and pausing append one record; every other write rewrites the
/// whole log from the collection.
#[derive(Debug)]
pub struct LogRepository<S> {
    store: S,
    codec: LogCodec,
}

impl<S: Store> LogRepository<S> {
    pub const fn new(store: S) -> Self {
        Self {
            store,
            codec: LogCodec,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn append(&mut self, identifier: &str, action: Action, at: DateTime<Utc>) -> Result<(), StoreError> {
        tracing::debug!(%identifier, %action, %at, "appending log record");
        let mut writer = self.store.open_append()?;
        self.codec.write_record(&mut *writer, identifier, action, at)?;
        writer.flush()?;
        Ok(())
    }
}

impl<S: Store> TaskRepository for LogRepository<S> {
    fn get_tasks(&mut self) -> Result<TaskCollection, StoreError> {
        read_tasks(&self.codec, &mut self.store)
    }

    fn set_tasks(&mut self, tasks: TaskCollection) -> Result<(), StoreError> {
        tracing::debug!(tasks = tasks.len(), "rewriting log");
        write_tasks(&self.codec, &mut self.store, &tasks)
    }

    fn as_starter_pauser(&mut self) -> Option<&mut dyn StarterPauser> {
        Some(self)
    }
}

impl<S: Store> StarterPauser for LogRepository<S> {
    fn start_task(&mut self, identifier: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.append(identifier, Action::Start, at)
    }

    fn pause_task(&mut self, identifier: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        self.append(identifier, Action::Stop, at)
    }
}
