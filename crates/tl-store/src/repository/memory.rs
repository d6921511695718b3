use tl_core::{Task, TaskCollection};

use super::{Deleter, TaskRepository};
use crate::StoreError;

/// Task repository held entirely in memory.
///
/// It has no native start/pause, so the service drives it through the
/// generic read-modify-write path.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    tasks: TaskCollection,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl From<TaskCollection> for MemoryRepository {
    fn from(tasks: TaskCollection) -> Self {
        Self { tasks }
    }
}

impl TaskRepository for MemoryRepository {
    fn get_tasks(&mut self) -> Result<TaskCollection, StoreError> {
        Ok(self.tasks.clone())
    }

    fn get_task(&mut self, identifier: &str) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.get(identifier).cloned())
    }

    fn set_task(&mut self, task: Task) -> Result<(), StoreError> {
        self.tasks.upsert(task);
        Ok(())
    }

    fn set_tasks(&mut self, tasks: TaskCollection) -> Result<(), StoreError> {
        self.tasks = tasks;
        Ok(())
    }

    fn as_deleter(&mut self) -> Option<&mut dyn Deleter> {
        Some(self)
    }
}

impl Deleter for MemoryRepository {
    fn delete_task(&mut self, identifier: &str) -> Result<(), StoreError> {
        self.tasks.remove(identifier);
        Ok(())
    }

    fn delete_tasks(&mut self) -> Result<(), StoreError> {
        self.tasks = TaskCollection::new();
        Ok(())
    }
}
