//! Ordered, identifier-unique sets of tasks.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// An ordered list of tasks, unique by identifier.
///
/// Lookups are linear scans; the expected scale is dozens to a few hundred
/// tasks. Uniqueness is maintained by every mutating method, which is why
/// the underlying vector is not exposed mutably.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskCollection {
    tasks: Vec<Task>,
}

impl TaskCollection {
    /// Creates an empty collection.
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Looks up a task by identifier.
    pub fn get(&self, identifier: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.identifier == identifier)
    }

    /// Looks up a task by identifier for mutation.
    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.identifier == identifier)
    }

    /// Returns the task with `identifier`, appending an empty one if absent.
    pub fn get_or_insert(&mut self, identifier: &str) -> &mut Task {
        let index = match self.position(identifier) {
            Some(index) => index,
            None => {
                self.tasks.push(Task::new(identifier));
                self.tasks.len() - 1
            }
        };
        &mut self.tasks[index]
    }

    /// Inserts `task`, or replaces the task sharing its identifier in place.
    pub fn upsert(&mut self, task: Task) {
        match self.position(&task.identifier) {
            Some(index) => self.tasks[index] = task,
            None => self.tasks.push(task),
        }
    }

    /// Removes and returns the task with `identifier`.
    pub fn remove(&mut self, identifier: &str) -> Option<Task> {
        self.position(identifier).map(|index| self.tasks.remove(index))
    }

    /// Tasks that currently have an open activity.
    pub fn running(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_running())
    }

    fn position(&self, identifier: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.identifier == identifier)
    }
}

impl FromIterator<Task> for TaskCollection {
    /// Later tasks replace earlier ones with the same identifier.
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut collection = Self::new();
        for task in iter {
            collection.upsert(task);
        }
        collection
    }
}

impl IntoIterator for TaskCollection {
    type Item = Task;
    type IntoIter = std::vec::IntoIter<Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.into_iter()
    }
}

impl<'a> IntoIterator for &'a TaskCollection {
    type Item = &'a Task;
    type IntoIter = std::slice::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
