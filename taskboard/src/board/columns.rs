//! Per-status projection of a task snapshot.
//!
//! Columns are never stored; they are recomputed from the store on every
//! read so a task's column can't disagree with its status.

use taskboard_proto::task::{Task, TaskStatus};

/// Returns the tasks whose status is `status`, preserving input order.
#[must_use]
pub fn partition(tasks: &[Task], status: TaskStatus) -> Vec<Task> {
    tasks.iter().filter(|t| t.status == status).cloned().collect()
}

/// The three board columns derived from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    /// Tasks in `todo`.
    pub todo: Vec<Task>,
    /// Tasks in `in_progress`.
    pub in_progress: Vec<Task>,
    /// Tasks in `done`.
    pub done: Vec<Task>,
}

impl Columns {
    /// Partitions `tasks` into the three columns.
    #[must_use]
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            todo: partition(tasks, TaskStatus::Todo),
            in_progress: partition(tasks, TaskStatus::InProgress),
            done: partition(tasks, TaskStatus::Done),
        }
    }

    /// Tasks of one column.
    #[must_use]
    pub fn get(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Columns paired with their status, left to right.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[Task])> {
        TaskStatus::ALL.into_iter().map(|status| (status, self.get(status)))
    }

    /// Total number of tasks across all columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    /// Whether every column is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
