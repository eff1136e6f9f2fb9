//! Ordered in-memory task collection for one project.

use taskboard_proto::task::{Task, TaskId, TaskStatus};

/// Single source of truth for the rendered board.
///
/// Contents are replaced wholesale after every fetch and patched field-wise
/// by optimistic status changes. Every mutation bumps [`revision`](Self::revision)
/// so views can tell when to re-render.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    revision: u64,
}

impl TaskStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `tasks` as the new contents, in the given order.
    ///
    /// Duplicate IDs are not checked: server responses are authoritative.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        tracing::debug!(count = tasks.len(), "task store replaced");
        self.tasks = tasks;
        self.revision += 1;
    }

    /// Overwrites the status of the task with `task_id`.
    ///
    /// Returns `false` (and leaves the store untouched) when no such task
    /// exists, e.g. because a concurrent re-fetch removed it.
    pub fn patch_status(&mut self, task_id: &TaskId, status: TaskStatus) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == *task_id) else {
            tracing::debug!(task_id = %task_id, "status patch for unknown task ignored");
            return false;
        };
        task.status = status;
        self.revision += 1;
        true
    }

    /// Returns a copy of the current contents in order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    /// Borrowing view of the current contents.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a task by ID.
    #[must_use]
    pub fn get(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *task_id)
    }

    /// Number of tasks in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Mutation counter, bumped by every call that changed the contents.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}
