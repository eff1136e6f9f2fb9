//! In-process backend for tests and offline mode.
//!
//! Keeps projects and tasks in memory behind a mutex, records every call,
//! and can be told to fail a given operation or to answer after a delay.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use uuid::Uuid;

use taskboard_proto::project::Project;
use taskboard_proto::task::{CreateTaskRequest, Task, TaskId, TaskStatus};

use super::{ApiError, Backend};

/// Backend operations, for failure injection and call accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `GET /task/project/{id}`
    FetchTasks,
    /// `PUT /task/{id}/status`
    UpdateStatus,
    /// `POST /task`
    CreateTask,
    /// `GET /project/{id}`
    FetchProject,
}

#[derive(Debug, Default)]
struct LoopbackState {
    projects: HashMap<String, Project>,
    /// (project ID, task) in insertion order.
    tasks: Vec<(String, Task)>,
    failures: HashMap<Operation, ApiError>,
    calls: Vec<Operation>,
}

/// In-memory [`Backend`].
#[derive(Debug, Default)]
pub struct LoopbackBackend {
    state: Mutex<LoopbackState>,
    latency: Option<Duration>,
}

impl LoopbackBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every answer by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Registers a project.
    pub fn insert_project(&self, project: Project) {
        self.state.lock().projects.insert(project.id.clone(), project);
    }

    /// Appends `tasks` to `project_id`.
    pub fn insert_tasks(&self, project_id: &str, tasks: impl IntoIterator<Item = Task>) {
        let mut state = self.state.lock();
        state
            .tasks
            .extend(tasks.into_iter().map(|t| (project_id.to_string(), t)));
    }

    /// Sets the status of a stored task, as another client would.
    pub fn set_status(&self, task_id: &TaskId, status: TaskStatus) {
        let mut state = self.state.lock();
        if let Some((_, task)) = state.tasks.iter_mut().find(|(_, t)| t.id == *task_id) {
            task.status = status;
        }
    }

    /// Makes every subsequent `operation` fail with `error`.
    pub fn fail(&self, operation: Operation, error: ApiError) {
        self.state.lock().failures.insert(operation, error);
    }

    /// Lets `operation` succeed again.
    pub fn recover(&self, operation: Operation) {
        self.state.lock().failures.remove(&operation);
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Operation> {
        self.state.lock().calls.clone()
    }

    /// Number of calls made to `operation`.
    #[must_use]
    pub fn call_count(&self, operation: Operation) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|op| **op == operation)
            .count()
    }

    /// Tasks currently stored for `project_id`.
    #[must_use]
    pub fn tasks(&self, project_id: &str) -> Vec<Task> {
        self.state
            .lock()
            .tasks
            .iter()
            .filter(|(p, _)| p == project_id)
            .map(|(_, t)| t.clone())
            .collect()
    }

    /// Records the call, waits out the latency, and returns the injected
    /// failure for `operation`, if any.
    async fn enter(&self, operation: Operation) -> Result<(), ApiError> {
        self.state.lock().calls.push(operation);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.state.lock().failures.get(&operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        messages: vec![format!("{what} not found")],
    }
}

impl Backend for LoopbackBackend {
    async fn fetch_tasks(&self, project_id: &str) -> Result<Vec<Task>, ApiError> {
        self.enter(Operation::FetchTasks).await?;
        Ok(self.tasks(project_id))
    }

    async fn update_status(&self, task_id: &TaskId, status: TaskStatus) -> Result<(), ApiError> {
        self.enter(Operation::UpdateStatus).await?;
        let mut state = self.state.lock();
        let (_, task) = state
            .tasks
            .iter_mut()
            .find(|(_, t)| t.id == *task_id)
            .ok_or_else(|| not_found("Task"))?;
        task.status = status;
        Ok(())
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task, ApiError> {
        self.enter(Operation::CreateTask).await?;
        if request.title.trim().is_empty() {
            return Err(ApiError::Status {
                status: 400,
                messages: vec!["title is required".to_string()],
            });
        }
        let task = Task {
            id: TaskId::new(Uuid::now_v7().to_string()),
            title: request.title.clone(),
            description: request.description.clone(),
            status: TaskStatus::Todo,
            assignee_email: None,
        };
        self.state
            .lock()
            .tasks
            .push((request.project_id.clone(), task.clone()));
        Ok(task)
    }

    async fn fetch_project(&self, project_id: &str) -> Result<Project, ApiError> {
        self.enter(Operation::FetchProject).await?;
        self.state
            .lock()
            .projects
            .get(project_id)
            .cloned()
            .ok_or_else(|| not_found("Project"))
    }
}
