//! Task backend abstraction.
//!
//! Defines the [`Backend`] trait the board talks to. Implementations:
//! - [`http::HttpBackend`]: the REST backend over HTTP
//! - [`loopback::LoopbackBackend`]: in-process backend for tests and offline mode

pub mod http;
pub mod loopback;

use taskboard_proto::envelope::FALLBACK_ERROR_MESSAGE;
use taskboard_proto::project::Project;
use taskboard_proto::task::{CreateTaskRequest, Task, TaskId, TaskStatus};

/// Errors returned by backend calls.
///
/// Any of these means the call failed; callers never branch on the
/// variant beyond choosing what to show the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("could not reach the server: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {}", .messages.join("; "))]
    Status {
        /// HTTP status code.
        status: u16,
        /// Messages extracted from the error body.
        messages: Vec<String>,
    },

    /// A 2xx response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),

    /// The configured base URL can't carry request paths.
    #[error("invalid API url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Messages to show the user, one notification each.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Status { messages, .. } if !messages.is_empty() => messages.clone(),
            Self::Status { .. } | Self::Decode(_) => vec![FALLBACK_ERROR_MESSAGE.to_string()],
            Self::Transport(_) | Self::InvalidUrl(_) => vec![self.to_string()],
        }
    }
}

/// Async access to the task backend.
///
/// Futures are `Send` so calls can run on spawned tokio tasks while the
/// board stays on its owner.
pub trait Backend: Send + Sync + 'static {
    /// `GET /task/project/{project_id}`: all tasks of a project, in server order.
    fn fetch_tasks(
        &self,
        project_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, ApiError>> + Send;

    /// `PUT /task/{task_id}/status`: request a status change.
    fn update_status(
        &self,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> impl std::future::Future<Output = Result<(), ApiError>> + Send;

    /// `POST /task`: create a task; returns the created task.
    fn create_task(
        &self,
        request: &CreateTaskRequest,
    ) -> impl std::future::Future<Output = Result<Task, ApiError>> + Send;

    /// `GET /project/{project_id}`: project metadata, including its owner.
    fn fetch_project(
        &self,
        project_id: &str,
    ) -> impl std::future::Future<Output = Result<Project, ApiError>> + Send;
}
