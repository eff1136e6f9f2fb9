//! The board facade: one project's store, columns, drag session and
//! optimistic coordinator behind a single owner.
//!
//! Network work is split in three steps so the owner never blocks on it:
//! a synchronous start that may touch the store, a `Send + 'static`
//! future that talks to the backend, and a synchronous apply step that
//! takes the future's result. The `async` helpers ([`TaskBoard::mount`],
//! [`TaskBoard::drop_on`], [`TaskBoard::create_task`]) chain the three for
//! callers that can simply await.

use std::future::Future;
use std::sync::Arc;

use taskboard_proto::task::{CreateTaskRequest, MAX_TASK_TITLE_LENGTH, Task, TaskId};

use super::BoardError;
use super::columns::Columns;
use super::drag::{DragController, DragOutcome, DragState, DropTarget};
use super::optimistic::{self, Confirmation, OptimisticCoordinator, PendingTransition, Settlement};
use super::store::TaskStore;
use crate::api::{ApiError, Backend};
use crate::notify::{Notifier, notify_api_error};

/// Notification shown when the backend accepts a new task.
pub const TASK_CREATED_MESSAGE: &str = "Task created";

/// Result of a task-list fetch.
pub type FetchOutcome = Result<Vec<Task>, ApiError>;

/// Result of a task creation.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    /// The created task, or why creation failed.
    pub created: Result<Task, ApiError>,
    /// Task list re-fetched after a successful creation.
    pub refreshed: Option<Vec<Task>>,
}

/// Kanban board for one project.
pub struct TaskBoard<B, N> {
    project_id: String,
    current_user: Option<String>,
    owner: Option<String>,
    max_title_len: usize,
    store: TaskStore,
    drag: DragController,
    coordinator: OptimisticCoordinator,
    backend: Arc<B>,
    notifier: Arc<N>,
}

impl<B: Backend, N: Notifier> TaskBoard<B, N> {
    /// Creates an empty board bound to `project_id`.
    pub fn new(project_id: impl Into<String>, backend: Arc<B>, notifier: Arc<N>) -> Self {
        Self {
            project_id: project_id.into(),
            current_user: None,
            owner: None,
            max_title_len: MAX_TASK_TITLE_LENGTH,
            store: TaskStore::new(),
            drag: DragController::new(),
            coordinator: OptimisticCoordinator::new(),
            backend,
            notifier,
        }
    }

    /// Sets the signed-in user and the project owner used by the
    /// task-creation gate.
    #[must_use]
    pub fn with_identity(mut self, current_user: Option<String>, owner: Option<String>) -> Self {
        self.current_user = current_user;
        self.owner = owner;
        self
    }

    /// Overrides the maximum task title length (in characters).
    #[must_use]
    pub const fn with_max_title_len(mut self, max: usize) -> Self {
        self.max_title_len = max;
        self
    }

    /// Updates the project owner, e.g. once project metadata arrives.
    pub fn set_owner(&mut self, owner: Option<String>) {
        self.owner = owner;
    }

    /// Owner of the project, once known.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Looks up the project owner. Failures are notified before being
    /// returned.
    pub fn owner_lookup(&self) -> impl Future<Output = Result<String, ApiError>> + Send + use<B, N> {
        let backend = Arc::clone(&self.backend);
        let notifier = Arc::clone(&self.notifier);
        let project_id = self.project_id.clone();
        async move {
            let result = project_owner(backend.as_ref(), &project_id).await;
            if let Err(err) = &result {
                tracing::warn!(project_id = %project_id, error = %err, "project lookup failed");
                notify_api_error(notifier.as_ref(), err);
            }
            result
        }
    }

    /// Project this board is bound to.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Current tasks in store order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.store.snapshot()
    }

    /// The three columns, recomputed from the store.
    #[must_use]
    pub fn columns(&self) -> Columns {
        Columns::from_tasks(self.store.tasks())
    }

    /// Current drag session.
    #[must_use]
    pub const fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Number of tasks with an unconfirmed move.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.coordinator.in_flight()
    }

    // --- fetching ---

    /// Fetches the project's tasks. Failures are notified before being
    /// returned.
    pub fn fetch(&self) -> impl Future<Output = FetchOutcome> + Send + use<B, N> {
        let backend = Arc::clone(&self.backend);
        let notifier = Arc::clone(&self.notifier);
        let project_id = self.project_id.clone();
        async move {
            let result = backend.fetch_tasks(&project_id).await;
            if let Err(err) = &result {
                tracing::warn!(project_id = %project_id, error = %err, "task fetch failed");
                notify_api_error(notifier.as_ref(), err);
            }
            result
        }
    }

    /// Installs a fetch result. A failed fetch leaves the store as is.
    /// Moves awaiting confirmation stay applied over the fetched list.
    ///
    /// Returns whether the store was replaced.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> bool {
        match outcome {
            Ok(tasks) => {
                self.coordinator.install(&mut self.store, tasks);
                true
            }
            Err(_) => false,
        }
    }

    /// Loads the board from the backend.
    pub async fn mount(&mut self) -> bool {
        let outcome = self.fetch().await;
        self.apply_fetch(outcome)
    }

    /// Re-fetches the board; same as [`mount`](Self::mount).
    pub async fn refresh(&mut self) -> bool {
        self.mount().await
    }

    // --- drag and drop ---

    /// A card was picked up.
    pub fn drag_start(&mut self, task_id: TaskId) -> bool {
        self.drag.on_drag_start(task_id)
    }

    /// A card was released over `target` (`None`: outside every column).
    ///
    /// When the drop is a real move, the store is patched immediately and
    /// the pending transition is returned for confirmation.
    pub fn drag_end(&mut self, target: Option<DropTarget>) -> Option<PendingTransition> {
        match self.drag.on_drag_end(target, &self.store) {
            DragOutcome::Transition(request) => {
                Some(self.coordinator.begin(&mut self.store, request))
            }
            DragOutcome::Discarded(reason) => {
                tracing::debug!(?reason, "drop discarded");
                None
            }
        }
    }

    /// Confirms `pending` with the backend.
    pub fn confirmation(
        &self,
        pending: PendingTransition,
    ) -> impl Future<Output = Confirmation> + Send + use<B, N> {
        optimistic::confirm(
            Arc::clone(&self.backend),
            Arc::clone(&self.notifier),
            self.project_id.clone(),
            pending,
        )
    }

    /// Commits or rolls back a confirmed transition.
    pub fn settle(&mut self, confirmation: Confirmation) -> Settlement {
        self.coordinator.settle(&mut self.store, confirmation)
    }

    /// Ends the drag over `target` and awaits its confirmation.
    ///
    /// Returns `None` when the drop was discarded.
    pub async fn drop_on(&mut self, target: Option<DropTarget>) -> Option<Settlement> {
        let pending = self.drag_end(target)?;
        let confirmation = self.confirmation(pending).await;
        Some(self.settle(confirmation))
    }

    // --- task creation ---

    /// Whether the current user owns the project.
    #[must_use]
    pub fn can_create(&self) -> bool {
        self.current_user.is_some() && self.current_user == self.owner
    }

    /// Validates a new task and returns the future that creates it.
    ///
    /// Creation is never optimistic: nothing touches the store until
    /// [`finish_create`](Self::finish_create) receives a server-confirmed
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotOwner`] when the current user isn't the
    /// project owner, [`BoardError::TitleEmpty`] for a blank title and
    /// [`BoardError::TitleTooLong`] past the title limit. No request is
    /// made in those cases.
    pub fn begin_create(
        &self,
        title: &str,
        description: &str,
    ) -> Result<impl Future<Output = CreateOutcome> + Send + use<B, N>, BoardError> {
        if !self.can_create() {
            return Err(BoardError::NotOwner);
        }
        let title = title.trim();
        if title.is_empty() {
            return Err(BoardError::TitleEmpty);
        }
        if title.chars().count() > self.max_title_len {
            return Err(BoardError::TitleTooLong(self.max_title_len));
        }

        let request = CreateTaskRequest {
            title: title.to_string(),
            description: description.to_string(),
            project_id: self.project_id.clone(),
        };
        let backend = Arc::clone(&self.backend);
        let notifier = Arc::clone(&self.notifier);

        Ok(async move {
            match backend.create_task(&request).await {
                Ok(task) => {
                    tracing::info!(task_id = %task.id, "task created");
                    notifier.success(TASK_CREATED_MESSAGE);
                    let refreshed = match backend.fetch_tasks(&request.project_id).await {
                        Ok(tasks) => Some(tasks),
                        Err(err) => {
                            notify_api_error(notifier.as_ref(), &err);
                            None
                        }
                    };
                    CreateOutcome {
                        created: Ok(task),
                        refreshed,
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "task creation failed");
                    notify_api_error(notifier.as_ref(), &err);
                    CreateOutcome {
                        created: Err(err),
                        refreshed: None,
                    }
                }
            }
        })
    }

    /// Applies a creation outcome: the re-fetched list replaces the store.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Api`] when creation failed; the store is
    /// left untouched.
    pub fn finish_create(&mut self, outcome: CreateOutcome) -> Result<Task, BoardError> {
        let task = outcome.created?;
        if let Some(tasks) = outcome.refreshed {
            self.coordinator.install(&mut self.store, tasks);
        }
        Ok(task)
    }

    /// Creates a task and refreshes the board.
    ///
    /// # Errors
    ///
    /// See [`begin_create`](Self::begin_create) and
    /// [`finish_create`](Self::finish_create).
    pub async fn create_task(&mut self, title: &str, description: &str) -> Result<Task, BoardError> {
        let outcome = self.begin_create(title, description)?.await;
        self.finish_create(outcome)
    }
}

/// Looks up the owner of `project_id`.
///
/// # Errors
///
/// Returns the backend error if the project can't be fetched.
pub async fn project_owner<B: Backend>(backend: &B, project_id: &str) -> Result<String, ApiError> {
    let project = backend.fetch_project(project_id).await?;
    Ok(project.owner_id)
}
