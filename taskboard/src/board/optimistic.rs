//! Optimistic status changes with server confirmation and rollback.
//!
//! A transition is applied to the store before the backend has seen it
//! ([`OptimisticCoordinator::begin`]), confirmed off the owner's hands
//! ([`confirm`]), and then settled back on the owner
//! ([`OptimisticCoordinator::settle`]): a confirmed change is replaced by
//! the server's re-fetched list, a rejected one is reverted.
//!
//! Each transition carries a version from a monotonically increasing
//! counter. Only the latest in-flight transition of a task may roll it
//! back, so a slow failure can't clobber a newer drag of the same task.
//! A rollback restores the task's last server-confirmed status, which is
//! carried across every move chained onto an unconfirmed one.

use std::collections::HashMap;
use std::sync::Arc;

use taskboard_proto::task::{Task, TaskId, TaskStatus};

use super::drag::TransitionRequest;
use super::store::TaskStore;
use crate::api::{ApiError, Backend};
use crate::notify::{Notifier, notify_api_error};

/// Notification shown when the backend accepts a status change.
pub const STATUS_UPDATED_MESSAGE: &str = "Task status updated";

/// A transition that has been applied locally and awaits confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    /// The requested change.
    pub request: TransitionRequest,
    /// Version tag assigned when the change was applied.
    pub version: u64,
}

/// What the backend said about a pending transition.
#[derive(Debug, Clone)]
pub enum ConfirmOutcome {
    /// Accepted; carries the authoritative task list.
    Committed(Vec<Task>),
    /// Accepted, but the follow-up re-fetch failed.
    Unrefreshed,
    /// Rejected or unreachable.
    Rejected(ApiError),
}

/// A finished confirmation, ready to be settled on the store.
#[derive(Debug, Clone)]
pub struct Confirmation {
    /// The transition that was confirmed.
    pub pending: PendingTransition,
    /// Backend result.
    pub outcome: ConfirmOutcome,
}

/// How a confirmation was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Store replaced from the server.
    Committed,
    /// Accepted; optimistic value kept because the re-fetch failed.
    Unrefreshed,
    /// Status reverted to its pre-drag value.
    RolledBack,
    /// Rejection ignored because a newer transition owns the task.
    StaleRollbackDiscarded,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    version: u64,
    to: TaskStatus,
    /// Last status the server is known to hold; rollbacks restore this.
    base: TaskStatus,
}

/// Tracks in-flight optimistic transitions.
#[derive(Debug, Default)]
pub struct OptimisticCoordinator {
    next_version: u64,
    in_flight: HashMap<TaskId, InFlight>,
}

impl OptimisticCoordinator {
    /// Creates a coordinator with nothing in flight.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `request` to the store and tags it with a fresh version.
    pub fn begin(&mut self, store: &mut TaskStore, request: TransitionRequest) -> PendingTransition {
        self.next_version += 1;
        let version = self.next_version;

        store.patch_status(&request.task_id, request.to);
        let base = match self.in_flight.get(&request.task_id) {
            Some(previous) => {
                tracing::warn!(
                    task_id = %request.task_id,
                    superseded = previous.version,
                    version,
                    "task moved again before its previous move was confirmed"
                );
                previous.base
            }
            None => request.from,
        };
        self.in_flight.insert(
            request.task_id.clone(),
            InFlight {
                version,
                to: request.to,
                base,
            },
        );
        tracing::info!(
            task_id = %request.task_id,
            from = %request.from,
            to = %request.to,
            version,
            "optimistic status change applied"
        );

        PendingTransition { request, version }
    }

    /// Applies a confirmation result to the store.
    pub fn settle(&mut self, store: &mut TaskStore, confirmation: Confirmation) -> Settlement {
        let Confirmation { pending, outcome } = confirmation;
        let task_id = &pending.request.task_id;
        let current = self.is_current(&pending);

        match outcome {
            ConfirmOutcome::Committed(tasks) => {
                if current {
                    self.in_flight.remove(task_id);
                }
                self.install(store, tasks);
                tracing::info!(task_id = %task_id, version = pending.version, "status change committed");
                Settlement::Committed
            }
            ConfirmOutcome::Unrefreshed => {
                if current {
                    self.in_flight.remove(task_id);
                } else if let Some(flight) = self.in_flight.get_mut(task_id) {
                    // The server now holds this move's status.
                    flight.base = pending.request.to;
                }
                Settlement::Unrefreshed
            }
            ConfirmOutcome::Rejected(err) => {
                if !current {
                    tracing::debug!(
                        task_id = %task_id,
                        version = pending.version,
                        error = %err,
                        "stale rollback discarded"
                    );
                    return Settlement::StaleRollbackDiscarded;
                }
                let restored = self
                    .in_flight
                    .remove(task_id)
                    .map_or(pending.request.from, |flight| flight.base);
                store.patch_status(task_id, restored);
                tracing::info!(
                    task_id = %task_id,
                    restored = %restored,
                    error = %err,
                    "status change rolled back"
                );
                Settlement::RolledBack
            }
        }
    }

    /// Replaces the store with a server list, keeping unconfirmed moves
    /// visible on top of it.
    ///
    /// The server's status of each in-flight task becomes that task's
    /// rollback target.
    pub fn install(&mut self, store: &mut TaskStore, tasks: Vec<Task>) {
        store.replace_all(tasks);
        for (id, flight) in &mut self.in_flight {
            if let Some(task) = store.get(id) {
                flight.base = task.status;
            }
            store.patch_status(id, flight.to);
        }
    }

    /// Whether `pending` is still the latest transition of its task.
    #[must_use]
    pub fn is_current(&self, pending: &PendingTransition) -> bool {
        self.in_flight
            .get(&pending.request.task_id)
            .is_some_and(|f| f.version == pending.version)
    }

    /// Number of tasks with an unconfirmed transition.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

/// Confirms a pending transition with the backend.
///
/// On success notifies and re-fetches the project's tasks. On failure
/// notifies with the error body's messages and hands the error back in
/// [`ConfirmOutcome::Rejected`] so the owner can roll back. Never retries.
pub async fn confirm<B: Backend, N: Notifier>(
    backend: Arc<B>,
    notifier: Arc<N>,
    project_id: String,
    pending: PendingTransition,
) -> Confirmation {
    let outcome = match backend
        .update_status(&pending.request.task_id, pending.request.to)
        .await
    {
        Ok(()) => {
            notifier.success(STATUS_UPDATED_MESSAGE);
            match backend.fetch_tasks(&project_id).await {
                Ok(tasks) => ConfirmOutcome::Committed(tasks),
                Err(err) => {
                    tracing::warn!(project_id = %project_id, error = %err, "re-fetch after status change failed");
                    notify_api_error(notifier.as_ref(), &err);
                    ConfirmOutcome::Unrefreshed
                }
            }
        }
        Err(err) => {
            tracing::warn!(
                task_id = %pending.request.task_id,
                error = %err,
                "status change rejected"
            );
            notify_api_error(notifier.as_ref(), &err);
            ConfirmOutcome::Rejected(err)
        }
    };
    Confirmation { pending, outcome }
}
