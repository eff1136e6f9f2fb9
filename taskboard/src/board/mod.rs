//! Kanban board state for one project.
//!
//! The board keeps tasks in a [`TaskStore`], derives the three columns on
//! demand, and moves tasks between columns optimistically: the store
//! changes as soon as a card is dropped, and is either replaced from the
//! server or rolled back once the backend answers.

pub mod columns;
pub mod drag;
pub mod facade;
pub mod optimistic;
pub mod store;

pub use columns::{Columns, partition};
pub use drag::{
    DiscardReason, DragController, DragOutcome, DragState, DropTarget, DropZones, TransitionRequest,
    resolve_drop,
};
pub use facade::{CreateOutcome, FetchOutcome, TaskBoard, project_owner};
pub use optimistic::{
    ConfirmOutcome, Confirmation, OptimisticCoordinator, PendingTransition, Settlement,
};
pub use store::TaskStore;

use thiserror::Error;

use crate::api::ApiError;

/// Errors surfaced by board operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Only the project owner may create tasks.
    #[error("only the project owner can create tasks")]
    NotOwner,
    /// Task title is empty or whitespace.
    #[error("task title cannot be empty")]
    TitleEmpty,
    /// Task title exceeds the configured maximum.
    #[error("task title too long (max {0} characters)")]
    TitleTooLong(usize),
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}
