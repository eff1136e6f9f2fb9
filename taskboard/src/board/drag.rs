//! Drag-and-drop session state machine and drop-target resolution.
//!
//! A session starts when a card is picked up and always ends (back to
//! [`DragState::Idle`]) when it is released, whatever the outcome. The
//! controller only remembers the dragged task's ID; the task itself is
//! looked up in the store at drop time.

use taskboard_proto::task::{TaskId, TaskStatus};

use super::store::TaskStore;

/// Drag session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A card is being dragged.
    Active {
        /// The dragged task.
        task_id: TaskId,
    },
}

/// What a card was released over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A column region.
    Column(TaskStatus),
    /// Another card; resolves to that card's column.
    Card(TaskId),
}

/// Intent to move one task between columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    /// Task being moved.
    pub task_id: TaskId,
    /// Status before the drop (the rollback value).
    pub from: TaskStatus,
    /// Status requested by the drop.
    pub to: TaskStatus,
}

/// Why a drag ended without a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    /// Drag end arrived with no session.
    NotDragging,
    /// Released outside every column.
    NoDropTarget,
    /// The dragged task is gone from the store.
    UnknownTask,
    /// Released over the column the task is already in.
    SameColumn,
}

/// Result of ending a drag session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The drop asks for a status change.
    Transition(TransitionRequest),
    /// Nothing to do.
    Discarded(DiscardReason),
}

/// Owns the drag session.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    /// ID of the task being dragged, if any.
    #[must_use]
    pub const fn dragged(&self) -> Option<&TaskId> {
        match &self.state {
            DragState::Idle => None,
            DragState::Active { task_id } => Some(task_id),
        }
    }

    /// Starts a session for `task_id`.
    ///
    /// A start while a session is already active is ignored and the
    /// original task ID is kept. Returns whether a session was started.
    pub fn on_drag_start(&mut self, task_id: TaskId) -> bool {
        if let DragState::Active { task_id: current } = &self.state {
            tracing::warn!(
                active = %current,
                ignored = %task_id,
                "drag start while a drag is active, ignoring"
            );
            return false;
        }
        tracing::debug!(task_id = %task_id, "drag started");
        self.state = DragState::Active { task_id };
        true
    }

    /// Ends the session and decides whether the drop is a transition.
    ///
    /// The controller is [`DragState::Idle`] afterwards in every case.
    pub fn on_drag_end(&mut self, target: Option<DropTarget>, store: &TaskStore) -> DragOutcome {
        let DragState::Active { task_id } = std::mem::take(&mut self.state) else {
            return DragOutcome::Discarded(DiscardReason::NotDragging);
        };

        let Some(to) = target.and_then(|t| resolve_target(&t, store)) else {
            tracing::debug!(task_id = %task_id, "drag released outside any column");
            return DragOutcome::Discarded(DiscardReason::NoDropTarget);
        };

        let Some(task) = store.get(&task_id) else {
            return DragOutcome::Discarded(DiscardReason::UnknownTask);
        };

        if task.status == to {
            return DragOutcome::Discarded(DiscardReason::SameColumn);
        }

        DragOutcome::Transition(TransitionRequest {
            task_id,
            from: task.status,
            to,
        })
    }
}

/// Maps a drop target to a column. Unknown cards resolve to nothing.
fn resolve_target(target: &DropTarget, store: &TaskStore) -> Option<TaskStatus> {
    match target {
        DropTarget::Column(status) => Some(*status),
        DropTarget::Card(card) => store.get(card).map(|t| t.status),
    }
}

// ---------------------------------------------------------------------------
// Collision resolution
// ---------------------------------------------------------------------------

/// A pointer position in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Column (x) coordinate.
    pub x: u16,
    /// Row (y) coordinate.
    pub y: u16,
}

/// An axis-aligned rectangle in cell coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    /// Left edge.
    pub x: u16,
    /// Top edge.
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Bounds {
    /// Whether `point` lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x.saturating_add(self.width)
            && point.y >= self.y
            && point.y < self.y.saturating_add(self.height)
    }

    /// Horizontal gap between `x` and the rectangle's span, 0 inside it.
    #[must_use]
    pub const fn horizontal_distance(&self, x: u16) -> u16 {
        let right = self.x.saturating_add(self.width);
        if x < self.x {
            self.x - x
        } else if x >= right {
            x - right + 1
        } else {
            0
        }
    }
}

/// Screen regions that accept drops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropZones {
    /// The whole board; releases outside it have no target.
    pub board: Bounds,
    /// Column regions indexed by [`TaskStatus::column_index`].
    pub columns: [Bounds; 3],
}

/// Resolves a release point to exactly one column, or none.
///
/// A point inside a column picks it. A point in the board but between
/// columns picks the column with the nearest horizontal span; ties go to
/// the leftmost column. Points outside the board resolve to `None`.
#[must_use]
pub fn resolve_drop(point: Point, zones: &DropZones) -> Option<TaskStatus> {
    if !zones.board.contains(point) {
        return None;
    }
    if let Some(status) = TaskStatus::ALL
        .into_iter()
        .find(|s| zones.columns[s.column_index()].contains(point))
    {
        return Some(status);
    }

    let mut best: Option<(TaskStatus, u16)> = None;
    for status in TaskStatus::ALL {
        let distance = zones.columns[status.column_index()].horizontal_distance(point.x);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((status, distance));
        }
    }
    best.map(|(status, _)| status)
}
