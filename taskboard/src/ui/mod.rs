//! Terminal UI rendering.
//!
//! [`draw`] renders one frame and returns the [`BoardLayout`] it used, so
//! mouse input can be hit-tested against exactly what is on screen.

pub mod column;
pub mod form;
pub mod notifications;
pub mod status_bar;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect},
};

use taskboard_proto::task::{TaskId, TaskStatus};

use crate::app::{App, Mode};
use crate::board::Columns;
use crate::board::drag::{Bounds, DropZones, Point};
use crate::notify::Notification;

/// Rows taken by one card (border, title, assignee, border).
pub const CARD_HEIGHT: u16 = 4;

/// Notification lines shown under the board.
pub const NOTIFICATION_ROWS: u16 = 4;

/// Board data a frame is drawn from.
#[derive(Debug)]
pub struct BoardView<'a> {
    /// Project shown on the board.
    pub project_id: &'a str,
    /// Current columns.
    pub columns: &'a Columns,
    /// Most recent notifications, oldest first.
    pub notifications: &'a [Notification],
    /// Moves still awaiting the server.
    pub in_flight: usize,
    /// Whether the add-task form may be submitted.
    pub can_create: bool,
    /// Running against the demo backend.
    pub offline: bool,
    /// chrono format for notification timestamps.
    pub timestamp_format: &'a str,
}

/// Where a card was drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSlot {
    /// Task on the card.
    pub task_id: TaskId,
    /// Column the card sits in.
    pub status: TaskStatus,
    /// Position within the column.
    pub row: usize,
    /// Screen area of the card.
    pub bounds: Bounds,
}

/// Geometry of a drawn board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    /// Drop regions.
    pub zones: DropZones,
    /// Visible cards.
    pub cards: Vec<CardSlot>,
}

impl BoardLayout {
    /// Card under `point`, if any.
    #[must_use]
    pub fn card_at(&self, point: Point) -> Option<&CardSlot> {
        self.cards.iter().find(|slot| slot.bounds.contains(point))
    }
}

struct Screen {
    board: Rect,
    notifications: Rect,
    status: Rect,
}

fn split_screen(area: Rect) -> Screen {
    let [board, notifications, status] = Layout::vertical([
        Constraint::Min(CARD_HEIGHT + 2),
        Constraint::Length(NOTIFICATION_ROWS + 2),
        Constraint::Length(1),
    ])
    .areas(area);
    Screen {
        board,
        notifications,
        status,
    }
}

fn column_areas(board: Rect) -> [Rect; 3] {
    Layout::horizontal([Constraint::Ratio(1, 3); 3])
        .spacing(1)
        .areas(board)
}

/// Converts a ratatui area into hit-testing bounds.
#[must_use]
pub const fn bounds(rect: Rect) -> Bounds {
    Bounds {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
    }
}

/// Converts hit-testing bounds back into a ratatui area.
#[must_use]
pub const fn rect(bounds: Bounds) -> Rect {
    Rect {
        x: bounds.x,
        y: bounds.y,
        width: bounds.width,
        height: bounds.height,
    }
}

/// Computes drop regions and card positions for a terminal of size `area`.
#[must_use]
pub fn board_layout(area: Rect, columns: &Columns) -> BoardLayout {
    let board = split_screen(area).board;
    let areas = column_areas(board);

    let mut cards = Vec::new();
    for (status, tasks) in columns.iter() {
        let inner = areas[status.column_index()].inner(Margin::new(1, 1));
        for (row, task) in tasks.iter().enumerate() {
            let Ok(offset) = u16::try_from(row) else {
                break;
            };
            let y = inner.y.saturating_add(offset.saturating_mul(CARD_HEIGHT));
            if y.saturating_add(CARD_HEIGHT) > inner.bottom() {
                break;
            }
            cards.push(CardSlot {
                task_id: task.id.clone(),
                status,
                row,
                bounds: Bounds {
                    x: inner.x,
                    y,
                    width: inner.width,
                    height: CARD_HEIGHT,
                },
            });
        }
    }

    BoardLayout {
        zones: DropZones {
            board: bounds(board),
            columns: areas.map(bounds),
        },
        cards,
    }
}

/// Draws one frame and returns its layout.
pub fn draw(frame: &mut Frame, app: &App, view: &BoardView<'_>) -> BoardLayout {
    let screen = split_screen(frame.area());
    let layout = board_layout(frame.area(), view.columns);
    let areas = column_areas(screen.board);

    for (status, tasks) in view.columns.iter() {
        column::render(
            frame,
            areas[status.column_index()],
            status,
            tasks,
            app,
            &layout,
        );
    }
    notifications::render(frame, screen.notifications, view);
    status_bar::render(frame, screen.status, app, view);

    if let Mode::AddTask(form) = &app.mode {
        form::render(frame, frame.area(), form, view.can_create);
    }

    layout
}
