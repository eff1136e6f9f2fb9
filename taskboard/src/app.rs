//! Terminal view state and input handling.
//!
//! `App` never touches the board directly. Key and mouse events are
//! turned into [`UiAction`]s which the main loop forwards to the board
//! runtime, so the same drag semantics apply to mouse drags and to
//! keyboard "carry" moves.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use taskboard_proto::task::{TaskId, TaskStatus};

use crate::board::drag::Point;
use crate::board::{Columns, DropTarget, resolve_drop};
use crate::ui::BoardLayout;

/// Something the main loop must do on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// A card was picked up.
    DragStart(TaskId),
    /// The carried card was released.
    DragEnd(Option<DropTarget>),
    /// Submit the add-task form.
    CreateTask {
        /// Task title as typed.
        title: String,
        /// Task description as typed.
        description: String,
    },
    /// Re-fetch the board.
    Refresh,
    /// Leave the application.
    Quit,
}

/// Field focused in the add-task form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    /// Title input.
    #[default]
    Title,
    /// Description input.
    Description,
}

/// Add-task form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    /// Title input.
    pub title: String,
    /// Description input.
    pub description: String,
    /// Focused field.
    pub field: FormField,
}

impl TaskForm {
    const fn focused_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }
}

/// What the keyboard currently drives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Board navigation.
    #[default]
    Board,
    /// The add-task form is open.
    AddTask(TaskForm),
}

/// A card picked up with the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carry {
    /// The carried task.
    pub task_id: TaskId,
    /// Column the card would land in.
    pub hover: TaskStatus,
}

/// A card dragged with the mouse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseDrag {
    /// The dragged task.
    pub task_id: TaskId,
    /// Column under the pointer, if any.
    pub hover: Option<TaskStatus>,
}

/// Main application state.
#[derive(Debug, Default)]
pub struct App {
    /// Keyboard mode.
    pub mode: Mode,
    /// Focused column.
    pub selected_column: TaskStatus,
    /// Focused card within the column.
    pub selected_row: usize,
    /// Keyboard drag in progress.
    pub carry: Option<Carry>,
    /// Mouse drag in progress.
    pub mouse_drag: Option<MouseDrag>,
    /// Geometry of the last drawn frame, for hit-testing.
    pub layout: BoardLayout,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the initial view state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.carry.is_some() || self.mouse_drag.is_some()
    }

    /// Task being dragged, by either input.
    #[must_use]
    pub fn dragged_task(&self) -> Option<&TaskId> {
        self.carry
            .as_ref()
            .map(|c| &c.task_id)
            .or_else(|| self.mouse_drag.as_ref().map(|d| &d.task_id))
    }

    /// Column highlighted as the drop target.
    #[must_use]
    pub fn hover_column(&self) -> Option<TaskStatus> {
        match (&self.carry, &self.mouse_drag) {
            (Some(carry), _) => Some(carry.hover),
            (None, Some(drag)) => drag.hover,
            (None, None) => None,
        }
    }

    /// Stores the geometry of the frame just drawn.
    pub fn set_layout(&mut self, layout: BoardLayout) {
        self.layout = layout;
    }

    /// Keeps the selected row inside the focused column.
    pub fn clamp_selection(&mut self, columns: &Columns) {
        let len = columns.get(self.selected_column).len();
        self.selected_row = self.selected_row.min(len.saturating_sub(1));
    }

    /// Opens the add-task form.
    pub fn open_form(&mut self) {
        self.mode = Mode::AddTask(TaskForm::default());
    }

    /// Closes the add-task form.
    pub fn close_form(&mut self) {
        self.mode = Mode::Board;
    }

    // --- keyboard ---

    /// Handles a key press.
    pub fn handle_key_event(&mut self, key: KeyEvent, columns: &Columns) -> Option<UiAction> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Some(UiAction::Quit);
        }
        match self.mode {
            Mode::AddTask(_) => self.handle_form_key(key),
            Mode::Board if self.carry.is_some() => self.handle_carry_key(key),
            Mode::Board => self.handle_board_key(key, columns),
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent, columns: &Columns) -> Option<UiAction> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Some(UiAction::Quit)
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column = step_column(self.selected_column, -1);
                self.clamp_selection(columns);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected_column = step_column(self.selected_column, 1);
                self.clamp_selection(columns);
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_row = self.selected_row.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected_row = self.selected_row.saturating_add(1);
                self.clamp_selection(columns);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let task = columns.get(self.selected_column).get(self.selected_row)?;
                self.carry = Some(Carry {
                    task_id: task.id.clone(),
                    hover: task.status,
                });
                Some(UiAction::DragStart(task.id.clone()))
            }
            KeyCode::Char('n') => {
                self.open_form();
                None
            }
            KeyCode::Char('r') => Some(UiAction::Refresh),
            _ => None,
        }
    }

    fn handle_carry_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        let carry = self.carry.as_mut()?;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                carry.hover = step_column(carry.hover, -1);
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                carry.hover = step_column(carry.hover, 1);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let hover = carry.hover;
                self.carry = None;
                self.selected_column = hover;
                Some(UiAction::DragEnd(Some(DropTarget::Column(hover))))
            }
            KeyCode::Esc => {
                self.carry = None;
                Some(UiAction::DragEnd(None))
            }
            _ => None,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        let Mode::AddTask(form) = &mut self.mode else {
            return None;
        };
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Board;
                None
            }
            KeyCode::Tab | KeyCode::BackTab => {
                form.field = match form.field {
                    FormField::Title => FormField::Description,
                    FormField::Description => FormField::Title,
                };
                None
            }
            KeyCode::Enter => {
                let action = UiAction::CreateTask {
                    title: form.title.clone(),
                    description: form.description.clone(),
                };
                Some(action)
            }
            KeyCode::Backspace => {
                form.focused_mut().pop();
                None
            }
            KeyCode::Char(c) => {
                form.focused_mut().push(c);
                None
            }
            _ => None,
        }
    }

    // --- mouse ---

    /// Handles a mouse event against the last drawn layout.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Option<UiAction> {
        if !matches!(self.mode, Mode::Board) || self.carry.is_some() {
            return None;
        }
        let point = Point {
            x: mouse.column,
            y: mouse.row,
        };
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let slot = self.layout.card_at(point)?;
                let task_id = slot.task_id.clone();
                self.selected_column = slot.status;
                self.selected_row = slot.row;
                self.mouse_drag = Some(MouseDrag {
                    task_id: task_id.clone(),
                    hover: Some(slot.status),
                });
                Some(UiAction::DragStart(task_id))
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let hover = resolve_drop(point, &self.layout.zones);
                if let Some(drag) = self.mouse_drag.as_mut() {
                    drag.hover = hover;
                }
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.mouse_drag.take()?;
                Some(UiAction::DragEnd(self.drop_target_at(point)))
            }
            _ => None,
        }
    }

    /// Drop target under `point`: a card wins over its column.
    fn drop_target_at(&self, point: Point) -> Option<DropTarget> {
        if let Some(slot) = self.layout.card_at(point) {
            return Some(DropTarget::Card(slot.task_id.clone()));
        }
        resolve_drop(point, &self.layout.zones).map(DropTarget::Column)
    }
}

/// Moves one column left (`-1`) or right (`1`), stopping at the edges.
fn step_column(status: TaskStatus, delta: isize) -> TaskStatus {
    let index = status.column_index().saturating_add_signed(delta);
    TaskStatus::ALL[index.min(TaskStatus::ALL.len() - 1)]
}
