//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};

use taskboard_proto::task::TaskStatus;

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Drop target color while dragging.
pub const DROP_TARGET: Color = Color::LightMagenta;

/// Success notification color.
pub const SUCCESS: Color = Color::Green;

/// Pending / warning color.
pub const WARNING: Color = Color::Yellow;

/// Error notification color.
pub const ERROR: Color = Color::Red;

/// Title color of each column, in board order.
pub const COLUMN_TITLES: [Color; 3] = [Color::Blue, Color::Yellow, Color::Green];

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (metadata, help).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted style (focused borders).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Border style of the column a card would be dropped into.
#[must_use]
pub fn drop_target() -> Style {
    Style::default()
        .fg(DROP_TARGET)
        .add_modifier(Modifier::BOLD)
}

/// Style of the card being dragged.
#[must_use]
pub fn dragged_card() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

/// Column title style.
#[must_use]
pub fn column_title(status: TaskStatus) -> Style {
    Style::default()
        .fg(COLUMN_TITLES[status.column_index()])
        .add_modifier(Modifier::BOLD)
}

/// Style for timestamps (dark gray).
#[must_use]
pub fn timestamp() -> Style {
    Style::default().fg(Color::Rgb(120, 120, 120))
}

/// Style for the status bar background.
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}
