//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{BoardView, theme};
use crate::app::{App, Mode};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App, view: &BoardView<'_>) {
    let help_text = match app.mode {
        Mode::AddTask(_) => "Tab: switch field | Enter: create | Esc: cancel",
        Mode::Board if app.carry.is_some() => "←→/hl: choose column | Enter: drop | Esc: cancel",
        Mode::Board => {
            "←→↑↓: select | Enter: pick up | mouse: drag | n: new task | r: refresh | q: quit"
        }
    };

    let (dot_color, sync_text) = if view.in_flight == 0 {
        (theme::SUCCESS, "synced".to_string())
    } else {
        (theme::WARNING, format!("{} pending", view.in_flight))
    };
    let source = if view.offline { " (offline demo)" } else { "" };

    let status_line = Line::from(vec![
        Span::styled("Taskboard", theme::bold()),
        Span::raw(format!(" | {}{source} | ", view.project_id)),
        Span::styled("●", theme::normal().fg(dot_color)),
        Span::raw(format!(" {sync_text} | ")),
        Span::styled(help_text, theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
