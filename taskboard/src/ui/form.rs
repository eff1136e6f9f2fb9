//! Add-task form rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::theme;
use crate::app::{FormField, TaskForm};

/// Render the add-task form as a popup centred in `area`.
pub fn render(frame: &mut Frame, area: Rect, form: &TaskForm, can_create: bool) {
    let popup = centered(area, 60, 9);
    frame.render_widget(Clear, popup);

    let field_line = |label: &str, value: &str, field: FormField| {
        let focused = form.field == field;
        let label_style = if focused {
            theme::highlighted()
        } else {
            theme::dimmed()
        };
        let cursor = if focused { "_" } else { "" };
        Line::from(vec![
            Span::styled(format!("{label:<12}"), label_style),
            Span::styled(format!("{value}{cursor}"), theme::normal()),
        ])
    };

    let mut lines = vec![
        field_line("Title", &form.title, FormField::Title),
        Line::raw(""),
        field_line("Description", &form.description, FormField::Description),
        Line::raw(""),
    ];
    if !can_create {
        lines.push(Line::from(Span::styled(
            "Only the project owner can create tasks",
            theme::normal().fg(theme::ERROR),
        )));
    }

    let block = Block::default()
        .title(" New task ")
        .borders(Borders::ALL)
        .border_style(theme::highlighted());
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
