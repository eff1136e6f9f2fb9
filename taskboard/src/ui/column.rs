//! Board column rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use taskboard_proto::task::{Task, TaskStatus};

use super::{BoardLayout, rect, theme};
use crate::app::App;

/// Render one column and the cards the layout placed in it.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    status: TaskStatus,
    tasks: &[Task],
    app: &App,
    layout: &BoardLayout,
) {
    let border_style = if app.hover_column() == Some(status) {
        theme::drop_target()
    } else if !app.is_dragging() && app.selected_column == status {
        theme::highlighted()
    } else {
        theme::normal()
    };

    let title = Line::from(vec![
        Span::styled(format!(" {} ", status.label()), theme::column_title(status)),
        Span::styled(format!("({}) ", tasks.len()), theme::dimmed()),
    ]);
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    frame.render_widget(block, area);

    for slot in layout.cards.iter().filter(|s| s.status == status) {
        let Some(task) = tasks.get(slot.row) else {
            continue;
        };
        let selected = app.selected_column == status && app.selected_row == slot.row;
        render_card(frame, rect(slot.bounds), task, app, selected);
    }
}

fn render_card(frame: &mut Frame, area: Rect, task: &Task, app: &App, selected: bool) {
    let dragged = app.dragged_task() == Some(&task.id);
    let (border, text) = if dragged {
        (theme::dragged_card(), theme::dragged_card())
    } else if selected {
        (theme::highlighted(), theme::bold())
    } else {
        (theme::dimmed(), theme::normal())
    };

    let assignee = task.assignee_email.as_deref().unwrap_or("Unassigned");
    let lines = vec![
        Line::from(Span::styled(task.title.clone(), text)),
        Line::from(Span::styled(assignee.to_string(), theme::dimmed())),
    ];

    let card = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(card, area);
}
