//! Notification panel rendering.

use std::fmt::Write;

use chrono::{DateTime, Local};
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::{BoardView, theme};
use crate::notify::NotificationLevel;

/// Render the most recent notifications, newest last.
pub fn render(frame: &mut Frame, area: Rect, view: &BoardView<'_>) {
    let lines: Vec<Line> = view
        .notifications
        .iter()
        .map(|n| {
            let (symbol, color) = match n.level {
                NotificationLevel::Success => ("\u{2713}", theme::SUCCESS),
                NotificationLevel::Error => ("\u{2717}", theme::ERROR),
            };
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", stamp(&n.at, view.timestamp_format)),
                    theme::timestamp(),
                ),
                Span::styled(symbol, theme::normal().fg(color)),
                Span::raw(" "),
                Span::styled(n.message.clone(), theme::normal()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Notifications ")
        .borders(Borders::ALL)
        .border_style(theme::dimmed());
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Formats `at`, falling back to `HH:MM:SS` when `format` is invalid.
fn stamp(at: &DateTime<Local>, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", at.format(format)).is_err() {
        return at.format("%H:%M:%S").to_string();
    }
    out
}
