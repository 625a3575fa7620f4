use chrono::{Duration, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, VISIBLE_VERSION_ROWS};
use crate::reltime;
use crate::tui::truncate;

const NAME_WIDTH: usize = 12;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = vec![Line::from("")];

    if state.loading {
        lines.push(Line::from(Span::styled(
            format!("  {}", state.loading_message),
            Style::default().fg(Color::Yellow),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    // Filter line: the live edit buffer while entering, otherwise the
    // applied expression.
    if state.filter_entry {
        lines.push(Line::from(vec![
            Span::styled("  filter> ", Style::default().fg(Color::Cyan)),
            Span::styled(state.filter_input.clone(), Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ]));
    } else if state.filter_text.is_empty() {
        lines.push(Line::from(Span::styled(
            "  /: filter (older N, before YYYY-MM-DD)",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("  Filter: ", Style::default().fg(Color::DarkGray)),
            Span::styled(state.filter_text.clone(), Style::default().fg(Color::Cyan)),
        ]));
    }
    lines.push(Line::from(""));

    if state.filtered_versions.is_empty() {
        let msg = if state.filter_text.is_empty() {
            "  No versions found."
        } else {
            "  No versions match the filter."
        };
        lines.push(Line::from(Span::styled(
            msg,
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    // Window of at most VISIBLE_VERSION_ROWS rows centered on the cursor.
    let total = state.filtered_versions.len();
    let (start, end) = if total > VISIBLE_VERSION_ROWS {
        let mut start = state.version_cursor.saturating_sub(VISIBLE_VERSION_ROWS / 2);
        let mut end = start + VISIBLE_VERSION_ROWS;
        if end > total {
            end = total;
            start = end - VISIBLE_VERSION_ROWS;
        }
        (start, end)
    } else {
        (0, total)
    };

    let now = Utc::now();
    for (i, v) in state
        .filtered_versions
        .iter()
        .enumerate()
        .skip(start)
        .take(end - start)
    {
        let cursor = if i == state.version_cursor { "▸ " } else { "  " };
        let checkbox = if state.selected_ids.contains(&v.id) {
            Span::styled("[x]", Style::default().fg(Color::Green))
        } else {
            Span::styled("[ ]", Style::default().fg(Color::DarkGray))
        };

        let age = reltime::humanize(v.created_at, now);
        let age_style = if now.signed_duration_since(v.created_at) > Duration::days(30) {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        lines.push(Line::from(vec![
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
            checkbox,
            Span::styled(
                format!(" {:<width$}", truncate(&v.name, NAME_WIDTH), width = NAME_WIDTH),
                if i == state.version_cursor {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                },
            ),
            Span::styled(
                format!("  {}", v.tags_string()),
                Style::default().fg(Color::Magenta),
            ),
            Span::styled(format!("  {age}"), age_style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  Selected: {} of {}", state.selected_ids.len(), total),
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(Paragraph::new(lines), area);
}
