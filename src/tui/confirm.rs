use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, CONFIRM_LIST_MAX, ERROR_LIST_MAX};

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = vec![Line::from("")];

    lines.push(Line::from(Span::styled(
        "  Confirm deletion",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    if state.deleting {
        lines.push(Line::from(Span::styled(
            format!(
                "  Deleting... ({}/{})",
                (state.delete_index + 1).min(state.delete_total),
                state.delete_total
            ),
            Style::default().fg(Color::Yellow),
        )));
        if !state.delete_errors.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {} errors so far", state.delete_errors.len()),
                Style::default().fg(Color::Red),
            )));
        }
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    let package = state
        .selected_package
        .as_ref()
        .map_or("", |p| p.name.as_str());
    lines.push(Line::from(vec![
        Span::raw("  You are about to delete "),
        Span::styled(
            format!("{} version(s)", state.selected_ids.len()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" from "),
        Span::styled(
            package.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(""));

    // Batch order: selected ids in fetched-list order.
    let mut shown = 0;
    for v in state
        .versions
        .iter()
        .filter(|v| state.selected_ids.contains(&v.id))
    {
        if shown >= CONFIRM_LIST_MAX {
            break;
        }
        lines.push(Line::from(vec![
            Span::raw("    - "),
            Span::styled(
                crate::tui::truncate(&v.name, 20),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!(" {}", v.tags_string()),
                Style::default().fg(Color::Magenta),
            ),
        ]));
        shown += 1;
    }
    if state.selected_ids.len() > CONFIRM_LIST_MAX {
        lines.push(Line::from(Span::styled(
            format!("    ... and {} more", state.selected_ids.len() - CONFIRM_LIST_MAX),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if !state.delete_errors.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} delete(s) failed:", state.delete_errors.len()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        for err in state.delete_errors.iter().take(ERROR_LIST_MAX) {
            lines.push(Line::from(Span::styled(
                format!("    • {err}"),
                Style::default().fg(Color::Red),
            )));
        }
        if state.delete_errors.len() > ERROR_LIST_MAX {
            lines.push(Line::from(Span::styled(
                format!("    +{} more", state.delete_errors.len() - ERROR_LIST_MAX),
                Style::default().fg(Color::Red),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  This action cannot be undone!",
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(vec![
        Span::styled("  Delete these versions? ", Style::default().fg(Color::DarkGray)),
        Span::styled("[y/n]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ]));

    f.render_widget(Paragraph::new(lines), area);
}
