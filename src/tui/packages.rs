use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;

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

    if state.packages.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No container packages found.",
            Style::default().fg(Color::DarkGray),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    for (i, pkg) in state.packages.iter().enumerate() {
        let selected = i == state.package_cursor;
        let cursor = if selected { "▸ " } else { "  " };
        let name_style = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
            Span::styled(pkg.name.clone(), name_style),
            Span::styled(
                format!(" ({} versions)", pkg.version_count),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!(" {}", pkg.visibility),
                Style::default().fg(Color::Magenta),
            ),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
