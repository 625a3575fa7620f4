use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::AppState;
use crate::token::TOKEN_ENV_VAR;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = vec![Line::from("")];

    if state.show_save_prompt {
        lines.push(Line::from(Span::styled(
            "  ✓ Token validated",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Save token for future sessions?",
            Style::default().fg(Color::White),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    lines.push(Line::from(Span::styled(
        "  Enter your GitHub Personal Access Token",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        "  Required scopes: read:packages, delete:packages",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        format!("  Tip: set {TOKEN_ENV_VAR} to skip this step"),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));

    if state.loading {
        lines.push(Line::from(Span::styled(
            format!("  {}", state.loading_message),
            Style::default().fg(Color::Yellow),
        )));
    } else {
        // Token is masked; only its length shows.
        let masked = "•".repeat(state.token_input.chars().count());
        lines.push(Line::from(vec![
            Span::raw("  > "),
            Span::styled(masked, Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::Cyan)),
        ]));
    }

    f.render_widget(Paragraph::new(lines), area);
}
