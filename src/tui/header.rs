use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Screen};
use crate::tui::spinner_frame;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        Span::styled(
            format!(" ghpc v{}+{} ", env!("CARGO_PKG_VERSION"), env!("BUILD_NUMBER")),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
    ];

    match state.screen {
        Screen::TokenEntry => {
            spans.push(Span::styled(
                "GitHub Packages Cleaner",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));
        }
        Screen::PackageList => {
            spans.push(Span::styled(
                "container packages",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));
        }
        Screen::VersionList | Screen::DeleteConfirm => {
            let name = state
                .selected_package
                .as_ref()
                .map_or("", |p| p.name.as_str());
            spans.push(Span::styled(
                name.to_string(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" [{}]", state.sort_order.label()),
                Style::default().fg(Color::Yellow),
            ));
        }
    }

    if state.loading || state.deleting {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{}", spinner_frame(state.spinner_frame)),
            Style::default().fg(Color::Yellow),
        ));
        if !state.loading_message.is_empty() && state.loading {
            spans.push(Span::styled(
                format!(" {}", state.loading_message),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    if state.error.is_some() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            "!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(header, area);
}
