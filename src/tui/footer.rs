use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Screen};

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let hints: &[(&str, &str)] = match state.screen {
        Screen::TokenEntry if state.show_save_prompt => {
            &[("s", "save token"), ("n", "skip"), ("ctrl+c", "quit")]
        }
        Screen::TokenEntry => &[("enter", "submit"), ("ctrl+c", "quit")],
        Screen::PackageList => &[
            ("↑↓/jk", "navigate"),
            ("enter", "select"),
            ("q", "quit"),
        ],
        Screen::VersionList if state.filter_entry => {
            &[("enter", "apply"), ("esc", "cancel")]
        }
        Screen::VersionList => &[
            ("space", "toggle"),
            ("a", "all"),
            ("n", "none"),
            ("/", "filter"),
            ("c", "clear"),
            ("s", "sort"),
            ("d", "delete"),
            ("esc", "back"),
            ("q", "quit"),
        ],
        Screen::DeleteConfirm if state.deleting => &[("q", "quit")],
        Screen::DeleteConfirm => &[("y", "confirm"), ("n/esc", "cancel"), ("q", "quit")],
    };

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {desc}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}
