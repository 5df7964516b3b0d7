use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Page};
use crate::tui::theme::Theme;

/// Narrowest footer that fits the full listing hint set.
const FULL_HINTS_MIN_WIDTH: u16 = 110;

pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let narrow = area.width < FULL_HINTS_MIN_WIDTH;

    let hints: &[(&str, &str)] = if state.overlay.is_some() {
        &[("Enter/q/Esc", "close")]
    } else if state.editing_search {
        &[("Enter", "apply"), ("Esc", "cancel"), ("⌫", "delete")]
    } else if state.page == Page::Settings {
        &[
            ("j/k", "select"),
            ("h/l", "change"),
            ("Tab", "view"),
            ("q", "quit"),
        ]
    } else if !state.page.is_listing() {
        &[("Tab/1-6", "view"), ("r", "refresh"), ("q", "quit")]
    } else if narrow {
        &[
            ("j/k", "row"),
            ("h/l", "page"),
            ("/", "search"),
            ("s", "sort"),
            ("q", "quit"),
        ]
    } else {
        &[
            ("↑↓/jk", "row"),
            ("←→/hl", "page"),
            ("g/G", "first/last"),
            ("/", "search"),
            ("x", "clear"),
            ("s/S", "sort"),
            ("Enter", "details"),
            ("Tab", "view"),
            ("r", "refresh"),
            ("q", "quit"),
        ]
    };

    let line = if let Some(notif) = state.notifications.last() {
        Line::from(vec![
            Span::styled("★ ", Style::default().fg(Color::Yellow)),
            Span::styled(&notif.message, Style::default().fg(Color::Yellow)),
        ])
    } else {
        let mut spans: Vec<Span> = Vec::new();
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme.accent)));
            spans.push(Span::styled(
                format!(" {desc}"),
                Style::default().fg(theme.muted),
            ));
        }
        Line::from(spans)
    };

    let footer = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}
