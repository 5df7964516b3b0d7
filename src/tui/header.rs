use crate::app::AppState;
use crate::tui::spinner;
use crate::tui::theme::Theme;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.config.version_string),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(
            state.page.title(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    // Sort and search indicators of the visible list
    if let Some(list) = state.active_list() {
        if let Some(label) = list.sort_label() {
            let arrow = if list.sort_reverse() { "Z→A" } else { "A→Z" };
            spans.push(Span::styled(
                format!(" [{label} {arrow}]"),
                Style::default().fg(Color::Magenta),
            ));
        }
        if !list.search_value().is_empty() {
            spans.push(Span::styled(
                format!(" [/{}]", list.search_value()),
                Style::default().fg(Color::Yellow),
            ));
        }
    }

    if state.is_loading() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{}", spinner::frame(state.spinner_frame)),
            Style::default().fg(Color::Yellow),
        ));
    }

    if state.error_message().is_some() {
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
