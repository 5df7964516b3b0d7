use crate::app::{AppState, SettingsRow};
use crate::tui::theme::Theme;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let label_width = SettingsRow::ALL
        .iter()
        .map(|row| row.label().len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![Line::raw("")];
    for (i, row) in SettingsRow::ALL.iter().enumerate() {
        let selected = i == state.settings_cursor;
        let marker = if selected { "▸" } else { " " };
        let value_style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.accent)
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), Style::default().fg(theme.accent)),
            Span::raw(format!("{:<label_width$}  ", row.label())),
            Span::styled("‹ ", Style::default().fg(theme.muted)),
            Span::styled(format!(" {} ", state.settings.value_label(*row)), value_style),
            Span::styled(" ›", Style::default().fg(theme.muted)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        " Settings last until the dashboard exits.",
        Style::default().fg(theme.muted),
    )));

    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.muted));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
