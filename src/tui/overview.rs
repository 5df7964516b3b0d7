//! Landing page: one card per listing page plus a run status breakdown.

use crate::app::{AppState, Page};
use crate::tui::theme::{status_color, status_icon, Theme};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const CARD_PAGES: [Page; 4] = [Page::Chatbots, Page::Agents, Page::Tasks, Page::Connectors];

pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let [cards_area, status_area, source_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let card_areas = Layout::horizontal([Constraint::Fill(1); CARD_PAGES.len()]).split(cards_area);
    for (page, card_area) in CARD_PAGES.iter().zip(card_areas.iter()) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(
                state.item_count(*page).to_string(),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("press {}", page.index() + 1),
                Style::default().fg(theme.muted),
            )),
        ])
        .block(
            Block::default()
                .title(format!(" {} ", page.title()))
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.muted)),
        );
        f.render_widget(card, *card_area);
    }

    let counts = state.status_counts();
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    let mut lines: Vec<Line> = counts
        .iter()
        .filter(|(_, n)| *n > 0)
        .map(|&(status, n)| {
            Line::from(vec![
                Span::styled(
                    format!(" {} ", status_icon(status)),
                    Style::default().fg(status_color(status)),
                ),
                Span::raw(format!("{:<10}", status.as_str())),
                Span::styled(format!("{n:>5}"), Style::default().add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();
    if total == 0 {
        lines.push(Line::from(Span::styled(
            " No runs loaded",
            Style::default().fg(theme.muted),
        )));
    }
    let status = Paragraph::new(lines).block(
        Block::default()
            .title(format!(" Runs by status ({total}) "))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.muted)),
    );
    f.render_widget(status, status_area);

    let loaded = if state.last_loaded.is_some() {
        ""
    } else {
        " (not loaded yet)"
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" Source: {}{loaded}", state.config.source_label),
            Style::default().fg(theme.muted),
        ))),
        source_area,
    );
}
