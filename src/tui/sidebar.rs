//! Navigation sidebar: primary pages, secondary pages, settings pinned to the bottom.

use crate::app::{AppState, NavSection, Page};
use crate::tui::theme::Theme;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub const SIDEBAR_WIDTH: u16 = 22;

pub fn render(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(theme.muted));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [nav_area, footer_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

    let mut lines = Vec::new();
    for (section, heading) in [
        (NavSection::Primary, "Dashboard"),
        (NavSection::Secondary, "Integrations"),
    ] {
        if !lines.is_empty() {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(
            format!(" {heading}"),
            Style::default().fg(theme.muted).add_modifier(Modifier::BOLD),
        )));
        for page in Page::ALL.iter().filter(|p| p.section() == section) {
            lines.push(nav_line(*page, state, theme, inner.width));
        }
    }
    f.render_widget(Paragraph::new(lines), nav_area);

    let footer: Vec<Line> = Page::ALL
        .iter()
        .filter(|p| p.section() == NavSection::Footer)
        .map(|&page| nav_line(page, state, theme, inner.width))
        .collect();
    f.render_widget(Paragraph::new(footer), footer_area);
}

fn nav_line<'a>(page: Page, state: &AppState, theme: &Theme, width: u16) -> Line<'a> {
    let label = format!(" {} {}", page.index() + 1, page.title());
    let count = if page.is_listing() {
        state.item_count(page).to_string()
    } else {
        String::new()
    };
    let pad = (width as usize).saturating_sub(label.chars().count() + count.len() + 1);
    let text = format!("{label}{}{count} ", " ".repeat(pad));

    let style = if page == state.page {
        Style::default()
            .fg(ratatui::style::Color::Black)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(Span::styled(text, style))
}
