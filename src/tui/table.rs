//! Generic paginated table for any [`Listable`] list view.
//!
//! Layout inside the bordered block: one toolbar line (sort direction, sort key,
//! search box), the rows of the current page, and the pagination line.

use crate::app::truncate;
use crate::entities::{Field, Listable};
use crate::list_view::ListViewState;
use crate::tui::theme::Theme;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

/// Per-frame UI state the table needs besides the list itself.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    pub title: &'a str,
    pub cursor: usize,
    pub editing_search: bool,
}

pub fn render<T: Listable>(
    f: &mut Frame,
    area: Rect,
    list: &ListViewState<T>,
    view: &TableView,
    theme: &Theme,
    cell_color: impl Fn(&T, T::Field) -> Option<Color>,
) {
    let block = Block::default()
        .title(format!(" {} ", view.title))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.muted));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [toolbar_area, rows_area, pager_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(toolbar_line(list, view, theme)), toolbar_area);

    let page = list.current_page();
    if page.is_empty() {
        let message = empty_message(list, view.title);
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(rows_area);
        f.render_widget(
            Paragraph::new(message)
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.muted)),
            middle,
        );
    } else {
        let fields = <T::Field as Field>::ALL;
        let header = Row::new(fields.iter().map(|field| {
            Cell::from(field.label()).style(
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
        }));

        let column_width = (rows_area.width as usize / fields.len().max(1)).saturating_sub(1);
        let rows: Vec<Row> = page
            .iter()
            .enumerate()
            .map(|(i, &item)| {
                let cells = fields.iter().map(|&field| {
                    let text = truncate(&item.field_text(field), column_width);
                    match cell_color(item, field) {
                        Some(color) if i != view.cursor => {
                            Cell::from(text).style(Style::default().fg(color))
                        }
                        _ => Cell::from(text),
                    }
                });
                let style = if i == view.cursor {
                    Style::default()
                        .fg(Color::Black)
                        .bg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else if i % 2 == 1 {
                    Style::default().bg(theme.stripe)
                } else {
                    Style::default()
                };
                Row::new(cells).style(style).height(theme.row_height)
            })
            .collect();

        let widths = vec![Constraint::Fill(1); fields.len()];
        let table = Table::new(rows, widths)
            .header(header)
            .column_spacing(theme.column_spacing);
        // Scrolls the rows so the cursor row stays visible on short terminals
        let mut table_state = TableState::default().with_selected(Some(view.cursor));
        f.render_stateful_widget(table, rows_area, &mut table_state);
    }

    f.render_widget(
        Paragraph::new(pager_line(list, theme)).alignment(Alignment::Center),
        pager_area,
    );
}

fn toolbar_line<'a, T: Listable>(
    list: &ListViewState<T>,
    view: &TableView,
    theme: &Theme,
) -> Line<'a> {
    let arrow = if list.sort_reverse() { "Z→A" } else { "A→Z" };
    let sort_label = list.sort_key().map_or("none", Field::label);

    let mut spans = vec![
        Span::styled(" Sort ", Style::default().fg(theme.muted)),
        Span::styled(
            arrow,
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {sort_label}")),
        Span::styled("  │  ", Style::default().fg(theme.muted)),
    ];

    let search = list.search_value();
    if view.editing_search {
        spans.push(Span::styled("Search: ", Style::default().fg(theme.accent)));
        spans.push(Span::raw(search.to_string()));
        spans.push(Span::styled("▏", Style::default().fg(theme.accent)));
    } else if search.is_empty() {
        spans.push(Span::styled("/ to search", Style::default().fg(theme.muted)));
    } else {
        spans.push(Span::styled("Search: ", Style::default().fg(theme.muted)));
        spans.push(Span::styled(
            search.to_string(),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::styled(
            format!("  ({} of {})", list.filtered_len(), list.items().len()),
            Style::default().fg(theme.muted),
        ));
    }
    Line::from(spans)
}

/// Why the visible page has no rows.
pub fn empty_message<T: Listable>(list: &ListViewState<T>, title: &str) -> String {
    if list.items().is_empty() {
        format!("No {} yet", title.to_lowercase())
    } else if !list.search_value().is_empty() && list.filtered_len() == 0 {
        format!("No results for \"{}\"", list.search_value())
    } else {
        "Nothing on this page, press g for the first page".to_string()
    }
}

fn pager_line<'a, T: Listable>(list: &ListViewState<T>, theme: &Theme) -> Line<'a> {
    let active = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
    let dimmed = Style::default().fg(Color::DarkGray);
    let back = if list.is_first_page() { dimmed } else { active };
    let forward = if list.is_last_page() { dimmed } else { active };

    Line::from(vec![
        Span::styled("«", back),
        Span::raw(" "),
        Span::styled("‹", back),
        Span::raw(format!(
            "  Page {} of {}  ",
            list.page_number(),
            list.total_pages().max(1)
        )),
        Span::styled("›", forward),
        Span::raw(" "),
        Span::styled("»", forward),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Connector, PipelineRun};
    use crate::source::sample_dataset;

    fn connectors() -> ListViewState<Connector> {
        let mut list = ListViewState::default();
        list.load_items(sample_dataset().connectors);
        list
    }

    #[test]
    fn empty_list_message() {
        let list: ListViewState<PipelineRun> = ListViewState::default();
        assert_eq!(empty_message(&list, "Tasks"), "No tasks yet");
    }

    #[test]
    fn no_results_message() {
        let mut list = connectors();
        list.set_search_value("zzz");
        assert_eq!(empty_message(&list, "Connectors"), "No results for \"zzz\"");
    }

    #[test]
    fn pager_dims_at_bounds() {
        let theme = Theme::from_settings(&crate::app::ThemeSettings::default());
        let list = connectors();
        let line = pager_line(&list, &theme);
        // Single page: every button dimmed
        for i in [0, 2, 4, 6] {
            assert_eq!(line.spans[i].style.fg, Some(Color::DarkGray));
        }
        assert_eq!(line.spans[3].content, "  Page 1 of 1  ");
    }

    #[test]
    fn pager_enables_forward_on_first_page() {
        let theme = Theme::from_settings(&crate::app::ThemeSettings::default());
        let mut list: ListViewState<PipelineRun> = ListViewState::default();
        list.load_items(sample_dataset().tasks);
        let line = pager_line(&list, &theme);
        assert_eq!(line.spans[0].style.fg, Some(Color::DarkGray));
        assert_eq!(line.spans[4].style.fg, Some(theme.accent));
        assert_eq!(line.spans[3].content, "  Page 1 of 3  ");
    }
}
