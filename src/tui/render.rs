use crate::app::{AppState, Page, SIDEBAR_MIN_WIDTH};
use crate::entities::{ConnectorField, PipelineRun, RunField};
use crate::tui::table::{self, TableView};
use crate::tui::theme::{status_color, Theme};
use crate::tui::{detail_overlay, footer, header, overview, settings, sidebar};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(f: &mut Frame, state: &AppState) {
    let theme = Theme::from_settings(&state.settings);

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(1),
        Constraint::Length(2),
    ])
    .areas(f.area());

    header::render(f, header_area, state, &theme);

    let page_area = if f.area().width >= SIDEBAR_MIN_WIDTH {
        let [nav, page] = Layout::horizontal([
            Constraint::Length(sidebar::SIDEBAR_WIDTH),
            Constraint::Fill(1),
        ])
        .areas(body_area);
        sidebar::render(f, nav, state, &theme);
        page
    } else {
        body_area
    };
    render_page(f, page_area, state, &theme);

    footer::render(f, footer_area, state, &theme);

    if let Some(err) = state.error_message() {
        let area = f.area();
        if area.height > 6 && area.width >= 4 {
            let err_area = Rect {
                x: area.x + 1,
                y: area.y + area.height.saturating_sub(5),
                width: area.width.saturating_sub(2),
                height: 3,
            };
            let err_widget = Paragraph::new(err.to_owned())
                .style(Style::default().fg(Color::Red))
                .block(
                    Block::default()
                        .title(" Error ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .wrap(Wrap { trim: true });
            f.render_widget(err_widget, err_area);
        }
    }

    // Drawn on top of everything
    if let Some(overlay) = &state.overlay {
        detail_overlay::render(f, overlay, &theme);
    }
}

fn render_page(f: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let view = TableView {
        title: state.page.title(),
        cursor: state.cursor,
        editing_search: state.editing_search,
    };
    match state.page {
        Page::Overview => overview::render(f, area, state, theme),
        Page::Settings => settings::render(f, area, state, theme),
        Page::Connectors => {
            table::render(f, area, &state.connectors, &view, theme, |_, _: ConnectorField| None);
        }
        Page::Chatbots | Page::Agents | Page::Tasks => {
            if let Some(list) = state.run_list(state.page) {
                table::render(f, area, list, &view, theme, run_cell_color);
            }
        }
    }
}

fn run_cell_color(run: &PipelineRun, field: RunField) -> Option<Color> {
    (field == RunField::Status).then(|| status_color(run.status))
}
