//! Application state: dashboard pages, their list views, theme settings and
//! transient UI (search editing, detail dialog, toasts, spinner).

use crate::entities::{Connector, Listable, PipelineRun, RunStatus};
use crate::input::Action;
use crate::list_view::{ListControls, ListViewState};
use crate::source::Dataset;
use color_eyre::eyre::{eyre, Report, Result};
use std::str::FromStr;
use std::time::Instant;

/// Unicode-width-aware truncation with ellipsis.
/// Returns `""` when `max_width` is 0.
pub fn truncate(s: &str, max_width: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
    if max_width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw + 1 > max_width {
            break;
        }
        result.push(c);
        width += cw;
    }
    result.push('\u{2026}');
    result
}

pub const NOTIFICATION_TTL_SECS: u64 = 5;
pub const ERROR_TTL_SECS: u64 = 10;
/// Must match the length of `FRAMES` in `tui::spinner`.
pub const SPINNER_FRAME_COUNT: usize = 8;
/// Below this terminal width the sidebar is hidden.
pub const SIDEBAR_MIN_WIDTH: u16 = 80;
pub const SEARCH_MAX_CHARS: usize = 64;

// ── Pages ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSection {
    Primary,
    Secondary,
    Footer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Overview,
    Chatbots,
    Agents,
    Tasks,
    Connectors,
    Settings,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Overview,
        Page::Chatbots,
        Page::Agents,
        Page::Tasks,
        Page::Connectors,
        Page::Settings,
    ];

    pub fn route(self) -> &'static str {
        match self {
            Page::Overview => "/",
            Page::Chatbots => "/chatbots",
            Page::Agents => "/agents",
            Page::Tasks => "/tasks",
            Page::Connectors => "/connectors",
            Page::Settings => "/settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Chatbots => "Chat-bots",
            Page::Agents => "Agents",
            Page::Tasks => "Tasks",
            Page::Connectors => "Connectors",
            Page::Settings => "Settings",
        }
    }

    pub fn section(self) -> NavSection {
        match self {
            Page::Overview | Page::Chatbots | Page::Agents | Page::Tasks => NavSection::Primary,
            Page::Connectors => NavSection::Secondary,
            Page::Settings => NavSection::Footer,
        }
    }

    /// Pages backed by a list view.
    pub fn is_listing(self) -> bool {
        matches!(
            self,
            Page::Chatbots | Page::Agents | Page::Tasks | Page::Connectors
        )
    }

    pub fn index(self) -> usize {
        Page::ALL.iter().position(|&p| p == self).unwrap_or(0)
    }

    pub fn next(self) -> Page {
        Page::ALL[(self.index() + 1) % Page::ALL.len()]
    }

    pub fn prev(self) -> Page {
        Page::ALL[(self.index() + Page::ALL.len() - 1) % Page::ALL.len()]
    }
}

impl FromStr for Page {
    type Err = Report;

    /// Accepts a route (`/tasks`), a bare name (`tasks`) or a title (`Chat-bots`).
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Page::ALL
            .iter()
            .copied()
            .find(|p| {
                p.route() == wanted
                    || p.route().trim_start_matches('/') == wanted
                    || p.title().to_lowercase() == wanted
            })
            .ok_or_else(|| eyre!("Unknown page '{s}'"))
    }
}

// ── Theme settings ──

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let i = all.iter().position(|&v| v == current).unwrap_or(0);
    let j = if forward { (i + 1) % len } else { (i + len - 1) % len };
    all[j]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentColor {
    Tomato,
    Crimson,
    Plum,
    Violet,
    Indigo,
    Blue,
    Cyan,
    Teal,
    Grass,
    Amber,
}

impl AccentColor {
    pub const ALL: [AccentColor; 10] = [
        AccentColor::Tomato,
        AccentColor::Crimson,
        AccentColor::Plum,
        AccentColor::Violet,
        AccentColor::Indigo,
        AccentColor::Blue,
        AccentColor::Cyan,
        AccentColor::Teal,
        AccentColor::Grass,
        AccentColor::Amber,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AccentColor::Tomato => "tomato",
            AccentColor::Crimson => "crimson",
            AccentColor::Plum => "plum",
            AccentColor::Violet => "violet",
            AccentColor::Indigo => "indigo",
            AccentColor::Blue => "blue",
            AccentColor::Cyan => "cyan",
            AccentColor::Teal => "teal",
            AccentColor::Grass => "grass",
            AccentColor::Amber => "amber",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrayColor {
    Gray,
    Mauve,
    Slate,
    Sage,
    Olive,
    Sand,
}

impl GrayColor {
    pub const ALL: [GrayColor; 6] = [
        GrayColor::Gray,
        GrayColor::Mauve,
        GrayColor::Slate,
        GrayColor::Sage,
        GrayColor::Olive,
        GrayColor::Sand,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GrayColor::Gray => "gray",
            GrayColor::Mauve => "mauve",
            GrayColor::Slate => "slate",
            GrayColor::Sage => "sage",
            GrayColor::Olive => "olive",
            GrayColor::Sand => "sand",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radius {
    None,
    Small,
    Medium,
    Large,
    Full,
}

impl Radius {
    pub const ALL: [Radius; 5] = [
        Radius::None,
        Radius::Small,
        Radius::Medium,
        Radius::Large,
        Radius::Full,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Radius::None => "none",
            Radius::Small => "small",
            Radius::Medium => "medium",
            Radius::Large => "large",
            Radius::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    P90,
    P95,
    P100,
    P105,
    P110,
}

impl Scaling {
    pub const ALL: [Scaling; 5] = [
        Scaling::P90,
        Scaling::P95,
        Scaling::P100,
        Scaling::P105,
        Scaling::P110,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Scaling::P90 => "90%",
            Scaling::P95 => "95%",
            Scaling::P100 => "100%",
            Scaling::P105 => "105%",
            Scaling::P110 => "110%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    PrimaryColor,
    SecondaryColor,
    Radius,
    Scaling,
}

impl SettingsRow {
    pub const ALL: [SettingsRow; 4] = [
        SettingsRow::PrimaryColor,
        SettingsRow::SecondaryColor,
        SettingsRow::Radius,
        SettingsRow::Scaling,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsRow::PrimaryColor => "Primary color",
            SettingsRow::SecondaryColor => "Secondary color",
            SettingsRow::Radius => "Radius",
            SettingsRow::Scaling => "Scaling",
        }
    }
}

/// Lives for the process lifetime only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSettings {
    pub accent: AccentColor,
    pub gray: GrayColor,
    pub radius: Radius,
    pub scaling: Scaling,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            accent: AccentColor::Violet,
            gray: GrayColor::Gray,
            radius: Radius::Large,
            scaling: Scaling::P100,
        }
    }
}

impl ThemeSettings {
    pub fn value_label(&self, row: SettingsRow) -> &'static str {
        match row {
            SettingsRow::PrimaryColor => self.accent.label(),
            SettingsRow::SecondaryColor => self.gray.label(),
            SettingsRow::Radius => self.radius.label(),
            SettingsRow::Scaling => self.scaling.label(),
        }
    }

    pub fn cycle(&mut self, row: SettingsRow, forward: bool) {
        match row {
            SettingsRow::PrimaryColor => {
                self.accent = cycle(&AccentColor::ALL, self.accent, forward);
            }
            SettingsRow::SecondaryColor => self.gray = cycle(&GrayColor::ALL, self.gray, forward),
            SettingsRow::Radius => self.radius = cycle(&Radius::ALL, self.radius, forward),
            SettingsRow::Scaling => self.scaling = cycle(&Scaling::ALL, self.scaling, forward),
        }
    }
}

// ── Transient UI ──

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub timestamp: Instant,
}

/// Read-only card with every attribute of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailOverlay {
    pub title: String,
    pub lines: Vec<(String, String)>,
}

/// Side effects the event loop performs on behalf of the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Refresh,
}

/// Immutable configuration set at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub page_size: usize,
    pub start_page: Page,
    pub source_label: String,
    /// Seconds between automatic reloads; 0 disables them.
    pub reload_interval: u64,
    pub version_string: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: crate::list_view::DEFAULT_PAGE_SIZE,
            start_page: Page::Overview,
            source_label: "built-in sample".to_string(),
            reload_interval: 0,
            version_string: format!("craftai v{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub page: Page,

    // List views, one per listing page
    pub chatbots: ListViewState<PipelineRun>,
    pub agents: ListViewState<PipelineRun>,
    pub tasks: ListViewState<PipelineRun>,
    pub connectors: ListViewState<Connector>,

    // Selection
    pub cursor: usize,
    pub settings_cursor: usize,
    pub settings: ThemeSettings,

    // Transient UI
    pub editing_search: bool,
    pub overlay: Option<DetailOverlay>,
    pub notifications: Vec<Notification>,
    pub error: Option<(String, Instant)>,
    pub spinner_frame: usize,
    pub loading_count: u16,
    pub last_loaded: Option<Instant>,
    pub should_quit: bool,
}

impl AppState {
    /// Fails when the configured page size is zero.
    pub fn new(config: AppConfig) -> Result<Self> {
        let limit = config.page_size;
        Ok(Self {
            page: config.start_page,
            chatbots: ListViewState::new(limit)?,
            agents: ListViewState::new(limit)?,
            tasks: ListViewState::new(limit)?,
            connectors: ListViewState::new(limit)?,
            config,
            cursor: 0,
            settings_cursor: 0,
            settings: ThemeSettings::default(),
            editing_search: false,
            overlay: None,
            notifications: Vec::new(),
            error: None,
            spinner_frame: 0,
            loading_count: 0,
            last_loaded: None,
            should_quit: false,
        })
    }

    // ── List access ──

    pub fn run_list(&self, page: Page) -> Option<&ListViewState<PipelineRun>> {
        match page {
            Page::Chatbots => Some(&self.chatbots),
            Page::Agents => Some(&self.agents),
            Page::Tasks => Some(&self.tasks),
            _ => None,
        }
    }

    pub fn active_list(&self) -> Option<&dyn ListControls> {
        match self.page {
            Page::Chatbots => Some(&self.chatbots),
            Page::Agents => Some(&self.agents),
            Page::Tasks => Some(&self.tasks),
            Page::Connectors => Some(&self.connectors),
            Page::Overview | Page::Settings => None,
        }
    }

    pub fn active_list_mut(&mut self) -> Option<&mut dyn ListControls> {
        match self.page {
            Page::Chatbots => Some(&mut self.chatbots),
            Page::Agents => Some(&mut self.agents),
            Page::Tasks => Some(&mut self.tasks),
            Page::Connectors => Some(&mut self.connectors),
            Page::Overview | Page::Settings => None,
        }
    }

    /// Item count of a listing page, before search.
    pub fn item_count(&self, page: Page) -> usize {
        match page {
            Page::Chatbots => self.chatbots.items().len(),
            Page::Agents => self.agents.items().len(),
            Page::Tasks => self.tasks.items().len(),
            Page::Connectors => self.connectors.items().len(),
            Page::Overview | Page::Settings => 0,
        }
    }

    /// Run counts per status across chat-bots, agents and tasks.
    pub fn status_counts(&self) -> Vec<(RunStatus, usize)> {
        RunStatus::ALL
            .iter()
            .map(|&status| {
                let count = [&self.chatbots, &self.agents, &self.tasks]
                    .iter()
                    .flat_map(|list| list.items())
                    .filter(|run| run.status == status)
                    .count();
                (status, count)
            })
            .collect()
    }

    pub fn apply_dataset(&mut self, dataset: Dataset) {
        self.chatbots.load_items(dataset.chatbots);
        self.agents.load_items(dataset.agents);
        self.tasks.load_items(dataset.tasks);
        self.connectors.load_items(dataset.connectors);
        self.last_loaded = Some(Instant::now());
        self.clamp_cursor();
    }

    pub fn on_loaded(&mut self, dataset: Dataset, manual: bool) {
        self.end_loading();
        self.clear_error();
        let count = dataset.len();
        self.apply_dataset(dataset);
        if manual {
            self.add_notification(format!("Reloaded {count} items"));
        }
    }

    pub fn on_load_started(&mut self) {
        self.begin_loading();
    }

    pub fn on_load_failed(&mut self, message: String) {
        self.end_loading();
        self.set_error(message);
    }

    /// Errors not tied to a reload leave the in-flight count alone.
    pub fn on_error(&mut self, message: String) {
        self.set_error(message);
    }

    // ── Navigation ──

    pub fn set_page(&mut self, page: Page) {
        if page != self.page {
            tracing::debug!(route = page.route(), "navigate");
        }
        self.page = page;
        self.cursor = 0;
        self.editing_search = false;
        self.overlay = None;
    }

    fn current_page_len(&self) -> usize {
        self.active_list().map_or(0, |list| list.current_page_len())
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.current_page_len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn move_up(&mut self) {
        if self.page == Page::Settings {
            self.settings_cursor = self.settings_cursor.saturating_sub(1);
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        if self.page == Page::Settings {
            if self.settings_cursor + 1 < SettingsRow::ALL.len() {
                self.settings_cursor += 1;
            }
        } else if self.cursor + 1 < self.current_page_len() {
            self.cursor += 1;
        }
    }

    pub fn selected_setting(&self) -> SettingsRow {
        SettingsRow::ALL[self.settings_cursor.min(SettingsRow::ALL.len() - 1)]
    }

    /// Runs `f` on the visible list, then keeps the cursor on a valid row.
    fn with_active_list(&mut self, f: impl FnOnce(&mut dyn ListControls)) {
        if let Some(list) = self.active_list_mut() {
            f(list);
            self.clamp_cursor();
        }
    }

    pub fn first_page(&mut self) {
        self.with_active_list(|list| list.first_page());
    }

    pub fn last_page(&mut self) {
        self.with_active_list(|list| list.last_page());
    }

    /// On the settings page, cycles the selected setting forward instead.
    pub fn next_page(&mut self) {
        if self.page == Page::Settings {
            let row = self.selected_setting();
            self.settings.cycle(row, true);
        } else {
            self.with_active_list(|list| list.next_page());
        }
    }

    /// On the settings page, cycles the selected setting backward instead.
    pub fn prev_page(&mut self) {
        if self.page == Page::Settings {
            let row = self.selected_setting();
            self.settings.cycle(row, false);
        } else {
            self.with_active_list(|list| list.prev_page());
        }
    }

    // ── Search & sort ──

    pub fn start_search(&mut self) {
        if self.page.is_listing() {
            self.editing_search = true;
        }
    }

    pub fn search_input(&mut self, c: char) {
        self.with_active_list(|list| {
            if list.search_value().chars().count() < SEARCH_MAX_CHARS {
                let mut value = list.search_value().to_string();
                value.push(c);
                list.set_search_value(value);
            }
        });
    }

    pub fn search_backspace(&mut self) {
        self.with_active_list(|list| {
            let mut value = list.search_value().to_string();
            value.pop();
            list.set_search_value(value);
        });
    }

    pub fn submit_search(&mut self) {
        self.editing_search = false;
    }

    pub fn cancel_search(&mut self) {
        self.editing_search = false;
        self.clear_search();
    }

    pub fn clear_search(&mut self) {
        self.with_active_list(|list| list.set_search_value(String::new()));
    }

    pub fn cycle_sort(&mut self) {
        self.with_active_list(|list| list.cycle_sort_field());
    }

    pub fn toggle_sort_direction(&mut self) {
        self.with_active_list(|list| list.toggle_sort());
    }

    // ── Details ──

    pub fn open_details(&mut self) {
        let overlay = match self.page {
            Page::Chatbots | Page::Agents | Page::Tasks => self
                .run_list(self.page)
                .and_then(|list| list.item_on_page(self.cursor))
                .map(detail_for),
            Page::Connectors => self.connectors.item_on_page(self.cursor).map(detail_for),
            Page::Overview | Page::Settings => None,
        };
        if overlay.is_some() {
            self.overlay = overlay;
        }
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    // ── Loading, toasts, spinner ──

    pub fn is_loading(&self) -> bool {
        self.loading_count > 0
    }

    pub fn begin_loading(&mut self) {
        self.loading_count = self.loading_count.saturating_add(1);
    }

    pub fn end_loading(&mut self) {
        self.loading_count = self.loading_count.saturating_sub(1);
    }

    pub fn add_notification(&mut self, message: String) {
        self.notifications.push(Notification {
            message,
            timestamp: Instant::now(),
        });
    }

    pub fn prune_notifications(&mut self) {
        self.notifications
            .retain(|n| n.timestamp.elapsed().as_secs() < NOTIFICATION_TTL_SECS);
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAME_COUNT;
    }

    pub fn set_error(&mut self, msg: String) {
        tracing::warn!("{msg}");
        self.error = Some((msg, Instant::now()));
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn prune_error(&mut self) {
        if let Some((_, ts)) = &self.error {
            if ts.elapsed().as_secs() >= ERROR_TTL_SECS {
                self.error = None;
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|(msg, _)| msg.as_str())
    }

    // ── Actions ──

    /// Apply one user action. Returns the side effect the caller must run, if any.
    pub fn handle_action(&mut self, action: Action) -> Option<Effect> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::DismissError => self.clear_error(),
            Action::MoveUp => self.move_up(),
            Action::MoveDown => self.move_down(),
            Action::NextView => self.set_page(self.page.next()),
            Action::PrevView => self.set_page(self.page.prev()),
            Action::GoTo(page) => self.set_page(page),
            Action::FirstPage => self.first_page(),
            Action::PrevPage => self.prev_page(),
            Action::NextPage => self.next_page(),
            Action::LastPage => self.last_page(),
            Action::StartSearch => self.start_search(),
            Action::ClearSearch => self.clear_search(),
            Action::SearchInput(c) => self.search_input(c),
            Action::SearchBackspace => self.search_backspace(),
            Action::SearchSubmit => self.submit_search(),
            Action::SearchCancel => self.cancel_search(),
            Action::CycleSort => self.cycle_sort(),
            Action::ToggleSortDirection => self.toggle_sort_direction(),
            Action::ShowDetails => self.open_details(),
            Action::CloseOverlay => self.close_overlay(),
            Action::Refresh => {
                self.begin_loading();
                return Some(Effect::Refresh);
            }
            Action::None => {}
        }
        None
    }
}

fn detail_for<T: Listable>(item: &T) -> DetailOverlay {
    DetailOverlay {
        title: item.title(),
        lines: item.detail_lines(),
    }
}
