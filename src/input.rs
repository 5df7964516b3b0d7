use crate::app::Page;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    DismissError,
    MoveUp,
    MoveDown,
    NextView,
    PrevView,
    GoTo(Page),
    FirstPage,
    PrevPage,
    NextPage,
    LastPage,
    StartSearch,
    ClearSearch,
    SearchInput(char),
    SearchBackspace,
    SearchSubmit,
    SearchCancel,
    CycleSort,
    ToggleSortDirection,
    ShowDetails,
    CloseOverlay,
    Refresh,
    None,
}

/// Which overlay (if any) is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayMode {
    #[default]
    None,
    Detail,
}

/// Captures the UI state needed to interpret a key press.
#[derive(Debug, Clone, Default)]
pub struct InputContext {
    pub has_error: bool,
    pub is_loading: bool,
    pub overlay: OverlayMode,
    pub editing_search: bool,
}

pub fn map_key(key: KeyEvent, ctx: &InputContext) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if ctx.overlay == OverlayMode::Detail {
        return match key.code {
            KeyCode::Char('q') | KeyCode::Enter | KeyCode::Esc => Action::CloseOverlay,
            _ => Action::None,
        };
    }

    // Search box has focus: printable keys are text
    if ctx.editing_search {
        return match key.code {
            KeyCode::Enter => Action::SearchSubmit,
            KeyCode::Esc => Action::SearchCancel,
            KeyCode::Backspace => Action::SearchBackspace,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::SearchInput(c)
            }
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => {
            if ctx.has_error {
                Action::DismissError
            } else {
                Action::Quit
            }
        }
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Tab => Action::NextView,
        KeyCode::BackTab => Action::PrevView,
        KeyCode::Left | KeyCode::Char('h') => Action::PrevPage,
        KeyCode::Right | KeyCode::Char('l') => Action::NextPage,
        KeyCode::Home | KeyCode::Char('g') => Action::FirstPage,
        KeyCode::End | KeyCode::Char('G') => Action::LastPage,
        KeyCode::Char('/') => Action::StartSearch,
        KeyCode::Char('x') => Action::ClearSearch,
        KeyCode::Char('s') => Action::CycleSort,
        KeyCode::Char('S') => Action::ToggleSortDirection,
        KeyCode::Enter => Action::ShowDetails,
        KeyCode::Char('r') if !ctx.is_loading => Action::Refresh,
        KeyCode::Char(c @ '1'..='9') => {
            let index = (c as u8 - b'1') as usize;
            Page::ALL.get(index).map_or(Action::None, |&page| Action::GoTo(page))
        }
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn press_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        }
    }

    fn ctx() -> InputContext {
        InputContext::default()
    }

    fn ctx_error() -> InputContext {
        InputContext { has_error: true, ..Default::default() }
    }

    fn ctx_loading() -> InputContext {
        InputContext { is_loading: true, ..Default::default() }
    }

    fn ctx_detail() -> InputContext {
        InputContext { overlay: OverlayMode::Detail, ..Default::default() }
    }

    fn ctx_search() -> InputContext {
        InputContext { editing_search: true, ..Default::default() }
    }

    #[test]
    fn quit_on_q() {
        assert_eq!(map_key(press(KeyCode::Char('q')), &ctx()), Action::Quit);
    }

    #[test]
    fn esc_quits_without_error() {
        assert_eq!(map_key(press(KeyCode::Esc), &ctx()), Action::Quit);
    }

    #[test]
    fn esc_dismisses_error_when_present() {
        assert_eq!(map_key(press(KeyCode::Esc), &ctx_error()), Action::DismissError);
    }

    #[test]
    fn ctrl_c_quits() {
        assert_eq!(
            map_key(press_with(KeyCode::Char('c'), KeyModifiers::CONTROL), &ctx()),
            Action::Quit
        );
    }

    #[test]
    fn row_movement() {
        assert_eq!(map_key(press(KeyCode::Up), &ctx()), Action::MoveUp);
        assert_eq!(map_key(press(KeyCode::Char('k')), &ctx()), Action::MoveUp);
        assert_eq!(map_key(press(KeyCode::Down), &ctx()), Action::MoveDown);
        assert_eq!(map_key(press(KeyCode::Char('j')), &ctx()), Action::MoveDown);
    }

    #[test]
    fn tab_cycles_views() {
        assert_eq!(map_key(press(KeyCode::Tab), &ctx()), Action::NextView);
        assert_eq!(map_key(press(KeyCode::BackTab), &ctx()), Action::PrevView);
    }

    #[test]
    fn page_navigation_keys() {
        assert_eq!(map_key(press(KeyCode::Char('h')), &ctx()), Action::PrevPage);
        assert_eq!(map_key(press(KeyCode::Left), &ctx()), Action::PrevPage);
        assert_eq!(map_key(press(KeyCode::Char('l')), &ctx()), Action::NextPage);
        assert_eq!(map_key(press(KeyCode::Right), &ctx()), Action::NextPage);
    }

    #[test]
    fn first_and_last_page_keys() {
        assert_eq!(map_key(press(KeyCode::Char('g')), &ctx()), Action::FirstPage);
        assert_eq!(map_key(press(KeyCode::Home), &ctx()), Action::FirstPage);
        assert_eq!(map_key(press(KeyCode::Char('G')), &ctx()), Action::LastPage);
        assert_eq!(map_key(press(KeyCode::End), &ctx()), Action::LastPage);
    }

    #[test]
    fn digits_jump_to_views() {
        assert_eq!(map_key(press(KeyCode::Char('1')), &ctx()), Action::GoTo(Page::Overview));
        assert_eq!(map_key(press(KeyCode::Char('4')), &ctx()), Action::GoTo(Page::Tasks));
        assert_eq!(map_key(press(KeyCode::Char('6')), &ctx()), Action::GoTo(Page::Settings));
    }

    #[test]
    fn digits_past_last_view_return_none() {
        assert_eq!(map_key(press(KeyCode::Char('7')), &ctx()), Action::None);
        assert_eq!(map_key(press(KeyCode::Char('0')), &ctx()), Action::None);
    }

    #[test]
    fn sort_keys() {
        assert_eq!(map_key(press(KeyCode::Char('s')), &ctx()), Action::CycleSort);
        assert_eq!(map_key(press(KeyCode::Char('S')), &ctx()), Action::ToggleSortDirection);
    }

    #[test]
    fn search_keys() {
        assert_eq!(map_key(press(KeyCode::Char('/')), &ctx()), Action::StartSearch);
        assert_eq!(map_key(press(KeyCode::Char('x')), &ctx()), Action::ClearSearch);
    }

    #[test]
    fn enter_shows_details() {
        assert_eq!(map_key(press(KeyCode::Enter), &ctx()), Action::ShowDetails);
    }

    #[test]
    fn refresh_r() {
        assert_eq!(map_key(press(KeyCode::Char('r')), &ctx()), Action::Refresh);
    }

    #[test]
    fn refresh_blocked_while_loading() {
        assert_eq!(map_key(press(KeyCode::Char('r')), &ctx_loading()), Action::None);
    }

    #[test]
    fn unbound_key_returns_none() {
        assert_eq!(map_key(press(KeyCode::Char('z')), &ctx()), Action::None);
    }

    #[test]
    fn non_press_event_filtered() {
        assert_eq!(map_key(release(KeyCode::Char('q')), &ctx()), Action::None);
    }

    // --- Search editing tests ---

    #[test]
    fn search_captures_printable_keys() {
        assert_eq!(map_key(press(KeyCode::Char('q')), &ctx_search()), Action::SearchInput('q'));
        assert_eq!(map_key(press(KeyCode::Char('j')), &ctx_search()), Action::SearchInput('j'));
        assert_eq!(
            map_key(press_with(KeyCode::Char('A'), KeyModifiers::SHIFT), &ctx_search()),
            Action::SearchInput('A')
        );
    }

    #[test]
    fn search_editing_keys() {
        assert_eq!(map_key(press(KeyCode::Backspace), &ctx_search()), Action::SearchBackspace);
        assert_eq!(map_key(press(KeyCode::Enter), &ctx_search()), Action::SearchSubmit);
        assert_eq!(map_key(press(KeyCode::Esc), &ctx_search()), Action::SearchCancel);
    }

    #[test]
    fn search_ignores_navigation() {
        assert_eq!(map_key(press(KeyCode::Tab), &ctx_search()), Action::None);
    }

    #[test]
    fn search_ctrl_c_quits() {
        assert_eq!(
            map_key(press_with(KeyCode::Char('c'), KeyModifiers::CONTROL), &ctx_search()),
            Action::Quit
        );
    }

    // --- Detail overlay mode tests ---

    #[test]
    fn detail_overlay_close_keys() {
        assert_eq!(map_key(press(KeyCode::Char('q')), &ctx_detail()), Action::CloseOverlay);
        assert_eq!(map_key(press(KeyCode::Enter), &ctx_detail()), Action::CloseOverlay);
        assert_eq!(map_key(press(KeyCode::Esc), &ctx_detail()), Action::CloseOverlay);
    }

    #[test]
    fn detail_overlay_swallows_navigation() {
        assert_eq!(map_key(press(KeyCode::Char('j')), &ctx_detail()), Action::None);
        assert_eq!(map_key(press(KeyCode::Char('l')), &ctx_detail()), Action::None);
    }

    #[test]
    fn detail_overlay_ctrl_c_quits() {
        assert_eq!(
            map_key(press_with(KeyCode::Char('c'), KeyModifiers::CONTROL), &ctx_detail()),
            Action::Quit
        );
    }
}
