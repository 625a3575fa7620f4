use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::Screen;

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    Back,
    InputChar(char),
    InputBackspace,
    SubmitToken,
    SaveToken,
    SkipSaveToken,
    MoveUp,
    MoveDown,
    SelectPackage,
    ToggleSelect,
    SelectAllVisible,
    DeselectAll,
    BeginFilter,
    ApplyFilter,
    CancelFilter,
    ClearFilter,
    ToggleSort,
    RequestDelete,
    ConfirmDelete,
    CancelDelete,
    None,
}

/// Captures the UI state needed to interpret a key press.
#[derive(Debug, Clone, Copy)]
pub struct InputContext {
    pub screen: Screen,
    pub filter_entry: bool,
    pub save_prompt: bool,
    pub deleting: bool,
}

pub fn map_key(key: KeyEvent, ctx: &InputContext) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Ctrl+C always quits, even mid-batch.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    // Text-capturing modes claim the event before global bindings, so that
    // 'q' stays typeable inside the token and filter inputs.
    if ctx.screen == Screen::TokenEntry {
        return map_token_key(key, ctx.save_prompt);
    }
    if ctx.filter_entry {
        return map_filter_entry_key(key);
    }

    if key.code == KeyCode::Char('q') {
        return Action::Quit;
    }

    match ctx.screen {
        Screen::TokenEntry => Action::None,
        Screen::PackageList => map_packages_key(key),
        Screen::VersionList => map_versions_key(key),
        Screen::DeleteConfirm => map_confirm_key(key, ctx.deleting),
    }
}

fn map_token_key(key: KeyEvent, save_prompt: bool) -> Action {
    if save_prompt {
        return match key.code {
            KeyCode::Char('s') => Action::SaveToken,
            KeyCode::Char('n') => Action::SkipSaveToken,
            _ => Action::None,
        };
    }
    match key.code {
        KeyCode::Enter => Action::SubmitToken,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

fn map_filter_entry_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::ApplyFilter,
        KeyCode::Esc => Action::CancelFilter,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

fn map_packages_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Enter => Action::SelectPackage,
        _ => Action::None,
    }
}

fn map_versions_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Char(' ') => Action::ToggleSelect,
        KeyCode::Char('a') => Action::SelectAllVisible,
        KeyCode::Char('n') => Action::DeselectAll,
        KeyCode::Char('/' | ':') => Action::BeginFilter,
        KeyCode::Char('c') => Action::ClearFilter,
        KeyCode::Char('s') => Action::ToggleSort,
        KeyCode::Char('d') => Action::RequestDelete,
        KeyCode::Esc => Action::Back,
        _ => Action::None,
    }
}

fn map_confirm_key(key: KeyEvent, deleting: bool) -> Action {
    // While the batch runs, only quit is honored.
    if deleting {
        return Action::None;
    }
    match key.code {
        KeyCode::Char('y' | 'Y') => Action::ConfirmDelete,
        KeyCode::Char('n' | 'N') | KeyCode::Esc => Action::CancelDelete,
        _ => Action::None,
    }
}
