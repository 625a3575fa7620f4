use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::events::AppEvent;
use crate::filter;
use crate::gh::client::{ApiError, Client};
use crate::gh::types::{Package, PackageVersion};
use crate::input::{Action, InputContext};
use crate::token::TokenSource;

// UI constants
pub const SPINNER_FRAME_COUNT: usize = 10;
pub const VISIBLE_VERSION_ROWS: usize = 15;
pub const CONFIRM_LIST_MAX: usize = 5;
pub const ERROR_LIST_MAX: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    TokenEntry,
    PackageList,
    VersionList,
    DeleteConfirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    Oldest,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Newest => Self::Oldest,
            Self::Oldest => Self::Newest,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }
}

/// An asynchronous command for the event loop to execute. State updates are
/// synchronous; anything that talks to the network is returned as a command
/// and spawned by the caller, which posts the result back as an `AppEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchPackages { gen: u64 },
    FetchVersions { gen: u64, package: String },
    DeleteVersion { gen: u64, package: String, version_id: u64 },
}

pub struct AppState {
    pub screen: Screen,
    pub client: Option<Client>,
    pub loading: bool,
    pub loading_message: String,
    pub error: Option<String>,
    /// Liveness generation: results carrying an older generation belong to
    /// an abandoned request and are dropped.
    pub request_gen: u64,

    // Token screen
    pub token_input: String,
    pub pending_token: String,
    pub token_from_store: bool,
    pub show_save_prompt: bool,

    // Packages screen
    pub packages: Vec<Package>,
    pub package_cursor: usize,
    pub selected_package: Option<Package>,

    // Versions screen
    pub versions: Vec<PackageVersion>,
    pub filtered_versions: Vec<PackageVersion>,
    pub selected_ids: HashSet<u64>,
    pub version_cursor: usize,
    pub filter_text: String,
    pub filter_input: String,
    pub filter_entry: bool,
    pub sort_order: SortOrder,

    // Confirm screen
    pub deleting: bool,
    pub delete_index: usize,
    pub delete_total: usize,
    pub delete_errors: Vec<String>,

    // Transient UI
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::TokenEntry,
            client: None,
            loading: false,
            loading_message: String::new(),
            error: None,
            request_gen: 0,
            token_input: String::new(),
            pending_token: String::new(),
            token_from_store: false,
            show_save_prompt: false,
            packages: Vec::new(),
            package_cursor: 0,
            selected_package: None,
            versions: Vec::new(),
            filtered_versions: Vec::new(),
            selected_ids: HashSet::new(),
            version_cursor: 0,
            filter_text: String::new(),
            filter_input: String::new(),
            filter_entry: false,
            sort_order: SortOrder::Newest,
            deleting: false,
            delete_index: 0,
            delete_total: 0,
            delete_errors: Vec::new(),
            spinner_frame: 0,
            should_quit: false,
        }
    }

    /// Seeds a token found in the environment or store and returns the
    /// validation fetch to issue. The session still starts on the token
    /// screen; it transitions once the fetch succeeds.
    pub fn start_with_token(&mut self, token: String, source: TokenSource) -> Command {
        self.client = Some(Client::new(&token));
        self.pending_token = token;
        self.token_from_store = true;
        self.loading = true;
        self.loading_message = match source {
            TokenSource::Env => "Validating token from environment...".to_string(),
            TokenSource::Store => "Validating saved token...".to_string(),
        };
        Command::FetchPackages { gen: self.issue_gen() }
    }

    pub fn input_context(&self) -> InputContext {
        InputContext {
            screen: self.screen,
            filter_entry: self.filter_entry,
            save_prompt: self.show_save_prompt,
            deleting: self.deleting,
        }
    }

    fn issue_gen(&mut self) -> u64 {
        self.request_gen += 1;
        self.request_gen
    }

    /// Invalidates any in-flight request so its eventual result is dropped.
    fn abandon_inflight(&mut self) {
        self.request_gen += 1;
    }

    // --- Key-driven updates ---

    pub fn apply(&mut self, action: Action) -> Option<Command> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                self.abandon_inflight();
                None
            }
            Action::Back => {
                self.leave_version_screen();
                None
            }
            Action::InputChar(c) => {
                self.push_input(c);
                None
            }
            Action::InputBackspace => {
                self.pop_input();
                None
            }
            Action::SubmitToken => self.submit_token(),
            Action::SaveToken => {
                self.finish_save_prompt(true);
                None
            }
            Action::SkipSaveToken => {
                self.finish_save_prompt(false);
                None
            }
            Action::MoveUp => {
                self.move_cursor(-1);
                None
            }
            Action::MoveDown => {
                self.move_cursor(1);
                None
            }
            Action::SelectPackage => self.select_package(),
            Action::ToggleSelect => {
                self.toggle_current();
                None
            }
            Action::SelectAllVisible => {
                self.select_all_visible();
                None
            }
            Action::DeselectAll => {
                self.selected_ids.clear();
                None
            }
            Action::BeginFilter => {
                self.begin_filter_entry();
                None
            }
            Action::ApplyFilter => {
                self.commit_filter(Utc::now());
                None
            }
            Action::CancelFilter => {
                self.cancel_filter_entry();
                None
            }
            Action::ClearFilter => {
                self.reset_filter();
                None
            }
            Action::ToggleSort => {
                self.toggle_sort();
                None
            }
            Action::RequestDelete => {
                self.request_delete();
                None
            }
            Action::ConfirmDelete => self.confirm_delete(),
            Action::CancelDelete => {
                self.cancel_delete();
                None
            }
            Action::None => None,
        }
    }

    fn push_input(&mut self, c: char) {
        match self.screen {
            Screen::TokenEntry => self.token_input.push(c),
            Screen::VersionList if self.filter_entry => self.filter_input.push(c),
            _ => {}
        }
    }

    fn pop_input(&mut self) {
        match self.screen {
            Screen::TokenEntry => {
                self.token_input.pop();
            }
            Screen::VersionList if self.filter_entry => {
                self.filter_input.pop();
            }
            _ => {}
        }
    }

    fn submit_token(&mut self) -> Option<Command> {
        if self.loading {
            return None;
        }
        let token = self.token_input.trim().to_string();
        if token.is_empty() {
            self.error = Some("token cannot be empty".to_string());
            return None;
        }
        self.client = Some(Client::new(&token));
        self.pending_token = token;
        self.token_from_store = false;
        self.error = None;
        self.loading = true;
        self.loading_message = "Validating token...".to_string();
        Some(Command::FetchPackages { gen: self.issue_gen() })
    }

    fn finish_save_prompt(&mut self, save: bool) {
        if !self.show_save_prompt {
            return;
        }
        if save {
            if let Err(e) = crate::token::save_token(&self.pending_token) {
                self.error = Some(format!("failed to save token: {e}"));
            }
        }
        self.show_save_prompt = false;
        self.screen = Screen::PackageList;
    }

    fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.screen {
            Screen::PackageList => (&mut self.package_cursor, self.packages.len()),
            Screen::VersionList => (&mut self.version_cursor, self.filtered_versions.len()),
            Screen::TokenEntry | Screen::DeleteConfirm => return,
        };
        if len == 0 {
            *cursor = 0;
        } else if delta < 0 {
            *cursor = cursor.saturating_sub(delta.unsigned_abs());
        } else {
            *cursor = (*cursor + delta.unsigned_abs()).min(len - 1);
        }
    }

    fn select_package(&mut self) -> Option<Command> {
        if self.screen != Screen::PackageList || self.packages.is_empty() {
            return None;
        }
        // Snapshot by value: the packages list is replaced wholesale on every
        // fetch, so holding an index across screens would dangle.
        let pkg = self.packages[self.package_cursor].clone();
        self.filter_text.clear();
        self.filter_input.clear();
        self.filter_entry = false;
        self.selected_ids.clear();
        self.version_cursor = 0;
        self.versions.clear();
        self.filtered_versions.clear();
        self.error = None;
        self.loading = true;
        self.loading_message = format!("Loading versions for {}...", pkg.name);
        let package = pkg.name.clone();
        self.selected_package = Some(pkg);
        Some(Command::FetchVersions { gen: self.issue_gen(), package })
    }

    fn leave_version_screen(&mut self) {
        if self.screen != Screen::VersionList {
            return;
        }
        self.screen = Screen::PackageList;
        self.selected_ids.clear();
        self.filter_text.clear();
        self.filter_input.clear();
        self.filter_entry = false;
        self.filtered_versions.clear();
        self.version_cursor = 0;
        self.loading = false;
        self.abandon_inflight();
    }

    // --- Selection set ---

    fn toggle_current(&mut self) {
        if let Some(v) = self.filtered_versions.get(self.version_cursor) {
            if !self.selected_ids.remove(&v.id) {
                self.selected_ids.insert(v.id);
            }
        }
    }

    /// Union, not replace: selections outside the visible set survive.
    fn select_all_visible(&mut self) {
        for v in &self.filtered_versions {
            self.selected_ids.insert(v.id);
        }
    }

    // --- Filter and sort ---

    fn begin_filter_entry(&mut self) {
        self.filter_entry = true;
        self.filter_input = self.filter_text.clone();
    }

    /// Discards the partial edit; applied filter and selection are untouched.
    fn cancel_filter_entry(&mut self) {
        self.filter_entry = false;
        self.filter_input.clear();
    }

    pub fn commit_filter(&mut self, now: DateTime<Utc>) {
        self.filter_text = self.filter_input.trim().to_string();
        self.filter_entry = false;
        self.apply_filter(now);
    }

    /// Re-derives `filtered_versions` from the applied filter text. On a
    /// recognized pattern the selection is replaced with exactly the matching
    /// ids and the cursor resets; otherwise the full list is shown and the
    /// selection is left as-is.
    pub fn apply_filter(&mut self, now: DateTime<Utc>) {
        match filter::parse(&self.filter_text) {
            Some(f) => {
                self.filtered_versions = self
                    .versions
                    .iter()
                    .filter(|v| f.matches(v.created_at, now))
                    .cloned()
                    .collect();
                self.selected_ids = self.filtered_versions.iter().map(|v| v.id).collect();
                self.version_cursor = 0;
            }
            None => {
                self.filtered_versions = self.versions.clone();
                self.clamp_version_cursor();
            }
        }
        self.sort_filtered();
    }

    pub fn reset_filter(&mut self) {
        self.filter_text.clear();
        self.filter_input.clear();
        self.filtered_versions = self.versions.clone();
        self.sort_filtered();
        self.selected_ids.clear();
        self.version_cursor = 0;
    }

    pub fn toggle_sort(&mut self) {
        self.sort_order = self.sort_order.toggled();
        self.sort_filtered();
    }

    fn sort_filtered(&mut self) {
        // sort_by is stable: equal timestamps keep their relative order.
        match self.sort_order {
            SortOrder::Newest => self
                .filtered_versions
                .sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => self
                .filtered_versions
                .sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }
    }

    fn clamp_version_cursor(&mut self) {
        if self.filtered_versions.is_empty() {
            self.version_cursor = 0;
        } else if self.version_cursor >= self.filtered_versions.len() {
            self.version_cursor = self.filtered_versions.len() - 1;
        }
    }

    // --- Delete batch ---

    fn request_delete(&mut self) {
        if self.screen == Screen::VersionList && !self.selected_ids.is_empty() {
            self.screen = Screen::DeleteConfirm;
            self.delete_errors.clear();
        }
    }

    fn confirm_delete(&mut self) -> Option<Command> {
        if self.deleting || self.selected_ids.is_empty() {
            return None;
        }
        self.deleting = true;
        self.delete_index = 0;
        self.delete_total = self.selected_ids.len();
        self.delete_errors.clear();
        self.error = None;
        self.issue_next_delete()
    }

    fn cancel_delete(&mut self) {
        if self.screen == Screen::DeleteConfirm && !self.deleting {
            self.screen = Screen::VersionList;
        }
    }

    /// The Nth selected version in batch order: ids are taken in the order
    /// they appear in the fetched `versions` list, which is stable across
    /// re-sorting of the displayed subset.
    fn nth_selected(&self, n: usize) -> Option<u64> {
        self.versions
            .iter()
            .filter(|v| self.selected_ids.contains(&v.id))
            .nth(n)
            .map(|v| v.id)
    }

    fn issue_next_delete(&mut self) -> Option<Command> {
        let version_id = self.nth_selected(self.delete_index)?;
        let package = self.selected_package.as_ref()?.name.clone();
        Some(Command::DeleteVersion { gen: self.issue_gen(), package, version_id })
    }

    fn on_delete_result(&mut self, result: Result<(), ApiError>) -> Option<Command> {
        if !self.deleting {
            return None;
        }
        if let Err(e) = result {
            self.delete_errors.push(e.to_string());
        }
        self.delete_index += 1;
        if self.delete_index < self.delete_total {
            return self.issue_next_delete();
        }

        self.deleting = false;
        if self.delete_errors.is_empty() {
            self.selected_ids.clear();
            self.screen = Screen::PackageList;
            self.loading = true;
            self.loading_message = "Refreshing packages...".to_string();
            return Some(Command::FetchPackages { gen: self.issue_gen() });
        }
        // Errors stay on screen; the user can re-confirm to retry the batch
        // or navigate back.
        None
    }

    // --- Result messages ---

    pub fn on_message(&mut self, event: AppEvent) -> Option<Command> {
        match event {
            AppEvent::Key(_) => None, // mapped by the caller via input::map_key
            AppEvent::Tick => {
                if self.loading || self.deleting {
                    self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAME_COUNT;
                }
                None
            }
            AppEvent::PackagesFetched { gen, result } => {
                if gen != self.request_gen {
                    return None;
                }
                self.on_packages(result);
                None
            }
            AppEvent::VersionsFetched { gen, result } => {
                if gen != self.request_gen {
                    return None;
                }
                self.on_versions(result);
                None
            }
            AppEvent::DeleteResult { gen, result, .. } => {
                if gen != self.request_gen {
                    return None;
                }
                self.on_delete_result(result)
            }
        }
    }

    fn on_packages(&mut self, result: Result<Vec<Package>, ApiError>) {
        self.loading = false;
        match result {
            Ok(packages) => {
                self.packages = packages;
                if self.package_cursor >= self.packages.len() {
                    self.package_cursor = self.packages.len().saturating_sub(1);
                }
                self.error = None;
                if self.screen == Screen::TokenEntry {
                    if self.token_from_store {
                        self.screen = Screen::PackageList;
                    } else {
                        // Token was typed manually: offer to keep it.
                        self.show_save_prompt = true;
                    }
                }
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
    }

    fn on_versions(&mut self, result: Result<Vec<PackageVersion>, ApiError>) {
        self.loading = false;
        match result {
            Ok(versions) => {
                self.versions = versions;
                self.filtered_versions = self.versions.clone();
                self.sort_filtered();
                self.selected_ids.clear();
                self.version_cursor = 0;
                self.error = None;
                self.screen = Screen::VersionList;
            }
            Err(e) => {
                self.error = Some(e.to_string());
            }
        }
    }
}
