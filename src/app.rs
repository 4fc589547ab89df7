//! Application container and event handling
//!
//! This is the core of confdeck, managing:
//! - The active tab and per-tab cursors
//! - Event handling (keyboard input)
//! - Popups, flash messages and periodic housekeeping
//!
//! Profile data itself lives in [`AppState`]; this type only drives it
//! through the [`NavModel`].

use crate::config::Config;
use crate::nav::NavModel;
use crate::profiles::usage;
use crate::state::AppState;
use crate::sysmon::{self, SystemInfo};
use crate::types::{ProcessInfo, Profile, Tab, UsageSummary};
use crate::ui::Theme;
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Toolbox entries: (label, description)
pub const TOOLBOX_ACTIONS: [(&str, &str); 4] = [
    ("Reload profiles", "Re-scan the profile directory"),
    ("Validate profiles", "Parse every profile file and report problems"),
    ("Show storage paths", "Where profiles, settings and logs live"),
    ("Clear usage history", "Delete the usage event log"),
];

/// Number of rows on the Settings tab
pub const SETTINGS_COUNT: usize = 6;

/// Main application container
pub struct App {
    // Core state
    pub should_quit: bool,
    pub active_tab: Tab,
    pub config: Config,
    pub theme: Theme,
    pub system_info: SystemInfo,
    pub dry_run: bool,

    // Shared profile state and its navigation model
    pub state: Arc<AppState>,
    pub nav: NavModel<AppState>,

    // Profiles tab state
    pub profiles_cursor: usize,

    // Usage tab state
    pub usage: UsageSummary,

    // Processes tab state
    pub processes: Vec<ProcessInfo>,

    // Toolbox tab state
    pub toolbox_cursor: usize,

    // Settings tab state
    pub settings_cursor: usize,

    // Popup state
    pub popup: PopupState,

    // Flash message (temporary feedback)
    pub flash_message: Option<(String, bool, Instant)>,

    // Housekeeping tick counter (drives the spinner and refresh cadence)
    pub tick: u64,
}

/// Popup overlay state
#[derive(Debug, Clone)]
pub enum PopupState {
    None,
    Confirm {
        title: String,
        message: String,
        detail: Option<String>,
        action: PendingAction,
    },
    Error {
        title: String,
        message: String,
    },
    Info {
        title: String,
        message: String,
    },
}

/// Action armed behind a confirmation popup
#[derive(Debug, Clone)]
pub enum PendingAction {
    SwitchProfile(Profile),
    ClearUsage,
}

impl App {
    /// Create a new App instance and kick off the initial profile load
    pub fn new(
        config: Config,
        system_info: SystemInfo,
        state: Arc<AppState>,
        dry_run: bool,
        redraw_tx: mpsc::UnboundedSender<()>,
    ) -> Self {
        let theme = Theme::from_name(config.theme);

        let mut nav = NavModel::new(redraw_tx);
        nav.attach(Arc::clone(&state));
        nav.refresh();

        Self {
            should_quit: false,
            active_tab: Tab::Profiles,
            config,
            theme,
            system_info,
            dry_run,

            state,
            nav,

            profiles_cursor: 0,
            usage: UsageSummary::default(),
            processes: Vec::new(),
            toolbox_cursor: 0,
            settings_cursor: 0,

            popup: PopupState::None,
            flash_message: None,
            tick: 0,
        }
    }

    /// Check if the sidebar layout should be used
    pub fn should_use_sidebar(&self, terminal_width: u16) -> bool {
        match self.config.layout {
            crate::config::NavLayout::Sidebar => true,
            crate::config::NavLayout::TopTabs => false,
            crate::config::NavLayout::Auto => terminal_width >= 100,
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match &self.popup {
            PopupState::Confirm { .. } => self.handle_confirm_key(key),
            PopupState::Error { .. } | PopupState::Info { .. } => self.handle_dismiss_key(key),
            PopupState::None => self.handle_normal_key(key),
        }
    }

    /// Handle key in normal state
    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        // Global keys (work in all tabs)
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return Ok(());
            }
            KeyCode::Char(c @ '1'..='7') => {
                self.set_active_tab(Tab::from_index(c as usize - '1' as usize));
            }
            KeyCode::Char(']') => self.set_active_tab(self.active_tab.next()),
            KeyCode::Char('[') => self.set_active_tab(self.active_tab.prev()),
            KeyCode::Char('r') => {
                self.nav.refresh();
                return Ok(());
            }
            KeyCode::Char('?') => {
                self.set_active_tab(Tab::Help);
                return Ok(());
            }
            _ => {}
        }

        // Tab-specific handling
        match self.active_tab {
            Tab::Profiles => self.handle_profiles_key(key),
            Tab::Usage => Ok(()),
            Tab::Processes => self.handle_processes_key(key),
            Tab::Status => Ok(()),
            Tab::Toolbox => self.handle_toolbox_key(key),
            Tab::Settings => self.handle_settings_key(key),
            Tab::Help => Ok(()),
        }
    }

    /// Change the active tab and refresh its content
    fn set_active_tab(&mut self, tab: Tab) {
        if self.active_tab == tab {
            return;
        }
        self.active_tab = tab;

        match tab {
            Tab::Usage => self.reload_usage(),
            Tab::Processes => self.refresh_processes(),
            _ => {}
        }
    }

    /// Handle keys in the Profiles tab
    fn handle_profiles_key(&mut self, key: KeyEvent) -> Result<()> {
        let count = self.state.available().len();

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.profiles_cursor < count.saturating_sub(1) {
                    self.profiles_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.profiles_cursor = self.profiles_cursor.saturating_sub(1);
            }
            KeyCode::Char('g') => {
                self.profiles_cursor = 0;
            }
            KeyCode::Char('G') => {
                self.profiles_cursor = count.saturating_sub(1);
            }
            KeyCode::Enter => {
                self.prompt_switch();
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the Processes tab
    fn handle_processes_key(&mut self, key: KeyEvent) -> Result<()> {
        if let KeyCode::Char('p') = key.code {
            self.refresh_processes();
        }
        Ok(())
    }

    /// Handle keys in the Toolbox tab
    fn handle_toolbox_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.toolbox_cursor < TOOLBOX_ACTIONS.len() - 1 {
                    self.toolbox_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.toolbox_cursor = self.toolbox_cursor.saturating_sub(1);
            }
            KeyCode::Enter => self.run_toolbox_action(),
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the Settings tab
    fn handle_settings_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.settings_cursor < SETTINGS_COUNT - 1 {
                    self.settings_cursor += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.settings_cursor = self.settings_cursor.saturating_sub(1);
            }
            KeyCode::Enter => {
                // Toggle/cycle setting
                match self.settings_cursor {
                    0 => {
                        self.config.theme = self.config.theme.next();
                        self.theme = Theme::from_name(self.config.theme);
                    }
                    1 => self.config.layout = self.config.layout.next(),
                    2 => {
                        self.config.display.show_description =
                            !self.config.display.show_description
                    }
                    3 => self.config.display.show_tags = !self.config.display.show_tags,
                    4 => {
                        self.config.display.show_settings_count =
                            !self.config.display.show_settings_count
                    }
                    5 => self.config.display.show_modified = !self.config.display.show_modified,
                    _ => {}
                }
                // Save config
                if let Err(e) = self.config.save() {
                    self.show_error("Save Failed", &e.to_string());
                } else {
                    self.show_flash("Settings saved", false);
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in the confirm popup
    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let popup = std::mem::replace(&mut self.popup, PopupState::None);
                if let PopupState::Confirm { action, .. } = popup {
                    self.execute_pending_action(action);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.popup = PopupState::None;
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in error/info popups
    fn handle_dismiss_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('o') | KeyCode::Enter | KeyCode::Esc => {
                self.popup = PopupState::None;
            }
            _ => {}
        }
        Ok(())
    }

    /// Advance the housekeeping tick
    ///
    /// Clears expired flash messages and keeps the process list fresh while
    /// the Processes tab is visible.
    pub fn update_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);

        if let Some((_, _, shown_at)) = &self.flash_message {
            if shown_at.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }

        if self.active_tab == Tab::Processes && self.tick % 20 == 0 {
            self.refresh_processes();
        }
    }

    // === HELPER METHODS ===

    /// Profile under the cursor, if any
    pub fn selected_profile(&self) -> Option<Profile> {
        self.state.available().get(self.profiles_cursor).cloned()
    }

    /// Arm the switch confirmation for the profile under the cursor
    fn prompt_switch(&mut self) {
        let Some(profile) = self.selected_profile() else {
            return;
        };

        let active = self.state.current().map(|p| p.name);
        if active.as_deref() == Some(profile.name.as_str()) {
            self.show_flash("Profile is already active", false);
            return;
        }

        let detail = match (&profile.description, self.dry_run) {
            (_, true) => Some("Dry run: nothing will be written".to_string()),
            (Some(description), false) => Some(description.clone()),
            (None, false) => None,
        };

        self.popup = PopupState::Confirm {
            title: "Confirm Switch".into(),
            message: format!("Switch to profile '{}'?", profile.name),
            detail,
            action: PendingAction::SwitchProfile(profile),
        };
    }

    /// Execute a confirmed action
    fn execute_pending_action(&mut self, action: PendingAction) {
        match action {
            PendingAction::SwitchProfile(profile) => {
                self.show_flash(&format!("Switching to '{}'", profile.name), false);
                self.nav.switch_to(profile);
            }
            PendingAction::ClearUsage => {
                let path = self.state.usage_log().clone();
                match std::fs::remove_file(&path) {
                    Ok(()) => {
                        self.usage = UsageSummary::default();
                        self.show_flash("Usage history cleared", false);
                    }
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        self.show_flash("Usage history already empty", false);
                    }
                    Err(e) => self.show_error("Clear Failed", &e.to_string()),
                }
            }
        }
    }

    /// Run the toolbox entry under the cursor
    fn run_toolbox_action(&mut self) {
        match self.toolbox_cursor {
            0 => {
                self.nav.refresh();
                self.show_flash("Reloading profiles", false);
            }
            1 => match self.state.store().validate() {
                Ok(issues) if issues.is_empty() => {
                    self.show_flash("All profiles valid", false);
                }
                Ok(issues) => {
                    let report = issues
                        .iter()
                        .map(|issue| {
                            format!(
                                "{}: {}",
                                issue
                                    .file
                                    .file_name()
                                    .map(|n| n.to_string_lossy().into_owned())
                                    .unwrap_or_default(),
                                issue.error
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    self.show_error("Invalid Profiles", &report);
                }
                Err(e) => self.show_error("Validation Failed", &e.to_string()),
            },
            2 => {
                let message = format!(
                    "Profiles: {}\nConfig: {}\nUsage log: {}",
                    self.state.store().profiles_dir().display(),
                    self.system_info.config_dir.display(),
                    self.state.usage_log().display(),
                );
                self.popup = PopupState::Info {
                    title: "Storage Paths".into(),
                    message,
                };
            }
            3 => {
                self.popup = PopupState::Confirm {
                    title: "Confirm Clear".into(),
                    message: "Delete the usage event log?".into(),
                    detail: Some("This cannot be undone".into()),
                    action: PendingAction::ClearUsage,
                };
            }
            _ => {}
        }
    }

    /// Reload the aggregated usage statistics
    pub fn reload_usage(&mut self) {
        match usage::load_events(self.state.usage_log()) {
            Ok(events) => {
                self.usage = UsageSummary::from_events(&events, Local::now().date_naive());
            }
            Err(e) => self.show_flash(&format!("Usage log unreadable: {}", e), true),
        }
    }

    /// Refresh the process list
    pub fn refresh_processes(&mut self) {
        match sysmon::list_processes(
            &self.config.monitor.process_filter,
            self.config.monitor.max_rows,
        ) {
            Ok(processes) => self.processes = processes,
            Err(e) => self.show_flash(&format!("Process listing failed: {}", e), true),
        }
    }

    /// Show an error popup
    fn show_error(&mut self, title: &str, message: &str) {
        self.popup = PopupState::Error {
            title: title.into(),
            message: message.into(),
        };
    }

    /// Show a flash message
    fn show_flash(&mut self, message: &str, is_error: bool) {
        self.flash_message = Some((message.into(), is_error, Instant::now()));
    }
}
