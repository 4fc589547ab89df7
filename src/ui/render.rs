//! Main rendering module
//!
//! Handles rendering the complete UI including:
//! - Navigation chrome (sidebar or top tab bar, per config)
//! - Active tab content
//! - Popups and overlays
//! - Status bar

use crate::app::{App, PopupState, TOOLBOX_ACTIONS};
use crate::types::Tab;
use crate::ui::widgets;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

/// Main render function - entry point for all UI rendering
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.should_use_sidebar(area.width) {
        // Sidebar layout: nav column on the left, content on the right
        let rows = Layout::vertical([
            Constraint::Min(10),   // Nav + content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        let columns = Layout::horizontal([
            Constraint::Length(26), // Sidebar
            Constraint::Min(40),    // Content
        ])
        .split(rows[0]);

        render_sidebar(frame, app, columns[0]);
        render_tab_content(frame, app, columns[1]);
        render_status_bar(frame, app, rows[1]);
    } else {
        // Compact layout: tab bar on top
        let rows = Layout::vertical([
            Constraint::Length(3), // Header + tabs
            Constraint::Min(10),   // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        render_top_bar(frame, app, rows[0]);
        render_tab_content(frame, app, rows[1]);
        render_status_bar(frame, app, rows[2]);
    }

    // Render popup overlays (if any)
    render_popups(frame, app, area);
}

/// Render the sidebar: header, nav items, footer
fn render_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .style(theme.text())
        .title(" confdeck ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::vertical([
        Constraint::Length(2),                         // Header: hostname
        Constraint::Length(Tab::all().len() as u16),   // Nav items
        Constraint::Min(0),                            // Spacer
        Constraint::Length(2),                         // Footer
    ])
    .split(inner);

    // Header region
    let header = Paragraph::new(vec![
        Line::styled(format!(" {}", app.system_info.hostname), theme.text_dim()),
        Line::raw(""),
    ]);
    frame.render_widget(header, sections[0]);

    // One selectable row per tab, in registry order
    let items: Vec<ListItem> = Tab::all()
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let style = if app.active_tab == *tab {
                theme.tab_active()
            } else {
                theme.tab_inactive()
            };
            ListItem::new(Line::styled(
                format!(" {} {} {}", i + 1, tab.icon(), tab.label()),
                style,
            ))
        })
        .collect();
    frame.render_widget(List::new(items), sections[1]);

    // Footer region: active profile, busy spinner, quit hint
    let profile_line = match app.state.current() {
        Some(profile) => Line::from(vec![
            Span::styled(" ● ", theme.marker_active()),
            Span::styled(profile.name, theme.text()),
        ]),
        None => Line::styled(" ○ no active profile", theme.text_dim()),
    };

    let busy = app.state.is_loading() || app.nav.refresh_in_flight();
    let hint_line = if busy {
        Line::styled(
            format!(" {} loading…", widgets::spinner_glyph(app.tick)),
            theme.warning(),
        )
    } else {
        Line::styled(" [q] Quit", theme.text_dim())
    };

    frame.render_widget(Paragraph::new(vec![profile_line, hint_line]), sections[3]);
}

/// Render header with hostname and tab bar (compact layout)
fn render_top_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let header_block = Block::default()
        .style(theme.text())
        .title(format!(" confdeck · {} ", app.system_info.hostname))
        .title_style(theme.title())
        .borders(Borders::BOTTOM)
        .border_style(theme.border());

    frame.render_widget(header_block, area);

    let tab_titles: Vec<Line> = Tab::all()
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let style = if app.active_tab == *tab {
                theme.tab_active()
            } else {
                theme.tab_inactive()
            };
            Line::styled(format!("[{}] {}", i + 1, tab.label()), style)
        })
        .collect();

    let tabs = Tabs::new(tab_titles)
        .select(app.active_tab.index())
        .divider(" │ ")
        .style(theme.text());

    let tabs_area = Rect {
        x: area.x + 2,
        y: area.y + 1,
        width: area.width.saturating_sub(4),
        height: 1,
    };
    frame.render_widget(tabs, tabs_area);
}

/// Render the active tab's content
fn render_tab_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.active_tab {
        Tab::Profiles => render_profiles_tab(frame, app, area),
        Tab::Usage => render_usage_tab(frame, app, area),
        Tab::Processes => render_processes_tab(frame, app, area),
        Tab::Status => render_status_tab(frame, app, area),
        Tab::Toolbox => render_toolbox_tab(frame, app, area),
        Tab::Settings => render_settings_tab(frame, app, area),
        Tab::Help => render_help_tab(frame, app, area),
    }
}

/// Render status bar with keybindings
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let hints = match app.active_tab {
        Tab::Profiles => "[j/k] Navigate  [Enter] Switch  [r] Reload  [?] Help  [q] Quit",
        Tab::Usage => "[r] Reload  [?] Help  [q] Quit",
        Tab::Processes => "[p] Refresh List  [?] Help  [q] Quit",
        Tab::Status => "[?] Help  [q] Quit",
        Tab::Toolbox => "[j/k] Navigate  [Enter] Run  [q] Quit",
        Tab::Settings => "[j/k] Navigate  [Enter] Change  [q] Quit",
        Tab::Help => "[1-7] Tabs  [q] Quit",
    };

    let right = if app.dry_run { "dry-run" } else { "" };
    widgets::render_status_bar(frame, hints, right, theme, area);
}

/// Render popups if active
fn render_popups(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    match &app.popup {
        PopupState::None => {}

        PopupState::Confirm {
            title,
            message,
            detail,
            ..
        } => {
            widgets::render_confirm_popup(frame, title, message, detail.as_deref(), theme, area);
        }

        PopupState::Error { title, message } => {
            widgets::render_error_popup(frame, title, message, theme, area);
        }

        PopupState::Info { title, message } => {
            widgets::render_info_popup(frame, title, message, theme, area);
        }
    }

    // Flash message (success/error feedback)
    if let Some((msg, is_error, _)) = &app.flash_message {
        widgets::render_flash_message(frame, msg, *is_error, theme, area);
    }
}

// === TAB RENDERERS ===

/// Profiles tab: the available profile list with the active one marked
fn render_profiles_tab(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let profiles = app.state.available();
    let active_name = app.state.current().map(|p| p.name);

    let block = Block::default()
        .style(theme.text())
        .title(format!(" Profiles ({}) ", profiles.len()))
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if profiles.is_empty() {
        let message = if app.state.is_loading() {
            "Loading profiles…"
        } else {
            "No profiles found"
        };
        let empty = Paragraph::new(message)
            .style(theme.text_dim())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let display = &app.config.display;
    let items: Vec<ListItem> = profiles
        .iter()
        .enumerate()
        .map(|(i, profile)| {
            let is_active = active_name.as_deref() == Some(profile.name.as_str());
            let is_selected = i == app.profiles_cursor;

            let marker = if is_active { "● " } else { "  " };
            let mut spans = vec![
                Span::styled(marker, theme.marker_active()),
                Span::styled(
                    format!("{:<16}", profile.name),
                    if is_selected { theme.selected() } else { theme.text() },
                ),
            ];

            if display.show_description {
                if let Some(description) = &profile.description {
                    spans.push(Span::styled(format!(" {}", description), theme.text_dim()));
                }
            }
            if display.show_tags && !profile.tags.is_empty() {
                spans.push(Span::styled(
                    format!(" [{}]", profile.tags.join(", ")),
                    theme.bar(),
                ));
            }
            if display.show_settings_count {
                spans.push(Span::styled(
                    format!(" ({} settings)", profile.settings_count()),
                    theme.text_dim(),
                ));
            }
            if display.show_modified {
                spans.push(Span::styled(
                    format!("  {}", profile.formatted_modified()),
                    theme.text_dim(),
                ));
            }

            let line = Line::from(spans);
            if is_selected {
                ListItem::new(line).style(theme.selected())
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

/// Usage tab: aggregated event counts
fn render_usage_tab(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let usage = &app.usage;

    let block = Block::default()
        .style(theme.text())
        .title(format!(" Usage ({} events) ", usage.total))
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if usage.total == 0 {
        let empty = Paragraph::new("No usage recorded yet")
            .style(theme.text_dim())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let mut lines: Vec<Line> = vec![Line::styled("By profile", theme.title())];
    let profile_peak = usage
        .per_profile
        .first()
        .map(|(_, count)| *count)
        .unwrap_or(0);
    for (name, count) in usage.per_profile.iter().take(10) {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<16}", name), theme.text()),
            Span::styled(widgets::bar_string(*count, profile_peak, 20), theme.bar()),
            Span::styled(format!(" {}", count), theme.text_dim()),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled("Last 7 days", theme.title()));
    let daily_peak = usage.daily_peak();
    for (day, count) in &usage.daily {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<16}", day.format("%a %d.%m")), theme.text()),
            Span::styled(widgets::bar_string(*count, daily_peak, 20), theme.bar()),
            Span::styled(format!(" {}", count), theme.text_dim()),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Processes tab: live process table
fn render_processes_tab(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let filter = &app.config.monitor.process_filter;

    let title = if filter.is_empty() {
        format!(" Processes ({}) ", app.processes.len())
    } else {
        format!(" Processes ({}) · filter: {} ", app.processes.len(), filter)
    };

    let block = Block::default()
        .style(theme.text())
        .title(title)
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.processes.is_empty() {
        let empty = Paragraph::new("No matching processes")
            .style(theme.text_dim())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let header = Row::new(vec!["PID", "MEM", "TIME", "COMMAND"]).style(theme.title());
    let rows: Vec<Row> = app
        .processes
        .iter()
        .map(|process| {
            Row::new(vec![
                Cell::from(process.pid.to_string()),
                Cell::from(process.formatted_memory()),
                Cell::from(process.elapsed.clone()),
                Cell::from(process.command.clone()),
            ])
            .style(theme.text())
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Min(20),
        ],
    )
    .header(header);

    frame.render_widget(table, inner);
}

/// Status tab: host environment and store facts
fn render_status_tab(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let info = &app.system_info;

    let block = Block::default()
        .style(theme.text())
        .title(" Status ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let kv = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {:<16}", label), theme.text_dim()),
            Span::styled(value, theme.text()),
        ])
    };

    let active = app
        .state
        .current()
        .map(|p| p.name)
        .unwrap_or_else(|| "none".to_string());
    let mode = if app.dry_run { "dry-run" } else { "live" };

    let lines = vec![
        Line::raw(""),
        kv("Host", info.hostname.clone()),
        kv("User", info.username.clone()),
        kv("OS", info.os.to_string()),
        kv("Kernel", info.kernel.clone().unwrap_or_else(|| "-".into())),
        Line::raw(""),
        kv("Config dir", info.config_dir.display().to_string()),
        kv("Data dir", info.data_dir.display().to_string()),
        Line::raw(""),
        kv("Profiles", app.state.available().len().to_string()),
        kv("Active", active),
        kv("Mode", mode.to_string()),
        kv(
            "Loading",
            if app.state.is_loading() { "yes" } else { "no" }.to_string(),
        ),
    ];

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Toolbox tab: one-shot maintenance actions
fn render_toolbox_tab(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .style(theme.text())
        .title(" Toolbox ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items: Vec<ListItem> = TOOLBOX_ACTIONS
        .iter()
        .enumerate()
        .map(|(i, (label, description))| {
            let selected = i == app.toolbox_cursor;
            let line = Line::from(vec![
                Span::styled(
                    format!(" {:<22}", label),
                    if selected { theme.selected() } else { theme.text() },
                ),
                Span::styled((*description).to_string(), theme.text_dim()),
            ]);
            if selected {
                ListItem::new(line).style(theme.selected())
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

/// Settings tab: theme, layout and display toggles
fn render_settings_tab(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let config = &app.config;

    let block = Block::default()
        .style(theme.text())
        .title(" Settings ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let on_off = |value: bool| if value { "on" } else { "off" };
    let entries: [(&str, String); 6] = [
        ("Theme", config.theme.as_str().to_string()),
        ("Navigation layout", config.layout.as_str().to_string()),
        ("Show description", on_off(config.display.show_description).to_string()),
        ("Show tags", on_off(config.display.show_tags).to_string()),
        ("Show settings count", on_off(config.display.show_settings_count).to_string()),
        ("Show modified time", on_off(config.display.show_modified).to_string()),
    ];

    let items: Vec<ListItem> = entries
        .iter()
        .enumerate()
        .map(|(i, (label, value))| {
            let selected = i == app.settings_cursor;
            let line = Line::from(vec![
                Span::styled(
                    format!(" {:<22}", label),
                    if selected { theme.selected() } else { theme.text() },
                ),
                Span::styled(value.clone(), theme.tab_active()),
            ]);
            if selected {
                ListItem::new(line).style(theme.selected())
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

/// Help tab: keybindings reference
fn render_help_tab(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .style(theme.text())
        .title(" Help ")
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let section = |title: &str| Line::styled(title.to_string(), theme.title());
    let binding = |keys: &str, action: &str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", keys), theme.tab_active()),
            Span::styled(action.to_string(), theme.text()),
        ])
    };

    let lines = vec![
        Line::raw(""),
        section("Navigation"),
        binding("1-7", "Jump to tab"),
        binding("] / [", "Next / previous tab"),
        binding("j/k", "Move cursor"),
        binding("g/G", "First / last entry"),
        Line::raw(""),
        section("Actions"),
        binding("Enter", "Select / confirm"),
        binding("r", "Reload profiles"),
        binding("p", "Refresh process list (Processes tab)"),
        binding("q", "Quit"),
        Line::raw(""),
        section("Tabs"),
        binding("1 Profiles", "Switch the active configuration profile"),
        binding("2 Usage", "Switch and session statistics"),
        binding("3 Processes", "Live process monitor"),
        binding("4 Status", "Host and store information"),
        binding("5 Toolbox", "Maintenance actions"),
        binding("6 Settings", "Theme, layout, display options"),
        binding("7 Help", "This screen"),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
