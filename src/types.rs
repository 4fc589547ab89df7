//! Core data types for confdeck
//!
//! This module defines all shared data structures used throughout the application.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A named configuration profile
///
/// Profiles live as TOML files in the profile directory. The `name` field
/// defaults to the file stem when the file does not set one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub settings: BTreeMap<String, String>,
    #[serde(skip)]
    pub path: PathBuf,
    #[serde(skip)]
    pub modified: Option<DateTime<Local>>,
}

impl Profile {
    /// Format the modification time for display
    pub fn formatted_modified(&self) -> String {
        match &self.modified {
            Some(ts) => ts.format("%d.%m.%y %H:%M").to_string(),
            None => "-".to_string(),
        }
    }

    pub fn settings_count(&self) -> usize {
        self.settings.len()
    }
}

/// A running process as reported by the process monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub rss_kb: u64,
    pub elapsed: String,
    pub command: String,
}

impl ProcessInfo {
    /// Format resident memory for display
    pub fn formatted_memory(&self) -> String {
        format_bytes(self.rss_kb * 1024)
    }
}

/// A single entry in the usage event log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageEvent {
    pub timestamp: DateTime<Local>,
    pub profile: String,
    pub action: UsageAction,
}

/// What a usage event records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UsageAction {
    /// The active profile was changed
    Switch,
    /// A dashboard session started with this profile active
    Session,
}

/// Aggregated usage statistics for the Usage tab
#[derive(Debug, Clone, Default)]
pub struct UsageSummary {
    /// (profile name, event count), most used first
    pub per_profile: Vec<(String, usize)>,
    /// (day, event count) for the last seven days, oldest first
    pub daily: Vec<(NaiveDate, usize)>,
    pub total: usize,
}

impl UsageSummary {
    /// Aggregate raw events into per-profile and per-day counts
    ///
    /// `today` anchors the 7-day window so aggregation stays deterministic
    /// under test.
    pub fn from_events(events: &[UsageEvent], today: NaiveDate) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for event in events {
            *counts.entry(event.profile.as_str()).or_default() += 1;
        }

        let mut per_profile: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        per_profile.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let window_start = today - chrono::Duration::days(6);
        let mut daily: Vec<(NaiveDate, usize)> = (0..7)
            .map(|offset| (window_start + chrono::Duration::days(offset), 0))
            .collect();
        for event in events {
            let day = event.timestamp.date_naive();
            if let Some(slot) = daily.iter_mut().find(|(d, _)| *d == day) {
                slot.1 += 1;
            }
        }

        Self {
            per_profile,
            daily,
            total: events.len(),
        }
    }

    /// Peak daily count within the window (for bar scaling)
    pub fn daily_peak(&self) -> usize {
        self.daily.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }
}

/// Navigation tabs
///
/// Declaration order is rendering order; `all()` must stay in sync with the
/// variant list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Profiles,
    Usage,
    Processes,
    Status,
    Toolbox,
    Settings,
    Help,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[
            Tab::Profiles,
            Tab::Usage,
            Tab::Processes,
            Tab::Status,
            Tab::Toolbox,
            Tab::Settings,
            Tab::Help,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Profiles => 0,
            Tab::Usage => 1,
            Tab::Processes => 2,
            Tab::Status => 3,
            Tab::Toolbox => 4,
            Tab::Settings => 5,
            Tab::Help => 6,
        }
    }

    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Tab::Profiles,
            1 => Tab::Usage,
            2 => Tab::Processes,
            3 => Tab::Status,
            4 => Tab::Toolbox,
            5 => Tab::Settings,
            6 => Tab::Help,
            _ => Tab::Profiles,
        }
    }

    /// Stable string identifier (config files, log fields)
    pub fn id(&self) -> &'static str {
        match self {
            Tab::Profiles => "profiles",
            Tab::Usage => "usage",
            Tab::Processes => "processes",
            Tab::Status => "status",
            Tab::Toolbox => "toolbox",
            Tab::Settings => "settings",
            Tab::Help => "help",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Profiles => "Profiles",
            Tab::Usage => "Usage",
            Tab::Processes => "Processes",
            Tab::Status => "Status",
            Tab::Toolbox => "Toolbox",
            Tab::Settings => "Settings",
            Tab::Help => "Help",
        }
    }

    /// Glyph shown next to the label in the sidebar
    pub fn icon(&self) -> &'static str {
        match self {
            Tab::Profiles => "▤",
            Tab::Usage => "▲",
            Tab::Processes => "≣",
            Tab::Status => "●",
            Tab::Toolbox => "✦",
            Tab::Settings => "⚙",
            Tab::Help => "?",
        }
    }

    pub fn next(&self) -> Self {
        Self::from_index((self.index() + 1) % Self::all().len())
    }

    pub fn prev(&self) -> Self {
        let count = Self::all().len();
        Self::from_index((self.index() + count - 1) % count)
    }
}

// Helper functions

/// Format bytes to human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1500), "1.5 KB");
        assert_eq!(format_bytes(1_500_000), "1.4 MB");
        assert_eq!(format_bytes(1_500_000_000), "1.4 GB");
    }

    #[test]
    fn test_tab_order_is_stable() {
        for (i, tab) in Tab::all().iter().enumerate() {
            assert_eq!(tab.index(), i);
            assert_eq!(Tab::from_index(i), *tab);
        }
        // Out-of-range indices fall back to the first tab
        assert_eq!(Tab::from_index(99), Tab::Profiles);
    }

    #[test]
    fn test_tab_cycle_wraps() {
        assert_eq!(Tab::Help.next(), Tab::Profiles);
        assert_eq!(Tab::Profiles.prev(), Tab::Help);
        assert_eq!(Tab::Profiles.next(), Tab::Usage);
    }

    #[test]
    fn test_tab_ids_unique() {
        let mut ids: Vec<&str> = Tab::all().iter().map(|t| t.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), Tab::all().len());
    }

    #[test]
    fn test_profile_defaults_from_toml() {
        let profile: Profile =
            toml::from_str("name = \"work\"\n[settings]\nendpoint = \"https://api.example.com\"")
                .unwrap();
        assert_eq!(profile.name, "work");
        assert_eq!(profile.settings_count(), 1);
        assert!(profile.tags.is_empty());
    }

    #[test]
    fn test_usage_summary_counts() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let at = |d: u32| Local.with_ymd_and_hms(2026, 8, d, 12, 0, 0).unwrap();
        let events = vec![
            UsageEvent { timestamp: at(6), profile: "work".into(), action: UsageAction::Switch },
            UsageEvent { timestamp: at(6), profile: "work".into(), action: UsageAction::Session },
            UsageEvent { timestamp: at(5), profile: "default".into(), action: UsageAction::Switch },
            // Outside the 7-day window: counted per profile, not per day
            UsageEvent { timestamp: at(1), profile: "default".into(), action: UsageAction::Switch },
        ];

        let summary = UsageSummary::from_events(&events, today);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.per_profile[0], ("default".into(), 2));
        assert_eq!(summary.per_profile[1], ("work".into(), 2));
        assert_eq!(summary.daily.len(), 7);
        assert_eq!(summary.daily_peak(), 2);
        let day_total: usize = summary.daily.iter().map(|(_, c)| c).sum();
        assert_eq!(day_total, 3);
    }

    #[test]
    fn test_usage_tie_breaks_by_name() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        let at = Local.with_ymd_and_hms(2026, 8, 6, 9, 0, 0).unwrap();
        let events = vec![
            UsageEvent { timestamp: at, profile: "b".into(), action: UsageAction::Switch },
            UsageEvent { timestamp: at, profile: "a".into(), action: UsageAction::Switch },
        ];
        let summary = UsageSummary::from_events(&events, today);
        assert_eq!(summary.per_profile[0].0, "a");
    }
}
