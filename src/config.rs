//! Configuration management for confdeck
//!
//! Handles loading, saving, and default configuration values.
//! Config file location: ~/.config/confdeck/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeName,
    pub layout: NavLayout,
    pub display: DisplayOptions,
    pub monitor: MonitorOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeName::Gruvbox,
            layout: NavLayout::Auto,
            display: DisplayOptions::default(),
            monitor: MonitorOptions::default(),
        }
    }
}

impl Config {
    /// Root directory for config and profiles
    pub fn config_root() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Could not determine config directory")?
            .join("confdeck"))
    }

    /// Root directory for the usage log and application log
    pub fn data_root() -> Result<PathBuf> {
        Ok(dirs::data_dir()
            .context("Could not determine data directory")?
            .join("confdeck"))
    }

    /// Get the config file path
    pub fn path() -> Result<PathBuf> {
        Ok(Self::config_root()?.join("config.toml"))
    }

    /// Load config from file, or create default if not exists
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            let config = Config::default();
            config.save()?;
            return Ok(config);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }
}

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Gruvbox,
    Nord,
    Transparent,
}

impl ThemeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Gruvbox => "Gruvbox",
            ThemeName::Nord => "Nord",
            ThemeName::Transparent => "Transparent",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemeName::Gruvbox => ThemeName::Nord,
            ThemeName::Nord => ThemeName::Transparent,
            ThemeName::Transparent => ThemeName::Gruvbox,
        }
    }
}

/// How the navigation chrome is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NavLayout {
    #[default]
    Auto,
    Sidebar,
    TopTabs,
}

impl NavLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavLayout::Auto => "Auto (responsive)",
            NavLayout::Sidebar => "Sidebar",
            NavLayout::TopTabs => "Top tabs",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            NavLayout::Auto => NavLayout::Sidebar,
            NavLayout::Sidebar => NavLayout::TopTabs,
            NavLayout::TopTabs => NavLayout::Auto,
        }
    }
}

/// Display options for the Profiles tab
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub show_description: bool,
    pub show_tags: bool,
    pub show_settings_count: bool,
    pub show_modified: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_description: true,
            show_tags: false,
            show_settings_count: true,
            show_modified: true,
        }
    }
}

/// Options for the process monitor tab
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorOptions {
    /// Substring filter on the command name; empty shows everything
    pub process_filter: String,
    pub max_rows: usize,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            process_filter: String::new(),
            max_rows: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, ThemeName::Gruvbox);
        assert_eq!(config.layout, NavLayout::Auto);
        assert!(config.display.show_description);
        assert_eq!(config.monitor.max_rows, 30);
    }

    #[test]
    fn test_theme_cycle() {
        let theme = ThemeName::Gruvbox;
        assert_eq!(theme.next(), ThemeName::Nord);
        assert_eq!(theme.next().next(), ThemeName::Transparent);
        assert_eq!(theme.next().next().next(), ThemeName::Gruvbox);
    }

    #[test]
    fn test_layout_cycle() {
        let layout = NavLayout::Auto;
        assert_eq!(layout.next(), NavLayout::Sidebar);
        assert_eq!(layout.next().next().next(), NavLayout::Auto);
    }

    #[test]
    fn test_partial_config_parses() {
        // Missing sections fall back to defaults
        let config: Config = toml::from_str("theme = \"nord\"").unwrap();
        assert_eq!(config.theme, ThemeName::Nord);
        assert_eq!(config.layout, NavLayout::Auto);
        assert!(config.monitor.process_filter.is_empty());
    }
}
