//! Profile store: listing, switching, validation
//!
//! Profiles are TOML files under `<root>/profiles/`. The active profile is
//! recorded in `<root>/active`, and its settings are rendered to
//! `<root>/current.toml` — the file the managed tool actually reads.
//! Supports dry-run mode for safe testing.

use crate::types::Profile;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_PROFILE: &str = "# Seeded by confdeck on first run.\nname = \"default\"\ndescription = \"Default profile\"\n\n[settings]\n";

/// Outcome of a switch operation
#[derive(Debug, Clone)]
pub struct SwitchOutcome {
    pub success: bool,
    pub message: String,
}

/// A profile file that failed to parse
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub file: PathBuf,
    pub error: String,
}

/// Filesystem-backed profile store
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
    dry_run: bool,
}

impl ProfileStore {
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
        }
    }

    pub fn profiles_dir(&self) -> PathBuf {
        self.root.join("profiles")
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn active_path(&self) -> PathBuf {
        self.root.join("active")
    }

    fn current_path(&self) -> PathBuf {
        self.root.join("current.toml")
    }

    /// Create the on-disk layout, seeding a default profile when none exist
    pub fn ensure_layout(&self) -> Result<()> {
        let dir = self.profiles_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create profile directory {:?}", dir))?;

        if self.profile_files()?.is_empty() {
            let seed = dir.join("default.toml");
            fs::write(&seed, DEFAULT_PROFILE)
                .with_context(|| format!("Failed to seed default profile {:?}", seed))?;
        }

        Ok(())
    }

    /// List all profiles, sorted by name
    ///
    /// Files that fail to parse are skipped here; `validate()` reports them.
    pub fn list(&self) -> Result<Vec<Profile>> {
        let mut profiles = Vec::new();

        for path in self.profile_files()? {
            match load_profile(&path) {
                Ok(profile) => profiles.push(profile),
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "skipping unparseable profile");
                }
            }
        }

        profiles.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(profiles)
    }

    /// Name of the active profile, if a marker exists
    pub fn active_name(&self) -> Result<Option<String>> {
        let path = self.active_path();
        if !path.exists() {
            return Ok(None);
        }

        let name = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read active marker {:?}", path))?;
        let name = name.trim().to_string();

        Ok(if name.is_empty() { None } else { Some(name) })
    }

    /// Make `profile` the active one
    ///
    /// Writes the active marker and renders the profile's settings to
    /// `current.toml`. In dry-run mode, reports what would be written.
    pub fn switch(&self, profile: &Profile) -> Result<SwitchOutcome> {
        if self.dry_run {
            return Ok(SwitchOutcome {
                success: true,
                message: format!("Dry run: would switch to profile '{}'", profile.name),
            });
        }

        fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create store root {:?}", self.root))?;

        fs::write(self.active_path(), format!("{}\n", profile.name))
            .with_context(|| format!("Failed to write active marker {:?}", self.active_path()))?;

        let rendered = toml::to_string_pretty(&profile.settings)
            .context("Failed to render profile settings")?;
        fs::write(self.current_path(), rendered)
            .with_context(|| format!("Failed to write {:?}", self.current_path()))?;

        Ok(SwitchOutcome {
            success: true,
            message: format!("Switched to profile '{}'", profile.name),
        })
    }

    /// Parse every profile file and collect the ones that fail
    pub fn validate(&self) -> Result<Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        for path in self.profile_files()? {
            if let Err(e) = load_profile(&path) {
                issues.push(ValidationIssue {
                    file: path,
                    error: format!("{:#}", e),
                });
            }
        }

        Ok(issues)
    }

    /// All `.toml` files in the profile directory
    fn profile_files(&self) -> Result<Vec<PathBuf>> {
        let dir = self.profiles_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read profile directory {:?}", dir))?;

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        files.sort();

        Ok(files)
    }
}

/// Load and parse a single profile file
fn load_profile(path: &Path) -> Result<Profile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {:?}", path))?;

    let mut profile: Profile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse profile {:?}", path))?;

    if profile.name.is_empty() {
        profile.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    profile.path = path.to_path_buf();
    profile.modified = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .map(DateTime::<Local>::from);

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(files: &[(&str, &str)]) -> (TempDir, ProfileStore) {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path(), false);
        fs::create_dir_all(store.profiles_dir()).unwrap();
        for (name, content) in files {
            fs::write(store.profiles_dir().join(name), content).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_ensure_layout_seeds_default() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path(), false);

        store.ensure_layout().unwrap();

        let profiles = store.list().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "default");

        // A second call must not clobber anything
        store.ensure_layout().unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_sorted_and_named_from_stem() {
        let (_dir, store) = store_with(&[
            ("zeta.toml", "[settings]\nkey = \"z\""),
            ("Alpha.toml", "description = \"first\""),
            ("notes.txt", "not a profile"),
        ]);

        let profiles = store.list().unwrap();
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "Alpha");
        assert_eq!(profiles[1].name, "zeta");
        assert!(profiles[1].modified.is_some());
    }

    #[test]
    fn test_list_skips_unparseable() {
        let (_dir, store) = store_with(&[
            ("good.toml", "name = \"good\""),
            ("broken.toml", "name = [unclosed"),
        ]);

        let profiles = store.list().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "good");

        let issues = store.validate().unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].file.ends_with("broken.toml"));
    }

    #[test]
    fn test_switch_writes_marker_and_settings() {
        let (dir, store) = store_with(&[(
            "work.toml",
            "name = \"work\"\n[settings]\nendpoint = \"https://api.example.com\"",
        )]);

        assert_eq!(store.active_name().unwrap(), None);

        let profile = store.list().unwrap().remove(0);
        let outcome = store.switch(&profile).unwrap();
        assert!(outcome.success);

        assert_eq!(store.active_name().unwrap(), Some("work".to_string()));
        let rendered = fs::read_to_string(dir.path().join("current.toml")).unwrap();
        assert!(rendered.contains("endpoint"));
    }

    #[test]
    fn test_dry_run_switch_touches_nothing() {
        let (dir, _) = store_with(&[("work.toml", "name = \"work\"")]);
        let store = ProfileStore::new(dir.path(), true);

        let profile = store.list().unwrap().remove(0);
        let outcome = store.switch(&profile).unwrap();

        assert!(outcome.success);
        assert!(outcome.message.starts_with("Dry run"));
        assert_eq!(store.active_name().unwrap(), None);
        assert!(!dir.path().join("current.toml").exists());
    }
}
