//! Shared application state
//!
//! [`AppState`] is the single source of truth for profile data: the current
//! profile, the available list, and the loading flag, each behind a watch
//! channel so the navigation model can subscribe. The async operations
//! publish `loading = true` before their first await point; the navigation
//! model's pre-start guards depend on that ordering.
//!
//! Failures of the delegated store operations are surfaced here (logged),
//! never propagated to the navigation model.

use crate::nav::ConfigState;
use crate::profiles::{usage, ProfileStore, SwitchOutcome};
use crate::types::{Profile, UsageAction};
use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::watch;

pub struct AppState {
    current: watch::Sender<Option<Profile>>,
    available: watch::Sender<Vec<Profile>>,
    loading: watch::Sender<bool>,
    store: ProfileStore,
    usage_log: PathBuf,
}

impl AppState {
    pub fn new(store: ProfileStore, usage_log: PathBuf) -> Self {
        Self {
            current: watch::Sender::new(None),
            available: watch::Sender::new(Vec::new()),
            loading: watch::Sender::new(false),
            store,
            usage_log,
        }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn usage_log(&self) -> &PathBuf {
        &self.usage_log
    }

    /// Snapshot of the available profile list
    pub fn available(&self) -> Vec<Profile> {
        self.available.borrow().clone()
    }

    /// Snapshot of the current profile
    pub fn current(&self) -> Option<Profile> {
        self.current.borrow().clone()
    }

    /// Snapshot of the loading flag
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }
}

#[async_trait]
impl ConfigState for AppState {
    fn current_rx(&self) -> watch::Receiver<Option<Profile>> {
        self.current.subscribe()
    }

    fn available_rx(&self) -> watch::Receiver<Vec<Profile>> {
        self.available.subscribe()
    }

    fn loading_rx(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    fn current(&self) -> Option<Profile> {
        AppState::current(self)
    }

    fn is_loading(&self) -> bool {
        AppState::is_loading(self)
    }

    /// Reload the profile list and re-resolve the active profile
    async fn load_profiles(&self) {
        // Published before the first await; the refresh/switch guards rely
        // on observing it.
        self.loading.send_replace(true);

        let store = self.store.clone();
        let result =
            tokio::task::spawn_blocking(move || -> Result<(Vec<Profile>, Option<String>)> {
                let profiles = store.list()?;
                let active = store.active_name()?;
                Ok((profiles, active))
            })
            .await;

        match result {
            Ok(Ok((profiles, active))) => {
                let current = active
                    .and_then(|name| profiles.iter().find(|p| p.name == name).cloned());
                tracing::debug!(count = profiles.len(), "profiles reloaded");
                self.available.send_replace(profiles);
                self.current.send_replace(current);
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %format!("{:#}", e), "profile reload failed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile reload task panicked");
            }
        }

        self.loading.send_replace(false);
    }

    /// Switch the active profile through the store
    async fn switch_profile(&self, profile: Profile) {
        self.loading.send_replace(true);

        let store = self.store.clone();
        let usage_log = self.usage_log.clone();
        let target = profile.clone();
        let result = tokio::task::spawn_blocking(move || -> Result<SwitchOutcome> {
            let outcome = store.switch(&target)?;
            if outcome.success && !store.is_dry_run() {
                usage::record(&usage_log, &target.name, UsageAction::Switch)?;
            }
            Ok(outcome)
        })
        .await;

        match result {
            Ok(Ok(outcome)) if outcome.success => {
                tracing::info!(profile = %profile.name, message = %outcome.message, "profile switch");
                self.current.send_replace(Some(profile));
            }
            Ok(Ok(outcome)) => {
                tracing::warn!(message = %outcome.message, "profile switch rejected");
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %format!("{:#}", e), "profile switch failed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile switch task panicked");
            }
        }

        self.loading.send_replace(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn state_with(files: &[(&str, &str)]) -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path(), false);
        fs::create_dir_all(store.profiles_dir()).unwrap();
        for (name, content) in files {
            fs::write(store.profiles_dir().join(name), content).unwrap();
        }
        let usage_log = usage::log_path(&dir.path().join("data"));
        let state = AppState::new(store, usage_log);
        (dir, state)
    }

    #[tokio::test]
    async fn load_publishes_list_and_resolves_current() {
        let (dir, state) = state_with(&[
            ("default.toml", "name = \"default\""),
            ("work.toml", "name = \"work\""),
        ]);
        fs::write(dir.path().join("active"), "work\n").unwrap();

        state.load_profiles().await;

        let available = state.available();
        assert_eq!(available.len(), 2);
        assert_eq!(state.current().map(|p| p.name), Some("work".to_string()));
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn load_without_marker_leaves_current_empty() {
        let (_dir, state) = state_with(&[("default.toml", "name = \"default\"")]);

        state.load_profiles().await;

        assert_eq!(state.available().len(), 1);
        assert!(state.current().is_none());
    }

    #[tokio::test]
    async fn loading_flag_is_published_before_first_await() {
        let (_dir, state) = state_with(&[("default.toml", "name = \"default\"")]);

        let fut = state.load_profiles();
        tokio::pin!(fut);
        let _ = futures_util::poll!(fut.as_mut());
        // The first poll runs to the first await point, past the publish
        assert!(state.is_loading());

        fut.await;
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn switch_updates_current_marker_and_usage() {
        let (dir, state) = state_with(&[("work.toml", "name = \"work\"")]);
        state.load_profiles().await;
        let profile = state.available().remove(0);

        state.switch_profile(profile).await;

        assert_eq!(state.current().map(|p| p.name), Some("work".to_string()));
        assert_eq!(
            fs::read_to_string(dir.path().join("active")).unwrap().trim(),
            "work"
        );
        let events = usage::load_events(state.usage_log()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].profile, "work");
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn dry_run_switch_records_no_usage() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path(), true);
        fs::create_dir_all(store.profiles_dir()).unwrap();
        fs::write(store.profiles_dir().join("work.toml"), "name = \"work\"").unwrap();
        let state = AppState::new(store, usage::log_path(&dir.path().join("data")));
        state.load_profiles().await;
        let profile = state.available().remove(0);

        state.switch_profile(profile).await;

        // In-memory current still tracks the previewed switch
        assert_eq!(state.current().map(|p| p.name), Some("work".to_string()));
        assert!(usage::load_events(state.usage_log()).unwrap().is_empty());
        assert!(!dir.path().join("active").exists());
    }
}
