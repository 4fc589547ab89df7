//! Navigation model: state subscriptions and refresh/switch coordination
//!
//! The [`NavModel`] sits between the UI and the shared application state.
//! It owns three field subscriptions (current profile, available profiles,
//! loading flag), de-duplicates their updates, and republishes every
//! observably distinct change as a unit on the redraw channel. It also
//! coordinates the two imperative operations: `refresh` (at most one
//! in-flight task, last request wins) and `switch_to` (fire-and-forget,
//! guarded before start).

use crate::types::Profile;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Observable configuration state consumed by the navigation model
///
/// Implemented by [`crate::state::AppState`]; tests substitute mocks.
/// Implementations must publish `loading = true` before the first await
/// point of both async operations, so the model's pre-start checks cannot
/// race a switch that has already begun.
#[async_trait]
pub trait ConfigState: Send + Sync + 'static {
    fn current_rx(&self) -> watch::Receiver<Option<Profile>>;
    fn available_rx(&self) -> watch::Receiver<Vec<Profile>>;
    fn loading_rx(&self) -> watch::Receiver<bool>;

    /// Snapshot of the current profile
    fn current(&self) -> Option<Profile>;
    /// Snapshot of the loading flag
    fn is_loading(&self) -> bool;

    /// Reload the profile list from the backing store
    async fn load_profiles(&self);
    /// Make `profile` the active one
    async fn switch_profile(&self, profile: Profile);
}

/// Coordinates state subscriptions, refresh and switch for the navigation UI
///
/// All methods are driven from the main loop task. Every guard condition
/// (unattached, already loading, already active) is a silent no-op.
pub struct NavModel<S: ConfigState> {
    state: Option<Arc<S>>,
    subscriptions: Vec<JoinHandle<()>>,
    refresh_task: Option<JoinHandle<()>>,
    redraw_tx: mpsc::UnboundedSender<()>,
}

impl<S: ConfigState> NavModel<S> {
    /// Create a model publishing redraw signals on `redraw_tx`
    pub fn new(redraw_tx: mpsc::UnboundedSender<()>) -> Self {
        Self {
            state: None,
            subscriptions: Vec::new(),
            refresh_task: None,
            redraw_tx,
        }
    }

    /// Bind the model to a state instance and subscribe to its fields
    ///
    /// Idempotent for the identical instance. A different instance replaces
    /// the whole subscription set; updates from the previous instance can no
    /// longer reach the redraw channel.
    pub fn attach(&mut self, state: Arc<S>) {
        if let Some(attached) = &self.state {
            if Arc::ptr_eq(attached, &state) {
                return;
            }
        }

        self.clear_subscriptions();

        // Current profile changes only matter when the name changes.
        self.subscriptions.push(watch_field(
            state.current_rx(),
            |a, b| profile_name(a) == profile_name(b),
            self.redraw_tx.clone(),
        ));
        self.subscriptions.push(watch_field(
            state.available_rx(),
            |a, b| a == b,
            self.redraw_tx.clone(),
        ));
        self.subscriptions.push(watch_field(
            state.loading_rx(),
            |a, b| a == b,
            self.redraw_tx.clone(),
        ));

        self.state = Some(state);
    }

    /// Reload the profile list
    ///
    /// Cancels any outstanding refresh first (last request wins). A no-op
    /// while the state already reports loading.
    pub fn refresh(&mut self) {
        let Some(state) = &self.state else {
            return;
        };

        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }

        if state.is_loading() {
            return;
        }

        let state = Arc::clone(state);
        self.refresh_task = Some(tokio::spawn(async move {
            state.load_profiles().await;
        }));
    }

    /// Switch the active profile
    ///
    /// No-op while loading or when `profile` is already active (by name).
    /// Once started, a switch runs to completion; it is never cancelled.
    pub fn switch_to(&self, profile: Profile) {
        let Some(state) = &self.state else {
            return;
        };

        if state.is_loading() {
            return;
        }

        let current_name = state.current().map(|p| p.name);
        if current_name.as_deref() == Some(profile.name.as_str()) {
            return;
        }

        let state = Arc::clone(state);
        tokio::spawn(async move {
            state.switch_profile(profile).await;
        });
    }

    /// Whether a refresh task is currently live
    pub fn refresh_in_flight(&self) -> bool {
        self.refresh_task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    fn clear_subscriptions(&mut self) {
        for task in self.subscriptions.drain(..) {
            task.abort();
        }
    }
}

impl<S: ConfigState> Drop for NavModel<S> {
    fn drop(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
        self.clear_subscriptions();
    }
}

fn profile_name(profile: &Option<Profile>) -> Option<&str> {
    profile.as_ref().map(|p| p.name.as_str())
}

/// Forward one redraw signal per observably distinct change on `rx`
///
/// `is_same` is the field's equality predicate; redundant publishes from
/// the state are swallowed here.
fn watch_field<T, F>(
    mut rx: watch::Receiver<T>,
    is_same: F,
    redraw_tx: mpsc::UnboundedSender<()>,
) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(&T, &T) -> bool + Send + 'static,
{
    tokio::spawn(async move {
        let mut last = rx.borrow().clone();
        while rx.changed().await.is_ok() {
            let next = rx.borrow_and_update().clone();
            if is_same(&last, &next) {
                continue;
            }
            last = next;
            if redraw_tx.send(()).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::sync::Notify;
    use tokio::task::yield_now;

    /// Test double with manually driven fields and a gated load operation
    struct MockState {
        current: watch::Sender<Option<Profile>>,
        available: watch::Sender<Vec<Profile>>,
        loading: watch::Sender<bool>,
        load_started: AtomicUsize,
        load_finished: AtomicUsize,
        release_load: Notify,
        switch_calls: AtomicUsize,
        last_switched: Mutex<Option<String>>,
    }

    impl MockState {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                current: watch::Sender::new(None),
                available: watch::Sender::new(Vec::new()),
                loading: watch::Sender::new(false),
                load_started: AtomicUsize::new(0),
                load_finished: AtomicUsize::new(0),
                release_load: Notify::new(),
                switch_calls: AtomicUsize::new(0),
                last_switched: Mutex::new(None),
            })
        }

        fn set_current(&self, profile: Option<Profile>) {
            self.current.send_replace(profile);
        }

        fn set_available(&self, profiles: Vec<Profile>) {
            self.available.send_replace(profiles);
        }

        fn set_loading(&self, loading: bool) {
            self.loading.send_replace(loading);
        }
    }

    #[async_trait]
    impl ConfigState for MockState {
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
            self.current.borrow().clone()
        }

        fn is_loading(&self) -> bool {
            *self.loading.borrow()
        }

        async fn load_profiles(&self) {
            self.load_started.fetch_add(1, Ordering::SeqCst);
            self.release_load.notified().await;
            self.load_finished.fetch_add(1, Ordering::SeqCst);
        }

        async fn switch_profile(&self, profile: Profile) {
            self.switch_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_switched.lock().unwrap() = Some(profile.name);
        }
    }

    fn profile(name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Let spawned tasks make progress on the current-thread runtime
    async fn drain() {
        for _ in 0..8 {
            yield_now().await;
        }
    }

    fn count_redraws(rx: &mut mpsc::UnboundedReceiver<()>) -> usize {
        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        count
    }

    #[tokio::test]
    async fn repeated_attach_with_same_state_is_idempotent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut nav = NavModel::new(tx);
        let state = MockState::new();

        nav.attach(Arc::clone(&state));
        nav.attach(Arc::clone(&state));
        nav.attach(Arc::clone(&state));
        drain().await;
        assert_eq!(count_redraws(&mut rx), 0);

        // One underlying change must produce exactly one signal
        state.set_loading(true);
        drain().await;
        assert_eq!(count_redraws(&mut rx), 1);
    }

    #[tokio::test]
    async fn reattach_replaces_subscriptions() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut nav = NavModel::new(tx);
        let old_state = MockState::new();
        let new_state = MockState::new();

        nav.attach(Arc::clone(&old_state));
        nav.attach(Arc::clone(&new_state));
        drain().await;

        // The replaced state's publishes must not reach the redraw channel
        old_state.set_loading(true);
        drain().await;
        assert_eq!(count_redraws(&mut rx), 0);

        new_state.set_loading(true);
        drain().await;
        assert_eq!(count_redraws(&mut rx), 1);
    }

    #[tokio::test]
    async fn updates_are_deduplicated_per_field() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut nav = NavModel::new(tx);
        let state = MockState::new();
        nav.attach(Arc::clone(&state));

        // Redundant list publish: one distinct change, one signal
        state.set_available(vec![profile("default")]);
        state.set_available(vec![profile("default")]);
        drain().await;
        assert_eq!(count_redraws(&mut rx), 1);

        // Current profile equality is by name: a changed description with
        // the same name is not an observable change
        state.set_current(Some(profile("work")));
        drain().await;
        assert_eq!(count_redraws(&mut rx), 1);

        let mut renamed_description = profile("work");
        renamed_description.description = Some("same name, new text".into());
        state.set_current(Some(renamed_description));
        drain().await;
        assert_eq!(count_redraws(&mut rx), 0);
    }

    #[tokio::test]
    async fn refresh_while_loading_starts_nothing() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut nav = NavModel::new(tx);
        let state = MockState::new();
        nav.attach(Arc::clone(&state));

        state.set_loading(true);
        nav.refresh();
        drain().await;

        assert!(!nav.refresh_in_flight());
        assert_eq!(state.load_started.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_refresh_cancels_the_first() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut nav = NavModel::new(tx);
        let state = MockState::new();
        nav.attach(Arc::clone(&state));

        nav.refresh();
        drain().await;
        assert_eq!(state.load_started.load(Ordering::SeqCst), 1);
        assert!(nav.refresh_in_flight());

        nav.refresh();
        drain().await;
        assert_eq!(state.load_started.load(Ordering::SeqCst), 2);

        // Only the second task is still parked on the gate
        state.release_load.notify_waiters();
        drain().await;
        assert_eq!(state.load_finished.load(Ordering::SeqCst), 1);
        assert!(!nav.refresh_in_flight());
    }

    #[tokio::test]
    async fn unattached_operations_are_silent_noops() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut nav: NavModel<MockState> = NavModel::new(tx);

        nav.refresh();
        nav.switch_to(profile("work"));
        drain().await;

        assert!(!nav.refresh_in_flight());
        assert_eq!(count_redraws(&mut rx), 0);
    }

    #[tokio::test]
    async fn switch_to_active_profile_is_a_noop() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut nav = NavModel::new(tx);
        let state = MockState::new();
        nav.attach(Arc::clone(&state));
        state.set_current(Some(profile("default")));

        nav.switch_to(profile("default"));
        drain().await;

        assert_eq!(state.switch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn switch_while_loading_is_a_noop() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut nav = NavModel::new(tx);
        let state = MockState::new();
        nav.attach(Arc::clone(&state));
        state.set_loading(true);

        nav.switch_to(profile("work"));
        drain().await;

        assert_eq!(state.switch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn switch_delegates_exactly_once() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut nav = NavModel::new(tx);
        let state = MockState::new();
        nav.attach(Arc::clone(&state));
        state.set_current(Some(profile("default")));

        nav.switch_to(profile("work"));
        drain().await;

        assert_eq!(state.switch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            state.last_switched.lock().unwrap().as_deref(),
            Some("work")
        );
    }

    #[tokio::test]
    async fn refresh_cycle_emits_one_signal_per_distinct_change() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut nav = NavModel::new(tx);
        let state = MockState::new();
        nav.attach(Arc::clone(&state));

        nav.refresh();
        drain().await;
        assert_eq!(state.load_started.load(Ordering::SeqCst), 1);

        // The external state performs its load: three distinct field changes
        state.set_loading(true);
        state.set_available(vec![profile("default"), profile("work")]);
        state.set_loading(false);
        drain().await;
        assert_eq!(count_redraws(&mut rx), 3);

        // A second refresh before the first completes cancels its handle
        nav.refresh();
        drain().await;
        assert_eq!(state.load_started.load(Ordering::SeqCst), 2);
        state.release_load.notify_waiters();
        drain().await;
        assert_eq!(state.load_finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drop_releases_subscriptions() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut nav = NavModel::new(tx);
        let state = MockState::new();
        nav.attach(Arc::clone(&state));

        drop(nav);
        drain().await;

        state.set_loading(true);
        drain().await;
        assert_eq!(count_redraws(&mut rx), 0);
    }
}
