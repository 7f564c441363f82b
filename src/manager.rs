//! The hotkey manager context object
//!
//! One `HotkeyManager` per application instance replaces the process-wide
//! singletons of a typical browser hotkey layer: the host environment is
//! injected at construction and every registration/dispatch call goes
//! through the manager explicitly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::dispatch::{Dispatcher, HeldState};
use crate::events::{KeyEvent, KeyInput};
use crate::platform::HostEnv;
use crate::store::{
    ActivationToken, HotkeyBinding, HotkeyError, HotkeyId, HotkeyOptions, HotkeyStore, RemovalKey,
};

/// Owns the hotkey store, the held-key state, and the (at most one) bound
/// dispatch loop.
///
/// Held-key timers and the bound loop are spawned tasks, so dispatch must
/// happen inside a tokio runtime.
pub struct HotkeyManager {
    env: HostEnv,
    store: Arc<Mutex<HotkeyStore>>,
    held: Arc<Mutex<HeldState>>,
    dispatcher: Dispatcher,
    bound: AtomicBool,
    loop_task: Mutex<Option<JoinHandle<()>>>,
}

impl HotkeyManager {
    /// Create a manager for the given host environment
    pub fn new(env: HostEnv) -> Arc<Self> {
        let store = Arc::new(Mutex::new(HotkeyStore::new(env.platform)));
        let held = Arc::new(Mutex::new(HeldState::default()));
        let dispatcher = Dispatcher::new(Arc::clone(&store), Arc::clone(&held));

        Arc::new(Self {
            env,
            store,
            held,
            dispatcher,
            bound: AtomicBool::new(false),
            loop_task: Mutex::new(None),
        })
    }

    /// Register a hotkey, overwriting any previous registration under the
    /// same id. The returned binding identifies the hotkey for activation
    /// and removal.
    ///
    /// A fresh registration carries no activation tokens and is inert:
    /// nothing fires until [`activate_hotkey`](Self::activate_hotkey) adds
    /// a token (or the [`ActivationToken::FORCE_BOUND`] sentinel).
    pub fn register_hotkey(&self, options: HotkeyOptions) -> Result<HotkeyBinding, HotkeyError> {
        self.store.lock().unwrap().register(options)
    }

    /// Remove a hotkey by id or binding. Unknown ids are a no-op. Any
    /// pending held timer for the hotkey is canceled so a stale hold can
    /// never fire after removal.
    pub fn unregister_hotkey(&self, key: impl Into<RemovalKey>) {
        let id = key.into().into_id();
        self.store.lock().unwrap().unregister(&id);
        self.held.lock().unwrap().remove_hotkey(&id);
    }

    /// Add one caller's activation claim for a hotkey
    pub fn activate_hotkey(&self, id: impl Into<HotkeyId>, token: ActivationToken) {
        self.store.lock().unwrap().activate(&id.into(), token);
    }

    /// Withdraw one caller's activation claim
    pub fn deactivate_hotkey(&self, id: impl Into<HotkeyId>, token: ActivationToken) {
        self.store.lock().unwrap().deactivate(&id.into(), token);
    }

    /// Clear forced activation unconditionally, leaving counted tokens alone
    pub fn force_deactivate_hotkey(&self, id: impl Into<HotkeyId>) {
        self.store.lock().unwrap().force_deactivate(&id.into());
    }

    /// Check if a hotkey currently has at least one activation claim
    pub fn is_hotkey_active(&self, id: impl Into<HotkeyId>) -> bool {
        self.store.lock().unwrap().is_active(&id.into())
    }

    /// Dispatch a key press directly, without a bound channel
    pub fn handle_key_down(&self, event: &KeyEvent) {
        self.dispatcher.handle_key_down(event);
    }

    /// Dispatch a key release directly, without a bound channel
    pub fn handle_key_up(&self, event: &KeyEvent) {
        self.dispatcher.handle_key_up(event);
    }

    /// Attach the global dispatch loop to a key-input channel.
    ///
    /// No-op (returning false) when already bound or when the host is not
    /// interactive; exactly one loop ever runs at a time.
    pub fn bind(self: &Arc<Self>, mut input_rx: mpsc::Receiver<KeyInput>) -> bool {
        if !self.env.interactive {
            debug!("non-interactive host, global bind skipped");
            return false;
        }
        if self.bound.swap(true, Ordering::SeqCst) {
            debug!("already bound, global bind skipped");
            return false;
        }

        let manager = Arc::clone(self);
        let handle = tokio::spawn(async move {
            while let Some(input) = input_rx.recv().await {
                match input {
                    KeyInput::KeyDown(event) => manager.dispatcher.handle_key_down(&event),
                    KeyInput::KeyUp(event) => manager.dispatcher.handle_key_up(&event),
                }
            }
            debug!("key input channel closed");
        });
        *self.loop_task.lock().unwrap() = Some(handle);

        info!("global key listeners bound");
        true
    }

    /// Detach the dispatch loop and drop all held-key state. No-op when not
    /// bound.
    pub fn unbind(&self) {
        if !self.bound.swap(false, Ordering::SeqCst) {
            debug!("not bound, global unbind skipped");
            return;
        }

        if let Some(handle) = self.loop_task.lock().unwrap().take() {
            handle.abort();
        }
        self.held.lock().unwrap().clear();

        info!("global key listeners unbound");
    }

    /// Check if the dispatch loop is currently attached
    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::SeqCst)
    }

    /// Test support: unbind and drop every registration and all held state
    pub fn reset(&self) {
        self.unbind();
        self.store.lock().unwrap().clear();
        self.held.lock().unwrap().clear();
    }

    /// Number of registered hotkeys
    pub fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;
    use crate::events::EventTarget;
    use crate::keys::{KeyCode, KeyCombination};
    use crate::platform::Platform;

    fn manager() -> Arc<HotkeyManager> {
        HotkeyManager::new(HostEnv::interactive(Platform::Linux))
    }

    fn ctrl_s() -> KeyCombination {
        KeyCombination::new(KeyCode::KeyS).with_ctrl()
    }

    #[tokio::test]
    async fn test_bind_twice_attaches_once() {
        let manager = manager();
        let (_tx, rx) = mpsc::channel(32);
        let (_tx2, rx2) = mpsc::channel(32);

        assert!(manager.bind(rx));
        assert!(manager.is_bound());
        assert!(!manager.bind(rx2));

        manager.unbind();
        assert!(!manager.is_bound());
    }

    #[test]
    fn test_unbind_while_unbound_is_noop() {
        tokio_test::block_on(async {
            let manager = manager();
            manager.unbind();
            assert!(!manager.is_bound());
        });
    }

    #[tokio::test]
    async fn test_headless_host_never_binds() {
        let manager = HotkeyManager::new(HostEnv::headless());
        let (_tx, rx) = mpsc::channel(32);
        assert!(!manager.bind(rx));
        assert!(!manager.is_bound());
    }

    #[tokio::test]
    async fn test_events_over_bound_channel_reach_callbacks() {
        let manager = manager();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let binding = manager
            .register_hotkey(
                HotkeyOptions::new([ctrl_s()])
                    .id("save")
                    .on_key_down(move |_, _, _| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap();
        manager.activate_hotkey(binding.id().clone(), ActivationToken::FORCE_BOUND);

        let (tx, rx) = mpsc::channel(32);
        manager.bind(rx);

        let event = KeyEvent::new(KeyCode::KeyS).with_ctrl();
        tx.send(KeyInput::KeyDown(event.clone())).await.unwrap();
        tx.send(KeyInput::KeyUp(event)).await.unwrap();

        // Let the loop task drain the channel
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_save_hotkey_scenario() {
        let manager = manager();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let binding = manager
            .register_hotkey(
                HotkeyOptions::new([ctrl_s()])
                    .id("save")
                    .allow_input_fields(true)
                    .on_key_down(move |event, matched, config| {
                        assert!(event.ctrl);
                        assert_eq!(matched.code(), KeyCode::KeyS);
                        assert_eq!(config.id().as_str(), "save");
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap();
        manager.activate_hotkey(binding.id().clone(), ActivationToken::FORCE_BOUND);

        manager.handle_key_down(&KeyEvent::new(KeyCode::KeyS).with_ctrl());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Still fires inside input fields because the config opted in
        manager.handle_key_down(
            &KeyEvent::new(KeyCode::KeyS)
                .with_ctrl()
                .with_target(EventTarget::Input),
        );
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unregister_nonexistent_leaves_store_unchanged() {
        let manager = manager();
        manager
            .register_hotkey(HotkeyOptions::new([ctrl_s()]).id("save"))
            .unwrap();

        manager.unregister_hotkey("nonexistent-id");
        assert_eq!(manager.len(), 1);
    }

    #[tokio::test]
    async fn test_activation_reference_counting_through_manager() {
        let manager = manager();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        manager
            .register_hotkey(
                HotkeyOptions::new([ctrl_s()])
                    .id("save")
                    .on_key_down(move |_, _, _| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap();

        let first = ActivationToken::new();
        let second = ActivationToken::new();
        manager.activate_hotkey("save", first);
        manager.activate_hotkey("save", second);
        manager.deactivate_hotkey("save", first);
        assert!(manager.is_hotkey_active("save"));

        manager.handle_key_down(&KeyEvent::new(KeyCode::KeyS).with_ctrl());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        manager.deactivate_hotkey("save", second);
        manager.handle_key_down(&KeyEvent::new(KeyCode::KeyS).with_ctrl());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unregister_cancels_pending_held_timer() {
        let manager = manager();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let binding = manager
            .register_hotkey(
                HotkeyOptions::new([ctrl_s()])
                    .id("save")
                    .held_threshold_ms(500)
                    .on_key_held(move |_, _, _| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap();
        manager.activate_hotkey("save", ActivationToken::FORCE_BOUND);

        manager.handle_key_down(&KeyEvent::new(KeyCode::KeyS).with_ctrl());
        manager.unregister_hotkey(&binding);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbind_cancels_held_timers() {
        let manager = manager();
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        manager
            .register_hotkey(
                HotkeyOptions::new([ctrl_s()])
                    .id("save")
                    .held_threshold_ms(500)
                    .on_key_held(move |_, _, _| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap();
        manager.activate_hotkey("save", ActivationToken::FORCE_BOUND);

        let (_tx, rx) = mpsc::channel(32);
        manager.bind(rx);
        manager.handle_key_down(&KeyEvent::new(KeyCode::KeyS).with_ctrl());
        manager.unbind();

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let manager = manager();
        manager
            .register_hotkey(HotkeyOptions::new([ctrl_s()]).id("save"))
            .unwrap();
        let (_tx, rx) = mpsc::channel(32);
        manager.bind(rx);

        manager.reset();
        assert!(manager.is_empty());
        assert!(!manager.is_bound());
    }

    #[tokio::test]
    async fn test_mac_style_registration_matches_cmd_events() {
        let manager = HotkeyManager::new(HostEnv::interactive(Platform::MacOs));
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        manager
            .register_hotkey(
                HotkeyOptions::new([ctrl_s().with_auto_mac_style()])
                    .id("save")
                    .on_key_down(move |_, _, _| {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap();
        manager.activate_hotkey("save", ActivationToken::FORCE_BOUND);

        manager.handle_key_down(&KeyEvent::new(KeyCode::KeyS).with_meta());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        manager.handle_key_down(&KeyEvent::new(KeyCode::KeyS).with_ctrl());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
