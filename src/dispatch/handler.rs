//! Keydown/keyup dispatch
//!
//! Resolves each incoming event to its combination id, looks up matching
//! registered hotkeys, and applies the input-field, activation, and
//! held-timing rules before invoking callbacks. Held timers are spawned
//! tasks keyed by `HeldId`, a derived (combination id, hotkey id) pair,
//! never by config references.
//!
//! Requires a running tokio runtime: held timers are `tokio::spawn`ed.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::events::KeyEvent;
use crate::keys::{event_to_id, CombinationId, KeyCombination};
use crate::store::{HotkeyConfig, HotkeyId, HotkeyStore};

/// Composite key for one pending or fired hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct HeldId {
    combination: CombinationId,
    hotkey: HotkeyId,
}

/// Held-key bookkeeping: pending timers and which holds already fired.
#[derive(Debug, Default)]
pub(crate) struct HeldState {
    timers: HashMap<HeldId, JoinHandle<()>>,
    triggered: HashSet<HeldId>,
}

impl HeldState {
    /// Cancel every pending timer and forget every fired hold
    pub(crate) fn clear(&mut self) {
        for (_, handle) in self.timers.drain() {
            handle.abort();
        }
        self.triggered.clear();
    }

    /// Cancel timers and markers belonging to one hotkey (on unregister)
    pub(crate) fn remove_hotkey(&mut self, hotkey: &HotkeyId) {
        self.timers.retain(|held, handle| {
            if held.hotkey == *hotkey {
                handle.abort();
                false
            } else {
                true
            }
        });
        self.triggered.retain(|held| held.hotkey != *hotkey);
    }

    #[cfg(test)]
    pub(crate) fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

/// Applies the dispatch rules against a shared store and held state.
pub(crate) struct Dispatcher {
    store: Arc<Mutex<HotkeyStore>>,
    held: Arc<Mutex<HeldState>>,
}

impl Dispatcher {
    pub(crate) fn new(store: Arc<Mutex<HotkeyStore>>, held: Arc<Mutex<HeldState>>) -> Self {
        Self { store, held }
    }

    /// Matching configs for an event, each paired with its firing
    /// eligibility, resolved under one store lock.
    fn matches_for(&self, key_id: &CombinationId) -> Vec<(Arc<HotkeyConfig>, bool)> {
        let store = self.store.lock().unwrap();
        store
            .get_hotkeys_for_key_combination(key_id)
            .unwrap_or_default()
            .into_iter()
            .map(|config| {
                let active = store.is_active(config.id());
                (config, active)
            })
            .collect()
    }

    pub(crate) fn handle_key_down(&self, event: &KeyEvent) {
        let key_id = event_to_id(event);
        let matches = self.matches_for(&key_id);
        if matches.is_empty() {
            return;
        }

        let is_input = event.target.is_input_field();
        for (config, active) in matches {
            if !active {
                debug!(hotkey = %config.id(), "keydown skipped, hotkey not activated");
                continue;
            }
            if is_input && !config.allow_input_fields() {
                debug!(hotkey = %config.id(), "keydown suppressed in input field");
                continue;
            }
            let Some(matched) = config.combination_for(&key_id) else {
                warn!(
                    hotkey = %config.id(),
                    key = %key_id,
                    "matched hotkey has no combination entry for key id, skipping"
                );
                continue;
            };
            let matched = matched.clone();

            if let Some(callback) = config.on_key_down() {
                debug!(hotkey = %config.id(), key = %key_id, "keydown");
                callback(event, &matched, &config);
            }

            if config.on_key_held().is_some() {
                self.start_held_timer(&key_id, &config, matched, event);
            }
        }
    }

    pub(crate) fn handle_key_up(&self, event: &KeyEvent) {
        let key_id = event_to_id(event);
        let matches = self.matches_for(&key_id);
        if matches.is_empty() {
            return;
        }

        let is_input = event.target.is_input_field();
        for (config, active) in matches {
            let held_id = HeldId {
                combination: key_id.clone(),
                hotkey: config.id().clone(),
            };

            // Timer/marker cleanup happens for every match, even ones the
            // input-field or activation rules keep from firing.
            let held_fired = {
                let mut held = self.held.lock().unwrap();
                if let Some(handle) = held.timers.remove(&held_id) {
                    handle.abort();
                }
                held.triggered.remove(&held_id)
            };

            if !active || (is_input && !config.allow_input_fields()) {
                continue;
            }
            let Some(matched) = config.combination_for(&key_id) else {
                warn!(
                    hotkey = %config.id(),
                    key = %key_id,
                    "matched hotkey has no combination entry for key id, skipping"
                );
                continue;
            };

            // A hold that already fired swallows the tap's keyup unless the
            // config opted into always firing it.
            if config.always_trigger_key_up() || !held_fired {
                if let Some(callback) = config.on_key_up() {
                    debug!(hotkey = %config.id(), key = %key_id, "keyup");
                    callback(event, matched, &config);
                }
            }
        }
    }

    /// Start the hold timer for (key, hotkey) unless one is already
    /// pending. A repeated keydown while pressed never restarts the clock.
    fn start_held_timer(
        &self,
        key_id: &CombinationId,
        config: &Arc<HotkeyConfig>,
        matched: KeyCombination,
        event: &KeyEvent,
    ) {
        let held_id = HeldId {
            combination: key_id.clone(),
            hotkey: config.id().clone(),
        };

        let mut held = self.held.lock().unwrap();
        if held.timers.contains_key(&held_id) {
            debug!(hotkey = %config.id(), key = %key_id, "held timer already pending");
            return;
        }
        // Once the hold has fired, auto-repeat keydowns must not re-arm it;
        // only keyup clears the marker and starts a new press cycle.
        if held.triggered.contains(&held_id) {
            debug!(hotkey = %config.id(), key = %key_id, "hold already fired for this press");
            return;
        }

        let state = Arc::clone(&self.held);
        let config = Arc::clone(config);
        let event = event.clone();
        let timer_id = held_id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(config.held_threshold_ms())).await;
            {
                let mut held = state.lock().unwrap();
                held.timers.remove(&timer_id);
                held.triggered.insert(timer_id.clone());
            }
            if let Some(callback) = config.on_key_held() {
                debug!(hotkey = %config.id(), "held threshold reached");
                callback(&event, &matched, &config);
            }
        });
        held.timers.insert(held_id, handle);
    }
}
