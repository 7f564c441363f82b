//! Hotkey registration store
//!
//! Owns every registered `HotkeyConfig` for its registered lifetime and the
//! index from combination id to hotkey ids that dispatch queries on every
//! key event. Combination ids are fixed here, once, at registration time.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::events::KeyEvent;
use crate::keys::{CombinationId, KeyCombination};
use crate::platform::Platform;

use super::activation::{ActivationSet, ActivationToken};

/// Length of auto-generated hotkey ids
const GENERATED_ID_LEN: usize = 7;

/// Default hold duration before `on_key_held` fires
pub const DEFAULT_HELD_THRESHOLD_MS: u64 = 500;

/// Errors surfaced by the registration API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyError {
    #[error("a hotkey needs at least one key combination")]
    EmptyKeySet,
}

/// Identifier of one registered hotkey.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HotkeyId(String);

impl HotkeyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Auto-generate a short id for configs registered without one
    pub(crate) fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(hex[..GENERATED_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HotkeyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for HotkeyId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for HotkeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Callback invoked with the triggering event, the matched key combination,
/// and the registered config.
pub type HotkeyCallback = Arc<dyn Fn(&KeyEvent, &KeyCombination, &HotkeyConfig) + Send + Sync>;

/// A registered hotkey: one or more alternative key combinations (all
/// mapping to the same id) plus callback behavior.
pub struct HotkeyConfig {
    id: HotkeyId,
    key: Vec<KeyCombination>,
    on_key_down: Option<HotkeyCallback>,
    on_key_up: Option<HotkeyCallback>,
    on_key_held: Option<HotkeyCallback>,
    held_threshold_ms: u64,
    allow_input_fields: bool,
    always_trigger_key_up: bool,
}

impl HotkeyConfig {
    pub fn id(&self) -> &HotkeyId {
        &self.id
    }

    /// The alternative chords this hotkey answers to
    pub fn key(&self) -> &[KeyCombination] {
        &self.key
    }

    pub fn on_key_down(&self) -> Option<&HotkeyCallback> {
        self.on_key_down.as_ref()
    }

    pub fn on_key_up(&self) -> Option<&HotkeyCallback> {
        self.on_key_up.as_ref()
    }

    pub fn on_key_held(&self) -> Option<&HotkeyCallback> {
        self.on_key_held.as_ref()
    }

    /// How long a chord must stay pressed before `on_key_held` fires
    pub fn held_threshold_ms(&self) -> u64 {
        self.held_threshold_ms
    }

    /// Whether this hotkey also fires while a text-entry surface is focused
    pub fn allow_input_fields(&self) -> bool {
        self.allow_input_fields
    }

    /// Whether `on_key_up` fires even after a held trigger
    pub fn always_trigger_key_up(&self) -> bool {
        self.always_trigger_key_up
    }

    /// Find the registered chord matching a derived combination id
    pub fn combination_for(&self, id: &CombinationId) -> Option<&KeyCombination> {
        self.key.iter().find(|combo| combo.id() == id)
    }
}

impl fmt::Debug for HotkeyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotkeyConfig")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("held_threshold_ms", &self.held_threshold_ms)
            .field("allow_input_fields", &self.allow_input_fields)
            .field("always_trigger_key_up", &self.always_trigger_key_up)
            .finish_non_exhaustive()
    }
}

/// Options for registering a hotkey.
///
/// Only the key combinations are required; everything else has the same
/// defaults a bare registration would get.
pub struct HotkeyOptions {
    id: Option<HotkeyId>,
    key: Vec<KeyCombination>,
    on_key_down: Option<HotkeyCallback>,
    on_key_up: Option<HotkeyCallback>,
    on_key_held: Option<HotkeyCallback>,
    held_threshold_ms: u64,
    allow_input_fields: bool,
    always_trigger_key_up: bool,
}

impl HotkeyOptions {
    pub fn new(key: impl IntoIterator<Item = KeyCombination>) -> Self {
        Self {
            id: None,
            key: key.into_iter().collect(),
            on_key_down: None,
            on_key_up: None,
            on_key_held: None,
            held_threshold_ms: DEFAULT_HELD_THRESHOLD_MS,
            allow_input_fields: false,
            always_trigger_key_up: false,
        }
    }

    /// Use an explicit id instead of an auto-generated one
    pub fn id(mut self, id: impl Into<HotkeyId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn on_key_down(
        mut self,
        callback: impl Fn(&KeyEvent, &KeyCombination, &HotkeyConfig) + Send + Sync + 'static,
    ) -> Self {
        self.on_key_down = Some(Arc::new(callback));
        self
    }

    pub fn on_key_up(
        mut self,
        callback: impl Fn(&KeyEvent, &KeyCombination, &HotkeyConfig) + Send + Sync + 'static,
    ) -> Self {
        self.on_key_up = Some(Arc::new(callback));
        self
    }

    pub fn on_key_held(
        mut self,
        callback: impl Fn(&KeyEvent, &KeyCombination, &HotkeyConfig) + Send + Sync + 'static,
    ) -> Self {
        self.on_key_held = Some(Arc::new(callback));
        self
    }

    pub fn held_threshold_ms(mut self, threshold_ms: u64) -> Self {
        self.held_threshold_ms = threshold_ms;
        self
    }

    pub fn allow_input_fields(mut self, allow: bool) -> Self {
        self.allow_input_fields = allow;
        self
    }

    pub fn always_trigger_key_up(mut self, always: bool) -> Self {
        self.always_trigger_key_up = always;
        self
    }
}

/// Handle returned by registration, identifying the hotkey for later
/// activation and removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyBinding {
    id: HotkeyId,
}

impl HotkeyBinding {
    pub fn id(&self) -> &HotkeyId {
        &self.id
    }
}

/// The identity shapes accepted by `unregister_hotkey`.
#[derive(Debug, Clone)]
pub enum RemovalKey {
    Id(HotkeyId),
    Binding(HotkeyBinding),
}

impl RemovalKey {
    pub(crate) fn into_id(self) -> HotkeyId {
        match self {
            RemovalKey::Id(id) => id,
            RemovalKey::Binding(binding) => binding.id,
        }
    }
}

impl From<HotkeyId> for RemovalKey {
    fn from(id: HotkeyId) -> Self {
        RemovalKey::Id(id)
    }
}

impl From<&HotkeyId> for RemovalKey {
    fn from(id: &HotkeyId) -> Self {
        RemovalKey::Id(id.clone())
    }
}

impl From<&str> for RemovalKey {
    fn from(id: &str) -> Self {
        RemovalKey::Id(HotkeyId::from(id))
    }
}

impl From<HotkeyBinding> for RemovalKey {
    fn from(binding: HotkeyBinding) -> Self {
        RemovalKey::Binding(binding)
    }
}

impl From<&HotkeyBinding> for RemovalKey {
    fn from(binding: &HotkeyBinding) -> Self {
        RemovalKey::Binding(binding.clone())
    }
}

/// The hotkey store: registered configs, the combination index, and
/// activation state.
pub struct HotkeyStore {
    platform: Platform,
    configs: HashMap<HotkeyId, Arc<HotkeyConfig>>,
    by_combination: HashMap<CombinationId, Vec<HotkeyId>>,
    activation: ActivationSet,
}

impl HotkeyStore {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            configs: HashMap::new(),
            by_combination: HashMap::new(),
            activation: ActivationSet::default(),
        }
    }

    /// Register a hotkey, overwriting any previous registration under the
    /// same id. Each combination's id is recomputed here for the store's
    /// platform; whatever id the combination carried before is discarded.
    pub fn register(&mut self, options: HotkeyOptions) -> Result<HotkeyBinding, HotkeyError> {
        if options.key.is_empty() {
            return Err(HotkeyError::EmptyKeySet);
        }

        let id = options.id.unwrap_or_else(HotkeyId::generate);
        self.remove(&id);

        let mut key = options.key;
        for combo in &mut key {
            combo.fix_id(self.platform);
        }

        let config = Arc::new(HotkeyConfig {
            id: id.clone(),
            key,
            on_key_down: options.on_key_down,
            on_key_up: options.on_key_up,
            on_key_held: options.on_key_held,
            held_threshold_ms: options.held_threshold_ms,
            allow_input_fields: options.allow_input_fields,
            always_trigger_key_up: options.always_trigger_key_up,
        });

        for combo in config.key() {
            let ids = self.by_combination.entry(combo.id().clone()).or_default();
            if !ids.contains(&id) {
                ids.push(id.clone());
            }
        }
        self.configs.insert(id.clone(), config);

        info!(hotkey = %id, "hotkey registered");
        Ok(HotkeyBinding { id })
    }

    /// Remove a hotkey. Removing an id that was never registered is a no-op.
    /// Returns whether anything was removed.
    ///
    /// The store only owns registrations and activation state. Held-key
    /// timers live with the dispatch side; unregister through
    /// [`HotkeyManager::unregister_hotkey`] to also cancel a pending held
    /// timer for the removed hotkey.
    ///
    /// [`HotkeyManager::unregister_hotkey`]: crate::HotkeyManager::unregister_hotkey
    pub fn unregister(&mut self, key: impl Into<RemovalKey>) -> bool {
        self.remove(&key.into().into_id())
    }

    fn remove(&mut self, id: &HotkeyId) -> bool {
        let Some(config) = self.configs.remove(id) else {
            debug!(hotkey = %id, "unregister of unknown hotkey ignored");
            return false;
        };

        for combo in config.key() {
            if let Some(ids) = self.by_combination.get_mut(combo.id()) {
                ids.retain(|registered| registered != id);
                if ids.is_empty() {
                    self.by_combination.remove(combo.id());
                }
            }
        }
        self.activation.remove(id);

        info!(hotkey = %id, "hotkey unregistered");
        true
    }

    /// All registered configs answering to a derived combination id
    pub fn get_hotkeys_for_key_combination(
        &self,
        combination: &CombinationId,
    ) -> Option<Vec<Arc<HotkeyConfig>>> {
        let ids = self.by_combination.get(combination)?;
        let configs: Vec<_> = ids
            .iter()
            .filter_map(|id| self.configs.get(id))
            .map(Arc::clone)
            .collect();
        (!configs.is_empty()).then_some(configs)
    }

    pub fn get(&self, id: &HotkeyId) -> Option<&Arc<HotkeyConfig>> {
        self.configs.get(id)
    }

    pub fn activate(&mut self, id: &HotkeyId, token: ActivationToken) {
        self.activation.activate(id, token);
    }

    pub fn deactivate(&mut self, id: &HotkeyId, token: ActivationToken) {
        self.activation.deactivate(id, token);
    }

    pub fn force_deactivate(&mut self, id: &HotkeyId) {
        self.activation.force_deactivate(id);
    }

    /// Firing-eligible: at least one outstanding activation token, or forced
    pub fn is_active(&self, id: &HotkeyId) -> bool {
        self.activation.is_active(id)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Drop every registration and all activation state
    pub fn clear(&mut self) {
        self.configs.clear();
        self.by_combination.clear();
        self.activation.clear();
    }
}
