//! Activation tokens and per-hotkey activation state
//!
//! A hotkey only fires while at least one activation token is outstanding
//! for it. Independent call sites each hold their own token, so one caller
//! deactivating never turns off a hotkey another caller still needs. The
//! `FORCE_BOUND` sentinel bypasses counting entirely.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::registry::HotkeyId;

/// One caller's claim that a hotkey should be live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivationToken(Uuid);

impl ActivationToken {
    /// Shared sentinel that forces a hotkey active regardless of any other
    /// outstanding tokens.
    pub const FORCE_BOUND: ActivationToken = ActivationToken(Uuid::nil());

    /// Mint a fresh unique token
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Check if this is the forced-activation sentinel
    pub fn is_forced(&self) -> bool {
        *self == Self::FORCE_BOUND
    }
}

impl Default for ActivationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks which hotkeys are currently activated and by whom.
#[derive(Debug, Default)]
pub(crate) struct ActivationSet {
    tokens: HashMap<HotkeyId, HashSet<ActivationToken>>,
    forced: HashSet<HotkeyId>,
}

impl ActivationSet {
    pub(crate) fn activate(&mut self, id: &HotkeyId, token: ActivationToken) {
        if token.is_forced() {
            self.forced.insert(id.clone());
        } else {
            self.tokens.entry(id.clone()).or_default().insert(token);
        }
    }

    pub(crate) fn deactivate(&mut self, id: &HotkeyId, token: ActivationToken) {
        if token.is_forced() {
            self.forced.remove(id);
        } else if let Some(set) = self.tokens.get_mut(id) {
            set.remove(&token);
            if set.is_empty() {
                self.tokens.remove(id);
            }
        }
    }

    /// Clear forced state unconditionally, leaving counted tokens alone
    pub(crate) fn force_deactivate(&mut self, id: &HotkeyId) {
        self.forced.remove(id);
    }

    /// Firing-eligible: at least one outstanding token, or forced
    pub(crate) fn is_active(&self, id: &HotkeyId) -> bool {
        self.forced.contains(id) || self.tokens.get(id).is_some_and(|set| !set.is_empty())
    }

    /// Drop all activation state for a hotkey (on unregister)
    pub(crate) fn remove(&mut self, id: &HotkeyId) {
        self.tokens.remove(id);
        self.forced.remove(id);
    }

    pub(crate) fn clear(&mut self) {
        self.tokens.clear();
        self.forced.clear();
    }
}
