//! Key-combination identity resolution
//!
//! A combination id is the sole lookup key connecting live key events to
//! registered hotkeys, so it must be derived identically on both paths:
//! `event_to_id` at event time, `key_to_id` at registration time (the only
//! difference being the macOS ctrl/meta remap applied once at registration).

use serde::{Deserialize, Serialize};

use crate::events::KeyEvent;
use crate::platform::Platform;

use super::code::KeyCode;

/// Which modifier keys are part of a chord.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    /// Control key is part of the chord
    pub ctrl: bool,
    /// Alt/Option key is part of the chord
    pub alt: bool,
    /// Shift key is part of the chord
    pub shift: bool,
    /// Meta/Command key is part of the chord
    pub meta: bool,
}

impl Modifiers {
    /// Check if no modifiers are set
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.meta
    }

    /// Swap the roles of ctrl and meta (ctrl-intent becomes cmd on macOS)
    fn mac_swapped(self) -> Self {
        Self {
            ctrl: self.meta,
            meta: self.ctrl,
            ..self
        }
    }
}

/// Canonical derived identity of one key combination.
///
/// Two semantically identical combinations always encode to byte-identical
/// ids: the modifier fields are emitted in fixed alphabetical order
/// (alt, ctrl, meta, shift) regardless of how the chord was built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinationId(String);

impl CombinationId {
    fn encode(code: KeyCode, m: Modifiers) -> Self {
        Self(format!(
            "{}|{}|{}|{}|{}",
            code.as_str(),
            if m.alt { "alt" } else { "no-alt" },
            if m.ctrl { "ctrl" } else { "no-ctrl" },
            if m.meta { "meta" } else { "no-meta" },
            if m.shift { "shift" } else { "no-shift" },
        ))
    }

    /// The encoded id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CombinationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One physical chord a hotkey can be bound to.
///
/// The `id` is derived, never user-supplied, and is recomputed (with the
/// platform remap applied) whenever the combination is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCombination {
    id: CombinationId,
    code: KeyCode,
    modifiers: Modifiers,
    auto_mac_style: bool,
}

impl KeyCombination {
    /// Create a combination for a bare key with no modifiers
    pub fn new(code: KeyCode) -> Self {
        Self {
            id: CombinationId::encode(code, Modifiers::default()),
            code,
            modifiers: Modifiers::default(),
            auto_mac_style: false,
        }
    }

    /// Add the Control key to the chord
    pub fn with_ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self.refresh_id();
        self
    }

    /// Add the Alt/Option key to the chord
    pub fn with_alt(mut self) -> Self {
        self.modifiers.alt = true;
        self.refresh_id();
        self
    }

    /// Add the Shift key to the chord
    pub fn with_shift(mut self) -> Self {
        self.modifiers.shift = true;
        self.refresh_id();
        self
    }

    /// Add the Meta/Command key to the chord
    pub fn with_meta(mut self) -> Self {
        self.modifiers.meta = true;
        self.refresh_id();
        self
    }

    /// Replace the whole modifier set
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self.refresh_id();
        self
    }

    /// Opt into the macOS convention: a ctrl chord registered with this flag
    /// becomes the equivalent cmd chord when running on macOS.
    pub fn with_auto_mac_style(mut self) -> Self {
        self.auto_mac_style = true;
        self
    }

    /// The derived combination id (platform remap applied at registration)
    pub fn id(&self) -> &CombinationId {
        &self.id
    }

    /// The base key of the chord
    pub fn code(&self) -> KeyCode {
        self.code
    }

    /// The modifier set of the chord
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether the macOS ctrl/meta remap applies to this chord
    pub fn auto_mac_style(&self) -> bool {
        self.auto_mac_style
    }

    fn refresh_id(&mut self) {
        self.id = CombinationId::encode(self.code, self.modifiers);
    }

    /// Fix the id for the given platform. Called once at registration.
    pub(crate) fn fix_id(&mut self, platform: Platform) {
        self.id = key_to_id(self, platform);
    }
}

/// Derive the canonical id for a live key event.
///
/// Modifier flags are taken exactly as supplied by the event.
pub fn event_to_id(event: &KeyEvent) -> CombinationId {
    CombinationId::encode(
        event.code,
        Modifiers {
            ctrl: event.ctrl,
            alt: event.alt,
            shift: event.shift,
            meta: event.meta,
        },
    )
}

/// Derive the canonical id for a combination at registration time.
///
/// If the combination opted into `auto_mac_style` and the platform is macOS,
/// ctrl and meta swap roles before encoding.
pub fn key_to_id(key: &KeyCombination, platform: Platform) -> CombinationId {
    let modifiers = if key.auto_mac_style && platform.is_mac() {
        key.modifiers.mac_swapped()
    } else {
        key.modifiers
    };
    CombinationId::encode(key.code, modifiers)
}
