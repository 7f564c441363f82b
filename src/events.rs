//! Host keyboard-event boundary types
//!
//! The host environment translates its native keyboard events into
//! `KeyEvent`s and feeds them to the manager, either directly through the
//! keydown/keyup handlers or over the bound input channel as `KeyInput`.

use serde::{Deserialize, Serialize};

use crate::keys::KeyCode;

/// Where a key event landed in the host UI.
///
/// Text-entry surfaces suppress hotkeys unless a config opts in via
/// `allow_input_fields`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTarget {
    /// Anything that is not a text-entry surface
    #[default]
    Other,
    /// A single-line text input
    Input,
    /// A multi-line text area
    TextArea,
    /// An element with content editing enabled
    ContentEditable,
}

impl EventTarget {
    /// Check if the target accepts text entry
    pub fn is_input_field(&self) -> bool {
        !matches!(self, EventTarget::Other)
    }
}

/// A single keyboard event as reported by the host environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Physical key that was pressed or released
    pub code: KeyCode,
    /// Control key was held during the event
    #[serde(default)]
    pub ctrl: bool,
    /// Alt/Option key was held during the event
    #[serde(default)]
    pub alt: bool,
    /// Shift key was held during the event
    #[serde(default)]
    pub shift: bool,
    /// Meta/Command key was held during the event
    #[serde(default)]
    pub meta: bool,
    /// UI element the event was delivered to
    #[serde(default)]
    pub target: EventTarget,
}

impl KeyEvent {
    /// Create an event for a bare key press with no modifiers
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            alt: false,
            shift: false,
            meta: false,
            target: EventTarget::Other,
        }
    }

    /// Mark the Control key as held
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Mark the Alt/Option key as held
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Mark the Shift key as held
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Mark the Meta/Command key as held
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Set the UI element the event targets
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }
}

/// Messages fed to the dispatch loop over the bound input channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyInput {
    /// A key was pressed
    KeyDown(KeyEvent),
    /// A key was released
    KeyUp(KeyEvent),
}
