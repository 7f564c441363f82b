//! Hotkey registration and activation store
//!
//! Exclusive owner of registered hotkey configs and activation tokens.

mod activation;
mod registry;

pub use activation::ActivationToken;
pub use registry::{
    HotkeyBinding, HotkeyCallback, HotkeyConfig, HotkeyError, HotkeyId, HotkeyOptions,
    HotkeyStore, RemovalKey, DEFAULT_HELD_THRESHOLD_MS,
};
