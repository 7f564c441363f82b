//! hotkey-manager: key-combination identity and dispatch
//!
//! This crate provides:
//! - A closed table of physical key codes and a canonical, order-independent
//!   combination id derived from (key, modifiers), with optional macOS
//!   ctrl/meta remapping applied once at registration
//! - A registration store with reference-counted activation tokens, so
//!   independent call sites can activate the same hotkey without interfering
//! - Keydown/keyup dispatch with input-field suppression and held-key
//!   timing (a chord pressed past its threshold fires `on_key_held` instead
//!   of a plain tap)
//!
//! The host environment supplies key events; there is no OS event tap here.
//! Feed events either directly through [`HotkeyManager::handle_key_down`] /
//! [`HotkeyManager::handle_key_up`], or over an mpsc channel attached with
//! [`HotkeyManager::bind`].
//!
//! ```no_run
//! use hotkey_manager::{
//!     ActivationToken, HostEnv, HotkeyManager, HotkeyOptions, KeyCode, KeyCombination,
//! };
//!
//! let manager = HotkeyManager::new(HostEnv::detect());
//! let binding = manager
//!     .register_hotkey(
//!         HotkeyOptions::new([KeyCombination::new(KeyCode::KeyS)
//!             .with_ctrl()
//!             .with_auto_mac_style()])
//!         .id("save")
//!         .on_key_down(|_event, _key, _config| println!("saving")),
//!     )
//!     .expect("at least one key combination");
//! manager.activate_hotkey(binding.id().clone(), ActivationToken::FORCE_BOUND);
//! ```

mod dispatch;
mod events;
mod keys;
mod manager;
mod platform;
mod store;

pub use events::{EventTarget, KeyEvent, KeyInput};
pub use keys::{
    event_to_id, key_to_id, CombinationId, KeyCode, KeyCombination, Modifiers, UnknownKeyCode,
};
pub use manager::HotkeyManager;
pub use platform::{HostEnv, Platform};
pub use store::{
    ActivationToken, HotkeyBinding, HotkeyCallback, HotkeyConfig, HotkeyError, HotkeyId,
    HotkeyOptions, HotkeyStore, RemovalKey, DEFAULT_HELD_THRESHOLD_MS,
};
