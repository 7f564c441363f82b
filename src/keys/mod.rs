//! Key codes and key-combination identity
//!
//! The closed keycode table plus the canonical combination-id derivation
//! used to match live events against registered hotkeys.

mod code;
mod combination;

pub use code::{KeyCode, UnknownKeyCode};
pub use combination::{event_to_id, key_to_id, CombinationId, KeyCombination, Modifiers};
