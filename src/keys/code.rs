//! Closed enumeration of recognized physical key codes
//!
//! Codes use the W3C `KeyboardEvent.code` names (`KeyA`, `Digit1`,
//! `ArrowDown`, ...). Matching only succeeds for codes in this set;
//! hosts must map their platform key events onto it.

use serde::{Deserialize, Serialize};

/// Error returned when parsing a string that is not a recognized key code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized key code: {0}")]
pub struct UnknownKeyCode(pub String);

macro_rules! keycodes {
    ($($name:ident),+ $(,)?) => {
        /// A physical key position on the keyboard.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum KeyCode {
            $($name),+
        }

        impl KeyCode {
            /// Every recognized key code.
            pub const ALL: &'static [KeyCode] = &[$(KeyCode::$name),+];

            /// Canonical code string, as used inside combination ids.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(KeyCode::$name => stringify!($name)),+
                }
            }
        }

        impl std::str::FromStr for KeyCode {
            type Err = UnknownKeyCode;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($name) => Ok(KeyCode::$name),)+
                    _ => Err(UnknownKeyCode(s.to_string())),
                }
            }
        }
    };
}

keycodes! {
    // Letters
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL,
    KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX,
    KeyY, KeyZ,
    // Digit row
    Digit0, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8,
    Digit9,
    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    // Arrows
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    // Editing and navigation
    Enter, Escape, Space, Tab, Backspace, Delete, Insert, Home, End, PageUp,
    PageDown, CapsLock,
    // Punctuation row
    Minus, Equal, BracketLeft, BracketRight, Backslash, Semicolon, Quote,
    Backquote, Comma, Period, Slash,
    // Numpad
    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4, Numpad5, Numpad6, Numpad7,
    Numpad8, Numpad9, NumpadAdd, NumpadSubtract, NumpadMultiply, NumpadDivide,
    NumpadDecimal, NumpadEnter,
}

impl std::fmt::Display for KeyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_matches_variant_name() {
        assert_eq!(KeyCode::KeyA.as_str(), "KeyA");
        assert_eq!(KeyCode::Digit1.as_str(), "Digit1");
        assert_eq!(KeyCode::ArrowDown.as_str(), "ArrowDown");
        assert_eq!(KeyCode::NumpadEnter.as_str(), "NumpadEnter");
    }

    #[test]
    fn test_from_str_round_trip() {
        for code in KeyCode::ALL {
            let parsed: KeyCode = code.as_str().parse().unwrap();
            assert_eq!(parsed, *code);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "KeyÜ".parse::<KeyCode>().unwrap_err();
        assert_eq!(err, UnknownKeyCode("KeyÜ".to_string()));
        assert!("keya".parse::<KeyCode>().is_err());
    }

    #[test]
    fn test_serde_uses_code_string() {
        let json = serde_json::to_string(&KeyCode::KeyS).unwrap();
        assert_eq!(json, "\"KeyS\"");
        let code: KeyCode = serde_json::from_str("\"PageUp\"").unwrap();
        assert_eq!(code, KeyCode::PageUp);
    }
}
