//! Host environment inputs
//!
//! The manager never probes the environment on its own: the platform (for
//! the macOS ctrl/meta remap) and whether the host is interactive (for
//! global binding) are injected once at construction.

use serde::{Deserialize, Serialize};

/// Operating-system family the manager runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Unknown,
}

impl Platform {
    /// Detect the platform this build is running on
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Unknown
        }
    }

    /// Check if this is macOS (drives the ctrl/meta chord remap)
    pub fn is_mac(&self) -> bool {
        matches!(self, Platform::MacOs)
    }
}

/// Ambient facts about the host, injected into `HotkeyManager::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostEnv {
    /// Platform the manager resolves chords for
    pub platform: Platform,
    /// Whether the host can deliver key events at all. Global binding is a
    /// no-op on non-interactive hosts (tests, servers, prerendering).
    pub interactive: bool,
}

impl HostEnv {
    /// An interactive host on the detected platform
    pub fn detect() -> Self {
        Self {
            platform: Platform::current(),
            interactive: true,
        }
    }

    /// A non-interactive host on the detected platform
    pub fn headless() -> Self {
        Self {
            platform: Platform::current(),
            interactive: false,
        }
    }

    /// An interactive host on an explicit platform
    pub fn interactive(platform: Platform) -> Self {
        Self {
            platform,
            interactive: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_mac() {
        assert!(Platform::MacOs.is_mac());
        assert!(!Platform::Windows.is_mac());
        assert!(!Platform::Linux.is_mac());
        assert!(!Platform::Unknown.is_mac());
    }

    #[test]
    fn test_detect_is_interactive() {
        let env = HostEnv::detect();
        assert!(env.interactive);
        assert_eq!(env.platform, Platform::current());
    }

    #[test]
    fn test_headless_is_not_interactive() {
        assert!(!HostEnv::headless().interactive);
    }
}
