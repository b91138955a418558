//! How the game client is installed, and the executable wrapping it needs.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Prefix that lets a sandboxed client launch host executables.
pub const FLATPAK_SPAWN_PREFIX: &str = "/usr/bin/flatpak-spawn --host ";

const FLATPAK_EXPORT: &str = "flatpak/exports/bin/com.valvesoftware.Steam";

/// Installation kind of the game client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    #[default]
    Native,
    Flatpak,
    Snap,
}

impl RuntimeKind {
    /// Probe the current user's system.
    pub fn detect() -> Self {
        Self::detect_in(dirs::home_dir().as_deref(), Path::new("/"))
    }

    /// Probe with explicit home and filesystem roots.
    pub fn detect_in(home: Option<&Path>, root: &Path) -> Self {
        let mut flatpak_exports = vec![root.join("var/lib").join(FLATPAK_EXPORT)];
        if let Some(home) = home {
            flatpak_exports.push(home.join(".local/share").join(FLATPAK_EXPORT));
        }

        // The export is a launcher script, not a directory
        if flatpak_exports.iter().any(|p| p.is_file()) {
            debug!("Detected flatpak client installation");
            return RuntimeKind::Flatpak;
        }

        if home.is_some_and(|h| h.join("snap/steam").is_dir()) {
            debug!("Detected snap client installation");
            return RuntimeKind::Snap;
        }

        RuntimeKind::Native
    }

    /// Executable as the client must store it.
    pub fn wrap(&self, executable: &str) -> String {
        match self {
            RuntimeKind::Flatpak if !executable.starts_with(FLATPAK_SPAWN_PREFIX) => {
                format!("{}{}", FLATPAK_SPAWN_PREFIX, executable)
            }
            _ => executable.to_string(),
        }
    }

    /// Canonical executable, with any sandbox wrapper removed.
    pub fn unwrap(executable: &str) -> &str {
        executable
            .strip_prefix(FLATPAK_SPAWN_PREFIX)
            .unwrap_or(executable)
    }
}
