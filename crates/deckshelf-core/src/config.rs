//! Configuration constants and the persisted shelf configuration.
//!
//! Locations are always supplied by the caller through [`ShelfConfig`]; the
//! constants here only cover behavior that is fixed across installations.

use crate::error::{Result, ShelfError};
use crate::metadata::{atomic_read_json, atomic_write_json};
use crate::native::RuntimeKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Reconciliation timing.
pub struct SyncConfig;

impl SyncConfig {
    /// Timestamps closer than this many seconds are treated as concurrent.
    pub const DEAD_ZONE_SECS: i64 = 60;
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const USER_AGENT: &'static str = "deckshelf/0.1";
    pub const DOWNLOAD_TEMP_SUFFIX: &'static str = ".part";
}

/// File and directory names.
pub struct PathsConfig;

impl PathsConfig {
    pub const APP_DIR_NAME: &'static str = "deckshelf";
    pub const CONFIG_FILENAME: &'static str = "config.json";
    pub const CATALOG_FILENAME: &'static str = "shortcuts.json";
    pub const IMAGES_DIR_NAME: &'static str = "images";
    pub const NATIVE_SHORTCUTS_FILENAME: &'static str = "shortcuts.vdf";
    pub const NATIVE_ARTWORKS_DIR_NAME: &'static str = "grid";
}

/// Locations and runtime facts for one shelf installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelfConfig {
    /// JSON file holding the internal catalog.
    pub catalog_path: PathBuf,
    /// Directory for the catalog's resolved images.
    pub images_dir: PathBuf,
    /// The client's binary shortcut store.
    pub native_shortcuts_path: PathBuf,
    /// The client's grid directory, where shortcut artwork is placed for it.
    pub native_artworks_dir: PathBuf,
    /// How the client itself is installed.
    #[serde(default)]
    pub runtime: RuntimeKind,
}

impl ShelfConfig {
    /// Build a config with the catalog under `data_dir` and the native
    /// store under the client's per-user `config_dir`.
    pub fn new(data_dir: &Path, native_config_dir: &Path, runtime: RuntimeKind) -> Self {
        Self {
            catalog_path: data_dir.join(PathsConfig::CATALOG_FILENAME),
            images_dir: data_dir.join(PathsConfig::IMAGES_DIR_NAME),
            native_shortcuts_path: native_config_dir.join(PathsConfig::NATIVE_SHORTCUTS_FILENAME),
            native_artworks_dir: native_config_dir.join(PathsConfig::NATIVE_ARTWORKS_DIR_NAME),
            runtime,
        }
    }

    /// Defaults rooted in the user's data directory, with the runtime probed
    /// from the filesystem.
    pub fn for_user_dirs(native_config_dir: &Path) -> Result<Self> {
        let data_dir = dirs::data_dir().ok_or_else(|| ShelfError::Config {
            message: "Could not determine user data directory".to_string(),
        })?;

        Ok(Self::new(
            &data_dir.join(PathsConfig::APP_DIR_NAME),
            native_config_dir,
            RuntimeKind::detect(),
        ))
    }

    /// Load a config file; returns `None` when it does not exist yet.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        atomic_read_json(path)
    }

    /// Persist the config file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        atomic_write_json(path, self, false)
    }
}
