//! The client's binary shortcut store on disk.

use super::runtime::RuntimeKind;
use super::shortcut::NativeShortcut;
use crate::metadata::{atomic_write_bytes, modification_time};
use crate::vdf::{self, VdfMap};
use crate::{Result, ShelfError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const SHORTCUTS_KEY: &str = "shortcuts";

/// Decode a store document into records, in document order.
pub fn decode_shortcuts(bytes: &[u8]) -> Result<Vec<NativeShortcut>> {
    let document = vdf::decode(bytes)?;

    let Some(node) = document.get(SHORTCUTS_KEY) else {
        warn!("Shortcut store has no '{}' map, treating as empty", SHORTCUTS_KEY);
        return Ok(Vec::new());
    };
    let Some(entries) = node.as_map() else {
        warn!(
            "Shortcut store '{}' is a {}, treating as empty",
            SHORTCUTS_KEY,
            node.kind()
        );
        return Ok(Vec::new());
    };

    let mut shortcuts = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter() {
        match entry.as_map() {
            Some(map) => shortcuts.push(NativeShortcut::from_vdf(map)),
            None => warn!("Skipping shortcut entry {}: {} is not a map", index, entry.kind()),
        }
    }
    Ok(shortcuts)
}

/// Encode records as a store document keyed by list position.
pub fn encode_shortcuts(shortcuts: &[NativeShortcut]) -> Result<Vec<u8>> {
    let entries: VdfMap = shortcuts
        .iter()
        .enumerate()
        .map(|(index, shortcut)| (index.to_string(), shortcut.to_vdf()))
        .collect();

    vdf::encode(&VdfMap::new().with(SHORTCUTS_KEY, entries))
}

/// The client's shortcut store: records plus where they live.
#[derive(Debug, Clone)]
pub struct NativeStore {
    path: PathBuf,
    artworks_dir: PathBuf,
    runtime: RuntimeKind,
    shortcuts: Vec<NativeShortcut>,
    timestamp: Option<i64>,
}

impl NativeStore {
    /// Load the store at `path`.
    ///
    /// A missing file is an empty store: the client has not created it yet.
    pub fn load(
        path: impl Into<PathBuf>,
        runtime: RuntimeKind,
        artworks_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let path = path.into();

        let shortcuts = match fs::read(&path) {
            Ok(bytes) => decode_shortcuts(&bytes).map_err(|e| e.in_operation("load shortcut store"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No shortcut store at {}", path.display());
                Vec::new()
            }
            Err(e) => {
                return Err(ShelfError::io_with_path(e, &path).in_operation("load shortcut store"))
            }
        };
        let timestamp = modification_time(&path)?;

        debug!("Loaded {} native shortcuts from {}", shortcuts.len(), path.display());
        Ok(Self {
            path,
            artworks_dir: artworks_dir.into(),
            runtime,
            shortcuts,
            timestamp,
        })
    }

    /// Write the store atomically, keeping a backup of the previous file.
    pub fn save(&mut self) -> Result<()> {
        let bytes = encode_shortcuts(&self.shortcuts).map_err(|e| e.in_operation("save shortcut store"))?;
        atomic_write_bytes(&self.path, &bytes, true).map_err(|e| e.in_operation("save shortcut store"))?;

        self.timestamp = modification_time(&self.path)?;
        info!("Saved {} native shortcuts to {}", self.shortcuts.len(), self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn artworks_dir(&self) -> &Path {
        &self.artworks_dir
    }

    pub fn runtime(&self) -> RuntimeKind {
        self.runtime
    }

    pub fn shortcuts(&self) -> &[NativeShortcut] {
        &self.shortcuts
    }

    pub fn find(&self, app_id: u32) -> Option<&NativeShortcut> {
        self.shortcuts.iter().find(|s| s.app_id == app_id)
    }

    /// File mtime in seconds since the epoch; zero when there is no file.
    pub fn timestamp(&self) -> i64 {
        self.timestamp.unwrap_or(0)
    }

    pub(crate) fn replace_shortcuts(&mut self, shortcuts: Vec<NativeShortcut>) {
        self.shortcuts = shortcuts;
    }
}
