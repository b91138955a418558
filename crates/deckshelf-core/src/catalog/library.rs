//! The internal shortcut catalog and its JSON persistence.

use super::history::HistoryEntry;
use super::shortcut::Shortcut;
use crate::assets::{AssetKind, AssetManager};
use crate::identity;
use crate::metadata::{atomic_read_json, atomic_write_json, modification_time};
use crate::{Result, ShelfError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk catalog document.
#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    shortcuts: Vec<Shortcut>,
}

#[derive(Serialize)]
struct CatalogDocumentRef<'a> {
    shortcuts: &'a [Shortcut],
}

/// What an upsert did to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added,
    Updated,
    Unchanged,
}

/// The application's own shortcut store.
pub struct Catalog {
    database_path: PathBuf,
    images_dir: PathBuf,
    shortcuts: Vec<Shortcut>,
    history: Vec<HistoryEntry>,
    assets: AssetManager,
    /// Database file mtime as of the last load or save.
    file_timestamp: i64,
    /// Time of the last in-memory mutation.
    modified_at: Option<i64>,
}

impl Catalog {
    /// Load the catalog from `database_path`.
    ///
    /// A missing database file yields an empty catalog.
    pub fn load(
        database_path: impl Into<PathBuf>,
        images_dir: impl Into<PathBuf>,
        assets: AssetManager,
    ) -> Result<Self> {
        let database_path = database_path.into();
        let document: CatalogDocument = atomic_read_json(&database_path)
            .map_err(|e| e.in_operation("load catalog"))?
            .unwrap_or_default();
        let file_timestamp = modification_time(&database_path)?.unwrap_or(0);

        debug!(
            "Loaded {} shortcuts from {}",
            document.shortcuts.len(),
            database_path.display()
        );

        Ok(Self {
            database_path,
            images_dir: images_dir.into(),
            shortcuts: document.shortcuts,
            history: Vec::new(),
            assets,
            file_timestamp,
            modified_at: None,
        })
    }

    /// Persist the catalog, sorted by name.
    pub fn save(&mut self) -> Result<()> {
        // Stable sort: equal names keep their relative order
        self.shortcuts.sort_by(|a, b| a.name.cmp(&b.name));

        let document = CatalogDocumentRef {
            shortcuts: &self.shortcuts,
        };
        atomic_write_json(&self.database_path, &document, true)
            .map_err(|e| e.in_operation("save catalog"))?;

        self.file_timestamp = modification_time(&self.database_path)?.unwrap_or(0);
        info!(
            "Saved {} shortcuts to {}",
            self.shortcuts.len(),
            self.database_path.display()
        );
        Ok(())
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    pub fn all(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Last modification of the catalog, in seconds since the epoch.
    ///
    /// The later of the database file's mtime and the last in-memory change;
    /// zero for a catalog that was never written nor changed.
    pub fn timestamp(&self) -> i64 {
        self.modified_at
            .map_or(self.file_timestamp, |t| t.max(self.file_timestamp))
    }

    pub fn get(&self, id: &str) -> Option<&Shortcut> {
        self.shortcuts.iter().find(|s| s.id == id)
    }

    /// Look up a shortcut by the pair its id is derived from.
    pub fn find(&self, name: &str, executable: &str) -> Option<&Shortcut> {
        self.get(&identity::generate_id_string(executable, name))
    }

    /// Add a new shortcut, resolving all of its assets.
    pub async fn add(&mut self, mut shortcut: Shortcut) -> Result<()> {
        shortcut.ensure_id();
        if self.get(&shortcut.id).is_some() {
            return Err(ShelfError::AlreadyExists { id: shortcut.id });
        }

        self.resolve_assets(&mut shortcut, true)
            .await
            .map_err(|e| e.in_operation("add shortcut"))?;
        shortcut.timestamp = self.touch();

        debug!("Added shortcut {} ({})", shortcut.name, shortcut.id);
        self.history.push(HistoryEntry::Added {
            after: shortcut.clone(),
        });
        self.shortcuts.push(shortcut);
        Ok(())
    }

    /// Replace an existing shortcut with the same id.
    ///
    /// Returns `false` when the resolved shortcut is identical to the stored
    /// one; nothing is recorded in that case.
    pub async fn update(&mut self, mut shortcut: Shortcut, overwrite_assets: bool) -> Result<bool> {
        shortcut.ensure_id();
        let index = self
            .position(&shortcut.id)
            .ok_or_else(|| ShelfError::NotFound {
                id: shortcut.id.clone(),
            })
            .map_err(|e| e.in_operation("update shortcut"))?;

        self.resolve_assets(&mut shortcut, overwrite_assets)
            .await
            .map_err(|e| e.in_operation("update shortcut"))?;

        if self.shortcuts[index].same_content(&shortcut) {
            return Ok(false);
        }

        shortcut.timestamp = self.touch();
        debug!("Updated shortcut {} ({})", shortcut.name, shortcut.id);

        let before = std::mem::replace(&mut self.shortcuts[index], shortcut.clone());
        self.history.push(HistoryEntry::Updated {
            before,
            after: shortcut,
        });
        Ok(true)
    }

    /// Update the shortcut if its id is present, add it otherwise.
    pub async fn upsert(&mut self, mut shortcut: Shortcut, overwrite_assets: bool) -> Result<Change> {
        shortcut.ensure_id();
        if self.get(&shortcut.id).is_some() {
            let changed = self.update(shortcut, overwrite_assets).await?;
            Ok(if changed { Change::Updated } else { Change::Unchanged })
        } else {
            self.add(shortcut).await?;
            Ok(Change::Added)
        }
    }

    /// Remove the shortcut with the same id along with its asset files.
    ///
    /// Returns `false` when no such shortcut exists.
    pub fn remove(&mut self, shortcut: &Shortcut) -> Result<bool> {
        let Some(index) = self.position(&shortcut.id) else {
            return Ok(false);
        };

        let existing = &self.shortcuts[index];
        for kind in AssetKind::ALL {
            self.assets
                .remove(&existing.image(kind, &self.images_dir))
                .map_err(|e| e.in_operation("remove shortcut"))?;
        }

        let before = self.shortcuts.remove(index);
        self.touch();
        debug!("Removed shortcut {} ({})", before.name, before.id);
        self.history.push(HistoryEntry::Removed { before });
        Ok(true)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.shortcuts.iter().position(|s| s.id == id)
    }

    fn touch(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp();
        self.modified_at = Some(now);
        now
    }

    async fn resolve_assets(&self, shortcut: &mut Shortcut, overwrite: bool) -> Result<()> {
        for kind in AssetKind::ALL {
            let image = shortcut.image(kind, &self.images_dir);
            let resolved = self.assets.resolve(&image, overwrite).await?;
            shortcut.asset_mut(kind).path = resolved;
        }
        Ok(())
    }
}
