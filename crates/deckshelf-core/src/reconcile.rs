//! Timestamp-gated synchronization between the catalog and the client store.
//!
//! Each pass compares the two stores' modification times. The clearly newer
//! side (by more than [`SyncConfig::DEAD_ZONE_SECS`]) is authoritative and
//! propagates to the other; entries missing from it are deleted on the other
//! side. Timestamps inside the dead-zone make the pass a no-op.
//!
//! Only one direction runs per pass, so edits made on both sides within the
//! dead-zone are not merged field by field: the next pass that sees one side
//! clearly newer overwrites the other.

use crate::assets::{AssetKind, AssetManager, Image, ImageSource};
use crate::catalog::{Catalog, Change, Shortcut};
use crate::config::SyncConfig;
use crate::identity;
use crate::native::{convert, NativeShortcut, NativeStore};
use crate::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Which store a pass propagates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    NativeToInternal,
    InternalToNative,
}

/// Counts of changes applied to the target store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

impl SyncStats {
    /// Whether the pass changed any record in its target store.
    pub fn is_empty(&self) -> bool {
        self.added + self.updated + self.removed == 0
    }
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "direction", content = "stats")]
pub enum SyncOutcome {
    /// Timestamps within the dead-zone; nothing was touched.
    Skipped,
    NativeToInternal(SyncStats),
    InternalToNative(SyncStats),
}

/// Runs reconciliation passes.
pub struct Reconciler {
    assets: AssetManager,
    dead_zone: i64,
}

impl Reconciler {
    pub fn new(assets: AssetManager) -> Self {
        Self {
            assets,
            dead_zone: SyncConfig::DEAD_ZONE_SECS,
        }
    }

    pub fn with_dead_zone(mut self, seconds: i64) -> Self {
        self.dead_zone = seconds;
        self
    }

    /// Decide the direction for a pair of timestamps.
    pub fn direction(&self, native: i64, internal: i64) -> Option<Direction> {
        let delta = native - internal;
        if delta > self.dead_zone {
            Some(Direction::NativeToInternal)
        } else if -delta > self.dead_zone {
            Some(Direction::InternalToNative)
        } else {
            None
        }
    }

    /// Run one pass and persist the store it modified.
    ///
    /// A pass that changes no record writes nothing, so the stores'
    /// modification times settle once their content agrees. An error aborts
    /// the pass. In-memory changes already applied are kept;
    /// re-running the pass is safe.
    pub async fn sync(&self, catalog: &mut Catalog, native: &mut NativeStore) -> Result<SyncOutcome> {
        let native_ts = native.timestamp();
        let internal_ts = catalog.timestamp();

        let outcome = match self.direction(native_ts, internal_ts) {
            None => {
                debug!(
                    "Stores modified within {}s of each other (native {}, internal {}), skipping",
                    self.dead_zone, native_ts, internal_ts
                );
                SyncOutcome::Skipped
            }
            Some(Direction::NativeToInternal) => {
                let stats = self
                    .native_to_internal(catalog, native)
                    .await
                    .map_err(|e| e.in_operation("sync from client store"))?;
                SyncOutcome::NativeToInternal(stats)
            }
            Some(Direction::InternalToNative) => {
                let stats = self
                    .internal_to_native(catalog, native)
                    .await
                    .map_err(|e| e.in_operation("sync to client store"))?;
                SyncOutcome::InternalToNative(stats)
            }
        };

        info!("Sync finished: {:?}", outcome);
        Ok(outcome)
    }

    async fn native_to_internal(&self, catalog: &mut Catalog, native: &NativeStore) -> Result<SyncStats> {
        let mut stats = SyncStats::default();
        let mut seen = HashSet::new();

        for record in native.shortcuts() {
            let id = convert::internal_id(record);
            let merged = convert::to_internal(record, catalog.get(&id));

            match catalog.upsert(merged, false).await? {
                Change::Added => stats.added += 1,
                Change::Updated => stats.updated += 1,
                Change::Unchanged => {}
            }
            seen.insert(id);
        }

        let stale: Vec<Shortcut> = catalog
            .all()
            .iter()
            .filter(|s| !seen.contains(&s.id))
            .cloned()
            .collect();
        for shortcut in &stale {
            if catalog.remove(shortcut)? {
                stats.removed += 1;
            }
        }

        if !stats.is_empty() {
            catalog.save()?;
        }
        Ok(stats)
    }

    async fn internal_to_native(&self, catalog: &Catalog, native: &mut NativeStore) -> Result<SyncStats> {
        let mut stats = SyncStats::default();
        let runtime = native.runtime();
        let artworks_dir = native.artworks_dir().to_path_buf();

        let mut records: Vec<NativeShortcut> = native.shortcuts().to_vec();
        let mut touched = vec![false; records.len()];

        for shortcut in catalog.all() {
            let app_id = identity::parse_id(&shortcut.id)
                .unwrap_or_else(|| identity::generate_id(&shortcut.executable, &shortcut.name));
            let index = records.iter().position(|r| r.app_id == app_id);

            let mut record = convert::from_internal(shortcut, runtime, index.map(|i| &records[i]));
            record.icon = self.resolve_artwork(shortcut, record.app_id, &artworks_dir).await?;

            match index {
                Some(i) => {
                    if records[i] != record {
                        stats.updated += 1;
                    }
                    records[i] = record;
                    touched[i] = true;
                }
                None => {
                    records.push(record);
                    touched.push(true);
                    stats.added += 1;
                }
            }
        }

        let kept_ids: HashSet<u32> = records
            .iter()
            .zip(&touched)
            .filter(|(_, touched)| **touched)
            .map(|(record, _)| record.app_id)
            .collect();

        let mut kept = Vec::with_capacity(kept_ids.len());
        for (record, touched) in records.into_iter().zip(touched) {
            if touched {
                kept.push(record);
                continue;
            }

            debug!("Removing client shortcut {} ({})", record.app_name, record.app_id);
            // A duplicate of a kept id shares its artwork files
            if !kept_ids.contains(&record.app_id) {
                for kind in AssetKind::ALL {
                    self.assets.remove(&native_image(kind, record.app_id, "", &artworks_dir))?;
                }
            }
            stats.removed += 1;
        }

        native.replace_shortcuts(kept);
        if !stats.is_empty() {
            native.save()?;
        }
        Ok(stats)
    }

    /// Place every artwork slot of a catalog shortcut into the client's grid
    /// directory. Returns the icon path for the client record.
    async fn resolve_artwork(&self, shortcut: &Shortcut, app_id: u32, artworks_dir: &Path) -> Result<String> {
        let mut icon = String::new();

        for kind in AssetKind::ALL {
            let slot = shortcut.asset(kind);
            // Grid art set from the client itself survives an empty slot
            if kind != AssetKind::Icon && slot.is_empty() {
                continue;
            }
            let source = match &slot.path {
                Some(path) if path.is_file() => path.to_string_lossy().into_owned(),
                _ => slot.source.clone(),
            };

            let image = native_image(kind, app_id, &source, artworks_dir);
            // Local copies skip identical files; remote art is fetched once
            let overwrite = matches!(image.source, ImageSource::Local(_));
            let resolved = self.assets.resolve(&image, overwrite).await?;

            if kind == AssetKind::Icon {
                icon = resolved
                    .map(|path| path.to_string_lossy().into_owned())
                    .unwrap_or_default();
            }
        }

        Ok(icon)
    }
}

fn native_image(kind: AssetKind, app_id: u32, source: &str, artworks_dir: &Path) -> Image {
    Image::for_asset(kind, source, artworks_dir, &identity::format_id(app_id))
}
