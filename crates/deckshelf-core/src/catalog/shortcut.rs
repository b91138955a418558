//! The catalog's shortcut record.

use crate::assets::{AssetKind, Image};
use crate::identity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One artwork slot: where the image comes from and where it was resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSlot {
    /// URL or local path; empty when the slot is cleared.
    #[serde(default)]
    pub source: String,
    /// Resolved file, set after the asset manager placed it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl AssetSlot {
    pub fn from_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            path: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source.trim().is_empty() && self.path.is_none()
    }
}

/// A shortcut in the internal catalog.
///
/// `id` is derived from `executable` and `name`; use [`Shortcut::new`] or
/// [`Shortcut::regenerate_id`] after changing either of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Shortcut {
    pub id: String,
    pub name: String,
    pub description: String,
    pub platform: String,
    pub program: String,
    pub executable: String,
    pub start_directory: String,
    pub launch_options: String,
    /// Only set for entries produced by a ROM scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    pub tags: Vec<String>,
    pub icon: AssetSlot,
    pub logo: AssetSlot,
    pub cover: AssetSlot,
    pub banner: AssetSlot,
    pub hero: AssetSlot,
    /// Last modification, seconds since the Unix epoch.
    pub timestamp: i64,
}

impl Shortcut {
    pub fn new(name: impl Into<String>, executable: impl Into<String>) -> Self {
        let mut shortcut = Self {
            name: name.into(),
            executable: executable.into(),
            ..Default::default()
        };
        shortcut.regenerate_id();
        shortcut
    }

    /// Recompute `id` from the current executable and name.
    pub fn regenerate_id(&mut self) {
        self.id = identity::generate_id_string(&self.executable, &self.name);
    }

    /// Assign an id when none is set yet.
    pub(crate) fn ensure_id(&mut self) {
        if self.id.is_empty() || self.id == "0" {
            self.regenerate_id();
        }
    }

    pub fn asset(&self, kind: AssetKind) -> &AssetSlot {
        match kind {
            AssetKind::Icon => &self.icon,
            AssetKind::Logo => &self.logo,
            AssetKind::Cover => &self.cover,
            AssetKind::Banner => &self.banner,
            AssetKind::Hero => &self.hero,
        }
    }

    pub fn asset_mut(&mut self, kind: AssetKind) -> &mut AssetSlot {
        match kind {
            AssetKind::Icon => &mut self.icon,
            AssetKind::Logo => &mut self.logo,
            AssetKind::Cover => &mut self.cover,
            AssetKind::Banner => &mut self.banner,
            AssetKind::Hero => &mut self.hero,
        }
    }

    /// The image for one slot, resolved under `images_dir`.
    pub fn image(&self, kind: AssetKind, images_dir: &Path) -> Image {
        Image::for_asset(kind, &self.asset(kind).source, images_dir, &self.id)
    }

    /// Replace the tags, dropping duplicates.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = dedup_tags(tags);
    }

    /// Equality ignoring the modification timestamp.
    pub fn same_content(&self, other: &Shortcut) -> bool {
        let mut other = other.clone();
        other.timestamp = self.timestamp;
        *self == other
    }
}

/// Collect tags as an ordered set: blanks and repeats are dropped, the first
/// occurrence keeps its position.
pub fn dedup_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut result: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.into();
        if !tag.trim().is_empty() && !result.contains(&tag) {
            result.push(tag);
        }
    }
    result
}
