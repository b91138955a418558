//! Resolves logical images to exactly one file on disk.
//!
//! The game client picks artwork by which file exists, not by a metadata
//! field, so every resolve removes the variants of the basename that are not
//! the resolved target.

use super::fetch::Fetcher;
use super::image::{Image, ImageSource};
use crate::{Result, ShelfError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Applies image sources to the filesystem.
#[derive(Clone)]
pub struct AssetManager {
    fetcher: Arc<dyn Fetcher>,
}

impl AssetManager {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Resolve `image` to its single target file.
    ///
    /// Returns the target path when a file is in place afterwards, or `None`
    /// when the image has no usable source (all variants are removed) or its
    /// local source is missing. With `overwrite == false` an existing target
    /// is never replaced.
    pub async fn resolve(&self, image: &Image, overwrite: bool) -> Result<Option<PathBuf>> {
        let target = image.matching_extension().map(|ext| image.path(ext));

        for variant in image.variants() {
            if Some(&variant) != target.as_ref() {
                remove_file_if_exists(&variant)?;
            }
        }

        let Some(target) = target else {
            return Ok(None);
        };

        match &image.source {
            ImageSource::Local(source) => {
                if source != &target {
                    if !source.is_file() {
                        warn!(
                            "Image source {} does not exist, leaving {} unresolved",
                            source.display(),
                            target.display()
                        );
                    } else {
                        copy_file(source, &target, overwrite)?;
                    }
                }
            }
            ImageSource::Url(url) => {
                if target.exists() && !overwrite {
                    debug!("Keeping existing {}", target.display());
                } else {
                    debug!("Fetching {} to {}", url, target.display());
                    self.fetcher.fetch(url.as_str(), &target).await?;
                }
            }
            ImageSource::None => {}
        }

        Ok(target.is_file().then_some(target))
    }

    /// Delete every extension variant of the image, whatever its source.
    pub fn remove(&self, image: &Image) -> Result<()> {
        for variant in image.variants() {
            remove_file_if_exists(&variant)?;
        }
        Ok(())
    }
}

/// Remove a file; a missing file is not an error.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ShelfError::Io {
            message: "remove stale image".to_string(),
            path: Some(path.to_path_buf()),
            source: Some(e),
        }),
    }
}

/// Copy `source` to `destination`.
///
/// An existing destination is kept unless `overwrite` is set, and is never
/// rewritten when its content already matches the source.
pub fn copy_file(source: &Path, destination: &Path, overwrite: bool) -> Result<()> {
    if source == destination {
        return Ok(());
    }

    if destination.exists() {
        if !overwrite {
            debug!("Keeping existing {}", destination.display());
            return Ok(());
        }
        if same_content(source, destination)? {
            debug!("{} is already up to date", destination.display());
            return Ok(());
        }
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| ShelfError::Io {
            message: "create image directory".to_string(),
            path: Some(parent.to_path_buf()),
            source: Some(e),
        })?;
    }

    debug!("Copying {} to {}", source.display(), destination.display());
    fs::copy(source, destination).map_err(|e| ShelfError::Io {
        message: format!("copy image from {}", source.display()),
        path: Some(destination.to_path_buf()),
        source: Some(e),
    })?;

    Ok(())
}

fn same_content(a: &Path, b: &Path) -> Result<bool> {
    let len_a = fs::metadata(a).map_err(|e| ShelfError::io_with_path(e, a))?.len();
    let len_b = fs::metadata(b).map_err(|e| ShelfError::io_with_path(e, b))?.len();
    if len_a != len_b {
        return Ok(false);
    }

    let content_a = fs::read(a).map_err(|e| ShelfError::io_with_path(e, a))?;
    let content_b = fs::read(b).map_err(|e| ShelfError::io_with_path(e, b))?;
    Ok(content_a == content_b)
}
