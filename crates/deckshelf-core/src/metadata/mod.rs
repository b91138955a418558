//! Persistence helpers.
//!
//! Every file deckshelf owns (catalog JSON, the client's binary shortcut
//! store, the config file) is written through [`atomic_write_bytes`] so an
//! interrupted process never leaves a half-written file behind.

mod atomic;

pub use atomic::{atomic_read_json, atomic_write_bytes, atomic_write_json};

use crate::{Result, ShelfError};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Last modification time of a file in seconds since the epoch.
///
/// Returns `None` when the file does not exist.
pub fn modification_time(path: &Path) -> Result<Option<i64>> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ShelfError::io_with_path(e, path)),
    };

    let modified = metadata
        .modified()
        .map_err(|e| ShelfError::io_with_path(e, path))?;

    let secs = match modified.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    };

    Ok(Some(secs))
}
