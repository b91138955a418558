//! Shortcut artwork management.
//!
//! This module provides:
//! - [`AssetKind`] and the naming/extension rules for each kind
//! - [`Image`], a logical image resolved into one file
//! - [`AssetManager`], which fetches or copies sources and removes stale
//!   alternate-format files
//! - [`Fetcher`], the seam for remote downloads

mod fetch;
mod image;
mod manager;

pub use fetch::{Fetcher, HttpFetcher};
pub use image::{AssetKind, Image, ImageSource};
pub use manager::{copy_file, remove_file_if_exists, AssetManager};
