//! Internal shortcut catalog.
//!
//! The catalog is the application's own store. It holds the richer schema
//! (descriptions, ROM paths, five artwork slots) and persists as JSON,
//! sorted by name. Mutations resolve artwork through the
//! [`AssetManager`](crate::assets::AssetManager) and are appended to an
//! in-memory [`HistoryEntry`] log.

mod history;
mod library;
mod shortcut;

pub use history::HistoryEntry;
pub use library::{Catalog, Change};
pub use shortcut::{dedup_tags, AssetSlot, Shortcut};
