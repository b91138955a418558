//! Adapter for the game client's own shortcut store.
//!
//! The store is one binary document, `{"shortcuts": {"0": {...}, ...}}`,
//! read and written through [`crate::vdf`]. Records are flat: a single icon
//! path and a set of flags the client owns.

pub mod convert;
mod runtime;
mod shortcut;
mod store;

pub use runtime::{RuntimeKind, FLATPAK_SPAWN_PREFIX};
pub use shortcut::NativeShortcut;
pub use store::{decode_shortcuts, encode_shortcuts, NativeStore};
