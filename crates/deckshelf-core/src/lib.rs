//! Deckshelf core library.
//!
//! Keeps a catalog of non-native shortcuts (emulators, launchers, ROMs,
//! utilities) synchronized with a game client's own binary shortcut store.
//!
//! # Components
//!
//! - [`vdf`]: codec for the client's binary key-value format
//! - [`identity`]: stable shortcut ids
//! - [`assets`]: one-file-per-image artwork resolution
//! - [`catalog`]: the internal JSON catalog
//! - [`native`]: adapter for the client's store
//! - [`reconcile`]: timestamp-gated synchronization between the two
//!
//! # Example
//!
//! ```rust,no_run
//! use deckshelf_core::{HttpFetcher, Shelf, ShelfConfig};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn run() -> deckshelf_core::Result<()> {
//! let config = ShelfConfig::for_user_dirs(Path::new("/home/deck/.steam/steam/userdata/42/config"))?;
//! let mut shelf = Shelf::open(config, Arc::new(HttpFetcher::new()?))?;
//! let outcome = shelf.sync().await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! Invocations must be serialized by the caller: nothing here locks the
//! catalog or store files against concurrent writers.

pub mod assets;
pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod native;
pub mod network;
pub mod reconcile;
pub mod vdf;

pub use assets::{AssetKind, AssetManager, Fetcher, HttpFetcher, Image, ImageSource};
pub use catalog::{AssetSlot, Catalog, Change, HistoryEntry, Shortcut};
pub use config::ShelfConfig;
pub use error::{Result, ShelfError};
pub use identity::generate_id;
pub use native::{NativeShortcut, NativeStore, RuntimeKind};
pub use reconcile::{Direction, Reconciler, SyncOutcome, SyncStats};

use std::sync::Arc;
use tracing::info;

/// A catalog and the client store it syncs with, opened from one config.
pub struct Shelf {
    config: ShelfConfig,
    catalog: Catalog,
    native: NativeStore,
    reconciler: Reconciler,
}

impl Shelf {
    /// Load both stores. Missing files open as empty stores.
    pub fn open(config: ShelfConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        let assets = AssetManager::new(fetcher);
        let catalog = Catalog::load(&config.catalog_path, &config.images_dir, assets.clone())?;
        let native = Self::load_native(&config)?;

        info!(
            "Opened shelf: {} catalog shortcuts, {} client shortcuts",
            catalog.len(),
            native.shortcuts().len()
        );

        Ok(Self {
            config,
            catalog,
            native,
            reconciler: Reconciler::new(assets),
        })
    }

    /// Run one reconciliation pass.
    ///
    /// The client store is re-read first so edits the client made since
    /// [`Shelf::open`] are seen.
    pub async fn sync(&mut self) -> Result<SyncOutcome> {
        self.native = Self::load_native(&self.config)?;
        self.reconciler.sync(&mut self.catalog, &mut self.native).await
    }

    pub fn config(&self) -> &ShelfConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn native(&self) -> &NativeStore {
        &self.native
    }

    fn load_native(config: &ShelfConfig) -> Result<NativeStore> {
        NativeStore::load(
            &config.native_shortcuts_path,
            config.runtime,
            &config.native_artworks_dir,
        )
    }
}
