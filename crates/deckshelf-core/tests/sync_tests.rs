//! End-to-end reconciliation between a catalog file and a client store file.

use async_trait::async_trait;
use deckshelf_core::native::encode_shortcuts;
use deckshelf_core::{
    generate_id, AssetManager, AssetSlot, Catalog, Fetcher, NativeShortcut, NativeStore,
    Reconciler, Result, RuntimeKind, Shelf, ShelfConfig, ShelfError, Shortcut, SyncOutcome,
    SyncStats,
};
use filetime::{set_file_mtime, FileTime};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

struct NoFetch;

#[async_trait]
impl Fetcher for NoFetch {
    async fn fetch(&self, url: &str, _destination: &Path) -> Result<()> {
        Err(ShelfError::DownloadFailed {
            url: url.to_string(),
            message: "offline".to_string(),
        })
    }
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("shortcuts.json")
    }

    fn images_dir(&self) -> PathBuf {
        self.dir.path().join("images")
    }

    fn native_path(&self) -> PathBuf {
        self.dir.path().join("config/shortcuts.vdf")
    }

    fn grid_dir(&self) -> PathBuf {
        self.dir.path().join("config/grid")
    }

    fn assets(&self) -> AssetManager {
        AssetManager::new(Arc::new(NoFetch))
    }

    fn catalog(&self) -> Catalog {
        Catalog::load(self.catalog_path(), self.images_dir(), self.assets()).unwrap()
    }

    fn native(&self) -> NativeStore {
        NativeStore::load(self.native_path(), RuntimeKind::Native, self.grid_dir()).unwrap()
    }

    fn write_native(&self, records: &[NativeShortcut]) {
        fs::create_dir_all(self.native_path().parent().unwrap()).unwrap();
        fs::write(self.native_path(), encode_shortcuts(records).unwrap()).unwrap();
    }

    fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.assets())
    }
}

fn now() -> i64 {
    FileTime::now().unix_seconds()
}

fn age(path: &Path, seconds: i64) {
    set_file_mtime(path, FileTime::from_unix_time(now() - seconds, 0)).unwrap();
}

fn mtime(path: &Path) -> FileTime {
    FileTime::from_last_modification_time(&fs::metadata(path).unwrap())
}

fn native_record(name: &str, exe: &str) -> NativeShortcut {
    NativeShortcut {
        app_id: generate_id(exe, name),
        app_name: name.into(),
        exe: exe.into(),
        ..Default::default()
    }
}

fn sorted_names(catalog: &Catalog) -> Vec<String> {
    catalog.all().iter().map(|s| s.name.clone()).collect()
}

#[tokio::test]
async fn test_newer_native_store_converges_catalog() {
    let fx = Fixture::new();

    let mut catalog = fx.catalog();
    let mut alpha = Shortcut::new("Alpha", "/bin/alpha");
    alpha.description = "Catalog only metadata".into();
    alpha.launch_options = "--old".into();
    catalog.add(alpha).await.unwrap();
    catalog.add(Shortcut::new("Charlie", "/bin/charlie")).await.unwrap();
    catalog.save().unwrap();
    age(&fx.catalog_path(), 600);

    let mut native_alpha = native_record("Alpha", "/bin/alpha");
    native_alpha.launch_options = "--new".into();
    native_alpha.tags = vec!["Favorites".into()];
    fx.write_native(&[native_alpha, native_record("Bravo", "/bin/bravo")]);

    let mut catalog = fx.catalog();
    let mut native = fx.native();
    let outcome = fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::NativeToInternal(SyncStats {
            added: 1,
            updated: 1,
            removed: 1,
        })
    );
    assert_eq!(sorted_names(&catalog), vec!["Alpha", "Bravo"]);

    let alpha = catalog.find("Alpha", "/bin/alpha").unwrap();
    assert_eq!(alpha.launch_options, "--new");
    assert_eq!(alpha.tags, vec!["Favorites"]);
    assert_eq!(alpha.description, "Catalog only metadata");

    // Persisted
    let reloaded = fx.catalog();
    assert_eq!(sorted_names(&reloaded), vec!["Alpha", "Bravo"]);
    assert!(reloaded.find("Charlie", "/bin/charlie").is_none());
}

#[tokio::test]
async fn test_newer_catalog_converges_native_store() {
    let fx = Fixture::new();

    let mut alpha = native_record("Alpha", "/bin/alpha");
    alpha.is_hidden = 1;
    alpha.allow_desktop_config = 1;
    alpha.allow_overlay = 1;
    alpha.open_vr = 1;
    alpha.devkit = 1;
    alpha.devkit_game_id = "devkit-alpha".into();
    alpha.devkit_override_app_id = 77;
    alpha.last_play_time = 1_700_000_000;
    alpha.shortcut_path = "/apps/alpha.desktop".into();
    let delta = native_record("Delta", "/bin/delta");
    fx.write_native(&[alpha.clone(), delta]);
    age(&fx.native_path(), 600);

    let mut catalog = fx.catalog();
    let mut updated = Shortcut::new("Alpha", "/bin/alpha");
    updated.launch_options = "--fullscreen".into();
    catalog.add(updated).await.unwrap();
    catalog.add(Shortcut::new("Echo", "/bin/echo")).await.unwrap();
    catalog.save().unwrap();

    let mut native = fx.native();
    let outcome = fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::InternalToNative(SyncStats {
            added: 1,
            updated: 1,
            removed: 1,
        })
    );

    let reloaded = fx.native();
    let names: Vec<_> = reloaded.shortcuts().iter().map(|s| s.app_name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Echo"]);

    let synced = reloaded.find(alpha.app_id).unwrap();
    assert_eq!(synced.launch_options, "--fullscreen");
    assert_eq!(synced.is_hidden, alpha.is_hidden);
    assert_eq!(synced.allow_desktop_config, alpha.allow_desktop_config);
    assert_eq!(synced.allow_overlay, alpha.allow_overlay);
    assert_eq!(synced.open_vr, alpha.open_vr);
    assert_eq!(synced.devkit, alpha.devkit);
    assert_eq!(synced.devkit_game_id, alpha.devkit_game_id);
    assert_eq!(synced.devkit_override_app_id, alpha.devkit_override_app_id);
    assert_eq!(synced.last_play_time, alpha.last_play_time);
    assert_eq!(synced.shortcut_path, alpha.shortcut_path);

    let echo = reloaded.find(generate_id("/bin/echo", "Echo")).unwrap();
    assert_eq!(echo.is_hidden, 0);
    assert_eq!(echo.last_play_time, 0);
}

#[tokio::test]
async fn test_dead_zone_leaves_both_stores_untouched() {
    let fx = Fixture::new();

    let mut catalog = fx.catalog();
    catalog.add(Shortcut::new("Alpha", "/bin/alpha")).await.unwrap();
    catalog.save().unwrap();
    fx.write_native(&[native_record("Bravo", "/bin/bravo")]);
    age(&fx.catalog_path(), 20);
    age(&fx.native_path(), 70);

    let catalog_bytes = fs::read(fx.catalog_path()).unwrap();
    let native_bytes = fs::read(fx.native_path()).unwrap();

    let mut catalog = fx.catalog();
    let mut native = fx.native();
    let outcome = fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();

    assert_eq!(outcome, SyncOutcome::Skipped);
    assert_eq!(fs::read(fx.catalog_path()).unwrap(), catalog_bytes);
    assert_eq!(fs::read(fx.native_path()).unwrap(), native_bytes);
    assert_eq!(sorted_names(&catalog), vec!["Alpha"]);
    assert_eq!(native.shortcuts().len(), 1);
}

#[tokio::test]
async fn test_record_without_tags_syncs_with_empty_tags() {
    use deckshelf_core::vdf::{self, VdfMap};

    let fx = Fixture::new();
    let app_id = generate_id("/bin/test", "Test");
    let document = VdfMap::new().with(
        "shortcuts",
        VdfMap::new().with(
            "0",
            VdfMap::new()
                .with("appid", app_id)
                .with("AppName", "Test")
                .with("Exe", "/bin/test"),
        ),
    );
    fs::create_dir_all(fx.native_path().parent().unwrap()).unwrap();
    fs::write(fx.native_path(), vdf::encode(&document).unwrap()).unwrap();

    let mut catalog = fx.catalog();
    let mut native = fx.native();
    assert!(native.find(app_id).unwrap().tags.is_empty());

    let outcome = fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();
    assert!(matches!(outcome, SyncOutcome::NativeToInternal(_)));

    let shortcut = catalog.find("Test", "/bin/test").unwrap();
    assert!(shortcut.tags.is_empty());
}

#[tokio::test]
async fn test_icon_is_resolved_into_client_artwork() {
    let fx = Fixture::new();
    let icon = fx.dir.path().join("alpha.ico");
    fs::write(&icon, b"icon bytes").unwrap();

    let mut catalog = fx.catalog();
    let mut alpha = Shortcut::new("Alpha", "/bin/alpha");
    alpha.icon = AssetSlot::from_source(icon.to_string_lossy());
    catalog.add(alpha.clone()).await.unwrap();

    let mut native = fx.native();
    let outcome = fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();
    assert!(matches!(outcome, SyncOutcome::InternalToNative(_)));

    let expected = fx.grid_dir().join(format!("{}_icon.ico", alpha.id));
    let record = native.find(generate_id("/bin/alpha", "Alpha")).unwrap();
    assert_eq!(record.icon, expected.to_string_lossy());
    assert_eq!(fs::read(&expected).unwrap(), b"icon bytes");

    // Removing the shortcut on the catalog side clears the client's icon
    catalog.remove(&alpha).unwrap();
    age(&fx.native_path(), 600);
    let mut native = fx.native();
    let outcome = fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::InternalToNative(SyncStats {
            added: 0,
            updated: 0,
            removed: 1,
        })
    );
    assert!(native.shortcuts().is_empty());
    assert!(!expected.exists());
}

#[tokio::test]
async fn test_repeated_saves_are_byte_identical() {
    let fx = Fixture::new();
    let mut catalog = fx.catalog();
    for name in ["Alpha", "Bravo", "Charlie"] {
        let mut shortcut = Shortcut::new(name, format!("/bin/{}", name.to_lowercase()));
        shortcut.tags = vec!["Emulators".into(), name.into()];
        catalog.add(shortcut).await.unwrap();
    }

    let mut native = fx.native();
    fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();
    let first = fs::read(fx.native_path()).unwrap();

    native.save().unwrap();
    assert_eq!(fs::read(fx.native_path()).unwrap(), first);
}

#[tokio::test]
async fn test_shelf_open_and_sync() {
    let fx = Fixture::new();
    let config = ShelfConfig {
        catalog_path: fx.catalog_path(),
        images_dir: fx.images_dir(),
        native_shortcuts_path: fx.native_path(),
        native_artworks_dir: fx.grid_dir(),
        runtime: RuntimeKind::Flatpak,
    };

    let mut shelf = Shelf::open(config, Arc::new(NoFetch)).unwrap();
    assert!(shelf.catalog().is_empty());
    assert!(shelf.native().shortcuts().is_empty());

    shelf
        .catalog_mut()
        .add(Shortcut::new("RetroArch", "/usr/bin/retroarch"))
        .await
        .unwrap();

    let outcome = shelf.sync().await.unwrap();
    assert_eq!(
        outcome,
        SyncOutcome::InternalToNative(SyncStats {
            added: 1,
            updated: 0,
            removed: 0,
        })
    );

    let record = &shelf.native().shortcuts()[0];
    assert_eq!(record.exe, "/usr/bin/flatpak-spawn --host /usr/bin/retroarch");

    // Both stores were just written
    assert_eq!(shelf.sync().await.unwrap(), SyncOutcome::Skipped);
}

#[tokio::test]
async fn test_settled_stores_are_not_rewritten() {
    let fx = Fixture::new();

    let mut catalog = fx.catalog();
    let mut alpha = Shortcut::new("Alpha", "/bin/alpha");
    alpha.launch_options = "--fullscreen".into();
    alpha.tags = vec!["Emulators".into()];
    catalog.add(alpha).await.unwrap();

    let mut native = fx.native();
    let outcome = fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();
    assert!(matches!(outcome, SyncOutcome::InternalToNative(_)));
    catalog.save().unwrap();

    // Client store newer, same content
    age(&fx.catalog_path(), 600);
    let catalog_bytes = fs::read(fx.catalog_path()).unwrap();
    let catalog_mtime = mtime(&fx.catalog_path());

    let mut catalog = fx.catalog();
    let mut native = fx.native();
    let outcome = fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();
    assert_eq!(outcome, SyncOutcome::NativeToInternal(SyncStats::default()));
    assert_eq!(fs::read(fx.catalog_path()).unwrap(), catalog_bytes);
    assert_eq!(mtime(&fx.catalog_path()), catalog_mtime);

    // Catalog newer, same content
    age(&fx.native_path(), 1200);
    let native_bytes = fs::read(fx.native_path()).unwrap();
    let native_mtime = mtime(&fx.native_path());

    let mut catalog = fx.catalog();
    let mut native = fx.native();
    let outcome = fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();
    assert_eq!(outcome, SyncOutcome::InternalToNative(SyncStats::default()));
    assert_eq!(fs::read(fx.native_path()).unwrap(), native_bytes);
    assert_eq!(mtime(&fx.native_path()), native_mtime);
    assert_eq!(mtime(&fx.catalog_path()), catalog_mtime);
}

#[tokio::test]
async fn test_grid_artwork_follows_the_catalog() {
    let fx = Fixture::new();
    let art = fx.dir.path().join("art");
    fs::create_dir_all(&art).unwrap();
    fs::write(art.join("logo.png"), b"logo").unwrap();
    fs::write(art.join("cover.jpg"), b"cover").unwrap();
    fs::write(art.join("hero.png"), b"hero").unwrap();

    let mut catalog = fx.catalog();
    let mut alpha = Shortcut::new("Alpha", "/bin/alpha");
    alpha.logo = AssetSlot::from_source(art.join("logo.png").to_string_lossy());
    alpha.cover = AssetSlot::from_source(art.join("cover.jpg").to_string_lossy());
    alpha.hero = AssetSlot::from_source(art.join("hero.png").to_string_lossy());
    catalog.add(alpha.clone()).await.unwrap();

    // Banner the user picked in the client; the catalog has none
    let banner = fx.grid_dir().join(format!("{}.png", alpha.id));
    fs::create_dir_all(fx.grid_dir()).unwrap();
    fs::write(&banner, b"client banner").unwrap();

    let mut native = fx.native();
    fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();

    let logo = fx.grid_dir().join(format!("{}_logo.png", alpha.id));
    let cover = fx.grid_dir().join(format!("{}p.jpg", alpha.id));
    let hero = fx.grid_dir().join(format!("{}_hero.png", alpha.id));
    assert_eq!(fs::read(&logo).unwrap(), b"logo");
    assert_eq!(fs::read(&cover).unwrap(), b"cover");
    assert_eq!(fs::read(&hero).unwrap(), b"hero");
    assert_eq!(fs::read(&banner).unwrap(), b"client banner");
    assert!(native.find(generate_id("/bin/alpha", "Alpha")).unwrap().icon.is_empty());

    catalog.remove(&alpha).unwrap();
    age(&fx.native_path(), 600);
    let mut native = fx.native();
    let outcome = fx.reconciler().sync(&mut catalog, &mut native).await.unwrap();

    assert_eq!(
        outcome,
        SyncOutcome::InternalToNative(SyncStats {
            added: 0,
            updated: 0,
            removed: 1,
        })
    );
    assert!(!logo.exists());
    assert!(!cover.exists());
    assert!(!hero.exists());
    assert!(!banner.exists());
}

#[tokio::test]
async fn test_failed_artwork_fetch_aborts_pass() {
    let fx = Fixture::new();
    fx.write_native(&[native_record("Bravo", "/bin/bravo")]);
    age(&fx.native_path(), 600);
    let native_bytes = fs::read(fx.native_path()).unwrap();

    // Written directly: adding through the catalog would fetch the icon
    let mut alpha = Shortcut::new("Alpha", "/bin/alpha");
    alpha.icon = AssetSlot::from_source("https://cdn.example.com/alpha.png");
    fs::write(
        fx.catalog_path(),
        serde_json::to_vec(&serde_json::json!({ "shortcuts": [alpha] })).unwrap(),
    )
    .unwrap();

    let mut catalog = fx.catalog();
    let mut native = fx.native();
    let err = fx
        .reconciler()
        .sync(&mut catalog, &mut native)
        .await
        .unwrap_err();

    assert!(matches!(err, ShelfError::Operation { .. }));
    assert!(matches!(err.root(), ShelfError::DownloadFailed { .. }));
    assert!(err.is_retryable());
    assert_eq!(fs::read(fx.native_path()).unwrap(), native_bytes);

    let reloaded = fx.native();
    let names: Vec<_> = reloaded.shortcuts().iter().map(|s| s.app_name.as_str()).collect();
    assert_eq!(names, vec!["Bravo"]);
}

#[tokio::test]
async fn test_shelf_sync_rejects_corrupt_client_store() {
    let fx = Fixture::new();
    let config = ShelfConfig {
        catalog_path: fx.catalog_path(),
        images_dir: fx.images_dir(),
        native_shortcuts_path: fx.native_path(),
        native_artworks_dir: fx.grid_dir(),
        runtime: RuntimeKind::Native,
    };
    let mut shelf = Shelf::open(config, Arc::new(NoFetch)).unwrap();

    // Root map that runs out of input before its terminator
    let corrupt = b"\x00shortcuts\x00\x00".to_vec();
    fs::create_dir_all(fx.native_path().parent().unwrap()).unwrap();
    fs::write(fx.native_path(), &corrupt).unwrap();

    let err = shelf.sync().await.unwrap_err();
    assert!(matches!(err.root(), ShelfError::Format { .. }));
    assert!(!err.is_retryable());
    assert_eq!(fs::read(fx.native_path()).unwrap(), corrupt);
    assert!(!fx.catalog_path().exists());
}
