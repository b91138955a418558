//! Deckshelf sync - run one reconciliation pass between the shortcut catalog
//! and the game client's shortcut store.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use deckshelf_core::{HttpFetcher, RuntimeKind, Shelf, ShelfConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "deckshelf-sync")]
#[command(about = "Synchronize the shortcut catalog with the game client's shortcut store")]
struct Args {
    /// Shelf config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Client per-user config directory holding shortcuts.vdf and grid/,
    /// used when no config file is given
    #[arg(long, required_unless_present = "config")]
    client_config_dir: Option<PathBuf>,

    /// Override the catalog file location
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Override how the client is installed
    #[arg(long, value_enum)]
    runtime: Option<RuntimeArg>,

    /// Write the resolved config to this path before syncing
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Print the outcome as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RuntimeArg {
    Native,
    Flatpak,
    Snap,
}

impl From<RuntimeArg> for RuntimeKind {
    fn from(arg: RuntimeArg) -> Self {
        match arg {
            RuntimeArg::Native => RuntimeKind::Native,
            RuntimeArg::Flatpak => RuntimeKind::Flatpak,
            RuntimeArg::Snap => RuntimeKind::Snap,
        }
    }
}

fn resolve_config(args: &Args) -> Result<ShelfConfig> {
    let mut config = match (&args.config, &args.client_config_dir) {
        (Some(path), _) => ShelfConfig::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?
            .with_context(|| format!("Config file {} does not exist", path.display()))?,
        (None, Some(dir)) => ShelfConfig::for_user_dirs(dir)?,
        (None, None) => bail!("Either --config or --client-config-dir is required"),
    };

    if let Some(catalog) = &args.catalog {
        config.catalog_path = catalog.clone();
    }
    if let Some(runtime) = args.runtime {
        config.runtime = runtime.into();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let config = resolve_config(&args)?;
    info!("Catalog: {}", config.catalog_path.display());
    info!("Client store: {}", config.native_shortcuts_path.display());
    info!("Client runtime: {:?}", config.runtime);

    if let Some(path) = &args.save_config {
        config
            .save(path)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
    }

    let fetcher = Arc::new(HttpFetcher::new()?);
    let mut shelf = Shelf::open(config, fetcher)?;
    let outcome = shelf.sync().await?;

    if args.json {
        // Intentional stdout for scripting
        println!("{}", serde_json::to_string(&outcome)?);
    }

    Ok(())
}
