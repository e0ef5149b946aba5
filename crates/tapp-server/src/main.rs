//! tapp-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), seeds an
//! in-memory store from the configured JSON fixture, and serves the matching
//! API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tapp_api::AppState;
use tapp_server::{ServerConfig, expand_tilde};
use tapp_store_memory::MemoryStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "TAPP matching engine server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Override the fixture path from the configuration.
  #[arg(long)]
  fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TAPP"))
    .set_override_option(
      "fixture_path",
      cli.fixture.map(|p| p.to_string_lossy().into_owned()),
    )
    .context("invalid --fixture")?
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let fixture_path = expand_tilde(&server_cfg.fixture_path);
  let store = MemoryStore::open(&fixture_path)
    .await
    .with_context(|| format!("failed to load fixture at {fixture_path:?}"))?;

  let state = AppState::load(Arc::new(store), server_cfg.vocabulary.clone())
    .await
    .context("failed to load initial snapshot")?;

  let app = tapp_server::router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
