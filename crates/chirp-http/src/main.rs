//! chirp server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens an
//! in-process SQLite store, and serves the Chirp JSON API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use chirp_http::{AppState, ServerConfig, session::SessionKeys};
use chirp_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Chirp social API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = load_config(&cli.config)?;

  // Sessions are HMAC-signed; an empty secret would mean forgeable tokens.
  if server_cfg.session_secret.is_empty() {
    return Err(anyhow::anyhow!(
      "session_secret is empty; set it in config.toml or CHIRP_SESSION_SECRET"
    ));
  }

  let store_path = expand_tilde(&server_cfg.store_path);
  tracing::info!("Opening store at {}", store_path.display());
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = AppState {
    store:   Arc::new(store),
    session: Arc::new(SessionKeys::new(
      &server_cfg.session_secret,
      server_cfg.session_ttl_minutes,
    )),
    config:  Arc::new(server_cfg.clone()),
  };

  let app = chirp_http::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Layer the TOML file (optional) under `CHIRP_*` environment variables.
fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path.to_path_buf()).required(false))
    .add_source(config::Environment::with_prefix("CHIRP"))
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
