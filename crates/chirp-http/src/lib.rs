//! HTTP layer for Chirp.
//!
//! Exposes an axum [`Router`] implementing the JSON API backed by any
//! [`chirp_core::store::SocialStore`]. Sessions are stateless bearer tokens
//! minted at login; see [`session`].

pub mod error;
pub mod handlers;
pub mod session;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use chirp_core::store::SocialStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use session::SessionKeys;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `CHIRP_*` environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  /// HMAC secret for session tokens. Changing it invalidates every
  /// outstanding session.
  pub session_secret:      String,
  pub session_ttl_minutes: i64,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: SocialStore> {
  pub store:   Arc<S>,
  pub config:  Arc<ServerConfig>,
  pub session: Arc<SessionKeys>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the Chirp API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: SocialStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/auth/register", post(handlers::auth::register::<S>))
    .route("/auth/login",    post(handlers::auth::login::<S>))
    .route(
      "/posts",
      get(handlers::posts::list::<S>)
        .post(handlers::posts::create::<S>)
        .delete(handlers::posts::delete::<S>),
    )
    .route("/posts/{id}",    put(handlers::posts::update::<S>))
    .route("/posts/like",    post(handlers::posts::like::<S>))
    .route(
      "/comments",
      get(handlers::comments::list::<S>).post(handlers::comments::create::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
