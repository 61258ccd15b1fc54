//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error leaves the server as a JSON envelope of the form
//! `{ "error": "<message>" }` so clients never have to branch on the
//! response shape. The status code carries the taxonomy; the message is
//! for humans.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum Error {
  /// No session token, or one that failed verification.
  #[error("authentication required")]
  Unauthenticated,

  /// Login failed. Deliberately the same message for a missing account
  /// and a wrong password.
  #[error("invalid email or password")]
  InvalidCredentials,

  /// The caller is signed in but does not own the resource.
  #[error("you are not the author of this post")]
  Forbidden,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  InvalidInput(String),

  #[error("an account with this email already exists")]
  DuplicateAccount,

  #[error("password hash error: {0}")]
  Hash(String),

  #[error("session token error: {0}")]
  Session(#[from] jsonwebtoken::errors::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
      Error::InvalidCredentials => {
        (StatusCode::UNAUTHORIZED, self.to_string())
      }
      Error::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
      Error::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      Error::InvalidInput(m) => (StatusCode::BAD_REQUEST, m.clone()),
      Error::DuplicateAccount => (StatusCode::BAD_REQUEST, self.to_string()),
      Error::Hash(_) | Error::Session(_) | Error::Store(_) => {
        tracing::error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
      }
    };

    let mut res = (status, Json(json!({ "error": message }))).into_response();
    if matches!(self, Error::Unauthenticated) {
      res
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    res
  }
}
